//! Map whose entries expire a fixed number of frames after insertion.
//!
//! Handy for remembering transient facts about units, e.g. which enemy was
//! targeted recently or when a scout was last sent somewhere. Time is the
//! game loop counter, passed in by the caller; nothing here reads a clock.

use rustc_hash::FxHashMap;
use std::hash::Hash;

#[derive(Debug, Clone)]
pub struct ExpiringMap<K, V> {
	entries: FxHashMap<K, (V, u32)>,
	ttl: u32,
}

impl<K: Eq + Hash, V> ExpiringMap<K, V> {
	/// Map whose entries live for `ttl` frames after insertion.
	pub fn new(ttl: u32) -> Self {
		Self {
			entries: FxHashMap::default(),
			ttl,
		}
	}

	pub fn ttl(&self) -> u32 {
		self.ttl
	}

	/// Inserts at frame `now`, resetting the lifetime of an existing key.
	pub fn insert(&mut self, key: K, value: V, now: u32) -> Option<V> {
		self.purge(now);
		self.entries
			.insert(key, (value, now.saturating_add(self.ttl)))
			.map(|(v, _)| v)
	}

	pub fn get(&self, key: &K, now: u32) -> Option<&V> {
		self.entries
			.get(key)
			.filter(|(_, expires)| now < *expires)
			.map(|(v, _)| v)
	}

	pub fn contains(&self, key: &K, now: u32) -> bool {
		self.get(key, now).is_some()
	}

	pub fn remove(&mut self, key: &K) -> Option<V> {
		self.entries.remove(key).map(|(v, _)| v)
	}

	/// Live entries at frame `now`.
	pub fn iter(&self, now: u32) -> impl Iterator<Item = (&K, &V)> {
		self.entries
			.iter()
			.filter(move |(_, (_, expires))| now < *expires)
			.map(|(k, (v, _))| (k, v))
	}

	pub fn len(&self, now: u32) -> usize {
		self.iter(now).count()
	}
	pub fn is_empty(&self, now: u32) -> bool {
		self.len(now) == 0
	}

	/// Drops expired entries. Called on insert; also usable directly.
	pub fn purge(&mut self, now: u32) {
		self.entries.retain(|_, (_, expires)| now < *expires);
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn entries_expire_after_ttl_frames() {
		let mut map = ExpiringMap::new(10);
		map.insert(1u64, "scouted", 100);
		assert!(map.contains(&1, 100));
		assert!(map.contains(&1, 109));
		assert!(!map.contains(&1, 110));
	}

	#[test]
	fn reinsert_resets_the_lifetime() {
		let mut map = ExpiringMap::new(5);
		map.insert(7u64, 1, 0);
		map.insert(7u64, 2, 4);
		assert_eq!(map.get(&7, 8), Some(&2));
		assert_eq!(map.get(&7, 9), None);
	}

	#[test]
	fn purge_drops_expired_entries() {
		let mut map = ExpiringMap::new(2);
		map.insert(1u64, (), 0);
		map.insert(2u64, (), 5);
		map.purge(4);
		assert_eq!(map.len(10), 0);
		assert_eq!(map.len(6), 1);
	}
}
