//! Insertion-ordered unit collections with set algebra and spatial helpers.

use crate::{distance::DistanceIterator, geometry::Point2, ids::UnitTypeId, unit::Unit};
use indexmap::IndexMap;
use rand::prelude::*;
use rustc_hash::{FxHashSet, FxHasher};
use std::{
	hash::BuildHasherDefault,
	iter::FromIterator,
	ops::{Add, BitAnd, BitOr, Index, Sub},
};

type FxIndexMap<K, V> = IndexMap<K, V, BuildHasherDefault<FxHasher>>;

/// Collection of units keyed by tag, preserving insertion order.
#[derive(Default, Clone)]
pub struct Units(FxIndexMap<u64, Unit>);

impl Units {
	pub fn new() -> Self {
		Self::default()
	}
	pub fn with_capacity(n: usize) -> Self {
		Self(FxIndexMap::with_capacity_and_hasher(n, Default::default()))
	}
	pub fn len(&self) -> usize {
		self.0.len()
	}
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
	pub fn clear(&mut self) {
		self.0.clear()
	}

	/// Adds a unit, replacing any previous unit with the same tag.
	pub fn push(&mut self, unit: Unit) -> Option<Unit> {
		self.0.insert(unit.tag, unit)
	}
	/// Removes by tag, preserving the order of the remaining units.
	pub fn remove(&mut self, tag: u64) -> Option<Unit> {
		self.0.shift_remove(&tag)
	}

	pub fn get(&self, tag: u64) -> Option<&Unit> {
		self.0.get(&tag)
	}
	pub fn get_mut(&mut self, tag: u64) -> Option<&mut Unit> {
		self.0.get_mut(&tag)
	}
	pub fn contains_tag(&self, tag: u64) -> bool {
		self.0.contains_key(&tag)
	}
	pub fn first(&self) -> Option<&Unit> {
		self.0.values().next()
	}
	pub fn random(&self) -> Option<&Unit> {
		(!self.is_empty()).then(|| {
			let i = thread_rng().gen_range(0..self.len());
			&self.0[i]
		})
	}

	pub fn iter(&self) -> indexmap::map::Values<u64, Unit> {
		self.0.values()
	}
	pub fn iter_mut(&mut self) -> indexmap::map::ValuesMut<u64, Unit> {
		self.0.values_mut()
	}
	pub fn tags(&self) -> impl Iterator<Item = u64> + '_ {
		self.0.keys().copied()
	}

	// ----- filters -----

	pub fn filter<F: Fn(&Unit) -> bool>(&self, pred: F) -> Self {
		self.iter().filter(|u| pred(u)).cloned().collect()
	}
	pub fn of_type(&self, type_id: UnitTypeId) -> Self {
		self.filter(|u| u.type_id == type_id)
	}
	pub fn of_types(&self, types: &[UnitTypeId]) -> Self {
		self.filter(|u| types.contains(&u.type_id))
	}
	pub fn exclude_type(&self, type_id: UnitTypeId) -> Self {
		self.filter(|u| u.type_id != type_id)
	}
	pub fn ready(&self) -> Self {
		self.filter(Unit::is_ready)
	}
	pub fn not_ready(&self) -> Self {
		self.filter(|u| !u.is_ready())
	}
	pub fn idle(&self) -> Self {
		self.filter(Unit::is_idle)
	}
	pub fn visible(&self) -> Self {
		self.filter(Unit::is_visible)
	}
	pub fn flying(&self) -> Self {
		self.filter(|u| u.is_flying)
	}
	pub fn ground(&self) -> Self {
		self.filter(|u| !u.is_flying)
	}
	pub fn tags_in<'a, T: IntoIterator<Item = &'a u64>>(&self, tags: T) -> Self {
		tags.into_iter().filter_map(|tag| self.0.get(tag)).cloned().collect()
	}
	pub fn tags_not_in(&self, tags: &FxHashSet<u64>) -> Self {
		self.filter(|u| !tags.contains(&u.tag))
	}
	/// Units counting as `unit_type` through the tech-alias chain, so a lair
	/// or hive still counts as a hatchery.
	pub fn same_tech(&self, unit_type: UnitTypeId) -> Self {
		self.filter(|u| {
			u.type_id == unit_type
				|| u.type_data().map_or(false, |data| data.tech_alias.contains(&unit_type))
		})
	}
	/// Units counting as `unit_type` through their unit alias only, so a
	/// burrowed or flying form still counts as its base form.
	pub fn same_unit(&self, unit_type: UnitTypeId) -> Self {
		self.filter(|u| {
			u.type_id == unit_type || u.type_data().and_then(|data| data.unit_alias) == Some(unit_type)
		})
	}

	// ----- spatial -----

	pub fn closest(&self, target: impl Into<Point2>) -> Option<&Unit> {
		self.iter().closest(target)
	}
	pub fn furthest(&self, target: impl Into<Point2>) -> Option<&Unit> {
		self.iter().furthest(target)
	}
	pub fn closer(&self, distance: f32, target: impl Into<Point2>) -> Self {
		self.iter().closer(distance, target.into()).cloned().collect()
	}
	pub fn further(&self, distance: f32, target: impl Into<Point2>) -> Self {
		self.iter().further(distance, target.into()).cloned().collect()
	}
	/// Units whose distance to `target` lies inside `[d1, d2]`.
	pub fn in_distance_between(&self, target: impl Into<Point2>, d1: f32, d2: f32) -> Self {
		let target = target.into();
		let (near, far) = if d1 <= d2 { (d1, d2) } else { (d2, d1) };
		let (near, far) = (near * near, far * far);
		self.filter(|u| {
			let d = u.position.distance_squared(target);
			near <= d && d <= far
		})
	}
	/// The `n` units closest to `target`.
	pub fn closest_n_units(&self, target: impl Into<Point2>, n: usize) -> Self {
		let target = target.into();
		self.take_sorted_by(n, |u| u.position.distance_squared(target))
	}
	/// The `n` units whose distance to `target` is nearest to `distance`.
	pub fn n_closest_to_distance(&self, target: impl Into<Point2>, distance: f32, n: usize) -> Self {
		let target = target.into();
		self.take_sorted_by(n, |u| (u.position.distance(target) - distance).abs())
	}
	fn take_sorted_by(&self, n: usize, key: impl Fn(&Unit) -> f32) -> Self {
		let mut units: Vec<&Unit> = self.iter().collect();
		units.sort_by(|a, b| {
			key(a)
				.partial_cmp(&key(b))
				.unwrap_or(std::cmp::Ordering::Equal)
		});
		units.into_iter().take(n).cloned().collect()
	}
	pub fn center(&self) -> Option<Point2> {
		self.iter().center()
	}
	/// Units able to hit `target` from where they stand (plus `gap`).
	pub fn in_range_of(&self, target: &Unit, gap: f32) -> Self {
		self.filter(|u| u.in_range(target, gap))
	}
	pub fn sort_by_distance(&mut self, target: impl Into<Point2>) {
		let target = target.into();
		self.0.sort_by(|_, a, _, b| {
			a.position
				.distance_squared(target)
				.partial_cmp(&b.position.distance_squared(target))
				.unwrap_or(std::cmp::Ordering::Equal)
		});
	}

	pub fn sum_supply(&self) -> f32 {
		self.iter().map(Unit::supply_cost).sum()
	}
}

use crate::distance::Distance;

impl FromIterator<Unit> for Units {
	fn from_iter<I: IntoIterator<Item = Unit>>(iter: I) -> Self {
		Self(iter.into_iter().map(|u| (u.tag, u)).collect())
	}
}
impl Extend<Unit> for Units {
	fn extend<I: IntoIterator<Item = Unit>>(&mut self, iter: I) {
		self.0.extend(iter.into_iter().map(|u| (u.tag, u)));
	}
}
impl IntoIterator for Units {
	type Item = Unit;
	type IntoIter = indexmap::map::IntoValues<u64, Unit>;
	fn into_iter(self) -> Self::IntoIter {
		self.0.into_values()
	}
}
impl<'a> IntoIterator for &'a Units {
	type Item = &'a Unit;
	type IntoIter = indexmap::map::Values<'a, u64, Unit>;
	fn into_iter(self) -> Self::IntoIter {
		self.0.values()
	}
}
impl Index<u64> for Units {
	type Output = Unit;
	fn index(&self, tag: u64) -> &Unit {
		&self.0[&tag]
	}
}

impl BitOr for &Units {
	type Output = Units;
	fn bitor(self, other: Self) -> Units {
		let mut result = self.clone();
		result.extend(other.iter().cloned());
		result
	}
}
impl BitAnd for &Units {
	type Output = Units;
	fn bitand(self, other: Self) -> Units {
		self.filter(|u| other.contains_tag(u.tag))
	}
}
impl Sub for &Units {
	type Output = Units;
	fn sub(self, other: Self) -> Units {
		self.filter(|u| !other.contains_tag(u.tag))
	}
}
impl Add for &Units {
	type Output = Units;
	fn add(self, other: Self) -> Units {
		self | other
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::game_data::GameData;
	use crate::unit::test_fixtures::{shared_data, unit, unit_type};
	use rustc_hash::FxHashSet;

	fn squad() -> Units {
		let data = shared_data(GameData::default());
		[
			unit(&data, 1, UnitTypeId::Marine, Point2::new(0.0, 0.0)),
			unit(&data, 2, UnitTypeId::Marine, Point2::new(5.0, 0.0)),
			unit(&data, 3, UnitTypeId::Marauder, Point2::new(10.0, 0.0)),
			unit(&data, 4, UnitTypeId::Medivac, Point2::new(15.0, 0.0)),
		]
		.into_iter()
		.collect()
	}

	#[test]
	fn removal_keeps_insertion_order() {
		let mut units = squad();
		units.remove(2);
		let tags: Vec<_> = units.tags().collect();
		assert_eq!(tags, vec![1, 3, 4]);
	}

	#[test]
	fn set_algebra() {
		let units = squad();
		let marines = units.of_type(UnitTypeId::Marine);
		let rest = &units - &marines;
		assert_eq!(rest.len(), 2);
		assert!(!rest.contains_tag(1));
		let all = &marines | &rest;
		assert_eq!(all.len(), 4);
		let overlap = &units & &marines;
		assert_eq!(overlap.len(), 2);
		let added = &marines + &rest;
		assert_eq!(added.len(), 4);
	}

	#[test]
	fn spatial_helpers() {
		let units = squad();
		assert_eq!(units.closest(Point2::new(1.0, 0.0)).map(|u| u.tag), Some(1));
		assert_eq!(units.furthest(Point2::new(0.0, 0.0)).map(|u| u.tag), Some(4));
		assert_eq!(units.closer(7.0, Point2::new(0.0, 0.0)).len(), 2);
		assert_eq!(units.center(), Some(Point2::new(7.5, 0.0)));
	}

	#[test]
	fn distance_band_and_counted_selections() {
		let units = squad();
		let origin = Point2::new(0.0, 0.0);

		let band = units.in_distance_between(origin, 4.0, 12.0);
		let tags: Vec<_> = band.tags().collect();
		assert_eq!(tags, vec![2, 3]);
		// Reversed bounds select the same band.
		assert_eq!(units.in_distance_between(origin, 12.0, 4.0).len(), 2);

		let closest = units.closest_n_units(origin, 2);
		let tags: Vec<_> = closest.tags().collect();
		assert_eq!(tags, vec![1, 2]);
		assert_eq!(units.closest_n_units(origin, 10).len(), 4);

		// Nearest to a ring of radius 9: the marauder at 10, then the marine at 5.
		let ring = units.n_closest_to_distance(origin, 9.0, 2);
		let tags: Vec<_> = ring.tags().collect();
		assert_eq!(tags, vec![3, 2]);
	}

	#[test]
	fn tag_selections_partition_the_collection() {
		let units = squad();
		let picked: FxHashSet<u64> = [1, 3].into_iter().collect();
		let inside = units.tags_in(&picked.iter().copied().collect::<Vec<_>>());
		let outside = units.tags_not_in(&picked);
		assert_eq!(inside.len(), 2);
		assert_eq!(outside.len(), 2);
		assert!(outside.contains_tag(2) && outside.contains_tag(4));
	}

	#[test]
	fn alias_selections_follow_the_catalog() {
		let mut game_data = GameData::default();
		let mut lair = unit_type(UnitTypeId::Lair, "Lair");
		lair.tech_alias = vec![UnitTypeId::Hatchery];
		game_data.units.insert(lair.id, lair);
		let mut lowered = unit_type(UnitTypeId::SupplyDepotLowered, "SupplyDepotLowered");
		lowered.unit_alias = Some(UnitTypeId::SupplyDepot);
		game_data.units.insert(lowered.id, lowered);
		let data = shared_data(game_data);

		let units: Units = [
			unit(&data, 1, UnitTypeId::Hatchery, Point2::new(0.0, 0.0)),
			unit(&data, 2, UnitTypeId::Lair, Point2::new(5.0, 0.0)),
			unit(&data, 3, UnitTypeId::SupplyDepot, Point2::new(10.0, 0.0)),
			unit(&data, 4, UnitTypeId::SupplyDepotLowered, Point2::new(15.0, 0.0)),
		]
		.into_iter()
		.collect();

		// Tech alias: the lair still counts as a hatchery.
		let hatcheries = units.same_tech(UnitTypeId::Hatchery);
		assert_eq!(hatcheries.len(), 2);
		// Unit alias only: lowered depots count, lairs do not morph back.
		let depots = units.same_unit(UnitTypeId::SupplyDepot);
		assert_eq!(depots.len(), 2);
		assert!(depots.contains_tag(3) && depots.contains_tag(4));
		assert_eq!(units.same_unit(UnitTypeId::Hatchery).len(), 1);
	}

	#[test]
	fn replacing_a_tag_keeps_one_entry() {
		let data = shared_data(GameData::default());
		let mut units = Units::new();
		units.push(unit(&data, 9, UnitTypeId::SCV, Point2::new(0.0, 0.0)));
		units.push(unit(&data, 9, UnitTypeId::SCV, Point2::new(3.0, 0.0)));
		assert_eq!(units.len(), 1);
		assert_eq!(units[9].position, Point2::new(3.0, 0.0));
	}
}
