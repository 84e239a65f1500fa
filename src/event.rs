//! Events derived by diffing consecutive frames.

use crate::{
	ids::{UnitTypeId, UpgradeId},
	unit::Unit,
	units::Units,
};
use rustc_hash::{FxHashMap, FxHashSet};

/// Something that changed since the previous frame. Delivered to
/// [`Bot::on_event`](crate::Bot::on_event) before `on_step`, in the order
/// the variants are declared.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
	/// A unit died or a structure was destroyed. Tag only; the unit is gone.
	UnitDestroyed(u64),
	/// An own non-structure unit appeared for the first time in its life.
	UnitCreated(u64),
	/// Health or shield strictly decreased; the payload is the lost amount.
	UnitTookDamage(u64, f32),
	/// Type id differs from the previous frame (morphs, burrows).
	UnitTypeChanged(u64, UnitTypeId),
	/// An own structure appeared with build progress below one.
	ConstructionStarted(u64),
	/// An own structure finished, or first appeared already finished.
	ConstructionComplete(u64),
	/// An enemy unit became visible.
	EnemyEnteredVision(u64),
	/// A previously visible enemy is no longer observed.
	EnemyLeftVision(u64),
	/// An upgrade finished researching.
	UpgradeComplete(UpgradeId),
}

/// Previous-frame state kept only for event diffing.
#[derive(Default)]
pub(crate) struct PreviousFrame {
	pub all_units: FxHashMap<u64, Unit>,
	pub own_units: FxHashMap<u64, Unit>,
	pub own_structures: FxHashMap<u64, Unit>,
	pub enemy_units: FxHashMap<u64, Unit>,
	pub enemy_structures: FxHashMap<u64, Unit>,
	pub upgrades: FxHashSet<UpgradeId>,
}

impl PreviousFrame {
	pub fn capture(
		&mut self,
		own_units: &Units,
		own_structures: &Units,
		enemy_units: &Units,
		enemy_structures: &Units,
		upgrades: &FxHashSet<UpgradeId>,
	) {
		let by_tag = |units: &Units| units.iter().map(|u| (u.tag, u.clone())).collect();
		self.own_units = by_tag(own_units);
		self.own_structures = by_tag(own_structures);
		self.enemy_units = by_tag(enemy_units);
		self.enemy_structures = by_tag(enemy_structures);
		self.all_units = self
			.own_units
			.iter()
			.chain(&self.own_structures)
			.chain(&self.enemy_units)
			.chain(&self.enemy_structures)
			.map(|(tag, u)| (*tag, u.clone()))
			.collect();
		self.upgrades = upgrades.clone();
	}

	fn saw_enemy(&self, tag: u64) -> bool {
		self.enemy_units.contains_key(&tag) || self.enemy_structures.contains_key(&tag)
	}
}

/// Lifetime bookkeeping across frames: which tags have already produced a
/// created event, and how many units of each type were created.
#[derive(Default)]
pub(crate) struct EventTracker {
	seen_units: FxHashSet<u64>,
	pub created_count: FxHashMap<UnitTypeId, u32>,
}

impl EventTracker {
	/// Diffs the current frame against the previous one.
	pub fn derive(
		&mut self,
		dead_units: &[u64],
		own_units: &Units,
		own_structures: &Units,
		enemies: &Units,
		upgrades: &FxHashSet<UpgradeId>,
		prev: &PreviousFrame,
	) -> Vec<Event> {
		let mut events = Vec::new();

		for tag in dead_units {
			if prev.all_units.contains_key(tag) {
				events.push(Event::UnitDestroyed(*tag));
			}
		}

		for u in own_units {
			if !prev.own_units.contains_key(&u.tag) && self.seen_units.insert(u.tag) {
				*self.created_count.entry(u.type_id).or_default() += 1;
				events.push(Event::UnitCreated(u.tag));
			}
		}

		for u in own_units.iter().chain(own_structures).chain(enemies) {
			if let Some(before) = prev.all_units.get(&u.tag) {
				// Each pool counts on its own: health lost while the shield
				// regenerates is still damage.
				let lost = |before: Option<f32>, now: Option<f32>| {
					(before.unwrap_or_default() - now.unwrap_or_default()).max(0.0)
				};
				let delta = lost(before.health, u.health) + lost(before.shield, u.shield);
				if delta > 0.0 {
					events.push(Event::UnitTookDamage(u.tag, delta));
				}
			}
		}

		for u in own_units.iter().chain(own_structures).chain(enemies) {
			if let Some(before) = prev.all_units.get(&u.tag) {
				if before.type_id != u.type_id {
					events.push(Event::UnitTypeChanged(u.tag, before.type_id));
				}
			}
		}

		for s in own_structures {
			match prev.own_structures.get(&s.tag) {
				None if s.build_progress < 1.0 => events.push(Event::ConstructionStarted(s.tag)),
				None => events.push(Event::ConstructionComplete(s.tag)),
				Some(before) if before.build_progress < 1.0 && s.build_progress >= 1.0 => {
					events.push(Event::ConstructionComplete(s.tag))
				}
				_ => {}
			}
		}

		for u in enemies {
			if !prev.saw_enemy(u.tag) {
				events.push(Event::EnemyEnteredVision(u.tag));
			}
		}
		let enemy_gone = |tag: &u64| !enemies.contains_tag(*tag) && !dead_units.contains(tag);
		for tag in prev.enemy_units.keys().chain(prev.enemy_structures.keys()) {
			if enemy_gone(tag) {
				events.push(Event::EnemyLeftVision(*tag));
			}
		}

		for upgrade in upgrades.difference(&prev.upgrades) {
			events.push(Event::UpgradeComplete(*upgrade));
		}

		events
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{game_data::GameData, geometry::Point2, unit::test_fixtures::*};

	fn structures(units: Vec<Unit>) -> Units {
		units.into_iter().collect()
	}

	#[test]
	fn construction_complete_fires_exactly_once() {
		let data = shared_data(GameData::default());
		let mut tracker = EventTracker::default();
		let mut prev = PreviousFrame::default();
		let empty = Units::new();
		let upgrades = FxHashSet::default();

		let mut barracks = unit(&data, 5, UnitTypeId::Barracks, Point2::new(30.0, 30.0));
		barracks.build_progress = 0.99;
		let frame1 = structures(vec![barracks.clone()]);
		let events = tracker.derive(&[], &empty, &frame1, &empty, &upgrades, &prev);
		assert_eq!(events, vec![Event::ConstructionStarted(5)]);
		prev.capture(&empty, &frame1, &empty, &empty, &upgrades);

		barracks.build_progress = 1.0;
		let frame2 = structures(vec![barracks.clone()]);
		let events = tracker.derive(&[], &empty, &frame2, &empty, &upgrades, &prev);
		assert_eq!(events, vec![Event::ConstructionComplete(5)]);
		prev.capture(&empty, &frame2, &empty, &empty, &upgrades);

		// Already complete: nothing more to report.
		let events = tracker.derive(&[], &empty, &frame2, &empty, &upgrades, &prev);
		assert!(events.is_empty());
	}

	#[test]
	fn starting_townhall_counts_as_complete() {
		let data = shared_data(GameData::default());
		let mut tracker = EventTracker::default();
		let prev = PreviousFrame::default();
		let empty = Units::new();
		let upgrades = FxHashSet::default();

		let cc = unit(&data, 1, UnitTypeId::CommandCenter, Point2::new(30.0, 30.0));
		let frame = structures(vec![cc]);
		let events = tracker.derive(&[], &empty, &frame, &empty, &upgrades, &prev);
		assert_eq!(events, vec![Event::ConstructionComplete(1)]);
	}

	#[test]
	fn created_fires_once_per_lifetime() {
		let data = shared_data(GameData::default());
		let mut tracker = EventTracker::default();
		let mut prev = PreviousFrame::default();
		let empty = Units::new();
		let upgrades = FxHashSet::default();

		let marine = unit(&data, 9, UnitTypeId::Marine, Point2::new(10.0, 10.0));
		let frame: Units = [marine.clone()].into_iter().collect();
		let events = tracker.derive(&[], &frame, &empty, &empty, &upgrades, &prev);
		assert_eq!(events, vec![Event::UnitCreated(9)]);
		prev.capture(&frame, &empty, &empty, &empty, &upgrades);

		// Leaves vision (medivac pickup) and comes back: no second event.
		let gone = tracker.derive(&[], &empty, &empty, &empty, &upgrades, &prev);
		assert!(gone.is_empty());
		prev.capture(&empty, &empty, &empty, &empty, &upgrades);
		let back = tracker.derive(&[], &frame, &empty, &empty, &upgrades, &prev);
		assert!(back.is_empty());
		assert_eq!(tracker.created_count[&UnitTypeId::Marine], 1);
	}

	#[test]
	fn health_loss_counts_even_while_shields_regenerate() {
		let data = shared_data(GameData::default());
		let mut tracker = EventTracker::default();
		let mut prev = PreviousFrame::default();
		let empty = Units::new();
		let upgrades = FxHashSet::default();

		let mut adept = unit(&data, 17, UnitTypeId::Adept, Point2::new(20.0, 20.0));
		adept.health = Some(50.0);
		adept.shield = Some(10.0);
		let frame1: Units = [adept.clone()].into_iter().collect();
		tracker.derive(&[], &frame1, &empty, &empty, &upgrades, &prev);
		prev.capture(&frame1, &empty, &empty, &empty, &upgrades);

		// Shields regenerated past the health lost; the hit still counts.
		adept.health = Some(40.0);
		adept.shield = Some(25.0);
		let frame2: Units = [adept.clone()].into_iter().collect();
		let events = tracker.derive(&[], &frame2, &empty, &empty, &upgrades, &prev);
		assert_eq!(events, vec![Event::UnitTookDamage(17, 10.0)]);
		prev.capture(&frame2, &empty, &empty, &empty, &upgrades);

		// Both pools drop: the deltas add up.
		adept.health = Some(35.0);
		adept.shield = Some(20.0);
		let frame3: Units = [adept].into_iter().collect();
		let events = tracker.derive(&[], &frame3, &empty, &empty, &upgrades, &prev);
		assert_eq!(events, vec![Event::UnitTookDamage(17, 10.0)]);
	}

	#[test]
	fn vision_and_death_diffs() {
		let data = shared_data(GameData::default());
		let mut tracker = EventTracker::default();
		let mut prev = PreviousFrame::default();
		let empty = Units::new();
		let upgrades = FxHashSet::default();

		let roach = unit(&data, 21, UnitTypeId::Roach, Point2::new(50.0, 50.0));
		let enemies: Units = [roach].into_iter().collect();
		let events = tracker.derive(&[], &empty, &empty, &enemies, &upgrades, &prev);
		assert_eq!(events, vec![Event::EnemyEnteredVision(21)]);
		prev.capture(&empty, &empty, &enemies, &empty, &upgrades);

		// Fogged: left vision, not destroyed.
		let events = tracker.derive(&[], &empty, &empty, &empty, &upgrades, &prev);
		assert_eq!(events, vec![Event::EnemyLeftVision(21)]);

		// Died while visible: destroyed, no left-vision event.
		let events = tracker.derive(&[21], &empty, &empty, &empty, &upgrades, &prev);
		assert_eq!(events, vec![Event::UnitDestroyed(21)]);
	}
}
