//! Buffered unit commands, combined and flushed once per frame.

use crate::{
	constants::COMBINEABLE_ABILITIES,
	geometry::Point2,
	ids::AbilityId,
	IntoProto,
};
use indexmap::IndexMap;
use protobuf::ProtobufEnum;
use rustc_hash::FxHasher;
use sc2_proto::{error::ActionResult as ProtoActionResult, sc2api::{Action, ActionChat_Channel}};
use std::hash::BuildHasherDefault;

type FxIndexMap<K, V> = IndexMap<K, V, BuildHasherDefault<FxHasher>>;

/// Target of a unit command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
	/// Use the ability without a target.
	None,
	/// Aim at a map position.
	Pos(Point2),
	/// Aim at another unit.
	Tag(u64),
}

/// One buffered intent: ability, target and the queue flag.
pub type CommandKey = (AbilityId, Target, bool);

/// Per-frame buffer of unit intents.
///
/// Intents with the same key are grouped in first-appearance order. At
/// flush, keys whose ability is in the combineable allowlist become one raw
/// action carrying every tag; anything else is emitted one action per unit,
/// still in order.
#[derive(Default)]
pub(crate) struct Commander {
	commands: FxIndexMap<CommandKey, Vec<u64>>,
	autocast: FxIndexMap<AbilityId, Vec<u64>>,
	chat: Vec<(String, bool)>,
}

impl Commander {
	/// Buffers a command for one unit. Duplicate tags within a group are
	/// dropped.
	pub fn command(&mut self, tag: u64, key: CommandKey) {
		let tags = self.commands.entry(key).or_default();
		if !tags.contains(&tag) {
			tags.push(tag);
		}
	}
	/// Buffers an autocast toggle.
	pub fn toggle_autocast(&mut self, tag: u64, ability: AbilityId) {
		let tags = self.autocast.entry(ability).or_default();
		if !tags.contains(&tag) {
			tags.push(tag);
		}
	}
	/// Buffers a chat message, optionally visible to allies only.
	pub fn chat(&mut self, message: &str, team_only: bool) {
		self.chat.push((message.to_string(), team_only));
	}

	pub fn is_empty(&self) -> bool {
		self.commands.is_empty() && self.autocast.is_empty() && self.chat.is_empty()
	}

	/// Last buffered intent of a given unit, used by the duplicate filter.
	pub fn last_intent_of(&self, tag: u64) -> Option<CommandKey> {
		self.commands
			.iter()
			.rev()
			.find(|(_, tags)| tags.contains(&tag))
			.map(|(key, _)| *key)
	}

	/// Drains the buffer into protocol actions.
	pub fn build_actions(&mut self) -> Vec<Action> {
		let mut actions = Vec::new();
		for ((ability, target, queue), tags) in self.commands.drain(..) {
			let combined = COMBINEABLE_ABILITIES.contains(&ability);
			let groups: Vec<Vec<u64>> = if combined {
				vec![tags]
			} else {
				tags.into_iter().map(|tag| vec![tag]).collect()
			};
			for group in groups {
				let mut action = Action::new();
				let cmd = action.mut_action_raw().mut_unit_command();
				cmd.set_ability_id(ability.into_proto() as i32);
				cmd.set_unit_tags(group);
				cmd.set_queue_command(queue);
				match target {
					Target::Pos(pos) => {
						*cmd.mut_target_world_space_pos() = pos.into_proto();
					}
					Target::Tag(tag) => cmd.set_target_unit_tag(tag),
					Target::None => {}
				}
				actions.push(action);
			}
		}
		for (ability, tags) in self.autocast.drain(..) {
			let mut action = Action::new();
			let toggle = action.mut_action_raw().mut_toggle_autocast();
			toggle.set_ability_id(ability.into_proto() as i32);
			toggle.set_unit_tags(tags);
			actions.push(action);
		}
		for (message, team_only) in self.chat.drain(..) {
			let mut action = Action::new();
			let chat = action.mut_action_chat();
			chat.set_channel(if team_only {
				ActionChat_Channel::Team
			} else {
				ActionChat_Channel::Broadcast
			});
			chat.set_message(message);
			actions.push(action);
		}
		actions
	}
}

/// Raw result code of an action or placement query.
///
/// The protocol enumerates a few hundred failure reasons; only a handful
/// matter programmatically, so the code is kept raw with named constants
/// for the common ones.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActionResult(pub u32);

#[allow(non_upper_case_globals)]
impl ActionResult {
	pub const Success: Self = Self(1);
	pub const NotSupported: Self = Self(2);
	pub const CantQueueThatOrder: Self = Self(4);
	pub const NotEnoughMinerals: Self = Self(9);
	pub const NotEnoughVespene: Self = Self(10);
	pub const NotEnoughFood: Self = Self(13);
	pub const NotEnoughEnergy: Self = Self(17);

	pub fn is_success(self) -> bool {
		self == Self::Success
	}
}
impl From<ProtoActionResult> for ActionResult {
	fn from(result: ProtoActionResult) -> Self {
		Self(result.value() as u32)
	}
}

/// Failed action reported by the game for the previous frame.
#[derive(Debug, Clone, Copy)]
pub struct ActionError {
	pub unit: u64,
	pub ability: AbilityId,
	pub result: ActionResult,
}

#[cfg(test)]
mod tests {
	use super::*;

	const MARINES: [u64; 3] = [101, 102, 103];

	#[test]
	fn combineable_orders_merge_into_one_action() {
		let mut commander = Commander::default();
		let key = (AbilityId::Attack, Target::Pos(Point2::new(20.0, 20.0)), false);
		for tag in MARINES {
			commander.command(tag, key);
		}
		let actions = commander.build_actions();
		assert_eq!(actions.len(), 1);
		let cmd = actions[0].get_action_raw().get_unit_command();
		assert_eq!(cmd.get_unit_tags().to_vec(), MARINES.to_vec());
		assert_eq!(cmd.get_ability_id(), AbilityId::Attack.0 as i32);
	}

	#[test]
	fn non_combineable_orders_stay_separate() {
		let mut commander = Commander::default();
		let key = (AbilityId::BarracksTrainMarine, Target::None, false);
		commander.command(11, key);
		commander.command(12, key);
		let actions = commander.build_actions();
		assert_eq!(actions.len(), 2);
		assert_eq!(actions[0].get_action_raw().get_unit_command().get_unit_tags().to_vec(), vec![11]);
		assert_eq!(actions[1].get_action_raw().get_unit_command().get_unit_tags().to_vec(), vec![12]);
	}

	#[test]
	fn groups_flush_in_first_appearance_order() {
		let mut commander = Commander::default();
		let move_key = (AbilityId::Move, Target::Pos(Point2::new(5.0, 5.0)), false);
		let stop_key = (AbilityId::Stop, Target::None, false);
		commander.command(1, move_key);
		commander.command(2, stop_key);
		commander.command(3, move_key);
		let actions = commander.build_actions();
		assert_eq!(actions.len(), 2);
		assert_eq!(actions[0].get_action_raw().get_unit_command().get_unit_tags().to_vec(), vec![1, 3]);
		assert_eq!(actions[1].get_action_raw().get_unit_command().get_unit_tags().to_vec(), vec![2]);
	}

	#[test]
	fn duplicate_tags_in_a_group_are_dropped() {
		let mut commander = Commander::default();
		let key = (AbilityId::Move, Target::Pos(Point2::new(1.0, 2.0)), false);
		commander.command(7, key);
		commander.command(7, key);
		let actions = commander.build_actions();
		assert_eq!(actions[0].get_action_raw().get_unit_command().get_unit_tags().to_vec(), vec![7]);
	}

	#[test]
	fn success_code() {
		assert!(ActionResult::Success.is_success());
		assert!(!ActionResult::NotEnoughMinerals.is_success());
	}
}
