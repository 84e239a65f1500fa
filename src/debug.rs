//! Debug overlay: drawings, spawned units, cheats.
//!
//! Drawings are transient on the game side, so a bot redraws them every
//! frame. To avoid spamming the protocol, the accumulated drawing set is
//! hashed at flush; an unchanged set is not re-sent, and a set that became
//! empty is cleared with a single empty draw command.

use crate::{
	geometry::{Point2, Point3},
	ids::UnitTypeId,
	IntoProto,
};
use rustc_hash::FxHashSet;
use sc2_proto::debug::{
	DebugBox, DebugCommand as ProtoDebugCommand, DebugDraw as ProtoDebugDraw,
	DebugEndGame_EndResult, DebugGameState as ProtoDebugGameState, DebugLine,
	DebugSetUnitValue_UnitValue, DebugSphere, DebugText,
};
use std::{
	collections::hash_map::DefaultHasher,
	hash::{Hash, Hasher},
};

type Color = (u32, u32, u32);
type ScreenPos = (f32, f32);

#[derive(Default)]
pub struct Debugger {
	commands: Vec<DebugCommand>,
	drawings: Vec<DebugDraw>,
	kill_tags: FxHashSet<u64>,
	/// Hash of the drawing set sent last, `None` before the first send.
	sent_drawings: Option<u64>,
}

impl Debugger {
	/// Drains everything buffered this frame into protocol commands.
	/// Returns an empty vec when there is nothing to send.
	pub(crate) fn flush(&mut self) -> Vec<ProtoDebugCommand> {
		let mut protos: Vec<ProtoDebugCommand> =
			self.commands.drain(..).map(|c| c.into_proto()).collect();
		if !self.kill_tags.is_empty() {
			protos.push(DebugCommand::KillUnit(self.kill_tags.drain().collect()).into_proto());
		}

		if self.drawings.is_empty() {
			// One clear when drawings disappear, then stay silent.
			if self.sent_drawings.take().is_some() {
				let mut proto = ProtoDebugCommand::new();
				proto.set_draw(ProtoDebugDraw::new());
				protos.push(proto);
			}
		} else {
			let mut hasher = DefaultHasher::new();
			self.drawings.hash(&mut hasher);
			let hash = hasher.finish();
			if self.sent_drawings != Some(hash) {
				let mut proto = ProtoDebugCommand::new();
				proto.set_draw(self.drawings.as_slice().into_proto());
				protos.push(proto);
				self.sent_drawings = Some(hash);
			}
			self.drawings.clear();
		}
		protos
	}

	// ----- drawings, accumulated anew each frame -----

	pub fn draw_text_world(&mut self, text: &str, pos: Point3, color: Option<Color>, size: Option<u32>) {
		self.drawings
			.push(DebugDraw::Text(text.to_string(), DebugPos::World(pos), color, size));
	}
	/// Text at screen coordinates in `(0..1, 0..1)`, top-left by default.
	pub fn draw_text_screen(&mut self, text: &str, pos: Option<ScreenPos>, color: Option<Color>, size: Option<u32>) {
		self.drawings.push(DebugDraw::Text(
			text.to_string(),
			DebugPos::Screen(pos.unwrap_or((0.0, 0.0))),
			color,
			size,
		));
	}
	pub fn draw_line(&mut self, p0: Point3, p1: Point3, color: Option<Color>) {
		self.drawings.push(DebugDraw::Line(p0, p1, color));
	}
	pub fn draw_box(&mut self, p0: Point3, p1: Point3, color: Option<Color>) {
		self.drawings.push(DebugDraw::Box(p0, p1, color));
	}
	pub fn draw_cube(&mut self, pos: Point3, half_edge: f32, color: Option<Color>) {
		let offset = Point3::new(half_edge, half_edge, half_edge);
		self.drawings.push(DebugDraw::Box(
			Point3::new(pos.x - offset.x, pos.y - offset.y, pos.z - offset.z),
			Point3::new(pos.x + offset.x, pos.y + offset.y, pos.z + offset.z),
			color,
		));
	}
	pub fn draw_sphere(&mut self, pos: Point3, radius: f32, color: Option<Color>) {
		self.drawings.push(DebugDraw::Sphere(pos, radius, color));
	}

	// ----- one-shot commands -----

	/// Spawns `count` units of a type for `owner` at `pos`.
	pub fn create_unit(&mut self, type_id: UnitTypeId, owner: Option<u32>, pos: Point2, count: u32) {
		self.commands.push(DebugCommand::CreateUnit(type_id, owner, pos, count));
	}
	pub fn kill_units<'a, T: IntoIterator<Item = &'a u64>>(&mut self, tags: T) {
		self.kill_tags.extend(tags);
	}
	pub fn set_unit_value(&mut self, tag: u64, unit_value: DebugUnitValue, value: f32) {
		self.commands.push(DebugCommand::SetUnitValue(tag, unit_value, value));
	}
	pub fn win_game(&mut self) {
		self.commands.push(DebugCommand::EndGame(true));
	}
	/// Declares defeat. Also how the scheduler resigns on step-time abuse.
	pub fn end_game(&mut self) {
		self.commands.push(DebugCommand::EndGame(false));
	}

	// ----- cheats, single player or with opponent's consent -----

	pub fn show_map(&mut self) {
		self.commands.push(DebugCommand::GameState(DebugGameState::ShowMap));
	}
	pub fn control_enemy(&mut self) {
		self.commands.push(DebugCommand::GameState(DebugGameState::ControlEnemy));
	}
	pub fn cheat_supply(&mut self) {
		self.commands.push(DebugCommand::GameState(DebugGameState::Food));
	}
	pub fn cheat_free_build(&mut self) {
		self.commands.push(DebugCommand::GameState(DebugGameState::Free));
	}
	pub fn cheat_resources(&mut self) {
		self.commands.push(DebugCommand::GameState(DebugGameState::AllResources));
	}
	pub fn cheat_minerals(&mut self) {
		self.commands.push(DebugCommand::GameState(DebugGameState::Minerals));
	}
	pub fn cheat_gas(&mut self) {
		self.commands.push(DebugCommand::GameState(DebugGameState::Gas));
	}
	pub fn cheat_god(&mut self) {
		self.commands.push(DebugCommand::GameState(DebugGameState::God));
	}
	pub fn cheat_cooldown(&mut self) {
		self.commands.push(DebugCommand::GameState(DebugGameState::Cooldown));
	}
	pub fn cheat_tech_tree(&mut self) {
		self.commands.push(DebugCommand::GameState(DebugGameState::TechTree));
	}
	pub fn cheat_upgrades(&mut self) {
		self.commands.push(DebugCommand::GameState(DebugGameState::Upgrade));
	}
	pub fn cheat_fast_build(&mut self) {
		self.commands.push(DebugCommand::GameState(DebugGameState::FastBuild));
	}
}

#[derive(Debug, Clone)]
enum DebugCommand {
	GameState(DebugGameState),
	CreateUnit(UnitTypeId, Option<u32>, Point2, u32),
	KillUnit(Vec<u64>),
	EndGame(bool),
	SetUnitValue(u64, DebugUnitValue, f32),
}

impl IntoProto<ProtoDebugCommand> for DebugCommand {
	fn into_proto(self) -> ProtoDebugCommand {
		let mut proto = ProtoDebugCommand::new();
		match self {
			DebugCommand::GameState(cmd) => proto.set_game_state(cmd.into_proto()),
			DebugCommand::CreateUnit(type_id, owner, pos, count) => {
				let unit = proto.mut_create_unit();
				unit.set_unit_type(type_id.into_proto());
				if let Some(owner) = owner {
					unit.set_owner(owner as i32);
				}
				unit.set_pos(pos.into_proto());
				unit.set_quantity(count);
			}
			DebugCommand::KillUnit(tags) => proto.mut_kill_unit().set_tag(tags),
			DebugCommand::EndGame(win) => {
				let end_game = proto.mut_end_game();
				if win {
					end_game.set_end_result(DebugEndGame_EndResult::DeclareVictory);
				}
			}
			DebugCommand::SetUnitValue(tag, unit_value, value) => {
				let cmd = proto.mut_unit_value();
				cmd.set_unit_tag(tag);
				cmd.set_unit_value(unit_value.into_proto());
				cmd.set_value(value);
			}
		}
		proto
	}
}

#[derive(Debug, Clone)]
enum DebugPos {
	Screen(ScreenPos),
	World(Point3),
}

#[derive(Debug, Clone)]
enum DebugDraw {
	Text(String, DebugPos, Option<Color>, Option<u32>),
	Line(Point3, Point3, Option<Color>),
	Box(Point3, Point3, Option<Color>),
	Sphere(Point3, f32, Option<Color>),
}

fn hash_point3(p: &Point3, state: &mut impl Hasher) {
	p.x.to_bits().hash(state);
	p.y.to_bits().hash(state);
	p.z.to_bits().hash(state);
}
impl Hash for DebugDraw {
	fn hash<H: Hasher>(&self, state: &mut H) {
		match self {
			DebugDraw::Text(text, pos, color, size) => {
				0u8.hash(state);
				text.hash(state);
				match pos {
					DebugPos::Screen((x, y)) => {
						x.to_bits().hash(state);
						y.to_bits().hash(state);
					}
					DebugPos::World(p) => hash_point3(p, state),
				}
				color.hash(state);
				size.hash(state);
			}
			DebugDraw::Line(p0, p1, color) | DebugDraw::Box(p0, p1, color) => {
				if matches!(self, DebugDraw::Box(..)) { 2u8 } else { 1u8 }.hash(state);
				hash_point3(p0, state);
				hash_point3(p1, state);
				color.hash(state);
			}
			DebugDraw::Sphere(pos, radius, color) => {
				3u8.hash(state);
				hash_point3(pos, state);
				radius.to_bits().hash(state);
				color.hash(state);
			}
		}
	}
}

impl IntoProto<ProtoDebugDraw> for &[DebugDraw] {
	fn into_proto(self) -> ProtoDebugDraw {
		let mut cmds = ProtoDebugDraw::new();
		for drawing in self {
			match drawing {
				DebugDraw::Text(text, pos, color, size) => {
					let mut proto = DebugText::new();
					proto.set_text(text.clone());
					match pos {
						DebugPos::Screen((x, y)) => {
							let pos = proto.mut_virtual_pos();
							pos.set_x(*x);
							pos.set_y(*y);
						}
						DebugPos::World(p) => proto.set_world_pos((*p).into_proto()),
					}
					if let Some((r, g, b)) = color {
						let proto_color = proto.mut_color();
						proto_color.set_r(*r);
						proto_color.set_g(*g);
						proto_color.set_b(*b);
					}
					if let Some(s) = size {
						proto.set_size(*s);
					}
					cmds.mut_text().push(proto);
				}
				DebugDraw::Line(p0, p1, color) => {
					let mut proto = DebugLine::new();
					let line = proto.mut_line();
					line.set_p0((*p0).into_proto());
					line.set_p1((*p1).into_proto());
					if let Some((r, g, b)) = color {
						let proto_color = proto.mut_color();
						proto_color.set_r(*r);
						proto_color.set_g(*g);
						proto_color.set_b(*b);
					}
					cmds.mut_lines().push(proto);
				}
				DebugDraw::Box(p0, p1, color) => {
					let mut proto = DebugBox::new();
					proto.set_min((*p0).into_proto());
					proto.set_max((*p1).into_proto());
					if let Some((r, g, b)) = color {
						let proto_color = proto.mut_color();
						proto_color.set_r(*r);
						proto_color.set_g(*g);
						proto_color.set_b(*b);
					}
					cmds.mut_boxes().push(proto);
				}
				DebugDraw::Sphere(pos, radius, color) => {
					let mut proto = DebugSphere::new();
					proto.set_p((*pos).into_proto());
					proto.set_r(*radius);
					if let Some((r, g, b)) = color {
						let proto_color = proto.mut_color();
						proto_color.set_r(*r);
						proto_color.set_g(*g);
						proto_color.set_b(*b);
					}
					cmds.mut_spheres().push(proto);
				}
			}
		}
		cmds
	}
}

#[derive(Debug, Clone, Copy)]
pub enum DebugUnitValue {
	Energy,
	Health,
	Shield,
}
impl IntoProto<DebugSetUnitValue_UnitValue> for DebugUnitValue {
	fn into_proto(self) -> DebugSetUnitValue_UnitValue {
		match self {
			DebugUnitValue::Energy => DebugSetUnitValue_UnitValue::Energy,
			DebugUnitValue::Health => DebugSetUnitValue_UnitValue::Life,
			DebugUnitValue::Shield => DebugSetUnitValue_UnitValue::Shields,
		}
	}
}

#[derive(Debug, Clone, Copy)]
pub enum DebugGameState {
	ShowMap,
	ControlEnemy,
	Food,
	Free,
	AllResources,
	God,
	Minerals,
	Gas,
	Cooldown,
	TechTree,
	Upgrade,
	FastBuild,
}
impl IntoProto<ProtoDebugGameState> for DebugGameState {
	fn into_proto(self) -> ProtoDebugGameState {
		match self {
			DebugGameState::ShowMap => ProtoDebugGameState::show_map,
			DebugGameState::ControlEnemy => ProtoDebugGameState::control_enemy,
			DebugGameState::Food => ProtoDebugGameState::food,
			DebugGameState::Free => ProtoDebugGameState::free,
			DebugGameState::AllResources => ProtoDebugGameState::all_resources,
			DebugGameState::God => ProtoDebugGameState::god,
			DebugGameState::Minerals => ProtoDebugGameState::minerals,
			DebugGameState::Gas => ProtoDebugGameState::gas,
			DebugGameState::Cooldown => ProtoDebugGameState::cooldown,
			DebugGameState::TechTree => ProtoDebugGameState::tech_tree,
			DebugGameState::Upgrade => ProtoDebugGameState::upgrade,
			DebugGameState::FastBuild => ProtoDebugGameState::fast_build,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn draw_marker(debugger: &mut Debugger) {
		debugger.draw_sphere(Point3::new(10.0, 10.0, 8.0), 1.5, Some((255, 0, 0)));
		debugger.draw_text_screen("marker", None, None, None);
	}

	#[test]
	fn unchanged_drawings_are_not_resent() {
		let mut debugger = Debugger::default();
		draw_marker(&mut debugger);
		assert_eq!(debugger.flush().len(), 1);

		draw_marker(&mut debugger);
		assert!(debugger.flush().is_empty());

		debugger.draw_sphere(Point3::new(10.0, 10.0, 8.0), 2.0, Some((255, 0, 0)));
		assert_eq!(debugger.flush().len(), 1);
	}

	#[test]
	fn drawings_clear_once_when_gone() {
		let mut debugger = Debugger::default();
		draw_marker(&mut debugger);
		debugger.flush();

		// Nothing drawn this frame: one clear message.
		let clear = debugger.flush();
		assert_eq!(clear.len(), 1);
		assert!(clear[0].get_draw().get_spheres().is_empty());

		// Still nothing: silent.
		assert!(debugger.flush().is_empty());
	}

	#[test]
	fn one_shot_commands_always_flush() {
		let mut debugger = Debugger::default();
		debugger.cheat_minerals();
		debugger.kill_units(&[42]);
		let protos = debugger.flush();
		assert_eq!(protos.len(), 2);
		assert!(debugger.flush().is_empty());
	}
}
