//! Client library for writing StarCraft II bots in Rust.
//!
//! The crate drives the game over its websocket protocol and hands your bot
//! a [`World`](world::World) each frame: an assembled view of every unit,
//! resource scalars, map grids, expansions and ramps, plus an intent buffer
//! that batches, combines and deduplicates unit commands before they are
//! flushed back to the game.
//!
//! A bot is any type implementing [`Bot`]. Run it against a built-in
//! computer opponent with [`run_vs_computer`](client::run_vs_computer),
//! against a human host with [`run_vs_human`](client::run_vs_human), or on
//! a ladder with [`run_ladder_game`](client::run_ladder_game).

#[macro_use]
extern crate num_derive;
#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate itertools;
#[macro_use]
extern crate maplit;
#[macro_use]
extern crate log;
#[macro_use]
extern crate serde;

/// Things you usually want in scope when writing a bot.
pub mod prelude {
	pub use crate::{
		client::{
			run_ladder_game, run_replay, run_vs_computer, run_vs_human, save_replay, LaunchOptions,
			PortConfig, RunOptions, RunnerMulti, RunnerSingle,
		},
		command::Target,
		distance::{Distance, DistanceIterator, DistanceSlice},
		error::SC2Result,
		event::Event,
		expiring_map::ExpiringMap,
		game_data::Cost,
		geometry::{Point2, Point3},
		ids::{AbilityId, BuffId, EffectId, UnitTypeId, UpgradeId},
		player::{AIBuild, Computer, Difficulty, GameResult, Race},
		runner::{StepOptions, TimePenalty},
		unit::Unit,
		units::Units,
		world::World,
		Bot, PlayerSettings,
	};
}

mod api;
pub mod client;
pub mod command;
pub mod constants;
pub mod debug;
pub mod distance;
pub mod error;
pub mod event;
pub mod expiring_map;
pub mod game_data;
pub mod game_info;
pub mod game_state;
pub mod geometry;
pub mod ids;
mod paths;
pub mod pixel_map;
pub mod player;
pub mod proxy;
pub mod ramp;
pub mod runner;
pub mod unit;
pub mod units;
mod utils;
pub mod world;

use error::SC2Result;
use event::Event;
use player::{GameResult, Race};
use std::{cell::RefCell, rc::Rc};
use world::World;

pub(crate) type Rs<T> = Rc<T>;
pub(crate) type Rw<T> = Rc<RefCell<T>>;

/// Settings a participant announces when joining a game.
#[derive(Debug, Clone)]
pub struct PlayerSettings {
	/// Race the bot plays. `Random` is resolved by the game.
	pub race: Race,
	/// In-game name, visible to the opponent.
	pub name: Option<String>,
	/// Whether raw actions affect the in-client selection (off by default).
	pub raw_affects_selection: bool,
}
impl PlayerSettings {
	/// Settings with a given race and no name.
	pub fn new(race: Race) -> Self {
		Self {
			race,
			name: None,
			raw_affects_selection: false,
		}
	}
	/// Sets the in-game name.
	pub fn with_name(mut self, name: &str) -> Self {
		self.name = Some(name.to_string());
		self
	}
}
impl Default for PlayerSettings {
	fn default() -> Self {
		Self::new(Race::Random)
	}
}

/// Trait your bot implements. Every callback receives the assembled
/// [`World`] handle; all methods have empty defaults except [`Bot::settings`].
pub trait Bot {
	/// Race and name used to join the game.
	fn settings(&self) -> PlayerSettings {
		PlayerSettings::default()
	}
	/// Called once after the first observation, before the first step.
	fn on_start(&mut self, _world: &mut World) -> SC2Result<()> {
		Ok(())
	}
	/// Called every frame with a monotonically increasing iteration counter.
	fn on_step(&mut self, _world: &mut World, _iteration: usize) -> SC2Result<()> {
		Ok(())
	}
	/// Called exactly once when the game is over.
	fn on_end(&mut self, _world: &World, _result: GameResult) -> SC2Result<()> {
		Ok(())
	}
	/// Called for every derived [`Event`] before `on_step` of the same frame.
	fn on_event(&mut self, _world: &mut World, _event: Event) -> SC2Result<()> {
		Ok(())
	}
}

/// Conversion from a protocol message into a crate type.
pub trait FromProto<T>: Sized {
	fn from_proto(p: T) -> Self;
}

/// Sugar for [`FromProto`] in method position.
pub trait IntoSC2<T> {
	fn into_sc2(self) -> T;
}
impl<T, U: FromProto<T>> IntoSC2<U> for T {
	fn into_sc2(self) -> U {
		U::from_proto(self)
	}
}

/// Conversion from a protocol message that also needs shared frame data.
pub trait FromProtoData<T>: Sized {
	fn from_proto_data(data: crate::unit::SharedUnitData, p: T) -> Self;
}

/// Conversion from a crate type into a protocol message.
pub trait IntoProto<T> {
	fn into_proto(self) -> T;
}
