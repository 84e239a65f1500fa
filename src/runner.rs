//! The per-frame loop: observe, assemble the world, dispatch events, run the
//! bot, flush, step.

use crate::{
	error::SC2Result,
	player::GameResult,
	world::World,
	Bot, IntoSC2, Rs,
};
use sc2_proto::sc2api::{Request, Status};
use std::{collections::VecDeque, time::Instant};

/// Frames of the sliding window the step budget is averaged over.
const TIME_WINDOW: usize = 16;

/// What happens when the averaged step time exceeds the budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimePenalty {
	/// Log and keep playing.
	None,
	/// Skip the bot's callbacks for the given number of frames. The game
	/// keeps stepping and commands keep flushing.
	Cooldown(u32),
	/// Leave the game, counted as a defeat.
	Resign,
}

/// Pacing and limits of the step loop.
#[derive(Debug, Clone, Copy)]
pub struct StepOptions {
	/// Ticks the game advances per step in stepped mode.
	pub game_step: u32,
	/// Let the game run at its own speed instead of stepping it.
	pub realtime: bool,
	/// Wall-clock budget for the bot's callbacks per frame, in milliseconds,
	/// averaged over a sliding window. Ignored in realtime mode.
	pub time_limit: Option<f32>,
	pub penalty: TimePenalty,
	/// Surrender after this much game time, in seconds.
	pub game_time_limit: Option<f32>,
	/// Surrender after this many iterations.
	pub iteration_limit: Option<usize>,
}
impl Default for StepOptions {
	fn default() -> Self {
		Self {
			game_step: 1,
			realtime: false,
			time_limit: None,
			penalty: TimePenalty::None,
			game_time_limit: None,
			iteration_limit: None,
		}
	}
}

struct StepTimes {
	count: u64,
	total: f64,
	min: f64,
	max: f64,
	window: VecDeque<f64>,
}
impl Default for StepTimes {
	fn default() -> Self {
		Self {
			count: 0,
			total: 0.0,
			min: f64::INFINITY,
			max: 0.0,
			window: VecDeque::with_capacity(TIME_WINDOW),
		}
	}
}
impl StepTimes {
	fn record(&mut self, ms: f64) {
		self.count += 1;
		self.total += ms;
		self.min = self.min.min(ms);
		self.max = self.max.max(ms);
		if self.window.len() == TIME_WINDOW {
			self.window.pop_front();
		}
		self.window.push_back(ms);
	}
	fn window_average(&self) -> f64 {
		if self.window.is_empty() {
			0.0
		} else {
			self.window.iter().sum::<f64>() / self.window.len() as f64
		}
	}
	fn log(&self) {
		if self.count > 0 {
			info!(
				"step time ms: min {:.3}, avg {:.3}, max {:.3} over {} steps",
				self.min,
				self.total / self.count as f64,
				self.max,
				self.count,
			);
		}
	}
}

/// Runs a joined game to its end. `on_end` is called exactly once when a
/// result is known, including surrenders on the configured limits.
pub(crate) fn play_game<B: Bot>(bot: &mut B, world: &mut World, options: &StepOptions) -> SC2Result<()> {
	world.game_step = options.game_step.max(1);
	first_step(bot, world, options)?;

	let mut times = StepTimes::default();
	let mut cooldown = 0_u32;

	for iteration in 0_usize.. {
		if options.iteration_limit.map_or(false, |limit| iteration >= limit) {
			debug!("iteration limit reached at {}", iteration);
			return surrender(bot, world, &times);
		}
		match play_step(bot, world, options, &mut times, &mut cooldown, iteration) {
			Ok(Some(result)) => {
				times.log();
				bot.on_end(world, result)?;
				return Ok(());
			}
			Ok(None) => {}
			Err(e) if e.is_graceful_close() => {
				times.log();
				let result = own_result(world);
				bot.on_end(world, result)?;
				return Ok(());
			}
			Err(e) => return Err(e),
		}
		if options
			.game_time_limit
			.map_or(false, |limit| world.time() >= limit)
		{
			debug!("game time limit reached at {:.1}s", world.time());
			return surrender(bot, world, &times);
		}
	}
	Ok(())
}

fn first_step<B: Bot>(bot: &mut B, world: &mut World, options: &StepOptions) -> SC2Result<()> {
	let mut req = Request::new();
	req.mut_game_info();
	let res = world.api()?.send(req)?;
	world.game_info = res.get_game_info().into_sc2();

	let mut req = Request::new();
	let req_data = req.mut_data();
	req_data.set_ability_id(true);
	req_data.set_unit_type_id(true);
	req_data.set_upgrade_id(true);
	req_data.set_buff_id(true);
	req_data.set_effect_id(true);
	let res = world.api()?.send(req)?;
	world.game_data = Rs::new(res.get_data().into_sc2());
	world.reshare();

	let mut req = Request::new();
	req.mut_observation();
	let res = world.api()?.send(req)?;
	world.update_observation(res.get_observation());
	world.prepare_start();

	// Starting units and structures produce their created events here.
	for event in world.derive_events() {
		bot.on_event(world, event)?;
	}
	bot.on_start(world)?;

	world.flush_commands()?;
	world.flush_debug()?;
	step(world, options)
}

fn play_step<B: Bot>(
	bot: &mut B,
	world: &mut World,
	options: &StepOptions,
	times: &mut StepTimes,
	cooldown: &mut u32,
	iteration: usize,
) -> SC2Result<Option<GameResult>> {
	let mut req = Request::new();
	let req_observation = req.mut_observation();
	if options.realtime {
		req_observation.set_game_loop(world.state.observation.game_loop + world.game_step);
	}
	let res = world.api()?.send(req)?;

	let observation = res.get_observation();
	if res.get_status() == Status::ended || !observation.get_player_result().is_empty() {
		world.update_observation(observation);
		return Ok(Some(own_result(world)));
	}
	world.update_observation(observation);
	world.query_available_abilities()?;

	let events = world.derive_events();
	if *cooldown > 0 {
		*cooldown -= 1;
	} else {
		let timer = Instant::now();
		for event in events {
			bot.on_event(world, event)?;
		}
		bot.on_step(world, iteration)?;
		times.record(timer.elapsed().as_secs_f64() * 1000.0);

		if !options.realtime {
			if let Some(limit) = options.time_limit {
				if times.window_average() > limit as f64 {
					match options.penalty {
						TimePenalty::None => {
							warn!(
								"step budget exceeded: {:.3}ms averaged, {:.3}ms allowed",
								times.window_average(),
								limit,
							);
						}
						TimePenalty::Cooldown(frames) => {
							warn!(
								"step budget exceeded, skipping callbacks for {} frames",
								frames,
							);
							*cooldown = frames;
							times.window.clear();
						}
						TimePenalty::Resign => {
							warn!("step budget exceeded, resigning");
							world.leave()?;
							return Ok(Some(GameResult::Defeat));
						}
					}
				}
			}
		}
	}

	world.flush_commands()?;
	world.flush_debug()?;
	step(world, options)?;
	Ok(None)
}

/// Requests the next game loops in stepped mode; a no-op in realtime.
fn step(world: &mut World, options: &StepOptions) -> SC2Result<()> {
	if !options.realtime {
		let mut req = Request::new();
		req.mut_step().set_count(world.game_step);
		world.api()?.send(req)?;
	}
	Ok(())
}

fn own_result(world: &World) -> GameResult {
	world
		.state
		.results
		.iter()
		.find(|(player_id, _)| *player_id == world.player_id)
		.map_or(GameResult::Undecided, |(_, result)| *result)
}

fn surrender<B: Bot>(bot: &mut B, world: &mut World, times: &StepTimes) -> SC2Result<()> {
	if let Err(e) = world.leave() {
		if !e.is_graceful_close() {
			return Err(e);
		}
	}
	times.log();
	bot.on_end(world, GameResult::Defeat)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn window_average_slides() {
		let mut times = StepTimes::default();
		for _ in 0..TIME_WINDOW {
			times.record(10.0);
		}
		assert!((times.window_average() - 10.0).abs() < 1e-9);
		// A burst of slow frames pushes the old ones out.
		for _ in 0..TIME_WINDOW {
			times.record(50.0);
		}
		assert!((times.window_average() - 50.0).abs() < 1e-9);
		assert_eq!(times.count, 2 * TIME_WINDOW as u64);
		assert_eq!(times.min, 10.0);
		assert_eq!(times.max, 50.0);
	}

	#[test]
	fn defaults_step_one_frame() {
		let options = StepOptions::default();
		assert_eq!(options.game_step, 1);
		assert!(!options.realtime);
		assert_eq!(options.penalty, TimePenalty::None);
	}
}
