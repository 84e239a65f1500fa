//! Launching the game, creating and joining games, and driving them to the
//! end through the step loop.

use crate::{
	api::{API, WS},
	error::{Error, SC2Result},
	paths::{executable_path, get_base_version, get_latest_base_version, get_path_to_sc2},
	player::Computer,
	runner::{play_game, StepOptions},
	world::World,
	Bot, IntoProto, PlayerSettings,
};
use sc2_proto::sc2api::{
	InterfaceOptions, PlayerSetup, PlayerType, PortSet, Request, RequestCreateGame, Response,
};
use std::{
	fs::{self, File},
	io::Write,
	net::TcpListener,
	process::{Child, Command},
	thread::sleep,
	time::Duration,
};
use tungstenite::connect;

const HOST: &str = "127.0.0.1";
const CONNECT_ATTEMPTS: u32 = 60;

/// How the game client is launched.
#[derive(Debug, Clone, Default)]
pub struct LaunchOptions {
	/// Game directory. Discovered from `SC2PATH` or the default install
	/// location when unset.
	pub sc2_path: Option<String>,
	/// Published game version, e.g. `"4.10"`. Latest installed when unset.
	pub sc2_version: Option<String>,
	pub fullscreen: bool,
}

/// Everything configurable about one game.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
	pub launch: LaunchOptions,
	pub step: StepOptions,
	/// Write the replay here once the game is over.
	pub save_replay_as: Option<String>,
}

/// Port layout shared by all clients of a multi-client game.
///
/// Serialisable so a match runner can hand the same layout to every
/// participant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortConfig {
	pub shared: i32,
	pub server: [i32; 2],
	pub players: Vec<[i32; 2]>,
}

impl PortConfig {
	/// Allocates a fresh layout for a two-player game from unused ports.
	pub fn new() -> SC2Result<Self> {
		let ports = get_unused_ports(7)?;
		Ok(Self {
			shared: ports[0],
			server: [ports[1], ports[2]],
			players: vec![[ports[3], ports[4]], [ports[5], ports[6]]],
		})
	}
	/// The conventional ladder layout: five consecutive ports after the
	/// start port.
	pub fn from_start_port(start: i32) -> Self {
		Self {
			shared: start + 1,
			server: [start + 2, start + 3],
			players: vec![[start + 4, start + 5]],
		}
	}
	pub fn from_json(json: &str) -> SC2Result<Self> {
		Ok(serde_json::from_str(json)?)
	}
	pub fn to_json(&self) -> SC2Result<String> {
		Ok(serde_json::to_string(self)?)
	}
}

/// Plays one game against the built-in AI and closes the client.
pub fn run_vs_computer<B: Bot>(
	bot: &mut B,
	computer: Computer,
	map_name: &str,
	options: RunOptions,
) -> SC2Result<()> {
	let mut runner = RunnerSingle::new(bot, computer, map_name, None);
	runner.launch_options = options.launch;
	runner.realtime = options.step.realtime;
	runner.step = options.step;
	runner.save_replay_as = options.save_replay_as;
	runner.run_game()
}

/// Hosts a realtime game for a human and joins it with the bot in a second
/// client. Both clients are closed afterwards.
pub fn run_vs_human<B: Bot>(
	bot: &mut B,
	human: PlayerSettings,
	map_name: &str,
	options: RunOptions,
) -> SC2Result<()> {
	let mut runner = RunnerMulti::new(bot, human, map_name, None);
	runner.launch_options = options.launch;
	// A human game cannot be stepped.
	runner.realtime = true;
	runner.step = options.step;
	runner.save_replay_as = options.save_replay_as;
	runner.run_game()
}

/// Reusable bot-vs-computer session: launch the client once, then play any
/// number of games on the same websocket. The map, the opponent and the
/// pacing can change between games.
pub struct RunnerSingle<'a, B: Bot> {
	bot: &'a mut B,
	pub computer: Computer,
	pub realtime: bool,
	pub save_replay_as: Option<String>,
	pub step: StepOptions,
	pub launch_options: LaunchOptions,
	map_name: String,
	sc2_path: Option<String>,
	api: Option<API>,
	process: Option<Child>,
}

impl<'a, B: Bot> RunnerSingle<'a, B> {
	pub fn new(bot: &'a mut B, computer: Computer, map_name: &str, version: Option<&str>) -> Self {
		Self {
			bot,
			computer,
			realtime: false,
			save_replay_as: None,
			step: StepOptions::default(),
			launch_options: LaunchOptions {
				sc2_version: version.map(String::from),
				..LaunchOptions::default()
			},
			map_name: map_name.to_string(),
			sc2_path: None,
			api: None,
			process: None,
		}
	}

	pub fn set_map(&mut self, map_name: &str) {
		self.map_name = map_name.to_string();
	}

	/// Launches the game client. A no-op when one is already running.
	pub fn launch(&mut self) -> SC2Result<()> {
		if self.api.is_some() {
			return Ok(());
		}
		let sc2_path = sc2_path_of(&self.launch_options)?;
		let port = get_unused_ports(1)?[0];
		self.process = Some(launch_client(&sc2_path, port, &self.launch_options)?);
		self.api = Some(API::new(connect_to_websocket(HOST, port)?));
		self.sc2_path = Some(sc2_path);
		Ok(())
	}

	/// Creates and plays one game, then returns the client to the launched
	/// state so the next game can be created on the same websocket.
	pub fn run_game(&mut self) -> SC2Result<()> {
		self.launch()?;
		let sc2_path = match &self.sc2_path {
			Some(path) => path.clone(),
			None => sc2_path_of(&self.launch_options)?,
		};
		let map_path = map_path_of(&sc2_path, &self.map_name)?;
		info!("starting game vs computer on {}", self.map_name);

		let mut world = World::default();
		world.api = self.api.take();
		world.process = self.process.take();

		let mut step = self.step;
		step.realtime = self.realtime;

		let outcome = self.play(&mut world, &map_path, &step);
		if outcome.is_ok() {
			if let Some(path) = self.save_replay_as.clone() {
				if let Err(e) = save_replay(&mut world, &path) {
					error!("can't save the replay: {}", e);
				}
			}
			if let Err(e) = world.leave() {
				if !e.is_graceful_close() {
					warn!("LeaveGame after the result failed: {}", e);
				}
			}
		}
		// Keep the client for the next game.
		self.api = world.api.take();
		self.process = world.process.take();
		outcome
	}

	fn play(&mut self, world: &mut World, map_path: &str, step: &StepOptions) -> SC2Result<()> {
		let settings = self.bot.settings();
		create_game(world, map_path, &settings, Some(self.computer.clone()), step.realtime)?;
		world.player_id = join_game(world, &settings, None)?;
		play_game(self.bot, world, step)
	}

	/// Quits the client and kills its process. Safe to call twice; also runs
	/// on drop.
	pub fn close(&mut self) {
		close_client(&mut self.api, &mut self.process);
	}
}

impl<'a, B: Bot> Drop for RunnerSingle<'a, B> {
	fn drop(&mut self) {
		self.close();
	}
}

/// Reusable human-vs-bot session: one hosting client for the human, one for
/// the bot, both kept across games.
pub struct RunnerMulti<'a, B: Bot> {
	bot: &'a mut B,
	pub human_settings: PlayerSettings,
	pub realtime: bool,
	pub save_replay_as: Option<String>,
	pub step: StepOptions,
	pub launch_options: LaunchOptions,
	map_name: String,
	sc2_path: Option<String>,
	host_api: Option<API>,
	host_process: Option<Child>,
	client_api: Option<API>,
	client_process: Option<Child>,
}

impl<'a, B: Bot> RunnerMulti<'a, B> {
	pub fn new(bot: &'a mut B, human: PlayerSettings, map_name: &str, version: Option<&str>) -> Self {
		Self {
			bot,
			human_settings: human,
			realtime: false,
			save_replay_as: None,
			step: StepOptions::default(),
			launch_options: LaunchOptions {
				sc2_version: version.map(String::from),
				..LaunchOptions::default()
			},
			map_name: map_name.to_string(),
			sc2_path: None,
			host_api: None,
			host_process: None,
			client_api: None,
			client_process: None,
		}
	}

	pub fn set_map(&mut self, map_name: &str) {
		self.map_name = map_name.to_string();
	}

	/// Launches both game clients. A no-op when they are already running.
	pub fn launch(&mut self) -> SC2Result<()> {
		if self.host_api.is_some() && self.client_api.is_some() {
			return Ok(());
		}
		let sc2_path = sc2_path_of(&self.launch_options)?;
		let ports = get_unused_ports(2)?;
		self.host_process = Some(launch_client(&sc2_path, ports[0], &self.launch_options)?);
		self.client_process = Some(launch_client(&sc2_path, ports[1], &self.launch_options)?);
		self.host_api = Some(API::new(connect_to_websocket(HOST, ports[0])?));
		self.client_api = Some(API::new(connect_to_websocket(HOST, ports[1])?));
		self.sc2_path = Some(sc2_path);
		Ok(())
	}

	/// Creates and plays one game; the human hosts, the bot joins from the
	/// second client. Both clients stay up for the next game.
	pub fn run_game(&mut self) -> SC2Result<()> {
		self.launch()?;
		let sc2_path = match &self.sc2_path {
			Some(path) => path.clone(),
			None => sc2_path_of(&self.launch_options)?,
		};
		let map_path = map_path_of(&sc2_path, &self.map_name)?;
		info!("starting human vs bot game on {}", self.map_name);

		// The human's client hosts; its world only creates and joins.
		let mut host = World::default();
		host.api = self.host_api.take();
		host.process = self.host_process.take();

		let mut world = World::default();
		world.api = self.client_api.take();
		world.process = self.client_process.take();

		let mut step = self.step;
		step.realtime = self.realtime;

		let outcome = self.play(&mut host, &mut world, &map_path, &step);
		if outcome.is_ok() {
			if let Some(path) = self.save_replay_as.clone() {
				if let Err(e) = save_replay(&mut world, &path) {
					error!("can't save the replay: {}", e);
				}
			}
			for side in [&mut world, &mut host] {
				if let Err(e) = side.leave() {
					if !e.is_graceful_close() {
						warn!("LeaveGame after the result failed: {}", e);
					}
				}
			}
		}
		self.host_api = host.api.take();
		self.host_process = host.process.take();
		self.client_api = world.api.take();
		self.client_process = world.process.take();
		outcome
	}

	fn play(
		&mut self,
		host: &mut World,
		world: &mut World,
		map_path: &str,
		step: &StepOptions,
	) -> SC2Result<()> {
		let settings = self.bot.settings();
		let mut req = Request::new();
		let req_create_game = req.mut_create_game();
		req_create_game.mut_local_map().set_map_path(map_path.to_string());
		push_participant(req_create_game, &self.human_settings);
		push_participant(req_create_game, &settings);
		req_create_game.set_realtime(step.realtime);
		check_create_game(host.api()?.send(req)?)?;

		let ports = PortConfig::new()?;
		join_game(host, &self.human_settings, Some(&ports))?;
		world.player_id = join_game(world, &settings, Some(&ports))?;
		play_game(self.bot, world, step)
	}

	/// Quits both clients and kills their processes. Safe to call twice;
	/// also runs on drop.
	pub fn close(&mut self) {
		close_client(&mut self.host_api, &mut self.host_process);
		close_client(&mut self.client_api, &mut self.client_process);
	}
}

impl<'a, B: Bot> Drop for RunnerMulti<'a, B> {
	fn drop(&mut self) {
		self.close();
	}
}

fn close_client(api: &mut Option<API>, process: &mut Option<Child>) {
	if let Some(api) = &mut api.take() {
		let mut req = Request::new();
		req.mut_quit();
		if let Err(e) = api.send_only(req) {
			if !e.is_graceful_close() {
				error!("Quit request failed: {}", e);
			}
		}
	}
	if let Some(process) = &mut process.take() {
		if let Err(e) = process.kill() {
			error!("can't kill the game process: {}", e);
		}
	}
}

/// Joins a game arranged by a ladder manager. The manager launches the game
/// and passes the connection and port block on the command line.
pub fn run_ladder_game<B: Bot>(
	bot: &mut B,
	host: &str,
	port: i32,
	start_port: i32,
	opponent_id: Option<&str>,
	options: RunOptions,
) -> SC2Result<()> {
	info!("starting ladder game against {:?}", opponent_id);
	let ws = connect_to_websocket(host, port)?;

	let mut world = World::default();
	world.api = Some(API::new(ws));
	world.opponent_id = opponent_id.map(String::from);

	let settings = bot.settings();
	let ports = PortConfig::from_start_port(start_port);
	world.player_id = join_game(&mut world, &settings, Some(&ports))?;

	let outcome = play_game(bot, &mut world, &options.step);
	finish(&mut world, &options, outcome)
}

/// Replays a saved game, feeding the observer's view of one player to the
/// bot's callbacks.
pub fn run_replay<B: Bot>(
	bot: &mut B,
	replay_path: &str,
	observed_player: u32,
	options: RunOptions,
) -> SC2Result<()> {
	info!("starting replay {}", replay_path);
	fs::metadata(replay_path)
		.map_err(|_| Error::Config(format!("replay not found: {}", replay_path)))?;
	let sc2_path = sc2_path_of(&options.launch)?;

	let port = get_unused_ports(1)?[0];
	let process = launch_client(&sc2_path, port, &options.launch)?;
	let ws = connect_to_websocket(HOST, port)?;

	let mut world = World::default();
	world.process = Some(process);
	world.api = Some(API::new(ws));
	world.player_id = observed_player;

	let mut req = Request::new();
	let req_replay = req.mut_start_replay();
	req_replay.set_replay_path(replay_path.to_string());
	req_replay.set_observed_player_id(observed_player as i32);
	req_replay.set_realtime(false);
	set_interface_options(req_replay.mut_options());
	let res = world.api()?.send(req)?;
	let res_replay = res.get_start_replay();
	if res_replay.has_error() {
		return Err(Error::Config(format!(
			"{:?}: {}",
			res_replay.get_error(),
			res_replay.get_error_details()
		)));
	}

	let outcome = play_game(bot, &mut world, &options.step);
	// Replays of other people's games are not worth re-saving.
	match outcome {
		Err(e) if e.is_graceful_close() => Ok(()),
		other => other,
	}
}

/// Asks the game for the replay of the finished game and writes it to disk.
pub fn save_replay(world: &mut World, path: &str) -> SC2Result<()> {
	let mut req = Request::new();
	req.mut_save_replay();
	let res = world.api()?.send(req)?;
	let data = res.get_save_replay().get_data();
	if data.is_empty() {
		return Err(Error::Config("game returned an empty replay".to_string()));
	}
	let mut file = File::create(path)?;
	file.write_all(data)?;
	info!("replay saved to {}", path);
	Ok(())
}

fn finish(world: &mut World, options: &RunOptions, outcome: SC2Result<()>) -> SC2Result<()> {
	if outcome.is_ok() {
		if let Some(path) = &options.save_replay_as {
			if let Err(e) = save_replay(world, path) {
				error!("can't save the replay: {}", e);
			}
		}
	}
	// Drop leaves and kills the client either way.
	outcome
}

fn sc2_path_of(launch: &LaunchOptions) -> SC2Result<String> {
	match &launch.sc2_path {
		Some(path) => Ok(path.clone()),
		None => get_path_to_sc2(),
	}
}

fn map_path_of(sc2_path: &str, map_name: &str) -> SC2Result<String> {
	let map_path = format!("{}/Maps/{}.SC2Map", sc2_path, map_name);
	fs::metadata(&map_path).map_err(|_| Error::Config(format!("map not found: {}", map_path)))?;
	Ok(map_path)
}

fn create_game(
	world: &mut World,
	map_path: &str,
	settings: &PlayerSettings,
	computer: Option<Computer>,
	realtime: bool,
) -> SC2Result<()> {
	let mut req = Request::new();
	let req_create_game = req.mut_create_game();
	req_create_game.mut_local_map().set_map_path(map_path.to_string());
	push_participant(req_create_game, settings);
	if let Some(computer) = computer {
		push_computer(req_create_game, computer);
	}
	req_create_game.set_realtime(realtime);
	check_create_game(world.api()?.send(req)?)
}

fn check_create_game(res: Response) -> SC2Result<()> {
	let res_create_game = res.get_create_game();
	if res_create_game.has_error() {
		return Err(Error::Config(format!(
			"{:?}: {}",
			res_create_game.get_error(),
			res_create_game.get_error_details()
		)));
	}
	Ok(())
}

fn push_participant(req_create_game: &mut RequestCreateGame, settings: &PlayerSettings) {
	let mut setup = PlayerSetup::new();
	setup.set_race(settings.race.into_proto());
	setup.set_field_type(PlayerType::Participant);
	if let Some(name) = &settings.name {
		setup.set_player_name(name.clone());
	}
	req_create_game.mut_player_setup().push(setup);
}

fn push_computer(req_create_game: &mut RequestCreateGame, computer: Computer) {
	let mut setup = PlayerSetup::new();
	setup.set_race(computer.race.into_proto());
	setup.set_field_type(PlayerType::Computer);
	setup.set_difficulty(computer.difficulty.into_proto());
	if let Some(ai_build) = computer.ai_build {
		setup.set_ai_build(ai_build.into_proto());
	}
	req_create_game.mut_player_setup().push(setup);
}

fn join_game(world: &mut World, settings: &PlayerSettings, ports: Option<&PortConfig>) -> SC2Result<u32> {
	let mut req = Request::new();
	let req_join_game = req.mut_join_game();
	req_join_game.set_race(settings.race.into_proto());
	if let Some(name) = &settings.name {
		req_join_game.set_player_name(name.clone());
	}
	set_interface_options(req_join_game.mut_options());
	req_join_game
		.mut_options()
		.set_raw_affects_selection(settings.raw_affects_selection);

	if let Some(ports) = ports {
		req_join_game.set_shared_port(ports.shared);
		let server_ports = req_join_game.mut_server_ports();
		server_ports.set_game_port(ports.server[0]);
		server_ports.set_base_port(ports.server[1]);
		let client_ports = req_join_game.mut_client_ports();
		for player in &ports.players {
			let mut port_set = PortSet::new();
			port_set.set_game_port(player[0]);
			port_set.set_base_port(player[1]);
			client_ports.push(port_set);
		}
	}

	let res = world.api()?.send(req)?;
	let res_join_game = res.get_join_game();
	if res_join_game.has_error() {
		return Err(Error::Config(format!(
			"{:?}: {}",
			res_join_game.get_error(),
			res_join_game.get_error_details()
		)));
	}
	Ok(res_join_game.get_player_id())
}

fn set_interface_options(options: &mut InterfaceOptions) {
	options.set_raw(true);
	options.set_score(true);
	options.set_show_cloaked(true);
	options.set_show_burrowed_shadows(true);
	options.set_show_placeholders(true);
}

/// Ports currently free to bind. The listeners are dropped before the game
/// is told about the ports, so a race with other processes is possible but
/// harmless: binding fails visibly on the game side.
fn get_unused_ports(n: usize) -> SC2Result<Vec<i32>> {
	let listeners: Vec<TcpListener> = (0..n)
		.map(|_| TcpListener::bind((HOST, 0)))
		.collect::<Result<_, _>>()?;
	listeners
		.iter()
		.map(|listener| Ok(listener.local_addr()?.port() as i32))
		.collect()
}

fn launch_client(sc2_path: &str, port: i32, launch: &LaunchOptions) -> SC2Result<Child> {
	let base_version = match &launch.sc2_version {
		Some(version) => get_base_version(version)?,
		None => get_latest_base_version(sc2_path)?,
	};
	let binary = executable_path(sc2_path, base_version);

	info!("launching the game client on port {}", port);
	let mut command = if cfg!(feature = "wine_sc2") {
		let mut command = Command::new("wine");
		command.arg(binary);
		command
	} else {
		Command::new(binary)
	};
	command
		.current_dir(format!("{}/Support64", sc2_path))
		.arg("-listen")
		.arg(HOST)
		.arg("-port")
		.arg(port.to_string())
		.arg("-displayMode")
		.arg(if launch.fullscreen { "1" } else { "0" });
	Ok(command.spawn()?)
}

fn connect_to_websocket(host: &str, port: i32) -> SC2Result<WS> {
	let url = format!("ws://{}:{}/sc2api", host, port);
	debug!("connecting to {}", url);
	let mut last_error = None;
	for _ in 0..CONNECT_ATTEMPTS {
		match connect(url.as_str()) {
			Ok((ws, _response)) => return Ok(ws),
			Err(e) => {
				last_error = Some(e);
				sleep(Duration::from_secs(1));
			}
		}
	}
	Err(last_error.map_or_else(
		|| Error::Config(format!("can't connect to {}", url)),
		Error::from,
	))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn port_config_round_trips_through_json() {
		let ports = PortConfig {
			shared: 5001,
			server: [5002, 5003],
			players: vec![[5004, 5005], [5006, 5007]],
		};
		let json = ports.to_json().unwrap();
		let parsed = PortConfig::from_json(&json).unwrap();
		assert_eq!(parsed.shared, 5001);
		assert_eq!(parsed.server, [5002, 5003]);
		assert_eq!(parsed.players.len(), 2);
	}

	#[test]
	fn ladder_layout_is_consecutive() {
		let ports = PortConfig::from_start_port(5000);
		assert_eq!(ports.shared, 5001);
		assert_eq!(ports.server, [5002, 5003]);
		assert_eq!(ports.players, vec![[5004, 5005]]);
	}

	#[test]
	fn unused_ports_are_distinct() {
		let ports = get_unused_ports(4).unwrap();
		assert_eq!(ports.len(), 4);
		let mut sorted = ports.clone();
		sorted.sort_unstable();
		sorted.dedup();
		assert_eq!(sorted.len(), 4);
	}
}
