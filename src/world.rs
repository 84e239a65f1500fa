//! The assembled frame view handed to every bot callback, plus the query
//! and builder API on top of it.

use crate::{
	api::API,
	command::{ActionResult, Commander, Target},
	constants::{
		RaceValues, CONSTRUCTING_ABILITIES, FRAMES_PER_SECOND, RACE_VALUES, UNIT_TRAINED_FROM,
		UPGRADE_RESEARCHED_FROM, WARPGATE_ABILITIES,
	},
	debug::Debugger,
	distance::{Distance, DistanceCache, DistanceIterator, DistanceMethod},
	error::{Error, SC2Result},
	event::{Event, EventTracker, PreviousFrame},
	game_data::{Cost, GameData},
	game_info::GameInfo,
	game_state::GameState,
	geometry::Point2,
	ids::{AbilityId, UnitTypeId, UpgradeId},
	pixel_map::Pixel,
	player::Race,
	ramp::Ramps,
	unit::{Alliance, DataForUnit, SharedUnitData, Unit},
	units::Units,
	utils::{dbscan, range_query},
	FromProtoData, IntoProto, Rs, Rw,
};
use rustc_hash::{FxHashMap, FxHashSet};
use sc2_proto::{
	query::{RequestQueryBuildingPlacement, RequestQueryPathing},
	sc2api::{Request, ResponseObservation},
};
use std::process::Child;

/// Resources within this squared distance belong to one expansion site.
const RESOURCE_SPREAD_SQUARED: f32 = 72.25; // 8.5²

/// Neutral, own and enemy units of the current frame, partitioned by role.
#[derive(Default, Clone)]
pub struct AllUnits {
	/// Every unit of the frame, in protocol order.
	pub all: Units,
	pub my: PlayerUnits,
	pub enemy: PlayerUnits,
	pub mineral_fields: Units,
	pub vespene_geysers: Units,
	/// Minerals and geysers together.
	pub resources: Units,
	pub destructables: Units,
	pub watchtowers: Units,
	pub inhibitor_zones: Units,
	/// Radar blips of cloaked or burrowed enemies.
	pub blips: Units,
}
impl AllUnits {
	fn clear(&mut self) {
		self.all.clear();
		self.my.clear();
		self.enemy.clear();
		self.mineral_fields.clear();
		self.vespene_geysers.clear();
		self.resources.clear();
		self.destructables.clear();
		self.watchtowers.clear();
		self.inhibitor_zones.clear();
		self.blips.clear();
	}
}

/// One player's units split into the partitions bots query most.
#[derive(Default, Clone)]
pub struct PlayerUnits {
	pub all: Units,
	/// Non-structures.
	pub units: Units,
	pub structures: Units,
	pub townhalls: Units,
	pub workers: Units,
	pub gas_buildings: Units,
	pub larvas: Units,
	/// Queued structures not started yet.
	pub placeholders: Units,
}
impl PlayerUnits {
	fn clear(&mut self) {
		self.all.clear();
		self.units.clear();
		self.structures.clear();
		self.townhalls.clear();
		self.workers.clear();
		self.gas_buildings.clear();
		self.larvas.clear();
		self.placeholders.clear();
	}
}

/// One base location of the map.
#[derive(Default, Clone)]
pub struct Expansion {
	/// Townhall placement position.
	pub loc: Point2,
	/// Center of mass of the resources plus the townhall spot.
	pub center: Point2,
	/// Tags of the minerals and geysers belonging to this site.
	pub resources: FxHashSet<u64>,
}

/// Options for [`World::find_placement`].
#[derive(Debug, Clone, Copy)]
pub struct PlacementOptions {
	/// Grid step of the expanding-ring search.
	pub step: isize,
	pub max_distance: isize,
	/// Pick any valid position instead of the closest one.
	pub random: bool,
	/// Require space for an addon to the right.
	pub addon: bool,
}
impl Default for PlacementOptions {
	fn default() -> Self {
		Self {
			step: 2,
			max_distance: 15,
			random: false,
			addon: false,
		}
	}
}

/// Everything known about the current game, rebuilt every frame and passed
/// to the bot callbacks.
pub struct World {
	pub(crate) api: Option<API>,
	pub(crate) process: Option<Child>,

	pub player_id: u32,
	pub enemy_player_id: u32,
	/// Ladder opponent id, when passed on the command line.
	pub opponent_id: Option<String>,
	pub race: Race,
	/// Inferred for random opponents once the first enemy unit is sighted.
	pub enemy_race: Race,
	pub race_values: Rs<RaceValues>,

	/// Ticks the game advances per step in stepped mode.
	pub game_step: u32,

	pub game_info: GameInfo,
	pub game_data: Rs<GameData>,
	pub state: GameState,
	pub units: AllUnits,
	pub debugger: Debugger,
	pub ramps: Ramps,
	/// All base locations, ordered as detected.
	pub expansions: Vec<Expansion>,

	pub minerals: u32,
	pub vespene: u32,
	pub supply_army: u32,
	pub supply_workers: u32,
	pub supply_cap: u32,
	pub supply_used: u32,
	pub supply_left: u32,

	pub start_location: Point2,
	pub enemy_start: Point2,
	/// Start location shifted towards its resources.
	pub start_center: Point2,
	pub enemy_start_center: Point2,

	/// Ready units of each type, counted every frame.
	pub current_units: FxHashMap<UnitTypeId, usize>,
	/// Non-construction orders of own units, counted every frame.
	pub orders: FxHashMap<AbilityId, usize>,

	pub(crate) commander: Rw<Commander>,
	pub(crate) shared: SharedUnitData,
	techlab_tags: Rw<FxHashSet<u64>>,
	reactor_tags: Rw<FxHashSet<u64>>,
	upgrades: Rw<FxHashSet<UpgradeId>>,
	enemy_upgrades: Rw<FxHashSet<UpgradeId>>,
	last_units_hits: Rw<FxHashMap<u64, f32>>,
	available_abilities: Rw<FxHashMap<u64, FxHashSet<AbilityId>>>,
	game_loop: Rw<u32>,

	pub(crate) distances: DistanceCache,
	prev_frame: PreviousFrame,
	tracker: EventTracker,
}

impl Default for World {
	fn default() -> Self {
		let commander: Rw<Commander> = Default::default();
		let techlab_tags: Rw<FxHashSet<u64>> = Default::default();
		let reactor_tags: Rw<FxHashSet<u64>> = Default::default();
		let upgrades: Rw<FxHashSet<UpgradeId>> = Default::default();
		let enemy_upgrades: Rw<FxHashSet<UpgradeId>> = Default::default();
		let last_units_hits: Rw<FxHashMap<u64, f32>> = Default::default();
		let available_abilities: Rw<FxHashMap<u64, FxHashSet<AbilityId>>> = Default::default();
		let game_loop: Rw<u32> = Default::default();
		let game_data: Rs<GameData> = Default::default();
		let race_values: Rs<RaceValues> = Default::default();
		let shared = Rs::new(DataForUnit {
			commander: Rw::clone(&commander),
			game_data: Rs::clone(&game_data),
			race_values: Rs::clone(&race_values),
			techlab_tags: Rw::clone(&techlab_tags),
			reactor_tags: Rw::clone(&reactor_tags),
			upgrades: Rw::clone(&upgrades),
			enemy_upgrades: Rw::clone(&enemy_upgrades),
			last_units_hits: Rw::clone(&last_units_hits),
			available_abilities: Rw::clone(&available_abilities),
			game_loop: Rw::clone(&game_loop),
		});
		Self {
			api: None,
			process: None,
			player_id: 0,
			enemy_player_id: 0,
			opponent_id: None,
			race: Race::Random,
			enemy_race: Race::Random,
			race_values,
			game_step: 1,
			game_info: Default::default(),
			game_data,
			state: Default::default(),
			units: Default::default(),
			debugger: Default::default(),
			ramps: Default::default(),
			expansions: Vec::new(),
			minerals: 0,
			vespene: 0,
			supply_army: 0,
			supply_workers: 0,
			supply_cap: 0,
			supply_used: 0,
			supply_left: 0,
			start_location: Default::default(),
			enemy_start: Default::default(),
			start_center: Default::default(),
			enemy_start_center: Default::default(),
			current_units: Default::default(),
			orders: Default::default(),
			commander,
			shared,
			techlab_tags,
			reactor_tags,
			upgrades,
			enemy_upgrades,
			last_units_hits,
			available_abilities,
			game_loop,
			distances: Default::default(),
			prev_frame: Default::default(),
			tracker: Default::default(),
		}
	}
}

impl World {
	pub(crate) fn api(&mut self) -> SC2Result<&mut API> {
		self.api
			.as_mut()
			.ok_or_else(|| Error::Config("not connected to a game".to_string()))
	}

	/// Regenerates the shared handle units hold. Must run after replacing
	/// `game_data` or `race_values`.
	pub(crate) fn reshare(&mut self) {
		self.shared = Rs::new(DataForUnit {
			commander: Rw::clone(&self.commander),
			game_data: Rs::clone(&self.game_data),
			race_values: Rs::clone(&self.race_values),
			techlab_tags: Rw::clone(&self.techlab_tags),
			reactor_tags: Rw::clone(&self.reactor_tags),
			upgrades: Rw::clone(&self.upgrades),
			enemy_upgrades: Rw::clone(&self.enemy_upgrades),
			last_units_hits: Rw::clone(&self.last_units_hits),
			available_abilities: Rw::clone(&self.available_abilities),
			game_loop: Rw::clone(&self.game_loop),
		});
	}

	// ----- frame ingest -----

	/// Replaces the frame state with a fresh observation and rebuilds every
	/// partition and cache.
	pub(crate) fn update_observation(&mut self, res: &ResponseObservation) {
		*self.last_units_hits.borrow_mut() = self
			.units
			.all
			.iter()
			.filter_map(|u| Some((u.tag, u.hits()?)))
			.collect();

		self.state = GameState::from_proto_data(Rs::clone(&self.shared), res);
		*self.game_loop.borrow_mut() = self.state.observation.game_loop;
		*self.upgrades.borrow_mut() = self.state.observation.raw.upgrades.iter().copied().collect();

		self.update_units();
		self.update_scalars();
		self.infer_enemy_race();
	}

	fn update_units(&mut self) {
		self.units.clear();
		self.techlab_tags.borrow_mut().clear();
		self.reactor_tags.borrow_mut().clear();

		let raw = self.state.observation.raw.units.clone();
		let mut positions = Vec::with_capacity(raw.len());
		let units = &mut self.units;

		for (index, mut u) in raw.into_iter().enumerate() {
			u.distance_index = Some(index);
			positions.push(u.position);

			if u.is_blip {
				units.blips.push(u);
				continue;
			}
			match u.alliance {
				Alliance::Neutral => {
					if u.type_id == UnitTypeId::XelNagaTower {
						units.watchtowers.push(u.clone());
					} else if u.type_id.is_mineral() {
						units.resources.push(u.clone());
						units.mineral_fields.push(u.clone());
					} else if u.type_id.is_geyser() {
						units.resources.push(u.clone());
						units.vespene_geysers.push(u.clone());
					} else if u.type_id.is_inhibitor_zone() {
						units.inhibitor_zones.push(u.clone());
					} else {
						units.destructables.push(u.clone());
					}
				}
				Alliance::Own => {
					let my = &mut units.my;
					my.all.push(u.clone());
					if u.is_structure() {
						if u.is_placeholder() {
							my.placeholders.push(u.clone());
						} else {
							my.structures.push(u.clone());
							if u.type_id.is_townhall() {
								my.townhalls.push(u.clone());
							} else if u.type_id.is_gas_building() {
								my.gas_buildings.push(u.clone());
							} else if u.type_id.is_techlab() {
								self.techlab_tags.borrow_mut().insert(u.tag);
							} else if u.type_id.is_reactor() {
								self.reactor_tags.borrow_mut().insert(u.tag);
							}
						}
					} else {
						my.units.push(u.clone());
						if u.type_id.is_worker() {
							my.workers.push(u.clone());
						} else if u.type_id == UnitTypeId::Larva {
							my.larvas.push(u.clone());
						}
					}
				}
				Alliance::Enemy => {
					let enemy = &mut units.enemy;
					enemy.all.push(u.clone());
					if u.is_structure() {
						enemy.structures.push(u.clone());
						if u.type_id.is_townhall() {
							enemy.townhalls.push(u.clone());
						} else if u.type_id.is_gas_building() {
							enemy.gas_buildings.push(u.clone());
						}
					} else {
						enemy.units.push(u.clone());
						if u.type_id.is_worker() {
							enemy.workers.push(u.clone());
						}
					}
				}
				Alliance::Ally => {}
			}
			units.all.push(u);
		}

		self.distances
			.rebuild(&positions, self.state.observation.game_loop);
	}

	fn update_scalars(&mut self) {
		let common = &self.state.observation.common;
		self.minerals = common.minerals;
		self.vespene = common.vespene;
		self.supply_army = common.food_army;
		self.supply_workers = common.food_workers;
		self.supply_cap = common.food_cap;
		self.supply_used = common.food_used;

		// The game rounds half-supply zerg units down.
		if self.race == Race::Zerg {
			let halves = self
				.units
				.my
				.units
				.filter(|u| {
					matches!(
						u.type_id,
						UnitTypeId::Zergling
							| UnitTypeId::ZerglingBurrowed
							| UnitTypeId::Baneling
							| UnitTypeId::BanelingBurrowed
							| UnitTypeId::BanelingCocoon
					)
				})
				.len() as u32;
			self.supply_used += halves & 1;
		}
		self.supply_left = self.supply_cap.saturating_sub(self.supply_used);

		let mut current_units = FxHashMap::default();
		let mut orders = FxHashMap::default();
		for u in &self.units.my.all {
			for order in &u.orders {
				if !CONSTRUCTING_ABILITIES.contains(&order.ability) {
					*orders.entry(order.ability).or_default() += 1;
				}
			}
			if u.is_ready() && !(u.is_placeholder() || u.is_hallucination) {
				*current_units.entry(u.type_id).or_default() += 1;
			} else if let Some(ability) =
				self.game_data.units.get(&u.type_id).and_then(|d| d.ability)
			{
				*orders.entry(ability).or_default() += 1;
			}
		}
		self.current_units = current_units;
		self.orders = orders;
	}

	fn infer_enemy_race(&mut self) {
		if self.enemy_race.is_resolved() {
			return;
		}
		if let Some(u) = self.units.enemy.all.first() {
			if let Some(race) = self.game_data.units.get(&u.type_id).map(|d| d.race) {
				if race.is_resolved() {
					self.enemy_race = race;
					if let Some(info) = self.game_info.players.get_mut(&self.enemy_player_id) {
						info.race_actual = Some(race);
					}
				}
			}
		}
	}

	/// One-time setup after the first observation: races, start locations,
	/// expansion sites and ramps.
	pub(crate) fn prepare_start(&mut self) {
		if let Some(info) = self.game_info.players.get(&self.player_id) {
			if let Some(race) = info.race_actual {
				self.race = race;
			}
		}
		if self.game_info.players.len() == 2 {
			self.enemy_player_id = 3 - self.player_id;
			self.enemy_race = self.game_info.players[&self.enemy_player_id].race_requested;
		}
		if let Some(values) = RACE_VALUES.get(&self.race) {
			self.race_values = Rs::new(values.clone());
			self.reshare();
			self.update_units();
		}

		if let Some(townhall) = self.units.my.townhalls.first() {
			self.start_location = townhall.position;
		}
		self.enemy_start = self
			.game_info
			.start_locations
			.iter()
			.copied()
			.furthest(self.start_location)
			.unwrap_or(self.start_location);

		self.start_center = weighted_center_of(
			self.start_location,
			&self.units.resources.closer(11.0, self.start_location),
		);
		self.enemy_start_center = weighted_center_of(
			self.enemy_start,
			&self.units.resources.closer(11.0, self.enemy_start),
		);

		self.detect_expansions();

		self.ramps = Ramps::from_grids(
			&self.game_info.pathing_grid,
			&self.game_info.placement_grid,
			&self.game_info.terrain_height,
			self.start_location,
			self.enemy_start,
		);
	}

	fn detect_expansions(&mut self) {
		// Small blocker patches are not minable and would shift the centers.
		let resources = self
			.units
			.resources
			.filter(|r| r.type_id != UnitTypeId::MineralField450);
		let positions: Vec<(Point2, u64)> = resources.iter().map(|r| (r.position, r.tag)).collect();

		let (groups, _) = dbscan(
			&positions,
			range_query(
				&positions,
				|(p1, _), (p2, _)| p1.distance_squared(*p2),
				RESOURCE_SPREAD_SQUARED,
			),
			4,
		);

		let offsets: Vec<(isize, isize)> = iproduct!(-7..=7_isize, -7..=7_isize)
			.filter(|(x, y)| x * x + y * y <= 64)
			.collect();

		self.expansions = groups
			.iter()
			.filter_map(|group| {
				let tags: FxHashSet<u64> = group.iter().map(|(_, tag)| *tag).collect();
				let cluster = resources.tags_in(&tags.iter().copied().collect::<Vec<_>>());
				let center = cluster.center()?.floor() + 0.5;

				let (loc, center) = if center.is_closer(4.0, self.start_center) {
					(self.start_location, self.start_center)
				} else if center.is_closer(4.0, self.enemy_start_center) {
					(self.enemy_start, self.enemy_start_center)
				} else {
					let loc = offsets
						.iter()
						.filter_map(|&(x, y)| {
							let pos = center.offset(x as f32, y as f32);
							if !self.is_placeable(pos) {
								return None;
							}
							let mut distance_sum = 0.0;
							let far_enough = |r: &Unit| {
								let dist = pos.distance_squared(r);
								distance_sum += dist;
								dist > if r.is_geyser() { 49.0 } else { 36.0 }
							};
							cluster.iter().all(far_enough).then(|| (pos, distance_sum))
						})
						.min_by(|(_, d1), (_, d2)| {
							d1.partial_cmp(d2).unwrap_or(std::cmp::Ordering::Equal)
						})?
						.0;
					(loc, weighted_center_of(loc, &cluster))
				};
				Some(Expansion {
					loc,
					center,
					resources: tags,
				})
			})
			.collect();
	}

	/// Diffs this frame against the previous one and remembers the current
	/// frame for the next diff.
	pub(crate) fn derive_events(&mut self) -> Vec<Event> {
		let events = self.tracker.derive(
			&self.state.observation.raw.dead_units,
			&self.units.my.units,
			&self.units.my.structures,
			&self.units.enemy.all,
			&self.upgrades.borrow(),
			&self.prev_frame,
		);
		self.prev_frame.capture(
			&self.units.my.units,
			&self.units.my.structures,
			&self.units.enemy.units,
			&self.units.enemy.structures,
			&self.upgrades.borrow(),
		);
		events
	}

	// ----- command and debug flush -----

	/// Sends all buffered unit commands in one request.
	pub(crate) fn flush_commands(&mut self) -> SC2Result<()> {
		let actions = self.commander.borrow_mut().build_actions();
		if actions.is_empty() {
			return Ok(());
		}
		let mut req = Request::new();
		req.mut_action().set_actions(actions.into());
		let res = self.api()?.send(req)?;
		for (i, result) in res.get_action().get_result().iter().enumerate() {
			let result = ActionResult::from(*result);
			if !result.is_success() {
				debug!("action {} rejected: {:?}", i, result);
			}
		}
		Ok(())
	}

	/// Sends buffered debug commands, skipping unchanged drawings.
	pub(crate) fn flush_debug(&mut self) -> SC2Result<()> {
		let commands = self.debugger.flush();
		if commands.is_empty() {
			return Ok(());
		}
		let mut req = Request::new();
		req.mut_debug().set_debug(commands.into());
		self.api()?.send(req)?;
		Ok(())
	}

	// ----- resources and costs -----

	pub fn time(&self) -> f32 {
		self.state.observation.game_loop as f32 / FRAMES_PER_SECOND
	}

	/// Price of a unit with morph and zergling corrections applied.
	pub fn get_unit_cost(&self, unit: UnitTypeId) -> Cost {
		self.game_data
			.units
			.get(&unit)
			.and_then(|data| data.ability)
			.map(|ability| self.game_data.calculate_ability_cost(ability))
			.unwrap_or_default()
	}
	pub fn get_upgrade_cost(&self, upgrade: UpgradeId) -> Cost {
		self.game_data
			.upgrades
			.get(&upgrade)
			.map(|data| data.cost())
			.unwrap_or_default()
	}
	pub fn can_afford(&self, unit: UnitTypeId, check_supply: bool) -> bool {
		let cost = self.get_unit_cost(unit);
		if self.minerals < cost.minerals || self.vespene < cost.vespene {
			return false;
		}
		!check_supply || self.can_feed(unit)
	}
	/// True when there is enough free supply for one unit of the type.
	pub fn can_feed(&self, unit: UnitTypeId) -> bool {
		self.supply_left as f32 >= self.calculate_supply_cost(unit)
	}
	pub fn calculate_supply_cost(&self, unit: UnitTypeId) -> f32 {
		let supply = self
			.game_data
			.units
			.get(&unit)
			.map_or(0.0, |data| data.food_required);
		// A single larva produces the pair.
		if unit == UnitTypeId::Zergling {
			supply * 2.0
		} else {
			supply
		}
	}
	pub fn can_afford_upgrade(&self, upgrade: UpgradeId) -> bool {
		let cost = self.get_upgrade_cost(upgrade);
		self.minerals >= cost.minerals && self.vespene >= cost.vespene
	}

	/// Debits the local ledger so later affordability checks within the same
	/// frame see the pending spend.
	pub fn subtract_resources(&mut self, unit: UnitTypeId, subtract_supply: bool) {
		let cost = self.get_unit_cost(unit);
		self.minerals = self.minerals.saturating_sub(cost.minerals);
		self.vespene = self.vespene.saturating_sub(cost.vespene);
		if subtract_supply {
			let supply = self.calculate_supply_cost(unit) as u32;
			self.supply_used += supply;
			self.supply_left = self.supply_left.saturating_sub(supply);
		}
	}
	pub fn subtract_upgrade_cost(&mut self, upgrade: UpgradeId) {
		let cost = self.get_upgrade_cost(upgrade);
		self.minerals = self.minerals.saturating_sub(cost.minerals);
		self.vespene = self.vespene.saturating_sub(cost.vespene);
	}

	// ----- upgrades -----

	pub fn has_upgrade(&self, upgrade: UpgradeId) -> bool {
		self.upgrades.borrow().contains(&upgrade)
	}
	pub fn enemy_has_upgrade(&self, upgrade: UpgradeId) -> bool {
		self.enemy_upgrades.borrow().contains(&upgrade)
	}
	/// Marks an upgrade as scouted on the opponent, improving damage
	/// estimates against their units.
	pub fn note_enemy_upgrade(&mut self, upgrade: UpgradeId) {
		self.enemy_upgrades.borrow_mut().insert(upgrade);
	}
	pub fn is_ordered_upgrade(&self, upgrade: UpgradeId) -> bool {
		self.game_data
			.upgrades
			.get(&upgrade)
			.map_or(false, |data| self.orders.get(&data.ability).map_or(false, |c| *c > 0))
	}
	/// `0` not ordered, `0..1` in progress, `1` complete.
	pub fn upgrade_progress(&self, upgrade: UpgradeId) -> f32 {
		if self.has_upgrade(upgrade) {
			return 1.0;
		}
		let ability = match self.game_data.upgrades.get(&upgrade) {
			Some(data) => data.ability,
			None => return 0.0,
		};
		self.units
			.my
			.structures
			.iter()
			.filter(|s| s.is_ready())
			.find_map(|s| {
				s.orders
					.iter()
					.find(|order| order.ability == ability)
					.map(|order| order.progress)
			})
			.unwrap_or(0.0)
	}

	// ----- pending counters -----

	/// Units of a type queued or under construction: matching orders across
	/// own units plus half-built structures, counted once.
	pub fn already_pending(&self, unit: UnitTypeId) -> usize {
		let ability = match self.game_data.units.get(&unit).and_then(|d| d.ability) {
			Some(ability) => ability,
			None => return 0,
		};
		let half_built = self
			.units
			.my
			.structures
			.of_type(unit)
			.filter(|s| !s.is_ready())
			.len();
		// A terran worker keeps its build order while the structure grows,
		// which would count the same building twice.
		let counts_toward = |u: &Unit| {
			u.orders.iter().any(|order| {
				order.ability == ability && !(u.is_worker() && order.progress > 0.0)
			})
		};
		let ordered = if CONSTRUCTING_ABILITIES.contains(&ability) && self.race == Race::Terran {
			self.units
				.my
				.all
				.iter()
				.filter(|u| {
					u.orders.first().map_or(false, |order| order.ability == ability)
						&& !self.units.my.structures.of_type(unit).iter().any(|s| {
							!s.is_ready()
								&& u.target_pos().map_or(false, |pos| pos.is_closer(1.0, s.position))
						})
				})
				.count()
		} else {
			self.units.my.all.iter().filter(|u| counts_toward(u)).count()
		};
		ordered + half_built
	}
	pub fn already_pending_upgrade(&self, upgrade: UpgradeId) -> usize {
		self.game_data
			.upgrades
			.get(&upgrade)
			.map_or(0, |data| self.orders.get(&data.ability).copied().unwrap_or(0))
	}

	// ----- map grids -----

	pub fn get_height<P: Into<(usize, usize)>>(&self, pos: P) -> u8 {
		self.game_info.terrain_height[pos.into()]
	}
	pub fn get_z_height<P: Into<(usize, usize)>>(&self, pos: P) -> f32 {
		self.game_info.terrain_height[pos.into()] as f32 * 32.0 / 255.0 - 16.0
	}
	pub fn is_placeable<P: Into<(usize, usize)>>(&self, pos: P) -> bool {
		self.game_info.placement_grid[pos.into()] == Pixel::Set
	}
	pub fn is_pathable<P: Into<(usize, usize)>>(&self, pos: P) -> bool {
		self.game_info.pathing_grid[pos.into()] == Pixel::Set
	}
	pub fn is_hidden<P: Into<(usize, usize)>>(&self, pos: P) -> bool {
		self.state.observation.raw.visibility[pos.into()].is_hidden()
	}
	pub fn is_fogged<P: Into<(usize, usize)>>(&self, pos: P) -> bool {
		self.state.observation.raw.visibility[pos.into()].is_fogged()
	}
	pub fn is_visible<P: Into<(usize, usize)>>(&self, pos: P) -> bool {
		self.state.observation.raw.visibility[pos.into()].is_visible()
	}
	pub fn is_explored<P: Into<(usize, usize)>>(&self, pos: P) -> bool {
		!self.is_hidden(pos)
	}
	pub fn has_creep<P: Into<(usize, usize)>>(&self, pos: P) -> bool {
		self.state.observation.raw.creep[pos.into()] == Pixel::Set
	}

	// ----- distance cache -----

	/// Switches the pairwise distance strategy. Takes effect on the next
	/// frame's rebuild.
	pub fn set_distance_method(&mut self, method: DistanceMethod) {
		self.distances = DistanceCache::new(method);
	}
	pub fn distance_method(&self) -> DistanceMethod {
		self.distances.method()
	}

	/// Distance via the per-frame cache when both units carry a dense index,
	/// computed on demand otherwise.
	pub fn distance_between(&self, a: &Unit, b: &Unit) -> f32 {
		if let (Some(i), Some(j)) = (a.distance_index, b.distance_index) {
			if let Some(d) = self.distances.query(i, j, self.state.observation.game_loop) {
				return d;
			}
		}
		a.position.distance(b.position)
	}

	// ----- chat -----

	pub fn chat(&mut self, message: &str) {
		self.commander.borrow_mut().chat(message, false);
	}
	pub fn chat_team(&mut self, message: &str) {
		self.commander.borrow_mut().chat(message, true);
	}

	// ----- server queries -----

	/// Path distance for each (start, goal); `None` where no path exists.
	pub fn query_pathing(&mut self, paths: Vec<(Target, Point2)>) -> SC2Result<Vec<Option<f32>>> {
		let mut req = Request::new();
		let req_pathing = req.mut_query().mut_pathing();
		for (start, goal) in paths {
			let mut pathing = RequestQueryPathing::new();
			match start {
				Target::Tag(tag) => pathing.set_unit_tag(tag),
				Target::Pos(pos) => pathing.set_start_pos(pos.into_proto()),
				Target::None => {
					return Err(Error::Config(
						"pathing query needs a start position or unit".to_string(),
					))
				}
			}
			pathing.set_end_pos(goal.into_proto());
			req_pathing.push(pathing);
		}
		let res = self.api()?.send(req)?;
		Ok(res
			.get_query()
			.get_pathing()
			.iter()
			.map(|result| result.distance)
			.collect())
	}

	/// Placement check for each (build ability, position, optional builder).
	pub fn query_placement(
		&mut self,
		places: Vec<(AbilityId, Point2, Option<u64>)>,
		check_resources: bool,
	) -> SC2Result<Vec<ActionResult>> {
		let mut req = Request::new();
		let req_query = req.mut_query();
		req_query.set_ignore_resource_requirements(!check_resources);
		let req_placement = req_query.mut_placements();
		for (ability, pos, builder) in places {
			let mut placement = RequestQueryBuildingPlacement::new();
			placement.set_ability_id(ability.into_proto() as i32);
			placement.set_target_pos(pos.into_proto());
			if let Some(tag) = builder {
				placement.set_placing_unit_tag(tag);
			}
			req_placement.push(placement);
		}
		let res = self.api()?.send(req)?;
		Ok(res
			.get_query()
			.get_placements()
			.iter()
			.map(|result| ActionResult::from(result.get_result()))
			.collect())
	}

	/// Refreshes which abilities every own unit can use right now.
	pub fn query_available_abilities(&mut self) -> SC2Result<()> {
		let mut req = Request::new();
		let req_abilities = req.mut_query().mut_abilities();
		for u in &self.units.my.all {
			let mut query = sc2_proto::query::RequestQueryAvailableAbilities::new();
			query.set_unit_tag(u.tag);
			req_abilities.push(query);
		}
		let res = self.api()?.send(req)?;
		*self.available_abilities.borrow_mut() = res
			.get_query()
			.get_abilities()
			.iter()
			.map(|a| {
				(
					a.get_unit_tag(),
					a.get_abilities()
						.iter()
						.map(|ability| AbilityId::from(ability.get_ability_id() as u32))
						.collect(),
				)
			})
			.collect();
		Ok(())
	}

	pub fn can_place(&mut self, building: UnitTypeId, pos: Point2) -> SC2Result<bool> {
		let ability = self.build_ability(building)?;
		Ok(self.query_placement(vec![(ability, pos, None)], false)?[0].is_success())
	}

	fn build_ability(&self, building: UnitTypeId) -> SC2Result<AbilityId> {
		self.game_data
			.units
			.get(&building)
			.and_then(|data| data.ability)
			.ok_or_else(|| Error::Config(format!("no build ability for {:?}", building)))
	}

	/// Expanding-ring search for a buildable position near `near`.
	pub fn find_placement(
		&mut self,
		building: UnitTypeId,
		near: Point2,
		options: PlacementOptions,
	) -> SC2Result<Option<Point2>> {
		let ability = self.build_ability(building)?;
		let addon_probe = |pos: Point2| (AbilityId::TerranBuildSupplyDepot, pos.offset(2.5, -0.5), None);

		let mut initial = vec![(ability, near, None)];
		if options.addon {
			initial.push(addon_probe(near));
		}
		if self
			.query_placement(initial, false)?
			.iter()
			.all(|r| r.is_success())
		{
			return Ok(Some(near));
		}

		let step = options.step.max(1);
		for distance in (step..options.max_distance).step_by(step as usize) {
			let positions: Vec<Point2> = (-distance..=distance)
				.step_by(step as usize)
				.flat_map(|offset| {
					[
						near.offset(offset as f32, -distance as f32),
						near.offset(offset as f32, distance as f32),
						near.offset(-distance as f32, offset as f32),
						near.offset(distance as f32, offset as f32),
					]
				})
				.collect();
			let results =
				self.query_placement(positions.iter().map(|p| (ability, *p, None)).collect(), false)?;
			let mut valid: Vec<Point2> = positions
				.into_iter()
				.zip(results)
				.filter_map(|(pos, res)| res.is_success().then(|| pos))
				.collect();

			if options.addon && !valid.is_empty() {
				let results =
					self.query_placement(valid.iter().map(|p| addon_probe(*p)).collect(), false)?;
				valid = valid
					.into_iter()
					.zip(results)
					.filter_map(|(pos, res)| res.is_success().then(|| pos))
					.collect();
			}

			if !valid.is_empty() {
				return Ok(if options.random {
					use rand::prelude::*;
					valid.choose(&mut thread_rng()).copied()
				} else {
					valid.iter().closest(near).copied()
				});
			}
		}
		Ok(None)
	}

	/// Free geyser near `base` where a gas building fits.
	pub fn find_gas_placement(&mut self, base: Point2) -> SC2Result<Option<Unit>> {
		let ability = self.build_ability(self.race_values.gas)?;
		let geysers = self.units.vespene_geysers.closer(11.0, base);
		let places = geysers.iter().map(|u| (ability, u.position, None)).collect();
		let results = self.query_placement(places, false)?;
		Ok(geysers
			.iter()
			.zip(results)
			.find(|(_, res)| res.is_success())
			.map(|(geyser, _)| geyser.clone()))
	}

	// ----- expansions -----

	/// Closest untaken expansion by ground path from the start location.
	pub fn get_next_expansion(&mut self) -> SC2Result<Option<Expansion>> {
		let start = self.start_location;
		let candidates: Vec<Expansion> = self
			.expansions
			.iter()
			.filter(|exp| {
				self.units.my.townhalls.iter().all(|t| t.is_further(15.0, exp.loc))
					&& self
						.units
						.my
						.placeholders
						.iter()
						.all(|p| p.is_further(15.0, exp.loc))
			})
			.cloned()
			.collect();
		let paths = self.query_pathing(
			candidates
				.iter()
				.map(|exp| (Target::Pos(start), exp.loc))
				.collect(),
		)?;
		Ok(candidates
			.into_iter()
			.zip(paths)
			.filter_map(|(exp, path)| path.map(|d| (exp, d)))
			.min_by(|(_, d1), (_, d2)| d1.partial_cmp(d2).unwrap_or(std::cmp::Ordering::Equal))
			.map(|(exp, _)| exp))
	}

	pub fn owned_expansions(&self) -> Vec<&Expansion> {
		self.expansions
			.iter()
			.filter(|exp| self.units.my.townhalls.iter().any(|t| t.is_closer(15.0, exp.loc)))
			.collect()
	}
	pub fn enemy_expansions(&self) -> Vec<&Expansion> {
		self.expansions
			.iter()
			.filter(|exp| {
				self.units.enemy.townhalls.iter().any(|t| t.is_closer(15.0, exp.loc))
			})
			.collect()
	}
	pub fn free_expansions(&self) -> Vec<&Expansion> {
		self.expansions
			.iter()
			.filter(|exp| {
				self.units.my.townhalls.iter().all(|t| t.is_further(15.0, exp.loc))
					&& self
						.units
						.enemy
						.townhalls
						.iter()
						.all(|t| t.is_further(15.0, exp.loc))
			})
			.collect()
	}

	/// Builds the race's townhall on the next free expansion.
	pub fn expand_now(&mut self) -> SC2Result<bool> {
		let townhall = self.race_values.start_townhall;
		if !self.can_afford(townhall, false) {
			return Ok(false);
		}
		let loc = match self.get_next_expansion()? {
			Some(exp) => exp.loc,
			None => return Ok(false),
		};
		self.build(townhall, loc, PlacementOptions {
			max_distance: 6,
			..Default::default()
		})
	}

	// ----- builder API -----

	/// Finds a placement near `near` and sends a worker to build there.
	pub fn build(
		&mut self,
		building: UnitTypeId,
		near: Point2,
		options: PlacementOptions,
	) -> SC2Result<bool> {
		if !self.can_afford(building, false) {
			return Ok(false);
		}
		let pos = match self.find_placement(building, near, options)? {
			Some(pos) => pos,
			None => return Ok(false),
		};
		let builder = match self.select_builder(pos) {
			Some(worker) => worker,
			None => return Ok(false),
		};
		builder.build(building, pos, false);
		self.subtract_resources(building, false);
		Ok(true)
	}

	/// Builds a gas building on a free geyser near `base`.
	pub fn build_gas(&mut self, base: Point2) -> SC2Result<bool> {
		let gas = self.race_values.gas;
		if !self.can_afford(gas, false) {
			return Ok(false);
		}
		let geyser = match self.find_gas_placement(base)? {
			Some(geyser) => geyser,
			None => return Ok(false),
		};
		let builder = match self.select_builder(geyser.position) {
			Some(worker) => worker,
			None => return Ok(false),
		};
		builder.build_gas(geyser.tag, false);
		self.subtract_resources(gas, false);
		Ok(true)
	}

	/// Nearest idle or mining worker within 20 units, preferring idle.
	fn select_builder(&self, pos: Point2) -> Option<Unit> {
		let workers = self
			.units
			.my
			.workers
			.filter(|w| !w.is_constructing() && !w.is_returning() && !w.is_carrying_resource());
		workers
			.filter(Unit::is_idle)
			.iter()
			.closer(20.0, pos)
			.closest(pos)
			.or_else(|| workers.iter().closer(20.0, pos).closest(pos))
			.cloned()
	}

	/// Trains up to `amount` units on idle producers, debiting cost and
	/// supply per order. Returns how many were ordered.
	pub fn train(&mut self, unit: UnitTypeId, amount: usize) -> SC2Result<usize> {
		let producers = match UNIT_TRAINED_FROM.get(&unit) {
			Some(types) => self
				.units
				.my
				.all
				.of_types(types)
				.ready()
				.idle(),
			None => return Ok(0),
		};
		let mut trained = 0;
		for producer in &producers {
			if trained >= amount {
				break;
			}
			if !self.can_afford(unit, true) {
				break;
			}
			producer.train(unit, false);
			self.subtract_resources(unit, true);
			trained += 1;
		}
		Ok(trained)
	}

	/// Starts a research on an idle structure of the right type.
	pub fn research(&mut self, upgrade: UpgradeId) -> SC2Result<bool> {
		if self.has_upgrade(upgrade) || self.is_ordered_upgrade(upgrade) {
			return Ok(false);
		}
		let researcher_type = match UPGRADE_RESEARCHED_FROM.get(&upgrade) {
			Some(t) => *t,
			None => return Ok(false),
		};
		if !self.can_afford_upgrade(upgrade) {
			return Ok(false);
		}
		let researcher = self
			.units
			.my
			.structures
			.of_type(researcher_type)
			.ready()
			.idle();
		match researcher.first() {
			Some(structure) => {
				structure.research(upgrade, false);
				self.subtract_upgrade_cost(upgrade);
				Ok(true)
			}
			None => Ok(false),
		}
	}

	/// Warps in a gateway unit near `pos` using any idle warpgate.
	pub fn warp_in(&mut self, unit: UnitTypeId, pos: Point2) -> SC2Result<bool> {
		if !WARPGATE_ABILITIES.contains_key(&unit) || !self.can_afford(unit, true) {
			return Ok(false);
		}
		let gates = self
			.units
			.my
			.structures
			.of_type(UnitTypeId::WarpGate)
			.ready();
		match gates.closest(pos) {
			Some(gate) => {
				gate.warp_in(unit, pos);
				self.subtract_resources(unit, true);
				Ok(true)
			}
			None => Ok(false),
		}
	}

	/// Rebalances workers between bases and gas buildings.
	///
	/// Gas is preferred while `minerals / vespene >= gas_ratio` and some
	/// geyser is under-staffed; surplus miners fill the deficits, idle
	/// workers go to the closest mineral patch of the closest base.
	pub fn distribute_workers(&mut self, gas_ratio: f32) {
		let townhalls = self.units.my.townhalls.ready();
		if townhalls.is_empty() {
			return;
		}
		let deficit = |u: &Unit| {
			u.ideal_harvesters.unwrap_or(0) as i32 - u.assigned_harvesters.unwrap_or(0) as i32
		};

		let mut deficit_gas: Vec<Unit> = self
			.units
			.my
			.gas_buildings
			.ready()
			.filter(|g| g.vespene_contents.unwrap_or(0) > 0 && deficit(g) > 0)
			.into_iter()
			.collect();
		let mut deficit_bases: Vec<Unit> = townhalls.filter(|t| deficit(t) > 0).into_iter().collect();

		let prefer_gas = !deficit_gas.is_empty()
			&& (self.vespene == 0 || self.minerals as f32 / self.vespene as f32 >= gas_ratio);

		// Pool: idle workers plus miners of over-staffed bases and geysers.
		let mut pool: Vec<Unit> = self.units.my.workers.idle().into_iter().collect();
		for base in townhalls.filter(|t| deficit(t) < 0) {
			let surplus = (-deficit(&base)) as usize;
			pool.extend(
				self.units
					.my
					.workers
					.filter(|w| w.is_gathering() && !w.is_carrying_vespene())
					.iter()
					.closer(11.0, base.position)
					.take(surplus)
					.cloned(),
			);
		}
		for gas in self.units.my.gas_buildings.ready().filter(|g| deficit(g) < 0) {
			let surplus = (-deficit(&gas)) as usize;
			pool.extend(
				self.units
					.my
					.workers
					.filter(|w| {
						w.is_carrying_vespene()
							|| w.orders.first().map_or(false, |o| o.target == Target::Tag(gas.tag))
					})
					.iter()
					.take(surplus)
					.cloned(),
			);
		}

		let mut assigned = FxHashSet::default();
		let mut assign = |worker: &Unit, resource: u64| {
			if assigned.insert(worker.tag) {
				worker.gather(resource, false);
			}
		};

		let minerals = &self.units.mineral_fields;
		let mut fill = |targets: &mut Vec<Unit>, pool: &mut Vec<Unit>, to_gas: bool| {
			while let Some(target) = targets.pop() {
				let mut needed = deficit(&target).max(0) as usize;
				while needed > 0 && !pool.is_empty() {
					let idx = pool
						.iter()
						.enumerate()
						.min_by(|(_, a), (_, b)| {
							a.position
								.distance_squared(target.position)
								.partial_cmp(&b.position.distance_squared(target.position))
								.unwrap_or(std::cmp::Ordering::Equal)
						})
						.map(|(i, _)| i)
						.unwrap_or(0);
					let worker = pool.swap_remove(idx);
					if to_gas {
						assign(&worker, target.tag);
					} else if let Some(mineral) =
						minerals.closer(11.0, target.position).closest(target.position)
					{
						assign(&worker, mineral.tag);
					}
					needed -= 1;
				}
			}
		};

		if prefer_gas {
			fill(&mut deficit_gas, &mut pool, true);
			fill(&mut deficit_bases, &mut pool, false);
		} else {
			fill(&mut deficit_bases, &mut pool, false);
			fill(&mut deficit_gas, &mut pool, true);
		}

		// Leftover idle workers mine at the closest base.
		for worker in pool {
			if !worker.is_idle() || assigned.contains(&worker.tag) {
				continue;
			}
			if let Some(base) = townhalls.closest(worker.position) {
				if let Some(mineral) = minerals.closer(11.0, base.position).closest(base.position) {
					worker.gather(mineral.tag, false);
				}
			}
		}
	}

	// ----- session -----

	/// Leaves the game. Counted as a defeat; `on_end` is not called.
	pub fn leave(&mut self) -> SC2Result<()> {
		let mut req = Request::new();
		req.mut_leave_game();
		self.api()?.send(req)?;
		Ok(())
	}

	pub(crate) fn close_client(&mut self) {
		if let Some(api) = &mut self.api {
			let mut req = Request::new();
			req.mut_leave_game();
			if let Err(e) = api.send(req) {
				if !e.is_graceful_close() {
					error!("LeaveGame request failed: {}", e);
				}
			}
			let mut req = Request::new();
			req.mut_quit();
			if let Err(e) = api.send_only(req) {
				if !e.is_graceful_close() {
					error!("Quit request failed: {}", e);
				}
			}
		}
		if let Some(process) = &mut self.process {
			if let Err(e) = process.kill() {
				error!("can't kill the game process: {}", e);
			}
		}
	}
}

fn weighted_center_of(base: Point2, resources: &Units) -> Point2 {
	let sum = resources.iter().fold(base, |acc, r| acc + r.position);
	sum / (resources.len() + 1) as f32
}

impl Drop for World {
	fn drop(&mut self) {
		self.close_client();
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::unit::test_fixtures::{ability, unit, unit_type};
	use crate::unit::UnitOrder;

	fn terran_world() -> World {
		let mut world = World::default();
		world.race = Race::Terran;

		let mut data = GameData::default();
		let mut scv = unit_type(UnitTypeId::SCV, "SCV");
		scv.mineral_cost = 50;
		scv.food_required = 1.0;
		scv.ability = Some(AbilityId::CommandCenterTrainSCV);
		data.units.insert(scv.id, scv);
		let mut cc = unit_type(UnitTypeId::CommandCenter, "CommandCenter");
		cc.mineral_cost = 400;
		cc.ability = Some(AbilityId::TerranBuildCommandCenter);
		data.units.insert(cc.id, cc);
		let mut rax = unit_type(UnitTypeId::Barracks, "Barracks");
		rax.mineral_cost = 150;
		rax.ability = Some(AbilityId::TerranBuildBarracks);
		data.units.insert(rax.id, rax);
		data.abilities.insert(
			AbilityId::CommandCenterTrainSCV,
			ability(AbilityId::CommandCenterTrainSCV, "CommandCenterTrain"),
		);
		data.abilities.insert(
			AbilityId::TerranBuildBarracks,
			ability(AbilityId::TerranBuildBarracks, "TerranBuild"),
		);
		world.game_data = Rs::new(data);
		world.reshare();
		world
	}

	#[test]
	fn training_debits_minerals_and_supply() {
		let mut world = terran_world();
		world.minerals = 100;
		world.supply_cap = 15;
		world.supply_used = 12;
		world.supply_left = 3;

		let cc = unit(
			&world.shared,
			1,
			UnitTypeId::CommandCenter,
			Point2::new(30.0, 30.0),
		);
		world.units.my.all.push(cc.clone());
		world.units.my.townhalls.push(cc);

		let trained = world.train(UnitTypeId::SCV, 1).unwrap();
		assert_eq!(trained, 1);
		assert_eq!(world.minerals, 50);
		assert_eq!(world.supply_used, 13);
		assert_eq!(world.supply_left, 2);
		assert!(world.commander.borrow().last_intent_of(1).is_some());
	}

	#[test]
	fn training_stops_when_supply_is_full() {
		let mut world = terran_world();
		world.minerals = 1000;
		world.supply_cap = 15;
		world.supply_used = 15;
		world.supply_left = 0;

		let cc = unit(
			&world.shared,
			1,
			UnitTypeId::CommandCenter,
			Point2::new(30.0, 30.0),
		);
		world.units.my.all.push(cc);
		assert_eq!(world.train(UnitTypeId::SCV, 2).unwrap(), 0);
		assert_eq!(world.minerals, 1000);
	}

	#[test]
	fn pending_counts_orders_once() {
		let mut world = terran_world();
		let mut cc = unit(
			&world.shared,
			1,
			UnitTypeId::CommandCenter,
			Point2::new(30.0, 30.0),
		);
		cc.orders.push(UnitOrder {
			ability: AbilityId::CommandCenterTrainSCV,
			target: Target::None,
			progress: 0.2,
		});
		world.units.my.all.push(cc);
		assert_eq!(world.already_pending(UnitTypeId::SCV), 1);
	}

	#[test]
	fn pending_terran_construction_not_double_counted() {
		let mut world = terran_world();
		let site = Point2::new(40.0, 40.0);

		// The builder keeps its order for the whole construction.
		let mut scv = unit(&world.shared, 2, UnitTypeId::SCV, site.offset(1.0, 0.0));
		scv.orders.push(UnitOrder {
			ability: AbilityId::TerranBuildBarracks,
			target: Target::Pos(site),
			progress: 0.0,
		});
		world.units.my.all.push(scv);

		let mut rax = unit(&world.shared, 3, UnitTypeId::Barracks, site);
		rax.build_progress = 0.5;
		world.units.my.all.push(rax.clone());
		world.units.my.structures.push(rax);

		assert_eq!(world.already_pending(UnitTypeId::Barracks), 1);
	}

	#[test]
	fn zerg_half_supply_rounds_up() {
		let mut world = terran_world();
		world.race = Race::Zerg;
		world.state.observation.common.food_used = 10;
		world.state.observation.common.food_cap = 20;

		for tag in 0..3 {
			let ling = unit(
				&world.shared,
				tag,
				UnitTypeId::Zergling,
				Point2::new(tag as f32, 0.0),
			);
			world.units.my.all.push(ling.clone());
			world.units.my.units.push(ling);
		}
		world.update_scalars();
		assert_eq!(world.supply_used, 11);
		assert_eq!(world.supply_left, 9);
	}

	#[test]
	fn distribute_workers_fills_the_understaffed_base() {
		let mut world = terran_world();
		let base_pos = Point2::new(30.0, 30.0);

		let mut cc = unit(&world.shared, 1, UnitTypeId::CommandCenter, base_pos);
		cc.ideal_harvesters = Some(9);
		cc.assigned_harvesters = Some(8);
		world.units.my.townhalls.push(cc);

		let mineral = unit(
			&world.shared,
			50,
			UnitTypeId::MineralField,
			base_pos.offset(5.0, 0.0),
		);
		world.units.mineral_fields.push(mineral);

		let worker = unit(&world.shared, 7, UnitTypeId::SCV, base_pos.offset(8.0, 0.0));
		world.units.my.workers.push(worker);

		world.distribute_workers(2.0);
		assert!(world.commander.borrow().last_intent_of(7).is_some());
	}

	#[test]
	fn distribute_workers_staffs_gas_when_minerals_float() {
		let mut world = terran_world();
		world.minerals = 1000;
		world.vespene = 0;
		let base_pos = Point2::new(30.0, 30.0);

		let mut cc = unit(&world.shared, 1, UnitTypeId::CommandCenter, base_pos);
		cc.ideal_harvesters = Some(8);
		cc.assigned_harvesters = Some(8);
		world.units.my.townhalls.push(cc);

		let mut gas = unit(
			&world.shared,
			60,
			UnitTypeId::Refinery,
			base_pos.offset(6.0, 0.0),
		);
		gas.ideal_harvesters = Some(3);
		gas.assigned_harvesters = Some(0);
		gas.vespene_contents = Some(2000);
		world.units.my.gas_buildings.push(gas);

		for tag in 10..13 {
			let worker = unit(
				&world.shared,
				tag,
				UnitTypeId::SCV,
				base_pos.offset(2.0, tag as f32),
			);
			world.units.my.workers.push(worker);
		}

		world.distribute_workers(2.0);
		let commander = world.commander.borrow();
		for tag in 10..13 {
			assert!(commander.last_intent_of(tag).is_some());
		}
	}
}
