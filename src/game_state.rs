//! Per-frame observation as reported by the game, before world assembly.

use crate::{
	command::{ActionError, ActionResult},
	constants::FAKE_EFFECTS,
	geometry::Point2,
	ids::{EffectId, UnitTypeId, UpgradeId},
	pixel_map::{PixelMap, VisibilityMap},
	player::GameResult,
	unit::{Alliance, SharedUnitData, Unit},
	units::Units,
	FromProto, FromProtoData, IntoSC2,
};
use sc2_proto::{
	raw::{ObservationRaw, PowerSource as ProtoPowerSource},
	sc2api::{Alert as ProtoAlert, Observation as ProtoObservation, ResponseObservation},
	score::Score as ProtoScore,
};

/// Everything the game reported for one frame.
#[derive(Default, Clone)]
pub struct GameState {
	pub observation: Observation,
	/// Actions of the previous frame the game rejected.
	pub action_errors: Vec<ActionError>,
	pub chat: Vec<ChatMessage>,
	/// Set on the final observation of the game, one entry per player.
	pub results: Vec<(u32, GameResult)>,
}

impl FromProtoData<&ResponseObservation> for GameState {
	fn from_proto_data(data: SharedUnitData, res: &ResponseObservation) -> Self {
		Self {
			observation: Observation::from_proto_data(data, res.get_observation()),
			action_errors: res
				.get_action_errors()
				.iter()
				.map(|e| ActionError {
					unit: e.get_unit_tag(),
					ability: (e.get_ability_id() as u32).into_sc2(),
					result: ActionResult::from(e.get_result()),
				})
				.collect(),
			chat: res
				.get_chat()
				.iter()
				.map(|m| ChatMessage {
					player_id: m.get_player_id(),
					message: m.get_message().to_string(),
				})
				.collect(),
			results: res
				.get_player_result()
				.iter()
				.map(|r| (r.get_player_id(), r.get_result().into_sc2()))
				.collect(),
		}
	}
}

#[derive(Clone)]
pub struct ChatMessage {
	pub player_id: u32,
	pub message: String,
}

#[derive(Default, Clone)]
pub struct Observation {
	pub game_loop: u32,
	pub common: Common,
	pub alerts: Vec<Alert>,
	pub score: Score,
	pub raw: RawData,
}

impl FromProtoData<&ProtoObservation> for Observation {
	fn from_proto_data(data: SharedUnitData, obs: &ProtoObservation) -> Self {
		let common = obs.get_player_common();
		Self {
			game_loop: obs.get_game_loop(),
			common: Common {
				player_id: common.get_player_id(),
				minerals: common.get_minerals(),
				vespene: common.get_vespene(),
				food_cap: common.get_food_cap(),
				food_used: common.get_food_used(),
				food_army: common.get_food_army(),
				food_workers: common.get_food_workers(),
				idle_worker_count: common.get_idle_worker_count(),
				army_count: common.get_army_count(),
				warp_gate_count: common.get_warp_gate_count(),
				larva_count: common.get_larva_count(),
			},
			alerts: obs.get_alerts().iter().map(|a| (*a).into_sc2()).collect(),
			score: obs.get_score().into_sc2(),
			raw: RawData::from_proto_data(data, obs.get_raw_data()),
		}
	}
}

#[derive(Default, Clone)]
pub struct RawData {
	pub psionic_matrix: Vec<PsionicMatrix>,
	pub camera: Point2,
	pub units: Units,
	pub upgrades: Vec<UpgradeId>,
	pub visibility: VisibilityMap,
	pub creep: PixelMap,
	/// Tags of units that died since the previous observation.
	pub dead_units: Vec<u64>,
	pub effects: Vec<Effect>,
	pub radars: Vec<Radar>,
}

impl FromProtoData<&ObservationRaw> for RawData {
	fn from_proto_data(data: SharedUnitData, raw: &ObservationRaw) -> Self {
		let raw_player = raw.get_player();
		let map_state = raw.get_map_state();

		let mut units = Units::with_capacity(raw.get_units().len());
		let mut effects: Vec<Effect> = raw
			.get_effects()
			.iter()
			.map(|e| Effect {
				id: e.get_effect_id().into_sc2(),
				positions: e.get_pos().iter().map(|p| p.into_sc2()).collect(),
				alliance: e.get_alliance().into_sc2(),
				owner: e.get_owner() as u32,
				radius: e.get_radius(),
			})
			.collect();
		// Some projectiles and fields arrive as units. Bots care about their
		// area of effect, so they are surfaced as effects instead.
		for u in raw.get_units() {
			let type_id = UnitTypeId::from(u.get_unit_type());
			if let Some((effect, radius)) = FAKE_EFFECTS.get(&type_id) {
				effects.push(Effect {
					id: *effect,
					positions: vec![Point2::new(u.get_pos().get_x(), u.get_pos().get_y())],
					alliance: u.get_alliance().into_sc2(),
					owner: u.get_owner() as u32,
					radius: *radius,
				});
			} else {
				units.push(Unit::from_proto_data(data.clone(), u));
			}
		}

		Self {
			psionic_matrix: raw_player
				.get_power_sources()
				.iter()
				.map(|ps| ps.into_sc2())
				.collect(),
			camera: Point2::new(
				raw_player.get_camera().get_x(),
				raw_player.get_camera().get_y(),
			),
			units,
			upgrades: raw_player
				.get_upgrade_ids()
				.iter()
				.map(|u| UpgradeId::from(*u))
				.collect(),
			visibility: map_state.get_visibility().into_sc2(),
			creep: map_state.get_creep().into_sc2(),
			dead_units: raw.get_event().get_dead_units().to_vec(),
			effects,
			radars: raw
				.get_radar()
				.iter()
				.map(|r| Radar {
					pos: r.get_pos().into_sc2(),
					radius: r.get_radius(),
				})
				.collect(),
		}
	}
}

/// Pylon power field (or equivalent power source).
#[derive(Clone)]
pub struct PsionicMatrix {
	pub pos: Point2,
	pub radius: f32,
	pub tag: u64,
}
impl FromProto<&ProtoPowerSource> for PsionicMatrix {
	fn from_proto(ps: &ProtoPowerSource) -> Self {
		Self {
			pos: ps.get_pos().into_sc2(),
			radius: ps.get_radius(),
			tag: ps.get_tag(),
		}
	}
}

/// Active area effect visible to the player.
#[derive(Clone)]
pub struct Effect {
	pub id: EffectId,
	pub positions: Vec<Point2>,
	pub alliance: Alliance,
	pub owner: u32,
	pub radius: f32,
}

/// Sensor tower coverage circle.
#[derive(Clone)]
pub struct Radar {
	pub pos: Point2,
	pub radius: f32,
}

#[derive(Default, Clone)]
pub struct Common {
	pub player_id: u32,
	pub minerals: u32,
	pub vespene: u32,
	pub food_cap: u32,
	pub food_used: u32,
	pub food_army: u32,
	pub food_workers: u32,
	pub idle_worker_count: u32,
	pub army_count: u32,
	pub warp_gate_count: u32,
	pub larva_count: u32,
}

/// Subset of the score screen useful to a running bot.
#[derive(Default, Clone)]
pub struct Score {
	pub score: i32,
	pub collection_rate_minerals: f32,
	pub collection_rate_vespene: f32,
	pub collected_minerals: f32,
	pub collected_vespene: f32,
	pub spent_minerals: f32,
	pub spent_vespene: f32,
	pub killed_value_units: f32,
	pub killed_value_structures: f32,
	pub total_value_units: f32,
	pub total_value_structures: f32,
}
impl FromProto<&ProtoScore> for Score {
	fn from_proto(s: &ProtoScore) -> Self {
		let details = s.get_score_details();
		Self {
			score: s.get_score(),
			collection_rate_minerals: details.get_collection_rate_minerals(),
			collection_rate_vespene: details.get_collection_rate_vespene(),
			collected_minerals: details.get_collected_minerals(),
			collected_vespene: details.get_collected_vespene(),
			spent_minerals: details.get_spent_minerals(),
			spent_vespene: details.get_spent_vespene(),
			killed_value_units: details.get_killed_value_units(),
			killed_value_structures: details.get_killed_value_structures(),
			total_value_units: details.get_total_value_units(),
			total_value_structures: details.get_total_value_structures(),
		}
	}
}

#[allow(clippy::enum_variant_names)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alert {
	AlertError,
	AddOnComplete,
	BuildingComplete,
	BuildingUnderAttack,
	LarvaHatched,
	MergeComplete,
	MineralsExhausted,
	MorphComplete,
	MothershipComplete,
	MULEExpired,
	NuclearLaunchDetected,
	NukeComplete,
	NydusWormDetected,
	ResearchComplete,
	TrainError,
	TrainUnitComplete,
	TrainWorkerComplete,
	TransformationComplete,
	UnitUnderAttack,
	UpgradeComplete,
	VespeneExhausted,
	WarpInComplete,
}
impl FromProto<ProtoAlert> for Alert {
	fn from_proto(alert: ProtoAlert) -> Self {
		match alert {
			ProtoAlert::AlertError => Alert::AlertError,
			ProtoAlert::AddOnComplete => Alert::AddOnComplete,
			ProtoAlert::BuildingComplete => Alert::BuildingComplete,
			ProtoAlert::BuildingUnderAttack => Alert::BuildingUnderAttack,
			ProtoAlert::LarvaHatched => Alert::LarvaHatched,
			ProtoAlert::MergeComplete => Alert::MergeComplete,
			ProtoAlert::MineralsExhausted => Alert::MineralsExhausted,
			ProtoAlert::MorphComplete => Alert::MorphComplete,
			ProtoAlert::MothershipComplete => Alert::MothershipComplete,
			ProtoAlert::MULEExpired => Alert::MULEExpired,
			ProtoAlert::NuclearLaunchDetected => Alert::NuclearLaunchDetected,
			ProtoAlert::NukeComplete => Alert::NukeComplete,
			ProtoAlert::NydusWormDetected => Alert::NydusWormDetected,
			ProtoAlert::ResearchComplete => Alert::ResearchComplete,
			ProtoAlert::TrainError => Alert::TrainError,
			ProtoAlert::TrainUnitComplete => Alert::TrainUnitComplete,
			ProtoAlert::TrainWorkerComplete => Alert::TrainWorkerComplete,
			ProtoAlert::TransformationComplete => Alert::TransformationComplete,
			ProtoAlert::UnitUnderAttack => Alert::UnitUnderAttack,
			ProtoAlert::UpgradeComplete => Alert::UpgradeComplete,
			ProtoAlert::VespeneExhausted => Alert::VespeneExhausted,
			ProtoAlert::WarpInComplete => Alert::WarpInComplete,
		}
	}
}
