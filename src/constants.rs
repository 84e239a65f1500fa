//! Static tables the game data does not provide.

use crate::{
	game_data::{Attribute, TargetType, Weapon},
	ids::{AbilityId, EffectId, UnitTypeId, UpgradeId},
	player::Race,
};
use rustc_hash::{FxHashMap, FxHashSet};

/// Game speed on the "faster" setting, in frames per second of game time.
pub const FRAMES_PER_SECOND: f32 = 22.4;

/// Race-specific structure and worker types.
#[derive(Debug, Clone)]
pub struct RaceValues {
	pub start_townhall: UnitTypeId,
	pub townhalls: Vec<UnitTypeId>,
	pub gas: UnitTypeId,
	pub rich_gas: UnitTypeId,
	pub supply: UnitTypeId,
	pub worker: UnitTypeId,
}
impl Default for RaceValues {
	fn default() -> Self {
		Self {
			start_townhall: UnitTypeId::NotAUnit,
			townhalls: Vec::new(),
			gas: UnitTypeId::NotAUnit,
			rich_gas: UnitTypeId::NotAUnit,
			supply: UnitTypeId::NotAUnit,
			worker: UnitTypeId::NotAUnit,
		}
	}
}

lazy_static! {
	pub static ref RACE_VALUES: FxHashMap<Race, RaceValues> = hashmap! {
		Race::Terran => RaceValues {
			start_townhall: UnitTypeId::CommandCenter,
			townhalls: vec![
				UnitTypeId::CommandCenter,
				UnitTypeId::OrbitalCommand,
				UnitTypeId::PlanetaryFortress,
				UnitTypeId::CommandCenterFlying,
				UnitTypeId::OrbitalCommandFlying,
			],
			gas: UnitTypeId::Refinery,
			rich_gas: UnitTypeId::RefineryRich,
			supply: UnitTypeId::SupplyDepot,
			worker: UnitTypeId::SCV,
		},
		Race::Zerg => RaceValues {
			start_townhall: UnitTypeId::Hatchery,
			townhalls: vec![UnitTypeId::Hatchery, UnitTypeId::Lair, UnitTypeId::Hive],
			gas: UnitTypeId::Extractor,
			rich_gas: UnitTypeId::ExtractorRich,
			supply: UnitTypeId::Overlord,
			worker: UnitTypeId::Drone,
		},
		Race::Protoss => RaceValues {
			start_townhall: UnitTypeId::Nexus,
			townhalls: vec![UnitTypeId::Nexus],
			gas: UnitTypeId::Assimilator,
			rich_gas: UnitTypeId::AssimilatorRich,
			supply: UnitTypeId::Pylon,
			worker: UnitTypeId::Probe,
		},
	}
	.into_iter()
	.collect();

	/// Abilities that may carry many unit tags in one raw action.
	pub static ref COMBINEABLE_ABILITIES: FxHashSet<AbilityId> = hashset! {
		AbilityId::Smart,
		AbilityId::Move,
		AbilityId::MoveMove,
		AbilityId::Attack,
		AbilityId::AttackAttack,
		AbilityId::Stop,
		AbilityId::StopStop,
		AbilityId::HoldPosition,
		AbilityId::HoldPositionHold,
		AbilityId::Patrol,
		AbilityId::PatrolPatrol,
		AbilityId::HarvestGather,
		AbilityId::HarvestReturn,
		AbilityId::EffectRepair,
		AbilityId::Lift,
		AbilityId::Land,
		AbilityId::BurrowDown,
		AbilityId::BurrowUp,
		AbilityId::MorphSiegeMode,
		AbilityId::MorphUnsiege,
		AbilityId::EffectStim,
		AbilityId::EffectBlink,
		AbilityId::LoadAll,
		AbilityId::UnloadAll,
	}
	.into_iter()
	.collect();

	/// Construction abilities of workers, keyed by the structure they place.
	pub static ref CONSTRUCTING_ABILITIES: FxHashSet<AbilityId> = hashset! {
		AbilityId::TerranBuildCommandCenter,
		AbilityId::TerranBuildSupplyDepot,
		AbilityId::TerranBuildRefinery,
		AbilityId::TerranBuildBarracks,
		AbilityId::TerranBuildEngineeringBay,
		AbilityId::TerranBuildMissileTurret,
		AbilityId::TerranBuildBunker,
		AbilityId::TerranBuildSensorTower,
		AbilityId::TerranBuildGhostAcademy,
		AbilityId::TerranBuildFactory,
		AbilityId::TerranBuildStarport,
		AbilityId::TerranBuildArmory,
		AbilityId::TerranBuildFusionCore,
		AbilityId::ProtossBuildNexus,
		AbilityId::ProtossBuildPylon,
		AbilityId::ProtossBuildAssimilator,
		AbilityId::ProtossBuildGateway,
		AbilityId::ProtossBuildForge,
		AbilityId::ProtossBuildFleetBeacon,
		AbilityId::ProtossBuildTwilightCouncil,
		AbilityId::ProtossBuildPhotonCannon,
		AbilityId::ProtossBuildStargate,
		AbilityId::ProtossBuildTemplarArchive,
		AbilityId::ProtossBuildDarkShrine,
		AbilityId::ProtossBuildRoboticsBay,
		AbilityId::ProtossBuildRoboticsFacility,
		AbilityId::ProtossBuildCyberneticsCore,
		AbilityId::ZergBuildHatchery,
		AbilityId::ZergBuildExtractor,
		AbilityId::ZergBuildSpawningPool,
		AbilityId::ZergBuildEvolutionChamber,
		AbilityId::ZergBuildHydraliskDen,
		AbilityId::ZergBuildSpire,
		AbilityId::ZergBuildUltraliskCavern,
		AbilityId::ZergBuildInfestationPit,
		AbilityId::ZergBuildNydusNetwork,
		AbilityId::ZergBuildBanelingNest,
		AbilityId::ZergBuildRoachWarren,
		AbilityId::ZergBuildSpineCrawler,
		AbilityId::ZergBuildSporeCrawler,
	}
	.into_iter()
	.collect();

	/// Warp gate training ability per warpable unit type.
	pub static ref WARPGATE_ABILITIES: FxHashMap<UnitTypeId, AbilityId> = hashmap! {
		UnitTypeId::Zealot => AbilityId::WarpGateTrainZealot,
		UnitTypeId::Stalker => AbilityId::WarpGateTrainStalker,
		UnitTypeId::HighTemplar => AbilityId::WarpGateTrainHighTemplar,
		UnitTypeId::DarkTemplar => AbilityId::WarpGateTrainDarkTemplar,
		UnitTypeId::Sentry => AbilityId::WarpGateTrainSentry,
		UnitTypeId::Adept => AbilityId::WarpGateTrainAdept,
	}
	.into_iter()
	.collect();

	/// Per-level weapon damage gained from attack upgrades, where it differs
	/// from the default of one.
	pub static ref DAMAGE_PER_UPGRADE: FxHashMap<UnitTypeId, f32> = hashmap! {
		UnitTypeId::Ultralisk => 3.0,
		UnitTypeId::UltraliskBurrowed => 3.0,
		UnitTypeId::Thor => 2.0,
		UnitTypeId::ThorAP => 2.0,
		UnitTypeId::Baneling => 2.0,
		UnitTypeId::SiegeTankSieged => 4.0,
		UnitTypeId::Battlecruiser => 1.0,
	}
	.into_iter()
	.collect();

	/// Per-level gain of attribute bonus damage, where a weapon has any.
	pub static ref BONUS_DAMAGE_PER_UPGRADE: FxHashMap<UnitTypeId, (Attribute, f32)> = hashmap! {
		UnitTypeId::Marauder => (Attribute::Armored, 1.0),
		UnitTypeId::SiegeTankSieged => (Attribute::Armored, 1.0),
		UnitTypeId::Baneling => (Attribute::Light, 2.0),
		UnitTypeId::Immortal => (Attribute::Armored, 1.0),
	}
	.into_iter()
	.collect();

	/// Weapons the catalog does not report.
	pub static ref MISSED_WEAPONS: FxHashMap<UnitTypeId, Vec<Weapon>> = hashmap! {
		UnitTypeId::Battlecruiser => vec![
			Weapon {
				target: TargetType::Ground,
				damage: 8.0,
				damage_bonus: vec![],
				attacks: 1,
				range: 6.0,
				speed: 0.224,
			},
			Weapon {
				target: TargetType::Air,
				damage: 5.0,
				damage_bonus: vec![],
				attacks: 1,
				range: 6.0,
				speed: 0.224,
			},
		],
		// A loaded bunker behaves like marines with one extra range.
		UnitTypeId::Bunker => vec![Weapon {
			target: TargetType::Any,
			damage: 6.0,
			damage_bonus: vec![],
			attacks: 4,
			range: 7.0,
			speed: 0.861,
		}],
		UnitTypeId::Baneling => vec![Weapon {
			target: TargetType::Ground,
			damage: 20.0,
			damage_bonus: vec![(Attribute::Light, 15.0), (Attribute::Structure, 60.0)],
			attacks: 1,
			range: 2.2,
			speed: 1.0,
		}],
	}
	.into_iter()
	.collect();

	/// Structures (or larva) able to produce each trainable unit.
	pub static ref UNIT_TRAINED_FROM: FxHashMap<UnitTypeId, Vec<UnitTypeId>> = hashmap! {
		UnitTypeId::SCV => vec![
			UnitTypeId::CommandCenter,
			UnitTypeId::OrbitalCommand,
			UnitTypeId::PlanetaryFortress,
		],
		UnitTypeId::Marine => vec![UnitTypeId::Barracks],
		UnitTypeId::Marauder => vec![UnitTypeId::Barracks],
		UnitTypeId::Reaper => vec![UnitTypeId::Barracks],
		UnitTypeId::Ghost => vec![UnitTypeId::Barracks],
		UnitTypeId::Hellion => vec![UnitTypeId::Factory],
		UnitTypeId::SiegeTank => vec![UnitTypeId::Factory],
		UnitTypeId::Cyclone => vec![UnitTypeId::Factory],
		UnitTypeId::WidowMine => vec![UnitTypeId::Factory],
		UnitTypeId::Thor => vec![UnitTypeId::Factory],
		UnitTypeId::VikingFighter => vec![UnitTypeId::Starport],
		UnitTypeId::Medivac => vec![UnitTypeId::Starport],
		UnitTypeId::Liberator => vec![UnitTypeId::Starport],
		UnitTypeId::Banshee => vec![UnitTypeId::Starport],
		UnitTypeId::Raven => vec![UnitTypeId::Starport],
		UnitTypeId::Battlecruiser => vec![UnitTypeId::Starport],
		UnitTypeId::Probe => vec![UnitTypeId::Nexus],
		UnitTypeId::Zealot => vec![UnitTypeId::Gateway, UnitTypeId::WarpGate],
		UnitTypeId::Stalker => vec![UnitTypeId::Gateway, UnitTypeId::WarpGate],
		UnitTypeId::Sentry => vec![UnitTypeId::Gateway, UnitTypeId::WarpGate],
		UnitTypeId::Adept => vec![UnitTypeId::Gateway, UnitTypeId::WarpGate],
		UnitTypeId::HighTemplar => vec![UnitTypeId::Gateway, UnitTypeId::WarpGate],
		UnitTypeId::DarkTemplar => vec![UnitTypeId::Gateway, UnitTypeId::WarpGate],
		UnitTypeId::Phoenix => vec![UnitTypeId::Stargate],
		UnitTypeId::Oracle => vec![UnitTypeId::Stargate],
		UnitTypeId::VoidRay => vec![UnitTypeId::Stargate],
		UnitTypeId::Carrier => vec![UnitTypeId::Stargate],
		UnitTypeId::Tempest => vec![UnitTypeId::Stargate],
		UnitTypeId::Observer => vec![UnitTypeId::RoboticsFacility],
		UnitTypeId::WarpPrism => vec![UnitTypeId::RoboticsFacility],
		UnitTypeId::Immortal => vec![UnitTypeId::RoboticsFacility],
		UnitTypeId::Colossus => vec![UnitTypeId::RoboticsFacility],
		UnitTypeId::Disruptor => vec![UnitTypeId::RoboticsFacility],
		UnitTypeId::Queen => vec![UnitTypeId::Hatchery, UnitTypeId::Lair, UnitTypeId::Hive],
		UnitTypeId::Drone => vec![UnitTypeId::Larva],
		UnitTypeId::Overlord => vec![UnitTypeId::Larva],
		UnitTypeId::Zergling => vec![UnitTypeId::Larva],
		UnitTypeId::Roach => vec![UnitTypeId::Larva],
		UnitTypeId::Hydralisk => vec![UnitTypeId::Larva],
		UnitTypeId::Mutalisk => vec![UnitTypeId::Larva],
		UnitTypeId::Corruptor => vec![UnitTypeId::Larva],
		UnitTypeId::Infestor => vec![UnitTypeId::Larva],
		UnitTypeId::SwarmHostMP => vec![UnitTypeId::Larva],
		UnitTypeId::Viper => vec![UnitTypeId::Larva],
		UnitTypeId::Ultralisk => vec![UnitTypeId::Larva],
	}
	.into_iter()
	.collect();

	/// Structure each upgrade is researched at.
	pub static ref UPGRADE_RESEARCHED_FROM: FxHashMap<UpgradeId, UnitTypeId> = hashmap! {
		UpgradeId::Stimpack => UnitTypeId::BarracksTechLab,
		UpgradeId::ShieldWall => UnitTypeId::BarracksTechLab,
		UpgradeId::PunisherGrenades => UnitTypeId::BarracksTechLab,
		UpgradeId::HighCapacityBarrels => UnitTypeId::FactoryTechLab,
		UpgradeId::HiSecAutoTracking => UnitTypeId::EngineeringBay,
		UpgradeId::TerranBuildingArmor => UnitTypeId::EngineeringBay,
		UpgradeId::TerranInfantryWeaponsLevel1 => UnitTypeId::EngineeringBay,
		UpgradeId::TerranInfantryWeaponsLevel2 => UnitTypeId::EngineeringBay,
		UpgradeId::TerranInfantryWeaponsLevel3 => UnitTypeId::EngineeringBay,
		UpgradeId::TerranInfantryArmorsLevel1 => UnitTypeId::EngineeringBay,
		UpgradeId::TerranInfantryArmorsLevel2 => UnitTypeId::EngineeringBay,
		UpgradeId::TerranInfantryArmorsLevel3 => UnitTypeId::EngineeringBay,
		UpgradeId::TerranVehicleWeaponsLevel1 => UnitTypeId::Armory,
		UpgradeId::TerranVehicleWeaponsLevel2 => UnitTypeId::Armory,
		UpgradeId::TerranVehicleWeaponsLevel3 => UnitTypeId::Armory,
		UpgradeId::TerranShipWeaponsLevel1 => UnitTypeId::Armory,
		UpgradeId::TerranShipWeaponsLevel2 => UnitTypeId::Armory,
		UpgradeId::TerranShipWeaponsLevel3 => UnitTypeId::Armory,
		UpgradeId::ProtossGroundWeaponsLevel1 => UnitTypeId::Forge,
		UpgradeId::ProtossGroundWeaponsLevel2 => UnitTypeId::Forge,
		UpgradeId::ProtossGroundWeaponsLevel3 => UnitTypeId::Forge,
		UpgradeId::ProtossGroundArmorsLevel1 => UnitTypeId::Forge,
		UpgradeId::ProtossGroundArmorsLevel2 => UnitTypeId::Forge,
		UpgradeId::ProtossGroundArmorsLevel3 => UnitTypeId::Forge,
		UpgradeId::ProtossShieldsLevel1 => UnitTypeId::Forge,
		UpgradeId::ProtossShieldsLevel2 => UnitTypeId::Forge,
		UpgradeId::ProtossShieldsLevel3 => UnitTypeId::Forge,
		UpgradeId::WarpGateResearch => UnitTypeId::CyberneticsCore,
		UpgradeId::Charge => UnitTypeId::TwilightCouncil,
		UpgradeId::BlinkTech => UnitTypeId::TwilightCouncil,
		UpgradeId::AdeptPiercingAttack => UnitTypeId::TwilightCouncil,
		UpgradeId::MetabolicBoost => UnitTypeId::SpawningPool,
		UpgradeId::AdrenalGlands => UnitTypeId::SpawningPool,
		UpgradeId::Burrow => UnitTypeId::Hatchery,
		UpgradeId::GlialReconstitution => UnitTypeId::RoachWarren,
		UpgradeId::TunnelingClaws => UnitTypeId::RoachWarren,
		UpgradeId::ChitinousPlating => UnitTypeId::UltraliskCavern,
		UpgradeId::ZergMeleeWeaponsLevel1 => UnitTypeId::EvolutionChamber,
		UpgradeId::ZergMeleeWeaponsLevel2 => UnitTypeId::EvolutionChamber,
		UpgradeId::ZergMeleeWeaponsLevel3 => UnitTypeId::EvolutionChamber,
		UpgradeId::ZergMissileWeaponsLevel1 => UnitTypeId::EvolutionChamber,
		UpgradeId::ZergMissileWeaponsLevel2 => UnitTypeId::EvolutionChamber,
		UpgradeId::ZergMissileWeaponsLevel3 => UnitTypeId::EvolutionChamber,
		UpgradeId::ZergGroundArmorsLevel1 => UnitTypeId::EvolutionChamber,
		UpgradeId::ZergGroundArmorsLevel2 => UnitTypeId::EvolutionChamber,
		UpgradeId::ZergGroundArmorsLevel3 => UnitTypeId::EvolutionChamber,
	}
	.into_iter()
	.collect();

	/// Effect-like units surfaced to bots as if they were real effects.
	pub static ref FAKE_EFFECTS: FxHashMap<UnitTypeId, (EffectId, f32)> = hashmap! {
		UnitTypeId::KD8Charge => (EffectId::KD8Charge, 2.0),
		UnitTypeId::ParasiticBombDummy => (EffectId::ParasiticBombDummy, 3.0),
		UnitTypeId::ForceField => (EffectId::ForceField, 1.5),
	}
	.into_iter()
	.collect();
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn race_values_cover_the_playable_races() {
		for race in [Race::Terran, Race::Zerg, Race::Protoss] {
			let values = &RACE_VALUES[&race];
			assert!(values.townhalls.contains(&values.start_townhall));
			assert!(values.worker.is_worker());
		}
		assert!(!RACE_VALUES.contains_key(&Race::Random));
	}

	#[test]
	fn every_static_table_builds() {
		assert_eq!(RACE_VALUES.len(), 3);
		assert!(!COMBINEABLE_ABILITIES.is_empty());
		assert!(CONSTRUCTING_ABILITIES.contains(&AbilityId::TerranBuildBarracks));
		assert_eq!(WARPGATE_ABILITIES[&UnitTypeId::Zealot], AbilityId::WarpGateTrainZealot);
		assert_eq!(DAMAGE_PER_UPGRADE[&UnitTypeId::Ultralisk], 3.0);
		assert_eq!(BONUS_DAMAGE_PER_UPGRADE[&UnitTypeId::Baneling].0, Attribute::Light);
		assert_eq!(MISSED_WEAPONS[&UnitTypeId::Battlecruiser].len(), 2);
		assert!(UNIT_TRAINED_FROM[&UnitTypeId::Marine].contains(&UnitTypeId::Barracks));
		assert_eq!(
			UPGRADE_RESEARCHED_FROM[&UpgradeId::Stimpack],
			UnitTypeId::BarracksTechLab
		);
		assert_eq!(FAKE_EFFECTS[&UnitTypeId::ForceField].0, EffectId::ForceField);
	}

	#[test]
	fn train_abilities_are_not_combineable() {
		assert!(COMBINEABLE_ABILITIES.contains(&AbilityId::Attack));
		assert!(!COMBINEABLE_ABILITIES.contains(&AbilityId::BarracksTrainMarine));
	}
}
