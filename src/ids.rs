//! Integer newtypes for game identifiers.
//!
//! The game patches freely add, remove and renumber ids, so these are thin
//! wrappers around the raw `u32` instead of closed enums: any value coming
//! off the wire round-trips, and the constants below cover every id the
//! library logic itself refers to. `Debug` prints the known name when there
//! is one.

macro_rules! id_type {
	(
		$(#[$meta:meta])*
		$name:ident {
			$($(#[$vmeta:meta])* $variant:ident = $value:expr,)*
		}
	) => {
		$(#[$meta])*
		#[derive(Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
		pub struct $name(pub u32);

		#[allow(non_upper_case_globals)]
		impl $name {
			$($(#[$vmeta])* pub const $variant: $name = $name($value);)*

			/// Name of the id when the crate knows it.
			pub fn name(self) -> Option<&'static str> {
				match self {
					$($name::$variant => Some(stringify!($variant)),)*
					_ => None,
				}
			}
		}
		impl std::fmt::Debug for $name {
			fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
				match self.name() {
					Some(name) => write!(f, concat!(stringify!($name), "({})"), name),
					None => write!(f, concat!(stringify!($name), "({})"), self.0),
				}
			}
		}
		impl From<u32> for $name {
			fn from(id: u32) -> Self {
				Self(id)
			}
		}
		impl From<$name> for u32 {
			fn from(id: $name) -> u32 {
				id.0
			}
		}
		impl crate::FromProto<u32> for $name {
			fn from_proto(id: u32) -> Self {
				Self(id)
			}
		}
		impl crate::IntoProto<u32> for $name {
			fn into_proto(self) -> u32 {
				self.0
			}
		}
	};
}

id_type! {
	/// Unit type identifier.
	UnitTypeId {
		NotAUnit = 0,
		Colossus = 4,
		TechLab = 5,
		Reactor = 6,
		BanelingCocoon = 8,
		Baneling = 9,
		Mothership = 10,
		CommandCenter = 18,
		SupplyDepot = 19,
		Refinery = 20,
		Barracks = 21,
		EngineeringBay = 22,
		MissileTurret = 23,
		Bunker = 24,
		SensorTower = 25,
		GhostAcademy = 26,
		Factory = 27,
		Starport = 28,
		Armory = 29,
		FusionCore = 30,
		AutoTurret = 31,
		SiegeTankSieged = 32,
		SiegeTank = 33,
		VikingAssault = 34,
		VikingFighter = 35,
		CommandCenterFlying = 36,
		BarracksTechLab = 37,
		BarracksReactor = 38,
		FactoryTechLab = 39,
		FactoryReactor = 40,
		StarportTechLab = 41,
		StarportReactor = 42,
		FactoryFlying = 43,
		StarportFlying = 44,
		SCV = 45,
		BarracksFlying = 46,
		SupplyDepotLowered = 47,
		Marine = 48,
		Reaper = 49,
		Ghost = 50,
		Marauder = 51,
		Thor = 52,
		Hellion = 53,
		Medivac = 54,
		Banshee = 55,
		Raven = 56,
		Battlecruiser = 57,
		Nexus = 59,
		Pylon = 60,
		Assimilator = 61,
		Gateway = 62,
		Forge = 63,
		FleetBeacon = 64,
		TwilightCouncil = 65,
		PhotonCannon = 66,
		Stargate = 67,
		TemplarArchive = 68,
		DarkShrine = 69,
		RoboticsBay = 70,
		RoboticsFacility = 71,
		CyberneticsCore = 72,
		Zealot = 73,
		Stalker = 74,
		HighTemplar = 75,
		DarkTemplar = 76,
		Sentry = 77,
		Phoenix = 78,
		Carrier = 79,
		VoidRay = 80,
		WarpPrism = 81,
		Observer = 82,
		Immortal = 83,
		Probe = 84,
		Hatchery = 86,
		CreepTumor = 87,
		Extractor = 88,
		SpawningPool = 89,
		EvolutionChamber = 90,
		HydraliskDen = 91,
		Spire = 92,
		UltraliskCavern = 93,
		InfestationPit = 94,
		NydusNetwork = 95,
		BanelingNest = 96,
		RoachWarren = 97,
		SpineCrawler = 98,
		SporeCrawler = 99,
		Lair = 100,
		Hive = 101,
		GreaterSpire = 102,
		Egg = 103,
		Drone = 104,
		Zergling = 105,
		Overlord = 106,
		Hydralisk = 107,
		Mutalisk = 108,
		Ultralisk = 109,
		Roach = 110,
		Infestor = 111,
		Corruptor = 112,
		BroodLordCocoon = 113,
		BroodLord = 114,
		BanelingBurrowed = 115,
		DroneBurrowed = 116,
		HydraliskBurrowed = 117,
		RoachBurrowed = 118,
		ZerglingBurrowed = 119,
		QueenBurrowed = 125,
		Queen = 126,
		InfestorBurrowed = 127,
		OverlordCocoon = 128,
		Overseer = 129,
		PlanetaryFortress = 130,
		UltraliskBurrowed = 131,
		OrbitalCommand = 132,
		WarpGate = 133,
		OrbitalCommandFlying = 134,
		ForceField = 135,
		WarpPrismPhasing = 136,
		Archon = 141,
		RichMineralField = 146,
		RichMineralField750 = 147,
		XelNagaTower = 149,
		Larva = 151,
		MULE = 268,
		Adept = 311,
		MineralField = 341,
		VespeneGeyser = 342,
		SpacePlatformGeyser = 343,
		RichVespeneGeyser = 344,
		MineralField750 = 483,
		HellionTank = 484,
		SwarmHostBurrowedMP = 493,
		SwarmHostMP = 494,
		Oracle = 495,
		Tempest = 496,
		WidowMine = 498,
		Viper = 499,
		WidowMineBurrowed = 500,
		LurkerMPEgg = 501,
		LurkerMP = 502,
		LurkerMPBurrowed = 503,
		LurkerDenMP = 504,
		Changeling = 604,
		ChangelingZealot = 605,
		ChangelingMarineShield = 606,
		ChangelingMarine = 607,
		ChangelingZerglingWings = 608,
		ChangelingZergling = 609,
		LabMineralField = 665,
		LabMineralField750 = 666,
		RavagerCocoon = 687,
		Ravager = 688,
		Liberator = 689,
		ThorAP = 691,
		Cyclone = 692,
		LocustMPFlying = 693,
		Disruptor = 694,
		LiberatorAG = 734,
		PurifierRichMineralField = 796,
		PurifierRichMineralField750 = 797,
		AdeptPhaseShift = 801,
		ParasiticBombDummy = 824,
		KD8Charge = 830,
		ProtossVespeneGeyser = 880,
		PurifierVespeneGeyser = 881,
		ShakurasVespeneGeyser = 882,
		PurifierMineralField = 884,
		PurifierMineralField750 = 885,
		BattleStationMineralField = 886,
		BattleStationMineralField750 = 887,
		TransportOverlordCocoon = 892,
		OverlordTransport = 893,
		ObserverSiegeMode = 1911,
		OverseerSiegeMode = 1912,
		RefineryRich = 1949,
		InhibitorZoneSmall = 1958,
		InhibitorZoneMedium = 1959,
		InhibitorZoneLarge = 1960,
		AssimilatorRich = 1980,
		ExtractorRich = 1981,
		MineralField450 = 1982,
	}
}

id_type! {
	/// Ability identifier.
	AbilityId {
		Null = 0,
		Smart = 1,
		StopStop = 4,
		MoveMove = 16,
		PatrolPatrol = 17,
		HoldPositionHold = 18,
		AttackAttack = 23,
		MorphZerglingToBanelingBaneling = 80,
		EffectCalldownMULE = 171,
		EffectInjectLarva = 251,
		EffectScan = 399,
		CancelQueue5 = 306,
		CancelBuildInProgress = 314,
		TerranBuildCommandCenter = 318,
		TerranBuildSupplyDepot = 319,
		TerranBuildRefinery = 320,
		TerranBuildBarracks = 321,
		TerranBuildEngineeringBay = 322,
		TerranBuildMissileTurret = 323,
		TerranBuildBunker = 324,
		TerranBuildSensorTower = 326,
		TerranBuildGhostAcademy = 327,
		TerranBuildFactory = 328,
		TerranBuildStarport = 329,
		TerranBuildArmory = 331,
		TerranBuildFusionCore = 333,
		MorphSiegeMode = 388,
		MorphUnsiege = 390,
		BarracksBuildTechLab = 421,
		BarracksBuildReactor = 422,
		FactoryBuildTechLab = 454,
		FactoryBuildReactor = 455,
		StarportBuildTechLab = 487,
		StarportBuildReactor = 488,
		CommandCenterTrainSCV = 524,
		MorphSupplyDepotLower = 556,
		MorphSupplyDepotRaise = 558,
		BarracksTrainMarine = 560,
		BarracksTrainReaper = 561,
		BarracksTrainGhost = 562,
		BarracksTrainMarauder = 563,
		FactoryTrainSiegeTank = 591,
		FactoryTrainHellion = 595,
		StarportTrainMedivac = 620,
		EngineeringBayResearchTerranInfantryWeaponsLevel1 = 652,
		BarracksTechLabResearchStimpack = 730,
		ResearchCombatShield = 731,
		ResearchConcussiveShells = 732,
		ProtossBuildNexus = 880,
		ProtossBuildPylon = 881,
		ProtossBuildAssimilator = 882,
		ProtossBuildGateway = 883,
		ProtossBuildForge = 884,
		ProtossBuildFleetBeacon = 885,
		ProtossBuildTwilightCouncil = 886,
		ProtossBuildPhotonCannon = 887,
		ProtossBuildStargate = 889,
		ProtossBuildTemplarArchive = 890,
		ProtossBuildDarkShrine = 891,
		ProtossBuildRoboticsBay = 892,
		ProtossBuildRoboticsFacility = 893,
		ProtossBuildCyberneticsCore = 894,
		GatewayTrainZealot = 916,
		GatewayTrainStalker = 917,
		GatewayTrainHighTemplar = 919,
		GatewayTrainDarkTemplar = 920,
		GatewayTrainSentry = 921,
		GatewayTrainAdept = 922,
		NexusTrainProbe = 1006,
		ZergBuildHatchery = 1152,
		ZergBuildExtractor = 1154,
		ZergBuildSpawningPool = 1155,
		ZergBuildEvolutionChamber = 1156,
		ZergBuildHydraliskDen = 1157,
		ZergBuildSpire = 1158,
		ZergBuildUltraliskCavern = 1159,
		ZergBuildInfestationPit = 1160,
		ZergBuildNydusNetwork = 1161,
		ZergBuildBanelingNest = 1162,
		ZergBuildRoachWarren = 1165,
		ZergBuildSpineCrawler = 1166,
		ZergBuildSporeCrawler = 1167,
		UpgradeToLair = 1216,
		UpgradeToHive = 1218,
		UpgradeToGreaterSpire = 1220,
		LarvaTrainDrone = 1342,
		LarvaTrainZergling = 1343,
		LarvaTrainOverlord = 1344,
		LarvaTrainHydralisk = 1345,
		LarvaTrainMutalisk = 1346,
		LarvaTrainUltralisk = 1348,
		LarvaTrainRoach = 1351,
		WarpGateTrainZealot = 1413,
		WarpGateTrainDarkTemplar = 1415,
		WarpGateTrainHighTemplar = 1416,
		WarpGateTrainStalker = 1417,
		WarpGateTrainSentry = 1418,
		WarpGateTrainAdept = 1419,
		MorphToOverseer = 1448,
		MorphPlanetaryFortress = 1450,
		MorphOrbitalCommand = 1516,
		MorphWarpGate = 1518,
		MorphGateway = 1520,
		TrainQueen = 1632,
		MorphToRavager = 2330,
		MorphLurker = 2332,
		Cancel = 3659,
		BurrowDown = 3661,
		BurrowUp = 3662,
		LoadAll = 3663,
		UnloadAll = 3664,
		Stop = 3665,
		HarvestGather = 3666,
		HarvestReturn = 3667,
		CancelLast = 3671,
		RallyUnits = 3673,
		Attack = 3674,
		EffectStim = 3675,
		BehaviorCloakOn = 3676,
		BehaviorCloakOff = 3677,
		Land = 3678,
		Lift = 3679,
		EffectRepair = 3685,
		EffectBlink = 3687,
		RallyWorkers = 3690,
		ResearchProtossGroundArmor = 3694,
		ResearchProtossGroundWeapons = 3695,
		ResearchProtossShields = 3696,
		ResearchTerranInfantryArmor = 3697,
		ResearchTerranInfantryWeapons = 3698,
		ResearchTerranShipWeapons = 3699,
		ResearchTerranVehicleAndShipPlating = 3700,
		ResearchTerranVehicleWeapons = 3701,
		ResearchZergFlyerArmor = 3702,
		ResearchZergFlyerAttack = 3703,
		ResearchZergGroundArmor = 3704,
		ResearchZergMeleeWeapons = 3705,
		ResearchZergMissileWeapons = 3706,
		EffectChronoBoostEnergyCost = 3755,
		HoldPosition = 3793,
		Move = 3794,
		Patrol = 3795,
	}
}

id_type! {
	/// Upgrade identifier.
	UpgradeId {
		Null = 0,
		GlialReconstitution = 2,
		TunnelingClaws = 3,
		ChitinousPlating = 4,
		HiSecAutoTracking = 5,
		TerranBuildingArmor = 6,
		TerranInfantryWeaponsLevel1 = 7,
		TerranInfantryWeaponsLevel2 = 8,
		TerranInfantryWeaponsLevel3 = 9,
		TerranInfantryArmorsLevel1 = 11,
		TerranInfantryArmorsLevel2 = 12,
		TerranInfantryArmorsLevel3 = 13,
		Stimpack = 15,
		ShieldWall = 16,
		PunisherGrenades = 17,
		HighCapacityBarrels = 19,
		TerranVehicleWeaponsLevel1 = 30,
		TerranVehicleWeaponsLevel2 = 31,
		TerranVehicleWeaponsLevel3 = 32,
		TerranShipWeaponsLevel1 = 36,
		TerranShipWeaponsLevel2 = 37,
		TerranShipWeaponsLevel3 = 38,
		ProtossGroundWeaponsLevel1 = 39,
		ProtossGroundWeaponsLevel2 = 40,
		ProtossGroundWeaponsLevel3 = 41,
		ProtossGroundArmorsLevel1 = 42,
		ProtossGroundArmorsLevel2 = 43,
		ProtossGroundArmorsLevel3 = 44,
		ProtossShieldsLevel1 = 45,
		ProtossShieldsLevel2 = 46,
		ProtossShieldsLevel3 = 47,
		ZergMeleeWeaponsLevel1 = 53,
		ZergMeleeWeaponsLevel2 = 54,
		ZergMeleeWeaponsLevel3 = 55,
		ZergGroundArmorsLevel1 = 56,
		ZergGroundArmorsLevel2 = 57,
		ZergGroundArmorsLevel3 = 58,
		ZergMissileWeaponsLevel1 = 59,
		ZergMissileWeaponsLevel2 = 60,
		ZergMissileWeaponsLevel3 = 61,
		Burrow = 64,
		AdrenalGlands = 65,
		MetabolicBoost = 66,
		ZergFlyerWeaponsLevel1 = 68,
		ZergFlyerWeaponsLevel2 = 69,
		ZergFlyerWeaponsLevel3 = 70,
		ZergFlyerArmorsLevel1 = 71,
		ZergFlyerArmorsLevel2 = 72,
		ZergFlyerArmorsLevel3 = 73,
		ProtossAirWeaponsLevel1 = 78,
		ProtossAirWeaponsLevel2 = 79,
		ProtossAirWeaponsLevel3 = 80,
		ProtossAirArmorsLevel1 = 81,
		ProtossAirArmorsLevel2 = 82,
		ProtossAirArmorsLevel3 = 83,
		WarpGateResearch = 84,
		Charge = 86,
		BlinkTech = 87,
		AnabolicSynthesis = 88,
		PhoenixRangeUpgrade = 99,
		TerranVehicleAndShipArmorsLevel1 = 116,
		TerranVehicleAndShipArmorsLevel2 = 117,
		TerranVehicleAndShipArmorsLevel3 = 118,
		AdeptPiercingAttack = 130,
		EvolveGroovedSpines = 134,
		EvolveMuscularAugments = 135,
	}
}

id_type! {
	/// Buff identifier.
	BuffId {
		Null = 0,
		GuardianShield = 2,
		GravitonBeam = 5,
		QueenSpawnLarvaTimer = 11,
		StimpackMarauder = 24,
		Stimpack = 27,
		CarryMineralFieldMinerals = 271,
		CarryHighYieldMineralFieldMinerals = 272,
		CarryHarvestableVespeneGeyserGas = 273,
		CarryHarvestableVespeneGeyserGasProtoss = 274,
		CarryHarvestableVespeneGeyserGasZerg = 275,
		ChronoBoostEnergyCost = 281,
		RavenShredderMissileTint = 295,
	}
}

id_type! {
	/// Effect identifier. Values above `LurkerMP` are synthesised by the
	/// library for effect-like units and never appear on the wire.
	EffectId {
		Null = 0,
		PsiStormPersistent = 1,
		GuardianShieldPersistent = 2,
		TemporalFieldGrowingBubbleCreatePersistent = 3,
		TemporalFieldAfterBubbleCreatePersistent = 4,
		ThermalLancesForward = 5,
		ScannerSweep = 6,
		NukePersistent = 7,
		LiberatorTargetMorphDelayPersistent = 8,
		LiberatorTargetMorphPersistent = 9,
		BlindingCloudCP = 10,
		RavagerCorrosiveBileCP = 11,
		LurkerMP = 12,
		KD8Charge = 10001,
		ParasiticBombDummy = 10002,
		ForceField = 10003,
	}
}

impl UnitTypeId {
	#[inline]
	pub fn is_worker(self) -> bool {
		matches!(self, UnitTypeId::SCV | UnitTypeId::Drone | UnitTypeId::Probe)
	}
	#[inline]
	pub fn is_townhall(self) -> bool {
		matches!(
			self,
			UnitTypeId::CommandCenter
				| UnitTypeId::OrbitalCommand
				| UnitTypeId::PlanetaryFortress
				| UnitTypeId::CommandCenterFlying
				| UnitTypeId::OrbitalCommandFlying
				| UnitTypeId::Hatchery
				| UnitTypeId::Lair
				| UnitTypeId::Hive
				| UnitTypeId::Nexus
		)
	}
	#[inline]
	pub fn is_addon(self) -> bool {
		matches!(
			self,
			UnitTypeId::TechLab
				| UnitTypeId::Reactor
				| UnitTypeId::BarracksTechLab
				| UnitTypeId::BarracksReactor
				| UnitTypeId::FactoryTechLab
				| UnitTypeId::FactoryReactor
				| UnitTypeId::StarportTechLab
				| UnitTypeId::StarportReactor
		)
	}
	#[inline]
	pub fn is_gas_building(self) -> bool {
		matches!(
			self,
			UnitTypeId::Refinery
				| UnitTypeId::RefineryRich
				| UnitTypeId::Extractor
				| UnitTypeId::ExtractorRich
				| UnitTypeId::Assimilator
				| UnitTypeId::AssimilatorRich
		)
	}
	#[inline]
	pub fn is_melee(self) -> bool {
		matches!(
			self,
			UnitTypeId::SCV
				| UnitTypeId::Drone
				| UnitTypeId::DroneBurrowed
				| UnitTypeId::Probe
				| UnitTypeId::Zergling
				| UnitTypeId::ZerglingBurrowed
				| UnitTypeId::BanelingCocoon
				| UnitTypeId::Baneling
				| UnitTypeId::BanelingBurrowed
				| UnitTypeId::Zealot
				| UnitTypeId::DarkTemplar
				| UnitTypeId::Ultralisk
				| UnitTypeId::UltraliskBurrowed
		)
	}
	#[inline]
	pub fn is_changeling(self) -> bool {
		matches!(
			self,
			UnitTypeId::Changeling
				| UnitTypeId::ChangelingZealot
				| UnitTypeId::ChangelingMarineShield
				| UnitTypeId::ChangelingMarine
				| UnitTypeId::ChangelingZerglingWings
				| UnitTypeId::ChangelingZergling
		)
	}
	#[inline]
	pub fn is_mineral(self) -> bool {
		matches!(
			self,
			UnitTypeId::MineralField
				| UnitTypeId::MineralField750
				| UnitTypeId::RichMineralField
				| UnitTypeId::RichMineralField750
				| UnitTypeId::LabMineralField
				| UnitTypeId::LabMineralField750
				| UnitTypeId::PurifierMineralField
				| UnitTypeId::PurifierMineralField750
				| UnitTypeId::PurifierRichMineralField
				| UnitTypeId::PurifierRichMineralField750
				| UnitTypeId::BattleStationMineralField
				| UnitTypeId::BattleStationMineralField750
		)
	}
	#[inline]
	pub fn is_geyser(self) -> bool {
		matches!(
			self,
			UnitTypeId::VespeneGeyser
				| UnitTypeId::SpacePlatformGeyser
				| UnitTypeId::RichVespeneGeyser
				| UnitTypeId::ProtossVespeneGeyser
				| UnitTypeId::PurifierVespeneGeyser
				| UnitTypeId::ShakurasVespeneGeyser
		)
	}
	#[inline]
	pub fn is_techlab(self) -> bool {
		matches!(
			self,
			UnitTypeId::TechLab
				| UnitTypeId::BarracksTechLab
				| UnitTypeId::FactoryTechLab
				| UnitTypeId::StarportTechLab
		)
	}
	#[inline]
	pub fn is_reactor(self) -> bool {
		matches!(
			self,
			UnitTypeId::Reactor
				| UnitTypeId::BarracksReactor
				| UnitTypeId::FactoryReactor
				| UnitTypeId::StarportReactor
		)
	}
	#[inline]
	pub fn is_inhibitor_zone(self) -> bool {
		matches!(
			self,
			UnitTypeId::InhibitorZoneSmall | UnitTypeId::InhibitorZoneMedium | UnitTypeId::InhibitorZoneLarge
		)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn unknown_ids_round_trip() {
		let id = UnitTypeId::from(987_654);
		assert_eq!(u32::from(id), 987_654);
		assert_eq!(id.name(), None);
		assert_eq!(format!("{:?}", id), "UnitTypeId(987654)");
	}

	#[test]
	fn known_ids_print_their_name() {
		assert_eq!(format!("{:?}", UnitTypeId::SCV), "UnitTypeId(SCV)");
		assert_eq!(UnitTypeId(45), UnitTypeId::SCV);
		assert!(UnitTypeId::Drone.is_worker());
		assert!(UnitTypeId::Hive.is_townhall());
		assert!(!UnitTypeId::Marine.is_melee());
	}
}
