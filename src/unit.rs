//! The unit entity: decoded state, derived predicates, the damage engine
//! and the command methods bots call every frame.

use crate::{
	command::{Commander, Target},
	constants::{
		RaceValues, BONUS_DAMAGE_PER_UPGRADE, DAMAGE_PER_UPGRADE, MISSED_WEAPONS, WARPGATE_ABILITIES,
	},
	distance::Distance,
	game_data::{Attribute, Cost, GameData, TargetType, UnitTypeData, Weapon},
	geometry::{Point2, Point3},
	ids::{AbilityId, BuffId, UnitTypeId, UpgradeId},
	FromProto, FromProtoData, IntoSC2, Rs, Rw,
};
use rustc_hash::{FxHashMap, FxHashSet};
use sc2_proto::raw::{
	Alliance as ProtoAlliance, CloakState as ProtoCloakState, DisplayType as ProtoDisplayType,
	Unit as ProtoUnit,
};

/// Frame data shared by every unit through an `Rc`.
pub struct DataForUnit {
	pub(crate) commander: Rw<Commander>,
	pub game_data: Rs<GameData>,
	pub race_values: Rs<RaceValues>,
	pub techlab_tags: Rw<FxHashSet<u64>>,
	pub reactor_tags: Rw<FxHashSet<u64>>,
	pub upgrades: Rw<FxHashSet<UpgradeId>>,
	pub enemy_upgrades: Rw<FxHashSet<UpgradeId>>,
	/// health + shield of every unit on the previous frame.
	pub last_units_hits: Rw<FxHashMap<u64, f32>>,
	/// abilities available to own units this frame.
	pub available_abilities: Rw<FxHashMap<u64, FxHashSet<AbilityId>>>,
	pub game_loop: Rw<u32>,
}
pub type SharedUnitData = Rs<DataForUnit>;

/// How the unit is known to the observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayType {
	/// Fully visible right now.
	Visible,
	/// Remembered structure position inside the fog.
	Snapshot,
	/// Cloaked or burrowed, shown by detection only.
	Hidden,
	/// Queued structure that is not started yet.
	Placeholder,
}
impl FromProto<ProtoDisplayType> for DisplayType {
	fn from_proto(display: ProtoDisplayType) -> Self {
		match display {
			ProtoDisplayType::Visible => DisplayType::Visible,
			ProtoDisplayType::Snapshot => DisplayType::Snapshot,
			ProtoDisplayType::Hidden => DisplayType::Hidden,
			ProtoDisplayType::Placeholder => DisplayType::Placeholder,
		}
	}
}

/// Whose unit this is, from the observer's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alliance {
	Own,
	Ally,
	Neutral,
	Enemy,
}
impl Alliance {
	pub fn is_mine(self) -> bool {
		matches!(self, Alliance::Own)
	}
	pub fn is_enemy(self) -> bool {
		matches!(self, Alliance::Enemy)
	}
}
impl FromProto<ProtoAlliance> for Alliance {
	fn from_proto(alliance: ProtoAlliance) -> Self {
		match alliance {
			ProtoAlliance::value_Self => Alliance::Own,
			ProtoAlliance::Ally => Alliance::Ally,
			ProtoAlliance::Neutral => Alliance::Neutral,
			ProtoAlliance::Enemy => Alliance::Enemy,
		}
	}
}

/// Cloak state reported by the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloakState {
	CloakedUnknown,
	Cloaked,
	CloakedDetected,
	NotCloaked,
	CloakedAllied,
}
impl FromProto<ProtoCloakState> for CloakState {
	fn from_proto(state: ProtoCloakState) -> Self {
		match state {
			ProtoCloakState::CloakedUnknown => CloakState::CloakedUnknown,
			ProtoCloakState::Cloaked => CloakState::Cloaked,
			ProtoCloakState::CloakedDetected => CloakState::CloakedDetected,
			ProtoCloakState::NotCloaked => CloakState::NotCloaked,
			ProtoCloakState::CloakedAllied => CloakState::CloakedAllied,
		}
	}
}

/// One entry of a unit's order queue.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitOrder {
	pub ability: AbilityId,
	pub target: Target,
	pub progress: f32,
}

/// Unit riding inside a transport.
#[derive(Debug, Clone)]
pub struct PassengerUnit {
	pub tag: u64,
	pub type_id: UnitTypeId,
	pub health: f32,
	pub health_max: f32,
	pub shield: f32,
	pub shield_max: f32,
	pub energy: f32,
	pub energy_max: f32,
}

/// Rally point of a production structure.
#[derive(Debug, Clone, Copy)]
pub struct RallyTarget {
	pub point: Point2,
	pub tag: Option<u64>,
}

/// A single unit, structure or neutral object.
#[derive(Clone)]
pub struct Unit {
	data: SharedUnitData,
	/// Dense index into the per-frame distance cache.
	pub(crate) distance_index: Option<usize>,

	pub display_type: DisplayType,
	pub alliance: Alliance,
	pub tag: u64,
	pub type_id: UnitTypeId,
	pub owner: u32,
	pub position: Point2,
	pub position3d: Point3,
	pub facing: f32,
	pub radius: f32,
	pub build_progress: f32,
	pub cloak: CloakState,
	pub buffs: FxHashSet<BuffId>,
	pub detect_range: f32,
	pub radar_range: f32,
	pub is_blip: bool,
	pub is_powered: bool,
	pub is_active: bool,
	pub attack_upgrade_level: i32,
	pub armor_upgrade_level: i32,
	pub shield_upgrade_level: i32,

	// Not populated for snapshots.
	pub health: Option<f32>,
	pub health_max: Option<f32>,
	pub shield: Option<f32>,
	pub shield_max: Option<f32>,
	pub energy: Option<f32>,
	pub energy_max: Option<f32>,
	pub mineral_contents: Option<u32>,
	pub vespene_contents: Option<u32>,
	pub is_flying: bool,
	pub is_burrowed: bool,
	pub is_hallucination: bool,

	// Own units only.
	pub orders: Vec<UnitOrder>,
	pub addon_tag: Option<u64>,
	pub passengers: Vec<PassengerUnit>,
	pub cargo_space_taken: Option<u32>,
	pub cargo_space_max: Option<u32>,
	pub assigned_harvesters: Option<u32>,
	pub ideal_harvesters: Option<u32>,
	pub weapon_cooldown: Option<f32>,
	pub engaged_target_tag: Option<u64>,
	pub rally_targets: Vec<RallyTarget>,
}

impl Unit {
	// ----- static data -----

	/// Catalog entry of this unit's type.
	pub fn type_data(&self) -> Option<&UnitTypeData> {
		self.data.game_data.units.get(&self.type_id)
	}
	pub fn name(&self) -> Option<&str> {
		self.type_data().map(|data| data.name.as_str())
	}
	pub fn cost(&self) -> Cost {
		self.type_data().map(UnitTypeData::cost).unwrap_or_default()
	}
	/// Supply this unit occupies.
	pub fn supply_cost(&self) -> f32 {
		self.type_data().map_or(0.0, |data| data.food_required)
	}
	pub fn has_attribute(&self, attribute: Attribute) -> bool {
		self.type_data().map_or(false, |data| data.has_attribute(attribute))
	}
	pub fn is_structure(&self) -> bool {
		self.has_attribute(Attribute::Structure)
	}
	pub fn is_light(&self) -> bool {
		self.has_attribute(Attribute::Light)
	}
	pub fn is_armored(&self) -> bool {
		self.has_attribute(Attribute::Armored)
	}
	pub fn is_biological(&self) -> bool {
		self.has_attribute(Attribute::Biological)
	}
	pub fn is_mechanical(&self) -> bool {
		self.has_attribute(Attribute::Mechanical)
	}
	pub fn is_massive(&self) -> bool {
		self.has_attribute(Attribute::Massive)
	}
	/// Footprint radius of the structure this unit's creation ability places.
	pub fn footprint_radius(&self) -> Option<f32> {
		self.type_data()
			.and_then(|data| data.ability)
			.and_then(|ability| self.data.game_data.abilities.get(&ability))
			.and_then(|ability| ability.footprint_radius)
	}

	// ----- identity and ownership -----

	pub fn is_worker(&self) -> bool {
		self.type_id.is_worker()
	}
	pub fn is_townhall(&self) -> bool {
		self.type_id.is_townhall()
	}
	pub fn is_addon(&self) -> bool {
		self.type_id.is_addon()
	}
	pub fn is_melee(&self) -> bool {
		self.type_id.is_melee()
	}
	pub fn is_mineral(&self) -> bool {
		self.type_id.is_mineral()
	}
	pub fn is_geyser(&self) -> bool {
		self.type_id.is_geyser()
	}
	pub fn is_detector(&self) -> bool {
		matches!(
			self.type_id,
			UnitTypeId::Observer
				| UnitTypeId::ObserverSiegeMode
				| UnitTypeId::Raven
				| UnitTypeId::Overseer
				| UnitTypeId::OverseerSiegeMode
				| UnitTypeId::MissileTurret
				| UnitTypeId::SporeCrawler
				| UnitTypeId::PhotonCannon
		)
	}
	pub fn is_mine(&self) -> bool {
		self.alliance.is_mine()
	}
	pub fn is_enemy(&self) -> bool {
		self.alliance.is_enemy()
	}
	pub fn is_visible(&self) -> bool {
		matches!(self.display_type, DisplayType::Visible)
	}
	pub fn is_snapshot(&self) -> bool {
		matches!(self.display_type, DisplayType::Snapshot)
	}
	pub fn is_hidden(&self) -> bool {
		matches!(self.display_type, DisplayType::Hidden)
	}
	pub fn is_placeholder(&self) -> bool {
		matches!(self.display_type, DisplayType::Placeholder)
	}
	pub fn is_cloaked(&self) -> bool {
		matches!(
			self.cloak,
			CloakState::Cloaked | CloakState::CloakedDetected | CloakState::CloakedAllied
		)
	}
	pub fn is_revealed(&self) -> bool {
		matches!(self.cloak, CloakState::CloakedDetected)
	}

	// ----- state -----

	/// True once construction finished.
	pub fn is_ready(&self) -> bool {
		(self.build_progress - 1.0).abs() < f32::EPSILON || self.build_progress >= 1.0
	}
	pub fn has_buff(&self, buff: BuffId) -> bool {
		self.buffs.contains(&buff)
	}
	pub fn has_any_buff<B: IntoIterator<Item = BuffId>>(&self, buffs: B) -> bool {
		buffs.into_iter().any(|b| self.buffs.contains(&b))
	}
	pub fn is_carrying_minerals(&self) -> bool {
		self.has_any_buff([
			BuffId::CarryMineralFieldMinerals,
			BuffId::CarryHighYieldMineralFieldMinerals,
		])
	}
	pub fn is_carrying_vespene(&self) -> bool {
		self.has_any_buff([
			BuffId::CarryHarvestableVespeneGeyserGas,
			BuffId::CarryHarvestableVespeneGeyserGasProtoss,
			BuffId::CarryHarvestableVespeneGeyserGasZerg,
		])
	}
	pub fn is_carrying_resource(&self) -> bool {
		self.is_carrying_minerals() || self.is_carrying_vespene()
	}
	/// Flying for targeting purposes (includes units lifted by graviton beam).
	pub fn is_airborne(&self) -> bool {
		self.is_flying || self.has_buff(BuffId::GravitonBeam)
	}
	/// health + shield, when known.
	pub fn hits(&self) -> Option<f32> {
		match (self.health, self.shield) {
			(Some(health), Some(shield)) => Some(health + shield),
			(Some(health), None) => Some(health),
			(None, Some(shield)) => Some(shield),
			(None, None) => None,
		}
	}
	/// Damage received since the previous frame.
	pub fn damage_taken(&self) -> f32 {
		let current = match self.hits() {
			Some(hits) => hits,
			None => return 0.0,
		};
		self.data
			.last_units_hits
			.borrow()
			.get(&self.tag)
			.map_or(0.0, |last| (last - current).max(0.0))
	}
	pub fn is_attacked(&self) -> bool {
		self.damage_taken() > 0.0
	}
	pub fn has_techlab(&self) -> bool {
		self.addon_tag
			.map_or(false, |tag| self.data.techlab_tags.borrow().contains(&tag))
	}
	pub fn has_reactor(&self) -> bool {
		self.addon_tag
			.map_or(false, |tag| self.data.reactor_tags.borrow().contains(&tag))
	}
	/// Abilities the game reported as available for this unit this frame.
	pub fn has_ability(&self, ability: AbilityId) -> bool {
		self.data
			.available_abilities
			.borrow()
			.get(&self.tag)
			.map_or(false, |abilities| abilities.contains(&ability))
	}

	// ----- orders -----

	pub fn is_idle(&self) -> bool {
		self.orders.is_empty()
	}
	/// Idle, or almost done with the current order.
	pub fn is_almost_idle(&self) -> bool {
		self.is_idle() || (self.orders.len() == 1 && self.orders[0].progress >= 0.95)
	}
	pub fn is_using(&self, ability: AbilityId) -> bool {
		self.ordered_ability().map_or(false, |a| a == ability)
	}
	pub fn is_using_any<A: IntoIterator<Item = AbilityId>>(&self, abilities: A) -> bool {
		self.ordered_ability()
			.map_or(false, |a| abilities.into_iter().any(|ability| ability == a))
	}
	pub fn ordered_ability(&self) -> Option<AbilityId> {
		self.orders.first().map(|order| order.ability)
	}
	pub fn target(&self) -> Target {
		self.orders.first().map_or(Target::None, |order| order.target)
	}
	pub fn target_pos(&self) -> Option<Point2> {
		match self.target() {
			Target::Pos(pos) => Some(pos),
			_ => None,
		}
	}
	pub fn target_tag(&self) -> Option<u64> {
		match self.target() {
			Target::Tag(tag) => Some(tag),
			_ => None,
		}
	}
	pub fn is_moving(&self) -> bool {
		self.is_using_any([AbilityId::Move, AbilityId::MoveMove])
	}
	pub fn is_attacking(&self) -> bool {
		self.is_using_any([AbilityId::Attack, AbilityId::AttackAttack])
	}
	pub fn is_patrolling(&self) -> bool {
		self.is_using_any([AbilityId::Patrol, AbilityId::PatrolPatrol])
	}
	pub fn is_repairing(&self) -> bool {
		self.is_using(AbilityId::EffectRepair)
	}
	pub fn is_gathering(&self) -> bool {
		self.is_using(AbilityId::HarvestGather)
	}
	pub fn is_returning(&self) -> bool {
		self.is_using(AbilityId::HarvestReturn)
	}
	pub fn is_collecting(&self) -> bool {
		self.is_gathering() || self.is_returning()
	}
	/// Worker on the way to or at a construction site.
	pub fn is_constructing(&self) -> bool {
		self.ordered_ability()
			.map_or(false, |a| crate::constants::CONSTRUCTING_ABILITIES.contains(&a))
	}

	// ----- weapons and damage -----

	/// Weapons of this unit, with the catalog's blind spots patched: types
	/// the game reports without weapons (battlecruiser, bunker, baneling)
	/// use a static table, cocoons fall back to their unit alias, and
	/// changelings never attack.
	pub fn weapons(&self) -> Vec<Weapon> {
		if self.type_id.is_changeling() {
			return Vec::new();
		}
		let catalog = |id: UnitTypeId| {
			self.data
				.game_data
				.units
				.get(&id)
				.map(|data| data.weapons.clone())
				.filter(|weapons| !weapons.is_empty())
		};
		catalog(self.type_id)
			.or_else(|| MISSED_WEAPONS.get(&self.type_id).cloned())
			.or_else(|| self.type_data().and_then(|data| data.unit_alias).and_then(catalog))
			.unwrap_or_default()
	}
	pub fn can_attack(&self) -> bool {
		!self.weapons().is_empty()
	}
	pub fn can_attack_ground(&self) -> bool {
		self.weapons()
			.iter()
			.any(|w| w.target.covers(TargetType::Ground))
	}
	pub fn can_attack_air(&self) -> bool {
		self.weapons().iter().any(|w| w.target.covers(TargetType::Air))
	}
	pub fn can_attack_unit(&self, target: &Unit) -> bool {
		!self.eligible_weapons(target).is_empty()
	}
	pub fn ground_range(&self) -> f32 {
		self.weapons()
			.iter()
			.filter(|w| w.target.covers(TargetType::Ground))
			.map(|w| w.range)
			.fold(0.0, f32::max)
	}
	pub fn air_range(&self) -> f32 {
		self.weapons()
			.iter()
			.filter(|w| w.target.covers(TargetType::Air))
			.map(|w| w.range)
			.fold(0.0, f32::max)
	}
	/// Raw damage per second of the best weapon able to hit ground targets.
	pub fn ground_dps(&self) -> f32 {
		self.dps(TargetType::Ground)
	}
	/// Raw damage per second of the best weapon able to hit air targets.
	pub fn air_dps(&self) -> f32 {
		self.dps(TargetType::Air)
	}
	fn dps(&self, target: TargetType) -> f32 {
		self.weapons()
			.iter()
			.filter(|w| w.target.covers(target) && w.speed > 0.0)
			.map(|w| w.damage * w.attacks as f32 / w.speed)
			.fold(0.0, f32::max)
	}
	/// Damage per second against this specific target, upgrades and armor
	/// included. Zero when the target cannot be hit.
	pub fn dps_vs_target(&self, target: &Unit) -> f32 {
		let (damage, speed, _) = self.calculate_damage_vs(target);
		if speed > 0.0 {
			damage / speed
		} else {
			0.0
		}
	}
	pub fn on_cooldown(&self) -> bool {
		self.weapon_cooldown.map_or(false, |cooldown| cooldown > f32::EPSILON)
	}

	// ----- add-ons -----

	/// Position an add-on built by this structure will occupy.
	pub fn add_on_position(&self) -> Point2 {
		self.position.offset(2.5, -0.5)
	}
	/// Position to land on so this structure connects to an add-on
	/// standing at its current position.
	pub fn add_on_land_position(&self) -> Point2 {
		self.position.offset(-2.5, 0.5)
	}

	fn eligible_weapons(&self, target: &Unit) -> Vec<Weapon> {
		// Colossi are hit by both ground and air weapons.
		let air = target.is_airborne();
		let colossus = target.type_id == UnitTypeId::Colossus;
		self.weapons()
			.into_iter()
			.filter(|w| {
				colossus
					|| w.target
						.covers(if air { TargetType::Air } else { TargetType::Ground })
			})
			.collect()
	}

	fn range_upgrade_bonus(&self, weapon_target: TargetType) -> f32 {
		let upgrades = self.data.upgrades.borrow();
		let mut bonus = 0.0;
		match self.type_id {
			UnitTypeId::Hydralisk if upgrades.contains(&UpgradeId::EvolveGroovedSpines) => {
				bonus += 1.0;
			}
			UnitTypeId::Phoenix
				if weapon_target.covers(TargetType::Air)
					&& upgrades.contains(&UpgradeId::PhoenixRangeUpgrade) =>
			{
				bonus += 2.0;
			}
			UnitTypeId::MissileTurret | UnitTypeId::AutoTurret | UnitTypeId::PlanetaryFortress
				if upgrades.contains(&UpgradeId::HiSecAutoTracking) =>
			{
				bonus += 1.0;
			}
			_ => {}
		}
		bonus
	}

	fn speed_modifier(&self) -> f32 {
		let upgrades = self.data.upgrades.borrow();
		let mut modifier = 1.0;
		if self.has_any_buff([BuffId::Stimpack, BuffId::StimpackMarauder]) {
			modifier /= 1.5;
		}
		match self.type_id {
			UnitTypeId::Zergling | UnitTypeId::ZerglingBurrowed
				if upgrades.contains(&UpgradeId::AdrenalGlands) =>
			{
				modifier /= 1.4;
			}
			UnitTypeId::Adept if upgrades.contains(&UpgradeId::AdeptPiercingAttack) => {
				modifier /= 1.45;
			}
			_ => {}
		}
		modifier
	}

	/// Damage one full volley of the best eligible weapon deals to `target`,
	/// with the weapon's cooldown and effective range.
	///
	/// Accounts for attack and armor upgrade levels, attribute bonuses,
	/// guardian shield (+2 armor against attacks of range 2 or more), the
	/// anti-armor missile debuff (−2), chitinous plating, terran building
	/// armor, shield armor before health armor, and a minimum of 0.5 damage
	/// per hit. Returns `(0, 0, 0)` when nothing can hit the target.
	pub fn calculate_damage_vs(&self, target: &Unit) -> (f32, f32, f32) {
		let weapons = self.eligible_weapons(target);
		if weapons.is_empty() {
			return (0.0, 0.0, 0.0);
		}

		let enemy_upgrades = self.data.enemy_upgrades.borrow();
		let target_data = target.type_data();

		let mut armor = target_data.map_or(0.0, |data| data.armor) + target.armor_upgrade_level as f32;
		let mut shield_armor = target.shield_upgrade_level as f32;
		if target.has_buff(BuffId::RavenShredderMissileTint) {
			armor -= 2.0;
			shield_armor -= 2.0;
		}
		if target.is_enemy() {
			if matches!(target.type_id, UnitTypeId::Ultralisk | UnitTypeId::UltraliskBurrowed)
				&& enemy_upgrades.contains(&UpgradeId::ChitinousPlating)
			{
				armor += 2.0;
			}
			if target.is_structure()
				&& target_data.map_or(false, |data| data.race == crate::player::Race::Terran)
				&& enemy_upgrades.contains(&UpgradeId::TerranBuildingArmor)
			{
				armor += 2.0;
			}
		}

		let upgrade_damage = *DAMAGE_PER_UPGRADE.get(&self.type_id).unwrap_or(&1.0);
		let levels = self.attack_upgrade_level.max(0) as f32;
		let speed_modifier = self.speed_modifier();
		let own_upgrades = self.data.upgrades.borrow();

		let mut best: Option<(f32, f32, f32)> = None;
		for weapon in weapons {
			let guarded = target.has_buff(BuffId::GuardianShield) && weapon.range >= 2.0;
			let effective_armor = if guarded { armor + 2.0 } else { armor };

			let mut damage = weapon.damage + levels * upgrade_damage;
			for (attribute, bonus) in &weapon.damage_bonus {
				if target.has_attribute(*attribute) {
					let mut bonus = *bonus;
					if let Some((upgrade_attribute, per_level)) =
						BONUS_DAMAGE_PER_UPGRADE.get(&self.type_id)
					{
						if upgrade_attribute == attribute {
							bonus += levels * per_level;
						}
					}
					damage += bonus;
				}
			}
			if matches!(self.type_id, UnitTypeId::Hellion | UnitTypeId::HellionTank)
				&& target.is_light()
				&& own_upgrades.contains(&UpgradeId::HighCapacityBarrels)
			{
				damage += 5.0;
			}

			// Hits land on the shield first, then on health.
			let mut remaining_shield = target.shield.unwrap_or(0.0);
			let mut dealt = 0.0;
			for _ in 0..weapon.attacks.max(1) {
				if remaining_shield > 0.0 {
					let hit = (damage - shield_armor).max(0.5);
					dealt += hit.min(remaining_shield);
					remaining_shield -= hit;
					if remaining_shield < 0.0 {
						let spill = -remaining_shield;
						let vs_health = (damage - effective_armor).max(0.5);
						dealt += spill.min(vs_health);
						remaining_shield = 0.0;
					}
				} else {
					dealt += (damage - effective_armor).max(0.5);
				}
			}

			let range = weapon.range + self.range_upgrade_bonus(weapon.target);
			let speed = weapon.speed * speed_modifier;
			if best.map_or(true, |(d, _, _)| dealt > d) {
				best = Some((dealt, speed, range));
			}
		}
		best.unwrap_or((0.0, 0.0, 0.0))
	}

	/// Range against this target including upgrades, 0 when it cannot be hit.
	pub fn real_range_vs(&self, target: &Unit) -> f32 {
		self.calculate_damage_vs(target).2
	}

	/// True when `target` is inside `range + gap`, measured edge to edge.
	pub fn in_range(&self, target: &Unit, gap: f32) -> bool {
		let range = if target.is_airborne() {
			self.air_range()
		} else {
			self.ground_range()
		};
		self.in_distance(target, range + gap)
	}
	/// Like [`Unit::in_range`] with the upgraded range.
	pub fn in_real_range(&self, target: &Unit, gap: f32) -> bool {
		self.in_distance(target, self.real_range_vs(target) + gap)
	}
	/// True when the target is within an ability's cast range plus `gap`.
	pub fn in_ability_cast_range(&self, ability: AbilityId, target: &Unit, gap: f32) -> bool {
		self.data
			.game_data
			.abilities
			.get(&ability)
			.and_then(|data| data.cast_range)
			.map_or(false, |cast_range| self.in_distance(target, cast_range + gap))
	}

	fn in_distance(&self, target: &Unit, range: f32) -> bool {
		// Sieged tanks cannot hit inside their minimum range of 2.
		if self.type_id == UnitTypeId::SiegeTankSieged
			&& self.position.distance_squared(target.position) < 4.0
		{
			return false;
		}
		let total = self.radius + target.radius + range;
		self.position.distance_squared(target.position) <= total * total
	}

	// ----- commands -----

	/// Resolves an ability through the catalog's generic remapping, so the
	/// specific form a unit reports compares equal to the generic one.
	fn canonical_ability(&self, ability: AbilityId) -> AbilityId {
		self.data
			.game_data
			.abilities
			.get(&ability)
			.and_then(|data| data.remaps_to)
			.unwrap_or(ability)
	}

	/// Buffers a command for this unit.
	///
	/// Unqueued commands identical to the unit's current first order, or to
	/// the last intent buffered for it this frame, are dropped. Abilities
	/// compare through their remapping, so ordering the generic form on top
	/// of its specific form is still a duplicate.
	pub fn command(&self, ability: AbilityId, target: Target, queue: bool) {
		if !queue {
			let issued = self.canonical_ability(ability);
			if let Some(order) = self.orders.first() {
				if self.canonical_ability(order.ability) == issued && order.target == target {
					return;
				}
			}
			let commander = self.data.commander.borrow();
			if commander
				.last_intent_of(self.tag)
				.map_or(false, |(a, t, q)| !q && t == target && self.canonical_ability(a) == issued)
			{
				return;
			}
		}
		self.data
			.commander
			.borrow_mut()
			.command(self.tag, (ability, target, queue));
	}
	pub fn use_ability(&self, ability: AbilityId, queue: bool) {
		self.command(ability, Target::None, queue)
	}
	pub fn smart(&self, target: Target, queue: bool) {
		self.command(AbilityId::Smart, target, queue)
	}
	pub fn attack(&self, target: Target, queue: bool) {
		self.command(AbilityId::Attack, target, queue)
	}
	pub fn move_to(&self, target: Target, queue: bool) {
		self.command(AbilityId::Move, target, queue)
	}
	pub fn hold_position(&self, queue: bool) {
		self.command(AbilityId::HoldPosition, Target::None, queue)
	}
	pub fn patrol(&self, target: Target, queue: bool) {
		self.command(AbilityId::Patrol, target, queue)
	}
	pub fn stop(&self, queue: bool) {
		self.command(AbilityId::Stop, Target::None, queue)
	}
	pub fn gather(&self, resource: u64, queue: bool) {
		self.command(AbilityId::HarvestGather, Target::Tag(resource), queue)
	}
	pub fn return_resource(&self, queue: bool) {
		self.command(AbilityId::HarvestReturn, Target::None, queue)
	}
	pub fn repair(&self, target: u64, queue: bool) {
		self.command(AbilityId::EffectRepair, Target::Tag(target), queue)
	}
	pub fn toggle_autocast(&self, ability: AbilityId) {
		self.data.commander.borrow_mut().toggle_autocast(self.tag, ability)
	}
	/// Orders construction of a structure at a position.
	pub fn build(&self, structure: UnitTypeId, pos: Point2, queue: bool) {
		if let Some(ability) = self
			.data
			.game_data
			.units
			.get(&structure)
			.and_then(|data| data.ability)
		{
			self.command(ability, Target::Pos(pos), queue);
		}
	}
	/// Orders construction of a gas building on a geyser.
	pub fn build_gas(&self, geyser: u64, queue: bool) {
		let gas = self.data.race_values.gas;
		if let Some(ability) = self.data.game_data.units.get(&gas).and_then(|data| data.ability) {
			self.command(ability, Target::Tag(geyser), queue);
		}
	}
	/// Orders training of a unit.
	pub fn train(&self, unit: UnitTypeId, queue: bool) {
		if let Some(ability) = self.data.game_data.units.get(&unit).and_then(|data| data.ability) {
			self.command(ability, Target::None, queue);
		}
	}
	/// Orders research of an upgrade.
	pub fn research(&self, upgrade: UpgradeId, queue: bool) {
		if let Some(data) = self.data.game_data.upgrades.get(&upgrade) {
			self.command(data.ability, Target::None, queue);
		}
	}
	/// Warps in a unit near `pos` (warp gates only).
	pub fn warp_in(&self, unit: UnitTypeId, pos: Point2) {
		if let Some(ability) = WARPGATE_ABILITIES.get(&unit) {
			self.command(*ability, Target::Pos(pos), false);
		}
	}
	pub fn cancel_building(&self, queue: bool) {
		self.command(AbilityId::CancelBuildInProgress, Target::None, queue)
	}
	pub fn cancel_queue(&self, queue: bool) {
		self.command(AbilityId::CancelLast, Target::None, queue)
	}
}

impl From<&Unit> for Point2 {
	fn from(unit: &Unit) -> Self {
		unit.position
	}
}
impl From<Unit> for Point2 {
	fn from(unit: Unit) -> Self {
		unit.position
	}
}

impl std::fmt::Debug for Unit {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		f.debug_struct("Unit")
			.field("tag", &self.tag)
			.field("type_id", &self.type_id)
			.field("alliance", &self.alliance)
			.field("position", &self.position)
			.finish()
	}
}

impl FromProtoData<&ProtoUnit> for Unit {
	fn from_proto_data(data: SharedUnitData, u: &ProtoUnit) -> Self {
		let position3d: Point3 = u.get_pos().into_sc2();
		Self {
			data,
			distance_index: None,
			display_type: u.get_display_type().into_sc2(),
			alliance: u.get_alliance().into_sc2(),
			tag: u.get_tag(),
			type_id: UnitTypeId(u.get_unit_type()),
			owner: u.get_owner() as u32,
			position: position3d.into(),
			position3d,
			facing: u.get_facing(),
			radius: u.get_radius(),
			build_progress: u.get_build_progress(),
			cloak: u.get_cloak().into_sc2(),
			buffs: u.get_buff_ids().iter().map(|b| BuffId(*b)).collect(),
			detect_range: u.get_detect_range(),
			radar_range: u.get_radar_range(),
			is_blip: u.get_is_blip(),
			is_powered: u.get_is_powered(),
			is_active: u.get_is_active(),
			attack_upgrade_level: u.get_attack_upgrade_level(),
			armor_upgrade_level: u.get_armor_upgrade_level(),
			shield_upgrade_level: u.get_shield_upgrade_level(),
			health: u.has_health().then(|| u.get_health()),
			health_max: u.has_health_max().then(|| u.get_health_max()),
			shield: u.has_shield().then(|| u.get_shield()),
			shield_max: u.has_shield_max().then(|| u.get_shield_max()),
			energy: u.has_energy().then(|| u.get_energy()),
			energy_max: u.has_energy_max().then(|| u.get_energy_max()),
			mineral_contents: u.has_mineral_contents().then(|| u.get_mineral_contents() as u32),
			vespene_contents: u.has_vespene_contents().then(|| u.get_vespene_contents() as u32),
			is_flying: u.get_is_flying(),
			is_burrowed: u.get_is_burrowed(),
			is_hallucination: u.get_is_hallucination(),
			orders: u
				.get_orders()
				.iter()
				.map(|order| UnitOrder {
					ability: AbilityId(order.get_ability_id()),
					target: if order.has_target_world_space_pos() {
						Target::Pos(
							Point2::from(Point3::from_proto(order.get_target_world_space_pos()))
								.round_to_half(),
						)
					} else if order.has_target_unit_tag() {
						Target::Tag(order.get_target_unit_tag())
					} else {
						Target::None
					},
					progress: order.get_progress(),
				})
				.collect(),
			addon_tag: u.has_add_on_tag().then(|| u.get_add_on_tag()),
			passengers: u
				.get_passengers()
				.iter()
				.map(|p| PassengerUnit {
					tag: p.get_tag(),
					type_id: UnitTypeId(p.get_unit_type()),
					health: p.get_health(),
					health_max: p.get_health_max(),
					shield: p.get_shield(),
					shield_max: p.get_shield_max(),
					energy: p.get_energy(),
					energy_max: p.get_energy_max(),
				})
				.collect(),
			cargo_space_taken: u.has_cargo_space_taken().then(|| u.get_cargo_space_taken() as u32),
			cargo_space_max: u.has_cargo_space_max().then(|| u.get_cargo_space_max() as u32),
			assigned_harvesters: u.has_assigned_harvesters().then(|| u.get_assigned_harvesters() as u32),
			ideal_harvesters: u.has_ideal_harvesters().then(|| u.get_ideal_harvesters() as u32),
			weapon_cooldown: u.has_weapon_cooldown().then(|| u.get_weapon_cooldown()),
			engaged_target_tag: u.has_engaged_target_tag().then(|| u.get_engaged_target_tag()),
			rally_targets: u
				.get_rally_targets()
				.iter()
				.map(|r| RallyTarget {
					point: Point3::from_proto(r.get_point()).into(),
					tag: r.has_tag().then(|| r.get_tag()),
				})
				.collect(),
		}
	}
}

impl Point2 {
	// Order targets come back from the game snapped to the pixel grid;
	// normalising keeps the duplicate filter comparable with bot input.
	fn round_to_half(self) -> Self {
		Self {
			x: (self.x * 2.0).round() / 2.0,
			y: (self.y * 2.0).round() / 2.0,
		}
	}
}

#[cfg(test)]
pub(crate) mod test_fixtures {
	use super::*;
	use crate::game_data::{AbilityData, AbilityTarget, UnitTypeData};
	use crate::player::Race;

	pub fn shared_data(game_data: GameData) -> SharedUnitData {
		Rs::new(DataForUnit {
			commander: Rw::default(),
			game_data: Rs::new(game_data),
			race_values: Rs::new(crate::constants::RACE_VALUES[&Race::Terran].clone()),
			techlab_tags: Rw::default(),
			reactor_tags: Rw::default(),
			upgrades: Rw::default(),
			enemy_upgrades: Rw::default(),
			last_units_hits: Rw::default(),
			available_abilities: Rw::default(),
			game_loop: Rw::default(),
		})
	}

	pub fn unit_type(id: UnitTypeId, name: &str) -> UnitTypeData {
		UnitTypeData {
			id,
			name: name.to_string(),
			available: true,
			cargo_size: 0,
			mineral_cost: 0,
			vespene_cost: 0,
			food_required: 0.0,
			food_provided: 0.0,
			ability: None,
			race: Race::Random,
			build_time: 0.0,
			has_vespene: false,
			has_minerals: false,
			sight_range: 9.0,
			tech_alias: vec![],
			unit_alias: None,
			tech_requirement: None,
			require_attached: false,
			attributes: vec![],
			movement_speed: 2.25,
			armor: 0.0,
			weapons: vec![],
		}
	}

	pub fn ability(id: AbilityId, link_name: &str) -> AbilityData {
		AbilityData {
			id,
			link_name: link_name.to_string(),
			button_name: String::new(),
			friendly_name: String::new(),
			remaps_to: None,
			available: true,
			target: AbilityTarget::None,
			allow_minimap: false,
			allow_autocast: false,
			is_building: false,
			footprint_radius: None,
			cast_range: None,
		}
	}

	pub fn unit(data: &SharedUnitData, tag: u64, type_id: UnitTypeId, pos: Point2) -> Unit {
		Unit {
			data: Rs::clone(data),
			distance_index: None,
			display_type: DisplayType::Visible,
			alliance: Alliance::Own,
			tag,
			type_id,
			owner: 1,
			position: pos,
			position3d: pos.to3(8.0),
			facing: 0.0,
			radius: 0.5,
			build_progress: 1.0,
			cloak: CloakState::NotCloaked,
			buffs: FxHashSet::default(),
			detect_range: 0.0,
			radar_range: 0.0,
			is_blip: false,
			is_powered: true,
			is_active: false,
			attack_upgrade_level: 0,
			armor_upgrade_level: 0,
			shield_upgrade_level: 0,
			health: Some(100.0),
			health_max: Some(100.0),
			shield: None,
			shield_max: None,
			energy: None,
			energy_max: None,
			mineral_contents: None,
			vespene_contents: None,
			is_flying: false,
			is_burrowed: false,
			is_hallucination: false,
			orders: vec![],
			addon_tag: None,
			passengers: vec![],
			cargo_space_taken: None,
			cargo_space_max: None,
			assigned_harvesters: None,
			ideal_harvesters: None,
			weapon_cooldown: None,
			engaged_target_tag: None,
			rally_targets: vec![],
		}
	}
}

#[cfg(test)]
mod tests {
	use super::test_fixtures::*;
	use super::*;
	use crate::game_data::Weapon;

	fn damage_fixture() -> (SharedUnitData, Unit, Unit) {
		let mut game_data = GameData::default();

		let mut ultralisk = unit_type(UnitTypeId::Ultralisk, "Ultralisk");
		ultralisk.attributes = vec![Attribute::Armored, Attribute::Biological, Attribute::Massive];
		ultralisk.weapons = vec![Weapon {
			target: TargetType::Ground,
			damage: 26.0,
			damage_bonus: vec![],
			attacks: 1,
			range: 1.0,
			speed: 0.61,
		}];
		game_data.units.insert(ultralisk.id, ultralisk);

		let mut marauder = unit_type(UnitTypeId::Marauder, "Marauder");
		marauder.attributes = vec![Attribute::Armored, Attribute::Biological];
		marauder.armor = 1.0;
		game_data.units.insert(marauder.id, marauder);

		let data = shared_data(game_data);
		let mut attacker = unit(&data, 1, UnitTypeId::Ultralisk, Point2::new(10.0, 10.0));
		attacker.attack_upgrade_level = 3;
		let mut target = unit(&data, 2, UnitTypeId::Marauder, Point2::new(11.0, 10.0));
		target.alliance = Alliance::Enemy;
		target.health = Some(125.0);
		target.health_max = Some(125.0);
		(data, attacker, target)
	}

	#[test]
	fn upgraded_ultralisk_hits_marauder_for_34() {
		let (_data, attacker, target) = damage_fixture();
		let (damage, _speed, range) = attacker.calculate_damage_vs(&target);
		// 26 base + 3 levels * 3 per level = 35, minus 1 armor.
		assert_eq!(damage, 34.0);
		assert_eq!(range, 1.0);
		let after_two_hits = target.health.unwrap() - 2.0 * damage;
		assert_eq!(after_two_hits, 57.0);
	}

	#[test]
	fn melee_damage_ignores_guardian_shield() {
		let (_data, attacker, mut target) = damage_fixture();
		target.buffs.insert(BuffId::GuardianShield);
		let (damage, ..) = attacker.calculate_damage_vs(&target);
		assert_eq!(damage, 34.0);
	}

	#[test]
	fn damage_never_drops_below_half_per_hit() {
		let (_data, mut attacker, mut target) = damage_fixture();
		attacker.attack_upgrade_level = 0;
		target.armor_upgrade_level = 99;
		let (damage, ..) = attacker.calculate_damage_vs(&target);
		assert_eq!(damage, 0.5);
	}

	#[test]
	fn dps_follows_the_weapon_profile() {
		let (_data, attacker, target) = damage_fixture();
		// 26 damage, 1 attack, 0.61 cooldown.
		assert!((attacker.ground_dps() - 26.0 / 0.61).abs() < 1e-4);
		assert_eq!(attacker.air_dps(), 0.0);
		// Full volley of 34 (upgraded, after armor) every 0.61 seconds.
		assert!((attacker.dps_vs_target(&target) - 34.0 / 0.61).abs() < 1e-4);
		assert_eq!(target.dps_vs_target(&attacker), 0.0);
	}

	#[test]
	fn add_on_offsets_mirror_each_other() {
		let (data, attacker, _target) = damage_fixture();
		let addon = attacker.add_on_position();
		assert_eq!(addon, Point2::new(12.5, 9.5));
		// Landing at the mirrored offset puts the add-on slot on `addon`.
		let landed = unit(&data, 3, UnitTypeId::BarracksFlying, addon.offset(-2.5, 0.5));
		assert_eq!(landed.add_on_position(), addon);
		assert_eq!(attacker.add_on_land_position(), Point2::new(7.5, 10.5));
	}

	#[test]
	fn duplicate_unqueued_order_is_dropped() {
		let (data, mut attacker, _target) = damage_fixture();
		let pos = Point2::new(20.0, 20.0);
		attacker.orders = vec![UnitOrder {
			ability: AbilityId::Move,
			target: Target::Pos(pos),
			progress: 0.0,
		}];
		attacker.move_to(Target::Pos(pos), false);
		assert!(data.commander.borrow().is_empty());

		// A different target goes through.
		attacker.move_to(Target::Pos(Point2::new(30.0, 20.0)), false);
		assert!(!data.commander.borrow().is_empty());
	}

	#[test]
	fn remapped_ability_counts_as_the_same_order() {
		let mut game_data = GameData::default();
		let mut specific = ability(AbilityId::AttackAttack, "AttackAttack");
		specific.remaps_to = Some(AbilityId::Attack);
		game_data.abilities.insert(specific.id, specific);
		let data = shared_data(game_data);

		let pos = Point2::new(20.0, 20.0);
		let mut marine = unit(&data, 4, UnitTypeId::Marine, Point2::new(10.0, 10.0));
		// The game reports the specific form in the order queue.
		marine.orders = vec![UnitOrder {
			ability: AbilityId::AttackAttack,
			target: Target::Pos(pos),
			progress: 0.0,
		}];
		marine.attack(Target::Pos(pos), false);
		assert!(data.commander.borrow().is_empty());

		// Same pair buffered this frame: specific after generic is dropped too.
		marine.orders.clear();
		marine.command(AbilityId::Attack, Target::Pos(pos), false);
		marine.command(AbilityId::AttackAttack, Target::Pos(pos), false);
		let actions = data.commander.borrow_mut().build_actions();
		assert_eq!(actions.len(), 1);
	}

	#[test]
	fn repeated_intents_same_frame_are_dropped() {
		let (data, attacker, _target) = damage_fixture();
		let pos = Point2::new(20.0, 20.0);
		attacker.attack(Target::Pos(pos), false);
		attacker.attack(Target::Pos(pos), false);
		let actions = data.commander.borrow_mut().build_actions();
		assert_eq!(actions.len(), 1);
	}

	#[test]
	fn airborne_includes_graviton_lifted_units() {
		let (_data, _attacker, mut target) = damage_fixture();
		assert!(!target.is_airborne());
		target.buffs.insert(BuffId::GravitonBeam);
		assert!(target.is_airborne());
	}
}
