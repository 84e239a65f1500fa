//! Catalogs of abilities, unit types, upgrades, buffs and effects, decoded
//! once per session, plus the corrected cost calculation for creation
//! abilities.

use crate::{
	ids::{AbilityId, BuffId, EffectId, UnitTypeId, UpgradeId},
	player::Race,
	FromProto, IntoSC2,
};
use rustc_hash::FxHashMap;
use sc2_proto::{
	data::{
		AbilityData as ProtoAbilityData, AbilityData_Target, Attribute as ProtoAttribute,
		BuffData as ProtoBuffData, EffectData as ProtoEffectData, UnitTypeData as ProtoUnitTypeData,
		UpgradeData as ProtoUpgradeData, Weapon as ProtoWeapon, Weapon_TargetType,
	},
	sc2api::ResponseData,
};

/// Ability link names containing any of these are morphs that cost nothing.
const FREE_MORPH_MARKERS: &[&str] = &["Lower", "Raise", "Land", "Lift", "Hold", "Harvest"];

/// Price of a unit, structure or upgrade.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Cost {
	pub minerals: u32,
	pub vespene: u32,
	pub supply: f32,
	pub time: f32,
}

/// What a weapon or ability can be aimed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetType {
	Ground,
	Air,
	Any,
}
impl TargetType {
	/// True when this target class covers `other`.
	pub fn covers(self, other: TargetType) -> bool {
		self == TargetType::Any || other == TargetType::Any || self == other
	}
}
impl FromProto<Weapon_TargetType> for TargetType {
	fn from_proto(target: Weapon_TargetType) -> Self {
		match target {
			Weapon_TargetType::Ground => TargetType::Ground,
			Weapon_TargetType::Air => TargetType::Air,
			Weapon_TargetType::Any => TargetType::Any,
		}
	}
}

/// Kind of target an ability requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbilityTarget {
	None,
	Point,
	Unit,
	PointOrUnit,
	PointOrNone,
}
impl FromProto<AbilityData_Target> for AbilityTarget {
	fn from_proto(target: AbilityData_Target) -> Self {
		match target {
			AbilityData_Target::None => AbilityTarget::None,
			AbilityData_Target::Point => AbilityTarget::Point,
			AbilityData_Target::Unit => AbilityTarget::Unit,
			AbilityData_Target::PointOrUnit => AbilityTarget::PointOrUnit,
			AbilityData_Target::PointOrNone => AbilityTarget::PointOrNone,
		}
	}
}

/// Unit attribute the game uses for bonus damage and filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
	Light,
	Armored,
	Biological,
	Mechanical,
	Robotic,
	Psionic,
	Massive,
	Structure,
	Hover,
	Heroic,
	Summoned,
}
impl FromProto<ProtoAttribute> for Attribute {
	fn from_proto(attribute: ProtoAttribute) -> Self {
		match attribute {
			ProtoAttribute::Light => Attribute::Light,
			ProtoAttribute::Armored => Attribute::Armored,
			ProtoAttribute::Biological => Attribute::Biological,
			ProtoAttribute::Mechanical => Attribute::Mechanical,
			ProtoAttribute::Robotic => Attribute::Robotic,
			ProtoAttribute::Psionic => Attribute::Psionic,
			ProtoAttribute::Massive => Attribute::Massive,
			ProtoAttribute::Structure => Attribute::Structure,
			ProtoAttribute::Hover => Attribute::Hover,
			ProtoAttribute::Heroic => Attribute::Heroic,
			ProtoAttribute::Summoned => Attribute::Summoned,
		}
	}
}

/// One weapon of a unit type.
#[derive(Debug, Clone)]
pub struct Weapon {
	pub target: TargetType,
	pub damage: f32,
	pub damage_bonus: Vec<(Attribute, f32)>,
	pub attacks: u32,
	pub range: f32,
	pub speed: f32,
}
impl FromProto<&ProtoWeapon> for Weapon {
	fn from_proto(weapon: &ProtoWeapon) -> Self {
		Self {
			target: weapon.get_field_type().into_sc2(),
			damage: weapon.get_damage(),
			damage_bonus: weapon
				.get_damage_bonus()
				.iter()
				.map(|b| (b.get_attribute().into_sc2(), b.get_bonus()))
				.collect(),
			attacks: weapon.get_attacks(),
			range: weapon.get_range(),
			speed: weapon.get_speed(),
		}
	}
}

/// Catalog entry for an ability.
#[derive(Debug, Clone)]
pub struct AbilityData {
	pub id: AbilityId,
	pub link_name: String,
	pub button_name: String,
	pub friendly_name: String,
	pub remaps_to: Option<AbilityId>,
	pub available: bool,
	pub target: AbilityTarget,
	pub allow_minimap: bool,
	pub allow_autocast: bool,
	pub is_building: bool,
	pub footprint_radius: Option<f32>,
	pub cast_range: Option<f32>,
}
impl FromProto<&ProtoAbilityData> for AbilityData {
	fn from_proto(a: &ProtoAbilityData) -> Self {
		Self {
			id: AbilityId(a.get_ability_id()),
			link_name: a.get_link_name().to_string(),
			button_name: a.get_button_name().to_string(),
			friendly_name: a.get_friendly_name().to_string(),
			remaps_to: if a.has_remaps_to_ability_id() {
				Some(AbilityId(a.get_remaps_to_ability_id()))
			} else {
				None
			},
			available: a.get_available(),
			target: a.get_target().into_sc2(),
			allow_minimap: a.get_allow_minimap(),
			allow_autocast: a.get_allow_autocast(),
			is_building: a.get_is_building(),
			footprint_radius: if a.has_footprint_radius() {
				Some(a.get_footprint_radius())
			} else {
				None
			},
			cast_range: if a.has_cast_range() {
				Some(a.get_cast_range())
			} else {
				None
			},
		}
	}
}

/// Catalog entry for a unit type.
#[derive(Debug, Clone)]
pub struct UnitTypeData {
	pub id: UnitTypeId,
	pub name: String,
	pub available: bool,
	pub cargo_size: u32,
	pub mineral_cost: u32,
	pub vespene_cost: u32,
	pub food_required: f32,
	pub food_provided: f32,
	/// Ability that creates a unit of this type.
	pub ability: Option<AbilityId>,
	pub race: Race,
	pub build_time: f32,
	pub has_vespene: bool,
	pub has_minerals: bool,
	pub sight_range: f32,
	pub tech_alias: Vec<UnitTypeId>,
	pub unit_alias: Option<UnitTypeId>,
	pub tech_requirement: Option<UnitTypeId>,
	pub require_attached: bool,
	pub attributes: Vec<Attribute>,
	pub movement_speed: f32,
	pub armor: f32,
	pub weapons: Vec<Weapon>,
}
impl UnitTypeData {
	/// Raw price of one unit of this type.
	pub fn cost(&self) -> Cost {
		Cost {
			minerals: self.mineral_cost,
			vespene: self.vespene_cost,
			supply: self.food_required,
			time: self.build_time,
		}
	}
	pub fn has_attribute(&self, attribute: Attribute) -> bool {
		self.attributes.contains(&attribute)
	}
}
impl FromProto<&ProtoUnitTypeData> for UnitTypeData {
	fn from_proto(u: &ProtoUnitTypeData) -> Self {
		Self {
			id: UnitTypeId(u.get_unit_id()),
			name: u.get_name().to_string(),
			available: u.get_available(),
			cargo_size: u.get_cargo_size(),
			mineral_cost: u.get_mineral_cost(),
			vespene_cost: u.get_vespene_cost(),
			food_required: u.get_food_required(),
			food_provided: u.get_food_provided(),
			ability: if u.has_ability_id() {
				Some(AbilityId(u.get_ability_id()))
			} else {
				None
			},
			race: u.get_race().into_sc2(),
			build_time: u.get_build_time(),
			has_vespene: u.get_has_vespene(),
			has_minerals: u.get_has_minerals(),
			sight_range: u.get_sight_range(),
			tech_alias: u.get_tech_alias().iter().map(|a| UnitTypeId(*a)).collect(),
			unit_alias: if u.has_unit_alias() {
				Some(UnitTypeId(u.get_unit_alias()))
			} else {
				None
			},
			tech_requirement: if u.has_tech_requirement() {
				Some(UnitTypeId(u.get_tech_requirement()))
			} else {
				None
			},
			require_attached: u.get_require_attached(),
			attributes: u.get_attributes().iter().map(|a| (*a).into_sc2()).collect(),
			movement_speed: u.get_movement_speed(),
			armor: u.get_armor(),
			weapons: u.get_weapons().iter().map(IntoSC2::into_sc2).collect(),
		}
	}
}

/// Catalog entry for an upgrade.
#[derive(Debug, Clone)]
pub struct UpgradeData {
	pub id: UpgradeId,
	pub name: String,
	pub mineral_cost: u32,
	pub vespene_cost: u32,
	pub research_time: f32,
	pub ability: AbilityId,
}
impl UpgradeData {
	pub fn cost(&self) -> Cost {
		Cost {
			minerals: self.mineral_cost,
			vespene: self.vespene_cost,
			supply: 0.0,
			time: self.research_time,
		}
	}
}
impl FromProto<&ProtoUpgradeData> for UpgradeData {
	fn from_proto(u: &ProtoUpgradeData) -> Self {
		Self {
			id: UpgradeId(u.get_upgrade_id()),
			name: u.get_name().to_string(),
			mineral_cost: u.get_mineral_cost(),
			vespene_cost: u.get_vespene_cost(),
			research_time: u.get_research_time(),
			ability: AbilityId(u.get_ability_id()),
		}
	}
}

/// Catalog entry for a buff.
#[derive(Debug, Clone)]
pub struct BuffData {
	pub id: BuffId,
	pub name: String,
}
impl FromProto<&ProtoBuffData> for BuffData {
	fn from_proto(b: &ProtoBuffData) -> Self {
		Self {
			id: BuffId(b.get_buff_id()),
			name: b.get_name().to_string(),
		}
	}
}

/// Catalog entry for an effect.
#[derive(Debug, Clone)]
pub struct EffectData {
	pub id: EffectId,
	pub name: String,
	pub friendly_name: String,
	pub radius: f32,
}
impl FromProto<&ProtoEffectData> for EffectData {
	fn from_proto(e: &ProtoEffectData) -> Self {
		Self {
			id: EffectId(e.get_effect_id()),
			name: e.get_name().to_string(),
			friendly_name: e.get_friendly_name().to_string(),
			radius: e.get_radius(),
		}
	}
}

/// All static catalogs for the session.
#[derive(Debug, Default, Clone)]
pub struct GameData {
	pub abilities: FxHashMap<AbilityId, AbilityData>,
	pub units: FxHashMap<UnitTypeId, UnitTypeData>,
	pub upgrades: FxHashMap<UpgradeId, UpgradeData>,
	pub buffs: FxHashMap<BuffId, BuffData>,
	pub effects: FxHashMap<EffectId, EffectData>,
	/// Corrected ability prices, filled once when the catalog is decoded.
	ability_costs: FxHashMap<AbilityId, Cost>,
}

impl GameData {
	/// Price of whatever the ability creates, with the corrections the raw
	/// catalog misses:
	///
	/// * morphs (tech-alias chain present) cost the difference to the most
	///   expensive aliased form, so an orbital command is 150/0 and a hive
	///   is 200/150;
	/// * the zergling ability trains two units, so its price is doubled;
	/// * morphs whose link name marks them as free (lower/raise, lift/land,
	///   hold/harvest toggles) cost nothing;
	/// * research abilities price their upgrade.
	pub fn calculate_ability_cost(&self, ability: AbilityId) -> Cost {
		if let Some(cost) = self.ability_costs.get(&ability) {
			return *cost;
		}
		self.compute_ability_cost(ability)
	}

	/// Walks every known ability once and stores its corrected price.
	fn cache_ability_costs(&mut self) {
		let mut costs = FxHashMap::default();
		for ability in self.abilities.keys() {
			costs.insert(*ability, self.compute_ability_cost(*ability));
		}
		for ability in self
			.units
			.values()
			.filter_map(|u| u.ability)
			.chain(self.upgrades.values().map(|u| u.ability))
		{
			if !costs.contains_key(&ability) {
				costs.insert(ability, self.compute_ability_cost(ability));
			}
		}
		self.ability_costs = costs;
	}

	fn compute_ability_cost(&self, ability: AbilityId) -> Cost {
		if let Some(data) = self.abilities.get(&ability) {
			let link = &data.link_name;
			if FREE_MORPH_MARKERS.iter().any(|m| link.contains(m)) {
				return Cost::default();
			}
		}
		let matches_ability = |candidate: Option<AbilityId>| {
			candidate.map_or(false, |c| {
				c == ability
					|| self
						.abilities
						.get(&c)
						.and_then(|a| a.remaps_to)
						.map_or(false, |r| r == ability)
			})
		};

		for unit in self.units.values() {
			if !matches_ability(unit.ability) {
				continue;
			}
			if unit.id == UnitTypeId::Zergling {
				return Cost {
					minerals: unit.mineral_cost * 2,
					vespene: unit.vespene_cost * 2,
					supply: unit.food_required * 2.0,
					time: unit.build_time,
				};
			}
			if let Some(morph) = self.morph_cost(unit) {
				return morph;
			}
			return unit.cost();
		}

		self.upgrades
			.values()
			.find(|u| u.ability == ability || matches_ability(Some(u.ability)))
			.map_or_else(Cost::default, UpgradeData::cost)
	}

	/// Cost of morphing into `unit` from its tech-aliased base, when there
	/// is one. Add-ons alias their parent tech but are built, not morphed.
	fn morph_cost(&self, unit: &UnitTypeData) -> Option<Cost> {
		let first = *unit.tech_alias.first()?;
		if matches!(first, UnitTypeId::TechLab | UnitTypeId::Reactor) {
			return None;
		}
		let alias_costs = unit.tech_alias.iter().filter_map(|a| self.units.get(a));
		let minerals = alias_costs.clone().map(|a| a.mineral_cost).max()?;
		let vespene = alias_costs.clone().map(|a| a.vespene_cost).max()?;
		let supply = alias_costs
			.map(|a| a.food_required)
			.fold(0.0_f32, f32::max);
		Some(Cost {
			minerals: unit.mineral_cost.saturating_sub(minerals),
			vespene: unit.vespene_cost.saturating_sub(vespene),
			supply: (unit.food_required - supply).max(0.0),
			time: unit.build_time,
		})
	}
}

impl FromProto<&ResponseData> for GameData {
	fn from_proto(data: &ResponseData) -> Self {
		let mut game_data = Self {
			abilities: data
				.get_abilities()
				.iter()
				.map(|a| (AbilityId(a.get_ability_id()), a.into_sc2()))
				.collect(),
			units: data
				.get_units()
				.iter()
				.map(|u| (UnitTypeId(u.get_unit_id()), u.into_sc2()))
				.collect(),
			upgrades: data
				.get_upgrades()
				.iter()
				.map(|u| (UpgradeId(u.get_upgrade_id()), u.into_sc2()))
				.collect(),
			buffs: data
				.get_buffs()
				.iter()
				.map(|b| (BuffId(b.get_buff_id()), b.into_sc2()))
				.collect(),
			effects: data
				.get_effects()
				.iter()
				.map(|e| (EffectId(e.get_effect_id()), e.into_sc2()))
				.collect(),
			ability_costs: FxHashMap::default(),
		};
		game_data.cache_ability_costs();
		game_data
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	pub(crate) fn unit_data(id: UnitTypeId, name: &str) -> UnitTypeData {
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

	fn ability_data(id: AbilityId, link_name: &str) -> AbilityData {
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

	fn catalog() -> GameData {
		let mut data = GameData::default();

		let mut cc = unit_data(UnitTypeId::CommandCenter, "CommandCenter");
		cc.mineral_cost = 400;
		data.units.insert(cc.id, cc);

		let mut orbital = unit_data(UnitTypeId::OrbitalCommand, "OrbitalCommand");
		orbital.mineral_cost = 550;
		orbital.ability = Some(AbilityId::MorphOrbitalCommand);
		orbital.tech_alias = vec![UnitTypeId::CommandCenter];
		data.units.insert(orbital.id, orbital);

		let mut ling = unit_data(UnitTypeId::Zergling, "Zergling");
		ling.mineral_cost = 25;
		ling.food_required = 0.5;
		ling.ability = Some(AbilityId::LarvaTrainZergling);
		data.units.insert(ling.id, ling);

		let mut scv = unit_data(UnitTypeId::SCV, "SCV");
		scv.mineral_cost = 50;
		scv.food_required = 1.0;
		scv.ability = Some(AbilityId::CommandCenterTrainSCV);
		data.units.insert(scv.id, scv);

		data.abilities.insert(
			AbilityId::MorphOrbitalCommand,
			ability_data(AbilityId::MorphOrbitalCommand, "UpgradeToOrbital"),
		);
		data.abilities.insert(
			AbilityId::MorphSupplyDepotLower,
			ability_data(AbilityId::MorphSupplyDepotLower, "SupplyDepotLower"),
		);
		data.abilities.insert(
			AbilityId::Lift,
			ability_data(AbilityId::Lift, "LiftOff"),
		);
		data
	}

	#[test]
	fn morph_subtracts_the_base_cost() {
		let data = catalog();
		let cost = data.calculate_ability_cost(AbilityId::MorphOrbitalCommand);
		assert_eq!(cost.minerals, 150);
		assert_eq!(cost.vespene, 0);
	}

	#[test]
	fn zergling_ability_pays_for_two() {
		let data = catalog();
		let cost = data.calculate_ability_cost(AbilityId::LarvaTrainZergling);
		assert_eq!(cost.minerals, 50);
		assert_eq!(cost.supply, 1.0);
	}

	#[test]
	fn named_free_morphs_cost_nothing() {
		let data = catalog();
		for ability in [AbilityId::MorphSupplyDepotLower, AbilityId::Lift] {
			let cost = data.calculate_ability_cost(ability);
			assert_eq!((cost.minerals, cost.vespene), (0, 0));
		}
	}

	#[test]
	fn cached_prices_match_the_computation() {
		let mut data = catalog();
		data.cache_ability_costs();
		for ability in [
			AbilityId::MorphOrbitalCommand,
			AbilityId::LarvaTrainZergling,
			AbilityId::CommandCenterTrainSCV,
			AbilityId::MorphSupplyDepotLower,
		] {
			assert!(data.ability_costs.contains_key(&ability));
			assert_eq!(data.ability_costs[&ability], data.compute_ability_cost(ability));
			assert_eq!(data.calculate_ability_cost(ability), data.ability_costs[&ability]);
		}
	}

	#[test]
	fn plain_training_costs_the_unit() {
		let data = catalog();
		let cost = data.calculate_ability_cost(AbilityId::CommandCenterTrainSCV);
		assert_eq!(cost.minerals, 50);
		assert_eq!(cost.supply, 1.0);
	}
}
