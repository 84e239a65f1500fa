//! Static map information, fetched once when the game starts.

use crate::{
	geometry::{Point2, Rect, Size},
	pixel_map::{ByteMap, PixelMap},
	player::{AIBuild, Difficulty, PlayerType, Race},
	FromProto, IntoSC2, Rs,
};
use rustc_hash::FxHashMap;
use sc2_proto::sc2api::ResponseGameInfo;
use std::path::Path;

/// Map geometry and participants. Everything here is constant for the whole
/// game except `players`, whose actual races fill in as they are scouted.
#[derive(Default, Clone)]
pub struct GameInfo {
	/// Localised map name.
	pub map_name: String,
	/// Map name taken from the file name, stable across localisations.
	pub map_name_path: String,
	pub mod_names: Vec<String>,
	pub local_map_path: String,
	pub players: FxHashMap<u32, PlayerInfo>,
	pub map_size: Size,
	/// Tiles ground units can walk on.
	pub pathing_grid: PixelMap,
	pub terrain_height: Rs<ByteMap>,
	/// Tiles structures can be placed on.
	pub placement_grid: PixelMap,
	/// Playable part of the map; the rest is dead border.
	pub playable_area: Rect,
	/// Possible enemy spawn locations.
	pub start_locations: Vec<Point2>,
	pub map_center: Point2,
}

impl FromProto<&ResponseGameInfo> for GameInfo {
	fn from_proto(game_info: &ResponseGameInfo) -> Self {
		let start_raw = game_info.get_start_raw();
		let map_size = start_raw.get_map_size();
		let area = start_raw.get_playable_area();
		let (x0, y0) = (area.get_p0().get_x(), area.get_p0().get_y());
		let (x1, y1) = (area.get_p1().get_x(), area.get_p1().get_y());
		let local_map_path = game_info.get_local_map_path().to_string();
		Self {
			map_name: game_info.get_map_name().to_string(),
			map_name_path: Path::new(&local_map_path)
				.file_stem()
				.and_then(|stem| stem.to_str())
				.unwrap_or_default()
				.to_string(),
			mod_names: game_info.get_mod_names().to_vec(),
			local_map_path,
			players: game_info
				.get_player_info()
				.iter()
				.map(|i| {
					let id = i.get_player_id();
					(
						id,
						PlayerInfo {
							id,
							player_type: i.get_field_type().into_sc2(),
							race_requested: i.get_race_requested().into_sc2(),
							race_actual: i.race_actual.map(|r| r.into_sc2()),
							difficulty: i.difficulty.map(|d| d.into_sc2()),
							ai_build: i.ai_build.map(|b| b.into_sc2()),
							player_name: i.player_name.as_ref().cloned(),
						},
					)
				})
				.collect(),
			map_size: Size::new(map_size.get_x() as usize, map_size.get_y() as usize),
			pathing_grid: start_raw.get_pathing_grid().into_sc2(),
			terrain_height: Rs::new(start_raw.get_terrain_height().into_sc2()),
			placement_grid: start_raw.get_placement_grid().into_sc2(),
			playable_area: Rect::new(x0 as usize, y0 as usize, x1 as usize, y1 as usize),
			start_locations: start_raw
				.get_start_locations()
				.iter()
				.map(|p| p.into_sc2())
				.collect(),
			map_center: Point2::new((x0 + (x1 - x0) / 2) as f32, (y0 + (y1 - y0) / 2) as f32),
		}
	}
}

/// One slot in the game.
#[derive(Clone)]
pub struct PlayerInfo {
	pub id: u32,
	pub player_type: PlayerType,
	/// Race the player asked for, possibly `Random`.
	pub race_requested: Race,
	/// Resolved race. `None` for an unscouted random opponent.
	pub race_actual: Option<Race>,
	/// Populated for computer opponents only.
	pub difficulty: Option<Difficulty>,
	/// Populated for computer opponents only.
	pub ai_build: Option<AIBuild>,
	pub player_name: Option<String>,
}
