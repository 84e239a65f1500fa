//! Ramp geometry: detection from the map grids and wall placements.

use crate::{
	distance::{Distance, DistanceIterator},
	geometry::{circle_intersection, Point2},
	pixel_map::{ByteMap, GridExt, Pixel, PixelMap},
	Rs,
};
use ndarray::Array2;
use std::{
	cmp::{Ordering, Reverse},
	convert::TryInto,
	fmt,
};

type Pos = (usize, usize);

/// Minimum tiles for a tile group to count as a ramp rather than a pebble
/// of unbuildable ground.
const MIN_RAMP_SIZE: usize = 8;

/// All ramps of the map plus the two that matter most.
#[derive(Default)]
pub struct Ramps {
	pub all: Vec<Ramp>,
	/// Ramp into the bot's main base.
	pub my: Ramp,
	/// Ramp into the opponent's main base.
	pub enemy: Ramp,
}

impl Ramps {
	/// Detects ramps as connected groups of pathable but unbuildable tiles.
	pub(crate) fn from_grids(
		pathing: &PixelMap,
		placement: &PixelMap,
		height: &Rs<ByteMap>,
		start_location: Point2,
		enemy_start: Point2,
	) -> Self {
		// Vision blockers are also pathable and unbuildable, but sit on flat
		// ground; a ramp tile has at least one neighbor at another height.
		let (dx, dy) = pathing.dim();
		let on_slope = |(x, y): Pos| {
			let h = height[(x, y)];
			iproduct!(x.saturating_sub(1)..(x + 2).min(dx), y.saturating_sub(1)..(y + 2).min(dy))
				.any(|pos| height[pos] != h)
		};
		let mask = Array2::from_shape_fn(pathing.dim(), |pos| {
			if pathing[pos] == Pixel::Set && placement[pos] == Pixel::Empty && on_slope(pos) {
				Pixel::Set
			} else {
				Pixel::Empty
			}
		});
		let all: Vec<Ramp> = mask
			.groups(|p| *p == Pixel::Set, MIN_RAMP_SIZE)
			.into_iter()
			.map(|points| Ramp::new(points, height, start_location))
			.collect();

		let base_ramp = |base: Point2| {
			all.iter()
				.filter(|ramp| ramp.upper2_for_ramp_wall().is_some())
				.filter_map(|ramp| {
					let (x, y) = ramp.top_center()?;
					Some((ramp, Point2::new(x as f32, y as f32).distance_squared(base)))
				})
				.min_by(|(_, d1), (_, d2)| d1.partial_cmp(d2).unwrap_or(Ordering::Equal))
				.map(|(ramp, _)| ramp.clone())
				.unwrap_or_default()
		};
		let my = base_ramp(start_location);
		let enemy = base_ramp(enemy_start);
		Self { all, my, enemy }
	}
}

/// One ramp: its tiles plus the terrain height they sit on.
#[derive(Default, Clone)]
pub struct Ramp {
	pub points: Vec<Pos>,
	height: Rs<ByteMap>,
	start_location: Point2,
}

impl Ramp {
	pub(crate) fn new(points: Vec<Pos>, height: &Rs<ByteMap>, start_location: Point2) -> Self {
		Self {
			points,
			height: Rs::clone(height),
			start_location,
		}
	}

	/// Tiles at the highest terrain level of the ramp.
	pub fn upper(&self) -> Vec<Pos> {
		self.extremum(u8::MIN, Ordering::Greater)
	}
	/// Tiles at the lowest terrain level of the ramp.
	pub fn lower(&self) -> Vec<Pos> {
		self.extremum(u8::MAX, Ordering::Less)
	}
	fn extremum(&self, start: u8, keep: Ordering) -> Vec<Pos> {
		let mut bound = start;
		let mut result = Vec::new();
		for &p in &self.points {
			let h = self.height[p];
			match h.cmp(&bound) {
				o if o == keep => {
					bound = h;
					result = vec![p];
				}
				Ordering::Equal => result.push(p),
				_ => {}
			}
		}
		result
	}

	pub fn top_center(&self) -> Option<Pos> {
		Self::center_of(&self.upper())
	}
	pub fn bottom_center(&self) -> Option<Pos> {
		Self::center_of(&self.lower())
	}
	fn center_of(points: &[Pos]) -> Option<Pos> {
		if points.is_empty() {
			return None;
		}
		let (x, y) = points
			.iter()
			.fold((0, 0), |(ax, ay), (x, y)| (ax + x, ay + y));
		Some((x / points.len(), y / points.len()))
	}

	/// The two upper tiles a wall hangs off. Standard main ramps have 2 or 5
	/// upper tiles; a few maps have wider ramps with 4 or 9, where the two
	/// tiles furthest from the bottom are taken instead.
	fn upper2_for_ramp_wall(&self) -> Option<[Pos; 2]> {
		let mut upper = self.upper();
		match upper.len() {
			2 => upper.as_slice().try_into().ok(),
			3..=5 | 9 => {
				let (cx, cy) = self.bottom_center()?;
				upper.sort_unstable_by_key(|&(x, y)| {
					let dx = x.abs_diff(cx);
					let dy = y.abs_diff(cy);
					Reverse(dx * dx + dy * dy)
				});
				upper[..2].try_into().ok()
			}
			_ => None,
		}
	}

	fn wall_anchors(&self) -> Option<(Point2, Point2)> {
		let ps = self.upper2_for_ramp_wall()?;
		let tile_center = |(x, y): Pos| Point2::new(x as f32 + 0.5, y as f32 + 0.5);
		Some((tile_center(ps[0]), tile_center(ps[1])))
	}
	fn lower_point(&self) -> Option<Point2> {
		let (x, y) = *self.lower().first()?;
		Some(Point2::new(x as f32, y as f32))
	}

	/// Positions of the two corner supply depots of a terran ramp wall.
	pub fn corner_depots(&self) -> Option<[Point2; 2]> {
		let (p1, p2) = self.wall_anchors()?;
		let center = (p1 + p2) / 2.0;
		circle_intersection(center, self.depot_in_middle()?, 5_f32.sqrt())
	}
	/// Position of the wall barracks when it needs no addon space.
	pub fn barracks_in_middle(&self) -> Option<Point2> {
		let (p1, p2) = self.wall_anchors()?;
		let intersects = circle_intersection(p1, p2, 5_f32.sqrt())?;
		let lower = self.lower_point()?;
		intersects.iter().furthest(lower).copied()
	}
	/// Position of the wall barracks, shifted left when an addon would
	/// overlap the corner depot.
	pub fn barracks_correct_placement(&self) -> Option<Point2> {
		let pos = self.barracks_in_middle()?;
		let depots = self.corner_depots()?;
		if pos.x + 1.0 > depots[0].x.max(depots[1].x) {
			Some(pos)
		} else {
			Some(pos.offset(-2.0, 0.0))
		}
	}
	/// Position of the middle depot in a three-depot wall.
	pub fn depot_in_middle(&self) -> Option<Point2> {
		let (p1, p2) = self.wall_anchors()?;
		let intersects = circle_intersection(p1, p2, 2.5_f32.sqrt())?;
		let lower = self.lower_point()?;
		intersects.iter().furthest(lower).copied()
	}

	/// Pylon position powering a protoss ramp wall.
	pub fn protoss_wall_pylon(&self) -> Option<Point2> {
		let middle = self.depot_in_middle()?;
		Some(middle + (self.barracks_in_middle()? - middle) * 6.0)
	}
	/// The two 3x3 structures of a protoss ramp wall.
	pub fn protoss_wall_buildings(&self) -> Option<[Point2; 2]> {
		let middle = self.depot_in_middle()?;
		let direction = self.barracks_in_middle()? - middle;
		let depots = self.depots_by_start_distance()?;
		let wall1 = depots[1] + direction;
		Some([wall1, middle + direction + (middle - wall1) / 1.5])
	}
	/// Spot for the unit that closes the protoss wall.
	pub fn protoss_wall_warpin(&self) -> Option<Point2> {
		let middle = self.depot_in_middle()?;
		let direction = self.barracks_in_middle()? - middle;
		let depots = self.depots_by_start_distance()?;
		Some(depots[0] - direction)
	}
	fn depots_by_start_distance(&self) -> Option<[Point2; 2]> {
		let mut depots = self.corner_depots()?;
		let start = self.start_location;
		depots.sort_unstable_by(|d1, d2| {
			d1.distance_squared(start)
				.partial_cmp(&d2.distance_squared(start))
				.unwrap_or(Ordering::Equal)
		});
		Some(depots)
	}
}

impl fmt::Debug for Ramp {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Ramp({:?})", self.points)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	// 4 tiles wide, climbing in y: two lower rows at height 1 and 2, upper
	// row at height 3.
	fn straight_ramp() -> Ramp {
		let mut height = Array2::from_elem((8, 8), 0_u8);
		let mut points = Vec::new();
		for (y, h) in [(1, 1_u8), (2, 2), (3, 3)] {
			for x in 2..4 {
				height[(x, y)] = h;
				points.push((x, y));
			}
		}
		Ramp::new(points, &Rs::new(height), Point2::new(3.0, 6.0))
	}

	#[test]
	fn upper_and_lower_split_by_height() {
		let ramp = straight_ramp();
		assert_eq!(ramp.upper(), vec![(2, 3), (3, 3)]);
		assert_eq!(ramp.lower(), vec![(2, 1), (3, 1)]);
		assert_eq!(ramp.top_center(), Some((2, 3)));
	}

	#[test]
	fn two_upper_tiles_make_a_wall() {
		let ramp = straight_ramp();
		let depots = ramp.corner_depots();
		assert!(depots.is_some());
		let middle = ramp.depot_in_middle();
		assert!(middle.is_some());
		// The wall stands on the high ground, above the lower row.
		assert!(middle.map(|p| p.y).unwrap_or_default() > 1.0);
	}

	#[test]
	fn weird_upper_counts_are_rejected() {
		let mut height = Array2::from_elem((8, 8), 0_u8);
		let mut points = Vec::new();
		for x in 0..7 {
			height[(x, 3)] = 3;
			points.push((x, 3));
		}
		let ramp = Ramp::new(points, &Rs::new(height), Point2::default());
		assert!(ramp.upper2_for_ramp_wall().is_none());
		assert!(ramp.corner_depots().is_none());
	}
}
