//! Map grids decoded from the protocol's packed images.

use crate::FromProto;
use ndarray::Array2;
use num_traits::FromPrimitive;
use rustc_hash::FxHashSet;
use sc2_proto::common::ImageData;

/// Binary grid (pathing, placement, creep).
pub type PixelMap = Array2<Pixel>;
/// Byte grid (terrain height).
pub type ByteMap = Array2<u8>;
/// Fog of war grid.
pub type VisibilityMap = Array2<Visibility>;

/// One cell of a binary grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive)]
pub enum Pixel {
	Empty,
	Set,
}
impl Default for Pixel {
	fn default() -> Self {
		Pixel::Empty
	}
}

/// One cell of the fog of war.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive)]
pub enum Visibility {
	Hidden,
	Fogged,
	Visible,
	FullHidden,
}
impl Visibility {
	pub fn is_visible(self) -> bool {
		matches!(self, Visibility::Visible)
	}
	pub fn is_fogged(self) -> bool {
		matches!(self, Visibility::Fogged)
	}
	pub fn is_hidden(self) -> bool {
		matches!(self, Visibility::Hidden | Visibility::FullHidden)
	}
	pub fn is_explored(self) -> bool {
		!self.is_hidden()
	}
}
impl Default for Visibility {
	fn default() -> Self {
		Visibility::Hidden
	}
}

fn to_binary(n: &u8) -> Vec<Pixel> {
	(0..8)
		.rev()
		.map(|shift| {
			if (n >> shift) & 1 == 1 {
				Pixel::Set
			} else {
				Pixel::Empty
			}
		})
		.collect()
}

// Image rows come y-major off the wire, the crate indexes (x, y).
fn decode<T: Clone + Default>(grid: &ImageData, mut data: Vec<T>) -> Array2<T> {
	let size = grid.get_size();
	let shape = (size.get_y() as usize, size.get_x() as usize);
	if data.len() != shape.0 * shape.1 {
		warn!(
			"image data carries {} cells for an advertised {}x{} grid",
			data.len(),
			size.get_x(),
			size.get_y()
		);
		data.resize(shape.0 * shape.1, T::default());
	}
	Array2::from_shape_vec(shape, data)
		.unwrap_or_else(|_| Array2::default(shape))
		.reversed_axes()
}

impl FromProto<&ImageData> for PixelMap {
	fn from_proto(grid: &ImageData) -> Self {
		debug_assert_eq!(grid.get_bits_per_pixel(), 1);
		decode(grid, grid.get_data().iter().flat_map(to_binary).collect())
	}
}
impl FromProto<&ImageData> for ByteMap {
	fn from_proto(grid: &ImageData) -> Self {
		debug_assert_eq!(grid.get_bits_per_pixel(), 8);
		decode(grid, grid.get_data().to_vec())
	}
}
impl FromProto<&ImageData> for VisibilityMap {
	fn from_proto(grid: &ImageData) -> Self {
		debug_assert_eq!(grid.get_bits_per_pixel(), 8);
		decode(
			grid,
			grid.get_data()
				.iter()
				.map(|n| Visibility::from_u8(*n).unwrap_or(Visibility::Hidden))
				.collect(),
		)
	}
}

/// Flood fill and connected-component search over grids.
pub trait GridExt<T> {
	/// Cells reachable from `start` through 4-neighbour moves while the
	/// predicate holds. Empty when the predicate fails at `start`.
	fn flood_fill(&self, start: (usize, usize), pred: impl Fn(&T) -> bool) -> Vec<(usize, usize)>;
	/// All 4-connected components of cells satisfying the predicate, keeping
	/// only components of at least `min_size` cells.
	fn groups(&self, pred: impl Fn(&T) -> bool, min_size: usize) -> Vec<Vec<(usize, usize)>>;
}

impl<T> GridExt<T> for Array2<T> {
	fn flood_fill(&self, start: (usize, usize), pred: impl Fn(&T) -> bool) -> Vec<(usize, usize)> {
		let mut filled = Vec::new();
		match self.get(start) {
			Some(cell) if pred(cell) => {}
			_ => return filled,
		}
		let mut visited = FxHashSet::default();
		let mut frontier = vec![start];
		visited.insert(start);
		while let Some(p) = frontier.pop() {
			filled.push(p);
			for n in neighbors4(p) {
				if !visited.contains(&n) {
					if let Some(cell) = self.get(n) {
						if pred(cell) {
							visited.insert(n);
							frontier.push(n);
						}
					}
				}
			}
		}
		filled
	}

	fn groups(&self, pred: impl Fn(&T) -> bool, min_size: usize) -> Vec<Vec<(usize, usize)>> {
		let mut groups = Vec::new();
		let mut seen = FxHashSet::default();
		for (p, cell) in self.indexed_iter() {
			if pred(cell) && !seen.contains(&p) {
				let group = self.flood_fill(p, &pred);
				seen.extend(group.iter().copied());
				if group.len() >= min_size {
					groups.push(group);
				}
			}
		}
		groups
	}
}

fn neighbors4((x, y): (usize, usize)) -> Vec<(usize, usize)> {
	let mut ns = vec![(x + 1, y), (x, y + 1)];
	if x > 0 {
		ns.push((x - 1, y));
	}
	if y > 0 {
		ns.push((x, y - 1));
	}
	ns
}

#[cfg(test)]
mod tests {
	use super::*;

	fn grid_from_rows(rows: &[&[u8]]) -> ByteMap {
		let h = rows.len();
		let w = rows[0].len();
		let mut grid = Array2::zeros((w, h));
		for (y, row) in rows.iter().enumerate() {
			for (x, v) in row.iter().enumerate() {
				grid[(x, y)] = *v;
			}
		}
		grid
	}

	#[test]
	fn flood_fill_stays_inside_the_region() {
		let grid = grid_from_rows(&[
			&[1, 1, 0, 1],
			&[1, 0, 0, 1],
			&[0, 0, 1, 1],
		]);
		let region = grid.flood_fill((0, 0), |v| *v == 1);
		assert_eq!(region.len(), 3);
		assert!(region.contains(&(0, 0)) && region.contains(&(1, 0)) && region.contains(&(0, 1)));
		assert!(grid.flood_fill((2, 0), |v| *v == 1).is_empty());
	}

	#[test]
	fn groups_respect_min_size() {
		let grid = grid_from_rows(&[
			&[1, 1, 0, 1],
			&[1, 0, 0, 1],
			&[0, 0, 1, 1],
		]);
		let groups = grid.groups(|v| *v == 1, 2);
		assert_eq!(groups.len(), 2);
		let sizes: Vec<_> = groups.iter().map(Vec::len).collect();
		assert!(sizes.contains(&3) && sizes.contains(&4));
		assert_eq!(grid.groups(|v| *v == 1, 5).len(), 0);
	}

	#[test]
	fn visibility_predicates_cover_every_state() {
		assert!(Visibility::Hidden.is_hidden());
		assert!(Visibility::FullHidden.is_hidden());
		assert!(!Visibility::Fogged.is_hidden());
		assert!(Visibility::Fogged.is_fogged());
		assert!(!Visibility::Visible.is_fogged());
		assert!(Visibility::Visible.is_visible());
		assert!(Visibility::Fogged.is_explored());
		assert!(!Visibility::FullHidden.is_explored());
	}

	#[test]
	fn short_image_data_is_padded_instead_of_panicking() {
		use sc2_proto::common::{ImageData, Size2DI};

		let mut size = Size2DI::new();
		size.set_x(2);
		size.set_y(2);
		let mut image = ImageData::new();
		image.set_size(size);
		image.set_bits_per_pixel(8);
		image.set_data(vec![7, 7, 7]);

		let grid: ByteMap = crate::FromProto::from_proto(&image);
		assert_eq!(grid.dim(), (2, 2));
		assert_eq!(grid[(0, 0)], 7);
		assert_eq!(grid[(1, 1)], 0);
	}

	#[test]
	fn bit_unpacking_is_msb_first() {
		let bits = to_binary(&0b1010_0000);
		assert_eq!(bits[0], Pixel::Set);
		assert_eq!(bits[1], Pixel::Empty);
		assert_eq!(bits[2], Pixel::Set);
		assert_eq!(bits[7], Pixel::Empty);
	}
}
