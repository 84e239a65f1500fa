//! Distance helpers and the per-frame pairwise distance strategies.

use crate::geometry::Point2;
use ndarray::Array2;

/// Squared and plain euclidean distance for anything that has a position.
pub trait Distance: Into<Point2> + Sized {
	fn distance_squared(self, other: impl Into<Point2>) -> f32 {
		let a: Point2 = self.into();
		let b: Point2 = other.into();
		let dx = a.x - b.x;
		let dy = a.y - b.y;
		dx * dx + dy * dy
	}
	fn distance(self, other: impl Into<Point2>) -> f32 {
		self.distance_squared(other).sqrt()
	}
	/// True when `other` is strictly closer than `distance`.
	fn is_closer(self, distance: f32, other: impl Into<Point2>) -> bool {
		self.distance_squared(other) < distance * distance
	}
	/// True when `other` is strictly further than `distance`.
	fn is_further(self, distance: f32, other: impl Into<Point2>) -> bool {
		self.distance_squared(other) > distance * distance
	}
}
impl<T: Into<Point2>> Distance for T {}

/// Iterator adaptor keeping items closer than a given distance to a target.
#[derive(Clone)]
pub struct Closer<I> {
	iter: I,
	distance_squared: f32,
	target: Point2,
}
/// Iterator adaptor keeping items further than a given distance from a target.
#[derive(Clone)]
pub struct Further<I> {
	iter: I,
	distance_squared: f32,
	target: Point2,
}

macro_rules! impl_range_adaptor {
	($adaptor:ident, $cmp:tt) => {
		impl<I> Iterator for $adaptor<I>
		where
			I: Iterator,
			I::Item: Distance + Copy,
		{
			type Item = I::Item;
			fn next(&mut self) -> Option<Self::Item> {
				let target = self.target;
				let limit = self.distance_squared;
				self.iter.find(|item| item.distance_squared(target) $cmp limit)
			}
		}
	};
}
impl_range_adaptor!(Closer, <);
impl_range_adaptor!(Further, >);

/// Distance-based combinators for iterators over positioned items.
pub trait DistanceIterator: Iterator + Sized
where
	Self::Item: Distance + Copy,
{
	/// Keeps items strictly closer than `distance` to `target`.
	fn closer(self, distance: f32, target: impl Into<Point2>) -> Closer<Self> {
		Closer {
			iter: self,
			distance_squared: distance * distance,
			target: target.into(),
		}
	}
	/// Keeps items strictly further than `distance` from `target`.
	fn further(self, distance: f32, target: impl Into<Point2>) -> Further<Self> {
		Further {
			iter: self,
			distance_squared: distance * distance,
			target: target.into(),
		}
	}
	/// Item closest to `target`.
	fn closest(self, target: impl Into<Point2>) -> Option<Self::Item> {
		let target = target.into();
		self.min_by(|a, b| {
			a.distance_squared(target)
				.partial_cmp(&b.distance_squared(target))
				.unwrap_or(std::cmp::Ordering::Equal)
		})
	}
	/// Item furthest from `target`.
	fn furthest(self, target: impl Into<Point2>) -> Option<Self::Item> {
		let target = target.into();
		self.max_by(|a, b| {
			a.distance_squared(target)
				.partial_cmp(&b.distance_squared(target))
				.unwrap_or(std::cmp::Ordering::Equal)
		})
	}
	/// Distance from `target` to the closest item.
	fn closest_distance(self, target: impl Into<Point2>) -> Option<f32> {
		self.closest_distance_squared(target).map(f32::sqrt)
	}
	/// Squared distance from `target` to the closest item.
	fn closest_distance_squared(self, target: impl Into<Point2>) -> Option<f32> {
		let target = target.into();
		self.map(|item| item.distance_squared(target))
			.min_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
	}
	/// Mean of the item positions, `None` for an empty iterator.
	fn center(self) -> Option<Point2> {
		let mut count = 0_usize;
		let sum = self.fold(Point2::default(), |acc, item| {
			count += 1;
			acc + item.into()
		});
		if count == 0 {
			None
		} else {
			Some(sum / count as f32)
		}
	}
}
impl<I> DistanceIterator for I
where
	I: Iterator + Sized,
	I::Item: Distance + Copy,
{
}

/// In-place sorting of slices by distance to a target.
pub trait DistanceSlice {
	fn sort_by_distance(&mut self, target: impl Into<Point2>);
	fn sort_unstable_by_distance(&mut self, target: impl Into<Point2>);
}
impl<T: Distance + Copy> DistanceSlice for [T] {
	fn sort_by_distance(&mut self, target: impl Into<Point2>) {
		let target = target.into();
		self.sort_by(|a, b| {
			a.distance_squared(target)
				.partial_cmp(&b.distance_squared(target))
				.unwrap_or(std::cmp::Ordering::Equal)
		})
	}
	fn sort_unstable_by_distance(&mut self, target: impl Into<Point2>) {
		let target = target.into();
		self.sort_unstable_by(|a, b| {
			a.distance_squared(target)
				.partial_cmp(&b.distance_squared(target))
				.unwrap_or(std::cmp::Ordering::Equal)
		})
	}
}

/// How pairwise unit distances are computed each frame.
///
/// `OnDemand` computes from positions at every call. The other strategies
/// precompute all pairs once per frame when the world is assembled and
/// answer lookups from the cache; they agree with `OnDemand` up to float
/// rounding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistanceMethod {
	/// No precomputation.
	OnDemand,
	/// Condensed upper-triangle vector of length `n * (n - 1) / 2`.
	Condensed,
	/// Full `n * n` matrix with staleness checks on lookup.
	Matrix,
	/// Full matrix, staleness checked only in debug builds.
	MatrixUnchecked,
}
impl Default for DistanceMethod {
	fn default() -> Self {
		DistanceMethod::OnDemand
	}
}

/// Per-frame cache of pairwise distances, indexed by the dense
/// `distance_index` assigned to every unit during world assembly.
#[derive(Default)]
pub struct DistanceCache {
	method: DistanceMethod,
	game_loop: u32,
	count: usize,
	condensed: Vec<f32>,
	matrix: Array2<f32>,
}

impl DistanceCache {
	pub fn new(method: DistanceMethod) -> Self {
		Self {
			method,
			..Default::default()
		}
	}
	pub fn method(&self) -> DistanceMethod {
		self.method
	}
	/// Recomputes the cache for the given frame. A no-op for `OnDemand`.
	pub fn rebuild(&mut self, positions: &[Point2], game_loop: u32) {
		self.game_loop = game_loop;
		self.count = positions.len();
		let n = self.count;
		match self.method {
			DistanceMethod::OnDemand => {}
			DistanceMethod::Condensed => {
				self.condensed.clear();
				self.condensed.reserve(n.saturating_sub(1) * n / 2);
				for i in 0..n {
					for j in (i + 1)..n {
						self.condensed.push(positions[i].distance(positions[j]));
					}
				}
			}
			DistanceMethod::Matrix | DistanceMethod::MatrixUnchecked => {
				self.matrix = Array2::zeros((n, n));
				for i in 0..n {
					for j in (i + 1)..n {
						let d = positions[i].distance(positions[j]);
						self.matrix[(i, j)] = d;
						self.matrix[(j, i)] = d;
					}
				}
			}
		}
	}
	/// Distance between the units with dense indices `i` and `j`, or `None`
	/// when the cache cannot answer (on-demand method, stale frame, index
	/// out of range).
	pub fn query(&self, i: usize, j: usize, game_loop: u32) -> Option<f32> {
		if i == j {
			return Some(0.0);
		}
		match self.method {
			DistanceMethod::OnDemand => None,
			DistanceMethod::Condensed => {
				if self.game_loop != game_loop || i >= self.count || j >= self.count {
					return None;
				}
				let (i, j) = if i < j { (i, j) } else { (j, i) };
				let idx = self.count * i - i * (i + 1) / 2 + (j - i - 1);
				self.condensed.get(idx).copied()
			}
			DistanceMethod::Matrix => {
				if self.game_loop != game_loop || i >= self.count || j >= self.count {
					return None;
				}
				Some(self.matrix[(i, j)])
			}
			DistanceMethod::MatrixUnchecked => {
				debug_assert_eq!(self.game_loop, game_loop);
				debug_assert!(i < self.count && j < self.count);
				Some(self.matrix[(i, j)])
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn positions() -> Vec<Point2> {
		vec![
			Point2::new(0.0, 0.0),
			Point2::new(3.0, 4.0),
			Point2::new(10.0, 0.0),
			Point2::new(7.5, 2.5),
			Point2::new(1.0, 1.0),
		]
	}

	#[test]
	fn strategies_agree_with_on_demand() {
		let positions = positions();
		let n = positions.len();
		for method in [
			DistanceMethod::Condensed,
			DistanceMethod::Matrix,
			DistanceMethod::MatrixUnchecked,
		] {
			let mut cache = DistanceCache::new(method);
			cache.rebuild(&positions, 42);
			for i in 0..n {
				for j in 0..n {
					let cached = cache.query(i, j, 42).expect("fresh cache answers");
					let direct = positions[i].distance(positions[j]);
					assert!(
						(cached - direct).abs() < 1e-6,
						"{:?}: [{}][{}] {} vs {}",
						method,
						i,
						j,
						cached,
						direct
					);
				}
			}
		}
	}

	#[test]
	fn stale_and_on_demand_queries_return_none() {
		let positions = positions();
		let mut cache = DistanceCache::new(DistanceMethod::Matrix);
		cache.rebuild(&positions, 7);
		assert!(cache.query(0, 1, 8).is_none());
		assert!(cache.query(0, positions.len(), 7).is_none());

		let on_demand = DistanceCache::new(DistanceMethod::OnDemand);
		assert!(on_demand.query(0, 1, 0).is_none());
		assert_eq!(on_demand.query(3, 3, 0), Some(0.0));
	}

	#[test]
	fn iterator_helpers() {
		let positions = positions();
		let target = Point2::new(0.0, 0.0);
		let closest = positions.iter().copied().closest(target).expect("non-empty");
		assert_eq!(closest, target);
		let close: Vec<_> = positions.iter().copied().closer(5.1, target).collect();
		assert_eq!(close.len(), 3);
		let mut sorted = positions.clone();
		sorted.sort_unstable_by_distance(target);
		assert_eq!(sorted[0], target);
		assert_eq!(sorted[4], Point2::new(10.0, 0.0));
	}
}
