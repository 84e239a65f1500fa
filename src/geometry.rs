//! Points, rectangles and the planar helpers the rest of the crate leans on.

use crate::{FromProto, IntoProto};
use sc2_proto::common::{Point, Point2D};
use std::{
	hash::{Hash, Hasher},
	iter::Sum,
	ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign},
};

/// Tolerance used by point equality.
pub const EPS: f32 = 1e-8;

/// Width and height of a grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Size {
	pub x: usize,
	pub y: usize,
}
impl Size {
	pub fn new(x: usize, y: usize) -> Self {
		Self { x, y }
	}
}

/// Axis-aligned rectangle in grid coordinates, inclusive corners.
#[derive(Debug, Clone, Copy, Default)]
pub struct Rect {
	pub x0: usize,
	pub y0: usize,
	pub x1: usize,
	pub y1: usize,
}
impl Rect {
	pub fn new(x0: usize, y0: usize, x1: usize, y1: usize) -> Self {
		Self { x0, y0, x1, y1 }
	}
}

/// Point on the map plane.
#[derive(Debug, Clone, Copy, Default)]
pub struct Point2 {
	pub x: f32,
	pub y: f32,
}

/// Point with terrain height.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point3 {
	pub x: f32,
	pub y: f32,
	pub z: f32,
}

impl Point2 {
	pub fn new(x: f32, y: f32) -> Self {
		Self { x, y }
	}
	/// Length of the vector from the origin.
	pub fn len(self) -> f32 {
		(self.x * self.x + self.y * self.y).sqrt()
	}
	/// Unit-length vector in the same direction, or the origin for zero input.
	pub fn normalized(self) -> Self {
		let len = self.len();
		if len < EPS {
			self
		} else {
			self / len
		}
	}
	/// Point moved `offset` units from `self` in the direction of `other`.
	pub fn towards(self, other: Self, offset: f32) -> Self {
		self + (other - self).normalized() * offset
	}
	/// Point shifted by the given deltas.
	pub fn offset(self, x: f32, y: f32) -> Self {
		Self {
			x: self.x + x,
			y: self.y + y,
		}
	}
	/// Rotated 90 degrees counterclockwise around the origin.
	pub fn rotate90(self) -> Self {
		Self {
			x: -self.y,
			y: self.x,
		}
	}
	pub fn round(self) -> Self {
		Self {
			x: self.x.round(),
			y: self.y.round(),
		}
	}
	pub fn floor(self) -> Self {
		Self {
			x: self.x.floor(),
			y: self.y.floor(),
		}
	}
	/// Four edge-adjacent grid neighbors.
	pub fn neighbors4(self) -> [Point2; 4] {
		[
			self.offset(1.0, 0.0),
			self.offset(-1.0, 0.0),
			self.offset(0.0, 1.0),
			self.offset(0.0, -1.0),
		]
	}
	/// Eight surrounding grid neighbors.
	pub fn neighbors8(self) -> [Point2; 8] {
		[
			self.offset(1.0, 0.0),
			self.offset(-1.0, 0.0),
			self.offset(0.0, 1.0),
			self.offset(0.0, -1.0),
			self.offset(1.0, 1.0),
			self.offset(-1.0, -1.0),
			self.offset(1.0, -1.0),
			self.offset(-1.0, 1.0),
		]
	}
	/// Lifts the point to 3d with a given height.
	pub fn to3(self, z: f32) -> Point3 {
		Point3 {
			x: self.x,
			y: self.y,
			z,
		}
	}
}

impl PartialEq for Point2 {
	fn eq(&self, other: &Self) -> bool {
		(self.x - other.x).abs() < EPS && (self.y - other.y).abs() < EPS
	}
}
impl Eq for Point2 {}
impl Hash for Point2 {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.x.to_bits().hash(state);
		self.y.to_bits().hash(state);
	}
}

macro_rules! point_ops {
	($($op:ident, $fn:ident, $assign:ident, $assign_fn:ident;)+) => {$(
		impl $op for Point2 {
			type Output = Self;
			fn $fn(self, other: Self) -> Self {
				Self {
					x: self.x.$fn(other.x),
					y: self.y.$fn(other.y),
				}
			}
		}
		impl $op<f32> for Point2 {
			type Output = Self;
			fn $fn(self, other: f32) -> Self {
				Self {
					x: self.x.$fn(other),
					y: self.y.$fn(other),
				}
			}
		}
		impl $assign for Point2 {
			fn $assign_fn(&mut self, other: Self) {
				*self = self.$fn(other);
			}
		}
		impl $assign<f32> for Point2 {
			fn $assign_fn(&mut self, other: f32) {
				*self = self.$fn(other);
			}
		}
	)+};
}
point_ops! {
	Add, add, AddAssign, add_assign;
	Sub, sub, SubAssign, sub_assign;
	Mul, mul, MulAssign, mul_assign;
	Div, div, DivAssign, div_assign;
}

impl Neg for Point2 {
	type Output = Self;
	fn neg(self) -> Self {
		Self {
			x: -self.x,
			y: -self.y,
		}
	}
}
impl Sum for Point2 {
	fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
		iter.fold(Default::default(), Add::add)
	}
}

impl From<(usize, usize)> for Point2 {
	fn from((x, y): (usize, usize)) -> Self {
		Self {
			x: x as f32,
			y: y as f32,
		}
	}
}
impl From<Point2> for (usize, usize) {
	fn from(p: Point2) -> Self {
		(p.x as usize, p.y as usize)
	}
}
impl From<&Point2> for Point2 {
	fn from(p: &Point2) -> Self {
		*p
	}
}
impl From<Point3> for Point2 {
	fn from(p: Point3) -> Self {
		Self { x: p.x, y: p.y }
	}
}

impl Point3 {
	pub fn new(x: f32, y: f32, z: f32) -> Self {
		Self { x, y, z }
	}
	pub fn offset(self, x: f32, y: f32) -> Self {
		Self {
			x: self.x + x,
			y: self.y + y,
			z: self.z,
		}
	}
	pub fn to2(self) -> Point2 {
		self.into()
	}
}

/// Intersection of two circles with equal radius `r` around `a` and `b`.
///
/// Returns `None` when the centers are further apart than `2r`.
pub fn circle_intersection(a: Point2, b: Point2, r: f32) -> Option<[Point2; 2]> {
	let d = a.distance(b);
	if d > 2.0 * r {
		return None;
	}
	let remains = (r * r - (d / 2.0) * (d / 2.0)).sqrt();
	let via = (b - a) / d;
	let middle = (a + b) / 2.0;
	let normal = via.rotate90();
	Some([middle + normal * remains, middle - normal * remains])
}

use crate::distance::Distance;

impl FromProto<&Point2D> for Point2 {
	fn from_proto(p: &Point2D) -> Self {
		Self {
			x: p.get_x(),
			y: p.get_y(),
		}
	}
}
impl IntoProto<Point2D> for Point2 {
	fn into_proto(self) -> Point2D {
		let mut pos = Point2D::new();
		pos.set_x(self.x);
		pos.set_y(self.y);
		pos
	}
}
impl FromProto<&Point> for Point2 {
	fn from_proto(p: &Point) -> Self {
		Self {
			x: p.get_x(),
			y: p.get_y(),
		}
	}
}
impl FromProto<&Point> for Point3 {
	fn from_proto(p: &Point) -> Self {
		Self {
			x: p.get_x(),
			y: p.get_y(),
			z: p.get_z(),
		}
	}
}
impl IntoProto<Point> for Point3 {
	fn into_proto(self) -> Point {
		let mut pos = Point::new();
		pos.set_x(self.x);
		pos.set_y(self.y);
		pos.set_z(self.z);
		pos
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn towards_moves_along_the_segment() {
		let a = Point2::new(0.0, 0.0);
		let b = Point2::new(10.0, 0.0);
		assert_eq!(a.towards(b, 4.0), Point2::new(4.0, 0.0));
		assert_eq!(a.towards(b, -2.0), Point2::new(-2.0, 0.0));
	}

	#[test]
	fn tolerant_equality_and_hash_agree() {
		use std::collections::hash_map::DefaultHasher;
		let a = Point2::new(30.5, 42.5);
		let b = Point2::new(30.5, 42.5);
		assert_eq!(a, b);
		let hash = |p: &Point2| {
			let mut h = DefaultHasher::new();
			p.hash(&mut h);
			h.finish()
		};
		assert_eq!(hash(&a), hash(&b));
		assert_ne!(a, Point2::new(30.5, 42.0));
	}

	#[test]
	fn circle_intersection_symmetric_points() {
		let r = 5.0_f32.sqrt();
		let points = circle_intersection(Point2::new(0.0, 0.0), Point2::new(4.0, 0.0), r)
			.expect("circles intersect");
		for p in &points {
			assert!((p.distance(Point2::new(0.0, 0.0)) - r).abs() < 1e-5);
			assert!((p.distance(Point2::new(4.0, 0.0)) - r).abs() < 1e-5);
		}
		assert!(circle_intersection(Point2::new(0.0, 0.0), Point2::new(100.0, 0.0), r).is_none());
	}
}
