/// Geometry primitives shared by shapes, the KD-tree and the scene
use nalgebra::Vector3;
use std::fmt;
use std::sync::Arc;

use crate::shapes::{EmptyShape, Shape, TriangleShape};

/// Points and directions are both plain 3-vectors
pub type Vector = Vector3<f64>;

/// Canonical owner of every `no_hit` result
static NO_HIT_SHAPE: EmptyShape = EmptyShape;

/// A parametric ray: `origin + t * direction`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vector,
    pub direction: Vector,
}

impl Ray {
    pub fn new(origin: Vector, direction: Vector) -> Self {
        Self { origin, direction }
    }

    pub fn position(&self, t: f64) -> Vector {
        self.origin + self.direction * t
    }
}

/// Split axis of a KD-tree node. `None` marks a leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    None,
    X,
    Y,
    Z,
}

impl Axis {
    /// Coordinate of `v` along this axis, `None` for [`Axis::None`]
    pub fn coordinate(self, v: &Vector) -> Option<f64> {
        match self {
            Axis::None => None,
            Axis::X => Some(v.x),
            Axis::Y => Some(v.y),
            Axis::Z => Some(v.z),
        }
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Aabb {
    pub min: Vector,
    pub max: Vector,
}

impl Aabb {
    pub fn new(min: Vector, max: Vector) -> Self {
        Self { min, max }
    }

    /// Union of every shape's box; the zero box when `shapes` is empty
    pub fn for_shapes(shapes: &[Arc<dyn Shape>]) -> Self {
        let mut iter = shapes.iter();
        let Some(first) = iter.next() else {
            return Self::default();
        };
        iter.fold(first.bounding_box(), |acc, shape| {
            acc.extend(&shape.bounding_box())
        })
    }

    pub fn for_triangles<T: AsRef<TriangleShape>>(triangles: &[T]) -> Self {
        let mut iter = triangles.iter();
        let Some(first) = iter.next() else {
            return Self::default();
        };
        iter.fold(first.as_ref().bounding_box(), |acc, t| {
            acc.extend(&t.as_ref().bounding_box())
        })
    }

    pub fn for_vectors(vectors: &[Vector]) -> Self {
        let Some(first) = vectors.first() else {
            return Self::default();
        };
        let (min, max) = vectors
            .iter()
            .fold((*first, *first), |(min, max), v| (min.inf(v), max.sup(v)));
        Self { min, max }
    }

    /// Point at the fractional position `anchor` inside the box
    pub fn anchor(&self, anchor: &Vector) -> Vector {
        self.min + self.size().component_mul(anchor)
    }

    pub fn center(&self) -> Vector {
        self.anchor(&Vector::new(0.5, 0.5, 0.5))
    }

    pub fn size(&self) -> Vector {
        self.max - self.min
    }

    pub fn contains(&self, v: &Vector) -> bool {
        self.min.x <= v.x
            && self.max.x >= v.x
            && self.min.y <= v.y
            && self.max.y >= v.y
            && self.min.z <= v.z
            && self.max.z >= v.z
    }

    pub fn extend(&self, other: &Aabb) -> Aabb {
        Aabb::new(self.min.inf(&other.min), self.max.sup(&other.max))
    }

    /// Slab test returning the entry and exit parameters.
    ///
    /// The ray misses when `tmax < tmin`. Zero direction components divide to
    /// infinities and are left to the comparisons.
    pub fn intersect(&self, ray: &Ray) -> (f64, f64) {
        let mut x1 = (self.min.x - ray.origin.x) / ray.direction.x;
        let mut y1 = (self.min.y - ray.origin.y) / ray.direction.y;
        let mut z1 = (self.min.z - ray.origin.z) / ray.direction.z;
        let mut x2 = (self.max.x - ray.origin.x) / ray.direction.x;
        let mut y2 = (self.max.y - ray.origin.y) / ray.direction.y;
        let mut z2 = (self.max.z - ray.origin.z) / ray.direction.z;
        if x1 > x2 {
            std::mem::swap(&mut x1, &mut x2);
        }
        if y1 > y2 {
            std::mem::swap(&mut y1, &mut y2);
        }
        if z1 > z2 {
            std::mem::swap(&mut z1, &mut z2);
        }
        (x1.max(y1).max(z1), x2.min(y2).min(z2))
    }

    /// Which sides of the plane `axis = point` the box reaches.
    /// A straddling box is on both sides.
    pub fn partition(&self, axis: Axis, point: f64) -> (bool, bool) {
        match (axis.coordinate(&self.min), axis.coordinate(&self.max)) {
            (Some(lo), Some(hi)) => (lo <= point, hi >= point),
            _ => (false, false),
        }
    }
}

/// Nearest intersection of a ray with a shape
#[derive(Clone, Copy)]
pub struct Hit<'a> {
    pub shape: &'a dyn Shape,
    pub t: f64,
}

impl<'a> Hit<'a> {
    pub fn new(shape: &'a dyn Shape, t: f64) -> Self {
        Self { shape, t }
    }

    /// The "nothing was hit" sentinel: infinite distance, owned by the empty shape
    pub fn no_hit() -> Hit<'static> {
        Hit {
            shape: &NO_HIT_SHAPE,
            t: f64::INFINITY,
        }
    }

    pub fn ok(&self) -> bool {
        self.t < f64::INFINITY
    }

    /// Nearer of the two hits; ties keep `self`
    pub fn min(self, other: Hit<'a>) -> Hit<'a> {
        if self.t <= other.t {
            self
        } else {
            other
        }
    }

    pub fn max(self, other: Hit<'a>) -> Hit<'a> {
        if self.t > other.t {
            self
        } else {
            other
        }
    }

    /// Whether both hits belong to the same shape instance
    pub fn same_shape(&self, other: &Hit<'_>) -> bool {
        std::ptr::addr_eq(self.shape as *const dyn Shape, other.shape as *const dyn Shape)
    }

    /// Move the hit back onto a ray whose origin was advanced by `offset`
    pub(crate) fn offset(self, offset: f64) -> Hit<'a> {
        Hit {
            shape: self.shape,
            t: self.t + offset,
        }
    }
}

impl fmt::Debug for Hit<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hit")
            .field("shape", &(self.shape as *const dyn Shape as *const ()))
            .field("t", &self.t)
            .finish()
    }
}

/// Distance from `p` to the segment `a`-`b`, clamped to the endpoints
pub fn segment_distance(p: &Vector, a: &Vector, b: &Vector) -> f64 {
    let ab = b - a;
    let l2 = ab.norm_squared();
    if l2 == 0.0 {
        return (p - a).norm();
    }
    let t = (p - a).dot(&ab) / l2;
    if t < 0.0 {
        return (p - a).norm();
    }
    if t > 1.0 {
        return (p - b).norm();
    }
    (a + ab * t - p).norm()
}

pub fn radians(degrees: f64) -> f64 {
    degrees.to_radians()
}

pub fn degrees(radians: f64) -> f64 {
    radians.to_degrees()
}

/// Median of an already sorted slice. Empty input yields 0.
pub fn median(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    if n == 0 {
        0.0
    } else if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    }
}

/// Point on a sphere of `radius` at latitude/longitude given in degrees (Z up)
pub fn lat_lng_to_xyz(lat: f64, lng: f64, radius: f64) -> Vector {
    let (lat, lng) = (radians(lat), radians(lng));
    Vector::new(
        radius * lat.cos() * lng.cos(),
        radius * lat.cos() * lng.sin(),
        radius * lat.sin(),
    )
}
