use crate::geometry::{Aabb, Hit, Ray, Vector};
use crate::path::Paths;

use super::Shape;

/// Determinants and distances below this are treated as zero
const TRIANGLE_EPSILON: f64 = 1e-6;

/// A single triangle; a surface, never a solid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangleShape {
    pub v1: Vector,
    pub v2: Vector,
    pub v3: Vector,
    bounds: Aabb,
}

impl TriangleShape {
    pub fn new(v1: Vector, v2: Vector, v3: Vector) -> Self {
        let mut triangle = Self {
            v1,
            v2,
            v3,
            bounds: Aabb::default(),
        };
        triangle.update_bounding_box();
        triangle
    }

    pub fn update_bounding_box(&mut self) {
        self.bounds = Aabb::new(
            self.v1.inf(&self.v2).inf(&self.v3),
            self.v1.sup(&self.v2).sup(&self.v3),
        );
    }

    /// Unit normal following the v1, v2, v3 winding
    pub fn normal(&self) -> Vector {
        (self.v2 - self.v1).cross(&(self.v3 - self.v1)).normalize()
    }

    pub fn vertices(&self) -> [Vector; 3] {
        [self.v1, self.v2, self.v3]
    }
}

impl AsRef<TriangleShape> for TriangleShape {
    fn as_ref(&self) -> &TriangleShape {
        self
    }
}

impl Shape for TriangleShape {
    fn bounding_box(&self) -> Aabb {
        self.bounds
    }

    fn contains(&self, _v: &Vector, _fudge: f64) -> bool {
        false
    }

    /// Möller-Trumbore
    fn intersect(&self, ray: &Ray) -> Hit<'_> {
        let e1 = self.v2 - self.v1;
        let e2 = self.v3 - self.v1;
        let p = ray.direction.cross(&e2);
        let det = e1.dot(&p);
        if det > -TRIANGLE_EPSILON && det < TRIANGLE_EPSILON {
            return Hit::no_hit();
        }
        let inv = 1.0 / det;
        let t = ray.origin - self.v1;
        let u = t.dot(&p) * inv;
        if u < 0.0 || u > 1.0 {
            return Hit::no_hit();
        }
        let q = t.cross(&e1);
        let v = ray.direction.dot(&q) * inv;
        if v < 0.0 || u + v > 1.0 {
            return Hit::no_hit();
        }
        let d = e2.dot(&q) * inv;
        if d < TRIANGLE_EPSILON {
            return Hit::no_hit();
        }
        Hit::new(self, d)
    }

    fn paths(&self) -> Paths {
        vec![
            vec![self.v1, self.v2],
            vec![self.v2, self.v3],
            vec![self.v3, self.v1],
        ]
    }
}
