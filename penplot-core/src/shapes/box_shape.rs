use crate::geometry::{Aabb, Hit, Ray, Vector};
use crate::path::Paths;

use super::Shape;

/// Rays starting closer than this to a face do not hit it
const BOX_EPSILON: f64 = 1e-3;

/// Axis-aligned solid box
#[derive(Debug, Clone, Copy)]
pub struct BoxShape {
    pub min: Vector,
    pub max: Vector,
}

impl BoxShape {
    pub fn new(min: Vector, max: Vector) -> Self {
        Self { min, max }
    }
}

impl Shape for BoxShape {
    fn bounding_box(&self) -> Aabb {
        Aabb::new(self.min, self.max)
    }

    fn contains(&self, v: &Vector, fudge: f64) -> bool {
        if v.x < self.min.x - fudge || v.x > self.max.x + fudge {
            return false;
        }
        if v.y < self.min.y - fudge || v.y > self.max.y + fudge {
            return false;
        }
        !(v.z < self.min.z - fudge || v.z > self.max.z + fudge)
    }

    fn intersect(&self, ray: &Ray) -> Hit<'_> {
        let n = (self.min - ray.origin).component_div(&ray.direction);
        let f = (self.max - ray.origin).component_div(&ray.direction);
        let (n, f) = (n.inf(&f), n.sup(&f));
        let t0 = n.x.max(n.y).max(n.z);
        let t1 = f.x.min(f.y).min(f.z);
        if t0 < BOX_EPSILON && t1 > BOX_EPSILON {
            return Hit::new(self, t1);
        }
        if t0 >= BOX_EPSILON && t0 < t1 {
            return Hit::new(self, t0);
        }
        Hit::no_hit()
    }

    /// The twelve edges
    fn paths(&self) -> Paths {
        let (x1, y1, z1) = (self.min.x, self.min.y, self.min.z);
        let (x2, y2, z2) = (self.max.x, self.max.y, self.max.z);
        let v = Vector::new;
        vec![
            vec![v(x1, y1, z1), v(x1, y1, z2)],
            vec![v(x1, y1, z1), v(x1, y2, z1)],
            vec![v(x1, y1, z1), v(x2, y1, z1)],
            vec![v(x1, y1, z2), v(x1, y2, z2)],
            vec![v(x1, y1, z2), v(x2, y1, z2)],
            vec![v(x1, y2, z1), v(x1, y2, z2)],
            vec![v(x1, y2, z1), v(x2, y2, z1)],
            vec![v(x1, y2, z2), v(x2, y2, z2)],
            vec![v(x2, y1, z1), v(x2, y1, z2)],
            vec![v(x2, y1, z1), v(x2, y2, z1)],
            vec![v(x2, y1, z2), v(x2, y2, z2)],
            vec![v(x2, y2, z1), v(x2, y2, z2)],
        ]
    }
}
