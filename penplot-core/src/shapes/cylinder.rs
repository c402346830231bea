use crate::geometry::{radians, Aabb, Hit, Ray, Vector};
use crate::path::Paths;

use super::Shape;

const CYLINDER_EPSILON: f64 = 1e-6;

/// Degrees between neighbouring vertical rulings
const RULING_SPACING: usize = 10;

/// Cylinder around the Z axis, capped to `z0..z1`
#[derive(Debug, Clone, Copy)]
pub struct CylinderShape {
    pub radius: f64,
    pub z0: f64,
    pub z1: f64,
}

impl CylinderShape {
    pub fn new(radius: f64, z0: f64, z1: f64) -> Self {
        Self { radius, z0, z1 }
    }
}

impl Shape for CylinderShape {
    fn bounding_box(&self) -> Aabb {
        let r = self.radius;
        Aabb::new(Vector::new(-r, -r, self.z0), Vector::new(r, r, self.z1))
    }

    fn contains(&self, v: &Vector, fudge: f64) -> bool {
        if v.xy().norm() > self.radius + fudge {
            return false;
        }
        v.z >= self.z0 - fudge && v.z <= self.z1 + fudge
    }

    /// Quadratic in x and y only; each root must land strictly between the caps
    fn intersect(&self, ray: &Ray) -> Hit<'_> {
        let r = self.radius;
        let o = ray.origin;
        let d = ray.direction;
        let a = d.x * d.x + d.y * d.y;
        let b = 2.0 * o.x * d.x + 2.0 * o.y * d.y;
        let c = o.x * o.x + o.y * o.y - r * r;
        let q = b * b - 4.0 * a * c;
        if q < 0.0 {
            return Hit::no_hit();
        }
        let s = q.sqrt();
        let mut t0 = (-b + s) / (2.0 * a);
        let mut t1 = (-b - s) / (2.0 * a);
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }
        let z0 = o.z + t0 * d.z;
        let z1 = o.z + t1 * d.z;
        if t0 > CYLINDER_EPSILON && self.z0 < z0 && z0 < self.z1 {
            return Hit::new(self, t0);
        }
        if t1 > CYLINDER_EPSILON && self.z0 < z1 && z1 < self.z1 {
            return Hit::new(self, t1);
        }
        Hit::no_hit()
    }

    /// Vertical rulings around the barrel
    fn paths(&self) -> Paths {
        (0..360)
            .step_by(RULING_SPACING)
            .map(|degrees| {
                let a = radians(degrees as f64);
                let (x, y) = (self.radius * a.cos(), self.radius * a.sin());
                vec![Vector::new(x, y, self.z0), Vector::new(x, y, self.z1)]
            })
            .collect()
    }
}
