use std::fmt;

use crate::geometry::{radians, Aabb, Hit, Ray, Vector};
use crate::path::{Path, Paths};

use super::Shape;

/// Distance between ray-march samples
pub const MARCH_STEP: f64 = 1.0 / 64.0;

/// Rays are marched no further than this; surfaces beyond it are never hit
pub const MARCH_DISTANCE: f64 = 10.0;

/// Radial strokes are laid out every this many degrees
const SPOKE_SPACING: usize = 5;

/// Radial strokes run from the origin out to this radius
const SPOKE_RADIUS: f64 = 8.0;

/// Sample spacing along each radial stroke
const SPOKE_STEP: f64 = 1.0 / 256.0;

/// Which side of the height field is solid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionDirection {
    Above,
    Below,
}

/// Height field `z = f(x, y)` bounded by a box, solid on one side.
///
/// Intersection is a fixed-step march, so detail finer than [`MARCH_STEP`]
/// can be missed and nothing past [`MARCH_DISTANCE`] is ever reported.
pub struct FunctionShape {
    function: Box<dyn Fn(f64, f64) -> f64 + Send + Sync>,
    pub bounds: Aabb,
    pub direction: FunctionDirection,
}

impl FunctionShape {
    pub fn new<F>(function: F, bounds: Aabb, direction: FunctionDirection) -> Self
    where
        F: Fn(f64, f64) -> f64 + Send + Sync + 'static,
    {
        Self {
            function: Box::new(function),
            bounds,
            direction,
        }
    }

    pub fn above<F>(function: F, bounds: Aabb) -> Self
    where
        F: Fn(f64, f64) -> f64 + Send + Sync + 'static,
    {
        Self::new(function, bounds, FunctionDirection::Above)
    }

    pub fn below<F>(function: F, bounds: Aabb) -> Self
    where
        F: Fn(f64, f64) -> f64 + Send + Sync + 'static,
    {
        Self::new(function, bounds, FunctionDirection::Below)
    }

    pub fn height(&self, x: f64, y: f64) -> f64 {
        (self.function)(x, y)
    }
}

impl fmt::Debug for FunctionShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionShape")
            .field("bounds", &self.bounds)
            .field("direction", &self.direction)
            .finish_non_exhaustive()
    }
}

impl Shape for FunctionShape {
    fn bounding_box(&self) -> Aabb {
        self.bounds
    }

    /// The fudge is ignored: the surface itself is never inside
    fn contains(&self, v: &Vector, _fudge: f64) -> bool {
        let z = self.height(v.x, v.y);
        match self.direction {
            FunctionDirection::Below => v.z < z,
            FunctionDirection::Above => v.z > z,
        }
    }

    fn intersect(&self, ray: &Ray) -> Hit<'_> {
        let side = self.contains(&ray.position(MARCH_STEP), 0.0);
        let samples = (MARCH_DISTANCE / MARCH_STEP) as usize;
        for k in 1..samples {
            let t = k as f64 * MARCH_STEP;
            let v = ray.position(t);
            if self.contains(&v, 0.0) != side && self.bounds.contains(&v) {
                return Hit::new(self, t);
            }
        }
        Hit::no_hit()
    }

    /// Swirled radial strokes across the height field.
    ///
    /// The swirl angle is `-(-z)^1.4`, which is NaN wherever the surface is
    /// above zero; such samples never survive clipping.
    fn paths(&self) -> Paths {
        let samples = (SPOKE_RADIUS / SPOKE_STEP) as usize;
        (0..360)
            .step_by(SPOKE_SPACING)
            .map(|degrees| {
                let a = radians(degrees as f64);
                (0..=samples)
                    .map(|i| {
                        let r = i as f64 * SPOKE_STEP;
                        let z = self.height(a.cos() * r, a.sin() * r);
                        let swirl = -(-z).powf(1.4);
                        Vector::new(
                            (a - swirl).cos() * r,
                            (a - swirl).sin() * r,
                            z.min(self.bounds.max.z).max(self.bounds.min.z),
                        )
                    })
                    .collect::<Path>()
            })
            .collect()
    }
}
