use std::sync::Arc;

use crate::filter::ContainsFilter;
use crate::geometry::{Aabb, Hit, Ray, Vector};
use crate::path::Paths;
use crate::paths;

use super::Shape;

/// Tolerance applied by every CSG containment test, whatever the caller passes
const CSG_FUDGE: f64 = 1e-3;

/// How far past a rejected surface the next attempt starts
const CSG_ADVANCE: f64 = 0.01;

/// Spacing of the samples used to clip operand strokes
const CSG_CHOP_STEP: f64 = 0.01;

/// Rejected surfaces skipped before a ray is declared a miss
pub const MAX_CSG_RETRIES: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CsgOperation {
    Intersection,
    Difference,
    Union,
}

/// Boolean combination of two solids
pub struct CsgShape {
    pub a: Arc<dyn Shape>,
    pub b: Arc<dyn Shape>,
    pub operation: CsgOperation,
}

impl CsgShape {
    pub fn new(a: Arc<dyn Shape>, b: Arc<dyn Shape>, operation: CsgOperation) -> Self {
        Self { a, b, operation }
    }

    pub fn intersection(a: Arc<dyn Shape>, b: Arc<dyn Shape>) -> Self {
        Self::new(a, b, CsgOperation::Intersection)
    }

    /// `a` with `b` carved out of it
    pub fn difference(a: Arc<dyn Shape>, b: Arc<dyn Shape>) -> Self {
        Self::new(a, b, CsgOperation::Difference)
    }

    pub fn union(a: Arc<dyn Shape>, b: Arc<dyn Shape>) -> Self {
        Self::new(a, b, CsgOperation::Union)
    }
}

impl Shape for CsgShape {
    fn compile(&self) {
        self.a.compile();
        self.b.compile();
    }

    /// Approximate: a difference keeps all of `a`'s box
    fn bounding_box(&self) -> Aabb {
        let a = self.a.bounding_box();
        let b = self.b.bounding_box();
        match self.operation {
            CsgOperation::Intersection => Aabb::new(a.min.sup(&b.min), a.max.inf(&b.max)),
            CsgOperation::Difference => a,
            CsgOperation::Union => a.extend(&b),
        }
    }

    fn contains(&self, v: &Vector, _fudge: f64) -> bool {
        let f = CSG_FUDGE;
        match self.operation {
            CsgOperation::Intersection => self.a.contains(v, f) && self.b.contains(v, f),
            CsgOperation::Difference => self.a.contains(v, f) && !self.b.contains(v, -f),
            CsgOperation::Union => self.a.contains(v, f) || self.b.contains(v, f),
        }
    }

    /// Walk the operand surfaces along the ray until one bounds the combined solid
    fn intersect(&self, ray: &Ray) -> Hit<'_> {
        let mut current = *ray;
        let mut travelled = 0.0;
        for _ in 0..MAX_CSG_RETRIES {
            let hit = self.a.intersect(&current).min(self.b.intersect(&current));
            if !hit.ok() {
                return hit;
            }
            if self.contains(&current.position(hit.t), 0.0) {
                return hit.offset(travelled);
            }
            let advance = hit.t + CSG_ADVANCE;
            current = Ray::new(current.position(advance), current.direction);
            travelled += advance;
        }
        log::debug!(
            "csg intersect gave up after {MAX_CSG_RETRIES} rejected surfaces from {:?}",
            ray.origin
        );
        Hit::no_hit()
    }

    /// Operand strokes clipped to the combined solid
    fn paths(&self) -> Paths {
        let mut strokes = self.a.paths();
        strokes.extend(self.b.paths());
        let chopped = paths::chop(&strokes, CSG_CHOP_STEP);
        paths::filter(&chopped, &ContainsFilter { shape: self })
    }
}
