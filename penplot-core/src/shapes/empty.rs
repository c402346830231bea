use crate::geometry::{Aabb, Hit, Ray, Vector};
use crate::path::Paths;

use super::Shape;

/// A shape with no extent. Owns every "no hit" result.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyShape;

impl Shape for EmptyShape {
    fn bounding_box(&self) -> Aabb {
        Aabb::default()
    }

    fn contains(&self, _v: &Vector, _fudge: f64) -> bool {
        false
    }

    fn intersect(&self, _ray: &Ray) -> Hit<'_> {
        Hit::no_hit()
    }

    fn paths(&self) -> Paths {
        Paths::new()
    }
}
