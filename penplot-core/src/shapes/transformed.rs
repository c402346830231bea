use std::sync::Arc;

use crate::geometry::{Aabb, Hit, Ray, Vector};
use crate::path::Paths;
use crate::paths;
use crate::transform::{Matrix, Transform};

use super::Shape;

/// Another shape placed in the world by an affine matrix.
///
/// Queries are answered in the wrapped shape's object space. Hit parameters
/// are measured along the normalized object-space ray.
pub struct TransformShape {
    pub shape: Arc<dyn Shape>,
    pub matrix: Matrix,
    inverse: Matrix,
}

impl TransformShape {
    pub fn new(shape: Arc<dyn Shape>, matrix: Matrix) -> Self {
        let inverse = Transform::inverse(&matrix);
        Self {
            shape,
            matrix,
            inverse,
        }
    }

    pub fn inverse(&self) -> &Matrix {
        &self.inverse
    }
}

impl Shape for TransformShape {
    fn compile(&self) {
        self.shape.compile();
    }

    fn bounding_box(&self) -> Aabb {
        Transform::mul_box(&self.matrix, &self.shape.bounding_box())
    }

    fn contains(&self, v: &Vector, fudge: f64) -> bool {
        self.shape
            .contains(&Transform::mul_position(&self.inverse, v), fudge)
    }

    fn intersect(&self, ray: &Ray) -> Hit<'_> {
        self.shape.intersect(&Transform::mul_ray(&self.inverse, ray))
    }

    fn paths(&self) -> Paths {
        paths::transform(&self.shape.paths(), &self.matrix)
    }
}
