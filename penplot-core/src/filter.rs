/// Point filters used to cut strokes into visible runs
use crate::geometry::{Aabb, Vector};
use crate::scene::Scene;
use crate::shapes::Shape;
use crate::transform::{Matrix, Transform};

/// Maps a point and decides whether it survives
pub trait Filter {
    fn filter(&self, v: &Vector) -> (Vector, bool);
}

/// The canonical clip-space cube
pub fn clip_box() -> Aabb {
    Aabb::new(Vector::new(-1.0, -1.0, -1.0), Vector::new(1.0, 1.0, 1.0))
}

/// Keeps points that are unoccluded from `eye` and inside the view volume.
/// Surviving points are emitted in clip space.
pub struct ClipFilter<'a> {
    pub matrix: Matrix,
    pub eye: Vector,
    pub scene: &'a Scene,
}

impl<'a> ClipFilter<'a> {
    pub fn new(matrix: Matrix, eye: Vector, scene: &'a Scene) -> Self {
        Self { matrix, eye, scene }
    }
}

impl Filter for ClipFilter<'_> {
    fn filter(&self, v: &Vector) -> (Vector, bool) {
        let w = Transform::mul_position_w(&self.matrix, v);
        if !self.scene.visible(&self.eye, v) {
            return (w, false);
        }
        (w, clip_box().contains(&w))
    }
}

/// Keeps points inside a shape's solid, unchanged
pub struct ContainsFilter<'a> {
    pub shape: &'a dyn Shape,
}

impl Filter for ContainsFilter<'_> {
    fn filter(&self, v: &Vector) -> (Vector, bool) {
        (*v, self.shape.contains(v, 0.0))
    }
}
