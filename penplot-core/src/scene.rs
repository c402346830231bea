/// Scene container and the hidden-line render pipeline
use std::sync::Arc;

use crate::filter::ClipFilter;
use crate::geometry::{Hit, Ray, Vector};
use crate::path::Paths;
use crate::paths;
use crate::projection::{Camera, ProjectionMode};
use crate::shapes::Shape;
use crate::transform::{Matrix, Transform};
use crate::tree::Tree;

/// Douglas-Peucker tolerance applied to chopped output, in clip units
const SIMPLIFY_THRESHOLD: f64 = 1e-6;

/// A collection of shapes and, once compiled, a KD-tree over them.
///
/// Rendering runs in a fixed order: compile, collect strokes, chop them into
/// samples, keep the samples that are unoccluded and inside the view volume,
/// simplify the surviving runs, then map clip space onto the pixel grid.
#[derive(Default)]
pub struct Scene {
    shapes: Vec<Arc<dyn Shape>>,
    tree: Option<Tree>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a shape. Any existing tree is dropped and rebuilt on the next compile.
    pub fn add<S: Shape + 'static>(&mut self, shape: S) {
        self.add_shared(Arc::new(shape));
    }

    pub fn add_shared(&mut self, shape: Arc<dyn Shape>) {
        self.shapes.push(shape);
        self.tree = None;
    }

    pub fn shapes(&self) -> &[Arc<dyn Shape>] {
        &self.shapes
    }

    pub fn tree(&self) -> Option<&Tree> {
        self.tree.as_ref()
    }

    /// Compile every shape, then build the scene tree if there is none
    pub fn compile(&mut self) {
        for shape in &self.shapes {
            shape.compile();
        }
        if self.tree.is_none() {
            log::debug!("compiling scene with {} shapes", self.shapes.len());
            self.tree = Some(Tree::new(&self.shapes));
        }
    }

    /// Nearest hit, or no hit at all before the scene is compiled
    pub fn intersect(&self, ray: &Ray) -> Hit<'_> {
        match &self.tree {
            Some(tree) => tree.intersect(ray),
            None => Hit::no_hit(),
        }
    }

    /// Whether nothing lies between `point` and `eye`
    pub fn visible(&self, eye: &Vector, point: &Vector) -> bool {
        let v = eye - point;
        let ray = Ray::new(*point, v.normalize());
        self.intersect(&ray).t >= v.norm()
    }

    /// Every shape's strokes, in insertion order
    pub fn paths(&self) -> Paths {
        self.shapes.iter().flat_map(|s| s.paths()).collect()
    }

    /// Perspective render with a vertical field of view in degrees
    #[allow(clippy::too_many_arguments)]
    pub fn render(
        &mut self,
        eye: Vector,
        center: Vector,
        up: Vector,
        width: f64,
        height: f64,
        fovy: f64,
        near: f64,
        far: f64,
        step: f64,
    ) -> Paths {
        let matrix = Transform::perspective(fovy, width / height, near, far)
            * Transform::look_at(&eye, &center, &up);
        self.render_with_matrix(&matrix, &eye, width, height, step)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn render_orthographic(
        &mut self,
        eye: Vector,
        center: Vector,
        up: Vector,
        width: f64,
        height: f64,
        left: f64,
        right: f64,
        bottom: f64,
        top: f64,
        near: f64,
        far: f64,
        step: f64,
    ) -> Paths {
        let matrix = Transform::orthographic(left, right, bottom, top, near, far)
            * Transform::look_at(&eye, &center, &up);
        self.render_with_matrix(&matrix, &eye, width, height, step)
    }

    pub fn render_camera(&mut self, camera: &Camera) -> Paths {
        match camera.mode {
            ProjectionMode::Perspective => self.render(
                camera.eye,
                camera.center,
                camera.up,
                camera.width,
                camera.height,
                camera.fovy,
                camera.near,
                camera.far,
                camera.step,
            ),
            ProjectionMode::Orthographic {
                left,
                right,
                bottom,
                top,
            } => self.render_orthographic(
                camera.eye,
                camera.center,
                camera.up,
                camera.width,
                camera.height,
                left,
                right,
                bottom,
                top,
                camera.near,
                camera.far,
                camera.step,
            ),
        }
    }

    /// Run the pipeline with a world-to-clip `matrix`.
    ///
    /// A `step` of zero skips chopping and simplification, so only the
    /// original stroke vertices are tested for visibility.
    pub fn render_with_matrix(
        &mut self,
        matrix: &Matrix,
        eye: &Vector,
        width: f64,
        height: f64,
        step: f64,
    ) -> Paths {
        self.compile();

        let mut strokes = self.paths();
        log::debug!(
            "render: {} strokes, {} points",
            strokes.len(),
            paths::point_count(&strokes)
        );
        if step > 0.0 {
            strokes = paths::chop(&strokes, step);
            log::debug!("render: chopped to {} points", paths::point_count(&strokes));
        }

        let filter = ClipFilter::new(*matrix, *eye, self);
        strokes = paths::filter(&strokes, &filter);
        log::debug!(
            "render: {} visible runs, {} points",
            strokes.len(),
            paths::point_count(&strokes)
        );

        if step > 0.0 {
            strokes = paths::simplify(&strokes, SIMPLIFY_THRESHOLD);
            log::debug!("render: simplified to {} points", paths::point_count(&strokes));
        }

        paths::transform(&strokes, &Transform::screen(width, height))
    }
}
