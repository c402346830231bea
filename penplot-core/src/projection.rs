/// Camera configuration for scene rendering
use crate::geometry::Vector;
use crate::transform::{Matrix, Transform};

/// Orbiting never lifts the eye higher than this many radians above the horizon
const MAX_ELEVATION: f64 = 1.5;

/// Projection mode for rendering
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectionMode {
    Perspective,
    /// View-space extents of the orthographic volume
    Orthographic {
        left: f64,
        right: f64,
        bottom: f64,
        top: f64,
    },
}

/// Everything needed to turn a scene into screen-space strokes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub eye: Vector,
    pub center: Vector,
    pub up: Vector,
    pub width: f64,
    pub height: f64,
    /// Vertical field of view in degrees
    pub fovy: f64,
    pub near: f64,
    pub far: f64,
    /// Sample spacing along strokes; zero tests only the stroke vertices
    pub step: f64,
    pub mode: ProjectionMode,
}

impl Camera {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            eye: Vector::new(0.0, 0.0, 5.0),
            center: Vector::zeros(),
            up: Vector::new(0.0, 1.0, 0.0),
            width: width as f64,
            height: height as f64,
            fovy: 45.0,
            near: 0.1,
            far: 100.0,
            step: 0.01,
            mode: ProjectionMode::Perspective,
        }
    }

    pub fn looking_at(mut self, eye: Vector, center: Vector, up: Vector) -> Self {
        self.eye = eye;
        self.center = center;
        self.up = up;
        self
    }

    pub fn with_fovy(mut self, fovy: f64) -> Self {
        self.fovy = fovy;
        self
    }

    pub fn with_step(mut self, step: f64) -> Self {
        self.step = step;
        self
    }

    pub fn with_clip(mut self, near: f64, far: f64) -> Self {
        self.near = near;
        self.far = far;
        self
    }

    pub fn orthographic(mut self, left: f64, right: f64, bottom: f64, top: f64) -> Self {
        self.mode = ProjectionMode::Orthographic {
            left,
            right,
            bottom,
            top,
        };
        self
    }

    pub fn aspect(&self) -> f64 {
        self.width / self.height
    }

    /// Create the view matrix (world to camera)
    pub fn view_matrix(&self) -> Matrix {
        Transform::look_at(&self.eye, &self.center, &self.up)
    }

    /// Create the projection matrix (camera to clip space)
    pub fn projection_matrix(&self) -> Matrix {
        match self.mode {
            ProjectionMode::Perspective => {
                Transform::perspective(self.fovy, self.aspect(), self.near, self.far)
            }
            ProjectionMode::Orthographic {
                left,
                right,
                bottom,
                top,
            } => Transform::orthographic(left, right, bottom, top, self.near, self.far),
        }
    }

    /// World to clip space
    pub fn matrix(&self) -> Matrix {
        self.projection_matrix() * self.view_matrix()
    }

    /// Swing the eye around the centre: `yaw` about `up`, then `pitch` about
    /// the camera's right axis. A pitch that would carry the eye too close to
    /// either pole is ignored.
    pub fn orbit(&mut self, yaw: f64, pitch: f64) {
        let up = self.up.normalize();
        let offset = Transform::mul_position(&Transform::rotate(&up, yaw), &(self.eye - self.center));
        let right = up.cross(&offset);
        let elevation = offset.normalize().dot(&up).clamp(-1.0, 1.0).asin();
        let offset = if right.norm() > 0.0 && (elevation + pitch).abs() < MAX_ELEVATION {
            Transform::mul_position(&Transform::rotate(&right.normalize(), pitch), &offset)
        } else {
            offset
        };
        self.eye = self.center + offset;
    }

    /// Scale the eye's distance from the centre
    pub fn zoom(&mut self, factor: f64) {
        self.eye = self.center + (self.eye - self.center) * factor;
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(800, 600)
    }
}
