/// 4x4 affine and projective matrix builders plus point/ray/box helpers
use nalgebra::{Matrix4, Point3, Rotation3, Unit};

use crate::geometry::{Aabb, Ray, Vector};

/// Row-major 4x4 transform acting on column vectors
pub type Matrix = Matrix4<f64>;

/// Transform builder for 3D transformations
pub struct Transform;

impl Transform {
    pub fn identity() -> Matrix {
        Matrix::identity()
    }

    pub fn translate(v: &Vector) -> Matrix {
        Matrix::new_translation(v)
    }

    pub fn scale(v: &Vector) -> Matrix {
        Matrix::new_nonuniform_scaling(v)
    }

    /// Rotation about `axis` by `angle` radians, clockwise when looking down the axis.
    ///
    /// Row 0 is `(m·x² + c, m·xy + z·s, m·zx − y·s)` with `m = 1 − c`, the
    /// transpose of the right-handed rotation.
    pub fn rotate(axis: &Vector, angle: f64) -> Matrix {
        Rotation3::from_axis_angle(&Unit::new_normalize(*axis), -angle).to_homogeneous()
    }

    /// OpenGL-style perspective frustum
    pub fn frustum(l: f64, r: f64, b: f64, t: f64, n: f64, f: f64) -> Matrix {
        let t1 = 2.0 * n;
        let t2 = r - l;
        let t3 = t - b;
        let t4 = f - n;
        #[rustfmt::skip]
        let m = Matrix::new(
            t1 / t2, 0.0, (r + l) / t2, 0.0,
            0.0, t1 / t3, (t + b) / t3, 0.0,
            0.0, 0.0, (-f - n) / t4, (-t1 * f) / t4,
            0.0, 0.0, -1.0, 0.0,
        );
        m
    }

    pub fn orthographic(l: f64, r: f64, b: f64, t: f64, n: f64, f: f64) -> Matrix {
        Matrix::new_orthographic(l, r, b, t, n, f)
    }

    /// Symmetric perspective projection with a vertical field of view in degrees
    pub fn perspective(fovy: f64, aspect: f64, near: f64, far: f64) -> Matrix {
        let ymax = near * (fovy.to_radians() / 2.0).tan();
        let xmax = ymax * aspect;
        Self::frustum(-xmax, xmax, -ymax, ymax, near, far)
    }

    /// World-to-camera view matrix
    pub fn look_at(eye: &Vector, center: &Vector, up: &Vector) -> Matrix {
        Matrix::look_at_rh(&Point3::from(*eye), &Point3::from(*center), up)
    }

    /// Maps clip space [-1,1]² onto a `width` x `height` pixel grid with the origin top-left
    pub fn screen(width: f64, height: f64) -> Matrix {
        Self::scale(&Vector::new(width / 2.0, -height / 2.0, 0.0))
            * Self::translate(&Vector::new(1.0, -1.0, 0.0))
    }

    /// Inverse of `m`, or an all-NaN matrix when `m` is singular
    pub fn inverse(m: &Matrix) -> Matrix {
        m.try_inverse().unwrap_or_else(|| {
            log::warn!("inverting a singular transform; results will be NaN");
            Matrix::from_element(f64::NAN)
        })
    }

    /// Affine point transform; the homogeneous row is ignored
    pub fn mul_position(m: &Matrix, v: &Vector) -> Vector {
        Vector::new(
            m[(0, 0)] * v.x + m[(0, 1)] * v.y + m[(0, 2)] * v.z + m[(0, 3)],
            m[(1, 0)] * v.x + m[(1, 1)] * v.y + m[(1, 2)] * v.z + m[(1, 3)],
            m[(2, 0)] * v.x + m[(2, 1)] * v.y + m[(2, 2)] * v.z + m[(2, 3)],
        )
    }

    /// Projective point transform, always dividing by w (which may be zero)
    pub fn mul_position_w(m: &Matrix, v: &Vector) -> Vector {
        let w = m[(3, 0)] * v.x + m[(3, 1)] * v.y + m[(3, 2)] * v.z + m[(3, 3)];
        Self::mul_position(m, v) / w
    }

    /// Linear part applied to a direction, then normalized
    pub fn mul_direction(m: &Matrix, v: &Vector) -> Vector {
        (m.fixed_view::<3, 3>(0, 0) * v).normalize()
    }

    pub fn mul_ray(m: &Matrix, ray: &Ray) -> Ray {
        Ray::new(Self::mul_position(m, &ray.origin), Self::mul_direction(m, &ray.direction))
    }

    /// Axis-aligned bounds of a transformed box
    pub fn mul_box(m: &Matrix, b: &Aabb) -> Aabb {
        let r = Vector::new(m[(0, 0)], m[(1, 0)], m[(2, 0)]);
        let u = Vector::new(m[(0, 1)], m[(1, 1)], m[(2, 1)]);
        let f = Vector::new(m[(0, 2)], m[(1, 2)], m[(2, 2)]);
        let t = Vector::new(m[(0, 3)], m[(1, 3)], m[(2, 3)]);
        let (xa, xb) = (r * b.min.x, r * b.max.x);
        let (ya, yb) = (u * b.min.y, u * b.max.y);
        let (za, zb) = (f * b.min.z, f * b.max.z);
        let min = xa.inf(&xb) + ya.inf(&yb) + za.inf(&zb) + t;
        let max = xa.sup(&xb) + ya.sup(&yb) + za.sup(&zb) + t;
        Aabb::new(min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_translate_and_scale() {
        let m = Transform::translate(&Vector::new(1.0, 2.0, 3.0))
            * Transform::scale(&Vector::new(2.0, 2.0, 2.0));
        let p = Transform::mul_position(&m, &Vector::new(1.0, 1.0, 1.0));
        assert_eq!(p, Vector::new(3.0, 4.0, 5.0));
    }

    #[test]
    fn test_rotate_quarter_turn() {
        let m = Transform::rotate(&Vector::new(0.0, 0.0, 1.0), std::f64::consts::FRAC_PI_2);
        let p = Transform::mul_position(&m, &Vector::new(1.0, 0.0, 0.0));
        assert_relative_eq!(p, Vector::new(0.0, -1.0, 0.0), epsilon = 1e-12);
        let m = Transform::rotate(&Vector::new(1.0, 0.0, 0.0), std::f64::consts::FRAC_PI_2);
        let p = Transform::mul_position(&m, &Vector::new(0.0, 1.0, 0.0));
        assert_relative_eq!(p, Vector::new(0.0, 0.0, -1.0), epsilon = 1e-12);
    }

    #[test]
    fn test_rotate_matches_closed_form() {
        let axis = Vector::new(1.0, -2.0, 3.0);
        let a = 0.7;
        let m = Transform::rotate(&axis, a);
        let n = axis.normalize();
        let (x, y, z) = (n.x, n.y, n.z);
        let (s, c) = a.sin_cos();
        let k = 1.0 - c;
        #[rustfmt::skip]
        let expected = Matrix::new(
            k * x * x + c, k * x * y + z * s, k * z * x - y * s, 0.0,
            k * x * y - z * s, k * y * y + c, k * y * z + x * s, 0.0,
            k * z * x + y * s, k * y * z - x * s, k * z * z + c, 0.0,
            0.0, 0.0, 0.0, 1.0,
        );
        assert_relative_eq!(m, expected, epsilon = 1e-12);
    }

    #[test]
    fn test_perspective_matches_nalgebra() {
        let ours = Transform::perspective(60.0, 1.5, 0.1, 10.0);
        let theirs = Matrix::new_perspective(1.5, 60f64.to_radians(), 0.1, 10.0);
        assert_relative_eq!(ours, theirs, epsilon = 1e-12);
    }

    #[test]
    fn test_look_at_puts_center_on_axis() {
        let eye = Vector::new(3.0, 4.0, 5.0);
        let view = Transform::look_at(&eye, &Vector::zeros(), &Vector::new(0.0, 0.0, 1.0));
        let p = Transform::mul_position(&view, &Vector::zeros());
        assert_relative_eq!(p.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(p.y, 0.0, epsilon = 1e-12);
        assert_relative_eq!(p.z, -eye.norm(), epsilon = 1e-12);
    }

    #[test]
    fn test_mul_position_w_divides() {
        let m = Transform::perspective(90.0, 1.0, 1.0, 10.0);
        let near = Transform::mul_position_w(&m, &Vector::new(0.0, 0.0, -1.0));
        let far = Transform::mul_position_w(&m, &Vector::new(0.0, 0.0, -10.0));
        assert_relative_eq!(near.z, -1.0, epsilon = 1e-12);
        assert_relative_eq!(far.z, 1.0, epsilon = 1e-12);
        let edge = Transform::mul_position_w(&m, &Vector::new(1.0, 0.0, -1.0));
        assert_relative_eq!(edge.x, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_mul_direction_normalizes() {
        let m = Transform::scale(&Vector::new(3.0, 1.0, 1.0));
        let d = Transform::mul_direction(&m, &Vector::new(1.0, 0.0, 0.0));
        assert_relative_eq!(d, Vector::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_mul_box_rotated() {
        let m = Transform::rotate(&Vector::new(0.0, 0.0, 1.0), std::f64::consts::FRAC_PI_2);
        let b = Aabb::new(Vector::new(0.0, 0.0, 0.0), Vector::new(2.0, 1.0, 1.0));
        let r = Transform::mul_box(&m, &b);
        assert_relative_eq!(r.min, Vector::new(0.0, -2.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(r.max, Vector::new(1.0, 0.0, 1.0), epsilon = 1e-12);
    }

    #[test]
    fn test_screen_maps_clip_corners() {
        let m = Transform::screen(512.0, 256.0);
        let top_left = Transform::mul_position(&m, &Vector::new(-1.0, 1.0, 0.3));
        let bottom_right = Transform::mul_position(&m, &Vector::new(1.0, -1.0, 0.3));
        assert_eq!(top_left, Vector::new(0.0, 0.0, 0.0));
        assert_eq!(bottom_right, Vector::new(512.0, 256.0, 0.0));
    }

    #[test]
    fn test_singular_inverse_is_nan() {
        let m = Transform::scale(&Vector::new(1.0, 0.0, 1.0));
        assert!(Transform::inverse(&m)[(0, 0)].is_nan());
        let t = Transform::translate(&Vector::new(1.0, 2.0, 3.0));
        assert_relative_eq!(Transform::inverse(&t) * t, Matrix::identity(), epsilon = 1e-12);
    }
}
