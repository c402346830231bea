use crate::geometry::{lat_lng_to_xyz, Aabb, Hit, Ray, Vector};
use crate::path::{Path, Paths};

use super::Shape;

/// Roots closer than this are treated as self-intersections
const SPHERE_EPSILON: f64 = 1e-2;

/// Degrees between neighbouring latitude rings and meridians
const RING_SPACING: i32 = 10;

/// Rings stop this many degrees short of each pole
const POLE_OFFSET: i32 = 10;

#[derive(Debug, Clone, Copy)]
pub struct SphereShape {
    pub center: Vector,
    pub radius: f64,
}

impl SphereShape {
    pub fn new(center: Vector, radius: f64) -> Self {
        Self { center, radius }
    }
}

impl Shape for SphereShape {
    fn bounding_box(&self) -> Aabb {
        let r = Vector::repeat(self.radius);
        Aabb::new(self.center - r, self.center + r)
    }

    fn contains(&self, v: &Vector, fudge: f64) -> bool {
        (v - self.center).norm() <= self.radius + fudge
    }

    fn intersect(&self, ray: &Ray) -> Hit<'_> {
        let to = ray.origin - self.center;
        let a = ray.direction.norm_squared();
        let b = to.dot(&ray.direction);
        let c = to.norm_squared() - self.radius * self.radius;
        let d = b * b - a * c;
        if d > 0.0 {
            let d = d.sqrt();
            let t1 = (-b - d) / a;
            if t1 > SPHERE_EPSILON {
                return Hit::new(self, t1);
            }
            let t2 = (-b + d) / a;
            if t2 > SPHERE_EPSILON {
                return Hit::new(self, t2);
            }
        }
        Hit::no_hit()
    }

    /// Latitude rings and meridians
    fn paths(&self) -> Paths {
        let mut paths = Paths::new();
        let (lo, hi) = (-90 + POLE_OFFSET, 90 - POLE_OFFSET);
        for lat in (lo..=hi).step_by(RING_SPACING as usize) {
            let ring: Path = (0..=360)
                .map(|lng| lat_lng_to_xyz(lat as f64, lng as f64, self.radius) + self.center)
                .collect();
            paths.push(ring);
        }
        for lng in (0..=360).step_by(RING_SPACING as usize) {
            let meridian: Path = (lo..=hi)
                .map(|lat| lat_lng_to_xyz(lat as f64, lng as f64, self.radius) + self.center)
                .collect();
            paths.push(meridian);
        }
        paths
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_ray_through_center() {
        let sphere = SphereShape::new(Vector::zeros(), 5.0);
        let ray = Ray::new(Vector::new(-10.0, 0.0, 0.0), Vector::new(1.0, 0.0, 0.0));
        assert_relative_eq!(sphere.intersect(&ray).t, 5.0);
    }

    #[test]
    fn test_ray_from_inside_hits_far_side() {
        let sphere = SphereShape::new(Vector::new(1.0, 0.0, 0.0), 2.0);
        let ray = Ray::new(Vector::new(1.0, 0.0, 0.0), Vector::new(0.0, 1.0, 0.0));
        assert_relative_eq!(sphere.intersect(&ray).t, 2.0);
    }

    #[test]
    fn test_miss_and_tangent() {
        let sphere = SphereShape::new(Vector::zeros(), 1.0);
        let miss = Ray::new(Vector::new(-5.0, 2.0, 0.0), Vector::new(1.0, 0.0, 0.0));
        let tangent = Ray::new(Vector::new(-5.0, 1.0, 0.0), Vector::new(1.0, 0.0, 0.0));
        assert!(!sphere.intersect(&miss).ok());
        assert!(!sphere.intersect(&tangent).ok());
    }

    #[test]
    fn test_random_rays_match_closed_form() {
        let mut rng = StdRng::seed_from_u64(17);
        let center = Vector::new(0.5, -1.0, 2.0);
        let radius = 1.5;
        let sphere = SphereShape::new(center, radius);
        for _ in 0..500 {
            let dir = Vector::new(
                rng.random_range(-1.0..1.0),
                rng.random_range(-1.0..1.0),
                rng.random_range(-1.0..1.0),
            )
            .normalize();
            let distance = rng.random_range(2.0..10.0);
            let origin = center + dir * distance;
            // aim straight back at the centre: the first root is at distance - radius
            let ray = Ray::new(origin, -dir);
            assert_relative_eq!(
                sphere.intersect(&ray).t,
                distance - radius,
                max_relative = 1e-6
            );
        }
    }

    fn random_vector(rng: &mut StdRng, extent: f64) -> Vector {
        Vector::new(
            rng.random_range(-extent..extent),
            rng.random_range(-extent..extent),
            rng.random_range(-extent..extent),
        )
    }

    #[test]
    fn test_random_oblique_rays_match_chord_root() {
        let mut rng = StdRng::seed_from_u64(29);
        let center = Vector::new(0.5, -1.0, 2.0);
        let radius = 1.5;
        let sphere = SphereShape::new(center, radius);
        let (mut hits, mut misses) = (0, 0);
        for _ in 0..2000 {
            let origin = center + random_vector(&mut rng, 6.0);
            let target = center + random_vector(&mut rng, 2.0);
            let d = (target - origin).normalize();
            let ray = Ray::new(origin, d);

            // closest approach of the ray to the centre, then half the chord
            let to_center = center - origin;
            let tc = to_center.dot(&d);
            let h2 = to_center.norm_squared() - tc * tc;
            if (h2 - radius * radius).abs() < 1e-6 {
                continue;
            }
            let hit = sphere.intersect(&ray);
            if h2 > radius * radius {
                assert!(!hit.ok());
                misses += 1;
                continue;
            }
            let half = (radius * radius - h2).sqrt();
            match [tc - half, tc + half].into_iter().find(|&t| t > SPHERE_EPSILON) {
                Some(t) => {
                    assert_relative_eq!(hit.t, t, epsilon = 1e-9, max_relative = 1e-6);
                    hits += 1;
                }
                None => assert!(!hit.ok()),
            }
        }
        assert!(hits > 500, "only {hits} hits");
        assert!(misses > 50, "only {misses} misses");
    }

    #[test]
    fn test_paths_lie_on_surface() {
        let sphere = SphereShape::new(Vector::new(1.0, 2.0, 3.0), 2.0);
        let paths = sphere.paths();
        assert_eq!(paths.len(), 17 + 37);
        assert_eq!(paths[0].len(), 361);
        assert_eq!(paths[17].len(), 161);
        for v in paths.iter().flatten() {
            assert_relative_eq!((v - sphere.center).norm(), 2.0, epsilon = 1e-9);
        }
    }
}
