/// Polyline operations: chop, filter, simplify, transform
use crate::filter::Filter;
use crate::geometry::{segment_distance, Aabb, Vector};
use crate::transform::{Matrix, Transform};

/// A connected polyline; point order defines the stroke direction
pub type Path = Vec<Vector>;

/// A collection of strokes
pub type Paths = Vec<Path>;

pub fn bounding_box(path: &[Vector]) -> Aabb {
    Aabb::for_vectors(path)
}

pub fn transform(path: &[Vector], matrix: &Matrix) -> Path {
    path.iter()
        .map(|v| Transform::mul_position(matrix, v))
        .collect()
}

/// Resample every segment at `step` spacing.
///
/// Original vertices are kept exactly; intermediate points sit at
/// `a + (b - a) * (k * step / |b - a|)` for `k * step < |b - a|`.
pub fn chop(path: &[Vector], step: f64) -> Path {
    let mut result = Path::new();
    for (i, pair) in path.windows(2).enumerate() {
        let (a, b) = (pair[0], pair[1]);
        let v = b - a;
        let length = v.norm();
        if i == 0 {
            result.push(a);
        }
        let mut k = 1.0;
        while k * step < length {
            result.push(a + v * (k * step / length));
            k += 1.0;
        }
        result.push(b);
    }
    result
}

/// Split `path` wherever `filter` rejects a point.
///
/// Accepted points are replaced by the filter's output; runs of a single
/// point are dropped.
pub fn filter(path: &[Vector], filter: &dyn Filter) -> Paths {
    let mut result = Paths::new();
    let mut run = Path::new();
    for v in path {
        let (mapped, ok) = filter.filter(v);
        if ok {
            run.push(mapped);
        } else if run.len() > 1 {
            result.push(std::mem::take(&mut run));
        } else {
            run.clear();
        }
    }
    if run.len() > 1 {
        result.push(run);
    }
    result
}

/// Douglas-Peucker simplification using distance to the chord segment
pub fn simplify(path: &[Vector], threshold: f64) -> Path {
    if path.len() < 3 {
        return path.to_vec();
    }
    let a = path[0];
    let b = path[path.len() - 1];
    let mut index = 0;
    let mut distance = 0.0;
    for (i, v) in path.iter().enumerate().take(path.len() - 1).skip(1) {
        let d = segment_distance(v, &a, &b);
        if d > distance {
            index = i;
            distance = d;
        }
    }
    if distance > threshold {
        let mut left = simplify(&path[..=index], threshold);
        let right = simplify(&path[index..], threshold);
        left.pop();
        left.extend(right);
        left
    } else {
        vec![a, b]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    struct AboveZero;

    impl Filter for AboveZero {
        fn filter(&self, v: &Vector) -> (Vector, bool) {
            (v * 2.0, v.x > 0.0)
        }
    }

    fn points(xs: &[f64]) -> Path {
        xs.iter().map(|&x| Vector::new(x, 0.0, 0.0)).collect()
    }

    #[test]
    fn test_chop_preserves_endpoints_and_spacing() {
        let path = vec![
            Vector::new(0.0, 0.0, 0.0),
            Vector::new(1.0, 0.0, 0.0),
            Vector::new(1.0, 0.35, 0.0),
        ];
        let chopped = chop(&path, 0.1);
        assert_eq!(chopped.first(), path.first());
        assert_eq!(chopped.last(), path.last());
        assert!(chopped.contains(&path[1]));
        for pair in chopped.windows(2) {
            assert!((pair[1] - pair[0]).norm() <= 0.1 + 1e-12);
        }
        assert_eq!(chopped.len(), 1 + 10 + 4);
    }

    #[test]
    fn test_chop_single_point_and_empty() {
        assert!(chop(&[], 0.1).is_empty());
        assert!(chop(&[Vector::zeros()], 0.1).is_empty());
    }

    #[test]
    fn test_filter_splits_runs() {
        let path = points(&[1.0, 2.0, -1.0, 3.0, -1.0, 4.0, 5.0, 6.0]);
        let runs = filter(&path, &AboveZero);
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0], points(&[2.0, 4.0]));
        assert_eq!(runs[1], points(&[8.0, 10.0, 12.0]));
    }

    #[test]
    fn test_simplify_collinear_to_endpoints() {
        let path = points(&[0.0, 0.5, 1.0, 2.5, 3.0]);
        assert_eq!(simplify(&path, 1e-6), points(&[0.0, 3.0]));
    }

    #[test]
    fn test_simplify_keeps_corners_and_is_idempotent() {
        let corner = vec![
            Vector::new(0.0, 0.0, 0.0),
            Vector::new(0.5, 0.0, 0.0),
            Vector::new(1.0, 0.0, 0.0),
            Vector::new(1.0, 0.5, 0.0),
            Vector::new(1.0, 1.0, 0.0),
            Vector::new(0.5, 1.0, 0.0),
        ];
        let once = simplify(&corner, 1e-6);
        assert_eq!(
            once,
            vec![
                Vector::new(0.0, 0.0, 0.0),
                Vector::new(1.0, 0.0, 0.0),
                Vector::new(1.0, 1.0, 0.0),
                Vector::new(0.5, 1.0, 0.0),
            ]
        );
        assert!(once.len() <= corner.len());
        assert_eq!(simplify(&once, 1e-6), once);
    }

    #[test]
    fn test_short_paths_unchanged() {
        let path = points(&[0.0, 1.0]);
        assert_eq!(simplify(&path, 1.0), path);
    }

    #[test]
    fn test_transform_and_bounds() {
        let path = points(&[0.0, 1.0, 2.0]);
        let moved = transform(&path, &Transform::translate(&Vector::new(0.0, 1.0, 0.0)));
        let b = bounding_box(&moved);
        assert_relative_eq!(b.min, Vector::new(0.0, 1.0, 0.0));
        assert_relative_eq!(b.max, Vector::new(2.0, 1.0, 0.0));
    }
}
