/// Whole-collection counterparts of the per-path operations in [`crate::path`]
use crate::filter::Filter;
use crate::geometry::Aabb;
use crate::path::{self, Path, Paths};
use crate::transform::Matrix;

/// Union of every path's bounds; the zero box for an empty collection
pub fn bounding_box(paths: &[Path]) -> Aabb {
    let mut iter = paths.iter();
    let Some(first) = iter.next() else {
        return Aabb::default();
    };
    iter.fold(path::bounding_box(first), |acc, p| {
        acc.extend(&path::bounding_box(p))
    })
}

pub fn transform(paths: &[Path], matrix: &Matrix) -> Paths {
    paths.iter().map(|p| path::transform(p, matrix)).collect()
}

pub fn chop(paths: &[Path], step: f64) -> Paths {
    paths.iter().map(|p| path::chop(p, step)).collect()
}

pub fn filter(paths: &[Path], filter: &dyn Filter) -> Paths {
    paths.iter().flat_map(|p| path::filter(p, filter)).collect()
}

pub fn simplify(paths: &[Path], threshold: f64) -> Paths {
    paths.iter().map(|p| path::simplify(p, threshold)).collect()
}

/// Total number of points across all paths
pub fn point_count(paths: &[Path]) -> usize {
    paths.iter().map(Vec::len).sum()
}
