/// KD-tree over shape bounding boxes for nearest-hit ray queries
use std::sync::Arc;

use crate::geometry::{median, Aabb, Axis, Hit, Ray};
use crate::shapes::Shape;

/// Nodes with fewer shapes than this stay leaves
const MIN_SPLIT_SHAPES: usize = 8;

/// A split is only taken when the fuller side keeps less than this share of the shapes
const SPLIT_RATIO: f64 = 0.85;

/// A KD-tree node: a leaf owning shapes, or a split owning exactly two children
pub enum Node {
    Leaf {
        shapes: Vec<Arc<dyn Shape>>,
    },
    Split {
        axis: Axis,
        point: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

impl Node {
    /// Build a subtree, splitting recursively while a good split exists
    pub fn build(shapes: Vec<Arc<dyn Shape>>) -> Node {
        if shapes.len() < MIN_SPLIT_SHAPES {
            return Node::Leaf { shapes };
        }

        let boxes: Vec<Aabb> = shapes.iter().map(|s| s.bounding_box()).collect();
        let (axis, point) = best_split(&boxes);
        if axis == Axis::None {
            return Node::Leaf { shapes };
        }

        let mut left = Vec::new();
        let mut right = Vec::new();
        for (shape, b) in shapes.into_iter().zip(&boxes) {
            let (l, r) = b.partition(axis, point);
            if l {
                left.push(Arc::clone(&shape));
            }
            if r {
                right.push(shape);
            }
        }

        Node::Split {
            axis,
            point,
            left: Box::new(Node::build(left)),
            right: Box::new(Node::build(right)),
        }
    }

    /// Nearest hit for the part of `ray` between `tmin` and `tmax`
    pub fn intersect(&self, ray: &Ray, tmin: f64, tmax: f64) -> Hit<'_> {
        let (axis, point, left, right) = match self {
            Node::Leaf { shapes } => return intersect_shapes(shapes, ray),
            Node::Split {
                axis,
                point,
                left,
                right,
            } => (*axis, *point, left, right),
        };

        let (origin, direction) = match (
            axis.coordinate(&ray.origin),
            axis.coordinate(&ray.direction),
        ) {
            (Some(o), Some(d)) => (o, d),
            _ => unreachable!("split node without a split axis"),
        };

        let tsplit = (point - origin) / direction;
        let left_first = origin < point || (origin == point && direction <= 0.0);
        let (first, second) = if left_first {
            (left, right)
        } else {
            (right, left)
        };

        if tsplit > tmax || tsplit <= 0.0 {
            first.intersect(ray, tmin, tmax)
        } else if tsplit < tmin {
            second.intersect(ray, tmin, tmax)
        } else {
            let h1 = first.intersect(ray, tmin, tsplit);
            if h1.t <= tsplit {
                return h1;
            }
            let h2 = second.intersect(ray, tsplit, tmax.min(h1.t));
            if h1.t <= h2.t {
                h1
            } else {
                h2
            }
        }
    }

    /// Number of leaves below (and including) this node
    pub fn leaf_count(&self) -> usize {
        match self {
            Node::Leaf { .. } => 1,
            Node::Split { left, right, .. } => left.leaf_count() + right.leaf_count(),
        }
    }

    pub fn depth(&self) -> usize {
        match self {
            Node::Leaf { .. } => 0,
            Node::Split { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }
}

/// A bounded KD-tree, built once from a snapshot of shapes.
///
/// Each interior node splits its shapes at the median of their box extents
/// along whichever axis leaves the fewest shapes on the fuller side. Boxes
/// that straddle the split plane are stored on both sides, so a ray is only
/// ever tested against the shapes of the leaves it passes through.
pub struct Tree {
    pub bounds: Aabb,
    pub root: Node,
}

impl Tree {
    pub fn new(shapes: &[Arc<dyn Shape>]) -> Self {
        let bounds = Aabb::for_shapes(shapes);
        let root = Node::build(shapes.to_vec());
        log::debug!(
            "built kd-tree over {} shapes: {} leaves, depth {}",
            shapes.len(),
            root.leaf_count(),
            root.depth()
        );
        Self { bounds, root }
    }

    pub fn intersect(&self, ray: &Ray) -> Hit<'_> {
        let (tmin, tmax) = self.bounds.intersect(ray);
        if tmax < tmin || tmax <= 0.0 {
            return Hit::no_hit();
        }
        self.root.intersect(ray, tmin, tmax)
    }
}

fn intersect_shapes<'a>(shapes: &'a [Arc<dyn Shape>], ray: &Ray) -> Hit<'a> {
    let mut hit = Hit::no_hit();
    for shape in shapes {
        let h = shape.intersect(ray);
        if h.t < hit.t {
            hit = h;
        }
    }
    hit
}

/// Pick the median split with the lowest partition score, or `Axis::None`
fn best_split(boxes: &[Aabb]) -> (Axis, f64) {
    let mut best = (boxes.len() as f64 * SPLIT_RATIO).floor() as usize;
    let mut best_axis = Axis::None;
    let mut best_point = 0.0;

    for axis in [Axis::X, Axis::Y, Axis::Z] {
        let mut coords: Vec<f64> = boxes
            .iter()
            .flat_map(|b| [axis.coordinate(&b.min), axis.coordinate(&b.max)])
            .flatten()
            .collect();
        coords.sort_by(f64::total_cmp);
        let point = median(&coords);
        let score = partition_score(boxes, axis, point);
        if score < best {
            best = score;
            best_axis = axis;
            best_point = point;
        }
    }

    (best_axis, best_point)
}

/// Size of the fuller side of a split; straddling boxes count on both sides
fn partition_score(boxes: &[Aabb], axis: Axis, point: f64) -> usize {
    let (left, right) = boxes.iter().fold((0, 0), |(left, right), b| {
        let (l, r) = b.partition(axis, point);
        (left + l as usize, right + r as usize)
    });
    left.max(right)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Vector;
    use crate::shapes::{BoxShape, SphereShape, TriangleShape};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn random_vector(rng: &mut StdRng, extent: f64) -> Vector {
        Vector::new(
            rng.random_range(-extent..extent),
            rng.random_range(-extent..extent),
            rng.random_range(-extent..extent),
        )
    }

    fn random_shapes(rng: &mut StdRng, count: usize) -> Vec<Arc<dyn Shape>> {
        (0..count)
            .map(|i| -> Arc<dyn Shape> {
                let c = random_vector(rng, 10.0);
                match i % 3 {
                    0 => Arc::new(SphereShape::new(c, rng.random_range(0.1..1.0))),
                    1 => {
                        let size = Vector::new(
                            rng.random_range(0.1..1.5),
                            rng.random_range(0.1..1.5),
                            rng.random_range(0.1..1.5),
                        );
                        Arc::new(BoxShape::new(c, c + size))
                    }
                    _ => Arc::new(TriangleShape::new(
                        c,
                        c + random_vector(rng, 1.0),
                        c + random_vector(rng, 1.0),
                    )),
                }
            })
            .collect()
    }

    fn brute_force<'a>(shapes: &'a [Arc<dyn Shape>], ray: &Ray) -> Hit<'a> {
        intersect_shapes(shapes, ray)
    }

    #[test]
    fn test_small_sets_stay_leaves() {
        let mut rng = StdRng::seed_from_u64(7);
        let tree = Tree::new(&random_shapes(&mut rng, 7));
        assert!(matches!(tree.root, Node::Leaf { .. }));
    }

    #[test]
    fn test_large_sets_split() {
        let mut rng = StdRng::seed_from_u64(11);
        let tree = Tree::new(&random_shapes(&mut rng, 300));
        assert!(matches!(tree.root, Node::Split { .. }));
        assert!(tree.root.leaf_count() > 1);
    }

    #[test]
    fn test_coincident_shapes_cannot_split() {
        let shapes: Vec<Arc<dyn Shape>> = (0..20)
            .map(|_| -> Arc<dyn Shape> { Arc::new(SphereShape::new(Vector::zeros(), 1.0)) })
            .collect();
        let tree = Tree::new(&shapes);
        assert!(matches!(tree.root, Node::Leaf { .. }));
    }

    #[test]
    fn test_straddling_shapes_land_on_both_sides() {
        let mut shapes: Vec<Arc<dyn Shape>> = Vec::new();
        for i in 0..8 {
            let x = if i < 4 { -5.0 } else { 5.0 } + i as f64 * 0.01;
            shapes.push(Arc::new(SphereShape::new(Vector::new(x, 0.0, 0.0), 0.5)));
        }
        shapes.push(Arc::new(BoxShape::new(
            Vector::new(-6.0, -0.1, -0.1),
            Vector::new(6.0, 0.1, 0.1),
        )));
        let root = Node::build(shapes);
        let Node::Split {
            axis, left, right, ..
        } = root
        else {
            panic!("expected a split");
        };
        assert_eq!(axis, Axis::X);
        let count = |n: &Node| match n {
            Node::Leaf { shapes } => shapes.len(),
            Node::Split { .. } => 0,
        };
        assert_eq!(count(&left), 5);
        assert_eq!(count(&right), 5);
    }

    #[test]
    fn test_tree_matches_brute_force() {
        let mut rng = StdRng::seed_from_u64(42);
        let shapes = random_shapes(&mut rng, 500);
        let tree = Tree::new(&shapes);
        let mut hits = 0;
        for _ in 0..2000 {
            let origin = random_vector(&mut rng, 15.0);
            let direction = random_vector(&mut rng, 1.0).normalize();
            let ray = Ray::new(origin, direction);
            let expected = brute_force(&shapes, &ray);
            let actual = tree.intersect(&ray);
            assert_eq!(expected.ok(), actual.ok());
            if expected.ok() {
                hits += 1;
                assert_eq!(expected.t, actual.t);
                assert!(expected.same_shape(&actual));
            }
        }
        assert!(hits > 100, "only {hits} rays hit anything");
    }

    #[test]
    fn test_ray_pointing_away_misses() {
        let mut rng = StdRng::seed_from_u64(3);
        let tree = Tree::new(&random_shapes(&mut rng, 50));
        let ray = Ray::new(Vector::new(100.0, 0.0, 0.0), Vector::new(1.0, 0.0, 0.0));
        assert!(!tree.intersect(&ray).ok());
    }

    #[test]
    fn test_empty_tree() {
        let tree = Tree::new(&[]);
        let ray = Ray::new(Vector::new(0.0, 0.0, -1.0), Vector::new(0.0, 0.0, 1.0));
        assert!(!tree.intersect(&ray).ok());
    }
}
