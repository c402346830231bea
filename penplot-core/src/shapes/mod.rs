/// Solid and surface primitives that can be ray cast and stroked
mod box_shape;
mod csg;
mod cylinder;
mod empty;
mod function;
mod mesh;
mod silhouette;
mod sphere;
mod transformed;
mod triangle;

pub use box_shape::BoxShape;
pub use csg::{CsgOperation, CsgShape, MAX_CSG_RETRIES};
pub use cylinder::CylinderShape;
pub use empty::EmptyShape;
pub use function::{FunctionDirection, FunctionShape, MARCH_DISTANCE, MARCH_STEP};
pub use mesh::MeshShape;
pub use silhouette::{EdgeInfo, SilhouetteMeshShape};
pub use sphere::SphereShape;
pub use transformed::TransformShape;
pub use triangle::TriangleShape;

use crate::geometry::{Aabb, Hit, Ray, Vector};
use crate::path::Paths;

/// Capability set shared by every renderable shape.
///
/// Strokes are decorative. A sphere is drawn with latitude and longitude
/// rings, a cylinder with vertical rulings; none of them need to trace the
/// exact solid boundary that [`Shape::contains`] and [`Shape::intersect`]
/// describe.
pub trait Shape: Send + Sync {
    /// Build any internal acceleration structure. Must be idempotent.
    fn compile(&self) {}

    /// Conservative axis-aligned bounds
    fn bounding_box(&self) -> Aabb;

    /// Inside test with `fudge` added to the boundary; negative fudge shrinks the solid.
    /// Shapes without a closed interior always answer `false`.
    fn contains(&self, v: &Vector, fudge: f64) -> bool;

    /// Nearest hit with a positive ray parameter, or [`Hit::no_hit`]
    fn intersect(&self, ray: &Ray) -> Hit<'_>;

    /// Strokes that draw this shape
    fn paths(&self) -> Paths;
}
