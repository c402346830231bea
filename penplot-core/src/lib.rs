/// Penplot Core Library - hidden-line vector rendering
///
/// This library turns a scene of 3D solids into the 2D polylines that are
/// visible from a camera, ready for a pen plotter or any other vector sink.
/// It provides the shape primitives, a KD-tree for ray casting, constructive
/// solid geometry, mesh readers and the render pipeline.

pub mod error;
pub mod filter;
pub mod geometry;
pub mod loader;
pub mod obj;
pub mod path;
pub mod paths;
pub mod projection;
pub mod scene;
pub mod shapes;
pub mod stl;
pub mod transform;
pub mod tree;

// Re-export commonly used types
pub use error::{Error, Result};
pub use geometry::{Aabb, Axis, Hit, Ray, Vector};
pub use loader::{load_mesh, load_obj, load_stl};
pub use path::{Path, Paths};
pub use projection::{Camera, ProjectionMode};
pub use scene::Scene;
pub use shapes::{
    BoxShape, CsgOperation, CsgShape, CylinderShape, EmptyShape, FunctionDirection,
    FunctionShape, MeshShape, Shape, SilhouetteMeshShape, SphereShape, TransformShape,
    TriangleShape,
};
pub use transform::{Matrix, Transform};
pub use tree::Tree;
