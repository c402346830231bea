use std::sync::{Arc, OnceLock};

use crate::error::Result;
use crate::geometry::{Aabb, Hit, Ray, Vector};
use crate::obj;
use crate::path::Paths;
use crate::stl;
use crate::transform::{Matrix, Transform};
use crate::tree::Tree;

use super::{Shape, TriangleShape};

/// Triangle soup with a lazily built KD-tree.
///
/// Shared by [`MeshShape`] and the silhouette mesh. Any edit to the
/// triangles drops the tree so the next query rebuilds it.
pub(crate) struct TriangleMesh {
    triangles: Vec<Arc<TriangleShape>>,
    bounds: Aabb,
    tree: OnceLock<Tree>,
}

impl TriangleMesh {
    pub(crate) fn new(triangles: Vec<TriangleShape>) -> Self {
        let triangles: Vec<Arc<TriangleShape>> = triangles.into_iter().map(Arc::new).collect();
        let bounds = Aabb::for_triangles(&triangles);
        Self {
            triangles,
            bounds,
            tree: OnceLock::new(),
        }
    }

    pub(crate) fn triangles(&self) -> &[Arc<TriangleShape>] {
        &self.triangles
    }

    pub(crate) fn bounds(&self) -> Aabb {
        self.bounds
    }

    pub(crate) fn tree(&self) -> &Tree {
        self.tree.get_or_init(|| {
            let shapes: Vec<Arc<dyn Shape>> = self
                .triangles
                .iter()
                .map(|t| Arc::clone(t) as Arc<dyn Shape>)
                .collect();
            Tree::new(&shapes)
        })
    }

    pub(crate) fn is_compiled(&self) -> bool {
        self.tree.get().is_some()
    }

    pub(crate) fn update_bounding_box(&mut self) {
        self.bounds = Aabb::for_triangles(&self.triangles);
    }

    pub(crate) fn transform(&mut self, matrix: &Matrix) {
        // the tree holds clones of the triangle handles; release them first
        self.tree = OnceLock::new();
        for t in &mut self.triangles {
            let t = Arc::make_mut(t);
            t.v1 = Transform::mul_position(matrix, &t.v1);
            t.v2 = Transform::mul_position(matrix, &t.v2);
            t.v3 = Transform::mul_position(matrix, &t.v3);
            t.update_bounding_box();
        }
        self.update_bounding_box();
    }

    pub(crate) fn move_to(&mut self, position: &Vector, anchor: &Vector) {
        let offset = position - self.bounds.anchor(anchor);
        self.transform(&Transform::translate(&offset));
    }

    /// Uniformly scale into `target`, placing any slack according to `anchor`
    pub(crate) fn fit_inside(&mut self, target: &Aabb, anchor: &Vector) {
        let size = self.bounds.size();
        let scale = target.size().component_div(&size).min();
        let extra = target.size() - size * scale;
        let matrix = Transform::translate(&(target.min + extra.component_mul(anchor)))
            * Transform::scale(&Vector::new(scale, scale, scale))
            * Transform::translate(&-self.bounds.min);
        self.transform(&matrix);
    }

    pub(crate) fn unit_cube(&mut self) {
        let unit = Aabb::new(Vector::zeros(), Vector::new(1.0, 1.0, 1.0));
        self.fit_inside(&unit, &Vector::zeros());
        self.move_to(&Vector::zeros(), &Vector::new(0.5, 0.5, 0.5));
    }
}

/// A triangle mesh drawn with every triangle edge
pub struct MeshShape {
    mesh: TriangleMesh,
}

impl MeshShape {
    pub fn new(triangles: Vec<TriangleShape>) -> Self {
        Self {
            mesh: TriangleMesh::new(triangles),
        }
    }

    /// Build from OBJ text; see [`crate::obj`] for the accepted subset
    pub fn from_obj_str(text: &str) -> Self {
        let data = obj::parse(text);
        let triangles = data
            .faces
            .iter()
            .map(|&[a, b, c]| TriangleShape::new(data.vertices[a], data.vertices[b], data.vertices[c]))
            .collect();
        Self::new(triangles)
    }

    pub fn from_stl_bytes(data: &[u8]) -> Result<Self> {
        Ok(Self::new(stl::parse_stl(data)?))
    }

    pub fn triangles(&self) -> &[Arc<TriangleShape>] {
        self.mesh.triangles()
    }

    pub fn is_compiled(&self) -> bool {
        self.mesh.is_compiled()
    }

    pub fn update_bounding_box(&mut self) {
        self.mesh.update_bounding_box();
    }

    /// Scale to fit the unit cube, then centre on the origin
    pub fn unit_cube(&mut self) {
        self.mesh.unit_cube();
    }

    /// Translate so the point at `anchor` within the bounds lands on `position`
    pub fn move_to(&mut self, position: &Vector, anchor: &Vector) {
        self.mesh.move_to(position, anchor);
    }

    pub fn fit_inside(&mut self, target: &Aabb, anchor: &Vector) {
        self.mesh.fit_inside(target, anchor);
    }

    /// Rewrite every vertex through `matrix`. Invalidates the tree.
    pub fn transform(&mut self, matrix: &Matrix) {
        self.mesh.transform(matrix);
    }
}

impl Shape for MeshShape {
    fn compile(&self) {
        self.mesh.tree();
    }

    fn bounding_box(&self) -> Aabb {
        self.mesh.bounds()
    }

    fn contains(&self, _v: &Vector, _fudge: f64) -> bool {
        false
    }

    fn intersect(&self, ray: &Ray) -> Hit<'_> {
        self.mesh.tree().intersect(ray)
    }

    fn paths(&self) -> Paths {
        self.mesh.triangles().iter().flat_map(|t| t.paths()).collect()
    }
}
