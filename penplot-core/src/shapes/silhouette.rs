use std::collections::BTreeMap;
use std::sync::Arc;

use crate::geometry::{Aabb, Hit, Ray, Vector};
use crate::obj;
use crate::path::Paths;
use crate::transform::Matrix;

use super::mesh::TriangleMesh;
use super::{Shape, TriangleShape};

/// The triangles on either side of an undirected mesh edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeInfo {
    /// First triangle that used the edge
    pub t1: usize,
    /// Last other triangle that used the edge; `None` on a boundary
    pub t2: Option<usize>,
    /// Position of the edge's first vertex within `t1`
    pub t1_vertex: usize,
}

/// A mesh that only strokes its outline as seen from a fixed eye.
///
/// Ray casting still sees every triangle, so interior creases hide what is
/// behind them even though they are never drawn.
pub struct SilhouetteMeshShape {
    mesh: TriangleMesh,
    edges: BTreeMap<(usize, usize), EdgeInfo>,
    pub eye: Vector,
    pub epsilon: f64,
}

impl SilhouetteMeshShape {
    /// Build from indexed geometry. Faces that reference a missing vertex are skipped.
    pub fn from_mesh(vertices: &[Vector], faces: &[[usize; 3]], eye: Vector, epsilon: f64) -> Self {
        let mut triangles = Vec::with_capacity(faces.len());
        let mut edges = BTreeMap::new();

        for face in faces {
            let (Some(&a), Some(&b), Some(&c)) = (
                vertices.get(face[0]),
                vertices.get(face[1]),
                vertices.get(face[2]),
            ) else {
                log::debug!("skipping face {face:?}: vertex index out of range");
                continue;
            };
            let index = triangles.len();
            triangles.push(TriangleShape::new(a, b, c));

            for j in 0..3 {
                let (i1, i2) = (face[j], face[(j + 1) % 3]);
                let key = (i1.min(i2), i1.max(i2));
                edges
                    .entry(key)
                    .and_modify(|e: &mut EdgeInfo| e.t2 = Some(index))
                    .or_insert(EdgeInfo {
                        t1: index,
                        t2: None,
                        t1_vertex: j,
                    });
            }
        }

        Self {
            mesh: TriangleMesh::new(triangles),
            edges,
            eye,
            epsilon,
        }
    }

    pub fn from_obj_str(text: &str, eye: Vector, epsilon: f64) -> Self {
        let data = obj::parse(text);
        Self::from_mesh(&data.vertices, &data.faces, eye, epsilon)
    }

    pub fn triangles(&self) -> &[Arc<TriangleShape>] {
        self.mesh.triangles()
    }

    pub fn edges(&self) -> &BTreeMap<(usize, usize), EdgeInfo> {
        &self.edges
    }

    pub fn is_compiled(&self) -> bool {
        self.mesh.is_compiled()
    }

    pub fn update_bounding_box(&mut self) {
        self.mesh.update_bounding_box();
    }

    pub fn unit_cube(&mut self) {
        self.mesh.unit_cube();
    }

    pub fn move_to(&mut self, position: &Vector, anchor: &Vector) {
        self.mesh.move_to(position, anchor);
    }

    pub fn fit_inside(&mut self, target: &Aabb, anchor: &Vector) {
        self.mesh.fit_inside(target, anchor);
    }

    /// Rewrite every vertex through `matrix`. The eye is left alone.
    pub fn transform(&mut self, matrix: &Matrix) {
        self.mesh.transform(matrix);
    }

    /// Whether the two faces meeting at an edge turn different ways to the eye
    fn is_silhouette(&self, n1: &Vector, n2: &Vector) -> bool {
        let eye = self.eye.normalize();
        let eps = self.epsilon;
        let d1 = eye.dot(n1);
        let d2 = eye.dot(n2);
        (d1 >= -eps && d2 <= eps) || (d1 <= eps && d2 >= -eps)
    }
}

impl Shape for SilhouetteMeshShape {
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
        let triangles = self.mesh.triangles();
        let mut result = Paths::new();
        for edge in self.edges.values() {
            let t1 = &triangles[edge.t1];
            let points = t1.vertices();
            let stroke = vec![points[edge.t1_vertex], points[(edge.t1_vertex + 1) % 3]];
            match edge.t2 {
                None => result.push(stroke),
                Some(t2) => {
                    if self.is_silhouette(&t1.normal(), &triangles[t2].normal()) {
                        result.push(stroke);
                    }
                }
            }
        }
        result
    }
}
