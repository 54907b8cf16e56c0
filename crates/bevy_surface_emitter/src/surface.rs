//! Mesh binding for surface emitters.
//!
//! A [`SurfaceMesh`] is anything that can hand out an index buffer and flat
//! per-vertex float buffers. Binding an emitter to one copies those buffers into
//! a [`SurfaceSource`] snapshot; the emitter never reads the mesh again until it
//! is re-bound.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use bevy::mesh::{Indices, PrimitiveTopology, VertexAttributeValues};
use bevy::prelude::*;

// ---------------------------------------------------------------------------
// Mesh collaborator
// ---------------------------------------------------------------------------

/// Per-vertex data kinds an emitter reads.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VertexKind {
    Position,
    Normal,
}

/// Geometry provider an emitter can be bound to.
///
/// Float buffers are flat `[x0, y0, z0, x1, y1, z1, ...]` arrays.
pub trait SurfaceMesh: Send + Sync {
    /// Triangle-list index buffer, or `None` if the mesh has no usable indices.
    fn indices(&self) -> Option<Vec<u32>>;

    /// Flat float data for one vertex kind, or `None` if the mesh lacks it.
    fn vertex_data(&self, kind: VertexKind) -> Option<Vec<f32>>;
}

impl SurfaceMesh for Mesh {
    fn indices(&self) -> Option<Vec<u32>> {
        if self.primitive_topology() != PrimitiveTopology::TriangleList {
            warn!(
                "Surface emitters need a TriangleList mesh, got {:?}",
                self.primitive_topology()
            );
            return None;
        }

        match Mesh::indices(self) {
            Some(Indices::U32(indices)) => Some(indices.clone()),
            Some(Indices::U16(indices)) => Some(indices.iter().map(|&i| i as u32).collect()),
            None => {
                // Non-indexed: every three vertices form a triangle
                let count = self.count_vertices() as u32;
                Some((0..count).collect())
            }
        }
    }

    fn vertex_data(&self, kind: VertexKind) -> Option<Vec<f32>> {
        let attribute = match kind {
            VertexKind::Position => Mesh::ATTRIBUTE_POSITION,
            VertexKind::Normal => Mesh::ATTRIBUTE_NORMAL,
        };
        match self.attribute(attribute)? {
            VertexAttributeValues::Float32x3(v) => Some(v.iter().flatten().copied().collect()),
            other => {
                debug!("Ignoring {:?} data with unsupported format {:?}", kind, other.enum_variant_name());
                None
            }
        }
    }
}

/// Raw geometry buffers, for callers that don't go through Bevy's `Mesh`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshBuffers {
    pub indices: Option<Vec<u32>>,
    pub positions: Option<Vec<f32>>,
    pub normals: Option<Vec<f32>>,
}

impl MeshBuffers {
    pub fn new(indices: Vec<u32>, positions: Vec<f32>) -> Self {
        Self {
            indices: Some(indices),
            positions: Some(positions),
            normals: None,
        }
    }

    pub fn with_normals(mut self, normals: Vec<f32>) -> Self {
        self.normals = Some(normals);
        self
    }
}

impl SurfaceMesh for MeshBuffers {
    fn indices(&self) -> Option<Vec<u32>> {
        self.indices.clone()
    }

    fn vertex_data(&self, kind: VertexKind) -> Option<Vec<f32>> {
        match kind {
            VertexKind::Position => self.positions.clone(),
            VertexKind::Normal => self.normals.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Bound mesh reference
// ---------------------------------------------------------------------------

/// A shared reference to the mesh an emitter is bound to, plus the identifier
/// it is serialized under.
#[derive(Clone)]
pub struct SourceMesh {
    id: Option<String>,
    mesh: Arc<dyn SurfaceMesh>,
}

impl SourceMesh {
    /// Wrap an anonymous mesh. Anonymous meshes serialize without a `meshId`.
    pub fn new(mesh: impl SurfaceMesh + 'static) -> Self {
        Self {
            id: None,
            mesh: Arc::new(mesh),
        }
    }

    /// Wrap a mesh that can be found again by `id` through a [`MeshLookup`].
    pub fn named(id: impl Into<String>, mesh: impl SurfaceMesh + 'static) -> Self {
        Self {
            id: Some(id.into()),
            mesh: Arc::new(mesh),
        }
    }

    pub fn from_shared(id: Option<String>, mesh: Arc<dyn SurfaceMesh>) -> Self {
        Self { id, mesh }
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn mesh(&self) -> &dyn SurfaceMesh {
        self.mesh.as_ref()
    }

    /// Whether both references point at the same mesh instance.
    pub fn same_mesh(&self, other: &SourceMesh) -> bool {
        Arc::ptr_eq(&self.mesh, &other.mesh)
    }
}

impl fmt::Debug for SourceMesh {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceMesh")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// Geometry copied out of a mesh at bind time.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SurfaceSource {
    indices: Option<Vec<u32>>,
    positions: Option<Vec<f32>>,
    normals: Option<Vec<f32>>,
}

impl SurfaceSource {
    /// Copy index, position and normal buffers out of `mesh`.
    pub fn extract(mesh: &dyn SurfaceMesh) -> Self {
        let source = Self {
            indices: mesh.indices(),
            positions: mesh.vertex_data(VertexKind::Position),
            normals: mesh.vertex_data(VertexKind::Normal),
        };
        if source.indices.as_ref().is_some_and(|i| i.len() % 3 != 0) {
            warn!(
                "Index buffer length {} is not a multiple of 3; trailing indices ignored",
                source.indices.as_ref().map_or(0, Vec::len)
            );
        }
        source
    }

    /// Snapshot of an optional mesh; `None` yields an empty source.
    pub fn bind(mesh: Option<&SourceMesh>) -> Self {
        mesh.map(|m| Self::extract(m.mesh())).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.triangle_count() == 0
    }

    pub fn has_normals(&self) -> bool {
        self.normals.is_some()
    }

    /// Number of whole triangles, or 0 when indices or positions are missing.
    pub fn triangle_count(&self) -> usize {
        match (&self.indices, &self.positions) {
            (Some(indices), Some(_)) => indices.len() / 3,
            _ => 0,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.as_ref().map_or(0, |p| p.len() / 3)
    }

    /// Vertex indices of triangle `t`, or `None` if `t` is out of range or any
    /// index points past the position buffer.
    pub fn triangle(&self, t: usize) -> Option<[u32; 3]> {
        if t >= self.triangle_count() {
            return None;
        }
        let indices = self.indices.as_ref()?;
        let tri = [indices[3 * t], indices[3 * t + 1], indices[3 * t + 2]];
        let vertex_count = self.vertex_count();
        tri.iter()
            .all(|&i| (i as usize) < vertex_count)
            .then_some(tri)
    }

    pub fn position(&self, vertex: u32) -> Option<Vec3> {
        read_vec3(self.positions.as_deref()?, vertex)
    }

    pub fn normal(&self, vertex: u32) -> Option<Vec3> {
        read_vec3(self.normals.as_deref()?, vertex)
    }
}

fn read_vec3(data: &[f32], vertex: u32) -> Option<Vec3> {
    let start = vertex as usize * 3;
    let xyz = data.get(start..start + 3)?;
    Some(Vec3::new(xyz[0], xyz[1], xyz[2]))
}

// ---------------------------------------------------------------------------
// Mesh lookup
// ---------------------------------------------------------------------------

/// Resolves serialized mesh identifiers back to live meshes.
pub trait MeshLookup {
    fn find_mesh(&self, id: &str) -> Option<SourceMesh>;
}

impl<F> MeshLookup for F
where
    F: Fn(&str) -> Option<SourceMesh>,
{
    fn find_mesh(&self, id: &str) -> Option<SourceMesh> {
        self(id)
    }
}

/// Named meshes available to emitters when parsing records.
#[derive(Resource, Default)]
pub struct MeshLibrary {
    meshes: HashMap<String, Arc<dyn SurfaceMesh>>,
}

impl MeshLibrary {
    /// Register `mesh` under `id`, replacing any previous entry, and return a
    /// reference suitable for binding an emitter.
    pub fn insert(&mut self, id: impl Into<String>, mesh: impl SurfaceMesh + 'static) -> SourceMesh {
        let id = id.into();
        let mesh: Arc<dyn SurfaceMesh> = Arc::new(mesh);
        self.meshes.insert(id.clone(), mesh.clone());
        SourceMesh::from_shared(Some(id), mesh)
    }

    pub fn remove(&mut self, id: &str) -> bool {
        self.meshes.remove(id).is_some()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.meshes.contains_key(id)
    }

    /// List all registered mesh ids
    pub fn ids(&self) -> Vec<&str> {
        self.meshes.keys().map(|s| s.as_str()).collect()
    }
}

impl MeshLookup for MeshLibrary {
    fn find_mesh(&self, id: &str) -> Option<SourceMesh> {
        self.meshes
            .get(id)
            .map(|mesh| SourceMesh::from_shared(Some(id.to_string()), mesh.clone()))
    }
}
