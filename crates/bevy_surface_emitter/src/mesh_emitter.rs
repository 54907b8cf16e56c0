//! Emitter that spawns particles on the surface of a triangle mesh.
//!
//! Emission is two-phase. [`MeshParticleEmitter::compute_surface_position`]
//! picks a point on the mesh and returns an [`EmissionState`] carrying the
//! interpolated surface normal; [`MeshParticleEmitter::compute_surface_direction`]
//! consumes that state for the same particle. [`MeshParticleEmitter::emit`] runs
//! both in order.

use bevy::prelude::*;

use crate::data::{DirectionRange, Emission, EmissionState, ParticleId};
use crate::gpu::UniformSink;
use crate::random::RandomSource;
use crate::record::EmitterRecord;
use crate::sampler::sample_surface;
use crate::surface::{MeshLookup, SourceMesh, SurfaceSource};

/// Emits from random points on a mesh surface.
///
/// The mesh geometry is copied when the emitter is bound; edits to the mesh
/// afterwards are not seen until it is re-bound.
#[derive(Debug)]
pub struct MeshParticleEmitter {
    mesh: Option<SourceMesh>,
    surface: SurfaceSource,
    /// Range directions are drawn from when normals aren't used.
    pub directions: DirectionRange,
    /// Emit along the interpolated surface normal when the mesh has normals.
    pub use_mesh_normals_for_direction: bool,
}

impl Default for MeshParticleEmitter {
    fn default() -> Self {
        Self::new(None)
    }
}

impl Clone for MeshParticleEmitter {
    /// Re-binds the same source mesh, taking a fresh snapshot of its geometry.
    fn clone(&self) -> Self {
        let mut cloned = Self::new(self.mesh.clone());
        cloned.directions = self.directions;
        cloned.use_mesh_normals_for_direction = self.use_mesh_normals_for_direction;
        cloned
    }
}

impl MeshParticleEmitter {
    pub const CLASS_NAME: &'static str = "MeshParticleEmitter";

    /// Create an emitter bound to `mesh`. With no mesh every sampling call is a
    /// no-op.
    pub fn new(mesh: Option<SourceMesh>) -> Self {
        Self {
            surface: SurfaceSource::bind(mesh.as_ref()),
            mesh,
            directions: DirectionRange::default(),
            use_mesh_normals_for_direction: true,
        }
    }

    pub fn from_mesh(mesh: SourceMesh) -> Self {
        Self::new(Some(mesh))
    }

    pub fn with_directions(mut self, direction1: Vec3, direction2: Vec3) -> Self {
        self.directions = DirectionRange::new(direction1, direction2);
        self
    }

    pub fn with_mesh_normals(mut self, enabled: bool) -> Self {
        self.use_mesh_normals_for_direction = enabled;
        self
    }

    pub fn mesh(&self) -> Option<&SourceMesh> {
        self.mesh.as_ref()
    }

    pub fn surface(&self) -> &SurfaceSource {
        &self.surface
    }

    /// Bind to a different mesh (or none), replacing the geometry snapshot.
    pub fn set_mesh(&mut self, mesh: Option<SourceMesh>) {
        self.surface = SurfaceSource::bind(mesh.as_ref());
        self.mesh = mesh;
    }

    /// Write a random world-space surface point into `position`.
    ///
    /// Returns the state the direction phase of this particle needs, or `None`
    /// (leaving `position` untouched) when there is nothing to sample.
    pub fn compute_surface_position<R: RandomSource + ?Sized>(
        &self,
        world: &Mat4,
        position: &mut Vec3,
        _particle: ParticleId,
        rng: &mut R,
    ) -> Option<EmissionState> {
        let sample = sample_surface(&self.surface, self.use_mesh_normals_for_direction, rng)?;
        *position = world.transform_point3(sample.position);
        Some(EmissionState {
            face_normal: sample.normal,
        })
    }

    /// Write the world-space emission direction into `direction`.
    ///
    /// `state` must come from this particle's position phase. The surface
    /// normal is used when normal mode is on and the state carries one;
    /// otherwise a direction is drawn from [`Self::directions`].
    pub fn compute_surface_direction<R: RandomSource + ?Sized>(
        &self,
        world: &Mat4,
        direction: &mut Vec3,
        _particle: ParticleId,
        state: &EmissionState,
        rng: &mut R,
    ) {
        *direction = match state.face_normal {
            Some(normal) if self.use_mesh_normals_for_direction => world.transform_vector3(normal),
            _ => self.directions.sample_world(world, rng),
        };
    }

    /// Run both emission phases for one particle.
    pub fn emit<R: RandomSource + ?Sized>(
        &self,
        world: &Mat4,
        particle: ParticleId,
        rng: &mut R,
    ) -> Option<Emission> {
        let mut position = Vec3::ZERO;
        let state = self.compute_surface_position(world, &mut position, particle, rng)?;
        let mut direction = Vec3::ZERO;
        self.compute_surface_direction(world, &mut direction, particle, &state, rng);
        Some(Emission {
            position,
            direction,
        })
    }

    pub fn to_record(&self) -> EmitterRecord {
        let mut record = EmitterRecord::new(Self::CLASS_NAME, &self.directions);
        record.mesh_id = self.mesh.as_ref().and_then(|m| m.id()).map(str::to_string);
        record.use_mesh_normals_for_direction = Some(self.use_mesh_normals_for_direction);
        record
    }

    /// Rebuild an emitter from `record`, resolving its mesh through `meshes`.
    ///
    /// An unresolvable mesh id leaves the emitter unbound.
    pub fn from_record(record: &EmitterRecord, meshes: &dyn MeshLookup) -> Self {
        let mesh = record.mesh_id.as_deref().and_then(|id| {
            let found = meshes.find_mesh(id);
            if found.is_none() {
                warn!("Mesh '{}' not found; mesh emitter left unbound", id);
            }
            found
        });

        let mut emitter = Self::new(mesh);
        emitter.directions = record.directions();
        emitter.use_mesh_normals_for_direction = record.use_mesh_normals_for_direction.unwrap_or(true);
        emitter
    }

    pub fn export_shader_parameters(&self, sink: &mut impl UniformSink) {
        sink.set_vec3("direction1", self.directions.direction1);
        sink.set_vec3("direction2", self.directions.direction2);
    }

    /// Preprocessor defines for the GPU variant; mesh emission needs none.
    pub fn shader_defines(&self) -> String {
        String::new()
    }
}
