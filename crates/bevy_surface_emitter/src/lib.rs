//! # bevy_surface_emitter
//!
//! Particle emitter shapes for Bevy, centred on emitting from the surface of a
//! triangle mesh.
//!
//! Emitters produce a world-space start position and direction per particle.
//! When and how many particles to spawn is up to the owning particle system;
//! it calls the position phase then the direction phase for each particle, or
//! [`ParticleEmitter::emit`] to run both.
//!
//! ## Quick Start
//!
//! ```ignore
//! use bevy::prelude::*;
//! use bevy_surface_emitter::prelude::*;
//!
//! fn spawn_sparks(meshes: Res<MeshLibrary>, mut rng: Local<Option<fastrand::Rng>>) {
//!     let rng = rng.get_or_insert_with(|| fastrand::Rng::with_seed(7));
//!     let emitter = MeshParticleEmitter::new(meshes.find_mesh("hull"));
//!     let world = Mat4::from_translation(Vec3::Y);
//!     for i in 0..16 {
//!         if let Some(emission) = emitter.emit(&world, ParticleId(i), rng) {
//!             info!("spark at {} heading {}", emission.position, emission.direction);
//!         }
//!     }
//! }
//! ```

pub mod data;
pub mod emitter;
pub mod gpu;
pub mod mesh_emitter;
pub mod random;
pub mod record;
pub mod registry;
pub mod sampler;
pub mod shapes;
pub mod surface;

pub use data::{DirectionRange, Emission, EmissionState, ParticleId};
pub use emitter::ParticleEmitter;
pub use gpu::{GpuEmitterParams, ShaderParameters, UniformSink};
pub use mesh_emitter::MeshParticleEmitter;
pub use random::RandomSource;
pub use record::{EmitterError, EmitterRecord};
pub use registry::{EmitterParser, EmitterTypeRegistry};
pub use sampler::{Barycentric, TriangleSample};
pub use shapes::{BoxParticleEmitter, PointParticleEmitter};
pub use surface::{MeshBuffers, MeshLibrary, MeshLookup, SourceMesh, SurfaceMesh, SurfaceSource, VertexKind};

use bevy::prelude::*;

/// Convenient re-exports of commonly used types.
pub mod prelude {
    pub use crate::data::{DirectionRange, Emission, EmissionState, ParticleId};
    pub use crate::emitter::ParticleEmitter;
    pub use crate::mesh_emitter::MeshParticleEmitter;
    pub use crate::random::RandomSource;
    pub use crate::registry::EmitterTypeRegistry;
    pub use crate::shapes::{BoxParticleEmitter, PointParticleEmitter};
    pub use crate::surface::{MeshLibrary, MeshLookup, SourceMesh};
    pub use crate::SurfaceEmitterPlugin;
}

/// Installs the emitter type registry and mesh library resources.
pub struct SurfaceEmitterPlugin;

impl Plugin for SurfaceEmitterPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<DirectionRange>()
            .init_resource::<EmitterTypeRegistry>()
            .init_resource::<MeshLibrary>();
    }
}
