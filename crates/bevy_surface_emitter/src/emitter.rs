//! The closed set of emitter variants behind one interface.

use bevy::prelude::*;

use crate::data::{DirectionRange, Emission, EmissionState, ParticleId};
use crate::gpu::{GpuEmitterParams, SHAPE_BOX, SHAPE_MESH, SHAPE_POINT, ShaderParameters, UniformSink};
use crate::mesh_emitter::MeshParticleEmitter;
use crate::random::RandomSource;
use crate::record::{EmitterError, EmitterRecord};
use crate::registry::EmitterTypeRegistry;
use crate::shapes::{BoxParticleEmitter, PointParticleEmitter};
use crate::surface::MeshLookup;

/// Any particle emitter shape.
#[derive(Clone, Debug)]
pub enum ParticleEmitter {
    Point(PointParticleEmitter),
    Box(BoxParticleEmitter),
    Mesh(MeshParticleEmitter),
}

impl Default for ParticleEmitter {
    fn default() -> Self {
        Self::Point(PointParticleEmitter::default())
    }
}

impl From<PointParticleEmitter> for ParticleEmitter {
    fn from(emitter: PointParticleEmitter) -> Self {
        Self::Point(emitter)
    }
}

impl From<BoxParticleEmitter> for ParticleEmitter {
    fn from(emitter: BoxParticleEmitter) -> Self {
        Self::Box(emitter)
    }
}

impl From<MeshParticleEmitter> for ParticleEmitter {
    fn from(emitter: MeshParticleEmitter) -> Self {
        Self::Mesh(emitter)
    }
}

impl ParticleEmitter {
    /// Serialization discriminator of this variant.
    pub fn class_name(&self) -> &'static str {
        match self {
            Self::Point(_) => PointParticleEmitter::CLASS_NAME,
            Self::Box(_) => BoxParticleEmitter::CLASS_NAME,
            Self::Mesh(_) => MeshParticleEmitter::CLASS_NAME,
        }
    }

    pub fn directions(&self) -> &DirectionRange {
        match self {
            Self::Point(e) => &e.directions,
            Self::Box(e) => &e.directions,
            Self::Mesh(e) => &e.directions,
        }
    }

    pub fn directions_mut(&mut self) -> &mut DirectionRange {
        match self {
            Self::Point(e) => &mut e.directions,
            Self::Box(e) => &mut e.directions,
            Self::Mesh(e) => &mut e.directions,
        }
    }

    /// Position phase of one emission. `None` means nothing was written.
    pub fn compute_position<R: RandomSource + ?Sized>(
        &self,
        world: &Mat4,
        position: &mut Vec3,
        particle: ParticleId,
        rng: &mut R,
    ) -> Option<EmissionState> {
        match self {
            Self::Point(e) => e.compute_position(world, position, particle, rng),
            Self::Box(e) => e.compute_position(world, position, particle, rng),
            Self::Mesh(e) => e.compute_surface_position(world, position, particle, rng),
        }
    }

    /// Direction phase of one emission, fed by the matching position phase.
    pub fn compute_direction<R: RandomSource + ?Sized>(
        &self,
        world: &Mat4,
        direction: &mut Vec3,
        particle: ParticleId,
        state: &EmissionState,
        rng: &mut R,
    ) {
        match self {
            Self::Point(e) => e.compute_direction(world, direction, particle, state, rng),
            Self::Box(e) => e.compute_direction(world, direction, particle, state, rng),
            Self::Mesh(e) => e.compute_surface_direction(world, direction, particle, state, rng),
        }
    }

    pub fn emit<R: RandomSource + ?Sized>(
        &self,
        world: &Mat4,
        particle: ParticleId,
        rng: &mut R,
    ) -> Option<Emission> {
        match self {
            Self::Point(e) => Some(e.emit(world, particle, rng)),
            Self::Box(e) => Some(e.emit(world, particle, rng)),
            Self::Mesh(e) => e.emit(world, particle, rng),
        }
    }

    pub fn to_record(&self) -> EmitterRecord {
        match self {
            Self::Point(e) => e.to_record(),
            Self::Box(e) => e.to_record(),
            Self::Mesh(e) => e.to_record(),
        }
    }

    /// Serialize to pretty RON.
    pub fn to_ron(&self) -> Result<String, EmitterError> {
        self.to_record().to_ron()
    }

    /// Parse RON text, picking the variant through `registry`.
    pub fn from_ron(
        text: &str,
        registry: &EmitterTypeRegistry,
        meshes: &dyn MeshLookup,
    ) -> Result<Self, EmitterError> {
        registry.parse(&EmitterRecord::from_ron(text)?, meshes)
    }

    pub fn export_shader_parameters(&self, sink: &mut impl UniformSink) {
        match self {
            Self::Point(e) => e.export_shader_parameters(sink),
            Self::Box(e) => e.export_shader_parameters(sink),
            Self::Mesh(e) => e.export_shader_parameters(sink),
        }
    }

    pub fn shader_parameters(&self) -> ShaderParameters {
        let mut params = ShaderParameters::default();
        self.export_shader_parameters(&mut params);
        params
    }

    pub fn shader_defines(&self) -> String {
        match self {
            Self::Point(e) => e.shader_defines(),
            Self::Box(e) => e.shader_defines(),
            Self::Mesh(e) => e.shader_defines(),
        }
    }

    /// Uniform block for a GPU particle pipeline.
    pub fn gpu_params(&self) -> GpuEmitterParams {
        let directions = self.directions();
        let mut params = GpuEmitterParams {
            direction1: directions.direction1.to_array(),
            direction2: directions.direction2.to_array(),
            ..Default::default()
        };
        match self {
            Self::Point(_) => params.shape_type = SHAPE_POINT,
            Self::Box(e) => {
                params.shape_type = SHAPE_BOX;
                params.box_min = e.min_emit_box.to_array();
                params.box_max = e.max_emit_box.to_array();
            }
            Self::Mesh(_) => params.shape_type = SHAPE_MESH,
        }
        params
    }
}
