//! Analytic emitter shapes: a single point and an axis-aligned box.
//!
//! Both draw directions from a [`DirectionRange`] and need nothing from the
//! position phase, so their [`EmissionState`] is always empty.

use bevy::prelude::*;

use crate::data::{DirectionRange, Emission, EmissionState, ParticleId};
use crate::gpu::UniformSink;
use crate::random::RandomSource;
use crate::record::EmitterRecord;

// ---------------------------------------------------------------------------
// Point
// ---------------------------------------------------------------------------

/// Emits every particle from the emitter's origin.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PointParticleEmitter {
    pub directions: DirectionRange,
}

impl PointParticleEmitter {
    pub const CLASS_NAME: &'static str = "PointParticleEmitter";

    pub fn new(directions: DirectionRange) -> Self {
        Self { directions }
    }

    pub fn compute_position<R: RandomSource + ?Sized>(
        &self,
        world: &Mat4,
        position: &mut Vec3,
        _particle: ParticleId,
        _rng: &mut R,
    ) -> Option<EmissionState> {
        *position = world.transform_point3(Vec3::ZERO);
        Some(EmissionState::default())
    }

    pub fn compute_direction<R: RandomSource + ?Sized>(
        &self,
        world: &Mat4,
        direction: &mut Vec3,
        _particle: ParticleId,
        _state: &EmissionState,
        rng: &mut R,
    ) {
        *direction = self.directions.sample_world(world, rng);
    }

    pub fn emit<R: RandomSource + ?Sized>(&self, world: &Mat4, particle: ParticleId, rng: &mut R) -> Emission {
        let mut position = Vec3::ZERO;
        let state = self
            .compute_position(world, &mut position, particle, rng)
            .unwrap_or_default();
        let mut direction = Vec3::ZERO;
        self.compute_direction(world, &mut direction, particle, &state, rng);
        Emission { position, direction }
    }

    pub fn to_record(&self) -> EmitterRecord {
        EmitterRecord::new(Self::CLASS_NAME, &self.directions)
    }

    pub fn from_record(record: &EmitterRecord) -> Self {
        Self::new(record.directions())
    }

    pub fn export_shader_parameters(&self, sink: &mut impl UniformSink) {
        sink.set_vec3("direction1", self.directions.direction1);
        sink.set_vec3("direction2", self.directions.direction2);
    }

    pub fn shader_defines(&self) -> String {
        "#define POINTEMITTER".to_string()
    }
}

// ---------------------------------------------------------------------------
// Box
// ---------------------------------------------------------------------------

/// Emits from uniformly random points inside a local-space box.
#[derive(Clone, Debug, PartialEq)]
pub struct BoxParticleEmitter {
    pub directions: DirectionRange,
    pub min_emit_box: Vec3,
    pub max_emit_box: Vec3,
}

impl Default for BoxParticleEmitter {
    fn default() -> Self {
        Self {
            directions: DirectionRange::default(),
            min_emit_box: Vec3::splat(-0.5),
            max_emit_box: Vec3::splat(0.5),
        }
    }
}

impl BoxParticleEmitter {
    pub const CLASS_NAME: &'static str = "BoxParticleEmitter";

    pub fn new(min_emit_box: Vec3, max_emit_box: Vec3) -> Self {
        Self {
            min_emit_box,
            max_emit_box,
            ..default()
        }
    }

    pub fn with_directions(mut self, direction1: Vec3, direction2: Vec3) -> Self {
        self.directions = DirectionRange::new(direction1, direction2);
        self
    }

    pub fn compute_position<R: RandomSource + ?Sized>(
        &self,
        world: &Mat4,
        position: &mut Vec3,
        _particle: ParticleId,
        rng: &mut R,
    ) -> Option<EmissionState> {
        let (lo, hi) = (self.min_emit_box, self.max_emit_box);
        let x = rng.range_f32(lo.x, hi.x);
        let y = rng.range_f32(lo.y, hi.y);
        let z = rng.range_f32(lo.z, hi.z);
        *position = world.transform_point3(Vec3::new(x, y, z));
        Some(EmissionState::default())
    }

    pub fn compute_direction<R: RandomSource + ?Sized>(
        &self,
        world: &Mat4,
        direction: &mut Vec3,
        _particle: ParticleId,
        _state: &EmissionState,
        rng: &mut R,
    ) {
        *direction = self.directions.sample_world(world, rng);
    }

    pub fn emit<R: RandomSource + ?Sized>(&self, world: &Mat4, particle: ParticleId, rng: &mut R) -> Emission {
        let mut position = Vec3::ZERO;
        let state = self
            .compute_position(world, &mut position, particle, rng)
            .unwrap_or_default();
        let mut direction = Vec3::ZERO;
        self.compute_direction(world, &mut direction, particle, &state, rng);
        Emission { position, direction }
    }

    pub fn to_record(&self) -> EmitterRecord {
        let mut record = EmitterRecord::new(Self::CLASS_NAME, &self.directions);
        record.min_emit_box = Some(self.min_emit_box.to_array());
        record.max_emit_box = Some(self.max_emit_box.to_array());
        record
    }

    pub fn from_record(record: &EmitterRecord) -> Self {
        let defaults = Self::default();
        Self {
            directions: record.directions(),
            min_emit_box: record.min_emit_box.map_or(defaults.min_emit_box, Vec3::from_array),
            max_emit_box: record.max_emit_box.map_or(defaults.max_emit_box, Vec3::from_array),
        }
    }

    pub fn export_shader_parameters(&self, sink: &mut impl UniformSink) {
        sink.set_vec3("direction1", self.directions.direction1);
        sink.set_vec3("direction2", self.directions.direction2);
        sink.set_vec3("minEmitBox", self.min_emit_box);
        sink.set_vec3("maxEmitBox", self.max_emit_box);
    }

    pub fn shader_defines(&self) -> String {
        "#define BOXEMITTER".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpu::ShaderParameters;

    #[test]
    fn point_emits_from_world_origin() {
        let emitter = PointParticleEmitter::default();
        let world = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        let mut rng = fastrand::Rng::with_seed(1);
        let emission = emitter.emit(&world, ParticleId(0), &mut rng);
        assert_eq!(emission.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(emission.direction, Vec3::Y);
    }

    #[test]
    fn emit_matches_explicit_two_phase_calls() {
        let point = PointParticleEmitter::new(DirectionRange::new(Vec3::NEG_ONE, Vec3::ONE));
        let boxed = BoxParticleEmitter::default().with_directions(Vec3::NEG_Z, Vec3::Z);
        let world = Mat4::from_rotation_y(0.8) * Mat4::from_translation(Vec3::X);

        let mut rng = fastrand::Rng::with_seed(64);
        let mut position = Vec3::ZERO;
        let mut direction = Vec3::ZERO;
        let state = point
            .compute_position(&world, &mut position, ParticleId(2), &mut rng)
            .unwrap();
        assert_eq!(state, EmissionState::default());
        point.compute_direction(&world, &mut direction, ParticleId(2), &state, &mut rng);
        let mut rng = fastrand::Rng::with_seed(64);
        assert_eq!(point.emit(&world, ParticleId(2), &mut rng), Emission { position, direction });

        let mut rng = fastrand::Rng::with_seed(65);
        let state = boxed
            .compute_position(&world, &mut position, ParticleId(3), &mut rng)
            .unwrap();
        assert_eq!(state, EmissionState::default());
        boxed.compute_direction(&world, &mut direction, ParticleId(3), &state, &mut rng);
        let mut rng = fastrand::Rng::with_seed(65);
        assert_eq!(boxed.emit(&world, ParticleId(3), &mut rng), Emission { position, direction });
    }

    #[test]
    fn box_positions_stay_inside_box() {
        let emitter = BoxParticleEmitter::new(Vec3::new(-1.0, 0.0, 2.0), Vec3::new(1.0, 0.5, 4.0));
        let mut rng = fastrand::Rng::with_seed(19);
        for _ in 0..2_000 {
            let p = emitter.emit(&Mat4::IDENTITY, ParticleId(0), &mut rng).position;
            assert!(p.cmpge(emitter.min_emit_box).all() && p.cmple(emitter.max_emit_box).all(), "{p}");
        }
    }

    #[test]
    fn box_record_keeps_extents() {
        let emitter = BoxParticleEmitter::new(Vec3::splat(-2.0), Vec3::splat(3.0))
            .with_directions(Vec3::NEG_Y, Vec3::Y);
        let record = emitter.to_record();
        assert_eq!(record.emitter_type, "BoxParticleEmitter");
        assert_eq!(BoxParticleEmitter::from_record(&record), emitter);
    }

    #[test]
    fn box_record_without_extents_uses_defaults() {
        let record = EmitterRecord::new(BoxParticleEmitter::CLASS_NAME, &DirectionRange::default());
        assert_eq!(BoxParticleEmitter::from_record(&record), BoxParticleEmitter::default());
    }

    #[test]
    fn shader_exports_per_shape() {
        let mut params = ShaderParameters::default();
        let point = PointParticleEmitter::default();
        point.export_shader_parameters(&mut params);
        assert_eq!(params.len(), 2);
        assert_eq!(point.shader_defines(), "#define POINTEMITTER");

        let mut params = ShaderParameters::default();
        let boxed = BoxParticleEmitter::default();
        boxed.export_shader_parameters(&mut params);
        assert_eq!(params.get("minEmitBox"), Some(Vec3::splat(-0.5)));
        assert_eq!(params.get("maxEmitBox"), Some(Vec3::splat(0.5)));
        assert_eq!(boxed.shader_defines(), "#define BOXEMITTER");
    }
}
