//! Core data shared by every emitter variant.
//!
//! Config types are serializable (serde + RON) and reflectable (Bevy Reflect).
//! Per-particle values ([`EmissionState`], [`Emission`]) are plain transient data.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::random::RandomSource;

// ---------------------------------------------------------------------------
// Direction range
// ---------------------------------------------------------------------------

/// Axis-aligned range emission directions are drawn from.
///
/// Each axis is sampled independently between the two corners, whichever
/// order they are given in.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Reflect)]
pub struct DirectionRange {
    pub direction1: Vec3,
    pub direction2: Vec3,
}

impl Default for DirectionRange {
    fn default() -> Self {
        Self {
            direction1: Vec3::Y,
            direction2: Vec3::Y,
        }
    }
}

impl DirectionRange {
    pub fn new(direction1: Vec3, direction2: Vec3) -> Self {
        Self {
            direction1,
            direction2,
        }
    }

    /// Fixed direction (both corners equal).
    pub fn constant(direction: Vec3) -> Self {
        Self::new(direction, direction)
    }

    pub fn min(&self) -> Vec3 {
        self.direction1.min(self.direction2)
    }

    pub fn max(&self) -> Vec3 {
        self.direction1.max(self.direction2)
    }

    /// Draw one local-space direction, x then y then z.
    pub fn sample<R: RandomSource + ?Sized>(&self, rng: &mut R) -> Vec3 {
        let (lo, hi) = (self.min(), self.max());
        let x = rng.range_f32(lo.x, hi.x);
        let y = rng.range_f32(lo.y, hi.y);
        let z = rng.range_f32(lo.z, hi.z);
        Vec3::new(x, y, z)
    }

    /// Draw a direction and move it into world space (rotation and scale only).
    pub fn sample_world<R: RandomSource + ?Sized>(&self, world: &Mat4, rng: &mut R) -> Vec3 {
        world.transform_vector3(self.sample(rng))
    }
}

// ---------------------------------------------------------------------------
// Per-particle values
// ---------------------------------------------------------------------------

/// Opaque handle of the particle being emitted. Emitters pass it through
/// untouched; it exists so callers can correlate the two emission phases.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ParticleId(pub u32);

/// What the position phase of one emission hands to its direction phase.
///
/// A default state carries no face normal, which makes the direction phase
/// fall back to the configured direction range.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EmissionState {
    /// Interpolated vertex normal at the sampled point, in mesh-local space and
    /// not normalized.
    pub face_normal: Option<Vec3>,
}

impl EmissionState {
    pub fn with_face_normal(normal: Vec3) -> Self {
        Self {
            face_normal: Some(normal),
        }
    }
}

/// World-space start values for one particle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Emission {
    pub position: Vec3,
    pub direction: Vec3,
}
