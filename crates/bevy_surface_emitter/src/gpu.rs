//! Emitter parameters for GPU-resident particle pipelines.
//!
//! Emitters only publish their parameters here; the pipeline that uploads and
//! consumes them lives outside this crate.

use std::collections::BTreeMap;

use bevy::prelude::*;
use bytemuck::{Pod, Zeroable};

/// Receiver of named shader uniforms.
pub trait UniformSink {
    fn set_vec3(&mut self, name: &str, value: Vec3);
}

/// Named uniform values collected from an emitter.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ShaderParameters {
    values: BTreeMap<String, Vec3>,
}

impl ShaderParameters {
    pub fn get(&self, name: &str) -> Option<Vec3> {
        self.values.get(name).copied()
    }

    /// Parameter names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl UniformSink for ShaderParameters {
    fn set_vec3(&mut self, name: &str, value: Vec3) {
        self.values.insert(name.to_string(), value);
    }
}

/// Shape discriminant stored in [`GpuEmitterParams::shape_type`].
pub const SHAPE_POINT: u32 = 0;
pub const SHAPE_BOX: u32 = 1;
pub const SHAPE_MESH: u32 = 2;

/// Packed emitter parameters for a uniform buffer.
///
/// Every `vec3<f32>` is padded to 16 bytes. Total size: 80 bytes.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct GpuEmitterParams {
    pub shape_type: u32,         // 0
    pub _pad0: [u32; 3],         // 4
    pub direction1: [f32; 3],    // 16
    pub _pad1: f32,              // 28
    pub direction2: [f32; 3],    // 32
    pub _pad2: f32,              // 44
    pub box_min: [f32; 3],       // 48: box emitters only
    pub _pad3: f32,              // 60
    pub box_max: [f32; 3],       // 64: box emitters only
    pub _pad4: f32,              // 76
}

impl GpuEmitterParams {
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}
