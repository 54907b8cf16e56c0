//! Maps record `type` discriminators to emitter parsers.

use std::collections::HashMap;

use bevy::prelude::*;

use crate::emitter::ParticleEmitter;
use crate::mesh_emitter::MeshParticleEmitter;
use crate::record::{EmitterError, EmitterRecord};
use crate::shapes::{BoxParticleEmitter, PointParticleEmitter};
use crate::surface::MeshLookup;

/// Builds an emitter from its record.
pub type EmitterParser = fn(&EmitterRecord, &dyn MeshLookup) -> ParticleEmitter;

/// Registry of emitter parsers keyed by discriminator.
///
/// The default registry knows every built-in emitter. Extra names can be
/// registered as aliases, e.g. for records written by older tools.
#[derive(Resource, Clone)]
pub struct EmitterTypeRegistry {
    parsers: HashMap<String, EmitterParser>,
}

impl Default for EmitterTypeRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(PointParticleEmitter::CLASS_NAME, |record, _| {
            PointParticleEmitter::from_record(record).into()
        });
        registry.register(BoxParticleEmitter::CLASS_NAME, |record, _| {
            BoxParticleEmitter::from_record(record).into()
        });
        registry.register(MeshParticleEmitter::CLASS_NAME, |record, meshes| {
            MeshParticleEmitter::from_record(record, meshes).into()
        });
        registry
    }
}

impl EmitterTypeRegistry {
    /// Registry with no parsers.
    pub fn empty() -> Self {
        Self {
            parsers: HashMap::new(),
        }
    }

    /// Register (or replace) the parser for `emitter_type`.
    pub fn register(&mut self, emitter_type: impl Into<String>, parser: EmitterParser) {
        let emitter_type = emitter_type.into();
        if self.parsers.insert(emitter_type.clone(), parser).is_some() {
            debug!("Replaced parser for emitter type '{}'", emitter_type);
        }
    }

    pub fn contains(&self, emitter_type: &str) -> bool {
        self.parsers.contains_key(emitter_type)
    }

    /// Registered discriminators, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.parsers.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    pub fn parse(&self, record: &EmitterRecord, meshes: &dyn MeshLookup) -> Result<ParticleEmitter, EmitterError> {
        let parser = self
            .parsers
            .get(&record.emitter_type)
            .ok_or_else(|| EmitterError::UnknownEmitterType(record.emitter_type.clone()))?;
        Ok(parser(record, meshes))
    }
}
