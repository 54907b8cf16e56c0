//! Plain-data records emitters serialize to and parse from.
//!
//! Every emitter variant shares one flat record shape. The `type` field names
//! the variant and is what [`EmitterTypeRegistry`](crate::EmitterTypeRegistry)
//! dispatches on; fields a variant doesn't use are omitted.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::DirectionRange;

/// Errors from decoding, encoding or dispatching emitter records.
#[derive(Debug, Error)]
pub enum EmitterError {
    #[error("failed to decode emitter record: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("failed to encode emitter record: {0}")]
    RonEncode(#[from] ron::Error),
    #[error("unknown emitter type '{0}'")]
    UnknownEmitterType(String),
}

/// Serialized form of any emitter.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EmitterRecord {
    /// Emitter class discriminator, e.g. `"MeshParticleEmitter"`.
    #[serde(rename = "type")]
    pub emitter_type: String,
    pub direction1: [f32; 3],
    pub direction2: [f32; 3],
    /// Mesh emitters: identifier of the bound mesh.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mesh_id: Option<String>,
    /// Mesh emitters: derive direction from surface normals.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_mesh_normals_for_direction: Option<bool>,
    /// Box emitters: lower corner of the spawn box.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_emit_box: Option<[f32; 3]>,
    /// Box emitters: upper corner of the spawn box.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_emit_box: Option<[f32; 3]>,
}

impl EmitterRecord {
    /// Record with only the fields every emitter carries.
    pub fn new(emitter_type: impl Into<String>, directions: &DirectionRange) -> Self {
        Self {
            emitter_type: emitter_type.into(),
            direction1: directions.direction1.to_array(),
            direction2: directions.direction2.to_array(),
            mesh_id: None,
            use_mesh_normals_for_direction: None,
            min_emit_box: None,
            max_emit_box: None,
        }
    }

    pub fn directions(&self) -> DirectionRange {
        DirectionRange::new(Vec3::from_array(self.direction1), Vec3::from_array(self.direction2))
    }

    /// Pretty-printed RON text.
    pub fn to_ron(&self) -> Result<String, EmitterError> {
        let pretty = ron::ser::PrettyConfig::default();
        Ok(ron::ser::to_string_pretty(self, pretty)?)
    }

    pub fn from_ron(text: &str) -> Result<Self, EmitterError> {
        Ok(ron::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mesh_record_uses_camel_case_fields() {
        let mut record = EmitterRecord::new("MeshParticleEmitter", &DirectionRange::default());
        record.mesh_id = Some("rock".to_string());
        record.use_mesh_normals_for_direction = Some(true);

        let text = record.to_ron().unwrap();
        assert!(text.contains("\"MeshParticleEmitter\""));
        assert!(text.contains("meshId"));
        assert!(text.contains("useMeshNormalsForDirection"));
        assert!(!text.contains("minEmitBox"));

        assert_eq!(EmitterRecord::from_ron(&text).unwrap(), record);
    }

    #[test]
    fn missing_optional_fields_default_to_none() {
        let text = r#"(
            type: "PointParticleEmitter",
            direction1: (0.0, 1.0, 0.0),
            direction2: (0.0, 2.0, 0.0),
        )"#;
        let record = EmitterRecord::from_ron(text).unwrap();
        assert_eq!(record.emitter_type, "PointParticleEmitter");
        assert_eq!(record.directions().direction2, Vec3::new(0.0, 2.0, 0.0));
        assert_eq!(record.mesh_id, None);
        assert_eq!(record.use_mesh_normals_for_direction, None);
    }

    #[test]
    fn malformed_text_is_a_decode_error() {
        let err = EmitterRecord::from_ron("(type: 3)").unwrap_err();
        assert!(matches!(err, EmitterError::Ron(_)));
        assert!(err.to_string().starts_with("failed to decode emitter record"));
    }
}
