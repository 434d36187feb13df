//! Configuration of a [`crate::ShapeFactory`].
//!
//! Settings are plain serde structs. Every field has a default, so partial JSON documents are
//! accepted.

use kernel::geom::Precision;
use kernel::mesh::{LineType, MeshData};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(thiserror::Error, Debug)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid settings: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelingSettings {
    /// Distances and angles below this value are treated as zero.
    pub linear_tolerance: f64,
    pub mesh: MeshStyle,
}

impl Default for ModelingSettings {
    fn default() -> Self {
        Self {
            linear_tolerance: Precision::DISTANCE,
            mesh: MeshStyle::default(),
        }
    }
}

impl ModelingSettings {
    /// Parses settings from a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Json`] if the document is malformed.
    pub fn from_json_str(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads settings from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Io`] if the file can not be read, or [`SettingsError::Json`] if
    /// its content is malformed.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}

/// How tessellated shapes should be drawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshStyle {
    pub line_type: LineType,
    pub line_width: f32,
    pub face_color: Option<[f32; 3]>,
    pub edge_color: Option<[f32; 3]>,
}

impl Default for MeshStyle {
    fn default() -> Self {
        Self {
            line_type: LineType::Solid,
            line_width: 1.0,
            face_color: None,
            edge_color: None,
        }
    }
}

impl MeshStyle {
    pub(crate) fn apply(&self, mesh: &mut MeshData) {
        mesh.faces.color = self.face_color;
        mesh.edges.color = self.edge_color;
        mesh.edges.line_type = self.line_type;
        mesh.edges.line_width = self.line_width;
    }
}
