//! JSON configuration for one tag pair run.

use crate::error::TagPairError;
use crate::label::LabelStyle;
use crate::params::TagPairParams;
use crate::pipeline::{TagPairArtifact, TagPairGenerator};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Configuration for rendering one inventory tag pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagPairConfig {
    pub inventory_tag_id: i64,
    #[serde(default)]
    pub params: TagPairParams,
    /// Where to write the SVG; nothing is written when absent.
    #[serde(default)]
    pub output_path: Option<String>,
    /// Code table for `tagStandard52h13` (`.c` upstream source or JSON).
    /// When absent the table must be built in, otherwise
    /// [`build_generator`](Self::build_generator) fails with
    /// [`TagPairError::FamilyUnavailable`].
    #[serde(default)]
    pub family_b_codes: Option<String>,
    #[serde(default)]
    pub label_style: Option<LabelStyle>,
}

impl TagPairConfig {
    pub fn new(inventory_tag_id: i64) -> Self {
        Self {
            inventory_tag_id,
            params: TagPairParams::default(),
            output_path: None,
            family_b_codes: None,
            label_style: None,
        }
    }

    /// Load a JSON config from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, TagPairError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), TagPairError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn output_path(&self) -> Option<PathBuf> {
        self.output_path.as_ref().map(PathBuf::from)
    }

    /// Build the generator described by this config.
    pub fn build_generator(&self) -> Result<TagPairGenerator, TagPairError> {
        let generator = match &self.family_b_codes {
            Some(path) => TagPairGenerator::from_family_b_table(path)?,
            None => TagPairGenerator::builtin()?,
        };
        Ok(match &self.label_style {
            Some(style) => generator.with_label_style(style.clone()),
            None => generator,
        })
    }

    /// Render the configured tag pair, writing it to `output_path` if set.
    pub fn run(&self) -> Result<TagPairArtifact, TagPairError> {
        self.build_generator()?.generate_tag_pair(
            self.inventory_tag_id,
            &self.params,
            self.output_path().as_deref(),
        )
    }
}
