//! Code tables for tag families that are not compiled in: the crate's JSON
//! format, or upstream AprilTag C sources.

use crate::c_source::parse_family_source;
use crate::{FamilySpec, TagFamily, TagFamilyError, TagLayout};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

/// On-disk form of a tag family, shared with `data/*.json`.
///
/// `layout` may be omitted, in which case the standard layout for
/// `total_width` is assumed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagFamilyFile {
    pub name: String,
    pub total_width: usize,
    #[serde(default)]
    pub min_hamming: u32,
    #[serde(default)]
    pub layout: Option<Vec<String>>,
    pub codes: Vec<u64>,
}

impl TagFamilyFile {
    pub fn into_family(self) -> Result<TagFamily, TagFamilyError> {
        let layout = match &self.layout {
            Some(rows) => TagLayout::from_rows(rows.as_slice())?,
            None => TagLayout::standard(self.total_width)?,
        };
        if layout.width() != self.total_width {
            return Err(TagFamilyError::WidthMismatch {
                layout: layout.width(),
                declared: self.total_width,
            });
        }
        TagFamily::new(self.name, self.min_hamming, layout, self.codes)
    }
}

impl From<&TagFamily> for TagFamilyFile {
    fn from(fam: &TagFamily) -> Self {
        Self {
            name: fam.name().to_string(),
            total_width: fam.layout().width(),
            min_hamming: fam.min_hamming(),
            layout: Some(fam.layout().to_rows()),
            codes: fam.codes().to_vec(),
        }
    }
}

impl TagFamily {
    /// Load a family from a JSON code file.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, TagFamilyError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)?;
        let file: TagFamilyFile = serde_json::from_str(&raw)?;
        let fam = file.into_family()?;
        log::debug!(
            "loaded tag family {} ({} codes) from {}",
            fam.name(),
            fam.len(),
            path.display()
        );
        Ok(fam)
    }

    /// Load a family and check it against the expected name and size.
    pub fn load_json_expecting(
        path: impl AsRef<Path>,
        expected: &FamilySpec,
    ) -> Result<Self, TagFamilyError> {
        let fam = Self::load_json(path)?;
        fam.ensure_matches(expected)?;
        Ok(fam)
    }

    /// Parse an upstream AprilTag family source such as `tagStandard52h13.c`.
    pub fn from_c_source(src: &str) -> Result<Self, TagFamilyError> {
        let parsed = parse_family_source(src).map_err(TagFamilyError::Source)?;
        let layout = TagLayout::standard(parsed.total_width)?;
        TagFamily::new(parsed.name, parsed.min_hamming, layout, parsed.codes)
    }

    /// Load a family from a `.c` source or a JSON code file, by extension.
    pub fn load_table(path: impl AsRef<Path>) -> Result<Self, TagFamilyError> {
        let path = path.as_ref();
        if path.extension().is_some_and(|ext| ext == "c") {
            let fam = Self::from_c_source(&fs::read_to_string(path)?)?;
            log::debug!(
                "loaded tag family {} ({} codes) from {}",
                fam.name(),
                fam.len(),
                path.display()
            );
            Ok(fam)
        } else {
            Self::load_json(path)
        }
    }

    /// [`load_table`](Self::load_table), checked against the expected name and size.
    pub fn load_table_expecting(
        path: impl AsRef<Path>,
        expected: &FamilySpec,
    ) -> Result<Self, TagFamilyError> {
        let fam = Self::load_table(path)?;
        fam.ensure_matches(expected)?;
        Ok(fam)
    }

    /// Write this family to disk as JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), TagFamilyError> {
        let json = serde_json::to_string(&TagFamilyFile::from(self))?;
        fs::write(path, json)?;
        Ok(())
    }
}
