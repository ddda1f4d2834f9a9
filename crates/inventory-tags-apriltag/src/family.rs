//! Tag family metadata and code tables.

use crate::TagLayout;
use inventory_tags_core::ImageError;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// A named marker family and the number of distinct ids it supports.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FamilySpec {
    pub name: Cow<'static, str>,
    pub count: u32,
}

impl FamilySpec {
    pub const TAG_STANDARD_41H12: FamilySpec = FamilySpec {
        name: Cow::Borrowed("tagStandard41h12"),
        count: 2115,
    };

    pub const TAG_STANDARD_52H13: FamilySpec = FamilySpec {
        name: Cow::Borrowed("tagStandard52h13"),
        count: 48714,
    };

    pub fn new(name: impl Into<Cow<'static, str>>, count: u32) -> Self {
        Self {
            name: name.into(),
            count,
        }
    }
}

/// Tag family construction and loading errors.
#[derive(thiserror::Error, Debug)]
pub enum TagFamilyError {
    #[error("layout is empty")]
    EmptyLayout,
    #[error("layout row {row} has {len} cells, expected {width}")]
    RaggedLayout { row: usize, len: usize, width: usize },
    #[error("invalid layout cell {cell:?} at ({x}, {y}), expected 'd', 'b' or 'w'")]
    InvalidCell { cell: char, x: usize, y: usize },
    #[error("layout has {data_cells} data cells, at most 64 are supported")]
    TooManyBits { data_cells: usize },
    #[error("layout width {layout} does not match total_width {declared}")]
    WidthMismatch { layout: usize, declared: usize },
    #[error("family has no codes")]
    NoCodes,
    #[error("family has {0} codes, ids must fit in u32")]
    TooManyCodes(usize),
    #[error("expected family {expected}, got {got}")]
    NameMismatch { expected: String, got: String },
    #[error("family {name} has {got} codes, expected {expected}")]
    CountMismatch {
        name: String,
        expected: u32,
        got: usize,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("invalid family source: {0}")]
    Source(String),
}

/// Marker rendering errors.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum MarkerError {
    #[error("marker index {index} out of range for {family} ({count} codes)")]
    IndexOutOfRange {
        family: String,
        index: u32,
        count: u32,
    },
    #[error(transparent)]
    Image(#[from] ImageError),
}

/// An AprilTag-style family: a cell layout and one code per marker id.
#[derive(Clone, Debug)]
pub struct TagFamily {
    name: Cow<'static, str>,
    min_hamming: u32,
    layout: TagLayout,
    codes: Cow<'static, [u64]>,
}

impl TagFamily {
    /// Create a family from a layout and a code table.
    pub fn new(
        name: impl Into<Cow<'static, str>>,
        min_hamming: u32,
        layout: TagLayout,
        codes: impl Into<Cow<'static, [u64]>>,
    ) -> Result<Self, TagFamilyError> {
        let codes = codes.into();
        if codes.is_empty() {
            return Err(TagFamilyError::NoCodes);
        }
        if u32::try_from(codes.len()).is_err() {
            return Err(TagFamilyError::TooManyCodes(codes.len()));
        }
        Ok(Self {
            name: name.into(),
            min_hamming,
            layout,
            codes,
        })
    }

    /// Build a family from compiled-in tables.
    pub fn from_static(
        name: &'static str,
        min_hamming: u32,
        layout: &[&str],
        codes: &'static [u64],
    ) -> Result<Self, TagFamilyError> {
        Self::new(name, min_hamming, TagLayout::from_rows(layout)?, codes)
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Minimum Hamming distance between any two codes (under rotation).
    #[inline]
    pub fn min_hamming(&self) -> u32 {
        self.min_hamming
    }

    #[inline]
    pub fn layout(&self) -> &TagLayout {
        &self.layout
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    #[inline]
    pub fn code(&self, index: u32) -> Option<u64> {
        self.codes.get(index as usize).copied()
    }

    #[inline]
    pub fn codes(&self) -> &[u64] {
        &self.codes
    }

    /// Name and id count of this family.
    pub fn spec(&self) -> FamilySpec {
        FamilySpec {
            name: self.name.clone(),
            // checked in `new`
            count: self.codes.len() as u32,
        }
    }

    /// Fail unless this family matches `expected` by name and size.
    pub fn ensure_matches(&self, expected: &FamilySpec) -> Result<(), TagFamilyError> {
        if self.name != expected.name {
            return Err(TagFamilyError::NameMismatch {
                expected: expected.name.to_string(),
                got: self.name.to_string(),
            });
        }
        if self.codes.len() != expected.count as usize {
            return Err(TagFamilyError::CountMismatch {
                name: self.name.to_string(),
                expected: expected.count,
                got: self.codes.len(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_code_table_is_rejected() {
        let layout = TagLayout::standard(9).expect("layout");
        assert!(matches!(
            TagFamily::new("empty", 0, layout, Vec::<u64>::new()),
            Err(TagFamilyError::NoCodes)
        ));
    }

    #[test]
    fn ensure_matches_checks_name_and_count() {
        let layout = TagLayout::standard(10).expect("layout");
        let fam = TagFamily::new("tagStandard52h13", 13, layout, vec![1u64, 2, 3]).expect("family");

        assert!(fam.ensure_matches(&FamilySpec::new("tagStandard52h13", 3)).is_ok());
        assert!(matches!(
            fam.ensure_matches(&FamilySpec::TAG_STANDARD_52H13),
            Err(TagFamilyError::CountMismatch {
                expected: 48714,
                got: 3,
                ..
            })
        ));
        assert!(matches!(
            fam.ensure_matches(&FamilySpec::TAG_STANDARD_41H12),
            Err(TagFamilyError::NameMismatch { .. })
        ));
    }

    #[test]
    fn family_spec_serializes_as_plain_object() {
        let json = serde_json::to_string(&FamilySpec::TAG_STANDARD_41H12).expect("json");
        assert_eq!(json, r#"{"name":"tagStandard41h12","count":2115}"#);
        let back: FamilySpec = serde_json::from_str(&json).expect("parse");
        assert_eq!(back, FamilySpec::TAG_STANDARD_41H12);
    }
}
