//! Pipeline parameters.

use crate::layout::LayoutParams;
use inventory_tags_core::ThresholdParams;
use serde::{Deserialize, Serialize};

/// Extra scale applied to family A so both markers print at a similar size.
///
/// The two families have different cell counts per side; this calibration
/// constant is fixed and not part of the configurable parameters.
pub const FAMILY_A_SCALE_FACTOR: f64 = 1.171;

/// Parameters of one tag pair rendering.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TagPairParams {
    /// Vertical gap in pixels between the two markers.
    pub spacing: i32,
    /// Pixels per marker cell for family B.
    pub scale: f64,
    /// Base label font size; the label is drawn at twice this size.
    pub font_size: i32,
    /// Empty rows above the first marker.
    pub top_padding: i32,
    /// Binarization applied to each marker bitmap before composition.
    pub binarize: ThresholdParams,
}

impl Default for TagPairParams {
    fn default() -> Self {
        Self {
            spacing: 50,
            scale: 50.0,
            font_size: 40,
            top_padding: 50,
            binarize: ThresholdParams::default(),
        }
    }
}

impl TagPairParams {
    /// Pixels per cell for family A.
    #[inline]
    pub fn family_a_scale(&self) -> f64 {
        self.scale * FAMILY_A_SCALE_FACTOR
    }

    #[inline]
    pub fn family_b_scale(&self) -> f64 {
        self.scale
    }

    pub fn layout(&self) -> LayoutParams {
        LayoutParams {
            spacing: self.spacing,
            top_padding: self.top_padding,
            font_size: self.font_size,
        }
    }
}
