//! Fixed-level binarization.

use crate::{GrayImage, GrayImageView};
use serde::{Deserialize, Serialize};

/// How pixels above the cutoff are mapped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdMode {
    /// `v > cutoff` becomes `max_value`, everything else 0.
    #[default]
    Binary,
    /// `v > cutoff` becomes 0, everything else `max_value`.
    BinaryInv,
}

/// Binarization parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdParams {
    pub cutoff: u8,
    pub max_value: u8,
    pub mode: ThresholdMode,
}

impl Default for ThresholdParams {
    fn default() -> Self {
        Self {
            cutoff: 10,
            max_value: 255,
            mode: ThresholdMode::Binary,
        }
    }
}

/// Threshold `src` into a two-level image.
pub fn threshold(src: &GrayImageView<'_>, params: &ThresholdParams) -> GrayImage {
    let (above, below) = match params.mode {
        ThresholdMode::Binary => (params.max_value, 0),
        ThresholdMode::BinaryInv => (0, params.max_value),
    };
    let data = src
        .data
        .iter()
        .map(|&v| if v > params.cutoff { above } else { below })
        .collect();
    GrayImage {
        width: src.width,
        height: src.height,
        data,
    }
}
