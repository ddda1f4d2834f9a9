//! Canvas geometry for a stacked marker pair.
//!
//! ```text
//!   top_padding
//!   marker A            (centred)
//!   spacing
//!   text_height         (free band between the markers)
//!   marker B            (centred)
//!   3 * text_height     (label band; label baseline at +text_height+10)
//! ```
//!
//! `text_height = font_size + 20`. The canvas is `max(width_a, width_b) + 200`
//! wide.

use inventory_tags_core::ImageError;
use serde::{Deserialize, Serialize};

/// Horizontal room added to the wider marker, split evenly left and right.
pub const HORIZONTAL_MARGIN: usize = 200;
/// Added to the font size to get one text band height.
pub const TEXT_HEIGHT_PAD: i64 = 20;
/// Text bands reserved in total below marker A.
pub const TEXT_BANDS: i64 = 4;
/// Offset of the label baseline past the end of its band.
pub const LABEL_BASELINE_OFFSET: i64 = 10;

/// User-facing spacing knobs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutParams {
    /// Vertical gap between marker A and the text band above marker B.
    pub spacing: i32,
    /// Empty rows above marker A.
    pub top_padding: i32,
    /// Base label font size; the drawn label uses twice this.
    pub font_size: i32,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            spacing: 50,
            top_padding: 50,
            font_size: 40,
        }
    }
}

/// Top-left corner and size of one marker on the canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

/// Derived canvas geometry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutGeometry {
    pub canvas_width: usize,
    pub canvas_height: usize,
    /// `font_size + 20`.
    pub text_height: usize,
    pub font_size: u32,
    pub marker_a: Placement,
    pub marker_b: Placement,
    /// Horizontal centre of the label.
    pub label_x: usize,
    /// Label baseline.
    pub label_y: usize,
}

/// Misconfigured spacing, padding, font size or marker scale.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    #[error("{name} must be >= 0 (got {value})")]
    Negative { name: &'static str, value: i64 },
    #[error("font_size must be > 0 (got {0})")]
    NonPositiveFontSize(i32),
    #[error("scale must be finite and > 0 (got {0})")]
    InvalidScale(f64),
    #[error("scale {scale} renders the {family} marker smaller than one pixel")]
    ScaleTooSmall { family: String, scale: f64 },
    #[error("marker {marker} bitmap is empty ({width}x{height})")]
    EmptyMarker {
        marker: char,
        width: usize,
        height: usize,
    },
    #[error("canvas dimensions overflow")]
    Overflow,
    #[error(transparent)]
    Image(#[from] ImageError),
}

fn to_i64(v: usize) -> Result<i64, LayoutError> {
    i64::try_from(v).map_err(|_| LayoutError::Overflow)
}

fn to_usize(name: &'static str, v: i64) -> Result<usize, LayoutError> {
    if v < 0 {
        return Err(LayoutError::Negative { name, value: v });
    }
    usize::try_from(v).map_err(|_| LayoutError::Overflow)
}

fn sum(terms: &[i64]) -> Result<i64, LayoutError> {
    terms
        .iter()
        .try_fold(0i64, |acc, &t| acc.checked_add(t))
        .ok_or(LayoutError::Overflow)
}

impl LayoutGeometry {
    /// Compute the geometry for markers of size `(width, height)`.
    pub fn compute(
        marker_a: (usize, usize),
        marker_b: (usize, usize),
        params: &LayoutParams,
    ) -> Result<Self, LayoutError> {
        for (marker, (width, height)) in [('A', marker_a), ('B', marker_b)] {
            if width == 0 || height == 0 {
                return Err(LayoutError::EmptyMarker {
                    marker,
                    width,
                    height,
                });
            }
        }
        if params.font_size <= 0 {
            return Err(LayoutError::NonPositiveFontSize(params.font_size));
        }
        let spacing = i64::from(params.spacing);
        let top = i64::from(params.top_padding);
        to_usize("spacing", spacing)?;
        to_usize("top_padding", top)?;

        let (wa, ha) = (to_i64(marker_a.0)?, to_i64(marker_a.1)?);
        let (wb, hb) = (to_i64(marker_b.0)?, to_i64(marker_b.1)?);
        let text_height = i64::from(params.font_size) + TEXT_HEIGHT_PAD;
        let bands = text_height
            .checked_mul(TEXT_BANDS)
            .ok_or(LayoutError::Overflow)?;

        let canvas_width = marker_a
            .0
            .max(marker_b.0)
            .checked_add(HORIZONTAL_MARGIN)
            .ok_or(LayoutError::Overflow)?;
        let canvas_height = to_usize("canvas height", sum(&[top, ha, spacing, hb, bands])?)?;
        let cw = to_i64(canvas_width)?;

        let b_top = sum(&[top, ha, spacing, text_height])?;
        let label_y = sum(&[b_top, hb, text_height, LABEL_BASELINE_OFFSET])?;

        Ok(Self {
            canvas_width,
            canvas_height,
            text_height: to_usize("text height", text_height)?,
            font_size: params.font_size.unsigned_abs(),
            marker_a: Placement {
                x: to_usize("marker A x", (cw - wa) / 2)?,
                y: to_usize("marker A y", top)?,
                width: marker_a.0,
                height: marker_a.1,
            },
            marker_b: Placement {
                x: to_usize("marker B x", (cw - wb) / 2)?,
                y: to_usize("marker B y", b_top)?,
                width: marker_b.0,
                height: marker_b.1,
            },
            label_x: canvas_width / 2,
            label_y: to_usize("label y", label_y)?,
        })
    }
}
