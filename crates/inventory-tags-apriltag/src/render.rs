//! Marker bitmap rendering.

use crate::{CellKind, FamilySpec, MarkerError, TagFamily};
use inventory_tags_core::{resize_nearest, GrayImage};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Produces the bitmap of one marker of a fixed family.
pub trait MarkerGenerator {
    /// Family rendered by this generator.
    fn family(&self) -> FamilySpec;

    /// Render marker `index` with `scale` output pixels per cell.
    fn generate(&self, index: u32, scale: f64) -> Result<GrayImage, MarkerError>;
}

impl TagFamily {
    /// Render marker `index` at one pixel per cell.
    ///
    /// Black cells are 0, white cells 255; a set code bit is drawn white.
    pub fn render_cells(&self, index: u32) -> Result<GrayImage, MarkerError> {
        let code = self.code(index).ok_or_else(|| MarkerError::IndexOutOfRange {
            family: self.name().to_string(),
            index,
            count: self.spec().count,
        })?;

        let layout = self.layout();
        let n = layout.width();
        let mut img = GrayImage::filled(n, n, 0)?;
        for y in 0..n {
            for x in 0..n {
                if layout.cell(x, y) == Some(CellKind::White) {
                    img.data[y * n + x] = 255;
                }
            }
        }

        let nbits = layout.bit_count();
        for (i, &(x, y)) in layout.bit_cells().iter().enumerate() {
            if (code >> (nbits - 1 - i)) & 1 == 1 {
                img.data[y * n + x] = 255;
            }
        }
        Ok(img)
    }
}

impl MarkerGenerator for TagFamily {
    fn family(&self) -> FamilySpec {
        self.spec()
    }

    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip(self), fields(family = %self.name()))
    )]
    fn generate(&self, index: u32, scale: f64) -> Result<GrayImage, MarkerError> {
        let cells = self.render_cells(index)?;
        let img = resize_nearest(&cells.view(), scale)?;
        log::debug!(
            "rendered {} #{} at scale {:.3}: {}x{} px",
            self.name(),
            index,
            scale,
            img.width,
            img.height
        );
        Ok(img)
    }
}
