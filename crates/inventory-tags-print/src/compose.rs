//! Compose two marker bitmaps onto one white canvas.

use crate::layout::{LayoutError, LayoutGeometry, LayoutParams};
use inventory_tags_core::{GrayImage, GrayImageView};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Canvas background intensity.
pub const BACKGROUND: u8 = 255;

/// A composed canvas and the geometry used to build it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Composite {
    pub raster: GrayImage,
    pub geometry: LayoutGeometry,
}

/// Place `marker_a` above `marker_b`, each centred horizontally.
///
/// Pixel values are copied as-is; only the placement is computed here.
#[cfg_attr(
    feature = "tracing",
    instrument(
        level = "debug",
        skip(marker_a, marker_b),
        fields(
            a = %format!("{}x{}", marker_a.width, marker_a.height),
            b = %format!("{}x{}", marker_b.width, marker_b.height)
        )
    )
)]
pub fn compose(
    marker_a: &GrayImageView<'_>,
    marker_b: &GrayImageView<'_>,
    params: &LayoutParams,
) -> Result<Composite, LayoutError> {
    let geometry = LayoutGeometry::compute(
        (marker_a.width, marker_a.height),
        (marker_b.width, marker_b.height),
        params,
    )?;

    let mut raster = GrayImage::filled(geometry.canvas_width, geometry.canvas_height, BACKGROUND)?;
    raster.blit(marker_a, geometry.marker_a.x, geometry.marker_a.y)?;
    raster.blit(marker_b, geometry.marker_b.x, geometry.marker_b.y)?;

    log::debug!(
        "composed {}x{} canvas, marker A at ({}, {}), marker B at ({}, {})",
        geometry.canvas_width,
        geometry.canvas_height,
        geometry.marker_a.x,
        geometry.marker_a.y,
        geometry.marker_b.x,
        geometry.marker_b.y
    );

    Ok(Composite { raster, geometry })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(width: usize, height: usize, value: u8) -> GrayImage {
        GrayImage::filled(width, height, value).expect("solid")
    }

    fn params() -> LayoutParams {
        LayoutParams {
            spacing: 3,
            top_padding: 2,
            font_size: 1,
        }
    }

    #[test]
    fn markers_land_at_their_placements() {
        let a = solid(4, 5, 0);
        let b = solid(6, 2, 0);
        let c = compose(&a.view(), &b.view(), &params()).expect("compose");
        let g = c.geometry;

        assert_eq!((c.raster.width, c.raster.height), (206, 2 + 5 + 3 + 2 + 4 * 21));
        for y in 0..c.raster.height {
            for x in 0..c.raster.width {
                let in_a = (g.marker_a.x..g.marker_a.x + 4).contains(&x)
                    && (g.marker_a.y..g.marker_a.y + 5).contains(&y);
                let in_b = (g.marker_b.x..g.marker_b.x + 6).contains(&x)
                    && (g.marker_b.y..g.marker_b.y + 2).contains(&y);
                let expected = if in_a || in_b { 0 } else { BACKGROUND };
                assert_eq!(c.raster.get(x, y), Some(expected), "pixel ({x}, {y})");
            }
        }
    }

    #[test]
    fn intensities_are_copied_not_altered() {
        let a = GrayImage::from_raw(2, 1, vec![0, 255]).expect("a");
        let b = GrayImage::from_raw(2, 1, vec![255, 0]).expect("b");
        let c = compose(&a.view(), &b.view(), &params()).expect("compose");
        let g = c.geometry;

        assert_eq!(c.raster.get(g.marker_a.x, g.marker_a.y), Some(0));
        assert_eq!(c.raster.get(g.marker_a.x + 1, g.marker_a.y), Some(255));
        assert_eq!(c.raster.get(g.marker_b.x, g.marker_b.y), Some(255));
        assert_eq!(c.raster.get(g.marker_b.x + 1, g.marker_b.y), Some(0));
        assert!(c.raster.data.iter().all(|&v| v == 0 || v == 255));
    }

    #[test]
    fn layout_errors_propagate() {
        let a = solid(4, 4, 0);
        let empty = GrayImage::filled(0, 0, 0).expect("empty");
        assert!(matches!(
            compose(&a.view(), &empty.view(), &params()),
            Err(LayoutError::EmptyMarker { marker: 'B', .. })
        ));
    }
}
