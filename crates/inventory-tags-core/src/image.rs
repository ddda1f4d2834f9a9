//! Single-channel 8-bit rasters.

/// Borrowed row-major grayscale raster.
#[derive(Clone, Copy, Debug)]
pub struct GrayImageView<'a> {
    pub width: usize,
    pub height: usize,
    pub data: &'a [u8], // row-major, len = w*h
}

/// Owned row-major grayscale raster.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GrayImage {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>,
}

/// Errors produced by raster construction and pixel operations.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ImageError {
    #[error("invalid grayscale image buffer length (expected {expected} bytes, got {got})")]
    InvalidBuffer { expected: usize, got: usize },
    #[error("image dimensions overflow (width={width}, height={height})")]
    DimensionOverflow { width: usize, height: usize },
    #[error("scale must be finite and > 0 (got {0})")]
    InvalidScale(f64),
    #[error("resize of a {width}x{height} image by {scale} produces an empty image")]
    EmptyResize {
        width: usize,
        height: usize,
        scale: f64,
    },
    #[error(
        "{width}x{height} patch at ({x}, {y}) does not fit a {canvas_width}x{canvas_height} canvas"
    )]
    PatchOutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
        canvas_width: usize,
        canvas_height: usize,
    },
}

fn checked_len(width: usize, height: usize) -> Result<usize, ImageError> {
    width
        .checked_mul(height)
        .ok_or(ImageError::DimensionOverflow { width, height })
}

impl GrayImage {
    /// Allocate an image with every pixel set to `value`.
    pub fn filled(width: usize, height: usize, value: u8) -> Result<Self, ImageError> {
        let len = checked_len(width, height)?;
        Ok(Self {
            width,
            height,
            data: vec![value; len],
        })
    }

    /// Wrap an existing row-major buffer.
    pub fn from_raw(width: usize, height: usize, data: Vec<u8>) -> Result<Self, ImageError> {
        let expected = checked_len(width, height)?;
        if data.len() != expected {
            return Err(ImageError::InvalidBuffer {
                expected,
                got: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    #[inline]
    pub fn view(&self) -> GrayImageView<'_> {
        GrayImageView {
            width: self.width,
            height: self.height,
            data: &self.data,
        }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<u8> {
        self.view().get(x, y)
    }

    /// Copy `src` into this image with its top-left corner at `(x, y)`.
    ///
    /// The patch must fit entirely; nothing is clipped.
    pub fn blit(&mut self, src: &GrayImageView<'_>, x: usize, y: usize) -> Result<(), ImageError> {
        let out_of_bounds = ImageError::PatchOutOfBounds {
            x,
            y,
            width: src.width,
            height: src.height,
            canvas_width: self.width,
            canvas_height: self.height,
        };
        let fits_x = x.checked_add(src.width).is_some_and(|r| r <= self.width);
        let fits_y = y.checked_add(src.height).is_some_and(|b| b <= self.height);
        if !fits_x || !fits_y {
            return Err(out_of_bounds);
        }

        for (row, src_row) in src.rows().enumerate() {
            let start = (y + row) * self.width + x;
            self.data[start..start + src.width].copy_from_slice(src_row);
        }
        Ok(())
    }
}

impl<'a> GrayImageView<'a> {
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data.get(y * self.width + x).copied()
    }

    /// Iterate rows top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &'a [u8]> + 'a {
        let width = self.width.max(1);
        self.data.chunks_exact(width).take(self.height)
    }

    pub fn to_image(&self) -> GrayImage {
        GrayImage {
            width: self.width,
            height: self.height,
            data: self.data.to_vec(),
        }
    }
}

/// Nearest-neighbour resize by a uniform factor.
///
/// The output side is `round(side * scale)`; output pixel `p` samples source
/// pixel `min(floor(p * (1 / scale)), side - 1)`.
pub fn resize_nearest(src: &GrayImageView<'_>, scale: f64) -> Result<GrayImage, ImageError> {
    if !scale.is_finite() || scale <= 0.0 {
        return Err(ImageError::InvalidScale(scale));
    }
    let out_w = (src.width as f64 * scale).round() as usize;
    let out_h = (src.height as f64 * scale).round() as usize;
    if out_w == 0 || out_h == 0 {
        return Err(ImageError::EmptyResize {
            width: src.width,
            height: src.height,
            scale,
        });
    }

    let inv = 1.0 / scale;
    let source_index = |p: usize, side: usize| ((p as f64 * inv).floor() as usize).min(side - 1);
    let x_ofs: Vec<usize> = (0..out_w).map(|x| source_index(x, src.width)).collect();

    let mut out = GrayImage::filled(out_w, out_h, 0)?;
    for y in 0..out_h {
        let sy = source_index(y, src.height);
        let src_row = &src.data[sy * src.width..(sy + 1) * src.width];
        let dst_row = &mut out.data[y * out_w..(y + 1) * out_w];
        for (dst, &sx) in dst_row.iter_mut().zip(&x_ofs) {
            *dst = src_row[sx];
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_raw_rejects_wrong_length() {
        let err = GrayImage::from_raw(3, 2, vec![0; 5]).unwrap_err();
        assert_eq!(
            err,
            ImageError::InvalidBuffer {
                expected: 6,
                got: 5
            }
        );
    }

    #[test]
    fn blit_places_patch_at_offset() {
        let mut canvas = GrayImage::filled(4, 3, 255).expect("canvas");
        let patch = GrayImage::from_raw(2, 2, vec![0, 1, 2, 3]).expect("patch");
        canvas.blit(&patch.view(), 1, 1).expect("blit");

        assert_eq!(
            canvas.data,
            vec![255, 255, 255, 255, 255, 0, 1, 255, 255, 2, 3, 255]
        );
    }

    #[test]
    fn blit_refuses_to_clip() {
        let mut canvas = GrayImage::filled(4, 4, 255).expect("canvas");
        let patch = GrayImage::filled(2, 2, 0).expect("patch");
        assert!(matches!(
            canvas.blit(&patch.view(), 3, 0),
            Err(ImageError::PatchOutOfBounds { .. })
        ));
        assert!(canvas.data.iter().all(|&v| v == 255));
    }

    #[test]
    fn resize_nearest_replicates_cells() {
        let src = GrayImage::from_raw(2, 1, vec![0, 255]).expect("src");
        let out = resize_nearest(&src.view(), 3.0).expect("resize");
        assert_eq!((out.width, out.height), (6, 3));
        assert_eq!(&out.data[..6], &[0, 0, 0, 255, 255, 255]);
    }

    #[test]
    fn resize_nearest_rounds_fractional_sizes() {
        // 9 cells at 50 * 1.171 px per cell
        let src = GrayImage::filled(9, 9, 0).expect("src");
        let out = resize_nearest(&src.view(), 50.0 * 1.171).expect("resize");
        assert_eq!((out.width, out.height), (527, 527));
    }

    #[test]
    fn resize_nearest_rejects_bad_scale() {
        let src = GrayImage::filled(2, 2, 0).expect("src");
        assert!(matches!(
            resize_nearest(&src.view(), 0.0),
            Err(ImageError::InvalidScale(_))
        ));
        assert!(matches!(
            resize_nearest(&src.view(), f64::NAN),
            Err(ImageError::InvalidScale(_))
        ));
        assert!(matches!(
            resize_nearest(&src.view(), 0.1),
            Err(ImageError::EmptyResize { .. })
        ));
    }
}
