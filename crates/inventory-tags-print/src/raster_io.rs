//! PNG encoding and decoding of grayscale rasters.

use inventory_tags_core::{GrayImage, GrayImageView, ImageError};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

#[derive(thiserror::Error, Debug)]
pub enum RasterIoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Encode(#[from] png::EncodingError),
    #[error(transparent)]
    Decode(#[from] png::DecodingError),
    #[error(transparent)]
    Image(#[from] ImageError),
    #[error("raster {width}x{height} is too large for PNG")]
    TooLarge { width: usize, height: usize },
    #[error("unsupported PNG color type {0:?}")]
    UnsupportedColor(png::ColorType),
}

/// Encode `raster` as an 8-bit grayscale PNG into `out`.
pub fn write_png_to<W: Write>(raster: &GrayImageView<'_>, out: W) -> Result<(), RasterIoError> {
    let too_large = || RasterIoError::TooLarge {
        width: raster.width,
        height: raster.height,
    };
    let width = u32::try_from(raster.width).map_err(|_| too_large())?;
    let height = u32::try_from(raster.height).map_err(|_| too_large())?;

    let mut encoder = png::Encoder::new(out, width, height);
    encoder.set_color(png::ColorType::Grayscale);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(raster.data)?;
    writer.finish()?;
    Ok(())
}

/// Encode `raster` as an 8-bit grayscale PNG file.
pub fn write_png(raster: &GrayImageView<'_>, path: impl AsRef<Path>) -> Result<(), RasterIoError> {
    let mut out = BufWriter::new(File::create(path)?);
    write_png_to(raster, &mut out)?;
    out.flush()?;
    Ok(())
}

/// Decode a PNG file into a grayscale raster.
///
/// Palette and low bit depth images are expanded, 16-bit samples are
/// truncated, and colour is reduced to luma.
pub fn read_png(path: impl AsRef<Path>) -> Result<GrayImage, RasterIoError> {
    let mut decoder = png::Decoder::new(BufReader::new(File::open(path)?));
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
    let mut reader = decoder.read_info()?;

    let (color, _) = reader.output_color_type();
    let samples = color.samples();
    let (width, height) = {
        let info = reader.info();
        (info.width as usize, info.height as usize)
    };
    let mut buf = vec![0u8; width * height * samples];
    let frame = reader.next_frame(&mut buf)?;
    buf.truncate(frame.buffer_size());

    let data: Vec<u8> = match color {
        png::ColorType::Grayscale => buf,
        png::ColorType::GrayscaleAlpha => buf.chunks_exact(2).map(|px| px[0]).collect(),
        png::ColorType::Rgb => buf.chunks_exact(3).map(luma).collect(),
        png::ColorType::Rgba => buf.chunks_exact(4).map(luma).collect(),
        other => return Err(RasterIoError::UnsupportedColor(other)),
    };
    Ok(GrayImage::from_raw(width, height, data)?)
}

fn luma(px: &[u8]) -> u8 {
    let y = 0.299 * f32::from(px[0]) + 0.587 * f32::from(px[1]) + 0.114 * f32::from(px[2]);
    y.round().clamp(0.0, 255.0) as u8
}
