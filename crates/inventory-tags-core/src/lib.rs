//! Core raster types and utilities for inventory tag rendering.
//!
//! This crate is intentionally small. It knows nothing about marker families,
//! canvas layout or SVG; it only provides a single-channel raster, the
//! handful of pixel operations the renderer needs, and logging setup.

mod image;
mod logger;
mod threshold;

pub use image::{resize_nearest, GrayImage, GrayImageView, ImageError};
pub use threshold::{threshold, ThresholdMode, ThresholdParams};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::{init_with_filter, init_with_level, LogFilter, LogFilterError};
