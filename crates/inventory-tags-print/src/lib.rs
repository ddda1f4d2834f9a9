//! Printable inventory tag pairs.
//!
//! One inventory tag id is encoded as two stacked AprilTag markers: a
//! `tagStandard41h12` marker on top and a `tagStandard52h13` marker below,
//! with the decimal id printed underneath. The pipeline is:
//!
//! 1. [`IdSplitter`] maps the id to one marker index per family,
//! 2. each marker is rendered and binarized,
//! 3. [`compose`] stacks them on a white canvas,
//! 4. a [`Vectorizer`] turns the canvas into SVG,
//! 5. [`inject_label`] appends the id as a `<text>` element.
//!
//! [`TagPairGenerator`] runs all of it; [`TagPairConfig`] drives it from JSON.
//!
//! ```no_run
//! use inventory_tags_print::{TagPairGenerator, TagPairParams};
//!
//! let gen = TagPairGenerator::from_family_b_table("tagStandard52h13.c")?;
//! let artifact = gen.generate(2, &TagPairParams::default())?;
//! artifact.write_svg("tag_2.svg")?;
//! # Ok::<(), inventory_tags_print::TagPairError>(())
//! ```

mod compose;
mod error;
mod io;
mod label;
mod layout;
mod params;
mod pipeline;
mod raster_io;
mod split;
mod vectorize;

pub use compose::{compose, Composite, BACKGROUND};
pub use error::TagPairError;
pub use io::TagPairConfig;
pub use label::{inject_label, inject_label_with_style, LabelStyle, MalformedDocumentError};
pub use layout::{LayoutError, LayoutGeometry, LayoutParams, Placement};
pub use params::{TagPairParams, FAMILY_A_SCALE_FACTOR};
pub use pipeline::{TagPairArtifact, TagPairGenerator};
pub use raster_io::{read_png, write_png, write_png_to, RasterIoError};
pub use split::{IdSplitter, RangeError, SplitResult};
pub use vectorize::{
    RasterFileVectorizer, SvgVectorizer, TempFileVectorizer, VectorizeError, Vectorizer,
};
