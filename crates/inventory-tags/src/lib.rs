//! High-level facade crate for the `inventory-tags-*` workspace.
//!
//! An inventory tag is one integer id printed as two stacked AprilTag
//! markers (`tagStandard41h12` above `tagStandard52h13`) with the id as a
//! text label, emitted as an SVG document.
//!
//! ## Quickstart
//!
//! ```no_run
//! use inventory_tags::{TagPairGenerator, TagPairParams};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! inventory_tags::core::init_with_level(log::LevelFilter::Info)
//!     .map_err(|e| e.to_string())?;
//!
//! let gen = TagPairGenerator::from_family_b_table("tagStandard52h13.c")?;
//! let artifact = gen.generate_tag_pair(
//!     2,
//!     &TagPairParams::default(),
//!     Some("tag_2.svg".as_ref()),
//! )?;
//! println!("markers {:?}", artifact.split);
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `inventory_tags::core`: grayscale rasters, resize, binarization, logging.
//! - `inventory_tags::apriltag`: tag family tables and marker rendering.
//! - `inventory_tags::print`: id splitting, layout, SVG output, labels.

pub use inventory_tags_apriltag as apriltag;
pub use inventory_tags_core as core;
pub use inventory_tags_print as print;

pub use inventory_tags_apriltag::{FamilySpec, MarkerGenerator, TagFamily};
pub use inventory_tags_print::{
    IdSplitter, LayoutGeometry, SplitResult, TagPairArtifact, TagPairConfig, TagPairError,
    TagPairGenerator, TagPairParams,
};
