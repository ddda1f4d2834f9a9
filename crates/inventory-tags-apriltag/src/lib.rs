//! AprilTag family tables and marker bitmap rendering.
//!
//! This crate focuses on:
//! - static family metadata (`FamilySpec`) used to size the id space,
//! - tag families with their bit layout and code table (`TagFamily`),
//! - built-in families compiled from `data/*.json` and upstream `data/*.c`
//!   sources,
//! - loading of external code tables in either format,
//! - rendering a marker id into a grayscale bitmap (`MarkerGenerator`).
//!
//! It does **not** detect or decode markers.

pub mod builtins;
mod c_source;
mod family;
mod geometry;
mod io;
mod layout;
mod render;

pub use family::{FamilySpec, MarkerError, TagFamily, TagFamilyError};
pub use io::TagFamilyFile;
pub use layout::{CellKind, TagLayout};
pub use render::MarkerGenerator;
