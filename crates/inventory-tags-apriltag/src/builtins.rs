//! Embedded built-in tag families.
//!
//! The source-of-truth lives in `inventory-tags-apriltag/data/`. Dropping
//! another family table into that directory, either as JSON or as the
//! upstream AprilTag source (for example `tagStandard52h13.c`), makes it
//! available here after a rebuild.

#![allow(clippy::unreadable_literal, non_upper_case_globals)]

use crate::TagFamily;

include!(concat!(env!("OUT_DIR"), "/builtins.rs"));
