//! Raster to SVG conversion.
//!
//! [`SvgVectorizer`] traces every non-background intensity into axis-aligned
//! rectangles: horizontal runs are merged with identical runs on the rows
//! below, and each intensity becomes one `<path>`. The output is a pure
//! function of the raster.

use crate::raster_io::{read_png, write_png_to, RasterIoError};
use inventory_tags_core::GrayImageView;
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::io::Write as _;
use std::path::{Path, PathBuf};

#[cfg(feature = "tracing")]
use tracing::instrument;

#[derive(thiserror::Error, Debug)]
pub enum VectorizeError {
    #[error(transparent)]
    Raster(#[from] RasterIoError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("vectorizer backend failed: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Converts an in-memory raster into an SVG document.
pub trait Vectorizer {
    fn vectorize(&self, raster: &GrayImageView<'_>) -> Result<String, VectorizeError>;
}

/// Converts a raster image file into an SVG document.
pub trait RasterFileVectorizer {
    fn vectorize_file(&self, path: &Path) -> Result<String, VectorizeError>;
}

/// Run-merging rectangle tracer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SvgVectorizer {
    /// Intensity drawn as a single full-canvas `<rect>` instead of traced.
    pub background: Option<u8>,
}

impl Default for SvgVectorizer {
    fn default() -> Self {
        Self {
            background: Some(255),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct Rect {
    y0: usize,
    x0: usize,
    x1: usize,
    y1: usize,
}

fn fill(value: u8) -> String {
    format!("#{value:02x}{value:02x}{value:02x}")
}

impl SvgVectorizer {
    /// Trace `raster` into rectangles grouped by intensity.
    fn trace(&self, raster: &GrayImageView<'_>) -> BTreeMap<u8, Vec<Rect>> {
        // (x0, x1, value) -> first row of the open rectangle
        let mut open: BTreeMap<(usize, usize, u8), usize> = BTreeMap::new();
        let mut shapes: BTreeMap<u8, Vec<Rect>> = BTreeMap::new();
        let mut close = |(x0, x1, value): (usize, usize, u8), y0: usize, y1: usize| {
            shapes.entry(value).or_default().push(Rect { y0, x0, x1, y1 });
        };

        for (y, row) in raster.rows().enumerate() {
            let mut next = BTreeMap::new();
            let mut x = 0;
            while x < row.len() {
                let value = row[x];
                let start = x;
                while x < row.len() && row[x] == value {
                    x += 1;
                }
                if Some(value) == self.background {
                    continue;
                }
                let key = (start, x, value);
                let y0 = open.remove(&key).unwrap_or(y);
                next.insert(key, y0);
            }
            for (key, y0) in std::mem::replace(&mut open, next) {
                close(key, y0, y);
            }
        }
        for (key, y0) in open {
            close(key, y0, raster.height);
        }

        for rects in shapes.values_mut() {
            rects.sort_unstable();
        }
        shapes
    }
}

impl Vectorizer for SvgVectorizer {
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip(self, raster), fields(width = raster.width, height = raster.height))
    )]
    fn vectorize(&self, raster: &GrayImageView<'_>) -> Result<String, VectorizeError> {
        let (w, h) = (raster.width, raster.height);
        let shapes = self.trace(raster);

        let mut svg = String::new();
        let _ = writeln!(svg, r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" version="1.1" width="{w}" height="{h}" viewBox="0 0 {w} {h}" shape-rendering="crispEdges">"#
        );
        if let Some(bg) = self.background {
            let _ = writeln!(svg, r#"  <rect width="{w}" height="{h}" fill="{}"/>"#, fill(bg));
        }
        let mut rect_count = 0;
        for (value, rects) in &shapes {
            let mut d = String::new();
            for r in rects {
                let (rw, rh) = (r.x1 - r.x0, r.y1 - r.y0);
                let _ = write!(d, "M{} {}h{rw}v{rh}h-{rw}z", r.x0, r.y0);
            }
            rect_count += rects.len();
            let _ = writeln!(svg, r#"  <path fill="{}" d="{d}"/>"#, fill(*value));
        }
        svg.push_str("</svg>\n");

        log::debug!(
            "vectorized {w}x{h} raster into {} paths ({rect_count} rectangles)",
            shapes.len()
        );
        Ok(svg)
    }
}

impl RasterFileVectorizer for SvgVectorizer {
    fn vectorize_file(&self, path: &Path) -> Result<String, VectorizeError> {
        let raster = read_png(path)?;
        self.vectorize(&raster.view())
    }
}

/// Adapts a file-based vectorizer to in-memory rasters.
///
/// The raster is written to a temporary PNG that is removed on every exit
/// path, including failures of the wrapped vectorizer.
#[derive(Clone, Debug, Default)]
pub struct TempFileVectorizer<V> {
    inner: V,
    scratch_dir: Option<PathBuf>,
}

impl<V: RasterFileVectorizer> TempFileVectorizer<V> {
    pub fn new(inner: V) -> Self {
        Self {
            inner,
            scratch_dir: None,
        }
    }

    /// Place intermediate rasters in `dir` instead of the system temp dir.
    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = Some(dir.into());
        self
    }

    pub fn inner(&self) -> &V {
        &self.inner
    }

    fn scratch_file(&self) -> std::io::Result<tempfile::NamedTempFile> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("inventory-tag-").suffix(".png");
        match &self.scratch_dir {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        }
    }
}

impl<V: RasterFileVectorizer> Vectorizer for TempFileVectorizer<V> {
    fn vectorize(&self, raster: &GrayImageView<'_>) -> Result<String, VectorizeError> {
        let mut tmp = self.scratch_file()?;
        let written = write_png_to(raster, tmp.as_file_mut())
            .and_then(|()| tmp.as_file_mut().flush().map_err(RasterIoError::from));
        let result = match written {
            Ok(()) => self.inner.vectorize_file(tmp.path()),
            Err(err) => Err(err.into()),
        };
        let path = tmp.path().to_path_buf();
        let closed = tmp.close();
        let svg = result?;
        closed?;
        log::debug!("removed intermediate raster {}", path.display());
        Ok(svg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inventory_tags_core::GrayImage;
    use std::cell::RefCell;

    fn raster(width: usize, rows: &[&[u8]]) -> GrayImage {
        let data: Vec<u8> = rows.iter().flat_map(|r| r.iter().copied()).collect();
        GrayImage::from_raw(width, rows.len(), data).expect("raster")
    }

    #[test]
    fn identical_runs_merge_vertically() {
        let img = raster(
            4,
            &[
                &[255, 0, 0, 255],
                &[255, 0, 0, 255],
                &[0, 0, 255, 255],
            ],
        );
        let svg = SvgVectorizer::default().vectorize(&img.view()).expect("svg");

        assert!(svg.contains(r##"<rect width="4" height="3" fill="#ffffff"/>"##));
        assert!(svg.contains(r##"<path fill="#000000" d="M1 0h2v2h-2zM0 2h2v1h-2z"/>"##));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn without_background_every_intensity_is_traced() {
        let img = raster(2, &[&[255, 0]]);
        let vectorizer = SvgVectorizer { background: None };
        let svg = vectorizer.vectorize(&img.view()).expect("svg");

        assert!(!svg.contains("<rect"));
        assert!(svg.contains(r##"<path fill="#000000" d="M1 0h1v1h-1z"/>"##));
        assert!(svg.contains(r##"<path fill="#ffffff" d="M0 0h1v1h-1z"/>"##));
    }

    #[test]
    fn traced_rectangles_cover_exactly_the_foreground() {
        let img = raster(
            5,
            &[
                &[0, 255, 0, 0, 255],
                &[0, 0, 0, 255, 255],
                &[255, 0, 255, 0, 0],
                &[0, 0, 255, 0, 0],
            ],
        );
        let shapes = SvgVectorizer::default().trace(&img.view());
        let mut covered = vec![255u8; 20];
        for (&value, rects) in &shapes {
            for r in rects {
                for y in r.y0..r.y1 {
                    for x in r.x0..r.x1 {
                        assert_eq!(covered[y * 5 + x], 255, "overlap at ({x}, {y})");
                        covered[y * 5 + x] = value;
                    }
                }
            }
        }
        assert_eq!(covered, img.data);
    }

    #[test]
    fn output_is_deterministic() {
        let img = raster(3, &[&[0, 255, 0], &[255, 0, 255]]);
        let v = SvgVectorizer::default();
        assert_eq!(
            v.vectorize(&img.view()).expect("first"),
            v.vectorize(&img.view()).expect("second")
        );
    }

    #[test]
    fn svg_parses_as_xml() {
        let img = raster(3, &[&[0, 255, 0]]);
        let svg = SvgVectorizer::default().vectorize(&img.view()).expect("svg");
        let doc = roxmltree::Document::parse(&svg).expect("xml");
        assert_eq!(doc.root_element().tag_name().name(), "svg");
        assert_eq!(doc.root_element().attribute("width"), Some("3"));
    }

    /// Records the path it was handed and whether the file existed.
    struct RecordingBackend {
        seen: RefCell<Option<(PathBuf, bool)>>,
        fail: bool,
    }

    impl RasterFileVectorizer for RecordingBackend {
        fn vectorize_file(&self, path: &Path) -> Result<String, VectorizeError> {
            *self.seen.borrow_mut() = Some((path.to_path_buf(), path.exists()));
            if self.fail {
                return Err(VectorizeError::Backend("backend failure".into()));
            }
            SvgVectorizer::default().vectorize_file(path)
        }
    }

    #[test]
    fn temp_file_matches_in_memory_output_and_is_removed() {
        let img = raster(3, &[&[0, 255, 0], &[0, 0, 255]]);
        let adapter = TempFileVectorizer::new(RecordingBackend {
            seen: RefCell::new(None),
            fail: false,
        });

        let svg = adapter.vectorize(&img.view()).expect("svg");
        assert_eq!(svg, SvgVectorizer::default().vectorize(&img.view()).expect("direct"));

        let (path, existed) = adapter.inner().seen.borrow().clone().expect("called");
        assert!(existed);
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("png"));
        assert!(!path.exists());
    }

    #[test]
    fn temp_file_is_removed_when_backend_fails() {
        let img = raster(1, &[&[0]]);
        let adapter = TempFileVectorizer::new(RecordingBackend {
            seen: RefCell::new(None),
            fail: true,
        });

        assert!(matches!(
            adapter.vectorize(&img.view()),
            Err(VectorizeError::Backend(_))
        ));
        let (path, existed) = adapter.inner().seen.borrow().clone().expect("called");
        assert!(existed);
        assert!(!path.exists());
    }

    #[test]
    fn temp_file_is_removed_when_encoding_fails() {
        let scratch = tempfile::tempdir().expect("tempdir");
        let adapter = TempFileVectorizer::new(RecordingBackend {
            seen: RefCell::new(None),
            fail: false,
        })
        .with_scratch_dir(scratch.path());

        // buffer shorter than width * height
        let short = [0u8; 3];
        let view = GrayImageView {
            width: 2,
            height: 2,
            data: &short,
        };

        assert!(matches!(
            adapter.vectorize(&view),
            Err(VectorizeError::Raster(RasterIoError::Encode(_)))
        ));
        assert!(adapter.inner().seen.borrow().is_none());
        let leftovers = std::fs::read_dir(scratch.path()).expect("read dir").count();
        assert_eq!(leftovers, 0);
    }
}
