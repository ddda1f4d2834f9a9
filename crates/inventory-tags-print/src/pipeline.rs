//! End-to-end tag pair generation.

use crate::compose::compose;
use crate::error::TagPairError;
use crate::label::{inject_label_with_style, LabelStyle};
use crate::layout::{LayoutError, LayoutGeometry};
use crate::params::TagPairParams;
use crate::split::{IdSplitter, SplitResult};
use crate::vectorize::{SvgVectorizer, Vectorizer};
use inventory_tags_apriltag::builtins::builtin_family;
use inventory_tags_apriltag::{FamilySpec, MarkerError, MarkerGenerator, TagFamily};
use inventory_tags_core::{threshold, GrayImage, ImageError, ThresholdParams};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// One rendered tag pair.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagPairArtifact {
    pub inventory_tag_id: i64,
    pub split: SplitResult,
    pub geometry: LayoutGeometry,
    /// Complete SVG document with the label as the last child of the root.
    pub svg: String,
}

impl TagPairArtifact {
    /// Write the SVG document to `path`.
    pub fn write_svg(&self, path: impl AsRef<Path>) -> Result<(), std::io::Error> {
        fs::write(path, self.svg.as_bytes())
    }
}

/// Renders labelled, stacked marker pairs for inventory tag ids.
pub struct TagPairGenerator {
    marker_a: Box<dyn MarkerGenerator>,
    marker_b: Box<dyn MarkerGenerator>,
    vectorizer: Box<dyn Vectorizer>,
    splitter: IdSplitter,
    label_style: LabelStyle,
}

impl TagPairGenerator {
    /// Build a generator from two marker sources.
    ///
    /// The id space is the product of the two family sizes reported by the
    /// generators.
    pub fn new(
        marker_a: impl MarkerGenerator + 'static,
        marker_b: impl MarkerGenerator + 'static,
    ) -> Self {
        let splitter = IdSplitter::new(marker_a.family(), marker_b.family());
        Self {
            marker_a: Box::new(marker_a),
            marker_b: Box::new(marker_b),
            vectorizer: Box::new(SvgVectorizer::default()),
            splitter,
            label_style: LabelStyle::default(),
        }
    }

    /// Built-in `tagStandard41h12` on top, `family_b` below.
    ///
    /// `family_b` must be the full `tagStandard52h13` table.
    pub fn standard(family_b: TagFamily) -> Result<Self, TagPairError> {
        let a_spec = FamilySpec::TAG_STANDARD_41H12;
        let family_a = builtin_family(&a_spec.name)
            .ok_or_else(|| TagPairError::FamilyUnavailable(a_spec.name.to_string()))?;
        family_a.ensure_matches(&a_spec)?;
        family_b.ensure_matches(&FamilySpec::TAG_STANDARD_52H13)?;
        Ok(Self::new(family_a, family_b))
    }

    /// [`standard`](Self::standard) with family B read from a code table:
    /// the upstream `tagStandard52h13.c` source or a JSON table.
    pub fn from_family_b_table(path: impl AsRef<Path>) -> Result<Self, TagPairError> {
        let family_b = TagFamily::load_table_expecting(path, &FamilySpec::TAG_STANDARD_52H13)?;
        Self::standard(family_b)
    }

    /// [`standard`](Self::standard) using only built-in tables.
    ///
    /// Fails with [`TagPairError::FamilyUnavailable`] unless a
    /// `tagStandard52h13` table was placed in `inventory-tags-apriltag/data/`
    /// at build time.
    pub fn builtin() -> Result<Self, TagPairError> {
        let b_spec = FamilySpec::TAG_STANDARD_52H13;
        let family_b = builtin_family(&b_spec.name)
            .ok_or_else(|| TagPairError::FamilyUnavailable(b_spec.name.to_string()))?;
        Self::standard(family_b)
    }

    pub fn with_vectorizer(mut self, vectorizer: impl Vectorizer + 'static) -> Self {
        self.vectorizer = Box::new(vectorizer);
        self
    }

    pub fn with_label_style(mut self, style: LabelStyle) -> Self {
        self.label_style = style;
        self
    }

    #[inline]
    pub fn splitter(&self) -> &IdSplitter {
        &self.splitter
    }

    #[inline]
    pub fn label_style(&self) -> &LabelStyle {
        &self.label_style
    }

    fn render_marker(
        generator: &dyn MarkerGenerator,
        index: u32,
        scale: f64,
        binarize: &ThresholdParams,
    ) -> Result<GrayImage, TagPairError> {
        let raw = generator.generate(index, scale).map_err(|source| {
            let family = generator.family().name.to_string();
            match source {
                MarkerError::Image(ImageError::EmptyResize { .. })
                | MarkerError::Image(ImageError::InvalidScale(_)) => {
                    TagPairError::Layout(LayoutError::ScaleTooSmall { family, scale })
                }
                source => TagPairError::Marker { family, source },
            }
        })?;
        Ok(threshold(&raw.view(), binarize))
    }

    /// Render the labelled tag pair for `inventory_tag_id`.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip(self, params), fields(scale = params.scale))
    )]
    pub fn generate(
        &self,
        inventory_tag_id: i64,
        params: &TagPairParams,
    ) -> Result<TagPairArtifact, TagPairError> {
        if !(params.scale.is_finite() && params.scale > 0.0) {
            return Err(LayoutError::InvalidScale(params.scale).into());
        }
        let split = self.splitter.split(inventory_tag_id)?;
        log::debug!(
            "id {inventory_tag_id} -> {} #{}, {} #{}",
            self.splitter.family_a().name,
            split.index_a,
            self.splitter.family_b().name,
            split.index_b
        );

        let marker_a = Self::render_marker(
            self.marker_a.as_ref(),
            split.index_a,
            params.family_a_scale(),
            &params.binarize,
        )?;
        let marker_b = Self::render_marker(
            self.marker_b.as_ref(),
            split.index_b,
            params.family_b_scale(),
            &params.binarize,
        )?;

        let composite = compose(&marker_a.view(), &marker_b.view(), &params.layout())?;
        let geometry = composite.geometry;
        let document = self.vectorizer.vectorize(&composite.raster.view())?;
        let svg = inject_label_with_style(
            &document,
            &inventory_tag_id.to_string(),
            geometry.label_x,
            geometry.label_y,
            geometry.font_size,
            &self.label_style,
        )?;

        log::info!(
            "generated tag pair {inventory_tag_id} ({}x{}, {} bytes of SVG)",
            geometry.canvas_width,
            geometry.canvas_height,
            svg.len()
        );
        Ok(TagPairArtifact {
            inventory_tag_id,
            split,
            geometry,
            svg,
        })
    }

    /// [`generate`](Self::generate), then write the SVG to `output_path` if given.
    pub fn generate_tag_pair(
        &self,
        inventory_tag_id: i64,
        params: &TagPairParams,
        output_path: Option<&Path>,
    ) -> Result<TagPairArtifact, TagPairError> {
        let artifact = self.generate(inventory_tag_id, params)?;
        if let Some(path) = output_path {
            artifact.write_svg(path)?;
            log::info!("wrote {}", path.display());
        }
        Ok(artifact)
    }
}

impl std::fmt::Debug for TagPairGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TagPairGenerator")
            .field("splitter", &self.splitter)
            .field("label_style", &self.label_style)
            .finish_non_exhaustive()
    }
}
