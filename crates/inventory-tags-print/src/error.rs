use crate::label::MalformedDocumentError;
use crate::layout::LayoutError;
use crate::split::RangeError;
use crate::vectorize::VectorizeError;
use inventory_tags_apriltag::{MarkerError, TagFamilyError};

/// Errors returned by the tag pair pipeline.
#[derive(thiserror::Error, Debug)]
pub enum TagPairError {
    #[error(transparent)]
    Range(#[from] RangeError),
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error(transparent)]
    MalformedDocument(#[from] MalformedDocumentError),
    #[error("failed to render {family} marker: {source}")]
    Marker {
        family: String,
        #[source]
        source: MarkerError,
    },
    #[error(transparent)]
    Family(#[from] TagFamilyError),
    #[error("no code table available for {0}")]
    FamilyUnavailable(String),
    #[error(transparent)]
    Vectorize(#[from] VectorizeError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
