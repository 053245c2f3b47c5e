use std::path::Path;

use snafu::ResultExt;
use tracing::debug;

use crate::{
    error::*,
    models::{AnnotateImageRequest, Feature, FeatureKind, Image},
};

/// Result cap applied to every requested feature.
pub const DEFAULT_MAX_RESULTS: i32 = 10;

impl AnnotateImageRequest {
    /// Builds a request for one feature, capped at [`DEFAULT_MAX_RESULTS`].
    pub fn new(image: Image, kind: impl Into<FeatureKind>) -> Self {
        Self {
            image,
            features: vec![Feature { kind: kind.into(), max_results: DEFAULT_MAX_RESULTS }],
        }
    }

    /// Reads the image at `path` and builds a request for it.
    pub async fn from_path(
        path: impl AsRef<Path>,
        kind: impl Into<FeatureKind>,
    ) -> Result<Self, Error> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await.context(ReadImageSnafu { path })?;
        debug!(path = %path.display(), bytes = bytes.len(), "read image");
        Ok(Self::new(Image::from_bytes(&bytes), kind))
    }
}
