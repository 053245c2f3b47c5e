//! Wire types for the `images:annotate` method.
//!
//! Requests are fully typed. Per-image responses are kept as opaque JSON:
//! their shape is owned by the service and callers usually just print them.

use std::{
    convert::Infallible,
    fmt::{self, Formatter},
    str::FromStr,
};

use base64::{Engine, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};

/// The kind of analysis requested for an image.
///
/// Unknown names are carried verbatim in [`FeatureKind::Custom`] and left for
/// the service to accept or reject.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeatureKind {
    #[default]
    #[serde(rename = "FACE_DETECTION")]
    FaceDetection,
    #[serde(rename = "LANDMARK_DETECTION")]
    LandmarkDetection,
    #[serde(rename = "LOGO_DETECTION")]
    LogoDetection,
    #[serde(rename = "LABEL_DETECTION")]
    LabelDetection,
    #[serde(rename = "TEXT_DETECTION")]
    TextDetection,
    #[serde(rename = "DOCUMENT_TEXT_DETECTION")]
    DocumentTextDetection,
    #[serde(rename = "SAFE_SEARCH_DETECTION")]
    SafeSearchDetection,
    #[serde(rename = "IMAGE_PROPERTIES")]
    ImageProperties,
    #[serde(rename = "CROP_HINTS")]
    CropHints,
    #[serde(rename = "WEB_DETECTION")]
    WebDetection,
    #[serde(rename = "PRODUCT_SEARCH")]
    ProductSearch,
    #[serde(rename = "OBJECT_LOCALIZATION")]
    ObjectLocalization,
    #[serde(untagged)]
    Custom(String),
}

impl FeatureKind {
    /// All kinds with a dedicated variant.
    pub const KNOWN: [FeatureKind; 12] = [
        FeatureKind::FaceDetection,
        FeatureKind::LandmarkDetection,
        FeatureKind::LogoDetection,
        FeatureKind::LabelDetection,
        FeatureKind::TextDetection,
        FeatureKind::DocumentTextDetection,
        FeatureKind::SafeSearchDetection,
        FeatureKind::ImageProperties,
        FeatureKind::CropHints,
        FeatureKind::WebDetection,
        FeatureKind::ProductSearch,
        FeatureKind::ObjectLocalization,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            FeatureKind::FaceDetection => "FACE_DETECTION",
            FeatureKind::LandmarkDetection => "LANDMARK_DETECTION",
            FeatureKind::LogoDetection => "LOGO_DETECTION",
            FeatureKind::LabelDetection => "LABEL_DETECTION",
            FeatureKind::TextDetection => "TEXT_DETECTION",
            FeatureKind::DocumentTextDetection => "DOCUMENT_TEXT_DETECTION",
            FeatureKind::SafeSearchDetection => "SAFE_SEARCH_DETECTION",
            FeatureKind::ImageProperties => "IMAGE_PROPERTIES",
            FeatureKind::CropHints => "CROP_HINTS",
            FeatureKind::WebDetection => "WEB_DETECTION",
            FeatureKind::ProductSearch => "PRODUCT_SEARCH",
            FeatureKind::ObjectLocalization => "OBJECT_LOCALIZATION",
            FeatureKind::Custom(kind) => kind,
        }
    }
}

impl From<&str> for FeatureKind {
    fn from(kind: &str) -> Self {
        Self::KNOWN
            .into_iter()
            .find(|known| known.as_str() == kind)
            .unwrap_or_else(|| Self::Custom(kind.to_string()))
    }
}

impl From<String> for FeatureKind {
    fn from(kind: String) -> Self {
        Self::from(kind.as_str())
    }
}

impl FromStr for FeatureKind {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A requested feature with its result cap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: FeatureKind,
    pub max_results: i32,
}

/// Image payload; `content` is the base64 encoding of the raw file bytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub content: String,
}

impl Image {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self { content: STANDARD.encode(bytes) }
    }
}

/// Annotation request for a single image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotateImageRequest {
    pub image: Image,
    pub features: Vec<Feature>,
}

/// Body of an `images:annotate` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchAnnotateImagesRequest {
    pub requests: Vec<AnnotateImageRequest>,
}

impl From<AnnotateImageRequest> for BatchAnnotateImagesRequest {
    fn from(request: AnnotateImageRequest) -> Self {
        Self { requests: vec![request] }
    }
}

/// Per-image result exactly as returned by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnnotateImageResponse(pub serde_json::Value);

impl AnnotateImageResponse {
    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }

    /// The message of the per-image error status, if the service set one.
    pub fn error_message(&self) -> Option<&str> {
        let error = self.0.get("error")?;
        Some(error.get("message").and_then(|m| m.as_str()).unwrap_or("unknown error"))
    }
}

/// Results in the same order as the submitted requests.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchAnnotateImagesResponse {
    #[serde(default)]
    pub responses: Vec<AnnotateImageResponse>,
}
