//! # gvision-client
//!
//! A small Rust client for the Google Cloud Vision `images:annotate` REST API,
//! authenticated with a service account key.
//!
//! ```rust,ignore
//! use gvision_client::{AnnotateImageRequest, ImageAnnotator, VisionBuilder};
//!
//! let client = VisionBuilder::new()
//!     .with_credentials_file("service-account.json")
//!     .await?
//!     .build()?;
//! let request = AnnotateImageRequest::from_path("face.jpg", "FACE_DETECTION").await?;
//! let response = client.annotate(request.into()).await?;
//! ```

pub mod auth;
pub mod builder;
pub mod client;
pub mod error;
pub mod models;
pub mod request;

pub use auth::{CLOUD_PLATFORM_SCOPE, ServiceAccountKey, ServiceAccountTokenSource};
pub use builder::VisionBuilder;
pub use client::{ImageAnnotator, VisionClient};
pub use error::Error;
pub use models::{
    AnnotateImageRequest, AnnotateImageResponse, BatchAnnotateImagesRequest,
    BatchAnnotateImagesResponse, Feature, FeatureKind, Image,
};
pub use request::DEFAULT_MAX_RESULTS;
