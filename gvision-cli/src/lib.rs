//! # gvision-cli
//!
//! Reads one image, asks the Vision API for a single feature and prints the
//! per-image results as indented JSON.
//!
//! Every step runs once, in order, and the first failure ends the run:
//! credentials, client, request, annotate, print.

pub mod cli;
pub mod config;
pub mod output;

use std::{io::Write, path::Path};

use anyhow::{Context, Result};
use gvision_client::{AnnotateImageRequest, FeatureKind, ImageAnnotator, VisionBuilder, VisionClient};
use tracing::info;

pub use cli::Cli;
pub use config::Config;

/// Runs the whole pipeline against the real service.
pub async fn run<W: Write>(cli: &Cli, config: &Config, out: &mut W) -> Result<()> {
    let image_path = cli.image_path().context("Argument is required.")?;
    let client = connect(config, cli.endpoint.as_deref())
        .await
        .context("Unable to retrieve vision service")?;
    annotate_image(&client, image_path, cli.feature.clone(), out).await
}

/// Loads the service account key and builds an authenticated client.
///
/// `endpoint` takes precedence over the configured endpoint.
pub async fn connect(config: &Config, endpoint: Option<&str>) -> Result<VisionClient> {
    let credentials = config.credentials_path()?;
    let mut builder = VisionBuilder::new().with_credentials_file(credentials).await?;
    if let Some(endpoint) = endpoint.or(config.endpoint.as_deref()) {
        builder = builder.with_base_url_str(endpoint)?;
    }
    let client = builder.build()?;
    info!(base_url = %client.base_url(), "vision client ready");
    Ok(client)
}

/// Annotates the image at `path` with `annotator` and prints the results to `out`.
pub async fn annotate_image<A, W>(annotator: &A, path: &Path, feature: FeatureKind, out: &mut W) -> Result<()>
where
    A: ImageAnnotator + ?Sized,
    W: Write,
{
    let request = AnnotateImageRequest::from_path(path, feature)
        .await
        .context("Unable to retrieve image request")?;

    let response = annotator
        .annotate(request.into())
        .await
        .context("Unable to execute images annotate requests")?;

    output::write_responses(&response.responses, out).context("Unable to marshal the response")
}
