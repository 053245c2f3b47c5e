use async_trait::async_trait;
use reqwest::{Client, Response};
use snafu::ResultExt;
use tracing::{Level, debug, instrument, warn};
use url::Url;

use crate::{
    auth::ServiceAccountTokenSource,
    builder::VisionBuilder,
    error::*,
    models::{BatchAnnotateImagesRequest, BatchAnnotateImagesResponse},
};

/// The one operation the annotation service exposes to this crate.
///
/// [`VisionClient`] talks to the real service; tests substitute their own
/// implementation.
#[async_trait]
pub trait ImageAnnotator: Send + Sync + std::fmt::Debug {
    /// Annotates a batch of images. Results come back in request order.
    async fn annotate(
        &self,
        batch: BatchAnnotateImagesRequest,
    ) -> Result<BatchAnnotateImagesResponse, Error>;
}

/// REST client for the Vision API authenticated with a service account.
#[derive(Debug)]
pub struct VisionClient {
    http_client: Client,
    base_url: Url,
    token_source: ServiceAccountTokenSource,
}

impl VisionClient {
    pub(crate) fn new(http_client: Client, base_url: Url, token_source: ServiceAccountTokenSource) -> Self {
        Self { http_client, base_url, token_source }
    }

    pub fn builder() -> VisionBuilder {
        VisionBuilder::new()
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn build_url(&self, method: &str) -> Result<Url, Error> {
        // "./" keeps a method such as "images:annotate" from parsing as a scheme.
        let suffix = format!("./{method}");
        self.base_url.join(&suffix).context(ConstructUrlSnafu { suffix })
    }

    async fn post_json<Req: serde::Serialize, Res: serde::de::DeserializeOwned>(
        &self,
        url: Url,
        json: &Req,
    ) -> Result<Res, Error> {
        let token = self.token_source.access_token(&self.http_client).await?;
        let response = self
            .http_client
            .post(url.clone())
            .bearer_auth(token)
            .json(json)
            .send()
            .await
            .context(PerformRequestSnafu { url })?;

        let response = check_response(response).await?;
        response.json::<Res>().await.context(DecodeResponseSnafu)
    }
}

async fn check_response(response: Response) -> Result<Response, Error> {
    let status = response.status();
    if !status.is_success() {
        let description = response.text().await.ok();
        BadResponseSnafu { code: status.as_u16(), description }.fail()
    } else {
        Ok(response)
    }
}

#[async_trait]
impl ImageAnnotator for VisionClient {
    #[instrument(skip_all, fields(requests = batch.requests.len()), ret(level = Level::TRACE), err)]
    async fn annotate(
        &self,
        batch: BatchAnnotateImagesRequest,
    ) -> Result<BatchAnnotateImagesResponse, Error> {
        let url = self.build_url("images:annotate")?;
        debug!(%url, "sending annotate request");
        let response: BatchAnnotateImagesResponse = self.post_json(url, &batch).await?;

        for (index, image) in response.responses.iter().enumerate() {
            if let Some(message) = image.error_message() {
                warn!(index, error = message, "image annotation failed");
            }
        }
        Ok(response)
    }
}
