use std::{path::Path, sync::LazyLock};

use reqwest::ClientBuilder;
use snafu::{OptionExt, ResultExt};
use url::Url;

use crate::{
    auth::{ServiceAccountKey, ServiceAccountTokenSource},
    client::VisionClient,
    error::*,
};

static DEFAULT_BASE_URL: LazyLock<Url> = LazyLock::new(|| {
    Url::parse("https://vision.googleapis.com/v1/")
        .expect("unreachable error: failed to parse default base URL")
});

/// A builder for [`VisionClient`].
#[derive(Debug)]
pub struct VisionBuilder {
    base_url: Url,
    credentials: Option<ServiceAccountKey>,
}

impl Default for VisionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl VisionBuilder {
    pub fn new() -> Self {
        Self { base_url: DEFAULT_BASE_URL.clone(), credentials: None }
    }

    /// Sets a custom base URL for the API, e.g. an emulator.
    ///
    /// A trailing slash is added when missing so methods resolve below it.
    pub fn with_base_url(mut self, mut base_url: Url) -> Self {
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        self.base_url = base_url;
        self
    }

    /// Parses and sets a custom base URL.
    pub fn with_base_url_str(self, base_url: &str) -> Result<Self, Error> {
        let url = Url::parse(base_url).context(InvalidBaseUrlSnafu { url: base_url })?;
        Ok(self.with_base_url(url))
    }

    pub fn with_service_account_key(mut self, key: ServiceAccountKey) -> Self {
        self.credentials = Some(key);
        self
    }

    /// Loads service account credentials from a JSON key file.
    pub async fn with_credentials_file(self, path: impl AsRef<Path>) -> Result<Self, Error> {
        let key = ServiceAccountKey::from_file(path).await?;
        Ok(self.with_service_account_key(key))
    }

    pub fn build(self) -> Result<VisionClient, Error> {
        let key = self.credentials.context(MissingCredentialsSnafu)?;
        let token_source = ServiceAccountTokenSource::new(key);
        let http_client = ClientBuilder::new().build().context(BuildHttpClientSnafu)?;
        Ok(VisionClient::new(http_client, self.base_url, token_source))
    }
}
