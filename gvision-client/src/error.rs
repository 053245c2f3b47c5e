use std::path::PathBuf;

use snafu::Snafu;
use url::Url;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("failed to read credentials file {}", path.display()))]
    ReadCredentials { source: std::io::Error, path: PathBuf },

    #[snafu(display("failed to parse service account credentials"))]
    ParseCredentials { source: serde_json::Error },

    #[snafu(display("'type' field is {kind:?} (expected \"service_account\")"))]
    UnsupportedCredentialType { kind: String },

    #[snafu(display("no service account credentials configured"))]
    MissingCredentials,

    #[snafu(display("failed to sign service account JWT"))]
    ServiceAccountJwt { source: jsonwebtoken::errors::Error },

    #[snafu(display("failed to request access token from {url}"))]
    ServiceAccountToken { source: reqwest::Error, url: String },

    #[snafu(display(
        "token endpoint {url} rejected the assertion; code {code}; description: {}",
        description.as_deref().unwrap_or("none")
    ))]
    TokenRejected {
        url: String,
        code: u16,
        description: Option<String>,
    },

    #[snafu(display("failed to build HTTP client"))]
    BuildHttpClient { source: reqwest::Error },

    #[snafu(display("invalid base URL '{url}'"))]
    InvalidBaseUrl { source: url::ParseError, url: String },

    #[snafu(display("failed to construct URL (probably incorrect base URL) with suffix '{suffix}'"))]
    ConstructUrl { source: url::ParseError, suffix: String },

    #[snafu(display("failed to read image {}", path.display()))]
    ReadImage { source: std::io::Error, path: PathBuf },

    #[snafu(display("failed to perform request to '{url}'"))]
    PerformRequest { source: reqwest::Error, url: Url },

    #[snafu(display(
        "bad response from server; code {code}; description: {}",
        description.as_deref().unwrap_or("none")
    ))]
    BadResponse {
        code: u16,
        description: Option<String>,
    },

    #[snafu(display("failed to decode JSON response"))]
    DecodeResponse { source: reqwest::Error },
}
