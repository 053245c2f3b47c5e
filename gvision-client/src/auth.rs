//! Service account credentials and the OAuth2 token source derived from them.
//!
//! A [`ServiceAccountKey`] is the parsed JSON key file. A
//! [`ServiceAccountTokenSource`] signs a JWT assertion with that key,
//! exchanges it for a bearer token and caches the token until shortly
//! before it expires.

use std::{
    fmt,
    path::Path,
    sync::Arc,
};

use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use snafu::{ResultExt, ensure};
use tokio::sync::Mutex;
use tracing::{debug, instrument};

use crate::error::*;

/// OAuth2 scope granting access to Google Cloud Platform APIs.
pub const CLOUD_PLATFORM_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";

const SERVICE_ACCOUNT_TYPE: &str = "service_account";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;
/// Tokens are refreshed this many seconds before their reported expiry.
const EXPIRY_LEEWAY_SECS: i64 = 60;

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

/// Parsed service account key file.
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    #[serde(rename = "type", default)]
    kind: String,
    client_email: String,
    private_key: String,
    #[serde(default)]
    private_key_id: Option<String>,
    #[serde(default = "default_token_uri")]
    token_uri: String,
}

impl ServiceAccountKey {
    /// Parses a key from its JSON text.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let key: ServiceAccountKey = serde_json::from_str(json).context(ParseCredentialsSnafu)?;
        ensure!(
            key.kind == SERVICE_ACCOUNT_TYPE,
            UnsupportedCredentialTypeSnafu { kind: key.kind.clone() }
        );
        Ok(key)
    }

    /// Reads and parses a key file.
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let json = tokio::fs::read_to_string(path)
            .await
            .context(ReadCredentialsSnafu { path })?;
        Self::from_json(&json)
    }

    pub fn client_email(&self) -> &str {
        &self.client_email
    }

    pub fn token_uri(&self) -> &str {
        &self.token_uri
    }
}

impl fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("private_key_id", &self.private_key_id)
            .field("private_key", &"<redacted>")
            .field("token_uri", &self.token_uri)
            .finish()
    }
}

#[derive(Clone)]
struct CachedToken {
    access_token: String,
    expires_at: i64,
}

impl fmt::Debug for CachedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedToken").field("expires_at", &self.expires_at).finish_non_exhaustive()
    }
}

/// Produces bearer tokens for a service account, refreshing them as needed.
#[derive(Debug, Clone)]
pub struct ServiceAccountTokenSource {
    key: ServiceAccountKey,
    cached: Arc<Mutex<Option<CachedToken>>>,
}

impl ServiceAccountTokenSource {
    /// Creates a token source scoped to [`CLOUD_PLATFORM_SCOPE`].
    pub fn new(key: ServiceAccountKey) -> Self {
        Self {
            key,
            cached: Arc::new(Mutex::new(None)),
        }
    }

    /// Returns a valid access token, exchanging a fresh assertion when the
    /// cached one is missing or about to expire.
    pub async fn access_token(&self, http_client: &Client) -> Result<String, Error> {
        let now = time::OffsetDateTime::now_utc().unix_timestamp();
        let mut cache = self.cached.lock().await;
        if let Some(token) = cache.as_ref() {
            if token.expires_at.saturating_sub(EXPIRY_LEEWAY_SECS) > now {
                return Ok(token.access_token.clone());
            }
        }

        let jwt = self.build_jwt(now)?;
        let token = self.fetch_token(http_client, jwt).await?;
        let access_token = token.access_token.clone();
        *cache = Some(token);
        Ok(access_token)
    }

    fn build_jwt(&self, now: i64) -> Result<String, Error> {
        #[derive(Serialize)]
        struct Claims<'a> {
            iss: &'a str,
            scope: &'a str,
            aud: &'a str,
            iat: i64,
            exp: i64,
        }

        let claims = Claims {
            iss: &self.key.client_email,
            scope: CLOUD_PLATFORM_SCOPE,
            aud: &self.key.token_uri,
            iat: now,
            exp: now + ASSERTION_LIFETIME_SECS,
        };

        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.key.private_key_id.clone();

        let encoding_key =
            EncodingKey::from_rsa_pem(self.key.private_key.as_bytes()).context(ServiceAccountJwtSnafu)?;
        jsonwebtoken::encode(&header, &claims, &encoding_key).context(ServiceAccountJwtSnafu)
    }

    #[instrument(skip_all, fields(token_uri = %self.key.token_uri), err)]
    async fn fetch_token(&self, http_client: &Client, jwt: String) -> Result<CachedToken, Error> {
        #[derive(Deserialize)]
        struct TokenResponse {
            access_token: String,
            expires_in: i64,
        }

        let url = &self.key.token_uri;
        let response = http_client
            .post(url)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", &jwt)])
            .send()
            .await
            .context(ServiceAccountTokenSnafu { url: url.clone() })?;

        let status = response.status();
        if !status.is_success() {
            let description = response.text().await.ok();
            return TokenRejectedSnafu { url: url.clone(), code: status.as_u16(), description }.fail();
        }

        let token: TokenResponse = response.json().await.context(DecodeResponseSnafu)?;
        debug!(expires_in = token.expires_in, "obtained service account access token");

        let expires_at =
            time::OffsetDateTime::now_utc().unix_timestamp().saturating_add(token.expires_in);
        Ok(CachedToken { access_token: token.access_token, expires_at })
    }
}
