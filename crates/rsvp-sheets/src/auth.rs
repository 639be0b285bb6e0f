//! Service-account access tokens.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::SheetsError;

/// OAuth scope granting read/write access to spreadsheets.
pub const SPREADSHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";
/// Google's OAuth 2.0 token endpoint.
pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;
/// Tokens are refreshed this long before their stated expiry.
const REFRESH_MARGIN: Duration = Duration::from_secs(60);

/// Supplies bearer tokens for Sheets requests.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Returns a currently valid access token.
    async fn access_token(&self) -> Result<String, SheetsError>;
}

/// A fixed token, for emulators and tests.
#[derive(Debug, Clone)]
pub struct StaticToken(pub String);

#[async_trait]
impl TokenProvider for StaticToken {
    async fn access_token(&self) -> Result<String, SheetsError> {
        Ok(self.0.clone())
    }
}

/// Service-account credentials.
#[derive(Clone)]
pub struct ServiceAccountKey {
    /// The account's `client_email`.
    pub client_email: String,
    /// PKCS#8 PEM private key.
    pub private_key_pem: String,
}

impl ServiceAccountKey {
    /// Builds a key, turning literal `\n` sequences (as found in env vars)
    /// into newlines.
    #[must_use]
    pub fn new(client_email: impl Into<String>, private_key: &str) -> Self {
        Self {
            client_email: client_email.into(),
            private_key_pem: private_key.replace("\\n", "\n"),
        }
    }
}

impl std::fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("private_key_pem", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Serialize)]
struct AssertionClaims {
    iss: String,
    scope: String,
    aud: String,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

#[derive(Debug)]
struct CachedToken {
    token: String,
    refresh_at: Instant,
}

/// Exchanges signed service-account assertions for access tokens.
pub struct ServiceAccountAuth {
    http: reqwest::Client,
    key: ServiceAccountKey,
    encoding_key: EncodingKey,
    token_url: String,
    cached: Mutex<Option<CachedToken>>,
}

impl ServiceAccountAuth {
    /// Creates an authenticator against Google's token endpoint.
    ///
    /// # Errors
    ///
    /// Returns `SheetsError::Key` if the private key is not a valid RSA PEM.
    pub fn new(http: reqwest::Client, key: ServiceAccountKey) -> Result<Self, SheetsError> {
        Self::with_token_url(http, key, GOOGLE_TOKEN_URL)
    }

    /// Creates an authenticator against a custom token endpoint.
    ///
    /// # Errors
    ///
    /// Returns `SheetsError::Key` if the private key is not a valid RSA PEM.
    pub fn with_token_url(
        http: reqwest::Client,
        key: ServiceAccountKey,
        token_url: impl Into<String>,
    ) -> Result<Self, SheetsError> {
        let encoding_key = EncodingKey::from_rsa_pem(key.private_key_pem.as_bytes())?;
        Ok(Self {
            http,
            key,
            encoding_key,
            token_url: token_url.into(),
            cached: Mutex::new(None),
        })
    }

    fn claims(&self, issued_at: i64) -> AssertionClaims {
        AssertionClaims {
            iss: self.key.client_email.clone(),
            scope: SPREADSHEETS_SCOPE.to_owned(),
            aud: self.token_url.clone(),
            iat: issued_at,
            exp: issued_at + ASSERTION_LIFETIME_SECS,
        }
    }

    async fn fetch_token(&self) -> Result<CachedToken, SheetsError> {
        let claims = self.claims(Utc::now().timestamp());
        let assertion = encode(&Header::new(Algorithm::RS256), &claims, &self.encoding_key)?;

        let response = self
            .http
            .post(&self.token_url)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SheetsError::Status {
                context: "token exchange",
                status: status.as_u16(),
                body,
            });
        }
        let token: TokenResponse = response.json().await?;
        debug!(expires_in = token.expires_in, "obtained sheets access token");

        let lifetime = Duration::from_secs(token.expires_in).saturating_sub(REFRESH_MARGIN);
        Ok(CachedToken {
            token: token.access_token,
            refresh_at: Instant::now() + lifetime,
        })
    }
}

impl std::fmt::Debug for ServiceAccountAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountAuth")
            .field("key", &self.key)
            .field("token_url", &self.token_url)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl TokenProvider for ServiceAccountAuth {
    async fn access_token(&self) -> Result<String, SheetsError> {
        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref().filter(|t| Instant::now() < t.refresh_at) {
            return Ok(token.token.clone());
        }
        let fresh = self.fetch_token().await?;
        let token = fresh.token.clone();
        *cached = Some(fresh);
        Ok(token)
    }
}
