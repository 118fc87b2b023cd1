//! Access-token supply for the Google Calendar API.
//!
//! The store holds a long-lived refresh token obtained once out of band.
//! Short-lived access tokens are minted from it on demand and cached in
//! memory until shortly before they lapse.

use std::time::{Duration, Instant};

use reqwest::Method;
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::debug;

use scholarsync_domain::{truncate_chars, GoogleCalendarConfig, Result, ScholarSyncError};

use crate::http::HttpClient;
use crate::InfraError;

/// Refresh this long before the reported expiry so a token cannot lapse
/// between the cache check and the request that uses it.
const EXPIRY_LEEWAY: Duration = Duration::from_secs(60);

const ERROR_BODY_SNIPPET_CHARS: usize = 200;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

/// Mints and caches OAuth access tokens via the offline refresh grant.
pub struct GoogleTokenProvider {
    http: HttpClient,
    config: GoogleCalendarConfig,
    cached: Mutex<Option<CachedToken>>,
}

impl GoogleTokenProvider {
    pub fn new(config: GoogleCalendarConfig) -> Result<Self> {
        Ok(Self {
            http: HttpClient::builder().build()?,
            config,
            cached: Mutex::new(None),
        })
    }

    /// Returns a currently valid access token, refreshing when the cached
    /// one is absent or about to lapse.
    pub async fn access_token(&self) -> Result<String> {
        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref() {
            if Instant::now() < token.expires_at {
                return Ok(token.access_token.clone());
            }
        }

        let fresh = self.refresh().await?;
        let lifetime = Duration::from_secs(fresh.expires_in).saturating_sub(EXPIRY_LEEWAY);
        let access_token = fresh.access_token.clone();
        *cached = Some(CachedToken {
            access_token: fresh.access_token,
            expires_at: Instant::now() + lifetime,
        });
        Ok(access_token)
    }

    async fn refresh(&self) -> Result<TokenResponse> {
        debug!(token_url = %self.config.token_url, "refreshing google calendar access token");
        let request = self
            .http
            .request(Method::POST, &self.config.token_url)
            .form(&[
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("refresh_token", self.config.refresh_token.as_str()),
                ("grant_type", "refresh_token"),
            ]);

        let response = self.http.send(request).await?;
        let status = response.status();
        if !status.is_success() {
            // The token endpoint reports a revoked grant as 400, so every
            // failure here is an auth problem rather than caller input.
            let body = response.text().await.unwrap_or_default();
            let snippet = truncate_chars(body.trim(), ERROR_BODY_SNIPPET_CHARS);
            return Err(ScholarSyncError::Backend(format!(
                "google token refresh failed ({status}): {snippet}"
            )));
        }

        response
            .json::<TokenResponse>()
            .await
            .map_err(|err| InfraError::from(err).0)
    }
}
