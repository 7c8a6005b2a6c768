//! Main itired platform client.

use crate::catalog::CatalogClient;
use crate::error::{ClientError, Result};
use crate::types::{ClientConfig, ErrorBody, HealthStatus, PlayResponse};
use async_trait::async_trait;
use itired_playback::{ResolutionError, ResolvedTrack, TrackRef, TrackResolver};
use reqwest::header::COOKIE;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Client for the itired platform API.
///
/// Reuses the `session` cookie of a logged-in browser session; logging in
/// is not something this client does.
///
/// # Example
///
/// ```ignore
/// use itired_client::{ClientConfig, ItiredClient};
///
/// let config = ClientConfig::with_session("https://itired.example.com", "eyJ1c2VyX2lkIjo...");
/// let client = ItiredClient::new(config)?;
///
/// let track = client.resolve_track("yandex", "123").await?;
/// println!("{} by {}", track.title, track.artists.join(", "));
///
/// let playlist = client.catalog().playlist("yandex", "3").await?;
/// println!("{} tracks", playlist.tracks.len());
/// ```
#[derive(Clone)]
pub struct ItiredClient {
    http: Client,
    config: Arc<RwLock<ClientConfig>>,
}

impl ItiredClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        // Validate URL
        if config.url.trim().is_empty() {
            return Err(ClientError::InvalidUrl("URL cannot be empty".into()));
        }

        // Parse and normalize URL
        let url = config.url.trim().trim_end_matches('/').to_string();
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ClientError::InvalidUrl(
                "URL must start with http:// or https://".into(),
            ));
        }
        url::Url::parse(&url).map_err(|e| ClientError::InvalidUrl(e.to_string()))?;

        let normalized_config = ClientConfig {
            url,
            session_cookie: config.session_cookie,
        };

        // Create HTTP client with reasonable defaults
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("itired/{} (CLI)", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ClientError::Request)?;

        Ok(Self {
            http,
            config: Arc::new(RwLock::new(normalized_config)),
        })
    }

    /// Get the platform URL.
    pub async fn url(&self) -> String {
        self.config.read().await.url.clone()
    }

    /// Check if the client carries a session.
    pub async fn is_authenticated(&self) -> bool {
        self.config.read().await.session_cookie.is_some()
    }

    /// Use a different browser session from now on.
    pub async fn set_session_cookie(&self, session_cookie: impl Into<String>) {
        self.config.write().await.session_cookie = Some(session_cookie.into());
    }

    /// Forget the session.
    pub async fn clear_session(&self) {
        self.config.write().await.session_cookie = None;
        info!("Session cleared");
    }

    /// Catalogue operations (playlists, liked tracks, history).
    pub fn catalog(&self) -> CatalogClient<'_> {
        CatalogClient::new(self)
    }

    /// Check platform health.
    ///
    /// This does not require a session. An unhealthy platform answers 500
    /// with a status body, which is returned rather than treated as an error.
    pub async fn health(&self) -> Result<HealthStatus> {
        let url = format!("{}/health", self.url().await);
        debug!(url = %url, "Checking platform health");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(ClientError::from_send)?;

        let status = response.status();
        let body = response.text().await?;

        match serde_json::from_str::<HealthStatus>(&body) {
            Ok(health) => {
                info!(status = %health.status, "Platform health");
                Ok(health)
            }
            Err(_) if !status.is_success() => Err(ClientError::ServerError {
                status: status.as_u16(),
                message: body,
            }),
            Err(e) => Err(ClientError::ParseError(format!(
                "Failed to parse health response: {}",
                e
            ))),
        }
    }

    /// Resolve a track to a playable URL plus metadata.
    ///
    /// The platform records the play in its own listening history.
    pub async fn resolve_track(&self, service: &str, track_id: &str) -> Result<PlayResponse> {
        let path = format!("/api/play/{}_{}", service, track_id);
        debug!(service = %service, track_id = %track_id, "Resolving track");
        self.get_json(&path, "play").await
    }

    /// Send an authenticated GET and decode the JSON body.
    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str, what: &str) -> Result<T> {
        let url = format!("{}{}", self.url().await, path);
        let request = self.authorized(self.http.get(&url)).await;
        let response = request.send().await.map_err(ClientError::from_send)?;
        read_json(response, what).await
    }

    async fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match self.config.read().await.session_cookie {
            Some(ref cookie) => request.header(COOKIE, format!("session={}", cookie)),
            None => request,
        }
    }
}

/// Map a platform response to `T` or a `ClientError`.
async fn read_json<T: DeserializeOwned>(response: Response, what: &str) -> Result<T> {
    let status = response.status();

    if status.is_success() {
        return response.json::<T>().await.map_err(|e| {
            ClientError::ParseError(format!("Failed to parse {} response: {}", what, e))
        });
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .map(|b| b.error)
        .unwrap_or(body);

    Err(match status.as_u16() {
        401 => ClientError::AuthRequired,
        404 => ClientError::NotFound(message),
        429 => ClientError::RateLimited(message),
        code => ClientError::ServerError {
            status: code,
            message,
        },
    })
}

#[async_trait]
impl TrackResolver for ItiredClient {
    async fn resolve(
        &self,
        service: &str,
        track_id: &str,
    ) -> std::result::Result<ResolvedTrack, ResolutionError> {
        let reference = TrackRef::new(service, track_id);

        let response = self.resolve_track(service, track_id).await.map_err(|e| {
            warn!(track_id = %reference.id(), error = %e, "Platform could not resolve track");
            ResolutionError::from(e)
        })?;

        response.into_resolved().ok_or(ResolutionError::NoPlayableUrl)
    }
}
