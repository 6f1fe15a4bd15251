//! Episode metadata lookup
//!
//! One network request per session, keyed by series id, season and
//! episode. The client succeeds only on a 2xx response with a parseable
//! JSON body; everything else is an error the caller maps to "metadata
//! unavailable". No retries here: fallback policy belongs to the
//! resolver, not the transport.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use vskip_common::config::ProviderConfig;
use vskip_common::{EpisodeIdentity, EpisodeMetadata};

const USER_AGENT: &str = "vskip/0.1.0 (https://github.com/vskip/vskip)";

/// Metadata lookup errors
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<MetadataError> for vskip_common::Error {
    fn from(e: MetadataError) -> Self {
        match e {
            MetadataError::Network(msg) => vskip_common::Error::Network(msg),
            MetadataError::Api(status, body) => {
                vskip_common::Error::InvalidResponse(format!("status {}: {}", status, body))
            }
            MetadataError::Parse(msg) => vskip_common::Error::InvalidResponse(msg),
        }
    }
}

/// Source of episode metadata for segment resolution
///
/// Implementations perform at most one lookup per call and must not
/// panic; any failure is surfaced as a `MetadataError` and handled by
/// the session controller's fallback path.
#[async_trait]
pub trait SegmentProvider: Send + Sync {
    async fn episode(&self, identity: &EpisodeIdentity) -> Result<EpisodeMetadata, MetadataError>;
}

/// Episode lookup response body (fields we consume)
#[derive(Debug, Clone, Deserialize)]
struct EpisodeResponse {
    /// Runtime in minutes; absent for many older episodes
    runtime: Option<f64>,
    /// Episode title
    name: Option<String>,
}

/// TMDB API client
pub struct TmdbClient {
    http_client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl TmdbClient {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self, MetadataError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| MetadataError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    pub fn from_config(config: &ProviderConfig) -> Result<Self, MetadataError> {
        Self::new(
            &config.base_url,
            &config.api_key,
            Duration::from_secs(config.timeout_secs),
        )
    }
}

#[async_trait]
impl SegmentProvider for TmdbClient {
    /// Lookup one episode's metadata
    async fn episode(&self, identity: &EpisodeIdentity) -> Result<EpisodeMetadata, MetadataError> {
        let url = format!(
            "{}/tv/{}/season/{}/episode/{}",
            self.base_url, identity.series_id, identity.season, identity.episode
        );

        tracing::debug!(%identity, url = %url, "querying episode metadata");

        let response = self
            .http_client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| MetadataError::Network(e.to_string()))?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(MetadataError::Api(status.as_u16(), error_text));
        }

        let body: EpisodeResponse = response
            .json()
            .await
            .map_err(|e| MetadataError::Parse(e.to_string()))?;

        tracing::info!(
            %identity,
            runtime_minutes = ?body.runtime,
            name = body.name.as_deref().unwrap_or("?"),
            "episode metadata retrieved"
        );

        Ok(EpisodeMetadata {
            runtime_minutes: body.runtime,
            name: body.name,
        })
    }
}

/// Scripted provider for tests and the sim binary
///
/// Stands in for the network: answers every lookup with a fixed result,
/// optionally after a delay (to exercise supersede-during-fetch paths).
pub struct StubProvider {
    metadata: Option<EpisodeMetadata>,
    delay: Option<Duration>,
}

impl StubProvider {
    /// Provider that reports the given runtime for every episode
    pub fn with_runtime(runtime_minutes: f64) -> Self {
        Self {
            metadata: Some(EpisodeMetadata {
                runtime_minutes: Some(runtime_minutes),
                name: None,
            }),
            delay: None,
        }
    }

    /// Provider that responds without a runtime field
    pub fn without_runtime() -> Self {
        Self {
            metadata: Some(EpisodeMetadata {
                runtime_minutes: None,
                name: None,
            }),
            delay: None,
        }
    }

    /// Provider that fails every lookup
    pub fn unavailable() -> Self {
        Self {
            metadata: None,
            delay: None,
        }
    }

    /// Delay every response, simulating a slow round trip
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[async_trait]
impl SegmentProvider for StubProvider {
    async fn episode(&self, identity: &EpisodeIdentity) -> Result<EpisodeMetadata, MetadataError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.metadata {
            Some(metadata) => Ok(metadata.clone()),
            None => Err(MetadataError::Network(format!(
                "stubbed lookup failure for {}",
                identity
            ))),
        }
    }
}
