//! Deadline resolution over the HTTP fallback chain

use std::time::Duration;

use reqwest::{Client, Url};
use tracing::{debug, info, warn};

use crate::{
    config::WidgetConfig,
    error::{Result, TimerError},
    wire::TimerPayload,
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Walks the configured deadline sources in priority order
#[derive(Debug, Clone)]
pub struct DeadlineResolver {
    client: Client,
    candidates: Vec<Url>,
}

impl DeadlineResolver {
    pub fn new(config: &WidgetConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("expo-countdown/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TimerError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            candidates: config.candidate_urls(),
        })
    }

    pub fn candidates(&self) -> &[Url] {
        &self.candidates
    }

    /// Fetch one source and accept it only if it carries a usable deadline
    pub async fn fetch_candidate(&self, url: &Url) -> Result<TimerPayload> {
        debug!("Fetching deadline from {}", url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| TimerError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(TimerError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|source| TimerError::Transport {
            url: url.to_string(),
            source,
        })?;

        let payload = TimerPayload::from_json(&body).map_err(|e| TimerError::MalformedPayload {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        if !payload.has_usable_deadline() {
            return Err(TimerError::NoDeadline { url: url.to_string() });
        }

        Ok(payload)
    }

    /// First accepted payload from the chain
    pub async fn resolve(&self) -> Result<TimerPayload> {
        for url in &self.candidates {
            match self.fetch_candidate(url).await {
                Ok(payload) => {
                    info!(
                        "Resolved timer '{}' ({}) from {}",
                        payload.event_name,
                        payload.mode.as_str(),
                        url
                    );
                    return Ok(payload);
                }
                Err(e) => warn!("Deadline source rejected: {}", e),
            }
        }

        Err(TimerError::AllSourcesFailed(self.candidates.len()))
    }
}
