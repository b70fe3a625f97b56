//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{state::CountdownSnapshot, wire::SiteScope};

/// Countdown response with widget metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountdownResponse {
    pub countdown: CountdownSnapshot,
    pub api_base: String,
    pub site: SiteScope,
    pub uptime: String,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
