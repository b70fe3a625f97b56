//! Configuration and CLI argument handling

use std::time::Duration;

use chrono::{DateTime, FixedOffset, Offset, Utc};
use clap::Parser;
use reqwest::Url;

use crate::{
    error::{Result, TimerError},
    state::{Decorations, TimerState},
    wire::{parse_instant, SiteScope},
};

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "expo-countdown")]
#[command(about = "Clock-corrected event countdown with live updates")]
#[command(version = "2.0.0")]
pub struct Config {
    /// Base address of the event API, e.g. https://expo.example.com/api
    #[arg(long)]
    pub api_base: String,

    /// Site slug this countdown belongs to
    #[arg(long)]
    pub site: Option<String>,

    /// Site id this countdown belongs to
    #[arg(long)]
    pub site_id: Option<i64>,

    /// Background image URL passed through to the host page
    #[arg(long)]
    pub bg_url: Option<String>,

    /// Logo URL passed through to the host page
    #[arg(long)]
    pub logo_url: Option<String>,

    /// Fixed deadline (ISO 8601); skips HTTP resolution
    #[arg(long)]
    pub deadline: Option<String>,

    /// Seconds to wait before retrying when every deadline source fails
    #[arg(long, default_value = "10")]
    pub retry_secs: u64,

    /// Re-resolve the deadline every N seconds after a success
    #[arg(long)]
    pub refresh_secs: Option<u64>,

    /// Tick interval in milliseconds
    #[arg(long, default_value = "1000")]
    pub tick_ms: u64,

    /// Do not open the live update WebSocket
    #[arg(long)]
    pub no_live: bool,

    /// Serve the countdown over HTTP on this address, e.g. 127.0.0.1:20554
    #[arg(long)]
    pub serve: Option<String>,

    /// UTC offset used for the month/day labels of /api/timer
    #[arg(long, default_value = "+05:00", allow_hyphen_values = true)]
    pub display_offset: String,

    /// Do not print the countdown to stdout
    #[arg(short, long)]
    pub quiet: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}

/// Validated settings for one countdown widget
#[derive(Debug, Clone)]
pub struct WidgetConfig {
    pub api_base: Url,
    pub scope: SiteScope,
    pub decorations: Decorations,
    pub static_deadline: Option<DateTime<Utc>>,
    pub retry_delay: Duration,
    pub refresh_interval: Option<Duration>,
    pub tick: Duration,
    pub live_updates: bool,
    pub display_offset: FixedOffset,
}

impl WidgetConfig {
    /// Defaults for everything but the API base
    pub fn new(api_base: &str) -> Result<Self> {
        Ok(Self {
            api_base: parse_api_base(api_base)?,
            scope: SiteScope::unscoped(),
            decorations: Decorations::default(),
            static_deadline: None,
            retry_delay: Duration::from_secs(10),
            refresh_interval: None,
            tick: Duration::from_millis(1000),
            live_updates: true,
            display_offset: parse_display_offset("+05:00")?,
        })
    }

    pub fn with_scope(mut self, scope: SiteScope) -> Self {
        self.scope = scope;
        self
    }

    /// Deadline sources in priority order: site-scoped, generic, legacy backend
    pub fn candidate_urls(&self) -> Vec<Url> {
        let mut candidates = Vec::with_capacity(3);
        let active = self.api_path("/timer/active");

        if !self.scope.is_unscoped() {
            let mut scoped = active.clone();
            {
                let mut query = scoped.query_pairs_mut();
                if let Some(id) = self.scope.id {
                    query.append_pair("site_id", &id.to_string());
                }
                if let Some(slug) = &self.scope.slug {
                    query.append_pair("site", slug);
                }
            }
            candidates.push(scoped);
        }

        candidates.push(active);

        let mut legacy = self.api_base.clone();
        legacy.set_path("/api/timer");
        candidates.push(legacy);

        candidates
    }

    /// Live update endpoint on the same host as the API
    pub fn live_url(&self) -> Url {
        let mut url = self.api_base.clone();
        let scheme = if url.scheme() == "https" { "wss" } else { "ws" };
        // http(s) -> ws(s) is always permitted; both are special schemes.
        let _ = url.set_scheme(scheme);
        url.set_path("/ws/timer");
        url.set_query(None);
        url
    }

    /// State the tick task starts from
    pub fn initial_state(&self) -> TimerState {
        match self.static_deadline {
            Some(deadline) => TimerState::with_deadline(deadline),
            None => TimerState::new(),
        }
    }

    fn api_path(&self, suffix: &str) -> Url {
        let mut url = self.api_base.clone();
        let path = format!("{}{}", url.path().trim_end_matches('/'), suffix);
        url.set_path(&path);
        url
    }
}

impl TryFrom<&Config> for WidgetConfig {
    type Error = TimerError;

    fn try_from(config: &Config) -> Result<Self> {
        if config.tick_ms == 0 {
            return Err(TimerError::Config("tick interval must be positive".to_string()));
        }

        let static_deadline = match config.deadline.as_deref() {
            Some(raw) => Some(parse_instant(raw).ok_or_else(|| {
                TimerError::Config(format!("deadline '{}' is not an ISO 8601 timestamp", raw))
            })?),
            None => None,
        };

        Ok(Self {
            api_base: parse_api_base(&config.api_base)?,
            scope: SiteScope::new(config.site.clone(), config.site_id),
            decorations: Decorations {
                bg_url: config.bg_url.clone(),
                logo_url: config.logo_url.clone(),
            },
            static_deadline,
            retry_delay: Duration::from_secs(config.retry_secs),
            refresh_interval: config.refresh_secs.map(Duration::from_secs),
            tick: Duration::from_millis(config.tick_ms),
            live_updates: !config.no_live,
            display_offset: parse_display_offset(&config.display_offset)?,
        })
    }
}

fn parse_api_base(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw.trim())
        .map_err(|e| TimerError::Config(format!("api base '{}' is not a URL: {}", raw, e)))?;

    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(TimerError::Config(format!(
            "api base '{}' must be an absolute http(s) URL",
            raw
        )));
    }

    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

/// Parse `+HH:MM`, `-HH:MM` or `Z`
pub fn parse_display_offset(raw: &str) -> Result<FixedOffset> {
    let raw = raw.trim();

    if raw.eq_ignore_ascii_case("z") {
        return Ok(Utc.fix());
    }

    raw.parse::<FixedOffset>()
        .map_err(|e| TimerError::Config(format!("display offset '{}' is not +HH:MM: {}", raw, e)))
}
