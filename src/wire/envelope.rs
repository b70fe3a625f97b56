//! Live update envelopes pushed over `/ws/timer`

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::TimerPayload;

/// Site a widget belongs to, or the site a pushed timer was published for
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SiteScope {
    pub slug: Option<String>,
    pub id: Option<i64>,
}

impl SiteScope {
    pub fn new(slug: Option<String>, id: Option<i64>) -> Self {
        Self {
            slug: slug.filter(|s| !s.trim().is_empty()),
            id,
        }
    }

    pub fn unscoped() -> Self {
        Self::default()
    }

    pub fn is_unscoped(&self) -> bool {
        self.slug.is_none() && self.id.is_none()
    }

    /// Whether a widget with this scope should apply a payload published
    /// for `published`. Scoped widgets match by id or slug; unscoped widgets
    /// only take unscoped payloads.
    pub fn accepts(&self, published: &SiteScope) -> bool {
        if self.is_unscoped() {
            return published.is_unscoped();
        }

        let id_matches = matches!((self.id, published.id), (Some(a), Some(b)) if a == b);
        let slug_matches = matches!(
            (&self.slug, &published.slug),
            (Some(a), Some(b)) if a == b
        );

        id_matches || slug_matches
    }
}

/// Event tags that carry a new deadline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiveEvent {
    Created,
    Updated,
}

impl LiveEvent {
    fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "TIMER_CREATED" => Some(LiveEvent::Created),
            "TIMER_UPDATE" | "TIMER_UPDATED" => Some(LiveEvent::Updated),
            _ => None,
        }
    }
}

/// A decoded live update
#[derive(Debug, Clone, PartialEq)]
pub struct LiveMessage {
    pub event: LiveEvent,
    pub scope: SiteScope,
    pub payload: TimerPayload,
}

#[derive(Debug, Deserialize)]
struct RawEnvelope {
    event: Option<String>,
    data: Option<Value>,
}

/// Decode a text frame. Returns `None` for malformed JSON, unknown event
/// tags, and envelopes without a `data` object.
pub fn parse_live_message(text: &str) -> Option<LiveMessage> {
    let envelope: RawEnvelope = serde_json::from_str(text).ok()?;
    let event = LiveEvent::from_tag(envelope.event.as_deref()?)?;
    let data = envelope.data.filter(Value::is_object)?;

    let scope = SiteScope::new(site_slug(&data), site_id(&data));
    let payload = TimerPayload::from_value(data).ok()?;

    Some(LiveMessage {
        event,
        scope,
        payload,
    })
}

fn site_slug(data: &Value) -> Option<String> {
    match data.get("site")? {
        Value::String(slug) => Some(slug.clone()),
        Value::Object(site) => site.get("slug")?.as_str().map(str::to_string),
        _ => None,
    }
}

fn site_id(data: &Value) -> Option<i64> {
    match data.get("site_id")? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
