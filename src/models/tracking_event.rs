use serde::{Deserialize, Serialize};

use crate::structs::track_request::TrackPayload;

/// One visit reported by the landing page script.
///
/// Every client-supplied field is stored verbatim; only `ip` and `timestamp`
/// come from the server.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TrackingEvent {
    pub id: String,
    pub short_code: Option<String>, // Set only when the reported code resolved to a link
    pub ip: String,
    pub user_agent: Option<String>,
    pub screen_resolution: Option<String>,
    pub language: Option<String>,
    pub os: Option<String>,
    pub browser: Option<String>,
    pub location: Option<String>,
    pub fingerprint: Option<String>,
    pub referrer: Option<String>,
    pub timestamp: i64, // Milliseconds since the epoch
}

impl TrackingEvent {
    pub fn new(payload: TrackPayload, ip: String, short_code: Option<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            short_code,
            ip,
            user_agent: payload.user_agent,
            screen_resolution: payload.screen_resolution,
            language: payload.language,
            os: payload.os,
            browser: payload.browser,
            location: payload.location,
            fingerprint: payload.fingerprint,
            referrer: payload.referrer,
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }
}
