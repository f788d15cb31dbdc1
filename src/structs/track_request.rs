use serde::{Deserialize, Serialize};
use validator::Validate;

/// Telemetry posted by the landing page. Unknown fields are ignored.
#[derive(Deserialize, Serialize, Validate, Debug, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TrackPayload {
    #[validate(length(max = 2048))]
    pub user_agent: Option<String>,
    #[validate(length(max = 2048))]
    pub screen_resolution: Option<String>,
    #[validate(length(max = 2048))]
    pub language: Option<String>,
    #[validate(length(max = 2048))]
    pub os: Option<String>,
    #[validate(length(max = 2048))]
    pub browser: Option<String>,
    #[validate(length(max = 2048))]
    pub location: Option<String>,
    #[validate(length(max = 2048))]
    pub fingerprint: Option<String>,
    #[validate(length(max = 2048))]
    pub referrer: Option<String>,
    // Kept for older landing pages; never trusted as a redirect target
    #[validate(length(max = 2048))]
    pub original_url: Option<String>,
    #[validate(length(max = 2048))]
    pub short_code: Option<String>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct TrackResponse {
    pub success: bool,
    pub redirect: Option<String>,
}
