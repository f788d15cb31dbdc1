use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Link {
    pub id: String,
    pub original_url: String,
    pub short_code: String, // Always equal to `id`
    pub created_at: i64,    // Milliseconds since the epoch
}

impl Link {
    pub fn new(original_url: String, short_code: String) -> Self {
        Self {
            id: short_code.clone(),
            original_url,
            short_code,
            created_at: chrono::Utc::now().timestamp_millis(),
        }
    }
}
