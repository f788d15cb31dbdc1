use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::utils::url_check::validate_destination;

#[derive(Deserialize, Serialize, Validate)]
pub struct CreateLinkRequest {
    #[validate(
        length(min = 1, message = "URL is required"),
        custom(function = "validate_destination")
    )]
    pub url: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct CreateLinkResponse {
    pub original_url: String,
    pub tracking_url: String,
    pub short_code: String,
    pub qr_code: String, // Base64 PNG
}
