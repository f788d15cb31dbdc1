use std::borrow::Cow;

use url::Url;
use validator::ValidationError;

/// Only these schemes may be stored as a destination; the landing page
/// navigates to it from the tracker's own origin.
const ALLOWED_SCHEMES: &[&str] = &["http", "https"];

/// `validator` hook for destination URLs: parseable, http(s), with a host.
pub fn validate_destination(url: &str) -> Result<(), ValidationError> {
    let parsed = Url::parse(url.trim()).map_err(|_| error("invalid_url", "Invalid URL format"))?;

    if !ALLOWED_SCHEMES.contains(&parsed.scheme()) {
        return Err(error(
            "unsupported_scheme",
            "URL must start with http:// or https://",
        ));
    }

    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(error("invalid_url", "URL must include a host"));
    }

    Ok(())
}

fn error(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}
