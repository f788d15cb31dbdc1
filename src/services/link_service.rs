//! Link creation, resolution and QR rendering.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use validator::Validate;

use crate::db::Store;
use crate::errors::{AppError, Result};
use crate::models::link::Link;
use crate::structs::link_request::{CreateLinkRequest, CreateLinkResponse};
use crate::utils::qr::render_png;
use crate::utils::short_code::generate_short_code;

/// Fresh codes tried before giving up on a crowded namespace.
const MAX_CODE_ATTEMPTS: usize = 5;

#[derive(Clone)]
pub struct LinkService {
    store: Store,
}

pub fn tracking_url(base_url: &str, short_code: &str) -> String {
    format!("{}/t/{}", base_url.trim_end_matches('/'), short_code)
}

impl LinkService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn create_link(
        &self,
        req: CreateLinkRequest,
        base_url: &str,
    ) -> Result<CreateLinkResponse> {
        req.validate()?;

        let link = self.insert_with_fresh_code(req.url).await?;
        let tracking_url = tracking_url(base_url, &link.short_code);
        let png = render_png(&tracking_url)?;

        log::info!("Created link {} -> {}", link.short_code, link.original_url);

        Ok(CreateLinkResponse {
            original_url: link.original_url,
            tracking_url,
            short_code: link.short_code,
            qr_code: BASE64.encode(png),
        })
    }

    async fn insert_with_fresh_code(&self, original_url: String) -> Result<Link> {
        for _ in 0..MAX_CODE_ATTEMPTS {
            let link = Link::new(original_url.clone(), generate_short_code());
            let store = self.store.clone();
            let candidate = link.clone();

            let inserted = actix_web::web::block(move || store.insert_link(&candidate)).await??;
            if inserted {
                return Ok(link);
            }
            log::warn!("Short code {} already taken, regenerating", link.short_code);
        }

        Err(AppError::internal("Could not allocate a unique short code"))
    }

    pub async fn resolve(&self, short_code: &str) -> Result<Link> {
        let store = self.store.clone();
        let code = short_code.to_string();

        actix_web::web::block(move || store.find_link_by_code(&code))
            .await??
            .ok_or_else(|| AppError::not_found("Short URL not found"))
    }

    /// Renders the QR image for a stored code on every call.
    pub async fn get_qr_png(&self, short_code: &str, base_url: &str) -> Result<Vec<u8>> {
        let link = self.resolve(short_code).await?;
        render_png(&tracking_url(base_url, &link.short_code))
    }
}
