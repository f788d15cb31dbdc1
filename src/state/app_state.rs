use actix_web::HttpRequest;

use crate::config::AppConfig;
use crate::db::Store;
use crate::services::auth_service::AuthGate;
use crate::services::link_service::LinkService;
use crate::services::tracking_service::TrackingService;

pub struct AppState {
    pub store: Store,
    pub links: LinkService,
    pub tracking: TrackingService,
    pub auth: AuthGate,
    pub base_url: Option<String>,
    pub secure_cookies: bool,
}

impl AppState {
    pub fn new(store: Store, config: &AppConfig) -> Self {
        Self {
            links: LinkService::new(store.clone()),
            tracking: TrackingService::new(store.clone()),
            auth: AuthGate::from_config(config),
            base_url: config.base_url.clone(),
            secure_cookies: config.secure_cookies,
            store,
        }
    }

    /// Public origin for tracking URLs: the configured one, else the request's own.
    pub fn base_url(&self, req: &HttpRequest) -> String {
        match &self.base_url {
            Some(url) => url.clone(),
            None => {
                let info = req.connection_info();
                format!("{}://{}", info.scheme(), info.host())
            }
        }
    }
}
