use actix_web::{HttpRequest, error, web};

use crate::errors::AppError;
use crate::handlers::auth_handlers::{login, logout};
use crate::handlers::health_handlers::health_check;
use crate::handlers::link_handlers::{create_link, get_qr_code};
use crate::handlers::page_handlers::{dashboard, index, landing, login_page};
use crate::handlers::tracking_handlers::{delete_all_events, delete_event, list_events, track};
use crate::middlewares::session_guard::{Denial, SessionGuard};

fn body_rejected(err: impl std::fmt::Display, req: &HttpRequest) -> error::Error {
    log::debug!("Rejected body for {}: {}", req.path(), err);
    AppError::validation(err.to_string()).into()
}

/// Configure the routes
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    // Malformed bodies get the same JSON error shape as failed validation
    cfg.app_data(web::JsonConfig::default().error_handler(|err, req| body_rejected(err, req)));
    cfg.app_data(web::FormConfig::default().error_handler(|err, req| body_rejected(err, req)));

    // Public pages
    cfg.route("/", web::get().to(index));
    cfg.service(
        web::resource("/login")
            .route(web::get().to(login_page))
            .route(web::post().to(login)),
    );
    cfg.route("/logout", web::get().to(logout));
    cfg.route("/t/{code}", web::get().to(landing));

    // Link creation and QR codes - no auth required
    cfg.route("/create_link", web::post().to(create_link));
    cfg.route("/qrcode/{code}", web::get().to(get_qr_code));

    // Dashboard - anonymous visitors are sent to the login page
    cfg.service(
        web::resource("/dashboard")
            .wrap(SessionGuard(Denial::RedirectToLogin))
            .route(web::get().to(dashboard)),
    );

    // Ingest and health are open, the tracking API requires a session
    cfg.route("/api/track", web::post().to(track));
    cfg.route("/api/health", web::get().to(health_check));
    cfg.service(
        web::scope("/api/tracking")
            .wrap(SessionGuard(Denial::Forbidden))
            .route("", web::get().to(list_events))
            .route("", web::delete().to(delete_all_events))
            .route("/{id}", web::delete().to(delete_event)),
    );
}
