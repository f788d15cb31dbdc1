use actix_web::{HttpResponse, web};

use crate::errors::AppError;
use crate::state::app_state::AppState;

pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    // Open a connection and run a trivial query against the store
    let store = state.store.clone();
    let ping_result = web::block(move || store.ping())
        .await
        .map_err(AppError::from)
        .and_then(|result| result);

    match ping_result {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({ "success": true })),
        Err(e) => {
            log::error!("Health check failed: {}", e);
            HttpResponse::InternalServerError()
                .json(serde_json::json!({ "success": false, "error": "Database connection failed" }))
        }
    }
}
