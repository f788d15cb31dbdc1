use actix_web::{HttpRequest, HttpResponse, Result, web};

use crate::state::app_state::AppState;
use crate::structs::track_request::TrackPayload;

/// Receive telemetry from the landing page
pub async fn track(
    app_state: web::Data<AppState>,
    req: HttpRequest,
    web::Json(payload): web::Json<TrackPayload>,
) -> Result<HttpResponse> {
    let ip = req
        .peer_addr()
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    let response = app_state.tracking.record_event(payload, ip).await?;
    Ok(HttpResponse::Ok().json(response))
}

pub async fn list_events(app_state: web::Data<AppState>) -> Result<HttpResponse> {
    let events = app_state.tracking.list_events().await?;
    Ok(HttpResponse::Ok().json(events))
}

pub async fn delete_event(
    app_state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    app_state.tracking.delete_event(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "success": true })))
}

pub async fn delete_all_events(app_state: web::Data<AppState>) -> Result<HttpResponse> {
    app_state.tracking.delete_all_events().await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "success": true })))
}
