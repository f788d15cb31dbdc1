use actix_web::{HttpRequest, HttpResponse, Result, web};

use crate::state::app_state::AppState;
use crate::structs::link_request::CreateLinkRequest;

/// Create a tracking link and its QR code
pub async fn create_link(
    app_state: web::Data<AppState>,
    req: HttpRequest,
    web::Json(body): web::Json<CreateLinkRequest>,
) -> Result<HttpResponse> {
    let base_url = app_state.base_url(&req);
    let created = app_state.links.create_link(body, &base_url).await?;

    Ok(HttpResponse::Ok().json(created))
}

/// QR code for an existing link as PNG
pub async fn get_qr_code(
    app_state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let code = path.into_inner();
    let base_url = app_state.base_url(&req);
    let png = app_state.links.get_qr_png(&code, &base_url).await?;

    Ok(HttpResponse::Ok().content_type("image/png").body(png))
}
