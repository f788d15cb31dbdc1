use actix_web::{HttpMessage, HttpRequest, HttpResponse, Result, web};

use crate::pages;
use crate::state::app_state::AppState;
use crate::structs::auth::LoginPageParams;
use crate::utils::session::SessionClaims;

fn html(body: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(body)
}

pub async fn index() -> HttpResponse {
    html(pages::index())
}

pub async fn login_page(query: web::Query<LoginPageParams>) -> HttpResponse {
    html(pages::login(query.error.is_some()))
}

/// Landing page for a tracking link
pub async fn landing(
    app_state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let code = path.into_inner();
    let link = app_state.links.resolve(&code).await?;

    Ok(html(pages::landing(&link.short_code, &link.original_url)))
}

pub async fn dashboard(app_state: web::Data<AppState>, req: HttpRequest) -> Result<HttpResponse> {
    // SessionGuard has already put the claims here
    let username = req
        .extensions()
        .get::<SessionClaims>()
        .map(|claims| claims.sub.clone())
        .unwrap_or_default();

    let events = app_state.tracking.list_events().await?;

    Ok(html(pages::dashboard(&username, &events)))
}
