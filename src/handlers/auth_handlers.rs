use actix_web::cookie::{Cookie, SameSite, time::Duration};
use actix_web::{HttpResponse, Result, http::header, web};

use crate::errors::AppError;
use crate::state::app_state::AppState;
use crate::structs::auth::LoginForm;
use crate::utils::session::SESSION_COOKIE;

fn redirect(location: &str) -> actix_web::HttpResponseBuilder {
    let mut builder = HttpResponse::Found();
    builder.append_header((header::LOCATION, location));
    builder
}

pub async fn login(
    app_state: web::Data<AppState>,
    web::Form(form): web::Form<LoginForm>,
) -> Result<HttpResponse> {
    match app_state.auth.login(form.username, form.password).await {
        Ok(token) => {
            let max_age = app_state.auth.signer().ttl().num_seconds();
            let cookie = Cookie::build(SESSION_COOKIE, token)
                .path("/")
                .http_only(true)
                .same_site(SameSite::Lax)
                .secure(app_state.secure_cookies)
                .max_age(Duration::seconds(max_age))
                .finish();

            Ok(redirect("/dashboard").cookie(cookie).finish())
        }
        Err(AppError::Authentication) => Ok(redirect("/login?error=1").finish()),
        Err(e) => Err(e.into()),
    }
}

pub async fn logout() -> HttpResponse {
    let mut cookie = Cookie::build(SESSION_COOKIE, "").path("/").finish();
    cookie.make_removal();

    redirect("/").cookie(cookie).finish()
}
