use std::future::{Ready, ready};

use actix_web::{
    Error, HttpMessage, HttpResponse, ResponseError,
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    http::header,
    web,
};
use futures_util::future::LocalBoxFuture;

use crate::errors::AppError;
use crate::state::app_state::AppState;
use crate::utils::session::{SESSION_COOKIE, SessionClaims};

/// What an unauthenticated request gets back.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Denial {
    /// 302 to the login page (HTML routes)
    RedirectToLogin,
    /// 403 with a JSON error (API routes)
    Forbidden,
}

impl Denial {
    fn response(self) -> HttpResponse {
        match self {
            Denial::RedirectToLogin => HttpResponse::Found()
                .append_header((header::LOCATION, "/login"))
                .finish(),
            Denial::Forbidden => AppError::Authorization.error_response(),
        }
    }
}

/// Requires a valid session cookie and stores its claims in the request extensions.
pub struct SessionGuard(pub Denial);

impl<S, B> Transform<S, ServiceRequest> for SessionGuard
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = SessionGuardMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SessionGuardMiddleware {
            service,
            denial: self.0,
        }))
    }
}

pub struct SessionGuardMiddleware<S> {
    service: S,
    denial: Denial,
}

impl<S, B> Service<ServiceRequest> for SessionGuardMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let claims = session_claims(&req);

        match claims {
            Some(claims) => {
                req.extensions_mut().insert(claims);
                let fut = self.service.call(req);
                Box::pin(async move { Ok(fut.await?.map_into_left_body()) })
            }
            None => {
                log::debug!("Rejected unauthenticated request to {}", req.path());
                let response = self.denial.response();
                Box::pin(async move { Ok(req.into_response(response).map_into_right_body()) })
            }
        }
    }
}

fn session_claims(req: &ServiceRequest) -> Option<SessionClaims> {
    let state = req.app_data::<web::Data<AppState>>()?;
    let cookie = req.cookie(SESSION_COOKIE)?;
    state.auth.session(cookie.value())
}
