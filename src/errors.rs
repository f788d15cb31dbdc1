use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use thiserror::Error;

/// Failure kinds surfaced by the services and handlers.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("invalid credentials")]
    Authentication,

    #[error("not authorized")]
    Authorization,

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("blocking task failed: {0}")]
    Blocking(#[from] actix_web::error::BlockingError),

    #[error("QR code generation error: {0}")]
    QrEncoding(String),

    #[error("{0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    pub fn validation<T: Into<String>>(msg: T) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        AppError::NotFound(msg.into())
    }

    pub fn internal<T: Into<String>>(msg: T) -> Self {
        AppError::Internal(msg.into())
    }

    fn is_internal(&self) -> bool {
        matches!(
            self,
            AppError::Database(_)
                | AppError::Blocking(_)
                | AppError::QrEncoding(_)
                | AppError::Internal(_)
        )
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Authentication => StatusCode::UNAUTHORIZED,
            AppError::Authorization => StatusCode::FORBIDDEN,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        // Internal details go to the log, never to the caller
        let message = if self.is_internal() {
            log::error!("{}", self);
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        HttpResponse::build(self.status_code()).json(serde_json::json!({ "error": message }))
    }
}
