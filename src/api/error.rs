use crate::config::Environment;
use crate::error::ServiceError;
use actix_web::error::{InternalError, JsonPayloadError, QueryPayloadError};
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, ResponseError};
use serde_json::json;
use std::fmt;
use tracing::{error, info, warn};

pub const INTERNAL_ERROR: &str = "Error interno del servidor";

/// Boundary error: a status, a client-facing message and, outside
/// production, the underlying detail.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    details: Option<String>,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
            details: None,
        }
    }

    /// Maps a service outcome to HTTP and logs it at a severity matching its kind.
    pub fn from_service(err: ServiceError, environment: Environment) -> Self {
        match err {
            ServiceError::Validation(message) => {
                info!(%message, "Rejected invalid request");
                Self::bad_request(message)
            }
            ServiceError::Duplicate => {
                warn!("Rejected duplicate registration");
                Self::bad_request(ServiceError::Duplicate.to_string())
            }
            other => {
                error!(error = %other, "Request failed");
                Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: INTERNAL_ERROR.to_string(),
                    details: (!environment.is_production()).then(|| other.to_string()),
                }
            }
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        self.status
    }

    fn error_response(&self) -> HttpResponse {
        let body = match &self.details {
            Some(details) => json!({ "error": self.message, "details": details }),
            None => json!({ "error": self.message }),
        };
        HttpResponse::build(self.status).json(body)
    }
}

/// Malformed JSON bodies are client errors with the same `{error}` shape.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let message = format!("Cuerpo JSON inválido: {err}");
    info!(%message, "Rejected malformed body");
    let response = HttpResponse::BadRequest().json(json!({ "error": message }));
    InternalError::from_response(err, response).into()
}

/// Unparseable query strings get the same treatment as bad bodies.
pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let message = format!("Parámetros de consulta inválidos: {err}");
    info!(%message, "Rejected malformed query");
    let response = HttpResponse::BadRequest().json(json!({ "error": message }));
    InternalError::from_response(err, response).into()
}
