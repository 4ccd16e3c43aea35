// Route exports
pub mod communes;

use actix_web::{error, http::StatusCode, web, HttpResponse};
use crate::models::PingResponse;

pub use communes::AppState;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/ping", web::get().to(ping)).service(
        web::scope("/api/v1")
            .configure(communes::configure),
    );
}

/// Liveness probe, no dependency checks
async fn ping() -> HttpResponse {
    HttpResponse::Ok().json(PingResponse {
        message: "pong".to_string(),
    })
}

/// JSON error response for extractor errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST)
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(self)
    }
}

/// Handle query payload errors
pub fn handle_query_payload_error(
    err: error::QueryPayloadError,
    req: &actix_web::HttpRequest,
) -> actix_web::Error {
    tracing::info!("Query payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_query".to_string(),
        message: format!("Invalid query: {}", err),
        status_code: 400,
    }
    .into()
}
