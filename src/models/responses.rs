use serde::{Deserialize, Serialize};
use crate::models::domain::CommuneSummary;

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

/// Catalogue size response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountResponse {
    pub count: i64,
}

/// Debug sample response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleResponse {
    pub items: Vec<CommuneSummary>,
}

/// Liveness response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PingResponse {
    pub message: String,
}
