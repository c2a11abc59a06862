//! API request and response structures

use axum::{http::StatusCode, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    display::{TextSize, TextSizeVars},
    i18n::LanguageInfo,
    idle::IdleSnapshot,
    video::{BufferAdvice, BufferState, DeviceProfile, MemoryReading, MemoryUsage, PreloadStrategy},
};

/// API response structure for idle state change endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub state: IdleSnapshot,
}

impl ApiResponse {
    /// Create a new API response
    pub fn new(status: String, message: String, state: IdleSnapshot) -> Self {
        Self {
            status,
            message,
            timestamp: Utc::now(),
            state,
        }
    }

    /// Create a successful response
    pub fn ok(message: String, state: IdleSnapshot) -> Self {
        Self::new("ok".to_string(), message, state)
    }
}

/// Error body returned with a non-2xx status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// Error half of every handler result
pub type ApiError = (StatusCode, Json<ErrorResponse>);

impl ErrorResponse {
    pub fn new(message: String) -> Self {
        Self {
            status: "error".to_string(),
            message,
            timestamp: Utc::now(),
        }
    }

    pub fn bad_request(message: String) -> ApiError {
        (StatusCode::BAD_REQUEST, Json(Self::new(message)))
    }

    pub fn internal(message: String) -> ApiError {
        (StatusCode::INTERNAL_SERVER_ERROR, Json(Self::new(message)))
    }
}

/// Status response with idle state and preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub idle: IdleSnapshot,
    pub language: String,
    pub text_size: TextSize,
    pub warning_message: String,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Body of `POST /video`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoRequest {
    pub playing: bool,
}

/// Body of `POST /language`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageRequest {
    pub code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageResponse {
    pub current: LanguageInfo,
    pub available: Vec<LanguageInfo>,
    pub warning_message: String,
}

/// Body of `POST /text-size`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextSizeRequest {
    pub size: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TextSizeResponse {
    pub size: TextSize,
    pub vars: TextSizeVars,
}

/// Query of `GET /qr`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QrQuery {
    #[serde(default)]
    pub url: String,
    pub width: Option<u32>,
}

/// Body of `POST /video/advice`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoAdviceRequest {
    #[serde(flatten)]
    pub device: DeviceProfile,
    pub memory: Option<MemoryReading>,
    pub buffer: Option<BufferState>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoAdviceResponse {
    pub embedded: bool,
    pub preload: PreloadStrategy,
    pub memory: Option<MemoryUsage>,
    pub buffer: Option<BufferAdvice>,
    pub recommendations: Vec<String>,
    /// Delay before each retry of a failed load
    pub retry_delays_ms: Vec<u64>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
