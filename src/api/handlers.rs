//! HTTP endpoint handlers

use std::{convert::Infallible, sync::Arc};
use axum::{
    extract::{Query, State},
    http::header,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Json,
    },
};
use futures::stream::{self, Stream};
use tracing::{debug, error, info, warn};

use crate::{
    display::TextSize,
    i18n::{available_languages, Language},
    idle::IdleSnapshot,
    qr::{self, QrOptions},
    state::AppState,
};
use super::responses::{
    ApiError, ApiResponse, ErrorResponse, HealthResponse, LanguageRequest, LanguageResponse,
    QrQuery, StatusResponse, TextSizeRequest, TextSizeResponse, VideoAdviceRequest,
    VideoAdviceResponse, VideoRequest,
};

/// Turn the result of an idle operation into a response
fn idle_response(
    result: Result<IdleSnapshot, String>,
    message: &str,
) -> Result<Json<ApiResponse>, ApiError> {
    match result {
        Ok(snapshot) => {
            debug!("{} - phase {:?}", message, snapshot.phase);
            Ok(Json(ApiResponse::ok(message.to_string(), snapshot)))
        }
        Err(e) => {
            error!("{} failed: {}", message, e);
            Err(ErrorResponse::internal(e))
        }
    }
}

/// Handle POST /interaction - Restart the inactivity window
pub async fn interaction_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, ApiError> {
    idle_response(state.notify_interaction(), "Interaction recorded")
}

/// Handle POST /video - Report video playback state
pub async fn video_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<VideoRequest>,
) -> Result<Json<ApiResponse>, ApiError> {
    let message = if request.playing { "Video playing" } else { "Video stopped" };
    idle_response(state.set_video_playing(request.playing), message)
}

/// Handle POST /idle/dismiss - Leave the idle screen
pub async fn dismiss_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, ApiError> {
    info!("Idle screen dismissed by visitor");
    idle_response(state.dismiss_idle_screen(), "Idle screen dismissed")
}

/// Handle POST /idle/force - Return to the idle screen now
pub async fn force_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, ApiError> {
    idle_response(state.force_idle_screen(), "Idle screen shown")
}

/// Handle POST /warning/cancel - "Stay" action of the warning overlay
pub async fn cancel_warning_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, ApiError> {
    idle_response(state.cancel_warning_return(), "Return to idle screen cancelled")
}

/// Handle GET /status - Return current idle state and preferences
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, ApiError> {
    let idle = state.get_idle_snapshot().map_err(|e| {
        error!("Failed to get idle snapshot: {}", e);
        ErrorResponse::internal(e)
    })?;

    let preferences = state.get_preferences().map_err(|e| {
        error!("Failed to get preferences: {}", e);
        ErrorResponse::internal(e)
    })?;

    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        idle,
        language: preferences.language.code().to_string(),
        text_size: preferences.text_size,
        warning_message: preferences.language.warning_message().to_string(),
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /events - Stream idle snapshots as server-sent events
pub async fn events_handler(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.subscribe();

    // The first event carries the current state, later ones follow changes
    let events = stream::unfold((rx, true), |(mut rx, first)| async move {
        if !first && rx.changed().await.is_err() {
            return None;
        }

        let snapshot = rx.borrow_and_update().clone();
        let event = match Event::default().event("idle").json_data(&snapshot) {
            Ok(event) => event,
            Err(e) => {
                warn!("Failed to encode idle event: {}", e);
                Event::default().event("error").data(e.to_string())
            }
        };

        Some((Ok(event), (rx, false)))
    });

    Sse::new(events).keep_alive(KeepAlive::default())
}

fn language_response(language: Language) -> LanguageResponse {
    LanguageResponse {
        current: language.info(),
        available: available_languages(),
        warning_message: language.warning_message().to_string(),
    }
}

/// Handle GET /language - Current and available languages
pub async fn get_language_handler(State(state): State<Arc<AppState>>) -> Result<Json<LanguageResponse>, ApiError> {
    match state.get_preferences() {
        Ok(preferences) => Ok(Json(language_response(preferences.language))),
        Err(e) => {
            error!("Failed to get preferences: {}", e);
            Err(ErrorResponse::internal(e))
        }
    }
}

/// Handle POST /language - Switch the kiosk language
pub async fn set_language_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LanguageRequest>,
) -> Result<Json<LanguageResponse>, ApiError> {
    let language: Language = request.code.parse().map_err(|e: String| {
        warn!("Rejected language switch: {}", e);
        ErrorResponse::bad_request(e)
    })?;

    match state.set_language(language) {
        Ok(preferences) => Ok(Json(language_response(preferences.language))),
        Err(e) => {
            error!("Failed to set language: {}", e);
            Err(ErrorResponse::internal(e))
        }
    }
}

/// Handle GET /text-size - Current text size and its CSS values
pub async fn get_text_size_handler(State(state): State<Arc<AppState>>) -> Result<Json<TextSizeResponse>, ApiError> {
    match state.get_preferences() {
        Ok(preferences) => Ok(Json(TextSizeResponse {
            size: preferences.text_size,
            vars: preferences.text_size.css_vars(),
        })),
        Err(e) => {
            error!("Failed to get preferences: {}", e);
            Err(ErrorResponse::internal(e))
        }
    }
}

/// Handle POST /text-size - Change the text size
pub async fn set_text_size_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<TextSizeRequest>,
) -> Result<Json<TextSizeResponse>, ApiError> {
    let size: TextSize = request.size.parse().map_err(|e: String| {
        warn!("Rejected text size change: {}", e);
        ErrorResponse::bad_request(e)
    })?;

    match state.set_text_size(size) {
        Ok(preferences) => Ok(Json(TextSizeResponse {
            size: preferences.text_size,
            vars: preferences.text_size.css_vars(),
        })),
        Err(e) => {
            error!("Failed to set text size: {}", e);
            Err(ErrorResponse::internal(e))
        }
    }
}

/// Handle GET /qr - SVG QR code for an external link
pub async fn qr_handler(Query(query): Query<QrQuery>) -> Result<impl IntoResponse, ApiError> {
    let mut options = QrOptions::default();
    if let Some(width) = query.width {
        options.width = width;
    }

    match qr::generate_svg_from_url(&query.url, &options) {
        Ok(Some(svg)) => Ok(([(header::CONTENT_TYPE, "image/svg+xml")], svg)),
        Ok(None) => Err(ErrorResponse::bad_request("URL cannot be empty".to_string())),
        Err(e) => {
            warn!("Rejected QR request: {}", e);
            Err(ErrorResponse::bad_request(e))
        }
    }
}

/// Handle POST /video/advice - Playback policy for a player device
pub async fn video_advice_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<VideoAdviceRequest>,
) -> Json<VideoAdviceResponse> {
    let policy = state.video_policy();
    let device = &request.device;

    let memory = if policy.config().enable_memory_monitoring {
        request.memory.and_then(|reading| policy.memory_usage(reading))
    } else {
        None
    };
    let memory_ratio = memory.map(|usage| usage.percentage).unwrap_or(0.0);

    let response = VideoAdviceResponse {
        embedded: device.is_embedded(),
        preload: policy.optimal_preload(device),
        memory,
        buffer: request.buffer.map(|buffer| policy.buffer_advice(device, buffer)),
        recommendations: policy
            .recommendations(device, memory_ratio)
            .into_iter()
            .map(str::to_string)
            .collect(),
        retry_delays_ms: policy
            .retry_delays()
            .into_iter()
            .map(|delay| delay.as_millis() as u64)
            .collect(),
    };

    debug!("Video advice for {:?}: {:?}", device.user_agent, response.preload);
    Json(response)
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
