use crate::command;
use crate::db;
use crate::errors::Error;
use crate::metrics::{COMMANDS_TOTAL, PUBLISH_FAILURES_TOTAL, UNMAPPED_COMMANDS_TOTAL};
use crate::model::{CommandAck, ErrorBody, GestureEvent, SensorReading, TelemetryAck};
use crate::mqtt::CommandPublisher;
use crate::validate;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{debug, error, info, warn};

pub const UNMAPPED_MESSAGE: &str = "Comando não mapeado";

#[derive(Clone)]
struct AppState {
    pool: SqlitePool,
    publisher: Arc<dyn CommandPublisher>,
    topic: Arc<str>,
}

pub fn create_router(pool: SqlitePool, publisher: Arc<dyn CommandPublisher>, topic: &str) -> Router {
    let state = AppState {
        pool,
        publisher,
        topic: Arc::from(topic),
    };

    Router::new()
        .route("/api/send-command", post(send_command))
        .route(
            "/api/sensor-data",
            post(submit_sensor_data).get(fetch_sensor_data),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn send_command(
    State(state): State<AppState>,
    payload: Result<Json<GestureEvent>, JsonRejection>,
) -> Result<Json<CommandAck>, ApiError> {
    let Json(event) = payload?;
    debug!("Gesture received from frontend: {:?}", event);

    let Some(command) = command::map_event(&event) else {
        UNMAPPED_COMMANDS_TOTAL.inc();
        return Err(ApiError::Unmapped);
    };
    COMMANDS_TOTAL.inc();

    // Delivery is best-effort; the response does not depend on the broker.
    match state.publisher.publish(&state.topic, &command) {
        Ok(()) => info!("Published {} to {}", command, state.topic),
        Err(e) => {
            PUBLISH_FAILURES_TOTAL.inc();
            warn!("Failed to publish {} to {}: {}", command, state.topic, e);
        }
    }

    Ok(Json(CommandAck::new(command)))
}

async fn submit_sensor_data(
    State(state): State<AppState>,
    payload: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<Json<TelemetryAck>, ApiError> {
    let Json(body) = payload?;
    debug!("Telemetry received from device: {}", body);

    let sensors = validate::sensor_payload(&body)?;
    let stored = db::record_readings(&state.pool, &sensors).await?;
    info!("Stored {} new readings", stored);

    Ok(Json(TelemetryAck::new(body)))
}

async fn fetch_sensor_data(
    State(state): State<AppState>,
) -> Result<Json<Vec<SensorReading>>, ApiError> {
    let readings = db::recent_readings(&state.pool, db::RECENT_LIMIT).await?;
    debug!("Serving {} readings to frontend", readings.len());
    Ok(Json(readings))
}

#[derive(Debug)]
pub enum ApiError {
    Unmapped,
    BadRequest(String),
    Internal(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Unmapped => (StatusCode::BAD_REQUEST, UNMAPPED_MESSAGE.to_string()),
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::Internal(e) => {
                error!("API error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
        };

        (status, Json(ErrorBody::new(message))).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::Validation(message) => ApiError::BadRequest(message),
            Error::Json(e) => ApiError::BadRequest(format!("JSON inválido: {}", e)),
            err => ApiError::Internal(err.into()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(format!("JSON inválido: {}", rejection.body_text()))
    }
}
