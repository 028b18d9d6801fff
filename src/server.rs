//! HTTP API
//!
//! `POST /event-forecast` takes an `EventForecastRequest` body and answers
//! with an `EventForecastResponse`. Errors are returned as
//! `{"error": "<message>"}`:
//!
//! | Failure                                   | Status |
//! |-------------------------------------------|--------|
//! | malformed body, invalid time or location | 400    |
//! | no forecast hours inside the event        | 404    |
//! | provider failure                          | 500    |
//!
//! Assessments call the blocking forecast client, so each one runs on the
//! blocking thread pool.

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::ingest::ForecastSource;
use crate::logging::{self, Component};
use crate::request::EventForecastRequest;
use crate::service::{EventForecastResponse, EventForecastService, ServiceError};

/// Errors surfaced by the HTTP layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid request body: {0}")]
    BadBody(String),
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadBody(_) => StatusCode::BAD_REQUEST,
            ApiError::Service(ServiceError::InvalidRequest(_)) => StatusCode::BAD_REQUEST,
            ApiError::Service(ServiceError::NoData) => StatusCode::NOT_FOUND,
            ApiError::Service(ServiceError::Forecast(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            logging::error(Component::Service, None, &self.to_string());
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Builds the API router around a shared service.
pub fn router<S>(service: Arc<EventForecastService<S>>) -> Router
where
    S: ForecastSource + Send + Sync + 'static,
{
    Router::new()
        .route("/event-forecast", post(event_forecast::<S>))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

/// Binds `addr` and serves the API until the process is stopped.
pub async fn serve<S>(addr: SocketAddr, service: Arc<EventForecastService<S>>) -> std::io::Result<()>
where
    S: ForecastSource + Send + Sync + 'static,
{
    let listener = tokio::net::TcpListener::bind(addr).await?;
    logging::info(Component::System, None, &format!("Listening on {}", addr));
    axum::serve(listener, router(service)).await
}

async fn event_forecast<S>(
    State(service): State<Arc<EventForecastService<S>>>,
    body: Result<Json<EventForecastRequest>, JsonRejection>,
) -> Result<Json<EventForecastResponse>, ApiError>
where
    S: ForecastSource + Send + Sync + 'static,
{
    let Json(request) = body.map_err(|rejection| ApiError::BadBody(rejection.body_text()))?;

    let response = tokio::task::spawn_blocking(move || service.assess(&request))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))??;

    Ok(Json(response))
}

async fn health_check() -> &'static str {
    "OK"
}
