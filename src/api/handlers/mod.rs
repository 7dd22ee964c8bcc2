use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use log::error;
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use serde::Deserialize;

use crate::api::models::ErrorResponse;
use crate::config::settings::AppConfig;
use crate::engine::EngineError;
use crate::errors::ServiceError;

pub mod matches;
pub mod players;
pub mod standings;
pub mod tournaments;

#[derive(Clone)]
pub struct AppState {
    pub pool: Pool<SqliteConnectionManager>,
    pub config: AppConfig,
}

#[derive(Deserialize)]
pub struct PlayerParams {
    pub search: Option<String>,
    pub skill: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandingsParams {
    pub skill: Option<String>,
    pub sort_by: Option<String>,
    pub top: Option<usize>,
}

/// Any failure surfaced by a handler
pub struct ApiError(anyhow::Error);

impl<E: Into<anyhow::Error>> From<E> for ApiError {
    fn from(error: E) -> Self {
        Self(error.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = classify(&self.0);
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!("Request failed: {:?}", self.0);
        }

        let body = ErrorResponse {
            error: code.to_string(),
            message: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

fn classify(error: &anyhow::Error) -> (StatusCode, &'static str) {
    if let Some(engine_error) = error.downcast_ref::<EngineError>() {
        return (StatusCode::UNPROCESSABLE_ENTITY, engine_error.code());
    }
    match error.downcast_ref::<ServiceError>() {
        Some(ServiceError::NotFound { .. }) => (StatusCode::NOT_FOUND, "not_found"),
        Some(ServiceError::Conflict(_)) => (StatusCode::CONFLICT, "conflict"),
        Some(ServiceError::Invalid(_)) => (StatusCode::BAD_REQUEST, "invalid_input"),
        None => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
    }
}

/// Parse an optional query value, reporting bad input as 400
fn parse_param<T>(name: &str, value: Option<&str>) -> Result<Option<T>, ApiError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|e| ServiceError::Invalid(format!("{}: {}", name, e)).into()),
        None => Ok(None),
    }
}
