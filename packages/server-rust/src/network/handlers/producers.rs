//! Producer CRUD handlers.
//!
//! Each handler makes exactly one store call. Write handlers validate the
//! raw JSON body first and return 400 without touching the store when any
//! field fails. Missing ids on GET/PUT/DELETE are not errors: the response
//! is 200 with a `null` body.
//!
//! A write without a JSON `Content-Type` is read as an empty object, so it
//! fails field validation like any other incomplete body. Unparseable JSON
//! and non-integer ids answer 400 with an `{ "error": .. }` body.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::Json;
use agro_core::{validate_area_invariant, validate_producer, NewProducer, Producer, ValidationErrors};
use serde_json::{Map, Value};
use tracing::{debug, info};

use super::AppState;
use crate::network::error::{ApiError, ErrorBody, ValidationErrorBody};
use crate::network::ApiConfig;

/// Unwraps the JSON body, substituting `{}` when no JSON content type was sent.
fn request_body(payload: Result<Json<Value>, JsonRejection>) -> Result<Value, ApiError> {
    match payload {
        Ok(Json(body)) => Ok(body),
        Err(JsonRejection::MissingJsonContentType(rejection)) => {
            debug!(error = %rejection, "no JSON content type, reading body as empty object");
            Ok(Value::Object(Map::new()))
        }
        Err(rejection) => Err(rejection.into()),
    }
}

/// Applies field checks, then the area rule when it is enabled.
fn validate_body(api: &ApiConfig, body: &Value) -> Result<NewProducer, ValidationErrors> {
    let producer = validate_producer(body)?;
    if api.enforce_area_invariant {
        validate_area_invariant(&producer)?;
    }
    Ok(producer)
}

#[utoipa::path(
    get,
    path = "/producers",
    tag = "producers",
    responses(
        (status = 200, description = "All producers, unordered", body = Vec<Producer>),
        (status = 500, description = "Storage failure", body = ErrorBody)
    )
)]
pub async fn list_producers(
    State(state): State<AppState>,
) -> Result<Json<Vec<Producer>>, ApiError> {
    let producers = state.store.list_all().await?;
    Ok(Json(producers))
}

#[utoipa::path(
    post,
    path = "/producers",
    tag = "producers",
    request_body = NewProducer,
    responses(
        (status = 200, description = "Created producer with generated id", body = Producer),
        (status = 400, description = "Field validation failed", body = ValidationErrorBody),
        (status = 500, description = "Storage failure", body = ErrorBody)
    )
)]
pub async fn create_producer(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Producer>, ApiError> {
    let body = request_body(payload)?;
    let new_producer = validate_body(&state.api, &body)?;
    let producer = state.store.create(&new_producer).await?;
    info!(id = producer.id, "producer created");
    Ok(Json(producer))
}

#[utoipa::path(
    get,
    path = "/producers/{id}",
    tag = "producers",
    params(("id" = i32, Path, description = "Producer id")),
    responses(
        (status = 200, description = "The producer, or null when absent", body = Option<Producer>),
        (status = 400, description = "Id is not an integer", body = ErrorBody),
        (status = 500, description = "Storage failure", body = ErrorBody)
    )
)]
pub async fn get_producer(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<Option<Producer>>, ApiError> {
    let Path(id) = id?;
    let producer = state.store.find(id).await?;
    Ok(Json(producer))
}

#[utoipa::path(
    put,
    path = "/producers/{id}",
    tag = "producers",
    params(("id" = i32, Path, description = "Producer id")),
    request_body = NewProducer,
    responses(
        (status = 200, description = "Updated producer, or null when absent", body = Option<Producer>),
        (status = 400, description = "Field validation failed", body = ValidationErrorBody),
        (status = 500, description = "Storage failure", body = ErrorBody)
    )
)]
pub async fn update_producer(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Option<Producer>>, ApiError> {
    let Path(id) = id?;
    let body = request_body(payload)?;
    let new_producer = validate_body(&state.api, &body)?;
    let producer = state.store.update(id, &new_producer).await?;
    info!(id, matched = producer.is_some(), "producer updated");
    Ok(Json(producer))
}

#[utoipa::path(
    delete,
    path = "/producers/{id}",
    tag = "producers",
    params(("id" = i32, Path, description = "Producer id")),
    responses(
        (status = 200, description = "Deleted producer, or null when absent", body = Option<Producer>),
        (status = 400, description = "Id is not an integer", body = ErrorBody),
        (status = 500, description = "Storage failure", body = ErrorBody)
    )
)]
pub async fn delete_producer(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<Option<Producer>>, ApiError> {
    let Path(id) = id?;
    let producer = state.store.delete(id).await?;
    info!(id, matched = producer.is_some(), "producer deleted");
    Ok(Json(producer))
}
