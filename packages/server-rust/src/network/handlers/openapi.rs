//! OpenAPI document for the producer API.

use axum::Json;
use agro_core::{DashboardStats, FieldError, NewProducer, Producer};
use utoipa::OpenApi;

use super::{dashboard, producers};
use crate::network::error::{ErrorBody, ValidationErrorBody};

#[derive(OpenApi)]
#[openapi(
    info(title = "Agro Producers API", description = "CRUD over agricultural producers"),
    paths(
        producers::list_producers,
        producers::create_producer,
        producers::get_producer,
        producers::update_producer,
        producers::delete_producer,
        dashboard::dashboard_handler,
    ),
    components(schemas(
        Producer,
        NewProducer,
        DashboardStats,
        FieldError,
        ErrorBody,
        ValidationErrorBody,
    )),
    tags(
        (name = "producers", description = "Producer records"),
        (name = "dashboard", description = "Aggregate statistics"),
    )
)]
pub struct ApiDoc;

/// Serves the generated OpenAPI document.
pub async fn openapi_handler() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
