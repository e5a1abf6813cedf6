//! Error envelope returned by the producer API.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use agro_core::{FieldError, ValidationErrors};
use serde::Serialize;
use tracing::{debug, error};
use utoipa::ToSchema;

use crate::traits::StoreError;

/// Body of a 500 response, and of a 400 for an unreadable request.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    #[schema(example = "Internal Server Error")]
    pub error: String,
}

/// Body of a 400 validation response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ValidationErrorBody {
    pub errors: Vec<FieldError>,
}

/// Failures a producer handler can return.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Request body failed field checks. The store was not called.
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    /// The store call failed.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// The body was declared as JSON but could not be parsed.
    #[error(transparent)]
    Json(#[from] JsonRejection),
    /// The `{id}` segment is not a 32-bit integer.
    #[error(transparent)]
    Path(#[from] PathRejection),
}

fn error_body(status: StatusCode, error: String) -> Response {
    (status, Json(ErrorBody { error })).into_response()
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Validation(ValidationErrors(errors)) => (
                StatusCode::BAD_REQUEST,
                Json(ValidationErrorBody { errors }),
            )
                .into_response(),
            Self::Store(err) => {
                error!(error = %err, "error executing query");
                error_body(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
            Self::Json(rejection) => {
                debug!(error = %rejection, "rejected request body");
                error_body(rejection.status(), rejection.body_text())
            }
            Self::Path(rejection) => {
                debug!(error = %rejection, "rejected path parameter");
                error_body(rejection.status(), rejection.body_text())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn store_error_is_generic_500() {
        let response = ApiError::Store(StoreError::Unavailable).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json = body_json(response).await;
        assert_eq!(json, serde_json::json!({ "error": "Internal Server Error" }));
    }

    #[tokio::test]
    async fn path_rejection_is_json_client_error() {
        use axum::extract::Path;
        use axum::http::Request;
        use axum::routing::get;
        use axum::Router;
        use tower::ServiceExt;

        let app = Router::new().route(
            "/producers/{id}",
            get(|id: Result<Path<i32>, PathRejection>| async move {
                let Path(id) = id?;
                Ok::<_, ApiError>(id.to_string())
            }),
        );
        let request = Request::builder()
            .uri("/producers/3000000000")
            .body(axum::body::Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert!(json["error"].as_str().unwrap().contains("3000000000"));
    }

    #[tokio::test]
    async fn validation_error_lists_fields() {
        let errors = agro_core::validate_producer(&serde_json::json!({})).unwrap_err();
        let response = ApiError::from(errors).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        let fields = json["errors"].as_array().unwrap();
        assert_eq!(fields.len(), 9);
        assert_eq!(fields[0]["path"], "cpfCnpj");
        assert_eq!(fields[0]["location"], "body");
    }
}
