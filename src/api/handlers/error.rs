//! Error taxonomy for the HTTP surface.
//!
//! Every handler returns `Result<_, ApiError>`. Validation failures carry the
//! per-field detail; conflicts and missing rows carry a fixed message; storage
//! failures are logged here and reach the client as a bare `500`.

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;
use utoipa::ToSchema;

use crate::{
    model::{FieldError, Rule, ValidationErrors},
    store::StoreError,
};

pub const USER_NOT_FOUND: &str = "User not found";
pub const PROPERTY_NOT_FOUND: &str = "Property not found";
pub const OWNER_NOT_FOUND: &str = "The owner id doesn't match any user";
pub const USER_CONFLICT: &str = "User already registered";
pub const PROPERTY_CONFLICT: &str = "Property already registered";
const INTERNAL: &str = "Internal server error";

/// Body of `400`, `404` and `500` responses.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub detail: String,
}

/// Body of `422` responses.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ValidationBody {
    pub detail: Vec<FieldError>,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    #[error("conflict: {0}")]
    Conflict(&'static str),

    #[error("not found: {0}")]
    NotFound(&'static str),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for ApiError {
    /// Constraint failures the pre-checks did not catch (a concurrent writer
    /// got there first) still map to the client-facing categories.
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UniqueViolation(_) if err.is_on_properties() => {
                Self::Conflict(PROPERTY_CONFLICT)
            }
            StoreError::UniqueViolation(_) => Self::Conflict(USER_CONFLICT),
            StoreError::CheckViolation(message) => {
                let (field, rule) = check_target(&message);
                Self::Validation(ValidationErrors::single(field, rule, message))
            }
            StoreError::ForeignKeyViolation(_) => Self::NotFound(OWNER_NOT_FOUND),
            StoreError::Database(err) => Self::Internal(err.to_string()),
        }
    }
}

/// Field and rule a named check constraint enforces. SQLite reports the
/// constraint name in the message, e.g. `CHECK constraint failed: users_age_cc`.
fn check_target(message: &str) -> (&'static str, Rule) {
    const TARGETS: [(&str, &str, Rule); 5] = [
        ("properties_home_flat_cc", "is_flat", Rule::ExclusiveChoice),
        ("properties_sold_rented_cc", "is_rented", Rule::MutuallyExclusive),
        ("users_age_cc", "age", Rule::Range),
        ("users_gender_cc", "gender", Rule::Format),
        ("users_salary_cc", "salary", Rule::Range),
    ];

    TARGETS
        .iter()
        .find(|(constraint, _, _)| message.contains(constraint))
        .map_or(("body", Rule::Range), |&(_, field, rule)| (field, rule))
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(ValidationErrors::single(
            "body",
            Rule::Format,
            rejection.body_text(),
        ))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::Validation(ValidationErrors::single(
            "path",
            Rule::Format,
            rejection.body_text(),
        ))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::Validation(ValidationErrors::single(
            "query",
            Rule::Format,
            rejection.body_text(),
        ))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ValidationBody {
                    detail: errors.errors().to_vec(),
                }),
            )
                .into_response(),
            Self::Conflict(message) => (
                StatusCode::BAD_REQUEST,
                Json(ErrorBody {
                    detail: message.to_string(),
                }),
            )
                .into_response(),
            Self::NotFound(message) => (
                StatusCode::NOT_FOUND,
                Json(ErrorBody {
                    detail: message.to_string(),
                }),
            )
                .into_response(),
            Self::Internal(message) => {
                error!("Failed to handle request: {message}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorBody {
                        detail: INTERNAL.to_string(),
                    }),
                )
                    .into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap_or_default();
        serde_json::from_slice(&bytes).unwrap_or_default()
    }

    #[tokio::test]
    async fn conflict_maps_to_bad_request() {
        let response = ApiError::Conflict(USER_CONFLICT).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({ "detail": "User already registered" })
        );
    }

    #[tokio::test]
    async fn validation_lists_fields() {
        let mut errors =
            ValidationErrors::single("age", Rule::Range, "age must be between 18 and 120");
        errors.push("email", Rule::Format, "email must be a valid address");
        let response = ApiError::from(errors).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body = body_json(response).await;
        assert_eq!(body["detail"][0]["field"], "age");
        assert_eq!(body["detail"][0]["rule"], "range");
        assert_eq!(body["detail"][1]["field"], "email");
        assert_eq!(body["detail"][1]["rule"], "format");
    }

    #[tokio::test]
    async fn internal_hides_the_cause() {
        let response = ApiError::Internal("disk I/O error".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({ "detail": "Internal server error" })
        );
    }

    #[test]
    fn store_errors_are_classified() {
        let properties =
            StoreError::UniqueViolation("UNIQUE constraint failed: properties.address".into());
        assert!(matches!(
            ApiError::from(properties),
            ApiError::Conflict(PROPERTY_CONFLICT)
        ));

        let users = StoreError::UniqueViolation("UNIQUE constraint failed: users.email".into());
        assert!(matches!(
            ApiError::from(users),
            ApiError::Conflict(USER_CONFLICT)
        ));

        let fk = StoreError::ForeignKeyViolation("FOREIGN KEY constraint failed".into());
        assert!(matches!(
            ApiError::from(fk),
            ApiError::NotFound(OWNER_NOT_FOUND)
        ));

        let check = StoreError::CheckViolation("CHECK constraint failed: users_age_cc".into());
        assert!(matches!(ApiError::from(check), ApiError::Validation(_)));
    }

    #[test]
    fn check_violations_name_the_flag() {
        let cases = [
            ("properties_home_flat_cc", "is_flat", Rule::ExclusiveChoice),
            ("properties_sold_rented_cc", "is_rented", Rule::MutuallyExclusive),
            ("users_age_cc", "age", Rule::Range),
            ("some_future_cc", "body", Rule::Range),
        ];
        for (constraint, field, rule) in cases {
            let err = StoreError::CheckViolation(format!("CHECK constraint failed: {constraint}"));
            match ApiError::from(err) {
                ApiError::Validation(errors) => {
                    assert!(errors.has(field, rule), "{constraint}: {errors:?}");
                }
                other => panic!("{constraint}: unexpected {other:?}"),
            }
        }
    }
}
