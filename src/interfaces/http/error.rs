//! Maps service failures onto HTTP responses.

use crate::domain::errors::{ServiceError, ValidationError};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// One entry of a 422 `detail` list.
#[derive(Debug, Serialize)]
pub struct ViolationDetail {
    pub loc: Vec<String>,
    pub msg: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
}

#[derive(Debug, Serialize)]
struct ValidationBody {
    detail: Vec<ViolationDetail>,
}

#[derive(Debug, Serialize)]
struct MessageBody {
    detail: String,
}

/// Error returned by the `/predict` handler.
#[derive(Debug)]
pub struct ApiError(pub ServiceError);

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.0 {
            ServiceError::Validation(err) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ValidationBody {
                    detail: violation_details(&err),
                }),
            )
                .into_response(),
            other => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(MessageBody {
                    detail: other.to_string(),
                }),
            )
                .into_response(),
        }
    }
}

pub fn violation_details(err: &ValidationError) -> Vec<ViolationDetail> {
    err.violations
        .iter()
        .map(|v| {
            let mut loc = vec!["body".to_string()];
            loc.extend(v.field.clone());
            ViolationDetail {
                loc,
                msg: v.message.clone(),
                kind: v.kind.as_str(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::{FieldViolation, PredictionError, ViolationKind};

    #[test]
    fn test_validation_maps_to_422() {
        let err = ServiceError::Validation(ValidationError {
            violations: vec![FieldViolation {
                field: Some("POSTCODE".into()),
                kind: ViolationKind::Missing,
                message: "Field required".into(),
            }],
        });
        let response = ApiError(err).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_prediction_failure_maps_to_500() {
        let err = ServiceError::Prediction(PredictionError::UnseenCategory {
            column: "BUILT_FORM".into(),
            value: "Castle".into(),
        });
        let response = ApiError(err).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_detail_location_includes_field() {
        let err = ValidationError::body(ViolationKind::JsonInvalid, "EOF while parsing");
        let details = violation_details(&err);
        assert_eq!(details[0].loc, vec!["body".to_string()]);
        assert_eq!(details[0].kind, "json_invalid");

        let err = ValidationError {
            violations: vec![FieldViolation {
                field: Some("year".into()),
                kind: ViolationKind::IntType,
                message: "Input should be a valid integer".into(),
            }],
        };
        let json = serde_json::to_value(violation_details(&err)).unwrap();
        assert_eq!(json[0]["loc"], serde_json::json!(["body", "year"]));
        assert_eq!(json[0]["type"], "int_type");
    }
}
