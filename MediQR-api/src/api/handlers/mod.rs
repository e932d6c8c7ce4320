pub mod health;
pub mod patients;
pub mod scan;
pub mod vital_signs;

use std::sync::Arc;

use axum::extract::FromRequest;
use tracing::{error, warn};

use mediqr_domain::services::{PatientServiceError, PatientServiceTrait};

use crate::entities::common::ErrorResponse;

// Re-export handlers for easier imports
pub use health::health_check;
pub use patients::{create_patient, get_patient, get_patient_qr_code, list_patients};
pub use scan::scan_qr_payload;
pub use vital_signs::{evaluate_vital_signs, get_vital_signs_history, record_vital_signs};

/// Service type for dependency injection
pub type PatientServiceHandle = Arc<dyn PatientServiceTrait + Send + Sync>;

/// JSON request body whose rejections use the API error format
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ErrorResponse))]
pub struct JsonBody<T>(pub T);

/// Map a service failure to the response returned to the client
pub(crate) fn service_error_response(err: PatientServiceError) -> ErrorResponse {
    match err {
        PatientServiceError::ValidationError(message) => {
            warn!("Rejected request: {}", message);
            ErrorResponse::validation_error(&message, None)
        }
        PatientServiceError::NotFound(id) => {
            warn!("Patient not found: {}", id);
            ErrorResponse::not_found("patient")
        }
        PatientServiceError::InvalidQrPayload(e) => {
            warn!("Invalid QR payload: {}", e);
            ErrorResponse::invalid_qr_payload(&e.to_string())
        }
        PatientServiceError::RepositoryError(message) => {
            error!("Patient store error: {}", message);
            ErrorResponse::internal_error()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use mediqr_domain::services::QrPayloadError;

    #[test]
    fn test_service_errors_map_to_status_codes() {
        let cases = [
            (PatientServiceError::ValidationError("x".into()), StatusCode::BAD_REQUEST, "validation_error"),
            (PatientServiceError::NotFound("x".into()), StatusCode::NOT_FOUND, "not_found"),
            (
                PatientServiceError::InvalidQrPayload(QrPayloadError::Empty),
                StatusCode::BAD_REQUEST,
                "invalid_qr_payload",
            ),
            (
                PatientServiceError::RepositoryError("disk".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
            ),
        ];

        for (err, status, code) in cases {
            let response = service_error_response(err);
            assert_eq!(response.status_code(), status);
            assert_eq!(response.error, code);
        }
    }
}
