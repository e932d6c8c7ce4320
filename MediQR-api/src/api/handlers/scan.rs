use axum::{
    extract::{Json, State},
    response::{IntoResponse, Response},
};
use tracing::{info, instrument};

use super::{service_error_response, JsonBody, PatientServiceHandle};
use crate::entities::patient::{convert_to_public_detail, ScanRequest};

/// Resolve a scanned QR payload to the patient it points at
#[utoipa::path(
    post,
    path = "/api/v1/scan",
    request_body = ScanRequest,
    responses(
        (status = 200, description = "Patient found", body = crate::entities::patient::PatientDetail),
        (status = 400, description = "Payload does not identify a patient", body = crate::entities::common::ErrorResponse),
        (status = 404, description = "Patient not found", body = crate::entities::common::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::entities::common::ErrorResponse),
    ),
    tag = "patients"
)]
#[instrument(skip(service, request))]
pub async fn scan_qr_payload(
    State(service): State<PatientServiceHandle>,
    JsonBody(request): JsonBody<ScanRequest>,
) -> Result<impl IntoResponse, Response> {
    let patient = service
        .resolve_scanned_patient(&request.payload)
        .await
        .map_err(|e| service_error_response(e).into_response())?;

    info!("QR payload resolved to patient {}", patient.id);

    let qr_payload = service.qr_payload(&patient.id);
    Ok(Json(convert_to_public_detail(patient, qr_payload)))
}
