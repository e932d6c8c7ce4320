use axum::{
    extract::{Json, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use qrcode::{render::svg, QrCode};
use tracing::{error, info, instrument, warn};

use super::{service_error_response, JsonBody, PatientServiceHandle};
use crate::entities::common::ErrorResponse;
use crate::entities::patient::{
    convert_to_domain_create_request, convert_to_public_detail, convert_to_public_summary, CreatePatientRequest,
    PatientSummary,
};

/// List all registered patients
#[utoipa::path(
    get,
    path = "/api/v1/patients",
    responses(
        (status = 200, description = "Patients in registration order", body = [PatientSummary]),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "patients"
)]
#[instrument(skip(service))]
pub async fn list_patients(State(service): State<PatientServiceHandle>) -> Result<impl IntoResponse, Response> {
    let patients = service
        .list_patients()
        .await
        .map_err(|e| service_error_response(e).into_response())?;

    info!("Listing {} patients", patients.len());

    let summaries: Vec<PatientSummary> = patients
        .iter()
        .map(|patient| convert_to_public_summary(patient, service.qr_payload(&patient.id)))
        .collect();

    Ok(Json(summaries))
}

/// Register a new patient
#[utoipa::path(
    post,
    path = "/api/v1/patients",
    request_body = CreatePatientRequest,
    responses(
        (status = 201, description = "Patient registered", body = crate::entities::patient::PatientDetail),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "patients"
)]
#[instrument(skip(service, request))]
pub async fn create_patient(
    State(service): State<PatientServiceHandle>,
    JsonBody(request): JsonBody<CreatePatientRequest>,
) -> Result<impl IntoResponse, Response> {
    info!("Registering new patient");

    let domain_request = convert_to_domain_create_request(request).map_err(|message| {
        warn!("Invalid patient data: {}", message);
        ErrorResponse::validation_error(&format!("blood_type: {}", message), None).into_response()
    })?;

    let patient = service
        .register_patient(domain_request)
        .await
        .map_err(|e| service_error_response(e).into_response())?;

    let qr_payload = service.qr_payload(&patient.id);
    Ok((StatusCode::CREATED, Json(convert_to_public_detail(patient, qr_payload))))
}

/// Get a patient with their latest reading evaluated
#[utoipa::path(
    get,
    path = "/api/v1/patients/{id}",
    params(
        ("id" = String, Path, description = "Patient identifier")
    ),
    responses(
        (status = 200, description = "Patient found", body = crate::entities::patient::PatientDetail),
        (status = 404, description = "Patient not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "patients"
)]
#[instrument(skip(service))]
pub async fn get_patient(
    State(service): State<PatientServiceHandle>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, Response> {
    info!("Fetching patient {}", id);

    let patient = service
        .get_patient(&id)
        .await
        .map_err(|e| service_error_response(e).into_response())?;

    let qr_payload = service.qr_payload(&patient.id);
    Ok(Json(convert_to_public_detail(patient, qr_payload)))
}

/// Smallest side of the rendered QR image, in pixels
const QR_IMAGE_MIN_SIZE: u32 = 256;

/// Render a patient's QR code as an SVG image ready to print
#[utoipa::path(
    get,
    path = "/api/v1/patients/{id}/qr",
    params(
        ("id" = String, Path, description = "Patient identifier")
    ),
    responses(
        (status = 200, description = "QR code encoding the patient payload", content_type = "image/svg+xml", body = String),
        (status = 404, description = "Patient not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "patients"
)]
#[instrument(skip(service))]
pub async fn get_patient_qr_code(
    State(service): State<PatientServiceHandle>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, Response> {
    let patient = service
        .get_patient(&id)
        .await
        .map_err(|e| service_error_response(e).into_response())?;

    let payload = service.qr_payload(&patient.id);
    let code = QrCode::new(payload.as_bytes()).map_err(|e| {
        error!("Failed to encode QR payload for patient {}: {}", patient.id, e);
        ErrorResponse::internal_error().into_response()
    })?;

    let image = code
        .render::<svg::Color>()
        .min_dimensions(QR_IMAGE_MIN_SIZE, QR_IMAGE_MIN_SIZE)
        .build();

    info!("Rendered QR code for patient {}", patient.id);
    Ok(([(header::CONTENT_TYPE, "image/svg+xml")], image))
}
