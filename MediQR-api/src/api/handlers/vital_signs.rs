use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{debug, info, instrument};

use mediqr_domain::entities::vital_signs::VitalSignsAssessment;
use mediqr_domain::services::evaluator::assess_vital_signs;
use mediqr_domain::services::history::chart_series;

use super::{service_error_response, JsonBody, PatientServiceHandle};
use crate::entities::vital_signs::{
    convert_to_domain_vital_signs_request, convert_to_public_reading, EvaluateQueryParams, RecordVitalSignsRequest,
    VitalSignsHistoryResponse,
};

/// Get a patient's vital-sign history with chart series
#[utoipa::path(
    get,
    path = "/api/v1/patients/{id}/vital-signs",
    params(
        ("id" = String, Path, description = "Patient identifier")
    ),
    responses(
        (status = 200, description = "Reading history", body = VitalSignsHistoryResponse),
        (status = 404, description = "Patient not found", body = crate::entities::common::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::entities::common::ErrorResponse),
    ),
    tag = "vital_signs"
)]
#[instrument(skip(service))]
pub async fn get_vital_signs_history(
    State(service): State<PatientServiceHandle>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, Response> {
    let patient = service
        .get_patient(&id)
        .await
        .map_err(|e| service_error_response(e).into_response())?;

    debug!("Patient {} has {} readings", id, patient.vital_signs.len());

    let chart = chart_series(&patient.vital_signs);
    let readings = patient.vital_signs.into_iter().map(convert_to_public_reading).collect();

    Ok(Json(VitalSignsHistoryResponse {
        patient_id: patient.id,
        readings,
        chart,
    }))
}

/// Record a new reading for a patient
#[utoipa::path(
    post,
    path = "/api/v1/patients/{id}/vital-signs",
    params(
        ("id" = String, Path, description = "Patient identifier")
    ),
    request_body = RecordVitalSignsRequest,
    responses(
        (status = 201, description = "Reading recorded", body = crate::entities::vital_signs::PublicVitalSignsReading),
        (status = 400, description = "Invalid request", body = crate::entities::common::ErrorResponse),
        (status = 404, description = "Patient not found", body = crate::entities::common::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::entities::common::ErrorResponse),
    ),
    tag = "vital_signs"
)]
#[instrument(skip(service, request))]
pub async fn record_vital_signs(
    State(service): State<PatientServiceHandle>,
    Path(id): Path<String>,
    JsonBody(request): JsonBody<RecordVitalSignsRequest>,
) -> Result<impl IntoResponse, Response> {
    info!("Recording vital signs for patient {}", id);

    let reading = service
        .record_vital_signs(&id, convert_to_domain_vital_signs_request(request))
        .await
        .map_err(|e| service_error_response(e).into_response())?;

    Ok((StatusCode::CREATED, Json(convert_to_public_reading(reading))))
}

/// Evaluate vital signs without storing them
#[utoipa::path(
    get,
    path = "/api/v1/vital-signs/evaluate",
    params(EvaluateQueryParams),
    responses(
        (status = 200, description = "Per-field evaluation", body = VitalSignsAssessment),
    ),
    tag = "vital_signs"
)]
#[instrument]
pub async fn evaluate_vital_signs(Query(params): Query<EvaluateQueryParams>) -> Json<VitalSignsAssessment> {
    Json(assess_vital_signs(&params.vital_sign()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_evaluate_absent_fields_are_unclassified() {
        let Json(assessment) = evaluate_vital_signs(Query(EvaluateQueryParams {
            blood_pressure: Some("85/55".to_string()),
            ..EvaluateQueryParams::default()
        }))
        .await;

        assert_eq!(assessment.blood_pressure.label, "Hypotension");
        assert!(assessment.blood_pressure.out_of_range);
        assert_eq!(assessment.temperature.label, "-");
        assert!(!assessment.temperature.out_of_range);
        assert_eq!(assessment.temperature.value, None);
    }
}
