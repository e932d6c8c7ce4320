use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Configure Swagger UI endpoints
pub fn configure_swagger_routes() -> SwaggerUi {
    SwaggerUi::new("/api-docs").url("/api-docs/openapi.json", ApiDoc::openapi())
}

// API Documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health endpoints
        crate::api::handlers::health::health_check,

        // Patient endpoints
        crate::api::handlers::patients::list_patients,
        crate::api::handlers::patients::create_patient,
        crate::api::handlers::patients::get_patient,
        crate::api::handlers::patients::get_patient_qr_code,
        crate::api::handlers::scan::scan_qr_payload,

        // Vital-sign endpoints
        crate::api::handlers::vital_signs::get_vital_signs_history,
        crate::api::handlers::vital_signs::record_vital_signs,
        crate::api::handlers::vital_signs::evaluate_vital_signs,
    ),
    components(
        schemas(
            // Entities
            crate::entities::common::ErrorResponse,
            crate::entities::patient::PatientSummary,
            crate::entities::patient::PatientDetail,
            crate::entities::patient::PublicHealthNote,
            crate::entities::patient::CreatePatientRequest,
            crate::entities::patient::ScanRequest,
            crate::entities::vital_signs::PublicVitalSignsReading,
            crate::entities::vital_signs::RecordVitalSignsRequest,
            crate::entities::vital_signs::VitalSignsHistoryResponse,

            // Domain values embedded in responses
            mediqr_domain::entities::vital_signs::VitalSign,
            mediqr_domain::entities::vital_signs::VitalSignsAssessment,
            mediqr_domain::entities::vital_signs::FieldAssessment,
            mediqr_domain::entities::vital_signs::DisplayStatus,
            mediqr_domain::services::history::VitalSignsChartPoint,

            // Health handlers
            crate::api::handlers::health::HealthResponse,
            crate::api::handlers::health::ComponentStatus,
            crate::api::handlers::health::ComponentHealthStatus,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoint"),
        (name = "patients", description = "Patient registration and QR lookup"),
        (name = "vital_signs", description = "Vital-sign recording and evaluation")
    ),
    info(
        title = "MediQR API",
        version = "0.1.0",
        description = "QR-based patient lookup and vital-sign tracking for clinics",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        ),
    ),
    servers(
        (url = "/", description = "Local development server")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_doc_generation() {
        let openapi = ApiDoc::openapi();

        assert_eq!(openapi.info.title, "MediQR API");
        assert_eq!(openapi.info.version, "0.1.0");

        let tags = openapi.tags.as_ref().unwrap();
        assert!(tags.iter().any(|tag| tag.name == "patients"));
        assert!(tags.iter().any(|tag| tag.name == "vital_signs"));

        for path in [
            "/health",
            "/api/v1/patients",
            "/api/v1/patients/{id}",
            "/api/v1/patients/{id}/vital-signs",
            "/api/v1/patients/{id}/qr",
            "/api/v1/scan",
            "/api/v1/vital-signs/evaluate",
        ] {
            assert!(openapi.paths.paths.contains_key(path), "missing path {}", path);
        }
    }

    #[test]
    fn test_schemas_are_registered() {
        let openapi = ApiDoc::openapi();
        let schemas = &openapi.components.as_ref().unwrap().schemas;
        assert!(schemas.contains_key("PatientDetail"));
        assert!(schemas.contains_key("VitalSignsAssessment"));
        assert!(schemas.contains_key("ErrorResponse"));
    }
}
