use std::sync::Arc;

use axum::{routing::get, routing::post, Extension, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{debug, info};

use mediqr_data::database::DatabasePool;
use mediqr_data::fixtures::demo_patients;
use mediqr_data::repository::PatientRepository;
use mediqr_domain::services::PatientService;

use crate::api::handlers::{health, patients, scan, vital_signs, PatientServiceHandle};
use crate::api::handlers::health::HealthServiceHandle;
use crate::config::ApiConfig;
use crate::openapi::configure_swagger_routes;

/// Build the patient service the handlers share.
///
/// Patients live in the given SQLite pool, or in process memory without one.
pub fn create_patient_service(config: &ApiConfig, pool: Option<DatabasePool>) -> PatientServiceHandle {
    let repository = match pool {
        Some(pool) => PatientRepository::with_pool(pool),
        None => PatientRepository::new(),
    };

    let repository = if config.seed_demo_patients {
        info!("Empty patient store will start with the demo patients");
        repository.with_seed(demo_patients())
    } else {
        repository
    };

    Arc::new(PatientService::new(repository).with_qr_base_url(config.public_base_url.clone()))
}

/// Create the application router
pub fn create_app(patient_service: PatientServiceHandle, health_service: HealthServiceHandle) -> Router {
    debug!("Creating application router");

    let api_routes = Router::new()
        .route("/patients", get(patients::list_patients).post(patients::create_patient))
        .route("/patients/:id", get(patients::get_patient))
        .route("/patients/:id/qr", get(patients::get_patient_qr_code))
        .route(
            "/patients/:id/vital-signs",
            get(vital_signs::get_vital_signs_history).post(vital_signs::record_vital_signs),
        )
        .route("/scan", post(scan::scan_qr_payload))
        .route("/vital-signs/evaluate", get(vital_signs::evaluate_vital_signs))
        .with_state(patient_service);

    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .layer(Extension(health_service));

    Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .merge(configure_swagger_routes())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    /// Create a test application over a seeded in-memory store
    pub fn create_test_app() -> Router {
        let config = ApiConfig::default();
        create_app(create_patient_service(&config, None), health::create_health_service(None))
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).unwrap()
        };
        (status, json)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health_route() {
        let (status, json) = send(create_test_app(), get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn test_list_seeded_patients() {
        let (status, json) = send(create_test_app(), get("/api/v1/patients")).await;
        assert_eq!(status, StatusCode::OK);

        let patients = json.as_array().unwrap();
        assert_eq!(patients.len(), 2);
        assert_eq!(patients[0]["first_name"], "Juan");
        assert_eq!(
            patients[0]["qr_payload"],
            "http://localhost:3000/centro/pacientes?uuid=01JVKSJB6XAZM0RKYAFJFWZKPT"
        );
    }

    #[tokio::test]
    async fn test_unknown_patient_is_404() {
        let (status, json) = send(create_test_app(), get("/api/v1/patients/nope")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"], "not_found");
    }

    #[tokio::test]
    async fn test_record_and_read_back_vital_signs() {
        let app = create_test_app();
        let uri = "/api/v1/patients/01JVKSJB6XAZM0RKYAFJFWZKPT/vital-signs";

        let (status, json) = send(
            app.clone(),
            post_json(
                uri,
                json!({
                    "blood_pressure": "150/95",
                    "temperature": "38.0",
                    "heart_rate": "105",
                    "respiratory_rate": "16",
                    "spo2": "92",
                    "pain": "8",
                    "time": "2025-05-19T14:30:00Z"
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["assessment"]["blood_pressure"]["label"], "Hypertension grade 1");
        assert_eq!(json["assessment"]["temperature"]["label"], "Fever");
        assert_eq!(json["assessment"]["spo2"]["status"], "warning");

        let (status, json) = send(app.clone(), get(uri)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["readings"].as_array().unwrap().len(), 1);
        assert_eq!(json["chart"][0]["systolic"], 150.0);

        let (_, json) = send(app, get("/api/v1/patients/01JVKSJB6XAZM0RKYAFJFWZKPT")).await;
        assert_eq!(json["latest_vital_signs"]["values"]["pain"], "8");
    }

    #[tokio::test]
    async fn test_invalid_blood_pressure_is_400() {
        let (status, json) = send(
            create_test_app(),
            post_json(
                "/api/v1/patients/01JVKSJB6XAZM0RKYAFJFWZKPT/vital-signs",
                json!({
                    "blood_pressure": "120 / 80",
                    "temperature": "36.5",
                    "heart_rate": "72",
                    "respiratory_rate": "16",
                    "spo2": "98",
                    "pain": "0"
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "validation_error");
    }

    #[tokio::test]
    async fn test_scan_resolves_patient() {
        let (status, json) = send(
            create_test_app(),
            post_json(
                "/api/v1/scan",
                json!({ "payload": "http://localhost:3000/centro/pacientes?uuid=01JVKSJGWABT7E82NWA0PRYG1P" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["first_name"], "Emilio");
    }

    #[tokio::test]
    async fn test_scan_rejects_garbage() {
        let (status, json) = send(create_test_app(), post_json("/api/v1/scan", json!({ "payload": "hello" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "invalid_qr_payload");
    }

    #[tokio::test]
    async fn test_malformed_bodies_use_error_format() {
        for uri in ["/api/v1/scan", "/api/v1/patients", "/api/v1/patients/01JVKSJB6XAZM0RKYAFJFWZKPT/vital-signs"] {
            let response = create_test_app().oneshot(post_json(uri, json!({}))).await.unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", uri);
            assert_eq!(response.headers()["content-type"], "application/json", "{}", uri);

            let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            let json: Value = serde_json::from_slice(&body).unwrap();
            assert_eq!(json["error"], "validation_error", "{}", uri);
            assert!(!json["message"].as_str().unwrap().is_empty());
        }
    }

    #[tokio::test]
    async fn test_non_json_body_is_400() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/scan")
            .header("content-type", "application/json")
            .body(Body::from("payload=abc"))
            .unwrap();
        let (status, json) = send(create_test_app(), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "validation_error");
    }

    #[tokio::test]
    async fn test_blank_patient_fields_are_rejected() {
        let (status, json) = send(
            create_test_app(),
            post_json(
                "/api/v1/patients",
                json!({
                    "first_name": "   ",
                    "last_name": "  ",
                    "birth_date": "1990-08-21",
                    "phone_number": " ",
                    "blood_type": "O+"
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "validation_error");
        let message = json["message"].as_str().unwrap();
        assert!(message.contains("first_name"), "{}", message);
        assert!(message.contains("phone_number"), "{}", message);
    }

    #[tokio::test]
    async fn test_patient_qr_code_route() {
        let response = create_test_app()
            .oneshot(get("/api/v1/patients/01JVKSJGWABT7E82NWA0PRYG1P/qr"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["content-type"], "image/svg+xml");

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let svg = String::from_utf8(body.to_vec()).unwrap();
        assert!(svg.contains("<svg"), "{}", svg);

        let (status, json) = send(create_test_app(), get("/api/v1/patients/nope/qr")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"], "not_found");
    }

    #[tokio::test]
    async fn test_evaluate_route() {
        let (status, json) = send(
            create_test_app(),
            get("/api/v1/vital-signs/evaluate?blood_pressure=119/81&temperature=37.3&spo2=92"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["blood_pressure"]["label"], "-");
        assert_eq!(json["blood_pressure"]["out_of_range"], false);
        assert_eq!(json["temperature"]["label"], "Subfebrile");
        assert_eq!(json["spo2"]["label"], "Mildly low");
        assert_eq!(json["spo2"]["out_of_range"], true);
        assert_eq!(json["pain"]["status"], "unclassified");
    }
}
