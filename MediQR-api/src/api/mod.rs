pub mod handlers;
pub mod routes;

use axum::Router;

use mediqr_data::database::DatabasePool;

use crate::config::ApiConfig;

/// Create the application router with its services
pub fn create_application(config: &ApiConfig, pool: Option<DatabasePool>) -> Router {
    let health_service = handlers::health::create_health_service(pool.clone());
    let patient_service = routes::create_patient_service(config, pool);
    routes::create_app(patient_service, health_service)
}
