//! Domain layer health check functionality

use std::collections::HashMap;

use async_trait::async_trait;
use mediqr_data::database::{get_connection_info, DatabasePool};
use tracing::warn;

/// System health status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemStatus {
    /// All components are healthy
    Healthy,
    /// Some components are degraded but the system is functional
    Degraded,
    /// System is not functioning properly
    Unhealthy,
}

/// Component health status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

/// Health of one component, with optional details
#[derive(Debug, Clone)]
pub struct HealthComponent {
    pub status: ComponentStatus,
    pub details: Option<String>,
}

/// Overall health of the system
#[derive(Debug, Clone)]
pub struct SystemHealth {
    pub status: SystemStatus,
    /// Component name to health
    pub components: HashMap<String, HealthComponent>,
}

/// Trait for health services
#[async_trait]
pub trait HealthServiceTrait: Send + Sync + std::fmt::Debug {
    /// Get the overall system health
    async fn get_system_health(&self) -> SystemHealth;

    /// Check the patient store.
    ///
    /// Returns a description of the backing store, or an error when it
    /// cannot be reached.
    async fn check_store_status(&self) -> Result<String, String>;
}

/// Health checks for the patient store
#[derive(Debug, Clone, Default)]
pub struct HealthService {
    /// `None` when patients are kept in process memory
    pool: Option<DatabasePool>,
}

impl HealthService {
    pub fn new(pool: Option<DatabasePool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HealthServiceTrait for HealthService {
    async fn get_system_health(&self) -> SystemHealth {
        let store = match self.check_store_status().await {
            Ok(details) => HealthComponent {
                status: ComponentStatus::Healthy,
                details: Some(details),
            },
            Err(e) => {
                warn!("Patient store health check failed: {}", e);
                HealthComponent {
                    status: ComponentStatus::Unhealthy,
                    details: Some(e),
                }
            }
        };

        let status = match store.status {
            ComponentStatus::Unhealthy => SystemStatus::Unhealthy,
            ComponentStatus::Degraded => SystemStatus::Degraded,
            ComponentStatus::Healthy => SystemStatus::Healthy,
        };

        SystemHealth {
            status,
            components: [("patient_store".to_string(), store)].into_iter().collect(),
        }
    }

    async fn check_store_status(&self) -> Result<String, String> {
        match &self.pool {
            Some(pool) => get_connection_info(pool).map_err(|e| format!("Database connection error: {}", e)),
            None => Ok("In-memory patient store".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mediqr_data::database::{initialize_in_memory_sqlite_pool, DatabaseConfig};

    #[tokio::test]
    async fn test_in_memory_store_is_healthy() {
        let health = HealthService::default().get_system_health().await;
        assert_eq!(health.status, SystemStatus::Healthy);

        let store = &health.components["patient_store"];
        assert_eq!(store.status, ComponentStatus::Healthy);
        assert_eq!(store.details.as_deref(), Some("In-memory patient store"));
    }

    #[tokio::test]
    async fn test_sqlite_store_reports_connection_info() {
        let pool = initialize_in_memory_sqlite_pool(&DatabaseConfig::default()).unwrap();
        let service = HealthService::new(Some(pool));

        let details = service.check_store_status().await.unwrap();
        assert!(details.starts_with("SQLite"), "{}", details);
        assert_eq!(service.get_system_health().await.status, SystemStatus::Healthy);
    }
}
