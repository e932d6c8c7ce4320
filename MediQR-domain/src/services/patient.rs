use async_trait::async_trait;
use chrono::Utc;
use thiserror::Error;
use tracing::{error, info, warn};
use validator::{Validate, ValidationErrors};

use crate::entities::conversions;
use crate::entities::patient::{CreatePatientRequest, Patient};
use crate::entities::vital_signs::{RecordVitalSignsRequest, VitalSignsReading};
use crate::services::qr::{build_qr_payload, resolve_qr_payload, QrPayloadError};
use mediqr_data::models::PatientRecord;
use mediqr_data::repository::{PatientRepositoryTrait, RepositoryError};

/// Base URL used for QR payloads when none is configured
pub const DEFAULT_QR_BASE_URL: &str = "http://localhost:3000/centro";

/// Patient service errors
#[derive(Debug, Error)]
pub enum PatientServiceError {
    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Not found error
    #[error("Patient not found: {0}")]
    NotFound(String),

    /// Scanned text does not identify a patient
    #[error("Invalid QR payload: {0}")]
    InvalidQrPayload(#[from] QrPayloadError),

    /// Repository error
    #[error("Repository error: {0}")]
    RepositoryError(String),
}

/// Trait for patient service operations
#[async_trait]
pub trait PatientServiceTrait {
    /// Validate a patient registration request
    fn validate_create_request(&self, request: &CreatePatientRequest) -> Result<(), PatientServiceError>;

    /// Validate a vital-signs request
    fn validate_vital_signs_request(&self, request: &RecordVitalSignsRequest) -> Result<(), PatientServiceError>;

    /// Payload to encode in the patient's QR code
    fn qr_payload(&self, patient_id: &str) -> String;

    /// Register a new patient
    async fn register_patient(&self, request: CreatePatientRequest) -> Result<Patient, PatientServiceError>;

    /// Get all patients in registration order
    async fn list_patients(&self) -> Result<Vec<Patient>, PatientServiceError>;

    /// Get a patient by identifier
    async fn get_patient(&self, id: &str) -> Result<Patient, PatientServiceError>;

    /// Append a reading to a patient's history
    async fn record_vital_signs(
        &self,
        id: &str,
        request: RecordVitalSignsRequest,
    ) -> Result<VitalSignsReading, PatientServiceError>;

    /// Look up the patient a scanned QR payload points at
    async fn resolve_scanned_patient(&self, payload: &str) -> Result<Patient, PatientServiceError>;
}

/// Patient service for domain logic
pub struct PatientService<R: PatientRepositoryTrait> {
    repository: R,
    qr_base_url: String,
}

impl<R: PatientRepositoryTrait> PatientService<R> {
    /// Create a new patient service
    pub fn new(repository: R) -> Self {
        Self {
            repository,
            qr_base_url: DEFAULT_QR_BASE_URL.to_string(),
        }
    }

    /// Use a different base URL for QR payloads
    pub fn with_qr_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.qr_base_url = base_url.into();
        self
    }

    /// Map repository errors to service errors
    fn map_repo_error(&self, err: RepositoryError) -> PatientServiceError {
        match err {
            RepositoryError::NotFound(id) => PatientServiceError::NotFound(id),
            _ => {
                error!("Patient store failure: {}", err);
                PatientServiceError::RepositoryError(err.to_string())
            }
        }
    }

    fn to_domain(&self, record: PatientRecord) -> Result<Patient, PatientServiceError> {
        let id = record.uuid.clone();
        conversions::convert_to_domain_patient(record).map_err(|e| {
            error!("Stored patient {} is invalid: {}", id, e);
            PatientServiceError::RepositoryError(e)
        })
    }
}

/// Flatten validator errors into `field: message; field: message`
fn format_validation_errors(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by_key(|(field, _)| *field);

    fields
        .into_iter()
        .map(|(field, errors)| {
            let messages: Vec<String> = errors
                .iter()
                .map(|err| match &err.message {
                    Some(msg) => msg.to_string(),
                    None => format!("Invalid {}", field),
                })
                .collect();
            format!("{}: {}", field, messages.join(", "))
        })
        .collect::<Vec<String>>()
        .join("; ")
}

#[async_trait]
impl<R: PatientRepositoryTrait + Send + Sync> PatientServiceTrait for PatientService<R> {
    fn validate_create_request(&self, request: &CreatePatientRequest) -> Result<(), PatientServiceError> {
        let mut problems = Vec::new();

        if let Err(errors) = request.validate() {
            problems.push(format_validation_errors(&errors));
        }

        for (index, allergy) in request.allergies.iter().enumerate() {
            if let Err(errors) = allergy.validate() {
                problems.push(format!("allergies[{}].{}", index, format_validation_errors(&errors)));
            }
        }

        for (index, condition) in request.medical_conditions.iter().enumerate() {
            if let Err(errors) = condition.validate() {
                problems.push(format!(
                    "medical_conditions[{}].{}",
                    index,
                    format_validation_errors(&errors)
                ));
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(PatientServiceError::ValidationError(problems.join("; ")))
        }
    }

    fn validate_vital_signs_request(&self, request: &RecordVitalSignsRequest) -> Result<(), PatientServiceError> {
        request
            .validate()
            .map_err(|errors| PatientServiceError::ValidationError(format_validation_errors(&errors)))
    }

    fn qr_payload(&self, patient_id: &str) -> String {
        build_qr_payload(&self.qr_base_url, patient_id)
    }

    async fn register_patient(&self, request: CreatePatientRequest) -> Result<Patient, PatientServiceError> {
        self.validate_create_request(&request)?;

        let data_request = conversions::convert_to_data_create_request(&request);

        let record = self
            .repository
            .create(data_request)
            .await
            .map_err(|e| self.map_repo_error(e))?;

        info!("Registered patient {}", record.uuid);
        self.to_domain(record)
    }

    async fn list_patients(&self) -> Result<Vec<Patient>, PatientServiceError> {
        let records = self.repository.get_all().await.map_err(|e| self.map_repo_error(e))?;

        records.into_iter().map(|record| self.to_domain(record)).collect()
    }

    async fn get_patient(&self, id: &str) -> Result<Patient, PatientServiceError> {
        let record = self
            .repository
            .get_by_id(id)
            .await
            .map_err(|e| self.map_repo_error(e))?
            .ok_or_else(|| PatientServiceError::NotFound(id.to_string()))?;

        self.to_domain(record)
    }

    async fn record_vital_signs(
        &self,
        id: &str,
        request: RecordVitalSignsRequest,
    ) -> Result<VitalSignsReading, PatientServiceError> {
        self.validate_vital_signs_request(&request)?;

        let reading = VitalSignsReading {
            vital_sign: request.vital_sign(),
            time: request.time.unwrap_or_else(Utc::now),
        };

        self.repository
            .append_vital_signs(id, conversions::convert_to_data_reading(&reading))
            .await
            .map_err(|e| self.map_repo_error(e))?;

        info!("Recorded vital signs for patient {}", id);
        Ok(reading)
    }

    async fn resolve_scanned_patient(&self, payload: &str) -> Result<Patient, PatientServiceError> {
        let id = resolve_qr_payload(payload).map_err(|e| {
            warn!("Rejected QR payload: {}", e);
            PatientServiceError::from(e)
        })?;

        self.get_patient(&id).await
    }
}

/// Create a patient service over an in-memory repository
pub fn create_default_patient_service() -> impl PatientServiceTrait + Send + Sync {
    let repository = mediqr_data::repository::PatientRepository::new();
    PatientService::new(repository)
}
