// Domain services
pub mod evaluator;
pub mod history;
pub mod patient;
pub mod qr;

// Re-export service traits and factory functions
pub use evaluator::assess_vital_signs;
pub use history::{chart_series, VitalSignsChartPoint};
pub use patient::{create_default_patient_service, PatientService, PatientServiceError, PatientServiceTrait};
pub use qr::{build_qr_payload, resolve_qr_payload, QrPayloadError};
