pub mod conversions;
pub mod patient;
pub mod vital_signs;

// Re-export common types for easier imports
pub use patient::{Allergy, BloodType, CreatePatientRequest, MedicalCondition, Patient};
pub use vital_signs::{
    BloodPressure, BloodPressureCategory, ClinicalCategory, DisplayStatus, FieldAssessment, HeartRateCategory,
    PainCategory, RecordVitalSignsRequest, RespiratoryRateCategory, Spo2Category, TemperatureCategory,
    VitalSign, VitalSignsAssessment, VitalSignsReading,
};
