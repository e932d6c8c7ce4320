// Storage models for the persisted patient list
pub mod patient;

pub use patient::{
    AllergyRecord, CreatePatientRequest, MedicalConditionRecord, PatientRecord, VitalSignRecord,
    VitalSignsRecord,
};
