// Public entities for the MediQR API
// Data structures exposed across the HTTP boundary

// Error responses
pub mod common;

// Patients and QR scanning
pub mod patient;

// Vital-sign readings, evaluation and history
pub mod vital_signs;
