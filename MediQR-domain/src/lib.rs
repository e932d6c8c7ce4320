// MediQR Domain
// Vital-sign evaluation, QR payloads and patient business logic

// Services that implement business logic
pub mod services;

// Domain entities
pub mod entities;

// Health checks and system status
pub mod health;

// Re-export the database module from mediqr_data for convenience
pub use mediqr_data::database;
