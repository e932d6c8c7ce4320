// MediQR API
//
// HTTP surface for patient registration, QR lookup and vital-sign tracking.

pub mod api;
pub mod config;
pub mod entities;
pub mod openapi;

pub use api::create_application;
pub use config::ApiConfig;
