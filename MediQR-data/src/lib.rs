// MediQR Data
// This crate handles persistence of the patient list

// Database connection management
pub mod database;

// Repository implementations for data access
pub mod repository;

// Data storage models
pub mod models;

// Demo patients used to seed an empty store
pub mod fixtures;
