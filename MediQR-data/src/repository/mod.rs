// Repository module structure
pub mod errors;
mod in_memory;
mod patient;
mod storage;

// Re-export commonly used types
pub use errors::RepositoryError;
pub use in_memory::InMemoryStorage;
pub use patient::{PatientRepository, PatientRepositoryTrait, PATIENTS_STORAGE_KEY};
pub use storage::DatabaseStorage;

// Re-export test modules for both testing and when mock feature is enabled
#[cfg(any(test, feature = "mock"))]
pub use patient::tests;
