use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, info};
use ulid::Ulid;

use crate::database::DatabasePool;
use crate::models::{CreatePatientRequest, PatientRecord, VitalSignsRecord};
use super::errors::RepositoryError;
use super::in_memory::InMemoryStorage;
use super::storage::DatabaseStorage;

/// Key under which the whole patient list is stored
pub const PATIENTS_STORAGE_KEY: &str = "patients";

/// Repository trait for patients and their vital-sign history
#[async_trait]
pub trait PatientRepositoryTrait {
    /// Register a new patient, assigning a fresh identifier
    async fn create(&self, request: CreatePatientRequest) -> Result<PatientRecord, RepositoryError>;

    /// Get all patients in registration order
    async fn get_all(&self) -> Result<Vec<PatientRecord>, RepositoryError>;

    /// Get a patient by identifier
    async fn get_by_id(&self, id: &str) -> Result<Option<PatientRecord>, RepositoryError>;

    /// Append a reading to a patient's history and return the updated patient
    async fn append_vital_signs(
        &self,
        id: &str,
        reading: VitalSignsRecord,
    ) -> Result<PatientRecord, RepositoryError>;
}

/// Repository holding the patient list as one JSON value.
///
/// Uses the SQLite pool it was given, or process memory when it has none.
#[derive(Debug, Clone, Default)]
pub struct PatientRepository {
    /// Used when no pool is configured
    storage: InMemoryStorage,

    pool: Option<DatabasePool>,

    /// List returned while nothing has been stored yet
    seed: Arc<Vec<PatientRecord>>,
}

impl PatientRepository {
    /// Create a new in-memory repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository backed by a database pool
    pub fn with_pool(pool: DatabasePool) -> Self {
        Self {
            pool: Some(pool),
            ..Self::default()
        }
    }

    /// Use `patients` as the list until the first write
    pub fn with_seed(mut self, patients: Vec<PatientRecord>) -> Self {
        self.seed = Arc::new(patients);
        self
    }

    fn load_patients(&self) -> Result<Vec<PatientRecord>, RepositoryError> {
        let blob = match &self.pool {
            Some(pool) => DatabaseStorage::get(pool, PATIENTS_STORAGE_KEY),
            None => self.storage.get(PATIENTS_STORAGE_KEY),
        }
        .map_err(|e| {
            error!("Failed to read patient list: {}", e);
            e
        })?;

        decode_patients(blob, &self.seed)
    }

    fn update_patients<T, F>(&self, change: F) -> Result<T, RepositoryError>
    where
        F: FnOnce(&mut Vec<PatientRecord>) -> Result<T, RepositoryError>,
    {
        let seed = &self.seed;
        let apply = |blob: Option<String>| -> Result<(String, T), RepositoryError> {
            let mut patients = decode_patients(blob, seed)?;
            let result = change(&mut patients)?;
            Ok((serde_json::to_string(&patients)?, result))
        };

        match &self.pool {
            Some(pool) => DatabaseStorage::update(pool, PATIENTS_STORAGE_KEY, apply),
            None => self.storage.update(PATIENTS_STORAGE_KEY, apply),
        }
    }
}

fn decode_patients(
    blob: Option<String>,
    seed: &[PatientRecord],
) -> Result<Vec<PatientRecord>, RepositoryError> {
    match blob {
        Some(json) => Ok(serde_json::from_str(&json)?),
        None => Ok(seed.to_vec()),
    }
}

#[async_trait]
impl PatientRepositoryTrait for PatientRepository {
    async fn create(&self, request: CreatePatientRequest) -> Result<PatientRecord, RepositoryError> {
        let record = PatientRecord {
            uuid: Ulid::new().to_string(),
            first_name: request.first_name,
            last_name: request.last_name,
            birth_date: request.birth_date,
            phone_number: request.phone_number,
            blood_type: request.blood_type,
            alergies: request.allergies,
            medical_conditions: request.medical_conditions,
            vital_signs: Vec::new(),
            notes: request.notes,
        };

        debug!("Storing patient: {}", record.uuid);
        let stored = self.update_patients(|patients| {
            patients.push(record.clone());
            Ok(record)
        })?;

        info!("Patient registered: {}", stored.uuid);
        Ok(stored)
    }

    async fn get_all(&self) -> Result<Vec<PatientRecord>, RepositoryError> {
        debug!("Getting all patients");
        self.load_patients()
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<PatientRecord>, RepositoryError> {
        debug!("Getting patient by ID: {}", id);
        let patients = self.load_patients()?;
        Ok(patients.into_iter().find(|p| p.uuid == id))
    }

    async fn append_vital_signs(
        &self,
        id: &str,
        reading: VitalSignsRecord,
    ) -> Result<PatientRecord, RepositoryError> {
        debug!("Appending vital signs for patient: {}", id);
        self.update_patients(|patients| {
            let patient = patients
                .iter_mut()
                .find(|p| p.uuid == id)
                .ok_or_else(|| RepositoryError::NotFound(id.to_string()))?;
            patient.vital_signs.push(reading);
            Ok(patient.clone())
        })
    }
}

/// Mock patient repository for testing
#[cfg(any(test, feature = "mock"))]
pub mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Mock implementation of PatientRepositoryTrait for testing
    #[derive(Default)]
    pub struct MockPatientRepository {
        patients: Mutex<Vec<PatientRecord>>,
        should_fail: bool,
    }

    impl MockPatientRepository {
        /// Create a new empty mock repository
        pub fn new() -> Self {
            Self::default()
        }

        /// Create a mock repository with predefined patients
        pub fn with_patients(patients: Vec<PatientRecord>) -> Self {
            Self {
                patients: Mutex::new(patients),
                should_fail: false,
            }
        }

        /// Make every operation fail with a lock error
        pub fn failing() -> Self {
            Self {
                patients: Mutex::new(Vec::new()),
                should_fail: true,
            }
        }

        fn check(&self) -> Result<(), RepositoryError> {
            if self.should_fail {
                Err(RepositoryError::Lock("mock is configured to fail".to_string()))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl PatientRepositoryTrait for MockPatientRepository {
        async fn create(&self, request: CreatePatientRequest) -> Result<PatientRecord, RepositoryError> {
            self.check()?;
            let record = PatientRecord {
                uuid: format!("mock-{}", self.patients.lock()?.len() + 1),
                first_name: request.first_name,
                last_name: request.last_name,
                birth_date: request.birth_date,
                phone_number: request.phone_number,
                blood_type: request.blood_type,
                alergies: request.allergies,
                medical_conditions: request.medical_conditions,
                vital_signs: Vec::new(),
                notes: request.notes,
            };
            self.patients.lock()?.push(record.clone());
            Ok(record)
        }

        async fn get_all(&self) -> Result<Vec<PatientRecord>, RepositoryError> {
            self.check()?;
            Ok(self.patients.lock()?.clone())
        }

        async fn get_by_id(&self, id: &str) -> Result<Option<PatientRecord>, RepositoryError> {
            self.check()?;
            Ok(self.patients.lock()?.iter().find(|p| p.uuid == id).cloned())
        }

        async fn append_vital_signs(
            &self,
            id: &str,
            reading: VitalSignsRecord,
        ) -> Result<PatientRecord, RepositoryError> {
            self.check()?;
            let mut patients = self.patients.lock()?;
            let patient = patients
                .iter_mut()
                .find(|p| p.uuid == id)
                .ok_or_else(|| RepositoryError::NotFound(id.to_string()))?;
            patient.vital_signs.push(reading);
            Ok(patient.clone())
        }
    }
}

#[cfg(test)]
mod repository_tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use crate::database::{initialize_database_pool, initialize_in_memory_sqlite_pool, DatabaseConfig};
    use crate::fixtures::demo_patients;
    use crate::models::VitalSignRecord;

    fn create_request(first_name: &str) -> CreatePatientRequest {
        CreatePatientRequest {
            first_name: first_name.to_string(),
            last_name: "Lopez".to_string(),
            birth_date: "1985-06-15".to_string(),
            phone_number: "5551234567".to_string(),
            blood_type: "O+".to_string(),
            allergies: vec![],
            medical_conditions: vec![],
            notes: String::new(),
        }
    }

    fn reading(bp: &str, minute: u32) -> VitalSignsRecord {
        VitalSignsRecord {
            vital_sign: VitalSignRecord {
                blood_pressure: bp.to_string(),
                temperature: "36.5".to_string(),
                heart_rate: "72".to_string(),
                respiratory_rate: "16".to_string(),
                spo2: "98".to_string(),
                pain: "0".to_string(),
            },
            time: Utc.with_ymd_and_hms(2025, 5, 19, 14, minute, 0).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_in_memory_repository_starts_empty() {
        let repo = PatientRepository::new();
        assert!(repo.get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_keeps_registration_order() {
        let repo = PatientRepository::new();
        let first = repo.create(create_request("Maria")).await.unwrap();
        let second = repo.create(create_request("Jose")).await.unwrap();
        assert_ne!(first.uuid, second.uuid);
        assert_eq!(first.uuid.len(), 26);
        assert!(first.uuid.parse::<Ulid>().is_ok());

        let all = repo.get_all().await.unwrap();
        let names: Vec<&str> = all.iter().map(|p| p.first_name.as_str()).collect();
        assert_eq!(names, vec!["Maria", "Jose"]);
    }

    #[tokio::test]
    async fn test_clones_share_storage() {
        let repo = PatientRepository::new();
        let clone = repo.clone();
        clone.create(create_request("Maria")).await.unwrap();
        assert_eq!(repo.get_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_seed_is_returned_until_first_write() {
        let repo = PatientRepository::new().with_seed(demo_patients());
        assert_eq!(repo.get_all().await.unwrap().len(), 2);

        let found = repo.get_by_id("01JVKSJB6XAZM0RKYAFJFWZKPT").await.unwrap();
        assert_eq!(found.unwrap().first_name, "Juan");

        repo.create(create_request("Maria")).await.unwrap();
        assert_eq!(repo.get_all().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_append_vital_signs_is_ordered() {
        let repo = PatientRepository::new();
        let patient = repo.create(create_request("Maria")).await.unwrap();

        repo.append_vital_signs(&patient.uuid, reading("120/80", 0)).await.unwrap();
        let updated = repo.append_vital_signs(&patient.uuid, reading("130/85", 5)).await.unwrap();

        assert_eq!(updated.vital_signs.len(), 2);
        assert_eq!(updated.vital_signs[0].vital_sign.blood_pressure, "120/80");
        assert_eq!(updated.vital_signs[1].vital_sign.blood_pressure, "130/85");
    }

    #[tokio::test]
    async fn test_append_to_unknown_patient() {
        let repo = PatientRepository::new();
        let result = repo.append_vital_signs("missing", reading("120/80", 0)).await;
        assert!(matches!(result, Err(RepositoryError::NotFound(id)) if id == "missing"));
    }

    #[tokio::test]
    async fn test_sqlite_repository_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let config = DatabaseConfig {
            sqlite_path: Some(dir.path().join("patients.db").to_string_lossy().to_string()),
            ..DatabaseConfig::default()
        };

        let pool = initialize_database_pool(&config).unwrap();
        let repo = PatientRepository::with_pool(pool.clone());
        let patient = repo.create(create_request("Maria")).await.unwrap();
        repo.append_vital_signs(&patient.uuid, reading("85/55", 0)).await.unwrap();

        let other = PatientRepository::with_pool(pool);
        let loaded = other.get_by_id(&patient.uuid).await.unwrap().unwrap();
        assert_eq!(loaded.vital_signs.len(), 1);
        assert_eq!(loaded.vital_signs[0].vital_sign.blood_pressure, "85/55");
    }

    #[tokio::test]
    async fn test_corrupt_blob_is_reported() {
        let pool = initialize_in_memory_sqlite_pool(&DatabaseConfig::default()).unwrap();
        DatabaseStorage::update(&pool, PATIENTS_STORAGE_KEY, |_| Ok(("not json".to_string(), ())))
            .unwrap();

        let repo = PatientRepository::with_pool(pool);
        assert!(matches!(repo.get_all().await, Err(RepositoryError::Serialization(_))));
    }

    #[tokio::test]
    async fn test_concurrent_appends_are_not_lost() {
        let repo = PatientRepository::new();
        let patient = repo.create(create_request("Maria")).await.unwrap();

        let mut handles = Vec::new();
        for minute in 0..10 {
            let repo = repo.clone();
            let id = patient.uuid.clone();
            handles.push(tokio::spawn(async move {
                repo.append_vital_signs(&id, reading("120/80", minute)).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let loaded = repo.get_by_id(&patient.uuid).await.unwrap().unwrap();
        assert_eq!(loaded.vital_signs.len(), 10);
    }
}
