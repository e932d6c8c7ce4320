use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

/// Storage model for an allergy entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllergyRecord {
    /// Allergen name
    pub name: String,

    /// Free-text details (reaction, severity)
    #[serde(default)]
    pub additional_info: String,
}

/// Storage model for a medical condition entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicalConditionRecord {
    /// Condition name
    pub name: String,

    /// Free-text details
    #[serde(default)]
    pub additional_info: String,
}

/// Raw vital-sign values exactly as they were entered
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VitalSignRecord {
    pub blood_pressure: String,
    pub temperature: String,
    pub heart_rate: String,
    pub respiratory_rate: String,
    pub spo2: String,
    pub pain: String,
}

/// One timestamped set of vital signs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VitalSignsRecord {
    pub vital_sign: VitalSignRecord,
    pub time: DateTime<Utc>,
}

/// Storage model for a patient.
///
/// Field names follow the JSON blob layout of the `patients` key, so a
/// stored list stays readable by older clients of the same key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientRecord {
    /// Opaque patient identifier, the value encoded in the QR payload
    pub uuid: String,
    pub first_name: String,
    pub last_name: String,
    /// Birth date as `YYYY-MM-DD`
    pub birth_date: String,
    pub phone_number: String,
    /// One of `A+`, `A-`, `B+`, `B-`, `AB+`, `AB-`, `O+`, `O-`
    pub blood_type: String,
    #[serde(default)]
    pub alergies: Vec<AllergyRecord>,
    #[serde(default)]
    pub medical_conditions: Vec<MedicalConditionRecord>,
    /// Append-only, oldest first
    #[serde(default)]
    pub vital_signs: Vec<VitalSignsRecord>,
    #[serde(default)]
    pub notes: String,
}

/// Input data for registering a new patient
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePatientRequest {
    pub first_name: String,
    pub last_name: String,
    pub birth_date: String,
    pub phone_number: String,
    pub blood_type: String,
    pub allergies: Vec<AllergyRecord>,
    pub medical_conditions: Vec<MedicalConditionRecord>,
    pub notes: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patient_record_uses_blob_field_names() {
        let record = PatientRecord {
            uuid: "01JVKSJB6XAZM0RKYAFJFWZKPT".to_string(),
            first_name: "Juan".to_string(),
            last_name: "Perez".to_string(),
            birth_date: "1990-08-21".to_string(),
            phone_number: "8183017441".to_string(),
            blood_type: "A+".to_string(),
            alergies: vec![AllergyRecord {
                name: "Penicilina".to_string(),
                additional_info: String::new(),
            }],
            medical_conditions: vec![],
            vital_signs: vec![],
            notes: String::new(),
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["firstName"], "Juan");
        assert_eq!(json["bloodType"], "A+");
        assert_eq!(json["alergies"][0]["additionalInfo"], "");
        assert!(json.get("medicalConditions").is_some());
        assert!(json.get("vitalSigns").is_some());
    }

    #[test]
    fn test_missing_collections_default_to_empty() {
        let json = r#"{
            "uuid": "abc",
            "firstName": "Ana",
            "lastName": "Ruiz",
            "birthDate": "2000-01-01",
            "phoneNumber": "555",
            "bloodType": "O-"
        }"#;

        let record: PatientRecord = serde_json::from_str(json).unwrap();
        assert!(record.alergies.is_empty());
        assert!(record.medical_conditions.is_empty());
        assert!(record.vital_signs.is_empty());
        assert_eq!(record.notes, "");
    }

    #[test]
    fn test_vital_signs_record_layout() {
        let json = r#"{
            "vitalSign": {
                "bloodPressure": "120/80",
                "temperature": "36.5",
                "heartRate": "72",
                "respiratoryRate": "16",
                "spo2": "98",
                "pain": "0"
            },
            "time": "2025-05-19T14:30:00Z"
        }"#;

        let record: VitalSignsRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.vital_sign.blood_pressure, "120/80");
        assert_eq!(record.vital_sign.pain, "0");
        assert_eq!(record.time.to_rfc3339(), "2025-05-19T14:30:00+00:00");
    }
}
