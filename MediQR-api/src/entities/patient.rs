use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use mediqr_domain::entities::patient::{
    Allergy, BloodType, CreatePatientRequest as DomainCreatePatientRequest, MedicalCondition, Patient,
};

use super::vital_signs::{convert_to_public_reading, PublicVitalSignsReading};

/// Allergy or medical condition entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PublicHealthNote {
    pub name: String,

    #[serde(default)]
    pub additional_info: String,
}

/// Patient as listed in the patient table
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PatientSummary {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: String,
    /// `A+`, `O-`, ...
    pub blood_type: String,
    /// Text to encode in the patient's QR code
    pub qr_payload: String,
    pub vital_signs_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_reading_at: Option<DateTime<Utc>>,
}

/// Full patient record with the latest reading evaluated
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PatientDetail {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: String,
    pub phone_number: String,
    pub blood_type: String,
    pub allergies: Vec<PublicHealthNote>,
    pub medical_conditions: Vec<PublicHealthNote>,
    pub notes: String,
    pub qr_payload: String,
    pub vital_signs_count: usize,
    /// Absent until the first reading is recorded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_vital_signs: Option<PublicVitalSignsReading>,
}

/// Request payload for registering a patient
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreatePatientRequest {
    pub first_name: String,
    pub last_name: String,
    /// `YYYY-MM-DD`
    pub birth_date: String,
    pub phone_number: String,
    /// One of `A+`, `A-`, `B+`, `B-`, `AB+`, `AB-`, `O+`, `O-`
    pub blood_type: String,
    #[serde(default)]
    pub allergies: Vec<PublicHealthNote>,
    #[serde(default)]
    pub medical_conditions: Vec<PublicHealthNote>,
    #[serde(default)]
    pub notes: String,
}

/// Scanned QR code contents
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ScanRequest {
    pub payload: String,
}

pub fn convert_to_public_summary(patient: &Patient, qr_payload: String) -> PatientSummary {
    PatientSummary {
        id: patient.id.clone(),
        first_name: patient.first_name.clone(),
        last_name: patient.last_name.clone(),
        birth_date: patient.birth_date.clone(),
        blood_type: patient.blood_type.to_string(),
        qr_payload,
        vital_signs_count: patient.vital_signs.len(),
        last_reading_at: patient.latest_vital_signs().map(|r| r.time),
    }
}

pub fn convert_to_public_detail(patient: Patient, qr_payload: String) -> PatientDetail {
    let vital_signs_count = patient.vital_signs.len();
    let latest_vital_signs = patient.vital_signs.last().cloned().map(convert_to_public_reading);

    PatientDetail {
        id: patient.id,
        first_name: patient.first_name,
        last_name: patient.last_name,
        birth_date: patient.birth_date,
        phone_number: patient.phone_number,
        blood_type: patient.blood_type.to_string(),
        allergies: patient
            .allergies
            .into_iter()
            .map(|a| PublicHealthNote {
                name: a.name,
                additional_info: a.additional_info,
            })
            .collect(),
        medical_conditions: patient
            .medical_conditions
            .into_iter()
            .map(|c| PublicHealthNote {
                name: c.name,
                additional_info: c.additional_info,
            })
            .collect(),
        notes: patient.notes,
        qr_payload,
        vital_signs_count,
        latest_vital_signs,
    }
}

/// Convert a public request into the domain request.
///
/// Fails when the blood type is not one of the eight known groups.
pub fn convert_to_domain_create_request(request: CreatePatientRequest) -> Result<DomainCreatePatientRequest, String> {
    let blood_type = request.blood_type.parse::<BloodType>()?;

    Ok(DomainCreatePatientRequest {
        first_name: request.first_name,
        last_name: request.last_name,
        birth_date: request.birth_date,
        phone_number: request.phone_number,
        blood_type,
        allergies: request
            .allergies
            .into_iter()
            .map(|a| Allergy {
                name: a.name,
                additional_info: a.additional_info,
            })
            .collect(),
        medical_conditions: request
            .medical_conditions
            .into_iter()
            .map(|c| MedicalCondition {
                name: c.name,
                additional_info: c.additional_info,
            })
            .collect(),
        notes: request.notes,
    })
}
