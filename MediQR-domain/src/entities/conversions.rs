use mediqr_data::models::{
    AllergyRecord, CreatePatientRequest as DataCreatePatientRequest, MedicalConditionRecord, PatientRecord,
    VitalSignRecord, VitalSignsRecord,
};

use crate::entities::patient::{Allergy, BloodType, CreatePatientRequest, MedicalCondition, Patient};
use crate::entities::vital_signs::{VitalSign, VitalSignsReading};

// Conversion functions between domain entities and data models,
// named convert_to_[target_layer]_[model_name]

/// Convert a stored patient into the domain entity.
///
/// Fails when the stored blood type is not one of the eight known groups.
pub fn convert_to_domain_patient(record: PatientRecord) -> Result<Patient, String> {
    let blood_type = record.blood_type.parse::<BloodType>()?;

    Ok(Patient {
        id: record.uuid,
        first_name: record.first_name,
        last_name: record.last_name,
        birth_date: record.birth_date,
        phone_number: record.phone_number,
        blood_type,
        allergies: record
            .alergies
            .into_iter()
            .map(|a| Allergy {
                name: a.name,
                additional_info: a.additional_info,
            })
            .collect(),
        medical_conditions: record
            .medical_conditions
            .into_iter()
            .map(|c| MedicalCondition {
                name: c.name,
                additional_info: c.additional_info,
            })
            .collect(),
        vital_signs: record.vital_signs.into_iter().map(convert_to_domain_reading).collect(),
        notes: record.notes,
    })
}

pub fn convert_to_domain_reading(record: VitalSignsRecord) -> VitalSignsReading {
    let v = record.vital_sign;
    VitalSignsReading {
        vital_sign: VitalSign {
            blood_pressure: v.blood_pressure,
            temperature: v.temperature,
            heart_rate: v.heart_rate,
            respiratory_rate: v.respiratory_rate,
            spo2: v.spo2,
            pain: v.pain,
        },
        time: record.time,
    }
}

pub fn convert_to_data_reading(reading: &VitalSignsReading) -> VitalSignsRecord {
    let v = &reading.vital_sign;
    VitalSignsRecord {
        vital_sign: VitalSignRecord {
            blood_pressure: v.blood_pressure.clone(),
            temperature: v.temperature.clone(),
            heart_rate: v.heart_rate.clone(),
            respiratory_rate: v.respiratory_rate.clone(),
            spo2: v.spo2.clone(),
            pain: v.pain.clone(),
        },
        time: reading.time,
    }
}

pub fn convert_to_data_create_request(request: &CreatePatientRequest) -> DataCreatePatientRequest {
    DataCreatePatientRequest {
        first_name: request.first_name.clone(),
        last_name: request.last_name.clone(),
        birth_date: request.birth_date.clone(),
        phone_number: request.phone_number.clone(),
        blood_type: request.blood_type.as_str().to_string(),
        allergies: request
            .allergies
            .iter()
            .map(|a| AllergyRecord {
                name: a.name.clone(),
                additional_info: a.additional_info.clone(),
            })
            .collect(),
        medical_conditions: request
            .medical_conditions
            .iter()
            .map(|c| MedicalConditionRecord {
                name: c.name.clone(),
                additional_info: c.additional_info.clone(),
            })
            .collect(),
        notes: request.notes.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_fixture_patients_convert() {
        let patients: Vec<Patient> = mediqr_data::fixtures::demo_patients()
            .into_iter()
            .map(|record| convert_to_domain_patient(record).unwrap())
            .collect();

        assert_eq!(patients[0].id, "01JVKSJB6XAZM0RKYAFJFWZKPT");
        assert_eq!(patients[0].blood_type, BloodType::APositive);
        assert_eq!(patients[1].blood_type, BloodType::ONegative);
    }

    #[test]
    fn test_unknown_blood_type_is_rejected() {
        let mut record = mediqr_data::fixtures::demo_patients().remove(0);
        record.blood_type = "XY".to_string();
        assert!(convert_to_domain_patient(record).is_err());
    }

    #[test]
    fn test_reading_conversion_keeps_raw_text() {
        let reading = VitalSignsReading {
            vital_sign: VitalSign {
                blood_pressure: "120/80".to_string(),
                temperature: "38.0°C".to_string(),
                ..VitalSign::default()
            },
            time: Utc::now(),
        };

        let record = convert_to_data_reading(&reading);
        assert_eq!(record.vital_sign.temperature, "38.0°C");
        assert_eq!(convert_to_domain_reading(record), reading);
    }

    #[test]
    fn test_create_request_uses_blood_type_symbol() {
        let request = CreatePatientRequest {
            first_name: "Ana".to_string(),
            last_name: "López".to_string(),
            birth_date: "1985-01-02".to_string(),
            phone_number: "555".to_string(),
            blood_type: BloodType::AbPositive,
            allergies: vec![Allergy {
                name: "Latex".to_string(),
                additional_info: String::new(),
            }],
            medical_conditions: vec![],
            notes: String::new(),
        };

        let data = convert_to_data_create_request(&request);
        assert_eq!(data.blood_type, "AB+");
        assert_eq!(data.allergies[0].name, "Latex");
    }
}
