//! Demo patients used to seed an empty patient store.

use crate::models::PatientRecord;

/// The two demo patients a fresh installation starts with
pub fn demo_patients() -> Vec<PatientRecord> {
    vec![
        PatientRecord {
            uuid: "01JVKSJB6XAZM0RKYAFJFWZKPT".to_string(),
            first_name: "Juan".to_string(),
            last_name: "Perez".to_string(),
            birth_date: "1990-08-21".to_string(),
            phone_number: "8183017441".to_string(),
            blood_type: "A+".to_string(),
            alergies: vec![],
            medical_conditions: vec![],
            vital_signs: vec![],
            notes: String::new(),
        },
        PatientRecord {
            uuid: "01JVKSJGWABT7E82NWA0PRYG1P".to_string(),
            first_name: "Emilio".to_string(),
            last_name: "González Rodríguez".to_string(),
            birth_date: "2001-12-27".to_string(),
            phone_number: "812419467".to_string(),
            blood_type: "O-".to_string(),
            alergies: vec![],
            medical_conditions: vec![],
            vital_signs: vec![],
            notes: String::new(),
        },
    ]
}
