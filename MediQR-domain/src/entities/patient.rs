use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::vital_signs::VitalSignsReading;

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

/// ABO/Rh blood group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub enum BloodType {
    #[serde(rename = "A+")]
    APositive,
    #[serde(rename = "A-")]
    ANegative,
    #[serde(rename = "B+")]
    BPositive,
    #[serde(rename = "B-")]
    BNegative,
    #[serde(rename = "AB+")]
    AbPositive,
    #[serde(rename = "AB-")]
    AbNegative,
    #[serde(rename = "O+")]
    OPositive,
    #[serde(rename = "O-")]
    ONegative,
}

impl BloodType {
    pub const ALL: [BloodType; 8] = [
        BloodType::APositive,
        BloodType::ANegative,
        BloodType::BPositive,
        BloodType::BNegative,
        BloodType::AbPositive,
        BloodType::AbNegative,
        BloodType::OPositive,
        BloodType::ONegative,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BloodType::APositive => "A+",
            BloodType::ANegative => "A-",
            BloodType::BPositive => "B+",
            BloodType::BNegative => "B-",
            BloodType::AbPositive => "AB+",
            BloodType::AbNegative => "AB-",
            BloodType::OPositive => "O+",
            BloodType::ONegative => "O-",
        }
    }
}

impl FromStr for BloodType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BloodType::ALL
            .into_iter()
            .find(|blood_type| blood_type.as_str() == s)
            .ok_or_else(|| format!("Unknown blood type: {}", s))
    }
}

impl fmt::Display for BloodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Allergy entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct Allergy {
    #[validate(length(min = 1, message = "Allergy name is required"))]
    pub name: String,

    #[serde(default)]
    pub additional_info: String,
}

/// Pre-existing medical condition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct MedicalCondition {
    #[validate(length(min = 1, message = "Condition name is required"))]
    pub name: String,

    #[serde(default)]
    pub additional_info: String,
}

/// Patient with their full vital-sign history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct Patient {
    /// Identifier encoded in the patient's QR payload
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    /// `YYYY-MM-DD`
    pub birth_date: String,
    pub phone_number: String,
    pub blood_type: BloodType,
    pub allergies: Vec<Allergy>,
    pub medical_conditions: Vec<MedicalCondition>,
    /// Oldest first
    pub vital_signs: Vec<VitalSignsReading>,
    pub notes: String,
}

impl Patient {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Most recently appended reading
    pub fn latest_vital_signs(&self) -> Option<&VitalSignsReading> {
        self.vital_signs.last()
    }
}

/// Request payload for registering a patient
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct CreatePatientRequest {
    #[validate(length(min = 1, message = "First name is required"), custom = "validate_not_blank")]
    pub first_name: String,

    #[validate(length(min = 1, message = "Last name is required"), custom = "validate_not_blank")]
    pub last_name: String,

    /// `YYYY-MM-DD`
    #[validate(custom = "validate_birth_date")]
    pub birth_date: String,

    #[validate(length(min = 1, message = "Phone number is required"), custom = "validate_not_blank")]
    pub phone_number: String,

    pub blood_type: BloodType,

    #[serde(default)]
    pub allergies: Vec<Allergy>,

    #[serde(default)]
    pub medical_conditions: Vec<MedicalCondition>,

    #[serde(default)]
    pub notes: String,
}

/// Empty values are left to the length rule
fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || !value.trim().is_empty() {
        return Ok(());
    }

    let mut error = ValidationError::new("blank");
    error.message = Some("Must not be blank".into());
    Err(error)
}

fn validate_birth_date(value: &str) -> Result<(), ValidationError> {
    if NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok() {
        return Ok(());
    }

    let mut error = ValidationError::new("birth_date");
    error.message = Some(if value.is_empty() {
        "Birth date is required".into()
    } else {
        "Birth date must use the YYYY-MM-DD format".into()
    });
    Err(error)
}
