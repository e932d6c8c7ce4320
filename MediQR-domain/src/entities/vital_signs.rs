use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::Validate;

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

/// Blood pressure as entered: 2–3 ASCII digits, a slash, 2–3 ASCII digits.
/// No surrounding whitespace is accepted.
pub static BLOOD_PRESSURE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{2,3}/[0-9]{2,3}$").expect("blood pressure pattern is valid"));

/// Label shown when a value has no classification
pub const UNCLASSIFIABLE_LABEL: &str = "-";

/// Raw vital-sign values, kept as the text that was entered
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct VitalSign {
    /// Systolic/diastolic in mmHg, e.g. `120/80`
    pub blood_pressure: String,

    /// Body temperature in °C
    pub temperature: String,

    /// Heart rate in beats per minute
    pub heart_rate: String,

    /// Respiratory rate in breaths per minute
    pub respiratory_rate: String,

    /// Oxygen saturation in percent
    pub spo2: String,

    /// Self-reported pain score, 0–10
    pub pain: String,
}

/// One timestamped set of vital signs. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct VitalSignsReading {
    pub vital_sign: VitalSign,

    /// When the reading was taken
    pub time: DateTime<Utc>,
}

/// Request payload for recording a new reading
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct RecordVitalSignsRequest {
    #[validate(regex(
        path = "BLOOD_PRESSURE_RE",
        message = "Blood pressure must use the S/D format, for example 120/80"
    ))]
    pub blood_pressure: String,

    #[validate(length(min = 1, message = "Temperature is required"))]
    pub temperature: String,

    #[validate(length(min = 1, message = "Heart rate is required"))]
    pub heart_rate: String,

    #[validate(length(min = 1, message = "Respiratory rate is required"))]
    pub respiratory_rate: String,

    #[validate(length(min = 1, message = "Oxygen saturation is required"))]
    pub spo2: String,

    #[validate(length(min = 1, message = "Pain score is required"))]
    pub pain: String,

    /// When the reading was taken. Defaults to current time if not provided.
    pub time: Option<DateTime<Utc>>,
}

impl RecordVitalSignsRequest {
    /// The raw values carried by this request
    pub fn vital_sign(&self) -> VitalSign {
        VitalSign {
            blood_pressure: self.blood_pressure.clone(),
            temperature: self.temperature.clone(),
            heart_rate: self.heart_rate.clone(),
            respiratory_rate: self.respiratory_rate.clone(),
            spo2: self.spo2.clone(),
            pain: self.pain.clone(),
        }
    }
}

/// A blood pressure value that matched the `S/D` pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BloodPressure {
    /// Systolic pressure (the higher number)
    pub systolic: u16,

    /// Diastolic pressure (the lower number)
    pub diastolic: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid blood pressure '{0}', expected S/D such as 120/80")]
pub struct InvalidBloodPressure(pub String);

impl FromStr for BloodPressure {
    type Err = InvalidBloodPressure;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !BLOOD_PRESSURE_RE.is_match(s) {
            return Err(InvalidBloodPressure(s.to_string()));
        }

        let (systolic, diastolic) = s
            .split_once('/')
            .ok_or_else(|| InvalidBloodPressure(s.to_string()))?;

        Ok(BloodPressure {
            systolic: systolic.parse().map_err(|_| InvalidBloodPressure(s.to_string()))?,
            diastolic: diastolic.parse().map_err(|_| InvalidBloodPressure(s.to_string()))?,
        })
    }
}

impl fmt::Display for BloodPressure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.systolic, self.diastolic)
    }
}

/// How a label is presented next to its value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum DisplayStatus {
    /// Within the normal band
    Normal,
    /// Needs attention
    Warning,
    /// Classified, shown without emphasis
    Neutral,
    /// No classification applies
    Unclassified,
}

/// Closed set of labels for one vital-sign field
pub trait ClinicalCategory: Copy {
    /// Display label, `-` when unclassifiable
    fn label(&self) -> &'static str;

    /// Presentation of the label
    fn status(&self) -> DisplayStatus;

    fn is_classified(&self) -> bool {
        self.status() != DisplayStatus::Unclassified
    }
}

/// Blood pressure category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BloodPressureCategory {
    /// Systolic < 90 or diastolic < 60
    Hypotension,
    /// Systolic 140–159 or diastolic 90–99
    HypertensionGrade1,
    /// Systolic ≥ 160 or diastolic ≥ 100
    HypertensionGrade2,
    /// Systolic 90–120 and diastolic 60–80
    Normal,
    Unclassifiable,
}

impl ClinicalCategory for BloodPressureCategory {
    fn label(&self) -> &'static str {
        match self {
            BloodPressureCategory::Hypotension => "Hypotension",
            BloodPressureCategory::HypertensionGrade1 => "Hypertension grade 1",
            BloodPressureCategory::HypertensionGrade2 => "Hypertension grade 2",
            BloodPressureCategory::Normal => "Normal",
            BloodPressureCategory::Unclassifiable => UNCLASSIFIABLE_LABEL,
        }
    }

    fn status(&self) -> DisplayStatus {
        match self {
            BloodPressureCategory::Normal => DisplayStatus::Normal,
            BloodPressureCategory::Unclassifiable => DisplayStatus::Unclassified,
            _ => DisplayStatus::Warning,
        }
    }
}

/// Body temperature category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemperatureCategory {
    Hypothermia,
    Normal,
    Fever,
    SevereHyperthermia,
    Subfebrile,
    Unclassifiable,
}

impl ClinicalCategory for TemperatureCategory {
    fn label(&self) -> &'static str {
        match self {
            TemperatureCategory::Hypothermia => "Hypothermia",
            TemperatureCategory::Normal => "Normal",
            TemperatureCategory::Fever => "Fever",
            TemperatureCategory::SevereHyperthermia => "Severe hyperthermia",
            TemperatureCategory::Subfebrile => "Subfebrile",
            TemperatureCategory::Unclassifiable => UNCLASSIFIABLE_LABEL,
        }
    }

    fn status(&self) -> DisplayStatus {
        match self {
            TemperatureCategory::Normal => DisplayStatus::Normal,
            TemperatureCategory::Unclassifiable => DisplayStatus::Unclassified,
            _ => DisplayStatus::Warning,
        }
    }
}

/// Heart rate category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeartRateCategory {
    Bradycardia,
    Normal,
    Tachycardia,
    Unclassifiable,
}

impl ClinicalCategory for HeartRateCategory {
    fn label(&self) -> &'static str {
        match self {
            HeartRateCategory::Bradycardia => "Bradycardia",
            HeartRateCategory::Normal => "Normal",
            HeartRateCategory::Tachycardia => "Tachycardia",
            HeartRateCategory::Unclassifiable => UNCLASSIFIABLE_LABEL,
        }
    }

    fn status(&self) -> DisplayStatus {
        match self {
            HeartRateCategory::Normal => DisplayStatus::Normal,
            HeartRateCategory::Unclassifiable => DisplayStatus::Unclassified,
            _ => DisplayStatus::Warning,
        }
    }
}

/// Respiratory rate category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RespiratoryRateCategory {
    Bradypnea,
    Normal,
    Tachypnea,
    Unclassifiable,
}

impl ClinicalCategory for RespiratoryRateCategory {
    fn label(&self) -> &'static str {
        match self {
            RespiratoryRateCategory::Bradypnea => "Bradypnea",
            RespiratoryRateCategory::Normal => "Normal",
            RespiratoryRateCategory::Tachypnea => "Tachypnea",
            RespiratoryRateCategory::Unclassifiable => UNCLASSIFIABLE_LABEL,
        }
    }

    fn status(&self) -> DisplayStatus {
        match self {
            RespiratoryRateCategory::Normal => DisplayStatus::Normal,
            RespiratoryRateCategory::Unclassifiable => DisplayStatus::Unclassified,
            _ => DisplayStatus::Warning,
        }
    }
}

/// Oxygen saturation category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Spo2Category {
    Hypoxemia,
    MildlyLow,
    Normal,
    Unclassifiable,
}

impl ClinicalCategory for Spo2Category {
    fn label(&self) -> &'static str {
        match self {
            Spo2Category::Hypoxemia => "Hypoxemia",
            Spo2Category::MildlyLow => "Mildly low",
            Spo2Category::Normal => "Normal",
            Spo2Category::Unclassifiable => UNCLASSIFIABLE_LABEL,
        }
    }

    fn status(&self) -> DisplayStatus {
        match self {
            Spo2Category::Normal => DisplayStatus::Normal,
            Spo2Category::Unclassifiable => DisplayStatus::Unclassified,
            _ => DisplayStatus::Warning,
        }
    }
}

/// Pain score category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PainCategory {
    NoPain,
    MildPain,
    ModeratePain,
    SeverePain,
    Unclassifiable,
}

impl ClinicalCategory for PainCategory {
    fn label(&self) -> &'static str {
        match self {
            PainCategory::NoPain => "No pain",
            PainCategory::MildPain => "Mild pain",
            PainCategory::ModeratePain => "Moderate pain",
            PainCategory::SeverePain => "Severe pain",
            PainCategory::Unclassifiable => UNCLASSIFIABLE_LABEL,
        }
    }

    // Only severe pain is flagged
    fn status(&self) -> DisplayStatus {
        match self {
            PainCategory::NoPain => DisplayStatus::Normal,
            PainCategory::SeverePain => DisplayStatus::Warning,
            PainCategory::MildPain | PainCategory::ModeratePain => DisplayStatus::Neutral,
            PainCategory::Unclassifiable => DisplayStatus::Unclassified,
        }
    }
}

macro_rules! display_as_label {
    ($($category:ty),*) => {
        $(
            impl fmt::Display for $category {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.label())
                }
            }
        )*
    };
}

display_as_label!(
    BloodPressureCategory,
    TemperatureCategory,
    HeartRateCategory,
    RespiratoryRateCategory,
    Spo2Category,
    PainCategory
);

/// Evaluation of a single field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct FieldAssessment {
    /// Raw value, absent when nothing was entered
    pub value: Option<String>,

    /// Category label, `-` when unclassifiable
    pub label: String,

    /// Warning flag, independent of the label
    pub out_of_range: bool,

    pub status: DisplayStatus,
}

/// Evaluation of every field of one reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct VitalSignsAssessment {
    pub blood_pressure: FieldAssessment,
    pub temperature: FieldAssessment,
    pub heart_rate: FieldAssessment,
    pub respiratory_rate: FieldAssessment,
    pub spo2: FieldAssessment,
    /// Pain has no range, `out_of_range` is always false
    pub pain: FieldAssessment,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> RecordVitalSignsRequest {
        RecordVitalSignsRequest {
            blood_pressure: "120/80".to_string(),
            temperature: "36.5".to_string(),
            heart_rate: "72".to_string(),
            respiratory_rate: "16".to_string(),
            spo2: "98".to_string(),
            pain: "0".to_string(),
            time: None,
        }
    }

    #[test]
    fn test_blood_pressure_from_str() {
        let bp: BloodPressure = "120/80".parse().unwrap();
        assert_eq!(bp, BloodPressure { systolic: 120, diastolic: 80 });
        assert_eq!(bp.to_string(), "120/80");

        assert!("99/999".parse::<BloodPressure>().is_ok());
        assert!("1200/80".parse::<BloodPressure>().is_err());
        assert!("120 / 80".parse::<BloodPressure>().is_err());
        assert!(" 120/80".parse::<BloodPressure>().is_err());
        assert!("120/80\n".parse::<BloodPressure>().is_err());
        assert!("120-80".parse::<BloodPressure>().is_err());
        // Non-ASCII digits are rejected
        assert!("١٢٠/٨٠".parse::<BloodPressure>().is_err());
    }

    #[test]
    fn test_unclassifiable_labels() {
        assert_eq!(BloodPressureCategory::Unclassifiable.to_string(), "-");
        assert_eq!(TemperatureCategory::Unclassifiable.label(), UNCLASSIFIABLE_LABEL);
        assert!(!PainCategory::Unclassifiable.is_classified());
        assert!(Spo2Category::MildlyLow.is_classified());
    }

    #[test]
    fn test_pain_status() {
        assert_eq!(PainCategory::NoPain.status(), DisplayStatus::Normal);
        assert_eq!(PainCategory::MildPain.status(), DisplayStatus::Neutral);
        assert_eq!(PainCategory::ModeratePain.status(), DisplayStatus::Neutral);
        assert_eq!(PainCategory::SeverePain.status(), DisplayStatus::Warning);
    }

    #[test]
    fn test_record_request_validation() {
        assert!(valid_request().validate().is_ok());

        let bad_bp = RecordVitalSignsRequest {
            blood_pressure: "120-80".to_string(),
            ..valid_request()
        };
        let errors = bad_bp.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("blood_pressure"));

        let missing_pain = RecordVitalSignsRequest {
            pain: String::new(),
            ..valid_request()
        };
        let errors = missing_pain.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("pain"));
    }

    #[test]
    fn test_validation_does_not_check_numbers() {
        // Only presence is required, values are classified later
        let request = RecordVitalSignsRequest {
            temperature: "abc".to_string(),
            ..valid_request()
        };
        assert!(request.validate().is_ok());
    }
}
