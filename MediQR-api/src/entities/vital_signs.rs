use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use mediqr_domain::entities::vital_signs::{
    RecordVitalSignsRequest as DomainRecordVitalSignsRequest, VitalSign, VitalSignsAssessment, VitalSignsReading,
};
use mediqr_domain::services::evaluator::assess_vital_signs;
use mediqr_domain::services::history::VitalSignsChartPoint;

/// A recorded reading with its evaluation
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PublicVitalSignsReading {
    /// When the reading was taken
    pub time: DateTime<Utc>,

    /// Values as they were entered
    pub values: VitalSign,

    pub assessment: VitalSignsAssessment,
}

/// Request payload for recording vital signs.
///
/// Missing fields are treated as empty and rejected by validation.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RecordVitalSignsRequest {
    /// Systolic/diastolic, e.g. `120/80`
    #[serde(default)]
    pub blood_pressure: String,

    /// °C
    #[serde(default)]
    pub temperature: String,

    /// Beats per minute
    #[serde(default)]
    pub heart_rate: String,

    /// Breaths per minute
    #[serde(default)]
    pub respiratory_rate: String,

    /// Oxygen saturation, %
    #[serde(default)]
    pub spo2: String,

    /// 0–10
    #[serde(default)]
    pub pain: String,

    /// When the reading was taken. Defaults to current time if not provided.
    pub time: Option<DateTime<Utc>>,
}

/// A patient's full reading history
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VitalSignsHistoryResponse {
    pub patient_id: String,

    /// Oldest first
    pub readings: Vec<PublicVitalSignsReading>,

    /// One point per reading, same order
    pub chart: Vec<VitalSignsChartPoint>,
}

/// Values to evaluate without storing them
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct EvaluateQueryParams {
    /// Systolic/diastolic, e.g. `120/80`
    pub blood_pressure: Option<String>,
    pub temperature: Option<String>,
    pub heart_rate: Option<String>,
    pub respiratory_rate: Option<String>,
    pub spo2: Option<String>,
    pub pain: Option<String>,
}

impl EvaluateQueryParams {
    pub fn vital_sign(self) -> VitalSign {
        VitalSign {
            blood_pressure: self.blood_pressure.unwrap_or_default(),
            temperature: self.temperature.unwrap_or_default(),
            heart_rate: self.heart_rate.unwrap_or_default(),
            respiratory_rate: self.respiratory_rate.unwrap_or_default(),
            spo2: self.spo2.unwrap_or_default(),
            pain: self.pain.unwrap_or_default(),
        }
    }
}

pub fn convert_to_public_reading(reading: VitalSignsReading) -> PublicVitalSignsReading {
    let assessment = assess_vital_signs(&reading.vital_sign);
    PublicVitalSignsReading {
        time: reading.time,
        values: reading.vital_sign,
        assessment,
    }
}

pub fn convert_to_domain_vital_signs_request(request: RecordVitalSignsRequest) -> DomainRecordVitalSignsRequest {
    DomainRecordVitalSignsRequest {
        blood_pressure: request.blood_pressure,
        temperature: request.temperature,
        heart_rate: request.heart_rate,
        respiratory_rate: request.respiratory_rate,
        spo2: request.spo2,
        pain: request.pain,
        time: request.time,
    }
}
