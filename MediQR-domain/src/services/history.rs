use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

use crate::entities::vital_signs::VitalSignsReading;

/// One point of the vital-sign history chart.
///
/// A value is `None` when the field is empty, zero or not a number, so the
/// chart leaves a gap instead of plotting it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct VitalSignsChartPoint {
    pub time: DateTime<Utc>,
    pub systolic: Option<f64>,
    pub diastolic: Option<f64>,
    pub temperature: Option<f64>,
    pub heart_rate: Option<f64>,
    pub respiratory_rate: Option<f64>,
    pub spo2: Option<f64>,
    pub pain: Option<f64>,
}

/// Convert a reading history into chart points, preserving order
pub fn chart_series(readings: &[VitalSignsReading]) -> Vec<VitalSignsChartPoint> {
    readings.iter().map(chart_point).collect()
}

fn chart_point(reading: &VitalSignsReading) -> VitalSignsChartPoint {
    let v = &reading.vital_sign;
    let mut bp = v.blood_pressure.split('/');

    VitalSignsChartPoint {
        time: reading.time,
        systolic: bp.next().and_then(plot_value),
        diastolic: bp.next().and_then(plot_value),
        temperature: plot_value(&v.temperature),
        heart_rate: plot_value(&v.heart_rate),
        respiratory_rate: plot_value(&v.respiratory_rate),
        spo2: plot_value(&v.spo2),
        pain: plot_value(&v.pain),
    }
}

/// Whole-string numeric conversion. Zero and non-numbers are dropped.
fn plot_value(text: &str) -> Option<f64> {
    let text = text.trim();

    let value = match text {
        "Infinity" | "+Infinity" => f64::INFINITY,
        "-Infinity" => f64::NEG_INFINITY,
        // Rules out "inf" and "nan", which are not plot values
        _ if text.bytes().all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-')) => {
            text.parse::<f64>().ok()?
        }
        _ => return None,
    };

    (value != 0.0 && !value.is_nan()).then_some(value)
}
