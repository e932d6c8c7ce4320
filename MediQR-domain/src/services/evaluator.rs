//! Vital-sign evaluation.
//!
//! Every field gets two independent answers: an out-of-range flag and a
//! category label. Absent, empty or unparseable input is never an error: the
//! flag is `false` and the category is `Unclassifiable`.
//!
//! Thresholds are illustrative only and have not been clinically validated.

use crate::entities::vital_signs::{
    BloodPressure, BloodPressureCategory, ClinicalCategory, FieldAssessment, HeartRateCategory,
    PainCategory, RespiratoryRateCategory, Spo2Category, TemperatureCategory, VitalSign,
    VitalSignsAssessment,
};

/// Parse the leading integer of `text`.
///
/// Leading whitespace is skipped, then an optional sign and the longest run
/// of ASCII digits. Anything after the digits is ignored, so `"72 bpm"` is 72
/// and `"3.7"` is 3. Values beyond `i64` saturate.
pub fn parse_leading_int(text: &str) -> Option<i64> {
    let s = text.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let mut value: i64 = 0;
    let mut seen_digit = false;
    for byte in digits.bytes().take_while(u8::is_ascii_digit) {
        seen_digit = true;
        let digit = i64::from(byte - b'0');
        value = if negative {
            value.saturating_mul(10).saturating_sub(digit)
        } else {
            value.saturating_mul(10).saturating_add(digit)
        };
    }

    seen_digit.then_some(value)
}

/// Parse the leading decimal number of `text`.
///
/// Accepts an optional sign, digits with an optional fraction and exponent,
/// or `Infinity`. Trailing text is ignored: `"38.0°C"` is 38.0, `".5"` is 0.5.
pub fn parse_leading_float(text: &str) -> Option<f64> {
    let s = text.trim_start();
    let bytes = s.as_bytes();

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    if s[end..].starts_with("Infinity") {
        return Some(if s.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        });
    }

    let count_digits = |from: usize| bytes[from.min(bytes.len())..].iter().take_while(|b| b.is_ascii_digit()).count();

    let int_digits = count_digits(end);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(end + 1);
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }

    if int_digits == 0 && frac_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_digits = count_digits(exp);
        if exp_digits > 0 {
            end = exp + exp_digits;
        }
    }

    s[..end].parse::<f64>().ok()
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn parse_blood_pressure(value: Option<&str>) -> Option<BloodPressure> {
    present(value)?.parse().ok()
}

fn parse_temperature(value: Option<&str>) -> Option<f64> {
    present(value).and_then(parse_leading_float)
}

fn parse_integer(value: Option<&str>) -> Option<i64> {
    present(value).and_then(parse_leading_int)
}

// Blood pressure

pub fn blood_pressure_out_of_range(systolic: u16, diastolic: u16) -> bool {
    systolic < 90 || diastolic < 60 || systolic >= 140 || diastolic >= 90 || systolic > 139 || diastolic > 89
}

pub fn categorize_blood_pressure(systolic: u16, diastolic: u16) -> BloodPressureCategory {
    if systolic < 90 || diastolic < 60 {
        BloodPressureCategory::Hypotension
    } else if (140..=159).contains(&systolic) || (90..=99).contains(&diastolic) {
        BloodPressureCategory::HypertensionGrade1
    } else if systolic >= 160 || diastolic >= 100 {
        BloodPressureCategory::HypertensionGrade2
    } else if (90..=120).contains(&systolic) && (60..=80).contains(&diastolic) {
        BloodPressureCategory::Normal
    } else {
        BloodPressureCategory::Unclassifiable
    }
}

pub fn is_blood_pressure_out_of_range(value: Option<&str>) -> bool {
    parse_blood_pressure(value).is_some_and(|bp| blood_pressure_out_of_range(bp.systolic, bp.diastolic))
}

pub fn classify_blood_pressure(value: Option<&str>) -> BloodPressureCategory {
    parse_blood_pressure(value).map_or(BloodPressureCategory::Unclassifiable, |bp| {
        categorize_blood_pressure(bp.systolic, bp.diastolic)
    })
}

// Temperature

pub fn temperature_out_of_range(celsius: f64) -> bool {
    celsius < 35.0 || celsius > 37.5
}

pub fn categorize_temperature(celsius: f64) -> TemperatureCategory {
    if celsius < 35.0 {
        TemperatureCategory::Hypothermia
    } else if (36.0..=37.2).contains(&celsius) {
        TemperatureCategory::Normal
    } else if celsius > 37.5 && celsius <= 40.0 {
        TemperatureCategory::Fever
    } else if celsius > 40.0 {
        TemperatureCategory::SevereHyperthermia
    } else if celsius > 37.2 && celsius <= 37.5 {
        TemperatureCategory::Subfebrile
    } else {
        TemperatureCategory::Unclassifiable
    }
}

pub fn is_temperature_out_of_range(value: Option<&str>) -> bool {
    parse_temperature(value).is_some_and(temperature_out_of_range)
}

pub fn classify_temperature(value: Option<&str>) -> TemperatureCategory {
    parse_temperature(value).map_or(TemperatureCategory::Unclassifiable, categorize_temperature)
}

// Heart rate

pub fn heart_rate_out_of_range(bpm: i64) -> bool {
    !(60..=100).contains(&bpm)
}

pub fn categorize_heart_rate(bpm: i64) -> HeartRateCategory {
    match bpm {
        i64::MIN..=59 => HeartRateCategory::Bradycardia,
        60..=100 => HeartRateCategory::Normal,
        _ => HeartRateCategory::Tachycardia,
    }
}

pub fn is_heart_rate_out_of_range(value: Option<&str>) -> bool {
    parse_integer(value).is_some_and(heart_rate_out_of_range)
}

pub fn classify_heart_rate(value: Option<&str>) -> HeartRateCategory {
    parse_integer(value).map_or(HeartRateCategory::Unclassifiable, categorize_heart_rate)
}

// Respiratory rate

pub fn respiratory_rate_out_of_range(breaths: i64) -> bool {
    !(12..=20).contains(&breaths)
}

pub fn categorize_respiratory_rate(breaths: i64) -> RespiratoryRateCategory {
    match breaths {
        i64::MIN..=11 => RespiratoryRateCategory::Bradypnea,
        12..=20 => RespiratoryRateCategory::Normal,
        _ => RespiratoryRateCategory::Tachypnea,
    }
}

pub fn is_respiratory_rate_out_of_range(value: Option<&str>) -> bool {
    parse_integer(value).is_some_and(respiratory_rate_out_of_range)
}

pub fn classify_respiratory_rate(value: Option<&str>) -> RespiratoryRateCategory {
    parse_integer(value).map_or(RespiratoryRateCategory::Unclassifiable, categorize_respiratory_rate)
}

// Oxygen saturation

pub fn spo2_out_of_range(percent: i64) -> bool {
    percent < 95
}

pub fn categorize_spo2(percent: i64) -> Spo2Category {
    match percent {
        i64::MIN..=89 => Spo2Category::Hypoxemia,
        90..=94 => Spo2Category::MildlyLow,
        95..=100 => Spo2Category::Normal,
        _ => Spo2Category::Unclassifiable,
    }
}

pub fn is_spo2_out_of_range(value: Option<&str>) -> bool {
    parse_integer(value).is_some_and(spo2_out_of_range)
}

pub fn classify_spo2(value: Option<&str>) -> Spo2Category {
    parse_integer(value).map_or(Spo2Category::Unclassifiable, categorize_spo2)
}

// Pain

pub fn categorize_pain(score: i64) -> PainCategory {
    match score {
        0 => PainCategory::NoPain,
        1..=3 => PainCategory::MildPain,
        4..=6 => PainCategory::ModeratePain,
        7..=10 => PainCategory::SeverePain,
        _ => PainCategory::Unclassifiable,
    }
}

pub fn classify_pain(value: Option<&str>) -> PainCategory {
    parse_integer(value).map_or(PainCategory::Unclassifiable, categorize_pain)
}

fn field_assessment<C: ClinicalCategory>(raw: &str, category: C, out_of_range: bool) -> FieldAssessment {
    FieldAssessment {
        value: present(Some(raw)).map(str::to_string),
        label: category.label().to_string(),
        out_of_range,
        status: category.status(),
    }
}

/// Evaluate every field of a reading
pub fn assess_vital_signs(vital_sign: &VitalSign) -> VitalSignsAssessment {
    let bp = Some(vital_sign.blood_pressure.as_str());
    let temperature = Some(vital_sign.temperature.as_str());
    let heart_rate = Some(vital_sign.heart_rate.as_str());
    let respiratory_rate = Some(vital_sign.respiratory_rate.as_str());
    let spo2 = Some(vital_sign.spo2.as_str());
    let pain = Some(vital_sign.pain.as_str());

    VitalSignsAssessment {
        blood_pressure: field_assessment(
            &vital_sign.blood_pressure,
            classify_blood_pressure(bp),
            is_blood_pressure_out_of_range(bp),
        ),
        temperature: field_assessment(
            &vital_sign.temperature,
            classify_temperature(temperature),
            is_temperature_out_of_range(temperature),
        ),
        heart_rate: field_assessment(
            &vital_sign.heart_rate,
            classify_heart_rate(heart_rate),
            is_heart_rate_out_of_range(heart_rate),
        ),
        respiratory_rate: field_assessment(
            &vital_sign.respiratory_rate,
            classify_respiratory_rate(respiratory_rate),
            is_respiratory_rate_out_of_range(respiratory_rate),
        ),
        spo2: field_assessment(&vital_sign.spo2, classify_spo2(spo2), is_spo2_out_of_range(spo2)),
        pain: field_assessment(&vital_sign.pain, classify_pain(pain), false),
    }
}
