//! QR payloads that point at a patient record.
//!
//! A payload is the patient page URL, `{base}/pacientes?uuid={id}`. Scanners
//! also accept a bare numeric identifier, including `0x`/`0o`/`0b` literals.

use thiserror::Error;
use tracing::debug;
use url::{form_urlencoded, Url};

/// Query parameter carrying the patient identifier
pub const PATIENT_ID_PARAM: &str = "uuid";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QrPayloadError {
    #[error("QR payload is empty")]
    Empty,

    #[error("QR payload does not identify a patient: {0}")]
    InvalidPayload(String),
}

/// Build the payload encoded in a patient's QR code
pub fn build_qr_payload(base_url: &str, patient_id: &str) -> String {
    let id: String = form_urlencoded::byte_serialize(patient_id.as_bytes()).collect();
    format!(
        "{}/pacientes?{}={}",
        base_url.trim_end_matches('/'),
        PATIENT_ID_PARAM,
        id
    )
}

/// Extract the patient identifier from scanned text
pub fn resolve_qr_payload(text: &str) -> Result<String, QrPayloadError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(QrPayloadError::Empty);
    }

    if is_numeric_identifier(text) {
        debug!("QR payload is a bare numeric identifier");
        return Ok(text.to_string());
    }

    let url = Url::parse(text).map_err(|_| QrPayloadError::InvalidPayload(text.to_string()))?;

    url.query_pairs()
        .find(|(key, _)| key == PATIENT_ID_PARAM)
        .map(|(_, value)| value.into_owned())
        .filter(|id| !id.is_empty())
        .ok_or_else(|| QrPayloadError::InvalidPayload(text.to_string()))
}

/// Finite decimal numbers, or unsigned `0x`, `0o` and `0b` integer literals
fn is_numeric_identifier(text: &str) -> bool {
    let radix_digits = |prefix: [&str; 2], radix: u32| {
        prefix
            .iter()
            .find_map(|p| text.strip_prefix(p))
            .map(|digits| !digits.is_empty() && digits.chars().all(|c| c.is_digit(radix)))
    };

    radix_digits(["0x", "0X"], 16)
        .or_else(|| radix_digits(["0o", "0O"], 8))
        .or_else(|| radix_digits(["0b", "0B"], 2))
        .unwrap_or_else(|| text.parse::<f64>().is_ok_and(f64::is_finite))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_payload() {
        assert_eq!(
            build_qr_payload("http://localhost:3000/centro", "01JVKSJB6XAZM0RKYAFJFWZKPT"),
            "http://localhost:3000/centro/pacientes?uuid=01JVKSJB6XAZM0RKYAFJFWZKPT"
        );
        assert_eq!(
            build_qr_payload("https://clinic.example/centro/", "abc"),
            "https://clinic.example/centro/pacientes?uuid=abc"
        );
        assert_eq!(
            build_qr_payload("https://clinic.example", "a b&c"),
            "https://clinic.example/pacientes?uuid=a+b%26c"
        );
    }

    #[test]
    fn test_resolve_built_payload() {
        let payload = build_qr_payload("https://clinic.example/centro", "a b&c");
        assert_eq!(resolve_qr_payload(&payload).unwrap(), "a b&c");
    }

    #[test]
    fn test_resolve_url_with_other_params() {
        let id = resolve_qr_payload("https://clinic.example/pacientes?lang=es&uuid=01JVKSJGWABT7E82NWA0PRYG1P").unwrap();
        assert_eq!(id, "01JVKSJGWABT7E82NWA0PRYG1P");
    }

    #[test]
    fn test_resolve_numeric_identifier() {
        assert_eq!(resolve_qr_payload("12345").unwrap(), "12345");
        assert_eq!(resolve_qr_payload(" 42 ").unwrap(), "42");
        assert_eq!(resolve_qr_payload("4.2e1").unwrap(), "4.2e1");
    }

    #[test]
    fn test_resolve_radix_prefixed_identifier() {
        assert_eq!(resolve_qr_payload("0x1F").unwrap(), "0x1F");
        assert_eq!(resolve_qr_payload("0b1").unwrap(), "0b1");
        assert_eq!(resolve_qr_payload("0o7").unwrap(), "0o7");
        assert!(matches!(resolve_qr_payload("0x"), Err(QrPayloadError::InvalidPayload(_))));
        assert!(matches!(resolve_qr_payload("0b12"), Err(QrPayloadError::InvalidPayload(_))));
        assert!(matches!(resolve_qr_payload("-0x1F"), Err(QrPayloadError::InvalidPayload(_))));
    }

    #[test]
    fn test_resolve_rejects_invalid_payloads() {
        assert_eq!(resolve_qr_payload(""), Err(QrPayloadError::Empty));
        assert_eq!(resolve_qr_payload("   "), Err(QrPayloadError::Empty));
        assert!(matches!(
            resolve_qr_payload("hello world"),
            Err(QrPayloadError::InvalidPayload(_))
        ));
        assert!(matches!(
            resolve_qr_payload("https://clinic.example/pacientes"),
            Err(QrPayloadError::InvalidPayload(_))
        ));
        assert!(matches!(
            resolve_qr_payload("https://clinic.example/pacientes?uuid="),
            Err(QrPayloadError::InvalidPayload(_))
        ));
        // Not finite, so treated as a URL and rejected
        assert!(matches!(resolve_qr_payload("inf"), Err(QrPayloadError::InvalidPayload(_))));
    }
}
