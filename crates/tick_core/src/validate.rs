//! Structural record validation.
//!
//! Checks that an incoming payload is JSON and carries all four required
//! fields with usable types. Value ranges are deliberately not checked:
//! a record with a negative price or zero volume passes structurally and
//! flows through aggregation unchallenged. That matches the upstream
//! contract this pipeline consumes; downstream consumers must not assume
//! the aggregates were range-filtered.

use crate::record::TickRecord;
use thiserror::Error;

/// Fields every tick record must carry.
pub const REQUIRED_FIELDS: [&str; 4] = ["symbol", "price", "timestamp", "volume"];

/// Per-record rejection reasons.
///
/// Both variants are permanent for the record in question: the caller drops
/// the record, bumps its error counter and keeps processing the stream.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Payload is not valid JSON at all
    #[error("malformed payload: {0}")]
    Malformed(String),

    /// JSON object missing one or more required fields (or carrying an
    /// unusable type for one)
    #[error("missing required fields {missing:?} (received {received:?})")]
    MissingFields {
        /// Required fields absent or of the wrong type
        missing: Vec<String>,
        /// Field names actually present in the payload
        received: Vec<String>,
    },
}

/// Validate a raw payload into a `TickRecord`.
///
/// Rejections are independent per-record decisions; a failure here has no
/// effect on any other record in the batch.
pub fn validate(payload: &[u8]) -> Result<TickRecord, ValidationError> {
    let value: serde_json::Value = serde_json::from_slice(payload)
        .map_err(|e| ValidationError::Malformed(e.to_string()))?;

    match serde_json::from_value::<TickRecord>(value.clone()) {
        Ok(record) => Ok(record),
        Err(_) => {
            let received: Vec<String> = value
                .as_object()
                .map(|obj| obj.keys().cloned().collect())
                .unwrap_or_default();
            let missing = REQUIRED_FIELDS
                .iter()
                .filter(|f| !field_is_usable(&value, f))
                .map(|f| f.to_string())
                .collect();
            Err(ValidationError::MissingFields { missing, received })
        }
    }
}

/// A field is usable when present and deserialisable into its record type.
fn field_is_usable(value: &serde_json::Value, field: &str) -> bool {
    let Some(v) = value.get(field) else {
        return false;
    };
    match field {
        "symbol" => v.is_string(),
        "price" => v.is_number(),
        "timestamp" => v
            .as_str()
            .is_some_and(|s| s.parse::<chrono::DateTime<chrono::Utc>>().is_ok()),
        "volume" => v.is_u64(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::TickRecord;

    #[test]
    fn test_accepts_complete_record() {
        let wire = TickRecord::new("AAPL", 150.25, 500).to_wire().unwrap();
        let record = validate(&wire).unwrap();
        assert_eq!(record.symbol, "AAPL");
        assert_eq!(record.volume, 500);
    }

    #[test]
    fn test_accepts_negative_price() {
        // Range checking is out of scope: structurally valid, so accepted.
        let payload =
            br#"{"symbol":"AAPL","price":-5.0,"timestamp":"2024-01-15T09:30:00Z","volume":100}"#;
        let record = validate(payload).unwrap();
        assert_eq!(record.price, -5.0);
    }

    #[test]
    fn test_accepts_extra_fields() {
        let payload = br#"{"symbol":"MSFT","price":380.0,"timestamp":"2024-01-15T09:30:00Z","volume":100,"venue":"XNAS"}"#;
        assert!(validate(payload).is_ok());
    }

    #[test]
    fn test_rejects_each_missing_field() {
        let base = serde_json::json!({
            "symbol": "AAPL",
            "price": 150.0,
            "timestamp": "2024-01-15T09:30:00Z",
            "volume": 500u64,
        });

        for field in REQUIRED_FIELDS {
            let mut partial = base.clone();
            partial.as_object_mut().unwrap().remove(field);
            let payload = serde_json::to_vec(&partial).unwrap();

            let err = validate(&payload).unwrap_err();
            match err {
                ValidationError::MissingFields { missing, received } => {
                    assert_eq!(missing, vec![field.to_string()]);
                    assert_eq!(received.len(), 3);
                }
                other => panic!("expected MissingFields, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_rejects_wrong_field_type() {
        let payload =
            br#"{"symbol":"AAPL","price":"not-a-number","timestamp":"2024-01-15T09:30:00Z","volume":100}"#;
        let err = validate(payload).unwrap_err();
        match err {
            ValidationError::MissingFields { missing, .. } => {
                assert_eq!(missing, vec!["price".to_string()]);
            }
            other => panic!("expected MissingFields, got {other:?}"),
        }
    }

    #[test]
    fn test_rejects_non_json_payload() {
        let err = validate(b"not json at all").unwrap_err();
        assert!(matches!(err, ValidationError::Malformed(_)));
    }

    #[test]
    fn test_rejects_non_object_json() {
        let err = validate(b"[1, 2, 3]").unwrap_err();
        match err {
            ValidationError::MissingFields { missing, received } => {
                assert_eq!(missing.len(), 4);
                assert!(received.is_empty());
            }
            other => panic!("expected MissingFields, got {other:?}"),
        }
    }
}
