//! Response envelope normalization.
//!
//! The EMSA backend is inconsistent about list shapes: the paginated DRF
//! endpoints wrap records in `{count, results: [...]}`, the alerts action
//! returns `{success: true, alertas: [...]}`, and a few endpoints return a
//! bare array. Every consumer goes through [`normalize`] so the unwrapping
//! rule exists exactly once.

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

/// Envelope shape did not match any known pattern.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NormalizationError {
    #[error("expected an array in field `{0}`, found a different type")]
    FieldNotArray(String),

    #[error("unrecognized response envelope: {0}")]
    UnknownShape(String),

    #[error("record did not match the expected shape: {0}")]
    BadRecord(String),
}

/// Extract the record sequence from a response payload.
///
/// Fixed priority order:
/// 1. a bare array is used as-is;
/// 2. a `results` field is used (and must be an array);
/// 3. `success == true` with exactly one other array-valued field uses that
///    field;
/// 4. anything else is a [`NormalizationError`].
pub fn normalize(payload: Value) -> Result<Vec<Value>, NormalizationError> {
    match payload {
        Value::Array(items) => Ok(items),
        Value::Object(mut map) => {
            if let Some(results) = map.remove("results") {
                return match results {
                    Value::Array(items) => Ok(items),
                    _ => Err(NormalizationError::FieldNotArray("results".into())),
                };
            }
            if map.get("success") == Some(&Value::Bool(true)) {
                let mut arrays = map
                    .iter()
                    .filter(|(k, v)| *k != "success" && v.is_array())
                    .map(|(k, _)| k.clone());
                if let (Some(key), None) = (arrays.next(), arrays.next()) {
                    if let Some(Value::Array(items)) = map.remove(&key) {
                        return Ok(items);
                    }
                }
            }
            let keys: Vec<&str> = map.keys().map(String::as_str).collect();
            Err(NormalizationError::UnknownShape(format!(
                "object with fields [{}]",
                keys.join(", ")
            )))
        }
        other => Err(NormalizationError::UnknownShape(format!(
            "non-collection value: {other}"
        ))),
    }
}

/// [`normalize`] plus per-record deserialization into `T`.
pub fn normalize_records<T: DeserializeOwned>(
    payload: Value,
) -> Result<Vec<T>, NormalizationError> {
    normalize(payload)?
        .into_iter()
        .map(|v| serde_json::from_value(v).map_err(|e| NormalizationError::BadRecord(e.to_string())))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bare_array_passes_through() {
        let out = normalize(json!([1, 2, 3])).unwrap();
        assert_eq!(out, vec![json!(1), json!(2), json!(3)]);
    }

    #[test]
    fn results_field_is_unwrapped() {
        let out = normalize(json!({"count": 3, "results": [1, 2, 3]})).unwrap();
        assert_eq!(out, vec![json!(1), json!(2), json!(3)]);
    }

    #[test]
    fn results_takes_priority_over_success() {
        let out = normalize(json!({"success": true, "results": [1], "alertas": [2]})).unwrap();
        assert_eq!(out, vec![json!(1)]);
    }

    #[test]
    fn success_envelope_uses_single_array_field() {
        let out = normalize(json!({"success": true, "alertas": [{"id": 1}]})).unwrap();
        assert_eq!(out, vec![json!({"id": 1})]);
    }

    #[test]
    fn success_with_two_array_fields_is_ambiguous() {
        let err = normalize(json!({"success": true, "a": [1], "b": [2]})).unwrap_err();
        assert!(matches!(err, NormalizationError::UnknownShape(_)));
    }

    #[test]
    fn success_false_is_not_unwrapped() {
        let err = normalize(json!({"success": false, "alertas": [1]})).unwrap_err();
        assert!(matches!(err, NormalizationError::UnknownShape(_)));
    }

    #[test]
    fn empty_object_is_an_error() {
        let err = normalize(json!({})).unwrap_err();
        assert!(matches!(err, NormalizationError::UnknownShape(_)));
    }

    #[test]
    fn non_array_results_is_an_error() {
        let err = normalize(json!({"results": 42})).unwrap_err();
        assert_eq!(err, NormalizationError::FieldNotArray("results".into()));
    }

    #[test]
    fn scalar_payload_is_an_error() {
        assert!(normalize(json!(7)).is_err());
        assert!(normalize(json!("x")).is_err());
    }

    #[test]
    fn normalize_records_deserializes_each_element() {
        #[derive(serde::Deserialize, Debug, PartialEq)]
        struct R {
            id: i64,
        }
        let out: Vec<R> =
            normalize_records(json!({"results": [{"id": 1}, {"id": 2}]})).unwrap();
        assert_eq!(out, vec![R { id: 1 }, R { id: 2 }]);
    }

    #[test]
    fn normalize_records_reports_bad_record() {
        #[derive(serde::Deserialize, Debug)]
        struct R {
            #[allow(dead_code)]
            id: i64,
        }
        let err = normalize_records::<R>(json!([{"id": "not-a-number"}])).unwrap_err();
        assert!(matches!(err, NormalizationError::BadRecord(_)));
    }
}
