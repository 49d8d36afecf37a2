//! Retrieve payload normalization.
//!
//! The backend has answered `/retrieve` in several shapes over time. Each is
//! a [`Payload`] variant, decoded in a fixed order; [`normalize`] maps any
//! JSON value to a record list and never fails.

use std::collections::HashSet;

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{ClientError, ClientResult};
use crate::record::{DocumentRecord, UNNAMED};

/// Name given to the record synthesized from a `stored_data` payload.
pub const STORED_DATA_NAME: &str = "retrieved-data";

/// Name given to the record synthesized from a `data` payload.
pub const DATA_NAME: &str = "data";

const NAME_FIELDS: [&str; 3] = ["name", "fileName", "file"];
const HASH_FIELDS: [&str; 4] = ["hash", "data", "tx_hash", "stored_data"];
const TX_FIELDS: [&str; 2] = ["tx_hash", "tx"];

/// Accepted retrieve payload shapes, in decode priority order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Payload<'a> {
    /// Bare array of records.
    Sequence(&'a [Value]),
    /// `{"documents": [...]}`.
    Documents(&'a Value),
    /// `{"stored_data": "..."}`, single-value legacy API.
    StoredData(&'a Value),
    /// `{"data": "..."}`.
    Data(&'a Value),
    /// Any other object: key → record, or key → hash.
    Keyed(&'a Map<String, Value>),
}

impl<'a> Payload<'a> {
    /// Classify a payload. Scalars and null are `UnsupportedShape`.
    pub fn decode(payload: &'a Value) -> ClientResult<Self> {
        match payload {
            Value::Array(items) => Ok(Self::Sequence(items)),
            Value::Object(map) => {
                if let Some(docs) = present(map, "documents") {
                    Ok(Self::Documents(docs))
                } else if let Some(value) = present(map, "stored_data") {
                    Ok(Self::StoredData(value))
                } else if let Some(value) = present(map, "data") {
                    Ok(Self::Data(value))
                } else {
                    Ok(Self::Keyed(map))
                }
            }
            Value::Null => Err(ClientError::UnsupportedShape { kind: "null" }),
            Value::Bool(_) => Err(ClientError::UnsupportedShape { kind: "boolean" }),
            Value::Number(_) => Err(ClientError::UnsupportedShape { kind: "number" }),
            Value::String(_) => Err(ClientError::UnsupportedShape { kind: "string" }),
        }
    }

    fn candidates(self) -> Vec<Candidate<'a>> {
        match self {
            Self::Sequence(items) => items.iter().map(Candidate::Element).collect(),
            Self::Documents(Value::Array(items)) => {
                items.iter().map(Candidate::Element).collect()
            }
            Self::Documents(other) => {
                debug!(kind = kind_of(other), "documents field is not an array");
                Vec::new()
            }
            Self::StoredData(value) => vec![Candidate::Synthesized {
                name: STORED_DATA_NAME.to_string(),
                hash: primitive_text(value),
            }],
            Self::Data(value) => vec![Candidate::Synthesized {
                name: DATA_NAME.to_string(),
                hash: primitive_text(value),
            }],
            Self::Keyed(map) => map
                .iter()
                .map(|(key, value)| match value {
                    Value::Object(_) | Value::Array(_) => Candidate::Element(value),
                    Value::Null => Candidate::Synthesized {
                        name: key.clone(),
                        hash: Some(key.clone()),
                    },
                    scalar => Candidate::Synthesized {
                        name: key.clone(),
                        hash: primitive_text(scalar),
                    },
                })
                .collect(),
        }
    }
}

/// A raw element selected by a payload shape, before field fallback.
enum Candidate<'a> {
    Element(&'a Value),
    Synthesized { name: String, hash: Option<String> },
}

impl Candidate<'_> {
    fn into_record(self) -> Option<DocumentRecord> {
        match self {
            Self::Element(Value::Object(fields)) => {
                let hash = first_text(fields, &HASH_FIELDS)?;
                let name =
                    first_text(fields, &NAME_FIELDS).unwrap_or_else(|| UNNAMED.to_string());
                Some(DocumentRecord {
                    name,
                    hash,
                    transaction_reference: first_text(fields, &TX_FIELDS),
                    revoked: fields
                        .get("revoked")
                        .and_then(Value::as_bool)
                        .unwrap_or(false),
                    timestamp: fields.get("timestamp").and_then(Value::as_u64),
                    cid: first_text(fields, &["cid"]),
                })
            }
            Self::Element(other) => {
                primitive_text(other).map(|hash| DocumentRecord::new(UNNAMED, hash))
            }
            Self::Synthesized { name, hash } => {
                let name = if name.is_empty() {
                    UNNAMED.to_string()
                } else {
                    name
                };
                hash.filter(|h| !h.is_empty())
                    .map(|hash| DocumentRecord::new(name, hash))
            }
        }
    }
}

/// Map any retrieve payload to a record list.
///
/// Total and deterministic: unrecognized shapes give an empty list, elements
/// without a derivable hash are skipped and a repeated hash keeps only its
/// first record.
pub fn normalize(payload: &Value) -> Vec<DocumentRecord> {
    let shape = match Payload::decode(payload) {
        Ok(shape) => shape,
        Err(e) => {
            debug!(error = %e, "no documents in retrieve payload");
            return Vec::new();
        }
    };

    let mut seen = HashSet::new();
    let mut records = Vec::new();
    for candidate in shape.candidates() {
        let Some(record) = candidate.into_record() else {
            debug!("skipping element without a hash");
            continue;
        };
        if !seen.insert(record.hash.clone()) {
            debug!(hash = %record.hash, "skipping duplicate hash");
            continue;
        }
        records.push(record);
    }
    records
}

/// A shape field counts only when it carries something: `null`, `false`, `0`
/// and `""` fall through to the next shape.
fn present<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    map.get(key).filter(|v| match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64() != Some(0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    })
}

fn first_text(fields: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match fields.get(*key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn primitive_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_documents_wrapper_preserves_fields() {
        let payload = json!({"documents": [{"name": "f.pdf", "hash": "deadbeef", "tx_hash": "0xaa"}]});
        let records = normalize(&payload);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "f.pdf");
        assert_eq!(records[0].hash, "deadbeef");
        assert_eq!(records[0].transaction_reference.as_deref(), Some("0xaa"));
        assert!(!records[0].revoked);
    }

    #[test]
    fn test_backend_documents_carry_timestamp_and_cid() {
        let payload = json!({"documents": [
            {"hash": "h1", "name": "a.pdf", "timestamp": 1700000000, "cid": "bafy"}
        ]});
        let records = normalize(&payload);

        assert_eq!(records[0].timestamp, Some(1_700_000_000));
        assert_eq!(records[0].cid.as_deref(), Some("bafy"));
        assert!(records[0].transaction_reference.is_none());
    }

    #[test]
    fn test_stored_data_synthesizes_single_record() {
        let records = normalize(&json!({"stored_data": "abc"}));
        assert_eq!(records, vec![DocumentRecord::new(STORED_DATA_NAME, "abc")]);
    }

    #[test]
    fn test_data_synthesizes_single_record() {
        let records = normalize(&json!({"data": "xyz"}));
        assert_eq!(records, vec![DocumentRecord::new(DATA_NAME, "xyz")]);
    }

    #[test]
    fn test_documents_takes_priority_over_data() {
        let payload = json!({"data": "ignored", "documents": [{"hash": "h"}]});
        let records = normalize(&payload);
        assert_eq!(records, vec![DocumentRecord::new(UNNAMED, "h")]);
    }

    #[test]
    fn test_keyed_mapping_mixes_scalars_and_records() {
        let payload = json!({"k1": "v1", "k2": {"hash": "v2", "name": "n2"}});
        let records = normalize(&payload);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0], DocumentRecord::new("k1", "v1"));
        assert_eq!(records[1], DocumentRecord::new("n2", "v2"));
    }

    #[test]
    fn test_keyed_null_value_uses_key_as_hash() {
        let records = normalize(&json!({"abc123": null}));
        assert_eq!(records, vec![DocumentRecord::new("abc123", "abc123")]);
    }

    #[test]
    fn test_sequence_of_primitives() {
        let records = normalize(&json!(["h1", 42, null]));
        assert_eq!(
            records,
            vec![DocumentRecord::new(UNNAMED, "h1"), DocumentRecord::new(UNNAMED, "42")]
        );
    }

    #[test]
    fn test_field_fallback_chain() {
        let payload = json!([
            {"fileName": "a.txt", "data": "d1", "tx": "0x1"},
            {"file": "b.txt", "stored_data": "d2"},
            {"name": "", "fileName": "c.txt", "tx_hash": "0x3"},
        ]);
        let records = normalize(&payload);

        assert_eq!(records[0].name, "a.txt");
        assert_eq!(records[0].hash, "d1");
        assert_eq!(records[0].transaction_reference.as_deref(), Some("0x1"));
        assert_eq!(records[1].name, "b.txt");
        assert_eq!(records[1].hash, "d2");
        assert_eq!(records[2].name, "c.txt");
        // tx_hash doubles as the hash when nothing better exists
        assert_eq!(records[2].hash, "0x3");
        assert_eq!(records[2].transaction_reference.as_deref(), Some("0x3"));
    }

    #[test]
    fn test_revoked_flag_is_read() {
        let records = normalize(&json!([{"hash": "h", "revoked": true}]));
        assert!(records[0].revoked);
    }

    #[test]
    fn test_element_without_hash_is_skipped() {
        let records = normalize(&json!([{"name": "orphan"}, {"hash": "h"}]));
        assert_eq!(records, vec![DocumentRecord::new(UNNAMED, "h")]);
    }

    #[test]
    fn test_duplicate_hash_keeps_first() {
        let payload = json!([{"name": "first", "hash": "h"}, {"name": "second", "hash": "h"}]);
        let records = normalize(&payload);
        assert_eq!(records, vec![DocumentRecord::new("first", "h")]);
    }

    #[test]
    fn test_unrecognized_shapes_are_empty() {
        for payload in [json!(null), json!(7), json!(true), json!("text"), json!({})] {
            assert!(normalize(&payload).is_empty(), "payload {payload}");
        }
    }

    #[test]
    fn test_non_array_documents_is_empty() {
        assert!(normalize(&json!({"documents": {"hash": "h"}})).is_empty());
    }

    #[test]
    fn test_null_documents_falls_through() {
        let records = normalize(&json!({"documents": null, "stored_data": "abc"}));
        assert_eq!(records, vec![DocumentRecord::new(STORED_DATA_NAME, "abc")]);
    }

    #[test]
    fn test_empty_shape_fields_fall_through_to_keyed() {
        let records = normalize(&json!({"stored_data": "", "doc.pdf": "cafe"}));
        assert_eq!(
            records,
            vec![DocumentRecord::new("doc.pdf", "cafe")],
            "empty stored_data must not select the single-value shape"
        );

        let records = normalize(&json!({"data": 0, "documents": false, "k": "v"}));
        assert_eq!(records.len(), 3);
        assert_eq!(records[2], DocumentRecord::new("k", "v"));
        assert!(matches!(
            Payload::decode(&json!({"stored_data": ""})),
            Ok(Payload::Keyed(_))
        ));
    }

    #[test]
    fn test_decode_reports_scalar_kind() {
        assert!(matches!(
            Payload::decode(&json!(3)),
            Err(ClientError::UnsupportedShape { kind: "number" })
        ));
        assert!(matches!(
            Payload::decode(&json!([])),
            Ok(Payload::Sequence(items)) if items.is_empty()
        ));
    }
}
