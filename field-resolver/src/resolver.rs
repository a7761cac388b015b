use serde_json::{Map, Value};

use crate::error::{ResolverError, ResolverResult};

/// An untyped record as produced by the upload parser
pub type RawRecord = Map<String, Value>;

/// How a field was located in a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    Exact,
    Normalized,
    Substring,
}

/// A resolved field: the key it was found under and its value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedField<'a> {
    pub key: &'a str,
    pub value: &'a Value,
    pub kind: MatchKind,
}

/// Lowercase a header and drop `_`, `-` and whitespace.
pub fn normalize_key(key: &str) -> String {
    key.chars()
        .filter(|c| *c != '_' && *c != '-' && !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// `null` and blank strings count as absent.
pub fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        _ => true,
    }
}

/// Locate the first present value for any of `candidates`.
pub fn resolve_field<'a>(row: &'a RawRecord, candidates: &[&str]) -> Option<ResolvedField<'a>> {
    for candidate in candidates {
        if let Some((key, value)) = row.get_key_value(*candidate) {
            if is_present(value) {
                return Some(ResolvedField { key, value, kind: MatchKind::Exact });
            }
        }
    }

    let keys: Vec<(String, &'a String, &'a Value)> = row
        .iter()
        .filter(|(_, value)| is_present(value))
        .map(|(key, value)| (normalize_key(key), key, value))
        .filter(|(normalized, _, _)| !normalized.is_empty())
        .collect();

    let mut normalized: Vec<String> = candidates
        .iter()
        .map(|candidate| normalize_key(candidate))
        .filter(|candidate| !candidate.is_empty())
        .collect();

    for candidate in &normalized {
        if let Some(&(_, key, value)) = keys.iter().find(|(k, _, _)| k == candidate) {
            return Some(ResolvedField { key: key.as_str(), value, kind: MatchKind::Normalized });
        }
    }

    // Stable sort: aliases of equal length keep their declared order.
    normalized.sort_by_key(String::len);
    for candidate in &normalized {
        let hit = keys
            .iter()
            .find(|(k, _, _)| k.contains(candidate.as_str()) || candidate.contains(k.as_str()));
        if let Some(&(_, key, value)) = hit {
            tracing::trace!(alias = %candidate, key = %key, "field resolved by substring match");
            return Some(ResolvedField { key: key.as_str(), value, kind: MatchKind::Substring });
        }
    }

    None
}

/// Resolve the value for any of `candidates`, `None` when nothing usable is present.
pub fn resolve<'a>(row: &'a RawRecord, candidates: &[&str]) -> Option<&'a Value> {
    resolve_field(row, candidates).map(|field| field.value)
}

/// Resolve the value for any of `candidates`, falling back to `fallback`.
pub fn resolve_or(row: &RawRecord, candidates: &[&str], fallback: Value) -> Value {
    resolve(row, candidates).cloned().unwrap_or(fallback)
}

/// Convert an uploaded JSON payload into records.
///
/// # Errors
///
/// Returns [`ResolverError::NotAnArray`] when `payload` is not an array and
/// [`ResolverError::NotAnObject`] when any element is not an object.
pub fn records_from_value(payload: &Value) -> ResolverResult<Vec<RawRecord>> {
    let items = payload
        .as_array()
        .ok_or_else(|| ResolverError::NotAnArray(json_type_name(payload)))?;

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            item.as_object().cloned().ok_or(ResolverError::NotAnObject {
                index,
                found: json_type_name(item),
            })
        })
        .collect()
}

/// Parse a JSON document into records.
///
/// # Errors
///
/// Returns [`ResolverError::Json`] for malformed JSON, otherwise as
/// [`records_from_value`].
pub fn records_from_str(payload: &str) -> ResolverResult<Vec<RawRecord>> {
    let value: Value = serde_json::from_str(payload)?;
    records_from_value(&value)
}

fn json_type_name(value: &Value) -> &'static str {
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

    fn record(value: Value) -> RawRecord {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn test_normalize_key() {
        assert_eq!(normalize_key("Doctor_ID"), "doctorid");
        assert_eq!(normalize_key(" Visit - Date "), "visitdate");
        assert_eq!(normalize_key("___"), "");
    }

    #[test]
    fn test_exact_match_wins() {
        let row = record(json!({ "Doctor_ID": "D1", "doctorid": "D2" }));
        let field = resolve_field(&row, &["Doctor_ID"]).unwrap();
        assert_eq!(field.key, "Doctor_ID");
        assert_eq!(field.value, &json!("D1"));
        assert_eq!(field.kind, MatchKind::Exact);

        let blank = record(json!({ "Doctor_ID": " ", "Physician_ID": "D4" }));
        let field = resolve_field(&blank, &["Doctor_ID", "Physician_ID"]).unwrap();
        assert_eq!((field.key, field.kind), ("Physician_ID", MatchKind::Exact));
    }

    #[test]
    fn test_normalized_match() {
        let row = record(json!({ "doctor id": "D7" }));
        let field = resolve_field(&row, &["Doctor_ID"]).unwrap();
        assert_eq!(field.key, "doctor id");
        assert_eq!(field.kind, MatchKind::Normalized);
    }

    #[test]
    fn test_substring_match_prefers_shortest_alias() {
        let row = record(json!({ "Attending Doctor Identifier": "D3", "Net Amount": 10 }));
        let field = resolve_field(&row, &["Doctor_Identifier", "Amount"]).unwrap();
        assert_eq!(field.value, &json!(10));
        assert_eq!(field.kind, MatchKind::Substring);
    }

    #[test]
    fn test_key_contained_in_alias() {
        let row = record(json!({ "Age": 33 }));
        assert_eq!(resolve(&row, &["Patient_Age"]), Some(&json!(33)));
    }

    #[test]
    fn test_blank_values_skipped() {
        let row = record(json!({ "Patient_ID": "  ", "patient id": "P9" }));
        assert_eq!(resolve(&row, &["Patient_ID"]), Some(&json!("P9")));

        let empty = record(json!({ "Patient_ID": null }));
        assert_eq!(resolve(&empty, &["Patient_ID"]), None);
    }

    #[test]
    fn test_resolve_or_fallback() {
        let row = record(json!({ "Other": 1 }));
        assert_eq!(resolve_or(&row, &["Payer_Type"], json!("Unknown")), json!("Unknown"));
    }

    #[test]
    fn test_empty_alias_never_matches_everything() {
        let row = record(json!({ "Visit_ID": "V1" }));
        assert_eq!(resolve(&row, &["__", ""]), None);
    }

    #[test]
    fn test_records_from_value_rejects_non_arrays() {
        assert!(matches!(
            records_from_value(&json!({ "a": 1 })),
            Err(ResolverError::NotAnArray("object"))
        ));
        assert!(matches!(
            records_from_value(&json!([{ "a": 1 }, 3])),
            Err(ResolverError::NotAnObject { index: 1, found: "number" })
        ));
        assert_eq!(records_from_value(&json!([])).unwrap().len(), 0);
    }

    #[test]
    fn test_records_from_str() {
        let rows = records_from_str(r#"[{"Visit_ID":"V1"},{"Visit_ID":"V2"}]"#).unwrap();
        assert_eq!(rows.len(), 2);
        assert!(matches!(records_from_str("not json"), Err(ResolverError::Json(_))));
    }
}
