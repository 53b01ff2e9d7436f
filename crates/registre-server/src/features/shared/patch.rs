//! Partial update helpers
//!
//! Update commands carry `Option` fields; absent fields keep their stored
//! value. Optional columns cannot be cleared through an update, a blank value
//! is treated as "not provided".

use serde::Serialize;

/// Trimmed text, `None` when blank
pub fn clean_opt(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Patched value for a required text column
pub fn merge_text<'a>(patch: &'a Option<String>, current: &'a str) -> &'a str {
    match patch.as_deref().map(str::trim) {
        Some(value) if !value.is_empty() => value,
        _ => current,
    }
}

/// Patched value for an optional text column
pub fn merge_opt_text<'a>(patch: &'a Option<String>, current: &'a Option<String>) -> Option<&'a str> {
    match patch.as_deref().map(str::trim) {
        Some(value) if !value.is_empty() => Some(value),
        _ => current.as_deref(),
    }
}

/// True when the serialised patch holds no field at all
///
/// Relies on update commands skipping `None` fields when serialised.
pub fn patch_is_empty<P: Serialize>(patch: &P) -> bool {
    match serde_json::to_value(patch) {
        Ok(serde_json::Value::Object(map)) => map.is_empty(),
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Patch {
        #[serde(skip_serializing_if = "Option::is_none")]
        residence: Option<String>,
    }

    #[test]
    fn test_clean_opt() {
        assert_eq!(clean_opt(Some("  Goma ")), Some("Goma".to_string()));
        assert_eq!(clean_opt(Some("   ")), None);
        assert_eq!(clean_opt(None), None);
    }

    #[test]
    fn test_merge_text() {
        let current = "Goma".to_string();
        assert_eq!(merge_text(&Some(" Bukavu ".to_string()), &current), "Bukavu");
        assert_eq!(merge_text(&Some("".to_string()), &current), "Goma");
        assert_eq!(merge_text(&None, &current), "Goma");
    }

    #[test]
    fn test_merge_opt_text_cannot_clear() {
        let current = Some("B-4".to_string());
        assert_eq!(merge_opt_text(&Some("C-1".to_string()), &current), Some("C-1"));
        assert_eq!(merge_opt_text(&Some(" ".to_string()), &current), Some("B-4"));
        assert_eq!(merge_opt_text(&None, &None), None);
    }

    #[test]
    fn test_patch_is_empty() {
        assert!(patch_is_empty(&Patch { residence: None }));
        assert!(!patch_is_empty(&Patch { residence: Some("Goma".to_string()) }));
    }
}
