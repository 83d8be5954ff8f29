//! Per-field validation messages keyed by field path.

use std::collections::BTreeMap;

use serde::Serialize;

/// Mapping from a field path (`invoiceCode`, `items[0].qty`, ...) to a
/// human-readable message. An empty mapping means the input is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message for `path`. The first message recorded for a path wins.
    pub fn insert(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.0.entry(path.into()).or_insert_with(|| message.into());
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.0.get(path).map(String::as_str)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.0.contains_key(path)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// `Ok(value)` when no errors were recorded.
    pub fn into_result<T>(self, value: T) -> Result<T, FieldErrors> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

impl core::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut first = true;
        for (path, message) in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{path}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_message_for_a_path_is_kept() {
        let mut errors = FieldErrors::new();
        errors.insert("invoiceCode", "required");
        errors.insert("invoiceCode", "too long");

        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("invoiceCode"), Some("required"));
    }

    #[test]
    fn display_joins_entries_in_path_order() {
        let mut errors = FieldErrors::new();
        errors.insert("items[0].qty", "bad qty");
        errors.insert("discount", "negative");

        assert_eq!(errors.to_string(), "discount: negative; items[0].qty: bad qty");
    }

    #[test]
    fn into_result_is_ok_only_when_empty() {
        assert_eq!(FieldErrors::new().into_result(7), Ok(7));

        let mut errors = FieldErrors::new();
        errors.insert("discount", "negative");
        assert!(errors.into_result(7).is_err());
    }
}
