//! Shared validation utilities
//!
//! Field errors are collected rather than returned on the first failure so the
//! client can highlight every invalid field at once. Messages are in French,
//! they are shown as-is by the forms.
//!
//! # Examples
//!
//! ```rust,ignore
//! use registre_server::features::shared::validation::FieldErrors;
//!
//! let mut errors = FieldErrors::new();
//! errors
//!     .min_chars("first_name", &command.first_name, 2)
//!     .required("residence", &command.residence);
//! errors.into_result()?;
//! ```

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

pub const MSG_REQUIRED: &str = "Ce champ est obligatoire";
pub const MSG_INVALID_EMAIL: &str = "Adresse e-mail invalide";
pub const MSG_FUTURE_DATE: &str = "La date ne peut pas être dans le futur";
pub const MSG_NO_FIELDS: &str = "Au moins un champ doit être modifié";

/// Per-field validation messages
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Error set holding one message
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) -> &mut Self {
        self.0.entry(field.to_string()).or_default().push(message.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// `Ok(())` when nothing was recorded
    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    /// Value must not be blank
    pub fn required(&mut self, field: &str, value: &str) -> &mut Self {
        if value.trim().is_empty() {
            self.add(field, MSG_REQUIRED);
        }
        self
    }

    /// Value must hold at least `min` characters once trimmed
    pub fn min_chars(&mut self, field: &str, value: &str, min: usize) -> &mut Self {
        let count = value.trim().chars().count();
        if count == 0 {
            self.add(field, MSG_REQUIRED);
        } else if count < min {
            self.add(field, format!("Doit contenir au moins {} caractères", min));
        }
        self
    }

    pub fn max_chars(&mut self, field: &str, value: &str, max: usize) -> &mut Self {
        if value.chars().count() > max {
            self.add(field, format!("Ne doit pas dépasser {} caractères", max));
        }
        self
    }

    pub fn email(&mut self, field: &str, value: &str) -> &mut Self {
        if value.trim().is_empty() {
            self.add(field, MSG_REQUIRED);
        } else if !is_valid_email(value.trim()) {
            self.add(field, MSG_INVALID_EMAIL);
        }
        self
    }

    pub fn not_in_future(&mut self, field: &str, date: NaiveDate, today: NaiveDate) -> &mut Self {
        if date > today {
            self.add(field, MSG_FUTURE_DATE);
        }
        self
    }

    /// Same checks as [`Self::min_chars`], skipped when the field is absent
    pub fn min_chars_opt(&mut self, field: &str, value: Option<&str>, min: usize) -> &mut Self {
        if let Some(value) = value {
            self.min_chars(field, value, min);
        }
        self
    }

    pub fn required_opt(&mut self, field: &str, value: Option<&str>) -> &mut Self {
        if let Some(value) = value {
            self.required(field, value);
        }
        self
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    write!(f, "; ")?;
                }
                write!(f, "{}: {}", field, message)?;
                first = false;
            }
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

/// Loose e-mail shape check: `local@domain.tld`, no whitespace
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    if local.is_empty() || domain.contains('@') {
        return false;
    }

    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && tld.len() >= 2 && !host.starts_with('.'),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_chars_counts_characters_not_bytes() {
        let mut errors = FieldErrors::new();
        errors.min_chars("last_name", "É", 2).min_chars("first_name", "Éa", 2);
        assert!(errors.contains("last_name"));
        assert!(!errors.contains("first_name"));
    }

    #[test]
    fn test_blank_value_is_reported_as_required() {
        let mut errors = FieldErrors::new();
        errors.min_chars("first_name", "   ", 2);
        assert_eq!(errors.get("first_name"), Some(&[MSG_REQUIRED.to_string()][..]));
    }

    #[test]
    fn test_messages_accumulate_per_field() {
        let mut errors = FieldErrors::new();
        errors.add("email", "a").add("email", "b").add("name", "c");
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get("email").map(<[String]>::len), Some(2));
        assert_eq!(
            serde_json::to_value(&errors).unwrap(),
            serde_json::json!({"email": ["a", "b"], "name": ["c"]})
        );
    }

    #[test]
    fn test_into_result() {
        assert!(FieldErrors::new().into_result().is_ok());
        assert!(FieldErrors::single("title", MSG_REQUIRED).into_result().is_err());
    }

    #[test]
    fn test_email_shapes() {
        assert!(is_valid_email("agent@police.cd"));
        assert!(is_valid_email("jean.mukendi+test@registre.gouv.cd"));
        assert!(!is_valid_email("agent"));
        assert!(!is_valid_email("agent@"));
        assert!(!is_valid_email("@police.cd"));
        assert!(!is_valid_email("agent@police"));
        assert!(!is_valid_email("agent@@police.cd"));
        assert!(!is_valid_email("agent @police.cd"));
    }

    #[test]
    fn test_future_date() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let mut errors = FieldErrors::new();
        errors
            .not_in_future("date_of_birth", NaiveDate::from_ymd_opt(2024, 6, 2).unwrap(), today)
            .not_in_future("arrest_date", today, today);
        assert!(errors.contains("date_of_birth"));
        assert!(!errors.contains("arrest_date"));
    }

    #[test]
    fn test_optional_checks_skip_absent_fields() {
        let mut errors = FieldErrors::new();
        errors.min_chars_opt("first_name", None, 2).required_opt("residence", None);
        assert!(errors.is_empty());

        errors.required_opt("residence", Some(""));
        assert!(errors.contains("residence"));
    }

    #[test]
    fn test_display_lists_every_message() {
        let mut errors = FieldErrors::new();
        errors.add("email", MSG_INVALID_EMAIL).add("name", MSG_REQUIRED);
        let text = errors.to_string();
        assert!(text.contains("email: Adresse e-mail invalide"));
        assert!(text.contains("name: Ce champ est obligatoire"));
    }
}
