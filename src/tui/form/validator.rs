//! Validation for the bug form
//!
//! Validation is declarative: `required_fields` computes the set of mandatory
//! fields for the current values (status becomes mandatory when the reporter
//! is QA), and `validate` applies the per-field rules on top of it. Both are
//! pure functions, recomputed on every change and at submit.

use std::collections::HashSet;
use std::fmt;

use crate::types::QA_REPORTER;

use super::model::FormFields;

pub const TITLE_MIN_LEN: usize = 4;
pub const DESCRIPTION_MIN_LEN: usize = 50;
pub const DESCRIPTION_MAX_LEN: usize = 1000;

/// A validatable form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Title,
    Priority,
    Reporter,
    Status,
    Description,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Title => write!(f, "Title"),
            Field::Priority => write!(f, "Priority"),
            Field::Reporter => write!(f, "Reporter"),
            Field::Status => write!(f, "Status"),
            Field::Description => write!(f, "Description"),
        }
    }
}

/// A single validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub message: String,
}

impl FieldError {
    fn new(field: Field, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Which fields are mandatory for the given values. Status is mandatory only
/// while the reporter is QA, so this must be recomputed whenever the
/// reporter changes.
pub fn required_fields(fields: &FormFields) -> HashSet<Field> {
    let mut required = HashSet::from([
        Field::Title,
        Field::Priority,
        Field::Reporter,
        Field::Description,
    ]);
    if fields.reporter == QA_REPORTER {
        required.insert(Field::Status);
    }
    required
}

/// Validate the form values, returning every failure.
pub fn validate(fields: &FormFields) -> Vec<FieldError> {
    let required = required_fields(fields);
    let mut errors = Vec::new();

    if fields.title.trim().is_empty() {
        errors.push(FieldError::new(Field::Title, "required"));
    } else if fields.title.chars().count() < TITLE_MIN_LEN {
        errors.push(FieldError::new(
            Field::Title,
            format!("must be at least {TITLE_MIN_LEN} characters"),
        ));
    }

    if fields.priority.is_none() {
        errors.push(FieldError::new(Field::Priority, "required"));
    }

    if fields.reporter.trim().is_empty() {
        errors.push(FieldError::new(Field::Reporter, "required"));
    }

    if required.contains(&Field::Status) && fields.status.trim().is_empty() {
        errors.push(FieldError::new(
            Field::Status,
            "required when the reporter is QA",
        ));
    }

    let description_len = fields.description.chars().count();
    if fields.description.trim().is_empty() {
        errors.push(FieldError::new(Field::Description, "required"));
    } else if description_len < DESCRIPTION_MIN_LEN {
        errors.push(FieldError::new(
            Field::Description,
            format!("must be at least {DESCRIPTION_MIN_LEN} characters"),
        ));
    } else if description_len > DESCRIPTION_MAX_LEN {
        errors.push(FieldError::new(
            Field::Description,
            format!("must be at most {DESCRIPTION_MAX_LEN} characters"),
        ));
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BugPriority;

    fn valid_fields() -> FormFields {
        FormFields {
            title: "Login button unresponsive".to_string(),
            description: "Clicking the login button does nothing on Firefox 124, \
                          no request leaves the browser."
                .to_string(),
            priority: Some(BugPriority::P2),
            reporter: "DEV".to_string(),
            status: String::new(),
            comment_reporter: String::new(),
            comment_description: String::new(),
        }
    }

    #[test]
    fn test_valid_form_passes() {
        assert!(validate(&valid_fields()).is_empty());
    }

    #[test]
    fn test_status_required_only_for_qa() {
        let mut fields = valid_fields();
        fields.reporter = "QA".to_string();
        fields.status = String::new();

        let errors = validate(&fields);
        assert!(errors.iter().any(|e| e.field == Field::Status));

        fields.status = "Open".to_string();
        assert!(validate(&fields).is_empty());

        // A non-QA reporter with an empty status is fine.
        fields.reporter = "DEV".to_string();
        fields.status = String::new();
        assert!(validate(&fields).is_empty());
    }

    #[test]
    fn test_required_fields_tracks_reporter() {
        let mut fields = valid_fields();
        assert!(!required_fields(&fields).contains(&Field::Status));
        fields.reporter = "QA".to_string();
        assert!(required_fields(&fields).contains(&Field::Status));
    }

    #[test]
    fn test_title_rules() {
        let mut fields = valid_fields();
        fields.title = String::new();
        assert!(validate(&fields).iter().any(|e| e.field == Field::Title));

        fields.title = "abc".to_string();
        let errors = validate(&fields);
        assert!(
            errors
                .iter()
                .any(|e| e.field == Field::Title && e.message.contains("at least 4"))
        );

        fields.title = "abcd".to_string();
        assert!(validate(&fields).is_empty());
    }

    #[test]
    fn test_description_length_rules() {
        let mut fields = valid_fields();

        fields.description = "too short".to_string();
        assert!(
            validate(&fields)
                .iter()
                .any(|e| e.field == Field::Description)
        );

        fields.description = "x".repeat(50);
        assert!(validate(&fields).is_empty());

        fields.description = "x".repeat(1000);
        assert!(validate(&fields).is_empty());

        fields.description = "x".repeat(1001);
        assert!(
            validate(&fields)
                .iter()
                .any(|e| e.field == Field::Description && e.message.contains("at most"))
        );
    }

    #[test]
    fn test_missing_priority_and_reporter() {
        let mut fields = valid_fields();
        fields.priority = None;
        fields.reporter = String::new();
        let errors = validate(&fields);
        assert!(errors.iter().any(|e| e.field == Field::Priority));
        assert!(errors.iter().any(|e| e.field == Field::Reporter));
    }
}
