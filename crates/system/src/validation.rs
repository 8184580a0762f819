//! Form validation plumbing shared by every record form.
//!
//! Field rules are declared with `validator` derives on the form structs;
//! this module turns their output into [`FormErrors`], which the UI renders
//! inline per field and which never reaches the backend.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;
use validator::{Validate, ValidationError, ValidationErrors, ValidationErrorsKind};

use kinit_core::DomainError;

type Pattern = LazyLock<Result<Regex, regex::Error>>;

static PHONE: Pattern = LazyLock::new(|| Regex::new(r"^1[3-9]\d{9}$"));
static DEPT_CODE: Pattern = LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$"));
static IDENT: Pattern = LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]+$"));
static PERMISSION_CODE: Pattern = LazyLock::new(|| Regex::new(r"^[A-Za-z0-9:]+$"));

fn matches(pattern: &Pattern, value: &str) -> bool {
    pattern.as_ref().is_ok_and(|re| re.is_match(value))
}

/// Mainland mobile number (`1[3-9]` followed by nine digits).
pub fn is_phone(value: &str) -> bool {
    matches(&PHONE, value)
}

/// Letters, digits, `_` and `-`.
pub fn is_dept_code(value: &str) -> bool {
    matches(&DEPT_CODE, value)
}

/// Letters, digits and `_` (role codes, usernames).
pub fn is_identifier(value: &str) -> bool {
    matches(&IDENT, value)
}

/// Letters, digits and `:` (e.g. `user:create`).
pub fn is_permission_code(value: &str) -> bool {
    matches(&PERMISSION_CODE, value)
}

/// A rule failure whose code is the offending field name.
pub(crate) fn rule(field: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(field).with_message(Cow::Borrowed(message))
}

/// One failed field rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Every failed rule of a form, ordered by field name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("form validation failed: {}", summary(.0))]
pub struct FormErrors(Vec<FieldError>);

fn summary(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl FormErrors {
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self(vec![FieldError {
            field: field.into(),
            message: message.into(),
        }])
    }

    pub fn fields(&self) -> &[FieldError] {
        &self.0
    }

    /// First message reported for `field`.
    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn has(&self, field: &str) -> bool {
        self.message_for(field).is_some()
    }

    fn extend(&mut self, other: FormErrors) {
        self.0.extend(other.0);
        self.0.sort_by(|a, b| a.field.cmp(&b.field));
    }
}

impl From<ValidationErrors> for FormErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut out = Vec::new();
        for (field, kind) in errors.errors() {
            let ValidationErrorsKind::Field(failures) = kind else {
                continue;
            };
            for failure in failures {
                // Struct-level (schema) failures carry the field name as their code.
                let field = if *field == "__all__" {
                    failure.code.to_string()
                } else {
                    field.to_string()
                };
                let message = failure
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| failure.code.to_string());
                out.push(FieldError { field, message });
            }
        }
        out.sort_by(|a, b| a.field.cmp(&b.field));
        Self(out)
    }
}

impl From<FormErrors> for DomainError {
    fn from(errors: FormErrors) -> Self {
        match errors.0.into_iter().next() {
            Some(first) => DomainError::validation(first.field, first.message),
            None => DomainError::invariant("form validation failed without a field error"),
        }
    }
}

/// Run the declared field rules of `form`.
pub fn check<T: Validate + ?Sized>(form: &T) -> Result<(), FormErrors> {
    form.validate().map_err(FormErrors::from)
}

/// Reject a change to a field that is read-only in edit mode.
pub(crate) fn unchanged<V: PartialEq>(
    field: &'static str,
    message: &'static str,
    before: &V,
    after: &V,
) -> Result<(), FormErrors> {
    if before == after {
        Ok(())
    } else {
        Err(FormErrors::single(field, message))
    }
}

/// Combine several rule outcomes, keeping every failure.
pub(crate) fn all(
    results: impl IntoIterator<Item = Result<(), FormErrors>>,
) -> Result<(), FormErrors> {
    let mut merged: Option<FormErrors> = None;
    for result in results {
        if let Err(errors) = result {
            match merged.as_mut() {
                Some(acc) => acc.extend(errors),
                None => merged = Some(errors),
            }
        }
    }
    merged.map_or(Ok(()), Err)
}

/// A create/edit form bound to the record it produces.
pub trait RecordForm: Validate {
    type Record;

    /// Rules applied before a create request is sent.
    fn check_create(&self) -> Result<(), FormErrors> {
        check(self)
    }

    /// Rules applied before an update of `current` is sent (field rules plus
    /// the fields that are read-only in edit mode).
    fn check_update(&self, current: &Self::Record) -> Result<(), FormErrors>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patterns() {
        assert!(is_phone("13800138000"));
        assert!(!is_phone("12800138000"));
        assert!(!is_phone("1380013800"));
        assert!(is_dept_code("tech-front_1"));
        assert!(!is_dept_code(" headquarter"));
        assert!(is_identifier("super_admin"));
        assert!(!is_identifier("super-admin"));
        assert!(is_permission_code("user:create"));
        assert!(!is_permission_code("user.create"));
    }

    #[test]
    fn merging_keeps_every_failure_in_field_order() {
        let merged = all([
            Err(FormErrors::single("type", "t")),
            Ok(()),
            Err(FormErrors::single("code", "c")),
        ])
        .unwrap_err();

        let fields: Vec<&str> = merged.fields().iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["code", "type"]);
        assert_eq!(DomainError::from(merged).field(), Some("code"));
    }
}
