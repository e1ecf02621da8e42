//! Structural checks on inbound customer payloads.
//!
//! Runs before the service is called; a payload with any violation never
//! reaches the repository. Violations render as `The field<name> <message>`
//! and are joined with the configured separator.

use models::customer::{is_well_formed_email, MAX_EMAIL_LEN, MAX_NAME_LEN};
use serde::Deserialize;
use service::customer::CustomerInput;
use uuid::Uuid;

use crate::errors::ApiError;

pub const MUST_NOT_BE_NULL: &str = "must not be null";
pub const MUST_NOT_BE_BLANK: &str = "must not be blank";
pub const MUST_BE_EMAIL: &str = "must be a well-formed email address";
pub const NAME_TOO_LONG: &str = "size must be between 1 and 255";
pub const EMAIL_TOO_LONG: &str = "size must be between 1 and 320";

/// Raw request body; every field optional so absence is reported as a violation
/// instead of a deserialization failure.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerPayload {
    #[serde(default)]
    pub id: Option<Uuid>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: &'static str,
    pub message: &'static str,
}

impl FieldViolation {
    fn new(field: &'static str, message: &'static str) -> Self { Self { field, message } }

    pub fn render(&self) -> String {
        format!("The field{} {}", self.field, self.message)
    }
}

/// Whether the payload must carry an identifier (update) or not (create).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdRule {
    Ignored,
    Required,
}

pub fn render(violations: &[FieldViolation], separator: &str) -> String {
    violations.iter().map(FieldViolation::render).collect::<Vec<_>>().join(separator)
}

fn check_required_text(
    field: &'static str,
    value: Option<&str>,
    max_len: usize,
    too_long: &'static str,
    out: &mut Vec<FieldViolation>,
) {
    match value {
        None => {
            out.push(FieldViolation::new(field, MUST_NOT_BE_NULL));
            out.push(FieldViolation::new(field, MUST_NOT_BE_BLANK));
        }
        Some(v) if v.trim().is_empty() => out.push(FieldViolation::new(field, MUST_NOT_BE_BLANK)),
        // column widths count characters, not bytes
        Some(v) if v.chars().count() > max_len => out.push(FieldViolation::new(field, too_long)),
        Some(_) => {}
    }
}

/// Collect violations in field order: id, firstName, lastName, email.
pub fn check(payload: &CustomerPayload, id_rule: IdRule) -> Vec<FieldViolation> {
    let mut out = Vec::new();
    if id_rule == IdRule::Required && payload.id.is_none() {
        out.push(FieldViolation::new("id", MUST_NOT_BE_NULL));
    }
    check_required_text("firstName", payload.first_name.as_deref(), MAX_NAME_LEN, NAME_TOO_LONG, &mut out);
    check_required_text("lastName", payload.last_name.as_deref(), MAX_NAME_LEN, NAME_TOO_LONG, &mut out);
    check_required_text("email", payload.email.as_deref(), MAX_EMAIL_LEN, EMAIL_TOO_LONG, &mut out);
    if let Some(email) = payload.email.as_deref() {
        let checkable = !email.trim().is_empty() && email.chars().count() <= MAX_EMAIL_LEN;
        if checkable && !is_well_formed_email(email) {
            out.push(FieldViolation::new("email", MUST_BE_EMAIL));
        }
    }
    out
}

/// Validate and convert into the service's input shape.
pub fn validate(payload: CustomerPayload, id_rule: IdRule, separator: &str) -> Result<CustomerInput, ApiError> {
    let violations = check(&payload, id_rule);
    match (payload.first_name, payload.last_name, payload.email) {
        (Some(first_name), Some(last_name), Some(email)) if violations.is_empty() => {
            let id = match id_rule {
                IdRule::Ignored => None,
                IdRule::Required => payload.id,
            };
            Ok(CustomerInput { id, first_name, last_name, email })
        }
        _ => Err(ApiError::Validation(render(&violations, separator))),
    }
}
