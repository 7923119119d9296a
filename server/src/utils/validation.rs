//! Input validation helpers
//!
//! Adapter from `validator`'s derive output to the per-field error map the
//! API returns.

use validator::Validate;

use crate::utils::{AppError, FieldErrors};

/// Run a payload's derived validators, collapsing the result into the
/// per-field error map the API returns on 400s.
pub fn validate_payload<T: Validate>(payload: &T) -> Result<(), AppError> {
    payload.validate().map_err(|e| {
        let mut errors = FieldErrors::new();
        for (field, field_errors) in e.field_errors() {
            let message = field_errors
                .first()
                .and_then(|fe| fe.message.as_ref())
                .map(|m| m.to_string())
                .unwrap_or_else(|| format!("{field} is invalid"));
            errors.insert(field.to_string(), message);
        }
        AppError::FieldValidation(errors)
    })
}
