use validator::{Validate, ValidationError};

use crate::error::AppResult;

/// Phone numbers are exactly ten ASCII digits.
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    if phone.len() == 10 && phone.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(ValidationError::new("phone"))
    }
}

pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::new("required"))
    } else {
        Ok(())
    }
}

/// Run the derived validators and hand the payload back on success.
pub fn validated<T: Validate>(payload: T) -> AppResult<T> {
    payload.validate()?;
    Ok(payload)
}
