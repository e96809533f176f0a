//! Input rules enforced by callers before they reach the store.
//!
//! The store accepts whatever it is given; forms use these to decide whether
//! to show an alert or submit.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Product name must not be empty")]
    EmptyName,
    #[error("Amount must be greater than zero")]
    NonPositiveAmount,
    #[error("Amount is not a whole number: {0}")]
    InvalidAmount(String),
}

/// Checks the fields a create or edit form requires.
pub fn validate_new_product(name: &str, amount: u32) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyName);
    }
    if amount == 0 {
        return Err(ValidationError::NonPositiveAmount);
    }
    Ok(())
}

/// Parses a quantity typed into a numeric field.
///
/// Non-digit characters are stripped first, the way the quantity input filters
/// keystrokes.
pub fn parse_amount(input: &str) -> Result<u32, ValidationError> {
    let digits: String = input.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return Err(ValidationError::InvalidAmount(input.to_string()));
    }
    let amount: u32 = digits
        .parse()
        .map_err(|_| ValidationError::InvalidAmount(input.to_string()))?;
    if amount == 0 {
        return Err(ValidationError::NonPositiveAmount);
    }
    Ok(amount)
}
