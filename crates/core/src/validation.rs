//! Client-side input checks.
//!
//! Each check returns `Err(message)` with text suitable for an inline form
//! message. The facade runs these before issuing any store call; the store
//! still enforces its own constraints.

/// Amounts (payments, expenses, donations) must be finite and strictly positive.
pub fn validate_amount(label: &str, amount: f64) -> Result<(), String> {
    if !amount.is_finite() {
        return Err(format!("{label} must be a number"));
    }
    if amount <= 0.0 {
        return Err(format!("{label} must be greater than zero"));
    }
    Ok(())
}

/// Fees, salaries and marks may be zero but never negative.
pub fn validate_non_negative(label: &str, value: f64) -> Result<(), String> {
    if !value.is_finite() {
        return Err(format!("{label} must be a number"));
    }
    if value < 0.0 {
        return Err(format!("{label} cannot be negative"));
    }
    Ok(())
}

/// Required text must contain something other than whitespace.
pub fn validate_required(label: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{label} is required"));
    }
    Ok(())
}

/// The value must be one of the enumerated `allowed` values.
pub fn validate_one_of(label: &str, value: &str, allowed: &[&str]) -> Result<(), String> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(format!(
            "Invalid {label} '{value}'. Must be one of: {}",
            allowed.join(", ")
        ))
    }
}

/// Phone numbers: digits with an optional leading `+`, spaces and dashes
/// allowed as separators, at least 7 digits.
pub fn validate_phone(label: &str, value: &str) -> Result<(), String> {
    let trimmed = value.trim();
    let body = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let valid_chars = body
        .chars()
        .all(|c| c.is_ascii_digit() || c == ' ' || c == '-');
    let digits = body.chars().filter(char::is_ascii_digit).count();
    if !valid_chars || digits < 7 {
        return Err(format!("{label} is not a valid phone number"));
    }
    Ok(())
}

/// Minimal shape check; the store owns uniqueness.
pub fn validate_email(value: &str) -> Result<(), String> {
    let trimmed = value.trim();
    match trimmed.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
        _ => Err("Email address is not valid".to_string()),
    }
}

/// A recitation range must start at ayah 1 or later and not run backwards.
pub fn validate_ayah_range(from_ayah: i64, to_ayah: i64) -> Result<(), String> {
    if from_ayah < 1 {
        return Err("Starting ayah must be 1 or greater".to_string());
    }
    if to_ayah < from_ayah {
        return Err("Ending ayah cannot come before the starting ayah".to_string());
    }
    Ok(())
}

/// Run a list of checks and return the first failure.
pub fn first_error<I>(checks: I) -> Result<(), String>
where
    I: IntoIterator<Item = Result<(), String>>,
{
    checks.into_iter().collect()
}
