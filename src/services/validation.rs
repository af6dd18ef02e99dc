//! Input checks shared by the user and post services. Each check appends a
//! message to a list so one response can report every problem at once.

/// Record `"<field> is required"` when `value` is blank.
pub fn require(field: &str, value: &str, errors: &mut Vec<String>) {
    if value.trim().is_empty() {
        errors.push(format!("{} is required", field));
    }
}

/// Like `require`, for a field that may be absent from a partial update.
/// Absent is fine; present-but-blank is not.
pub fn require_if_present(field: &str, value: Option<&str>, errors: &mut Vec<String>) {
    if let Some(value) = value {
        if value.trim().is_empty() {
            errors.push(format!("{} cannot be empty", field));
        }
    }
}

/// Validate email format
///
/// Syntactic check only: one `@`, a non-empty local part, and a dotted domain
/// without empty labels or whitespace.
pub fn validate_email_format(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("email is required".to_string());
    }

    if email.chars().any(char::is_whitespace) {
        return Err("invalid email".to_string());
    }

    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
        return Err("invalid email".to_string());
    }

    let domain = parts[1];
    if !domain.contains('.') || domain.split('.').any(str::is_empty) {
        return Err("invalid email".to_string());
    }

    Ok(())
}

/// Collect the email format error, if any, into `errors`.
pub fn check_email(email: &str, errors: &mut Vec<String>) {
    // Blank emails are reported by `require`
    if email.trim().is_empty() {
        return;
    }
    if let Err(msg) = validate_email_format(email.trim()) {
        errors.push(msg);
    }
}
