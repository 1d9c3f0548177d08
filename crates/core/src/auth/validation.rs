use super::AuthError;

/// Lower-cases and trims an email address for storage and lookup.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Minimal shape check: one `@` with a non-empty local part and a dotted domain.
pub fn validate_email(email: &str) -> Result<(), AuthError> {
    let (local, domain) = email.split_once('@').ok_or(AuthError::InvalidEmail)?;

    let domain_ok = !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.');

    if local.is_empty() || !domain_ok || email.chars().any(char::is_whitespace) {
        return Err(AuthError::InvalidEmail);
    }
    Ok(())
}

/// Rejects passwords shorter than `min_length` characters.
pub fn validate_password(password: &str, min_length: usize) -> Result<(), AuthError> {
    if password.chars().count() < min_length {
        return Err(AuthError::PasswordTooShort { min: min_length });
    }
    Ok(())
}
