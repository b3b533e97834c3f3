use crate::errors::{AppError, Result};

pub mod jwt;
pub mod password;

pub use jwt::JwtService;
pub use password::PasswordService;

/// Accepts addresses of the shape `local@domain.tld`. Anything fancier is
/// the identity provider's problem; this only guards obvious typos before a
/// remote call is made.
pub fn validate_email(email: &str) -> Result<()> {
    let mut parts = email.split('@');
    let (local, domain) = match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => (local, domain),
        _ => return Err(AppError::Validation("Invalid email format".to_string())),
    };

    let domain_ok = domain.split('.').count() >= 2
        && domain.split('.').all(|label| !label.is_empty());

    if local.is_empty() || !domain_ok || email.chars().any(char::is_whitespace) {
        return Err(AppError::Validation("Invalid email format".to_string()));
    }

    Ok(())
}
