use validator::{ValidateEmail, ValidateLength};

use crate::{auth::Role, error::AppError};

pub const MIN_PASSWORD_LEN: u64 = 6;

pub fn validate_email(email: &str) -> Result<(), AppError> {
    // validator accepts single-label domains; a login address needs a dotted one.
    let has_dotted_domain = email
        .rsplit_once('@')
        .is_some_and(|(_, domain)| domain.contains('.'));

    if email.validate_email() && has_dotted_domain {
        Ok(())
    } else {
        Err(AppError::bad_request("Invalid email format"))
    }
}

pub fn validate_password(password: &str) -> Result<(), AppError> {
    if !password.validate_length(Some(MIN_PASSWORD_LEN), None, None) {
        return Err(AppError::bad_request(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

/// Absent role means USER; anything else must name a known role exactly.
pub fn parse_role(role: Option<&str>) -> Result<Role, AppError> {
    match role {
        None => Ok(Role::User),
        Some(value) => Role::try_from(value)
            .map_err(|_| AppError::bad_request(format!("Unknown role: {value}"))),
    }
}
