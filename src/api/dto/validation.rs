use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;
use validator::ValidationError;

static USER_ID_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9._:@-]+$").unwrap());

static EMAIL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap());

pub fn is_user_id(id: &str) -> Result<(), ValidationError> {
    if id.is_empty() || id.len() > 255 {
        return Err(ValidationError::new("0")
            .with_message(Cow::from("User ID must contain between 1 and 255 characters")));
    }

    if !USER_ID_REGEX.is_match(id) {
        return Err(ValidationError::new("0").with_message(Cow::from(
            "User ID may only contain letters, digits and . _ : @ - characters",
        )));
    }

    Ok(())
}

pub fn is_email(email: &str) -> Result<(), ValidationError> {
    if email.len() < 3 || email.len() > 255 {
        return Err(ValidationError::new("0")
            .with_message(Cow::from("Email must contain between 3 and 255 characters")));
    }

    if !EMAIL_REGEX.is_match(email) {
        return Err(ValidationError::new("0").with_message(Cow::from("Invalid email format")));
    }

    Ok(())
}

pub fn is_name(name: &str) -> Result<(), ValidationError> {
    if name.len() > 255 {
        return Err(ValidationError::new("0")
            .with_message(Cow::from("Name must have at most 255 characters")));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[rstest]
    #[case::plain("alpha", true)]
    #[case::provider_scoped("github:1234", true)]
    #[case::empty("", false)]
    #[case::whitespace("al pha", false)]
    #[case::too_long(&"a".repeat(256), false)]
    fn test_user_id(#[case] id: &str, #[case] valid: bool) {
        assert_eq!(is_user_id(id).is_ok(), valid);
    }

    #[rstest]
    #[case::valid("alpha@example.com", true)]
    #[case::missing_domain("alpha@", false)]
    #[case::too_short("a@", false)]
    fn test_email(#[case] email: &str, #[case] valid: bool) {
        assert_eq!(is_email(email).is_ok(), valid);
    }
}
