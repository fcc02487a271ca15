//! Schema checks for request payloads.
//!
//! Every payload type implements [`Validate`]; handlers run it before any
//! service logic so that malformed requests never reach storage.

use crate::error::ValidationError;
use jiff::Zoned;

type Result<T> = std::result::Result<T, ValidationError>;

/// Earliest year accepted for albums and songs.
pub const MIN_YEAR: i32 = 1900;

/// Longest id a payload may reference; matches the `VARCHAR(50)` id columns.
pub const ID_MAX_LENGTH: usize = 50;

const USERNAME_MAX_LENGTH: usize = 50;
const USERNAME_MIN_LENGTH: usize = 3;

/// Image content types accepted for album covers.
pub const IMAGE_CONTENT_TYPES: &[&str] = &[
    "image/apng",
    "image/avif",
    "image/gif",
    "image/jpeg",
    "image/png",
    "image/webp",
];

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub(crate) fn non_empty(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ValidationError(format!("\"{field}\" is not allowed to be empty")));
    }
    Ok(())
}

pub(crate) fn year(field: &str, value: i32) -> Result<()> {
    let max = i32::from(Zoned::now().year());
    if !(MIN_YEAR..=max).contains(&value) {
        return Err(ValidationError(format!(
            "\"{field}\" must be between {MIN_YEAR} and {max}"
        )));
    }
    Ok(())
}

/// A reference to another entity by id.
pub(crate) fn id_reference(field: &str, value: &str) -> Result<()> {
    non_empty(field, value)?;

    if value.len() > ID_MAX_LENGTH {
        return Err(ValidationError(format!(
            "\"{field}\" length must be less than or equal to {ID_MAX_LENGTH} characters long"
        )));
    }
    Ok(())
}

pub(crate) fn username(value: &str) -> Result<()> {
    non_empty("username", value)?;

    if value.len() < USERNAME_MIN_LENGTH || value.len() > USERNAME_MAX_LENGTH {
        return Err(ValidationError(format!(
            "\"username\" length must be between {USERNAME_MIN_LENGTH} and {USERNAME_MAX_LENGTH}"
        )));
    }

    if !value.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(ValidationError::new(
            "\"username\" must only contain alphanumeric characters or underscores",
        ));
    }

    Ok(())
}

/// Minimal `local@domain.tld` shape check.
pub(crate) fn email(field: &str, value: &str) -> Result<()> {
    let invalid = || ValidationError(format!("\"{field}\" must be a valid email"));

    let (local, domain) = value.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') || value.chars().any(char::is_whitespace) {
        return Err(invalid());
    }

    let Some((host, tld)) = domain.rsplit_once('.') else {
        return Err(invalid());
    };
    if host.is_empty() || tld.len() < 2 {
        return Err(invalid());
    }

    Ok(())
}

/// Checks the content type of an uploaded cover image.
pub fn image_content_type(content_type: Option<&str>) -> Result<()> {
    let content_type = content_type.unwrap_or_default();
    // Drop parameters such as `; charset=...`.
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    if IMAGE_CONTENT_TYPES.contains(&essence.as_str()) {
        Ok(())
    } else {
        Err(ValidationError(format!(
            "\"content-type\" must be one of [{}]",
            IMAGE_CONTENT_TYPES.join(", ")
        )))
    }
}
