//! Field format rules for client records.
//!
//! Each `check_*` function returns the accepted value on success so
//! setters store exactly what was validated.

use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

static NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\p{L} \-]+$").expect("valid name regex"));
static PHONE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^7[0-9]{10}$").expect("valid phone regex"));
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}$").expect("valid email regex")
});
static PASSPORT_SERIES_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{4}$").expect("valid passport series regex"));
static PASSPORT_NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{6}$").expect("valid passport number regex"));

pub(crate) const ZIP_CODE_MIN: i64 = 100_000;
pub(crate) const ZIP_CODE_MAX: i64 = 999_999;

/// Validation failure raised while constructing or mutating a `Client`.
///
/// Every variant carries the rejected value so callers can echo it back.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientValidationError {
    /// Ids are positive once assigned.
    NonPositiveId(i64),
    /// Surname, given name or patronymic is empty or has characters other
    /// than letters, spaces and hyphens.
    InvalidName { field: &'static str, value: String },
    /// Phone is not 11 digits starting with `7`.
    InvalidPhone(String),
    /// Email does not match `local@domain.tld`.
    InvalidEmail(String),
    /// Passport series is not exactly 4 digits.
    InvalidPassportSeries(String),
    /// Passport number is not exactly 6 digits.
    InvalidPassportNumber(String),
    /// Postal code is outside `[100000, 999999]`.
    ZipCodeOutOfRange(i64),
    /// City, street or house is blank.
    EmptyAddressPart { field: &'static str },
    /// Lifetime spending is negative or not a finite number.
    InvalidSpending(f64),
}

impl ClientValidationError {
    /// Persisted name of the field that failed validation.
    pub fn field(&self) -> &'static str {
        match self {
            Self::NonPositiveId(_) => "id",
            Self::InvalidName { field, .. } => field,
            Self::InvalidPhone(_) => "phone",
            Self::InvalidEmail(_) => "email",
            Self::InvalidPassportSeries(_) => "passport_series",
            Self::InvalidPassportNumber(_) => "passport_number",
            Self::ZipCodeOutOfRange(_) => "zip_code",
            Self::EmptyAddressPart { field } => field,
            Self::InvalidSpending(_) => "total_spending",
        }
    }
}

impl Display for ClientValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonPositiveId(value) => write!(f, "id must be positive, got {value}"),
            Self::InvalidName { field, value } => write!(
                f,
                "{field} must be non-empty and contain only letters, spaces or hyphens, got `{value}`"
            ),
            Self::InvalidPhone(value) => {
                write!(f, "phone must be 11 digits starting with 7, got `{value}`")
            }
            Self::InvalidEmail(value) => write!(f, "email has invalid format: `{value}`"),
            Self::InvalidPassportSeries(value) => {
                write!(f, "passport series must be exactly 4 digits, got `{value}`")
            }
            Self::InvalidPassportNumber(value) => {
                write!(f, "passport number must be exactly 6 digits, got `{value}`")
            }
            Self::ZipCodeOutOfRange(value) => write!(
                f,
                "zip code must be within [{ZIP_CODE_MIN}, {ZIP_CODE_MAX}], got {value}"
            ),
            Self::EmptyAddressPart { field } => write!(f, "{field} cannot be empty"),
            Self::InvalidSpending(value) => {
                write!(f, "total spending must be a non-negative number, got {value}")
            }
        }
    }
}

impl Error for ClientValidationError {}

pub(crate) fn check_id(value: i64) -> Result<i64, ClientValidationError> {
    if value <= 0 {
        return Err(ClientValidationError::NonPositiveId(value));
    }
    Ok(value)
}

pub(crate) fn check_name(field: &'static str, value: &str) -> Result<String, ClientValidationError> {
    if value.trim().is_empty() || !NAME_RE.is_match(value) {
        return Err(ClientValidationError::InvalidName {
            field,
            value: value.to_string(),
        });
    }
    Ok(value.to_string())
}

/// Patronymic may be empty; when present it follows the name rule.
pub(crate) fn check_patronymic(value: &str) -> Result<String, ClientValidationError> {
    if value.is_empty() {
        return Ok(String::new());
    }
    check_name("patronymic", value)
}

pub(crate) fn check_phone(value: &str) -> Result<String, ClientValidationError> {
    if !PHONE_RE.is_match(value) {
        return Err(ClientValidationError::InvalidPhone(value.to_string()));
    }
    Ok(value.to_string())
}

pub(crate) fn check_email(value: &str) -> Result<String, ClientValidationError> {
    if !EMAIL_RE.is_match(value) {
        return Err(ClientValidationError::InvalidEmail(value.to_string()));
    }
    Ok(value.to_string())
}

pub(crate) fn check_passport_series(value: &str) -> Result<String, ClientValidationError> {
    if !PASSPORT_SERIES_RE.is_match(value) {
        return Err(ClientValidationError::InvalidPassportSeries(
            value.to_string(),
        ));
    }
    Ok(value.to_string())
}

pub(crate) fn check_passport_number(value: &str) -> Result<String, ClientValidationError> {
    if !PASSPORT_NUMBER_RE.is_match(value) {
        return Err(ClientValidationError::InvalidPassportNumber(
            value.to_string(),
        ));
    }
    Ok(value.to_string())
}

pub(crate) fn check_zip_code(value: i64) -> Result<i64, ClientValidationError> {
    if !(ZIP_CODE_MIN..=ZIP_CODE_MAX).contains(&value) {
        return Err(ClientValidationError::ZipCodeOutOfRange(value));
    }
    Ok(value)
}

pub(crate) fn check_address_part(
    field: &'static str,
    value: &str,
) -> Result<String, ClientValidationError> {
    if value.trim().is_empty() {
        return Err(ClientValidationError::EmptyAddressPart { field });
    }
    Ok(value.to_string())
}

pub(crate) fn check_spending(value: f64) -> Result<f64, ClientValidationError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ClientValidationError::InvalidSpending(value));
    }
    // -0.0 collapses to 0.0.
    Ok(if value == 0.0 { 0.0 } else { value })
}
