//! Field catalogue for client records.
//!
//! # Responsibility
//! - Name every persisted client field once, with its wire/column name.
//! - Provide a typed value shape shared by in-memory and SQL query paths.
//!
//! # Invariants
//! - `ClientField::name()` is both the file-record key and the SQL column.
//! - Ordering of `FieldValue` of the same kind matches SQLite ordering of
//!   the stored column (integer, binary text, real).

use std::cmp::Ordering;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Persisted client field, in schema order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClientField {
    Id,
    LastName,
    FirstName,
    Patronymic,
    Phone,
    Email,
    PassportSeries,
    PassportNumber,
    ZipCode,
    City,
    Street,
    House,
    TotalSpending,
}

/// Storage type of a field's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Integer,
    Text,
    Decimal,
}

impl ClientField {
    /// All fields in schema order.
    pub const ALL: [ClientField; 13] = [
        Self::Id,
        Self::LastName,
        Self::FirstName,
        Self::Patronymic,
        Self::Phone,
        Self::Email,
        Self::PassportSeries,
        Self::PassportNumber,
        Self::ZipCode,
        Self::City,
        Self::Street,
        Self::House,
        Self::TotalSpending,
    ];

    /// Wire and column name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::LastName => "last_name",
            Self::FirstName => "first_name",
            Self::Patronymic => "patronymic",
            Self::Phone => "phone",
            Self::Email => "email",
            Self::PassportSeries => "passport_series",
            Self::PassportNumber => "passport_number",
            Self::ZipCode => "zip_code",
            Self::City => "city",
            Self::Street => "street",
            Self::House => "house",
            Self::TotalSpending => "total_spending",
        }
    }

    pub fn kind(self) -> FieldKind {
        match self {
            Self::Id | Self::ZipCode => FieldKind::Integer,
            Self::TotalSpending => FieldKind::Decimal,
            _ => FieldKind::Text,
        }
    }

    /// Looks up a field by its wire name.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.name() == name)
    }
}

impl Display for ClientField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Unknown field name supplied by a caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownFieldError(pub String);

impl Display for UnknownFieldError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let available = ClientField::ALL
            .iter()
            .map(|field| field.name())
            .collect::<Vec<_>>()
            .join(", ");
        write!(
            f,
            "unknown client field `{}`; available fields: {available}",
            self.0
        )
    }
}

impl Error for UnknownFieldError {}

impl FromStr for ClientField {
    type Err = UnknownFieldError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value.trim()).ok_or_else(|| UnknownFieldError(value.to_string()))
    }
}

/// A single field value read from a client or supplied as a criterion.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Integer(i64),
    Text(String),
    Decimal(f64),
}

impl FieldValue {
    pub fn kind(&self) -> FieldKind {
        match self {
            Self::Integer(_) => FieldKind::Integer,
            Self::Text(_) => FieldKind::Text,
            Self::Decimal(_) => FieldKind::Decimal,
        }
    }

    /// Converts this value to `kind`, widening integers to decimals.
    ///
    /// Returns `None` when the value cannot represent that kind.
    pub fn coerce_to(self, kind: FieldKind) -> Option<Self> {
        match (self, kind) {
            (value @ Self::Integer(_), FieldKind::Integer) => Some(value),
            (value @ Self::Text(_), FieldKind::Text) => Some(value),
            (value @ Self::Decimal(_), FieldKind::Decimal) => Some(value),
            (Self::Integer(value), FieldKind::Decimal) => Some(Self::Decimal(value as f64)),
            _ => None,
        }
    }

    /// Total order used by in-memory sorting.
    ///
    /// Values of different kinds order as integer < text < decimal; query
    /// paths never mix kinds for one field.
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Integer(left), Self::Integer(right)) => left.cmp(right),
            (Self::Text(left), Self::Text(right)) => left.cmp(right),
            (Self::Decimal(left), Self::Decimal(right)) => left.total_cmp(right),
            _ => kind_rank(self.kind()).cmp(&kind_rank(other.kind())),
        }
    }
}

fn kind_rank(kind: FieldKind) -> u8 {
    match kind {
        FieldKind::Integer => 0,
        FieldKind::Text => 1,
        FieldKind::Decimal => 2,
    }
}

impl Display for FieldValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Integer(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
            Self::Decimal(value) => write!(f, "{value:.2}"),
        }
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Decimal(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

#[cfg(test)]
mod tests {
    use super::{ClientField, FieldKind, FieldValue};
    use std::cmp::Ordering;

    #[test]
    fn parse_round_trips_every_field_name() {
        for field in ClientField::ALL {
            assert_eq!(ClientField::parse(field.name()), Some(field));
        }
        assert_eq!(ClientField::parse("nickname"), None);
    }

    #[test]
    fn unknown_field_error_lists_available_fields() {
        let err = "nickname".parse::<ClientField>().unwrap_err();
        let message = err.to_string();
        assert!(message.contains("nickname"));
        assert!(message.contains("total_spending"));
    }

    #[test]
    fn coerce_widens_integer_to_decimal_only() {
        assert_eq!(
            FieldValue::from(10).coerce_to(FieldKind::Decimal),
            Some(FieldValue::Decimal(10.0))
        );
        assert_eq!(FieldValue::from("10").coerce_to(FieldKind::Integer), None);
        assert_eq!(FieldValue::from(1.5).coerce_to(FieldKind::Integer), None);
    }

    #[test]
    fn text_ordering_is_bytewise() {
        let upper = FieldValue::from("Zeta");
        let lower = FieldValue::from("alpha");
        assert_eq!(upper.total_cmp(&lower), Ordering::Less);
    }
}
