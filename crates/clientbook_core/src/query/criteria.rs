//! Immutable query criteria: one equality filter and one order.

use crate::model::client::Client;
use crate::model::field::{ClientField, FieldValue};
use crate::repo::client_repo::{RepoError, RepoResult};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// `field == value`, with `value` already coerced to the field's kind.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    field: ClientField,
    value: FieldValue,
}

impl Filter {
    /// Builds an equality filter.
    ///
    /// Fails with `InvalidArgument` when `value` cannot be compared with
    /// `field` (for example text against `zip_code`).
    pub fn eq(field: ClientField, value: impl Into<FieldValue>) -> RepoResult<Self> {
        let value = value.into();
        let kind = value.kind();
        let value = value.coerce_to(field.kind()).ok_or_else(|| {
            RepoError::InvalidArgument(format!(
                "filter value of kind {kind:?} cannot be compared with field `{field}`"
            ))
        })?;
        Ok(Self { field, value })
    }

    pub fn field(&self) -> ClientField {
        self.field
    }

    pub fn value(&self) -> &FieldValue {
        &self.value
    }

    pub fn matches(&self, client: &Client) -> bool {
        client.field_value(self.field) == self.value
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Ascending => "ASC",
            Self::Descending => "DESC",
        }
    }
}

impl FromStr for SortDirection {
    type Err = RepoError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "ASC" => Ok(Self::Ascending),
            "DESC" => Ok(Self::Descending),
            other => Err(RepoError::InvalidArgument(format!(
                "sort direction must be ASC or DESC, got `{other}`"
            ))),
        }
    }
}

/// Per-read ordering. Unlike `ClientRepository::sort_by_field` it never
/// changes what is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Order {
    pub field: ClientField,
    pub direction: SortDirection,
}

impl Order {
    pub fn asc(field: ClientField) -> Self {
        Self {
            field,
            direction: SortDirection::Ascending,
        }
    }

    pub fn desc(field: ClientField) -> Self {
        Self {
            field,
            direction: SortDirection::Descending,
        }
    }

    /// Parses `("last_name", "desc")`-style caller input.
    pub fn parse(field_name: &str, direction: &str) -> RepoResult<Self> {
        Ok(Self {
            field: field_name.parse()?,
            direction: direction.parse()?,
        })
    }
}

impl Display for Order {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.field, self.direction.as_sql())
    }
}

/// Filter and order slots. Every `with_*` / `without_*` call returns a new
/// value and leaves the receiver untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientQuery {
    filter: Option<Filter>,
    order: Option<Order>,
}

impl ClientQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the filter slot.
    pub fn with_filter(&self, filter: Filter) -> Self {
        Self {
            filter: Some(filter),
            order: self.order,
        }
    }

    pub fn without_filter(&self) -> Self {
        Self {
            filter: None,
            order: self.order,
        }
    }

    /// Replaces the order slot.
    pub fn with_order(&self, order: Order) -> Self {
        Self {
            filter: self.filter.clone(),
            order: Some(order),
        }
    }

    pub fn without_order(&self) -> Self {
        Self {
            filter: self.filter.clone(),
            order: None,
        }
    }

    pub fn filter(&self) -> Option<&Filter> {
        self.filter.as_ref()
    }

    pub fn order(&self) -> Option<Order> {
        self.order
    }
}
