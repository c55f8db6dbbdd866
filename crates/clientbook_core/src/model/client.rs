//! Client entity and its short projection.
//!
//! # Responsibility
//! - Hold one client's personal, passport, address and spending data.
//! - Route every assignment through the field rules in `validate`.
//! - Define the persisted wire shape (`ClientRecord`) shared by all backends.
//!
//! # Invariants
//! - Fields are private; a `Client` cannot be observed in an invalid state.
//! - Deserialization validates, so a malformed record never becomes a `Client`.
//! - Equality is by id when both sides carry one, else by `(phone, email)`.

use super::field::{ClientField, FieldValue};
use super::validate::{
    check_address_part, check_email, check_id, check_name, check_passport_number,
    check_passport_series, check_patronymic, check_phone, check_spending, check_zip_code,
};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

pub use super::validate::ClientValidationError;

/// Positive integer identity assigned by a repository.
pub type ClientId = i64;

/// Persisted record shape, field-for-field with the `clients` table.
///
/// This is a plain carrier with no guarantees; convert it with
/// `Client::new` to get a validated entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientRecord {
    #[serde(default)]
    pub id: Option<ClientId>,
    pub last_name: String,
    pub first_name: String,
    #[serde(default)]
    pub patronymic: String,
    pub phone: String,
    pub email: String,
    pub passport_series: String,
    pub passport_number: String,
    pub zip_code: i64,
    pub city: String,
    pub street: String,
    pub house: String,
    pub total_spending: f64,
}

/// Validated client entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "ClientRecord", into = "ClientRecord")]
pub struct Client {
    id: Option<ClientId>,
    last_name: String,
    first_name: String,
    patronymic: String,
    phone: String,
    email: String,
    passport_series: String,
    passport_number: String,
    zip_code: i64,
    city: String,
    street: String,
    house: String,
    total_spending: f64,
}

impl Client {
    /// Builds a client from a raw record.
    ///
    /// Fields are checked in schema order; the first failure aborts.
    pub fn new(record: ClientRecord) -> Result<Self, ClientValidationError> {
        Ok(Self {
            id: record.id.map(check_id).transpose()?,
            last_name: check_name("last_name", &record.last_name)?,
            first_name: check_name("first_name", &record.first_name)?,
            patronymic: check_patronymic(&record.patronymic)?,
            phone: check_phone(&record.phone)?,
            email: check_email(&record.email)?,
            passport_series: check_passport_series(&record.passport_series)?,
            passport_number: check_passport_number(&record.passport_number)?,
            zip_code: check_zip_code(record.zip_code)?,
            city: check_address_part("city", &record.city)?,
            street: check_address_part("street", &record.street)?,
            house: check_address_part("house", &record.house)?,
            total_spending: check_spending(record.total_spending)?,
        })
    }

    /// Copies the entity back into its persisted shape.
    pub fn to_record(&self) -> ClientRecord {
        ClientRecord {
            id: self.id,
            last_name: self.last_name.clone(),
            first_name: self.first_name.clone(),
            patronymic: self.patronymic.clone(),
            phone: self.phone.clone(),
            email: self.email.clone(),
            passport_series: self.passport_series.clone(),
            passport_number: self.passport_number.clone(),
            zip_code: self.zip_code,
            city: self.city.clone(),
            street: self.street.clone(),
            house: self.house.clone(),
            total_spending: self.total_spending,
        }
    }

    pub fn id(&self) -> Option<ClientId> {
        self.id
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    /// Empty when the client has no patronymic.
    pub fn patronymic(&self) -> &str {
        &self.patronymic
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn passport_series(&self) -> &str {
        &self.passport_series
    }

    pub fn passport_number(&self) -> &str {
        &self.passport_number
    }

    pub fn zip_code(&self) -> i64 {
        self.zip_code
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn street(&self) -> &str {
        &self.street
    }

    pub fn house(&self) -> &str {
        &self.house
    }

    pub fn total_spending(&self) -> f64 {
        self.total_spending
    }

    pub fn set_id(&mut self, value: ClientId) -> Result<(), ClientValidationError> {
        self.id = Some(check_id(value)?);
        Ok(())
    }

    pub fn set_last_name(&mut self, value: &str) -> Result<(), ClientValidationError> {
        self.last_name = check_name("last_name", value)?;
        Ok(())
    }

    pub fn set_first_name(&mut self, value: &str) -> Result<(), ClientValidationError> {
        self.first_name = check_name("first_name", value)?;
        Ok(())
    }

    pub fn set_patronymic(&mut self, value: &str) -> Result<(), ClientValidationError> {
        self.patronymic = check_patronymic(value)?;
        Ok(())
    }

    pub fn set_phone(&mut self, value: &str) -> Result<(), ClientValidationError> {
        self.phone = check_phone(value)?;
        Ok(())
    }

    pub fn set_email(&mut self, value: &str) -> Result<(), ClientValidationError> {
        self.email = check_email(value)?;
        Ok(())
    }

    pub fn set_passport_series(&mut self, value: &str) -> Result<(), ClientValidationError> {
        self.passport_series = check_passport_series(value)?;
        Ok(())
    }

    pub fn set_passport_number(&mut self, value: &str) -> Result<(), ClientValidationError> {
        self.passport_number = check_passport_number(value)?;
        Ok(())
    }

    pub fn set_zip_code(&mut self, value: i64) -> Result<(), ClientValidationError> {
        self.zip_code = check_zip_code(value)?;
        Ok(())
    }

    pub fn set_city(&mut self, value: &str) -> Result<(), ClientValidationError> {
        self.city = check_address_part("city", value)?;
        Ok(())
    }

    pub fn set_street(&mut self, value: &str) -> Result<(), ClientValidationError> {
        self.street = check_address_part("street", value)?;
        Ok(())
    }

    pub fn set_house(&mut self, value: &str) -> Result<(), ClientValidationError> {
        self.house = check_address_part("house", value)?;
        Ok(())
    }

    pub fn set_total_spending(&mut self, value: f64) -> Result<(), ClientValidationError> {
        self.total_spending = check_spending(value)?;
        Ok(())
    }

    /// Reads one field as a query value. An unassigned id reads as `0`.
    pub fn field_value(&self, field: ClientField) -> FieldValue {
        match field {
            ClientField::Id => FieldValue::Integer(self.id.unwrap_or(0)),
            ClientField::LastName => FieldValue::Text(self.last_name.clone()),
            ClientField::FirstName => FieldValue::Text(self.first_name.clone()),
            ClientField::Patronymic => FieldValue::Text(self.patronymic.clone()),
            ClientField::Phone => FieldValue::Text(self.phone.clone()),
            ClientField::Email => FieldValue::Text(self.email.clone()),
            ClientField::PassportSeries => FieldValue::Text(self.passport_series.clone()),
            ClientField::PassportNumber => FieldValue::Text(self.passport_number.clone()),
            ClientField::ZipCode => FieldValue::Integer(self.zip_code),
            ClientField::City => FieldValue::Text(self.city.clone()),
            ClientField::Street => FieldValue::Text(self.street.clone()),
            ClientField::House => FieldValue::Text(self.house.clone()),
            ClientField::TotalSpending => FieldValue::Decimal(self.total_spending),
        }
    }

    /// Copies every field except id from `other`.
    pub(crate) fn overwrite_from(&mut self, other: &Client) {
        let id = self.id;
        *self = other.clone();
        self.id = id;
    }
}

impl TryFrom<ClientRecord> for Client {
    type Error = ClientValidationError;

    fn try_from(value: ClientRecord) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Client> for ClientRecord {
    fn from(value: Client) -> Self {
        ClientRecord {
            id: value.id,
            last_name: value.last_name,
            first_name: value.first_name,
            patronymic: value.patronymic,
            phone: value.phone,
            email: value.email,
            passport_series: value.passport_series,
            passport_number: value.passport_number,
            zip_code: value.zip_code,
            city: value.city,
            street: value.street,
            house: value.house,
            total_spending: value.total_spending,
        }
    }
}

impl PartialEq for Client {
    fn eq(&self, other: &Self) -> bool {
        match (self.id, other.id) {
            (Some(left), Some(right)) => left == right,
            _ => self.phone == other.phone && self.email == other.email,
        }
    }
}

impl Eq for Client {}

impl Display for Client {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.id {
            Some(id) => write!(f, "#{id} ")?,
            None => f.write_str("#new ")?,
        }
        write!(f, "{} {}", self.last_name, self.first_name)?;
        if !self.patronymic.is_empty() {
            write!(f, " {}", self.patronymic)?;
        }
        write!(
            f,
            ", {}, {}, {} {}, {} {}",
            self.phone, self.email, self.zip_code, self.city, self.street, self.house
        )
    }
}

/// Read-only list projection of a `Client`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClientShort {
    id: Option<ClientId>,
    short_name: String,
    contact: String,
    total_spending: f64,
}

impl ClientShort {
    pub fn id(&self) -> Option<ClientId> {
        self.id
    }

    /// `"Surname I."` or `"Surname I.O."` when a patronymic is present.
    pub fn short_name(&self) -> &str {
        &self.short_name
    }

    /// Phone, or email when no phone is recorded.
    pub fn contact(&self) -> &str {
        &self.contact
    }

    pub fn total_spending(&self) -> f64 {
        self.total_spending
    }
}

impl From<&Client> for ClientShort {
    fn from(client: &Client) -> Self {
        let mut short_name = format!("{} {}", client.last_name, initial(&client.first_name));
        if !client.patronymic.is_empty() {
            short_name.push_str(&initial(&client.patronymic));
        }

        let contact = if client.phone.is_empty() {
            client.email.clone()
        } else {
            client.phone.clone()
        };

        Self {
            id: client.id,
            short_name,
            contact,
            total_spending: client.total_spending,
        }
    }
}

impl Display for ClientShort {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if let Some(id) = self.id {
            write!(f, "#{id} ")?;
        }
        write!(
            f,
            "{} ({}) spent {:.2}",
            self.short_name, self.contact, self.total_spending
        )
    }
}

fn initial(name: &str) -> String {
    match name.trim_start().chars().next() {
        Some(first) => format!("{}.", first.to_uppercase()),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> ClientRecord {
        ClientRecord {
            id: Some(3),
            last_name: "Ivanov".to_string(),
            first_name: "ivan".to_string(),
            patronymic: "Petrovich".to_string(),
            phone: "79991234567".to_string(),
            email: "ivan@example.com".to_string(),
            passport_series: "4510".to_string(),
            passport_number: "123456".to_string(),
            zip_code: 101_000,
            city: "Moscow".to_string(),
            street: "Tverskaya".to_string(),
            house: "1".to_string(),
            total_spending: 1500.5,
        }
    }

    #[test]
    fn short_name_includes_patronymic_initial_when_present() {
        let client = Client::new(record()).unwrap();
        let short = ClientShort::from(&client);
        assert_eq!(short.short_name(), "Ivanov I.P.");
        assert_eq!(short.contact(), "79991234567");
        assert_eq!(short.id(), Some(3));
    }

    #[test]
    fn short_name_without_patronymic_has_single_initial() {
        let mut raw = record();
        raw.patronymic = String::new();
        let client = Client::new(raw).unwrap();
        assert_eq!(ClientShort::from(&client).short_name(), "Ivanov I.");
    }

    #[test]
    fn overwrite_keeps_identity() {
        let mut target = Client::new(record()).unwrap();
        let mut raw = record();
        raw.id = Some(99);
        raw.city = "Kazan".to_string();
        let source = Client::new(raw).unwrap();

        target.overwrite_from(&source);
        assert_eq!(target.id(), Some(3));
        assert_eq!(target.city(), "Kazan");
    }

    #[test]
    fn failed_setter_leaves_previous_value() {
        let mut client = Client::new(record()).unwrap();
        let err = client.set_email("not-an-email").unwrap_err();
        assert_eq!(err, ClientValidationError::InvalidEmail("not-an-email".to_string()));
        assert_eq!(client.email(), "ivan@example.com");
    }
}
