//! Request/response types for the users and properties APIs.
//!
//! These payloads are shared between handlers and `OpenAPI` generation. Each
//! request payload converts into its validated `model` counterpart, and each
//! response is built from a `store` row.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{
    model::{Gender, NewProperty, PropertyFields, PropertyLocation, UserFields},
    store::{properties::PropertyRow, users::UserRow},
};

const DEFAULT_LIMIT: u32 = 100;

/// Create and full-update payload for a user.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UserPayload {
    /// Name and first name, unique.
    #[schema(max_length = 50, example = "Pierre Dumont")]
    pub full_name: String,
    /// Unique email address.
    #[schema(max_length = 50, example = "pierre.dumont@gmail.com")]
    pub email: String,
    #[schema(minimum = 18, maximum = 120)]
    pub age: Option<i64>,
    pub gender: Option<Gender>,
    /// Unique phone number.
    #[schema(max_length = 50)]
    pub phone: Option<String>,
    /// Monthly salary in euros.
    #[schema(exclusive_minimum = 0)]
    pub salary: Option<i64>,
    #[schema(max_length = 50)]
    pub job: Option<String>,
}

impl UserPayload {
    #[must_use]
    pub fn into_fields(self) -> UserFields {
        UserFields {
            full_name: self.full_name,
            email: self.email,
            age: self.age,
            gender: self.gender,
            phone: self.phone,
            salary: self.salary,
            job: self.job,
        }
    }
}

const fn default_true() -> bool {
    true
}

/// Full-update payload for a property. Address and city can't change.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct PropertyUpdatePayload {
    #[schema(exclusive_minimum = 0)]
    pub surface: Option<f64>,
    #[schema(exclusive_minimum = 0)]
    pub rooms: Option<i64>,
    /// Exactly one of `is_home` and `is_flat` must be true.
    #[serde(default = "default_true")]
    pub is_home: bool,
    #[serde(default)]
    pub is_flat: bool,
    #[schema(minimum = 0)]
    pub age: Option<i64>,
    #[schema(exclusive_minimum = 0)]
    pub selling_price: Option<i64>,
    pub sale_date: Option<NaiveDate>,
    /// Can't be true together with `is_rented`.
    #[serde(default)]
    pub is_sold: bool,
    #[schema(exclusive_minimum = 0)]
    pub rental_price: Option<i64>,
    pub rental_start_date: Option<NaiveDate>,
    #[serde(default)]
    pub is_rented: bool,
    pub availability_date: Option<NaiveDate>,
    #[serde(default = "default_true")]
    pub is_available: bool,
    /// Must match an existing user.
    #[schema(exclusive_minimum = 0)]
    pub owner_id: Option<i64>,
}

impl PropertyUpdatePayload {
    #[must_use]
    pub fn into_fields(self) -> PropertyFields {
        PropertyFields {
            surface: self.surface,
            rooms: self.rooms,
            is_home: self.is_home,
            is_flat: self.is_flat,
            age: self.age,
            selling_price: self.selling_price,
            sale_date: self.sale_date,
            is_sold: self.is_sold,
            rental_price: self.rental_price,
            rental_start_date: self.rental_start_date,
            is_rented: self.is_rented,
            availability_date: self.availability_date,
            is_available: self.is_available,
            owner_id: self.owner_id,
        }
    }
}

/// Create payload for a property.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct PropertyCreatePayload {
    /// Street address; `adress` is accepted too.
    #[serde(alias = "adress")]
    #[schema(max_length = 50, example = "40 boulevard Saint Martin")]
    pub address: String,
    #[schema(max_length = 50, example = "Paris")]
    pub city: String,
    #[serde(flatten)]
    pub details: PropertyUpdatePayload,
}

impl PropertyCreatePayload {
    #[must_use]
    pub fn into_new_property(self) -> NewProperty {
        NewProperty {
            location: PropertyLocation {
                address: self.address,
                city: self.city,
            },
            fields: self.details.into_fields(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PropertyResponse {
    pub id: i64,
    pub address: String,
    pub city: String,
    pub surface: Option<f64>,
    pub rooms: Option<i64>,
    pub is_home: bool,
    pub is_flat: bool,
    pub age: Option<i64>,
    pub selling_price: Option<i64>,
    pub sale_date: Option<NaiveDate>,
    pub is_sold: bool,
    pub rental_price: Option<i64>,
    pub rental_start_date: Option<NaiveDate>,
    pub is_rented: bool,
    pub availability_date: Option<NaiveDate>,
    pub is_available: bool,
    pub owner_id: Option<i64>,
}

impl From<PropertyRow> for PropertyResponse {
    fn from(row: PropertyRow) -> Self {
        Self {
            id: row.id,
            address: row.address,
            city: row.city,
            surface: row.surface,
            rooms: row.rooms,
            is_home: row.is_home,
            is_flat: row.is_flat,
            age: row.age,
            selling_price: row.selling_price,
            sale_date: row.sale_date,
            is_sold: row.is_sold,
            rental_price: row.rental_price,
            rental_start_date: row.rental_start_date,
            is_rented: row.is_rented,
            availability_date: row.availability_date,
            is_available: row.is_available,
            owner_id: row.owner_id,
        }
    }
}

/// A user with the properties it owns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    pub age: Option<i64>,
    pub gender: Option<Gender>,
    pub phone: Option<String>,
    pub salary: Option<i64>,
    pub job: Option<String>,
    pub properties: Vec<PropertyResponse>,
}

impl UserResponse {
    #[must_use]
    pub fn from_row(row: UserRow, properties: Vec<PropertyRow>) -> Self {
        Self {
            id: row.id,
            full_name: row.full_name,
            email: row.email,
            age: row.age,
            gender: row.gender,
            phone: row.phone,
            salary: row.salary,
            job: row.job,
            properties: properties.into_iter().map(PropertyResponse::from).collect(),
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListUsersQuery {
    /// Number of users to skip.
    #[serde(default)]
    #[param(minimum = 0)]
    pub skip: u32,
    /// Maximum number of users to return.
    #[serde(default = "default_limit")]
    #[param(minimum = 0, default = 100)]
    pub limit: u32,
}

const fn default_limit() -> u32 {
    DEFAULT_LIMIT
}

impl ListUsersQuery {
    #[must_use]
    pub fn offset(&self) -> i64 {
        i64::from(self.skip)
    }

    #[must_use]
    pub fn limit(&self) -> i64 {
        i64::from(self.limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn property_create_accepts_legacy_address_spelling() {
        let payload: PropertyCreatePayload = serde_json::from_value(json!({
            "adress": "40 boulevard Saint Martin",
            "city": "Paris",
            "is_home": false,
            "is_flat": true,
            "surface": 60,
            "availability_date": "2020-12-15"
        }))
        .unwrap();
        let property = payload.into_new_property();
        assert_eq!(property.location.address, "40 boulevard Saint Martin");
        assert_eq!(property.fields.surface, Some(60.0));
        assert_eq!(
            property.fields.availability_date,
            NaiveDate::from_ymd_opt(2020, 12, 15)
        );
    }

    #[test]
    fn property_flags_default_to_available_home() {
        let payload: PropertyUpdatePayload = serde_json::from_value(json!({})).unwrap();
        let fields = payload.into_fields();
        assert!(fields.is_home);
        assert!(!fields.is_flat);
        assert!(!fields.is_sold);
        assert!(!fields.is_rented);
        assert!(fields.is_available);
        assert_eq!(fields.owner_id, None);
    }

    #[test]
    fn user_payload_requires_name_and_email() {
        let missing_email = serde_json::from_value::<UserPayload>(json!({
            "full_name": "Pierre Dumont"
        }));
        assert!(missing_email.is_err());

        let minimal: UserPayload = serde_json::from_value(json!({
            "full_name": "Pierre Dumont",
            "email": "pierre.dumont@gmail.com"
        }))
        .unwrap();
        let fields = minimal.into_fields();
        assert_eq!(fields.phone, None);
        assert_eq!(fields.gender, None);
    }

    #[test]
    fn list_query_defaults() {
        let query: ListUsersQuery = serde_json::from_value(json!({})).unwrap();
        assert_eq!(query.offset(), 0);
        assert_eq!(query.limit(), 100);
    }

    #[test]
    fn property_response_serializes_dates_as_iso() {
        let response = PropertyResponse {
            id: 1,
            address: "40 boulevard Saint Martin".to_string(),
            city: "Paris".to_string(),
            surface: Some(60.0),
            rooms: Some(2),
            is_home: false,
            is_flat: true,
            age: Some(20),
            selling_price: Some(250_000),
            sale_date: None,
            is_sold: false,
            rental_price: Some(1500),
            rental_start_date: None,
            is_rented: false,
            availability_date: NaiveDate::from_ymd_opt(2020, 12, 15),
            is_available: true,
            owner_id: Some(1),
        };
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["availability_date"], "2020-12-15");
        assert_eq!(value["sale_date"], serde_json::Value::Null);
        assert_eq!(value["surface"], 60.0);
    }
}
