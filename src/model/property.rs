//! Property fields, their rules and the two flag invariants.
//!
//! A property is exactly one of home or flat, and it can't be sold and rented
//! at the same time. Both invariants are checked here and again by the table
//! check constraints.

use chrono::NaiveDate;

use super::validation::{Rule, ValidationErrors};

pub const ADDRESS_MAX: usize = 50;
pub const CITY_MAX: usize = 50;

/// Where a property is. The pair is unique across the park.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyLocation {
    pub address: String,
    pub city: String,
}

impl PropertyLocation {
    fn check(&self, errors: &mut ValidationErrors) {
        errors.check_text("address", &self.address, ADDRESS_MAX);
        errors.check_text("city", &self.city, CITY_MAX);
    }
}

/// Everything a full property update replaces. The location is fixed at
/// creation time.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyFields {
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

impl PropertyFields {
    /// # Errors
    /// Returns every field and invariant violation found.
    pub fn validate(self) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        self.check(&mut errors);
        errors.into_result(self)
    }

    fn check(&self, errors: &mut ValidationErrors) {
        errors.check_positive_decimal("surface", self.surface);
        errors.check_positive("rooms", self.rooms);
        errors.check_non_negative("age", self.age);
        errors.check_positive("selling_price", self.selling_price);
        errors.check_positive("rental_price", self.rental_price);
        errors.check_positive("owner_id", self.owner_id);
        check_kind(self.is_home, self.is_flat, errors);
        check_status(self.is_sold, self.is_rented, errors);
    }
}

/// Home and flat are two answers to the same question; exactly one holds.
pub fn check_kind(is_home: bool, is_flat: bool, errors: &mut ValidationErrors) {
    if is_home == is_flat {
        errors.push(
            "is_flat",
            Rule::ExclusiveChoice,
            "the property must be either a home or a flat",
        );
    }
}

pub fn check_status(is_sold: bool, is_rented: bool, errors: &mut ValidationErrors) {
    if is_sold && is_rented {
        errors.push(
            "is_rented",
            Rule::MutuallyExclusive,
            "the property can't be sold and rented at the same time",
        );
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewProperty {
    pub location: PropertyLocation,
    pub fields: PropertyFields,
}

impl NewProperty {
    /// # Errors
    /// Returns location, field and invariant violations together.
    pub fn validate(self) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        self.location.check(&mut errors);
        self.fields.check(&mut errors);
        errors.into_result(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat() -> PropertyFields {
        PropertyFields {
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
            owner_id: None,
        }
    }

    #[test]
    fn home_and_flat_must_differ() {
        for is_home in [false, true] {
            for is_flat in [false, true] {
                let result = PropertyFields {
                    is_home,
                    is_flat,
                    ..flat()
                }
                .validate();
                if is_home == is_flat {
                    let errors = result.unwrap_err();
                    assert!(errors.has("is_flat", Rule::ExclusiveChoice));
                } else {
                    assert!(result.is_ok(), "home={is_home} flat={is_flat}");
                }
            }
        }
    }

    #[test]
    fn sold_and_rented_are_mutually_exclusive() {
        for is_sold in [false, true] {
            for is_rented in [false, true] {
                let result = PropertyFields {
                    is_sold,
                    is_rented,
                    ..flat()
                }
                .validate();
                if is_sold && is_rented {
                    let errors = result.unwrap_err();
                    assert!(errors.has("is_rented", Rule::MutuallyExclusive));
                } else {
                    assert!(result.is_ok(), "sold={is_sold} rented={is_rented}");
                }
            }
        }
    }

    #[test]
    fn numeric_rules() {
        let fields = PropertyFields {
            surface: Some(0.0),
            rooms: Some(0),
            age: Some(-1),
            selling_price: Some(0),
            rental_price: Some(-10),
            owner_id: Some(0),
            ..flat()
        };
        let errors = fields.validate().unwrap_err();
        for field in [
            "surface",
            "rooms",
            "age",
            "selling_price",
            "rental_price",
            "owner_id",
        ] {
            assert!(errors.has(field, Rule::Range), "{field} should fail");
        }
    }

    #[test]
    fn new_age_property_is_fine() {
        let fields = PropertyFields {
            age: Some(0),
            ..flat()
        };
        assert!(fields.validate().is_ok());
    }

    #[test]
    fn optional_values_may_be_absent() {
        let fields = PropertyFields {
            surface: None,
            rooms: None,
            age: None,
            selling_price: None,
            rental_price: None,
            availability_date: None,
            ..flat()
        };
        assert!(fields.validate().is_ok());
    }

    #[test]
    fn new_property_checks_location_and_fields() {
        let property = NewProperty {
            location: PropertyLocation {
                address: String::new(),
                city: "P".repeat(CITY_MAX + 1),
            },
            fields: PropertyFields {
                is_home: true,
                ..flat()
            },
        };
        let errors = property.validate().unwrap_err();
        assert!(errors.has("address", Rule::Required));
        assert!(errors.has("city", Rule::MaxLength));
        assert!(errors.has("is_flat", Rule::ExclusiveChoice));
    }
}
