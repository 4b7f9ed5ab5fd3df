//! Validated domain types.
//!
//! Handlers convert wire payloads into these structs and call `validate()`
//! before touching the store. The store only ever binds these types.

mod property;
mod user;
mod validation;

pub use property::{
    check_kind, check_status, NewProperty, PropertyFields, PropertyLocation, ADDRESS_MAX,
    CITY_MAX,
};
pub use user::{
    Gender, UserFields, AGE_MAX, AGE_MIN, EMAIL_MAX, FULL_NAME_MAX, JOB_MAX, PHONE_MAX,
};
pub use validation::{valid_email, FieldError, Rule, ValidationErrors};
