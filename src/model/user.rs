//! User fields and their rules.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::validation::{valid_email, Rule, ValidationErrors};

pub const FULL_NAME_MAX: usize = 50;
pub const EMAIL_MAX: usize = 50;
pub const PHONE_MAX: usize = 50;
pub const JOB_MAX: usize = 50;
pub const AGE_MIN: i64 = 18;
pub const AGE_MAX: i64 = 120;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type)]
pub enum Gender {
    #[serde(rename = "M")]
    #[sqlx(rename = "M")]
    Male,
    #[serde(rename = "F")]
    #[sqlx(rename = "F")]
    Female,
}

/// The complete updatable field set of a user.
///
/// Create and update both write every field, so an update with `phone: None`
/// clears the stored phone number.
#[derive(Debug, Clone, PartialEq)]
pub struct UserFields {
    pub full_name: String,
    pub email: String,
    pub age: Option<i64>,
    pub gender: Option<Gender>,
    pub phone: Option<String>,
    pub salary: Option<i64>,
    pub job: Option<String>,
}

impl UserFields {
    /// Checks every field rule and returns the fields unchanged when they pass.
    ///
    /// # Errors
    /// Returns all violations found, not only the first.
    pub fn validate(self) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        errors.check_text("full_name", &self.full_name, FULL_NAME_MAX);
        errors.check_text("email", &self.email, EMAIL_MAX);
        if !self.email.trim().is_empty() && !valid_email(&self.email) {
            errors.push("email", Rule::Format, "email must be a valid address");
        }
        errors.check_between("age", self.age, AGE_MIN, AGE_MAX);
        errors.check_optional_text("phone", self.phone.as_deref(), PHONE_MAX);
        errors.check_positive("salary", self.salary);
        errors.check_optional_text("job", self.job.as_deref(), JOB_MAX);

        errors.into_result(self)
    }
}
