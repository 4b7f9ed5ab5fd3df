//! Route handlers for the users and properties API.
//!
//! Every handler checks out its own [`extract::DbSession`], runs the
//! pre-condition lookups it needs and then a single mutation. Failures are
//! reported as [`error::ApiError`].

pub mod error;
pub mod extract;
pub mod health;
pub mod properties;
pub mod types;
pub mod users;
