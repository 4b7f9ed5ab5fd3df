//! # Realty (property management API)
//!
//! `realty` manages the users and real-estate properties of a property park
//! over a small JSON/HTTP API backed by SQLite.
//!
//! ## Layers
//!
//! - **`model`**: validated domain structs. Field rules (lengths, ranges,
//!   email format) and cross-field invariants (a property is either a home or
//!   a flat, never sold and rented at once) are checked here before any
//!   storage access.
//! - **`store`**: the SQLite schema, the injected [`store::Store`] handle and
//!   the single-statement queries for both tables.
//! - **`api`**: axum handlers that run pre-condition checks (uniqueness,
//!   existence, owner references) and map outcomes to status codes.
//! - **`cli`**: argument parsing, telemetry and server startup.
//!
//! ## Ownership
//!
//! A property may reference an owner. The reference must name an existing
//! user when set; deleting a user clears `owner_id` on every property it
//! owned instead of failing or cascading.

pub mod api;
pub mod cli;
pub mod model;
pub mod store;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
        assert!(
            GIT_COMMIT_HASH.len() >= 7,
            "GIT_COMMIT_HASH should be at least 7 characters long, got: {GIT_COMMIT_HASH}"
        );
    }
}
