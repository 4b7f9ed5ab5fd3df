//! Request extractors that report failures through [`ApiError`].

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts},
    http::request::Parts,
};
use sqlx::SqliteConnection;
use std::ops::{Deref, DerefMut};

use super::error::ApiError;
use crate::store::{Session, Store};

/// `axum::Json` with malformed bodies reported as `422` field errors.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

/// One pooled connection, held for the whole request and returned to the
/// pool on drop.
pub struct DbSession(Session);

#[async_trait]
impl<S> FromRequestParts<S> for DbSession
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let store = parts
            .extensions
            .get::<Store>()
            .ok_or_else(|| {
                ApiError::Internal("store extension is missing".to_string())
            })?;

        let session = store.session().await?;
        Ok(Self(session))
    }
}

impl Deref for DbSession {
    type Target = SqliteConnection;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for DbSession {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}
