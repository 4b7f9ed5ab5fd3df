//! User endpoints.
//!
//! Flow Overview:
//! 1) Validate the payload into `UserFields`.
//! 2) Reject a full name, email or phone already held by another user.
//! 3) Persist and answer with the user and the properties it owns.

use axum::{http::StatusCode, Json};
use std::collections::HashMap;
use tracing::{info, instrument};

use super::{
    error::{ApiError, ErrorBody, ValidationBody, USER_CONFLICT, USER_NOT_FOUND},
    extract::{ApiJson, ApiPath, ApiQuery, DbSession},
    types::{ListUsersQuery, PropertyResponse, UserPayload, UserResponse},
};
use crate::store::{properties, properties::PropertyRow, users};

#[utoipa::path(
    post,
    path = "/users/",
    request_body = UserPayload,
    responses(
        (status = 201, description = "User created.", body = UserResponse),
        (status = 400, description = "Full name, email or phone already registered.", body = ErrorBody),
        (status = 422, description = "Invalid payload.", body = ValidationBody),
    ),
    tag = "users"
)]
#[instrument(skip_all)]
pub async fn create_user(
    mut session: DbSession,
    ApiJson(payload): ApiJson<UserPayload>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let fields = payload.into_fields().validate()?;

    if users::find_conflict(&mut session, &fields, None)
        .await?
        .is_some()
    {
        return Err(ApiError::Conflict(USER_CONFLICT));
    }

    let row = users::create(&mut session, &fields).await?;
    info!(user_id = row.id, "User created");

    let user = UserResponse::from_row(row, Vec::new());
    Ok((StatusCode::CREATED, Json(user)))
}

#[utoipa::path(
    get,
    path = "/users/",
    params(ListUsersQuery),
    responses(
        (status = 200, description = "Page of users ordered by id.", body = [UserResponse]),
        (status = 422, description = "Invalid query.", body = ValidationBody),
    ),
    tag = "users"
)]
#[instrument(skip_all)]
pub async fn list_users(
    mut session: DbSession,
    ApiQuery(query): ApiQuery<ListUsersQuery>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let (skip, limit) = (query.offset(), query.limit());
    let rows = users::list(&mut session, skip, limit).await?;

    let page = properties::list_for_user_page(&mut session, skip, limit).await?;
    let mut owned: HashMap<i64, Vec<PropertyRow>> = HashMap::new();
    for property in page {
        if let Some(owner_id) = property.owner_id {
            owned.entry(owner_id).or_default().push(property);
        }
    }

    let list = rows
        .into_iter()
        .map(|row| {
            let properties = owned.remove(&row.id).unwrap_or_default();
            UserResponse::from_row(row, properties)
        })
        .collect();

    Ok(Json(list))
}

#[utoipa::path(
    get,
    path = "/users/{id}",
    params(
        ("id" = i64, Path, description = "User id")
    ),
    responses(
        (status = 200, description = "User with its properties.", body = UserResponse),
        (status = 404, description = "User not found.", body = ErrorBody),
        (status = 422, description = "Invalid user id.", body = ValidationBody),
    ),
    tag = "users"
)]
#[instrument(skip(session))]
pub async fn get_user(
    mut session: DbSession,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<UserResponse>, ApiError> {
    let row = users::get_by_id(&mut session, id)
        .await?
        .ok_or(ApiError::NotFound(USER_NOT_FOUND))?;
    let owned = properties::list_by_owner(&mut session, id).await?;

    Ok(Json(UserResponse::from_row(row, owned)))
}

#[utoipa::path(
    put,
    path = "/users/{id}",
    params(
        ("id" = i64, Path, description = "User id")
    ),
    request_body = UserPayload,
    responses(
        (status = 200, description = "User replaced.", body = UserResponse),
        (status = 400, description = "Full name, email or phone held by another user.", body = ErrorBody),
        (status = 404, description = "User not found.", body = ErrorBody),
        (status = 422, description = "Invalid payload.", body = ValidationBody),
    ),
    tag = "users"
)]
#[instrument(skip(session, payload))]
pub async fn update_user(
    mut session: DbSession,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<UserPayload>,
) -> Result<Json<UserResponse>, ApiError> {
    let fields = payload.into_fields().validate()?;

    if users::get_by_id(&mut session, id).await?.is_none() {
        return Err(ApiError::NotFound(USER_NOT_FOUND));
    }

    if users::find_conflict(&mut session, &fields, Some(id))
        .await?
        .is_some()
    {
        return Err(ApiError::Conflict(USER_CONFLICT));
    }

    let row = users::update(&mut session, id, &fields)
        .await?
        .ok_or(ApiError::NotFound(USER_NOT_FOUND))?;
    let owned = properties::list_by_owner(&mut session, id).await?;
    info!("User updated");

    Ok(Json(UserResponse::from_row(row, owned)))
}

#[utoipa::path(
    delete,
    path = "/users/{id}",
    params(
        ("id" = i64, Path, description = "User id")
    ),
    responses(
        (status = 200, description = "Deleted user, with the properties it released.", body = UserResponse),
        (status = 404, description = "User not found.", body = ErrorBody),
        (status = 422, description = "Invalid user id.", body = ValidationBody),
    ),
    tag = "users"
)]
#[instrument(skip(session))]
pub async fn delete_user(
    mut session: DbSession,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<UserResponse>, ApiError> {
    // Snapshot before the owner links are cleared.
    let mut released = properties::list_by_owner(&mut session, id).await?;

    let row = users::delete(&mut session, id)
        .await?
        .ok_or(ApiError::NotFound(USER_NOT_FOUND))?;
    info!(released = released.len(), "User deleted");

    // Report the rows as now stored.
    for property in &mut released {
        property.owner_id = None;
    }

    Ok(Json(UserResponse::from_row(row, released)))
}

#[utoipa::path(
    get,
    path = "/users/{id}/properties/",
    params(
        ("id" = i64, Path, description = "Owner id")
    ),
    responses(
        (status = 200, description = "Properties owned by the user.", body = [PropertyResponse]),
        (status = 404, description = "User not found.", body = ErrorBody),
        (status = 422, description = "Invalid user id.", body = ValidationBody),
    ),
    tag = "users"
)]
#[instrument(skip(session))]
pub async fn list_user_properties(
    mut session: DbSession,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Vec<PropertyResponse>>, ApiError> {
    if users::get_by_id(&mut session, id).await?.is_none() {
        return Err(ApiError::NotFound(USER_NOT_FOUND));
    }

    let owned = properties::list_by_owner(&mut session, id).await?;
    Ok(Json(owned.into_iter().map(PropertyResponse::from).collect()))
}
