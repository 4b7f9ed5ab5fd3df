//! Property endpoints.
//!
//! A property is identified on the wire by its id and, for duplicate
//! detection, by its address and city. Any `owner_id` must name an existing
//! user before the row is written.

use axum::{http::StatusCode, Json};
use sqlx::SqliteConnection;
use tracing::{info, instrument};

use super::{
    error::{
        ApiError, ErrorBody, ValidationBody, OWNER_NOT_FOUND, PROPERTY_CONFLICT, PROPERTY_NOT_FOUND,
    },
    extract::{ApiJson, ApiPath, DbSession},
    types::{PropertyCreatePayload, PropertyResponse, PropertyUpdatePayload},
};
use crate::store::{properties, users};

async fn ensure_owner(conn: &mut SqliteConnection, owner_id: Option<i64>) -> Result<(), ApiError> {
    let Some(owner_id) = owner_id else {
        return Ok(());
    };

    if users::get_by_id(conn, owner_id).await?.is_none() {
        return Err(ApiError::NotFound(OWNER_NOT_FOUND));
    }

    Ok(())
}

#[utoipa::path(
    post,
    path = "/properties/",
    request_body = PropertyCreatePayload,
    responses(
        (status = 201, description = "Property created.", body = PropertyResponse),
        (status = 400, description = "Address already registered in this city.", body = ErrorBody),
        (status = 404, description = "The owner id doesn't match any user.", body = ErrorBody),
        (status = 422, description = "Invalid payload.", body = ValidationBody),
    ),
    tag = "properties"
)]
#[instrument(skip_all)]
pub async fn create_property(
    mut session: DbSession,
    ApiJson(payload): ApiJson<PropertyCreatePayload>,
) -> Result<(StatusCode, Json<PropertyResponse>), ApiError> {
    let property = payload.into_new_property().validate()?;

    if properties::get_by_city_and_address(
        &mut session,
        &property.location.city,
        &property.location.address,
    )
    .await?
    .is_some()
    {
        return Err(ApiError::Conflict(PROPERTY_CONFLICT));
    }

    ensure_owner(&mut session, property.fields.owner_id).await?;

    let row = properties::create(&mut session, &property).await?;
    info!(property_id = row.id, "Property created");

    Ok((StatusCode::CREATED, Json(row.into())))
}

#[utoipa::path(
    get,
    path = "/properties/{id}",
    params(
        ("id" = i64, Path, description = "Property id")
    ),
    responses(
        (status = 200, description = "Property detail.", body = PropertyResponse),
        (status = 404, description = "Property not found.", body = ErrorBody),
        (status = 422, description = "Invalid property id.", body = ValidationBody),
    ),
    tag = "properties"
)]
#[instrument(skip(session))]
pub async fn get_property(
    mut session: DbSession,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<PropertyResponse>, ApiError> {
    let row = properties::get_by_id(&mut session, id)
        .await?
        .ok_or(ApiError::NotFound(PROPERTY_NOT_FOUND))?;

    Ok(Json(row.into()))
}

#[utoipa::path(
    put,
    path = "/properties/{id}",
    params(
        ("id" = i64, Path, description = "Property id")
    ),
    request_body = PropertyUpdatePayload,
    responses(
        (status = 200, description = "Property replaced. Address and city are kept.", body = PropertyResponse),
        (status = 404, description = "Property or owner not found.", body = ErrorBody),
        (status = 422, description = "Invalid payload.", body = ValidationBody),
    ),
    tag = "properties"
)]
#[instrument(skip(session, payload))]
pub async fn update_property(
    mut session: DbSession,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<PropertyUpdatePayload>,
) -> Result<Json<PropertyResponse>, ApiError> {
    let fields = payload.into_fields().validate()?;

    if properties::get_by_id(&mut session, id).await?.is_none() {
        return Err(ApiError::NotFound(PROPERTY_NOT_FOUND));
    }

    ensure_owner(&mut session, fields.owner_id).await?;

    let row = properties::update(&mut session, id, &fields)
        .await?
        .ok_or(ApiError::NotFound(PROPERTY_NOT_FOUND))?;
    info!("Property updated");

    Ok(Json(row.into()))
}

#[utoipa::path(
    put,
    path = "/properties/{id}/{owner_id}",
    params(
        ("id" = i64, Path, description = "Property id"),
        ("owner_id" = i64, Path, description = "New owner id")
    ),
    responses(
        (status = 200, description = "Owner reassigned.", body = PropertyResponse),
        (status = 404, description = "Property or owner not found.", body = ErrorBody),
        (status = 422, description = "Invalid path.", body = ValidationBody),
    ),
    tag = "properties"
)]
#[instrument(skip(session))]
pub async fn update_property_owner(
    mut session: DbSession,
    ApiPath((id, owner_id)): ApiPath<(i64, i64)>,
) -> Result<Json<PropertyResponse>, ApiError> {
    if properties::get_by_id(&mut session, id).await?.is_none() {
        return Err(ApiError::NotFound(PROPERTY_NOT_FOUND));
    }

    ensure_owner(&mut session, Some(owner_id)).await?;

    let row = properties::update_owner(&mut session, id, owner_id)
        .await?
        .ok_or(ApiError::NotFound(PROPERTY_NOT_FOUND))?;
    info!("Property owner updated");

    Ok(Json(row.into()))
}

#[utoipa::path(
    delete,
    path = "/properties/{id}",
    params(
        ("id" = i64, Path, description = "Property id")
    ),
    responses(
        (status = 200, description = "Deleted property.", body = PropertyResponse),
        (status = 404, description = "Property not found.", body = ErrorBody),
        (status = 422, description = "Invalid property id.", body = ValidationBody),
    ),
    tag = "properties"
)]
#[instrument(skip(session))]
pub async fn delete_property(
    mut session: DbSession,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<PropertyResponse>, ApiError> {
    let row = properties::delete(&mut session, id)
        .await?
        .ok_or(ApiError::NotFound(PROPERTY_NOT_FOUND))?;
    info!("Property deleted");

    Ok(Json(row.into()))
}
