//! Queries on the `properties` table.

use chrono::NaiveDate;
use sqlx::{FromRow, SqliteConnection};

use super::StoreError;
use crate::model::{NewProperty, PropertyFields};

/// A `properties` row as stored.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct PropertyRow {
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

pub async fn get_by_id(
    conn: &mut SqliteConnection,
    id: i64,
) -> Result<Option<PropertyRow>, StoreError> {
    let query = r"
        SELECT id, address, city, surface, rooms, is_home, is_flat, age, selling_price,
            sale_date, is_sold, rental_price, rental_start_date, is_rented,
            availability_date, is_available, owner_id
        FROM properties
        WHERE id = ?
    ";
    Ok(sqlx::query_as(query)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?)
}

pub async fn get_by_city_and_address(
    conn: &mut SqliteConnection,
    city: &str,
    address: &str,
) -> Result<Option<PropertyRow>, StoreError> {
    let query = r"
        SELECT id, address, city, surface, rooms, is_home, is_flat, age, selling_price,
            sale_date, is_sold, rental_price, rental_start_date, is_rented,
            availability_date, is_available, owner_id
        FROM properties
        WHERE city = ? AND address = ?
        ORDER BY id
        LIMIT 1
    ";
    Ok(sqlx::query_as(query)
        .bind(city)
        .bind(address)
        .fetch_optional(&mut *conn)
        .await?)
}

pub async fn list_by_owner(
    conn: &mut SqliteConnection,
    owner_id: i64,
) -> Result<Vec<PropertyRow>, StoreError> {
    let query = r"
        SELECT id, address, city, surface, rooms, is_home, is_flat, age, selling_price,
            sale_date, is_sold, rental_price, rental_start_date, is_rented,
            availability_date, is_available, owner_id
        FROM properties
        WHERE owner_id = ?
        ORDER BY id
    ";
    Ok(sqlx::query_as(query)
        .bind(owner_id)
        .fetch_all(&mut *conn)
        .await?)
}

/// Properties owned by the users on one `users::list` page, in one query.
/// The page is selected inside the query, so its size costs no bind slots.
pub async fn list_for_user_page(
    conn: &mut SqliteConnection,
    skip: i64,
    limit: i64,
) -> Result<Vec<PropertyRow>, StoreError> {
    let query = r"
        SELECT id, address, city, surface, rooms, is_home, is_flat, age, selling_price,
            sale_date, is_sold, rental_price, rental_start_date, is_rented,
            availability_date, is_available, owner_id
        FROM properties
        WHERE owner_id IN (
            SELECT id FROM users
            ORDER BY id
            LIMIT ? OFFSET ?
        )
        ORDER BY id
    ";
    Ok(sqlx::query_as(query)
        .bind(limit)
        .bind(skip)
        .fetch_all(&mut *conn)
        .await?)
}

pub async fn create(
    conn: &mut SqliteConnection,
    property: &NewProperty,
) -> Result<PropertyRow, StoreError> {
    let fields = &property.fields;
    let query = r"
        INSERT INTO properties (
            address, city, surface, rooms, is_home, is_flat, age, selling_price,
            sale_date, is_sold, rental_price, rental_start_date, is_rented,
            availability_date, is_available, owner_id
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING id, address, city, surface, rooms, is_home, is_flat, age, selling_price,
            sale_date, is_sold, rental_price, rental_start_date, is_rented,
            availability_date, is_available, owner_id
    ";
    Ok(sqlx::query_as(query)
        .bind(&property.location.address)
        .bind(&property.location.city)
        .bind(fields.surface)
        .bind(fields.rooms)
        .bind(fields.is_home)
        .bind(fields.is_flat)
        .bind(fields.age)
        .bind(fields.selling_price)
        .bind(fields.sale_date)
        .bind(fields.is_sold)
        .bind(fields.rental_price)
        .bind(fields.rental_start_date)
        .bind(fields.is_rented)
        .bind(fields.availability_date)
        .bind(fields.is_available)
        .bind(fields.owner_id)
        .fetch_one(&mut *conn)
        .await?)
}

/// Replaces every updatable column of property `id`; address and city stay.
/// Returns `None` when no such property.
pub async fn update(
    conn: &mut SqliteConnection,
    id: i64,
    fields: &PropertyFields,
) -> Result<Option<PropertyRow>, StoreError> {
    let query = r"
        UPDATE properties
        SET
            surface = ?,
            rooms = ?,
            is_home = ?,
            is_flat = ?,
            age = ?,
            selling_price = ?,
            sale_date = ?,
            is_sold = ?,
            rental_price = ?,
            rental_start_date = ?,
            is_rented = ?,
            availability_date = ?,
            is_available = ?,
            owner_id = ?
        WHERE id = ?
        RETURNING id, address, city, surface, rooms, is_home, is_flat, age, selling_price,
            sale_date, is_sold, rental_price, rental_start_date, is_rented,
            availability_date, is_available, owner_id
    ";
    Ok(sqlx::query_as(query)
        .bind(fields.surface)
        .bind(fields.rooms)
        .bind(fields.is_home)
        .bind(fields.is_flat)
        .bind(fields.age)
        .bind(fields.selling_price)
        .bind(fields.sale_date)
        .bind(fields.is_sold)
        .bind(fields.rental_price)
        .bind(fields.rental_start_date)
        .bind(fields.is_rented)
        .bind(fields.availability_date)
        .bind(fields.is_available)
        .bind(fields.owner_id)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?)
}

pub async fn update_owner(
    conn: &mut SqliteConnection,
    id: i64,
    owner_id: i64,
) -> Result<Option<PropertyRow>, StoreError> {
    let query = r"
        UPDATE properties
        SET owner_id = ?
        WHERE id = ?
        RETURNING id, address, city, surface, rooms, is_home, is_flat, age, selling_price,
            sale_date, is_sold, rental_price, rental_start_date, is_rented,
            availability_date, is_available, owner_id
    ";
    Ok(sqlx::query_as(query)
        .bind(owner_id)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?)
}

pub async fn delete(
    conn: &mut SqliteConnection,
    id: i64,
) -> Result<Option<PropertyRow>, StoreError> {
    let query = r"
        DELETE FROM properties
        WHERE id = ?
        RETURNING id, address, city, surface, rooms, is_home, is_flat, age, selling_price,
            sale_date, is_sold, rental_price, rental_start_date, is_rented,
            availability_date, is_available, owner_id
    ";
    Ok(sqlx::query_as(query)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?)
}
