//! Queries on the `users` table.
//!
//! Lookups that could match more than one row return the lowest id.

use sqlx::{Connection, FromRow, SqliteConnection};

use super::StoreError;
use crate::model::{Gender, UserFields};

/// A `users` row as stored.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct UserRow {
    pub id: i64,
    pub full_name: String,
    pub age: Option<i64>,
    pub gender: Option<Gender>,
    pub email: String,
    pub phone: Option<String>,
    pub salary: Option<i64>,
    pub job: Option<String>,
}

pub async fn get_by_id(
    conn: &mut SqliteConnection,
    id: i64,
) -> Result<Option<UserRow>, StoreError> {
    let query = r"
        SELECT id, full_name, age, gender, email, phone, salary, job
        FROM users
        WHERE id = ?
    ";
    Ok(sqlx::query_as(query)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?)
}

pub async fn get_by_email(
    conn: &mut SqliteConnection,
    email: &str,
) -> Result<Option<UserRow>, StoreError> {
    let query = r"
        SELECT id, full_name, age, gender, email, phone, salary, job
        FROM users
        WHERE email = ?
        ORDER BY id
        LIMIT 1
    ";
    Ok(sqlx::query_as(query)
        .bind(email)
        .fetch_optional(&mut *conn)
        .await?)
}

pub async fn get_by_full_name(
    conn: &mut SqliteConnection,
    full_name: &str,
) -> Result<Option<UserRow>, StoreError> {
    let query = r"
        SELECT id, full_name, age, gender, email, phone, salary, job
        FROM users
        WHERE full_name = ?
        ORDER BY id
        LIMIT 1
    ";
    Ok(sqlx::query_as(query)
        .bind(full_name)
        .fetch_optional(&mut *conn)
        .await?)
}

pub async fn get_by_phone(
    conn: &mut SqliteConnection,
    phone: &str,
) -> Result<Option<UserRow>, StoreError> {
    let query = r"
        SELECT id, full_name, age, gender, email, phone, salary, job
        FROM users
        WHERE phone = ?
        ORDER BY id
        LIMIT 1
    ";
    Ok(sqlx::query_as(query)
        .bind(phone)
        .fetch_optional(&mut *conn)
        .await?)
}

/// Returns the first user, other than `exclude_id`, that already holds the
/// full name, email or phone in `fields`.
pub async fn find_conflict(
    conn: &mut SqliteConnection,
    fields: &UserFields,
    exclude_id: Option<i64>,
) -> Result<Option<UserRow>, StoreError> {
    let query = r"
        SELECT id, full_name, age, gender, email, phone, salary, job
        FROM users
        WHERE (full_name = ? OR email = ? OR (? IS NOT NULL AND phone = ?))
          AND (? IS NULL OR id != ?)
        ORDER BY id
        LIMIT 1
    ";
    Ok(sqlx::query_as(query)
        .bind(&fields.full_name)
        .bind(&fields.email)
        .bind(fields.phone.as_deref())
        .bind(fields.phone.as_deref())
        .bind(exclude_id)
        .bind(exclude_id)
        .fetch_optional(&mut *conn)
        .await?)
}

/// Offset/limit page ordered by id.
pub async fn list(
    conn: &mut SqliteConnection,
    skip: i64,
    limit: i64,
) -> Result<Vec<UserRow>, StoreError> {
    let query = r"
        SELECT id, full_name, age, gender, email, phone, salary, job
        FROM users
        ORDER BY id
        LIMIT ? OFFSET ?
    ";
    Ok(sqlx::query_as(query)
        .bind(limit)
        .bind(skip)
        .fetch_all(&mut *conn)
        .await?)
}

pub async fn count(conn: &mut SqliteConnection) -> Result<i64, StoreError> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
        .fetch_one(&mut *conn)
        .await?;
    Ok(count)
}

pub async fn create(
    conn: &mut SqliteConnection,
    fields: &UserFields,
) -> Result<UserRow, StoreError> {
    let query = r"
        INSERT INTO users (full_name, age, gender, email, phone, salary, job)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        RETURNING id, full_name, age, gender, email, phone, salary, job
    ";
    Ok(sqlx::query_as(query)
        .bind(&fields.full_name)
        .bind(fields.age)
        .bind(fields.gender)
        .bind(&fields.email)
        .bind(fields.phone.as_deref())
        .bind(fields.salary)
        .bind(fields.job.as_deref())
        .fetch_one(&mut *conn)
        .await?)
}

/// Replaces every column of user `id`. Returns `None` when no such user.
pub async fn update(
    conn: &mut SqliteConnection,
    id: i64,
    fields: &UserFields,
) -> Result<Option<UserRow>, StoreError> {
    let query = r"
        UPDATE users
        SET
            full_name = ?,
            age = ?,
            gender = ?,
            email = ?,
            phone = ?,
            salary = ?,
            job = ?
        WHERE id = ?
        RETURNING id, full_name, age, gender, email, phone, salary, job
    ";
    Ok(sqlx::query_as(query)
        .bind(&fields.full_name)
        .bind(fields.age)
        .bind(fields.gender)
        .bind(&fields.email)
        .bind(fields.phone.as_deref())
        .bind(fields.salary)
        .bind(fields.job.as_deref())
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?)
}

/// Deletes user `id` and clears `owner_id` on the properties it owned.
/// Both statements commit together. Returns `None` when no such user.
pub async fn delete(
    conn: &mut SqliteConnection,
    id: i64,
) -> Result<Option<UserRow>, StoreError> {
    let mut tx = conn.begin().await?;

    sqlx::query("UPDATE properties SET owner_id = NULL WHERE owner_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    let query = r"
        DELETE FROM users
        WHERE id = ?
        RETURNING id, full_name, age, gender, email, phone, salary, job
    ";
    let row: Option<UserRow> = sqlx::query_as(query)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(row)
}
