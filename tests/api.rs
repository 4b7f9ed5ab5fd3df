//! End-to-end walk through the public router: register an owner, list a
//! flat, hand it over to a tenant-turned-owner and retire the first owner.

use anyhow::{Context, Result};
use axum::{
    body::{to_bytes, Body},
    http::{header::CONTENT_TYPE, Request, StatusCode},
    Router,
};
use realty::{api::app, store::Store};
use serde_json::{json, Value};
use tower::ServiceExt;

async fn call(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> Result<(StatusCode, Value)> {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))?,
        None => builder.body(Body::empty())?,
    };
    let response = app.clone().oneshot(request).await?;
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)?
    };
    Ok((status, value))
}

#[tokio::test]
async fn property_changes_hands() -> Result<()> {
    let store = Store::in_memory().await?;
    let app = app(store, None);

    let (status, seller) = call(
        &app,
        "POST",
        "/users/",
        Some(json!({
            "full_name": "Pierre Dumont",
            "email": "pierre.dumont@gmail.com",
            "age": 45,
            "gender": "M",
            "phone": "0738492567",
            "salary": 2000,
            "job": "waiter"
        })),
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED);
    let seller_id = seller["id"].as_i64().context("seller id")?;

    let (status, buyer) = call(
        &app,
        "POST",
        "/users/",
        Some(json!({
            "full_name": "Claire Martin",
            "email": "claire.martin@gmail.com",
            "gender": "F"
        })),
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED);
    let buyer_id = buyer["id"].as_i64().context("buyer id")?;

    let (status, flat) = call(
        &app,
        "POST",
        "/properties/",
        Some(json!({
            "adress": "40 boulevard Saint Martin",
            "city": "Paris",
            "surface": 60,
            "rooms": 2,
            "is_home": false,
            "is_flat": true,
            "selling_price": 250000,
            "owner_id": seller_id
        })),
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED);
    let flat_id = flat["id"].as_i64().context("flat id")?;

    let (_, seller) = call(&app, "GET", &format!("/users/{seller_id}"), None).await?;
    assert_eq!(seller["properties"][0]["id"], flat_id);

    // Sale: mark it sold, then hand it over.
    let (status, sold) = call(
        &app,
        "PUT",
        &format!("/properties/{flat_id}"),
        Some(json!({
            "surface": 60,
            "rooms": 2,
            "is_home": false,
            "is_flat": true,
            "selling_price": 250000,
            "sale_date": "2021-03-01",
            "is_sold": true,
            "is_available": false,
            "owner_id": seller_id
        })),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(sold["is_sold"], true);
    assert_eq!(sold["sale_date"], "2021-03-01");

    let (status, moved) = call(
        &app,
        "PUT",
        &format!("/properties/{flat_id}/{buyer_id}"),
        None,
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(moved["owner_id"], buyer_id);
    assert_eq!(moved["is_sold"], true);

    let (_, owned) = call(&app, "GET", &format!("/users/{buyer_id}/properties/"), None).await?;
    assert_eq!(owned.as_array().map(Vec::len), Some(1));

    let (status, removed) = call(&app, "DELETE", &format!("/users/{seller_id}"), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(removed["properties"], json!([]));

    let (_, users) = call(&app, "GET", "/users/", None).await?;
    let users = users.as_array().context("users")?;
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["full_name"], "Claire Martin");
    assert_eq!(
        users[0]["properties"][0]["address"],
        "40 boulevard Saint Martin"
    );
    Ok(())
}
