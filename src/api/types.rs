//! Request payloads and response views for the cafe API

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `POST api/admin/login`
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Body of `POST api/products`
#[derive(Debug, Clone, Serialize)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: f64,
    /// Data URL or plain URL of the product picture
    pub image: String,
    pub category: String,
}

/// Body of `PUT api/products/{id}`; absent fields are left unchanged
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProductUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
}

/// One line of an order's cart
#[derive(Debug, Clone, Serialize)]
pub struct CartItem {
    pub product_id: String,
    pub product_name: String,
    pub price: f64,
    pub quantity: u32,
    pub image: String,
}

/// Body of `POST api/orders`
#[derive(Debug, Clone, Serialize)]
pub struct NewOrder {
    pub cart_items: Vec<CartItem>,
    pub client_name: String,
    pub phone: String,
    pub total_price: f64,
}

impl NewOrder {
    /// Sum of price times quantity over all cart items
    pub fn cart_total(items: &[CartItem]) -> f64 {
        items.iter().map(|i| i.price * f64::from(i.quantity)).sum()
    }
}

/// Order lifecycle states as sent on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Ready,
    Delivered,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Ready => "ready",
            OrderStatus::Delivered => "delivered",
        }
    }
}

/// Body of `PUT api/orders/{id}/status`
#[derive(Debug, Clone, Serialize)]
pub struct StatusUpdate {
    pub status: OrderStatus,
}

/// Serialize a payload into a JSON value for the request layer
pub fn to_body<T: Serialize>(payload: &T) -> crate::Result<Value> {
    Ok(serde_json::to_value(payload)?)
}

/// Read an identifier field that may be a string or a number
pub fn extract_id(body: &Value, field: &str) -> Option<String> {
    match body.get(field)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Display a field of a JSON object, `0` when it is absent or null
pub fn field_or_zero(body: &Value, field: &str) -> String {
    match body.get(field) {
        None | Some(Value::Null) => "0".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(value) => value.to_string(),
    }
}

/// Number of elements if the body is a JSON array, else zero
pub fn list_len(body: &Value) -> usize {
    body.as_array().map(Vec::len).unwrap_or(0)
}
