//! In-process mock of the cafe backend
//!
//! Serves the same routes as the real API from in-memory maps on a random
//! local port. Flags on `MockState` switch individual endpoints into
//! failure modes.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, StatusCode};
use axum::middleware::{from_fn_with_state, Next};
use axum::response::Response;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use cafe_tester::common::config::Config;
use cafe_tester::testing::TestContext;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

pub const TOKEN: &str = "mock-token-0123456789abcdefghijklmnop";
pub const USERNAME: &str = "admin";
pub const PASSWORD: &str = "admin123";

#[derive(Default)]
pub struct MockState {
    pub products: BTreeMap<String, Value>,
    pub orders: BTreeMap<String, Value>,
    /// "METHOD /path" of every request received, in order
    pub requests: Vec<String>,
    pub id_counter: u64,
    /// Answer 401 to every login
    pub reject_logins: bool,
    /// Status for a login with wrong credentials, 401 when unset
    pub bad_login_status: Option<StatusCode>,
    /// Orders cannot be deleted; DELETE answers 405
    pub no_order_delete: bool,
    /// Answer 500 to every order status change
    pub fail_status_updates: bool,
    /// Return a different product name from the single-product endpoint
    pub corrupt_product_names: bool,
}

impl MockState {
    fn next_id(&mut self) -> u64 {
        self.id_counter += 1;
        self.id_counter
    }
}

type Shared = Arc<Mutex<MockState>>;

/// Running mock server; shuts down when dropped
pub struct MockCafe {
    pub base_url: String,
    pub state: Shared,
    shutdown: Option<oneshot::Sender<()>>,
}

impl MockCafe {
    pub async fn spawn() -> Self {
        Self::spawn_with(MockState::default()).await
    }

    pub async fn spawn_with(initial: MockState) -> Self {
        let state = Arc::new(Mutex::new(initial));
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().expect("Failed to read local address");

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let app = router(state.clone());
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
                .expect("Mock server failed");
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
            shutdown: Some(shutdown_tx),
        }
    }

    /// Context pointed at this server with default credentials
    pub fn context(&self) -> TestContext {
        self.context_with(|_| {})
    }

    pub fn context_with(&self, tweak: impl FnOnce(&mut Config)) -> TestContext {
        let mut config = Config {
            base_url: self.base_url.clone(),
            ..Default::default()
        };
        tweak(&mut config);
        TestContext::from_config(&config).expect("Failed to build test context")
    }

    pub fn requests(&self) -> Vec<String> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn product_count(&self) -> usize {
        self.state.lock().unwrap().products.len()
    }

    pub fn order_count(&self) -> usize {
        self.state.lock().unwrap().orders.len()
    }
}

impl Drop for MockCafe {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

fn router(state: Shared) -> Router {
    Router::new()
        .route("/api/", get(root))
        .route("/api/admin/login", post(login))
        .route("/api/admin/verify", get(verify))
        .route("/api/admin/dashboard", get(dashboard))
        .route("/api/products", get(list_products).post(create_product))
        .route(
            "/api/products/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/api/orders", get(list_orders).post(create_order))
        .route("/api/orders/history", get(order_history))
        .route("/api/orders/{id}", get(get_order).delete(delete_order))
        .route("/api/orders/{id}/status", put(update_status))
        .layer(from_fn_with_state(state.clone(), record))
        .with_state(state)
}

async fn record(State(state): State<Shared>, request: Request, next: Next) -> Response {
    let line = format!("{} {}", request.method(), request.uri().path());
    state.lock().unwrap().requests.push(line);
    next.run(request).await
}

fn require_admin(headers: &HeaderMap) -> Result<(), StatusCode> {
    let expected = format!("Bearer {}", TOKEN);
    match headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        Some(value) if value == expected => Ok(()),
        _ => Err(StatusCode::UNAUTHORIZED),
    }
}

async fn root() -> Json<Value> {
    Json(json!({"message": "Cafe API"}))
}

async fn login(
    State(state): State<Shared>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    let state = state.lock().unwrap();
    let valid = body["username"] == USERNAME && body["password"] == PASSWORD;
    if state.reject_logins {
        return Err(StatusCode::UNAUTHORIZED);
    }
    if !valid {
        return Err(state.bad_login_status.unwrap_or(StatusCode::UNAUTHORIZED));
    }
    Ok(Json(json!({"access_token": TOKEN, "token_type": "bearer"})))
}

async fn verify(headers: HeaderMap) -> Result<Json<Value>, StatusCode> {
    require_admin(&headers)?;
    Ok(Json(json!({"valid": true, "username": USERNAME})))
}

async fn list_products(State(state): State<Shared>) -> Json<Value> {
    let state = state.lock().unwrap();
    Json(Value::Array(state.products.values().cloned().collect()))
}

async fn create_product(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(mut body): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    require_admin(&headers)?;
    let mut state = state.lock().unwrap();
    let id = format!("p{}", state.next_id());
    body["id"] = json!(id);
    state.products.insert(id, body.clone());
    Ok(Json(body))
}

async fn get_product(
    State(state): State<Shared>,
    Path(id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    let state = state.lock().unwrap();
    let mut product = state.products.get(&id).cloned().ok_or(StatusCode::NOT_FOUND)?;
    if state.corrupt_product_names {
        product["name"] = json!("Something Else");
    }
    Ok(Json(product))
}

async fn update_product(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(update): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    require_admin(&headers)?;
    let mut state = state.lock().unwrap();
    let product = state.products.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    if let (Some(target), Some(fields)) = (product.as_object_mut(), update.as_object()) {
        for (key, value) in fields {
            target.insert(key.clone(), value.clone());
        }
    }
    Ok(Json(product.clone()))
}

async fn delete_product(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    require_admin(&headers)?;
    let mut state = state.lock().unwrap();
    state.products.remove(&id).ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(json!({"message": "Product deleted"})))
}

async fn create_order(State(state): State<Shared>, Json(mut body): Json<Value>) -> Json<Value> {
    let mut state = state.lock().unwrap();
    let n = state.next_id();
    let id = format!("o{}", n);
    body["id"] = json!(id);
    body["order_number"] = json!(n);
    body["status"] = json!("pending");
    state.orders.insert(id, body.clone());
    Json(body)
}

fn orders_where(state: &MockState, delivered: bool) -> Value {
    Value::Array(
        state
            .orders
            .values()
            .filter(|o| (o["status"] == "delivered") == delivered)
            .cloned()
            .collect(),
    )
}

async fn list_orders(
    State(state): State<Shared>,
    headers: HeaderMap,
) -> Result<Json<Value>, StatusCode> {
    require_admin(&headers)?;
    let state = state.lock().unwrap();
    Ok(Json(orders_where(&state, false)))
}

async fn order_history(
    State(state): State<Shared>,
    headers: HeaderMap,
) -> Result<Json<Value>, StatusCode> {
    require_admin(&headers)?;
    let state = state.lock().unwrap();
    Ok(Json(orders_where(&state, true)))
}

async fn get_order(
    State(state): State<Shared>,
    Path(id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    let state = state.lock().unwrap();
    state.orders.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn update_status(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    require_admin(&headers)?;
    let mut state = state.lock().unwrap();
    if state.fail_status_updates {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    let order = state.orders.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    order["status"] = body["status"].clone();
    Ok(Json(json!({"message": "Status updated"})))
}

async fn delete_order(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    require_admin(&headers)?;
    let mut state = state.lock().unwrap();
    if state.no_order_delete {
        return Err(StatusCode::METHOD_NOT_ALLOWED);
    }
    state.orders.remove(&id).ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(json!({"message": "Order deleted"})))
}

async fn dashboard(
    State(state): State<Shared>,
    headers: HeaderMap,
) -> Result<Json<Value>, StatusCode> {
    require_admin(&headers)?;
    let state = state.lock().unwrap();
    let active = state
        .orders
        .values()
        .filter(|o| o["status"] != "delivered")
        .count();
    let revenue: f64 = state
        .orders
        .values()
        .filter(|o| o["status"] == "delivered")
        .filter_map(|o| o["total_price"].as_f64())
        .sum();
    Ok(Json(json!({
        "total_products": state.products.len(),
        "total_orders": state.orders.len(),
        "active_orders": active,
        "total_revenue": revenue,
    })))
}
