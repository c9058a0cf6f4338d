//! Integration tests for Bazaar.
//!
//! [`MockBackend`] serves the backend REST API in-process on an ephemeral
//! port, so the storefront stores, the profile editor and the dev proxy can be
//! exercised end to end over real HTTP.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p bazaar-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `payments` - Payment store against the payment endpoints
//! - `profile` - Profile page and edit form against the profile endpoints
//! - `razorpay` - Order creation, checkout and verification
//! - `proxy` - Dev proxy forwarding

use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, Method, StatusCode, Uri, header},
    response::{IntoResponse, Response},
    routing::{any, get, post},
};
use bazaar_core::{
    Address, AddressId, CurrencyCode, NewPayment, Payment, PaymentId, PaymentStatus,
    ProfileUpdate, Role, UserId, UserProfile,
};
use bazaar_storefront::api::CheckoutResponse;
use bazaar_storefront::stores::{CheckoutWidget, UnavailableWidget};
use bazaar_storefront::{AppContext, StorefrontConfig, TokenStore};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use url::Url;

/// Bearer token the mock backend accepts.
pub const TEST_TOKEN: &str = "test-token";

/// Signature the mock backend treats as valid on verification.
pub const VALID_SIGNATURE: &str = "valid_signature";

/// Razorpay key id handed to the storefront configuration.
pub const TEST_KEY_ID: &str = "rzp_test_1DP5mmOlF5G5ag";

// =============================================================================
// Backend state
// =============================================================================

/// Everything the mock backend holds, plus a record of what it was sent.
#[derive(Debug)]
pub struct BackendData {
    pub profile: UserProfile,
    /// Newest first.
    pub payments: Vec<Payment>,
    /// Raw bodies of every `PUT /auth/profile`.
    pub profile_updates: Vec<Value>,
    /// Raw bodies of every `POST /razorpay/create-order`.
    pub orders: Vec<Value>,
    /// Number of `GET /auth/profile` calls.
    pub profile_gets: usize,
    /// When set, `PUT /auth/profile` answers with this status.
    pub profile_update_failure: Option<StatusCode>,
    next_id: u32,
}

impl BackendData {
    const fn new(profile: UserProfile) -> Self {
        Self {
            profile,
            payments: Vec::new(),
            profile_updates: Vec::new(),
            orders: Vec::new(),
            profile_gets: 0,
            profile_update_failure: None,
            next_id: 0,
        }
    }

    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}_{}", self.next_id)
    }
}

type Shared = Arc<Mutex<BackendData>>;

fn lock(data: &Shared) -> MutexGuard<'_, BackendData> {
    data.lock().unwrap_or_else(PoisonError::into_inner)
}

/// The profile the backend starts with: two addresses, the first default.
#[must_use]
pub fn sample_profile() -> UserProfile {
    UserProfile {
        id: UserId::new("u1"),
        name: "Asha Rao".to_string(),
        email: "asha@example.com".to_string(),
        phone: "9999900000".to_string(),
        role: Role::User,
        address: vec![
            Address {
                id: Some(AddressId::new("a1")),
                street: "12 MG Road".to_string(),
                city: "Bengaluru".to_string(),
                state: "KA".to_string(),
                postal_code: "560001".to_string(),
                country: "India".to_string(),
                ..Address::for_recipient("Asha Rao", "9999900000", true)
            },
            Address {
                id: Some(AddressId::new("a2")),
                street: "4 Palace Road".to_string(),
                city: "Mysuru".to_string(),
                state: "KA".to_string(),
                postal_code: "570001".to_string(),
                country: "India".to_string(),
                ..Address::for_recipient("Asha Rao", "9999900000", false)
            },
        ],
    }
}

// =============================================================================
// Server
// =============================================================================

/// In-process backend bound to `127.0.0.1` on an ephemeral port.
///
/// The server task is aborted on drop.
pub struct MockBackend {
    addr: SocketAddr,
    data: Shared,
    server: JoinHandle<()>,
}

impl MockBackend {
    /// Start a backend holding [`sample_profile`].
    ///
    /// # Panics
    ///
    /// Panics if no local port can be bound.
    pub async fn start() -> Self {
        Self::with_profile(sample_profile()).await
    }

    /// Start a backend holding `profile`.
    ///
    /// # Panics
    ///
    /// Panics if no local port can be bound.
    pub async fn with_profile(profile: UserProfile) -> Self {
        let data = Arc::new(Mutex::new(BackendData::new(profile)));
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock backend");
        let addr = listener
            .local_addr()
            .expect("Failed to read mock backend address");

        let app = router(Arc::clone(&data));
        let server = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self { addr, data, server }
    }

    /// Backend origin, e.g. `http://127.0.0.1:49152/`.
    ///
    /// # Panics
    ///
    /// Never in practice; the address always forms a valid URL.
    #[must_use]
    pub fn origin(&self) -> Url {
        Url::parse(&format!("http://{}", self.addr)).expect("Invalid mock backend origin")
    }

    /// Storefront configuration pointing at this backend.
    ///
    /// # Panics
    ///
    /// Panics if the configuration is rejected.
    #[must_use]
    pub fn config(&self) -> StorefrontConfig {
        let origin = self.origin().to_string();
        StorefrontConfig::from_lookup(|key| match key {
            "BAZAAR_BACKEND_ORIGIN" => Some(origin.clone()),
            "RAZORPAY_KEY_ID" => Some(TEST_KEY_ID.to_string()),
            _ => None,
        })
        .expect("Mock backend configuration rejected")
    }

    /// Context signed in with [`TEST_TOKEN`].
    #[must_use]
    pub fn context(&self) -> AppContext {
        self.context_with(TokenStore::with_token(TEST_TOKEN), UnavailableWidget)
    }

    /// Context with an explicit token store and checkout widget.
    ///
    /// # Panics
    ///
    /// Panics if the context cannot be built.
    #[must_use]
    pub fn context_with<W: CheckoutWidget>(&self, tokens: TokenStore, widget: W) -> AppContext<W> {
        AppContext::with_widget(self.config(), tokens, widget)
            .expect("Failed to build app context")
    }

    /// Backend state. Do not hold the guard across an `.await`.
    pub fn data(&self) -> MutexGuard<'_, BackendData> {
        lock(&self.data)
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.server.abort();
    }
}

fn router(data: Shared) -> Router {
    Router::new()
        .route("/api/v1/payments", post(create_payment))
        .route("/api/v1/payments/{id}", get(payment_by_id))
        .route("/api/v1/my-payments", get(my_payments))
        .route("/api/v1/auth/profile", get(get_profile).put(update_profile))
        .route("/api/v1/razorpay/create-order", post(create_order))
        .route("/api/v1/razorpay/verify", post(verify_payment))
        .route("/echo/{*path}", any(echo))
        .with_state(data)
}

// =============================================================================
// Envelope helpers
// =============================================================================

fn success(status: StatusCode, data: impl Serialize) -> Response {
    (status, Json(json!({ "success": true, "data": data }))).into_response()
}

fn failure(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "success": false, "message": message }))).into_response()
}

fn authorize(headers: &HeaderMap) -> Result<(), Response> {
    let expected = format!("Bearer {TEST_TOKEN}");
    match headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
    {
        Some(value) if value == expected => Ok(()),
        _ => Err(failure(
            StatusCode::UNAUTHORIZED,
            "Not authorized, no token",
        )),
    }
}

// =============================================================================
// Payments
// =============================================================================

async fn create_payment(
    State(data): State<Shared>,
    headers: HeaderMap,
    Json(request): Json<NewPayment>,
) -> Response {
    if let Err(response) = authorize(&headers) {
        return response;
    }
    if request.amount <= Decimal::ZERO {
        return failure(StatusCode::BAD_REQUEST, "Amount must be positive");
    }

    let mut data = lock(&data);
    let payment = Payment {
        id: Some(PaymentId::new(data.next_id("pay"))),
        user: Some(data.profile.id.clone()),
        business_profile: request.business_profile,
        amount: request.amount,
        currency: request.currency.or(Some(CurrencyCode::INR)),
        payment_method: request.payment_method,
        payment_status: PaymentStatus::Completed,
        transaction_id: request.transaction_id,
        subscription_type: request.subscription_type,
        subscription_start_date: None,
        subscription_end_date: None,
        created_at: None,
    };
    data.payments.insert(0, payment.clone());
    success(StatusCode::CREATED, &payment)
}

async fn my_payments(State(data): State<Shared>, headers: HeaderMap) -> Response {
    if let Err(response) = authorize(&headers) {
        return response;
    }
    success(StatusCode::OK, &lock(&data).payments)
}

async fn payment_by_id(
    State(data): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if let Err(response) = authorize(&headers) {
        return response;
    }
    let data = lock(&data);
    match data
        .payments
        .iter()
        .find(|p| p.id.as_ref().is_some_and(|pid| pid.as_str() == id))
    {
        Some(payment) => success(StatusCode::OK, payment),
        None => failure(StatusCode::NOT_FOUND, "Payment not found"),
    }
}

// =============================================================================
// Profile
// =============================================================================

async fn get_profile(State(data): State<Shared>, headers: HeaderMap) -> Response {
    if let Err(response) = authorize(&headers) {
        return response;
    }
    let mut data = lock(&data);
    data.profile_gets += 1;
    success(StatusCode::OK, &data.profile)
}

async fn update_profile(
    State(data): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(response) = authorize(&headers) {
        return response;
    }

    let mut data = lock(&data);
    data.profile_updates.push(body.clone());

    if let Some(status) = data.profile_update_failure {
        return failure(status, "Profile update failed");
    }
    let Ok(update) = serde_json::from_value::<ProfileUpdate>(body) else {
        return failure(StatusCode::BAD_REQUEST, "Invalid profile");
    };

    let mut updated = data.profile.with_update(&update);
    for address in &mut updated.address {
        if address.id.is_none() {
            address.id = Some(AddressId::new(data.next_id("addr")));
        }
    }
    data.profile = updated;
    success(StatusCode::OK, &data.profile)
}

// =============================================================================
// Razorpay
// =============================================================================

#[derive(Deserialize)]
struct OrderBody {
    #[serde(with = "rust_decimal::serde::float")]
    amount: Decimal,
    currency: CurrencyCode,
    receipt: String,
}

async fn create_order(
    State(data): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(response) = authorize(&headers) {
        return response;
    }

    let mut data = lock(&data);
    data.orders.push(body.clone());

    let Ok(order) = serde_json::from_value::<OrderBody>(body) else {
        return failure(StatusCode::BAD_REQUEST, "Invalid order request");
    };
    if order.amount <= Decimal::ZERO {
        return failure(StatusCode::BAD_REQUEST, "Invalid amount");
    }
    let Ok(minor) = order.currency.to_minor(order.amount) else {
        return failure(StatusCode::BAD_REQUEST, "Invalid amount");
    };

    success(
        StatusCode::OK,
        json!({
            "id": data.next_id("order"),
            "entity": "order",
            "amount": minor,
            "currency": order.currency,
            "receipt": order.receipt,
            "status": "created",
        }),
    )
}

async fn verify_payment(
    State(data): State<Shared>,
    headers: HeaderMap,
    Json(checkout): Json<CheckoutResponse>,
) -> Response {
    if let Err(response) = authorize(&headers) {
        return response;
    }
    if checkout.razorpay_signature != VALID_SIGNATURE {
        return failure(StatusCode::BAD_REQUEST, "Invalid payment signature");
    }

    let mut data = lock(&data);
    let payment = Payment {
        id: Some(PaymentId::new(data.next_id("pay"))),
        user: Some(data.profile.id.clone()),
        business_profile: None,
        amount: Decimal::ZERO,
        currency: Some(CurrencyCode::INR),
        payment_method: "razorpay".to_string(),
        payment_status: PaymentStatus::Completed,
        transaction_id: checkout.razorpay_payment_id,
        subscription_type: None,
        subscription_start_date: None,
        subscription_end_date: None,
        created_at: None,
    };
    data.payments.insert(0, payment.clone());

    Json(json!({
        "success": true,
        "message": "Payment verified successfully",
        "data": payment,
    }))
    .into_response()
}

// =============================================================================
// Echo
// =============================================================================

/// Echo what arrived, for checking what the dev proxy forwards.
async fn echo(method: Method, uri: Uri, headers: HeaderMap, body: String) -> Response {
    let header_value = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };

    let echoed = json!({
        "method": method.as_str(),
        "path": uri.path(),
        "query": uri.query(),
        "authorization": header_value("authorization"),
        "requestId": header_value("x-request-id"),
        "connection": header_value("connection"),
        "body": body,
    });

    (
        [("x-upstream", "mock-backend")],
        Json(echoed),
    )
        .into_response()
}
