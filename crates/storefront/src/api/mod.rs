//! Backend REST API client.
//!
//! # Architecture
//!
//! - One `reqwest::Client` shared by every store, cheap to clone via `Arc`
//! - Every request carries `Authorization: Bearer <token>` when a token is
//!   stored in the [`TokenStore`]
//! - Responses are decoded through [`Envelope`]; non-success statuses become
//!   [`ApiError::Status`] with the body's `message` when present
//!
//! The stores depend on the [`PaymentsApi`], [`ProfileApi`] and
//! [`RazorpayApi`] traits rather than on [`ApiClient`] directly so they can be
//! driven by in-memory fakes.
//!
//! # Example
//!
//! ```rust,ignore
//! use bazaar_storefront::api::{ApiClient, PaymentsApi};
//! use bazaar_storefront::token::TokenStore;
//!
//! let client = ApiClient::new(config.api_base_url(), TokenStore::with_token(token))?;
//! let payments = client.my_payments().await?;
//! ```

mod types;

pub use types::*;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use bazaar_core::{NewPayment, Payment, PaymentId, ProfileUpdate, UserProfile};
use reqwest::Method;
use secrecy::ExposeSecret;
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

use crate::config::StorefrontConfig;
use crate::token::TokenStore;

/// Request timeout for backend calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors that can occur when calling the backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success status.
    #[error("API error: {status} - {}", .message.as_deref().unwrap_or("(no message)"))]
    Status { status: u16, message: Option<String> },

    /// Backend answered 2xx but flagged the call as failed.
    #[error("Request rejected: {0}")]
    Rejected(String),

    /// Successful envelope without a `data` payload.
    #[error("Response contained no data")]
    MissingData,

    /// Response body was not the expected JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The configured base URL cannot carry path segments.
    #[error("Invalid API base URL: {0}")]
    InvalidBaseUrl(String),
}

impl ApiError {
    /// The message a store should show: the backend's own message when it
    /// sent one, otherwise `fallback`.
    #[must_use]
    pub fn message_or(&self, fallback: &str) -> String {
        match self {
            Self::Status {
                message: Some(message),
                ..
            }
            | Self::Rejected(message) => message.clone(),
            _ => fallback.to_string(),
        }
    }

    /// HTTP status, when the backend answered.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the backend deliberately refused the request (4xx or an
    /// explicit `success: false`), as opposed to the call failing.
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        match self {
            Self::Status { status, .. } => *status >= 400 && *status < 500,
            Self::Rejected(_) => true,
            _ => false,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// API Traits
// ─────────────────────────────────────────────────────────────────────────────

/// Payment endpoints.
pub trait PaymentsApi: Send + Sync {
    /// `POST /payments`
    fn create_payment(
        &self,
        payment: &NewPayment,
    ) -> impl Future<Output = Result<Payment, ApiError>> + Send;

    /// `GET /my-payments`
    fn my_payments(&self) -> impl Future<Output = Result<Vec<Payment>, ApiError>> + Send;

    /// `GET /payments/{id}`
    fn payment_by_id(
        &self,
        id: &PaymentId,
    ) -> impl Future<Output = Result<Payment, ApiError>> + Send;
}

/// Auth/profile endpoints.
pub trait ProfileApi: Send + Sync {
    /// `GET /auth/profile`
    fn get_profile(&self) -> impl Future<Output = Result<UserProfile, ApiError>> + Send;

    /// `PUT /auth/profile`
    fn update_profile(
        &self,
        update: &ProfileUpdate,
    ) -> impl Future<Output = Result<UserProfile, ApiError>> + Send;
}

/// Razorpay order endpoints.
pub trait RazorpayApi: Send + Sync {
    /// `POST /razorpay/create-order`
    fn create_order(
        &self,
        request: &OrderRequest,
    ) -> impl Future<Output = Result<RazorpayOrder, ApiError>> + Send;

    /// `POST /razorpay/verify`
    fn verify_payment(
        &self,
        response: &CheckoutResponse,
    ) -> impl Future<Output = Result<Verification, ApiError>> + Send;
}

// ─────────────────────────────────────────────────────────────────────────────
// ApiClient
// ─────────────────────────────────────────────────────────────────────────────

/// Client for the backend REST API.
#[derive(Clone, Debug)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

#[derive(Debug)]
struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
    tokens: TokenStore,
}

impl ApiClient {
    /// Create a client rooted at `base_url` (e.g. `http://localhost:5000/api/v1/`).
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL cannot carry a path or the HTTP
    /// client fails to build.
    pub fn new(base_url: Url, tokens: TokenStore) -> Result<Self, ApiError> {
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidBaseUrl(base_url.to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("bazaar/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url,
                tokens,
            }),
        })
    }

    /// Create a client from the storefront configuration.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::new`].
    pub fn from_config(config: &StorefrontConfig, tokens: TokenStore) -> Result<Self, ApiError> {
        Self::new(config.api_base_url(), tokens)
    }

    /// The base URL every endpoint is resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// The token store used for the `Authorization` header.
    #[must_use]
    pub fn tokens(&self) -> &TokenStore {
        &self.inner.tokens
    }

    /// Resolve path segments beneath the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidBaseUrl(self.inner.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Send a request and decode the response envelope.
    async fn send<B, T>(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<&B>,
    ) -> Result<Envelope<T>, ApiError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let url = self.endpoint(segments)?;
        let mut request = self.inner.client.request(method.clone(), url.clone());

        if let Some(token) = self.inner.tokens.get() {
            request = request.bearer_auth(token.expose_secret());
        } else {
            debug!(%url, "No bearer token stored, sending unauthenticated request");
        }

        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = error_message(&text);
            tracing::warn!(
                %method,
                %url,
                status = status.as_u16(),
                message = message.as_deref().unwrap_or(""),
                "Backend returned non-success status"
            );
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str::<Envelope<T>>(&text).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %text.chars().take(500).collect::<String>(),
                "Failed to parse backend response"
            );
            ApiError::Parse(e)
        })
    }

    async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, ApiError> {
        self.send::<(), T>(Method::GET, segments, None)
            .await?
            .into_data()
    }

    async fn write<B, T>(&self, method: Method, segments: &[&str], body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        self.send::<B, T>(method, segments, Some(body))
            .await?
            .into_data()
    }
}

/// Extract a human-readable message from an error body.
///
/// Prefers `message`, then `error`; plain-text bodies are used as-is when
/// short enough to be a message rather than an HTML error page.
fn error_message(body: &str) -> Option<String> {
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        return parsed
            .message
            .or(parsed.error)
            .filter(|m| !m.trim().is_empty());
    }
    let trimmed = body.trim();
    (!trimmed.is_empty() && trimmed.len() <= 200 && !trimmed.starts_with('<'))
        .then(|| trimmed.to_string())
}

impl PaymentsApi for ApiClient {
    #[instrument(skip(self, payment), fields(transaction_id = %payment.transaction_id))]
    async fn create_payment(&self, payment: &NewPayment) -> Result<Payment, ApiError> {
        self.write(Method::POST, &["payments"], payment).await
    }

    #[instrument(skip(self))]
    async fn my_payments(&self) -> Result<Vec<Payment>, ApiError> {
        self.get(&["my-payments"]).await
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn payment_by_id(&self, id: &PaymentId) -> Result<Payment, ApiError> {
        self.get(&["payments", id.as_str()]).await
    }
}

impl ProfileApi for ApiClient {
    #[instrument(skip(self))]
    async fn get_profile(&self) -> Result<UserProfile, ApiError> {
        self.get(&["auth", "profile"]).await
    }

    #[instrument(skip(self, update))]
    async fn update_profile(&self, update: &ProfileUpdate) -> Result<UserProfile, ApiError> {
        self.write(Method::PUT, &["auth", "profile"], update).await
    }
}

impl RazorpayApi for ApiClient {
    #[instrument(skip(self, request), fields(receipt = %request.receipt))]
    async fn create_order(&self, request: &OrderRequest) -> Result<RazorpayOrder, ApiError> {
        self.write(Method::POST, &["razorpay", "create-order"], request)
            .await
    }

    #[instrument(skip(self, response), fields(order_id = %response.razorpay_order_id))]
    async fn verify_payment(&self, response: &CheckoutResponse) -> Result<Verification, ApiError> {
        let envelope = self
            .send::<_, Payment>(Method::POST, &["razorpay", "verify"], Some(response))
            .await?
            .check()?;
        Ok(Verification {
            message: envelope.message,
            payment: envelope.data,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(base: &str) -> ApiClient {
        ApiClient::new(base.parse().unwrap(), TokenStore::in_memory()).unwrap()
    }

    #[test]
    fn test_endpoint_joins_beneath_base() {
        let client = client("http://localhost:5000/api/v1/");
        assert_eq!(
            client.endpoint(&["payments", "p1"]).unwrap().as_str(),
            "http://localhost:5000/api/v1/payments/p1"
        );
        assert_eq!(
            client.endpoint(&["my-payments"]).unwrap().as_str(),
            "http://localhost:5000/api/v1/my-payments"
        );
    }

    #[test]
    fn test_endpoint_encodes_segments() {
        let client = client("http://localhost:5000/api/v1/");
        assert_eq!(
            client.endpoint(&["payments", "a/b c"]).unwrap().as_str(),
            "http://localhost:5000/api/v1/payments/a%2Fb%20c"
        );
    }

    #[test]
    fn test_rejects_non_base_url() {
        let result = ApiClient::new("mailto:a@b.c".parse().unwrap(), TokenStore::in_memory());
        assert!(matches!(result, Err(ApiError::InvalidBaseUrl(_))));
    }

    #[test]
    fn test_error_message_extraction() {
        assert_eq!(
            error_message(r#"{"message":"server error"}"#).as_deref(),
            Some("server error")
        );
        assert_eq!(
            error_message(r#"{"error":"Not authorized"}"#).as_deref(),
            Some("Not authorized")
        );
        assert_eq!(error_message(r#"{"message":""}"#), None);
        assert_eq!(error_message("Bad Gateway").as_deref(), Some("Bad Gateway"));
        assert_eq!(error_message("<html>oops</html>"), None);
        assert_eq!(error_message(""), None);
    }

    #[test]
    fn test_message_or_prefers_backend_message() {
        let err = ApiError::Status {
            status: 500,
            message: Some("server error".to_string()),
        };
        assert_eq!(err.message_or("Failed to fetch payments"), "server error");

        let err = ApiError::Status {
            status: 502,
            message: None,
        };
        assert_eq!(
            err.message_or("Failed to fetch payments"),
            "Failed to fetch payments"
        );
        assert_eq!(ApiError::MissingData.message_or("fallback"), "fallback");
    }

    #[test]
    fn test_is_rejection() {
        let rejected = ApiError::Status {
            status: 422,
            message: None,
        };
        let failed = ApiError::Status {
            status: 503,
            message: None,
        };
        assert!(rejected.is_rejection());
        assert!(!failed.is_rejection());
        assert!(ApiError::Rejected("no".to_string()).is_rejection());
        assert!(!ApiError::MissingData.is_rejection());
        assert_eq!(failed.status(), Some(503));
    }
}
