//! Wire types for the backend REST API.

use bazaar_core::{CurrencyCode, Payment};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ApiError;

/// Standard response envelope: `{ success, data, message }`.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub success: Option<bool>,
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    /// Fail on an explicit `success: false`, otherwise hand back the envelope.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Rejected` when the backend flagged the call as failed.
    pub fn check(self) -> Result<Self, ApiError> {
        if self.success == Some(false) {
            return Err(ApiError::Rejected(
                self.message
                    .unwrap_or_else(|| "Request was not successful".to_string()),
            ));
        }
        Ok(self)
    }

    /// The `data` payload of a successful envelope.
    ///
    /// # Errors
    ///
    /// Returns an error if the call was rejected or carried no data.
    pub fn into_data(self) -> Result<T, ApiError> {
        self.check()?.data.ok_or(ApiError::MissingData)
    }
}

/// Error body returned with non-success statuses.
#[derive(Debug, Deserialize)]
pub(super) struct ErrorBody {
    pub message: Option<String>,
    pub error: Option<String>,
}

/// Body for `POST /razorpay/create-order`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderRequest {
    /// Amount in the currency's standard unit; the backend converts.
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub currency: CurrencyCode,
    pub receipt: String,
}

/// Order descriptor returned by the backend (a Razorpay order).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RazorpayOrder {
    pub id: String,
    /// Amount in the smallest currency unit.
    pub amount: i64,
    pub currency: CurrencyCode,
    #[serde(default)]
    pub receipt: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// What the checkout widget hands back after a successful payment.
///
/// Posted unchanged to `POST /razorpay/verify`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutResponse {
    pub razorpay_payment_id: String,
    pub razorpay_order_id: String,
    pub razorpay_signature: String,
}

/// Result of a verification call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verification {
    pub message: Option<String>,
    /// The payment record the backend created, when it returns one.
    pub payment: Option<Payment>,
}
