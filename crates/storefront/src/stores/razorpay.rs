//! Razorpay order and checkout flow.
//!
//! Two steps: the backend creates an order, then the checkout widget collects
//! the payment against that order and its response is posted back for
//! signature verification. The widget itself is third-party; it sits behind
//! [`CheckoutWidget`].

use std::future::Future;

use bazaar_core::CurrencyCode;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::api::{CheckoutResponse, OrderRequest, RazorpayApi, RazorpayOrder, Verification};
use crate::config::RazorpayConfig;

const ORDER_FAILED: &str = "Failed to create order";
const VERIFY_FAILED: &str = "Payment verification failed";

/// Errors reported by the checkout widget.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CheckoutError {
    /// The customer closed the widget without paying.
    #[error("Payment cancelled")]
    Dismissed,
    /// The gateway declined or failed the payment.
    #[error("Payment failed: {0}")]
    Failed(String),
    /// The widget could not be opened (script not loaded, no key configured).
    #[error("Checkout unavailable: {0}")]
    Unavailable(String),
}

/// Customer details pre-filled in the widget.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prefill {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
}

/// Widget theme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    pub color: String,
}

/// Configuration handed to the checkout widget.
///
/// Serializes to the widget's option object, minus the success handler: the
/// handler's job (posting the response for verification) is done by
/// [`RazorpayStore::pay`] once [`CheckoutWidget::open`] resolves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutOptions {
    pub key: String,
    /// Amount in the smallest currency unit, as the order carries it.
    pub amount: i64,
    pub currency: CurrencyCode,
    pub name: String,
    pub description: String,
    pub order_id: String,
    pub prefill: Prefill,
    pub theme: Theme,
}

/// The third-party payment widget.
pub trait CheckoutWidget: Send + Sync {
    /// Show the widget and wait for the customer to pay or give up.
    fn open(
        &self,
        options: &CheckoutOptions,
    ) -> impl Future<Output = Result<CheckoutResponse, CheckoutError>> + Send;
}

/// Widget for environments that cannot show the hosted checkout, such as
/// the command line.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableWidget;

impl CheckoutWidget for UnavailableWidget {
    async fn open(&self, options: &CheckoutOptions) -> Result<CheckoutResponse, CheckoutError> {
        Err(CheckoutError::Unavailable(format!(
            "no checkout widget to collect order {}",
            options.order_id
        )))
    }
}

/// How a [`RazorpayStore::pay`] call ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayOutcome {
    /// Paid and verified by the backend.
    Verified(Verification),
    /// Order creation failed; the widget was never opened.
    NoOrder,
    /// The widget failed or was dismissed. The message is meant for a
    /// blocking alert.
    CheckoutFailed(String),
    /// The customer paid but the backend rejected the verification.
    VerificationFailed(String),
}

/// Observable state of the Razorpay flow.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RazorpayState {
    pub rzp_order: Option<RazorpayOrder>,
    pub rzp_loading: bool,
    pub rzp_error: Option<String>,
    pub verification: Option<Verification>,
}

/// Store driving the order → checkout → verify sequence.
#[derive(Debug)]
pub struct RazorpayStore<A, W> {
    api: A,
    widget: W,
    config: RazorpayConfig,
    state: RazorpayState,
}

impl<A: RazorpayApi, W: CheckoutWidget> RazorpayStore<A, W> {
    /// Create a store with no order.
    pub fn new(api: A, widget: W, config: RazorpayConfig) -> Self {
        Self {
            api,
            widget,
            config,
            state: RazorpayState::default(),
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &RazorpayState {
        &self.state
    }

    /// Ask the backend for an order of `amount` (standard currency units).
    ///
    /// Any previous order is dropped first, so a failure always leaves
    /// `rzp_order` empty.
    pub async fn create_order(&mut self, amount: Decimal) -> Option<RazorpayOrder> {
        self.state.rzp_loading = true;
        self.state.rzp_error = None;
        self.state.rzp_order = None;

        let request = OrderRequest {
            amount,
            currency: self.config.currency,
            receipt: format!("rcpt_{}", Uuid::new_v4().simple()),
        };
        let result = self.api.create_order(&request).await;
        self.state.rzp_loading = false;

        match result {
            Ok(order) => {
                info!(order_id = %order.id, amount = order.amount, "Razorpay order created");
                self.state.rzp_order = Some(order.clone());
                Some(order)
            }
            Err(e) => {
                warn!(error = %e, "Create order failed");
                self.state.rzp_error = Some(e.message_or(ORDER_FAILED));
                None
            }
        }
    }

    /// Create an order, open the widget for it, and verify the result.
    ///
    /// No retries: each step runs at most once.
    pub async fn pay(&mut self, amount: Decimal, prefill: Prefill) -> PayOutcome {
        self.state.verification = None;
        self.create_order(amount).await;

        let Some(order) = self.state.rzp_order.clone() else {
            return PayOutcome::NoOrder;
        };

        let options = self.checkout_options(&order, prefill);
        let response = match self.widget.open(&options).await {
            Ok(response) => response,
            Err(e) => {
                warn!(order_id = %order.id, error = %e, "Checkout did not complete");
                let message = e.to_string();
                self.state.rzp_error = Some(message.clone());
                return PayOutcome::CheckoutFailed(message);
            }
        };

        self.state.rzp_loading = true;
        let result = self.api.verify_payment(&response).await;
        self.state.rzp_loading = false;

        match result {
            Ok(verification) => {
                info!(
                    order_id = %response.razorpay_order_id,
                    payment_id = %response.razorpay_payment_id,
                    "Payment verified"
                );
                self.state.verification = Some(verification.clone());
                PayOutcome::Verified(verification)
            }
            Err(e) => {
                error!(
                    order_id = %response.razorpay_order_id,
                    payment_id = %response.razorpay_payment_id,
                    error = %e,
                    "Payment verification failed"
                );
                let message = e.message_or(VERIFY_FAILED);
                self.state.rzp_error = Some(message.clone());
                PayOutcome::VerificationFailed(message)
            }
        }
    }

    /// Drop the order, error and verification.
    pub fn reset(&mut self) {
        self.state = RazorpayState::default();
    }

    /// Build the widget configuration for an order.
    #[must_use]
    pub fn checkout_options(&self, order: &RazorpayOrder, prefill: Prefill) -> CheckoutOptions {
        CheckoutOptions {
            key: self.config.key_id.clone().unwrap_or_default(),
            amount: order.amount,
            currency: order.currency,
            name: self.config.merchant_name.clone(),
            description: format!("Order {}", order.receipt.as_deref().unwrap_or(&order.id)),
            order_id: order.id.clone(),
            prefill,
            theme: Theme {
                color: self.config.theme_color.clone(),
            },
        }
    }
}
