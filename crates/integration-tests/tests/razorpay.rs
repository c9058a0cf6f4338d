//! Integration tests for the Razorpay order, checkout and verification flow.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::sync::{Arc, Mutex};

use bazaar_core::CurrencyCode;
use bazaar_integration_tests::{MockBackend, TEST_KEY_ID, TEST_TOKEN, VALID_SIGNATURE};
use bazaar_storefront::TokenStore;
use bazaar_storefront::api::CheckoutResponse;
use bazaar_storefront::stores::{
    CheckoutError, CheckoutOptions, CheckoutWidget, PayOutcome, Prefill,
};
use rust_decimal::Decimal;

/// Widget that answers with a fixed signature, or a fixed error, and keeps
/// the options it was opened with.
#[derive(Clone, Default)]
struct ScriptedWidget {
    signature: &'static str,
    error: Option<CheckoutError>,
    opened: Arc<Mutex<Vec<CheckoutOptions>>>,
}

impl ScriptedWidget {
    fn paying(signature: &'static str) -> Self {
        Self {
            signature,
            ..Self::default()
        }
    }

    fn failing(error: CheckoutError) -> Self {
        Self {
            error: Some(error),
            ..Self::default()
        }
    }
}

impl CheckoutWidget for ScriptedWidget {
    async fn open(&self, options: &CheckoutOptions) -> Result<CheckoutResponse, CheckoutError> {
        self.opened.lock().unwrap().push(options.clone());
        if let Some(error) = &self.error {
            return Err(error.clone());
        }
        Ok(CheckoutResponse {
            razorpay_payment_id: "pay_widget_1".to_string(),
            razorpay_order_id: options.order_id.clone(),
            razorpay_signature: self.signature.to_string(),
        })
    }
}

fn prefill() -> Prefill {
    Prefill {
        name: Some("Asha Rao".to_string()),
        email: Some("asha@example.com".to_string()),
        contact: Some("9999900000".to_string()),
    }
}

// =============================================================================
// Orders
// =============================================================================

#[tokio::test]
async fn test_create_order_in_minor_units() {
    let backend = MockBackend::start().await;
    let ctx = backend.context();
    let mut store = ctx.razorpay().lock().await;

    let order = store.create_order(Decimal::new(25_050, 2)).await.unwrap();

    assert_eq!(order.amount, 25_050);
    assert_eq!(order.currency, CurrencyCode::INR);
    assert_eq!(store.state().rzp_order.as_ref(), Some(&order));
    assert!(!store.state().rzp_loading);

    let data = backend.data();
    let body = &data.orders[0];
    assert_eq!(body["currency"], "INR");
    assert!((body["amount"].as_f64().unwrap() - 250.5).abs() < f64::EPSILON);
    assert!(body["receipt"].as_str().unwrap().starts_with("rcpt_"));
}

#[tokio::test]
async fn test_failed_order_clears_previous_one() {
    let backend = MockBackend::start().await;
    let ctx = backend.context();
    let mut store = ctx.razorpay().lock().await;

    store.create_order(Decimal::from(100)).await.unwrap();
    assert!(store.state().rzp_order.is_some());

    let order = store.create_order(Decimal::ZERO).await;

    assert!(order.is_none());
    assert!(store.state().rzp_order.is_none());
    assert_eq!(store.state().rzp_error.as_deref(), Some("Invalid amount"));
}

// =============================================================================
// Pay
// =============================================================================

#[tokio::test]
async fn test_pay_verifies_with_backend() {
    let backend = MockBackend::start().await;
    let widget = ScriptedWidget::paying(VALID_SIGNATURE);
    let opened = Arc::clone(&widget.opened);
    let ctx = backend.context_with(TokenStore::with_token(TEST_TOKEN), widget);
    let mut store = ctx.razorpay().lock().await;

    let outcome = store.pay(Decimal::from(499), prefill()).await;

    let verification = match outcome {
        PayOutcome::Verified(verification) => verification,
        other => panic!("expected a verified payment, got {other:?}"),
    };
    assert_eq!(
        verification.message.as_deref(),
        Some("Payment verified successfully")
    );
    assert_eq!(
        verification.payment.unwrap().transaction_id,
        "pay_widget_1"
    );
    assert!(store.state().verification.is_some());
    assert!(store.state().rzp_error.is_none());

    let opened = opened.lock().unwrap();
    assert_eq!(opened.len(), 1);
    assert_eq!(opened[0].key, TEST_KEY_ID);
    assert_eq!(opened[0].amount, 49_900);
    assert_eq!(
        Some(&opened[0].order_id),
        store.state().rzp_order.as_ref().map(|o| &o.id)
    );
    assert_eq!(opened[0].prefill, prefill());
}

#[tokio::test]
async fn test_pay_with_bad_signature_reports_backend_message() {
    let backend = MockBackend::start().await;
    let ctx = backend.context_with(
        TokenStore::with_token(TEST_TOKEN),
        ScriptedWidget::paying("forged"),
    );
    let mut store = ctx.razorpay().lock().await;

    let outcome = store.pay(Decimal::from(499), Prefill::default()).await;

    assert_eq!(
        outcome,
        PayOutcome::VerificationFailed("Invalid payment signature".to_string())
    );
    assert_eq!(
        store.state().rzp_error.as_deref(),
        Some("Invalid payment signature")
    );
    assert!(store.state().verification.is_none());
    assert!(backend.data().payments.is_empty());
}

#[tokio::test]
async fn test_dismissed_checkout_skips_verification() {
    let backend = MockBackend::start().await;
    let ctx = backend.context_with(
        TokenStore::with_token(TEST_TOKEN),
        ScriptedWidget::failing(CheckoutError::Dismissed),
    );
    let mut store = ctx.razorpay().lock().await;

    let outcome = store.pay(Decimal::from(499), Prefill::default()).await;

    assert_eq!(outcome, PayOutcome::CheckoutFailed("Payment cancelled".to_string()));
    assert!(store.state().rzp_order.is_some());
    assert!(backend.data().payments.is_empty());
}

#[tokio::test]
async fn test_failed_order_never_opens_widget() {
    let backend = MockBackend::start().await;
    let widget = ScriptedWidget::paying(VALID_SIGNATURE);
    let opened = Arc::clone(&widget.opened);
    let ctx = backend.context_with(TokenStore::with_token(TEST_TOKEN), widget);
    let mut store = ctx.razorpay().lock().await;

    let outcome = store.pay(Decimal::ZERO, Prefill::default()).await;

    assert_eq!(outcome, PayOutcome::NoOrder);
    assert!(opened.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_default_context_cannot_open_checkout() {
    let backend = MockBackend::start().await;
    let ctx = backend.context();
    let mut store = ctx.razorpay().lock().await;

    let outcome = store.pay(Decimal::from(10), Prefill::default()).await;

    let message = match outcome {
        PayOutcome::CheckoutFailed(message) => message,
        other => panic!("expected checkout to fail, got {other:?}"),
    };
    assert!(message.contains("no checkout widget"));
    assert!(store.state().rzp_order.is_some());
}
