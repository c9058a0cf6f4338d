//! Payment commands.
//!
//! # Usage
//!
//! ```bash
//! bazaar payments list
//! bazaar payments get 665f1c0e9b1e8a3d4c2b1a00
//! bazaar payments create --amount 499 --method upi --transaction-id tx_123
//! ```

use bazaar_core::{CurrencyCode, NewPayment, Payment, PaymentId, Price};
use rust_decimal::Decimal;

use super::{CommandError, Output, authenticated_context};

/// List the signed-in user's payments.
pub async fn list(output: Output) -> Result<(), CommandError> {
    let ctx = authenticated_context()?;
    let mut store = ctx.payments().lock().await;
    store.fetch_my_payments().await;

    let state = store.state();
    if let Some(error) = &state.error {
        return Err(CommandError::Store(error.clone()));
    }
    output.emit(state.payments.as_slice(), |payments| {
        if payments.is_empty() {
            return "No payments".to_string();
        }
        payments.iter().map(render_row).collect::<Vec<_>>().join("\n")
    })
}

/// Show one payment.
pub async fn get(id: &str, output: Output) -> Result<(), CommandError> {
    let ctx = authenticated_context()?;
    let mut store = ctx.payments().lock().await;

    match store.fetch_payment_by_id(&PaymentId::new(id)).await {
        Some(payment) => output.emit(&payment, render_row),
        None => Err(CommandError::Store(
            store.state().error.clone().unwrap_or_default(),
        )),
    }
}

/// Record a payment.
pub async fn create(
    amount: Decimal,
    method: String,
    transaction_id: String,
    currency: Option<CurrencyCode>,
    output: Output,
) -> Result<(), CommandError> {
    let ctx = authenticated_context()?;
    let mut payment = NewPayment::new(amount, method, transaction_id);
    payment.currency = currency;

    let mut store = ctx.payments().lock().await;
    match store.create_payment(payment).await {
        Some(created) => output.emit(&created, |p| format!("Created {}", render_row(p))),
        None => Err(CommandError::Store(
            store.state().error.clone().unwrap_or_default(),
        )),
    }
}

fn render_row(payment: &Payment) -> String {
    let price = Price {
        amount: payment.amount,
        currency_code: payment.currency.unwrap_or_default(),
    };
    format!(
        "{:<26} {:>14}  {:<10} {:<10} {}",
        payment.id.as_ref().map_or("-", PaymentId::as_str),
        price.display(),
        payment.payment_method,
        payment.payment_status.to_string(),
        payment.transaction_id,
    )
}
