//! Razorpay order commands.
//!
//! The hosted checkout cannot run in a terminal, so only the order step is
//! exposed here.
//!
//! # Usage
//!
//! ```bash
//! bazaar razorpay order --amount 250
//! ```

use rust_decimal::Decimal;

use super::{CommandError, Output, authenticated_context};

/// Create a Razorpay order for `amount`.
pub async fn order(amount: Decimal, output: Output) -> Result<(), CommandError> {
    let ctx = authenticated_context()?;
    let mut store = ctx.razorpay().lock().await;

    match store.create_order(amount).await {
        Some(order) => output.emit(&order, |o| {
            format!(
                "Order {} for {} {} (minor units), receipt {}",
                o.id,
                o.amount,
                o.currency,
                o.receipt.as_deref().unwrap_or("-")
            )
        }),
        None => Err(CommandError::Store(
            store.state().rzp_error.clone().unwrap_or_default(),
        )),
    }
}
