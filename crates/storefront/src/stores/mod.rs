//! Client state stores.
//!
//! Each store owns its state and mutates it only from its own action
//! methods. Actions set a loading flag, clear the previous error, await one
//! backend call, and fold the outcome into state; callers read the result back
//! through `state()`.
//!
//! - [`payment`] - payment records (create, list mine, fetch by id)
//! - [`auth`] - bearer token and the authoritative profile copy
//! - [`razorpay`] - order creation, checkout widget and verification

pub mod auth;
pub mod payment;
pub mod razorpay;

pub use auth::{AuthState, AuthStore};
pub use payment::{PaymentState, PaymentStore, upsert_payment};
pub use razorpay::{
    CheckoutError, CheckoutOptions, CheckoutWidget, PayOutcome, Prefill, RazorpayState,
    RazorpayStore, Theme, UnavailableWidget,
};
