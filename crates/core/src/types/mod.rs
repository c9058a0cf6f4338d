//! Core types for Bazaar.
//!
//! This module provides type-safe wrappers for the domain concepts exchanged
//! with the backend.

pub mod id;
pub mod payment;
pub mod price;
pub mod profile;
pub mod status;

pub use id::*;
pub use payment::{NewPayment, Payment};
pub use price::{CurrencyCode, CurrencyError, Price};
pub use profile::{Address, ProfileUpdate, UserProfile};
pub use status::*;
