//! HTTP middleware for the dev proxy.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers
//! 2. `TraceLayer`
//! 3. Request ID

pub mod request_id;

pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
