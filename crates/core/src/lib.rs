//! Bazaar Core - Shared domain types.
//!
//! This crate provides the types shared across all Bazaar components:
//! - `storefront` - API client, client state stores and the profile editor
//! - `admin` - Mock dashboard dataset and read-only views
//! - `cli` - Command-line front end
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. Every type
//! here mirrors the JSON contract of the backend REST API (camelCase keys,
//! server ids under `_id`).
//!
//! # Modules
//!
//! - [`types`] - Type-safe IDs, profiles, addresses, payments, money and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
