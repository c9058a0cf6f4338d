//! Bazaar admin dashboard data.
//!
//! The dashboard runs on a static fixture ([`mock`]) rather than a backend;
//! [`dashboard::Dashboard`] derives the read-only views shown to operators.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod dashboard;
pub mod mock;
pub mod models;

pub use dashboard::{Dashboard, DashboardSummary, SalesOverview, format_currency};
pub use models::{CategorySales, Customer, MonthlySales, Order, Product, UserGrowth};
