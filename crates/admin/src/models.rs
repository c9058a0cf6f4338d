//! Admin dashboard entities.
//!
//! Read-only; the dashboard never mutates them.

use bazaar_core::{CustomerId, OrderId, OrderStatus, ProductId};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

/// A customer order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub customer: String,
    pub email: String,
    pub date: NaiveDate,
    pub total: Decimal,
    pub status: OrderStatus,
    pub items: u32,
}

/// A catalogue product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub category: String,
    pub price: Decimal,
    pub stock: u32,
    /// Units sold to date.
    pub sold: u32,
}

impl Product {
    #[must_use]
    pub const fn is_out_of_stock(&self) -> bool {
        self.stock == 0
    }
}

/// A registered customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub orders: u32,
    pub total_spent: Decimal,
    pub joined: NaiveDate,
}

/// Revenue and order count for one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlySales {
    pub month: String,
    pub revenue: Decimal,
    pub orders: u32,
}

/// Share of sales for one category, in percent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySales {
    pub category: String,
    pub share: u32,
}

/// Registered users at the end of one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserGrowth {
    pub month: String,
    pub users: u32,
}
