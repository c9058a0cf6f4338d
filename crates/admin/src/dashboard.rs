//! Read-only dashboard views over the admin dataset.

use bazaar_core::{CurrencyCode, OrderStatus, Price};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use crate::mock;
use crate::models::{CategorySales, Customer, MonthlySales, Order, Product, UserGrowth};

/// Products at or below this stock level count as low.
pub const DEFAULT_LOW_STOCK_THRESHOLD: u32 = 10;

/// Headline metrics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    /// Sum of all orders except cancelled ones.
    pub revenue: Decimal,
    pub orders: usize,
    pub customers: usize,
    pub products: usize,
    pub pending_orders: usize,
}

/// Year-level sales figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SalesOverview<'a> {
    pub total_revenue: Decimal,
    pub total_orders: u32,
    pub best_month: Option<&'a MonthlySales>,
    pub monthly: &'a [MonthlySales],
    pub categories: &'a [CategorySales],
    pub user_growth: &'a [UserGrowth],
}

/// Dashboard over borrowed collections.
#[derive(Debug, Clone, Copy)]
pub struct Dashboard<'a> {
    orders: &'a [Order],
    products: &'a [Product],
    customers: &'a [Customer],
    monthly: &'a [MonthlySales],
    categories: &'a [CategorySales],
    growth: &'a [UserGrowth],
}

impl Dashboard<'static> {
    /// Dashboard over the built-in fixture.
    #[must_use]
    pub fn mock() -> Self {
        Self {
            orders: mock::orders(),
            products: mock::products(),
            customers: mock::customers(),
            monthly: mock::monthly_sales(),
            categories: mock::category_sales(),
            growth: mock::user_growth(),
        }
    }
}

impl<'a> Dashboard<'a> {
    /// Dashboard over caller-provided entities, with no time series.
    #[must_use]
    pub const fn new(orders: &'a [Order], products: &'a [Product], customers: &'a [Customer]) -> Self {
        Self {
            orders,
            products,
            customers,
            monthly: &[],
            categories: &[],
            growth: &[],
        }
    }

    #[must_use]
    pub fn summary(&self) -> DashboardSummary {
        let revenue = self
            .orders
            .iter()
            .filter(|o| o.status != OrderStatus::Cancelled)
            .map(|o| o.total)
            .sum();

        DashboardSummary {
            revenue,
            orders: self.orders.len(),
            customers: self.customers.len(),
            products: self.products.len(),
            pending_orders: self
                .orders
                .iter()
                .filter(|o| o.status == OrderStatus::Pending)
                .count(),
        }
    }

    /// Orders with `status`, or every order when `None`.
    pub fn orders(&self, status: Option<OrderStatus>) -> impl Iterator<Item = &'a Order> + use<'a> {
        self.orders
            .iter()
            .filter(move |o| status.is_none_or(|s| o.status == s))
    }

    /// Most recent `limit` orders, newest first.
    #[must_use]
    pub fn recent_orders(&self, limit: usize) -> Vec<&'a Order> {
        let mut recent: Vec<&Order> = self.orders.iter().collect();
        recent.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.id.cmp(&a.id)));
        recent.truncate(limit);
        recent
    }

    /// Customers whose name, email or location contains `query`, ignoring case.
    #[must_use]
    pub fn search_customers(&self, query: &str) -> Vec<&'a Customer> {
        let needle = query.trim().to_lowercase();
        let found: Vec<_> = self
            .customers
            .iter()
            .filter(|c| {
                [&c.name, &c.email, &c.location]
                    .iter()
                    .any(|field| contains_folded(field, &needle))
            })
            .collect();
        debug!(query, matches = found.len(), "Customer search");
        found
    }

    /// Products whose name or category contains `query`, ignoring case.
    #[must_use]
    pub fn search_products(&self, query: &str) -> Vec<&'a Product> {
        let needle = query.trim().to_lowercase();
        self.products
            .iter()
            .filter(|p| contains_folded(&p.name, &needle) || contains_folded(&p.category, &needle))
            .collect()
    }

    /// Products with stock at or below `threshold`, lowest first.
    #[must_use]
    pub fn low_stock(&self, threshold: u32) -> Vec<&'a Product> {
        let mut low: Vec<&Product> = self
            .products
            .iter()
            .filter(|p| p.stock <= threshold)
            .collect();
        low.sort_by(|a, b| a.stock.cmp(&b.stock).then_with(|| a.name.cmp(&b.name)));
        low
    }

    /// Top `limit` products by units sold.
    #[must_use]
    pub fn top_products(&self, limit: usize) -> Vec<&'a Product> {
        let mut top: Vec<&Product> = self.products.iter().collect();
        top.sort_by(|a, b| b.sold.cmp(&a.sold));
        top.truncate(limit);
        top
    }

    #[must_use]
    pub fn sales_overview(&self) -> SalesOverview<'a> {
        SalesOverview {
            total_revenue: self.monthly.iter().map(|m| m.revenue).sum(),
            total_orders: self.monthly.iter().map(|m| m.orders).sum(),
            best_month: self.monthly.iter().max_by_key(|m| m.revenue),
            monthly: self.monthly,
            categories: self.categories,
            user_growth: self.growth,
        }
    }
}

fn contains_folded(haystack: &str, lowered_needle: &str) -> bool {
    haystack.to_lowercase().contains(lowered_needle)
}

/// Format an amount in rupees with thousands grouping, e.g. `₹1,299.00`.
#[must_use]
pub fn format_currency(amount: Decimal) -> String {
    Price {
        amount,
        currency_code: CurrencyCode::INR,
    }
    .display()
}
