//! Admin dashboard commands.
//!
//! These read the built-in fixture and need no backend.
//!
//! # Usage
//!
//! ```bash
//! bazaar admin summary
//! bazaar admin orders --status pending
//! bazaar admin customers --search asha
//! bazaar admin low-stock --threshold 5
//! bazaar admin sales
//! ```

use std::fmt::Write as _;

use bazaar_admin::{Customer, Dashboard, Order, Product, format_currency};
use bazaar_core::OrderStatus;

use super::{CommandError, Output};

const RECENT_ORDERS: usize = 5;

/// Headline metrics plus the most recent orders.
pub fn summary(output: Output) -> Result<(), CommandError> {
    let dashboard = Dashboard::mock();
    let summary = dashboard.summary();

    output.emit(&summary, |s| {
        let mut out = format!(
            "Revenue:        {}\nOrders:         {} ({} pending)\nCustomers:      {}\nProducts:       {}\n\nRecent orders\n",
            format_currency(s.revenue),
            s.orders,
            s.pending_orders,
            s.customers,
            s.products,
        );
        for order in dashboard.recent_orders(RECENT_ORDERS) {
            let _ = writeln!(out, "  {}", order_row(order));
        }
        out.trim_end().to_string()
    })
}

/// Orders, optionally filtered by status.
pub fn orders(status: Option<OrderStatus>, output: Output) -> Result<(), CommandError> {
    let orders: Vec<&Order> = Dashboard::mock().orders(status).collect();
    output.emit(&orders, |orders| lines(orders, |o| order_row(o)))
}

/// Customers, optionally filtered by a search term.
pub fn customers(search: Option<&str>, output: Output) -> Result<(), CommandError> {
    let customers = Dashboard::mock().search_customers(search.unwrap_or_default());
    output.emit(&customers, |customers| lines(customers, |c| customer_row(c)))
}

/// Products at or below `threshold` units of stock.
pub fn low_stock(threshold: u32, output: Output) -> Result<(), CommandError> {
    let products = Dashboard::mock().low_stock(threshold);
    output.emit(&products, |products| lines(products, |p| product_row(p)))
}

/// Monthly revenue, category split and user growth.
pub fn sales(output: Output) -> Result<(), CommandError> {
    let overview = Dashboard::mock().sales_overview();

    output.emit(&overview, |o| {
        let mut out = format!(
            "Total revenue: {} across {} orders\n",
            format_currency(o.total_revenue),
            o.total_orders
        );
        if let Some(best) = o.best_month {
            let _ = writeln!(out, "Best month:    {} ({})", best.month, format_currency(best.revenue));
        }

        out.push_str("\nMonth  Revenue          Orders  Users\n");
        for (sales, growth) in o.monthly.iter().zip(o.user_growth) {
            let _ = writeln!(
                out,
                "{:<6} {:>15}  {:>6}  {:>5}",
                sales.month,
                format_currency(sales.revenue),
                sales.orders,
                growth.users
            );
        }

        out.push_str("\nCategory         Share\n");
        for category in o.categories {
            let _ = writeln!(out, "{:<16} {:>4}%", category.category, category.share);
        }
        out.trim_end().to_string()
    })
}

fn lines<T>(items: &[T], row: impl Fn(&T) -> String) -> String {
    if items.is_empty() {
        return "No results".to_string();
    }
    items.iter().map(row).collect::<Vec<_>>().join("\n")
}

fn order_row(order: &Order) -> String {
    format!(
        "{:<9} {}  {:<14} {:>13}  {:<10} {} item(s)",
        order.id.as_str(),
        order.date,
        order.customer,
        format_currency(order.total),
        order.status.to_string(),
        order.items
    )
}

fn customer_row(customer: &Customer) -> String {
    format!(
        "{:<7} {:<14} {:<22} {:<10} {:>3} orders {:>14}",
        customer.id.as_str(),
        customer.name,
        customer.email,
        customer.location,
        customer.orders,
        format_currency(customer.total_spent)
    )
}

fn product_row(product: &Product) -> String {
    let stock = if product.is_out_of_stock() {
        "out of stock".to_string()
    } else {
        format!("{} left", product.stock)
    };
    format!(
        "{:<8} {:<20} {:<15} {:>12}  {}",
        product.id.as_str(),
        product.name,
        product.category,
        format_currency(product.price),
        stock
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_row_marks_out_of_stock() {
        let dashboard = Dashboard::mock();
        let low = dashboard.low_stock(0);
        assert!(low.iter().all(|p| product_row(p).ends_with("out of stock")));
    }

    #[test]
    fn test_lines_reports_empty() {
        assert_eq!(lines::<Product>(&[], product_row), "No results");
    }
}
