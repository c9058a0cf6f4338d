//! Static fixture backing the admin dashboard.
//!
//! Built once on first access and immutable afterwards.

use std::sync::LazyLock;

use bazaar_core::{CustomerId, OrderId, OrderStatus, ProductId};
use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::models::{CategorySales, Customer, MonthlySales, Order, Product, UserGrowth};

/// Months covered by the time series.
pub const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Invalid fixture dates collapse to `NaiveDate::MIN`; a test guards against it.
fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MIN)
}

/// Amount in paise.
fn inr(paise: i64) -> Decimal {
    Decimal::new(paise, 2)
}

fn order(
    id: &str,
    customer: &str,
    email: &str,
    date: NaiveDate,
    total: Decimal,
    status: OrderStatus,
    items: u32,
) -> Order {
    Order {
        id: OrderId::new(id),
        customer: customer.to_string(),
        email: email.to_string(),
        date,
        total,
        status,
        items,
    }
}

fn product(id: &str, name: &str, category: &str, price: Decimal, stock: u32, sold: u32) -> Product {
    Product {
        id: ProductId::new(id),
        name: name.to_string(),
        category: category.to_string(),
        price,
        stock,
        sold,
    }
}

#[allow(clippy::too_many_arguments)]
fn customer(
    id: &str,
    name: &str,
    email: &str,
    phone: &str,
    location: &str,
    orders: u32,
    total_spent: Decimal,
    joined: NaiveDate,
) -> Customer {
    Customer {
        id: CustomerId::new(id),
        name: name.to_string(),
        email: email.to_string(),
        phone: phone.to_string(),
        location: location.to_string(),
        orders,
        total_spent,
        joined,
    }
}

static ORDERS: LazyLock<Vec<Order>> = LazyLock::new(|| {
    use OrderStatus::{Cancelled, Delivered, Pending, Processing, Shipped};
    vec![
        order("ORD-1001", "Asha Rao", "asha@example.com", date(2024, 6, 2), inr(249_900), Delivered, 3),
        order("ORD-1002", "Vikram Singh", "vikram@example.com", date(2024, 6, 3), inr(89_900), Shipped, 1),
        order("ORD-1003", "Meera Iyer", "meera@example.com", date(2024, 6, 5), inr(1_549_900), Processing, 2),
        order("ORD-1004", "Rahul Mehta", "rahul@example.com", date(2024, 6, 6), inr(45_000), Pending, 1),
        order("ORD-1005", "Priya Nair", "priya@example.com", date(2024, 6, 8), inr(329_800), Delivered, 4),
        order("ORD-1006", "Arjun Das", "arjun@example.com", date(2024, 6, 9), inr(129_900), Cancelled, 1),
        order("ORD-1007", "Asha Rao", "asha@example.com", date(2024, 6, 11), inr(79_900), Pending, 2),
        order("ORD-1008", "Kavya Reddy", "kavya@example.com", date(2024, 6, 12), inr(559_700), Shipped, 3),
        order("ORD-1009", "Sanjay Gupta", "sanjay@example.com", date(2024, 6, 14), inr(219_900), Processing, 1),
        order("ORD-1010", "Neha Joshi", "neha@example.com", date(2024, 6, 15), inr(99_900), Delivered, 2),
    ]
});

static PRODUCTS: LazyLock<Vec<Product>> = LazyLock::new(|| {
    vec![
        product("PRD-001", "Wireless Earbuds", "Electronics", inr(249_900), 45, 320),
        product("PRD-002", "Cotton Kurta", "Clothing", inr(129_900), 8, 210),
        product("PRD-003", "Smart Watch", "Electronics", inr(1_549_900), 12, 95),
        product("PRD-004", "Steel Water Bottle", "Home & Kitchen", inr(45_000), 150, 540),
        product("PRD-005", "Yoga Mat", "Sports", inr(89_900), 0, 180),
        product("PRD-006", "Ceramic Dinner Set", "Home & Kitchen", inr(329_900), 5, 60),
        product("PRD-007", "Running Shoes", "Sports", inr(279_900), 30, 145),
        product("PRD-008", "Silk Saree", "Clothing", inr(559_900), 3, 40),
        product("PRD-009", "Bluetooth Speaker", "Electronics", inr(219_900), 22, 130),
        product("PRD-010", "Notebook Set", "Stationery", inr(19_900), 0, 410),
    ]
});

static CUSTOMERS: LazyLock<Vec<Customer>> = LazyLock::new(|| {
    vec![
        customer("CUS-01", "Asha Rao", "asha@example.com", "+91 98450 11111", "Bengaluru", 12, inr(4_529_900), date(2023, 1, 14)),
        customer("CUS-02", "Vikram Singh", "vikram@example.com", "+91 98110 22222", "Delhi", 4, inr(899_600), date(2023, 3, 2)),
        customer("CUS-03", "Meera Iyer", "meera@example.com", "+91 94440 33333", "Chennai", 7, inr(3_120_000), date(2023, 5, 21)),
        customer("CUS-04", "Rahul Mehta", "rahul@example.com", "+91 98200 44444", "Mumbai", 2, inr(95_000), date(2024, 2, 9)),
        customer("CUS-05", "Priya Nair", "priya@example.com", "+91 94470 55555", "Kochi", 9, inr(2_045_500), date(2023, 8, 30)),
        customer("CUS-06", "Arjun Das", "arjun@example.com", "+91 98300 66666", "Kolkata", 1, inr(129_900), date(2024, 4, 17)),
        customer("CUS-07", "Kavya Reddy", "kavya@example.com", "+91 98490 77777", "Hyderabad", 5, inr(1_676_100), date(2023, 11, 5)),
        customer("CUS-08", "Sanjay Gupta", "sanjay@example.com", "+91 98290 88888", "Jaipur", 3, inr(459_700), date(2024, 1, 23)),
    ]
});

static MONTHLY_SALES: LazyLock<Vec<MonthlySales>> = LazyLock::new(|| {
    let revenue: [i64; 12] = [
        42_000_000, 38_500_000, 45_200_000, 51_000_000, 49_800_000, 56_300_000, 61_200_000,
        58_900_000, 64_500_000, 70_100_000, 82_400_000, 95_600_000,
    ];
    let orders: [u32; 12] = [
        310, 284, 335, 372, 360, 401, 438, 420, 455, 497, 583, 671,
    ];
    MONTHS
        .iter()
        .zip(revenue)
        .zip(orders)
        .map(|((month, paise), orders)| MonthlySales {
            month: (*month).to_string(),
            revenue: inr(paise),
            orders,
        })
        .collect()
});

static CATEGORY_SALES: LazyLock<Vec<CategorySales>> = LazyLock::new(|| {
    [
        ("Electronics", 35),
        ("Clothing", 25),
        ("Home & Kitchen", 20),
        ("Sports", 12),
        ("Stationery", 8),
    ]
    .into_iter()
    .map(|(category, share)| CategorySales {
        category: category.to_string(),
        share,
    })
    .collect()
});

static USER_GROWTH: LazyLock<Vec<UserGrowth>> = LazyLock::new(|| {
    let users: [u32; 12] = [
        1_200, 1_350, 1_520, 1_710, 1_880, 2_100, 2_340, 2_560, 2_810, 3_090, 3_420, 3_800,
    ];
    MONTHS
        .iter()
        .zip(users)
        .map(|(month, users)| UserGrowth {
            month: (*month).to_string(),
            users,
        })
        .collect()
});

/// Orders, oldest first.
#[must_use]
pub fn orders() -> &'static [Order] {
    &ORDERS
}

#[must_use]
pub fn products() -> &'static [Product] {
    &PRODUCTS
}

#[must_use]
pub fn customers() -> &'static [Customer] {
    &CUSTOMERS
}

/// Revenue and orders per month, January first.
#[must_use]
pub fn monthly_sales() -> &'static [MonthlySales] {
    &MONTHLY_SALES
}

/// Category shares; they sum to 100.
#[must_use]
pub fn category_sales() -> &'static [CategorySales] {
    &CATEGORY_SALES
}

/// Registered users per month, January first.
#[must_use]
pub fn user_growth() -> &'static [UserGrowth] {
    &USER_GROWTH
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_fixture_dates_are_valid() {
        assert!(orders().iter().all(|o| o.date != NaiveDate::MIN));
        assert!(customers().iter().all(|c| c.joined != NaiveDate::MIN));
    }

    #[test]
    fn test_ids_are_unique() {
        let orders: HashSet<_> = orders().iter().map(|o| &o.id).collect();
        let products: HashSet<_> = products().iter().map(|p| &p.id).collect();
        let customers: HashSet<_> = customers().iter().map(|c| &c.id).collect();
        assert_eq!(orders.len(), super::orders().len());
        assert_eq!(products.len(), super::products().len());
        assert_eq!(customers.len(), super::customers().len());
    }

    #[test]
    fn test_series_cover_every_month() {
        assert_eq!(monthly_sales().len(), 12);
        assert_eq!(user_growth().len(), 12);
        assert!(user_growth().windows(2).all(|w| w.first().map(|a| a.users) <= w.get(1).map(|b| b.users)));
    }

    #[test]
    fn test_category_shares_sum_to_100() {
        assert_eq!(category_sales().iter().map(|c| c.share).sum::<u32>(), 100);
    }

    #[test]
    fn test_inr_scale() {
        assert_eq!(inr(249_900).to_string(), "2499.00");
        assert_eq!(inr(45_000).to_string(), "450.00");
    }
}
