//! Small time and formatting utilities.

use chrono::{NaiveDate, Utc};

/// Current UTC timestamp in milliseconds.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Current UTC calendar date.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Format a millisecond timestamp as `YYYY-MM-DD` (UTC).
pub fn format_date_millis(millis: i64) -> String {
    chrono::DateTime::from_timestamp_millis(millis)
        .map(|dt| dt.date_naive().format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Format an amount as a customer-facing money string (2 decimal places).
pub fn format_money(amount: f64) -> String {
    format!("Rs. {amount:.2}")
}
