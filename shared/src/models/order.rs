//! Order domain types and API payloads
//!
//! Status and payment vocabularies, the dual legacy/itemized order content
//! shape, and the request payloads accepted by the order API.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

// =============================================================================
// Status vocabularies
// =============================================================================

/// Order lifecycle status.
///
/// The wire format is the human-readable vocabulary used by the storefront
/// ("Order Created", "Cutting Completed", ...). The older vocabulary
/// ("Pending", "In Progress", ...) is accepted on input via serde aliases
/// and normalized here; it never appears internally.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    #[serde(rename = "Order Created", alias = "Pending")]
    Created,
    #[serde(rename = "Cutting Completed", alias = "In Progress")]
    CuttingCompleted,
    #[serde(rename = "Order Completed", alias = "Completed")]
    Completed,
    #[serde(rename = "Payment Completed")]
    PaymentCompleted,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Terminal states accept no further lifecycle transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Work in progress: created through completed, not yet paid.
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            OrderStatus::Created | OrderStatus::CuttingCompleted | OrderStatus::Completed
        )
    }

    /// Paid and/or handed over; counts toward revenue.
    pub fn is_settled(&self) -> bool {
        matches!(self, OrderStatus::PaymentCompleted | OrderStatus::Delivered)
    }

    /// Canonical wire string.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Created => "Order Created",
            OrderStatus::CuttingCompleted => "Cutting Completed",
            OrderStatus::Completed => "Order Completed",
            OrderStatus::PaymentCompleted => "Payment Completed",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payment settlement status of an order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Unpaid,
    Partial,
    Paid,
    Scheduled,
}

/// How the customer settles the final payable at the payment step.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PaymentMode {
    #[serde(rename = "Pay Now")]
    PayNow,
    #[serde(rename = "Pay Later")]
    PayLater,
    Partial,
}

// =============================================================================
// Order content (dual shape)
// =============================================================================

/// One garment line on an itemized order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderItem {
    pub garment_type: String,
    pub quantity: i32,
    #[serde(default)]
    pub measurements: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra_measurements: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Order content, normalized once at the repository boundary.
///
/// Older orders carry a single garment type plus one measurements map; newer
/// orders carry a list of items. Business logic matches on this union instead
/// of sniffing field presence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum OrderContent {
    Itemized {
        order_items: Vec<OrderItem>,
    },
    Legacy {
        order_type: String,
        #[serde(default)]
        measurements: BTreeMap<String, String>,
    },
}

impl OrderContent {
    /// Short description of what is being stitched, for lists and messages.
    pub fn summary(&self) -> String {
        match self {
            OrderContent::Itemized { order_items } => order_items
                .iter()
                .map(|i| format!("{} x{}", i.garment_type, i.quantity))
                .collect::<Vec<_>>()
                .join(", "),
            OrderContent::Legacy { order_type, .. } => order_type.clone(),
        }
    }
}

// =============================================================================
// Payments
// =============================================================================

/// One recorded payment event against an order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentRecord {
    pub amount: f64,
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Millisecond timestamp of the payment event.
    pub time: i64,
}

// =============================================================================
// API payloads
// =============================================================================

/// Create-order request body.
///
/// Content may arrive in either shape: `order_items`, or the legacy
/// `order_type` + `measurements` pair. Exactly one must be present.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OrderCreate {
    /// Registered customer account, when the job is linked to one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub customer_name: String,
    #[validate(length(min = 1, max = 100))]
    pub customer_phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(email)]
    pub customer_email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_items: Option<Vec<OrderItem>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measurements: Option<BTreeMap<String, String>>,

    pub price: f64,
    #[serde(default)]
    pub advance_payment: f64,
    pub due_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

/// Status-transition request body.
///
/// Payment fields are only consulted for the transition into
/// "Payment Completed"; `confirm` is only consulted for cancellation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderStatusUpdate {
    pub status: OrderStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_mode: Option<PaymentMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pay_now_amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pay_later_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub confirm: bool,
}

/// Wholesale replacement of an order's measurements/content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeasurementsUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_items: Option<Vec<OrderItem>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measurements: Option<BTreeMap<String, String>>,
}

/// Notes edit: replace by default, append when requested.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NotesUpdate {
    #[validate(length(max = 500))]
    pub notes: String,
    #[serde(default)]
    pub append: bool,
}

/// Post-delivery payment collection request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PaymentCollect {
    pub amount: f64,
    #[validate(length(min = 1, max = 100))]
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 500))]
    pub note: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_canonical_vocabulary() {
        let s: OrderStatus = serde_json::from_str("\"Order Created\"").unwrap();
        assert_eq!(s, OrderStatus::Created);
        assert_eq!(serde_json::to_string(&s).unwrap(), "\"Order Created\"");
    }

    #[test]
    fn status_accepts_legacy_vocabulary() {
        let s: OrderStatus = serde_json::from_str("\"Pending\"").unwrap();
        assert_eq!(s, OrderStatus::Created);
        let s: OrderStatus = serde_json::from_str("\"In Progress\"").unwrap();
        assert_eq!(s, OrderStatus::CuttingCompleted);
        let s: OrderStatus = serde_json::from_str("\"Completed\"").unwrap();
        assert_eq!(s, OrderStatus::Completed);
    }

    #[test]
    fn content_deserializes_both_shapes() {
        let itemized: OrderContent = serde_json::from_str(
            r#"{"order_items":[{"garment_type":"Kurta","quantity":2,"measurements":{"chest":"40"}}]}"#,
        )
        .unwrap();
        assert!(matches!(itemized, OrderContent::Itemized { .. }));
        assert_eq!(itemized.summary(), "Kurta x2");

        let legacy: OrderContent = serde_json::from_str(
            r#"{"order_type":"Blouse","measurements":{"waist":"30"}}"#,
        )
        .unwrap();
        assert!(matches!(legacy, OrderContent::Legacy { .. }));
        assert_eq!(legacy.summary(), "Blouse");
    }

    #[test]
    fn payment_mode_wire_names() {
        let m: PaymentMode = serde_json::from_str("\"Pay Now\"").unwrap();
        assert_eq!(m, PaymentMode::PayNow);
        let m: PaymentMode = serde_json::from_str("\"Partial\"").unwrap();
        assert_eq!(m, PaymentMode::Partial);
    }
}
