//! Order entity
//!
//! One record per tailoring job, tracked from creation through cutting,
//! completion, payment and delivery. Monetary fields are stored as `f64`;
//! all arithmetic on them goes through `orders::money` (rust_decimal).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use shared::models::{OrderContent, OrderStatus, PaymentRecord, PaymentStatus};

use super::serde_helpers;

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    /// Owning shop
    #[serde(with = "serde_helpers::record_id")]
    pub tailor: RecordId,

    /// Registered customer account, when linked (opaque external id)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    pub customer_name: String,
    pub customer_phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,

    /// Legacy single-garment or itemized content, normalized at creation
    #[serde(flatten)]
    pub content: OrderContent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    // ========== Commercial fields ==========
    /// Gross amount, fixed at creation
    pub price: f64,
    /// Paid at creation time
    pub advance_payment: f64,
    /// Applied at the payment step
    pub discount: f64,
    /// Outstanding balance
    pub remaining_amount: f64,
    pub payment_status: PaymentStatus,
    /// Every recorded payment event, in order
    #[serde(default)]
    pub payments: Vec<PaymentRecord>,

    // ========== Lifecycle fields ==========
    pub status: OrderStatus,
    pub due_date: NaiveDate,
    #[serde(default)]
    pub pay_later_enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pay_later_date: Option<NaiveDate>,
    #[serde(default)]
    pub pay_later_amount: f64,

    pub created_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cutting_completed_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_completed_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivered_at: Option<i64>,

    /// Set once, when the invoice snapshot is generated
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub invoice_id: Option<RecordId>,
}

impl Order {
    /// Sum of all recorded payment events.
    pub fn paid_total(&self) -> f64 {
        crate::orders::money::sum_payments(&self.payments)
    }

    /// `"table:id"` form of the record id, empty string when unsaved.
    pub fn id_string(&self) -> String {
        self.id.as_ref().map(|id| id.to_string()).unwrap_or_default()
    }
}
