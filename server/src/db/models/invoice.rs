//! Invoice entity
//!
//! Immutable billing snapshot, created at most once per order. Later changes
//! to the order (post-delivery payments) never amend the invoice.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use shared::models::{InvoiceLine, InvoicePaymentStatus};

use super::serde_helpers;

/// Invoice entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    /// Sequential human-readable number, e.g. `INV-0042`
    pub number: String,
    /// Billed order (`order_id` because `order` is a SurrealQL keyword)
    #[serde(with = "serde_helpers::record_id")]
    pub order_id: RecordId,
    #[serde(with = "serde_helpers::record_id")]
    pub tailor: RecordId,

    pub customer_name: String,
    pub customer_phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,

    pub lines: Vec<InvoiceLine>,
    pub total_amount: f64,
    pub advance_amount: f64,
    pub due_amount: f64,
    pub due_date: NaiveDate,
    pub payment_status: InvoicePaymentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub created_at: i64,
}

/// Keyed monotonic sequence used to mint invoice numbers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Counter {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub value: i64,
}
