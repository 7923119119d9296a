//! Invoice line types

use serde::{Deserialize, Serialize};

/// Billing status printed on an invoice. An invoice is a snapshot: this is
/// fixed at creation time and never updated afterwards.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum InvoicePaymentStatus {
    #[serde(rename = "Advance Paid")]
    AdvancePaid,
    Pending,
}

/// One billed line on an invoice.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InvoiceLine {
    pub description: String,
    pub quantity: i32,
    pub unit_price: f64,
    pub line_total: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}
