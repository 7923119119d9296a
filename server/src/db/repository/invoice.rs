//! Invoice Repository
//!
//! Mints the sequential invoice number and persists the one immutable
//! billing snapshot an order ever gets. Idempotent by construction: a
//! unique index on `invoice.order_id` turns a concurrent double-create into
//! a refetch of the winner's row.

use rust_decimal::prelude::*;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use surrealdb::RecordId;

use shared::models::{InvoiceLine, InvoicePaymentStatus, OrderContent};
use shared::util::now_millis;

use super::{BaseRepository, CounterRepository, RepoError, RepoResult, parse_id};
use crate::db::models::{Invoice, Order};
use crate::orders::money;

const TABLE: &str = "invoice";
const COUNTER_KEY: &str = "invoice";

#[derive(Clone)]
pub struct InvoiceRepository {
    base: BaseRepository,
    counters: CounterRepository,
}

impl InvoiceRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db.clone()),
            counters: CounterRepository::new(db),
        }
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Invoice>> {
        let record = parse_id(TABLE, id)?;
        let invoice: Option<Invoice> = self.base.db().select(record).await?;
        Ok(invoice)
    }

    pub async fn find_by_order(&self, order: &RecordId) -> RepoResult<Option<Invoice>> {
        let mut result = self
            .base
            .db()
            .query(format!("SELECT * FROM {TABLE} WHERE order_id = $order"))
            // Record links in this schema are stored in string form
            .bind(("order", order.to_string()))
            .await?;
        let invoices: Vec<Invoice> = result.take(0)?;
        Ok(invoices.into_iter().next())
    }

    /// Generate the invoice for a completed order, or return the existing one.
    ///
    /// The counter is consumed before the insert, so a lost race leaves a gap
    /// in the sequence; numbers stay unique and monotonic regardless.
    pub async fn create_for_order(&self, order: &Order) -> RepoResult<Invoice> {
        let order_id = order
            .id
            .clone()
            .ok_or_else(|| RepoError::Validation("Order has no id".to_string()))?;

        if let Some(existing) = self.find_by_order(&order_id).await? {
            return Ok(existing);
        }

        let seq = self.counters.next(COUNTER_KEY).await?;
        let number = format!("INV-{seq:04}");

        let payment_status = if order.advance_payment > 0.0 {
            InvoicePaymentStatus::AdvancePaid
        } else {
            InvoicePaymentStatus::Pending
        };

        let invoice = Invoice {
            id: None,
            number,
            order_id: order_id.clone(),
            tailor: order.tailor.clone(),
            customer_name: order.customer_name.clone(),
            customer_phone: order.customer_phone.clone(),
            customer_email: order.customer_email.clone(),
            lines: build_lines(&order.content, order.price),
            total_amount: order.price,
            advance_amount: order.advance_payment,
            due_amount: money::final_payable(order.price, order.advance_payment, order.discount),
            due_date: order.due_date,
            payment_status,
            note: order.notes.clone(),
            created_at: now_millis(),
        };

        let created: Result<Option<Invoice>, RepoError> = self
            .base
            .db()
            .create(TABLE)
            .content(invoice)
            .await
            .map_err(RepoError::from);

        match created {
            Ok(Some(invoice)) => Ok(invoice),
            Ok(None) => Err(RepoError::Database(
                "Failed to create invoice".to_string(),
            )),
            // Lost a concurrent race on the unique order index; the winner's
            // invoice is the canonical one.
            Err(RepoError::Duplicate(_)) => self
                .find_by_order(&order_id)
                .await?
                .ok_or_else(|| RepoError::Database("Invoice vanished after race".to_string())),
            Err(e) => Err(e),
        }
    }
}

/// Expand the order content into invoice lines.
///
/// Itemized orders distribute the order price across items proportionally to
/// quantity; the last line absorbs any rounding residue so the lines always
/// sum exactly to the total. Legacy orders get a single line.
fn build_lines(content: &OrderContent, price: f64) -> Vec<InvoiceLine> {
    match content {
        OrderContent::Legacy { order_type, .. } => vec![InvoiceLine {
            description: order_type.clone(),
            quantity: 1,
            unit_price: price,
            line_total: price,
            note: None,
        }],
        OrderContent::Itemized { order_items } => {
            let total_qty: i64 = order_items
                .iter()
                .map(|i| i64::from(i.quantity.max(0)))
                .sum();
            if total_qty == 0 {
                return vec![];
            }
            let price_dec = money::to_decimal(price);
            let total_qty_dec = Decimal::from(total_qty);

            let mut lines = Vec::with_capacity(order_items.len());
            let mut allocated = Decimal::ZERO;
            let last = order_items.len() - 1;
            for (i, item) in order_items.iter().enumerate() {
                let qty = Decimal::from(item.quantity.max(0));
                let line_total = if i == last {
                    price_dec - allocated
                } else {
                    (price_dec * qty / total_qty_dec)
                        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
                };
                allocated += line_total;
                let unit_price = if item.quantity > 0 {
                    line_total / Decimal::from(item.quantity)
                } else {
                    Decimal::ZERO
                };
                lines.push(InvoiceLine {
                    description: item.garment_type.clone(),
                    quantity: item.quantity,
                    unit_price: money::to_f64(unit_price),
                    line_total: money::to_f64(line_total),
                    note: item.note.clone(),
                });
            }
            lines
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::OrderItem;
    use std::collections::BTreeMap;

    fn item(garment: &str, qty: i32) -> OrderItem {
        OrderItem {
            garment_type: garment.to_string(),
            quantity: qty,
            measurements: BTreeMap::new(),
            extra_measurements: None,
            note: None,
        }
    }

    #[test]
    fn legacy_content_is_one_line() {
        let content = OrderContent::Legacy {
            order_type: "Wedding Saree".to_string(),
            measurements: BTreeMap::new(),
        };
        let lines = build_lines(&content, 2500.0);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].description, "Wedding Saree");
        assert_eq!(lines[0].line_total, 2500.0);
    }

    #[test]
    fn itemized_lines_sum_to_total() {
        let content = OrderContent::Itemized {
            order_items: vec![item("Blouse", 1), item("Kurta", 2)],
        };
        let lines = build_lines(&content, 100.0);
        assert_eq!(lines.len(), 2);
        let sum: f64 = lines.iter().map(|l| l.line_total).sum();
        assert!(money::money_eq(sum, 100.0));
        // 1 of 3 units at 100 rounds to 33.33, last line absorbs the residue
        assert_eq!(lines[0].line_total, 33.33);
        assert_eq!(lines[1].line_total, 66.67);
    }

    #[test]
    fn rounding_residue_lands_on_last_line() {
        let content = OrderContent::Itemized {
            order_items: vec![item("A", 1), item("B", 1), item("C", 1)],
        };
        let lines = build_lines(&content, 1000.0);
        let sum: f64 = lines.iter().map(|l| l.line_total).sum();
        assert!(money::money_eq(sum, 1000.0));
        assert_eq!(lines[2].line_total, 333.34);
    }
}
