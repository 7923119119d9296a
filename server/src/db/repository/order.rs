//! Order Repository
//!
//! Creation (with content normalization), queries by tailor, patch
//! application for lifecycle transitions, and the dashboard/customer
//! aggregations.

use serde::Deserialize;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use surrealdb::RecordId;

use shared::models::{
    CustomerSummary, MeasurementsUpdate, OrderContent, OrderCreate, OrderItem, OrderStatus,
    PaymentStatus,
};
use shared::util::now_millis;

use super::{BaseRepository, RepoError, RepoResult, parse_id};
use crate::db::models::Order;
use crate::orders::money;
use crate::orders::lifecycle::OrderPatch;
use crate::utils::FieldErrors;

// `order` is a SurrealQL keyword; the table is `orders`.
const TABLE: &str = "orders";

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Create a new order for a tailor.
    ///
    /// Validates the required fields and normalizes the content shape;
    /// every failure is reported per field.
    pub async fn create(&self, tailor: RecordId, data: OrderCreate) -> RepoResult<Order> {
        let mut errors = FieldErrors::new();

        if data.customer_name.trim().is_empty() {
            errors.insert(
                "customer_name".to_string(),
                "customer_name must not be empty".to_string(),
            );
        }
        if data.customer_phone.trim().is_empty() {
            errors.insert(
                "customer_phone".to_string(),
                "customer_phone must not be empty".to_string(),
            );
        }
        money::check_amount(&mut errors, "price", data.price);
        if !errors.contains_key("price") && data.price <= 0.0 {
            errors.insert(
                "price".to_string(),
                "price must be greater than zero".to_string(),
            );
        }
        money::check_amount(&mut errors, "advance_payment", data.advance_payment);
        if !errors.contains_key("advance_payment") && data.advance_payment > data.price {
            errors.insert(
                "advance_payment".to_string(),
                "advance_payment must not exceed the order price".to_string(),
            );
        }

        let content = match normalize_content(data.order_items, data.order_type, data.measurements)
        {
            Ok(content) => content,
            Err((field, msg)) => {
                errors.insert(field, msg);
                return Err(RepoError::FieldValidation(errors));
            }
        };
        if !errors.is_empty() {
            return Err(RepoError::FieldValidation(errors));
        }

        let remaining =
            money::remaining_amount(data.price, data.advance_payment, 0.0, 0.0);
        // An advance covering the full price settles the order up front
        let payment_status = if money::is_zero(remaining) {
            PaymentStatus::Paid
        } else {
            PaymentStatus::Unpaid
        };
        let order = Order {
            id: None,
            tailor,
            customer_id: data.customer_id,
            customer_name: data.customer_name,
            customer_phone: data.customer_phone,
            customer_email: data.customer_email,
            content,
            notes: data.notes,
            price: data.price,
            advance_payment: data.advance_payment,
            discount: 0.0,
            remaining_amount: remaining,
            payment_status,
            payments: vec![],
            status: OrderStatus::Created,
            due_date: data.due_date,
            pay_later_enabled: false,
            pay_later_date: None,
            pay_later_amount: 0.0,
            created_at: now_millis(),
            cutting_completed_at: None,
            completed_at: None,
            payment_completed_at: None,
            delivered_at: None,
            invoice_id: None,
        };

        let created: Option<Order> = self.base.db().create(TABLE).content(order).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create order".to_string()))
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Order>> {
        let record = parse_id(TABLE, id)?;
        let order: Option<Order> = self.base.db().select(record).await?;
        Ok(order)
    }

    /// Orders for a tailor, newest first, optionally filtered by status.
    /// Returns the page plus the total count for the filter.
    pub async fn list_by_tailor(
        &self,
        tailor: RecordId,
        status: Option<OrderStatus>,
        page: i64,
        page_size: i64,
    ) -> RepoResult<(Vec<Order>, i64)> {
        let page = page.max(1);
        let page_size = page_size.clamp(1, 200);
        let start = (page - 1) * page_size;

        let filter = match status {
            Some(_) => "WHERE tailor = $tailor AND status = $status",
            None => "WHERE tailor = $tailor",
        };

        let list_sql = format!(
            "SELECT * FROM {TABLE} {filter} ORDER BY created_at DESC LIMIT $limit START $start"
        );
        let count_sql = format!("SELECT count() AS total FROM {TABLE} {filter} GROUP ALL");

        let mut query = self
            .base
            .db()
            .query(list_sql)
            .query(count_sql)
            .bind(("tailor", tailor.to_string()))
            .bind(("limit", page_size))
            .bind(("start", start));
        if let Some(status) = status {
            query = query.bind(("status", status));
        }
        let mut result = query.await?;

        let orders: Vec<Order> = result.take(0)?;

        #[derive(Deserialize)]
        struct CountRow {
            total: i64,
        }
        let counts: Vec<CountRow> = result.take(1)?;
        let total = counts.first().map(|c| c.total).unwrap_or(0);

        Ok((orders, total))
    }

    /// Apply a lifecycle transition patch as one single-document merge.
    pub async fn apply_patch(&self, id: &str, patch: &OrderPatch) -> RepoResult<Order> {
        let record = parse_id(TABLE, id)?;
        let mut result = self
            .base
            .db()
            .query("UPDATE $thing MERGE $patch RETURN AFTER")
            .bind(("thing", record))
            .bind(("patch", patch.clone()))
            .await?;
        let orders: Vec<Order> = result.take(0)?;
        orders
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Order {id} not found")))
    }

    /// Replace the order's content wholesale. Fields of the other content
    /// shape are unset so the stored document stays unambiguous.
    pub async fn update_content(&self, id: &str, data: MeasurementsUpdate) -> RepoResult<Order> {
        let record = parse_id(TABLE, id)?;
        let content = normalize_content(data.order_items, data.order_type, data.measurements)
            .map_err(|(field, msg)| {
                let mut errors = FieldErrors::new();
                errors.insert(field, msg);
                RepoError::FieldValidation(errors)
            })?;

        let mut result = match content {
            OrderContent::Itemized { order_items } => {
                self.base
                    .db()
                    .query(
                        "UPDATE $thing SET order_items = $order_items, order_type = NONE, \
                         measurements = NONE RETURN AFTER",
                    )
                    .bind(("thing", record))
                    .bind(("order_items", order_items))
                    .await?
            }
            OrderContent::Legacy {
                order_type,
                measurements,
            } => {
                self.base
                    .db()
                    .query(
                        "UPDATE $thing SET order_type = $order_type, \
                         measurements = $measurements, order_items = NONE RETURN AFTER",
                    )
                    .bind(("thing", record))
                    .bind(("order_type", order_type))
                    .bind(("measurements", measurements))
                    .await?
            }
        };
        let orders: Vec<Order> = result.take(0)?;
        orders
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Order {id} not found")))
    }

    /// Replace or append the free-text notes.
    pub async fn update_notes(&self, id: &str, notes: &str, append: bool) -> RepoResult<Order> {
        let record = parse_id(TABLE, id)?;
        let new_notes = if append {
            let existing: Option<Order> = self.base.db().select(record.clone()).await?;
            let existing =
                existing.ok_or_else(|| RepoError::NotFound(format!("Order {id} not found")))?;
            match existing.notes {
                Some(old) if !old.is_empty() => format!("{old}\n{notes}"),
                _ => notes.to_string(),
            }
        } else {
            notes.to_string()
        };

        let mut result = self
            .base
            .db()
            .query("UPDATE $thing SET notes = $notes RETURN AFTER")
            .bind(("thing", record))
            .bind(("notes", new_notes))
            .await?;
        let orders: Vec<Order> = result.take(0)?;
        orders
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Order {id} not found")))
    }

    /// Hard delete (no soft-delete in this domain).
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let record = parse_id(TABLE, id)?;
        let deleted: Option<Order> = self.base.db().delete(record).await?;
        Ok(deleted.is_some())
    }

    /// Link the generated invoice to the order. Runs only after the invoice
    /// row has been persisted.
    pub async fn link_invoice(&self, id: &RecordId, invoice: &RecordId) -> RepoResult<()> {
        self.base
            .db()
            .query("UPDATE $thing SET invoice_id = $invoice")
            .bind(("thing", id.clone()))
            .bind(("invoice", invoice.to_string()))
            .await?;
        Ok(())
    }

    /// Order counts by status bucket plus settled revenue for one tailor.
    pub async fn dashboard_counts(&self, tailor: RecordId) -> RepoResult<(i64, i64, i64, f64)> {
        #[derive(Deserialize)]
        struct StatusCount {
            status: OrderStatus,
            count: i64,
        }
        #[derive(Deserialize)]
        struct RevenueRow {
            revenue: Option<f64>,
        }

        let mut result = self
            .base
            .db()
            .query(format!(
                "SELECT status, count() AS count FROM {TABLE} WHERE tailor = $tailor GROUP BY status"
            ))
            .query(format!(
                "SELECT math::sum(price) AS revenue FROM {TABLE} \
                 WHERE tailor = $tailor AND status IN ['Payment Completed', 'Delivered'] GROUP ALL"
            ))
            .bind(("tailor", tailor.to_string()))
            .await?;

        let counts: Vec<StatusCount> = result.take(0)?;
        let revenue: Vec<RevenueRow> = result.take(1)?;

        let mut total = 0;
        let mut active = 0;
        let mut completed = 0;
        for row in counts {
            total += row.count;
            if row.status.is_active() {
                active += row.count;
            } else if row.status.is_settled() {
                completed += row.count;
            }
        }
        let revenue = revenue
            .into_iter()
            .next()
            .and_then(|r| r.revenue)
            .unwrap_or(0.0);

        Ok((total, active, completed, revenue))
    }

    /// Roll orders up into per-customer summaries, grouped by the
    /// (name, email, phone) triple and sorted by most recent order.
    pub async fn customers_for_tailor(&self, tailor: RecordId) -> RepoResult<Vec<CustomerSummary>> {
        #[derive(Deserialize)]
        struct Row {
            customer_name: String,
            customer_email: Option<String>,
            customer_phone: Option<String>,
            orders: i64,
            total_spent: Option<f64>,
            first_visit: Option<i64>,
            last_visit: Option<i64>,
        }

        let mut result = self
            .base
            .db()
            .query(format!(
                "SELECT customer_name, customer_email, customer_phone, \
                 count() AS orders, math::sum(price) AS total_spent, \
                 math::min(created_at) AS first_visit, math::max(created_at) AS last_visit \
                 FROM {TABLE} WHERE tailor = $tailor \
                 GROUP BY customer_name, customer_email, customer_phone"
            ))
            .bind(("tailor", tailor.to_string()))
            .await?;

        let rows: Vec<Row> = result.take(0)?;
        let mut customers: Vec<CustomerSummary> = rows
            .into_iter()
            .map(|r| CustomerSummary {
                name: r.customer_name,
                email: r.customer_email,
                phone: r.customer_phone,
                orders: r.orders,
                total_spent: r.total_spent.unwrap_or(0.0),
                first_visit: r.first_visit.unwrap_or(0),
                last_visit: r.last_visit.unwrap_or(0),
            })
            .collect();
        customers.sort_by(|a, b| b.last_visit.cmp(&a.last_visit));
        Ok(customers)
    }
}

/// Normalize the dual content shape into the tagged union. Itemized content
/// wins when both shapes are present; absence of both is a field error.
fn normalize_content(
    order_items: Option<Vec<OrderItem>>,
    order_type: Option<String>,
    measurements: Option<std::collections::BTreeMap<String, String>>,
) -> Result<OrderContent, (String, String)> {
    if let Some(items) = order_items {
        if items.is_empty() {
            return Err((
                "order_items".to_string(),
                "order_items must not be empty".to_string(),
            ));
        }
        for (i, item) in items.iter().enumerate() {
            if item.garment_type.trim().is_empty() {
                return Err((
                    format!("order_items[{i}].garment_type"),
                    "garment_type must not be empty".to_string(),
                ));
            }
            if item.quantity <= 0 {
                return Err((
                    format!("order_items[{i}].quantity"),
                    "quantity must be positive".to_string(),
                ));
            }
        }
        return Ok(OrderContent::Itemized { order_items: items });
    }
    match order_type {
        Some(order_type) if !order_type.trim().is_empty() => Ok(OrderContent::Legacy {
            order_type,
            measurements: measurements.unwrap_or_default(),
        }),
        _ => Err((
            "order_type".to_string(),
            "either order_items or order_type is required".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_prefers_itemized() {
        let content = normalize_content(
            Some(vec![OrderItem {
                garment_type: "Saree Blouse".to_string(),
                quantity: 1,
                measurements: Default::default(),
                extra_measurements: None,
                note: None,
            }]),
            Some("ignored".to_string()),
            None,
        )
        .unwrap();
        assert!(matches!(content, OrderContent::Itemized { .. }));
    }

    #[test]
    fn normalize_rejects_missing_content() {
        let err = normalize_content(None, None, None).unwrap_err();
        assert_eq!(err.0, "order_type");
    }

    #[test]
    fn normalize_rejects_bad_item() {
        let err = normalize_content(
            Some(vec![OrderItem {
                garment_type: "Kurta".to_string(),
                quantity: 0,
                measurements: Default::default(),
                extra_measurements: None,
                note: None,
            }]),
            None,
            None,
        )
        .unwrap_err();
        assert_eq!(err.0, "order_items[0].quantity");
    }
}
