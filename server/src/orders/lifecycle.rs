//! Order status / payment state machine
//!
//! The lifecycle is an explicit transition function over enumerated states,
//! independent of persistence: `transition` inspects an [`Order`] and an
//! [`OrderEvent`] and produces an [`OrderPatch`] that the repository applies
//! as one single-document merge. Either every derived field in the patch is
//! persisted or none are.
//!
//! Nominal forward path:
//!
//! ```text
//! Order Created → Cutting Completed → Order Completed → Payment Completed → Delivered
//! ```
//!
//! `Cancelled` is terminal and reachable from the two pre-completion states
//! with explicit confirmation. Post-delivery payment collection is a separate
//! event ([`record_payment`]) that stays available while a balance remains.

use chrono::NaiveDate;
use serde::Serialize;

use shared::models::{
    OrderStatus, OrderStatusUpdate, PaymentMode, PaymentRecord, PaymentStatus,
};

use crate::db::models::Order;
use crate::orders::money;
use crate::utils::FieldErrors;

/// Payment fields accepted at the "Payment Completed" transition.
#[derive(Debug, Clone)]
pub struct PaymentTerms {
    pub mode: PaymentMode,
    pub pay_now_amount: Option<f64>,
    pub pay_later_date: Option<NaiveDate>,
    pub discount: Option<f64>,
    pub method: Option<String>,
}

/// Lifecycle events, derived from status-transition requests.
#[derive(Debug, Clone)]
pub enum OrderEvent {
    CuttingDone,
    Complete,
    CollectPayment(PaymentTerms),
    Deliver,
    Cancel { confirmed: bool },
}

impl OrderEvent {
    /// Status this event drives toward, for error reporting.
    fn target(&self) -> OrderStatus {
        match self {
            OrderEvent::CuttingDone => OrderStatus::CuttingCompleted,
            OrderEvent::Complete => OrderStatus::Completed,
            OrderEvent::CollectPayment(_) => OrderStatus::PaymentCompleted,
            OrderEvent::Deliver => OrderStatus::Delivered,
            OrderEvent::Cancel { .. } => OrderStatus::Cancelled,
        }
    }
}

/// Transition failure.
#[derive(Debug, thiserror::Error)]
pub enum TransitionError {
    /// Per-field validation failures, so the form can highlight inputs
    #[error("validation failed")]
    Fields(FieldErrors),

    #[error("cannot move an order from '{from}' to '{to}'")]
    IllegalTransition { from: OrderStatus, to: OrderStatus },

    #[error("{0}")]
    NotEligible(String),
}

fn field_error(name: &str, msg: impl Into<String>) -> TransitionError {
    let mut errors = FieldErrors::new();
    errors.insert(name.to_string(), msg.into());
    TransitionError::Fields(errors)
}

/// Consistent set of derived-field updates produced by one transition.
///
/// Serialized with `None` fields skipped, so the repository can apply it as a
/// single `UPDATE ... MERGE` statement. `payments` carries the full new
/// array; concurrent conflicting transitions on the same order resolve
/// last-write-wins.
#[derive(Debug, Clone, Default, Serialize)]
pub struct OrderPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cutting_completed_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_completed_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivered_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_status: Option<PaymentStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pay_later_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pay_later_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pay_later_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payments: Option<Vec<PaymentRecord>>,
}

/// Map a status-transition request onto a lifecycle event.
///
/// The request names the *target* status (in either vocabulary); payment
/// fields ride along only for the payment transition.
pub fn event_for_target(update: &OrderStatusUpdate) -> Result<OrderEvent, TransitionError> {
    match update.status {
        OrderStatus::CuttingCompleted => Ok(OrderEvent::CuttingDone),
        OrderStatus::Completed => Ok(OrderEvent::Complete),
        OrderStatus::PaymentCompleted => {
            let mode = update.payment_mode.ok_or_else(|| {
                field_error("payment_mode", "payment_mode is required to complete payment")
            })?;
            Ok(OrderEvent::CollectPayment(PaymentTerms {
                mode,
                pay_now_amount: update.pay_now_amount,
                pay_later_date: update.pay_later_date,
                discount: update.discount,
                method: update.payment_method.clone(),
            }))
        }
        OrderStatus::Delivered => Ok(OrderEvent::Deliver),
        OrderStatus::Cancelled => Ok(OrderEvent::Cancel {
            confirmed: update.confirm,
        }),
        OrderStatus::Created => Err(field_error(
            "status",
            "an order cannot be moved back to 'Order Created'",
        )),
    }
}

/// Validate and compute one lifecycle transition.
///
/// Pure: no I/O, no clock access (callers pass `today` and `now`).
pub fn transition(
    order: &Order,
    event: OrderEvent,
    today: NaiveDate,
    now: i64,
) -> Result<OrderPatch, TransitionError> {
    match (order.status, event) {
        (OrderStatus::Created, OrderEvent::CuttingDone) => Ok(OrderPatch {
            status: Some(OrderStatus::CuttingCompleted),
            cutting_completed_at: Some(now),
            ..Default::default()
        }),

        (OrderStatus::CuttingCompleted, OrderEvent::Complete) => Ok(OrderPatch {
            status: Some(OrderStatus::Completed),
            completed_at: Some(now),
            ..Default::default()
        }),

        (OrderStatus::Completed, OrderEvent::CollectPayment(terms)) => {
            collect_payment(order, terms, today, now)
        }

        (OrderStatus::PaymentCompleted, OrderEvent::Deliver) => Ok(OrderPatch {
            status: Some(OrderStatus::Delivered),
            delivered_at: Some(now),
            ..Default::default()
        }),

        (
            OrderStatus::Created | OrderStatus::CuttingCompleted,
            OrderEvent::Cancel { confirmed },
        ) => {
            if !confirmed {
                return Err(TransitionError::NotEligible(
                    "cancellation requires explicit confirmation".to_string(),
                ));
            }
            // No monetary recomputation on cancel
            Ok(OrderPatch {
                status: Some(OrderStatus::Cancelled),
                ..Default::default()
            })
        }

        (from, event) => Err(TransitionError::IllegalTransition {
            from,
            to: event.target(),
        }),
    }
}

/// The "Order Completed → Payment Completed" transition.
fn collect_payment(
    order: &Order,
    terms: PaymentTerms,
    today: NaiveDate,
    now: i64,
) -> Result<OrderPatch, TransitionError> {
    let mut errors = FieldErrors::new();

    let discount = terms.discount.unwrap_or(0.0);
    money::check_amount(&mut errors, "discount", discount);
    if errors.is_empty() {
        if discount > order.price {
            errors.insert(
                "discount".to_string(),
                "discount must not exceed the order price".to_string(),
            );
        } else if order.advance_payment + discount > order.price {
            errors.insert(
                "discount".to_string(),
                "advance payment plus discount must not exceed the order price".to_string(),
            );
        }
    }
    if !errors.is_empty() {
        return Err(TransitionError::Fields(errors));
    }

    let payable = money::final_payable(order.price, order.advance_payment, discount);

    let mut patch = OrderPatch {
        status: Some(OrderStatus::PaymentCompleted),
        payment_completed_at: Some(now),
        discount: Some(discount),
        ..Default::default()
    };

    // Advance plus discount covering the price leaves nothing to collect;
    // the order settles here no matter which mode was requested.
    if money::is_zero(payable) {
        patch.remaining_amount = Some(0.0);
        patch.payment_status = Some(PaymentStatus::Paid);
        return Ok(patch);
    }

    match terms.mode {
        PaymentMode::PayNow => {
            let pay_now = require_pay_now(&terms, &mut errors);
            if let Some(amount) = pay_now {
                if amount > payable {
                    errors.insert(
                        "pay_now_amount".to_string(),
                        "pay_now_amount must not exceed the final payable amount".to_string(),
                    );
                }
            }
            if !errors.is_empty() {
                return Err(TransitionError::Fields(errors));
            }
            let amount = pay_now.unwrap_or(0.0);
            let remaining = money::subtract(payable, amount);

            patch.remaining_amount = Some(remaining);
            patch.payment_status = Some(if money::is_zero(remaining) {
                PaymentStatus::Paid
            } else {
                PaymentStatus::Partial
            });
            patch.payments = Some(with_payment(order, amount, terms.method, now));
        }

        PaymentMode::PayLater => {
            let date = require_pay_later_date(&terms, today, &mut errors);
            if !errors.is_empty() {
                return Err(TransitionError::Fields(errors));
            }
            patch.remaining_amount = Some(payable);
            patch.payment_status = Some(PaymentStatus::Scheduled);
            patch.pay_later_enabled = Some(true);
            patch.pay_later_date = date;
            patch.pay_later_amount = Some(payable);
        }

        PaymentMode::Partial => {
            let pay_now = require_pay_now(&terms, &mut errors);
            if let Some(amount) = pay_now {
                // Strict: paying the whole payable is "Pay Now", not "Partial"
                if amount >= payable {
                    errors.insert(
                        "pay_now_amount".to_string(),
                        "pay_now_amount must be less than the final payable amount for a partial payment"
                            .to_string(),
                    );
                }
            }
            let date = require_pay_later_date(&terms, today, &mut errors);
            if !errors.is_empty() {
                return Err(TransitionError::Fields(errors));
            }
            let amount = pay_now.unwrap_or(0.0);
            let remainder = money::subtract(payable, amount);

            patch.remaining_amount = Some(remainder);
            patch.payment_status = Some(PaymentStatus::Partial);
            patch.pay_later_enabled = Some(true);
            patch.pay_later_date = date;
            patch.pay_later_amount = Some(remainder);
            patch.payments = Some(with_payment(order, amount, terms.method, now));
        }
    }

    Ok(patch)
}

/// Post-delivery (or post-payment-step) partial payment collection.
///
/// One atomic partial-payment event; callable repeatedly until the balance
/// reaches zero.
pub fn record_payment(
    order: &Order,
    amount: f64,
    method: String,
    note: Option<String>,
    now: i64,
) -> Result<OrderPatch, TransitionError> {
    if !matches!(
        order.status,
        OrderStatus::PaymentCompleted | OrderStatus::Delivered
    ) {
        return Err(TransitionError::NotEligible(format!(
            "payments can only be collected after the payment step (order is '{}')",
            order.status
        )));
    }
    if !matches!(
        order.payment_status,
        PaymentStatus::Partial | PaymentStatus::Scheduled | PaymentStatus::Unpaid
    ) || money::is_zero(order.remaining_amount)
    {
        return Err(TransitionError::NotEligible(
            "this order has no outstanding balance".to_string(),
        ));
    }

    let mut errors = FieldErrors::new();
    money::check_amount(&mut errors, "amount", amount);
    if errors.is_empty() {
        if amount <= 0.0 {
            errors.insert(
                "amount".to_string(),
                "amount must be greater than zero".to_string(),
            );
        } else if amount > order.remaining_amount {
            errors.insert(
                "amount".to_string(),
                "amount must not exceed the remaining balance".to_string(),
            );
        }
    }
    if !errors.is_empty() {
        return Err(TransitionError::Fields(errors));
    }

    let remaining = money::subtract(order.remaining_amount, amount);

    let mut payments = order.payments.clone();
    payments.push(PaymentRecord {
        amount,
        method,
        note,
        time: now,
    });

    Ok(OrderPatch {
        remaining_amount: Some(remaining),
        payment_status: Some(if money::is_zero(remaining) {
            PaymentStatus::Paid
        } else {
            PaymentStatus::Partial
        }),
        payments: Some(payments),
        ..Default::default()
    })
}

fn require_pay_now(terms: &PaymentTerms, errors: &mut FieldErrors) -> Option<f64> {
    match terms.pay_now_amount {
        None => {
            errors.insert(
                "pay_now_amount".to_string(),
                "pay_now_amount is required for this payment mode".to_string(),
            );
            None
        }
        Some(amount) => {
            money::check_amount(errors, "pay_now_amount", amount);
            if errors.contains_key("pay_now_amount") {
                return None;
            }
            if amount <= 0.0 {
                errors.insert(
                    "pay_now_amount".to_string(),
                    "pay_now_amount must be greater than zero".to_string(),
                );
                return None;
            }
            Some(amount)
        }
    }
}

fn require_pay_later_date(
    terms: &PaymentTerms,
    today: NaiveDate,
    errors: &mut FieldErrors,
) -> Option<NaiveDate> {
    match terms.pay_later_date {
        None => {
            errors.insert(
                "pay_later_date".to_string(),
                "pay_later_date is required when payment is deferred".to_string(),
            );
            None
        }
        Some(date) if date < today => {
            errors.insert(
                "pay_later_date".to_string(),
                "pay_later_date must not be in the past".to_string(),
            );
            None
        }
        Some(date) => Some(date),
    }
}

fn with_payment(order: &Order, amount: f64, method: Option<String>, now: i64) -> Vec<PaymentRecord> {
    let mut payments = order.payments.clone();
    payments.push(PaymentRecord {
        amount,
        method: method.unwrap_or_else(|| "Cash".to_string()),
        note: None,
        time: now,
    });
    payments
}
