//! End-to-end order lifecycle against an in-memory database:
//! creation, the forward status path, the three payment modes, invoice
//! generation and post-delivery collection.

use chrono::Days;

use kstitch_server::db::repository::{NewTailor, RepoError};
use kstitch_server::orders::lifecycle::{self, OrderEvent, PaymentTerms, TransitionError};
use kstitch_server::{Config, ServerState};
use shared::models::{
    InvoicePaymentStatus, OrderCreate, OrderStatus, PaymentMode, PaymentStatus,
};
use shared::util::{now_millis, today};
use surrealdb::RecordId;

async fn test_state() -> ServerState {
    let config = Config::from_env();
    ServerState::initialize_in_memory(config)
        .await
        .expect("in-memory state")
}

async fn test_tailor(state: &ServerState, email: &str) -> RecordId {
    state
        .tailors
        .create(NewTailor {
            shop_name: "Silk Threads".to_string(),
            owner_name: "Meera".to_string(),
            email: email.to_string(),
            password_hash: "unused".to_string(),
            phone: None,
            address: None,
        })
        .await
        .expect("create tailor")
        .id
        .expect("tailor id")
}

fn payload(customer: &str, price: f64, advance: f64) -> OrderCreate {
    OrderCreate {
        customer_id: None,
        customer_name: customer.to_string(),
        customer_phone: "9876543210".to_string(),
        customer_email: None,
        order_items: None,
        order_type: Some("Kurta".to_string()),
        measurements: None,
        price,
        advance_payment: advance,
        due_date: today().checked_add_days(Days::new(7)).unwrap(),
        notes: None,
    }
}

fn pay_terms(mode: PaymentMode) -> PaymentTerms {
    PaymentTerms {
        mode,
        pay_now_amount: None,
        pay_later_date: None,
        discount: None,
        method: None,
    }
}

/// Drive an order from "Order Created" to "Order Completed".
async fn advance_to_completed(
    state: &ServerState,
    id: &str,
) -> kstitch_server::db::models::Order {
    let order = state.orders.find_by_id(id).await.unwrap().unwrap();
    let patch = lifecycle::transition(&order, OrderEvent::CuttingDone, today(), now_millis())
        .expect("cutting transition");
    let order = state.orders.apply_patch(id, &patch).await.unwrap();

    let patch = lifecycle::transition(&order, OrderEvent::Complete, today(), now_millis())
        .expect("complete transition");
    state.orders.apply_patch(id, &patch).await.unwrap()
}

#[tokio::test]
async fn pay_now_full_lifecycle() {
    let state = test_state().await;
    let tailor = test_tailor(&state, "shop1@example.com").await;

    let order = state
        .orders
        .create(tailor, payload("Asha", 1200.0, 500.0))
        .await
        .unwrap();
    assert_eq!(order.status, OrderStatus::Created);
    assert_eq!(order.payment_status, PaymentStatus::Unpaid);
    assert_eq!(order.remaining_amount, 700.0);

    let id = order.id_string();
    let order = advance_to_completed(&state, &id).await;
    assert_eq!(order.status, OrderStatus::Completed);
    assert!(order.completed_at.is_some());

    // Invoice is generated at completion
    let invoice = state.invoices.create_for_order(&order).await.unwrap();
    assert_eq!(invoice.number, "INV-0001");
    assert_eq!(invoice.total_amount, 1200.0);
    assert_eq!(invoice.due_amount, 700.0);
    assert_eq!(invoice.payment_status, InvoicePaymentStatus::AdvancePaid);

    // Pay the full balance now
    let mut terms = pay_terms(PaymentMode::PayNow);
    terms.pay_now_amount = Some(700.0);
    let patch = lifecycle::transition(
        &order,
        OrderEvent::CollectPayment(terms),
        today(),
        now_millis(),
    )
    .unwrap();
    let order = state.orders.apply_patch(&id, &patch).await.unwrap();
    assert_eq!(order.status, OrderStatus::PaymentCompleted);
    assert_eq!(order.payment_status, PaymentStatus::Paid);
    assert_eq!(order.remaining_amount, 0.0);
    assert_eq!(order.payments.len(), 1);
    assert_eq!(order.payments[0].amount, 700.0);
    assert_eq!(order.paid_total(), 700.0);

    let patch = lifecycle::transition(&order, OrderEvent::Deliver, today(), now_millis()).unwrap();
    let order = state.orders.apply_patch(&id, &patch).await.unwrap();
    assert_eq!(order.status, OrderStatus::Delivered);
    assert!(order.delivered_at.is_some());
}

#[tokio::test]
async fn pay_later_then_settle_after_delivery() {
    let state = test_state().await;
    let tailor = test_tailor(&state, "shop2@example.com").await;

    let order = state
        .orders
        .create(tailor, payload("Ravi", 1200.0, 500.0))
        .await
        .unwrap();
    let id = order.id_string();
    let order = advance_to_completed(&state, &id).await;

    let mut terms = pay_terms(PaymentMode::PayLater);
    terms.pay_later_date = Some(today().checked_add_days(Days::new(3)).unwrap());
    let patch = lifecycle::transition(
        &order,
        OrderEvent::CollectPayment(terms),
        today(),
        now_millis(),
    )
    .unwrap();
    let order = state.orders.apply_patch(&id, &patch).await.unwrap();
    assert_eq!(order.payment_status, PaymentStatus::Scheduled);
    assert_eq!(order.remaining_amount, 700.0);
    assert_eq!(order.pay_later_amount, 700.0);
    assert!(order.pay_later_enabled);
    assert!(order.payments.is_empty());

    let patch = lifecycle::transition(&order, OrderEvent::Deliver, today(), now_millis()).unwrap();
    let order = state.orders.apply_patch(&id, &patch).await.unwrap();

    // Two partial collections close the balance
    let patch =
        lifecycle::record_payment(&order, 300.0, "Cash".to_string(), None, now_millis()).unwrap();
    let order = state.orders.apply_patch(&id, &patch).await.unwrap();
    assert_eq!(order.payment_status, PaymentStatus::Partial);
    assert_eq!(order.remaining_amount, 400.0);

    let patch =
        lifecycle::record_payment(&order, 400.0, "UPI".to_string(), None, now_millis()).unwrap();
    let order = state.orders.apply_patch(&id, &patch).await.unwrap();
    assert_eq!(order.payment_status, PaymentStatus::Paid);
    assert_eq!(order.remaining_amount, 0.0);
    assert_eq!(order.payments.len(), 2);
    // The recorded payments account for the whole balance
    assert_eq!(order.paid_total(), 700.0);

    // Settled orders accept no further payments
    let err =
        lifecycle::record_payment(&order, 1.0, "Cash".to_string(), None, now_millis()).unwrap_err();
    assert!(matches!(err, TransitionError::NotEligible(_)));
}

#[tokio::test]
async fn partial_payment_with_discount() {
    let state = test_state().await;
    let tailor = test_tailor(&state, "shop3@example.com").await;

    let order = state
        .orders
        .create(tailor, payload("Nila", 2000.0, 500.0))
        .await
        .unwrap();
    let id = order.id_string();
    let order = advance_to_completed(&state, &id).await;

    // payable = 2000 - 500 - 200 = 1300; pay 800 now, 500 later
    let mut terms = pay_terms(PaymentMode::Partial);
    terms.discount = Some(200.0);
    terms.pay_now_amount = Some(800.0);
    terms.pay_later_date = Some(today().checked_add_days(Days::new(5)).unwrap());
    let patch = lifecycle::transition(
        &order,
        OrderEvent::CollectPayment(terms),
        today(),
        now_millis(),
    )
    .unwrap();
    let order = state.orders.apply_patch(&id, &patch).await.unwrap();

    assert_eq!(order.discount, 200.0);
    assert_eq!(order.payment_status, PaymentStatus::Partial);
    assert_eq!(order.remaining_amount, 500.0);
    assert_eq!(order.pay_later_amount, 500.0);
    assert_eq!(order.payments.len(), 1);
    assert_eq!(order.payments[0].amount, 800.0);
}

#[tokio::test]
async fn cancelled_order_is_terminal() {
    let state = test_state().await;
    let tailor = test_tailor(&state, "shop4@example.com").await;

    let order = state
        .orders
        .create(tailor, payload("Devi", 900.0, 0.0))
        .await
        .unwrap();
    let id = order.id_string();

    let patch =
        lifecycle::transition(&order, OrderEvent::Cancel { confirmed: true }, today(), 0).unwrap();
    let order = state.orders.apply_patch(&id, &patch).await.unwrap();
    assert_eq!(order.status, OrderStatus::Cancelled);

    let err = lifecycle::transition(&order, OrderEvent::CuttingDone, today(), 0).unwrap_err();
    assert!(matches!(err, TransitionError::IllegalTransition { .. }));
}

#[tokio::test]
async fn full_advance_settles_at_creation() {
    let state = test_state().await;
    let tailor = test_tailor(&state, "shop7@example.com").await;

    // Advance covering the whole price: nothing left to pay
    let order = state
        .orders
        .create(tailor, payload("Devi", 800.0, 800.0))
        .await
        .unwrap();
    assert_eq!(order.remaining_amount, 0.0);
    assert_eq!(order.payment_status, PaymentStatus::Paid);

    // The payment step still runs, and the order stays settled
    let id = order.id_string();
    let order = advance_to_completed(&state, &id).await;
    let patch = lifecycle::transition(
        &order,
        OrderEvent::CollectPayment(pay_terms(PaymentMode::PayNow)),
        today(),
        now_millis(),
    )
    .unwrap();
    let order = state.orders.apply_patch(&id, &patch).await.unwrap();
    assert_eq!(order.status, OrderStatus::PaymentCompleted);
    assert_eq!(order.payment_status, PaymentStatus::Paid);
    assert_eq!(order.remaining_amount, 0.0);

    // And takes no further payments
    let err =
        lifecycle::record_payment(&order, 1.0, "Cash".to_string(), None, now_millis()).unwrap_err();
    assert!(matches!(err, TransitionError::NotEligible(_)));
}

#[tokio::test]
async fn invoice_is_idempotent_and_numbers_are_sequential() {
    let state = test_state().await;
    let tailor = test_tailor(&state, "shop5@example.com").await;

    let first = state
        .orders
        .create(tailor.clone(), payload("Asha", 1000.0, 0.0))
        .await
        .unwrap();
    let first = advance_to_completed(&state, &first.id_string()).await;

    let a = state.invoices.create_for_order(&first).await.unwrap();
    let b = state.invoices.create_for_order(&first).await.unwrap();
    assert_eq!(a.number, "INV-0001");
    assert_eq!(a.number, b.number);
    assert_eq!(a.id, b.id);

    let second = state
        .orders
        .create(tailor, payload("Ravi", 500.0, 0.0))
        .await
        .unwrap();
    let second = advance_to_completed(&state, &second.id_string()).await;
    let c = state.invoices.create_for_order(&second).await.unwrap();
    assert_eq!(c.number, "INV-0002");
}

#[tokio::test]
async fn counter_survives_concurrent_increments() {
    let state = test_state().await;

    let mut handles = Vec::new();
    for _ in 0..10 {
        let counters = state.counters.clone();
        handles.push(tokio::spawn(async move {
            counters.next("concurrency-test").await.unwrap()
        }));
    }

    let mut values = Vec::new();
    for handle in handles {
        values.push(handle.await.unwrap());
    }
    values.sort_unstable();
    values.dedup();
    assert_eq!(values.len(), 10, "counter values must be distinct");
    assert_eq!(*values.last().unwrap(), 10);
}

#[tokio::test]
async fn duplicate_tailor_email_is_rejected() {
    let state = test_state().await;
    test_tailor(&state, "dup@example.com").await;

    let err = state
        .tailors
        .create(NewTailor {
            shop_name: "Other".to_string(),
            owner_name: "Other".to_string(),
            email: "DUP@example.com".to_string(),
            password_hash: "unused".to_string(),
            phone: None,
            address: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Duplicate(_)));
}

#[tokio::test]
async fn create_rejects_bad_amounts() {
    let state = test_state().await;
    let tailor = test_tailor(&state, "shop6@example.com").await;

    let mut bad = payload("Asha", 0.0, 0.0);
    bad.price = 0.0;
    let err = state.orders.create(tailor.clone(), bad).await.unwrap_err();
    let RepoError::FieldValidation(errors) = err else {
        panic!("expected field validation");
    };
    assert!(errors.contains_key("price"));

    let mut bad = payload("Asha", 100.0, 200.0);
    bad.advance_payment = 200.0;
    let err = state.orders.create(tailor, bad).await.unwrap_err();
    let RepoError::FieldValidation(errors) = err else {
        panic!("expected field validation");
    };
    assert!(errors.contains_key("advance_payment"));
}
