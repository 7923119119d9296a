//! Aggregation behavior: review rating rollups, customer grouping, listing
//! with status filters, and the dashboard counters.

use chrono::Days;

use kstitch_server::db::repository::{NewTailor, RepoError};
use kstitch_server::orders::lifecycle::{self, OrderEvent, PaymentTerms};
use kstitch_server::{Config, ServerState};
use shared::models::{OrderCreate, OrderStatus, PaymentMode, ReviewCreate, ReviewUpdate};
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

fn payload(customer: &str, phone: &str, price: f64) -> OrderCreate {
    OrderCreate {
        customer_id: None,
        customer_name: customer.to_string(),
        customer_phone: phone.to_string(),
        customer_email: None,
        order_items: None,
        order_type: Some("Blouse".to_string()),
        measurements: None,
        price,
        advance_payment: 0.0,
        due_date: today().checked_add_days(Days::new(7)).unwrap(),
        notes: None,
    }
}

fn review(tailor: &RecordId, customer: &str, rating: u8) -> ReviewCreate {
    ReviewCreate {
        tailor_id: tailor.to_string(),
        customer_id: customer.to_string(),
        rating,
        comment: "Neat stitching".to_string(),
    }
}

async fn rating_of(state: &ServerState, tailor: &RecordId) -> f64 {
    state
        .tailors
        .find_by_id(&tailor.to_string())
        .await
        .unwrap()
        .unwrap()
        .rating
}

#[tokio::test]
async fn review_rollup_tracks_create_update_delete() {
    let state = test_state().await;
    let tailor = test_tailor(&state, "ratings@example.com").await;

    let r1 = state.reviews.create(review(&tailor, "cust-a", 4)).await.unwrap();
    assert_eq!(rating_of(&state, &tailor).await, 4.0);

    let r2 = state.reviews.create(review(&tailor, "cust-b", 5)).await.unwrap();
    assert_eq!(rating_of(&state, &tailor).await, 4.5);

    state
        .reviews
        .update(
            &r2.id.clone().unwrap().to_string(),
            ReviewUpdate {
                rating: Some(2),
                comment: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(rating_of(&state, &tailor).await, 3.0);

    state
        .reviews
        .delete(&r2.id.unwrap().to_string())
        .await
        .unwrap();
    assert_eq!(rating_of(&state, &tailor).await, 4.0);

    // Rating falls back to zero when the last review goes
    state
        .reviews
        .delete(&r1.id.unwrap().to_string())
        .await
        .unwrap();
    assert_eq!(rating_of(&state, &tailor).await, 0.0);
}

#[tokio::test]
async fn one_review_per_customer_pair() {
    let state = test_state().await;
    let tailor = test_tailor(&state, "pair@example.com").await;

    state.reviews.create(review(&tailor, "cust-a", 4)).await.unwrap();
    let err = state
        .reviews
        .create(review(&tailor, "cust-a", 5))
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Duplicate(_)));

    // Same customer may review a different tailor
    let other = test_tailor(&state, "pair2@example.com").await;
    state.reviews.create(review(&other, "cust-a", 5)).await.unwrap();
}

#[tokio::test]
async fn customers_roll_up_by_identity_triple() {
    let state = test_state().await;
    let tailor = test_tailor(&state, "customers@example.com").await;

    state
        .orders
        .create(tailor.clone(), payload("Asha", "111", 500.0))
        .await
        .unwrap();
    state
        .orders
        .create(tailor.clone(), payload("Asha", "111", 700.0))
        .await
        .unwrap();
    state
        .orders
        .create(tailor.clone(), payload("Ravi", "222", 300.0))
        .await
        .unwrap();

    let customers = state.orders.customers_for_tailor(tailor).await.unwrap();
    assert_eq!(customers.len(), 2);

    let asha = customers.iter().find(|c| c.name == "Asha").unwrap();
    assert_eq!(asha.orders, 2);
    assert_eq!(asha.total_spent, 1200.0);
    assert!(asha.first_visit <= asha.last_visit);

    let ravi = customers.iter().find(|c| c.name == "Ravi").unwrap();
    assert_eq!(ravi.orders, 1);
    assert_eq!(ravi.total_spent, 300.0);

    // Sorted by most recent order first
    assert!(customers[0].last_visit >= customers[1].last_visit);
}

#[tokio::test]
async fn listing_filters_and_paginates() {
    let state = test_state().await;
    let tailor = test_tailor(&state, "listing@example.com").await;

    for i in 0..5 {
        state
            .orders
            .create(tailor.clone(), payload("Asha", "111", 100.0 + i as f64))
            .await
            .unwrap();
    }

    let (page1, total) = state
        .orders
        .list_by_tailor(tailor.clone(), None, 1, 2)
        .await
        .unwrap();
    assert_eq!(total, 5);
    assert_eq!(page1.len(), 2);

    let (page3, _) = state
        .orders
        .list_by_tailor(tailor.clone(), None, 3, 2)
        .await
        .unwrap();
    assert_eq!(page3.len(), 1);

    let (created_only, total) = state
        .orders
        .list_by_tailor(tailor.clone(), Some(OrderStatus::Created), 1, 20)
        .await
        .unwrap();
    assert_eq!(total, 5);
    assert_eq!(created_only.len(), 5);

    let (none, total) = state
        .orders
        .list_by_tailor(tailor, Some(OrderStatus::Delivered), 1, 20)
        .await
        .unwrap();
    assert_eq!(total, 0);
    assert!(none.is_empty());
}

#[tokio::test]
async fn dashboard_counts_split_active_and_settled() {
    let state = test_state().await;
    let tailor = test_tailor(&state, "stats@example.com").await;

    // One active order, one fully paid order
    state
        .orders
        .create(tailor.clone(), payload("Asha", "111", 400.0))
        .await
        .unwrap();

    let paid = state
        .orders
        .create(tailor.clone(), payload("Ravi", "222", 1000.0))
        .await
        .unwrap();
    let id = paid.id_string();

    let mut order = paid;
    for event in [OrderEvent::CuttingDone, OrderEvent::Complete] {
        let patch = lifecycle::transition(&order, event, today(), now_millis()).unwrap();
        order = state.orders.apply_patch(&id, &patch).await.unwrap();
    }
    let terms = PaymentTerms {
        mode: PaymentMode::PayNow,
        pay_now_amount: Some(1000.0),
        pay_later_date: None,
        discount: None,
        method: None,
    };
    let patch = lifecycle::transition(
        &order,
        OrderEvent::CollectPayment(terms),
        today(),
        now_millis(),
    )
    .unwrap();
    state.orders.apply_patch(&id, &patch).await.unwrap();

    let (total, active, completed, revenue) =
        state.orders.dashboard_counts(tailor).await.unwrap();
    assert_eq!(total, 2);
    assert_eq!(active, 1);
    assert_eq!(completed, 1);
    assert_eq!(revenue, 1000.0);
}

#[tokio::test]
async fn notes_replace_and_append() {
    let state = test_state().await;
    let tailor = test_tailor(&state, "notes@example.com").await;

    let order = state
        .orders
        .create(tailor, payload("Asha", "111", 500.0))
        .await
        .unwrap();
    let id = order.id_string();

    let order = state.orders.update_notes(&id, "Pleats on left", false).await.unwrap();
    assert_eq!(order.notes.as_deref(), Some("Pleats on left"));

    let order = state
        .orders
        .update_notes(&id, "Deliver before noon", true)
        .await
        .unwrap();
    assert_eq!(
        order.notes.as_deref(),
        Some("Pleats on left\nDeliver before noon")
    );

    let order = state.orders.update_notes(&id, "Rewritten", false).await.unwrap();
    assert_eq!(order.notes.as_deref(), Some("Rewritten"));
}
