//! Order status transition tests.
//!
//! The completion webhook transitions orders with a status-guarded
//! conditional update in the order repository; these tests pin down the
//! transition rules that guard encodes, in particular that a redelivered
//! completion callback completes an order exactly once.

use storeforge_core::OrderStatus;

/// The transition the completion callback applies: only a PENDING order
/// moves to COMPLETED and is handed back for side effects; anything else
/// is a no-op (the actual guard lives in the order repository's SQL).
fn complete_once(status: OrderStatus) -> Option<OrderStatus> {
    (status == OrderStatus::Pending).then_some(OrderStatus::Completed)
}

#[test]
fn test_orders_start_pending() {
    assert_eq!(OrderStatus::default(), OrderStatus::Pending);
}

#[test]
fn test_completion_applies_only_from_pending() {
    assert_eq!(
        complete_once(OrderStatus::Pending),
        Some(OrderStatus::Completed)
    );
    assert_eq!(complete_once(OrderStatus::Completed), None);
}

#[test]
fn test_redelivered_callback_completes_exactly_once() {
    // Five deliveries of the same completion event: exactly the first one
    // observes the transition, so confirmation side effects fire once.
    let mut status = OrderStatus::Pending;
    let mut transitions = 0;

    for _ in 0..5 {
        if let Some(next) = complete_once(status) {
            status = next;
            transitions += 1;
        }
    }

    assert_eq!(transitions, 1);
    assert_eq!(status, OrderStatus::Completed);
}

#[test]
fn test_status_text_forms_round_trip() {
    // The SQL guard compares the stored text forms
    assert_eq!(OrderStatus::Pending.as_str(), "PENDING");
    assert_eq!(OrderStatus::Completed.as_str(), "COMPLETED");
    assert_eq!("PENDING".parse::<OrderStatus>().ok(), Some(OrderStatus::Pending));
    assert_eq!(
        "COMPLETED".parse::<OrderStatus>().ok(),
        Some(OrderStatus::Completed)
    );
}
