//! End-to-end settlement scenarios over the domain core.
//!
//! The database writes are exercised against a live PostgreSQL in
//! deployment; these tests pin down the decision logic and wire formats the
//! server builds those writes from.

use rewear_core::{
    credit, debit, settle, validate_request, Error, ExchangeMode, Listing, ModerationStatus,
    SwapDecision, SwapStatus,
};
use uuid::Uuid;

fn listing(owner: Uuid) -> Listing {
    Listing {
        id: Uuid::new_v4(),
        owner_id: owner,
        status: ModerationStatus::Approved,
        is_available: true,
    }
}

#[test]
fn points_swap_lifecycle() {
    // User A (balance 100) requests item X (owned by B) for 50 points.
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();
    let item = listing(b);

    validate_request(&item, a, ExchangeMode::Points, 50, 100).unwrap();

    // B accepts: A pays 50, B gains 50, X becomes unavailable.
    let settlement = settle(
        SwapDecision::Accept,
        SwapStatus::Pending,
        ExchangeMode::Points,
        50,
        a,
        b,
        100,
    )
    .unwrap();

    assert_eq!(settlement.new_status, SwapStatus::Accepted);
    assert!(settlement.reserve_item);

    let transfer = settlement.transfer.unwrap();
    let a_balance = debit(100, transfer.amount).unwrap();
    let b_balance = credit(0, transfer.amount).unwrap();
    assert_eq!(a_balance, 50);
    assert_eq!(b_balance, 50);

    // A second accept on the settled swap is a conflict, with no further
    // balance movement.
    let second = settle(
        SwapDecision::Accept,
        settlement.new_status,
        ExchangeMode::Points,
        50,
        a,
        b,
        a_balance,
    );
    assert_eq!(second, Err(Error::AlreadyProcessed));
}

#[test]
fn rejection_leaves_everything_untouched() {
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();

    let settlement = settle(
        SwapDecision::Reject,
        SwapStatus::Pending,
        ExchangeMode::Points,
        50,
        a,
        b,
        100,
    )
    .unwrap();

    assert_eq!(settlement.new_status, SwapStatus::Rejected);
    assert!(!settlement.reserve_item);
    assert!(settlement.transfer.is_none());
}

#[test]
fn own_item_request_never_creates_a_swap() {
    let owner = Uuid::new_v4();
    let item = listing(owner);

    assert_eq!(
        validate_request(&item, owner, ExchangeMode::Swap, 0, 0),
        Err(Error::OwnItemRequest)
    );
}

#[test]
fn overdrawn_offer_rejected_at_creation_and_acceptance() {
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();
    let item = listing(b);

    assert_eq!(
        validate_request(&item, a, ExchangeMode::Points, 150, 100),
        Err(Error::InsufficientPoints)
    );

    // Balance dropped between creation and acceptance.
    assert_eq!(
        settle(
            SwapDecision::Accept,
            SwapStatus::Pending,
            ExchangeMode::Points,
            50,
            a,
            b,
            20,
        ),
        Err(Error::InsufficientPoints)
    );
}

#[test]
fn unapproved_items_are_not_swappable() {
    let a = Uuid::new_v4();

    for status in [ModerationStatus::Pending, ModerationStatus::Rejected] {
        let mut item = listing(Uuid::new_v4());
        item.status = status;
        assert!(!item.is_publicly_visible());
        assert_eq!(
            validate_request(&item, a, ExchangeMode::Swap, 0, 0),
            Err(Error::ItemNotAvailable)
        );
    }
}
