//! Swap request lifecycle and settlement.
//!
//! A swap request is requester-initiated and owner-decided: the requester
//! proposes either a direct item-for-item exchange or a points payment, and
//! the item owner resolves it. The only transitions are
//! `pending -> accepted | rejected`; once settled a request is immutable.
//! `completed` and `cancelled` exist as labels in stored data but nothing
//! transitions into them.

use crate::error::{Error, Result};
use crate::item::Listing;
use crate::points::{debit, PointsTransfer};
use crate::{Points, UserId};
use serde::{Deserialize, Serialize};

/// How the requester proposes to pay for the item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExchangeMode {
    /// Direct item-for-item exchange.
    Swap,
    /// Paid from the requester's points balance.
    Points,
}

impl ExchangeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExchangeMode::Swap => "swap",
            ExchangeMode::Points => "points",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "swap" => Some(ExchangeMode::Swap),
            "points" => Some(ExchangeMode::Points),
            _ => None,
        }
    }
}

/// Lifecycle status of a swap request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwapStatus {
    Pending,
    Accepted,
    Rejected,
    /// Reserved label, never produced by any transition.
    Completed,
    /// Reserved label, never produced by any transition.
    Cancelled,
}

impl SwapStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SwapStatus::Pending => "pending",
            SwapStatus::Accepted => "accepted",
            SwapStatus::Rejected => "rejected",
            SwapStatus::Completed => "completed",
            SwapStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(SwapStatus::Pending),
            "accepted" => Some(SwapStatus::Accepted),
            "rejected" => Some(SwapStatus::Rejected),
            "completed" => Some(SwapStatus::Completed),
            "cancelled" => Some(SwapStatus::Cancelled),
            _ => None,
        }
    }

    /// Whether the owner may still act on this request.
    pub fn is_pending(&self) -> bool {
        matches!(self, SwapStatus::Pending)
    }

    /// Whether the request reached a terminal outcome.
    pub fn is_settled(&self) -> bool {
        matches!(self, SwapStatus::Accepted | SwapStatus::Rejected)
    }
}

/// The item owner's verdict on a pending request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapDecision {
    Accept,
    Reject,
}

/// The computed outcome of settling a swap request.
///
/// The caller persists these effects as a single atomic unit: the status
/// write, the availability flip, and both sides of the transfer must land
/// together or not at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settlement {
    /// Terminal status to record on the swap.
    pub new_status: SwapStatus,
    /// Whether the target item must be marked unavailable.
    pub reserve_item: bool,
    /// Points to move from requester to owner, when the mode is `points`.
    pub transfer: Option<PointsTransfer>,
}

/// Guard a new swap request before it is recorded.
///
/// The listing must be approved and available, the requester must not own it,
/// and the offered amount must be non-negative in any mode; a points offer
/// must additionally be positive and covered by the requester's current
/// balance. No balances or flags change here; effects are deferred to
/// acceptance.
pub fn validate_request(
    listing: &Listing,
    requester: UserId,
    mode: ExchangeMode,
    points_offered: Points,
    requester_balance: Points,
) -> Result<()> {
    if !listing.is_publicly_visible() {
        return Err(Error::ItemNotAvailable);
    }
    if listing.owner_id == requester {
        return Err(Error::OwnItemRequest);
    }
    // A negative amount is malformed in either mode; it must never reach
    // the store.
    if points_offered < 0 {
        return Err(Error::InvalidPointsOffer);
    }
    if mode == ExchangeMode::Points {
        if points_offered == 0 {
            return Err(Error::InvalidPointsOffer);
        }
        if points_offered > requester_balance {
            return Err(Error::InsufficientPoints);
        }
    }
    Ok(())
}

/// Resolve a pending swap request to its terminal outcome.
///
/// Fails with [`Error::AlreadyProcessed`] unless `status` is exactly
/// `pending`, which is what makes the transition one-shot. Rejection has no
/// side effects. Acceptance reserves the item and, for points mode, moves
/// `points_offered` from requester to owner; the requester's balance is
/// re-checked here rather than trusted from request-creation time.
pub fn settle(
    decision: SwapDecision,
    status: SwapStatus,
    mode: ExchangeMode,
    points_offered: Points,
    requester: UserId,
    owner: UserId,
    requester_balance: Points,
) -> Result<Settlement> {
    if !status.is_pending() {
        return Err(Error::AlreadyProcessed);
    }

    match decision {
        SwapDecision::Reject => Ok(Settlement {
            new_status: SwapStatus::Rejected,
            reserve_item: false,
            transfer: None,
        }),
        SwapDecision::Accept => {
            let transfer = match mode {
                ExchangeMode::Swap => None,
                ExchangeMode::Points => {
                    // Re-validates sufficiency at acceptance time.
                    debit(requester_balance, points_offered)?;
                    Some(PointsTransfer {
                        from: requester,
                        to: owner,
                        amount: points_offered,
                    })
                }
            };
            Ok(Settlement {
                new_status: SwapStatus::Accepted,
                reserve_item: true,
                transfer,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::ModerationStatus;
    use crate::points::credit;
    use uuid::Uuid;

    fn approved_listing(owner: UserId) -> Listing {
        Listing {
            id: Uuid::new_v4(),
            owner_id: owner,
            status: ModerationStatus::Approved,
            is_available: true,
        }
    }

    #[test]
    fn request_against_visible_listing_succeeds() {
        let owner = Uuid::new_v4();
        let requester = Uuid::new_v4();
        let listing = approved_listing(owner);

        assert_eq!(
            validate_request(&listing, requester, ExchangeMode::Swap, 0, 0),
            Ok(())
        );
        assert_eq!(
            validate_request(&listing, requester, ExchangeMode::Points, 50, 100),
            Ok(())
        );
    }

    #[test]
    fn request_for_own_item_rejected() {
        let owner = Uuid::new_v4();
        let listing = approved_listing(owner);

        assert_eq!(
            validate_request(&listing, owner, ExchangeMode::Swap, 0, 0),
            Err(Error::OwnItemRequest)
        );
    }

    #[test]
    fn request_against_hidden_listing_rejected() {
        let requester = Uuid::new_v4();

        let mut unavailable = approved_listing(Uuid::new_v4());
        unavailable.is_available = false;
        assert_eq!(
            validate_request(&unavailable, requester, ExchangeMode::Swap, 0, 0),
            Err(Error::ItemNotAvailable)
        );

        let mut pending = approved_listing(Uuid::new_v4());
        pending.status = ModerationStatus::Pending;
        assert_eq!(
            validate_request(&pending, requester, ExchangeMode::Points, 10, 100),
            Err(Error::ItemNotAvailable)
        );
    }

    #[test]
    fn negative_offer_rejected_in_either_mode() {
        let listing = approved_listing(Uuid::new_v4());
        let requester = Uuid::new_v4();

        assert_eq!(
            validate_request(&listing, requester, ExchangeMode::Swap, -5, 0),
            Err(Error::InvalidPointsOffer)
        );
        assert_eq!(
            validate_request(&listing, requester, ExchangeMode::Points, -5, 100),
            Err(Error::InvalidPointsOffer)
        );
    }

    #[test]
    fn points_offer_must_be_positive_and_covered() {
        let listing = approved_listing(Uuid::new_v4());
        let requester = Uuid::new_v4();

        assert_eq!(
            validate_request(&listing, requester, ExchangeMode::Points, 0, 100),
            Err(Error::InvalidPointsOffer)
        );
        assert_eq!(
            validate_request(&listing, requester, ExchangeMode::Points, 101, 100),
            Err(Error::InsufficientPoints)
        );
    }

    #[test]
    fn accept_points_swap_moves_balance_and_reserves_item() {
        let requester = Uuid::new_v4();
        let owner = Uuid::new_v4();

        // A (balance 100) pays 50 points for B's item.
        let settlement = settle(
            SwapDecision::Accept,
            SwapStatus::Pending,
            ExchangeMode::Points,
            50,
            requester,
            owner,
            100,
        )
        .unwrap();

        assert_eq!(settlement.new_status, SwapStatus::Accepted);
        assert!(settlement.reserve_item);
        let transfer = settlement.transfer.unwrap();
        assert_eq!(transfer.from, requester);
        assert_eq!(transfer.to, owner);
        assert_eq!(transfer.amount, 50);

        // Applying the transfer conserves the combined balance.
        let a_after = debit(100, transfer.amount).unwrap();
        let b_after = credit(0, transfer.amount).unwrap();
        assert_eq!(a_after, 50);
        assert_eq!(b_after, 50);
        assert_eq!(a_after + b_after, 100);
    }

    #[test]
    fn accept_direct_swap_has_no_transfer() {
        let settlement = settle(
            SwapDecision::Accept,
            SwapStatus::Pending,
            ExchangeMode::Swap,
            0,
            Uuid::new_v4(),
            Uuid::new_v4(),
            0,
        )
        .unwrap();

        assert_eq!(settlement.new_status, SwapStatus::Accepted);
        assert!(settlement.reserve_item);
        assert_eq!(settlement.transfer, None);
    }

    #[test]
    fn reject_has_no_side_effects() {
        let settlement = settle(
            SwapDecision::Reject,
            SwapStatus::Pending,
            ExchangeMode::Points,
            50,
            Uuid::new_v4(),
            Uuid::new_v4(),
            100,
        )
        .unwrap();

        assert_eq!(settlement.new_status, SwapStatus::Rejected);
        assert!(!settlement.reserve_item);
        assert_eq!(settlement.transfer, None);
    }

    #[test]
    fn settled_swaps_are_immutable() {
        for status in [
            SwapStatus::Accepted,
            SwapStatus::Rejected,
            SwapStatus::Completed,
            SwapStatus::Cancelled,
        ] {
            for decision in [SwapDecision::Accept, SwapDecision::Reject] {
                assert_eq!(
                    settle(
                        decision,
                        status,
                        ExchangeMode::Swap,
                        0,
                        Uuid::new_v4(),
                        Uuid::new_v4(),
                        0,
                    ),
                    Err(Error::AlreadyProcessed)
                );
            }
        }
    }

    #[test]
    fn acceptance_revalidates_balance() {
        // Balance dropped to 30 after the request was created with 50 offered.
        let result = settle(
            SwapDecision::Accept,
            SwapStatus::Pending,
            ExchangeMode::Points,
            50,
            Uuid::new_v4(),
            Uuid::new_v4(),
            30,
        );
        assert_eq!(result, Err(Error::InsufficientPoints));
    }

    #[test]
    fn status_labels_round_trip() {
        for status in [
            SwapStatus::Pending,
            SwapStatus::Accepted,
            SwapStatus::Rejected,
            SwapStatus::Completed,
            SwapStatus::Cancelled,
        ] {
            assert_eq!(SwapStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(ExchangeMode::parse("points"), Some(ExchangeMode::Points));
        assert_eq!(ExchangeMode::parse("barter"), None);
    }
}
