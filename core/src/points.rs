//! Points ledger arithmetic.
//!
//! Points are a zero-sum internal currency: settlement moves them between the
//! two parties, and only an admin override mints or burns. Balances are `i64`
//! in storage but must never go negative, so all arithmetic here is checked.

use crate::error::{Error, Result};
use crate::{Points, UserId};

/// A zero-sum move of points from one user to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointsTransfer {
    pub from: UserId,
    pub to: UserId,
    pub amount: Points,
}

/// Subtract `amount` from `balance`, failing rather than going negative.
pub fn debit(balance: Points, amount: Points) -> Result<Points> {
    if amount < 0 {
        return Err(Error::NegativePoints);
    }
    if balance < amount {
        return Err(Error::InsufficientPoints);
    }
    Ok(balance - amount)
}

/// Add `amount` to `balance`, failing on overflow.
pub fn credit(balance: Points, amount: Points) -> Result<Points> {
    if amount < 0 {
        return Err(Error::NegativePoints);
    }
    balance.checked_add(amount).ok_or(Error::BalanceOverflow)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn debit_never_goes_negative() {
        assert_eq!(debit(100, 50), Ok(50));
        assert_eq!(debit(50, 50), Ok(0));
        assert_eq!(debit(49, 50), Err(Error::InsufficientPoints));
        assert_eq!(debit(0, 1), Err(Error::InsufficientPoints));
    }

    #[test]
    fn credit_checks_overflow() {
        assert_eq!(credit(100, 50), Ok(150));
        assert_eq!(credit(i64::MAX, 1), Err(Error::BalanceOverflow));
    }

    #[test]
    fn negative_amounts_rejected() {
        assert_eq!(debit(100, -1), Err(Error::NegativePoints));
        assert_eq!(credit(100, -1), Err(Error::NegativePoints));
    }

    proptest! {
        /// A debit/credit pair conserves the combined balance.
        #[test]
        fn transfer_conserves_total(
            a in 0i64..1_000_000,
            b in 0i64..1_000_000,
            amount in 0i64..1_000_000,
        ) {
            prop_assume!(amount <= a);
            let a_after = debit(a, amount).unwrap();
            let b_after = credit(b, amount).unwrap();
            prop_assert_eq!(a_after + b_after, a + b);
            prop_assert!(a_after >= 0);
        }
    }
}
