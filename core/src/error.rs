//! Error types for the ReWear domain.

use thiserror::Error;

/// All possible errors from the domain layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    // Swap request guards
    #[error("item not available")]
    ItemNotAvailable,

    #[error("cannot request your own item")]
    OwnItemRequest,

    #[error("insufficient points")]
    InsufficientPoints,

    #[error("points offer must be a positive amount")]
    InvalidPointsOffer,

    // Settlement guards
    #[error("swap request already processed")]
    AlreadyProcessed,

    // Moderation guards
    #[error("item is not awaiting moderation")]
    NotPendingModeration,

    // Ledger guards
    #[error("points balance overflow")]
    BalanceOverflow,

    #[error("points value must be non-negative")]
    NegativePoints,
}

/// Result type for domain operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        assert_eq!(Error::ItemNotAvailable.to_string(), "item not available");
        assert_eq!(
            Error::AlreadyProcessed.to_string(),
            "swap request already processed"
        );
        assert_eq!(
            Error::OwnItemRequest.to_string(),
            "cannot request your own item"
        );
    }
}
