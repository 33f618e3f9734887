//! # ReWear Core
//!
//! Domain logic for the ReWear clothing exchange.
//!
//! This crate holds the rules of the marketplace with no knowledge of HTTP or
//! the database. The server crate feeds it plain values and applies the
//! effects it returns as SQL.
//!
//! ## Design Principles
//!
//! - **No IO**: the core has no knowledge of files, network, or storage
//! - **Deterministic**: same inputs always produce the same outputs
//! - **Testable**: pure logic, no mocks needed
//!
//! ## Core Concepts
//!
//! ### Listings
//!
//! A [`Listing`] is a garment offered for exchange. It carries a
//! [`ModerationStatus`] gate (admin-controlled visibility) and an availability
//! flag that flips off when a swap targeting it is accepted.
//!
//! ### Swap settlement
//!
//! A swap request moves `pending -> accepted | rejected`, decided by the item
//! owner. [`validate_request`] guards creation and [`settle`] computes the
//! terminal transition plus its side effects as a [`Settlement`] value:
//! whether to reserve the item, and an optional [`PointsTransfer`] when the
//! request is paid in points.
//!
//! ### Points ledger
//!
//! Points are a zero-sum internal currency. [`points::debit`] and
//! [`points::credit`] are checked so a balance can never go negative or
//! overflow.

pub mod error;
pub mod item;
pub mod points;
pub mod swap;

pub use error::Error;
pub use item::{Category, Condition, GarmentType, Listing, ModerationDecision, ModerationStatus};
pub use points::{credit, debit, PointsTransfer};
pub use swap::{settle, validate_request, ExchangeMode, Settlement, SwapDecision, SwapStatus};

/// Type aliases for clarity
pub type UserId = uuid::Uuid;
pub type ItemId = uuid::Uuid;
pub type SwapId = uuid::Uuid;
pub type Points = i64;

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, Error>;
