//! Error types for the OpenAuction clearing engine.
//!
//! All errors use the `OA_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Order / book errors
//! - 2xx: Phase / auction lookup errors
//! - 3xx: Clearing errors
//! - 4xx: Ledger errors
//! - 5xx: Fee errors
//! - 9xx: General / internal errors

use primitive_types::U256;
use thiserror::Error;

use crate::{AuctionId, AuctionPhase, OrderKey, UserId};

/// Central error enum for all OpenAuction operations.
#[derive(Debug, Error)]
pub enum AuctionError {
    // =================================================================
    // Order / Book Errors (1xx)
    // =================================================================
    /// The order failed validation (zero amount, below the minimum bid,
    /// or not strictly better than the seller's floor price).
    #[error("OA_ERR_100: Invalid order: {reason}")]
    InvalidOrder { reason: String },

    /// An identical order key is already in the book.
    #[error("OA_ERR_101: Order already exists: {0}")]
    DuplicateOrder(OrderKey),

    /// The supplied insertion hint sits after the order's correct position.
    #[error("OA_ERR_102: Unusable insertion hint: {0}")]
    BadHint(OrderKey),

    /// An order in the batch belongs to a different user.
    #[error("OA_ERR_103: Not the order owner: expected {expected}, got {got}")]
    NotOwner { expected: UserId, got: UserId },

    /// The order has already been claimed (or was cancelled) and is no
    /// longer in the book.
    #[error("OA_ERR_104: Order no longer claimable: {0}")]
    AlreadyClaimed(OrderKey),

    // =================================================================
    // Phase / Auction Errors (2xx)
    // =================================================================
    /// An operation was attempted in the wrong auction phase.
    #[error("OA_ERR_200: Wrong auction phase: expected {expected}, got {actual}")]
    WrongPhase {
        expected: AuctionPhase,
        actual: AuctionPhase,
    },

    /// No auction with the given id exists.
    #[error("OA_ERR_201: Auction not found: {0}")]
    AuctionNotFound(AuctionId),

    // =================================================================
    // Clearing Errors (3xx)
    // =================================================================
    /// The precompute walk reached the end of the book or crossed the
    /// clearing point.
    #[error("OA_ERR_300: Precompute walk went past the clearing point")]
    PrecomputeTooFar,

    /// The proposed clearing price failed verification.
    #[error("OA_ERR_301: Clearing price rejected: {reason}")]
    PriceRejected { reason: String },

    /// Checked arithmetic overflowed, or a value did not fit in 96 bits.
    #[error("OA_ERR_302: Arithmetic overflow or narrowing failure")]
    OverflowOrNarrowing,

    // =================================================================
    // Ledger Errors (4xx)
    // =================================================================
    /// The ledger could not cover a pull.
    #[error("OA_ERR_400: Insufficient balance: need {needed}, have {available}")]
    InsufficientBalance { needed: U256, available: U256 },

    // =================================================================
    // Fee Errors (5xx)
    // =================================================================
    /// The caller is not allowed to change fee parameters.
    #[error("OA_ERR_500: Caller may not change fee parameters")]
    UnauthorizedFeeChange,

    /// The fee numerator exceeds the allowed maximum.
    #[error("OA_ERR_501: Fee numerator {numerator} exceeds maximum")]
    FeeTooHigh { numerator: u64 },

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// The 64-bit user id space is exhausted.
    #[error("OA_ERR_900: User id space exhausted")]
    UserIdSpaceExhausted,

    /// Unrecoverable internal error.
    #[error("OA_ERR_901: Internal error: {0}")]
    Internal(String),
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, AuctionError>;
