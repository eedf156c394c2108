//! # Borrow Requests & Loan Terms
//!
//! Validates a requested draw against a [`CreditOffer`] and, on success,
//! produces a [`BorrowRecord`] carrying the standard loan terms.
//!
//! This is contract completeness, not a lending engine: the record is
//! returned to the caller and nowhere else. No ledger-side hold is created
//! — the collateral lock on the backing token is advisory only, and the
//! core performs no persistence, repayment tracking, or default handling.
//!
//! Interest is expressed in basis points (1 bp = 0.01%) so the arithmetic
//! stays in integers end to end.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config;
use crate::scoring::engine::CreditOffer;

/// Errors rejecting a borrow request. Both are user-correctable and have
/// no side effects — nothing was recorded, nothing needs unwinding.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum BorrowError {
    /// The requested amount is not a positive quantity. Amounts are `u64`,
    /// so the only representable offender is zero.
    #[error("invalid borrow amount: must be greater than zero")]
    InvalidAmount,

    /// The requested amount is larger than the offer's credit limit.
    #[error("requested {requested} exceeds credit limit {limit} (token {token_id})")]
    ExceedsLimit {
        /// The backing reputation token.
        token_id: u64,
        /// The offer's borrowable amount.
        limit: u64,
        /// The amount that was rejected.
        requested: u64,
    },
}

/// Terms attached to every accepted borrow.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanTerms {
    /// Loan term in days from acceptance.
    pub term_days: u32,

    /// Interest rate in basis points (500 = 5.00%).
    pub interest_rate_bps: u32,
}

impl LoanTerms {
    /// The standard terms: 7-day term at 5% interest.
    pub fn standard() -> Self {
        Self {
            term_days: config::LOAN_TERM_DAYS,
            interest_rate_bps: config::LOAN_INTEREST_RATE_BPS,
        }
    }

    /// Interest due on a principal under these terms. Integer bps
    /// arithmetic, truncating division — the borrower gets the rounding.
    pub fn interest_due(&self, principal: u64) -> u64 {
        principal * self.interest_rate_bps as u64 / 10_000
    }
}

/// An accepted borrow against one reputation token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BorrowRecord {
    /// The reputation token serving as collateral.
    ///
    /// The lock is advisory: the token remains in the vault and the ledger
    /// enforces nothing. Defaulting is a reputation event, not a seizure.
    pub token_id: u64,

    /// Principal borrowed.
    pub amount: u64,

    /// Terms the borrow was accepted under.
    pub terms: LoanTerms,

    /// When the borrow was accepted.
    pub accepted_at: DateTime<Utc>,

    /// Repayment deadline (`accepted_at + term_days`).
    pub due_at: DateTime<Utc>,
}

impl BorrowRecord {
    /// Total repayment due at the deadline: principal plus interest.
    pub fn total_due(&self) -> u64 {
        self.amount + self.terms.interest_due(self.amount)
    }
}

/// Validates `amount` against `offer` and records the borrow.
///
/// # Errors
///
/// - [`BorrowError::InvalidAmount`] when `amount` is zero.
/// - [`BorrowError::ExceedsLimit`] when `amount > offer.borrowable_amount`.
///   An ineligible offer has a limit of zero, so any request against it
///   lands here too.
pub fn request_borrow(offer: &CreditOffer, amount: u64) -> Result<BorrowRecord, BorrowError> {
    if amount == 0 {
        return Err(BorrowError::InvalidAmount);
    }

    if amount > offer.borrowable_amount {
        return Err(BorrowError::ExceedsLimit {
            token_id: offer.token_id,
            limit: offer.borrowable_amount,
            requested: amount,
        });
    }

    let terms = LoanTerms::standard();
    let accepted_at = Utc::now();
    let record = BorrowRecord {
        token_id: offer.token_id,
        amount,
        terms,
        accepted_at,
        due_at: accepted_at + Duration::days(terms.term_days as i64),
    };

    tracing::info!(
        token_id = record.token_id,
        amount = record.amount,
        total_due = record.total_due(),
        "borrow accepted"
    );

    Ok(record)
}
