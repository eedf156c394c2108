//! # Credit Scoring — From Reputation to Credit Line
//!
//! The part of RepFi that turns a number the ledger gave us into a number
//! a borrower cares about.
//!
//! ```text
//! engine.rs — the credit-limit formula: score -> CreditOffer
//! borrow.rs — borrow request validation and loan terms
//! ```
//!
//! The engine is a pure function with a logarithmic curve: amounts grow
//! with reputation, but each additional reputation point buys less credit
//! than the last. That concavity is the whole risk model — no single score,
//! however inflated, unlocks unbounded exposure.

pub mod borrow;
pub mod engine;

pub use borrow::{request_borrow, BorrowError, BorrowRecord, LoanTerms};
pub use engine::{borrowable_amount, evaluate, CreditOffer};
