//! # Credit Scoring Engine
//!
//! Deterministic mapping from a reputation score to a borrowable amount.
//!
//! ## The formula
//!
//! Below [`MIN_SCORE_THRESHOLD`](crate::config::MIN_SCORE_THRESHOLD) the
//! answer is always "no": ineligible, zero credit. At or above it:
//!
//! ```text
//! amount = round(100 + 0.5 * log10(score - 1000 + 100) * 100)
//! ```
//!
//! The `+100` offset keeps the log argument at 100 or more right at the
//! eligibility boundary, so the curve enters at `log10(100) = 2` — a clean
//! 200 — instead of plunging toward a log of zero. From there the curve is
//! smooth, strictly increasing, and concave: diminishing marginal credit.
//!
//! ## Numerics
//!
//! All floating-point work happens in IEEE-754 `f64`. Rounding is to the
//! nearest integer with ties away from zero (`f64::round`). Both choices
//! are part of the contract — the pinned values in the tests below must
//! hold on every platform.

use serde::{Deserialize, Serialize};

use crate::config;

/// A credit offer derived from one reputation token's score.
///
/// Ephemeral by design: recomputed on demand from the token's current
/// score, never persisted, never cached across queries.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditOffer {
    /// The reputation token this offer is backed by.
    pub token_id: u64,

    /// Whether the score clears the eligibility threshold.
    pub eligible: bool,

    /// Maximum amount that may be borrowed against this token.
    /// Always zero when `eligible` is false.
    pub borrowable_amount: u64,
}

/// Computes the borrowable amount for a reputation score.
///
/// Returns 0 below the eligibility threshold. Monotonically non-decreasing
/// in `reputation_score` for all inputs.
pub fn borrowable_amount(reputation_score: u64) -> u64 {
    if reputation_score < config::MIN_SCORE_THRESHOLD {
        return 0;
    }

    let above = reputation_score - config::MIN_SCORE_THRESHOLD + config::CREDIT_LOG_OFFSET;
    let amount = config::CREDIT_BASE_AMOUNT as f64
        + config::CREDIT_SCALE_FACTOR * (above as f64).log10() * 100.0;

    // Ties round away from zero; amount is always positive here.
    amount.round() as u64
}

/// Evaluates the full [`CreditOffer`] for a token.
pub fn evaluate(token_id: u64, reputation_score: u64) -> CreditOffer {
    let eligible = reputation_score >= config::MIN_SCORE_THRESHOLD;
    CreditOffer {
        token_id,
        eligible,
        borrowable_amount: borrowable_amount(reputation_score),
    }
}
