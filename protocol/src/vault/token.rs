//! # Reputation Tokens
//!
//! The client-side view of a ledger-owned token record, the tolerant
//! parser that turns a query result into a [`TokenListing`], and the
//! aggregate [`VaultSummary`] shown alongside a listing.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// A reputation token as read from a vault.
///
/// Read-through copy: the ledger assigns the id (unique within a vault,
/// monotonically non-decreasing) and computes the score. Tokens are never
/// mutated in place — an "update" is a fresh mint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReputationToken {
    /// Ledger-assigned token id.
    pub id: u64,

    /// The GitHub username this token attests. Non-empty.
    pub github_username: String,

    /// Reputation score computed ledger-side at mint time.
    pub reputation_score: u64,

    /// Mint timestamp, unix seconds.
    pub created_at: i64,
}

/// One entry in a query result failed shape validation.
///
/// Scoped to the entry: the rest of the listing still parses. The `id` is
/// kept as the raw map key because a malformed entry may not even have a
/// numeric one.
#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("malformed token record '{id}': {reason}")]
pub struct MalformedTokenRecord {
    /// The raw map key of the offending entry.
    pub id: String,
    /// What was wrong with it.
    pub reason: String,
}

/// The parsed result of a vault token query.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenListing {
    /// Well-formed tokens, sorted by id ascending.
    pub tokens: Vec<ReputationToken>,
    /// Entries that failed shape validation, preserved for diagnostics.
    pub malformed: Vec<MalformedTokenRecord>,
}

impl TokenListing {
    /// Parses the `{id: {github, score, createdAt}}` shape returned by the
    /// token listing script.
    ///
    /// Tolerant by contract: each malformed entry is recorded and skipped,
    /// never aborting the rest. Duplicate usernames are *not* treated as
    /// corruption — repeated mints legitimately produce them.
    pub fn from_query_result(value: &Value) -> Self {
        let mut listing = TokenListing::default();

        let Some(entries) = value.as_object() else {
            listing.malformed.push(MalformedTokenRecord {
                id: String::new(),
                reason: format!("expected an object of token records, got {}", value),
            });
            return listing;
        };

        for (raw_id, entry) in entries {
            match parse_entry(raw_id, entry) {
                Ok(token) => listing.tokens.push(token),
                Err(record) => {
                    tracing::warn!(id = %record.id, reason = %record.reason, "skipping malformed token record");
                    listing.malformed.push(record);
                }
            }
        }

        // JSON object keys arrive in string order; restore numeric order.
        listing.tokens.sort_by_key(|t| t.id);
        listing
    }

    /// Finds a token by username. With duplicates present, returns the one
    /// with the highest id — the most recent mint.
    pub fn latest_for_username(&self, username: &str) -> Option<&ReputationToken> {
        self.tokens
            .iter()
            .filter(|t| t.github_username == username)
            .max_by_key(|t| t.id)
    }

    /// Aggregate statistics over the well-formed tokens.
    pub fn summary(&self) -> VaultSummary {
        VaultSummary::from_tokens(&self.tokens)
    }
}

fn parse_entry(raw_id: &str, entry: &Value) -> Result<ReputationToken, MalformedTokenRecord> {
    let malformed = |reason: String| MalformedTokenRecord {
        id: raw_id.to_string(),
        reason,
    };

    let id = raw_id
        .parse::<u64>()
        .map_err(|_| malformed(format!("non-numeric token id '{}'", raw_id)))?;

    let github_username = entry
        .get("github")
        .and_then(Value::as_str)
        .ok_or_else(|| malformed("missing or non-string 'github' field".to_string()))?;
    if github_username.is_empty() {
        return Err(malformed("empty 'github' field".to_string()));
    }

    let reputation_score = entry
        .get("score")
        .and_then(Value::as_u64)
        .ok_or_else(|| malformed("missing or non-integer 'score' field".to_string()))?;

    let created_at = entry
        .get("createdAt")
        .and_then(Value::as_i64)
        .ok_or_else(|| malformed("missing or non-integer 'createdAt' field".to_string()))?;

    Ok(ReputationToken {
        id,
        github_username: github_username.to_string(),
        reputation_score,
        created_at,
    })
}

/// Aggregate statistics for a token listing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultSummary {
    /// Number of well-formed tokens.
    pub total_tokens: usize,
    /// Sum of all reputation scores.
    pub total_reputation: u64,
    /// Mean score, rounded to the nearest integer. Zero for an empty vault.
    pub average_score: u64,
}

impl VaultSummary {
    fn from_tokens(tokens: &[ReputationToken]) -> Self {
        let total_reputation: u64 = tokens.iter().map(|t| t.reputation_score).sum();
        let average_score = if tokens.is_empty() {
            0
        } else {
            (total_reputation as f64 / tokens.len() as f64).round() as u64
        };
        Self {
            total_tokens: tokens.len(),
            total_reputation,
            average_score,
        }
    }
}
