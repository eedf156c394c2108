//! # Vault Protocol
//!
//! The mint/update/query state machine run against the external ledger.
//! Per account the lifecycle is exactly one transition:
//!
//! ```text
//!    ┌─────────┐   createVault    ┌──────────────┐
//!    │ NoVault │ ───────────────► │ VaultCreated │ ──┐ createVault
//!    └─────────┘                  └──────────────┘ ◄─┘ (no-op, success)
//! ```
//!
//! Everything here is client-side choreography over the two ledger verbs.
//! There is no locking, no at-most-one-in-flight guarantee, and no
//! optimistic concurrency: two concurrent mints for the same username can
//! both succeed and both land — serialization is the ledger's job, and the
//! per-username uniqueness invariant is best-effort as a result. Failures
//! are surfaced exactly once; retrying is the caller's decision.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::attestation::{ensure_can_mint, ActivityStats, IdentityMismatch};
use crate::config;
use crate::ledger::{AuthorizationSet, LedgerClient, LedgerError, TransactionId, TypedArg};
use crate::ledger::scripts;
use crate::vault::token::TokenListing;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur during vault operations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum VaultError {
    /// The claimed username failed the identity gate. No ledger call was
    /// made; fix the claim or re-attest and try again.
    #[error(transparent)]
    IdentityMismatch(#[from] IdentityMismatch),

    /// A mutate was requested against an account with no published vault.
    /// The user must create one first; no transaction was submitted.
    #[error("no reputation vault published for {address}; create one first")]
    NoVault {
        /// The account that lacks a vault.
        address: String,
    },

    /// The ledger itself failed — transport or execution. Transport
    /// failures (`Unavailable`) are safe to retry; nothing changed.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

// ---------------------------------------------------------------------------
// Mint Request / Outcome
// ---------------------------------------------------------------------------

/// The raw contribution counts forwarded to the ledger at mint time.
///
/// Score computation is deliberately ledger-side: the core forwards counts
/// and later applies the scoring engine to whatever score comes back.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintRequest {
    /// The GitHub username the token will attest.
    pub github_username: String,
    /// Commit count.
    pub commits: u64,
    /// Pull request count.
    pub pull_requests: u64,
    /// Star count.
    pub stars: u64,
}

impl MintRequest {
    /// Builds a mint request straight from an attestation — the common
    /// path after a GitHub connect.
    pub fn from_attestation(stats: &ActivityStats) -> Self {
        Self {
            github_username: stats.username.clone(),
            commits: stats.commits,
            pull_requests: stats.pull_requests,
            stars: stats.stars,
        }
    }
}

/// What a successful mint did.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MintOutcome {
    /// No token existed for the username; a fresh one was deposited.
    Minted {
        /// The submitted transaction.
        tx: TransactionId,
    },

    /// A token for the username already existed. A fresh token with a
    /// newly computed score was deposited — but the prior token was **not**
    /// removed, so the vault now holds both. This mirrors the deployed
    /// contract's behavior; a dedup-correct replacement would remove
    /// `prior_token_id` in the same transaction.
    Superseded {
        /// The submitted transaction.
        tx: TransactionId,
        /// The pre-existing token that now lingers alongside the new one.
        prior_token_id: u64,
    },
}

impl MintOutcome {
    /// The transaction id regardless of outcome flavor.
    pub fn tx(&self) -> &TransactionId {
        match self {
            MintOutcome::Minted { tx } => tx,
            MintOutcome::Superseded { tx, .. } => tx,
        }
    }
}

// ---------------------------------------------------------------------------
// VaultClient
// ---------------------------------------------------------------------------

/// Client-side driver for one ledger's vaults.
///
/// Generic over the [`LedgerClient`] seam so tests and the CLI can plug in
/// the in-memory emulator while production plugs in a real access node.
pub struct VaultClient<L: LedgerClient> {
    ledger: Arc<L>,
}

impl<L: LedgerClient> VaultClient<L> {
    /// Wraps a ledger client.
    pub fn new(ledger: Arc<L>) -> Self {
        Self { ledger }
    }

    /// Checks whether `address` publishes a vault capability.
    ///
    /// Capability presence at the well-known public path is the canonical
    /// signal; absence is a state, not an error.
    pub async fn probe(&self, address: &str) -> Result<bool, VaultError> {
        let result = self
            .ledger
            .query(
                &scripts::probe_vault_capability(),
                vec![TypedArg::Address(address.to_string())],
            )
            .await?;
        Ok(result.as_bool().unwrap_or(false))
    }

    /// Creates a vault for `address` if none exists.
    ///
    /// Idempotent end to end: the transaction itself no-ops when a vault
    /// already exists, so repeated calls always report success and leave
    /// exactly one vault.
    pub async fn create_vault(&self, address: &str) -> Result<TransactionId, VaultError> {
        let tx = self
            .ledger
            .mutate(
                &scripts::create_vault_if_absent(),
                vec![],
                AuthorizationSet::single(address),
            )
            .await?;
        tracing::info!(account = %address, tx = %tx, "vault create submitted");
        Ok(tx)
    }

    /// Lists the tokens in `address`'s vault.
    ///
    /// No vault means an empty listing, not an error. Individual malformed
    /// records are collected in the listing rather than failing the call.
    pub async fn list_tokens(&self, address: &str) -> Result<TokenListing, VaultError> {
        if !self.probe(address).await? {
            tracing::debug!(account = %address, "no vault capability; empty listing");
            return Ok(TokenListing::default());
        }

        let result = self
            .ledger
            .query(
                &scripts::list_vault_tokens(),
                vec![TypedArg::Address(address.to_string())],
            )
            .await?;

        let listing = TokenListing::from_query_result(&result);
        tracing::debug!(
            account = %address,
            tokens = listing.tokens.len(),
            malformed = listing.malformed.len(),
            "vault listing fetched"
        );
        Ok(listing)
    }

    /// Mints a reputation token, replacing-in-spirit any existing token
    /// for the same username.
    ///
    /// The sequence:
    ///
    /// 1. Identity gate — a mismatch aborts before any ledger traffic.
    /// 2. Vault probe — a missing vault is [`VaultError::NoVault`], again
    ///    with no transaction submitted.
    /// 3. Scan the current listing for the username (snapshot semantics;
    ///    the scan can be stale by the time the mint lands).
    /// 4. Submit `mintAndDeposit` either way.
    ///
    /// Whatever listing the caller has cached is stale after this returns;
    /// follow up with [`refresh_after_settle`](Self::refresh_after_settle)
    /// or a direct [`list_tokens`](Self::list_tokens). Not retried on
    /// failure — the error is surfaced once and retrying is the caller's
    /// call.
    pub async fn mint_or_update(
        &self,
        address: &str,
        request: &MintRequest,
        attested: Option<&ActivityStats>,
    ) -> Result<MintOutcome, VaultError> {
        ensure_can_mint(&request.github_username, attested)?;

        if !self.probe(address).await? {
            return Err(VaultError::NoVault {
                address: address.to_string(),
            });
        }

        let existing = self
            .list_tokens(address)
            .await?
            .latest_for_username(&request.github_username)
            .map(|t| t.id);

        let tx = self
            .ledger
            .mutate(
                &scripts::mint_and_deposit(),
                vec![
                    TypedArg::String(request.github_username.clone()),
                    TypedArg::UInt64(request.commits),
                    TypedArg::UInt64(request.pull_requests),
                    TypedArg::UInt64(request.stars),
                ],
                AuthorizationSet::single(address),
            )
            .await?;

        let outcome = match existing {
            Some(prior_token_id) => {
                tracing::warn!(
                    account = %address,
                    username = %request.github_username,
                    prior_token_id,
                    tx = %tx,
                    "minted over existing username; prior token remains in vault"
                );
                MintOutcome::Superseded { tx, prior_token_id }
            }
            None => {
                tracing::info!(
                    account = %address,
                    username = %request.github_username,
                    tx = %tx,
                    "mint submitted"
                );
                MintOutcome::Minted { tx }
            }
        };

        Ok(outcome)
    }

    /// Waits out the settling delay, then re-queries the vault.
    ///
    /// An explicit awaitable replacement for fire-and-forget refresh
    /// timers: errors propagate to the caller and dropping the future
    /// cancels the wait. The delay is a heuristic for the ledger becoming
    /// read-consistent, not a finality guarantee.
    pub async fn refresh_after_settle(&self, address: &str) -> Result<TokenListing, VaultError> {
        tokio::time::sleep(config::SETTLE_DELAY).await;
        self.list_tokens(address).await
    }
}
