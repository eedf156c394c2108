//! # In-Memory Ledger Emulator
//!
//! A [`LedgerClient`] that runs the contract's semantics in-process:
//! idempotent vault creation, ledger-assigned monotonically increasing
//! token ids, ledger-side score computation, and the contract's actual
//! panic behavior when a vault is missing.
//!
//! Two consumers: the test suites, and the CLI (which persists a
//! [`LedgerSnapshot`] between runs so a demo session survives restarts).
//!
//! Faithfulness notes:
//!
//! - `mintAndDeposit` **appends**. It performs no username deduplication,
//!   exactly like the contract — repeated mints for one username produce
//!   multiple tokens.
//! - The score formula here stands in for the contract's: the real one is
//!   not part of this repository's contract surface, and the client never
//!   depends on it beyond "some UInt64 comes back".

use chrono::Utc;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;

use crate::ledger::client::{AuthorizationSet, LedgerClient, LedgerError, TransactionId, TypedArg};
use crate::ledger::scripts;

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// One stored token, as the ledger sees it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredToken {
    pub github_username: String,
    pub reputation_score: u64,
    pub created_at: i64,
}

/// One account's vault.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultState {
    /// Next id to assign. Ids are unique within the vault and never reused.
    pub next_token_id: u64,
    /// Tokens by id. BTreeMap keeps query iteration order stable.
    pub tokens: BTreeMap<u64, StoredToken>,
}

/// The emulator's entire world, serializable for CLI persistence.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    /// Vaults by account address. Absence of a key is "no vault".
    pub vaults: HashMap<String, VaultState>,
    /// Counter feeding transaction ids.
    pub next_tx: u64,
}

// ---------------------------------------------------------------------------
// MemoryLedger
// ---------------------------------------------------------------------------

/// In-process ledger emulator.
pub struct MemoryLedger {
    state: Mutex<LedgerSnapshot>,
    /// When set, the next call fails with `Unavailable` and clears the flag.
    fail_next: Mutex<Option<String>>,
}

impl MemoryLedger {
    /// A fresh, empty ledger.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(LedgerSnapshot::default()),
            fail_next: Mutex::new(None),
        }
    }

    /// Restores an emulator from a previously taken snapshot.
    pub fn from_snapshot(snapshot: LedgerSnapshot) -> Self {
        Self {
            state: Mutex::new(snapshot),
            fail_next: Mutex::new(None),
        }
    }

    /// Copies out the full ledger state.
    pub fn snapshot(&self) -> LedgerSnapshot {
        self.state.lock().clone()
    }

    /// Arms a one-shot transport failure: the next `query` or `mutate`
    /// returns `LedgerError::Unavailable(reason)` without touching state.
    pub fn fail_next(&self, reason: &str) {
        *self.fail_next.lock() = Some(reason.to_string());
    }

    fn take_armed_failure(&self) -> Option<LedgerError> {
        self.fail_next
            .lock()
            .take()
            .map(LedgerError::Unavailable)
    }

    /// The emulator's stand-in for the contract's score formula. Pull
    /// requests weigh heaviest, stars next, commits least — review work
    /// is harder to fake than commit volume.
    fn compute_score(commits: u64, pull_requests: u64, stars: u64) -> u64 {
        commits * 2 + pull_requests * 10 + stars * 5
    }

    fn expect_address(args: &[TypedArg]) -> Result<String, LedgerError> {
        match args.first() {
            Some(TypedArg::Address(address)) => Ok(address.clone()),
            other => Err(LedgerError::Execution(format!(
                "expected Address argument, got {:?}",
                other
            ))),
        }
    }
}

impl Default for MemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LedgerClient for MemoryLedger {
    async fn query(&self, script: &str, args: Vec<TypedArg>) -> Result<Value, LedgerError> {
        if let Some(err) = self.take_armed_failure() {
            return Err(err);
        }

        let state = self.state.lock();

        if script == scripts::probe_vault_capability() {
            let address = Self::expect_address(&args)?;
            return Ok(Value::Bool(state.vaults.contains_key(&address)));
        }

        if script == scripts::list_vault_tokens() {
            let address = Self::expect_address(&args)?;
            let vault = state.vaults.get(&address).ok_or_else(|| {
                LedgerError::Execution("ReputationVault not found for this address".to_string())
            })?;

            let mut results = serde_json::Map::new();
            for (id, token) in &vault.tokens {
                results.insert(
                    id.to_string(),
                    json!({
                        "github": token.github_username,
                        "score": token.reputation_score,
                        "createdAt": token.created_at,
                    }),
                );
            }
            return Ok(Value::Object(results));
        }

        Err(LedgerError::Execution(format!(
            "unknown script ({} bytes)",
            script.len()
        )))
    }

    async fn mutate(
        &self,
        script: &str,
        args: Vec<TypedArg>,
        signers: AuthorizationSet,
    ) -> Result<TransactionId, LedgerError> {
        if let Some(err) = self.take_armed_failure() {
            return Err(err);
        }

        let mut state = self.state.lock();
        state.next_tx += 1;
        let tx_id = TransactionId(format!("{:064x}", state.next_tx));

        if script == scripts::create_vault_if_absent() {
            // Idempotent: an existing vault is a logged no-op, still a success.
            state.vaults.entry(signers.proposer.clone()).or_default();
            tracing::debug!(account = %signers.proposer, tx = %tx_id, "createVaultIfAbsent");
            return Ok(tx_id);
        }

        if script == scripts::mint_and_deposit() {
            let (username, commits, pull_requests, stars) = match args.as_slice() {
                [TypedArg::String(u), TypedArg::UInt64(c), TypedArg::UInt64(p), TypedArg::UInt64(s)] => {
                    (u.clone(), *c, *p, *s)
                }
                other => {
                    return Err(LedgerError::Execution(format!(
                        "mintAndDeposit: bad arguments {:?}",
                        other
                    )))
                }
            };

            let vault = state.vaults.get_mut(&signers.proposer).ok_or_else(|| {
                LedgerError::Execution(
                    "ReputationVault not found. Please create one first.".to_string(),
                )
            })?;

            let id = vault.next_token_id;
            vault.next_token_id += 1;
            vault.tokens.insert(
                id,
                StoredToken {
                    github_username: username,
                    reputation_score: Self::compute_score(commits, pull_requests, stars),
                    created_at: Utc::now().timestamp(),
                },
            );

            tracing::debug!(account = %signers.proposer, token_id = id, tx = %tx_id, "mintAndDeposit");
            return Ok(tx_id);
        }

        Err(LedgerError::Execution(format!(
            "unknown transaction ({} bytes)",
            script.len()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr() -> AuthorizationSet {
        AuthorizationSet::single("0xa1")
    }

    #[tokio::test]
    async fn probe_reports_vault_presence() {
        let ledger = MemoryLedger::new();
        let args = vec![TypedArg::Address("0xa1".to_string())];

        let absent = ledger
            .query(&scripts::probe_vault_capability(), args.clone())
            .await
            .unwrap();
        assert_eq!(absent, Value::Bool(false));

        ledger
            .mutate(&scripts::create_vault_if_absent(), vec![], addr())
            .await
            .unwrap();

        let present = ledger
            .query(&scripts::probe_vault_capability(), args)
            .await
            .unwrap();
        assert_eq!(present, Value::Bool(true));
    }

    #[tokio::test]
    async fn create_vault_is_idempotent() {
        let ledger = MemoryLedger::new();
        let first = ledger
            .mutate(&scripts::create_vault_if_absent(), vec![], addr())
            .await;
        let second = ledger
            .mutate(&scripts::create_vault_if_absent(), vec![], addr())
            .await;
        assert!(first.is_ok());
        assert!(second.is_ok());
        assert_eq!(ledger.snapshot().vaults.len(), 1);
    }

    #[tokio::test]
    async fn mint_without_vault_aborts() {
        let ledger = MemoryLedger::new();
        let result = ledger
            .mutate(
                &scripts::mint_and_deposit(),
                vec![
                    TypedArg::String("alice".to_string()),
                    TypedArg::UInt64(10),
                    TypedArg::UInt64(2),
                    TypedArg::UInt64(1),
                ],
                addr(),
            )
            .await;
        assert!(matches!(result, Err(LedgerError::Execution(_))));
        assert!(ledger.snapshot().vaults.is_empty());
    }

    #[tokio::test]
    async fn mint_appends_without_dedup() {
        let ledger = MemoryLedger::new();
        ledger
            .mutate(&scripts::create_vault_if_absent(), vec![], addr())
            .await
            .unwrap();

        let mint_args = || {
            vec![
                TypedArg::String("alice".to_string()),
                TypedArg::UInt64(10),
                TypedArg::UInt64(2),
                TypedArg::UInt64(1),
            ]
        };
        ledger
            .mutate(&scripts::mint_and_deposit(), mint_args(), addr())
            .await
            .unwrap();
        ledger
            .mutate(&scripts::mint_and_deposit(), mint_args(), addr())
            .await
            .unwrap();

        let snapshot = ledger.snapshot();
        let vault = &snapshot.vaults["0xa1"];
        // Same username twice: two tokens, distinct monotonically rising ids.
        assert_eq!(vault.tokens.len(), 2);
        assert!(vault.tokens.contains_key(&0));
        assert!(vault.tokens.contains_key(&1));
        assert_eq!(vault.tokens[&0].reputation_score, 10 * 2 + 2 * 10 + 1 * 5);
    }

    #[tokio::test]
    async fn armed_failure_fires_once_and_leaves_state_alone() {
        let ledger = MemoryLedger::new();
        ledger.fail_next("connection refused");

        let result = ledger
            .mutate(&scripts::create_vault_if_absent(), vec![], addr())
            .await;
        assert_eq!(
            result,
            Err(LedgerError::Unavailable("connection refused".to_string()))
        );
        assert!(ledger.snapshot().vaults.is_empty());

        // The flag is one-shot; the retry succeeds.
        ledger
            .mutate(&scripts::create_vault_if_absent(), vec![], addr())
            .await
            .unwrap();
        assert_eq!(ledger.snapshot().vaults.len(), 1);
    }

    #[tokio::test]
    async fn snapshot_roundtrip_preserves_state() {
        let ledger = MemoryLedger::new();
        ledger
            .mutate(&scripts::create_vault_if_absent(), vec![], addr())
            .await
            .unwrap();
        ledger
            .mutate(
                &scripts::mint_and_deposit(),
                vec![
                    TypedArg::String("alice".to_string()),
                    TypedArg::UInt64(100),
                    TypedArg::UInt64(20),
                    TypedArg::UInt64(30),
                ],
                addr(),
            )
            .await
            .unwrap();

        let snapshot = ledger.snapshot();
        let json = serde_json::to_string(&snapshot).expect("serialize");
        let recovered: LedgerSnapshot = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(snapshot, recovered);

        let restored = MemoryLedger::from_snapshot(recovered);
        assert_eq!(restored.snapshot(), snapshot);
    }
}
