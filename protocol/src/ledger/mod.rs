//! # Ledger Access — Two Verbs and Nothing Else
//!
//! Everything the core knows about the outside ledger fits in one trait
//! with two operations: a read-only `query` and a state-mutating `mutate`.
//! The ledger owns all vault and token storage; we hold read-through
//! copies that go stale the moment a mutate succeeds.
//!
//! ```text
//! client.rs  — LedgerClient trait, typed arguments, authorization set
//! scripts.rs — the four Cadence scripts/transactions the core submits
//! memory.rs  — in-process emulator for development and tests
//! ```

pub mod client;
pub mod memory;
pub mod scripts;

pub use client::{AuthorizationSet, LedgerClient, LedgerError, TransactionId, TypedArg};
pub use memory::{LedgerSnapshot, MemoryLedger};
