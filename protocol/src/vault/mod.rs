//! # Vault Module — Reputation Tokens on the Ledger
//!
//! The vault is where reputation lives. Every account owns at most one
//! vault on the ledger; the vault owns tokens; this module owns the client
//! side of that arrangement — and nothing more. The ledger's copy is the
//! truth, ours goes stale the moment a mutate succeeds.
//!
//! ```text
//! token.rs    — ReputationToken, listing parse, vault summary stats
//! protocol.rs — VaultClient: create / mint-or-update / list, the mint gate
//! session.rs  — explicit session object: attestation, cache, pending flags
//! ```
//!
//! ## Design Principles
//!
//! 1. **The ledger owns storage.** We never hold anything but read-through
//!    copies obtained via query, and we re-query after every mutate.
//!
//! 2. **Partial-failure tolerance on reads.** One malformed token record
//!    costs that record its place in the listing, never the whole list.
//!
//! 3. **Observed behavior over intended invariants.** Minting an existing
//!    username deposits a fresh token *without removing the old one* — the
//!    per-username uniqueness invariant can be violated by repeated mints.
//!    That is the deployed contract's behavior and we mirror it honestly;
//!    see [`protocol::MintOutcome::Superseded`].

pub mod protocol;
pub mod session;
pub mod token;

pub use protocol::{MintOutcome, MintRequest, VaultClient, VaultError};
pub use session::{PendingGuard, Session, SessionEvent};
pub use token::{MalformedTokenRecord, ReputationToken, TokenListing, VaultSummary};
