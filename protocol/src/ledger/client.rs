//! # Ledger Client Seam
//!
//! The [`LedgerClient`] trait is the only door between the core and the
//! ledger. Both operations are single suspending round trips with no
//! partial results, no automatic retries, and no cancellation once issued.
//! A successful `mutate` returns a transaction identifier — an
//! acknowledgement of submission, **not** a confirmation of finality.
//!
//! Arguments travel as [`TypedArg`]s that serialize to the
//! `{ "type": ..., "value": ... }` shape the Flow access API expects,
//! values always as strings (JSON numbers can't carry a full `u64`).

use async_trait::async_trait;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors surfaced by ledger access.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// The transport failed before the ledger processed anything.
    /// Safe to retry; no local or remote state changed.
    #[error("ledger unavailable: {0}")]
    Unavailable(String),

    /// The script or transaction aborted on the ledger side.
    /// The caller decides whether a retry makes sense.
    #[error("ledger execution failed: {0}")]
    Execution(String),
}

// ---------------------------------------------------------------------------
// Typed Arguments
// ---------------------------------------------------------------------------

/// A script/transaction argument with its Cadence type tag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypedArg {
    /// An account address (`0x`-prefixed hex).
    Address(String),
    /// A UTF-8 string.
    String(String),
    /// An unsigned 64-bit integer. Serialized as a string on the wire.
    UInt64(u64),
}

impl TypedArg {
    /// The Cadence type tag for this argument.
    pub fn type_tag(&self) -> &'static str {
        match self {
            TypedArg::Address(_) => "Address",
            TypedArg::String(_) => "String",
            TypedArg::UInt64(_) => "UInt64",
        }
    }

    /// The wire value, always a string.
    pub fn value_string(&self) -> String {
        match self {
            TypedArg::Address(a) => a.clone(),
            TypedArg::String(s) => s.clone(),
            TypedArg::UInt64(n) => n.to_string(),
        }
    }
}

impl Serialize for TypedArg {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("TypedArg", 2)?;
        s.serialize_field("type", self.type_tag())?;
        s.serialize_field("value", &self.value_string())?;
        s.end()
    }
}

// ---------------------------------------------------------------------------
// Authorization
// ---------------------------------------------------------------------------

/// Which accounts propose, pay for, and authorize a transaction.
///
/// For the single-user flows in this core all three roles are the same
/// account — [`AuthorizationSet::single`] covers every call site today.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationSet {
    /// Account proposing the transaction (supplies the sequence number).
    pub proposer: String,
    /// Account paying the transaction fee.
    pub payer: String,
    /// Accounts whose storage the transaction may touch.
    pub authorizers: Vec<String>,
}

impl AuthorizationSet {
    /// One account in all three roles.
    pub fn single(address: &str) -> Self {
        Self {
            proposer: address.to_string(),
            payer: address.to_string(),
            authorizers: vec![address.to_string()],
        }
    }
}

// ---------------------------------------------------------------------------
// Transaction Id
// ---------------------------------------------------------------------------

/// Opaque identifier for a submitted transaction.
///
/// Proof of submission only. Whether and when the state change becomes
/// visible to queries is the ledger's business — see
/// [`crate::config::SETTLE_DELAY`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionId(pub String);

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// LedgerClient
// ---------------------------------------------------------------------------

/// The two verbs the core consumes.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Executes a read-only script. Side-effect free; the returned JSON
    /// matches the script's declared return shape.
    async fn query(
        &self,
        script: &str,
        args: Vec<TypedArg>,
    ) -> Result<serde_json::Value, LedgerError>;

    /// Submits a state-changing transaction. Runs to completion or failure
    /// once issued — there is no cancellation path.
    async fn mutate(
        &self,
        script: &str,
        args: Vec<TypedArg>,
        signers: AuthorizationSet,
    ) -> Result<TransactionId, LedgerError>;
}
