// Copyright (c) 2026 RepFi Labs. MIT License.
// See LICENSE for details.

//! # RepFi Protocol — Core Library
//!
//! RepFi turns attested developer activity into on-ledger reputation
//! tokens and derives short-term credit lines from the resulting scores.
//! This crate is the part with actual invariants: the vault protocol, the
//! credit formula, the attestation derivation, and the identity gate.
//! Rendering, wallet buttons, and everything else cosmetic live elsewhere
//! and are welcome to stay there.
//!
//! ## Architecture
//!
//! The modules mirror the data flow of a mint:
//!
//! - **attestation** — OAuth code in, [`ActivityStats`](attestation::ActivityStats)
//!   out, plus the identity gate that checks a claimed username against it.
//! - **ledger** — the two-verb seam (`query`/`mutate`) to the external
//!   ledger, the four Cadence sources we submit, and an in-memory emulator.
//! - **vault** — the mint/update/query protocol, token parsing, and the
//!   explicit session object.
//! - **scoring** — reputation score in, credit offer out; borrow
//!   validation and loan terms.
//! - **config** — every constant, with rationale.
//!
//! ## Design Philosophy
//!
//! 1. The ledger owns all state; we hold read-through copies and treat
//!    them as stale the moment we mutate.
//! 2. Reads are partial-failure tolerant; one bad record never takes down
//!    a listing.
//! 3. Observed contract behavior is reproduced honestly — including the
//!    duplicate-mint wart — and documented where it bites.
//! 4. If it computes money, it has pinned-value tests.

pub mod attestation;
pub mod config;
pub mod ledger;
pub mod scoring;
pub mod vault;
