//! # Attestation — Deriving and Gating External Identities
//!
//! Before an account may mint a reputation token for a GitHub username, we
//! want *some* evidence that the username is theirs. This module holds the
//! two pieces of that story:
//!
//! ```text
//! deriver.rs — turns an OAuth authorization code into ActivityStats
//! gate.rs    — checks a claimed username against the attested one
//! oauth.rs   — builds the GitHub authorize URL, parses the callback
//! ```
//!
//! ## A word of honesty
//!
//! The deriver is a **demo placeholder**. It produces deterministic,
//! reproducible statistics from the code string alone — no call to GitHub,
//! no token exchange, no verification of anything. The gate is client-side
//! advisory: a caller that simply skips the attestation step mints freely.
//! Neither provides an authentication guarantee, and both say so in their
//! own docs. A production replacement keeps the [`ActivityStats`] shape and
//! swaps the derivation for a real verified fetch, leaving everything
//! downstream untouched.

pub mod deriver;
pub mod gate;
pub mod oauth;

pub use deriver::{derive, ActivityStats};
pub use gate::{can_mint, ensure_can_mint, IdentityMismatch};
pub use oauth::{authorize_url, extract_callback_code};
