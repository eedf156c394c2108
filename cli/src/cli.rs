//! # CLI Interface
//!
//! Defines the command-line argument structure for `repfi` using `clap`
//! derive. The binary is a one-shot session: each invocation loads the
//! state file, performs one operation against the embedded ledger
//! emulator, and writes the state back.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// RepFi demo session.
///
/// Drives the reputation vault protocol against a local in-memory ledger
/// emulator whose state persists in a JSON file between invocations.
#[derive(Parser, Debug)]
#[command(
    name = "repfi",
    about = "Reputation vaults and credit scoring, demo session",
    version,
    propagate_version = true
)]
pub struct RepfiCli {
    /// Path to the session state file (account, attestation, ledger state).
    #[arg(long, short = 's', env = "REPFI_STATE", default_value = "repfi-state.json")]
    pub state: PathBuf,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands for the RepFi binary.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a fresh session state file for an account.
    Init(InitArgs),
    /// Derive an attestation from a GitHub OAuth authorization code and
    /// attach it to the session.
    Connect(ConnectArgs),
    /// Create the account's reputation vault (idempotent).
    CreateVault,
    /// Mint a reputation token from contribution counts.
    Mint(MintArgs),
    /// List the vault's tokens and summary statistics.
    List,
    /// Show credit offers for every token in the vault.
    Offers,
    /// Validate a borrow request against a token's credit offer.
    Borrow(BorrowArgs),
    /// Print version information and exit.
    Version,
}

/// Arguments for the `init` subcommand.
#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Account address the session acts as.
    #[arg(long, default_value = "0xf8d6e0586b0a20c7")]
    pub account: String,
}

/// Arguments for the `connect` subcommand.
#[derive(Parser, Debug)]
pub struct ConnectArgs {
    /// The OAuth authorization code (or a full callback query string,
    /// e.g. "?code=...&state=...").
    pub code: String,
}

/// Arguments for the `mint` subcommand.
///
/// With no flags, the counts and username come from the attached
/// attestation — the common path after `connect`.
#[derive(Parser, Debug)]
pub struct MintArgs {
    /// GitHub username to mint for. Defaults to the attested username.
    #[arg(long)]
    pub username: Option<String>,

    /// Commit count. Defaults to the attested count.
    #[arg(long)]
    pub commits: Option<u64>,

    /// Pull request count. Defaults to the attested count.
    #[arg(long)]
    pub pull_requests: Option<u64>,

    /// Star count. Defaults to the attested count.
    #[arg(long)]
    pub stars: Option<u64>,
}

/// Arguments for the `borrow` subcommand.
#[derive(Parser, Debug)]
pub struct BorrowArgs {
    /// Token id to borrow against.
    #[arg(long)]
    pub token: u64,

    /// Amount to borrow.
    #[arg(long)]
    pub amount: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli_structure() {
        // Ensures the derive macros produce a valid CLI definition.
        RepfiCli::command().debug_assert();
    }
}
