// Copyright (c) 2026 RepFi Labs. MIT License.
// See LICENSE for details.

//! # RepFi CLI
//!
//! Entry point for the `repfi` binary: a one-shot demo session that drives
//! the vault protocol against the in-memory ledger emulator. State (the
//! account, the attached attestation, and the emulator's world) persists
//! in a JSON file between invocations, so a `connect`, `create-vault`,
//! `mint`, `offers` sequence behaves like one continuous session.
//!
//! Subcommands:
//!
//! - `init`         — create a fresh session state file
//! - `connect`      — derive an attestation from an OAuth code
//! - `create-vault` — create the account's vault (idempotent)
//! - `mint`         — mint a reputation token
//! - `list`         — list vault tokens and summary
//! - `offers`       — show credit offers per token
//! - `borrow`       — validate a borrow against an offer
//! - `version`      — print build version information

mod cli;
mod logging;

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

use repfi_protocol::attestation::{derive, extract_callback_code, ActivityStats};
use repfi_protocol::ledger::{LedgerSnapshot, MemoryLedger};
use repfi_protocol::scoring::{evaluate, request_borrow};
use repfi_protocol::vault::{MintOutcome, MintRequest, Session, VaultClient};

use cli::{Commands, RepfiCli};
use logging::LogFormat;

/// Everything a session needs to survive between invocations.
#[derive(Debug, Serialize, Deserialize)]
struct SessionState {
    /// The account address this session acts as.
    account: String,
    /// The attestation attached by `connect`, if any.
    attestation: Option<ActivityStats>,
    /// The emulator's full world.
    ledger: LedgerSnapshot,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = RepfiCli::parse();

    let format = LogFormat::from_str_lossy(
        &std::env::var("REPFI_LOG_FORMAT").unwrap_or_default(),
    );
    logging::init_logging("repfi=info,repfi_protocol=info", format);

    match args.command {
        Commands::Init(init) => init_session(&args.state, &init.account),
        Commands::Connect(connect) => connect_github(&args.state, &connect.code),
        Commands::CreateVault => create_vault(&args.state).await,
        Commands::Mint(mint) => mint_token(&args.state, mint).await,
        Commands::List => list_tokens(&args.state).await,
        Commands::Offers => show_offers(&args.state).await,
        Commands::Borrow(borrow) => borrow_against(&args.state, borrow).await,
        Commands::Version => {
            print_version();
            Ok(())
        }
    }
}

// ---------------------------------------------------------------------------
// State File
// ---------------------------------------------------------------------------

fn load_state(path: &Path) -> Result<SessionState> {
    let raw = std::fs::read_to_string(path).with_context(|| {
        format!(
            "failed to read session state {} (run `repfi init` first)",
            path.display()
        )
    })?;
    serde_json::from_str(&raw)
        .with_context(|| format!("corrupt session state {}", path.display()))
}

fn save_state(path: &Path, state: &SessionState) -> Result<()> {
    let raw = serde_json::to_string_pretty(state).context("failed to serialize session state")?;
    std::fs::write(path, raw)
        .with_context(|| format!("failed to write session state {}", path.display()))?;
    Ok(())
}

/// Rebuilds the live objects from persisted state: the emulator from its
/// snapshot, the vault client over it, and a session with the attestation
/// re-attached.
fn restore(state: &SessionState) -> (VaultClient<MemoryLedger>, Arc<MemoryLedger>, Session) {
    let ledger = Arc::new(MemoryLedger::from_snapshot(state.ledger.clone()));
    let client = VaultClient::new(Arc::clone(&ledger));
    let session = Session::new(&state.account);
    if let Some(stats) = &state.attestation {
        session.attach_attestation(stats.clone());
    }
    (client, ledger, session)
}

// ---------------------------------------------------------------------------
// Subcommands
// ---------------------------------------------------------------------------

/// Creates a fresh session state file for an account.
fn init_session(path: &Path, account: &str) -> Result<()> {
    if path.exists() {
        bail!(
            "session state {} already exists; remove it to start over",
            path.display()
        );
    }

    let state = SessionState {
        account: account.to_string(),
        attestation: None,
        ledger: LedgerSnapshot::default(),
    };
    save_state(path, &state)?;

    tracing::info!(account = %account, state = %path.display(), "session initialized");
    println!("Session initialized.");
    println!("  Account : {}", account);
    println!("  State   : {}", path.display());
    Ok(())
}

/// Derives an attestation from an OAuth authorization code (or a full
/// callback query string) and attaches it to the session.
fn connect_github(path: &Path, code: &str) -> Result<()> {
    let mut state = load_state(path)?;

    // Accept either the bare code or the whole "?code=...&state=..." query
    // pasted from the callback URL.
    let code = if code.contains("code=") {
        extract_callback_code(code)
            .context("callback query contains no authorization code")?
    } else {
        code.to_string()
    };

    let stats = derive(&code);
    tracing::info!(username = %stats.username, score_inputs = ?stats, "attestation derived");

    println!("Connected as {}.", stats.username);
    println!("  Contributions : {}", stats.total_contributions);
    println!("  Commits       : {}", stats.commits);
    println!("  Pull requests : {}", stats.pull_requests);
    println!("  Stars         : {}", stats.stars);
    println!("  Repositories  : {}", stats.repos);

    state.attestation = Some(stats);
    save_state(path, &state)
}

/// Creates the account's reputation vault. Safe to repeat.
async fn create_vault(path: &Path) -> Result<()> {
    let mut state = load_state(path)?;
    let (client, ledger, session) = restore(&state);

    let tx = client
        .create_vault(session.address())
        .await
        .context("vault creation failed")?;
    println!("Vault ready for {} (tx {}).", session.address(), tx);

    state.ledger = ledger.snapshot();
    save_state(path, &state)
}

/// Mints a reputation token. Counts default from the attached attestation;
/// flags override individual fields.
async fn mint_token(path: &Path, args: cli::MintArgs) -> Result<()> {
    let mut state = load_state(path)?;
    let (client, ledger, session) = restore(&state);

    let attested = session.attestation();
    let base = attested
        .as_ref()
        .map(MintRequest::from_attestation);

    let request = MintRequest {
        github_username: args
            .username
            .or_else(|| base.as_ref().map(|b| b.github_username.clone()))
            .context("no username given and no attestation attached; run `repfi connect`")?,
        commits: args
            .commits
            .or(base.as_ref().map(|b| b.commits))
            .unwrap_or(0),
        pull_requests: args
            .pull_requests
            .or(base.as_ref().map(|b| b.pull_requests))
            .unwrap_or(0),
        stars: args.stars.or(base.as_ref().map(|b| b.stars)).unwrap_or(0),
    };

    let _guard = session
        .begin("mint")
        .context("a mint is already in flight for this session")?;

    let outcome = client
        .mint_or_update(session.address(), &request, attested.as_ref())
        .await
        .context("mint failed")?;
    session.mark_stale();

    match &outcome {
        MintOutcome::Minted { tx } => {
            println!("Minted a token for {} (tx {}).", request.github_username, tx);
        }
        MintOutcome::Superseded { tx, prior_token_id } => {
            println!(
                "Minted a new token for {} (tx {}); note: prior token #{} remains in the vault.",
                request.github_username, tx, prior_token_id
            );
        }
    }

    // Wait out the settling delay and show the post-mint vault contents.
    println!("Waiting for the ledger to settle...");
    let listing = client
        .refresh_after_settle(session.address())
        .await
        .context("post-mint refresh failed")?;
    session.store_listing(listing.clone());
    print_listing(&listing);

    state.ledger = ledger.snapshot();
    save_state(path, &state)
}

/// Lists the vault's tokens.
async fn list_tokens(path: &Path) -> Result<()> {
    let state = load_state(path)?;
    let (client, _ledger, session) = restore(&state);

    let listing = client
        .list_tokens(session.address())
        .await
        .context("listing failed")?;
    print_listing(&listing);
    Ok(())
}

/// Shows the credit offer for every token in the vault.
async fn show_offers(path: &Path) -> Result<()> {
    let state = load_state(path)?;
    let (client, _ledger, session) = restore(&state);

    let listing = client
        .list_tokens(session.address())
        .await
        .context("listing failed")?;
    if listing.tokens.is_empty() {
        println!("No tokens in the vault; nothing to offer against.");
        return Ok(());
    }

    println!("Credit offers:");
    for token in &listing.tokens {
        let offer = evaluate(token.id, token.reputation_score);
        if offer.eligible {
            println!(
                "  #{:<4} {:<20} score {:<8} borrowable {}",
                token.id, token.github_username, token.reputation_score, offer.borrowable_amount
            );
        } else {
            println!(
                "  #{:<4} {:<20} score {:<8} not eligible",
                token.id, token.github_username, token.reputation_score
            );
        }
    }
    Ok(())
}

/// Validates a borrow request against a token's offer and prints the
/// resulting loan terms.
async fn borrow_against(path: &Path, args: cli::BorrowArgs) -> Result<()> {
    let state = load_state(path)?;
    let (client, _ledger, session) = restore(&state);

    let listing = client
        .list_tokens(session.address())
        .await
        .context("listing failed")?;
    let token = listing
        .tokens
        .iter()
        .find(|t| t.id == args.token)
        .with_context(|| format!("no token #{} in the vault", args.token))?;

    let offer = evaluate(token.id, token.reputation_score);
    let record = request_borrow(&offer, args.amount)
        .with_context(|| format!("borrow rejected for token #{}", args.token))?;

    println!("Borrow accepted against token #{}.", record.token_id);
    println!("  Amount    : {}", record.amount);
    println!(
        "  Terms     : {} days at {} bps",
        record.terms.term_days, record.terms.interest_rate_bps
    );
    println!("  Due       : {}", record.due_at.format("%Y-%m-%d %H:%M UTC"));
    println!("  Total due : {}", record.total_due());
    Ok(())
}

/// Prints version information to stdout.
fn print_version() {
    println!("repfi    {}", env!("CARGO_PKG_VERSION"));
    println!("contract {}", repfi_protocol::config::CONTRACT_NAME);
}

// ---------------------------------------------------------------------------
// Output Helpers
// ---------------------------------------------------------------------------

fn print_listing(listing: &repfi_protocol::vault::TokenListing) {
    if listing.tokens.is_empty() {
        println!("Vault is empty.");
    } else {
        println!("Tokens:");
        for token in &listing.tokens {
            println!(
                "  #{:<4} {:<20} score {:<8} minted {}",
                token.id, token.github_username, token.reputation_score, token.created_at
            );
        }
        let summary = listing.summary();
        println!(
            "  {} token(s), total reputation {}, average {}",
            summary.total_tokens, summary.total_reputation, summary.average_score
        );
    }
    for bad in &listing.malformed {
        println!("  (skipped malformed record {}: {})", bad.id, bad.reason);
    }
}
