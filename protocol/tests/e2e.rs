//! End-to-end integration tests for the RepFi protocol.
//!
//! These exercise the full mint lifecycle against the in-memory ledger
//! emulator: vault creation, the identity gate, mint-or-update with its
//! documented duplicate behavior, settling-delay refresh, and credit
//! offers computed from the resulting listings.
//!
//! Each test stands alone with its own ledger. No shared state, no test
//! ordering dependencies, no flaky failures.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use repfi_protocol::attestation::{derive, ActivityStats};
use repfi_protocol::ledger::{
    AuthorizationSet, LedgerClient, LedgerError, MemoryLedger, TransactionId, TypedArg,
};
use repfi_protocol::scoring::{evaluate, request_borrow, BorrowError};
use repfi_protocol::vault::{MintOutcome, MintRequest, VaultClient, VaultError};

const ACCOUNT: &str = "0xf8d6e0586b0a20c7";

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

/// A vault client over a fresh emulator, plus the emulator handle for
/// state inspection.
fn setup() -> (VaultClient<MemoryLedger>, Arc<MemoryLedger>) {
    let ledger = Arc::new(MemoryLedger::new());
    (VaultClient::new(Arc::clone(&ledger)), ledger)
}

fn alice_request() -> MintRequest {
    MintRequest {
        github_username: "alice".to_string(),
        commits: 10,
        pull_requests: 2,
        stars: 1,
    }
}

// ---------------------------------------------------------------------------
// 1. Full Mint Lifecycle
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn full_mint_lifecycle() {
    let (client, _ledger) = setup();

    // No vault yet: listing is empty, not an error.
    let listing = client.list_tokens(ACCOUNT).await.unwrap();
    assert!(listing.tokens.is_empty());
    assert!(listing.malformed.is_empty());

    client.create_vault(ACCOUNT).await.unwrap();
    assert!(client.probe(ACCOUNT).await.unwrap());

    let outcome = client
        .mint_or_update(ACCOUNT, &alice_request(), None)
        .await
        .unwrap();
    assert!(matches!(outcome, MintOutcome::Minted { .. }));

    // The settling delay elapses under paused time without wall-clock cost.
    let listing = client.refresh_after_settle(ACCOUNT).await.unwrap();
    let alices: Vec<_> = listing
        .tokens
        .iter()
        .filter(|t| t.github_username == "alice")
        .collect();
    assert_eq!(alices.len(), 1, "first mint yields exactly one alice token");
    assert!(alices[0].reputation_score > 0);
    assert!(alices[0].created_at > 0);
}

// ---------------------------------------------------------------------------
// 2. Repeat Mint: Presence Guaranteed, Uniqueness Not
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn repeat_mint_supersedes_without_removal() {
    let (client, _ledger) = setup();
    client.create_vault(ACCOUNT).await.unwrap();

    let first = client
        .mint_or_update(ACCOUNT, &alice_request(), None)
        .await
        .unwrap();
    assert!(matches!(first, MintOutcome::Minted { .. }));

    let second = client
        .mint_or_update(ACCOUNT, &alice_request(), None)
        .await
        .unwrap();
    let MintOutcome::Superseded { prior_token_id, tx } = second else {
        panic!("second mint for the same username must report Superseded");
    };
    assert_eq!(prior_token_id, 0);
    assert!(!tx.0.is_empty());

    // The documented gap: the prior token is not removed, so we assert
    // presence of "alice", never a count of one.
    let listing = client.refresh_after_settle(ACCOUNT).await.unwrap();
    assert!(
        listing.latest_for_username("alice").is_some(),
        "an alice token must exist after repeated mints"
    );
    assert!(
        listing
            .tokens
            .iter()
            .filter(|t| t.github_username == "alice")
            .count()
            >= 1
    );
    // latest_for_username resolves duplicates to the newest mint.
    assert_eq!(listing.latest_for_username("alice").unwrap().id, 1);
}

// ---------------------------------------------------------------------------
// 3. Vault Creation Idempotence
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_vault_twice_leaves_one_vault() {
    let (client, ledger) = setup();

    client.create_vault(ACCOUNT).await.unwrap();
    client.create_vault(ACCOUNT).await.unwrap();

    assert!(client.probe(ACCOUNT).await.unwrap());
    assert_eq!(ledger.snapshot().vaults.len(), 1);
}

// ---------------------------------------------------------------------------
// 4. Identity Gate
// ---------------------------------------------------------------------------

#[tokio::test]
async fn identity_mismatch_aborts_before_any_ledger_call() {
    let (client, ledger) = setup();
    client.create_vault(ACCOUNT).await.unwrap();
    let before = ledger.snapshot();

    let attested = derive("some-oauth-code");
    let request = MintRequest {
        github_username: "impostor".to_string(),
        ..alice_request()
    };

    let err = client
        .mint_or_update(ACCOUNT, &request, Some(&attested))
        .await
        .unwrap_err();
    assert!(matches!(err, VaultError::IdentityMismatch(_)));

    // No transaction was submitted: ledger state (including the tx
    // counter) is untouched.
    assert_eq!(ledger.snapshot(), before);
}

#[tokio::test]
async fn attested_mint_with_matching_username_succeeds() {
    let (client, _ledger) = setup();
    client.create_vault(ACCOUNT).await.unwrap();

    let attested = derive("some-oauth-code");
    let request = MintRequest::from_attestation(&attested);

    let outcome = client
        .mint_or_update(ACCOUNT, &request, Some(&attested))
        .await
        .unwrap();
    assert!(matches!(outcome, MintOutcome::Minted { .. }));
}

// ---------------------------------------------------------------------------
// 5. Mint Without a Vault
// ---------------------------------------------------------------------------

#[tokio::test]
async fn mint_without_vault_is_rejected_client_side() {
    let (client, ledger) = setup();

    let err = client
        .mint_or_update(ACCOUNT, &alice_request(), None)
        .await
        .unwrap_err();
    assert!(matches!(err, VaultError::NoVault { .. }));

    // Rejected before submission: no transaction consumed.
    assert_eq!(ledger.snapshot().next_tx, 0);
}

// ---------------------------------------------------------------------------
// 6. Transport Failure Is Surfaced Once
// ---------------------------------------------------------------------------

#[tokio::test]
async fn ledger_unavailable_surfaces_once_and_retry_succeeds() {
    let (client, ledger) = setup();

    ledger.fail_next("connection refused");
    let err = client.create_vault(ACCOUNT).await.unwrap_err();
    assert!(matches!(
        err,
        VaultError::Ledger(LedgerError::Unavailable(_))
    ));
    assert!(ledger.snapshot().vaults.is_empty(), "no state changed");

    // The core never retries on its own; an explicit caller retry works.
    client.create_vault(ACCOUNT).await.unwrap();
    assert!(client.probe(ACCOUNT).await.unwrap());
}

// ---------------------------------------------------------------------------
// 7. Malformed Records Are Isolated
// ---------------------------------------------------------------------------

/// A ledger that claims a vault exists and returns a doctored listing with
/// one good and two bad records.
struct DoctoredLedger;

#[async_trait]
impl LedgerClient for DoctoredLedger {
    async fn query(
        &self,
        script: &str,
        _args: Vec<TypedArg>,
    ) -> Result<serde_json::Value, LedgerError> {
        if script.contains("fun main(address: Address): Bool") {
            return Ok(json!(true));
        }
        Ok(json!({
            "0": { "github": "alice", "score": 1500, "createdAt": 1_700_000_000 },
            "1": { "github": "bob", "createdAt": 1_700_000_050 },
            "2": { "github": "", "score": 300, "createdAt": 1_700_000_060 },
        }))
    }

    async fn mutate(
        &self,
        _script: &str,
        _args: Vec<TypedArg>,
        _signers: AuthorizationSet,
    ) -> Result<TransactionId, LedgerError> {
        Err(LedgerError::Execution("read-only test ledger".to_string()))
    }
}

#[tokio::test]
async fn malformed_records_do_not_poison_the_listing() {
    let client = VaultClient::new(Arc::new(DoctoredLedger));

    let listing = client.list_tokens(ACCOUNT).await.unwrap();
    assert_eq!(listing.tokens.len(), 1);
    assert_eq!(listing.tokens[0].github_username, "alice");
    assert_eq!(listing.malformed.len(), 2);
}

// ---------------------------------------------------------------------------
// 8. Credit Offers from a Real Listing
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn credit_offer_and_borrow_from_minted_token() {
    let (client, _ledger) = setup();
    client.create_vault(ACCOUNT).await.unwrap();

    // Counts chosen to clear the emulator's scoring well past threshold.
    let stats = ActivityStats {
        username: "prolific".to_string(),
        total_contributions: 2000,
        commits: 900,
        pull_requests: 150,
        stars: 300,
        repos: 25,
    };
    client
        .mint_or_update(ACCOUNT, &MintRequest::from_attestation(&stats), Some(&stats))
        .await
        .unwrap();

    let listing = client.refresh_after_settle(ACCOUNT).await.unwrap();
    let token = listing.latest_for_username("prolific").unwrap();

    let offer = evaluate(token.id, token.reputation_score);
    assert!(offer.eligible, "score {} should qualify", token.reputation_score);
    assert!(offer.borrowable_amount >= 200);

    // Borrow at the limit succeeds; one past it fails.
    let record = request_borrow(&offer, offer.borrowable_amount).unwrap();
    assert_eq!(record.token_id, token.id);
    assert!(matches!(
        request_borrow(&offer, offer.borrowable_amount + 1),
        Err(BorrowError::ExceedsLimit { .. })
    ));
}

// ---------------------------------------------------------------------------
// 9. Low-Score Tokens Get No Credit
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn low_score_token_is_ineligible() {
    let (client, _ledger) = setup();
    client.create_vault(ACCOUNT).await.unwrap();

    client
        .mint_or_update(ACCOUNT, &alice_request(), None)
        .await
        .unwrap();

    let listing = client.refresh_after_settle(ACCOUNT).await.unwrap();
    let token = listing.latest_for_username("alice").unwrap();

    // commits=10, prs=2, stars=1 scores far below the 1000 threshold.
    let offer = evaluate(token.id, token.reputation_score);
    assert!(!offer.eligible);
    assert_eq!(offer.borrowable_amount, 0);
}
