//! # Protocol Configuration & Constants
//!
//! Every magic number in RepFi lives here. If you're hardcoding a constant
//! somewhere else, you're doing it wrong and you owe the team coffee.
//!
//! Most of these values are contractual: the credit formula constants feed
//! directly into user-visible credit limits, and the Cadence paths must match
//! what the on-chain contract actually publishes. Change with care.

use std::time::Duration;

// ---------------------------------------------------------------------------
// Ledger Contract
// ---------------------------------------------------------------------------

/// Name of the on-chain contract the protocol talks to. Every script and
/// transaction we submit starts with `import ReputationFi from ...`.
pub const CONTRACT_NAME: &str = "ReputationFi";

/// Address the contract is deployed at. `0x06` is the emulator's service
/// account slot; on testnet/mainnet this becomes a real 16-hex-digit address.
pub const CONTRACT_ADDRESS: &str = "0x06";

/// Public capability path where a vault publishes its read-only surface.
/// Absence of a capability at this path is the canonical "no vault" signal —
/// it is a state, not an error.
pub const VAULT_PUBLIC_PATH: &str = "/public/ReputationVault";

/// Private storage path where the vault resource itself lives. Only the
/// account's own authorized transactions can borrow from here.
pub const VAULT_STORAGE_PATH: &str = "/storage/ReputationVault";

/// Compute limit attached to every mutate transaction. Vault operations are
/// tiny; 100 units is generous.
pub const TX_COMPUTE_LIMIT: u64 = 100;

/// How long to wait after a successful mutate before re-querying the vault.
/// This is a settling heuristic, not a finality guarantee — the ledger gives
/// us a transaction ID back, not a confirmation that the state is visible.
pub const SETTLE_DELAY: Duration = Duration::from_secs(5);

// ---------------------------------------------------------------------------
// Credit Scoring
// ---------------------------------------------------------------------------

/// Minimum reputation score required for credit eligibility. Below this,
/// the borrowable amount is zero, full stop.
pub const MIN_SCORE_THRESHOLD: u64 = 1000;

/// Base amount every eligible borrower starts from.
pub const CREDIT_BASE_AMOUNT: u64 = 100;

/// Multiplier applied to the logarithmic term of the credit formula.
pub const CREDIT_SCALE_FACTOR: f64 = 0.5;

/// Offset added to `score - MIN_SCORE_THRESHOLD` before taking the log.
/// Keeps the log argument at 100 or above right at the eligibility boundary,
/// so the curve starts smooth instead of diving toward negative infinity.
pub const CREDIT_LOG_OFFSET: u64 = 100;

// ---------------------------------------------------------------------------
// Loan Terms
// ---------------------------------------------------------------------------

/// Loan term attached to every accepted borrow. Short-term developer
/// funding, not a mortgage.
pub const LOAN_TERM_DAYS: u32 = 7;

/// Interest rate in basis points. 1 bp = 0.01%, so 500 bps = 5.00%.
/// Basis points keep interest arithmetic in integers end to end.
pub const LOAN_INTEREST_RATE_BPS: u32 = 500;

// ---------------------------------------------------------------------------
// Attestation Bands
// ---------------------------------------------------------------------------
//
// The demo attestation deriver maps an authorization code onto plausible
// activity magnitudes. Each statistic is `BASE + (code_sum % MOD)`, keeping
// values inside a small non-negative band. These are cosmetic magnitudes,
// not measured truth.

/// Modulus for the numeric suffix of the derived username.
pub const USERNAME_MOD: u64 = 1000;

/// Total contributions band: 500..2000.
pub const CONTRIBUTIONS_BASE: u64 = 500;
pub const CONTRIBUTIONS_MOD: u64 = 1500;

/// Commits band: 350..1250.
pub const COMMITS_BASE: u64 = 350;
pub const COMMITS_MOD: u64 = 900;

/// Pull requests band: 75..225.
pub const PULL_REQUESTS_BASE: u64 = 75;
pub const PULL_REQUESTS_MOD: u64 = 150;

/// Stars band: 120..420.
pub const STARS_BASE: u64 = 120;
pub const STARS_MOD: u64 = 300;

/// Repositories band: 12..32.
pub const REPOS_BASE: u64 = 12;
pub const REPOS_MOD: u64 = 20;

// ---------------------------------------------------------------------------
// GitHub OAuth
// ---------------------------------------------------------------------------

/// GitHub's OAuth authorization endpoint.
pub const GITHUB_AUTHORIZE_URL: &str = "https://github.com/login/oauth/authorize";

/// The only scope we ask for. Reading the user's public profile is enough
/// to anchor an identity; we have no business with repo contents.
pub const GITHUB_OAUTH_SCOPE: &str = "read:user";

// ---------------------------------------------------------------------------
// Utility
// ---------------------------------------------------------------------------

/// Returns the `import` line shared by every script and transaction.
pub fn contract_import() -> String {
    format!("import {} from {}", CONTRACT_NAME, CONTRACT_ADDRESS)
}
