//! # Cadence Scripts & Transactions
//!
//! The exact four pieces of Cadence the core ever submits. Everything else
//! about the contract — storage layout, score computation, access control —
//! lives ledger-side and is out of our hands.
//!
//! | Builder                     | Verb   | Purpose                             |
//! |-----------------------------|--------|-------------------------------------|
//! | [`probe_vault_capability`]  | query  | Does an account publish a vault?    |
//! | [`list_vault_tokens`]       | query  | Enumerate a vault's tokens          |
//! | [`create_vault_if_absent`]  | mutate | Idempotent vault creation           |
//! | [`mint_and_deposit`]        | mutate | Mint a token and deposit it         |
//!
//! The sources are assembled with the contract import from
//! [`crate::config`], so a redeploy at a different address is a one-line
//! config change.

use crate::config::{self, contract_import};

/// Script: returns `true` iff `address` publishes a vault capability at
/// the well-known public path. Capability absence is the canonical
/// "no vault" signal.
pub fn probe_vault_capability() -> String {
    format!(
        r#"{import}

access(all) fun main(address: Address): Bool {{
    return getAccount(address)
        .capabilities.get<&{contract}.ReputationVault>({public_path})
        .check()
}}
"#,
        import = contract_import(),
        contract = config::CONTRACT_NAME,
        public_path = config::VAULT_PUBLIC_PATH,
    )
}

/// Script: enumerates a vault's tokens as `{id: {github, score, createdAt}}`.
///
/// Panics ledger-side if the vault is absent — callers probe first and map
/// absence to an empty listing before ever running this.
pub fn list_vault_tokens() -> String {
    format!(
        r#"{import}

access(all) fun main(address: Address): {{UInt64: {{String: AnyStruct}}}} {{
    let vaultCap = getAccount(address)
        .capabilities.get<&{contract}.ReputationVault>({public_path})
    let vault = vaultCap.borrow() ?? panic("ReputationVault not found for this address")

    let results: {{UInt64: {{String: AnyStruct}}}} = {{}}
    for id in vault.tokens.keys {{
        if let token = vault.tokens[id] {{
            results[id] = {{
                "github": token.githubUsername,
                "score": token.reputationScore,
                "createdAt": token.createdAt
            }}
        }}
    }}
    return results
}}
"#,
        import = contract_import(),
        contract = config::CONTRACT_NAME,
        public_path = config::VAULT_PUBLIC_PATH,
    )
}

/// Transaction: creates and publishes a vault unless the signer already
/// has one, in which case it logs and succeeds anyway. Idempotence lives
/// ledger-side so that concurrent creates can't race into an error.
pub fn create_vault_if_absent() -> String {
    format!(
        r#"{import}

transaction {{
    prepare(signer: auth(Storage, Capabilities) &Account) {{
        if signer.storage.borrow<auth(Storage) &{contract}.ReputationVault>(from: {storage_path}) == nil {{
            let vault <- {contract}.createVault()
            signer.storage.save(<-vault, to: {storage_path})

            let capability = signer.capabilities.storage.issue<&{contract}.ReputationVault>({storage_path})
            signer.capabilities.publish(capability, at: {public_path})

            log("ReputationVault created")
        }} else {{
            log("ReputationVault already exists")
        }}
    }}
}}
"#,
        import = contract_import(),
        contract = config::CONTRACT_NAME,
        storage_path = config::VAULT_STORAGE_PATH,
        public_path = config::VAULT_PUBLIC_PATH,
    )
}

/// Transaction: mints a reputation token from raw contribution counts and
/// deposits it into the signer's vault. The reputation score is computed
/// by the contract — the core only forwards counts.
///
/// Panics ledger-side if the signer has no vault; the client probes first
/// and surfaces `NoVault` without submitting.
pub fn mint_and_deposit() -> String {
    format!(
        r#"{import}

transaction(githubUsername: String, commits: UInt64, pullRequests: UInt64, stars: UInt64) {{
    prepare(signer: auth(Storage) &Account) {{
        let vaultRef = signer.storage.borrow<auth(Storage) &{contract}.ReputationVault>(
            from: {storage_path}
        ) ?? panic("ReputationVault not found. Please create one first.")

        let token <- {contract}.mintRepToken(
            githubUsername: githubUsername,
            commits: commits,
            pullRequests: pullRequests,
            stars: stars
        )

        vaultRef.deposit(token: <-token)
    }}
}}
"#,
        import = contract_import(),
        contract = config::CONTRACT_NAME,
        storage_path = config::VAULT_STORAGE_PATH,
    )
}
