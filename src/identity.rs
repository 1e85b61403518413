// Account identifier derivation from credential tokens.

use sha2::{Digest, Sha256};

/// Length of a derived account id, in hex characters.
pub const ACCOUNT_ID_LEN: usize = 12;

/// Derive the stable account id for a credential token.
///
/// The id is the first 12 hex characters of the token's SHA-256 digest, so the
/// same token always maps to the same account.
pub fn derive_account_id(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    let mut id = hex::encode(hasher.finalize());
    id.truncate(ACCOUNT_ID_LEN);
    id
}

/// Short, log-safe prefix of a credential.
pub fn redact(token: &str) -> String {
    let prefix: String = token.chars().take(6).collect();
    format!("{prefix}...")
}
