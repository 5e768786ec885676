//! # Tessera
//!
//! `tessera` authenticates users by email and password and hands back a
//! subject (`{"kind": "user", "id": …}`) for downstream session or token
//! layers to consume.
//!
//! ## Credentials
//!
//! - **Argon2id:** Passwords are hashed with a per-credential random salt and
//!   configurable cost. The stored value is a PHC string; the plaintext is
//!   never persisted or logged.
//! - **Register is an upsert:** Registering an existing email replaces its
//!   password hash and keeps the original user id.
//! - **Exact emails:** Emails are opaque keys compared exactly as stored.
//!   Callers that want case-insensitive matching normalize before calling.
//!
//! ## Storage
//!
//! The credential service talks to a [`auth::CredentialStore`]. Postgres is
//! the production store; its `ON CONFLICT` upsert is what serializes
//! concurrent registrations for one email. An in-memory store backs tests and
//! `--dsn memory://`.

pub mod auth;
pub mod cli;
pub mod tessera;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
        assert!(
            GIT_COMMIT_HASH.len() >= 7,
            "GIT_COMMIT_HASH should be at least 7 characters long, got: {GIT_COMMIT_HASH}"
        );
    }
}
