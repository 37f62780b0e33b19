//! # CoachIQ (coaching platform core)
//!
//! `coachiq` carries the two stateful pieces of the coaching platform:
//!
//! ## Authentication API
//!
//! A small JSON-over-HTTP service (`api`) for account registration, login and
//! session verification. Users live in a [`store::UserStore`]; the default
//! backend is a single JSON array file that is read and rewritten wholesale.
//! Passwords are hashed with Argon2id and sessions are stateless HS256 tokens
//! that expire 24 hours after issue. There is no session table, so a token
//! cannot be revoked before it expires.
//!
//! Credential failures are uniform: an unknown email and a wrong
//! password both answer `401 Invalid email or password`.
//!
//! ## Client State
//!
//! [`state::ClientState`] is the process-wide container the front end works
//! against: coach profile, coaching configuration, roster, player profiles,
//! recruiting board and the assistant dialogue. Every mutation of a persisted
//! slot is written through to a [`state::SlotStorage`] immediately.

pub mod api;
pub mod auth;
pub mod cli;
pub mod state;
pub mod store;

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
    }
}
