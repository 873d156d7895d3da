//! Random identifier generation for pastes and session tokens.

use rand::distributions::Alphanumeric;
use rand::Rng;

/// Length of public paste identifiers.
pub const PASTE_ID_LEN: usize = 8;

/// Length of bearer session tokens.
pub const SESSION_TOKEN_LEN: usize = 32;

fn alphanumeric(len: usize) -> String {
    // thread_rng is a CSPRNG, suitable for unguessable URL tokens.
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// Generate a random paste id: exactly [`PASTE_ID_LEN`] chars from `[A-Za-z0-9]`.
///
/// Uniqueness is not checked here; the storage layer retries on collision.
pub fn generate_paste_id() -> String {
    alphanumeric(PASTE_ID_LEN)
}

/// Generate a random bearer session token.
pub fn generate_session_token() -> String {
    alphanumeric(SESSION_TOKEN_LEN)
}
