//! In-memory account directory, session tokens, and the signup/login flow.
//!
//! Provides:
//! - `UserDirectory`: registered accounts, looked up by id or email
//! - `SessionRegistry`: bearer token -> account id
//! - `AuthService`: the only component that reads one and writes the other
//!
//! ## Design Decisions
//! - Nothing is persisted; all state lives for the process lifetime.
//! - Passwords are compared verbatim. Tokens never expire.
//! - Ids and tokens share one generator (`random_alphanumeric`).

pub mod directory;
pub mod service;
pub mod sessions;

pub use directory::{Account, UserDirectory};
pub use service::{AuthError, AuthService};
pub use sessions::SessionRegistry;

use rand::RngExt;

/// Length of generated account ids and session tokens.
pub const ID_LENGTH: usize = 10;

const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Generate a random string of `len` characters drawn uniformly from `[a-zA-Z0-9]`.
pub fn random_alphanumeric(len: usize) -> String {
    let mut rng = rand::rng();
    (0..len)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
        .collect()
}
