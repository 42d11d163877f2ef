//! Issued bearer tokens.

use super::{random_alphanumeric, ID_LENGTH};
use parking_lot::RwLock;
use std::collections::HashMap;

/// token -> account id. Entries are never removed.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    tokens: RwLock<HashMap<String, String>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint a fresh token for `account_id` and record it.
    pub fn issue(&self, account_id: &str) -> String {
        let token = random_alphanumeric(ID_LENGTH);
        self.tokens
            .write()
            .insert(token.clone(), account_id.to_owned());
        token
    }

    /// Account id the token was issued for, if any.
    pub fn resolve(&self, token: &str) -> Option<String> {
        self.tokens.read().get(token).cloned()
    }

    pub fn len(&self) -> usize {
        self.tokens.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.read().is_empty()
    }
}
