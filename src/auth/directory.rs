//! Registered accounts, kept in insertion order.

use parking_lot::RwLock;
use serde::Serialize;

/// A registered account.
///
/// Serialized as `{Id, Email, OtherData}`; the password never leaves the process.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Account {
    pub id: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    /// Arbitrary profile data supplied at signup, never interpreted.
    pub other_data: serde_json::Value,
}

/// In-memory account collection.
///
/// Uniqueness of emails is the caller's responsibility; see `AuthService::signup`.
#[derive(Debug, Default)]
pub struct UserDirectory {
    accounts: RwLock<Vec<Account>>,
}

impl UserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn find_by_id(&self, id: &str) -> Option<Account> {
        self.accounts.read().iter().find(|a| a.id == id).cloned()
    }

    /// Exact, case-sensitive match.
    pub fn find_by_email(&self, email: &str) -> Option<Account> {
        self.accounts
            .read()
            .iter()
            .find(|a| a.email == email)
            .cloned()
    }

    pub fn insert(&self, account: Account) {
        self.accounts.write().push(account);
    }

    pub fn list_all(&self) -> Vec<Account> {
        self.accounts.read().clone()
    }

    pub fn len(&self) -> usize {
        self.accounts.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.read().is_empty()
    }
}
