//! Signup and login orchestration over `UserDirectory` and `SessionRegistry`.

use super::{random_alphanumeric, Account, SessionRegistry, UserDirectory, ID_LENGTH};
use parking_lot::Mutex;
use thiserror::Error;

/// Domain failures. All of them are expected outcomes, never faults.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Unauthorized")]
    Unauthenticated,

    #[error("user with that email does not exist")]
    NotFound,

    #[error("user with that email already exists")]
    Conflict,

    /// Intentionally carries no message.
    #[error("")]
    WrongCredentials,
}

/// Owns the account directory and the token registry.
///
/// Built once at startup and shared behind an `Arc`.
#[derive(Debug, Default)]
pub struct AuthService {
    directory: UserDirectory,
    sessions: SessionRegistry,
    /// Serializes the email check + insert of concurrent signups.
    signup_lock: Mutex<()>,
}

impl AuthService {
    pub fn new(directory: UserDirectory, sessions: SessionRegistry) -> Self {
        Self {
            directory,
            sessions,
            signup_lock: Mutex::new(()),
        }
    }

    pub fn directory(&self) -> &UserDirectory {
        &self.directory
    }

    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }

    /// Create an account unless the email is already registered.
    pub fn signup(
        &self,
        email: &str,
        password: &str,
        other_data: serde_json::Value,
    ) -> Result<Account, AuthError> {
        let _guard = self.signup_lock.lock();

        if self.directory.find_by_email(email).is_some() {
            return Err(AuthError::Conflict);
        }

        let account = Account {
            id: random_alphanumeric(ID_LENGTH),
            email: email.to_owned(),
            password: password.to_owned(),
            other_data,
        };
        self.directory.insert(account.clone());
        tracing::info!(account_id = %account.id, "Account created");
        Ok(account)
    }

    /// Check credentials and issue a new bearer token.
    pub fn login(&self, email: &str, password: &str) -> Result<String, AuthError> {
        let Some(account) = self.directory.find_by_email(email) else {
            tracing::warn!("Login failed: {}", AuthError::NotFound);
            return Err(AuthError::NotFound);
        };

        if account.password != password {
            tracing::warn!(account_id = %account.id, "Login failed: wrong password");
            return Err(AuthError::WrongCredentials);
        }

        let token = self.sessions.issue(&account.id);
        tracing::debug!(account_id = %account.id, "Session issued");
        Ok(token)
    }

    /// Resolve a bearer token to the account id it was issued for.
    pub fn authenticate(&self, token: &str) -> Result<String, AuthError> {
        self.sessions
            .resolve(token)
            .ok_or(AuthError::Unauthenticated)
    }
}
