pub mod store;

pub use store::{CredentialStore, FileCredentialStore, MemoryCredentialStore, TOKEN_KEY};

use crate::error::ClientError;

/// Owns the active bearer credential and the slot it is persisted in.
///
/// Only `login` and `logout` write; every gateway call reads through a shared
/// reference, so there is exactly one writer by construction.
pub struct AuthContext {
    token: Option<String>,
    store: Box<dyn CredentialStore>,
}

impl AuthContext {
    /// Restores whatever credential the store already holds.
    pub fn load(store: impl CredentialStore + 'static) -> Result<Self, ClientError> {
        let token = store.load()?;
        Ok(Self {
            token,
            store: Box::new(store),
        })
    }

    /// Context with an empty in-memory slot.
    pub fn anonymous() -> Self {
        Self {
            token: None,
            store: Box::new(MemoryCredentialStore::new()),
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn login(&mut self, token: impl Into<String>) -> Result<(), ClientError> {
        let token = token.into();
        self.store.save(&token)?;
        self.token = Some(token);
        tracing::debug!("credential stored");
        Ok(())
    }

    pub fn logout(&mut self) -> Result<(), ClientError> {
        self.token = None;
        self.store.clear()?;
        tracing::debug!("credential cleared");
        Ok(())
    }
}

impl std::fmt::Debug for AuthContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthContext")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}
