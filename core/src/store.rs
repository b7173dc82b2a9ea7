//! Token storage capability.
//!
//! The session token lives in a single key of some durable key-value store.
//! The store is injected into `Session`, so hosts choose where it persists.
//! An empty stored value reads as "no token".

use std::sync::Mutex;

use crate::error::ApiError;

/// Key under which the session token is persisted.
pub const TOKEN_KEY: &str = "token";

pub trait TokenStore {
    fn get(&self) -> Result<Option<String>, ApiError>;
    fn set(&self, token: &str) -> Result<(), ApiError>;
    fn clear(&self) -> Result<(), ApiError>;
}

/// Process-local store; contents are lost on exit.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        Self {
            token: Mutex::new(Some(token.to_string())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> Result<Option<String>, ApiError> {
        let token = self.token.lock().map_err(|e| ApiError::Storage(e.to_string()))?;
        Ok(token.clone().filter(|t| !t.is_empty()))
    }

    fn set(&self, token: &str) -> Result<(), ApiError> {
        let mut slot = self.token.lock().map_err(|e| ApiError::Storage(e.to_string()))?;
        *slot = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), ApiError> {
        let mut slot = self.token.lock().map_err(|e| ApiError::Storage(e.to_string()))?;
        *slot = None;
        Ok(())
    }
}

impl<S: TokenStore + ?Sized> TokenStore for &S {
    fn get(&self) -> Result<Option<String>, ApiError> {
        (**self).get()
    }

    fn set(&self, token: &str) -> Result<(), ApiError> {
        (**self).set(token)
    }

    fn clear(&self) -> Result<(), ApiError> {
        (**self).clear()
    }
}
