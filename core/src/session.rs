//! Session lifecycle on top of `ProfileClient`.
//!
//! # Design
//! `Session` owns the three host capabilities (transport, token store,
//! renderer) and is the only place the token is read or written. The
//! session is Anonymous exactly when the store holds no token.
//!
//! Every failure is logged once here and returned to the caller. A failed
//! `check_session` keeps the stored token: a stale token is retried on the
//! next start rather than purged. Nothing guards against two submissions of
//! the same form in a row; each one issues its own request.

use crate::client::ProfileClient;
use crate::error::ApiError;
use crate::http::Transport;
use crate::render::Renderer;
use crate::store::TokenStore;
use crate::types::{AvatarFile, Credentials, UpdateUser, User};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Anonymous,
    Authenticated,
}

pub struct Session<T, S, R> {
    client: ProfileClient,
    transport: T,
    store: S,
    renderer: R,
}

impl<T: Transport, S: TokenStore, R: Renderer> Session<T, S, R> {
    pub fn new(client: ProfileClient, transport: T, store: S, renderer: R) -> Self {
        Self {
            client,
            transport,
            store,
            renderer,
        }
    }

    pub fn client(&self) -> &ProfileClient {
        &self.client
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn state(&self) -> Result<SessionState, ApiError> {
        Ok(match self.store.get()? {
            Some(_) => SessionState::Authenticated,
            None => SessionState::Anonymous,
        })
    }

    /// Restore the session from the stored token, if any, and render the user.
    ///
    /// Returns `Ok(None)` without touching the network when no token is stored.
    pub fn check_session(&mut self) -> Result<Option<User>, ApiError> {
        let token = match self.store.get() {
            Ok(Some(token)) => token,
            Ok(None) => {
                tracing::info!("no token found in storage");
                return Ok(None);
            }
            Err(err) => {
                tracing::error!(error = %err, "could not read token");
                return Err(err);
            }
        };
        match self.client.current_user(&self.transport, &token) {
            Ok(user) => {
                tracing::debug!(username = %user.username, "session restored");
                self.renderer.render(Some(&user));
                Ok(Some(user))
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to fetch user data");
                Err(err)
            }
        }
    }

    /// Log in, persist the issued token and render the returned user.
    pub fn login(&mut self, credentials: &Credentials) -> Result<User, ApiError> {
        let result = match self.client.login(&self.transport, credentials) {
            Ok(result) => result,
            Err(err) => {
                tracing::error!(username = %credentials.username, error = %err, "login failed");
                return Err(err);
            }
        };
        if result.token.is_empty() {
            let err = ApiError::Decode("login response carried an empty token".to_string());
            tracing::error!(username = %credentials.username, error = %err, "login failed");
            return Err(err);
        }
        if let Err(err) = self.store.set(&result.token) {
            tracing::error!(error = %err, "could not persist token");
            return Err(err);
        }
        tracing::info!(username = %result.data.username, "logged in");
        self.renderer.render(Some(&result.data));
        Ok(result.data)
    }

    /// Send the editable profile fields and render the refreshed user.
    pub fn update_profile(&mut self, fields: &UpdateUser) -> Result<User, ApiError> {
        let token = self.require_token()?;
        match self.client.update_profile(&self.transport, fields, &token) {
            Ok(result) => {
                self.renderer.render(Some(&result.data));
                Ok(result.data)
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to update user data");
                Err(err)
            }
        }
    }

    /// Upload a new avatar, then re-fetch the user to pick up the new
    /// avatar reference and render it.
    pub fn upload_avatar(&mut self, file: &AvatarFile) -> Result<User, ApiError> {
        let token = self.require_token()?;
        let uploaded = self
            .client
            .upload_avatar(&self.transport, file, &token)
            .and_then(|_| self.client.current_user(&self.transport, &token));
        match uploaded {
            Ok(user) => {
                self.renderer.render(Some(&user));
                Ok(user)
            }
            Err(err) => {
                tracing::error!(file = %file.file_name, error = %err, "failed to upload avatar");
                Err(err)
            }
        }
    }

    /// Forget the stored token and clear the display.
    pub fn logout(&mut self) -> Result<(), ApiError> {
        if let Err(err) = self.store.clear() {
            tracing::error!(error = %err, "could not clear token");
            return Err(err);
        }
        tracing::info!("logged out");
        self.renderer.render(None);
        Ok(())
    }

    fn require_token(&self) -> Result<String, ApiError> {
        match self.store.get() {
            Ok(Some(token)) => Ok(token),
            Ok(None) => {
                tracing::error!("no token found, log in first");
                Err(ApiError::MissingToken)
            }
            Err(err) => {
                tracing::error!(error = %err, "could not read token");
                Err(err)
            }
        }
    }
}
