//! The authentication session: the single owner of the access token.
//!
//! [SessionStore] is the only type that can change the token. Components that
//! need to make authenticated calls receive a [SessionReader], which shares
//! the token but can only read it.

use std::{cell::RefCell, rc::Rc};

use log::info;

use crate::{config::AppConfig, storage};

const TOKEN_KEY: &str = "access_token";

/// Where the token is kept between page loads.
pub trait TokenStorage {
    fn load(&self) -> Option<String>;
    fn store(&self, token: &str);
    fn clear(&self);
}

/// Keeps the token in the browser's local storage.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserTokenStorage;

impl TokenStorage for BrowserTokenStorage {
    fn load(&self) -> Option<String> {
        storage::read_item(TOKEN_KEY)
    }

    fn store(&self, token: &str) {
        storage::write_item(TOKEN_KEY, token);
    }

    fn clear(&self) {
        storage::remove_item(TOKEN_KEY);
    }
}

/// Does not keep the token anywhere, so every page load starts signed out.
#[derive(Debug, Default, Clone, Copy)]
pub struct EphemeralTokenStorage;

impl TokenStorage for EphemeralTokenStorage {
    fn load(&self) -> Option<String> {
        None
    }

    fn store(&self, _token: &str) {}

    fn clear(&self) {}
}

/// Owns the current session token.
pub struct SessionStore {
    token: Rc<RefCell<Option<String>>>,
    storage: Box<dyn TokenStorage>,
}

impl SessionStore {
    /// Create a store, restoring any token the storage already holds.
    pub fn new(storage: Box<dyn TokenStorage>) -> Self {
        let token = storage.load().filter(|token| !token.is_empty());

        Self {
            token: Rc::new(RefCell::new(token)),
            storage,
        }
    }

    /// A store that starts signed out and forgets the token on reload.
    pub fn ephemeral() -> Self {
        Self::new(Box::new(EphemeralTokenStorage))
    }

    pub fn from_config(config: &AppConfig) -> Self {
        if config.persist_session {
            Self::new(Box::new(BrowserTokenStorage))
        } else {
            Self::ephemeral()
        }
    }

    /// Start a session with `token`.
    ///
    /// The token is not inspected, the backend decides whether it is valid on
    /// each request.
    pub fn login(&mut self, token: impl Into<String>) {
        let token = token.into();
        self.storage.store(&token);
        *self.token.borrow_mut() = Some(token);
        info!("session started");
    }

    /// End the session and clear the stored token.
    pub fn logout(&mut self) {
        self.storage.clear();
        self.token.borrow_mut().take();
        info!("session ended");
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.borrow().is_some()
    }

    /// A read-only view of the session for request builders.
    pub fn reader(&self) -> SessionReader {
        SessionReader {
            token: Rc::clone(&self.token),
        }
    }
}

/// Read-only access to the session token.
#[derive(Clone)]
pub struct SessionReader {
    token: Rc<RefCell<Option<String>>>,
}

impl SessionReader {
    pub fn token(&self) -> Option<String> {
        self.token.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.borrow().is_some()
    }
}

impl PartialEq for SessionReader {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.token, &other.token)
    }
}

impl std::fmt::Debug for SessionReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionReader")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}
