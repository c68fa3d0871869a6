// stockyard/src/session.rs

//! Explicit authentication session handed to sources that talk to the backend.
//!
//! Clones share state: invalidating the session from the HTTP source (on a
//! 401) is immediately visible to whoever else holds it.

use crate::core::Shared;
use tracing::{event, Level};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
  pub token: Option<String>,
  /// Set when the backend rejected the token; cleared by the next sign-in.
  pub invalidated: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Session(Shared<SessionState>);

impl Session {
  pub fn anonymous() -> Self {
    Self::default()
  }

  pub fn with_token(token: impl Into<String>) -> Self {
    let session = Self::anonymous();
    session.sign_in(token);
    session
  }

  pub fn sign_in(&self, token: impl Into<String>) {
    let mut state = self.0.write();
    state.token = Some(token.into());
    state.invalidated = false;
    event!(Level::DEBUG, "Session signed in.");
  }

  pub fn sign_out(&self) {
    let mut state = self.0.write();
    state.token = None;
    state.invalidated = false;
    event!(Level::DEBUG, "Session signed out.");
  }

  /// Drops the token after the backend refused it.
  pub fn invalidate(&self) {
    let mut state = self.0.write();
    if state.token.take().is_some() {
      event!(Level::WARN, "Session token rejected by backend; session invalidated.");
    }
    state.invalidated = true;
  }

  pub fn bearer(&self) -> Option<String> {
    self.0.read().token.clone()
  }

  pub fn is_authenticated(&self) -> bool {
    self.0.read().token.is_some()
  }

  pub fn was_invalidated(&self) -> bool {
    self.0.read().invalidated
  }
}
