//! Identity Provider collaborator.
//!
//! The gateway never looks up "the current user" on its own. Callers pass a
//! [`TokenProvider`] (or a token snapshot) into every fetch.

use std::fmt::{Debug, Display, Formatter};

use tokio::sync::watch;

/// Short-lived credential proving the caller's identity.
///
/// Not `Serialize`. `Debug` and `Display` redact the value; the raw token is
/// only read when the `Authorization` header is built.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    /// Wrap a raw token. Blank input means "no token".
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self(trimmed.to_owned()))
    }

    /// Extract the token from an `Authorization: Bearer <token>` header value.
    pub fn from_authorization_header(value: &str) -> Option<Self> {
        value.strip_prefix("Bearer ").and_then(Self::new)
    }

    pub(crate) fn expose(&self) -> &str {
        &self.0
    }
}

impl Debug for BearerToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("BearerToken(<redacted>)")
    }
}

impl Display for BearerToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("<redacted>")
    }
}

/// Current-token lookup exposed by the Identity Provider.
pub trait TokenProvider: Send + Sync {
    /// Token for the currently authenticated principal, if any.
    fn current_token(&self) -> Option<BearerToken>;
}

/// Provider that always hands out the same token, or none.
#[derive(Debug, Clone, Default)]
pub struct StaticTokenProvider {
    token: Option<BearerToken>,
}

impl StaticTokenProvider {
    pub fn new(token: Option<BearerToken>) -> Self {
        Self { token }
    }

    /// Read the token from an environment variable; unset or blank means signed out.
    pub fn from_env(var: &str) -> Self {
        Self::new(std::env::var(var).ok().and_then(BearerToken::new))
    }
}

impl TokenProvider for StaticTokenProvider {
    fn current_token(&self) -> Option<BearerToken> {
        self.token.clone()
    }
}

/// Signed-in state as seen by subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    SignedIn,
    SignedOut,
}

/// Mutable session owned by the identity layer.
#[derive(Debug)]
pub struct IdentitySession {
    token: watch::Sender<Option<BearerToken>>,
}

impl IdentitySession {
    pub fn signed_out() -> Self {
        let (token, _) = watch::channel(None);
        Self { token }
    }

    pub fn signed_in(token: BearerToken) -> Self {
        let session = Self::signed_out();
        session.sign_in(token);
        session
    }

    pub fn sign_in(&self, token: BearerToken) {
        self.token.send_replace(Some(token));
    }

    pub fn sign_out(&self) {
        self.token.send_replace(None);
    }

    pub fn state(&self) -> AuthState {
        auth_state(&self.token.borrow())
    }

    /// Subscribe to sign-in / sign-out transitions.
    pub fn on_auth_state_change(&self) -> AuthStateReceiver {
        AuthStateReceiver {
            inner: self.token.subscribe(),
        }
    }
}

impl Default for IdentitySession {
    fn default() -> Self {
        Self::signed_out()
    }
}

impl TokenProvider for IdentitySession {
    fn current_token(&self) -> Option<BearerToken> {
        self.token.borrow().clone()
    }
}

/// Subscription handle that reports auth state without exposing the token.
#[derive(Debug)]
pub struct AuthStateReceiver {
    inner: watch::Receiver<Option<BearerToken>>,
}

impl AuthStateReceiver {
    pub fn state(&self) -> AuthState {
        auth_state(&self.inner.borrow())
    }

    /// Wait for the next transition. Returns `None` once the session is dropped.
    pub async fn changed(&mut self) -> Option<AuthState> {
        self.inner.changed().await.ok()?;
        Some(auth_state(&self.inner.borrow_and_update()))
    }
}

fn auth_state(token: &Option<BearerToken>) -> AuthState {
    if token.is_some() {
        AuthState::SignedIn
    } else {
        AuthState::SignedOut
    }
}
