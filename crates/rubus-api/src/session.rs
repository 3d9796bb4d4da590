// Session state for the ubus bridge
//
// ubus sessions expire silently: an expired token produces permission
// denials indistinguishable from a real access restriction, so the client
// renews proactively inside a margin of the announced expiry instead of
// reacting to errors.

use std::time::{Duration, Instant};

use serde::Deserialize;

/// How long before the announced expiry a session is considered due for
/// renewal. Matches the router's own session grace window.
pub const RENEWAL_MARGIN: Duration = Duration::from_secs(15);

/// Session lifetime assumed when the login response omits `expires`
/// (the ubus default ACL session timeout).
pub const DEFAULT_SESSION_LIFETIME: Duration = Duration::from_secs(300);

/// Payload of a successful `session`/`login` call.
///
/// A response without `ubus_rpc_session` is a valid terminal state meaning
/// "credentials rejected", not a protocol error.
#[derive(Debug, Deserialize)]
pub struct LoginData {
    #[serde(default)]
    pub ubus_rpc_session: Option<String>,
    /// Remaining lifetime in seconds.
    #[serde(default)]
    pub expires: Option<u64>,
}

/// Mutable session state: token, expiry, and the request-id counter.
///
/// Owned by [`crate::client::UbusClient`] behind a `tokio::sync::Mutex`;
/// all mutation is serialized by that lock.
#[derive(Debug)]
pub(crate) struct Session {
    token: Option<String>,
    expires_at: Option<Instant>,
    next_id: u64,
}

impl Session {
    pub fn new() -> Self {
        Self {
            token: None,
            expires_at: None,
            next_id: 1,
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Whether a (re-)login must happen before the next dispatch.
    ///
    /// True when unauthenticated or when `now` has reached
    /// `expiry − RENEWAL_MARGIN`.
    pub fn needs_renewal(&self, now: Instant) -> bool {
        if self.token.is_none() {
            return true;
        }
        match self.expires_at {
            Some(expires_at) => now + RENEWAL_MARGIN >= expires_at,
            // establish() always records an expiry; a token without one is
            // treated as non-expiring.
            None => false,
        }
    }

    /// Record a fresh token and its expiry instant.
    pub fn establish(&mut self, token: String, lifetime: Duration, now: Instant) {
        self.token = Some(token);
        self.expires_at = Some(now + lifetime);
    }

    /// Drop the token locally. The protocol needs no server-side
    /// invalidation call.
    pub fn clear(&mut self) {
        self.token = None;
        self.expires_at = None;
    }

    /// Allocate the next JSON-RPC id. Increments on every call regardless
    /// of outcome.
    pub fn next_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}
