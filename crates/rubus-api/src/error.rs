use thiserror::Error;

/// Top-level error type for the `rubus-api` crate.
///
/// Covers every failure mode of the ubus HTTP bridge: authentication,
/// transport, JSON-RPC protocol errors, and payload decoding.
/// `rubus-core` wraps these into per-category update failures.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Login failed or the router returned no session token.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// An operation was attempted without a live session.
    #[error("Not connected -- call connect() first")]
    NotConnected,

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout).
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx HTTP status from the ubus endpoint.
    #[error("HTTP error status {status}")]
    Http { status: u16 },

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ── JSON-RPC / ubus protocol ────────────────────────────────────
    /// The router denied access at the JSON-RPC level (code -32002 or an
    /// "Access denied" message). Distinguished from [`Error::Protocol`]
    /// because many subsystems are legitimately restricted per-router and
    /// callers must not treat that as a connectivity fault.
    #[error("Permission denied: {message}")]
    PermissionDenied { message: String },

    /// Any other JSON-RPC error object returned by the router.
    #[error("ubus protocol error {code}: {message}")]
    Protocol { code: i64, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this error indicates auth has expired or was
    /// rejected, and re-authentication might resolve it.
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::Authentication { .. } | Self::NotConnected)
    }

    /// Returns `true` if this is a transient error worth retrying at a
    /// higher layer (the crate itself never retries).
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Http { status } => *status >= 500,
            _ => false,
        }
    }

    /// Returns `true` if access was denied at the JSON-RPC level.
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, Self::PermissionDenied { .. })
    }
}
