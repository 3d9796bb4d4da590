use thiserror::Error;

use crate::category::DataCategory;
use crate::pool::ClientKind;

/// Error type for the cache layer.
///
/// Auth failures keep their identity through the wrapping so callers can
/// stop polling and ask for reconfiguration instead of retrying forever.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Connecting (or logging in) the given client kind failed.
    #[error("failed to connect {kind} ubus client: {source}")]
    Connect {
        kind: ClientKind,
        #[source]
        source: rubus_api::Error,
    },

    /// A category refetch failed and no cached fallback exists.
    #[error("update failed for {category}: {source}")]
    UpdateFailed {
        category: DataCategory,
        #[source]
        source: Box<CoreError>,
    },

    /// An RPC-level failure during a fetch.
    #[error(transparent)]
    Api(#[from] rubus_api::Error),
}

impl CoreError {
    /// Returns `true` if the underlying cause is an auth rejection.
    pub fn is_auth_failure(&self) -> bool {
        match self {
            Self::Connect { source, .. } => source.is_auth_expired(),
            Self::UpdateFailed { source, .. } => source.is_auth_failure(),
            Self::Api(e) => e.is_auth_expired(),
        }
    }
}
