// JSON-RPC wire model for the ubus HTTP bridge
//
// Requests are `{"jsonrpc":"2.0","id":N,"method":"call"|"list","params":[...]}`.
// The session token is injected at envelope-build time, never stored on the
// call itself, so a call can be re-sent verbatim after a session renewal.

use serde::Deserialize;
use serde_json::{Value, json};

/// JSON-RPC protocol version string.
pub const JSONRPC_VERSION: &str = "2.0";

/// The all-zero session id ubus accepts for unauthenticated calls
/// (only the login call itself uses it).
pub const NULL_SESSION: &str = "00000000000000000000000000000000";

/// JSON-RPC error code ubus uses for access denial.
pub const RPC_ACCESS_DENIED: i64 = -32002;

/// The two RPC methods the bridge understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RpcMethod {
    /// Invoke a method on a subsystem: params `[token, subsystem, method, args]`.
    Call,
    /// Enumerate subsystems: params `[token, subsystem]`.
    List,
}

impl RpcMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Call => "call",
            Self::List => "list",
        }
    }
}

/// One pending RPC invocation, independent of session state.
#[derive(Debug, Clone)]
pub struct RpcCall {
    pub rpc_method: RpcMethod,
    /// Target subsystem path, e.g. `system` or `hostapd.wlan0`.
    pub subsystem: String,
    /// Inner method name; only meaningful for [`RpcMethod::Call`].
    pub method: Option<String>,
    /// Argument object; `call` requests with no args send `{}`.
    pub args: Option<Value>,
}

impl RpcCall {
    /// A `call` invocation.
    pub fn call(subsystem: impl Into<String>, method: impl Into<String>, args: Option<Value>) -> Self {
        Self {
            rpc_method: RpcMethod::Call,
            subsystem: subsystem.into(),
            method: Some(method.into()),
            args,
        }
    }

    /// A `list` invocation (subsystem discovery).
    pub fn list(subsystem: impl Into<String>) -> Self {
        Self {
            rpc_method: RpcMethod::List,
            subsystem: subsystem.into(),
            method: None,
            args: None,
        }
    }

    /// Serialize to a full JSON-RPC envelope with the given id and session
    /// token. The token goes in here, at send time, never earlier.
    pub fn envelope(&self, id: u64, token: &str) -> Value {
        let params = match self.rpc_method {
            RpcMethod::Call => {
                let mut p = vec![json!(token), json!(self.subsystem)];
                if let Some(method) = &self.method {
                    p.push(json!(method));
                }
                p.push(self.args.clone().unwrap_or_else(|| json!({})));
                Value::Array(p)
            }
            RpcMethod::List => json!([token, self.subsystem]),
        };

        json!({
            "jsonrpc": JSONRPC_VERSION,
            "id": id,
            "method": self.rpc_method.as_str(),
            "params": params,
        })
    }
}

/// Deserialized JSON-RPC response object.
///
/// ubus is inconsistent about `id` echoing across firmware versions, so it
/// is kept loosely typed and unused for matching; batch responses are
/// index-aligned with the request array instead.
#[derive(Debug, Clone, Deserialize)]
pub struct RpcResponse {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<RpcError>,
}

/// JSON-RPC level error object.
#[derive(Debug, Clone, Deserialize)]
pub struct RpcError {
    pub code: i64,
    #[serde(default)]
    pub message: String,
}

impl RpcError {
    /// Whether this error denotes access denial (code `-32002` or the
    /// literal message some firmwares send instead).
    pub fn is_access_denied(&self) -> bool {
        self.code == RPC_ACCESS_DENIED || self.message.contains("Access denied")
    }
}

impl RpcResponse {
    /// Split a `call` result array `[status, payload?]` into its parts.
    ///
    /// Returns `None` when there is no result or it is not the ubus
    /// status-prefixed array shape.
    pub fn split_status(&self) -> Option<(i64, Option<&Value>)> {
        let arr = self.result.as_ref()?.as_array()?;
        let status = arr.first()?.as_i64()?;
        Some((status, arr.get(1)))
    }
}

/// Semantic classification of a ubus status code.
///
/// ubus prefixes every `call` result with an integer status; `0` is success
/// and the nonzero codes below are the ones the bridge actually emits.
/// Anything else maps to [`UbusStatus::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UbusStatus {
    Success,
    NotFound,
    NoData,
    PermissionDenied,
    Unknown(i64),
}

impl UbusStatus {
    /// Pure table-driven classification.
    pub fn classify(code: i64) -> Self {
        match code {
            0 => Self::Success,
            2 => Self::NotFound,
            3 => Self::NoData,
            6 => Self::PermissionDenied,
            other => Self::Unknown(other),
        }
    }

    pub fn is_success(self) -> bool {
        self == Self::Success
    }

    /// Short name used in debug logs.
    pub fn name(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::NotFound => "not found",
            Self::NoData => "no data",
            Self::PermissionDenied => "permission denied",
            Self::Unknown(_) => "unknown",
        }
    }
}
