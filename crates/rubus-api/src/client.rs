// ubus client: session-aware dispatch and result classification
//
// Wraps the transport with login/renewal and normalizes ubus's
// status-prefixed result arrays. Typed subsystem operations live in
// `subsystems/*` as inherent impls, mirroring how endpoint modules are
// split elsewhere in the workspace.

use secrecy::{ExposeSecret, SecretString};
use serde_json::{Value, json};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, warn};
use url::Url;

use crate::error::Error;
use crate::rpc::{NULL_SESSION, RpcCall, RpcResponse, UbusStatus};
use crate::session::{DEFAULT_SESSION_LIFETIME, LoginData, Session};
use crate::transport::{Transport, TransportConfig};

/// Construction parameters for a [`UbusClient`].
///
/// Plain data supplied by the caller; no environment or file lookup.
#[derive(Debug, Clone)]
pub struct UbusConfig {
    /// Full bridge endpoint, e.g. `http://192.168.1.1/ubus`.
    pub endpoint: Url,
    pub username: String,
    pub password: SecretString,
    pub transport: TransportConfig,
}

impl UbusConfig {
    /// Config for the conventional `http://{host}/ubus` endpoint.
    pub fn for_host(
        host: &str,
        username: impl Into<String>,
        password: SecretString,
    ) -> Result<Self, Error> {
        let endpoint = Url::parse(&format!("http://{host}/ubus"))?;
        Ok(Self {
            endpoint,
            username: username.into(),
            password,
            transport: TransportConfig::default(),
        })
    }
}

/// Async client for one router's ubus bridge.
///
/// Owns the session token, its expiry, and the request-id counter. Every
/// dispatch runs the renewal check first; ubus rejects expired sessions
/// with a plain permission denial, so proactive renewal is the only
/// reliable strategy.
pub struct UbusClient {
    transport: Transport,
    username: String,
    password: SecretString,
    session: Mutex<Session>,
}

impl UbusClient {
    /// Create an unauthenticated client. No I/O happens until
    /// [`connect`](Self::connect) or the first call.
    pub fn new(config: UbusConfig) -> Result<Self, Error> {
        let transport = Transport::new(config.endpoint, &config.transport)?;
        Ok(Self {
            transport,
            username: config.username,
            password: config.password,
            session: Mutex::new(Session::new()),
        })
    }

    /// The bridge endpoint URL.
    pub fn endpoint(&self) -> &Url {
        self.transport.endpoint()
    }

    /// Log in and return the session token.
    ///
    /// `Ok(None)` means the router answered but rejected the credentials
    /// (no `ubus_rpc_session` in the payload) -- a terminal state the
    /// caller must check, not an error.
    pub async fn connect(&self) -> Result<Option<String>, Error> {
        let mut session = self.session.lock().await;
        self.login(&mut session).await
    }

    /// Whether a login has succeeded and not been cleared since.
    pub async fn is_connected(&self) -> bool {
        self.session.lock().await.is_authenticated()
    }

    /// Clear the session token locally. The protocol as used here needs
    /// no server-side invalidation call.
    pub async fn logout(&self) {
        let mut session = self.session.lock().await;
        session.clear();
        debug!("session cleared");
    }

    // ── Fundamental operations ───────────────────────────────────────

    /// Invoke `method` on `subsystem`.
    ///
    /// Benign nonzero ubus status codes (not found, no data, unknown, and
    /// the in-result permission code 6) come back as `Ok(None)` with a
    /// debug log -- ubus overloads "feature unavailable" onto the same
    /// channel as real faults, and sensors should show "unavailable"
    /// rather than crash. JSON-RPC-level errors do raise:
    /// [`Error::PermissionDenied`] or [`Error::Protocol`].
    pub async fn call(
        &self,
        subsystem: &str,
        method: &str,
        args: Option<Value>,
    ) -> Result<Option<Value>, Error> {
        let call = RpcCall::call(subsystem, method, args);
        let (id, token) = self.prepare(1).await.map(|(ids, token)| (ids[0], token))?;

        debug!(subsystem, method, id, "ubus call");
        let response = self.transport.send(&call.envelope(id, &token)).await?;
        classify_call_response(&response, &call)
    }

    /// Enumerate subsystems matching `subsystem` (glob patterns allowed,
    /// e.g. `hostapd.*`). The result is returned as-is: `list` responses
    /// carry no status prefix.
    pub async fn list(&self, subsystem: &str) -> Result<Option<Value>, Error> {
        let call = RpcCall::list(subsystem);
        let (id, token) = self.prepare(1).await.map(|(ids, token)| (ids[0], token))?;

        debug!(subsystem, id, "ubus list");
        let response = self.transport.send(&call.envelope(id, &token)).await?;

        if let Some(err) = &response.error {
            return Err(classify_rpc_error(err));
        }
        Ok(response.result)
    }

    /// Issue several calls in one HTTP round trip.
    ///
    /// Returns per-call results index-aligned with `calls`, each classified
    /// exactly as [`call`](Self::call) would. One deliberate exception:
    /// when the FIRST element of the batch response is a JSON-RPC access
    /// denial, the whole batch is reported as denied -- routers that reject
    /// a batched session stop evaluating the remaining elements, so
    /// per-element classification would fabricate "no data" for calls that
    /// never ran.
    pub async fn batch_call(
        &self,
        calls: &[RpcCall],
    ) -> Result<Vec<Result<Option<Value>, Error>>, Error> {
        if calls.is_empty() {
            return Ok(Vec::new());
        }

        let (ids, token) = self.prepare(calls.len()).await?;
        let envelopes: Vec<Value> = calls
            .iter()
            .zip(&ids)
            .map(|(call, id)| call.envelope(*id, &token))
            .collect();

        debug!(count = calls.len(), "ubus batch call");
        let responses = self.transport.send_batch(&envelopes).await?;

        if let Some(first_err) = responses.first().and_then(|r| r.error.as_ref()) {
            if first_err.is_access_denied() {
                warn!("batch denied on first element; reporting whole batch as denied");
                return Ok(calls
                    .iter()
                    .map(|_| {
                        Err(Error::PermissionDenied {
                            message: first_err.message.clone(),
                        })
                    })
                    .collect());
            }
        }

        let results = calls
            .iter()
            .enumerate()
            .map(|(i, call)| match responses.get(i) {
                Some(response) => classify_call_response(response, call),
                None => Err(Error::Protocol {
                    code: 0,
                    message: format!("batch response missing element {i}"),
                }),
            })
            .collect();
        Ok(results)
    }

    // ── Session plumbing ─────────────────────────────────────────────

    /// Run the renewal check, then allocate `count` request ids and grab
    /// the current token. The session lock is released before any network
    /// send so independent calls can be in flight concurrently.
    async fn prepare(&self, count: usize) -> Result<(Vec<u64>, String), Error> {
        let mut session = self.session.lock().await;

        if session.needs_renewal(Instant::now()) {
            let token = self.login(&mut session).await?;
            if token.is_none() {
                return Err(Error::Authentication {
                    message: format!("login rejected for user {}", self.username),
                });
            }
        }

        let ids = (0..count).map(|_| session.next_id()).collect();
        let token = session
            .token()
            .ok_or(Error::NotConnected)?
            .to_owned();
        Ok((ids, token))
    }

    /// Perform the login call and update the session state.
    ///
    /// Uses the all-zero null session id; the token and an `expires`
    /// duration come back in the result payload. A payload without a token
    /// leaves the session unauthenticated and returns `Ok(None)`.
    async fn login(&self, session: &mut Session) -> Result<Option<String>, Error> {
        let call = RpcCall::call(
            "session",
            "login",
            Some(json!({
                "username": self.username,
                "password": self.password.expose_secret(),
            })),
        );
        let id = session.next_id();

        debug!(username = %self.username, "logging in");
        let response = self.transport.send(&call.envelope(id, NULL_SESSION)).await?;

        if let Some(err) = &response.error {
            return Err(classify_rpc_error(err));
        }

        let Some((code, payload)) = response.split_status() else {
            session.clear();
            return Err(Error::Deserialization {
                message: "login response without status array".into(),
                body: response.result.map(|v| v.to_string()).unwrap_or_default(),
            });
        };

        let status = UbusStatus::classify(code);
        if !status.is_success() {
            debug!(code, status = status.name(), "login refused");
            session.clear();
            return Ok(None);
        }

        let data: LoginData = payload
            .cloned()
            .map(serde_json::from_value)
            .transpose()
            .map_err(|e| Error::Deserialization {
                message: e.to_string(),
                body: String::new(),
            })?
            .unwrap_or(LoginData {
                ubus_rpc_session: None,
                expires: None,
            });

        match data.ubus_rpc_session {
            Some(token) => {
                let lifetime = data
                    .expires
                    .map_or(DEFAULT_SESSION_LIFETIME, Duration::from_secs);
                debug!(lifetime_secs = lifetime.as_secs(), "session established");
                session.establish(token.clone(), lifetime, Instant::now());
                Ok(Some(token))
            }
            None => {
                debug!("login response carried no session token");
                session.clear();
                Ok(None)
            }
        }
    }
}

/// Map a JSON-RPC error object onto the crate error taxonomy.
fn classify_rpc_error(err: &crate::rpc::RpcError) -> Error {
    if err.is_access_denied() {
        Error::PermissionDenied {
            message: err.message.clone(),
        }
    } else {
        Error::Protocol {
            code: err.code,
            message: err.message.clone(),
        }
    }
}

/// Classify one `call`-style response: JSON-RPC errors raise, the ubus
/// status table decides between payload and benign absence.
fn classify_call_response(response: &RpcResponse, call: &RpcCall) -> Result<Option<Value>, Error> {
    if let Some(err) = &response.error {
        return Err(classify_rpc_error(err));
    }

    match response.split_status() {
        Some((code, payload)) => {
            let status = UbusStatus::classify(code);
            if status.is_success() {
                Ok(payload.cloned())
            } else {
                debug!(
                    subsystem = %call.subsystem,
                    method = call.method.as_deref().unwrap_or(""),
                    code,
                    status = status.name(),
                    "ubus returned no data"
                );
                Ok(None)
            }
        }
        // No result at all, or a shape without the status prefix.
        None => Ok(response.result.clone()),
    }
}
