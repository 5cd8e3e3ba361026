// Copyright 2025 the Floorplan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Remote relay envelopes and session bookkeeping.
//!
//! An external process sends [`RelayRequest`] frames through a relay to the
//! editor, which answers each with a [`RelayResponse`]. The editor side keeps
//! one authoritative session in a [`RelayBridge`]; the caller side tracks
//! in-flight ids and deadlines in [`PendingRequests`]. Neither does any I/O.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CommandError;
use crate::scene::Scene;

/// One method call on the wire.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayRequest {
    /// Correlation id chosen by the caller.
    #[serde(alias = "reqId")]
    pub request_id: String,
    /// Method name, e.g. `"furniture.place"`.
    pub method: String,
    /// Parameter object; `null` when absent.
    #[serde(default)]
    pub params: Value,
}

/// The answer to a [`RelayRequest`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayResponse {
    /// Copied from the request.
    #[serde(alias = "reqId")]
    pub request_id: String,
    /// Whether the method succeeded.
    pub ok: bool,
    /// Success payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Failure message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RelayResponse {
    /// A successful response.
    pub fn success(request_id: impl Into<String>, result: Value) -> Self {
        Self {
            request_id: request_id.into(),
            ok: true,
            result: Some(result),
            error: None,
        }
    }

    /// A failed response.
    pub fn failure(request_id: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            ok: false,
            result: None,
            error: Some(error.into()),
        }
    }

    /// Wrap the outcome of a scene method.
    pub fn from_result(request_id: impl Into<String>, result: Result<Value, CommandError>) -> Self {
        match result {
            Ok(v) => Self::success(request_id, v),
            Err(e) => Self::failure(request_id, e.to_string()),
        }
    }
}

/// Why a relayed call did not produce a result.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RelayError {
    /// No editor session is attached.
    #[error("No browser connected")]
    NotConnected,
    /// The session went away while the call was in flight.
    #[error("Browser disconnected")]
    Disconnected,
    /// No answer arrived within the timeout.
    #[error("Timeout waiting for browser response ({method})")]
    Timeout {
        /// Method that timed out.
        method: String,
    },
    /// The editor answered with `ok: false`.
    #[error("{0}")]
    Remote(String),
}

/// Identifies one editor connection.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionId(u64);

impl core::fmt::Display for SessionId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "session#{}", self.0)
    }
}

/// Editor-side session state.
///
/// Only the most recent connection is authoritative. Frames that arrive on a
/// superseded session are dropped, and frames that do not parse as a
/// [`RelayRequest`] are ignored; neither gets a response.
#[derive(Debug, Default)]
pub struct RelayBridge {
    active: Option<SessionId>,
    issued: u64,
    dropped: u64,
}

impl RelayBridge {
    /// A bridge with no session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a new session, superseding any current one.
    pub fn connect(&mut self) -> SessionId {
        self.issued += 1;
        let id = SessionId(self.issued);
        if let Some(old) = self.active.replace(id) {
            log::warn!("relay: {id} supersedes {old}");
        } else {
            log::info!("relay: {id} connected");
        }
        id
    }

    /// Detach `session`. Returns false if it was not the active one.
    pub fn disconnect(&mut self, session: SessionId) -> bool {
        if self.active == Some(session) {
            self.active = None;
            log::info!("relay: {session} disconnected");
            true
        } else {
            false
        }
    }

    /// The authoritative session, if any.
    pub fn active(&self) -> Option<SessionId> {
        self.active
    }

    /// Frames dropped so far, stale or malformed.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Run one request against `scene`.
    pub fn handle(&self, scene: &mut Scene, request: RelayRequest) -> RelayResponse {
        let result = scene.exec(&request.method, request.params);
        RelayResponse::from_result(request.request_id, result)
    }

    /// Handle a raw text frame from `session`.
    ///
    /// Returns the serialized response, or `None` if the frame was dropped:
    /// it came from a superseded session, did not parse, or named no request
    /// id or method.
    pub fn handle_frame(&mut self, scene: &mut Scene, session: SessionId, frame: &str) -> Option<String> {
        if self.active != Some(session) {
            self.dropped += 1;
            log::debug!("relay: dropping frame from superseded {session}");
            return None;
        }
        let request: RelayRequest = match serde_json::from_str(frame) {
            Ok(r) => r,
            Err(err) => {
                self.dropped += 1;
                log::warn!("relay: ignoring malformed frame: {err}");
                return None;
            }
        };
        if request.request_id.is_empty() || request.method.is_empty() {
            self.dropped += 1;
            log::warn!("relay: ignoring frame without a request id or method");
            return None;
        }
        let response = self.handle(scene, request);
        serde_json::to_string(&response).ok()
    }
}

#[derive(Debug)]
struct Pending<T> {
    method: String,
    deadline: Instant,
    waiter: T,
}

/// Caller-side bookkeeping for relayed calls.
///
/// `T` is whatever the host uses to hand a result back to the waiting caller,
/// such as a channel sender. Ids are `r1`, `r2`, ... and are never reused.
/// Every operation that settles a call returns the waiter alongside its
/// outcome; this type never blocks.
#[derive(Debug)]
pub struct PendingRequests<T> {
    timeout: Duration,
    connected: bool,
    next: u64,
    pending: BTreeMap<String, Pending<T>>,
}

/// A waiter and the outcome it should receive.
pub type Settled<T> = (T, Result<Value, RelayError>);

impl<T> PendingRequests<T> {
    /// No session yet; calls fail until [`connect`](Self::connect).
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            connected: false,
            next: 0,
            pending: BTreeMap::new(),
        }
    }

    /// How long a call may stay unanswered.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Whether an editor session is attached.
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// An editor session attached. A replaced session takes its in-flight
    /// calls with it; those are returned as failed.
    pub fn connect(&mut self) -> Vec<Settled<T>> {
        let orphaned = self.reject_all();
        self.connected = true;
        orphaned
    }

    /// The editor session went away; every in-flight call fails.
    pub fn disconnect(&mut self) -> Vec<Settled<T>> {
        self.connected = false;
        self.reject_all()
    }

    fn reject_all(&mut self) -> Vec<Settled<T>> {
        let pending = core::mem::take(&mut self.pending);
        if !pending.is_empty() {
            log::warn!("relay: rejecting {} in-flight call(s)", pending.len());
        }
        pending
            .into_values()
            .map(|p| (p.waiter, Err(RelayError::Disconnected)))
            .collect()
    }

    /// Start a call. Returns the request to send.
    pub fn issue(
        &mut self,
        method: impl Into<String>,
        params: Value,
        waiter: T,
        now: Instant,
    ) -> Result<RelayRequest, RelayError> {
        if !self.connected {
            return Err(RelayError::NotConnected);
        }
        self.next += 1;
        let request = RelayRequest {
            request_id: format!("r{}", self.next),
            method: method.into(),
            params,
        };
        self.pending.insert(
            request.request_id.clone(),
            Pending {
                method: request.method.clone(),
                deadline: now + self.timeout,
                waiter,
            },
        );
        Ok(request)
    }

    /// Match a response to its call. Unknown ids (already expired, or never
    /// issued) return `None`.
    pub fn resolve(&mut self, response: RelayResponse) -> Option<Settled<T>> {
        let Some(p) = self.pending.remove(&response.request_id) else {
            log::debug!("relay: no pending call for {}", response.request_id);
            return None;
        };
        let outcome = if response.ok {
            Ok(response.result.unwrap_or(Value::Null))
        } else {
            Err(RelayError::Remote(
                response
                    .error
                    .unwrap_or_else(|| "Unknown error from browser".to_owned()),
            ))
        };
        Some((p.waiter, outcome))
    }

    /// Fail every call whose deadline is at or before `now`.
    pub fn expire(&mut self, now: Instant) -> Vec<Settled<T>> {
        let due: Vec<String> = self
            .pending
            .iter()
            .filter(|(_, p)| p.deadline <= now)
            .map(|(id, _)| id.clone())
            .collect();
        due.into_iter()
            .filter_map(|id| self.pending.remove(&id).map(|p| (id, p)))
            .map(|(id, p)| {
                log::warn!("relay: {id} ({}) timed out", p.method);
                (p.waiter, Err(RelayError::Timeout { method: p.method }))
            })
            .collect()
    }

    /// Earliest deadline among in-flight calls.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.values().map(|p| p.deadline).min()
    }

    /// Number of in-flight calls.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether nothing is in flight.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_legacy_request_id_key() {
        let req: RelayRequest =
            serde_json::from_str(r#"{"reqId":"r7","method":"scene.info"}"#).unwrap();
        assert_eq!(req.request_id, "r7");
        assert_eq!(req.params, Value::Null);
    }

    #[test]
    fn bridge_drops_superseded_and_malformed_frames() {
        let mut scene = Scene::default();
        let mut bridge = RelayBridge::new();
        let old = bridge.connect();
        let new = bridge.connect();
        assert_eq!(bridge.active(), Some(new));

        let frame = r#"{"requestId":"r1","method":"scene.list_rooms"}"#;
        assert!(bridge.handle_frame(&mut scene, old, frame).is_none());
        assert!(bridge.handle_frame(&mut scene, new, "{not json").is_none());
        assert_eq!(bridge.dropped(), 2);

        for unnamed in [
            r#"{"requestId":"","method":"scene.info"}"#,
            r#"{"reqId":"r9","method":""}"#,
        ] {
            assert!(bridge.handle_frame(&mut scene, new, unnamed).is_none());
        }
        assert_eq!(bridge.dropped(), 4);

        let out = bridge.handle_frame(&mut scene, new, frame).unwrap();
        let resp: RelayResponse = serde_json::from_str(&out).unwrap();
        assert!(resp.ok);
        assert_eq!(resp.result.unwrap().as_array().unwrap().len(), 9);

        assert!(!bridge.disconnect(old));
        assert!(bridge.disconnect(new));
        assert_eq!(bridge.active(), None);
    }

    #[test]
    fn failed_methods_come_back_as_not_ok() {
        let mut scene = Scene::default();
        let bridge = RelayBridge::new();
        let resp = bridge.handle(
            &mut scene,
            RelayRequest {
                request_id: "r1".into(),
                method: "wall.remove".into(),
                params: json!({ "wallId": "w_9" }),
            },
        );
        assert!(!resp.ok);
        assert_eq!(resp.error.as_deref(), Some("Wall not found: w_9"));
        let wire = serde_json::to_value(&resp).unwrap();
        assert!(wire.get("result").is_none());
    }

    #[test]
    fn pending_ids_timeouts_and_disconnects() {
        let t0 = Instant::now();
        let mut p = PendingRequests::new(Duration::from_millis(8000));
        assert_eq!(
            p.issue("scene.info", Value::Null, 0, t0).unwrap_err().to_string(),
            "No browser connected"
        );
        assert!(p.connect().is_empty());

        let a = p.issue("scene.info", Value::Null, 1, t0).unwrap();
        let b = p
            .issue("furniture.move", Value::Null, 2, t0 + Duration::from_secs(5))
            .unwrap();
        assert_eq!((a.request_id.as_str(), b.request_id.as_str()), ("r1", "r2"));

        let expired = p.expire(t0 + Duration::from_millis(8000));
        assert_eq!(expired.len(), 1);
        assert_eq!(expired[0].0, 1);
        assert_eq!(
            expired[0].1.as_ref().unwrap_err().to_string(),
            "Timeout waiting for browser response (scene.info)"
        );
        assert!(p.resolve(RelayResponse::success("r1", json!({}))).is_none());

        let c = p.issue("wall.add", Value::Null, 3, t0).unwrap();
        let (w, outcome) = p
            .resolve(RelayResponse {
                request_id: c.request_id,
                ok: false,
                result: None,
                error: None,
            })
            .unwrap();
        assert_eq!(w, 3);
        assert_eq!(outcome, Err(RelayError::Remote("Unknown error from browser".into())));

        let rejected = p.disconnect();
        assert_eq!(rejected.len(), 1);
        assert_eq!(rejected[0], (2, Err(RelayError::Disconnected)));
        assert!(p.is_empty());
    }
}
