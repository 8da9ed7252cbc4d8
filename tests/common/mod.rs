#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use serde_json::{Value, json};
use tokio::sync::oneshot;

use svcdeck::gateway::{Method, RawResponse, ResponseBody, Transport, TransportError};

enum Reply {
    Now(RawResponse),
    Gated(oneshot::Receiver<RawResponse>),
    Down(String),
}

/// In-memory transport answering from per-route scripts. Queued replies are
/// consumed in order; once a route's queue is empty its sticky reply (if
/// any) answers, otherwise the request gets a 404.
#[derive(Default)]
pub struct ScriptedTransport {
    queued: Mutex<HashMap<String, VecDeque<Reply>>>,
    sticky: Mutex<HashMap<String, RawResponse>>,
    sent: Mutex<Vec<(Method, String, Option<Value>)>>,
}

/// Holds a request open until the test releases it.
pub struct Gate {
    tx: oneshot::Sender<RawResponse>,
}

impl Gate {
    pub fn release(self, status: u16, body: Value) {
        let _ = self.tx.send(json_response(status, body));
    }

    pub fn release_raw(self, resp: RawResponse) {
        let _ = self.tx.send(resp);
    }
}

fn route(method: Method, path: &str) -> String {
    format!("{} {}", method.as_str(), path)
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, method: Method, path: &str, reply: Reply) {
        self.queued
            .lock()
            .unwrap()
            .entry(route(method, path))
            .or_default()
            .push_back(reply);
    }

    pub fn reply(&self, method: Method, path: &str, status: u16, body: Value) {
        self.push(method, path, Reply::Now(json_response(status, body)));
    }

    pub fn reply_raw(&self, method: Method, path: &str, resp: RawResponse) {
        self.push(method, path, Reply::Now(resp));
    }

    pub fn fail(&self, method: Method, path: &str, message: &str) {
        self.push(method, path, Reply::Down(message.to_string()));
    }

    pub fn always(&self, method: Method, path: &str, status: u16, body: Value) {
        self.sticky
            .lock()
            .unwrap()
            .insert(route(method, path), json_response(status, body));
    }

    pub fn gate(&self, method: Method, path: &str) -> Gate {
        let (tx, rx) = oneshot::channel();
        self.push(method, path, Reply::Gated(rx));
        Gate { tx }
    }

    pub fn count(&self, method: Method, path: &str) -> usize {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|(m, p, _)| *m == method && p == path)
            .count()
    }

    pub fn sent(&self) -> Vec<(Method, String, Option<Value>)> {
        self.sent.lock().unwrap().clone()
    }
}

impl Transport for ScriptedTransport {
    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<RawResponse, TransportError> {
        self.sent
            .lock()
            .unwrap()
            .push((method, path.to_string(), body.cloned()));

        let key = route(method, path);
        let next = self
            .queued
            .lock()
            .unwrap()
            .get_mut(&key)
            .and_then(|q| q.pop_front());

        match next {
            Some(Reply::Now(resp)) => Ok(resp),
            Some(Reply::Down(msg)) => Err(TransportError(msg)),
            Some(Reply::Gated(rx)) => rx
                .await
                .map_err(|_| TransportError("gate dropped".to_string())),
            None => Ok(self
                .sticky
                .lock()
                .unwrap()
                .get(&key)
                .cloned()
                .unwrap_or_else(|| json_response(404, json!({"error": "no such route"})))),
        }
    }
}

pub fn json_response(status: u16, body: Value) -> RawResponse {
    let status_text = match status {
        200 => "OK",
        207 => "Multi-Status",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "",
    };
    RawResponse {
        status,
        status_text: status_text.to_string(),
        body: ResponseBody::Json(body),
    }
}

pub fn service(unit: &str, active: &str, sub: &str) -> Value {
    json!({
        "unit": unit,
        "load": "loaded",
        "active": active,
        "sub": sub,
        "enabled": "enabled",
        "description": format!("{} daemon", unit.trim_end_matches(".service")),
    })
}

pub const SERVICES: &str = "/api/services";

pub fn control_path(unit: &str, action: &str) -> String {
    format!("/api/services/{}/{}", unit, action)
}

pub fn file_path(unit: &str) -> String {
    format!("/api/services/{}/file", unit)
}
