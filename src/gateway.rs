//! Uniform request/response contract with the service-control API.
//!
//! Every call goes through [`Gateway::request`], which classifies the raw
//! response and surfaces failures and soft warnings on the notification
//! queue. Callers only handle their own local recovery.

use std::future::Future;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::model::{Action, ControlKey};
use crate::notify::Notifier;

mod http_client;
pub use self::http_client::HttpTransport;

mod types;
pub use self::types::*;
mod operations;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

/// Every call the client makes, with its method and path template.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Endpoint {
    ListServices,
    Control { target: String, action: Action },
    Status { unit: String },
    Logs { unit: String },
    ReadFile { unit: String },
    WriteFile { unit: String },
}

impl Endpoint {
    pub fn control(key: &ControlKey) -> Self {
        Endpoint::Control {
            target: key.target.clone(),
            action: key.action,
        }
    }

    pub fn method(&self) -> Method {
        match self {
            Endpoint::ListServices
            | Endpoint::Status { .. }
            | Endpoint::Logs { .. }
            | Endpoint::ReadFile { .. } => Method::Get,
            Endpoint::Control { .. } | Endpoint::WriteFile { .. } => Method::Post,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Endpoint::ListServices => "/api/services".to_string(),
            Endpoint::Control { target, action } => {
                format!("/api/services/{}/{}", target, action.as_str())
            }
            Endpoint::Status { unit } => format!("/api/services/{}/status", unit),
            Endpoint::Logs { unit } => format!("/api/services/{}/logs", unit),
            Endpoint::ReadFile { unit } | Endpoint::WriteFile { unit } => {
                format!("/api/services/{}/file", unit)
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ResponseBody {
    Json(Value),
    Unparseable(String),
}

/// What came back over the wire, before any classification.
#[derive(Clone, Debug, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    pub status_text: String,
    pub body: ResponseBody,
}

/// The request never reached the server or never came back.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct TransportError(pub String);

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    #[error("{message}")]
    Transport { message: String },

    #[error("HTTP {status}: {status_text}")]
    Unparseable { status: u16, status_text: String },

    #[error("{message}")]
    Protocol { status: u16, message: String },

    #[error("{message}")]
    Application { message: String },

    #[error("unexpected response payload: {detail}")]
    Decode { detail: String },
}

impl GatewayError {
    pub fn status(&self) -> Option<u16> {
        match self {
            GatewayError::Unparseable { status, .. } | GatewayError::Protocol { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }
}

pub trait Transport: Send + Sync + 'static {
    fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> impl Future<Output = Result<RawResponse, TransportError>> + Send;
}

pub struct Gateway<T> {
    transport: T,
    notifier: Notifier,
}

impl<T: Transport> Gateway<T> {
    pub fn new(transport: T, notifier: Notifier) -> Self {
        Self {
            transport,
            notifier,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub async fn request(
        &self,
        endpoint: &Endpoint,
        body: Option<Value>,
    ) -> Result<Value, GatewayError> {
        let method = endpoint.method();
        let path = endpoint.path();
        tracing::debug!(method = method.as_str(), %path, "api request");

        let outcome = match self.transport.send(method, &path, body.as_ref()).await {
            Ok(resp) => classify(resp),
            Err(err) => Err(GatewayError::Transport { message: err.0 }),
        };

        match outcome {
            Ok(Classified { payload, warning }) => {
                if let Some(w) = warning {
                    tracing::info!(method = method.as_str(), %path, warning = %w, "api warning");
                    self.notifier.warning(w);
                }
                Ok(payload)
            }
            Err(err) => Err(self.surface(method, &path, err)),
        }
    }

    pub(crate) async fn request_as<R: DeserializeOwned>(
        &self,
        endpoint: &Endpoint,
        body: Option<Value>,
    ) -> Result<R, GatewayError> {
        let payload = self.request(endpoint, body).await?;
        serde_json::from_value(payload).map_err(|e| {
            self.surface(
                endpoint.method(),
                &endpoint.path(),
                GatewayError::Decode {
                    detail: e.to_string(),
                },
            )
        })
    }

    fn surface(&self, method: Method, path: &str, err: GatewayError) -> GatewayError {
        tracing::warn!(method = method.as_str(), %path, error = %err, "api request failed");
        self.notifier.error(err.to_string());
        err
    }
}

#[derive(Debug, PartialEq)]
pub(crate) struct Classified {
    pub(crate) payload: Value,
    pub(crate) warning: Option<String>,
}

/// Transport status is checked before the body's own `error` field.
pub(crate) fn classify(resp: RawResponse) -> Result<Classified, GatewayError> {
    let RawResponse {
        status,
        status_text,
        body,
    } = resp;

    let payload = match body {
        ResponseBody::Json(v) => v,
        ResponseBody::Unparseable(_) => {
            return Err(GatewayError::Unparseable {
                status,
                status_text,
            });
        }
    };

    if !(200..300).contains(&status) {
        let message = text_field(&payload, "error")
            .or_else(|| text_field(&payload, "warning"))
            .unwrap_or_else(|| format!("Request failed: {} {}", status, status_text));
        return Err(GatewayError::Protocol { status, message });
    }

    if let Some(message) = text_field(&payload, "error") {
        return Err(GatewayError::Application { message });
    }

    let warning = text_field(&payload, "warning");
    Ok(Classified { payload, warning })
}

fn text_field(payload: &Value, key: &str) -> Option<String> {
    match payload.get(key)? {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
#[path = "tests/gateway_tests.rs"]
mod tests;
