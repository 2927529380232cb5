//! Wire types shared by the Tidas client operations.
//!
//! The Tidas API speaks a small JSON envelope protocol: every call carries
//! the application name plus an opaque identity payload, and every response
//! is an outcome envelope with `success`, the effective `tidas_id`, optional
//! provider `data`, and a structured `error` on negative outcomes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// -- Outbound -----------------------------------------------------------------

/// Outbound call envelope for enrollment and validation.
///
/// `data` is the caller's payload forwarded exactly as received; nothing in
/// this crate inspects or rewrites it. `tidas_id` is omitted from the wire
/// when absent so the provider assigns one.
#[derive(Debug, Clone, Serialize)]
pub struct CallEnvelope<'a> {
    /// Application name the API key is scoped to.
    pub application: &'a str,
    /// Opaque identity payload (the caller's `tidasBlob`).
    pub data: &'a Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tidas_id: Option<&'a str>,
}

/// Options for [`crate::TidasClient::enroll`].
#[derive(Debug, Clone, Default)]
pub struct EnrollOptions {
    /// Caller-chosen identifier to enroll under. When `None` the provider
    /// assigns one and echoes it back in the result.
    pub tidas_id: Option<String>,
}

// -- Inbound ------------------------------------------------------------------

/// Structured form of a remote-reported failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceFault {
    /// Machine-readable error name, when the provider supplies one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Human-readable message.
    #[serde(default)]
    pub message: String,
}

impl ServiceFault {
    /// Parse a raw remote error body into a fault.
    ///
    /// The provider usually sends `{"error":{"code","message"}}`; bare
    /// `{"error":"..."}` and `{"message":"..."}` bodies also occur. Anything
    /// else is carried verbatim as the message so no remote detail is
    /// silently dropped.
    pub fn from_body(body: &str) -> Self {
        if let Ok(value) = serde_json::from_str::<Value>(body) {
            if let Some(err) = value.get("error") {
                if err.is_object() {
                    if let Ok(fault) = serde_json::from_value::<ServiceFault>(err.clone()) {
                        if fault.code.is_some() || !fault.message.is_empty() {
                            return fault;
                        }
                    }
                }
                if let Some(msg) = err.as_str() {
                    return Self {
                        code: None,
                        message: msg.to_string(),
                    };
                }
            }
            if let Some(msg) = value.get("message").and_then(Value::as_str) {
                return Self {
                    code: None,
                    message: msg.to_string(),
                };
            }
        }
        let trimmed = body.trim();
        Self {
            code: None,
            message: if trimmed.is_empty() {
                "no error detail provided".to_string()
            } else {
                trimmed.to_string()
            },
        }
    }
}

impl std::fmt::Display for ServiceFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.code, self.message.is_empty()) {
            (Some(code), false) => write!(f, "{code}: {}", self.message),
            (Some(code), true) => write!(f, "{code}"),
            (None, false) => write!(f, "{}", self.message),
            (None, true) => write!(f, "unspecified service fault"),
        }
    }
}

/// Outcome of a Tidas identity operation.
///
/// A deserialized provider envelope, re-serialized as-is by consumers that
/// proxy it onward. `success: false` with an `error` fault is a completed
/// negative outcome (e.g. a validation mismatch), not a call failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentityResult {
    /// Whether the operation succeeded from the provider's point of view.
    pub success: bool,
    /// Effective identifier: echoes the caller's on enrollment with an
    /// explicit id, otherwise the provider-assigned one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tidas_id: Option<String>,
    /// Provider-owned result payload, passed through untouched.
    #[serde(rename = "data", default, skip_serializing_if = "Value::is_null")]
    pub payload: Value,
    /// Remote-reported fault on negative outcomes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ServiceFault>,
}
