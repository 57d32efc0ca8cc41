//! Response classification.
//!
//! Maps a raw transport outcome to exactly one [`ApiResult`] variant. Pure:
//! never touches the staleness watermarks or the session cache.

use reqwest::StatusCode;
use serde_json::Value;

use crate::api::Envelope;

use super::result::ApiResult;

/// What came back from the network for one call.
#[derive(Debug, Clone)]
pub enum RawOutcome {
    /// The timeout bound elapsed before a response arrived.
    TimedOut,
    /// No response was received (connect failure, DNS, reset).
    Transport(String),
    /// A response was received. `body` holds the read error text if the body
    /// could not be read.
    Response {
        status: u16,
        body: Result<Vec<u8>, String>,
    },
}

impl RawOutcome {
    pub fn status(&self) -> Option<u16> {
        match self {
            RawOutcome::Response { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True for outcomes worth surfacing even when discarded as stale.
    pub fn is_failure(&self) -> bool {
        match self {
            RawOutcome::TimedOut => false,
            RawOutcome::Transport(_) => true,
            RawOutcome::Response { status, body } => *status >= 500 || body.is_err(),
        }
    }
}

/// Classify a raw outcome into a result with an untyped JSON payload.
pub fn classify(outcome: &RawOutcome) -> ApiResult<Value> {
    match outcome {
        RawOutcome::TimedOut | RawOutcome::Transport(_) => ApiResult::Timeout,
        RawOutcome::Response { status, body } if (200..300).contains(status) => {
            classify_success(*status, body)
        }
        RawOutcome::Response { status, body } => {
            let message = failure_message(*status, body);
            if (400..500).contains(status) {
                ApiResult::ClientError {
                    code: *status,
                    message,
                }
            } else {
                ApiResult::ServerError {
                    code: *status,
                    message,
                }
            }
        }
    }
}

fn classify_success(status: u16, body: &Result<Vec<u8>, String>) -> ApiResult<Value> {
    let bytes = match body {
        Ok(bytes) => bytes,
        Err(e) => {
            return ApiResult::ServerError {
                code: status,
                message: e.clone(),
            };
        }
    };

    if bytes.iter().all(u8::is_ascii_whitespace) {
        return ApiResult::Success(Value::Null);
    }

    match serde_json::from_slice::<Envelope>(bytes) {
        Ok(envelope) => ApiResult::Success(envelope.data.unwrap_or(Value::Null)),
        Err(e) => ApiResult::ServerError {
            code: status,
            message: format!("invalid response body: {e}"),
        },
    }
}

/// Pick the most specific failure message available.
fn failure_message(status: u16, body: &Result<Vec<u8>, String>) -> String {
    let bytes = match body {
        Ok(bytes) => bytes,
        Err(e) => return e.clone(),
    };

    if let Ok(envelope) = serde_json::from_slice::<Envelope>(bytes) {
        if let Some(message) = envelope.message.filter(|m| !m.is_empty()) {
            return message;
        }
        match envelope.detail {
            Some(Value::String(detail)) if !detail.is_empty() => return detail,
            Some(Value::Null) | None => {}
            Some(detail) => return detail.to_string(),
        }
    }

    let text = String::from_utf8_lossy(bytes);
    let text = text.trim();
    if !text.is_empty() {
        return text.to_string();
    }

    StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .map(str::to_string)
        .unwrap_or_else(|| format!("HTTP {}", status))
}
