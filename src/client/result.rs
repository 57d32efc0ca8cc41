//! Normalized outcome of an API call.

use serde::de::DeserializeOwned;
use serde_json::Value;

/// Numeric status codes surfaced to callers.
///
/// Wire codes mirror HTTP. `TIMEOUT` and `SUPERSEDED` are synthetic and never
/// sent over the wire.
pub struct ApiStatus;

impl ApiStatus {
    pub const OK: i32 = 200;
    pub const CREATED: i32 = 201;
    pub const BAD_REQUEST: i32 = 400;
    pub const UNAUTHORIZED: i32 = 401;
    pub const FORBIDDEN: i32 = 403;
    pub const NOT_FOUND: i32 = 404;
    pub const CONFLICT: i32 = 409;
    pub const INTERNAL_ERROR: i32 = 500;
    pub const TIMEOUT: i32 = -1;
    pub const SUPERSEDED: i32 = -2;
}

/// Result of one logical API operation.
///
/// Exactly one variant is active; only `Success` carries a payload.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub enum ApiResult<T> {
    Success(T),
    /// 4xx: bad input, missing auth, not found, conflict.
    ClientError { code: u16, message: String },
    /// 5xx or any other non-success status.
    ServerError { code: u16, message: String },
    /// No response within the timeout bound.
    Timeout,
    /// A fresher call to the same endpoint was already accepted.
    Superseded,
}

impl<T> ApiResult<T> {
    /// Numeric status for this result, including the synthetic codes.
    ///
    /// Normalized for `Success`: any 2xx (201 Created included) reports
    /// [`ApiStatus::OK`]. Error variants report the wire status unchanged.
    pub fn code(&self) -> i32 {
        match self {
            ApiResult::Success(_) => ApiStatus::OK,
            ApiResult::ClientError { code, .. } | ApiResult::ServerError { code, .. } => {
                i32::from(*code)
            }
            ApiResult::Timeout => ApiStatus::TIMEOUT,
            ApiResult::Superseded => ApiStatus::SUPERSEDED,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ApiResult::Success(_) => "Ok",
            ApiResult::ClientError { message, .. } | ApiResult::ServerError { message, .. } => {
                message
            }
            ApiResult::Timeout => "Request Timed Out",
            ApiResult::Superseded => "Request Outdated",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ApiResult::Success(_))
    }

    pub fn is_superseded(&self) -> bool {
        matches!(self, ApiResult::Superseded)
    }

    pub fn success(self) -> Option<T> {
        match self {
            ApiResult::Success(payload) => Some(payload),
            _ => None,
        }
    }

    pub fn as_ref(&self) -> ApiResult<&T> {
        match self {
            ApiResult::Success(payload) => ApiResult::Success(payload),
            ApiResult::ClientError { code, message } => ApiResult::ClientError {
                code: *code,
                message: message.clone(),
            },
            ApiResult::ServerError { code, message } => ApiResult::ServerError {
                code: *code,
                message: message.clone(),
            },
            ApiResult::Timeout => ApiResult::Timeout,
            ApiResult::Superseded => ApiResult::Superseded,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiResult<U> {
        match self {
            ApiResult::Success(payload) => ApiResult::Success(f(payload)),
            ApiResult::ClientError { code, message } => ApiResult::ClientError { code, message },
            ApiResult::ServerError { code, message } => ApiResult::ServerError { code, message },
            ApiResult::Timeout => ApiResult::Timeout,
            ApiResult::Superseded => ApiResult::Superseded,
        }
    }
}

impl ApiResult<Value> {
    /// Decode a JSON payload into the operation's payload type.
    ///
    /// `status` is reported as the `ServerError` code when the payload does not
    /// match the expected shape.
    pub(crate) fn decode<T: DeserializeOwned>(self, status: u16) -> ApiResult<T> {
        match self {
            ApiResult::Success(value) => match serde_json::from_value(value) {
                Ok(payload) => ApiResult::Success(payload),
                Err(e) => ApiResult::ServerError {
                    code: status,
                    message: format!("invalid response payload: {e}"),
                },
            },
            ApiResult::ClientError { code, message } => ApiResult::ClientError { code, message },
            ApiResult::ServerError { code, message } => ApiResult::ServerError { code, message },
            ApiResult::Timeout => ApiResult::Timeout,
            ApiResult::Superseded => ApiResult::Superseded,
        }
    }
}
