//! Request dispatcher.
//!
//! Runs one logical API operation end to end:
//!
//! 1. stamp the dispatch time with the staleness guard
//! 2. attach the bearer token and encode parameters (query for reads, JSON for writes)
//! 3. await the response, bounded by the configured timeout
//! 4. under the guard: accept or discard, classify, apply session effects
//!
//! Nothing is retried. A discarded completion always yields `Superseded`,
//! whatever the network returned.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::session::{Session, SessionCache};

use super::classify::{RawOutcome, classify};
use super::endpoint::{Endpoint, SessionEffect};
use super::error::{ClientError, Result};
use super::params::{remove_empty, to_query_pairs};
use super::result::ApiResult;
use super::staleness::{Clock, StalenessGuard};

/// Default bound on a single call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(3333);

pub struct Dispatcher {
    http: Client,
    base_url: String,
    timeout: Duration,
    guard: StalenessGuard,
    sessions: SessionCache,
}

impl Dispatcher {
    pub fn new(
        base_url: &str,
        timeout: Duration,
        sessions: SessionCache,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/').to_string();
        let parsed = Url::parse(&base_url).map_err(|e| ClientError::InvalidBaseUrl {
            url: base_url.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ClientError::InvalidBaseUrl {
                url: base_url,
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }

        let http = Client::builder()
            .user_agent(crate::build_info::user_agent())
            .build()?;

        Ok(Self {
            http,
            base_url,
            timeout,
            guard: StalenessGuard::new(clock),
            sessions,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn guard(&self) -> &StalenessGuard {
        &self.guard
    }

    pub fn sessions(&self) -> &SessionCache {
        &self.sessions
    }

    /// Dispatch a call without parameters.
    pub async fn dispatch<T>(&self, endpoint: Endpoint, path: &str) -> ApiResult<T>
    where
        T: DeserializeOwned,
    {
        self.execute(endpoint, path, Map::new()).await
    }

    /// Dispatch a call with parameters. Null fields are dropped before encoding.
    pub async fn dispatch_with<P, T>(
        &self,
        endpoint: Endpoint,
        path: &str,
        params: &P,
    ) -> ApiResult<T>
    where
        P: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let params = match remove_empty(params) {
            Ok(params) => params,
            Err(e) => {
                return ApiResult::ClientError {
                    code: 400,
                    message: format!("invalid request parameters: {e}"),
                };
            }
        };
        self.execute(endpoint, path, params).await
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        path: &str,
        params: Map<String, Value>,
    ) -> ApiResult<T> {
        let dispatched_at = self.guard.record(endpoint);
        let request = self.build_request(endpoint, path, &params);
        let outcome = self.send(endpoint, request).await;

        let settled = self.guard.settle(endpoint, dispatched_at, || {
            let classified = classify(&outcome);
            self.apply_session_effect(endpoint, &classified);
            classified
        });

        match settled {
            Some(classified) => {
                debug!(endpoint = %endpoint, code = classified.code(), "Request settled");
                classified.decode(outcome.status().unwrap_or_default())
            }
            None => {
                if outcome.is_failure() {
                    warn!(
                        endpoint = %endpoint,
                        status = ?outcome.status(),
                        "Discarded failed response from superseded request"
                    );
                }
                ApiResult::Superseded
            }
        }
    }

    fn build_request(
        &self,
        endpoint: Endpoint,
        path: &str,
        params: &Map<String, Value>,
    ) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let method = endpoint.method();
        let mut request = self.http.request(method.clone(), &url);

        if endpoint.requires_auth()
            && let Some(token) = self.sessions.token()
        {
            request = request.bearer_auth(token);
        }

        if endpoint.uses_query_params() {
            if !params.is_empty() {
                request = request.query(&to_query_pairs(params));
            }
        } else if method != Method::DELETE || !params.is_empty() {
            request = request.json(params);
        }

        request
    }

    async fn send(&self, endpoint: Endpoint, request: RequestBuilder) -> RawOutcome {
        let exchange = async {
            let response = request.send().await?;
            let status = response.status().as_u16();
            let body = response
                .bytes()
                .await
                .map(|b| b.to_vec())
                .map_err(|e| e.to_string());
            Ok::<_, reqwest::Error>((status, body))
        };

        match tokio::time::timeout(self.timeout, exchange).await {
            Err(_) => RawOutcome::TimedOut,
            Ok(Err(e)) if e.is_timeout() => RawOutcome::TimedOut,
            Ok(Err(e)) => {
                warn!(endpoint = %endpoint, error = %e, "Request failed without a response");
                RawOutcome::Transport(e.to_string())
            }
            Ok(Ok((status, body))) => RawOutcome::Response { status, body },
        }
    }

    fn apply_session_effect(&self, endpoint: Endpoint, result: &ApiResult<Value>) {
        match (endpoint.session_effect(), result) {
            (SessionEffect::Establish, ApiResult::Success(payload)) => {
                match serde_json::from_value::<Session>(payload.clone()) {
                    Ok(session) => self.sessions.set(session),
                    Err(e) => {
                        warn!(endpoint = %endpoint, error = %e, "Malformed session payload");
                        self.sessions.clear();
                    }
                }
            }
            (
                SessionEffect::Establish,
                ApiResult::ClientError { .. } | ApiResult::ServerError { .. },
            ) => self.sessions.clear(),
            (SessionEffect::End, _) => self.sessions.clear(),
            (SessionEffect::Bound, ApiResult::ClientError { code: 401, .. }) => {
                debug!(endpoint = %endpoint, "Session rejected by server");
                self.sessions.clear();
            }
            _ => {}
        }
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
