//! CLI command implementations.

use anyhow::{Context, Result, bail};

use queryquest::config::Config;
use queryquest::{ApiResult, QuestClient};

pub mod answer;
pub mod login;
pub mod logout;
pub mod questions;
pub mod stats;
pub mod whoami;

/// Build a client from the config file, with an optional base URL override.
pub async fn connect(config_path: &str, server: Option<&str>) -> Result<QuestClient> {
    let mut config = Config::load(config_path)
        .await
        .with_context(|| format!("failed to load config '{}'", config_path))?;
    if let Some(server) = server {
        config.api.base_url = server.to_string();
    }
    Ok(QuestClient::from_config(&config)?)
}

/// Unwrap a successful result, turning every other outcome into an error.
pub fn expect_success<T>(result: ApiResult<T>, action: &str) -> Result<T> {
    match result {
        ApiResult::Success(value) => Ok(value),
        ApiResult::ClientError { code, message } => bail!("{action} rejected ({code}): {message}"),
        ApiResult::ServerError { code, message } => bail!("{action} failed ({code}): {message}"),
        ApiResult::Timeout => bail!("{action} timed out"),
        ApiResult::Superseded => bail!("{action} was superseded by a newer request"),
    }
}

/// Fail early when there is no stored session.
pub fn require_session(client: &QuestClient) -> Result<queryquest::Session> {
    match client.session() {
        Some(session) => Ok(session),
        None => bail!("Not signed in. Run `queryquest login -u <name>` first."),
    }
}
