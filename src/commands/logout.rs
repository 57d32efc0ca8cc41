use anyhow::Result;
use tracing::warn;

use queryquest::{ApiResult, QuestClient};

pub async fn run(client: &QuestClient) -> Result<()> {
    if client.session().is_none() {
        println!("Not signed in.");
        return Ok(());
    }

    // The local session is dropped on any accepted answer, so only report.
    match client.delete_session().await {
        ApiResult::Success(()) => {}
        ApiResult::ClientError { code, message } | ApiResult::ServerError { code, message } => {
            warn!(code, "Server did not confirm logout: {message}");
        }
        ApiResult::Timeout => warn!("Server did not answer logout in time"),
        ApiResult::Superseded => {}
    }
    println!("Signed out.");
    Ok(())
}
