//! `queryquest login`: sign in and persist the session.

use anyhow::Result;
use tracing::debug;

use queryquest::QuestClient;
use queryquest::api::SessionRequest;

use super::expect_success;

pub async fn run(client: &QuestClient, username: String, password: String) -> Result<()> {
    let request = SessionRequest { username, password };
    debug!(username = %request.username, "Signing in");

    let session = expect_success(client.create_session(&request).await, "login")?;
    println!("Signed in as {} ({})", request.username, session.user_uuid);
    Ok(())
}
