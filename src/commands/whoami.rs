//! `queryquest whoami`: print the signed-in user.

use std::collections::HashMap;

use anyhow::Result;

use queryquest::QuestClient;
use queryquest::utils::expand_template;

use super::{expect_success, require_session};

const DEFAULT_FORMAT: &str = "{username} ({uuid})";

pub async fn run(client: &QuestClient, format: Option<&str>) -> Result<()> {
    let session = require_session(client)?;
    let user = expect_success(client.get_user(&session.user_uuid).await, "whoami")?;

    let mut map: HashMap<&str, Box<dyn Fn() -> String + '_>> = HashMap::new();
    map.insert("username", Box::new(|| user.username.clone()));
    map.insert("uuid", Box::new(|| user.uuid.clone()));

    println!("{}", expand_template(format.unwrap_or(DEFAULT_FORMAT), &map));
    Ok(())
}
