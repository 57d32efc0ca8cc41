use anyhow::Result;

use queryquest::QuestClient;
use queryquest::api::StatisticsRequest;

use super::stats::print_stats;
use super::{expect_success, require_session};

pub async fn run(client: &QuestClient, correct: bool) -> Result<()> {
    require_session(client)?;
    let request = StatisticsRequest { correct };
    let stats = expect_success(client.update_statistics(&request).await, "answer")?;
    println!("{}", if correct { "Correct!" } else { "Not quite." });
    print_stats(&stats);
    Ok(())
}
