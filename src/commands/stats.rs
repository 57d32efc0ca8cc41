use anyhow::Result;

use queryquest::QuestClient;
use queryquest::api::StatisticsData;

use super::{expect_success, require_session};

pub async fn run(client: &QuestClient) -> Result<()> {
    require_session(client)?;
    let stats = expect_success(client.get_statistics().await, "stats")?;
    print_stats(&stats);
    Ok(())
}

pub(crate) fn print_stats(stats: &StatisticsData) {
    println!("XP:     {}", stats.xp);
    println!("Wins:   {}", stats.wins);
    println!("Losses: {}", stats.losses);
}
