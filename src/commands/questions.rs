//! `queryquest questions`: list questions with their options.

use anyhow::Result;

use queryquest::QuestClient;
use queryquest::utils::{clamp, shuffle};

use super::expect_success;

/// Upper bound on questions printed in one go.
const MAX_LIMIT: usize = 50;

pub async fn run(client: &QuestClient, limit: Option<usize>, shuffled: bool) -> Result<()> {
    let mut questions = expect_success(client.list_questions().await, "questions")?;
    if questions.is_empty() {
        println!("No questions yet.");
        return Ok(());
    }

    if shuffled {
        shuffle(&mut questions);
    }
    let limit = clamp(limit.unwrap_or(questions.len()), 1, MAX_LIMIT);

    for question in questions.iter().take(limit) {
        println!("#{} [difficulty {}] {}", question.id, question.difficulty, question.question);
        let mut options = question.options();
        if shuffled {
            shuffle(&mut options);
        }
        for (i, option) in options.iter().enumerate() {
            println!("  {}. {}", i + 1, option);
        }
    }
    Ok(())
}
