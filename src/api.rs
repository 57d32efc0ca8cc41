//! Wire types shared with the QueryQuest backend.
//!
//! Every backend response is wrapped in an [`Envelope`]. Request types skip
//! `None` fields on serialization so partial updates only carry what changed.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============================================================================
// Envelope
// ============================================================================

/// Response body envelope: `{ code, message, data? }`.
///
/// `data` is only present when `code` denotes success. Error responses raised
/// directly by the framework may carry `detail` instead of `message`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub detail: Option<Value>,
    #[serde(default)]
    pub data: Option<Value>,
}

// ============================================================================
// Users
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserData {
    pub uuid: String,
    pub username: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
}

/// Partial user update. Omitted fields are left unchanged server-side.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateUserRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

// ============================================================================
// Sessions
// ============================================================================

/// Credentials for `POST /sessions`.
#[derive(Debug, Clone, Serialize)]
pub struct SessionRequest {
    pub username: String,
    pub password: String,
}

// ============================================================================
// Statistics
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatisticsData {
    pub user_uuid: String,
    pub xp: i64,
    pub wins: i64,
    pub losses: i64,
}

/// Answer submission. The backend awards 10 xp for a correct answer, 2 otherwise.
#[derive(Debug, Clone, Serialize)]
pub struct StatisticsRequest {
    pub correct: bool,
}

// ============================================================================
// Questions
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionData {
    pub id: i64,
    pub question: String,
    pub difficulty: i64,
    pub option1: String,
    pub option2: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub option3: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub option4: Option<String>,
}

impl QuestionData {
    /// All answer options present on the question, in stored order.
    pub fn options(&self) -> Vec<&str> {
        let mut options = vec![self.option1.as_str(), self.option2.as_str()];
        options.extend(self.option3.as_deref());
        options.extend(self.option4.as_deref());
        options
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct QuestionRequest {
    pub question: String,
    pub difficulty: i64,
    pub option1: String,
    pub option2: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub option3: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub option4: Option<String>,
}

// ============================================================================
// Tags
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagData {
    pub id: i64,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TagRequest {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AssignTagsRequest {
    pub question_id: i64,
    pub tag_ids: Vec<i64>,
}

// ============================================================================
// Question Tags
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionTagData {
    pub question_id: i64,
    pub tag_id: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuestionTagRequest {
    pub question_id: i64,
    pub tag_id: i64,
}

// ============================================================================
// Tests
// ============================================================================
