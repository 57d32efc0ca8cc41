//! Logical API operations.

use std::fmt;

use reqwest::Method;

/// How a completed call affects the session cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEffect {
    /// No session mutation.
    None,
    /// Success overwrites the session; client/server errors clear it.
    Establish,
    /// Any accepted outcome clears the session.
    End,
    /// A 401 clears the session.
    Bound,
}

/// Closed set of logical API operations.
///
/// Used as the key for staleness tracking: calls to the same endpoint with
/// different path arguments share one watermark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    CreateUser,
    GetUser,
    UpdateUser,
    DeleteUser,
    CreateSession,
    DeleteSession,
    GetStatistics,
    UpdateStatistics,
    ListQuestions,
    GetQuestion,
    CreateQuestion,
    DeleteQuestion,
    ListTags,
    GetTag,
    CreateTag,
    AssignTags,
    DeleteTag,
    ListQuestionTags,
    GetQuestionTag,
    CreateQuestionTag,
    DeleteQuestionTag,
}

impl Endpoint {
    pub const ALL: [Endpoint; 21] = [
        Endpoint::CreateUser,
        Endpoint::GetUser,
        Endpoint::UpdateUser,
        Endpoint::DeleteUser,
        Endpoint::CreateSession,
        Endpoint::DeleteSession,
        Endpoint::GetStatistics,
        Endpoint::UpdateStatistics,
        Endpoint::ListQuestions,
        Endpoint::GetQuestion,
        Endpoint::CreateQuestion,
        Endpoint::DeleteQuestion,
        Endpoint::ListTags,
        Endpoint::GetTag,
        Endpoint::CreateTag,
        Endpoint::AssignTags,
        Endpoint::DeleteTag,
        Endpoint::ListQuestionTags,
        Endpoint::GetQuestionTag,
        Endpoint::CreateQuestionTag,
        Endpoint::DeleteQuestionTag,
    ];

    /// Stable kebab-case name, used in logs.
    pub fn name(self) -> &'static str {
        match self {
            Endpoint::CreateUser => "create-user",
            Endpoint::GetUser => "get-user",
            Endpoint::UpdateUser => "update-user",
            Endpoint::DeleteUser => "delete-user",
            Endpoint::CreateSession => "create-session",
            Endpoint::DeleteSession => "delete-session",
            Endpoint::GetStatistics => "get-statistics",
            Endpoint::UpdateStatistics => "update-statistics",
            Endpoint::ListQuestions => "list-questions",
            Endpoint::GetQuestion => "get-question",
            Endpoint::CreateQuestion => "create-question",
            Endpoint::DeleteQuestion => "delete-question",
            Endpoint::ListTags => "list-tags",
            Endpoint::GetTag => "get-tag",
            Endpoint::CreateTag => "create-tag",
            Endpoint::AssignTags => "assign-tags",
            Endpoint::DeleteTag => "delete-tag",
            Endpoint::ListQuestionTags => "list-question-tags",
            Endpoint::GetQuestionTag => "get-question-tag",
            Endpoint::CreateQuestionTag => "create-question-tag",
            Endpoint::DeleteQuestionTag => "delete-question-tag",
        }
    }

    pub fn method(self) -> Method {
        match self {
            Endpoint::GetUser
            | Endpoint::GetStatistics
            | Endpoint::ListQuestions
            | Endpoint::GetQuestion
            | Endpoint::ListTags
            | Endpoint::GetTag
            | Endpoint::ListQuestionTags
            | Endpoint::GetQuestionTag => Method::GET,
            Endpoint::CreateUser
            | Endpoint::CreateSession
            | Endpoint::CreateQuestion
            | Endpoint::CreateTag
            | Endpoint::AssignTags
            | Endpoint::CreateQuestionTag => Method::POST,
            Endpoint::UpdateUser | Endpoint::UpdateStatistics => Method::PATCH,
            Endpoint::DeleteUser
            | Endpoint::DeleteSession
            | Endpoint::DeleteQuestion
            | Endpoint::DeleteTag
            | Endpoint::DeleteQuestionTag => Method::DELETE,
        }
    }

    /// Whether the call carries `Authorization: Bearer <token>` when a session is live.
    pub fn requires_auth(self) -> bool {
        !matches!(
            self,
            Endpoint::CreateUser
                | Endpoint::CreateSession
                | Endpoint::ListQuestions
                | Endpoint::GetQuestion
                | Endpoint::CreateQuestion
                | Endpoint::DeleteQuestion
        )
    }

    pub fn session_effect(self) -> SessionEffect {
        match self {
            Endpoint::CreateSession => SessionEffect::Establish,
            Endpoint::DeleteSession => SessionEffect::End,
            e if e.requires_auth() => SessionEffect::Bound,
            _ => SessionEffect::None,
        }
    }

    /// Reads encode parameters as a query string; writes as a JSON body.
    pub fn uses_query_params(self) -> bool {
        self.method() == Method::GET
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn all_lists_every_endpoint_once() {
        let names: HashSet<_> = Endpoint::ALL.iter().map(|e| e.name()).collect();
        assert_eq!(names.len(), Endpoint::ALL.len());
    }

    #[test]
    fn session_endpoints_have_lifecycle_effects() {
        assert_eq!(
            Endpoint::CreateSession.session_effect(),
            SessionEffect::Establish
        );
        assert_eq!(Endpoint::DeleteSession.session_effect(), SessionEffect::End);
        assert!(!Endpoint::CreateSession.requires_auth());
        assert!(Endpoint::DeleteSession.requires_auth());
    }

    #[test]
    fn authorized_endpoints_are_session_bound() {
        assert_eq!(Endpoint::GetUser.session_effect(), SessionEffect::Bound);
        assert_eq!(
            Endpoint::UpdateStatistics.session_effect(),
            SessionEffect::Bound
        );
        assert_eq!(Endpoint::ListQuestions.session_effect(), SessionEffect::None);
    }

    #[test]
    fn only_reads_use_query_params() {
        assert!(Endpoint::GetStatistics.uses_query_params());
        assert!(!Endpoint::UpdateStatistics.uses_query_params());
        assert!(!Endpoint::DeleteTag.uses_query_params());
        assert_eq!(Endpoint::UpdateUser.method(), Method::PATCH);
    }
}
