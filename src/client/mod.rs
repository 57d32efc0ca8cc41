//! HTTP client for the QueryQuest API.
//!
//! Provides `QuestClient`, one method per backend operation. Every method
//! returns an [`ApiResult`]; nothing here returns `Err` once the client is
//! built. Calls may be issued concurrently: per endpoint, only the completion
//! of the most recently dispatched call is allowed to reach the caller or the
//! session cache, older ones resolve to `Superseded`.

pub mod classify;
pub mod dispatch;
pub mod endpoint;
mod error;
pub mod params;
pub mod result;
pub mod staleness;

pub use dispatch::{DEFAULT_TIMEOUT, Dispatcher};
pub use endpoint::{Endpoint, SessionEffect};
pub use error::{ClientError, Result};
pub use result::{ApiResult, ApiStatus};
pub use staleness::{Clock, DispatchTimestamp, ManualClock, StalenessGuard, SystemClock};

use std::sync::Arc;
use std::time::Duration;

use crate::api::{
    AssignTagsRequest, CreateUserRequest, QuestionData, QuestionRequest, QuestionTagData,
    QuestionTagRequest, SessionRequest, StatisticsData, StatisticsRequest, TagData, TagRequest,
    UpdateUserRequest, UserData,
};
use crate::config::Config;
use crate::session::{AuthState, Session, SessionCache};
use crate::store::{FileSessionStore, MemorySessionStore};

/// QueryQuest API client. Cheap to clone; clones share watermarks and session.
#[derive(Debug, Clone)]
pub struct QuestClient {
    inner: Arc<Dispatcher>,
}

impl QuestClient {
    /// Client with the default timeout, wall clock, and an in-memory session.
    pub fn new(base_url: &str) -> Result<Self> {
        Self::builder(base_url).build()
    }

    pub fn builder(base_url: &str) -> QuestClientBuilder {
        QuestClientBuilder {
            base_url: base_url.to_string(),
            timeout: DEFAULT_TIMEOUT,
            clock: None,
            sessions: None,
        }
    }

    /// Client configured from a loaded config file, persisting the session to disk.
    pub fn from_config(config: &Config) -> Result<Self> {
        let store = Arc::new(FileSessionStore::new(&config.session.path));
        Self::builder(&config.api.base_url)
            .timeout(Duration::from_millis(config.api.timeout_ms))
            .sessions(SessionCache::load(store))
            .build()
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.inner
    }

    /// The live session, if any.
    pub fn session(&self) -> Option<Session> {
        self.inner.sessions().get()
    }

    /// Observe sign-in/sign-out transitions.
    pub fn subscribe(&self) -> tokio::sync::watch::Receiver<AuthState> {
        self.inner.sessions().subscribe()
    }

    // ----------------------------------------------------------------------------
    // Users
    // ----------------------------------------------------------------------------

    /// Register a new account.
    pub async fn create_user(&self, request: &CreateUserRequest) -> ApiResult<UserData> {
        self.inner
            .dispatch_with(Endpoint::CreateUser, "/users", request)
            .await
    }

    /// Fetch a user. The backend only allows fetching the session's own user.
    pub async fn get_user(&self, uuid: &str) -> ApiResult<UserData> {
        let path = format!("/users/{}", uuid);
        self.inner.dispatch(Endpoint::GetUser, &path).await
    }

    pub async fn update_user(
        &self,
        uuid: &str,
        request: &UpdateUserRequest,
    ) -> ApiResult<UserData> {
        let path = format!("/users/{}", uuid);
        self.inner
            .dispatch_with(Endpoint::UpdateUser, &path, request)
            .await
    }

    pub async fn delete_user(&self, uuid: &str) -> ApiResult<()> {
        let path = format!("/users/{}", uuid);
        self.inner.dispatch(Endpoint::DeleteUser, &path).await
    }

    // ----------------------------------------------------------------------------
    // Sessions
    // ----------------------------------------------------------------------------

    /// Sign in. On success the returned session becomes the live session.
    pub async fn create_session(&self, request: &SessionRequest) -> ApiResult<Session> {
        self.inner
            .dispatch_with(Endpoint::CreateSession, "/sessions", request)
            .await
    }

    /// Sign out. The live session is cleared whatever the server answers.
    pub async fn delete_session(&self) -> ApiResult<()> {
        self.inner
            .dispatch(Endpoint::DeleteSession, "/sessions")
            .await
    }

    // ----------------------------------------------------------------------------
    // Statistics
    // ----------------------------------------------------------------------------

    pub async fn get_statistics(&self) -> ApiResult<StatisticsData> {
        self.inner
            .dispatch(Endpoint::GetStatistics, "/statistics")
            .await
    }

    /// Record an answer and return the updated statistics.
    pub async fn update_statistics(
        &self,
        request: &StatisticsRequest,
    ) -> ApiResult<StatisticsData> {
        self.inner
            .dispatch_with(Endpoint::UpdateStatistics, "/statistics", request)
            .await
    }

    // ----------------------------------------------------------------------------
    // Questions
    // ----------------------------------------------------------------------------

    pub async fn list_questions(&self) -> ApiResult<Vec<QuestionData>> {
        self.inner
            .dispatch(Endpoint::ListQuestions, "/questions")
            .await
    }

    pub async fn get_question(&self, id: i64) -> ApiResult<Vec<QuestionData>> {
        let path = format!("/questions/{}", id);
        self.inner.dispatch(Endpoint::GetQuestion, &path).await
    }

    pub async fn create_question(
        &self,
        request: &QuestionRequest,
    ) -> ApiResult<Vec<QuestionData>> {
        self.inner
            .dispatch_with(Endpoint::CreateQuestion, "/questions", request)
            .await
    }

    pub async fn delete_question(&self, id: i64) -> ApiResult<()> {
        let path = format!("/questions/{}", id);
        self.inner.dispatch(Endpoint::DeleteQuestion, &path).await
    }

    // ----------------------------------------------------------------------------
    // Tags
    // ----------------------------------------------------------------------------

    pub async fn list_tags(&self) -> ApiResult<Vec<TagData>> {
        self.inner.dispatch(Endpoint::ListTags, "/tags").await
    }

    pub async fn get_tag(&self, id: i64) -> ApiResult<Vec<TagData>> {
        let path = format!("/tags/{}", id);
        self.inner.dispatch(Endpoint::GetTag, &path).await
    }

    pub async fn create_tag(&self, request: &TagRequest) -> ApiResult<Vec<TagData>> {
        self.inner
            .dispatch_with(Endpoint::CreateTag, "/tags", request)
            .await
    }

    pub async fn assign_tags(&self, request: &AssignTagsRequest) -> ApiResult<Vec<TagData>> {
        self.inner
            .dispatch_with(Endpoint::AssignTags, "/assign-tags", request)
            .await
    }

    pub async fn delete_tag(&self, id: i64) -> ApiResult<()> {
        let path = format!("/tags/{}", id);
        self.inner.dispatch(Endpoint::DeleteTag, &path).await
    }

    // ----------------------------------------------------------------------------
    // Question Tags
    // ----------------------------------------------------------------------------

    pub async fn list_question_tags(&self) -> ApiResult<Vec<QuestionTagData>> {
        self.inner
            .dispatch(Endpoint::ListQuestionTags, "/question-tags")
            .await
    }

    pub async fn get_question_tag(
        &self,
        question_id: i64,
        tag_id: i64,
    ) -> ApiResult<Vec<QuestionTagData>> {
        let path = format!("/question-tags/{}/{}", question_id, tag_id);
        self.inner.dispatch(Endpoint::GetQuestionTag, &path).await
    }

    pub async fn create_question_tag(
        &self,
        request: &QuestionTagRequest,
    ) -> ApiResult<Vec<QuestionTagData>> {
        self.inner
            .dispatch_with(Endpoint::CreateQuestionTag, "/create-question-tag", request)
            .await
    }

    pub async fn delete_question_tag(&self, question_id: i64, tag_id: i64) -> ApiResult<()> {
        let path = format!("/question-tags/{}/{}", question_id, tag_id);
        self.inner.dispatch(Endpoint::DeleteQuestionTag, &path).await
    }
}

/// Builder for `QuestClient`.
pub struct QuestClientBuilder {
    base_url: String,
    timeout: Duration,
    clock: Option<Arc<dyn Clock>>,
    sessions: Option<SessionCache>,
}

impl QuestClientBuilder {
    /// Bound on a single call, including reading the body.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Clock used to stamp dispatches.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn sessions(mut self, sessions: SessionCache) -> Self {
        self.sessions = Some(sessions);
        self
    }

    pub fn build(self) -> Result<QuestClient> {
        let sessions = self
            .sessions
            .unwrap_or_else(|| SessionCache::load(Arc::new(MemorySessionStore::new())));
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let dispatcher = Dispatcher::new(&self.base_url, self.timeout, sessions, clock)?;
        Ok(QuestClient {
            inner: Arc::new(dispatcher),
        })
    }
}
