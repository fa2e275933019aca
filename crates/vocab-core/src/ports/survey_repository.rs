use async_trait::async_trait;

use crate::domain::SurveyError;
use crate::survey::SurveySession;

/// Persistence for in-progress and completed survey sessions (§3.2, §4.3).
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait SurveyRepository: Send + Sync {
    async fn get_session(&self, session_id: &str) -> Result<Option<SurveySession>, SurveyError>;

    async fn save_session(&self, session: &SurveySession) -> Result<(), SurveyError>;

    async fn get_active_session(
        &self,
        user_id: &str,
    ) -> Result<Option<SurveySession>, SurveyError>;
}
