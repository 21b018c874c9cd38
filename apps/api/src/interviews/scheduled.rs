use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::models::interview::{
    NewScheduledInterview, ScheduledInterview, ScheduledInterviewPatch,
};
use crate::store::{RecordId, RecordStore, Repository, SortType, StoreError};

#[derive(Clone)]
pub struct ScheduledInterviewService {
    repo: Repository<ScheduledInterview>,
}

impl ScheduledInterviewService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            repo: Repository::new(store),
        }
    }

    /// All interviews in calendar order.
    pub async fn get_all(&self) -> Result<Vec<ScheduledInterview>, StoreError> {
        let params = self
            .repo
            .params()
            .order_by("date", SortType::Asc)
            .order_by("time", SortType::Asc);
        self.repo.find(params).await
    }

    pub async fn get_by_id(&self, id: RecordId) -> Result<ScheduledInterview, StoreError> {
        self.repo.get(id).await
    }

    pub async fn create(
        &self,
        draft: NewScheduledInterview,
    ) -> Result<ScheduledInterview, StoreError> {
        let interview = self.repo.create(draft.into_row(Utc::now())).await?;
        info!(
            "Scheduled interview {} with {} on {} {}",
            interview.id, interview.company, interview.date, interview.time
        );
        Ok(interview)
    }

    pub async fn update(
        &self,
        id: RecordId,
        patch: ScheduledInterviewPatch,
    ) -> Result<ScheduledInterview, StoreError> {
        let interview = self.repo.update(id, patch.into_row(Utc::now())).await?;
        info!("Updated interview {id} (status: {:?})", interview.status);
        Ok(interview)
    }

    pub async fn delete(&self, id: RecordId) -> Result<(), StoreError> {
        self.repo.delete(id).await?;
        info!("Deleted interview {id}");
        Ok(())
    }
}
