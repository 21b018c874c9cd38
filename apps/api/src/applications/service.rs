use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::info;

use crate::models::application::{
    ApplicationPatch, ApplicationStatus, JobApplication, NewApplication,
};
use crate::store::{Condition, RecordId, RecordStore, Repository, SortType, StoreError};

/// Count of applications in one pipeline status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusCount {
    pub status: ApplicationStatus,
    pub count: usize,
}

#[derive(Clone)]
pub struct ApplicationService {
    repo: Repository<JobApplication>,
}

impl ApplicationService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            repo: Repository::new(store),
        }
    }

    /// All applications, newest first.
    pub async fn get_all(&self) -> Result<Vec<JobApplication>, StoreError> {
        let params = self.repo.params().order_by("created_at", SortType::Desc);
        self.repo.find(params).await
    }

    pub async fn get_by_id(&self, id: RecordId) -> Result<JobApplication, StoreError> {
        self.repo.get(id).await
    }

    pub async fn create(&self, draft: NewApplication) -> Result<JobApplication, StoreError> {
        let app = self.repo.create(draft.into_row(Utc::now())).await?;
        info!(
            "Created application {} ({} at {})",
            app.id, app.title, app.company
        );
        Ok(app)
    }

    pub async fn update(
        &self,
        id: RecordId,
        patch: ApplicationPatch,
    ) -> Result<JobApplication, StoreError> {
        let app = self.repo.update(id, patch.into_row(Utc::now())).await?;
        info!("Updated application {id} (status: {})", app.status.as_str());
        Ok(app)
    }

    pub async fn delete(&self, id: RecordId) -> Result<(), StoreError> {
        self.repo.delete(id).await?;
        info!("Deleted application {id}");
        Ok(())
    }

    pub async fn get_by_status(
        &self,
        status: ApplicationStatus,
    ) -> Result<Vec<JobApplication>, StoreError> {
        let params = self
            .repo
            .params()
            .filter(Condition::equal_to("status", status.as_str()))
            .order_by("created_at", SortType::Desc);
        self.repo.find(params).await
    }

    pub async fn status_counts(&self) -> Result<Vec<StatusCount>, StoreError> {
        let apps = self.get_all().await?;
        Ok(count_by_status(&apps))
    }
}

/// Every pipeline status with its count, zero-filled, in pipeline order.
pub fn count_by_status(apps: &[JobApplication]) -> Vec<StatusCount> {
    ApplicationStatus::PIPELINE
        .iter()
        .map(|status| StatusCount {
            status: *status,
            count: apps.iter().filter(|app| app.status == *status).count(),
        })
        .collect()
}
