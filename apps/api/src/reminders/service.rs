use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::info;

use crate::models::reminder::{NewReminder, Reminder, ReminderPatch};
use crate::store::{
    Condition, Operator, RecordId, RecordStore, Repository, SortType, StoreError,
};

pub const DEFAULT_UPCOMING_DAYS: i64 = 7;
pub const MAX_UPCOMING_DAYS: i64 = 3650;

#[derive(Clone)]
pub struct ReminderService {
    repo: Repository<Reminder>,
}

impl ReminderService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            repo: Repository::new(store),
        }
    }

    /// All reminders, soonest first.
    pub async fn get_all(&self) -> Result<Vec<Reminder>, StoreError> {
        let params = self.repo.params().order_by("date", SortType::Asc);
        self.repo.find(params).await
    }

    pub async fn get_by_id(&self, id: RecordId) -> Result<Reminder, StoreError> {
        self.repo.get(id).await
    }

    pub async fn create(&self, draft: NewReminder) -> Result<Reminder, StoreError> {
        let reminder = self.repo.create(draft.into_row(Utc::now())).await?;
        info!(
            "Created reminder {} ({}) due {}",
            reminder.id,
            reminder.kind.as_str(),
            reminder.date
        );
        Ok(reminder)
    }

    pub async fn update(&self, id: RecordId, patch: ReminderPatch) -> Result<Reminder, StoreError> {
        let reminder = self.repo.update(id, patch.into_row()).await?;
        info!("Updated reminder {id} (completed: {})", reminder.completed);
        Ok(reminder)
    }

    pub async fn delete(&self, id: RecordId) -> Result<(), StoreError> {
        self.repo.delete(id).await?;
        info!("Deleted reminder {id}");
        Ok(())
    }

    /// Open reminders due within `days` of now, overdue ones included, soonest first.
    pub async fn get_upcoming(&self, days: i64) -> Result<Vec<Reminder>, StoreError> {
        self.get_upcoming_from(Utc::now(), days).await
    }

    pub async fn get_upcoming_from(
        &self,
        now: DateTime<Utc>,
        days: i64,
    ) -> Result<Vec<Reminder>, StoreError> {
        let horizon = Duration::try_days(days)
            .and_then(|window| now.checked_add_signed(window))
            .ok_or_else(|| StoreError::InvalidQuery(format!("days out of range: {days}")))?;
        let params = self
            .repo
            .params()
            .filter(Condition::equal_to("completed", false))
            .filter(Condition::new(
                "date",
                Operator::LessThanOrEqualTo,
                horizon.to_rfc3339(),
            ))
            .order_by("date", SortType::Asc);
        self.repo.find(params).await
    }

    pub async fn get_by_application_id(
        &self,
        application_id: RecordId,
    ) -> Result<Vec<Reminder>, StoreError> {
        let params = self
            .repo
            .params()
            .filter(Condition::equal_to("application_id", application_id))
            .order_by("date", SortType::Asc);
        self.repo.find(params).await
    }
}
