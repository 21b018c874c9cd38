use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::models::interview::{InterviewNote, InterviewNotePatch, NewInterviewNote};
use crate::store::{Condition, RecordId, RecordStore, Repository, SortType, StoreError};

const SEARCH_FIELDS: &[&str] = &["title", "company", "position", "content"];

#[derive(Clone)]
pub struct InterviewNoteService {
    repo: Repository<InterviewNote>,
}

impl InterviewNoteService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            repo: Repository::new(store),
        }
    }

    pub async fn get_all(&self) -> Result<Vec<InterviewNote>, StoreError> {
        let params = self.repo.params().order_by("created_at", SortType::Desc);
        self.repo.find(params).await
    }

    pub async fn get_by_id(&self, id: RecordId) -> Result<InterviewNote, StoreError> {
        self.repo.get(id).await
    }

    pub async fn create(&self, draft: NewInterviewNote) -> Result<InterviewNote, StoreError> {
        let note = self.repo.create(draft.into_row(Utc::now())).await?;
        info!("Created interview note {} ({})", note.id, note.title);
        Ok(note)
    }

    pub async fn update(
        &self,
        id: RecordId,
        patch: InterviewNotePatch,
    ) -> Result<InterviewNote, StoreError> {
        let note = self.repo.update(id, patch.into_row(Utc::now())).await?;
        info!("Updated interview note {id}");
        Ok(note)
    }

    pub async fn delete(&self, id: RecordId) -> Result<(), StoreError> {
        self.repo.delete(id).await?;
        info!("Deleted interview note {id}");
        Ok(())
    }

    /// Case-insensitive match on title, company, position or content.
    pub async fn search(&self, term: &str) -> Result<Vec<InterviewNote>, StoreError> {
        let term = term.trim();
        if term.is_empty() {
            return self.get_all().await;
        }
        let params = self
            .repo
            .params()
            .any_of(
                SEARCH_FIELDS
                    .iter()
                    .map(|field| Condition::contains(field, term))
                    .collect(),
            )
            .order_by("created_at", SortType::Desc);
        self.repo.find(params).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::store::MemoryStore;

    #[tokio::test]
    async fn test_search_matches_any_text_field() {
        let svc = InterviewNoteService::new(Arc::new(MemoryStore::new()));
        svc.create(NewInterviewNote {
            title: "Onsite loop".into(),
            company: "Acme".into(),
            position: "Backend Engineer".into(),
            content: "Asked about Kafka partitioning".into(),
            tags: vec!["system design".into()],
        })
        .await
        .unwrap();
        svc.create(NewInterviewNote {
            title: "Recruiter call".into(),
            company: "Globex".into(),
            position: "Designer".into(),
            content: "Salary expectations".into(),
            tags: vec![],
        })
        .await
        .unwrap();

        let hits = svc.search("kafka").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].company, "Acme");
        assert_eq!(hits[0].tags, vec!["system design"]);

        assert_eq!(svc.search("DESIGN").await.unwrap().len(), 1);
        assert_eq!(svc.search("  ").await.unwrap().len(), 2);
    }
}
