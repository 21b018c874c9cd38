use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::models::interview::{InterviewQuestion, InterviewQuestionPatch, NewInterviewQuestion};
use crate::store::{Condition, RecordId, RecordStore, Repository, SortType, StoreError};

const SEARCH_FIELDS: &[&str] = &["question", "category", "answer"];

#[derive(Clone)]
pub struct InterviewQuestionService {
    repo: Repository<InterviewQuestion>,
}

impl InterviewQuestionService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            repo: Repository::new(store),
        }
    }

    pub async fn get_all(&self) -> Result<Vec<InterviewQuestion>, StoreError> {
        let params = self.repo.params().order_by("created_at", SortType::Desc);
        self.repo.find(params).await
    }

    pub async fn get_by_id(&self, id: RecordId) -> Result<InterviewQuestion, StoreError> {
        self.repo.get(id).await
    }

    pub async fn create(
        &self,
        draft: NewInterviewQuestion,
    ) -> Result<InterviewQuestion, StoreError> {
        let question = self.repo.create(draft.into_row(Utc::now())).await?;
        info!(
            "Created interview question {} ({})",
            question.id, question.category
        );
        Ok(question)
    }

    pub async fn update(
        &self,
        id: RecordId,
        patch: InterviewQuestionPatch,
    ) -> Result<InterviewQuestion, StoreError> {
        let question = self.repo.update(id, patch.into_row(Utc::now())).await?;
        info!("Updated interview question {id}");
        Ok(question)
    }

    pub async fn delete(&self, id: RecordId) -> Result<(), StoreError> {
        self.repo.delete(id).await?;
        info!("Deleted interview question {id}");
        Ok(())
    }

    pub async fn get_by_category(
        &self,
        category: &str,
    ) -> Result<Vec<InterviewQuestion>, StoreError> {
        let params = self
            .repo
            .params()
            .filter(Condition::equal_to("category", category.trim()))
            .order_by("created_at", SortType::Desc);
        self.repo.find(params).await
    }

    pub async fn search(&self, term: &str) -> Result<Vec<InterviewQuestion>, StoreError> {
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

    use crate::models::interview::{Difficulty, DEFAULT_QUESTION_CATEGORY};
    use crate::store::MemoryStore;

    #[tokio::test]
    async fn test_defaults_and_category_filter() {
        let svc = InterviewQuestionService::new(Arc::new(MemoryStore::new()));
        let general = svc
            .create(NewInterviewQuestion {
                question: "Why do you want to work here?".into(),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(general.category, DEFAULT_QUESTION_CATEGORY);
        assert_eq!(general.difficulty, Difficulty::Medium);

        svc.create(NewInterviewQuestion {
            question: "Design a rate limiter".into(),
            category: Some("System Design".into()),
            difficulty: Some(Difficulty::Hard),
            answer: "Token bucket per client".into(),
            ..Default::default()
        })
        .await
        .unwrap();

        let design = svc.get_by_category("System Design").await.unwrap();
        assert_eq!(design.len(), 1);
        assert_eq!(design[0].difficulty, Difficulty::Hard);

        let hits = svc.search("token bucket").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].question, "Design a rate limiter");
    }
}
