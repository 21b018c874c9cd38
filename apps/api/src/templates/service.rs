use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::models::template::{CoverLetterTemplate, NewTemplate, TemplatePatch};
use crate::store::{Condition, RecordId, RecordStore, Repository, SortType, StoreError};

const SEARCH_FIELDS: &[&str] = &["Name", "category", "content"];

#[derive(Clone)]
pub struct TemplateService {
    repo: Repository<CoverLetterTemplate>,
}

impl TemplateService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            repo: Repository::new(store),
        }
    }

    pub async fn get_all(&self) -> Result<Vec<CoverLetterTemplate>, StoreError> {
        let params = self.repo.params().order_by("created_at", SortType::Desc);
        self.repo.find(params).await
    }

    pub async fn get_by_id(&self, id: RecordId) -> Result<CoverLetterTemplate, StoreError> {
        self.repo.get(id).await
    }

    pub async fn create(&self, draft: NewTemplate) -> Result<CoverLetterTemplate, StoreError> {
        let template = self.repo.create(draft.into_row(Utc::now())).await?;
        info!(
            "Created template {} ({}) with {} variable(s)",
            template.id,
            template.name,
            template.variables.len()
        );
        Ok(template)
    }

    /// Reads the current template so variables are recomputed from the merged text.
    pub async fn update(
        &self,
        id: RecordId,
        patch: TemplatePatch,
    ) -> Result<CoverLetterTemplate, StoreError> {
        let current = self.repo.get(id).await?;
        let row = patch.merge_into_row(&current, Utc::now());
        let template = self.repo.update(id, row).await?;
        info!("Updated template {id}");
        Ok(template)
    }

    pub async fn delete(&self, id: RecordId) -> Result<(), StoreError> {
        self.repo.delete(id).await?;
        info!("Deleted template {id}");
        Ok(())
    }

    pub async fn get_by_category(
        &self,
        category: &str,
    ) -> Result<Vec<CoverLetterTemplate>, StoreError> {
        let params = self
            .repo
            .params()
            .filter(Condition::equal_to("category", category.trim()))
            .order_by("created_at", SortType::Desc);
        self.repo.find(params).await
    }

    /// Templates whose name, category or content contains `query`.
    pub async fn search(&self, query: &str) -> Result<Vec<CoverLetterTemplate>, StoreError> {
        let query = query.trim();
        if query.is_empty() {
            return self.get_all().await;
        }
        let params = self
            .repo
            .params()
            .any_of(
                SEARCH_FIELDS
                    .iter()
                    .map(|field| Condition::contains(field, query))
                    .collect(),
            )
            .order_by("created_at", SortType::Desc);
        self.repo.find(params).await
    }

    /// Distinct categories in use, sorted.
    pub async fn categories(&self) -> Result<Vec<String>, StoreError> {
        let categories: BTreeSet<String> = self
            .get_all()
            .await?
            .into_iter()
            .map(|t| t.category)
            .collect();
        Ok(categories.into_iter().collect())
    }
}
