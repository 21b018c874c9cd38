use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::models::document::{Document, DocumentPatch, DocumentType, NewDocument};
use crate::store::{Condition, RecordId, RecordStore, Repository, SortType, StoreError};

#[derive(Clone)]
pub struct DocumentService {
    repo: Repository<Document>,
}

impl DocumentService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            repo: Repository::new(store),
        }
    }

    /// All documents, most recently uploaded first.
    pub async fn get_all(&self) -> Result<Vec<Document>, StoreError> {
        let params = self.repo.params().order_by("upload_date", SortType::Desc);
        self.repo.find(params).await
    }

    pub async fn get_by_id(&self, id: RecordId) -> Result<Document, StoreError> {
        self.repo.get(id).await
    }

    pub async fn create(&self, draft: NewDocument) -> Result<Document, StoreError> {
        let doc = self.repo.create(draft.into_row(Utc::now())).await?;
        info!(
            "Created document {} ({}, {})",
            doc.id,
            doc.filename,
            doc.doc_type.as_str()
        );
        Ok(doc)
    }

    pub async fn update(&self, id: RecordId, patch: DocumentPatch) -> Result<Document, StoreError> {
        let doc = self.repo.update(id, patch.into_row()).await?;
        info!("Updated document {id}");
        Ok(doc)
    }

    pub async fn delete(&self, id: RecordId) -> Result<(), StoreError> {
        self.repo.delete(id).await?;
        info!("Deleted document {id}");
        Ok(())
    }

    pub async fn get_by_type(&self, doc_type: DocumentType) -> Result<Vec<Document>, StoreError> {
        let params = self
            .repo
            .params()
            .filter(Condition::equal_to("type", doc_type.as_str()))
            .order_by("upload_date", SortType::Desc);
        self.repo.find(params).await
    }

    /// Documents whose id list contains `application_id` exactly.
    pub async fn get_by_application_id(
        &self,
        application_id: RecordId,
    ) -> Result<Vec<Document>, StoreError> {
        // The store only offers substring matching on the list column ("1" matches "12"),
        // so candidates are narrowed remotely and checked exactly here.
        let params = self
            .repo
            .params()
            .filter(Condition::contains(
                "application_ids",
                application_id.to_string(),
            ))
            .order_by("upload_date", SortType::Desc);
        let docs = self.repo.find(params).await?;
        Ok(docs
            .into_iter()
            .filter(|doc| doc.application_ids.contains(&application_id))
            .collect())
    }
}
