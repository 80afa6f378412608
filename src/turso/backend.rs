// TermStoreBackend implementation for the libsql client

use async_trait::async_trait;

use super::client::TursoClient;
use crate::glossary::{CandidateEntry, CandidateFilter, Glossary, GlossaryEntry};
use crate::storage::{
    DocumentChanges, DocumentOutcome, PromotionOutcome, StoreError, StoreStatistics,
    TermStoreBackend,
};

#[async_trait]
impl TermStoreBackend for TursoClient {
    async fn apply_document(&self, changes: &DocumentChanges) -> Result<DocumentOutcome, StoreError> {
        TursoClient::apply_document(self, changes).await
    }

    async fn get_candidate(&self, term: &str) -> Result<Option<CandidateEntry>, StoreError> {
        TursoClient::get_candidate(self, term).await
    }

    async fn list_candidates(
        &self,
        filter: &CandidateFilter,
    ) -> Result<Vec<CandidateEntry>, StoreError> {
        TursoClient::list_candidates(self, filter).await
    }

    async fn remove_candidate(&self, term: &str) -> Result<bool, StoreError> {
        TursoClient::remove_candidate(self, term).await
    }

    async fn promote_candidate(
        &self,
        term: &str,
        glossary: Glossary,
        category: Option<String>,
    ) -> Result<PromotionOutcome, StoreError> {
        TursoClient::promote_candidate(self, term, glossary, category).await
    }

    async fn get_glossary_entry(&self, term: &str) -> Result<Option<GlossaryEntry>, StoreError> {
        TursoClient::get_glossary_entry(self, term).await
    }

    async fn list_glossary(&self, glossary: Glossary) -> Result<Vec<GlossaryEntry>, StoreError> {
        TursoClient::list_glossary(self, glossary).await
    }

    async fn statistics(&self) -> Result<StoreStatistics, StoreError> {
        TursoClient::statistics(self).await
    }
}
