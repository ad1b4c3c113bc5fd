//! `CandidateStore` trait: async interface for saving finished screenings.

use async_trait::async_trait;

use crate::error::StoreError;
use crate::screening::CandidateRecord;

/// Backend-agnostic storage for completed screenings.
#[async_trait]
pub trait CandidateStore: Send + Sync {
    /// Whether a candidate with this email (case-insensitive) or phone
    /// (exact) has already been screened. Empty values never match.
    async fn exists(&self, email: &str, phone: &str) -> Result<bool, StoreError>;

    /// Save a record. Fails with [`StoreError::Duplicate`] if the candidate
    /// was already screened.
    async fn save(&self, record: &CandidateRecord) -> Result<(), StoreError>;

    /// All saved records, oldest first.
    async fn list(&self) -> Result<Vec<CandidateRecord>, StoreError>;
}
