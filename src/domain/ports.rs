use super::notification::Notification;
use super::payment::{PaymentRecord, UpdateOperation};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

pub type PaymentStoreRef = Arc<dyn PaymentStore>;
pub type SignatureVerifierRef = Arc<dyn SignatureVerifier>;

/// Failures surfaced by the remote record store. [`StoreError::Conflict`]
/// is the only recoverable variant: it carries the version the store holds
/// so the caller can re-fetch and re-plan.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("version conflict, store holds version {current_version}")]
    Conflict { current_version: u64 },
    #[error("record not found")]
    NotFound,
    #[error("store I/O error: {0}")]
    Io(String),
}

/// The remote versioned record store, specified only at its interface.
///
/// Writes are compare-and-swap on `expected_version`: the store either
/// applies the full operation list atomically and advances the version by
/// exactly one, or rejects the write in full.
#[async_trait]
pub trait PaymentStore: Send + Sync {
    async fn fetch_by_key(&self, key: &str) -> Result<Option<PaymentRecord>, StoreError>;
    async fn fetch_by_id(&self, id: &str) -> Result<PaymentRecord, StoreError>;
    async fn update(
        &self,
        id: &str,
        expected_version: u64,
        operations: Vec<UpdateOperation>,
    ) -> Result<(), StoreError>;
}

/// HMAC signature verification, performed by an external collaborator.
#[async_trait]
pub trait SignatureVerifier: Send + Sync {
    /// Returns an error message when the signature check fails, `None`
    /// when the notification is authentic.
    async fn validate(&self, notification: &Notification) -> Option<String>;
}
