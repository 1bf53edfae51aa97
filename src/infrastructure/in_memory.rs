use crate::domain::notification::Notification;
use crate::domain::payment::{InterfaceInteraction, PaymentRecord, Transaction, UpdateOperation};
use crate::domain::ports::{PaymentStore, SignatureVerifier, StoreError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory payment store with compare-and-swap semantics.
///
/// Uses `Arc<RwLock<HashMap<String, PaymentRecord>>>` to allow shared
/// concurrent access. The version check and the application of the full
/// operation list happen under a single write lock, so a write either
/// commits atomically and advances the version by one, or is rejected
/// with the store's current version.
///
/// Backs the replay binary and the test suite.
#[derive(Default, Clone)]
pub struct InMemoryPaymentStore {
    records: Arc<RwLock<HashMap<String, PaymentRecord>>>,
}

impl InMemoryPaymentStore {
    /// Creates a new, empty in-memory payment store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a record, replacing any existing record with the same id.
    pub async fn insert(&self, record: PaymentRecord) {
        let mut records = self.records.write().await;
        records.insert(record.id.clone(), record);
    }

    /// Snapshot of every stored record, sorted by id for stable output.
    pub async fn all_records(&self) -> Vec<PaymentRecord> {
        let records = self.records.read().await;
        let mut all: Vec<PaymentRecord> = records.values().cloned().collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        all
    }
}

#[async_trait]
impl PaymentStore for InMemoryPaymentStore {
    async fn fetch_by_key(&self, key: &str) -> Result<Option<PaymentRecord>, StoreError> {
        let records = self.records.read().await;
        Ok(records
            .values()
            .find(|record| record.key.as_deref() == Some(key))
            .cloned())
    }

    async fn fetch_by_id(&self, id: &str) -> Result<PaymentRecord, StoreError> {
        let records = self.records.read().await;
        records.get(id).cloned().ok_or(StoreError::NotFound)
    }

    async fn update(
        &self,
        id: &str,
        expected_version: u64,
        operations: Vec<UpdateOperation>,
    ) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        let record = records.get_mut(id).ok_or(StoreError::NotFound)?;

        if record.version != expected_version {
            return Err(StoreError::Conflict {
                current_version: record.version,
            });
        }

        // apply to a copy so a rejected operation leaves the record untouched
        let mut updated = record.clone();
        for operation in operations {
            match operation {
                UpdateOperation::AddInterfaceInteraction {
                    created_at,
                    status,
                    interaction_type,
                    notification,
                } => updated.interface_interactions.push(InterfaceInteraction {
                    created_at,
                    status,
                    interaction_type,
                    notification,
                }),
                UpdateOperation::AddTransaction {
                    transaction_type,
                    state,
                    amount,
                    interaction_id,
                } => updated.transactions.push(Transaction {
                    id: uuid::Uuid::new_v4().to_string(),
                    transaction_type,
                    state,
                    amount,
                    interaction_id,
                }),
                UpdateOperation::ChangeTransactionState {
                    transaction_id,
                    state,
                } => {
                    let transaction = updated
                        .transactions
                        .iter_mut()
                        .find(|transaction| transaction.id == transaction_id)
                        .ok_or_else(|| {
                            StoreError::Io(format!("no transaction with id {transaction_id}"))
                        })?;
                    transaction.state = state;
                }
            }
        }

        updated.version += 1;
        *record = updated;
        Ok(())
    }
}

/// A verifier that accepts every notification. Stands in for the external
/// HMAC check in the replay binary and in tests.
#[derive(Default, Clone, Copy)]
pub struct NoopVerifier;

#[async_trait]
impl SignatureVerifier for NoopVerifier {
    async fn validate(&self, _notification: &Notification) -> Option<String> {
        None
    }
}
