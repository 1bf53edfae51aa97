use super::planner;
use crate::config::ReconcilerConfig;
use crate::domain::notification::Notification;
use crate::domain::payment::PaymentRecord;
use crate::domain::ports::{PaymentStore, StoreError};
use crate::error::{ReconcileError, Result};
use chrono::Utc;
use tracing::debug;

/// Summary of a completed reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    pub payment_id: String,
    /// Number of operations in the committed plan; zero means the record
    /// was already up to date and no write was issued.
    pub applied_operations: usize,
    /// Conflict retries it took to commit.
    pub retries: u32,
}

/// Applies a notification to a payment record under optimistic concurrency.
///
/// Plan → write → on version conflict, re-fetch the latest snapshot and
/// re-plan, up to `config.max_retries` retries. Re-planning against the
/// freshest snapshot is what keeps concurrent writers correct: a stale
/// operation list could re-introduce a state downgrade or duplicate an
/// interaction another writer just recorded. The version token is the only
/// coordination between writers; nothing is held across attempts.
///
/// `payment` is the snapshot the caller already fetched by key. Any store
/// failure other than a conflict fails immediately.
pub async fn reconcile(
    payment: PaymentRecord,
    notification: &Notification,
    store: &dyn PaymentStore,
    config: &ReconcilerConfig,
) -> Result<Reconciliation> {
    let mut snapshot = payment;
    let mut retries: u32 = 0;

    loop {
        let operations = planner::plan(&snapshot, notification, config, Utc::now())?;
        if operations.is_empty() {
            debug!(payment_id = %snapshot.id, "payment already reconciled, skipping write");
            return Ok(Reconciliation {
                payment_id: snapshot.id,
                applied_operations: 0,
                retries,
            });
        }

        let planned = operations.len();
        match store.update(&snapshot.id, snapshot.version, operations).await {
            Ok(()) => {
                debug!(
                    payment_id = %snapshot.id,
                    payment_key = snapshot.key.as_deref().unwrap_or_default(),
                    operations = planned,
                    retries,
                    "payment successfully updated"
                );
                return Ok(Reconciliation {
                    payment_id: snapshot.id,
                    applied_operations: planned,
                    retries,
                });
            }
            Err(StoreError::Conflict { current_version }) => {
                retries += 1;
                if retries > config.max_retries {
                    return Err(ReconcileError::RetryBudgetExhausted {
                        payment_id: snapshot.id,
                        attempted_version: snapshot.version,
                        current_version,
                        max_retries: config.max_retries,
                    });
                }
                debug!(
                    payment_id = %snapshot.id,
                    attempted_version = snapshot.version,
                    current_version,
                    retries,
                    "version conflict, re-fetching and re-planning"
                );
                snapshot = store.fetch_by_id(&snapshot.id).await?;
            }
            Err(err) => return Err(err.into()),
        }
    }
}
