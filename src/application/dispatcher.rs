use super::reconciler::{self, Reconciliation};
use crate::config::ReconcilerConfig;
use crate::domain::notification::Notification;
use crate::domain::ports::{
    PaymentStore, PaymentStoreRef, SignatureVerifier, SignatureVerifierRef,
};
use crate::error::ReconcileError;
use std::fmt;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{error, warn};

/// Per-notification result of a batch run. A batch never fails atomically;
/// it reports one outcome per inbound notification.
#[derive(Debug)]
pub enum Outcome {
    /// The record was brought up to date (possibly with nothing to apply).
    Reconciled(Reconciliation),
    /// The notification was dropped after a validation or lookup miss.
    /// Logged, never retried, never propagated.
    Skipped(ReconcileError),
    /// Reconciliation failed fatally for this notification.
    Failed(ReconcileError),
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Reconciled(done) if done.applied_operations == 0 => {
                write!(f, "unchanged payment {}", done.payment_id)
            }
            Outcome::Reconciled(done) => write!(
                f,
                "updated payment {} ({} operations, {} retries)",
                done.payment_id, done.applied_operations, done.retries
            ),
            Outcome::Skipped(reason) => write!(f, "skipped: {reason}"),
            Outcome::Failed(err) => write!(f, "failed: {err}"),
        }
    }
}

/// Fans a batch of notifications out to per-notification reconciliation
/// with bounded parallelism.
///
/// Concurrency is capped by a semaphore sized to `config.concurrency` so a
/// burst of webhooks cannot overload the record store. Each notification is
/// isolated: skips and fatal errors are recorded in its own outcome slot
/// and the rest of the batch keeps going.
pub struct BatchDispatcher {
    store: PaymentStoreRef,
    verifier: SignatureVerifierRef,
    config: ReconcilerConfig,
}

impl BatchDispatcher {
    pub fn new(
        store: PaymentStoreRef,
        verifier: SignatureVerifierRef,
        config: ReconcilerConfig,
    ) -> Self {
        Self {
            store,
            verifier,
            config,
        }
    }

    /// Processes every notification in the batch and returns outcomes in
    /// input order.
    pub async fn process_batch(&self, notifications: Vec<Notification>) -> Vec<Outcome> {
        let total = notifications.len();
        let semaphore = Arc::new(Semaphore::new(self.config.concurrency.max(1)));
        let mut tasks = JoinSet::new();

        for (index, notification) in notifications.into_iter().enumerate() {
            let semaphore = semaphore.clone();
            let store = self.store.clone();
            let verifier = self.verifier.clone();
            let config = self.config.clone();
            tasks.spawn(async move {
                // the semaphore is never closed
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .expect("semaphore unexpectedly closed");
                let outcome =
                    process_notification(&notification, store.as_ref(), verifier.as_ref(), &config)
                        .await;
                (index, outcome)
            });
        }

        let mut outcomes: Vec<Option<Outcome>> = (0..total).map(|_| None).collect();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, outcome)) => outcomes[index] = Some(outcome),
                Err(err) => error!(?err, "reconciliation task panicked"),
            }
        }

        outcomes
            .into_iter()
            .map(|outcome| {
                outcome.unwrap_or_else(|| {
                    Outcome::Failed(ReconcileError::Internal(
                        "reconciliation task aborted".to_string(),
                    ))
                })
            })
            .collect()
    }
}

async fn process_notification(
    notification: &Notification,
    store: &dyn PaymentStore,
    verifier: &dyn SignatureVerifier,
    config: &ReconcilerConfig,
) -> Outcome {
    if let Some(message) = verifier.validate(notification).await {
        warn!(reason = %message, "dropping notification with invalid signature");
        return Outcome::Skipped(ReconcileError::InvalidSignature(message));
    }

    let Some(merchant_reference) = notification.merchant_reference() else {
        warn!(
            psp_reference = %notification.item.psp_reference,
            "notification carries no merchant reference"
        );
        return Outcome::Skipped(ReconcileError::MissingMerchantReference);
    };

    let payment = match store.fetch_by_key(merchant_reference).await {
        Ok(Some(payment)) => payment,
        Ok(None) => {
            warn!(merchant_reference, "no payment found for merchant reference");
            return Outcome::Skipped(ReconcileError::PaymentNotFound {
                merchant_reference: merchant_reference.to_string(),
            });
        }
        Err(err) => {
            error!(merchant_reference, %err, "failed to fetch payment");
            return Outcome::Failed(err.into());
        }
    };

    match reconciler::reconcile(payment, notification, store, config).await {
        Ok(done) => Outcome::Reconciled(done),
        Err(err) => {
            error!(merchant_reference, %err, "reconciliation failed");
            Outcome::Failed(err)
        }
    }
}
