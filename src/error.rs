use crate::domain::ports::StoreError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ReconcileError>;

/// Failures scoped to a single notification. None of these ever abort the
/// processing of sibling notifications in a batch.
#[derive(Error, Debug)]
pub enum ReconcileError {
    #[error("notification carries no merchant reference")]
    MissingMerchantReference,
    #[error("HMAC validation failed: {0}")]
    InvalidSignature(String),
    #[error("no payment found for merchant reference {merchant_reference}")]
    PaymentNotFound { merchant_reference: String },
    #[error(
        "concurrent modification of payment {payment_id}: tried version {attempted_version}, \
         store holds version {current_version}, giving up after {max_retries} retries"
    )]
    RetryBudgetExhausted {
        payment_id: String,
        attempted_version: u64,
        current_version: u64,
        max_retries: u32,
    },
    #[error("failed to serialize notification: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("internal error: {0}")]
    Internal(String),
}
