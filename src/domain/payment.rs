use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Interaction type tag stored with every notification audit entry.
pub const INTERACTION_TYPE_NOTIFICATION: &str = "notification";

/// A monetary amount in minor units (cents) plus its ISO currency code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Amount {
    pub value: i64,
    pub currency: String,
}

/// The externally owned, versioned payment record being reconciled.
///
/// The record lives in a remote store; `version` is the compare-and-swap
/// token that every write must carry. The store rejects a write whose
/// expected version is stale and advances the version by exactly one on
/// every accepted write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecord {
    pub id: String,
    /// Stable external reference, expected to equal the notification's
    /// merchant reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    pub version: u64,
    #[serde(default)]
    pub interface_interactions: Vec<InterfaceInteraction>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

impl PaymentRecord {
    /// Whether an interaction with exactly this serialized payload has
    /// already been recorded.
    pub fn has_interaction_payload(&self, payload: &str) -> bool {
        self.interface_interactions
            .iter()
            .any(|interaction| interaction.notification == payload)
    }

    /// The transaction correlated with a provider psp reference, if any.
    /// At most one transaction exists per interaction id.
    pub fn transaction_by_interaction_id(&self, interaction_id: &str) -> Option<&Transaction> {
        self.transactions
            .iter()
            .find(|transaction| transaction.interaction_id == interaction_id)
    }
}

/// Append-only audit entry capturing a raw inbound event against the
/// payment record. Stored payloads have sensitive fields stripped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceInteraction {
    pub created_at: DateTime<Utc>,
    /// Lowercased event code of the notification, empty if absent.
    pub status: String,
    pub interaction_type: String,
    /// Serialized stripped notification payload; the idempotency key.
    pub notification: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub state: TransactionState,
    pub amount: Amount,
    /// Provider-side psp reference this transaction corresponds to.
    pub interaction_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionType {
    Authorization,
    CancelAuthorization,
    Charge,
    Refund,
}

/// Transaction states ordered by finality: `Initial` < `Pending` <
/// `Success`/`Failure`. A recorded state is only ever replaced by a
/// strictly more final one, which makes replayed notifications no-ops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionState {
    Initial,
    Pending,
    Success,
    Failure,
}

impl TransactionState {
    fn finality(self) -> u8 {
        match self {
            TransactionState::Initial => 0,
            TransactionState::Pending => 1,
            TransactionState::Success | TransactionState::Failure => 2,
        }
    }

    pub fn is_more_final_than(self, other: TransactionState) -> bool {
        self.finality() > other.finality()
    }
}

/// A single planned change to a payment record. Operations are pure data:
/// the planner produces them and the store applies them atomically under
/// its version check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum UpdateOperation {
    #[serde(rename_all = "camelCase")]
    AddInterfaceInteraction {
        created_at: DateTime<Utc>,
        status: String,
        interaction_type: String,
        notification: String,
    },
    #[serde(rename_all = "camelCase")]
    AddTransaction {
        transaction_type: TransactionType,
        state: TransactionState,
        amount: Amount,
        interaction_id: String,
    },
    #[serde(rename_all = "camelCase")]
    ChangeTransactionState {
        transaction_id: String,
        state: TransactionState,
    },
}
