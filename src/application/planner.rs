use crate::config::ReconcilerConfig;
use crate::domain::events::{self, EVENT_MAPPINGS};
use crate::domain::notification::Notification;
use crate::domain::payment::{PaymentRecord, UpdateOperation, INTERACTION_TYPE_NOTIFICATION};
use crate::error::Result;
use chrono::{DateTime, Utc};

/// Computes the minimal ordered operation list that reconciles a payment
/// record snapshot with a notification.
///
/// Deterministic and side-effect-free: replaying the same notification
/// against the same snapshot always yields the same plan, and a fully
/// reconciled snapshot yields an empty one. `now` is injected so callers
/// (and tests) control the interaction timestamp.
pub fn plan(
    payment: &PaymentRecord,
    notification: &Notification,
    config: &ReconcilerConfig,
    now: DateTime<Utc>,
) -> Result<Vec<UpdateOperation>> {
    let mut operations = Vec::new();

    let stripped = notification.stripped();
    let payload = serde_json::to_string(&stripped)?;
    if !payment.has_interaction_payload(&payload) {
        let status = stripped
            .item
            .event_code
            .as_deref()
            .unwrap_or_default()
            .to_lowercase();
        operations.push(UpdateOperation::AddInterfaceInteraction {
            created_at: now,
            status,
            interaction_type: INTERACTION_TYPE_NOTIFICATION.to_string(),
            notification: payload,
        });
    }

    let item = &notification.item;
    let effect = events::classify(
        EVENT_MAPPINGS,
        item.event_code.as_deref(),
        item.success,
        item.additional_data.as_ref(),
        config.unresolved_modification,
    );
    if let Some(effect) = effect {
        match payment.transaction_by_interaction_id(&item.psp_reference) {
            None => operations.push(UpdateOperation::AddTransaction {
                transaction_type: effect.transaction_type,
                state: effect.state,
                amount: item.amount.clone(),
                interaction_id: item.psp_reference.clone(),
            }),
            Some(existing) if effect.state.is_more_final_than(existing.state) => {
                operations.push(UpdateOperation::ChangeTransactionState {
                    transaction_id: existing.id.clone(),
                    state: effect.state,
                })
            }
            // replayed or out-of-order event, nothing to do
            Some(_) => {}
        }
    }

    Ok(operations)
}
