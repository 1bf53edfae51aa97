use super::payment::{TransactionState, TransactionType};
use crate::config::UnresolvedModification;
use std::collections::BTreeMap;

/// The one event code whose transaction type depends on a qualifier in
/// the notification's additional data.
pub const CANCEL_OR_REFUND: &str = "CANCEL_OR_REFUND";

/// Additional-data key disambiguating [`CANCEL_OR_REFUND`].
pub const MODIFICATION_ACTION_KEY: &str = "modification.action";

/// Static lookup row mapping a provider `(eventCode, success)` pair to
/// its transaction effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventMappingEntry {
    pub event_code: &'static str,
    pub success: bool,
    pub transaction_type: TransactionType,
    pub transaction_state: TransactionState,
}

const fn entry(
    event_code: &'static str,
    success: bool,
    transaction_type: TransactionType,
    transaction_state: TransactionState,
) -> EventMappingEntry {
    EventMappingEntry {
        event_code,
        success,
        transaction_type,
        transaction_state,
    }
}

/// The provider event table. Pairs absent from this table have no
/// transaction effect; only interaction logging applies to them.
pub const EVENT_MAPPINGS: &[EventMappingEntry] = &[
    entry("AUTHORISATION", true, TransactionType::Authorization, TransactionState::Success),
    entry("AUTHORISATION", false, TransactionType::Authorization, TransactionState::Failure),
    entry("CANCELLATION", true, TransactionType::CancelAuthorization, TransactionState::Success),
    entry("CANCELLATION", false, TransactionType::CancelAuthorization, TransactionState::Failure),
    entry("CAPTURE", true, TransactionType::Charge, TransactionState::Success),
    entry("CAPTURE", false, TransactionType::Charge, TransactionState::Failure),
    entry("CAPTURE_FAILED", true, TransactionType::Charge, TransactionState::Failure),
    entry(CANCEL_OR_REFUND, true, TransactionType::CancelAuthorization, TransactionState::Success),
    entry("REFUND", true, TransactionType::Refund, TransactionState::Success),
    entry("REFUND", false, TransactionType::Refund, TransactionState::Failure),
    entry("REFUND_FAILED", true, TransactionType::Refund, TransactionState::Failure),
];

/// The transaction-level consequence of a classified notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionEffect {
    pub transaction_type: TransactionType,
    pub state: TransactionState,
}

/// Maps a notification's `(eventCode, success)` pair to its transaction
/// effect, or `None` when the pair is unmapped.
///
/// `CANCEL_OR_REFUND` is resolved through the `modification.action`
/// qualifier in the additional data: "refund" yields a [`TransactionType::Refund`],
/// "cancel" a [`TransactionType::CancelAuthorization`]. When no recognized
/// qualifier is present, `unresolved` decides between keeping the mapped
/// type and dropping the effect entirely.
///
/// Pure function: the lookup table is never mutated.
pub fn classify(
    table: &[EventMappingEntry],
    event_code: Option<&str>,
    success: bool,
    additional_data: Option<&BTreeMap<String, String>>,
    unresolved: UnresolvedModification,
) -> Option<TransactionEffect> {
    let code = event_code?;
    let entry = table
        .iter()
        .find(|entry| entry.event_code == code && entry.success == success)?;

    let mut effect = TransactionEffect {
        transaction_type: entry.transaction_type,
        state: entry.transaction_state,
    };

    if code == CANCEL_OR_REFUND {
        let action = additional_data
            .and_then(|data| data.get(MODIFICATION_ACTION_KEY))
            .map(String::as_str);
        match action {
            Some("refund") => effect.transaction_type = TransactionType::Refund,
            Some("cancel") => effect.transaction_type = TransactionType::CancelAuthorization,
            _ => {
                if unresolved == UnresolvedModification::NoEffect {
                    return None;
                }
            }
        }
    }

    Some(effect)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn modification(action: &str) -> BTreeMap<String, String> {
        BTreeMap::from([(MODIFICATION_ACTION_KEY.to_string(), action.to_string())])
    }

    #[rstest]
    #[case("AUTHORISATION", true, TransactionType::Authorization, TransactionState::Success)]
    #[case("AUTHORISATION", false, TransactionType::Authorization, TransactionState::Failure)]
    #[case("CANCELLATION", true, TransactionType::CancelAuthorization, TransactionState::Success)]
    #[case("CAPTURE", true, TransactionType::Charge, TransactionState::Success)]
    #[case("CAPTURE_FAILED", true, TransactionType::Charge, TransactionState::Failure)]
    #[case("REFUND", false, TransactionType::Refund, TransactionState::Failure)]
    #[case("REFUND_FAILED", true, TransactionType::Refund, TransactionState::Failure)]
    fn test_classifies_mapped_events(
        #[case] event_code: &str,
        #[case] success: bool,
        #[case] transaction_type: TransactionType,
        #[case] state: TransactionState,
    ) {
        let effect = classify(
            EVENT_MAPPINGS,
            Some(event_code),
            success,
            None,
            UnresolvedModification::KeepMapped,
        )
        .unwrap();

        assert_eq!(effect.transaction_type, transaction_type);
        assert_eq!(effect.state, state);
    }

    #[rstest]
    #[case(Some("REPORT_AVAILABLE"), true)]
    #[case(Some("CAPTURE_FAILED"), false)]
    #[case(Some("CANCEL_OR_REFUND"), false)]
    #[case(None, true)]
    fn test_unmapped_or_absent_events_have_no_effect(
        #[case] event_code: Option<&str>,
        #[case] success: bool,
    ) {
        let effect = classify(
            EVENT_MAPPINGS,
            event_code,
            success,
            None,
            UnresolvedModification::KeepMapped,
        );
        assert!(effect.is_none());
    }

    #[test]
    fn test_cancel_or_refund_resolves_refund() {
        let effect = classify(
            EVENT_MAPPINGS,
            Some(CANCEL_OR_REFUND),
            true,
            Some(&modification("refund")),
            UnresolvedModification::KeepMapped,
        )
        .unwrap();

        assert_eq!(effect.transaction_type, TransactionType::Refund);
        assert_eq!(effect.state, TransactionState::Success);
    }

    #[test]
    fn test_cancel_or_refund_resolves_cancel() {
        let effect = classify(
            EVENT_MAPPINGS,
            Some(CANCEL_OR_REFUND),
            true,
            Some(&modification("cancel")),
            UnresolvedModification::KeepMapped,
        )
        .unwrap();

        assert_eq!(effect.transaction_type, TransactionType::CancelAuthorization);
    }

    #[test]
    fn test_cancel_or_refund_without_qualifier_keeps_mapped_type() {
        let effect = classify(
            EVENT_MAPPINGS,
            Some(CANCEL_OR_REFUND),
            true,
            None,
            UnresolvedModification::KeepMapped,
        )
        .unwrap();

        assert_eq!(effect.transaction_type, TransactionType::CancelAuthorization);
    }

    #[test]
    fn test_cancel_or_refund_without_qualifier_can_drop_effect() {
        let effect = classify(
            EVENT_MAPPINGS,
            Some(CANCEL_OR_REFUND),
            true,
            Some(&modification("unknown")),
            UnresolvedModification::NoEffect,
        );

        assert!(effect.is_none());
    }

    #[test]
    fn test_classify_does_not_mutate_table() {
        // A refund-qualified CANCEL_OR_REFUND must not leak into the
        // next unqualified classification.
        let refund = classify(
            EVENT_MAPPINGS,
            Some(CANCEL_OR_REFUND),
            true,
            Some(&modification("refund")),
            UnresolvedModification::KeepMapped,
        )
        .unwrap();
        assert_eq!(refund.transaction_type, TransactionType::Refund);

        let unqualified = classify(
            EVENT_MAPPINGS,
            Some(CANCEL_OR_REFUND),
            true,
            None,
            UnresolvedModification::KeepMapped,
        )
        .unwrap();
        assert_eq!(
            unqualified.transaction_type,
            TransactionType::CancelAuthorization
        );
    }
}
