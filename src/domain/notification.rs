use super::payment::Amount;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// A single provider webhook payload, as delivered in a batch.
///
/// Notifications are immutable once received and may be delivered more
/// than once for the same event. Replays must not duplicate any effect
/// on the payment record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    #[serde(rename = "NotificationRequestItem")]
    pub item: NotificationItem,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_code: Option<String>,
    #[serde(deserialize_with = "bool_from_bool_or_string")]
    pub success: bool,
    pub psp_reference: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merchant_reference: Option<String>,
    pub amount: Amount,
    /// Provider metadata, may carry the `modification.action` qualifier.
    /// Treated as sensitive and never persisted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_data: Option<BTreeMap<String, String>>,
    /// Free-text reason, also stripped before persisting.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl Notification {
    /// The merchant reference correlating this notification to a payment
    /// record, if the provider sent one.
    pub fn merchant_reference(&self) -> Option<&str> {
        self.item.merchant_reference.as_deref()
    }

    /// A copy with raw instrument data and the free-text reason removed.
    /// This stripped form is what gets persisted and what idempotency
    /// comparisons run against.
    pub fn stripped(&self) -> Notification {
        let mut stripped = self.clone();
        stripped.item.additional_data = None;
        stripped.item.reason = None;
        stripped
    }
}

// The provider serializes `success` either as a JSON boolean or as the
// strings "true"/"false".
fn bool_from_bool_or_string<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolOrString {
        Bool(bool),
        Text(String),
    }

    match BoolOrString::deserialize(deserializer)? {
        BoolOrString::Bool(value) => Ok(value),
        BoolOrString::Text(text) => match text.as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            other => Err(serde::de::Error::invalid_value(
                serde::de::Unexpected::Str(other),
                &"\"true\" or \"false\"",
            )),
        },
    }
}
