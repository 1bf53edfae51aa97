use webhook_reconciler::domain::notification::Notification;
use webhook_reconciler::domain::payment::PaymentRecord;

pub fn notification(
    event_code: &str,
    success: bool,
    psp_reference: &str,
    merchant_reference: &str,
) -> Notification {
    serde_json::from_value(serde_json::json!({
        "NotificationRequestItem": {
            "eventCode": event_code,
            "success": success,
            "pspReference": psp_reference,
            "merchantReference": merchant_reference,
            "amount": { "value": 10000, "currency": "EUR" }
        }
    }))
    .expect("valid notification fixture")
}

#[allow(dead_code)]
pub fn notification_without_merchant_reference(psp_reference: &str) -> Notification {
    serde_json::from_value(serde_json::json!({
        "NotificationRequestItem": {
            "eventCode": "AUTHORISATION",
            "success": true,
            "pspReference": psp_reference,
            "amount": { "value": 10000, "currency": "EUR" }
        }
    }))
    .expect("valid notification fixture")
}

pub fn payment(id: &str, key: &str) -> PaymentRecord {
    PaymentRecord {
        id: id.to_string(),
        key: Some(key.to_string()),
        version: 1,
        interface_interactions: vec![],
        transactions: vec![],
    }
}
