use std::collections::HashMap;

use crate::platform::NativeAlert;
use crate::platform::NativeMessage;
use crate::NotificationContent;
use crate::PushNotification;

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

impl NotificationContent {
    /// Builds alert content from the raw native fields. Empty native
    /// strings become `None` rather than empty-string artifacts.
    pub fn from_native(alert: NativeAlert) -> Self {
        Self {
            title: non_empty(alert.title),
            body: non_empty(alert.body),
            channel: non_empty(alert.channel_id),
            icon: non_empty(alert.icon),
            color: non_empty(alert.color),
        }
    }
}

impl PushNotification {
    /// Normalizes a raw native message into the canonical record: data
    /// key/values are copied verbatim, the visible alert is translated only
    /// when the backend included one.
    pub fn from_native(message: NativeMessage) -> Self {
        let notification = message.notification.map(NotificationContent::from_native);
        Self::new(message.data, notification)
    }

    /// A pure data message, as delivered by platforms that report no alert
    /// payload (e.g. iOS background pushes).
    pub fn from_data(data: HashMap<String, String>) -> Self {
        Self::new(data, None)
    }
}
