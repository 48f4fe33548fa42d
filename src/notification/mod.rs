//! Canonical notification data model.
//!
//! An inbound native message is normalized into a [`PushNotification`] once,
//! dispatched, and discarded; nothing in this module is persisted.

mod from_native;
pub use from_native::*;

#[cfg(test)]
mod access_state_test;

use std::collections::HashMap;

use serde::Deserialize;
use serde::Serialize;

/// Outcome of a permission / registration attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccessState {
    Available,
    Denied,
    Disabled,
    NotSupported,
    NotDetermined,
}

impl std::fmt::Display for AccessState {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        let s = match self {
            AccessState::Available => "available",
            AccessState::Denied => "denied",
            AccessState::Disabled => "disabled",
            AccessState::NotSupported => "not-supported",
            AccessState::NotDetermined => "not-determined",
        };
        write!(f, "{s}")
    }
}

/// Result of [`crate::PushManager::request_access`].
///
/// Invariant: `token` is `Some` iff `state == AccessState::Available`.
/// Both constructors below enforce it; there is no other way to build one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushAccessState {
    state: AccessState,
    token: Option<String>,
}

impl PushAccessState {
    pub fn available(token: impl Into<String>) -> Self {
        Self {
            state: AccessState::Available,
            token: Some(token.into()),
        }
    }

    /// A non-available outcome. `Available` is rejected here to keep the
    /// state/token invariant unforgeable.
    pub fn unavailable(state: AccessState) -> Self {
        debug_assert!(state != AccessState::Available);
        Self {
            state,
            token: None,
        }
    }

    pub fn state(&self) -> AccessState {
        self.state
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_available(&self) -> bool {
        self.state == AccessState::Available
    }

    /// Unwraps the token, turning a non-available outcome into the matching
    /// typed error. For callers that treat anything but `Available` as a
    /// hard failure.
    pub fn require_available(self) -> crate::Result<String> {
        use crate::RegistrationError;
        match (self.state, self.token) {
            (AccessState::Available, Some(token)) => Ok(token),
            (AccessState::Denied, _) => Err(RegistrationError::PermissionDenied.into()),
            (state, _) => Err(RegistrationError::PermissionUnavailable(state.to_string()).into()),
        }
    }
}

/// User-facing alert content carried by a visible push.
///
/// `icon` and `color` are Android rendering hints; they are never
/// `Some("")` — absent native fields stay `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationContent {
    pub title: Option<String>,
    pub body: Option<String>,
    /// Android channel id / iOS category identifier
    pub channel: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
}

/// One normalized inbound push message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushNotification {
    data: HashMap<String, String>,
    notification: Option<NotificationContent>,
}

impl PushNotification {
    pub fn new(
        data: HashMap<String, String>,
        notification: Option<NotificationContent>,
    ) -> Self {
        Self { data, notification }
    }

    pub fn data(&self) -> &HashMap<String, String> {
        &self.data
    }

    /// Present only when the backend included a user-facing alert;
    /// `None` for pure data messages.
    pub fn notification(&self) -> Option<&NotificationContent> {
        self.notification.as_ref()
    }
}

/// The user's interaction with a displayed notification (tap or text reply),
/// reported by the platform layer and fanned out via `on_entry`.
#[derive(Debug, Clone)]
pub struct NotificationResponse {
    pub notification: PushNotification,
    pub action_identifier: Option<String>,
    pub input_text: Option<String>,
}
