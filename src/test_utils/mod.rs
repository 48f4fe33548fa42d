//! Shared fixtures for unit tests.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::errors::BoxError;
use crate::KeyValueStore;
use crate::NotificationResponse;
use crate::PushDelegate;
use crate::PushNotification;
use crate::Result;
use crate::WriteBatch;

/// In-memory [`KeyValueStore`] with atomic batch application.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryKeyValueStore {
    pub fn new_arc() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(
        &self,
        key: &str,
    ) -> Result<Option<Vec<u8>>> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn apply(
        &self,
        batch: WriteBatch,
    ) -> Result<()> {
        let mut entries = self.entries.lock();
        for (key, value) in batch.into_ops() {
            match value {
                Some(bytes) => {
                    entries.insert(key, bytes);
                }
                None => {
                    entries.remove(&key);
                }
            }
        }
        Ok(())
    }
}

/// Delegate that records every invocation it receives.
#[derive(Debug, Default)]
pub struct RecordingDelegate {
    pub tokens: Mutex<Vec<String>>,
    pub received: Mutex<Vec<PushNotification>>,
    pub entries: Mutex<Vec<Option<String>>>,
}

impl RecordingDelegate {
    pub fn new_arc() -> Arc<Self> {
        Arc::new(Self::default())
    }
}

#[async_trait]
impl PushDelegate for RecordingDelegate {
    fn name(&self) -> &str {
        "recording"
    }

    async fn on_token_changed(
        &self,
        token: &str,
    ) -> std::result::Result<(), BoxError> {
        self.tokens.lock().push(token.to_string());
        Ok(())
    }

    async fn on_received(
        &self,
        notification: &PushNotification,
    ) -> std::result::Result<(), BoxError> {
        self.received.lock().push(notification.clone());
        Ok(())
    }

    async fn on_entry(
        &self,
        response: &NotificationResponse,
    ) -> std::result::Result<(), BoxError> {
        self.entries.lock().push(response.action_identifier.clone());
        Ok(())
    }
}

/// Delegate whose every hook fails, for failure-isolation tests.
#[derive(Debug)]
pub struct FailingDelegate {
    pub name: &'static str,
}

impl FailingDelegate {
    pub fn new_arc(name: &'static str) -> Arc<Self> {
        Arc::new(Self { name })
    }
}

#[async_trait]
impl PushDelegate for FailingDelegate {
    fn name(&self) -> &str {
        self.name
    }

    async fn on_token_changed(
        &self,
        _token: &str,
    ) -> std::result::Result<(), BoxError> {
        Err(format!("{} rejected token change", self.name).into())
    }

    async fn on_received(
        &self,
        _notification: &PushNotification,
    ) -> std::result::Result<(), BoxError> {
        Err(format!("{} rejected notification", self.name).into())
    }

    async fn on_entry(
        &self,
        _response: &NotificationResponse,
    ) -> std::result::Result<(), BoxError> {
        Err(format!("{} rejected entry", self.name).into())
    }
}
