use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Deserialize;
use serde::Serialize;
use tokio::sync::watch;

use crate::constants::REGISTRATION_TOKEN_DATE_KEY;
use crate::constants::REGISTRATION_TOKEN_KEY;
use crate::constants::TAGS_KEY;
use crate::KeyValueStore;
use crate::Result;
use crate::StoreError;
use crate::WriteBatch;

/// The persisted registration state, decoded in full.
///
/// Invariant: `token` and `token_acquired_at` are set or cleared together.
/// Every write path below goes through a single batch that touches both.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationRecord {
    pub token: Option<String>,
    /// Unix milliseconds UTC; `None` iff `token` is `None`
    pub token_acquired_at: Option<i64>,
    pub tags: BTreeSet<String>,
}

impl RegistrationRecord {
    pub fn is_registered(&self) -> bool {
        self.token.is_some()
    }
}

pub(crate) fn unix_now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

/// Single writer of the persisted registration record.
///
/// Readers decode directly from the backing store; a `watch` channel
/// carries the full record to observers after every committed mutation.
pub struct RegistrationStore {
    kv: Arc<dyn KeyValueStore>,
    record_tx: watch::Sender<RegistrationRecord>,
}

impl std::fmt::Debug for RegistrationStore {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("RegistrationStore").finish()
    }
}

impl RegistrationStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Result<Self> {
        let initial = Self::load(kv.as_ref())?;
        let (record_tx, _) = watch::channel(initial);
        Ok(Self { kv, record_tx })
    }

    fn load(kv: &dyn KeyValueStore) -> Result<RegistrationRecord> {
        Ok(RegistrationRecord {
            token: Self::decode_opt(kv.get(REGISTRATION_TOKEN_KEY)?)?,
            token_acquired_at: Self::decode_opt(kv.get(REGISTRATION_TOKEN_DATE_KEY)?)?,
            tags: Self::decode_opt(kv.get(TAGS_KEY)?)?.unwrap_or_default(),
        })
    }

    fn decode_opt<T: serde::de::DeserializeOwned>(bytes: Option<Vec<u8>>) -> Result<Option<T>> {
        match bytes {
            None => Ok(None),
            Some(b) => {
                let v = bincode::deserialize(&b).map_err(StoreError::Codec)?;
                Ok(Some(v))
            }
        }
    }

    fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>> {
        Ok(bincode::serialize(value).map_err(StoreError::Codec)?)
    }

    fn commit(
        &self,
        batch: WriteBatch,
    ) -> Result<()> {
        self.kv.apply(batch)?;
        let record = Self::load(self.kv.as_ref())?;
        // send_replace: observers are optional, a send error must not fail the write
        self.record_tx.send_replace(record);
        Ok(())
    }

    pub fn record(&self) -> Result<RegistrationRecord> {
        Self::load(self.kv.as_ref())
    }

    /// Change feed carrying the full record after every committed mutation.
    /// Late subscribers see the current record immediately.
    pub fn watch(&self) -> watch::Receiver<RegistrationRecord> {
        self.record_tx.subscribe()
    }

    pub fn registration_token(&self) -> Result<Option<String>> {
        Self::decode_opt(self.kv.get(REGISTRATION_TOKEN_KEY)?)
    }

    pub fn token_acquired_at(&self) -> Result<Option<i64>> {
        Self::decode_opt(self.kv.get(REGISTRATION_TOKEN_DATE_KEY)?)
    }

    pub fn tags(&self) -> Result<BTreeSet<String>> {
        Ok(Self::decode_opt(self.kv.get(TAGS_KEY)?)?.unwrap_or_default())
    }

    /// Persists token + acquisition timestamp as one batch.
    pub fn set_registration(
        &self,
        token: &str,
        acquired_at: i64,
    ) -> Result<()> {
        let batch = WriteBatch::default()
            .put(REGISTRATION_TOKEN_KEY, Self::encode(&token.to_string())?)
            .put(REGISTRATION_TOKEN_DATE_KEY, Self::encode(&acquired_at)?);
        self.commit(batch)
    }

    /// Clears token, timestamp and tags in one batch. Idempotent.
    pub fn clear(&self) -> Result<()> {
        let batch = WriteBatch::default()
            .remove(REGISTRATION_TOKEN_KEY)
            .remove(REGISTRATION_TOKEN_DATE_KEY)
            .remove(TAGS_KEY);
        self.commit(batch)
    }

    /// Inserts `tag` into the persisted set. No-op write if already present.
    pub fn add_tag(
        &self,
        tag: &str,
    ) -> Result<()> {
        let mut tags = self.tags()?;
        if !tags.insert(tag.to_string()) {
            return Ok(());
        }
        self.write_tags(&tags)
    }

    /// Removes `tag` from the persisted set. No-op if absent.
    pub fn remove_tag(
        &self,
        tag: &str,
    ) -> Result<()> {
        let mut tags = self.tags()?;
        if !tags.remove(tag) {
            return Ok(());
        }
        self.write_tags(&tags)
    }

    pub fn set_tags(
        &self,
        tags: &BTreeSet<String>,
    ) -> Result<()> {
        self.write_tags(tags)
    }

    fn write_tags(
        &self,
        tags: &BTreeSet<String>,
    ) -> Result<()> {
        let batch = if tags.is_empty() {
            WriteBatch::default().remove(TAGS_KEY)
        } else {
            WriteBatch::default().put(TAGS_KEY, Self::encode(tags)?)
        };
        self.commit(batch)
    }
}
