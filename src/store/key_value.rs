#[cfg(test)]
use mockall::automock;

use crate::Result;

/// An ordered group of put/remove operations applied as one atomic unit.
///
/// The registration token and its acquisition timestamp travel in the same
/// batch so no reader ever observes one without the other.
#[derive(Debug, Default)]
pub struct WriteBatch {
    ops: Vec<(String, Option<Vec<u8>>)>,
}

impl WriteBatch {
    pub fn put(
        mut self,
        key: &str,
        value: Vec<u8>,
    ) -> Self {
        self.ops.push((key.to_string(), Some(value)));
        self
    }

    pub fn remove(
        mut self,
        key: &str,
    ) -> Self {
        self.ops.push((key.to_string(), None));
        self
    }

    pub fn ops(&self) -> &[(String, Option<Vec<u8>>)] {
        &self.ops
    }

    pub fn into_ops(self) -> Vec<(String, Option<Vec<u8>>)> {
        self.ops
    }
}

/// Externally supplied persistent byte store.
///
/// Implementations must apply a [`WriteBatch`] atomically; concurrent reads
/// are safe and observe either all of a batch or none of it.
#[cfg_attr(test, automock)]
pub trait KeyValueStore: Send + Sync + 'static {
    fn get(
        &self,
        key: &str,
    ) -> Result<Option<Vec<u8>>>;

    fn apply(
        &self,
        batch: WriteBatch,
    ) -> Result<()>;
}
