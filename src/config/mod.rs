//! Crate configuration.
//!
//! Loaded from an optional TOML file with a `PUSH_`-prefixed environment
//! overlay (environment wins). Every field has a default, so a host that
//! configures nothing gets a working setup.

#[cfg(test)]
mod config_test;

use std::path::PathBuf;

use config::Config;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;
use serde::Serialize;

use crate::constants::DEFAULT_EVENT_CHANNEL_CAPACITY;
use crate::constants::DEFAULT_NATIVE_EVENT_BUFFER;
use crate::Error;
use crate::Result;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PushConfig {
    #[serde(default)]
    pub dispatch: DispatchConfig,

    #[serde(default)]
    pub store: StoreConfig,
}

/// Channel sizing for the dispatch pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Capacity of the multicast notification stream; lagged subscribers
    /// drop the oldest values past this bound
    #[serde(default = "default_event_channel_capacity")]
    pub event_channel_capacity: usize,

    /// Buffer size of the native platform event feed
    #[serde(default = "default_native_event_buffer")]
    pub native_event_buffer: usize,
}

/// Default sled store adapter settings. Unused when the host injects its
/// own [`crate::KeyValueStore`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            event_channel_capacity: default_event_channel_capacity(),
            native_event_buffer: default_native_event_buffer(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

fn default_event_channel_capacity() -> usize {
    DEFAULT_EVENT_CHANNEL_CAPACITY
}

fn default_native_event_buffer() -> usize {
    DEFAULT_NATIVE_EVENT_BUFFER
}

fn default_store_path() -> PathBuf {
    PathBuf::from("./push_store")
}

impl PushConfig {
    /// Loads configuration from an optional TOML file plus `PUSH_*`
    /// environment variables (e.g. `PUSH_DISPATCH__EVENT_CHANNEL_CAPACITY`).
    pub fn load(config_file: Option<&str>) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = config_file {
            builder = builder.add_source(File::with_name(path));
        }
        let raw = builder
            .add_source(Environment::with_prefix("PUSH").separator("__"))
            .build()?;

        let parsed: PushConfig = raw.try_deserialize()?;
        parsed.validate()?;
        Ok(parsed)
    }

    pub fn validate(&self) -> Result<()> {
        if self.dispatch.event_channel_capacity == 0 {
            return Err(Error::Config(ConfigError::Message(
                "dispatch.event_channel_capacity must be greater than 0".into(),
            )));
        }
        if self.dispatch.native_event_buffer == 0 {
            return Err(Error::Config(ConfigError::Message(
                "dispatch.native_event_buffer must be greater than 0".into(),
            )));
        }
        Ok(())
    }
}
