use crate::constants::DEFAULT_EVENT_CHANNEL_CAPACITY;
use crate::constants::DEFAULT_NATIVE_EVENT_BUFFER;
use crate::PushConfig;

/// Case 1: defaults are valid and match the documented constants
#[test]
fn test_default_config_is_valid() {
    let config = PushConfig::default();
    assert!(config.validate().is_ok());
    assert_eq!(
        config.dispatch.event_channel_capacity,
        DEFAULT_EVENT_CHANNEL_CAPACITY
    );
    assert_eq!(
        config.dispatch.native_event_buffer,
        DEFAULT_NATIVE_EVENT_BUFFER
    );
}

/// Case 2: zero channel capacities are rejected
#[test]
fn test_zero_capacities_rejected() {
    let mut config = PushConfig::default();
    config.dispatch.event_channel_capacity = 0;
    assert!(config.validate().is_err());

    let mut config = PushConfig::default();
    config.dispatch.native_event_buffer = 0;
    assert!(config.validate().is_err());
}

/// Case 3: loading with no file yields the defaults
#[test]
fn test_load_without_file() {
    let config = PushConfig::load(None).expect("load should succeed");
    assert_eq!(
        config.dispatch.event_channel_capacity,
        DEFAULT_EVENT_CHANNEL_CAPACITY
    );
}
