// -
// Persisted registration record

/// Stable key-value entry names for the registration record.
/// Renaming any of these invalidates every existing installation's record.
pub(crate) const REGISTRATION_TOKEN_KEY: &str = "RegistrationToken";
pub(crate) const REGISTRATION_TOKEN_DATE_KEY: &str = "RegistrationTokenDate";
pub(crate) const TAGS_KEY: &str = "Tags";

/// Sled tree namespace for the default store adapter
pub(crate) const PUSH_STORE_TREE: &str = "_push_registration";

// -
// Channel defaults

/// Default capacity of the multicast notification stream
pub(crate) const DEFAULT_EVENT_CHANNEL_CAPACITY: usize = 64;

/// Default buffer size of the native platform event feed
pub(crate) const DEFAULT_NATIVE_EVENT_BUFFER: usize = 256;
