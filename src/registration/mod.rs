//! Registration lifecycle orchestration.
//!
//! [`PushManager`] drives permission → token acquisition → persistence and
//! owns the native event loop that routes platform events into the store,
//! the delegates and the dispatch pipeline.

mod builder;
mod push_manager;

pub use builder::*;
pub use push_manager::*;


/// Lifecycle states of a push registration.
///
/// `Unregistered → Registering → Registered`; `Registered → Unregistered`
/// via [`PushManager::unregister`]; `Registering → Unregistered` on a
/// failed attempt. The persisted token is the durable truth, this enum is
/// re-derived from it at process start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationState {
    Unregistered,
    Registering,
    Registered,
}

impl RegistrationState {
    pub fn is_registered(&self) -> bool {
        matches!(self, RegistrationState::Registered)
    }
}

impl std::fmt::Display for RegistrationState {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        let s = match self {
            RegistrationState::Unregistered => "unregistered",
            RegistrationState::Registering => "registering",
            RegistrationState::Registered => "registered",
        };
        write!(f, "{s}")
    }
}
