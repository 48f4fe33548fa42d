//! Registration persistence.
//!
//! [`RegistrationStore`] is the single writer of the persisted registration
//! record. It sits on top of an injected [`KeyValueStore`] byte store; the
//! crate ships a sled-backed default adapter.

mod key_value;
mod registration_store;
pub mod sled_adapter;

pub use key_value::*;
pub use registration_store::*;
