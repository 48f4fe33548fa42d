mod config;
mod constants;
mod delegate;
mod dispatch;
mod errors;
mod notification;
mod registration;
mod store;
mod tags;

pub mod metrics;
pub mod platform;

pub use config::*;
pub use delegate::*;
pub use dispatch::*;
pub use errors::*;
pub use notification::*;
pub use platform::*;
pub use registration::*;
pub use store::*;
pub use tags::*;

//-----------------------------------------------------------
// Test utils

#[cfg(test)]
pub mod test_utils;
