//! User-facing text.
//!
//! Every string shown to the user, whether on the console, in a host notice
//! or in a notification, is a [`Message`] variant. The `msg_*` macros print
//! them with a consistent prefix.

pub mod display;
pub mod macros;
pub mod types;

pub use types::Message;
