//! Telegram bot handler tree configuration
//!
//! The dispatcher schema lives here so integration tests can build the same
//! handler tree as production code.

mod schema;
mod types;

pub use schema::{handle_unrouted_callback, schema};
pub use types::{CallbackContext, HandlerDeps, HandlerError};
