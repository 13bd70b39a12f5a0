//! Studio core: callback routing for the studio bot
//!
//! This library holds the part of the bot that decides which handler owns
//! an inbound callback identifier. It has no Telegram dependency unless the
//! `telegram` feature is enabled.
//!
//! # Module Structure
//!
//! - `router`: priority-ordered pattern dispatch, conflict battery, stats
//! - `callback_data`: producer-side helpers that respect Telegram's 64-byte cap
//! - `error`: error types shared by the router and its callers

pub mod callback_data;
pub mod error;
pub mod router;

// Re-export commonly used types for convenience
pub use error::{HandlerError, HandlerResult, RouterError, RouterResult};
pub use router::{CallbackEvent, CallbackRequest, CallbackRouter, Conflict, Route, RouterStats, DEFAULT_PRIORITY};
