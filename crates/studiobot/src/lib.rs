//! Studio bot: Telegram front-end of the studio CRM
//!
//! This crate is the composition root for the callback router: it builds the
//! route table, wires teloxide's dispatcher to it, and owns configuration,
//! logging and the CLI.
//!
//! # Module Structure
//!
//! - `config`: environment-driven settings
//! - `logging`: logger initialization
//! - `cli`: command-line interface
//! - `bot`: bot commands and `Bot` construction
//! - `routes`: the studio route table and its screens
//! - `handlers`: dispatcher schema and handler dependencies

pub mod bot;
pub mod cli;
pub mod config;
pub mod handlers;
pub mod logging;
pub mod routes;

pub use handlers::{schema, CallbackContext, HandlerDeps, HandlerError};
pub use routes::{build_router, StudioRouter};
