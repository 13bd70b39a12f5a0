//! Handler types and dependencies

use std::sync::Arc;

use teloxide::prelude::*;
use teloxide::types::MessageId;

use crate::config;
use crate::routes::StudioRouter;

/// Error type for handlers
pub use studiocore::HandlerError;

/// Dependencies required by handlers
#[derive(Clone)]
pub struct HandlerDeps {
    pub router: Arc<StudioRouter>,
    pub admin_user_id: u64,
}

impl HandlerDeps {
    /// Create new handler dependencies
    pub fn new(router: Arc<StudioRouter>, admin_user_id: u64) -> Self {
        Self { router, admin_user_id }
    }

    /// Dependencies using ADMIN_USER_ID from the environment
    pub fn from_config(router: Arc<StudioRouter>) -> Self {
        Self::new(router, *config::admin::ADMIN_USER_ID)
    }

    pub fn is_admin(&self, user_id: UserId) -> bool {
        self.admin_user_id != 0 && self.admin_user_id == user_id.0
    }
}

/// Per-request context handed to a route handler together with its query.
///
/// Built fresh for every callback query and owned by the handler.
#[derive(Clone, Debug)]
pub struct CallbackContext {
    pub bot: Bot,
    /// Chat of the message carrying the button, if still accessible
    pub chat_id: Option<ChatId>,
    pub message_id: Option<MessageId>,
    pub is_admin: bool,
}

impl CallbackContext {
    pub fn from_query(bot: Bot, q: &CallbackQuery, deps: &HandlerDeps) -> Self {
        Self {
            bot,
            chat_id: q.message.as_ref().map(|m| m.chat().id),
            message_id: q.message.as_ref().map(|m| m.id()),
            is_admin: deps.is_admin(q.from.id),
        }
    }
}
