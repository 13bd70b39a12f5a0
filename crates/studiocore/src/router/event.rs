//! Inbound events the router can dispatch

/// An inbound event carrying a callback identifier.
///
/// The identifier is the free-form token a UI button was built with
/// (Telegram's `callback_data`). Events without one are never matched.
pub trait CallbackEvent {
    /// The identifier to match against route patterns
    fn callback_data(&self) -> Option<&str>;

    /// Originating user, if known
    fn user_id(&self) -> Option<u64>;
}

/// Plain callback event, detached from any transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackRequest {
    pub data: Option<String>,
    pub user_id: u64,
}

impl CallbackRequest {
    /// Event from `user_id` carrying `data`
    pub fn new(data: impl Into<String>, user_id: u64) -> Self {
        Self {
            data: Some(data.into()),
            user_id,
        }
    }

    /// Event from `user_id` without any identifier (e.g. a game button)
    pub fn empty(user_id: u64) -> Self {
        Self { data: None, user_id }
    }
}

impl CallbackEvent for CallbackRequest {
    fn callback_data(&self) -> Option<&str> {
        self.data.as_deref()
    }

    fn user_id(&self) -> Option<u64> {
        Some(self.user_id)
    }
}

#[cfg(feature = "telegram")]
impl CallbackEvent for teloxide::types::CallbackQuery {
    fn callback_data(&self) -> Option<&str> {
        self.data.as_deref()
    }

    fn user_id(&self) -> Option<u64> {
        Some(self.from.id.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_exposes_data_and_user() {
        let req = CallbackRequest::new("project_details_42", 7);
        assert_eq!(req.callback_data(), Some("project_details_42"));
        assert_eq!(CallbackEvent::user_id(&req), Some(7));
    }

    #[test]
    fn test_empty_request_has_no_data() {
        let req = CallbackRequest::empty(7);
        assert_eq!(req.callback_data(), None);
    }
}
