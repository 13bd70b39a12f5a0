use thiserror::Error;

/// Error type returned by route handlers.
///
/// Same boxed shape the teloxide dispatcher uses, so handler failures can be
/// passed straight through to its error handler.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result returned by route handlers
pub type HandlerResult = Result<(), HandlerError>;

/// Errors produced by the callback router
///
/// # Example
///
/// ```
/// use studiocore::{CallbackRequest, CallbackRouter, RouterError};
///
/// let mut router: CallbackRouter<CallbackRequest, ()> = CallbackRouter::new();
/// let err = router.on("project_(", |_, _| async { Ok(()) }).unwrap_err();
/// assert!(matches!(err, RouterError::InvalidPattern { .. }));
/// ```
#[derive(Error, Debug)]
pub enum RouterError {
    /// Pattern passed to `register` does not compile. Fatal at startup.
    #[error("Invalid callback pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A matched handler failed. The router logs it and hands it back untouched.
    #[error("Callback handler for '{pattern}' failed: {source}")]
    Handler {
        pattern: String,
        #[source]
        source: HandlerError,
    },

    /// Callback identifier longer than Telegram accepts
    #[error("Callback data '{data}' is {len} bytes, limit is {limit}")]
    CallbackDataTooLong { data: String, len: usize, limit: usize },
}

impl RouterError {
    /// Pattern of the route involved, if any
    pub fn pattern(&self) -> Option<&str> {
        match self {
            RouterError::InvalidPattern { pattern, .. } | RouterError::Handler { pattern, .. } => Some(pattern),
            RouterError::CallbackDataTooLong { .. } => None,
        }
    }
}

/// Type alias for Result with RouterError
pub type RouterResult<T> = Result<T, RouterError>;
