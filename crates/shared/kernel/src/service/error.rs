use std::borrow::Cow;

/// Failure of a region service call.
///
/// "No content" answers are not errors; they surface as `None` or empty results.
#[geonav_derive::geonav_error]
pub enum ServiceError {
    /// The request never produced a response (connection refused, DNS, reset).
    #[error("Transport error{}: {message}", format_context(.context))]
    Transport { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The service answered with a non-success status.
    #[error("Unexpected status {status}{}", format_context(.context))]
    Status { status: u16, context: Option<Cow<'static, str>> },

    /// The body does not decode to the expected shape.
    #[error("Malformed response{}: {source}", format_context(.context))]
    Shape { source: serde_json::Error, context: Option<Cow<'static, str>> },

    /// The call did not complete within its time budget.
    #[error("Timed out{}: {message}", format_context(.context))]
    Timeout { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The client is misconfigured (e.g., invalid base URL).
    #[error("Invalid client configuration{}: {message}", format_context(.context))]
    Config { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl ServiceError {
    /// Transport, timeout and 5xx failures; a retry may succeed.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        match self {
            Self::Transport { .. } | Self::Timeout { .. } => true,
            Self::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }
}
