use geonav_derive::geonav_error;
use std::borrow::Cow;

#[geonav_error]
pub enum LookupError {
    #[error("IO error{}: {source}", format_context(.context))]
    Io {
        #[source]
        source: std::io::Error,
        context: Option<Cow<'static, str>>,
    },

    #[error("Unexpected status {status}{}", format_context(.context))]
    Status { status: u16, context: Option<Cow<'static, str>> },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn main() {
    let from_str: LookupError = "boom".into();
    assert!(matches!(from_str, LookupError::Internal { .. }));

    let io = std::io::Error::other("disk");
    let converted: LookupError = io.into();
    assert!(matches!(converted, LookupError::Io { context: None, .. }));
}
