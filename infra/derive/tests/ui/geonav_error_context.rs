use geonav_derive::geonav_error;
use std::borrow::Cow;

#[geonav_error]
pub enum LookupError {
    #[error("IO error{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("Unexpected status {status}{}", format_context(.context))]
    Status { status: u16, context: Option<Cow<'static, str>> },
}

fn read() -> Result<(), LookupError> {
    Err(std::io::Error::other("disk")).context("Reading cache")
}

fn status() -> Result<(), LookupError> {
    Err(LookupError::Status { status: 503, context: None }).context("Fetching ancestors")
}

fn main() {
    let err = read().unwrap_err();
    assert_eq!(err.to_string(), "IO error (Reading cache): disk");

    let err = status().unwrap_err();
    assert_eq!(err.to_string(), "Unexpected status 503 (Fetching ancestors)");
}
