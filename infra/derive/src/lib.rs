#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros shared by every crate of the workspace.
//!
//! * [`geonav_error`] turns a plain enum into a context-aware error type.
//! * [`main`] bootstraps a Tokio runtime from a named profile.
//!
//! The examples below are `ignore`d because a proc-macro crate cannot use its own
//! macros in doctests; the `tests/` directory exercises them through `trybuild`.

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, ItemFn, parse_macro_input};

/// Attribute macro to bootstrap a Tokio runtime for an `async fn main`.
///
/// # Arguments
///
/// * `cooperative` - Single-threaded scheduler; every task of the session runs on the
///   calling thread.
/// * `memory_efficient` - Small multithreaded pool for client tools.
/// * `default` - Worker threads auto-detected from the available parallelism.
///
/// # Examples
///
/// ```rust,ignore
/// #[geonav_runtime::main(cooperative)]
/// async fn main() -> anyhow::Result<()> {
///     Ok(())
/// }
/// ```
#[proc_macro_attribute]
pub fn main(args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    macros::runtime::expand_main(args.into(), input).into()
}

/// Attribute macro for defining crate error enums.
///
/// # Features
///
/// * **Automatic Derives**: Injects `#[derive(Debug, thiserror::Error)]` unless present.
/// * **Context Support**: Generates a companion `<Name>Ext` trait that adds `.context()`
///   to `Result<T, Name>` and to `Result<T, Source>` for every wrapped source error.
/// * **Conversions**: Implements `From<Source>` for variants with a `source` field so
///   `?` works on upstream errors.
/// * **Internal Fallback**: `From<&'static str>` and `From<String>` when an `Internal`
///   variant exists.
///
/// # Requirements
///
/// 1. Only enums are accepted, and every variant must use named fields.
/// 2. A `context` field must have the type `Option<Cow<'static, str>>`.
/// 3. Variants with a `source` field (or a field marked `#[source]`/`#[from]`) must also
///    carry a `context` field.
///
/// # Example
///
/// ```rust,ignore
/// use std::borrow::Cow;
///
/// #[geonav_derive::geonav_error]
/// pub enum ServiceError {
///     #[error("Malformed payload{}: {source}", format_context(.context))]
///     Shape { source: serde_json::Error, context: Option<Cow<'static, str>> },
///
///     #[error("Internal error{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
///
/// fn decode(bytes: &[u8]) -> Result<Vec<u64>, ServiceError> {
///     serde_json::from_slice(bytes).context("Decoding ancestors")
/// }
/// ```
#[proc_macro_attribute]
pub fn geonav_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand(input).into()
}
