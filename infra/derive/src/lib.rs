#![allow(unreachable_pub)]

//! # Macros
//!
//! Procedural macros for the Accord infrastructure crates.
//!
//! ## Usage
//! Depend on the crate from any workspace member that declares an error enum:
//! ```toml
//! [dependencies]
//! accord-derive.workspace = true
//! thiserror.workspace = true
//! ```

mod error;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

/// Attribute macro for declaring a crate-level error enum.
///
/// # Features
///
/// * **Automatic Derives**: Injects `#[derive(Debug, thiserror::Error)]` unless already present.
/// * **Context Support**: Generates a companion `<Name>Ext` trait that adds `.context(..)`
///   to `Result<T, Name>` and to `Result<T, Source>` for every wrapped source error.
/// * **Conversions**: Implements `From<Source>` for variants that wrap an upstream error,
///   so `?` works without a manual `map_err`.
/// * **Internal Fallback**: Implements `From<&'static str>` and `From<String>` when an
///   `Internal` variant is present.
///
/// # Requirements
///
/// 1. The macro must be applied to an **enum** with named-field variants only.
/// 2. A `context` field, when present, must be `Option<Cow<'static, str>>`.
/// 3. A variant wrapping an error (field named `source` or marked `#[source]`/`#[from]`)
///    must also carry a `context` field.
///
/// Display strings can call the generated `format_context(.context)` helper, which renders
/// ` (context)` or nothing.
///
/// # Example
///
/// ```rust,ignore
/// use accord_derive::accord_error;
/// use std::borrow::Cow;
///
/// #[accord_error]
/// pub enum SourceError {
///     #[error("I/O failure{}: {source}", format_context(.context))]
///     Io { source: std::io::Error, context: Option<Cow<'static, str>> },
///
///     #[error("Internal fault{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
///
/// fn read(path: &str) -> Result<String, SourceError> {
///     std::fs::read_to_string(path).context("Reading account definitions")
/// }
/// ```
#[proc_macro_attribute]
pub fn accord_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    error::expand(input).unwrap_or_else(syn::Error::into_compile_error).into()
}
