use super::BoxError;
use std::borrow::Cow;

/// A single definition could not be turned into live credentials.
#[accord_derive::accord_error]
pub enum ParseError {
    /// The definition itself is wrong: bad endpoint, malformed secret, ...
    #[error("Invalid definition{}: {message}", format_context(.context))]
    Invalid { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("I/O error{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    /// Building a client or other provider resource failed.
    #[error("Provider error{}: {source}", format_context(.context))]
    Provider { source: BoxError, context: Option<Cow<'static, str>> },

    #[error("Internal parser error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
