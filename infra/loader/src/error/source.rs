use super::BoxError;
use std::borrow::Cow;

/// Returned by a [`DefinitionSource`](crate::DefinitionSource) that cannot list definitions.
#[accord_derive::accord_error]
pub enum SourceError {
    #[error("Definition source unavailable{}: {source}", format_context(.context))]
    Unavailable { source: BoxError, context: Option<Cow<'static, str>> },

    #[error("Internal definition source error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
