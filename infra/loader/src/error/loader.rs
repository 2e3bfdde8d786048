use super::SourceError;
use std::borrow::Cow;

/// Pass-level failures. Per-definition problems never surface here.
#[accord_derive::accord_error]
pub enum LoaderError {
    /// The definition source could not produce the current set; nothing was changed.
    #[error("Definition fetch failed{}: {source}", format_context(.context))]
    Fetch { source: SourceError, context: Option<Cow<'static, str>> },
}
