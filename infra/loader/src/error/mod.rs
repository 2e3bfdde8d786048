mod loader;
mod parse;
mod source;

pub use loader::{LoaderError, LoaderErrorExt};
pub use parse::{ParseError, ParseErrorExt};
pub use source::{SourceError, SourceErrorExt};

/// Boxed error from a backend the loader knows nothing about.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;
