//! # Loader
//!
//! Brings a [`CredentialsRegistry`](accord_registry::CredentialsRegistry) into
//! agreement with whatever a [`DefinitionSource`] currently lists.
//!
//! Each [`CredentialsLoader::reconcile`] pass:
//!
//! 1. fetches every definition (a failure here aborts the pass untouched),
//! 2. deletes registry entries whose names are no longer listed,
//! 3. skips definitions equal to the last applied version,
//! 4. parses the rest, sequentially or on a bounded pool ([`ApplyMode`]),
//! 5. saves the resulting credentials.
//!
//! A definition the parser skips or fails on is not remembered, so the next
//! pass tries it again.
//!
//! [`spawn_periodic`] drives passes on a timer.

mod definition;
mod error;
mod loader;
mod mode;
mod periodic;
mod report;

pub use crate::definition::{CredentialsDefinition, DefinitionParser, DefinitionSource, Parsed};
pub use crate::error::{
    BoxError, LoaderError, LoaderErrorExt, ParseError, ParseErrorExt, SourceError, SourceErrorExt,
};
pub use crate::loader::{CredentialsLoader, LoaderBuilder, Missing};
pub use crate::mode::ApplyMode;
pub use crate::periodic::spawn_periodic;
pub use crate::report::ReconcileReport;
