use crate::error::{ParseError, SourceError};
use accord_registry::SharedCredentials;
use std::fmt;
use std::sync::Arc;

/// A declarative description of one account, as read from configuration.
///
/// Two definitions are "the same" when they compare equal field by field; the
/// loader relies on [`PartialEq`] to decide whether an account changed.
pub trait CredentialsDefinition: Clone + PartialEq + fmt::Debug + Send + Sync + 'static {
    /// Unique key of the definition and of the credentials built from it.
    fn name(&self) -> &str;
}

/// Supplies the complete current set of definitions.
pub trait DefinitionSource: Send + Sync + 'static {
    type Definition: CredentialsDefinition;

    /// Every definition that should exist right now.
    ///
    /// An error aborts the whole reconciliation pass before anything is touched.
    fn fetch_all(&self) -> impl Future<Output = Result<Vec<Self::Definition>, SourceError>> + Send;
}

/// What a parser made of a definition.
#[derive(Debug, Clone)]
pub enum Parsed {
    Credentials(SharedCredentials),
    /// The parser declined; the definition is retried on the next pass.
    Skip,
}

/// Turns a definition into live credentials.
pub trait DefinitionParser<D: CredentialsDefinition>: Send + Sync + 'static {
    /// # Errors
    /// A [`ParseError`] fails this definition only; the rest of the pass continues.
    fn parse(&self, definition: &D) -> impl Future<Output = Result<Parsed, ParseError>> + Send;
}

impl<S: DefinitionSource> DefinitionSource for Arc<S> {
    type Definition = S::Definition;

    fn fetch_all(&self) -> impl Future<Output = Result<Vec<Self::Definition>, SourceError>> + Send {
        (**self).fetch_all()
    }
}

impl<D: CredentialsDefinition, P: DefinitionParser<D>> DefinitionParser<D> for Arc<P> {
    fn parse(&self, definition: &D) -> impl Future<Output = Result<Parsed, ParseError>> + Send {
        (**self).parse(definition)
    }
}
