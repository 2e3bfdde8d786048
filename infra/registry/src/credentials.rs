use accord_domain::account::{AccountType, AccountTypes};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// A live, usable account object produced from a definition.
///
/// Implementations are shared as [`SharedCredentials`] between the registry,
/// the fallback sources, and whoever looked them up, so they must be immutable
/// once built.
pub trait AccountCredentials: Any + fmt::Debug + Send + Sync {
    /// Unique key within the registry's writable store.
    fn name(&self) -> &str;

    /// Short provider tag such as `prometheus`.
    fn provider(&self) -> &str;

    fn supported_types(&self) -> AccountTypes;

    /// Concrete access for callers that know the provider type.
    fn as_any(&self) -> &dyn Any;

    fn supports(&self, account_type: AccountType) -> bool {
        self.supported_types().contains_type(account_type)
    }
}

/// Credentials as handed out by the registry.
pub type SharedCredentials = Arc<dyn AccountCredentials>;
