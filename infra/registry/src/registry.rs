use crate::credentials::SharedCredentials;
use crate::error::RegistryError;
use crate::fallback::{FallbackSource, NoFallback};
use accord_domain::account::AccountType;
use fxhash::{FxHashMap, FxHashSet};
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace, warn};

struct RegistryInner {
    accounts: RwLock<FxHashMap<String, SharedCredentials>>,
    fallback: Arc<dyn FallbackSource>,
}

/// Name-keyed store of live credentials backed by a read-only fallback.
///
/// Cloning is cheap and every clone sees the same store. Reads and writes may
/// come from any thread; the writable map is never locked while the fallback
/// is being queried.
///
/// Lookup order is always the writable store first, then the fallback.
#[derive(Clone)]
pub struct CredentialsRegistry {
    inner: Arc<RegistryInner>,
}

impl CredentialsRegistry {
    /// A registry with no fallback.
    #[must_use]
    pub fn new() -> Self {
        Self::with_fallback(Arc::new(NoFallback))
    }

    #[must_use]
    pub fn with_fallback(fallback: Arc<dyn FallbackSource>) -> Self {
        Self {
            inner: Arc::new(RegistryInner {
                accounts: RwLock::new(FxHashMap::default()),
                fallback,
            }),
        }
    }

    /// Credentials stored under `name`, else the fallback's first match.
    #[must_use]
    pub fn lookup_optional(&self, name: &str) -> Option<SharedCredentials> {
        let stored = self.inner.accounts.read().get(name).cloned();
        if stored.is_some() {
            return stored;
        }

        trace!(name, "Account not in writable store, consulting fallback");
        self.inner.fallback.first_by_name(name)
    }

    /// # Errors
    /// [`RegistryError::Unresolved`] naming `name` when neither layer has it.
    pub fn lookup_required(&self, name: &str) -> Result<SharedCredentials, RegistryError> {
        self.lookup_optional(name).ok_or_else(|| RegistryError::by_name(name))
    }

    /// A non-empty `name` wins over the type; otherwise any account of `account_type`.
    ///
    /// `None` and `Some("")` are treated alike.
    ///
    /// # Errors
    /// [`RegistryError::Unresolved`] describing the name or the type that found nothing.
    pub fn lookup_required_by_name_or_type(
        &self,
        name: Option<&str>,
        account_type: AccountType,
    ) -> Result<SharedCredentials, RegistryError> {
        match name.filter(|n| !n.is_empty()) {
            Some(name) => self.lookup_required(name),
            None => {
                self.lookup_one_of_type(account_type).ok_or_else(|| RegistryError::by_type(account_type))
            },
        }
    }

    /// Some account supporting `account_type`.
    ///
    /// The writable store is searched before the fallback. Which writable
    /// account is returned when several qualify is unspecified.
    #[must_use]
    pub fn lookup_one_of_type(&self, account_type: AccountType) -> Option<SharedCredentials> {
        let stored = self
            .inner
            .accounts
            .read()
            .values()
            .find(|c| c.supports(account_type))
            .cloned();
        if stored.is_some() {
            return stored;
        }

        self.inner.fallback.all_credentials().into_iter().find(|c| c.supports(account_type))
    }

    /// Every account in either layer that supports `account_type`.
    #[must_use]
    pub fn lookup_all_of_type(&self, account_type: AccountType) -> Vec<SharedCredentials> {
        let mut all = self.enumerate_all();
        all.retain(|c| c.supports(account_type));
        all
    }

    /// The union of the writable store and the fallback.
    ///
    /// Entries are distinct by identity: the same object reachable from both
    /// layers appears once, while two different objects sharing a name both
    /// appear. Order is unspecified.
    #[must_use]
    pub fn enumerate_all(&self) -> Vec<SharedCredentials> {
        let mut all: Vec<SharedCredentials> = self.inner.accounts.read().values().cloned().collect();
        all.extend(self.inner.fallback.all_credentials());

        let mut seen = FxHashSet::default();
        all.retain(|c| seen.insert(Arc::as_ptr(c).cast::<()>()));
        all
    }

    /// Stores `credentials` under its own [`name`](crate::AccountCredentials::name).
    ///
    /// `name` is what the caller believes the key to be; a disagreement is
    /// logged and the credential's own name is used. Returns the replaced
    /// entry, if any.
    pub fn save(&self, name: &str, credentials: SharedCredentials) -> Option<SharedCredentials> {
        let key = credentials.name().to_owned();
        if key != name {
            warn!(requested = name, actual = %key, "Saving account under its own name");
        }

        let previous = self.inner.accounts.write().insert(key.clone(), credentials);
        debug!(name = %key, replaced = previous.is_some(), "Account saved");
        previous
    }

    /// Removes `name` from the writable store. The fallback is never touched.
    ///
    /// Deleting an unknown name is a no-op and returns `None`.
    pub fn delete(&self, name: &str) -> Option<SharedCredentials> {
        let removed = self.inner.accounts.write().remove(name);
        if removed.is_some() {
            debug!(name, "Account deleted");
        }
        removed
    }

    /// Whether `name` is in the writable store.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.inner.accounts.read().contains_key(name)
    }

    /// Names in the writable store, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.inner.accounts.read().keys().cloned().collect();
        names.sort_unstable();
        names
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.accounts.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.accounts.read().is_empty()
    }
}

impl Default for CredentialsRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CredentialsRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialsRegistry")
            .field("accounts", &self.names())
            .field("fallback", &self.inner.fallback)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::AccountCredentials;
    use accord_domain::account::AccountTypes;
    use std::any::Any;

    #[derive(Debug)]
    struct Dummy(&'static str);

    impl AccountCredentials for Dummy {
        fn name(&self) -> &str {
            self.0
        }

        fn provider(&self) -> &str {
            "dummy"
        }

        fn supported_types(&self) -> AccountTypes {
            AccountTypes::OBJECT_STORE
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[test]
    fn clones_share_the_store() {
        let registry = CredentialsRegistry::new();
        let clone = registry.clone();
        clone.save("a", Arc::new(Dummy("a")));

        assert!(registry.contains("a"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn save_replaces_and_returns_previous() {
        let registry = CredentialsRegistry::new();
        let first: SharedCredentials = Arc::new(Dummy("a"));
        assert!(registry.save("a", first.clone()).is_none());

        let previous = registry.save("a", Arc::new(Dummy("a"))).unwrap();
        assert!(Arc::ptr_eq(&previous, &first));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn debug_lists_names() {
        let registry = CredentialsRegistry::new();
        registry.save("b", Arc::new(Dummy("b")));
        registry.save("a", Arc::new(Dummy("a")));

        let rendered = format!("{registry:?}");
        assert!(rendered.contains(r#"["a", "b"]"#), "{rendered}");
    }
}
