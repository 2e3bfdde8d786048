use crate::credentials::SharedCredentials;
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

/// A read-only provider of credentials consulted after the writable store.
///
/// The registry never caches what a fallback returns; every lookup asks again,
/// so sources whose content changes over time are observed live.
pub trait FallbackSource: fmt::Debug + Send + Sync {
    /// Every credential this source currently knows about.
    fn all_credentials(&self) -> Vec<SharedCredentials>;

    /// The first credential named `name`, in this source's own order.
    fn first_by_name(&self, name: &str) -> Option<SharedCredentials> {
        self.all_credentials().into_iter().find(|c| c.name() == name)
    }
}

impl<F: FallbackSource + ?Sized> FallbackSource for Arc<F> {
    fn all_credentials(&self) -> Vec<SharedCredentials> {
        (**self).all_credentials()
    }

    fn first_by_name(&self, name: &str) -> Option<SharedCredentials> {
        (**self).first_by_name(name)
    }
}

/// A fallback that never has anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoFallback;

impl FallbackSource for NoFallback {
    fn all_credentials(&self) -> Vec<SharedCredentials> {
        Vec::new()
    }

    fn first_by_name(&self, _name: &str) -> Option<SharedCredentials> {
        None
    }
}

/// An in-memory fallback whose contents can be swapped at runtime.
#[derive(Debug, Default)]
pub struct StaticFallback {
    credentials: RwLock<Vec<SharedCredentials>>,
}

impl StaticFallback {
    #[must_use]
    pub fn new(credentials: impl IntoIterator<Item = SharedCredentials>) -> Self {
        Self { credentials: RwLock::new(credentials.into_iter().collect()) }
    }

    /// Appends a credential; an earlier one with the same name still wins `first_by_name`.
    pub fn push(&self, credentials: SharedCredentials) {
        self.credentials.write().push(credentials);
    }

    /// Drops every credential named `name`, returning how many were removed.
    pub fn remove(&self, name: &str) -> usize {
        let mut guard = self.credentials.write();
        let before = guard.len();
        guard.retain(|c| c.name() != name);
        before - guard.len()
    }

    pub fn replace(&self, credentials: impl IntoIterator<Item = SharedCredentials>) {
        *self.credentials.write() = credentials.into_iter().collect();
    }
}

impl FallbackSource for StaticFallback {
    fn all_credentials(&self) -> Vec<SharedCredentials> {
        self.credentials.read().clone()
    }

    fn first_by_name(&self, name: &str) -> Option<SharedCredentials> {
        self.credentials.read().iter().find(|c| c.name() == name).cloned()
    }
}

/// Several fallbacks consulted in order. The first source with a match wins.
#[derive(Debug, Default, Clone)]
pub struct CompositeFallback {
    sources: Vec<Arc<dyn FallbackSource>>,
}

impl CompositeFallback {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, source: Arc<dyn FallbackSource>) -> Self {
        self.sources.push(source);
        self
    }

    pub fn push(&mut self, source: Arc<dyn FallbackSource>) {
        self.sources.push(source);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl FallbackSource for CompositeFallback {
    fn all_credentials(&self) -> Vec<SharedCredentials> {
        self.sources.iter().flat_map(|s| s.all_credentials()).collect()
    }

    fn first_by_name(&self, name: &str) -> Option<SharedCredentials> {
        self.sources.iter().find_map(|s| s.first_by_name(name))
    }
}
