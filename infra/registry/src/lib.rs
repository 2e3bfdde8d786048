//! # Registry
//!
//! The runtime's single source of truth for "which accounts exist right now".
//!
//! A [`CredentialsRegistry`] holds a writable, name-keyed map of live
//! credentials and consults a read-only [`FallbackSource`] whenever the map
//! has no answer. Accounts reconciled from configuration land in the map;
//! anything provisioned elsewhere can be exposed through the fallback.
//!
//! ```rust
//! use accord_registry::{CredentialsRegistry, StaticFallback};
//! use std::sync::Arc;
//!
//! let fallback = Arc::new(StaticFallback::default());
//! let registry = CredentialsRegistry::with_fallback(fallback.clone());
//!
//! assert!(registry.lookup_optional("prod").is_none());
//! assert!(registry.lookup_required("prod").is_err());
//! ```

mod credentials;
mod error;
mod fallback;
mod registry;

pub use crate::credentials::{AccountCredentials, SharedCredentials};
pub use crate::error::{RegistryError, RegistryErrorExt};
pub use crate::fallback::{CompositeFallback, FallbackSource, NoFallback, StaticFallback};
pub use crate::registry::CredentialsRegistry;
pub use accord_domain::account::{AccountType, AccountTypes};
