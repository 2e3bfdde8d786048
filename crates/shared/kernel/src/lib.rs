//! Kernel utilities shared across Accord crates.
//! Keep this crate lightweight; it re-exports the domain models and owns configuration loading.
//!
//! ## Config loading
//! ```rust,no_run
//! use accord_kernel::config::load_config;
//! use accord_kernel::domain::config::LoaderConfig;
//!
//! #[derive(serde::Deserialize)]
//! struct Settings {
//!     loader: LoaderConfig,
//! }
//!
//! let settings: Settings = load_config(Some("accord")).unwrap();
//! assert!(settings.loader.max_concurrency > 0);
//! ```
pub mod config;

pub use accord_domain as domain;
