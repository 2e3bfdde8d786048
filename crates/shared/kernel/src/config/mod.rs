use config::{Config, Environment, File};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::info;

/// Prefix of environment overrides, e.g. `ACCORD__LOADER__PARALLEL=true`.
pub const ENV_PREFIX: &str = "ACCORD";
/// Nesting separator used in environment override keys.
pub const ENV_SEPARATOR: &str = "__";
/// File stem used when no path is given (`accord.toml`, `accord.yaml`, ...).
pub const DEFAULT_CONFIG: &str = "accord";

#[accord_derive::accord_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// Loads `T` from a configuration file overlaid with `ACCORD__*` environment variables.
///
/// 1. **Base File**: `path`, or `accord` in the working directory. Any format the
///    `config` crate recognizes by extension works; the file is required.
/// 2. **Environment Overrides**: `ACCORD__SECTION__KEY` maps to `section.key`.
///
/// # Errors
/// Returns [`ConfigError::Config`] if the file is missing or unreadable, or if
/// the merged values do not deserialize into `T`.
///
/// # Example
/// ```rust
/// use accord_kernel::config::load_config;
/// use accord_kernel::domain::config::LoaderConfig;
///
/// #[derive(Default, serde::Deserialize)]
/// struct Settings {
///     #[serde(default)]
///     loader: LoaderConfig,
/// }
///
/// let settings: Settings = load_config(Some("config/local")).unwrap_or_default();
/// assert_eq!(settings.loader.interval_seconds, 30);
/// ```
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    load_layered(path, None)
}

fn load_layered<T>(
    path: Option<impl AsRef<Path>>,
    env: Option<config::Map<String, String>>,
) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let effective_path =
        path.map_or_else(|| PathBuf::from(DEFAULT_CONFIG), |p| p.as_ref().to_path_buf());

    let builder = Config::builder()
        .add_source(File::from(effective_path.as_path()).required(true))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator(ENV_SEPARATOR)
                .try_parsing(true)
                .source(env),
        );

    info!(path = %effective_path.display(), "Loading configuration");

    builder
        .build()
        .context(format!("Failed to build config from {}", effective_path.display()))?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")
}
