use config::{Config, Environment, File};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::Path;
use tracing::info;

/// File looked up in the working directory when no path is given (any supported extension).
pub const DEFAULT_CONFIG_FILE: &str = "geonav";
/// Prefix of environment overrides, e.g. `GEONAV__SERVICE__BASE_URL`.
pub const ENV_PREFIX: &str = "GEONAV";

/// Custom error type for config loading.
#[geonav_derive::geonav_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// Loads configuration from a file overlaid with environment variables.
///
/// 1. **Base File**: `path` when given (it must exist); otherwise `geonav.{toml,json,yaml}`
///    in the working directory if present.
/// 2. **Environment Overrides**: variables prefixed with `GEONAV__`; nested keys use double
///    underscores (`GEONAV__NAVIGATION__DEFAULT_HIERARCHY` maps to `navigation.default_hierarchy`).
///
/// Missing keys fall back to the target type's serde defaults.
///
/// # Errors
/// * An explicit `path` that cannot be read.
/// * Content that does not match the structure of `T`.
///
/// # Example
/// ```rust
/// use geonav_kernel::config::load_config;
///
/// #[derive(Default, serde::Deserialize)]
/// struct AppConfig {
///     port: u16,
/// }
///
/// let cfg: AppConfig = load_config(Some("config/local")).unwrap_or_default();
/// ```
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let file = match path.as_ref() {
        Some(path) => {
            info!(path = %path.as_ref().display(), "Loading config");
            File::from(path.as_ref()).required(true)
        },
        None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
    };

    let config = Config::builder()
        .add_source(file)
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true)
                .convert_case(config::Case::Snake),
        )
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")?;

    Ok(config)
}
