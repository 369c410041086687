//! Facade crate for the region navigator.
//! Re-exports domain, kernel and navigation primitives and wires a session to the
//! HTTP region service. Keep this crate thin: it composes other crates and holds no
//! navigation logic.
//!
//! ## Usage
//! - Add `geonav` (the `http` feature is on by default).
//! - Call [`connect`] with a loaded [`NavigatorConfig`](domain::config::NavigatorConfig).

use std::borrow::Cow;

pub use geonav_domain as domain;
pub use geonav_event_bus as events;
pub use geonav_kernel as kernel;
pub use geonav_navigation as navigation;
#[cfg(feature = "http")]
pub use geonav_region_client as client;

use geonav_kernel::service::ServiceError;
use geonav_navigation::NavigationError;

/// Build-time enabled features (by Cargo feature).
pub mod features {
    pub const ENABLED: &[&str] = &[
        #[cfg(feature = "http")]
        "http",
    ];

    #[must_use]
    pub fn is_enabled(name: &str) -> bool {
        ENABLED.contains(&name)
    }
}

/// Errors surfaced while bringing up a navigator.
#[geonav_derive::geonav_error]
pub enum GeonavError {
    #[error("Region service error{}: {source}", format_context(.context))]
    Service { source: ServiceError, context: Option<Cow<'static, str>> },

    #[error("Navigation error{}: {source}", format_context(.context))]
    Navigation { source: NavigationError, context: Option<Cow<'static, str>> },
}

/// Builds the HTTP client from `config.service` and starts a session with
/// `config.navigation`.
///
/// # Errors
/// * [`GeonavError::Service`] for an invalid service configuration.
/// * [`GeonavError::Navigation`] when no hierarchy can be selected.
#[cfg(feature = "http")]
pub async fn connect(
    config: &domain::config::NavigatorConfig,
) -> Result<navigation::NavigationSession<client::RegionClient>, GeonavError> {
    let client = client::RegionClient::builder()
        .config(&config.service)
        .build()
        .context("Connecting to the region service")?;
    tracing::debug!(base_url = client.base_url(), "Starting navigation session");

    let session =
        navigation::NavigationSession::builder(client).config(&config.navigation).start().await?;
    Ok(session)
}
