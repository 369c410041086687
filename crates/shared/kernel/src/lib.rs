//! Kernel shared by the navigator crates.
//!
//! * [`service`]: the region service contract ([`service::RegionService`]), its error
//!   type and the fail-soft lookups ([`service::RegionServiceExt`]) the navigation
//!   layer degrades to.
//! * [`config`]: layered file + environment configuration loading.
//!
//! ## Config loading
//! ```rust,no_run
//! use geonav_kernel::config::load_config;
//! use geonav_kernel::domain::config::NavigatorConfig;
//!
//! let cfg: NavigatorConfig = load_config(None::<&str>).unwrap_or_default();
//! assert!(!cfg.service.base_url.is_empty());
//! ```
pub mod config;
pub mod service;

pub use geonav_domain as domain;
