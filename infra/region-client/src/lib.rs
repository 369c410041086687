//! # Region Client
//!
//! [`RegionService`] over HTTP/JSON, backed by [`reqwest`].
//!
//! | Call | Request | Absent |
//! |---|---|---|
//! | hierarchies | `GET /api/regions/hierarchies` | `204` → `[]` |
//! | root regions | `GET /api/regions/root?hierarchyId` | `204` → `[]` |
//! | subregions | `GET /api/regions/{id}/subregions?hierarchyId` | `204` → `None` |
//! | region | `GET /api/regions/{id}?hierarchyId` | error |
//! | geometry | `GET /api/regions/{id}/geometry?resolveEmpty&hierarchyId` | `204`/`404` → `None` |
//! | ancestors | `GET /api/regions/{id}/ancestors?hierarchyId` | `204` → `[]` |
//!
//! Bodies are decoded with `serde_json`, so a payload of the wrong shape surfaces as
//! [`ServiceError::Shape`] instead of a transport failure.
//!
//! ## Example
//!
//! ```rust,no_run
//! use geonav_region_client::RegionClient;
//! use geonav_kernel::service::{RegionService, ServiceError};
//! use std::time::Duration;
//!
//! # async fn run() -> Result<(), ServiceError> {
//! let client = RegionClient::builder()
//!     .base_url("http://localhost:3000")
//!     .timeout(Duration::from_secs(10))
//!     .build()?;
//!
//! let hierarchies = client.hierarchies().await?;
//! # Ok(())
//! # }
//! ```

use geonav_domain::config::ServiceConfig;
use geonav_domain::{Hierarchy, HierarchyId, Region, RegionId};
use geonav_kernel::service::{Geometry, RegionService, ServiceError, ServiceErrorExt};
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, trace};

const HIERARCHY_PARAM: &str = "hierarchyId";
const RESOLVE_EMPTY_PARAM: &str = "resolveEmpty";

/// Outcome of a request whose status may legitimately mean "nothing here".
enum Fetched {
    Body(Vec<u8>),
    Absent(StatusCode),
}

#[derive(Debug)]
struct ClientInner {
    http: reqwest::Client,
    base_url: String,
}

/// Cheaply cloneable handle to the region service.
#[derive(Debug, Clone)]
pub struct RegionClient {
    inner: Arc<ClientInner>,
}

impl RegionClient {
    /// Creates a new [`RegionClientBuilder`].
    pub fn builder() -> RegionClientBuilder {
        RegionClientBuilder::default()
    }

    /// Base URL every request path is joined to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    async fn fetch(
        &self,
        path: &str,
        query: &[(&str, String)],
        absent: &[StatusCode],
    ) -> Result<Fetched, ServiceError> {
        let url = format!("{}{path}", self.inner.base_url);
        let response =
            self.inner.http.get(url).query(query).send().await.map_err(|e| request_error(&e, path))?;

        let status = response.status();
        trace!(%status, path, "Region service answered");
        if absent.contains(&status) {
            return Ok(Fetched::Absent(status));
        }
        if !status.is_success() {
            return Err(ServiceError::Status {
                status: status.as_u16(),
                context: Some(path.to_owned().into()),
            });
        }

        let body = response.bytes().await.map_err(|e| request_error(&e, path))?;
        Ok(Fetched::Body(body.to_vec()))
    }

    async fn fetch_list<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>, ServiceError> {
        match self.fetch(path, query, &[StatusCode::NO_CONTENT]).await? {
            Fetched::Body(body) => decode(&body, path),
            Fetched::Absent(_) => Ok(Vec::new()),
        }
    }
}

impl RegionService for RegionClient {
    #[instrument(skip(self))]
    async fn hierarchies(&self) -> Result<Vec<Hierarchy>, ServiceError> {
        self.fetch_list("/api/regions/hierarchies", &[]).await
    }

    #[instrument(skip(self))]
    async fn root_regions(&self, hierarchy: HierarchyId) -> Result<Vec<Region>, ServiceError> {
        self.fetch_list("/api/regions/root", &hierarchy_query(hierarchy)).await
    }

    #[instrument(skip(self))]
    async fn subregions(
        &self,
        region: RegionId,
        hierarchy: HierarchyId,
    ) -> Result<Option<Vec<Region>>, ServiceError> {
        let path = format!("/api/regions/{region}/subregions");
        match self.fetch(&path, &hierarchy_query(hierarchy), &[StatusCode::NO_CONTENT]).await? {
            Fetched::Body(body) => decode(&body, &path).map(Some),
            Fetched::Absent(_) => {
                debug!(%region, "Region reports no subregions");
                Ok(None)
            },
        }
    }

    #[instrument(skip(self))]
    async fn region(&self, region: RegionId, hierarchy: HierarchyId) -> Result<Region, ServiceError> {
        let path = format!("/api/regions/{region}");
        match self.fetch(&path, &hierarchy_query(hierarchy), &[]).await? {
            Fetched::Body(body) => decode(&body, &path),
            Fetched::Absent(status) => Err(ServiceError::Status {
                status: status.as_u16(),
                context: Some(path.into()),
            }),
        }
    }

    #[instrument(skip(self))]
    async fn geometry(
        &self,
        region: RegionId,
        hierarchy: HierarchyId,
        resolve_empty: bool,
    ) -> Result<Option<Geometry>, ServiceError> {
        let path = format!("/api/regions/{region}/geometry");
        let query = [
            (RESOLVE_EMPTY_PARAM, resolve_empty.to_string()),
            (HIERARCHY_PARAM, hierarchy.to_string()),
        ];
        match self.fetch(&path, &query, &[StatusCode::NO_CONTENT, StatusCode::NOT_FOUND]).await? {
            Fetched::Body(body) => decode(&body, &path).map(Some),
            Fetched::Absent(status) => {
                debug!(%region, %status, "Region has no geometry");
                Ok(None)
            },
        }
    }

    #[instrument(skip(self))]
    async fn ancestors(
        &self,
        region: RegionId,
        hierarchy: HierarchyId,
    ) -> Result<Vec<Region>, ServiceError> {
        self.fetch_list(&format!("/api/regions/{region}/ancestors"), &hierarchy_query(hierarchy)).await
    }
}

/// A fluent builder for [`RegionClient`].
#[must_use = "builders do nothing unless you call .build()"]
#[derive(Debug, Default)]
pub struct RegionClientBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
}

impl RegionClientBuilder {
    /// Sets the service root, e.g. `http://localhost:3000`.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Per-request timeout covering connect, headers and body.
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Applies a [`ServiceConfig`]; a zero timeout leaves requests unbounded.
    pub fn config(mut self, config: &ServiceConfig) -> Self {
        self.base_url = Some(config.base_url.clone());
        self.timeout = (config.timeout_seconds > 0).then(|| Duration::from_secs(config.timeout_seconds));
        self
    }

    /// Validates the base URL and builds the HTTP client.
    ///
    /// # Errors
    /// [`ServiceError::Config`] for a missing or non-HTTP base URL, or when the TLS
    /// backend cannot be initialized.
    pub fn build(self) -> Result<RegionClient, ServiceError> {
        let raw = self.base_url.ok_or(ServiceError::Config {
            message: "Base URL is required".into(),
            context: None,
        })?;

        let parsed = Url::parse(&raw).map_err(|e| ServiceError::Config {
            message: e.to_string().into(),
            context: Some(raw.clone().into()),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ServiceError::Config {
                message: format!("Unsupported scheme '{}'", parsed.scheme()).into(),
                context: Some(raw.into()),
            });
        }
        let base_url = raw.trim_end_matches('/').to_owned();

        let mut http = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            http = http.timeout(timeout);
        }
        let http = http.build().map_err(|e| ServiceError::Config {
            message: e.to_string().into(),
            context: Some("Building HTTP client".into()),
        })?;

        debug!(%base_url, timeout = ?self.timeout, "Region client ready");
        Ok(RegionClient { inner: Arc::new(ClientInner { http, base_url }) })
    }
}

fn hierarchy_query(hierarchy: HierarchyId) -> [(&'static str, String); 1] {
    [(HIERARCHY_PARAM, hierarchy.to_string())]
}

fn decode<T: DeserializeOwned>(body: &[u8], path: &str) -> Result<T, ServiceError> {
    serde_json::from_slice(body).context(format!("Decoding {path}"))
}

fn request_error(error: &reqwest::Error, path: &str) -> ServiceError {
    if error.is_timeout() {
        ServiceError::Timeout { message: error.to_string().into(), context: Some(path.to_owned().into()) }
    } else {
        ServiceError::Transport { message: error.to_string().into(), context: Some(path.to_owned().into()) }
    }
}
