//! Page Builder
//!
//! Renders landing pages whose block layout is authored in a CMS, and
//! provides the undoable layout editor used to author them.
//!
//! # Features
//!
//! - **Layout pipeline**: parse a serialized block list, collect linked asset
//!   ids, resolve them against the asset store, hydrate, render to HTML
//! - **Layout editor**: add/remove/reorder/update blocks with bounded
//!   undo/redo history and explicit persistence checkpoints
//! - **GraphQL backend** (default `graphql` feature): CMS delivery API client
//!
//! # Example
//!
//! ```
//! use pagebuilder::pipeline::{PageBuilder, PageOutcome};
//! use pagebuilder::source::InMemoryContentSource;
//! use pagebuilder::types::{Asset, LandingPage};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let page = LandingPage {
//!     title: "Welcome".into(),
//!     slug: "welcome".into(),
//!     layout_config: Some(
//!         r#"{"blocks":[{"id":"h1","type":"hero","data":{"heading":"Hi","backgroundImage":{"sys":{"id":"a1"}}}}]}"#.into(),
//!     ),
//!     ..Default::default()
//! };
//! let source = InMemoryContentSource::new()
//!     .with_page(page)
//!     .with_assets(vec![Asset::new("a1", "https://img/a1.jpg", "t")]);
//!
//! let builder = PageBuilder::new(source);
//! match builder.build("welcome")? {
//!     PageOutcome::Rendered(page) => assert!(page.to_html().contains("https://img/a1.jpg")),
//!     PageOutcome::NotFound => unreachable!(),
//! }
//! # Ok(())
//! # }
//! ```

pub mod error;
pub use error::{Error, Result};

pub mod assets;
pub mod editor;
pub mod pipeline;
pub mod rendering;
pub mod source;
pub mod types;

// CMS GraphQL client (blocking reqwest)
#[cfg(feature = "graphql")]
pub mod graphql;

// Async façade over the blocking pipeline
pub mod async_api;

pub use assets::{collect_asset_ids, hydrate_blocks, MissingAssetPolicy};
pub use editor::{EditorAction, EditorConfig, LayoutEditor};
pub use pipeline::{PageBuilder, PageOutcome};
pub use rendering::{render_page, RenderedPage, ViewNode};
pub use source::{ContentSource, InMemoryContentSource};
pub use types::{Asset, AssetRef, Block, BlockKind, LandingPage, LayoutConfig};

/// Default CMS GraphQL host
pub const DEFAULT_CMS_BASE_URL: &str = "https://graphql.contentful.com";

/// Configuration for fetching and rendering pages
///
/// Defaults are usable for local rendering; the remote source additionally
/// needs `space_id` and `access_token` (see [`PageConfig::validate`]).
///
/// # Examples
///
/// ```
/// let cfg = pagebuilder::PageConfig::default();
/// assert_eq!(cfg.timeout_ms, 30000);
/// assert!(cfg.validate().is_err());
/// ```
#[derive(Debug, Clone)]
pub struct PageConfig {
    /// CMS GraphQL host
    pub cms_base_url: String,
    /// CMS space identifier
    pub space_id: String,
    /// Delivery API access token
    pub access_token: String,
    /// Optional CMS environment (e.g. "staging")
    pub environment: Option<String>,
    /// Timeout for CMS requests in milliseconds
    pub timeout_ms: u64,
    /// User agent string to send with requests
    pub user_agent: String,
    /// Public site URL pages are served under
    pub site_url: String,
    /// How unresolved asset references are handled during hydration
    pub missing_asset_policy: MissingAssetPolicy,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            cms_base_url: DEFAULT_CMS_BASE_URL.to_string(),
            space_id: String::new(),
            access_token: String::new(),
            environment: None,
            timeout_ms: 30000,
            user_agent: concat!("pagebuilder/", env!("CARGO_PKG_VERSION")).to_string(),
            site_url: String::new(),
            missing_asset_policy: MissingAssetPolicy::default(),
        }
    }
}

impl PageConfig {
    /// Read `CONTENTFUL_SPACE_ID`, `CONTENTFUL_ACCESS_TOKEN`,
    /// `CONTENTFUL_BASE_URL`, `CONTENTFUL_ENVIRONMENT` and `SITE_URL` on top
    /// of the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut cfg = Self::default();
        if let Some(v) = lookup("CONTENTFUL_SPACE_ID") {
            cfg.space_id = v;
        }
        if let Some(v) = lookup("CONTENTFUL_ACCESS_TOKEN") {
            cfg.access_token = v;
        }
        if let Some(v) = lookup("CONTENTFUL_BASE_URL").filter(|v| !v.is_empty()) {
            cfg.cms_base_url = v;
        }
        cfg.environment = lookup("CONTENTFUL_ENVIRONMENT").filter(|v| !v.is_empty());
        if let Some(v) = lookup("SITE_URL") {
            cfg.site_url = v;
        }
        cfg
    }

    /// Check that the remote source can be used.
    pub fn validate(&self) -> Result<()> {
        if self.space_id.trim().is_empty() {
            return Err(Error::Config("CMS space id is not set".into()));
        }
        if self.access_token.trim().is_empty() {
            return Err(Error::Config("CMS access token is not set".into()));
        }
        if self.timeout_ms == 0 {
            return Err(Error::Config("timeout_ms must be greater than zero".into()));
        }
        Ok(())
    }

    /// Public URL of the landing page with `slug`.
    pub fn page_url(&self, slug: &str) -> String {
        format!("{}/landing/{}", self.site_url.trim_end_matches('/'), slug)
    }
}

/// Create the default remote content source.
#[cfg(feature = "graphql")]
pub fn new_content_source(config: &PageConfig) -> Result<impl ContentSource> {
    graphql::GraphQlContentSource::new(config)
}
