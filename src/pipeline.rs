//! Page pipeline: fetch → parse → collect asset ids → fetch assets →
//! hydrate → render.
//!
//! Fetch failures degrade (missing page, no assets) instead of aborting the
//! render; the only error surfaced is a layout that fails to decode.

use crate::assets::{collect_asset_ids, hydrate_blocks, MissingAssetPolicy};
use crate::rendering::{render_page, RenderedPage};
use crate::source::ContentSource;
use crate::types::{LandingPage, LayoutConfig, Sys};
use crate::Result;

/// Parse a page's serialized layout. Absent or blank input is an empty
/// layout; anything else must be a valid layout document.
pub fn parse_layout_config(raw: Option<&str>) -> Result<LayoutConfig> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(json) => LayoutConfig::from_json(json),
        None => Ok(LayoutConfig::default()),
    }
}

/// A landing page with its layout decoded.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedLandingPage {
    pub sys: Sys,
    pub title: String,
    pub slug: String,
    pub layout: LayoutConfig,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
}

impl ParsedLandingPage {
    pub fn from_page(page: LandingPage) -> Result<Self> {
        let layout = parse_layout_config(page.layout_config.as_deref())?;
        Ok(Self {
            sys: page.sys,
            title: page.title,
            slug: page.slug,
            layout,
            seo_title: page.seo_title,
            seo_description: page.seo_description,
        })
    }
}

/// Terminal outcome of building a page.
#[derive(Debug, Clone, PartialEq)]
pub enum PageOutcome {
    Rendered(RenderedPage),
    /// No page exists for the requested slug
    NotFound,
}

impl PageOutcome {
    pub fn rendered(self) -> Option<RenderedPage> {
        match self {
            PageOutcome::Rendered(page) => Some(page),
            PageOutcome::NotFound => None,
        }
    }
}

/// Builds rendered pages from a content source.
pub struct PageBuilder<S> {
    source: S,
    policy: MissingAssetPolicy,
}

impl<S: ContentSource> PageBuilder<S> {
    pub fn new(source: S) -> Self {
        Self::with_policy(source, MissingAssetPolicy::default())
    }

    pub fn with_policy(source: S, policy: MissingAssetPolicy) -> Self {
        Self { source, policy }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn policy(&self) -> MissingAssetPolicy {
        self.policy
    }

    /// Slugs of every page; empty when the source is unreachable.
    pub fn slugs(&self) -> Vec<String> {
        match self.source.landing_pages() {
            Ok(pages) => pages.into_iter().map(|p| p.slug).collect(),
            Err(e) => {
                log::error!("Error fetching landing pages: {}", e);
                Vec::new()
            }
        }
    }

    /// Fetch, hydrate and render the page with `slug`.
    pub fn build(&self, slug: &str) -> Result<PageOutcome> {
        let page = match self.source.landing_page_by_slug(slug) {
            Ok(Some(page)) => page,
            Ok(None) => return Ok(PageOutcome::NotFound),
            Err(e) => {
                log::error!("Error fetching landing page '{}': {}", slug, e);
                return Ok(PageOutcome::NotFound);
            }
        };
        let parsed = ParsedLandingPage::from_page(page)?;
        Ok(PageOutcome::Rendered(self.render_parsed(&parsed)))
    }

    /// Resolve assets for an already parsed page and render it.
    pub fn render_parsed(&self, page: &ParsedLandingPage) -> RenderedPage {
        let blocks = &page.layout.blocks;
        let ids: Vec<String> = collect_asset_ids(blocks).into_iter().collect();
        log::debug!("page '{}': {} blocks, {} linked assets", page.slug, blocks.len(), ids.len());

        let assets = if ids.is_empty() {
            Vec::new()
        } else {
            self.source.assets(&ids).unwrap_or_else(|e| {
                log::error!("Error fetching assets for '{}': {}", page.slug, e);
                Vec::new()
            })
        };
        if assets.len() < ids.len() {
            log::warn!(
                "page '{}': {} of {} linked assets unresolved",
                page.slug,
                ids.len() - assets.len(),
                ids.len()
            );
        }

        let hydrated = hydrate_blocks(blocks, &assets, self.policy);
        render_page(&page.title, &page.slug, &hydrated)
    }
}
