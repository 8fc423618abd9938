//! Content sources: where landing pages and assets come from.

use crate::types::{Asset, LandingPage};
use crate::Result;
use std::collections::HashMap;

/// Access to the CMS.
///
/// Implementations may return fewer assets than requested; callers treat
/// the missing ones as unresolved.
pub trait ContentSource {
    /// All published landing pages.
    fn landing_pages(&self) -> Result<Vec<LandingPage>>;

    /// The page with `slug`, or `None` when there is none.
    fn landing_page_by_slug(&self, slug: &str) -> Result<Option<LandingPage>>;

    /// Assets with the given identifiers that exist in the store.
    fn assets(&self, ids: &[String]) -> Result<Vec<Asset>>;
}

impl<S: ContentSource + ?Sized> ContentSource for Box<S> {
    fn landing_pages(&self) -> Result<Vec<LandingPage>> {
        (**self).landing_pages()
    }

    fn landing_page_by_slug(&self, slug: &str) -> Result<Option<LandingPage>> {
        (**self).landing_page_by_slug(slug)
    }

    fn assets(&self, ids: &[String]) -> Result<Vec<Asset>> {
        (**self).assets(ids)
    }
}

/// Pages and assets held in memory. Used for previews, offline rendering
/// and tests.
#[derive(Debug, Clone, Default)]
pub struct InMemoryContentSource {
    pages: Vec<LandingPage>,
    assets: HashMap<String, Asset>,
}

impl InMemoryContentSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, page: LandingPage) -> Self {
        self.add_page(page);
        self
    }

    pub fn with_assets(mut self, assets: impl IntoIterator<Item = Asset>) -> Self {
        for asset in assets {
            self.add_asset(asset);
        }
        self
    }

    pub fn add_page(&mut self, page: LandingPage) {
        self.pages.push(page);
    }

    pub fn add_asset(&mut self, asset: Asset) {
        self.assets.insert(asset.id().to_string(), asset);
    }
}

impl ContentSource for InMemoryContentSource {
    fn landing_pages(&self) -> Result<Vec<LandingPage>> {
        Ok(self.pages.clone())
    }

    fn landing_page_by_slug(&self, slug: &str) -> Result<Option<LandingPage>> {
        Ok(self.pages.iter().find(|p| p.slug == slug).cloned())
    }

    fn assets(&self, ids: &[String]) -> Result<Vec<Asset>> {
        Ok(ids.iter().filter_map(|id| self.assets.get(id).cloned()).collect())
    }
}
