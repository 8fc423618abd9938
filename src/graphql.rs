//! CMS GraphQL content source.
//!
//! Issues blocking POST requests against the delivery API of a CMS space
//! (`{base}/content/v1/spaces/{space}[/environments/{env}]`) with a bearer
//! token. Only the three queries the page pipeline needs are implemented.

use crate::source::ContentSource;
use crate::types::{Asset, LandingPage};
use crate::{Error, PageConfig, Result};
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use url::Url;

const LANDING_PAGE_FIELDS: &str = "sys { id } title slug layoutConfig seoTitle seoDescription";

fn landing_pages_query() -> String {
    format!(
        "query GetLandingPages {{ landingPageCollection {{ items {{ {} }} }} }}",
        LANDING_PAGE_FIELDS
    )
}

fn landing_page_by_slug_query() -> String {
    format!(
        "query GetLandingPageBySlug($slug: String!) {{ landingPageCollection(where: {{ slug: $slug }}, limit: 1) {{ items {{ {} }} }} }}",
        LANDING_PAGE_FIELDS
    )
}

const ASSETS_QUERY: &str = "query GetAssets($ids: [String!]) { assetCollection(where: { sys: { id_in: $ids } }) { items { sys { id } url title width height description } } }";

#[derive(Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Deserialize)]
struct Collection<T> {
    #[serde(default = "Vec::new")]
    items: Vec<Option<T>>,
}

impl<T> Collection<T> {
    // Entries the caller may not see come back as nulls.
    fn into_items(self) -> Vec<T> {
        self.items.into_iter().flatten().collect()
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LandingPageData {
    landing_page_collection: Option<Collection<LandingPage>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AssetData {
    asset_collection: Option<Collection<Asset>>,
}

/// Build the GraphQL endpoint URL for the configured space.
pub fn endpoint_for(config: &PageConfig) -> Result<Url> {
    let mut base = config.cms_base_url.clone();
    if !base.ends_with('/') {
        base.push('/');
    }
    let base = Url::parse(&base)
        .map_err(|e| Error::Config(format!("invalid CMS base URL '{}': {}", config.cms_base_url, e)))?;
    let mut path = format!("content/v1/spaces/{}", config.space_id);
    if let Some(env) = config.environment.as_deref().filter(|e| !e.is_empty()) {
        path.push_str("/environments/");
        path.push_str(env);
    }
    base.join(&path)
        .map_err(|e| Error::Config(format!("invalid CMS endpoint path '{}': {}", path, e)))
}

/// Content source backed by the CMS GraphQL API.
pub struct GraphQlContentSource {
    client: Client,
    endpoint: Url,
    access_token: String,
}

impl GraphQlContentSource {
    pub fn new(config: &PageConfig) -> Result<Self> {
        config.validate()?;
        let endpoint = endpoint_for(config)?;
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint,
            access_token: config.access_token.clone(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn request<T: DeserializeOwned>(&self, query: &str, variables: Value) -> Result<T> {
        log::debug!("POST {}", self.endpoint);
        let res = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(&self.access_token)
            .json(&json!({ "query": query, "variables": variables }))
            .send()?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().unwrap_or_default();
            return Err(Error::Network(format!("HTTP {}: {}", status, body.trim())));
        }

        let body: GraphQlResponse<T> = res
            .json()
            .map_err(|e| Error::Network(format!("Malformed GraphQL response: {}", e)))?;
        if !body.errors.is_empty() {
            let messages: Vec<_> = body.errors.into_iter().map(|e| e.message).collect();
            return Err(Error::Network(format!("GraphQL errors: {}", messages.join("; "))));
        }
        body.data
            .ok_or_else(|| Error::Network("GraphQL response carried no data".into()))
    }
}

impl ContentSource for GraphQlContentSource {
    fn landing_pages(&self) -> Result<Vec<LandingPage>> {
        let data: LandingPageData = self.request(&landing_pages_query(), json!({}))?;
        Ok(data
            .landing_page_collection
            .map(Collection::into_items)
            .unwrap_or_default())
    }

    fn landing_page_by_slug(&self, slug: &str) -> Result<Option<LandingPage>> {
        let data: LandingPageData =
            self.request(&landing_page_by_slug_query(), json!({ "slug": slug }))?;
        Ok(data
            .landing_page_collection
            .and_then(|c| c.into_items().into_iter().next()))
    }

    fn assets(&self, ids: &[String]) -> Result<Vec<Asset>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let data: AssetData = self.request(ASSETS_QUERY, json!({ "ids": ids }))?;
        Ok(data
            .asset_collection
            .map(Collection::into_items)
            .unwrap_or_default())
    }
}
