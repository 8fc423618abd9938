//! Layout data model: assets, asset references, blocks and layouts.
//!
//! Wire shapes follow the CMS JSON (camelCase keys, `{"sys":{"id":..}}`
//! identifiers). Decoding is lenient: `null` and missing text fields become
//! empty strings, unreadable image slots are dropped, non-object layout
//! entries are skipped, and a block whose `type` is unknown or whose `data`
//! does not fit its type is kept as [`BlockKind::Opaque`] instead of failing
//! the whole layout. Keys outside the known schema are carried in `extra`
//! maps so edits and persistence do not lose author data.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Block type tags as they appear on the wire
pub const HERO_TAG: &str = "hero";
pub const TWO_COLUMN_TAG: &str = "twoColumn";
pub const IMAGE_GRID_TAG: &str = "imageGrid";

fn null_to_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn text_from_value(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

// Identifiers and tags typed by hand in the CMS sometimes arrive as numbers.
fn lenient_text<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_opt_text(deserializer)?.unwrap_or_default())
}

fn lenient_opt_text<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?.and_then(text_from_value))
}

// Pixel sizes: integers, whole floats (`1920.0`) or numeric strings.
fn lenient_dimension<'de, D>(deserializer: D) -> std::result::Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let size = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_u64().and_then(|v| u32::try_from(v).ok()).or_else(|| {
            n.as_f64()
                .filter(|v| v.is_finite() && *v >= 0.0 && *v <= f64::from(u32::MAX))
                .map(|v| v.round() as u32)
        }),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    };
    Ok(size)
}

fn asset_ref_from_value(value: Value) -> Option<AssetRef> {
    if value.is_null() {
        return None;
    }
    match serde_json::from_value(value) {
        Ok(reference) => Some(reference),
        Err(e) => {
            log::warn!("dropping unreadable image reference: {}", e);
            None
        }
    }
}

fn lenient_slot<'de, D>(deserializer: D) -> std::result::Result<Option<AssetRef>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?.and_then(asset_ref_from_value))
}

// Grid image lists coming out of the CMS editor may contain null holes.
fn lenient_entries<'de, D>(deserializer: D) -> std::result::Result<Vec<AssetRef>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(entries)) => entries,
        Some(other) => {
            log::warn!("grid images is not a list: {}", other);
            return Ok(Vec::new());
        }
        None => return Ok(Vec::new()),
    };
    Ok(entries.into_iter().filter_map(asset_ref_from_value).collect())
}

fn lenient_blocks<'de, D>(deserializer: D) -> std::result::Result<Vec<Block>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(entries)) => entries,
        Some(other) => {
            log::warn!("layout blocks is not a list: {}", other);
            return Ok(Vec::new());
        }
        None => return Ok(Vec::new()),
    };
    let blocks = entries
        .into_iter()
        .enumerate()
        .filter_map(|(i, entry)| {
            if !entry.is_object() {
                log::warn!("skipping layout entry {}: not an object ({})", i, entry);
                return None;
            }
            serde_json::from_value::<Block>(entry)
                .map_err(|e| log::warn!("skipping layout entry {}: {}", i, e))
                .ok()
        })
        .collect();
    Ok(blocks)
}

/// CMS system metadata; only the identifier is used.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Sys {
    #[serde(default, deserialize_with = "lenient_text")]
    pub id: String,
}

impl Sys {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// A fully resolved media asset as returned by the asset store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub sys: Sys,
    #[serde(default, deserialize_with = "null_to_default")]
    pub url: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Asset {
    pub fn new(id: impl Into<String>, url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            sys: Sys::new(id),
            url: url.into(),
            title: title.into(),
            width: None,
            height: None,
            description: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.sys.id
    }
}

/// The value held in a block's image slot.
///
/// Authors either paste an absolute URL (a *placeholder*, rendered as-is) or
/// link a CMS asset, in which case only `sys.id` is stored and the rest is
/// filled in by hydration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sys: Option<Sys>,
    #[serde(default, deserialize_with = "lenient_opt_text", skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_text", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_dimension", skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, deserialize_with = "lenient_dimension", skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default, deserialize_with = "lenient_opt_text", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Fields the renderer does not read (file details, locale, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AssetRef {
    /// A reference that only names an asset and still needs resolving.
    pub fn unresolved(id: impl Into<String>) -> Self {
        Self {
            sys: Some(Sys::new(id)),
            ..Default::default()
        }
    }

    /// A reference that already carries an absolute URL.
    pub fn placeholder(id: impl Into<String>, url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            sys: Some(Sys::new(id)),
            url: Some(url.into()),
            title: Some(title.into()),
            ..Default::default()
        }
    }

    /// Non-empty asset identifier, if any.
    pub fn id(&self) -> Option<&str> {
        self.sys
            .as_ref()
            .map(|s| s.id.as_str())
            .filter(|id| !id.is_empty())
    }

    /// True when the reference already points at an absolute http(s) URL.
    pub fn is_placeholder(&self) -> bool {
        self.url.as_deref().is_some_and(|u| u.starts_with("http"))
    }

    /// The identifier to resolve, or `None` for placeholders and empty refs.
    pub fn unresolved_id(&self) -> Option<&str> {
        if self.is_placeholder() {
            None
        } else {
            self.id()
        }
    }

    /// Alt text: description, falling back to title.
    pub fn alt_text(&self) -> &str {
        self.description
            .as_deref()
            .filter(|d| !d.is_empty())
            .or(self.title.as_deref())
            .unwrap_or_default()
    }
}

impl From<Asset> for AssetRef {
    fn from(asset: Asset) -> Self {
        Self {
            sys: Some(asset.sys),
            url: Some(asset.url),
            title: Some(asset.title),
            width: asset.width,
            height: asset.height,
            description: asset.description,
            extra: Map::new(),
        }
    }
}

/// Full-bleed banner with a call to action.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroData {
    #[serde(default, deserialize_with = "null_to_default")]
    pub heading: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub subtitle: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub cta_text: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub cta_url: String,
    #[serde(default, deserialize_with = "lenient_slot", skip_serializing_if = "Option::is_none")]
    pub background_image: Option<AssetRef>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Text column beside an image.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TwoColumnData {
    #[serde(default, deserialize_with = "null_to_default")]
    pub heading: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub subtitle: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub cta_text: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub cta_url: String,
    #[serde(default, deserialize_with = "lenient_slot", skip_serializing_if = "Option::is_none")]
    pub image: Option<AssetRef>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// 2x2 image grid. Only the first four images are rendered.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ImageGridData {
    #[serde(default, deserialize_with = "lenient_entries")]
    pub images: Vec<AssetRef>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Variant payload of a [`Block`].
#[derive(Debug, Clone, PartialEq)]
pub enum BlockKind {
    Hero(HeroData),
    TwoColumn(TwoColumnData),
    ImageGrid(ImageGridData),
    /// Unknown type tag, or a known tag whose data failed to decode. Kept
    /// verbatim so editing and persistence round-trip it untouched.
    Opaque { tag: String, data: Value },
}

impl BlockKind {
    /// Decode a payload for the given wire tag. Never fails.
    pub fn decode(tag: &str, data: Value) -> Self {
        let payload = if data.is_null() {
            Value::Object(Map::new())
        } else {
            data.clone()
        };
        let decoded = match tag {
            HERO_TAG => serde_json::from_value(payload).map(BlockKind::Hero),
            TWO_COLUMN_TAG => serde_json::from_value(payload).map(BlockKind::TwoColumn),
            IMAGE_GRID_TAG => serde_json::from_value(payload).map(BlockKind::ImageGrid),
            _ => {
                return BlockKind::Opaque {
                    tag: tag.to_string(),
                    data,
                }
            }
        };
        decoded.unwrap_or_else(|e| {
            log::warn!("block data for type '{}' did not decode: {}", tag, e);
            BlockKind::Opaque {
                tag: tag.to_string(),
                data,
            }
        })
    }

    pub fn tag(&self) -> &str {
        match self {
            BlockKind::Hero(_) => HERO_TAG,
            BlockKind::TwoColumn(_) => TWO_COLUMN_TAG,
            BlockKind::ImageGrid(_) => IMAGE_GRID_TAG,
            BlockKind::Opaque { tag, .. } => tag,
        }
    }

    /// The payload as a JSON value, as it would appear under `data`.
    pub fn data_value(&self) -> Value {
        let encoded = match self {
            BlockKind::Hero(d) => serde_json::to_value(d),
            BlockKind::TwoColumn(d) => serde_json::to_value(d),
            BlockKind::ImageGrid(d) => serde_json::to_value(d),
            BlockKind::Opaque { data, .. } => return data.clone(),
        };
        encoded.unwrap_or_default()
    }
}

/// One entry of a layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawBlock", into = "RawBlock")]
pub struct Block {
    pub id: String,
    pub kind: BlockKind,
}

impl Block {
    pub fn new(id: impl Into<String>, kind: BlockKind) -> Self {
        Self { id: id.into(), kind }
    }

    pub fn hero(id: impl Into<String>, data: HeroData) -> Self {
        Self::new(id, BlockKind::Hero(data))
    }

    pub fn two_column(id: impl Into<String>, data: TwoColumnData) -> Self {
        Self::new(id, BlockKind::TwoColumn(data))
    }

    pub fn image_grid(id: impl Into<String>, images: Vec<AssetRef>) -> Self {
        Self::new(
            id,
            BlockKind::ImageGrid(ImageGridData {
                images,
                ..Default::default()
            }),
        )
    }

    pub fn tag(&self) -> &str {
        self.kind.tag()
    }

    /// Every asset reference held by this block, in slot order.
    pub fn asset_refs(&self) -> Vec<&AssetRef> {
        match &self.kind {
            BlockKind::Hero(d) => d.background_image.iter().collect(),
            BlockKind::TwoColumn(d) => d.image.iter().collect(),
            BlockKind::ImageGrid(d) => d.images.iter().collect(),
            BlockKind::Opaque { .. } => Vec::new(),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct RawBlock {
    #[serde(default, deserialize_with = "lenient_text")]
    id: String,
    #[serde(rename = "type", default, deserialize_with = "lenient_text")]
    tag: String,
    #[serde(default)]
    data: Value,
}

impl From<RawBlock> for Block {
    fn from(raw: RawBlock) -> Self {
        Block {
            kind: BlockKind::decode(&raw.tag, raw.data),
            id: raw.id,
        }
    }
}

impl From<Block> for RawBlock {
    fn from(block: Block) -> Self {
        RawBlock {
            tag: block.tag().to_string(),
            data: block.kind.data_value(),
            id: block.id,
        }
    }
}

/// Ordered block list. Order is both render and edit order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LayoutConfig {
    #[serde(default, deserialize_with = "lenient_blocks")]
    pub blocks: Vec<Block>,
}

impl LayoutConfig {
    pub fn new(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    /// Decode a layout from its JSON string form. Only text that is not a
    /// JSON object at all is an error; bad entries inside are tolerated.
    pub fn from_json(raw: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Landing page record as delivered by the content source.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LandingPage {
    #[serde(default)]
    pub sys: Sys,
    #[serde(default, deserialize_with = "null_to_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub slug: String,
    /// Layout serialized as a JSON string; may be absent or empty.
    #[serde(default)]
    pub layout_config: Option<String>,
    #[serde(default)]
    pub seo_title: Option<String>,
    #[serde(default)]
    pub seo_description: Option<String>,
}
