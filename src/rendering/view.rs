//! View tree produced from a hydrated block list

use crate::types::{AssetRef, Block, BlockKind};

/// Number of images an image grid shows (2x2)
pub const GRID_CAPACITY: usize = 4;

/// Intrinsic size used for two-column images lacking dimensions
pub const TWO_COLUMN_DEFAULT_SIZE: (u32, u32) = (600, 400);

/// Intrinsic size used for grid images lacking dimensions
pub const GRID_DEFAULT_SIZE: (u32, u32) = (400, 300);

pub const EMPTY_HEADING: &str = "No content blocks found";
pub const EMPTY_MESSAGE: &str = "Use the page builder in the CMS to add components to this page.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    pub key: String,
    pub src: String,
    pub alt: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl Image {
    /// `None` when the reference carries no URL to show.
    fn from_ref(key: String, reference: &AssetRef, default_size: Option<(u32, u32)>) -> Option<Self> {
        let src = reference.url.as_deref().filter(|u| !u.is_empty())?;
        let (width, height) = match default_size {
            Some((w, h)) => (
                Some(reference.width.unwrap_or(w)),
                Some(reference.height.unwrap_or(h)),
            ),
            None => (reference.width, reference.height),
        };
        Some(Self {
            key,
            src: src.to_string(),
            alt: reference.alt_text().to_string(),
            width,
            height,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallToAction {
    pub text: String,
    pub href: String,
}

/// A grid cell; `position` is 1-based within the 2x2 grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridItem {
    pub position: usize,
    pub image: Image,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewNode {
    Hero {
        key: String,
        heading: String,
        subtitle: String,
        cta: CallToAction,
        background: Option<Image>,
    },
    TwoColumn {
        key: String,
        heading: String,
        subtitle: String,
        cta: CallToAction,
        image: Option<Image>,
    },
    ImageGrid {
        key: String,
        items: Vec<GridItem>,
    },
    /// Shown in place of an empty layout
    Empty { heading: String, message: String },
}

impl ViewNode {
    /// Block identifier this node was rendered from.
    pub fn key(&self) -> Option<&str> {
        match self {
            ViewNode::Hero { key, .. }
            | ViewNode::TwoColumn { key, .. }
            | ViewNode::ImageGrid { key, .. } => Some(key),
            ViewNode::Empty { .. } => None,
        }
    }

    pub fn empty() -> Self {
        ViewNode::Empty {
            heading: EMPTY_HEADING.to_string(),
            message: EMPTY_MESSAGE.to_string(),
        }
    }
}

/// Map one block to its view, or `None` for blocks with no visual form.
pub fn render_block(block: &Block) -> Option<ViewNode> {
    let key = block.id.clone();
    match &block.kind {
        BlockKind::Hero(d) => Some(ViewNode::Hero {
            heading: d.heading.clone(),
            subtitle: d.subtitle.clone(),
            cta: CallToAction {
                text: d.cta_text.clone(),
                href: d.cta_url.clone(),
            },
            background: d
                .background_image
                .as_ref()
                .and_then(|r| Image::from_ref(format!("{}-background", key), r, None)),
            key,
        }),
        BlockKind::TwoColumn(d) => Some(ViewNode::TwoColumn {
            heading: d.heading.clone(),
            subtitle: d.subtitle.clone(),
            cta: CallToAction {
                text: d.cta_text.clone(),
                href: d.cta_url.clone(),
            },
            image: d
                .image
                .as_ref()
                .and_then(|r| Image::from_ref(format!("{}-image", key), r, Some(TWO_COLUMN_DEFAULT_SIZE))),
            key,
        }),
        BlockKind::ImageGrid(d) => {
            let shown = &d.images[..d.images.len().min(GRID_CAPACITY)];
            // An asset linked twice in one grid cannot key both cells.
            let repeated = |id: &str| shown.iter().filter(|r| r.id() == Some(id)).count() > 1;
            let items = shown
                .iter()
                .enumerate()
                .filter_map(|(i, r)| {
                    let item_key = match r.id() {
                        Some(id) if !repeated(id) => id.to_string(),
                        _ => format!("{}-{}", key, i + 1),
                    };
                    Image::from_ref(item_key, r, Some(GRID_DEFAULT_SIZE))
                        .map(|image| GridItem { position: i + 1, image })
                })
                .collect();
            Some(ViewNode::ImageGrid { key, items })
        }
        BlockKind::Opaque { tag, .. } => {
            log::debug!("skipping block '{}' with unrenderable type '{}'", block.id, tag);
            None
        }
    }
}

/// Render blocks in order. An empty list yields a single [`ViewNode::Empty`].
pub fn render_blocks(blocks: &[Block]) -> Vec<ViewNode> {
    if blocks.is_empty() {
        return vec![ViewNode::empty()];
    }
    blocks.iter().filter_map(render_block).collect()
}
