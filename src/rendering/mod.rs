//! Layout renderer: hydrated blocks → view tree → HTML.

pub mod html;
pub mod view;

pub use view::{render_block, render_blocks, CallToAction, GridItem, Image, ViewNode};

use crate::types::Block;

/// A rendered landing page ready for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    pub title: String,
    pub slug: String,
    pub nodes: Vec<ViewNode>,
}

impl RenderedPage {
    /// Block identifiers of the rendered nodes, in order.
    pub fn keys(&self) -> Vec<&str> {
        self.nodes.iter().filter_map(ViewNode::key).collect()
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        html::write_document(&mut out, &self.title, &self.nodes);
        out
    }
}

/// Render `blocks` inside page chrome.
pub fn render_page(title: &str, slug: &str, blocks: &[Block]) -> RenderedPage {
    RenderedPage {
        title: title.to_string(),
        slug: slug.to_string(),
        nodes: render_blocks(blocks),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::HeroData;

    #[test]
    fn page_wraps_nodes_in_chrome() {
        let page = render_page("Home", "home", &[Block::hero("h1", HeroData::default())]);
        assert_eq!(page.keys(), vec!["h1"]);
        let html = page.to_html();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Home</title>"));
        assert!(html.contains("data-block-id=\"h1\""));
        assert!(html.ends_with("</main></body></html>"));
    }

    #[test]
    fn empty_page_still_has_chrome() {
        let page = render_page("Nothing", "nothing", &[]);
        assert!(page.keys().is_empty());
        assert_eq!(page.nodes.len(), 1);
        assert!(page.to_html().contains("<main class=\"landing-page\"><div class=\"empty-layout\">"));
    }
}
