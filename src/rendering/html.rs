//! HTML serialization of the view tree.
//!
//! Markup only; styling belongs to the presentation layer, which hooks in
//! through the class names emitted here.

use super::view::{CallToAction, Image, ViewNode};
use std::fmt::Write;

/// Escape text for use in element content and quoted attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn write_img(out: &mut String, class: &str, img: &Image) {
    let _ = write!(
        out,
        "<img class=\"{}\" src=\"{}\" alt=\"{}\"",
        class,
        escape(&img.src),
        escape(&img.alt)
    );
    if let Some(w) = img.width {
        let _ = write!(out, " width=\"{}\"", w);
    }
    if let Some(h) = img.height {
        let _ = write!(out, " height=\"{}\"", h);
    }
    out.push_str(">");
}

fn write_cta(out: &mut String, cta: &CallToAction) {
    let _ = write!(
        out,
        "<a class=\"cta\" href=\"{}\">{}</a>",
        escape(&cta.href),
        escape(&cta.text)
    );
}

/// Serialize a single view node.
pub fn write_node(out: &mut String, node: &ViewNode) {
    match node {
        ViewNode::Hero {
            key,
            heading,
            subtitle,
            cta,
            background,
        } => {
            let _ = write!(out, "<section class=\"hero\" data-block-id=\"{}\">", escape(key));
            if let Some(img) = background {
                out.push_str("<div class=\"hero__background\">");
                write_img(out, "hero__image", img);
                out.push_str("</div>");
            }
            let _ = write!(
                out,
                "<div class=\"hero__content\"><h1>{}</h1><p>{}</p>",
                escape(heading),
                escape(subtitle)
            );
            write_cta(out, cta);
            out.push_str("</div></section>");
        }
        ViewNode::TwoColumn {
            key,
            heading,
            subtitle,
            cta,
            image,
        } => {
            let _ = write!(
                out,
                "<section class=\"two-column\" data-block-id=\"{}\"><div class=\"two-column__content\"><h2>{}</h2><p>{}</p>",
                escape(key),
                escape(heading),
                escape(subtitle)
            );
            write_cta(out, cta);
            out.push_str("</div>");
            if let Some(img) = image {
                out.push_str("<div class=\"two-column__image\">");
                write_img(out, "two-column__img", img);
                out.push_str("</div>");
            }
            out.push_str("</section>");
        }
        ViewNode::ImageGrid { key, items } => {
            let _ = write!(
                out,
                "<section class=\"image-grid\" data-block-id=\"{}\"><div class=\"image-grid__grid\">",
                escape(key)
            );
            for item in items {
                let _ = write!(
                    out,
                    "<div class=\"image-grid__item item{}\" data-key=\"{}\">",
                    item.position,
                    escape(&item.image.key)
                );
                write_img(out, "image-grid__img", &item.image);
                out.push_str("</div>");
            }
            out.push_str("</div></section>");
        }
        ViewNode::Empty { heading, message } => {
            let _ = write!(
                out,
                "<div class=\"empty-layout\"><h2>{}</h2><p>{}</p></div>",
                escape(heading),
                escape(message)
            );
        }
    }
}

/// Serialize a complete document: page chrome around the rendered nodes.
pub fn write_document(out: &mut String, title: &str, nodes: &[ViewNode]) {
    let _ = write!(
        out,
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>{}</title></head><body><main class=\"landing-page\">",
        escape(title)
    );
    for node in nodes {
        write_node(out, node);
    }
    out.push_str("</main></body></html>");
}
