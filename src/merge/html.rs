//! HTML document surgery for embeds
//!
//! Documents are parsed with the tolerant HTML5 parser from `kuchikiki`, so
//! hand-written pages with unclosed tags still load. The embed is placed as the
//! last child of its sub-anchor, which must sit somewhere inside the element
//! with id `webmentions`.

use kuchikiki::traits::*;
use kuchikiki::{ElementData, NodeDataRef, NodeRef};

use crate::embed::{EmbedKind, WEBMENTIONS_ANCHOR};
use crate::error::{Error, Result};

/// Insert `fragment` under the anchor for `kind`.
///
/// Returns the serialized document, or `None` when `identity` is already
/// present in an identity attribute of a direct child of the anchor and
/// nothing was changed.
pub fn insert_embed(
    html: &str,
    kind: EmbedKind,
    fragment: &str,
    identity: Option<&str>,
) -> Result<Option<String>> {
    let document = kuchikiki::parse_html().one(html);

    let top = find_by_id(&document, WEBMENTIONS_ANCHOR)
        .ok_or_else(|| missing_tag(WEBMENTIONS_ANCHOR))?;
    let anchor_id = kind.anchor_id();
    let anchor = find_by_id(&document, anchor_id).ok_or_else(|| missing_tag(anchor_id))?;

    if !is_descendant(anchor.as_node(), top.as_node()) {
        return Err(Error::SchemaViolation {
            message: format!("has {} tag outside of {}!", anchor_id, WEBMENTIONS_ANCHOR),
        });
    }

    if kind.deduplicates() {
        if let Some(identity) = identity {
            if has_child_with(anchor.as_node(), kind.identity_attributes(), identity) {
                return Ok(None);
            }
        }
    }

    for node in parse_fragment(fragment, &anchor) {
        anchor.as_node().append(node);
    }

    let mut out = Vec::new();
    document.serialize(&mut out)?;
    Ok(Some(String::from_utf8_lossy(&out).into_owned()))
}

fn missing_tag(id: &str) -> Error {
    Error::SchemaViolation {
        message: format!("is missing tag for {}!", id),
    }
}

/// First element in document order whose `id` attribute is `id`.
pub fn find_by_id(document: &NodeRef, id: &str) -> Option<NodeDataRef<ElementData>> {
    document
        .descendants()
        .elements()
        .find(|element| element.attributes.borrow().get("id") == Some(id))
}

fn is_descendant(node: &NodeRef, ancestor: &NodeRef) -> bool {
    node.ancestors().any(|a| a == *ancestor)
}

fn has_child_with(parent: &NodeRef, attributes: &[&str], value: &str) -> bool {
    parent.children().elements().any(|child| {
        let found = child.attributes.borrow();
        attributes.iter().any(|name| found.get(*name) == Some(value))
    })
}

/// Parse a rendered template into detached nodes, in order.
///
/// The fragment is parsed as the content of `context`, so markup that is only
/// valid in certain parents (table rows, `<link>`) keeps its place.
fn parse_fragment(fragment: &str, context: &NodeDataRef<ElementData>) -> Vec<NodeRef> {
    let parsed = kuchikiki::parse_fragment(context.name.clone(), vec![]).one(fragment);
    let root = parsed.children().elements().next();

    let nodes: Vec<NodeRef> = match root {
        Some(root) => root.as_node().children().collect(),
        None => Vec::new(),
    };
    for node in &nodes {
        node.detach();
    }
    nodes
}
