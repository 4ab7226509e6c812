//! WebDAV verification
//!
//! The source is a WebDAV resource carrying a dead property whose value lists
//! the URLs it mentions, one per line. A depth-0 `PROPFIND allprop` returns a
//! multistatus document; every child of a `prop` element is a candidate
//! property, matched by local name so the property's namespace does not
//! matter. The first property whose local name fully matches the pattern
//! supplied with the notification is the one read.

use log::{debug, info};
use regex::Regex;
use xot::{Node, Xot};

use super::check_source;
use crate::embed::EmbedDescriptor;
use crate::error::{Error, Result};
use crate::fetch::{SourceFetcher, PROPFIND_ALLPROP};

pub const TYPE_NAME: &str = "webdav";

/// Local name of the element wrapping properties in a multistatus response.
const PROP_ELEMENT: &str = "prop";

/// Compile `pattern` so that it must match a whole property name.
pub fn property_matcher(pattern: &str) -> Result<Regex> {
    Regex::new(&format!("^(?:{})$", pattern)).map_err(|e| Error::InvalidPropertyPattern {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })
}

pub fn verify(
    source: &str,
    target: &str,
    property: &str,
    fetcher: &dyn SourceFetcher,
) -> Result<EmbedDescriptor> {
    check_source(source, target)?;
    let matcher = property_matcher(property)?;

    let response = fetcher.propfind(source, PROPFIND_ALLPROP)?;
    let value = find_property(&response, &matcher).map_err(|message| Error::SourceUnparseable {
        url: source.to_string(),
        message,
    })?;

    let mentioned = value
        .as_deref()
        .map(|v| v.lines().any(|line| line.trim_end_matches('\r') == target))
        .unwrap_or(false);
    if !mentioned {
        debug!("property {} of {} lists {:?}", property, source, value);
        return Err(Error::SourceNotVerified {
            source_url: source.to_string(),
            target: target.to_string(),
        });
    }

    info!("verified {} lists {} in WebDAV property", source, target);
    Ok(EmbedDescriptor::mention(source))
}

/// Text of the first property whose local name matches, `None` if no
/// property matches. Errors carry the XML parser message.
pub fn find_property(
    xml: &str,
    matcher: &Regex,
) -> std::result::Result<Option<String>, String> {
    let mut xot = Xot::new();
    let root = xot.parse(xml).map_err(|e| e.to_string())?;

    let props: Vec<Node> = xot
        .descendants(root)
        .filter(|&node| local_name(&xot, node) == Some(PROP_ELEMENT))
        .collect();

    for prop in props {
        for child in xot.children(prop) {
            match local_name(&xot, child) {
                Some(name) if matcher.is_match(name) => {
                    return Ok(Some(text_content(&xot, child)));
                }
                _ => {}
            }
        }
    }
    Ok(None)
}

fn local_name(xot: &Xot, node: Node) -> Option<&str> {
    xot.element(node)
        .map(|element| xot.local_name_str(element.name()))
}

fn text_content(xot: &Xot, node: Node) -> String {
    xot.descendants(node)
        .filter_map(|n| xot.text_str(n))
        .collect()
}
