//! Direct-fetch verification: the source document must mention the target.

use log::info;

use super::check_source;
use crate::embed::EmbedDescriptor;
use crate::error::{Error, Result};
use crate::fetch::SourceFetcher;

pub const TYPE_NAME: &str = "standard";

/// Fetch `source` and require its body to contain `target` literally.
pub fn verify(source: &str, target: &str, fetcher: &dyn SourceFetcher) -> Result<EmbedDescriptor> {
    check_source(source, target)?;

    let body = fetcher.get(source)?;
    if !body.contains(target) {
        return Err(Error::SourceNotVerified {
            source_url: source.to_string(),
            target: target.to_string(),
        });
    }

    info!("verified {} mentions {}", source, target);
    Ok(EmbedDescriptor::mention(source))
}
