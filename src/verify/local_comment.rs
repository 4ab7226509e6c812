//! Comments posted through the site itself. Nothing is fetched; the
//! comment is attributed to the authenticated caller.

use log::info;

use crate::embed::EmbedDescriptor;
use crate::request::RequestContext;

pub const TYPE_NAME: &str = "local-comment";

pub fn verify(content: &str, context: &RequestContext) -> EmbedDescriptor {
    let author = context.caller_identity();
    info!("local comment from {}", author);
    EmbedDescriptor::local_comment(content, author)
}
