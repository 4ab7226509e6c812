//! Merging embeds into target documents
//!
//! `ContentMerger` ties the pieces together for one checked-out document: it
//! picks the embed template (a repository property on the document or the
//! working copy root, else the built-in template for the embed kind), renders
//! the descriptor, and hands the document to `html::insert_embed`. The result
//! is written back to the same path so the commit picks it up.

pub mod html;

use std::fs;
use std::path::Path;

use log::{debug, info};

use crate::config::Config;
use crate::embed::EmbedDescriptor;
use crate::error::Result;
use crate::repository::{propget_with_fallback, SvnOperations};

/// What a merge did to the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// The embed was added and the document rewritten.
    Inserted,
    /// An embed for the same source already exists; nothing was written.
    Duplicate,
}

pub struct ContentMerger<'a> {
    svn: &'a dyn SvnOperations,
    config: &'a Config,
}

impl<'a> ContentMerger<'a> {
    pub fn new(svn: &'a dyn SvnOperations, config: &'a Config) -> Self {
        Self { svn, config }
    }

    /// Merge `embed` into the document at `document`.
    pub fn merge(
        &self,
        document: &Path,
        wc_root: &Path,
        embed: &EmbedDescriptor,
    ) -> Result<MergeOutcome> {
        let property = self.config.template_property_for(embed.kind);
        let template = propget_with_fallback(self.svn, property, document, wc_root)?;
        if template.is_some() {
            debug!("using template from {} for {}", property, document.display());
        }
        let fragment = embed.render(template.as_deref());

        let html = fs::read_to_string(document)?;
        match html::insert_embed(&html, embed.kind, &fragment, embed.identity.as_deref())? {
            Some(updated) => {
                fs::write(document, updated)?;
                info!("added embed to {}", document.display());
                Ok(MergeOutcome::Inserted)
            }
            None => {
                info!(
                    "{} already mentions {}",
                    document.display(),
                    embed.identity.as_deref().unwrap_or_default()
                );
                Ok(MergeOutcome::Duplicate)
            }
        }
    }
}
