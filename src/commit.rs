//! Committing merged documents back to the repository.

use std::collections::BTreeMap;
use std::path::Path;

use log::info;

use crate::config::Config;
use crate::embed::render_template;
use crate::error::Result;
use crate::repository::SvnOperations;

/// Values available to the commit message template.
#[derive(Debug, Clone, Copy)]
pub struct CommitDetails<'a> {
    pub source: Option<&'a str>,
    pub target: &'a str,
    pub kind: &'a str,
}

pub struct CommitCoordinator<'a> {
    svn: &'a dyn SvnOperations,
    author: &'a str,
    message_template: &'a str,
}

impl<'a> CommitCoordinator<'a> {
    pub fn new(svn: &'a dyn SvnOperations, config: &'a Config) -> Self {
        Self {
            svn,
            author: &config.commit_author,
            message_template: &config.commit_message,
        }
    }

    /// Log message for a notification.
    pub fn message(&self, details: &CommitDetails<'_>) -> String {
        let mut variables = BTreeMap::new();
        variables.insert(
            "source".to_string(),
            details.source.unwrap_or(details.kind).to_string(),
        );
        variables.insert("target".to_string(), details.target.to_string());
        variables.insert("type".to_string(), details.kind.to_string());
        render_template(self.message_template, &variables)
    }

    /// Commit exactly `document`.
    pub fn commit(&self, document: &Path, details: &CommitDetails<'_>) -> Result<()> {
        let message = self.message(details);
        self.svn.commit(document, self.author, &message)?;
        info!("committed {} as {}", document.display(), self.author);
        Ok(())
    }
}
