//! The notification transaction
//!
//! `Receiver` runs one notification end to end:
//!
//! 1. select the verification strategy and verify the source
//! 2. resolve the target URL to a repository path
//! 3. create a working copy, take the concurrency gate, check out the target
//! 4. check the caller against the target's access list
//! 5. merge the embed into the document
//! 6. commit the document, unless the embed was already present
//!
//! Steps 1 and 2 run without the gate. From step 3 on every exit path goes
//! through `WorkingCopyManager::release`, which deletes the working copy and
//! releases the gate. Any error aborts the remaining steps.

use log::{error, info, warn};

use crate::auth;
use crate::commit::{CommitCoordinator, CommitDetails};
use crate::config::Config;
use crate::embed::EmbedDescriptor;
use crate::error::{ErrorKind, Result};
use crate::fetch::{SourceFetcher, UreqFetcher};
use crate::merge::{ContentMerger, MergeOutcome};
use crate::path::{self, TargetPath};
use crate::repository::{DefaultSvnOperations, SvnOperations};
use crate::request::{Notification, RequestContext};
use crate::response::Response;
use crate::verify::Verification;
use crate::working_copy::{WorkingCopy, WorkingCopyManager};

/// Receives notifications for one configured repository.
pub struct Receiver {
    config: Config,
    svn: Box<dyn SvnOperations>,
    fetcher: Box<dyn SourceFetcher>,
}

impl Receiver {
    /// Receiver backed by the `svn` command and a real HTTP client.
    pub fn new(config: Config) -> Result<Self> {
        let fetcher = UreqFetcher::new(&config);
        Self::with_operations(config, Box::new(DefaultSvnOperations), Box::new(fetcher))
    }

    /// Receiver with injected storage and fetch implementations.
    pub fn with_operations(
        config: Config,
        svn: Box<dyn SvnOperations>,
        fetcher: Box<dyn SourceFetcher>,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            svn,
            fetcher,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Process one notification and report what happened to the document.
    pub fn receive(
        &self,
        context: &RequestContext,
        notification: &Notification,
    ) -> Result<MergeOutcome> {
        let verification = Verification::from_notification(notification)?;
        let target = &notification.target;
        let embed = verification.verify(target, context, self.fetcher.as_ref())?;

        let issuer = self.config.issuer.as_deref().unwrap_or(&context.issuer);
        let target_path = path::resolve(
            target,
            issuer,
            self.config.url_prefix()?,
            self.config.repo_root()?,
        )?;

        let manager = WorkingCopyManager::new(self.svn.as_ref(), &self.config)?;
        let mut working_copy = manager.acquire()?;
        let result = self.transact(
            &manager,
            &mut working_copy,
            &target_path,
            context,
            &verification,
            target,
            &embed,
        );
        manager.release(working_copy);

        if let Ok(outcome) = &result {
            info!(
                "{} notification for {}: {:?}",
                verification.type_name(),
                target,
                outcome
            );
        }
        result
    }

    /// Steps that run while the concurrency gate is held.
    #[allow(clippy::too_many_arguments)]
    fn transact(
        &self,
        manager: &WorkingCopyManager<'_>,
        working_copy: &mut WorkingCopy,
        target_path: &TargetPath,
        context: &RequestContext,
        verification: &Verification,
        target: &str,
        embed: &EmbedDescriptor,
    ) -> Result<MergeOutcome> {
        let document = manager.checkout(working_copy, target_path)?;
        let wc_root = working_copy.root();

        auth::check(
            self.svn.as_ref(),
            &self.config,
            &document,
            wc_root,
            context.caller.as_deref(),
        )?;

        let outcome = ContentMerger::new(self.svn.as_ref(), &self.config)
            .merge(&document, wc_root, embed)?;
        if outcome == MergeOutcome::Duplicate {
            return Ok(outcome);
        }

        let details = CommitDetails {
            source: verification.source(),
            target,
            kind: verification.type_name(),
        };
        CommitCoordinator::new(self.svn.as_ref(), &self.config).commit(&document, &details)?;
        Ok(outcome)
    }

    /// Process one notification and turn the result into a response,
    /// logging failures.
    pub fn handle(&self, context: &RequestContext, notification: &Notification) -> Response {
        match self.receive(context, notification) {
            Ok(_) => Response::ok(),
            Err(e) => {
                match e.kind() {
                    ErrorKind::Receiver => error!("{}", e),
                    ErrorKind::Sender | ErrorKind::Forbidden => {
                        warn!("rejected notification for {}: {}", notification.target, e)
                    }
                }
                Response::from_error(&e)
            }
        }
    }
}
