//! Per-page orchestration: each service owns the snapshot its page renders,
//! calls the backend, reports the outcome as a notice and re-fetches on success.

mod auth;
mod dept;
mod menu;
mod role;
mod user;
mod view;

use std::collections::HashSet;
use std::sync::Arc;

use kinit_auth::Message;
use kinit_core::EntityId;
use kinit_hierarchy::{TreeNode, descendant_ids, find};

use crate::error::ClientError;
use crate::notice::{Notice, Notifier};

pub use auth::AuthService;
pub use dept::DeptService;
pub use menu::MenuService;
pub use role::RoleService;
pub use user::UserService;
pub use view::{ListView, TreeView};

/// Turns operation outcomes into notices and log lines.
#[derive(Clone)]
pub(crate) struct Reporter {
    notifier: Arc<dyn Notifier>,
}

impl Reporter {
    pub(crate) fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self { notifier }
    }

    pub(crate) fn success(&self, op: &'static str, message: Message) {
        tracing::info!(op, "operation succeeded");
        self.notifier.notify(Notice::success(message));
    }

    pub(crate) fn warning(&self, message: Message) {
        self.notifier.notify(Notice::warning(message));
    }

    pub(crate) fn notify(&self, notice: Notice) {
        self.notifier.notify(notice);
    }

    /// Log and surface `err`. Validation failures are shown inline, not as a notice.
    pub(crate) fn failure(&self, op: &'static str, err: &ClientError, fallback: Message) {
        tracing::warn!(op, error = %err, "operation failed");
        if !matches!(err, ClientError::Validation(_)) {
            self.notifier.notify(Notice::from_error(err, fallback));
        }
    }

    /// Pass `result` through, reporting a failure.
    pub(crate) fn check<T>(
        &self,
        op: &'static str,
        fallback: Message,
        result: Result<T, ClientError>,
    ) -> Result<T, ClientError> {
        if let Err(err) = &result {
            self.failure(op, err, fallback);
        }
        result
    }
}

/// A page whose snapshot is re-fetched after every successful mutation.
pub(crate) trait Refresh {
    fn reporter(&self) -> &Reporter;

    async fn reload(&mut self) -> Result<(), ClientError>;

    /// Report the outcome of a mutation and re-fetch after a success.
    ///
    /// A failed re-fetch is reported on its own; the mutation still succeeded.
    async fn settle<T>(
        &mut self,
        op: &'static str,
        success: Message,
        failure: Message,
        result: Result<T, ClientError>,
    ) -> Result<T, ClientError> {
        match result {
            Ok(value) => {
                self.reporter().success(op, success);
                if self.reload().await.is_err() {
                    tracing::debug!(op, "snapshot is stale until the next load");
                }
                Ok(value)
            }
            Err(err) => {
                self.reporter().failure(op, &err, failure);
                Err(err)
            }
        }
    }
}

/// Reject deleting a node whose cached subtree is not entirely part of the same deletion.
///
/// The backend still owns the actual cascade; nodes absent from the snapshot
/// are left to it.
pub(crate) fn ensure_deletable<T: TreeNode>(
    tree: &[T],
    ids: &[EntityId],
) -> Result<(), ClientError> {
    let doomed: HashSet<&EntityId> = ids.iter().collect();
    for id in ids {
        let Some(node) = find(tree, id) else {
            continue;
        };
        if descendant_ids(node).iter().any(|d| !doomed.contains(d)) {
            return Err(ClientError::HasChildren(id.clone()));
        }
    }
    Ok(())
}
