//! Access control for data request actions
//!
//! Every handler asks an [`AccessPolicy`] before it validates or mutates
//! anything. The policy sees the action, the explicit [`Caller`] and what the
//! action targets.

use std::sync::Arc;

use async_trait::async_trait;
use datareq_common::types::Caller;
use thiserror::Error;
use uuid::Uuid;

use crate::store::{DataRequestStore, StoreError};

/// Every action the service exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    DataRequestCreate,
    DataRequestShow,
    DataRequestUpdate,
    DataRequestIndex,
    DataRequestDelete,
    DataRequestClose,
    CommentCreate,
    CommentShow,
    CommentList,
    CommentUpdate,
    CommentDelete,
    VoteCreate,
}

impl Action {
    pub fn name(self) -> &'static str {
        match self {
            Action::DataRequestCreate => "datarequest_create",
            Action::DataRequestShow => "datarequest_show",
            Action::DataRequestUpdate => "datarequest_update",
            Action::DataRequestIndex => "datarequest_index",
            Action::DataRequestDelete => "datarequest_delete",
            Action::DataRequestClose => "datarequest_close",
            Action::CommentCreate => "datarequest_comment",
            Action::CommentShow => "datarequest_comment_show",
            Action::CommentList => "datarequest_comment_list",
            Action::CommentUpdate => "datarequest_comment_update",
            Action::CommentDelete => "datarequest_comment_delete",
            Action::VoteCreate => "datarequest_vote",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// What an action operates on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessTarget {
    /// The request collection: create and index
    Collection,
    DataRequest(Uuid),
    Comment(Uuid),
}

#[derive(Error, Debug)]
pub enum AccessError {
    #[error("You must be logged in to perform '{action}'")]
    Unauthenticated { action: Action },

    #[error("User '{user}' is not authorized to perform '{action}'")]
    Forbidden { action: Action, user: String },

    #[error("Access check failed: {0}")]
    Store(#[from] StoreError),
}

impl AccessError {
    fn denied(action: Action, caller: &Caller) -> Self {
        match caller.user_id {
            Some(ref user) => AccessError::Forbidden {
                action,
                user: user.clone(),
            },
            None => AccessError::Unauthenticated { action },
        }
    }
}

#[async_trait]
pub trait AccessPolicy: Send + Sync {
    async fn check_access(
        &self,
        action: Action,
        caller: &Caller,
        target: AccessTarget,
    ) -> Result<(), AccessError>;
}

/// Owner/author/sysadmin rules
///
/// - show, index and comment reads: anyone
/// - create, comment and vote: any logged-in user
/// - update, delete, close: the request owner or a sysadmin
/// - comment update/delete: the comment author or a sysadmin
///
/// A target that does not exist passes so the action can report not-found.
pub struct DefaultAccessPolicy {
    store: Arc<dyn DataRequestStore>,
}

impl DefaultAccessPolicy {
    pub fn new(store: Arc<dyn DataRequestStore>) -> Self {
        Self { store }
    }

    async fn owner_of(&self, target: AccessTarget) -> Result<Option<String>, AccessError> {
        let owner = match target {
            AccessTarget::Collection => None,
            AccessTarget::DataRequest(id) => self.store.get_datarequest(id).await?.map(|r| r.user_id),
            AccessTarget::Comment(id) => self.store.get_comment(id).await?.map(|c| c.user_id),
        };
        Ok(owner)
    }
}

#[async_trait]
impl AccessPolicy for DefaultAccessPolicy {
    async fn check_access(
        &self,
        action: Action,
        caller: &Caller,
        target: AccessTarget,
    ) -> Result<(), AccessError> {
        match action {
            Action::DataRequestShow
            | Action::DataRequestIndex
            | Action::CommentShow
            | Action::CommentList => Ok(()),

            Action::DataRequestCreate | Action::CommentCreate | Action::VoteCreate => {
                if caller.is_authenticated() {
                    Ok(())
                } else {
                    Err(AccessError::denied(action, caller))
                }
            }

            Action::DataRequestUpdate
            | Action::DataRequestDelete
            | Action::DataRequestClose
            | Action::CommentUpdate
            | Action::CommentDelete => {
                if !caller.is_authenticated() {
                    return Err(AccessError::denied(action, caller));
                }
                match self.owner_of(target).await? {
                    Some(owner) if !caller.owns(&owner) => Err(AccessError::denied(action, caller)),
                    _ => Ok(()),
                }
            }
        }
    }
}

/// Lets everything through
pub struct AllowAll;

#[async_trait]
impl AccessPolicy for AllowAll {
    async fn check_access(&self, _: Action, _: &Caller, _: AccessTarget) -> Result<(), AccessError> {
        Ok(())
    }
}

/// Refuses everything
pub struct DenyAll;

#[async_trait]
impl AccessPolicy for DenyAll {
    async fn check_access(
        &self,
        action: Action,
        caller: &Caller,
        _: AccessTarget,
    ) -> Result<(), AccessError> {
        Err(AccessError::denied(action, caller))
    }
}
