//! Role-request flow.
//!
//! Requesting a role is the only side-effecting operation in this crate: it
//! records a role request with the external data collaborator. The caller
//! re-fetches the role set after success; cache invalidation belongs to the
//! collaborator, and the UI keeps the request affordance disabled while a
//! request is outstanding (no re-entrant submissions).

use thiserror::Error;
use tracing::{info, warn};

use sookari_core::UserId;

use crate::roles::{RoleAssignment, RoleName, has_role};

/// Failure reported by the data collaborator when recording a role request.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    #[error("no user is signed in")]
    NotSignedIn,

    #[error("unknown role: {0}")]
    UnknownRole(String),

    #[error("role request rejected: {0}")]
    Rejected(String),

    #[error("collaborator unavailable: {0}")]
    Unavailable(String),
}

/// Errors surfaced to the requesting surface.
///
/// None of these are retried automatically and none change the gating state.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RoleRequestError {
    /// The role is already active for this user; nothing was submitted.
    #[error("role '{0}' is already assigned")]
    AlreadyAssigned(RoleName),

    /// The collaborator call failed; the caller shows the message to the user.
    #[error(transparent)]
    Directory(#[from] DirectoryError),
}

/// Port to the external auth/data collaborator that stores role requests.
pub trait RoleDirectory {
    /// Record a role request for `user_id`. Approval happens out-of-band.
    fn add_role_request(&self, user_id: UserId, role: RoleName) -> Result<(), DirectoryError>;
}

/// Submit a role request for the current user.
///
/// Guards against duplicates: if `current` already holds the role as active,
/// the request is a conflict and nothing is submitted. On success the caller
/// is expected to re-fetch the role set.
pub fn request_role<D: RoleDirectory>(
    directory: &D,
    user_id: UserId,
    role: RoleName,
    current: &[RoleAssignment],
) -> Result<(), RoleRequestError> {
    if has_role(current, role) {
        return Err(RoleRequestError::AlreadyAssigned(role));
    }

    match directory.add_role_request(user_id, role) {
        Ok(()) => {
            info!(%user_id, role = %role, "role request recorded");
            Ok(())
        }
        Err(err) => {
            warn!(%user_id, role = %role, error = %err, "role request failed");
            Err(err.into())
        }
    }
}
