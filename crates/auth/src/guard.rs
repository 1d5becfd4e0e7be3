//! Role-gated access to UI sub-trees.

use serde::Serialize;

use crate::roles::{RoleAssignment, RoleName, has_role};

/// Outcome of a pure gating check.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Access {
    Granted,
    Denied,
}

impl Access {
    pub fn is_granted(&self) -> bool {
        matches!(self, Access::Granted)
    }
}

/// Pure predicate: granted iff the role set holds `required` and it is active.
///
/// - No IO
/// - No panics
/// - No business logic (pure policy check)
pub fn evaluate(required: RoleName, assignments: &[RoleAssignment]) -> Access {
    if has_role(assignments, required) {
        Access::Granted
    } else {
        Access::Denied
    }
}

/// What the guarded surface should render.
///
/// `Loading → {Granted | Denied}`; a denied guard becomes granted only when a
/// fresh upstream role-set snapshot says so (role approved out-of-band and
/// refetched). The guard never polls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum GuardState {
    /// Role set not resolved yet: render a neutral waiting indicator.
    Loading,
    /// Render the protected content unmodified.
    Granted,
    /// Render an explanatory panel naming the missing role, with an action to
    /// request it.
    Denied {
        missing: RoleName,
        display_name: &'static str,
        description: &'static str,
    },
}

/// Declarative gate for one protected sub-tree.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RoleGuard {
    required: RoleName,
}

impl RoleGuard {
    pub fn new(required: RoleName) -> Self {
        Self { required }
    }

    pub fn required(&self) -> RoleName {
        self.required
    }

    /// Resolve the guard against the latest role-set snapshot.
    ///
    /// `None` means the auth collaborator has not answered yet.
    pub fn resolve(&self, assignments: Option<&[RoleAssignment]>) -> GuardState {
        let Some(assignments) = assignments else {
            return GuardState::Loading;
        };

        match evaluate(self.required, assignments) {
            Access::Granted => GuardState::Granted,
            Access::Denied => GuardState::Denied {
                missing: self.required,
                display_name: self.required.display_name(),
                description: self.required.description(),
            },
        }
    }
}
