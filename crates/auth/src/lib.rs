//! `sookari-auth` — role-based gating for the marketplace client.
//!
//! This crate is intentionally decoupled from HTTP and storage: the auth
//! collaborator resolves the current user's role set, this crate only reads
//! that set, gates UI sub-trees on it, and records role requests through a
//! collaborator port.

pub mod guard;
pub mod request;
pub mod roles;

pub use guard::{Access, GuardState, RoleGuard, evaluate};
pub use request::{DirectoryError, RoleDirectory, RoleRequestError, request_role};
pub use roles::{RoleAssignment, RoleName, has_role};
