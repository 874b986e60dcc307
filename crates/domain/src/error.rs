//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`MiniPoolError`] via `#[from]` at the port boundary.

/// Top-level error shared by every crate in the workspace.
#[derive(Debug, thiserror::Error)]
pub enum MiniPoolError {
    #[error("validation error")]
    Validation(#[from] ValidationError),

    #[error("not found")]
    NotFound(#[from] NotFoundError),

    #[error("membership error")]
    Membership(#[from] MembershipError),

    /// Querying an element's state failed. Carried through untouched by
    /// group aggregation.
    #[error("state inspection failed")]
    Inspection(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Domain invariant violations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("name must not be empty")]
    EmptyName,

    #[error("name {0:?} is already in use")]
    DuplicateName(String),

    #[error("id {0} is already in use")]
    DuplicateId(String),
}

/// A lookup by identifier found nothing.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}

/// Caller-input errors raised by group membership operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum MembershipError {
    #[error("group {group} already contains {member}")]
    Duplicate { group: String, member: String },

    #[error("group {group} doesn't contain {member}")]
    MemberNotFound { group: String, member: String },

    #[error("index {index} is out of range for a group of {len} members")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("adding {member} to group {group} would create a cycle")]
    Cycle { group: String, member: String },
}
