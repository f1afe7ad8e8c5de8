//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Infrastructure implementations live in other crates.

use crate::{Credentials, RecordId};
use chrono::{DateTime, Utc};
use std::fmt;

/// The remote API refused the credentials
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthError(pub String);

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Authentication rejected: {}", self.0)
    }
}

impl std::error::Error for AuthError {}

/// Result of a single remote delete call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The remote confirmed the deletion
    Deleted,

    /// The item no longer exists remotely
    AlreadyDeleted,

    /// Too many requests; try again once the window resets
    RateLimited {
        /// When the rate window resets
        reset_at: DateTime<Utc>,
    },

    /// The id is unknown for a reason other than prior deletion
    NotFound,

    /// The account may not delete this item
    PermissionDenied,

    /// The credentials stopped working mid-run
    Unauthorized,

    /// Network trouble or a server-side hiccup; worth retrying shortly
    Transient(String),

    /// Any other refusal that retrying will not fix
    Rejected(String),
}

/// Trait for the remote deletion service
///
/// Implemented by the infrastructure layer (tweetsweep-sdk)
pub trait DeletionApi {
    /// Authenticated session handle
    type Session;

    /// Check the credentials and open a session
    fn authenticate(&self, credentials: &Credentials) -> Result<Self::Session, AuthError>;

    /// Delete one item
    fn delete(&self, session: &Self::Session, id: &RecordId) -> DeleteOutcome;
}
