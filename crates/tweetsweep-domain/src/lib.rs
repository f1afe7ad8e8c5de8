//! Tweetsweep Domain Layer
//!
//! This crate contains the core vocabulary shared by every other Tweetsweep
//! crate: archived records, review decisions, API credentials and the trait
//! the destruction engine uses to talk to the remote service.
//!
//! ## Key Concepts
//!
//! - **Record**: one archived post with id, text and timestamp
//! - **Decision**: the reviewer's answer for a record (keep, destroy, skip, quit)
//! - **Disposition**: which ledger set a decided record lives in
//! - **DeleteOutcome**: every answer the remote API can give to a delete call
//!
//! ## Architecture
//!
//! - Only `chrono` as an external dependency, for timestamps
//! - No I/O; storage and networking live in other crates
//! - Trait definitions for all external interactions

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod credentials;
pub mod decision;
pub mod record;
pub mod traits;

// Re-exports for convenience
pub use credentials::Credentials;
pub use decision::{Decision, Disposition};
pub use record::{Record, RecordId, RecordKind};
pub use traits::{AuthError, DeleteOutcome, DeletionApi};
