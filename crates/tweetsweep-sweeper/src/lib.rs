//! Tweetsweep Sweeper
//!
//! Review and destruction drivers for an exported tweet archive.
//!
//! # Overview
//!
//! The sweeper owns the two state machines of a tweetsweep run:
//! - **Review**: walk undecided records and record keep or destroy answers
//! - **Destruction**: delete marked records remotely and confirm them in the ledger
//!
//! Both drivers work on an explicit [`Session`] (archive plus ledger) and
//! reach the outside world only through injected collaborators:
//! [`DecisionSource`] for answers, [`DeletionApi`](tweetsweep_domain::DeletionApi)
//! for remote calls and [`Pause`] for waiting.
//!
//! ## Record lifecycle
//!
//! | State | Entered by | Left by |
//! |-------|------------|---------|
//! | **Pending** | loading the archive | keep or destroy answer |
//! | **Kept** | keep answer | never |
//! | **Marked** | destroy answer | confirmed remote deletion |
//! | **Destroyed** | confirmed remote deletion | never |
//!
//! # Usage
//!
//! ```no_run
//! use tweetsweep_sweeper::{run_review, DecisionSource, ReviewItem, Selection, Session};
//! use tweetsweep_domain::Decision;
//!
//! struct KeepEverything;
//!
//! impl DecisionSource for KeepEverything {
//!     fn decide(&mut self, _item: &ReviewItem<'_>) -> std::io::Result<Decision> {
//!         Ok(Decision::Keep)
//!     }
//! }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut session = Session::open("archive")?;
//! let outcome = run_review(&mut session, &Selection::default(), &mut KeepEverything)?;
//! println!("kept {}", outcome.kept);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod destruction;
pub mod error;
pub mod pause;
pub mod report;
pub mod review;
pub mod session;

pub use config::DestructionConfig;
pub use destruction::{DestructionEvent, Destroyer};
pub use error::SweepError;
pub use pause::{Pause, SystemPause};
pub use report::{DestructionReport, FailureReason};
pub use review::{run_review, DecisionSource, KindFilter, ReviewItem, ReviewOutcome, Scope, Selection};
pub use session::{Session, SessionStatus};

/// Result type for sweeper operations
pub type Result<T> = std::result::Result<T, SweepError>;
