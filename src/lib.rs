//! Lockdiff: position-locked binary diff and restore.
//!
//! Compares two byte streams at identical offsets and records every
//! difference as one line of a textual change list; replaying that list
//! against the original rebuilds the modified file.
//!
//! The crate provides:
//! - The change-list record format (`changelist`)
//! - The lockstep diff walk (`diff`)
//! - The patch-application walk (`restore`)
//! - Buffered byte-stream wrappers (`stream`)
//! - File-oriented helpers (`io`)
//! - An optional CLI (`cli` feature)
//!
//! # Quick Start
//!
//! ```
//! let old = b"hello old world";
//! let new = b"hello new world";
//!
//! let mut changes = Vec::new();
//! lockdiff::diff::diff_all(&mut changes, old, new).unwrap();
//! let rebuilt = lockdiff::restore::restore_all(old, &changes).unwrap();
//! assert_eq!(rebuilt, new);
//! ```

pub mod changelist;
pub mod diff;
pub mod io;
pub mod restore;
pub mod stream;

#[cfg(feature = "cli")]
pub mod cli;
