//! # Tally Domain
//!
//! Value types shared across the Tally crates.
//!
//! Everything here is data plus the invariants that travel with it: the
//! workspace-scoped entities fetched from the remote tracker ([`types`]),
//! the report aggregate tree with its copy-on-write merge ([`summary`]),
//! small display helpers ([`display`]) and the workspace error type
//! ([`errors`]). No I/O lives in this crate.

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]

pub mod display;
pub mod errors;
pub mod summary;
pub mod types;

pub use errors::{Result, TallyError};
pub use summary::{Group, GroupKey, SubGroup, SubKey, Summary};
pub use types::{Client, Profile, Project, TimeEntry};
