//! Shared plumbing for Tally crates.
//!
//! This crate carries the pieces every other Tally crate leans on but that
//! contain no time-tracking semantics of their own:
//!
//! - [`cache`]: a string-keyed cache with a per-entry absolute expiry and
//!   prefix invalidation, used as the backing store for all remote reads.
//! - [`time`]: a [`Clock`](time::Clock) abstraction so expiry behaviour can
//!   be tested deterministically.

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

pub mod cache;
pub mod time;

pub use cache::{CacheStats, TtlCache};
pub use time::{Clock, SystemClock};
