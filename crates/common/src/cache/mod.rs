//! String-keyed cache with per-entry absolute expiry.
//!
//! Unlike a cache-wide TTL, every entry carries its own expiry instant,
//! because different request kinds are cached for very different lengths of
//! time (a user profile for days, a running time entry for seconds). The
//! cache is thread-safe and cheap to clone behind an `Arc`.
//!
//! "Absent" and "cached nothing" are distinct states: callers that need to
//! remember a legitimately empty remote response instantiate the value type
//! as `Option<T>`, so a cached `None` is still a cache hit.
//!
//! # Example
//! ```
//! use chrono::Duration;
//! use tally_common::cache::TtlCache;
//!
//! let cache: TtlCache<i64> = TtlCache::new();
//! cache.insert_for("answer".to_string(), 42, Duration::seconds(30));
//! assert_eq!(cache.get("answer"), Some(42));
//! ```

mod core;
mod stats;

pub use core::TtlCache;
pub use stats::CacheStats;
