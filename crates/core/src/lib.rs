//! # Tally Core
//!
//! The query-interpretation and report-aggregation engine: everything
//! between the raw text a user types into the launcher and the ranked list
//! of actions shown back, minus the I/O.
//!
//! ## Architecture
//! - [`ports`] defines the boundaries (remote tracker API, time-span
//!   parser, fuzzy matcher, notifier); `tally-infra` implements them.
//! - [`store`] is the read-through TTL cache over the tracker API.
//! - [`query`], [`session`], [`selector`] and [`reports`] are the building
//!   blocks of the per-command resolvers in [`resolvers`].
//! - [`router`] dispatches the first token to a resolver; [`engine`] wires
//!   everything together and owns detached mutation dispatch.
//!
//! Every evaluation carries a cancellation token supplied by the host; a
//! superseded evaluation returns no results and resets the selection state
//! it owns.

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]

pub mod action;
pub mod engine;
pub mod ports;
pub mod query;
pub mod reports;
pub mod resolvers;
pub mod router;
pub mod selector;
pub mod session;
pub mod store;

pub use action::{Action, Effect, Mutation};
pub use engine::{Invoked, PaletteEngine};
pub use ports::{EntryDraft, EntryPatch, Matcher, Notifier, SpanParser, TrackerApi};
pub use reports::{Grouping, Span, SummaryQuery};
pub use session::{EditStage, ProjectSelection, SessionState};
pub use store::TrackerStore;
