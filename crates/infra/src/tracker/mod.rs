//! REST adapter for the remote time-tracking service.

mod client;
mod dto;

pub use client::RestTrackerClient;
