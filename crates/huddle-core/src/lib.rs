//! The messaging core of the Huddle workplace-chat service.
//!
//! Everything lives in one in-memory [`store::Core`] behind a single mutex:
//! channels and DM threads with their ordered message lists, per-user
//! notification feeds, reactions and pins, deferred sends, and per-channel
//! standups. Every operation is one atomic turn: it takes the lock,
//! validates, mutates, emits notifications, and releases. Timer-driven work
//! (deferred sends, standup close) re-enters through the same lock, so no
//! partial mutation is ever observable.

pub mod error;
pub mod feed;
pub mod messages;
pub mod reactions;
pub mod scheduler;
pub mod standup;
pub mod store;
pub mod tags;

pub use error::{CoreError, CoreResult};
pub use store::Core;

/// Inclusive upper bound on message bodies, standup lines, and search
/// queries, counted in characters.
pub const MAX_MESSAGE_LEN: usize = 1000;

/// Page size for message listings.
pub const PAGE_SIZE: usize = 50;
