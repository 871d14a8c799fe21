//! HTTP surface over the messaging core: thin handlers that parse the
//! request, call `huddle-core`, and map `CoreError` to a status code.

pub mod channels;
pub mod dms;
pub mod error;
pub mod extract;
pub mod messages;
pub mod reactions;
pub mod routes;
pub mod users;

pub use routes::router;
