//! Client-side state for club events.
//!
//! - [`store::EventStore`] keeps a session's event collection in sync with the
//!   events service, with cache-first single-event reads
//! - [`resolver::FallbackResolver`] finds one event through the aggregated
//!   Google Calendar view, falling back to the canonical store
//! - [`remote::HttpClient`] talks to the events API

pub mod config;
pub mod error;
pub mod event;
pub mod remote;
pub mod request;
pub mod resolver;
pub mod store;

// Re-export the common types at crate root for convenience
pub use config::ClientConfig;
pub use error::{EventsError, EventsResult};
pub use event::{Event, EventId, EventPhase, EventRsvp};
pub use request::{EventDraft, EventPatch};
pub use resolver::{FallbackResolver, Resolution};
pub use store::{EventStore, Status, StoreSnapshot};
