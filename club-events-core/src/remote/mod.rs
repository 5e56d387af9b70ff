//! Remote event sources.
//!
//! The store and the resolver only see these traits. [`HttpClient`]
//! implements them against the club events API; tests swap in fakes.

pub mod http;
pub mod protocol;

pub use http::HttpClient;
pub use protocol::AggregatedQuery;

use async_trait::async_trait;

use crate::error::EventsResult;
use crate::event::{Event, EventId, EventRsvp};
use crate::request::{CreateEventRequest, UpdateEventRequest};

/// The canonical events service.
#[async_trait]
pub trait EventsService: Send + Sync {
    async fn list_events(&self) -> EventsResult<Vec<Event>>;
    async fn get_event(&self, id: &EventId) -> EventsResult<Event>;
    async fn create_event(&self, request: &CreateEventRequest) -> EventsResult<Event>;
    async fn update_event(&self, id: &EventId, request: &UpdateEventRequest) -> EventsResult<Event>;
    async fn delete_event(&self, id: &EventId) -> EventsResult<()>;
    async fn list_rsvps(&self, event_id: &EventId) -> EventsResult<Vec<EventRsvp>>;
}

/// Read-through view of events mirrored from Google Calendar.
#[async_trait]
pub trait AggregatorService: Send + Sync {
    async fn get_aggregated_event(&self, id: &EventId) -> EventsResult<Event>;
    async fn list_aggregated_events(&self, query: &AggregatedQuery) -> EventsResult<Vec<Event>>;
}

/// One tier of a fallback chain: a way to find a single event by id.
#[async_trait]
pub trait EventLookup: Send + Sync {
    /// Short name of the source, for logs
    fn source(&self) -> &str;
    async fn lookup(&self, id: &EventId) -> EventsResult<Event>;
}

/// Looks events up in the aggregated Google Calendar view.
pub struct AggregatedLookup<A>(pub A);

#[async_trait]
impl<A: AggregatorService> EventLookup for AggregatedLookup<A> {
    fn source(&self) -> &str {
        "aggregated"
    }

    async fn lookup(&self, id: &EventId) -> EventsResult<Event> {
        self.0.get_aggregated_event(id).await
    }
}

/// Looks events up in the canonical events service.
pub struct CanonicalLookup<S>(pub S);

#[async_trait]
impl<S: EventsService> EventLookup for CanonicalLookup<S> {
    fn source(&self) -> &str {
        "canonical"
    }

    async fn lookup(&self, id: &EventId) -> EventsResult<Event> {
        self.0.get_event(id).await
    }
}
