//! In-memory event collection kept in sync with the events service.
//!
//! An [`EventStore`] owns one ordered collection of events plus a derived
//! loading/error status. State lives in a `watch` channel: every mutation is
//! a short synchronous update applied when a remote call completes, so
//! operations may overlap freely and the last completion to apply wins.

use tokio::sync::watch;
use tracing::{debug, error, warn};

use crate::error::{EventsError, EventsResult};
use crate::event::{Event, EventId, EventRsvp};
use crate::remote::EventsService;
use crate::request::{self, EventDraft, EventPatch};

const LOAD_ALL_FALLBACK: &str = "Failed to load events";
const CREATE_FALLBACK: &str = "Failed to create event";
const UPDATE_FALLBACK: &str = "Failed to update event";
const DELETE_FALLBACK: &str = "Failed to delete event";
const GET_FALLBACK: &str = "Failed to load event";

/// Loading and error indicators for a store's operations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Status {
    /// True while a full load or a cache-miss lookup is in flight
    pub loading: bool,
    /// Display message of the last failure, cleared when a new operation starts
    pub error: Option<String>,
}

/// Point-in-time copy of a store's collection and status.
#[derive(Debug, Clone, Default)]
pub struct StoreSnapshot {
    pub events: Vec<Event>,
    pub status: Status,
    pending_loads: usize,
}

impl StoreSnapshot {
    pub fn get(&self, id: &EventId) -> Option<&Event> {
        self.events.iter().find(|e| &e.id == id)
    }

    fn position(&self, id: &EventId) -> Option<usize> {
        self.events.iter().position(|e| &e.id == id)
    }

    /// Replace the entry with the same id in place, or append.
    fn upsert(&mut self, event: Event) {
        match self.position(&event.id) {
            Some(index) => self.events[index] = event,
            None => self.events.push(event),
        }
    }

    fn start_loading(&mut self) {
        self.pending_loads += 1;
        self.status.loading = true;
    }

    fn finish_loading(&mut self) {
        self.pending_loads = self.pending_loads.saturating_sub(1);
        self.status.loading = self.pending_loads > 0;
    }
}

/// Session-scoped cache of events backed by an [`EventsService`].
pub struct EventStore<S> {
    service: S,
    state: watch::Sender<StoreSnapshot>,
}

impl<S: EventsService> EventStore<S> {
    pub fn new(service: S) -> Self {
        let (state, _) = watch::channel(StoreSnapshot::default());
        EventStore { service, state }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    // READS:

    pub fn snapshot(&self) -> StoreSnapshot {
        self.state.borrow().clone()
    }

    pub fn events(&self) -> Vec<Event> {
        self.state.borrow().events.clone()
    }

    pub fn status(&self) -> Status {
        self.state.borrow().status.clone()
    }

    /// Observe every change to the collection or status.
    pub fn subscribe(&self) -> watch::Receiver<StoreSnapshot> {
        self.state.subscribe()
    }

    // OPERATIONS:

    /// Replace the whole collection with the service's list.
    ///
    /// Failures are recorded in the status and not returned.
    pub async fn load_all(&self) {
        self.state.send_modify(|s| {
            s.status.error = None;
            s.start_loading();
        });

        let result = self.service.list_events().await;

        self.state.send_modify(|s| {
            match result {
                Ok(events) => s.events = dedup_by_id(events),
                Err(err) => {
                    error!("Error loading events: {err}");
                    s.status.error = Some(err.display_message(LOAD_ALL_FALLBACK));
                }
            }
            s.finish_loading();
        });
    }

    pub async fn refetch(&self) {
        self.load_all().await
    }

    /// Create an event and append the service's canonical copy.
    pub async fn create(&self, draft: &EventDraft) -> EventsResult<Event> {
        self.clear_error();

        let result = match request::to_create_request(draft) {
            Ok(req) => self.service.create_event(&req).await,
            Err(err) => Err(err),
        };

        match result {
            Ok(event) => {
                self.state.send_modify(|s| s.upsert(event.clone()));
                Ok(event)
            }
            Err(err) => Err(self.record_failure(err, CREATE_FALLBACK)),
        }
    }

    /// Apply a partial update and replace the cached entry in place.
    ///
    /// An event that is not in the collection is not added.
    pub async fn update(&self, id: &EventId, patch: &EventPatch) -> EventsResult<Event> {
        self.clear_error();

        let result = match request::to_update_request(patch) {
            Ok(req) => self.service.update_event(id, &req).await,
            Err(err) => Err(err),
        };

        match result {
            Ok(event) => {
                self.state.send_if_modified(|s| match s.position(id) {
                    Some(index) => {
                        if &event.id != id && s.position(&event.id).is_some() {
                            warn!(
                                "Update of event {id} returned event {}, dropping the older copy",
                                event.id
                            );
                        }
                        s.events[index] = event.clone();
                        let mut position = 0;
                        s.events.retain(|e| {
                            let keep = position == index || e.id != event.id;
                            position += 1;
                            keep
                        });
                        true
                    }
                    None => {
                        debug!("Updated event {id} is not cached, leaving collection as is");
                        false
                    }
                });
                Ok(event)
            }
            Err(err) => Err(self.record_failure(err, UPDATE_FALLBACK)),
        }
    }

    /// Delete an event. Removing an id that is not cached is a no-op.
    pub async fn delete(&self, id: &EventId) -> EventsResult<()> {
        self.clear_error();

        match self.service.delete_event(id).await {
            Ok(()) => {
                self.state.send_if_modified(|s| {
                    let before = s.events.len();
                    s.events.retain(|e| &e.id != id);
                    s.events.len() != before
                });
                Ok(())
            }
            Err(err) => Err(self.record_failure(err, DELETE_FALLBACK)),
        }
    }

    /// Cache-first lookup.
    ///
    /// A cached entry is returned without touching the service and is never
    /// revalidated; only `load_all` or `update` refresh it. On a miss the
    /// fetched event is inserted, or replaces an entry with the same id that
    /// appeared while the request was in flight.
    pub async fn get_by_id(&self, id: &EventId) -> EventsResult<Event> {
        let mut cached = None;
        self.state.send_if_modified(|s| {
            cached = s.get(id).cloned();
            let had_error = s.status.error.take().is_some();
            if cached.is_none() {
                s.start_loading();
            }
            had_error || cached.is_none()
        });

        if let Some(event) = cached {
            debug!("Event {id} served from cache");
            return Ok(event);
        }

        let result = self.service.get_event(id).await;

        match result {
            Ok(event) => {
                self.state.send_modify(|s| {
                    s.upsert(event.clone());
                    s.finish_loading();
                });
                Ok(event)
            }
            Err(err) => {
                let message = err.display_message(GET_FALLBACK);
                self.state.send_modify(|s| {
                    s.status.error = Some(message);
                    s.finish_loading();
                });
                Err(err)
            }
        }
    }

    /// RSVPs for an event. Never cached and never touches the status.
    pub async fn get_rsvps(&self, event_id: &EventId) -> EventsResult<Vec<EventRsvp>> {
        self.service.list_rsvps(event_id).await.inspect_err(|err| {
            error!("Error loading RSVPs for event {event_id}: {err}");
        })
    }

    fn clear_error(&self) {
        self.state.send_if_modified(|s| s.status.error.take().is_some());
    }

    fn record_failure(&self, err: EventsError, fallback: &str) -> EventsError {
        let message = err.display_message(fallback);
        self.state.send_modify(|s| s.status.error = Some(message));
        err
    }
}

/// Keep the first occurrence of each id.
fn dedup_by_id(events: Vec<Event>) -> Vec<Event> {
    let mut unique: Vec<Event> = Vec::with_capacity(events.len());
    for event in events {
        if unique.iter().any(|e| e.id == event.id) {
            warn!("Service listed event {} more than once", event.id);
            continue;
        }
        unique.push(event);
    }
    unique
}
