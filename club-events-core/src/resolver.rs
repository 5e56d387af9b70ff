//! Two-tier lookup of a single event.
//!
//! The primary tier is the aggregated Google Calendar view: broad coverage
//! but occasionally stale or missing records. The secondary tier is the
//! canonical store. A resolution tries the primary once and falls back to the
//! secondary once on any failure. When both fail, only the secondary's error
//! is surfaced.

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;
use tracing::debug;

use crate::error::{EventsError, EventsResult};
use crate::event::{Event, EventId};
use crate::remote::{AggregatedLookup, AggregatorService, CanonicalLookup, EventLookup, EventsService};

const NOT_FOUND_FALLBACK: &str = "Event not found";

/// Where the latest resolution stands.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Resolution {
    #[default]
    Idle,
    Loading(EventId),
    Resolved(Event),
    Failed(String),
}

impl Resolution {
    pub fn is_loading(&self) -> bool {
        matches!(self, Resolution::Loading(_))
    }

    pub fn event(&self) -> Option<&Event> {
        match self {
            Resolution::Resolved(event) => Some(event),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Resolution::Failed(message) => Some(message),
            _ => None,
        }
    }

    fn from_outcome(outcome: &EventsResult<Event>) -> Self {
        match outcome {
            Ok(event) => Resolution::Resolved(event.clone()),
            Err(err) => Resolution::Failed(failure_message(err)),
        }
    }
}

/// Message shown for a failed resolution.
pub fn failure_message(err: &EventsError) -> String {
    err.display_message(NOT_FOUND_FALLBACK)
}

/// Decide a resolution from the two tier outcomes.
///
/// `secondary` is `None` when it was not attempted. A primary success wins
/// whatever its payload looks like; otherwise the secondary outcome is final
/// and the primary error is dropped.
pub fn settle(
    primary: EventsResult<Event>,
    secondary: Option<EventsResult<Event>>,
) -> EventsResult<Event> {
    match (primary, secondary) {
        (Ok(event), _) => Ok(event),
        (Err(_), Some(outcome)) => outcome,
        (Err(err), None) => Err(err),
    }
}

/// Resolves events through a primary and a secondary [`EventLookup`].
pub struct FallbackResolver<P, S> {
    primary: P,
    secondary: S,
    state: watch::Sender<Resolution>,
    latest: AtomicU64,
}

impl<C> FallbackResolver<AggregatedLookup<C>, CanonicalLookup<C>>
where
    C: AggregatorService + EventsService + Clone,
{
    /// Aggregated view first, canonical store second, both served by one client.
    pub fn aggregated_then_canonical(client: C) -> Self {
        FallbackResolver::new(AggregatedLookup(client.clone()), CanonicalLookup(client))
    }
}

impl<P: EventLookup, S: EventLookup> FallbackResolver<P, S> {
    pub fn new(primary: P, secondary: S) -> Self {
        let (state, _) = watch::channel(Resolution::Idle);
        FallbackResolver {
            primary,
            secondary,
            state,
            latest: AtomicU64::new(0),
        }
    }

    pub fn primary(&self) -> &P {
        &self.primary
    }

    pub fn secondary(&self) -> &S {
        &self.secondary
    }

    pub fn state(&self) -> Resolution {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Resolution> {
        self.state.subscribe()
    }

    /// Resolve `id`, trying the primary then the secondary.
    ///
    /// The state shows `Loading` across both attempts. If another resolution
    /// starts before this one finishes, this one still returns its outcome
    /// but leaves the newer state alone.
    pub async fn resolve(&self, id: &EventId) -> EventsResult<Event> {
        // Tickets are taken under the state lock so the newest request is
        // always the one whose Loading state is visible
        let mut ticket = 0;
        self.state.send_modify(|state| {
            ticket = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
            *state = Resolution::Loading(id.clone());
        });

        let first = self.primary.lookup(id).await;
        let second = match &first {
            Ok(_) => None,
            Err(err) => {
                debug!(
                    "{} lookup of event {id} failed ({err}), trying {}",
                    self.primary.source(),
                    self.secondary.source()
                );
                Some(self.secondary.lookup(id).await)
            }
        };

        let outcome = settle(first, second);

        self.state.send_if_modified(|state| {
            if self.latest.load(Ordering::SeqCst) != ticket {
                debug!("Resolution of event {id} was superseded");
                return false;
            }
            *state = Resolution::from_outcome(&outcome);
            true
        });

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use std::sync::Arc;
    use std::sync::atomic::AtomicUsize;
    use tokio::sync::Notify;

    fn event(id: &str) -> Event {
        let start = Utc.with_ymd_and_hms(2025, 3, 20, 18, 0, 0).unwrap();
        Event::new(id, "Hack Night", start, start)
    }

    enum Answer {
        Found(Event),
        Missing(&'static str),
        Broken,
    }

    struct StubLookup {
        name: &'static str,
        answer: Answer,
        calls: AtomicUsize,
        gate: Option<Arc<Notify>>,
    }

    impl StubLookup {
        fn new(name: &'static str, answer: Answer) -> Self {
            StubLookup {
                name,
                answer,
                calls: AtomicUsize::new(0),
                gate: None,
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl EventLookup for StubLookup {
        fn source(&self) -> &str {
            self.name
        }

        async fn lookup(&self, id: &EventId) -> EventsResult<Event> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            match &self.answer {
                Answer::Found(event) => {
                    let mut found = event.clone();
                    found.id = id.clone();
                    Ok(found)
                }
                Answer::Missing(message) => Err(EventsError::NotFound(message.to_string())),
                Answer::Broken => Err(EventsError::Unexpected("socket closed".into())),
            }
        }
    }

    fn resolver(primary: Answer, secondary: Answer) -> FallbackResolver<StubLookup, StubLookup> {
        FallbackResolver::new(
            StubLookup::new("aggregated", primary),
            StubLookup::new("canonical", secondary),
        )
    }

    #[test]
    fn test_settle_prefers_primary_success() {
        let outcome = settle(Ok(event("e1")), None);
        assert_eq!(outcome.unwrap().id, EventId::from("e1"));
    }

    #[test]
    fn test_settle_keeps_only_secondary_error() {
        let outcome = settle(
            Err(EventsError::NotFound("primary miss".into())),
            Some(Err(EventsError::Server {
                status: 500,
                message: "secondary down".into(),
            })),
        );
        assert_eq!(outcome.unwrap_err().to_string(), "secondary down");
    }

    #[test]
    fn test_settle_uses_secondary_success() {
        let outcome = settle(Err(EventsError::Unexpected("x".into())), Some(Ok(event("e9"))));
        assert_eq!(outcome.unwrap().id, EventId::from("e9"));
    }

    #[test]
    fn test_new_resolver_is_idle() {
        let resolver = resolver(Answer::Broken, Answer::Broken);
        assert_eq!(resolver.state(), Resolution::Idle);
    }

    // P5
    #[tokio::test]
    async fn test_primary_success_short_circuits() {
        let resolver = resolver(Answer::Found(event("x")), Answer::Found(event("y")));

        let resolved = resolver.resolve(&"e1".into()).await.unwrap();

        assert_eq!(resolved.id, EventId::from("e1"));
        assert_eq!(resolver.primary().calls(), 1);
        assert_eq!(resolver.secondary().calls(), 0);
        assert_eq!(resolver.state(), Resolution::Resolved(resolved));
    }

    #[tokio::test]
    async fn test_primary_success_with_empty_payload_is_accepted() {
        let mut blank = event("x");
        blank.title = String::new();
        let resolver = resolver(Answer::Found(blank), Answer::Found(event("y")));

        let resolved = resolver.resolve(&"e1".into()).await.unwrap();

        assert_eq!(resolved.title, "");
        assert_eq!(resolver.secondary().calls(), 0);
    }

    // P6, Scenario E
    #[tokio::test]
    async fn test_fallback_to_secondary_on_primary_miss() {
        let resolver = resolver(Answer::Missing("Event not found"), Answer::Found(event("x")));

        let resolved = resolver.resolve(&"e9".into()).await.unwrap();

        assert_eq!(resolved.id, EventId::from("e9"));
        assert_eq!(resolver.primary().calls(), 1);
        assert_eq!(resolver.secondary().calls(), 1);
        assert_eq!(resolver.state().error(), None);
        assert_eq!(resolver.state().event().map(|e| e.id.as_str()), Some("e9"));
    }

    #[tokio::test]
    async fn test_fallback_on_unclassified_primary_failure() {
        let resolver = resolver(Answer::Broken, Answer::Found(event("x")));
        assert!(resolver.resolve(&"e9".into()).await.is_ok());
        assert_eq!(resolver.secondary().calls(), 1);
    }

    // P7, Scenario F
    #[tokio::test]
    async fn test_total_failure_surfaces_secondary_message() {
        let resolver = resolver(
            Answer::Missing("Not in Google Calendar"),
            Answer::Missing("No event exists with ID e404"),
        );

        let err = resolver.resolve(&"e404".into()).await.unwrap_err();

        assert_eq!(err.to_string(), "No event exists with ID e404");
        assert_eq!(
            resolver.state(),
            Resolution::Failed("No event exists with ID e404".into())
        );
        assert_eq!(resolver.primary().calls(), 1);
        assert_eq!(resolver.secondary().calls(), 1);
    }

    #[tokio::test]
    async fn test_unclassified_secondary_failure_reads_event_not_found() {
        let resolver = resolver(Answer::Missing("Not in Google Calendar"), Answer::Broken);

        assert!(resolver.resolve(&"e1".into()).await.is_err());

        assert_eq!(resolver.state().error(), Some("Event not found"));
    }

    #[tokio::test]
    async fn test_single_loading_interval_spans_both_tiers() {
        let gate = Arc::new(Notify::new());
        let mut secondary = StubLookup::new("canonical", Answer::Found(event("x")));
        secondary.gate = Some(gate.clone());
        let resolver = FallbackResolver::new(StubLookup::new("aggregated", Answer::Broken), secondary);
        let mut changes = resolver.subscribe();
        let id: EventId = "e1".into();

        let observe = async {
            tokio::task::yield_now().await;
            assert_eq!(resolver.state(), Resolution::Loading("e1".into()));
            gate.notify_one();
        };
        let (resolved, ()) = tokio::join!(resolver.resolve(&id), observe);

        assert!(resolved.is_ok());
        // Loading, then Resolved: the tier switch is not visible
        assert!(changes.has_changed().unwrap());
        assert!(changes.borrow_and_update().event().is_some());
    }

    #[tokio::test]
    async fn test_new_request_clears_previous_terminal_state() {
        let resolver = resolver(Answer::Missing("gone"), Answer::Missing("gone too"));
        let _ = resolver.resolve(&"e1".into()).await;
        assert!(resolver.state().error().is_some());

        let gate = Arc::new(Notify::new());
        let mut primary = StubLookup::new("aggregated", Answer::Found(event("x")));
        primary.gate = Some(gate.clone());
        let resolver = FallbackResolver::new(primary, StubLookup::new("canonical", Answer::Broken));
        resolver.state.send_replace(Resolution::Failed("old".into()));
        let id: EventId = "e2".into();

        let observe = async {
            tokio::task::yield_now().await;
            assert_eq!(resolver.state(), Resolution::Loading("e2".into()));
            gate.notify_one();
        };
        let (resolved, ()) = tokio::join!(resolver.resolve(&id), observe);
        assert!(resolved.is_ok());
        assert_eq!(resolver.state().error(), None);
    }

    #[tokio::test]
    async fn test_superseded_resolution_does_not_overwrite_newer_state() {
        let gate = Arc::new(Notify::new());
        let mut primary = StubLookup::new("aggregated", Answer::Found(event("x")));
        primary.gate = Some(gate.clone());
        let resolver = FallbackResolver::new(primary, StubLookup::new("canonical", Answer::Broken));

        let old_id: EventId = "old".into();
        let new_id: EventId = "new".into();

        let older = resolver.resolve(&old_id);
        let newer = async {
            tokio::task::yield_now().await;
            let result = resolver.resolve(&new_id);
            tokio::pin!(result);
            // Both lookups are now parked on the gate
            tokio::select! {
                biased;
                _ = &mut result => unreachable!("gate not opened yet"),
                _ = tokio::task::yield_now() => {}
            }
            gate.notify_waiters();
            result.await
        };
        let (older, newer) = tokio::join!(older, newer);

        assert_eq!(older.unwrap().id, EventId::from("old"));
        assert_eq!(newer.unwrap().id, EventId::from("new"));
        assert_eq!(resolver.state().event().map(|e| e.id.as_str()), Some("new"));
    }

    #[tokio::test]
    async fn test_older_completion_keeps_newer_request_loading() {
        let gate = Arc::new(Notify::new());
        let mut primary = StubLookup::new("aggregated", Answer::Found(event("x")));
        primary.gate = Some(gate.clone());
        let resolver = FallbackResolver::new(primary, StubLookup::new("canonical", Answer::Broken));

        let old_id: EventId = "old".into();
        let new_id: EventId = "new".into();

        let older = async {
            let result = resolver.resolve(&old_id).await;
            // The newer request is still parked on the gate
            assert_eq!(resolver.state(), Resolution::Loading(new_id.clone()));
            gate.notify_one();
            result
        };
        let newer = async {
            tokio::task::yield_now().await;
            let result = resolver.resolve(&new_id);
            tokio::pin!(result);
            tokio::select! {
                biased;
                _ = &mut result => unreachable!("gate not opened yet"),
                _ = tokio::task::yield_now() => {}
            }
            // Wakes the older lookup, which parked first
            gate.notify_one();
            result.await
        };
        let (older, newer) = tokio::join!(older, newer);

        assert_eq!(older.unwrap().id, old_id);
        assert_eq!(newer.unwrap().id, new_id);
        assert_eq!(resolver.state().event().map(|e| e.id.as_str()), Some("new"));
    }
}
