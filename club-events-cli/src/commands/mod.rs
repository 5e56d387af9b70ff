pub mod delete;
pub mod google;
pub mod health;
pub mod list;
pub mod new;
pub mod rsvps;
pub mod show;
pub mod update;

use anyhow::Result;
use club_events_core::EventStore;
use club_events_core::remote::EventsService;

/// Turn an error recorded in the store's status into a command failure.
pub fn fail_on_status_error<S: EventsService>(store: &EventStore<S>) -> Result<()> {
    match store.status().error {
        Some(message) => anyhow::bail!(message),
        None => Ok(()),
    }
}
