use anyhow::Result;
use club_events_core::remote::HttpClient;
use club_events_core::{EventId, EventStore};
use owo_colors::OwoColorize;

use crate::render::Render;

pub async fn run(client: HttpClient, id: EventId) -> Result<()> {
    let store = EventStore::new(client);

    let rsvps = store.get_rsvps(&id).await?;

    if rsvps.is_empty() {
        println!("{}", "No RSVPs yet".dimmed());
        return Ok(());
    }

    println!("{}", format!("{} RSVPs", rsvps.len()).bold());
    for rsvp in &rsvps {
        println!("  {}", rsvp.render());
    }

    Ok(())
}
