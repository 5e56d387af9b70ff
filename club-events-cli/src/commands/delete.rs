use anyhow::Result;
use club_events_core::remote::HttpClient;
use club_events_core::{EventId, EventStore};
use dialoguer::Confirm;
use owo_colors::OwoColorize;

use crate::render::Render;

pub async fn run(client: HttpClient, id: EventId, force: bool) -> Result<()> {
    let store = EventStore::new(client);

    let event = store.get_by_id(&id).await?;
    println!("{}", event.render());

    // Confirm unless --force
    if !force {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete \"{}\"?", event.title))
            .default(false)
            .interact()?;

        if !confirmed {
            return Ok(());
        }
    }

    store.delete(&id).await?;

    println!("{}", format!("Deleted: {}", event.title).red());

    Ok(())
}
