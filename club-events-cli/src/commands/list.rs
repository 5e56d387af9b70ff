use anyhow::Result;
use club_events_core::EventStore;
use club_events_core::remote::HttpClient;
use owo_colors::OwoColorize;

use crate::commands::fail_on_status_error;
use crate::render::Render;
use crate::utils::tui;

pub async fn run(client: HttpClient) -> Result<()> {
    let store = EventStore::new(client);

    let spinner = tui::create_spinner("Loading events");
    store.load_all().await;
    spinner.finish_and_clear();

    // load_all absorbs failures into the status
    fail_on_status_error(&store)?;

    let events = store.events();
    if events.is_empty() {
        println!("{}", "No events found".dimmed());
        return Ok(());
    }

    for event in &events {
        println!("{}", event.render());
    }

    Ok(())
}
