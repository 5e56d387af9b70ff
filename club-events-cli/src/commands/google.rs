use anyhow::Result;
use club_events_core::remote::{AggregatedQuery, AggregatorService, HttpClient};
use owo_colors::OwoColorize;

use crate::render::Render;
use crate::utils::tui;

pub async fn run(
    client: HttpClient,
    calendar_id: Option<String>,
    max_results: Option<u32>,
    include_past: bool,
    include_upcoming: bool,
) -> Result<()> {
    let query = AggregatedQuery {
        calendar_id,
        max_results,
        include_past,
        include_upcoming,
    };

    let spinner = tui::create_spinner("Loading Google Calendar events");
    let result = client.list_aggregated_events(&query).await;
    spinner.finish_and_clear();

    let events = result?;
    if events.is_empty() {
        println!("{}", "No events found".dimmed());
        return Ok(());
    }

    for event in &events {
        println!("{}", event.render());
    }

    Ok(())
}
