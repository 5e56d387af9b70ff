use anyhow::Result;
use club_events_core::remote::HttpClient;
use club_events_core::resolver::failure_message;
use club_events_core::{Event, EventId, EventsResult, FallbackResolver};

use crate::render::render_event_detail;
use crate::utils::tui;

pub async fn run(client: HttpClient, id: EventId) -> Result<()> {
    let resolver = FallbackResolver::aggregated_then_canonical(client);

    let spinner = tui::create_spinner("Loading event");
    let result = resolver.resolve(&id).await;
    spinner.finish_and_clear();

    let event = resolved_event(result)?;
    println!("{}", render_event_detail(&event));

    Ok(())
}

fn resolved_event(result: EventsResult<Event>) -> Result<Event> {
    result.map_err(|err| anyhow::anyhow!(failure_message(&err)))
}
