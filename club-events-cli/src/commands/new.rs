use anyhow::Result;
use club_events_core::remote::HttpClient;
use club_events_core::{EventDraft, EventStore};
use owo_colors::OwoColorize;

use crate::NewArgs;

pub async fn run(client: HttpClient, args: NewArgs) -> Result<()> {
    let store = EventStore::new(client);

    let draft = EventDraft {
        title: args.title,
        description: args.description,
        location: args.location,
        start_date: args.date,
        start_time: args.start,
        end_date: args.end_date.unwrap_or(args.date),
        end_time: args.end,
        meeting_link: args.meeting_link,
        slides_url: args.slides_url,
    };

    let event = store.create(&draft).await?;

    println!("{}", format!("Created: {} [{}]", event.title, event.id).green());

    Ok(())
}
