use anyhow::Result;
use club_events_core::remote::HttpClient;
use club_events_core::{EventId, EventPatch, EventStore};
use owo_colors::OwoColorize;

use crate::UpdateArgs;
use crate::render::render_event_detail;

pub async fn run(client: HttpClient, args: UpdateArgs) -> Result<()> {
    let store = EventStore::new(client);
    let id = EventId::new(args.id);

    let patch = EventPatch {
        title: args.title,
        description: args.description,
        location: args.location,
        start_date: args.start_date,
        start_time: args.start_time,
        end_date: args.end_date,
        end_time: args.end_time,
        meeting_link: args.meeting_link,
        slides_url: args.slides_url,
        recording_url: args.recording_url,
    };

    // Updates only replace cached entries, so bring the event in first
    let before = store.get_by_id(&id).await?;

    let now = chrono::Utc::now();
    let editable = before.editable_fields_at(now);
    let requested = requested_fields(&patch);
    let blocked: Vec<&str> = requested
        .into_iter()
        .filter(|field| !editable.contains(field))
        .collect();
    if !blocked.is_empty() {
        eprintln!(
            "{}",
            format!(
                "Warning: {} cannot be changed for {} events, the server will likely reject this",
                blocked.join(", "),
                before.phase_at(now)
            )
            .yellow()
        );
    }

    let updated = store.update(&id, &patch).await?;

    println!("{}", format!("Updated: {}", updated.title).yellow());
    println!("{}", render_event_detail(&updated));

    Ok(())
}

/// Names of the event fields a patch would change.
fn requested_fields(patch: &EventPatch) -> Vec<&'static str> {
    let mut fields = Vec::new();
    if patch.title.is_some() {
        fields.push("title");
    }
    if patch.description.is_some() {
        fields.push("description");
    }
    if patch.location.is_some() {
        fields.push("location");
    }
    if patch.start_date.is_some() || patch.start_time.is_some() {
        fields.push("start_at");
    }
    if patch.end_date.is_some() || patch.end_time.is_some() {
        fields.push("end_at");
    }
    if patch.meeting_link.is_some() {
        fields.push("meeting_link");
    }
    if patch.slides_url.is_some() {
        fields.push("slides_url");
    }
    if patch.recording_url.is_some() {
        fields.push("recording_url");
    }
    fields
}
