//! TUI rendering traits for club-events types.
//!
//! Extension traits that add colored terminal rendering to core types
//! using owo_colors.

use chrono::{DateTime, Local, Utc};
use club_events_core::{Event, EventPhase, EventRsvp};
use owo_colors::OwoColorize;

use crate::utils::tui::strip_html;

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for EventPhase {
    fn render(&self) -> String {
        let label = self.to_string();
        match self {
            EventPhase::Upcoming => label.green().to_string(),
            EventPhase::Ongoing => label.yellow().to_string(),
            EventPhase::Past => label.dimmed().to_string(),
        }
    }
}

/// One-line summary used in listings
impl Render for Event {
    fn render(&self) -> String {
        let when = format!("{} {}", format_date(&self.start_at), format_time(&self.start_at));
        let mut line = format!("{}  {}", when, self.title.bold());
        if let Some(location) = &self.location {
            line.push_str(&format!(" {}", format!("@ {location}").dimmed()));
        }
        line.push_str(&format!(" {}", format!("[{}]", self.id).dimmed()));
        line
    }
}

impl Render for EventRsvp {
    fn render(&self) -> String {
        let name = self.name.as_deref().unwrap_or("(no name)");
        let mut line = format!("{} {}", name, format!("<{}>", self.email).dimmed());
        if let Some(comment) = &self.comment {
            line.push_str(&format!(" {}", format!("\"{comment}\"").italic()));
        }
        line
    }
}

/// Full detail view of one event.
pub fn render_event_detail(event: &Event) -> String {
    let phase = event.status.unwrap_or_else(|| event.phase());

    let mut lines = vec![
        format!("{} {}", event.title.bold(), format!("({})", phase.render()).dimmed()),
        format!(
            "{} • {}",
            format_date(&event.start_at),
            format_time_range(&event.start_at, &event.end_at)
        )
        .dimmed()
        .to_string(),
    ];

    if let Some(location) = &event.location {
        lines.push(location.dimmed().to_string());
    }

    let description = strip_html(event.description.as_deref());
    if !description.is_empty() {
        lines.push(String::new());
        lines.push(description);
    }

    let links = [
        ("Meeting", event.meeting_link.as_deref()),
        ("Slides", event.slides_url.as_deref()),
        ("Recording", event.recording_url.as_deref()),
    ];
    let present: Vec<(&str, &str)> = links
        .into_iter()
        .filter_map(|(label, url)| url.map(|url| (label, url)))
        .collect();
    if !present.is_empty() {
        lines.push(String::new());
        for (label, url) in present {
            lines.push(format!("{} {}", format!("{label}:").dimmed(), url.underline()));
        }
    }

    if let Some(count) = event.rsvp_count {
        lines.push(String::new());
        lines.push(format!("{} {}", count, pluralize("RSVP", count as usize)).dimmed().to_string());
    }

    lines.join("\n")
}

/// Format a date like "Thu Mar 20, 2025" in local time
fn format_date(dt: &DateTime<Utc>) -> String {
    dt.with_timezone(&Local).format("%a %b %-d, %Y").to_string()
}

/// Format a time like "9:00 AM" in local time
fn format_time(dt: &DateTime<Utc>) -> String {
    format!("{:>8}", dt.with_timezone(&Local).format("%-I:%M %p"))
}

fn format_time_range(start: &DateTime<Utc>, end: &DateTime<Utc>) -> String {
    if start == end {
        return format_time(start).trim().to_string();
    }
    format!(
        "{} – {}",
        format_time(start).trim(),
        format_time(end).trim()
    )
}

fn pluralize(word: &str, count: usize) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{word}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn hack_night() -> Event {
        let start = Utc.with_ymd_and_hms(2025, 3, 20, 18, 0, 0).unwrap();
        let mut event = Event::new("42", "Hack Night", start, start + chrono::Duration::hours(2));
        event.description = Some("<p>Bring a laptop</p>".into());
        event.slides_url = Some("https://slides.example/42".into());
        event.rsvp_count = Some(1);
        event
    }

    #[test]
    fn test_summary_line_mentions_title_and_id() {
        let line = hack_night().render();
        assert!(line.contains("Hack Night"));
        assert!(line.contains("[42]"));
    }

    #[test]
    fn test_detail_strips_html_and_lists_links() {
        let detail = render_event_detail(&hack_night());
        assert!(detail.contains("Bring a laptop"));
        assert!(!detail.contains("<p>"));
        assert!(detail.contains("https://slides.example/42"));
        assert!(detail.contains("1 RSVP"));
        assert!(!detail.contains("Recording"));
    }

    #[test]
    fn test_pluralize() {
        assert_eq!(pluralize("RSVP", 1), "RSVP");
        assert_eq!(pluralize("RSVP", 3), "RSVPs");
    }
}
