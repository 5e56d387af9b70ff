//! Event and RSVP types as returned by the events service.
//!
//! The service serves two shapes of event record: canonical rows from its own
//! database (with `start_at`/`end_at`) and aggregated records mirrored from
//! Google Calendar (with only the legacy `event_date`). Both decode into the
//! same [`Event`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Opaque event identifier assigned by the remote service.
///
/// The wire form is usually a JSON number, but any string is accepted too.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct EventId(String);

impl EventId {
    pub fn new(id: impl Into<String>) -> Self {
        EventId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for EventId {
    fn from(id: &str) -> Self {
        EventId::new(id)
    }
}

impl From<String> for EventId {
    fn from(id: String) -> Self {
        EventId(id)
    }
}

impl From<u64> for EventId {
    fn from(id: u64) -> Self {
        EventId(id.to_string())
    }
}

impl<'de> Deserialize<'de> for EventId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserialize_opaque_id(deserializer).map(EventId)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Unsigned(u64),
    Signed(i64),
}

/// Accept an identifier encoded as either a JSON string or a JSON integer.
fn deserialize_opaque_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Unsigned(n) => n.to_string(),
        RawId::Signed(n) => n.to_string(),
    })
}

/// Where an event sits relative to the current time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventPhase {
    Upcoming,
    Ongoing,
    Past,
}

impl fmt::Display for EventPhase {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let label = match self {
            EventPhase::Upcoming => "upcoming",
            EventPhase::Ongoing => "ongoing",
            EventPhase::Past => "past",
        };
        write!(f, "{label}")
    }
}

/// Every field an organizer can edit while the event is still upcoming.
pub const ALL_EDITABLE_FIELDS: &[&str] = &[
    "title",
    "description",
    "location",
    "start_at",
    "end_at",
    "meeting_link",
    "slides_url",
    "recording_url",
];

const ONGOING_EDITABLE_FIELDS: &[&str] = &["meeting_link"];
const PAST_EDITABLE_FIELDS: &[&str] = &["slides_url", "recording_url"];

/// A club event in its canonical form, as returned by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "EventRecord")]
pub struct Event {
    pub id: EventId,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub meeting_link: Option<String>,
    pub slides_url: Option<String>,
    pub recording_url: Option<String>,

    // Server-computed, read-only
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    /// Phase as computed by the server at response time
    pub status: Option<EventPhase>,
    pub rsvp_count: Option<u32>,
    pub editable_fields: Option<Vec<String>>,
}

impl Event {
    pub fn new(id: impl Into<EventId>, title: &str, start_at: DateTime<Utc>, end_at: DateTime<Utc>) -> Self {
        Event {
            id: id.into(),
            title: title.to_string(),
            description: None,
            location: None,
            start_at,
            end_at,
            meeting_link: None,
            slides_url: None,
            recording_url: None,
            created_at: None,
            updated_at: None,
            status: None,
            rsvp_count: None,
            editable_fields: None,
        }
    }

    /// Phase of the event at the given instant.
    pub fn phase_at(&self, now: DateTime<Utc>) -> EventPhase {
        if now < self.start_at {
            EventPhase::Upcoming
        } else if now < self.end_at {
            EventPhase::Ongoing
        } else {
            EventPhase::Past
        }
    }

    pub fn phase(&self) -> EventPhase {
        self.phase_at(Utc::now())
    }

    /// RSVPs are only accepted before the event starts.
    pub fn can_rsvp_at(&self, now: DateTime<Utc>) -> bool {
        self.phase_at(now) == EventPhase::Upcoming
    }

    /// Fields the service lets an organizer change in the event's current phase.
    pub fn editable_fields_at(&self, now: DateTime<Utc>) -> &'static [&'static str] {
        match self.phase_at(now) {
            EventPhase::Upcoming => ALL_EDITABLE_FIELDS,
            EventPhase::Ongoing => ONGOING_EDITABLE_FIELDS,
            EventPhase::Past => PAST_EDITABLE_FIELDS,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}

/// Wire shape of an event, covering both canonical and aggregated records.
#[derive(Deserialize)]
struct EventRecord {
    id: EventId,
    #[serde(default)]
    title: String,
    description: Option<String>,
    location: Option<String>,
    start_at: Option<DateTime<Utc>>,
    end_at: Option<DateTime<Utc>>,
    /// Legacy start field, the only timestamp on aggregated records
    event_date: Option<DateTime<Utc>>,
    meeting_link: Option<String>,
    slides_url: Option<String>,
    recording_url: Option<String>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
    status: Option<EventPhase>,
    rsvp_count: Option<u32>,
    editable_fields: Option<Vec<String>>,
}

impl TryFrom<EventRecord> for Event {
    type Error = String;

    fn try_from(record: EventRecord) -> Result<Self, Self::Error> {
        let start_at = record
            .start_at
            .or(record.event_date)
            .ok_or_else(|| format!("event {} has neither start_at nor event_date", record.id))?;
        let end_at = record.end_at.unwrap_or(start_at);

        Ok(Event {
            id: record.id,
            title: record.title,
            description: record.description,
            location: record.location,
            start_at,
            end_at,
            meeting_link: record.meeting_link,
            slides_url: record.slides_url,
            recording_url: record.recording_url,
            created_at: record.created_at,
            updated_at: record.updated_at,
            status: record.status,
            rsvp_count: record.rsvp_count,
            editable_fields: record.editable_fields,
        })
    }
}

/// An RSVP to an event. Read-only from the client's point of view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRsvp {
    #[serde(deserialize_with = "deserialize_opaque_id")]
    pub id: String,
    #[serde(alias = "event")]
    pub event_id: EventId,
    pub name: Option<String>,
    pub email: String,
    pub comment: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}
