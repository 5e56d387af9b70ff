//! Request-shape adapters.
//!
//! Forms hand over dates and clock times separately (a calendar date plus an
//! `HH:MM` string). These adapters combine them into the timestamps the
//! service expects and drop fields that were not provided.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Serialize;

use crate::error::{EventsError, EventsResult};

const MIN_TITLE_LEN: usize = 3;

/// Everything needed to create an event.
#[derive(Debug, Clone, Default)]
pub struct EventDraft {
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start_date: NaiveDate,
    pub start_time: String,
    pub end_date: NaiveDate,
    pub end_time: String,
    pub meeting_link: Option<String>,
    pub slides_url: Option<String>,
}

/// A partial update. Only fields that are `Some` are sent.
///
/// Changing a bound needs both its date and its time.
#[derive(Debug, Clone, Default)]
pub struct EventPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub start_time: Option<String>,
    pub end_date: Option<NaiveDate>,
    pub end_time: Option<String>,
    pub meeting_link: Option<String>,
    pub slides_url: Option<String>,
    pub recording_url: Option<String>,
}

/// Body of `POST /events/create/`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateEventRequest {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meeting_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slides_url: Option<String>,
}

/// Body of `PUT /events/{id}/update/`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UpdateEventRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meeting_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slides_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recording_url: Option<String>,
}

impl UpdateEventRequest {
    pub fn is_empty(&self) -> bool {
        *self == UpdateEventRequest::default()
    }
}

pub fn to_create_request(draft: &EventDraft) -> EventsResult<CreateEventRequest> {
    let title = validate_title(&draft.title)?;
    let start_at = combine(draft.start_date, &draft.start_time)?;
    let end_at = combine(draft.end_date, &draft.end_time)?;
    validate_order(start_at, end_at)?;

    Ok(CreateEventRequest {
        title,
        description: non_blank(&draft.description),
        location: non_blank(&draft.location),
        start_at,
        end_at,
        meeting_link: non_blank(&draft.meeting_link),
        slides_url: non_blank(&draft.slides_url),
    })
}

pub fn to_update_request(patch: &EventPatch) -> EventsResult<UpdateEventRequest> {
    let title = patch.title.as_deref().map(validate_title).transpose()?;
    let start_at = combine_bound("start", patch.start_date, patch.start_time.as_deref())?;
    let end_at = combine_bound("end", patch.end_date, patch.end_time.as_deref())?;

    if let (Some(start), Some(end)) = (start_at, end_at) {
        validate_order(start, end)?;
    }

    Ok(UpdateEventRequest {
        title,
        description: patch.description.clone(),
        location: patch.location.clone(),
        start_at,
        end_at,
        meeting_link: patch.meeting_link.clone(),
        slides_url: patch.slides_url.clone(),
        recording_url: patch.recording_url.clone(),
    })
}

fn validate_title(title: &str) -> EventsResult<String> {
    let trimmed = title.trim();
    if trimmed.chars().count() < MIN_TITLE_LEN {
        return Err(EventsError::Validation(format!(
            "Title must be at least {MIN_TITLE_LEN} characters long."
        )));
    }
    Ok(trimmed.to_string())
}

fn validate_order(start_at: DateTime<Utc>, end_at: DateTime<Utc>) -> EventsResult<()> {
    if end_at <= start_at {
        return Err(EventsError::Validation(
            "Event end time must be after start time.".into(),
        ));
    }
    Ok(())
}

fn combine_bound(
    which: &str,
    date: Option<NaiveDate>,
    time: Option<&str>,
) -> EventsResult<Option<DateTime<Utc>>> {
    match (date, time) {
        (Some(date), Some(time)) => combine(date, time).map(Some),
        (None, None) => Ok(None),
        _ => Err(EventsError::Validation(format!(
            "Both {which} date and {which} time are required to change the {which} of an event."
        ))),
    }
}

/// Combine a calendar date with an `HH:MM` or `HH:MM:SS` clock time, in UTC.
fn combine(date: NaiveDate, time: &str) -> EventsResult<DateTime<Utc>> {
    let time = time.trim();
    let parsed = NaiveTime::parse_from_str(time, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(time, "%H:%M:%S"))
        .map_err(|_| {
            EventsError::Validation(format!("Invalid time '{time}'. Expected HH:MM"))
        })?;
    Ok(date.and_time(parsed).and_utc())
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}
