//! Wire types and error classification for the events HTTP API.

use reqwest::StatusCode;
use serde::Deserialize;

use crate::error::EventsError;
use crate::event::EventRsvp;

/// Body of `GET /events/{id}/rsvps/`.
#[derive(Debug, Deserialize)]
pub struct RsvpListResponse {
    pub count: usize,
    pub rsvps: Vec<EventRsvp>,
}

/// Query for the aggregated (Google Calendar) event listing.
#[derive(Debug, Clone)]
pub struct AggregatedQuery {
    /// Override the server's default calendar
    pub calendar_id: Option<String>,
    /// Limit applied separately to past and upcoming events
    pub max_results: Option<u32>,
    pub include_past: bool,
    pub include_upcoming: bool,
}

impl Default for AggregatedQuery {
    fn default() -> Self {
        AggregatedQuery {
            calendar_id: None,
            max_results: None,
            include_past: true,
            include_upcoming: true,
        }
    }
}

impl AggregatedQuery {
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("includePast", self.include_past.to_string()),
            ("includeUpcoming", self.include_upcoming.to_string()),
        ];
        if let Some(calendar_id) = &self.calendar_id {
            pairs.push(("calendarId", calendar_id.clone()));
        }
        if let Some(max_results) = self.max_results {
            pairs.push(("maxResults", max_results.to_string()));
        }
        pairs
    }
}

/// Pull a human-readable message out of an error response body.
///
/// The API answers either `{"error": "..."}` or, for validation failures, a
/// map of field name to a list of messages.
pub fn error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let object = value.as_object()?;

    for key in ["error", "message", "detail"] {
        if let Some(message) = object.get(key).and_then(|v| v.as_str()) {
            return Some(message.to_string());
        }
    }

    object.iter().find_map(|(field, messages)| {
        let first = match messages {
            serde_json::Value::String(s) => Some(s.as_str()),
            serde_json::Value::Array(items) => items.first().and_then(|v| v.as_str()),
            _ => None,
        }?;
        Some(if field == "non_field_errors" {
            first.to_string()
        } else {
            format!("{field}: {first}")
        })
    })
}

/// Map a non-success response onto a classified error.
pub fn classify(status: StatusCode, body: &str) -> EventsError {
    let message = error_message(body)
        .unwrap_or_else(|| format!("Request failed with status {}", status.as_u16()));

    match status {
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => EventsError::Validation(message),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => EventsError::Unauthorized(message),
        StatusCode::NOT_FOUND => EventsError::NotFound(message),
        StatusCode::CONFLICT => EventsError::Conflict(message),
        _ => EventsError::Server {
            status: status.as_u16(),
            message,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_key_wins() {
        assert_eq!(
            error_message(r#"{"error": "Event not found"}"#).as_deref(),
            Some("Event not found")
        );
    }

    #[test]
    fn test_validation_map_uses_first_message() {
        assert_eq!(
            error_message(r#"{"title": ["Title must be at least 3 characters long."]}"#).as_deref(),
            Some("title: Title must be at least 3 characters long.")
        );
        assert_eq!(
            error_message(r#"{"non_field_errors": ["Event end time must be after start time."]}"#)
                .as_deref(),
            Some("Event end time must be after start time.")
        );
    }

    #[test]
    fn test_unparseable_body_has_no_message() {
        assert_eq!(error_message("<html>502</html>"), None);
    }

    #[test]
    fn test_classify_by_status() {
        let err = classify(StatusCode::NOT_FOUND, r#"{"error": "Event not found"}"#);
        assert!(matches!(err, EventsError::NotFound(ref m) if m == "Event not found"));

        let err = classify(StatusCode::BAD_REQUEST, r#"{"title": ["too short"]}"#);
        assert!(matches!(err, EventsError::Validation(_)));

        let err = classify(StatusCode::UNAUTHORIZED, r#"{"error": "Authentication required"}"#);
        assert!(matches!(err, EventsError::Unauthorized(_)));

        let err = classify(StatusCode::BAD_GATEWAY, "");
        assert!(matches!(err, EventsError::Server { status: 502, .. }));
        assert_eq!(err.to_string(), "Request failed with status 502");
        assert!(err.is_classified());
    }

    #[test]
    fn test_aggregated_query_pairs() {
        let query = AggregatedQuery {
            calendar_id: Some("club".into()),
            max_results: Some(5),
            include_past: false,
            ..Default::default()
        };
        assert_eq!(
            query.to_query_pairs(),
            vec![
                ("includePast", "false".to_string()),
                ("includeUpcoming", "true".to_string()),
                ("calendarId", "club".to_string()),
                ("maxResults", "5".to_string()),
            ]
        );
    }
}
