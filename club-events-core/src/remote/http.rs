//! HTTP client for the club events API.

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::ClientConfig;
use crate::error::{EventsError, EventsResult};
use crate::event::{Event, EventId, EventRsvp};
use crate::remote::protocol::{self, AggregatedQuery, RsvpListResponse};
use crate::remote::{AggregatorService, EventsService};
use crate::request::{CreateEventRequest, UpdateEventRequest};

/// HTTP client for the events API.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct HttpClient {
    http: reqwest::Client,
    base_url: Url,
    auth_token: Option<String>,
}

impl HttpClient {
    pub fn new(config: &ClientConfig) -> EventsResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;

        Ok(HttpClient {
            http,
            base_url: parse_base_url(&config.api_url)?,
            auth_token: config.auth_token.clone(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, path: &str) -> EventsResult<Url> {
        self.base_url
            .join(path)
            .map_err(|e| EventsError::Config(format!("Invalid request path '{path}': {e}")))
    }

    fn request(&self, method: Method, path: &str) -> EventsResult<RequestBuilder> {
        let builder = self.http.request(method, self.url(path)?);
        Ok(match &self.auth_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> EventsResult<T> {
        let resp = builder.send().await?;
        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            return Err(protocol::classify(status, &body));
        }

        serde_json::from_str(&body).map_err(|e| EventsError::Decode(e.to_string()))
    }

    async fn send_empty(&self, builder: RequestBuilder) -> EventsResult<()> {
        let resp = builder.send().await?;
        let status = resp.status();

        if !status.is_success() {
            let body = resp.text().await?;
            return Err(protocol::classify(status, &body));
        }

        Ok(())
    }

    /// GET /health/ (outside the `/api/` prefix)
    pub async fn health(&self) -> EventsResult<()> {
        let url = self
            .base_url
            .join("/health/")
            .map_err(|e| EventsError::Config(e.to_string()))?;
        self.send_empty(self.http.get(url)).await
    }
}

/// The base URL must end with a slash, otherwise `join` drops its last segment.
fn parse_base_url(api_url: &str) -> EventsResult<Url> {
    let normalized = if api_url.ends_with('/') {
        api_url.to_string()
    } else {
        format!("{api_url}/")
    };

    Url::parse(&normalized)
        .map_err(|e| EventsError::Config(format!("Invalid api_url '{api_url}': {e}")))
}

#[async_trait]
impl EventsService for HttpClient {
    /// GET /events/
    async fn list_events(&self) -> EventsResult<Vec<Event>> {
        self.send(self.request(Method::GET, "events/")?).await
    }

    /// GET /events/:id/
    async fn get_event(&self, id: &EventId) -> EventsResult<Event> {
        self.send(self.request(Method::GET, &format!("events/{id}/"))?)
            .await
    }

    /// POST /events/create/
    async fn create_event(&self, request: &CreateEventRequest) -> EventsResult<Event> {
        self.send(self.request(Method::POST, "events/create/")?.json(request))
            .await
    }

    /// PUT /events/:id/update/
    async fn update_event(&self, id: &EventId, request: &UpdateEventRequest) -> EventsResult<Event> {
        self.send(
            self.request(Method::PUT, &format!("events/{id}/update/"))?
                .json(request),
        )
        .await
    }

    /// DELETE /events/:id/delete/
    async fn delete_event(&self, id: &EventId) -> EventsResult<()> {
        self.send_empty(self.request(Method::DELETE, &format!("events/{id}/delete/"))?)
            .await
    }

    /// GET /events/:id/rsvps/
    async fn list_rsvps(&self, event_id: &EventId) -> EventsResult<Vec<EventRsvp>> {
        let response: RsvpListResponse = self
            .send(self.request(Method::GET, &format!("events/{event_id}/rsvps/"))?)
            .await?;
        Ok(response.rsvps)
    }
}

#[async_trait]
impl AggregatorService for HttpClient {
    /// GET /events/google/:id/
    async fn get_aggregated_event(&self, id: &EventId) -> EventsResult<Event> {
        self.send(self.request(Method::GET, &format!("events/google/{id}/"))?)
            .await
    }

    /// GET /events/google/
    async fn list_aggregated_events(&self, query: &AggregatedQuery) -> EventsResult<Vec<Event>> {
        self.send(
            self.request(Method::GET, "events/google/")?
                .query(&query.to_query_pairs()),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(api_url: &str) -> HttpClient {
        HttpClient::new(&ClientConfig {
            api_url: api_url.into(),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_paths_join_under_api_prefix() {
        let client = client("https://club.example/api");
        assert_eq!(client.base_url().as_str(), "https://club.example/api/");
        assert_eq!(
            client.url("events/42/update/").unwrap().as_str(),
            "https://club.example/api/events/42/update/"
        );
    }

    #[test]
    fn test_invalid_base_url_is_config_error() {
        let result = HttpClient::new(&ClientConfig {
            api_url: "not a url".into(),
            ..Default::default()
        });
        assert!(matches!(result, Err(EventsError::Config(_))));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_unclassified() {
        // Port 9 (discard) on localhost is normally closed
        let client = client("http://127.0.0.1:9/api/");
        let err = client.list_events().await.unwrap_err();
        assert!(!err.is_classified());
        assert_eq!(err.display_message("Failed to load events"), "Failed to load events");
    }
}
