//! Client for the studio REST API.

use super::{RankStore, StoreError};
use crate::story::Story;
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde_json::json;
use std::time::Duration;
use tracing::{debug, warn};

/// Collection endpoint, relative to the API base URL.
pub const LOVE_STORIES_PATH: &str = "/api/love-stories";

/// Request timeout applied by the underlying HTTP client.
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// A [`RankStore`] backed by `GET /api/love-stories` and
/// `PUT /api/love-stories/{id}`.
#[derive(Debug, Clone)]
pub struct HttpStore {
    client: Client,
    base: Url,
}

impl HttpStore {
    /// Build a store for the API rooted at `base_url` (e.g. `http://localhost:5000`).
    pub fn new(base_url: &str) -> Result<Self, StoreError> {
        let client = Client::builder().timeout(DEFAULT_REQUEST_TIMEOUT).build()?;
        Self::with_client(client, base_url)
    }

    /// Build a store around an existing client.
    pub fn with_client(client: Client, base_url: &str) -> Result<Self, StoreError> {
        let base =
            Url::parse(base_url).map_err(|_| StoreError::InvalidUrl(base_url.to_string()))?;
        if base.cannot_be_a_base() || !matches!(base.scheme(), "http" | "https") {
            return Err(StoreError::InvalidUrl(base_url.to_string()));
        }
        Ok(Self { client, base })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, id: Option<&str>) -> Result<Url, StoreError> {
        let mut url = self.base.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| StoreError::InvalidUrl(self.base.to_string()))?;
            segments
                .pop_if_empty()
                .extend(LOVE_STORIES_PATH.split('/').filter(|s| !s.is_empty()));
            if let Some(id) = id {
                segments.push(id);
            }
        }
        Ok(url)
    }
}

#[async_trait]
impl RankStore for HttpStore {
    type Record = Story;

    async fn fetch_all(&self) -> Result<Vec<Story>, StoreError> {
        let url = self.endpoint(None)?;
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body: serde_json::Value = response.json().await?;
        if !body.is_array() {
            warn!(url = %url, "Story list response is not an array; treating as empty");
            return Ok(Vec::new());
        }
        let stories: Vec<Story> = serde_json::from_value(body)?;
        debug!(count = stories.len(), "Fetched stories over HTTP");
        Ok(stories)
    }

    async fn update_order(&self, id: &str, order: u32) -> Result<(), StoreError> {
        let url = self.endpoint(Some(id))?;
        let response = self
            .client
            .put(url.clone())
            .json(&json!({ "order": order }))
            .send()
            .await?;
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(StoreError::not_found(id));
        }
        if !status.is_success() {
            return Err(StoreError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        debug!(id, order, "Stored rank over HTTP");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    #[test]
    fn test_rejects_invalid_base_urls() {
        assert!(matches!(HttpStore::new("not a url"), Err(StoreError::InvalidUrl(_))));
        assert!(matches!(HttpStore::new("mailto:a@b.c"), Err(StoreError::InvalidUrl(_))));
        assert!(matches!(HttpStore::new("ftp://host"), Err(StoreError::InvalidUrl(_))));
    }

    #[test]
    fn test_endpoint_joins_path_and_escapes_id() {
        let store = HttpStore::new("http://localhost:5000/").unwrap();
        assert_eq!(
            store.endpoint(None).unwrap().as_str(),
            "http://localhost:5000/api/love-stories"
        );
        assert_eq!(
            store.endpoint(Some("a b")).unwrap().as_str(),
            "http://localhost:5000/api/love-stories/a%20b"
        );

        let prefixed = HttpStore::new("https://studio.example/admin").unwrap();
        assert_eq!(
            prefixed.endpoint(Some("x")).unwrap().as_str(),
            "https://studio.example/admin/api/love-stories/x"
        );
    }

    #[tokio::test]
    async fn test_fetch_all_parses_records() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/love-stories")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[{"_id":"b","title":"B","order":2,"status":"Active"},
                    {"_id":"a","title":"A","order":1,"status":"Inactive","__v":0}]"#,
            )
            .create_async()
            .await;

        let store = HttpStore::new(&server.url()).unwrap();
        let stories = store.fetch_all().await.unwrap();

        mock.assert_async().await;
        let ids: Vec<&str> = stories.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert_eq!(stories[1].order, Some(1));
    }

    #[tokio::test]
    async fn test_fetch_all_tolerates_bad_orders() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/love-stories")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"_id":"a","order":1},{"_id":"b","order":-1},{"_id":"c","order":2.5}]"#)
            .create_async()
            .await;

        let store = HttpStore::new(&server.url()).unwrap();
        let stories = store.fetch_all().await.unwrap();

        let orders: Vec<(&str, Option<u32>)> =
            stories.iter().map(|s| (s.id.as_str(), s.order)).collect();
        assert_eq!(orders, vec![("a", Some(1)), ("b", None), ("c", None)]);
    }

    #[tokio::test]
    async fn test_fetch_all_non_array_is_empty() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/love-stories")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"message":"ok"}"#)
            .create_async()
            .await;

        let store = HttpStore::new(&server.url()).unwrap();
        assert!(store.fetch_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_all_server_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/love-stories")
            .with_status(500)
            .create_async()
            .await;

        let store = HttpStore::new(&server.url()).unwrap();
        assert!(matches!(
            store.fetch_all().await,
            Err(StoreError::Status { status: 500, .. })
        ));
    }

    #[tokio::test]
    async fn test_update_order_sends_order_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PUT", "/api/love-stories/abc")
            .match_body(Matcher::Json(json!({ "order": 3 })))
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let store = HttpStore::new(&server.url()).unwrap();
        store.update_order("abc", 3).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_update_order_maps_statuses() {
        let mut server = mockito::Server::new_async().await;
        let _missing = server
            .mock("PUT", "/api/love-stories/gone")
            .with_status(404)
            .create_async()
            .await;
        let _broken = server
            .mock("PUT", "/api/love-stories/bad")
            .with_status(503)
            .create_async()
            .await;

        let store = HttpStore::new(&server.url()).unwrap();
        assert!(matches!(
            store.update_order("gone", 1).await,
            Err(StoreError::NotFound(id)) if id == "gone"
        ));
        assert!(matches!(
            store.update_order("bad", 1).await,
            Err(StoreError::Status { status: 503, .. })
        ));
    }
}
