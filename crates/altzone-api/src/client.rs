// Async HTTP client for the AlternativeZone REST API.
//
// Base path: /api/
// Auth: optional `Authorization: Bearer` from the identity provider

use std::time::Duration;

use reqwest::{RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::Error;
use crate::transport::TransportConfig;
use crate::types::{
    Created, NewQuery, NewRecommendation, QueryRecord, QueryUpdate, RecommendationRecord,
};

// ── Error response shape ─────────────────────────────────────────────

#[derive(serde::Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the queries / recommendations API.
///
/// Every method maps one-to-one onto a REST endpoint and returns the
/// decoded body. No retries, no caching: callers decide how to reconcile
/// local state with the result.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    /// Request timeout baked into `http`, when this client built it.
    timeout: Option<Duration>,
}

impl ApiClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build from a base URL and transport config.
    ///
    /// `base_url` may be the server root (`https://host`) or already point
    /// at the API (`https://host/api`); both resolve to `https://host/api/`.
    pub fn new(base_url: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        let mut client = Self::from_reqwest(base_url, http)?;
        client.timeout = Some(transport.timeout);
        Ok(client)
    }

    /// Wrap an existing `reqwest::Client` (caller manages headers).
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self {
            http,
            base_url,
            timeout: None,
        })
    }

    /// The normalized API base URL (always ends with `/api/`).
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;

        let path = url.path().trim_end_matches('/').to_owned();
        if path.ends_with("/api") {
            url.set_path(&format!("{path}/"));
        } else {
            url.set_path(&format!("{path}/api/"));
        }

        Ok(url)
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Append `segments` to the API base, percent-encoding each one.
    ///
    /// Ids and emails come from users, so a segment may contain `/`, `#`
    /// or `?`; each is encoded and stays a single segment. Empty, `.` and
    /// `..` segments are rejected since they would address another resource.
    fn url(&self, segments: &[&str]) -> Result<Url, Error> {
        if let Some(bad) = segments
            .iter()
            .find(|s| s.is_empty() || **s == "." || **s == "..")
        {
            return Err(Error::InvalidPathSegment((*bad).to_owned()));
        }

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send(&self, request: RequestBuilder) -> Result<reqwest::Response, Error> {
        request.send().await.map_err(|e| match self.timeout {
            Some(timeout) if e.is_timeout() => Error::Timeout {
                timeout_secs: timeout.as_secs(),
            },
            _ => Error::Transport(e),
        })
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, Error> {
        let url = self.url(segments)?;
        debug!("GET {url}");

        let resp = self.send(self.http.get(url)).await?;
        self.handle_response(resp).await
    }

    async fn get_with_params<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        params: &[(&str, String)],
    ) -> Result<T, Error> {
        let url = self.url(segments)?;
        debug!("GET {url} params={params:?}");

        let resp = self.send(self.http.get(url).query(params)).await?;
        self.handle_response(resp).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(segments)?;
        debug!("POST {url}");

        let resp = self.send(self.http.post(url).json(body)).await?;
        self.handle_response(resp).await
    }

    async fn put_no_response<B: Serialize + Sync>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<(), Error> {
        let url = self.url(segments)?;
        debug!("PUT {url}");

        let resp = self.send(self.http.put(url).json(body)).await?;
        self.handle_empty(resp).await
    }

    async fn put_empty(&self, segments: &[&str]) -> Result<(), Error> {
        let url = self.url(segments)?;
        debug!("PUT {url}");

        let resp = self.send(self.http.put(url)).await?;
        self.handle_empty(resp).await
    }

    async fn delete(&self, segments: &[&str]) -> Result<(), Error> {
        let url = self.url(segments)?;
        debug!("DELETE {url}");

        let resp = self.send(self.http.delete(url)).await?;
        self.handle_empty(resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            serde_json::from_str(&body).map_err(|e| {
                let preview: String = body.chars().take(200).collect();
                Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body,
                }
            })
        } else {
            Err(self.parse_error(status, resp).await)
        }
    }

    async fn handle_empty(&self, resp: reqwest::Response) -> Result<(), Error> {
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(self.parse_error(status, resp).await)
        }
    }

    async fn parse_error(&self, status: StatusCode, resp: reqwest::Response) -> Error {
        let path = resp.url().path().to_owned();
        let raw = resp.text().await.unwrap_or_default();

        let message = serde_json::from_str::<ErrorResponse>(&raw)
            .ok()
            .and_then(|e| e.message.or(e.error))
            .unwrap_or_else(|| {
                if raw.is_empty() {
                    status.to_string()
                } else {
                    raw.chars().take(200).collect()
                }
            });

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Error::Unauthorized { message },
            StatusCode::NOT_FOUND => Error::NotFound { path },
            _ => Error::Api {
                status: status.as_u16(),
                message,
            },
        }
    }

    // ━━ Public API ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    // ── Queries ──────────────────────────────────────────────────────

    /// `GET /allqueries`
    pub async fn list_all_queries(&self) -> Result<Vec<QueryRecord>, Error> {
        self.get(&["allqueries"]).await
    }

    /// `GET /recent-queries`
    pub async fn list_recent_queries(&self) -> Result<Vec<QueryRecord>, Error> {
        self.get(&["recent-queries"]).await
    }

    /// `GET /queries?user_email=` -- queries posted by one user.
    pub async fn list_user_queries(&self, email: &str) -> Result<Vec<QueryRecord>, Error> {
        self.get_with_params(&["queries"], &[("user_email", email.to_owned())])
            .await
    }

    pub async fn get_query(&self, id: &str) -> Result<QueryRecord, Error> {
        self.get(&["queries", id]).await
    }

    pub async fn create_query(&self, query: &NewQuery) -> Result<Created<QueryRecord>, Error> {
        self.post(&["queries"], query).await
    }

    pub async fn update_query(&self, id: &str, update: &QueryUpdate) -> Result<(), Error> {
        self.put_no_response(&["queries", id], update).await
    }

    pub async fn delete_query(&self, id: &str) -> Result<(), Error> {
        self.delete(&["queries", id]).await
    }

    pub async fn increment_recommendations(&self, id: &str) -> Result<(), Error> {
        self.put_empty(&["queries", id, "increment-recommendations"])
            .await
    }

    pub async fn decrement_recommendations(&self, id: &str) -> Result<(), Error> {
        self.put_empty(&["queries", id, "decrement-recommendations"])
            .await
    }

    // ── Recommendations ──────────────────────────────────────────────

    /// `GET /recommendations?queryId=` -- recommendations posted on one query.
    pub async fn list_query_recommendations(
        &self,
        query_id: &str,
    ) -> Result<Vec<RecommendationRecord>, Error> {
        self.get_with_params(&["recommendations"], &[("queryId", query_id.to_owned())])
            .await
    }

    /// `GET /recommendations-for-user/{email}` -- recommendations the user wrote.
    pub async fn list_recommendations_for_user(
        &self,
        email: &str,
    ) -> Result<Vec<RecommendationRecord>, Error> {
        self.get(&["recommendations-for-user", email]).await
    }

    /// `GET /my-recommendations?user_email=` -- recommendations received on
    /// the user's queries.
    pub async fn list_my_recommendations(
        &self,
        email: &str,
    ) -> Result<Vec<RecommendationRecord>, Error> {
        self.get_with_params(&["my-recommendations"], &[("user_email", email.to_owned())])
            .await
    }

    /// `GET /recommendations/by-query-ids?queryIds=a,b` -- the queries behind
    /// a set of recommendations.
    pub async fn list_queries_by_ids(&self, ids: &[&str]) -> Result<Vec<QueryRecord>, Error> {
        self.get_with_params(&["recommendations", "by-query-ids"], &[("queryIds", ids.join(","))])
            .await
    }

    pub async fn create_recommendation(
        &self,
        recommendation: &NewRecommendation,
    ) -> Result<Created<RecommendationRecord>, Error> {
        self.post(&["recommendations"], recommendation).await
    }

    pub async fn delete_recommendation(&self, id: &str) -> Result<(), Error> {
        self.delete(&["recommendations", id]).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gains_api_segment() {
        let client = ApiClient::from_reqwest("https://example.com", reqwest::Client::new()).unwrap();
        assert_eq!(client.base_url().as_str(), "https://example.com/api/");
    }

    #[test]
    fn base_url_keeps_existing_api_segment() {
        let client =
            ApiClient::from_reqwest("https://example.com/api/", reqwest::Client::new()).unwrap();
        assert_eq!(client.base_url().as_str(), "https://example.com/api/");
    }

    #[test]
    fn ids_and_emails_stay_single_segments() {
        let client = ApiClient::from_reqwest("https://example.com", reqwest::Client::new()).unwrap();

        let url = client
            .url(&["recommendations-for-user", "jo#hn+x?@example.com"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://example.com/api/recommendations-for-user/jo%23hn+x%3F@example.com"
        );

        let url = client.url(&["queries", "../allqueries"]).unwrap();
        assert_eq!(url.as_str(), "https://example.com/api/queries/..%2Fallqueries");
    }

    #[test]
    fn dot_segments_are_rejected() {
        let client = ApiClient::from_reqwest("https://example.com", reqwest::Client::new()).unwrap();
        for id in ["", ".", ".."] {
            assert!(matches!(
                client.url(&["queries", id]),
                Err(Error::InvalidPathSegment(_))
            ));
        }
    }

    #[test]
    fn base_url_preserves_mount_prefix() {
        let client =
            ApiClient::from_reqwest("https://example.com/v2", reqwest::Client::new()).unwrap();
        assert_eq!(client.base_url().as_str(), "https://example.com/v2/api/");
    }
}
