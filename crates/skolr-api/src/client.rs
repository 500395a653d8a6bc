// HTTP pipeline for the skolr REST API.
//
// Wraps `reqwest::Client` with bearer-token injection, an in-flight
// request gauge, and centralized status-to-error normalization. All
// resource modules (students, grades, etc.) are implemented as inherent
// methods in separate files to keep this module focused on transport
// mechanics.

use std::sync::{Arc, RwLock};

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::watch;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// Configuration for constructing an [`ApiClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server base URL, e.g. `https://school.example.edu/api`.
    pub base_url: Url,
    pub transport: TransportConfig,
}

/// HTTP client for the skolr server.
///
/// Cheap to clone -- all state is behind `Arc`. The bearer token lives in
/// a swappable slot so one client instance survives login/logout cycles.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    /// Current bearer token. `None` before login and after logout.
    token: Arc<RwLock<Option<SecretString>>>,
    /// Count of requests currently in flight. Incremented when a request
    /// starts and decremented when it settles (success or error), so
    /// consumers can drive a shared loading indicator.
    in_flight: Arc<watch::Sender<usize>>,
}

impl ApiClient {
    /// Create a new client from a `ClientConfig`.
    pub fn new(config: &ClientConfig) -> Result<Self, Error> {
        let http = config.transport.build_client()?;
        let (in_flight, _) = watch::channel(0usize);
        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            token: Arc::new(RwLock::new(None)),
            in_flight: Arc::new(in_flight),
        })
    }

    /// The server base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── Token slot ───────────────────────────────────────────────────

    /// Install the bearer token used for subsequent requests.
    pub fn set_token(&self, token: SecretString) {
        *self.token.write().expect("token lock poisoned") = Some(token);
    }

    /// Remove the bearer token (logout).
    pub fn clear_token(&self) {
        *self.token.write().expect("token lock poisoned") = None;
    }

    /// Whether a bearer token is currently installed.
    pub fn has_token(&self) -> bool {
        self.token.read().expect("token lock poisoned").is_some()
    }

    // ── Loading gauge ────────────────────────────────────────────────

    /// Subscribe to the in-flight request count. The value stays above
    /// zero for as long as any request is outstanding.
    pub fn loading(&self) -> watch::Receiver<usize> {
        self.in_flight.subscribe()
    }

    /// Current number of in-flight requests.
    pub fn in_flight_count(&self) -> usize {
        *self.in_flight.subscribe().borrow()
    }

    fn track(&self) -> LoadingGuard {
        self.in_flight.send_modify(|n| *n += 1);
        LoadingGuard {
            gauge: Arc::clone(&self.in_flight),
        }
    }

    // ── URL construction ─────────────────────────────────────────────

    /// Build a full URL for an API path (no leading slash).
    pub(crate) fn url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}/{path}"))?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and deserialize the JSON response.
    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {}", url);
        let builder = self.authorize(self.http.get(url));
        self.send_json(builder).await
    }

    /// GET with query parameters.
    pub(crate) async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {}", url);
        let builder = self.authorize(self.http.get(url).query(query));
        self.send_json(builder).await
    }

    /// POST a JSON body and deserialize the JSON response.
    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("POST {}", url);
        let builder = self.authorize(self.http.post(url).json(body));
        self.send_json(builder).await
    }

    /// POST with no body, discarding any response payload.
    pub(crate) async fn post_empty(&self, path: &str) -> Result<(), Error> {
        let url = self.url(path)?;
        debug!("POST {}", url);
        let builder = self.authorize(self.http.post(url));
        self.send_no_content(builder).await
    }

    /// PUT a JSON body and deserialize the JSON response.
    pub(crate) async fn put<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("PUT {}", url);
        let builder = self.authorize(self.http.put(url).json(body));
        self.send_json(builder).await
    }

    /// Send a DELETE request, discarding any response payload.
    pub(crate) async fn delete(&self, path: &str) -> Result<(), Error> {
        let url = self.url(path)?;
        debug!("DELETE {}", url);
        let builder = self.authorize(self.http.delete(url));
        self.send_no_content(builder).await
    }

    /// GET returning the raw response body (report export blobs).
    pub(crate) async fn get_bytes(
        &self,
        path: &str,
        query: &(impl Serialize + Sync),
    ) -> Result<Vec<u8>, Error> {
        let url = self.url(path)?;
        debug!("GET {} (binary)", url);
        let builder = self.authorize(self.http.get(url).query(query));

        let _guard = self.track();
        let resp = builder.send().await.map_err(Error::Transport)?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::from_status(status, &body));
        }
        Ok(resp.bytes().await.map_err(Error::Transport)?.to_vec())
    }

    /// POST a file as `multipart/form-data` (CSV/Excel import endpoints).
    pub(crate) async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        filename: &str,
        bytes: Vec<u8>,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("POST {} (multipart, {})", url, filename);

        let part = reqwest::multipart::Part::bytes(bytes).file_name(filename.to_owned());
        let form = reqwest::multipart::Form::new().part("file", part);
        let builder = self.authorize(self.http.post(url).multipart(form));
        self.send_json(builder).await
    }

    // ── Pipeline internals ───────────────────────────────────────────

    /// Attach the bearer token, if one is installed.
    fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let guard = self.token.read().expect("token lock poisoned");
        match guard.as_ref() {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        }
    }

    /// Send a request and parse a JSON body, funnelling every non-2xx
    /// status through [`Error::from_status`].
    async fn send_json<T: DeserializeOwned>(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<T, Error> {
        let _guard = self.track();

        let resp = builder.send().await.map_err(Error::Transport)?;
        let status = resp.status();
        let body = resp.text().await.map_err(Error::Transport)?;

        if !status.is_success() {
            return Err(Error::from_status(status, &body));
        }

        serde_json::from_str(&body).map_err(|e| {
            let preview = crate::error::preview(&body);
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body,
            }
        })
    }

    /// Send a request where the caller doesn't care about the body.
    async fn send_no_content(&self, builder: reqwest::RequestBuilder) -> Result<(), Error> {
        let _guard = self.track();

        let resp = builder.send().await.map_err(Error::Transport)?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::from_status(status, &body));
        }
        Ok(())
    }
}

/// Decrements the in-flight gauge when a request settles, whichever way.
struct LoadingGuard {
    gauge: Arc<watch::Sender<usize>>,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.gauge.send_modify(|n| *n = n.saturating_sub(1));
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn test_client() -> ApiClient {
        let config = ClientConfig {
            base_url: "https://school.example.edu/api".parse().unwrap(),
            transport: TransportConfig::default(),
        };
        ApiClient::new(&config).unwrap()
    }

    #[test]
    fn url_joins_without_double_slashes() {
        let client = test_client();
        let url = client.url("students/7").unwrap();
        assert_eq!(url.as_str(), "https://school.example.edu/api/students/7");
    }

    #[test]
    fn token_slot_swaps() {
        let client = test_client();
        assert!(!client.has_token());
        client.set_token(SecretString::from("abc".to_owned()));
        assert!(client.has_token());
        client.clear_token();
        assert!(!client.has_token());
    }

    #[test]
    fn gauge_counts_and_settles() {
        let client = test_client();
        assert_eq!(client.in_flight_count(), 0);
        let g1 = client.track();
        let g2 = client.track();
        assert_eq!(client.in_flight_count(), 2);
        drop(g1);
        assert_eq!(client.in_flight_count(), 1);
        drop(g2);
        assert_eq!(client.in_flight_count(), 0);
    }
}
