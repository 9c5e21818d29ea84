// Hand-crafted async HTTP client for the Stowage inventory API.
//
// Base path: whatever the deployment serves (e.g. http://host:5234/api/).
// No authentication — the backend sits on a trusted network.

use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::Error;
use crate::types::{NewPackage, PackageRecord, PackageStatus, UserRecord};

// ── Error response shapes from the inventory API ─────────────────────

/// Structured error body. The backend emits either `{message}` or an
/// ASP.NET-style problem document with `{title}`; plain-text bodies are
/// handled separately.
#[derive(serde::Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    title: Option<String>,
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the inventory API.
///
/// Each operation performs exactly one request — retry is a caller
/// decision, never done here.
pub struct InventoryClient {
    http: reqwest::Client,
    base_url: Url,
}

impl InventoryClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build a client against the given base URL with a request timeout.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: Self::normalize_base_url(base_url)?,
        })
    }

    /// Wrap an existing `reqwest::Client` (caller manages transport tuning).
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        Ok(Self {
            http,
            base_url: Self::normalize_base_url(base_url)?,
        })
    }

    /// Ensure the base URL ends with `/` so relative joins keep the
    /// full path (`Url::join` drops the last segment otherwise).
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{path}/"));
        Ok(url)
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Join a relative path (e.g. `"packages"`) onto the base URL.
    fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path)?)
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url}");

        let resp = self.http.get(url).send().await?;
        Self::handle_response(resp).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("POST {url}");

        let resp = self.http.post(url).json(body).send().await?;
        Self::handle_response(resp).await
    }

    async fn put_no_response<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), Error> {
        let url = self.url(path)?;
        debug!("PUT {url}");

        let resp = self.http.put(url).json(body).send().await?;
        Self::handle_empty(resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            serde_json::from_str(&body).map_err(|e| {
                // Truncate by characters, not bytes: a byte slice could
                // split a multibyte code point and panic.
                let preview: String = body.chars().take(200).collect();
                Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body,
                }
            })
        } else {
            Err(Self::extract_error(status, resp).await)
        }
    }

    /// 204 and any other bodiless success resolve without touching the body.
    async fn handle_empty(resp: reqwest::Response) -> Result<(), Error> {
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Self::extract_error(status, resp).await)
        }
    }

    /// Normalize a non-2xx response into [`Error::Api`].
    ///
    /// The body is read as text exactly once (response bodies are
    /// single-read). If it parses as JSON with a `message` or `title`
    /// field, that field wins; otherwise the raw text is used; an empty
    /// body falls back to the HTTP status line.
    async fn extract_error(status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        let raw = resp.text().await.unwrap_or_default();

        let message = match serde_json::from_str::<ErrorResponse>(&raw) {
            Ok(ErrorResponse {
                message: Some(m), ..
            }) => m,
            Ok(ErrorResponse { title: Some(t), .. }) => t,
            _ if !raw.is_empty() => raw,
            _ => status.to_string(),
        };

        Error::Api {
            status: status.as_u16(),
            message,
        }
    }

    // ━━ Public API ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    // ── Packages ─────────────────────────────────────────────────────

    pub async fn list_packages(&self) -> Result<Vec<PackageRecord>, Error> {
        self.get("packages").await
    }

    pub async fn create_package(&self, package: &NewPackage) -> Result<PackageRecord, Error> {
        self.post("packages", package).await
    }

    /// `PUT /packages/{id}/status` — the backend answers 204 on success.
    pub async fn set_package_status(
        &self,
        id: &str,
        status: PackageStatus,
    ) -> Result<(), Error> {
        #[derive(Serialize)]
        struct Body {
            status: PackageStatus,
        }

        self.put_no_response(&format!("packages/{id}/status"), &Body { status })
            .await
    }

    // ── Users ────────────────────────────────────────────────────────

    pub async fn list_users(&self) -> Result<Vec<UserRecord>, Error> {
        self.get("users").await
    }

    pub async fn create_user(&self, name: &str, email: &str) -> Result<UserRecord, Error> {
        #[derive(Serialize)]
        struct Body<'a> {
            name: &'a str,
            email: &'a str,
        }

        self.post("users", &Body { name, email }).await
    }
}
