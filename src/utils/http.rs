use crate::core::error::{KeySyncError, Result};
use crate::core::traits::Transport;
use curl::easy::{Easy2, Handler, WriteError};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

pub const USER_AGENT: &str = concat!("sync-ssh-keys/", env!("CARGO_PKG_VERSION"));

/// Collector for response data
struct Collector {
    body: Vec<u8>,
    headers: Vec<(String, String)>,
}

impl Handler for Collector {
    fn write(&mut self, data: &[u8]) -> std::result::Result<usize, WriteError> {
        self.body.extend_from_slice(data);
        Ok(data.len())
    }

    fn header(&mut self, data: &[u8]) -> bool {
        let line = String::from_utf8_lossy(data);
        let line = line.trim_end();

        // A new status line starts the headers of the next response in a redirect chain
        if line.starts_with("HTTP/") {
            self.headers.clear();
        } else if let Some((name, value)) = line.split_once(':') {
            self.headers
                .push((name.trim().to_string(), value.trim().to_string()));
        }
        true
    }
}

/// HTTP client using libcurl
pub struct HttpClient {
    timeout: Duration,
}

impl HttpClient {
    pub fn new() -> Self {
        Self {
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for HttpClient {
    fn get(&self, url: &str, headers: &[(String, String)]) -> Result<HttpResponse> {
        let mut easy = Easy2::new(Collector {
            body: Vec::new(),
            headers: Vec::new(),
        });

        easy.url(url)?;
        easy.timeout(self.timeout)?;
        easy.follow_location(true)?;
        easy.max_redirections(5)?;
        easy.ssl_verify_peer(true)?;
        easy.ssl_verify_host(true)?;

        let mut list = curl::easy::List::new();
        for (key, value) in headers {
            list.append(&format!("{}: {}", key, value))?;
        }
        easy.http_headers(list)?;

        easy.perform()?;

        let response_code = easy.response_code()?;
        let collector = easy.get_mut();

        Ok(HttpResponse {
            status_code: response_code as u16,
            headers: std::mem::take(&mut collector.headers),
            body: std::mem::take(&mut collector.body),
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct HttpResponse {
    pub status_code: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status_code: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status_code,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    /// Case-insensitive header lookup
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn text(&self) -> Result<String> {
        String::from_utf8(self.body.clone())
            .map_err(|e| KeySyncError::Unknown(format!("Invalid UTF-8: {}", e)))
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(Into::into)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    pub fn is_rate_limited(&self) -> bool {
        self.status_code == 403 || self.status_code == 429
    }

    pub fn is_not_found(&self) -> bool {
        self.status_code == 404
    }
}

/// REST client bound to one provider endpoint and credential
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    base_url: String,
    headers: Vec<(String, String)>,
}

impl ApiClient {
    pub fn new(transport: Arc<dyn Transport>, base_url: impl Into<String>) -> Self {
        Self {
            transport,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            headers: vec![("User-Agent".to_string(), USER_AGENT.to_string())],
        }
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.push((name.to_string(), value.into()));
        self
    }

    /// GET `path` relative to the base URL, mapping non-2xx statuses to errors
    pub async fn get(&self, path: &str) -> Result<HttpResponse> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {}", url);

        // curl is blocking, keep it off the async workers
        let response = tokio::task::spawn_blocking({
            let transport = Arc::clone(&self.transport);
            let headers = self.headers.clone();
            let url = url.clone();
            move || transport.get(&url, &headers)
        })
        .await
        .map_err(|e| KeySyncError::Unknown(format!("Task join error: {}", e)))??;

        if response.is_success() {
            return Ok(response);
        }

        if response.is_not_found() {
            return Err(KeySyncError::NotFound(url));
        }

        if response.is_rate_limited() {
            return Err(KeySyncError::RateLimit(format!(
                "{} returned HTTP {}",
                url, response.status_code
            )));
        }

        Err(KeySyncError::Http(format!(
            "{} returned HTTP {}: {}",
            url,
            response.status_code,
            response.text().unwrap_or_default()
        )))
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.get(path).await?.json()
    }
}

/// Percent-encoding for path segments and query values
pub mod urlencoding {
    pub fn encode(s: &str) -> String {
        s.bytes()
            .map(|b| match b {
                b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                    (b as char).to_string()
                }
                _ => format!("%{:02X}", b),
            })
            .collect()
    }
}
