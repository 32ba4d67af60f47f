//! Remote directory client
//!
//! Reads the user set from a directory service over HTTP:
//! `GET {base_url}/users` returning a JSON array of users.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::domain::result::{Error, Result as DomainResult};
use crate::domain::User;
use crate::ports::DirectoryStore;

/// Request timeout for the users endpoint
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// HTTP directory store
#[derive(Debug)]
pub struct HttpDirectoryStore {
    client: Client,
    users_url: Url,
}

impl HttpDirectoryStore {
    /// Create a client for a directory service base URL
    pub fn new(base_url: &str) -> Result<Self> {
        let users_url = users_endpoint(base_url)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self { client, users_url })
    }

    pub fn users_url(&self) -> &Url {
        &self.users_url
    }

    /// Fetch every user from the remote directory
    pub async fn fetch_users(&self) -> Result<Vec<User>> {
        let response = self
            .client
            .get(self.users_url.clone())
            .send()
            .await
            .map_err(map_request_error)?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("Directory service error: HTTP {}", status.as_u16());
        }

        let users: Vec<User> = response
            .json()
            .await
            .context("Failed to parse directory response")?;
        Ok(users)
    }
}

/// Build the users endpoint from a base URL
///
/// Only http and https are accepted. A trailing slash on the base is
/// optional.
fn users_endpoint(base_url: &str) -> Result<Url> {
    let mut parsed = Url::parse(base_url).context("Invalid directory URL")?;

    if !matches!(parsed.scheme(), "http" | "https") {
        anyhow::bail!("Directory URL must use http or https");
    }
    if parsed.host_str().unwrap_or("").is_empty() {
        anyhow::bail!("Directory URL must include a host");
    }

    if !parsed.path().ends_with('/') {
        let path = format!("{}/", parsed.path());
        parsed.set_path(&path);
    }
    parsed.join("users").context("Invalid directory URL")
}

/// Map request errors to readable messages
fn map_request_error(error: reqwest::Error) -> anyhow::Error {
    if error.is_timeout() {
        anyhow::anyhow!(
            "Directory service timed out after {} seconds",
            REQUEST_TIMEOUT_SECS
        )
    } else if error.is_connect() {
        anyhow::anyhow!("Unable to connect to the directory service")
    } else {
        anyhow::anyhow!("Directory request failed: {}", error)
    }
}

#[async_trait]
impl DirectoryStore for HttpDirectoryStore {
    fn name(&self) -> &str {
        "http"
    }

    async fn list_users(&self) -> DomainResult<Vec<User>> {
        self.fetch_users()
            .await
            .map_err(|e| Error::remote(format!("{:#}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    #[test]
    fn test_users_endpoint_from_root() {
        let url = users_endpoint("http://127.0.0.1:1010").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:1010/users");
    }

    #[test]
    fn test_users_endpoint_keeps_base_path() {
        let url = users_endpoint("https://example.com/api").unwrap();
        assert_eq!(url.as_str(), "https://example.com/api/users");

        let url = users_endpoint("https://example.com/api/").unwrap();
        assert_eq!(url.as_str(), "https://example.com/api/users");
    }

    #[test]
    fn test_reject_other_schemes() {
        assert!(users_endpoint("ftp://example.com").is_err());
        assert!(users_endpoint("mongodb://127.0.0.1:27017/task_db").is_err());
        assert!(users_endpoint("not a url").is_err());
    }

    #[test]
    fn test_new_client() {
        let store = HttpDirectoryStore::new("http://localhost:1010").unwrap();
        assert_eq!(store.users_url().path(), "/users");
        assert_eq!(store.name(), "http");
    }

    /// Answer one request with a canned response; returns the base URL and
    /// a handle resolving to the request line that was received
    async fn serve_once(status: &str, body: &str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\
             Connection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();

            let request = String::from_utf8_lossy(&request).into_owned();
            request.lines().next().unwrap_or_default().to_string()
        });

        (base_url, handle)
    }

    #[tokio::test]
    async fn test_fetch_users() {
        let body = r#"[
            {"_id": "1", "rank": 1, "name": "John Doe", "email": "john@example.com", "friends": ["2"]},
            {"id": "2", "rank": 2, "name": "Jane Smith", "email": "jane@example.com"}
        ]"#;
        let (base_url, request) = serve_once("200 OK", body).await;

        let store = HttpDirectoryStore::new(&format!("{}/api", base_url)).unwrap();
        let users = store.list_users().await.unwrap();

        assert_eq!(request.await.unwrap(), "GET /api/users HTTP/1.1");
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].id, "1");
        assert_eq!(users[0].friends, vec!["2"]);
        assert_eq!(users[1].name, "Jane Smith");
        assert!(users[1].friends.is_empty());
    }

    #[tokio::test]
    async fn test_server_error_is_reported() {
        let (base_url, request) = serve_once("500 Internal Server Error", "{}").await;

        let store = HttpDirectoryStore::new(&base_url).unwrap();
        let err = store.list_users().await.unwrap_err();

        request.await.unwrap();
        assert!(err.to_string().contains("HTTP 500"), "{}", err);
    }

    #[tokio::test]
    async fn test_malformed_body_is_reported() {
        let (base_url, request) = serve_once("200 OK", r#"{"users": []}"#).await;

        let store = HttpDirectoryStore::new(&base_url).unwrap();
        let err = store.fetch_users().await.unwrap_err();

        request.await.unwrap();
        assert!(format!("{:#}", err).contains("Failed to parse directory response"));
    }

    #[tokio::test]
    async fn test_unreachable_service() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let store = HttpDirectoryStore::new(&base_url).unwrap();
        let err = store.list_users().await.unwrap_err();
        assert!(err.to_string().contains("Unable to connect"), "{}", err);
    }
}
