//! File-manager API client with request/response handling.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Response;
use serde::Deserialize;
use tracing::debug;

use super::error::HttpStatusKind;
use super::wire::{Ack, ActionRequest};
use crate::config::ClientConfig;
use crate::error::{FmError, Result};
use crate::fs::{FileEntry, UploadFile};
use crate::http::HttpClient;

const LOGIN: &str = "/api/login";
const FILES: &str = "/api/files";
const ACTION: &str = "/api/action";
const UPLOAD: &str = "/api/upload";
const DOWNLOAD: &str = "/api/download";

/// The wire contract the controller drives.
///
/// Every call takes the authorization value computed for that request, so
/// implementations never hold credentials themselves. Implementations map an
/// HTTP 401 to [`FmError::Unauthorized`] on every endpoint except `login`,
/// where any rejection is [`FmError::InvalidCredentials`].
#[async_trait]
pub trait RemoteApi: Send + Sync {
    /// `POST /api/login`: credential check only.
    async fn login(&self, auth: &str) -> Result<()>;

    /// `GET /api/files?path=`: full listing of one directory.
    async fn list(&self, auth: &str, path: &str) -> Result<Vec<FileEntry>>;

    /// `POST /api/action`: one of the four mutating verbs.
    async fn action(&self, auth: &str, request: &ActionRequest) -> Result<Ack>;

    /// `POST /api/upload`: one file into `dest_dir`.
    async fn upload(&self, auth: &str, dest_dir: &str, file: &UploadFile) -> Result<Ack>;

    /// `GET /api/download?path=`: raw bytes, or a zip archive for directories.
    async fn download(&self, auth: &str, path: &str) -> Result<Vec<u8>>;
}

/// Error body produced by the server, e.g. `{"detail": "Directory not found"}`.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<String>,
}

/// HTTP implementation of [`RemoteApi`].
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: HttpClient,
}

impl ApiClient {
    /// Create a new API client for the server at `base_url`.
    pub fn new(base_url: &str) -> Self {
        Self {
            http: HttpClient::new(base_url),
        }
    }

    /// Create a new API client with a proxy.
    ///
    /// # Arguments
    /// * `base_url` - Server root, e.g. "http://files.lan:8059"
    /// * `proxy` - Proxy URL (e.g., "http://proxy:8080" or "socks5://proxy:1080")
    pub fn with_proxy(base_url: &str, proxy: &str) -> Result<Self> {
        Ok(Self {
            http: HttpClient::with_proxy(base_url, proxy)?,
        })
    }

    /// Create an API client honouring every setting in `config`.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Ok(Self {
            http: HttpClient::from_config(config)?,
        })
    }

    /// Server root this client talks to.
    pub fn base_url(&self) -> &str {
        self.http.base_url()
    }

    /// Turn a non-success response into the matching error.
    async fn check(response: Response) -> Result<Response> {
        let status = response.status().as_u16();
        let kind = HttpStatusKind::from(status);
        if kind.is_success() {
            return Ok(response);
        }
        if kind == HttpStatusKind::Unauthorized {
            return Err(FmError::Unauthorized);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.detail)
            .unwrap_or_else(|| kind.description().to_string());
        Err(FmError::OperationFailed { status, message })
    }
}

#[async_trait]
impl RemoteApi for ApiClient {
    async fn login(&self, auth: &str) -> Result<()> {
        debug!("login request to {}", self.http.base_url());
        let response = self.http.post(LOGIN, auth).send().await?;
        let status = response.status().as_u16();
        if HttpStatusKind::from(status).is_success() {
            Ok(())
        } else {
            debug!("login rejected with status {}", status);
            Err(FmError::InvalidCredentials)
        }
    }

    async fn list(&self, auth: &str, path: &str) -> Result<Vec<FileEntry>> {
        debug!("list request path={}", path);
        let response = self
            .http
            .get(FILES, auth)
            .query(&[("path", path)])
            .send()
            .await?;
        let response = Self::check(response).await?;
        let text = response.text().await?;
        let entries: Vec<FileEntry> = serde_json::from_str(&text)?;
        debug!("list response path={} entries={}", path, entries.len());
        Ok(entries)
    }

    async fn action(&self, auth: &str, request: &ActionRequest) -> Result<Ack> {
        debug!(
            "action request a={} source={} dest={:?}",
            request.action, request.source_path, request.dest_path
        );
        let response = self.http.post(ACTION, auth).json(request).send().await?;
        let response = Self::check(response).await?;
        let text = response.text().await?;
        Ok(Ack::from_body(&text))
    }

    async fn upload(&self, auth: &str, dest_dir: &str, file: &UploadFile) -> Result<Ack> {
        debug!(
            "upload request name={} bytes={} dest={}",
            file.name,
            file.data.len(),
            dest_dir
        );
        let part = Part::bytes(file.data.clone())
            .file_name(file.name.clone())
            .mime_str("application/octet-stream")?;
        let form = Form::new().part("file", part).text("path", dest_dir.to_string());

        let response = self.http.post(UPLOAD, auth).multipart(form).send().await?;
        let response = Self::check(response).await?;
        let text = response.text().await?;
        Ok(Ack::from_body(&text))
    }

    async fn download(&self, auth: &str, path: &str) -> Result<Vec<u8>> {
        debug!("download request path={}", path);
        let response = self
            .http
            .get(DOWNLOAD, auth)
            .query(&[("path", path)])
            .send()
            .await?;
        let response = Self::check(response).await?;
        let bytes = response.bytes().await?;
        debug!("download response path={} bytes={}", path, bytes.len());
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Action;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::task::JoinHandle;

    // admin:secret
    const AUTH: &str = "Basic YWRtaW46c2VjcmV0";

    /// Serve one HTTP exchange on a local port. The handle resolves to the
    /// raw request text.
    async fn respond_once(status: u16, body: &'static str) -> (ApiClient, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;
            let response = format!(
                "HTTP/1.1 {} Test\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
            request
        });
        (ApiClient::new(&url), handle)
    }

    async fn read_request(socket: &mut TcpStream) -> String {
        let mut raw = Vec::new();
        let mut chunk = [0u8; 4096];
        while !request_complete(&raw) {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            raw.extend_from_slice(&chunk[..n]);
        }
        String::from_utf8_lossy(&raw).into_owned()
    }

    fn request_complete(raw: &[u8]) -> bool {
        let Some(end) = raw.windows(4).position(|w| w == b"\r\n\r\n") else {
            return false;
        };
        let head = String::from_utf8_lossy(&raw[..end]).to_ascii_lowercase();
        let body = &raw[end + 4..];
        let length = head
            .lines()
            .find_map(|line| line.strip_prefix("content-length:"))
            .and_then(|value| value.trim().parse::<usize>().ok());
        match length {
            Some(length) => body.len() >= length,
            None if head.contains("transfer-encoding: chunked") => body.ends_with(b"0\r\n\r\n"),
            None => true,
        }
    }

    fn request_line(request: &str) -> &str {
        request.lines().next().unwrap_or_default()
    }

    fn head(request: &str) -> String {
        let (head, _) = request.split_once("\r\n\r\n").unwrap_or((request, ""));
        head.to_ascii_lowercase()
    }

    fn body(request: &str) -> &str {
        request.split_once("\r\n\r\n").map(|(_, b)| b).unwrap_or_default()
    }

    #[tokio::test]
    async fn test_list_sends_path_and_authorization() {
        let (client, server) = respond_once(
            200,
            r#"[{"name":"a.txt","path":"/docs/a.txt","is_dir":false,"size":3}]"#,
        )
        .await;

        let entries = client.list(AUTH, "/docs").await.unwrap();
        let request = server.await.unwrap();

        assert_eq!(request_line(&request), "GET /api/files?path=%2Fdocs HTTP/1.1");
        assert!(head(&request).contains("authorization: basic ywrtaw46c2vjcmv0"));
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].path, "/docs/a.txt");
        assert_eq!(entries[0].size, 3);
    }

    #[tokio::test]
    async fn test_list_unauthorized() {
        let (client, server) = respond_once(401, r#"{"detail":"Invalid credentials"}"#).await;

        let err = client.list(AUTH, "/").await.unwrap_err();
        server.await.unwrap();

        assert!(matches!(err, FmError::Unauthorized));
    }

    #[tokio::test]
    async fn test_error_detail_becomes_operation_failed() {
        let (client, server) = respond_once(404, r#"{"detail":"Directory not found"}"#).await;
        let err = client.list(AUTH, "/missing").await.unwrap_err();
        server.await.unwrap();
        match err {
            FmError::OperationFailed { status, message } => {
                assert_eq!(status, 404);
                assert_eq!(message, "Directory not found");
            }
            other => panic!("unexpected error: {:?}", other),
        }

        // Without a detail the status description is used.
        let (client, server) = respond_once(500, "oops").await;
        let err = client.download(AUTH, "/a.txt").await.unwrap_err();
        server.await.unwrap();
        match err {
            FmError::OperationFailed { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "Server error");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_login() {
        let (client, server) = respond_once(200, r#"{"status":"ok"}"#).await;
        client.login(AUTH).await.unwrap();
        let request = server.await.unwrap();
        assert_eq!(request_line(&request), "POST /api/login HTTP/1.1");
        assert!(head(&request).contains("authorization: basic ywrtaw46c2vjcmv0"));

        for status in [401, 403, 500] {
            let (client, server) = respond_once(status, r#"{"detail":"Invalid credentials"}"#).await;
            let err = client.login(AUTH).await.unwrap_err();
            server.await.unwrap();
            assert!(matches!(err, FmError::InvalidCredentials), "status {}", status);
        }
    }

    #[tokio::test]
    async fn test_action_posts_json_body() {
        let (client, server) = respond_once(200, r#"{"status":"copied"}"#).await;

        let request = ActionRequest::transfer(Action::Copy, "/a.txt", "/docs");
        let ack = client.action(AUTH, &request).await.unwrap();
        let raw = server.await.unwrap();

        assert_eq!(request_line(&raw), "POST /api/action HTTP/1.1");
        assert!(head(&raw).contains("content-type: application/json"));
        let sent: serde_json::Value = serde_json::from_str(body(&raw)).unwrap();
        assert_eq!(
            sent,
            serde_json::json!({"action": "copy", "source_path": "/a.txt", "dest_path": "/docs"})
        );
        assert_eq!(ack.status.as_deref(), Some("copied"));
    }

    #[tokio::test]
    async fn test_upload_sends_multipart_fields() {
        let (client, server) = respond_once(200, r#"{"info":"saved"}"#).await;

        let file = UploadFile::new("notes.txt", "hello upload");
        let ack = client.upload(AUTH, "/docs", &file).await.unwrap();
        let raw = server.await.unwrap();

        assert_eq!(request_line(&raw), "POST /api/upload HTTP/1.1");
        assert!(head(&raw).contains("content-type: multipart/form-data; boundary="));
        let sent = body(&raw);
        assert!(sent.contains(r#"name="file"; filename="notes.txt""#));
        assert!(sent.contains("hello upload"));
        assert!(sent.contains("name=\"path\"\r\n\r\n/docs\r\n"));
        assert_eq!(ack.info.as_deref(), Some("saved"));
    }

    #[tokio::test]
    async fn test_download_returns_bytes() {
        let (client, server) = respond_once(200, "PK-archive").await;

        let bytes = client.download(AUTH, "/docs/reports").await.unwrap();
        let request = server.await.unwrap();

        assert_eq!(
            request_line(&request),
            "GET /api/download?path=%2Fdocs%2Freports HTTP/1.1"
        );
        assert_eq!(bytes, b"PK-archive");
    }

    #[test]
    fn test_client_creation() {
        let client = ApiClient::new("http://localhost:8059/");
        assert_eq!(client.base_url(), "http://localhost:8059");
    }

    #[test]
    fn test_proxy_creation() {
        let client = ApiClient::with_proxy("http://localhost:8059", "http://127.0.0.1:8080");
        assert!(client.is_ok());
    }

    #[test]
    fn test_error_body_detail() {
        let body: ErrorBody = serde_json::from_str(r#"{"detail":"Access denied"}"#).unwrap();
        assert_eq!(body.detail.as_deref(), Some("Access denied"));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_network_error() {
        // Port 9 (discard) on localhost is closed on test machines.
        let client = ApiClient::new("http://127.0.0.1:9");
        let err = client.list("Basic Og==", "/").await.unwrap_err();
        assert!(matches!(err, FmError::Network(_)));
    }
}
