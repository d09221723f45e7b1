//! Remote tool server adapter
//!
//! Speaks JSON over HTTP: `POST {base}/scan` and `POST {base}/bruteforce`,
//! both with a `{"target": "..."}` body.

use super::{BackendError, BruteforceReport, ScanBackend, ScanReport};
use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Serialize)]
struct TargetRequest<'a> {
    target: &'a str,
}

/// Backend that forwards to a remote tool server
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout_secs: u64) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs.max(1)))
            .build()
            .context("Failed to build HTTP client for scan backend")?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn post<T: DeserializeOwned>(&self, path: &str, target: &str) -> Result<T, BackendError> {
        let url = format!("{}/{}", self.base_url, path);
        debug!(%url, target, "Calling scan backend");

        let response = self
            .client
            .post(&url)
            .json(&TargetRequest { target })
            .send()
            .await
            .map_err(|e| BackendError::Unreachable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Status { status: status.as_u16(), body });
        }

        let body = response
            .text()
            .await
            .map_err(|e| BackendError::Unreachable(e.to_string()))?;
        serde_json::from_str::<T>(&body).map_err(|e| {
            let snippet: String = body.chars().take(80).collect();
            BackendError::Decode(format!("{} (body: {})", e, snippet))
        })
    }
}

#[async_trait]
impl ScanBackend for HttpBackend {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn scan(&self, target: &str) -> Result<ScanReport, BackendError> {
        self.post("scan", target).await
    }

    async fn bruteforce(&self, target: &str) -> Result<BruteforceReport, BackendError> {
        self.post("bruteforce", target).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve exactly one canned HTTP response, return the base url
    async fn serve_once(status_line: &'static str, body: String) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 8192];
            let _ = socket.read(&mut buf).await;
            let response = format!(
                "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn decodes_scan_report() {
        let body = serde_json::json!({
            "ports": [22, 80],
            "services": ["ssh", "http"],
            "vulnerabilities": ["weak_password"],
            "os": "Ubuntu 20.04 LTS",
            "detection_delta": 10,
            "experience_delta": 50
        })
        .to_string();
        let url = serve_once("200 OK", body).await;

        let backend = HttpBackend::new(&url, 5).unwrap();
        let report = backend.scan("192.168.1.100").await.unwrap();
        assert_eq!(report.ports, vec![22, 80]);
        assert_eq!(report.experience_delta, 50);
    }

    #[tokio::test]
    async fn non_success_status_is_reported() {
        let url = serve_once("500 Internal Server Error", "{\"detail\":\"boom\"}".to_string()).await;

        let backend = HttpBackend::new(&url, 5).unwrap();
        let err = backend.bruteforce("192.168.1.100").await.unwrap_err();
        match err {
            BackendError::Status { status, body } => {
                assert_eq!(status, 500);
                assert!(body.contains("boom"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn malformed_body_is_a_decode_error() {
        let url = serve_once("200 OK", "{\"ports\": \"all of them\"}".to_string()).await;

        let backend = HttpBackend::new(&url, 5).unwrap();
        let err = backend.scan("192.168.1.100").await.unwrap_err();
        match err {
            BackendError::Decode(reason) => assert!(reason.contains("all of them")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn refused_connection_is_unreachable() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let backend = HttpBackend::new(&format!("http://{}", addr), 2).unwrap();
        let err = backend.scan("192.168.1.100").await.unwrap_err();
        assert!(matches!(err, BackendError::Unreachable(_)));
    }
}
