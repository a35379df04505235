mod basic;
mod client;

pub use basic::BasicClient;
pub use client::HttpClient;

use bytes::Bytes;
use tracing::debug;

use crate::error::FetchError;

/// Performs a single GET against `url` and returns the whole response body.
///
/// Non-2xx responses are treated as failures; nothing is retried.
pub async fn fetch_bytes<C: HttpClient>(client: &C, url: &str) -> Result<Bytes, FetchError> {
    let parsed = url.parse().map_err(|source| FetchError::InvalidUrl {
        url: url.to_string(),
        source,
    })?;
    let req = reqwest::Request::new(reqwest::Method::GET, parsed);

    let resp = client
        .execute(req)
        .await
        .map_err(|e| FetchError::from_send(url, e))?;

    let status = resp.status();
    debug!(%status, "Response headers received");
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status,
        });
    }

    resp.bytes().await.map_err(|e| FetchError::from_body(url, e))
}

/// True when `source` parses as an absolute `http` or `https` URL.
pub fn is_http_url(source: &str) -> bool {
    url::Url::parse(source)
        .map(|u| matches!(u.scheme(), "http" | "https"))
        .unwrap_or(false)
}

/// Loads the dataset from an `http(s)` URL, or from disk for any other source.
#[tracing::instrument(skip(client))]
pub async fn fetch_source<C: HttpClient>(client: &C, source: &str) -> Result<Bytes, FetchError> {
    let bytes = if is_http_url(source) {
        fetch_bytes(client, source).await?
    } else {
        let data = tokio::fs::read(source)
            .await
            .map_err(|e| FetchError::File {
                path: source.to_string(),
                source: e,
            })?;
        Bytes::from(data)
    };
    debug!(bytes = bytes.len(), "Source loaded");
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Router;
    use axum::http::StatusCode;
    use axum::routing::get;
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    async fn spawn_server(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn client() -> BasicClient {
        BasicClient::with_timeout(Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_returns_body() {
        let app = Router::new().route("/data.json", get(|| async { "[]" }));
        let base = spawn_server(app).await;

        let bytes = fetch_bytes(&client(), &format!("{base}/data.json"))
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"[]");
    }

    #[tokio::test]
    async fn test_fetch_non_success_status() {
        let app = Router::new().route(
            "/data.json",
            get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "down") }),
        );
        let base = spawn_server(app).await;

        let err = fetch_bytes(&client(), &format!("{base}/data.json"))
            .await
            .unwrap_err();
        match err {
            FetchError::Status { status, .. } => {
                assert_eq!(status, reqwest::StatusCode::SERVICE_UNAVAILABLE)
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_connection_refused() {
        // Grab a free port, then release it so nothing is listening.
        let addr = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap();

        let err = fetch_bytes(&client(), &format!("http://{addr}/data.json"))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Network { .. }), "got {err}");
    }

    #[tokio::test]
    async fn test_fetch_times_out() {
        let app = Router::new().route(
            "/slow.json",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                "[]"
            }),
        );
        let base = spawn_server(app).await;
        let client = BasicClient::with_timeout(Duration::from_millis(200)).unwrap();

        let err = fetch_bytes(&client, &format!("{base}/slow.json"))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Timeout { .. }), "got {err}");
    }

    #[tokio::test]
    async fn test_fetch_truncated_body() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 1024];
            let _ = socket.read(&mut buf).await;
            socket
                .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 100\r\n\r\n[{")
                .await
                .unwrap();
            socket.shutdown().await.unwrap();
        });

        let err = fetch_bytes(&client(), &format!("http://{addr}/data.json"))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Io { .. }), "got {err}");
    }

    #[tokio::test]
    async fn test_fetch_invalid_url() {
        let err = fetch_bytes(&client(), "http://").await.unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl { .. }));
    }

    #[tokio::test]
    async fn test_fetch_source_reads_local_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, b"[{}]").unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let bytes = fetch_source(&client(), &path).await.unwrap();
        assert_eq!(&bytes[..], b"[{}]");
    }

    #[test]
    fn test_is_http_url() {
        assert!(is_http_url("http://localhost/data.json"));
        assert!(is_http_url("HTTPS://od.cdc.gov.tw/eic/x.json"));
        assert!(!is_http_url("httpdump.json"));
        assert!(!is_http_url("/tmp/http/data.json"));
        assert!(!is_http_url("ftp://example.com/data.json"));
    }

    #[tokio::test]
    async fn test_fetch_source_reads_file_named_like_scheme() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("httpdump.json");
        std::fs::write(&path, b"[]").unwrap();

        let bytes = fetch_source(&client(), path.to_str().unwrap()).await.unwrap();
        assert_eq!(&bytes[..], b"[]");
    }

    #[tokio::test]
    async fn test_fetch_source_missing_file() {
        let err = fetch_source(&client(), "/nonexistent/weekly.json")
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::File { .. }));
    }
}
