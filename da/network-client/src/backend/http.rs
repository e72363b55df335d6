// crates
use da_core::NetworkLocator;
use reqwest::{Client, ClientBuilder, RequestBuilder, Response, StatusCode, Url};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::trace;
// internal
use super::{BackendError, BlobStatus, DaNetworkBackend, RequestId};

pub const DISPERSE_BLOB: &str = "/disperser/blobs";
pub const BLOB_STATUS: &str = "/disperser/blobs/status";
pub const RETRIEVE_BLOB: &str = "/retriever/blob";

/// Room for JSON framing and locator fields on top of the blob itself.
const RESPONSE_OVERHEAD: usize = 16 * 1024;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicAuthCredentials {
    pub username: String,
    pub password: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpBackendSettings {
    pub address: Url,
    #[serde(default)]
    pub basic_auth: Option<BasicAuthCredentials>,
}

#[derive(Serialize, Deserialize)]
pub struct DisperseBlobRequest {
    pub data: Vec<u8>,
}

#[derive(Serialize, Deserialize)]
pub struct DisperseBlobResponse {
    pub request_id: RequestId,
}

#[derive(Serialize, Deserialize)]
pub struct BlobStatusRequest {
    pub request_id: RequestId,
}

#[derive(Serialize, Deserialize)]
pub struct BlobStatusResponse {
    pub status: BlobStatus,
}

#[derive(Serialize, Deserialize)]
pub struct RetrieveBlobRequest {
    pub locator: NetworkLocator,
}

#[derive(Serialize, Deserialize)]
pub struct RetrieveBlobResponse {
    pub data: Vec<u8>,
}

/// Largest response body accepted when blobs are at most `max_blob_size` bytes. Blob bytes are
/// JSON numbers, so each takes up to four characters (`255,`).
#[must_use]
pub const fn response_size_limit(max_blob_size: usize) -> usize {
    max_blob_size
        .saturating_mul(4)
        .saturating_add(RESPONSE_OVERHEAD)
}

/// JSON over HTTP transport towards a disperser and a retriever sharing one address.
#[derive(Clone)]
pub struct HttpNetworkBackend {
    client: Client,
    settings: HttpBackendSettings,
    max_response_size: usize,
}

impl HttpNetworkBackend {
    /// Responses larger than what a `max_blob_size` blob needs are refused while reading.
    pub fn new(settings: HttpBackendSettings, max_blob_size: usize) -> Result<Self, BackendError> {
        let client = ClientBuilder::new()
            .build()
            .map_err(|e| BackendError::InvalidResponse(format!("Failed to build client: {e}")))?;
        Ok(Self {
            client,
            settings,
            max_response_size: response_size_limit(max_blob_size),
        })
    }

    fn url(&self, path: &str) -> Result<Url, BackendError> {
        self.settings
            .address
            .join(path.trim_start_matches('/'))
            .map_err(|e| BackendError::Rejected(format!("Invalid url: {e}")))
    }

    async fn post<Req, Res>(&self, path: &str, body: &Req) -> Result<Res, BackendError>
    where
        Req: Serialize + ?Sized + Send + Sync,
        Res: DeserializeOwned + Send + Sync,
    {
        let request = self.client.post(self.url(path)?).json(body);
        self.execute_request(request).await
    }

    async fn get<Req, Res>(&self, path: &str, body: &Req) -> Result<Res, BackendError>
    where
        Req: Serialize + ?Sized + Send + Sync,
        Res: DeserializeOwned + Send + Sync,
    {
        let request = self.client.get(self.url(path)?).json(body);
        self.execute_request(request).await
    }

    async fn execute_request<Res: DeserializeOwned>(
        &self,
        mut request: RequestBuilder,
    ) -> Result<Res, BackendError> {
        if let Some(basic_auth) = &self.settings.basic_auth {
            request = request.basic_auth(&basic_auth.username, basic_auth.password.as_deref());
        }

        let response = request
            .send()
            .await
            .map_err(|e| BackendError::Transient(e.to_string()))?;
        let status = response.status();
        let body = read_body(response, self.max_response_size).await?;
        trace!(%status, len = body.len(), "DA network response");

        classify_response(status, body).and_then(|body| {
            serde_json::from_slice(&body)
                .map_err(|e| BackendError::InvalidResponse(format!("Failed to parse response: {e}")))
        })
    }
}

/// Reads the body chunk by chunk, giving up as soon as it grows past `limit`.
async fn read_body(mut response: Response, limit: usize) -> Result<Vec<u8>, BackendError> {
    let too_large = |size: u64| {
        BackendError::InvalidResponse(format!(
            "Response of {size} bytes exceeds the limit of {limit} bytes"
        ))
    };
    if let Some(length) = response.content_length() {
        if length > limit as u64 {
            return Err(too_large(length));
        }
    }
    let mut body = Vec::new();
    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| BackendError::Transient(e.to_string()))?
    {
        let size = body.len() + chunk.len();
        if size > limit {
            return Err(too_large(size as u64));
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body)
}

/// Maps an HTTP status onto the retry classes of [`BackendError`].
fn classify_response(status: StatusCode, body: Vec<u8>) -> Result<Vec<u8>, BackendError> {
    if status.is_success() {
        return Ok(body);
    }
    let body = String::from_utf8_lossy(&body);
    match status {
        // an expired blob is as gone as one that never existed
        StatusCode::NOT_FOUND | StatusCode::GONE => Err(BackendError::NotFound),
        StatusCode::REQUEST_TIMEOUT | StatusCode::TOO_MANY_REQUESTS => {
            Err(BackendError::Transient(format!("[{status}]: {body}")))
        }
        _ if status.is_server_error() => Err(BackendError::Transient(format!("[{status}]: {body}"))),
        _ if status.is_client_error() => Err(BackendError::Rejected(format!("[{status}]: {body}"))),
        _ => Err(BackendError::InvalidResponse(format!(
            "Unexpected response [{status}]: {body}"
        ))),
    }
}

#[async_trait::async_trait]
impl DaNetworkBackend for HttpNetworkBackend {
    async fn disperse_blob(&self, blob: &[u8]) -> Result<RequestId, BackendError> {
        let request = DisperseBlobRequest {
            data: blob.to_vec(),
        };
        let response: DisperseBlobResponse = self.post(DISPERSE_BLOB, &request).await?;
        Ok(response.request_id)
    }

    async fn blob_status(&self, request_id: &RequestId) -> Result<BlobStatus, BackendError> {
        let request = BlobStatusRequest {
            request_id: request_id.clone(),
        };
        let response: BlobStatusResponse = self.get(BLOB_STATUS, &request).await?;
        Ok(response.status)
    }

    async fn retrieve_blob(&self, locator: &NetworkLocator) -> Result<Vec<u8>, BackendError> {
        let request = RetrieveBlobRequest {
            locator: locator.clone(),
        };
        let response: RetrieveBlobResponse = self.get(RETRIEVE_BLOB, &request).await?;
        Ok(response.data)
    }
}

#[cfg(test)]
mod test {
    use tokio::io::{AsyncReadExt as _, AsyncWriteExt as _};
    use tokio::net::TcpListener;

    use super::*;

    fn classify(status: u16) -> Result<Vec<u8>, BackendError> {
        classify_response(StatusCode::from_u16(status).unwrap(), b"body".to_vec())
    }

    fn locator() -> NetworkLocator {
        NetworkLocator {
            batch_header_hash: [0; 32],
            blob_index: 0,
            reference_block_number: 0,
            quorum_numbers: vec![0],
        }
    }

    fn request_complete(request: &[u8]) -> bool {
        let Some(end) = request.windows(4).position(|w| w == b"\r\n\r\n") else {
            return false;
        };
        let headers = String::from_utf8_lossy(&request[..end]).to_ascii_lowercase();
        let length = headers
            .lines()
            .find_map(|line| line.strip_prefix("content-length:"))
            .and_then(|value| value.trim().parse::<usize>().ok())
            .unwrap_or(0);
        request.len() >= end + 4 + length
    }

    /// Answers a single request with the raw `response` bytes.
    async fn serve_once(response: Vec<u8>) -> Url {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buffer = [0u8; 1024];
            while !request_complete(&request) {
                match socket.read(&mut buffer).await {
                    Ok(0) | Err(_) => break,
                    Ok(read) => request.extend_from_slice(&buffer[..read]),
                }
            }
            // the client hangs up early on oversized responses
            let _ = socket.write_all(&response).await;
            let _ = socket.shutdown().await;
        });
        format!("http://{address}/").parse().unwrap()
    }

    fn backend(address: Url, max_blob_size: usize) -> HttpNetworkBackend {
        HttpNetworkBackend::new(
            HttpBackendSettings {
                address,
                basic_auth: None,
            },
            max_blob_size,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn retrieve_within_limit() {
        let body = br#"{"data":[1,2,3]}"#;
        let mut response =
            format!("HTTP/1.1 200 OK\r\nContent-Length: {}\r\n\r\n", body.len()).into_bytes();
        response.extend_from_slice(body);
        let backend = backend(serve_once(response).await, 16);
        assert_eq!(backend.retrieve_blob(&locator()).await.unwrap(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn oversized_content_length_is_refused() {
        let response = b"HTTP/1.1 200 OK\r\nContent-Length: 1000000000\r\n\r\n".to_vec();
        let backend = backend(serve_once(response).await, 16);
        assert!(matches!(
            backend.retrieve_blob(&locator()).await,
            Err(BackendError::InvalidResponse(_))
        ));
    }

    #[tokio::test]
    async fn oversized_streamed_body_is_refused() {
        let limit = response_size_limit(16);
        let chunk = vec![b' '; 4096];
        let mut response = b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n".to_vec();
        for _ in 0..limit / chunk.len() + 2 {
            response.extend_from_slice(format!("{:x}\r\n", chunk.len()).as_bytes());
            response.extend_from_slice(&chunk);
            response.extend_from_slice(b"\r\n");
        }
        response.extend_from_slice(b"0\r\n\r\n");
        let backend = backend(serve_once(response).await, 16);
        assert!(matches!(
            backend.retrieve_blob(&locator()).await,
            Err(BackendError::InvalidResponse(_))
        ));
    }

    #[tokio::test]
    async fn expired_blob_is_not_found() {
        let response = b"HTTP/1.1 410 Gone\r\nContent-Length: 7\r\n\r\nexpired".to_vec();
        let backend = backend(serve_once(response).await, 16);
        assert!(matches!(
            backend.retrieve_blob(&locator()).await,
            Err(BackendError::NotFound)
        ));
    }

    #[test]
    fn response_limit_fits_a_max_size_blob() {
        let blob = vec![255u8; 1000];
        let body = serde_json::to_vec(&RetrieveBlobResponse { data: blob }).unwrap();
        assert!(body.len() <= response_size_limit(1000));
        assert_eq!(response_size_limit(usize::MAX), usize::MAX);
    }

    #[test]
    fn status_classification() {
        assert_eq!(classify(200).unwrap(), b"body");
        assert!(matches!(classify(404), Err(BackendError::NotFound)));
        assert!(matches!(classify(410), Err(BackendError::NotFound)));
        for status in [408, 429, 500, 502, 503] {
            assert!(
                matches!(classify(status), Err(BackendError::Transient(_))),
                "{status}"
            );
        }
        for status in [400, 401, 403, 413] {
            assert!(
                matches!(classify(status), Err(BackendError::Rejected(_))),
                "{status}"
            );
        }
        assert!(matches!(
            classify(302),
            Err(BackendError::InvalidResponse(_))
        ));
    }

    #[test]
    fn urls_are_joined_on_the_base_address() {
        let backend = backend("http://localhost:8080/".parse().unwrap(), 1024);
        assert_eq!(
            backend.url(BLOB_STATUS).unwrap().as_str(),
            "http://localhost:8080/disperser/blobs/status"
        );
    }

    #[test]
    fn status_wire_format() {
        let response: BlobStatusResponse =
            serde_json::from_str(r#"{"status":"Processing"}"#).unwrap();
        assert_eq!(response.status, BlobStatus::Processing);
        let response: BlobStatusResponse =
            serde_json::from_str(r#"{"status":{"Failed":"quorum not met"}}"#).unwrap();
        assert_eq!(response.status, BlobStatus::Failed("quorum not met".into()));
    }
}
