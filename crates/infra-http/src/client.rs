//! yarGen HTTP transport

use crate::error::{bad_status, decode, network, HttpTransportError};
use crate::types::{GenerateBody, JobStatusResponse, UploadResponse};
use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::{Client, Response};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::fs::File;
use std::time::Duration;
use tracing::debug;
use yargen_core::domain::{Artifact, GenerationRequest, Job};
use yargen_core::port::{SubmissionTransport, TransportError, UploadReceipt};

/// Default TCP connect timeout (10s)
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default per-request timeout (60s)
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Slowest link an upload is expected to survive (64 KiB/s)
pub const MIN_UPLOAD_BYTES_PER_SEC: u64 = 64 * 1024;

/// Request timeout for an upload of `len` bytes: the base timeout plus the
/// time the body needs at `MIN_UPLOAD_BYTES_PER_SEC`
pub fn upload_timeout(base: Duration, len: u64) -> Duration {
    base.saturating_add(Duration::from_secs(len / MIN_UPLOAD_BYTES_PER_SEC))
}

#[derive(Debug, Clone)]
pub struct HttpTransportConfig {
    /// Server base URL, e.g. `http://127.0.0.1:8080`
    pub base_url: String,
    pub connect_timeout: Option<Duration>,
    /// `None` lets a request block until the peer answers
    pub request_timeout: Option<Duration>,
}

impl HttpTransportConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            connect_timeout: Some(DEFAULT_CONNECT_TIMEOUT),
            request_timeout: Some(DEFAULT_REQUEST_TIMEOUT),
        }
    }
}

/// Blocking client for the yarGen service API
///
/// # Example
///
/// ```no_run
/// use yargen_infra_http::{HttpTransport, HttpTransportConfig};
/// use yargen_core::port::SubmissionTransport;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let transport = HttpTransport::new(HttpTransportConfig::new("http://127.0.0.1:8080"))?;
/// transport.health_check()?;
/// # Ok(())
/// # }
/// ```
pub struct HttpTransport {
    client: Client,
    base_url: String,
    request_timeout: Option<Duration>,
}

impl HttpTransport {
    pub fn new(config: HttpTransportConfig) -> Result<Self, HttpTransportError> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        reqwest::Url::parse(&base_url)
            .map_err(|e| HttpTransportError::InvalidUrl(format!("{}: {}", config.base_url, e)))?;

        let client = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;

        Ok(Self {
            client,
            base_url,
            request_timeout: config.request_timeout,
        })
    }

    /// Reuse an existing client (connection pool, custom TLS).
    /// Its own timeouts apply to every request, uploads included.
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            request_timeout: None,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Only 200 is success for the endpoints that must accept the request
    fn ensure_ok(response: Response) -> Result<Response, TransportError> {
        let status = response.status();
        if status == StatusCode::OK {
            Ok(response)
        } else {
            Err(bad_status(status))
        }
    }

    fn ensure_success(response: Response) -> Result<Response, TransportError> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(bad_status(status))
        }
    }

    /// Read the whole body, then decode it so malformed JSON is a
    /// `Decode` error rather than a network one
    fn parse_json<T: DeserializeOwned>(response: Response) -> Result<T, TransportError> {
        let body = response.bytes().map_err(network)?;
        serde_json::from_slice(&body).map_err(decode)
    }
}

impl SubmissionTransport for HttpTransport {
    fn health_check(&self) -> Result<(), TransportError> {
        let url = self.url("/api/health");
        let response = self.client.get(&url).send().map_err(network)?;
        debug!(url = %url, status = %response.status(), "Health check answered");
        Ok(())
    }

    fn upload(&self, file_name: &str, file: File) -> Result<UploadReceipt, TransportError> {
        let url = self.url("/api/upload");

        let len = file.metadata().ok().map(|meta| meta.len());
        let part = match len {
            Some(len) => Part::reader_with_length(file, len),
            None => Part::reader(file),
        }
        .file_name(file_name.to_string())
        .mime_str("application/octet-stream")
        .map_err(network)?;
        let form = Form::new().part("file", part);

        let mut request = self.client.post(&url).multipart(form);
        if let (Some(base), Some(len)) = (self.request_timeout, len) {
            request = request.timeout(upload_timeout(base, len));
        }

        debug!(url = %url, file_name = %file_name, bytes = ?len, "Uploading sample");
        let response = request.send().map_err(network)?;
        let response = Self::ensure_ok(response)?;

        let body: UploadResponse = Self::parse_json(response)?;
        Ok(UploadReceipt { id: body.id })
    }

    fn start_generation(&self, request: &GenerationRequest) -> Result<(), TransportError> {
        let url = self.url("/api/generate");
        let body = GenerateBody::from(request);

        debug!(url = %url, job_id = %request.job_id, "Starting generation");
        let response = self.client.post(&url).json(&body).send().map_err(network)?;
        Self::ensure_ok(response)?;
        Ok(())
    }

    fn job_status(&self, job_id: &str) -> Result<Job, TransportError> {
        let url = self.url(&format!("/api/jobs/{}", job_id));
        let response = self.client.get(&url).send().map_err(network)?;
        let response = Self::ensure_success(response)?;

        let body: JobStatusResponse = Self::parse_json(response)?;
        Ok(body.into_job(job_id))
    }

    fn fetch_artifact(&self, job_id: &str) -> Result<Artifact, TransportError> {
        let url = self.url(&format!("/api/rules/{}", job_id));
        let response = self.client.get(&url).send().map_err(network)?;
        let response = Self::ensure_success(response)?;

        let bytes = response.bytes().map_err(network)?;
        debug!(url = %url, bytes = bytes.len(), "Rules downloaded");
        Ok(Artifact::new(bytes.to_vec()))
    }
}
