//! HTTP inference backend.
//!
//! Uploads the CSV as `multipart/form-data` to `<base>/infer` and decodes the JSON answer. The
//! blocking HTTP exchange runs on tokio's blocking pool so the event loop keeps servicing the
//! view while a request is in flight.

use std::time::Duration;

use rand::distributions::Alphanumeric;
use rand::Rng;
use url::Url;

use crate::error::{PoseError, Result};
use crate::infer::backend::{InferenceBackend, PredictionFuture};
use crate::infer::backends::SyntheticBackend;
use crate::infer::wire;
use crate::pose::PredictionResult;
use crate::upload::Upload;

const INFER_PATH: &str = "infer";
const FILE_FIELD: &str = "file";
const MODEL_PATH_HEADER: &str = "Model-Path";

/// Configuration for the remote backend.
#[derive(Clone, Debug)]
pub struct RemoteConfig {
    /// Base address of the inference service, e.g. `http://localhost:5000`.
    pub base_url: String,
    pub timeout: Duration,
    /// Forwarded as the `Model-Path` header when set.
    pub model_path: Option<String>,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            timeout: Duration::from_secs(30),
            model_path: None,
        }
    }
}

impl RemoteConfig {
    /// Resolves the `/infer` endpoint, rejecting non-http(s) addresses.
    pub fn endpoint(&self) -> Result<Url> {
        let mut base = Url::parse(&self.base_url)
            .map_err(|e| PoseError::Config(format!("invalid backend url {}: {e}", self.base_url)))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(PoseError::Config(format!(
                "unsupported backend scheme '{}'; expected http(s)",
                base.scheme()
            )));
        }
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        base.join(INFER_PATH)
            .map_err(|e| PoseError::Config(format!("invalid backend url {}: {e}", self.base_url)))
    }
}

pub struct RemoteBackend {
    endpoint: Url,
    agent: ureq::Agent,
    model_path: Option<String>,
    demo: SyntheticBackend,
}

impl RemoteBackend {
    /// `demo` answers `sample()` requests, which never need the network.
    pub fn new(config: RemoteConfig, demo: SyntheticBackend) -> Result<Self> {
        let endpoint = config.endpoint()?;
        let agent = ureq::AgentBuilder::new().timeout(config.timeout).build();
        Ok(Self {
            endpoint,
            agent,
            model_path: config.model_path,
            demo,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl InferenceBackend for RemoteBackend {
    fn name(&self) -> &'static str {
        "remote"
    }

    fn predict<'a>(&'a self, upload: &'a Upload) -> PredictionFuture<'a> {
        let request = InferRequest {
            agent: self.agent.clone(),
            endpoint: self.endpoint.clone(),
            model_path: self.model_path.clone(),
            file_name: upload.name().to_string(),
            bytes: upload.bytes().to_vec(),
        };
        Box::pin(async move {
            log::info!("POST {} ({})", request.endpoint, request.file_name);
            tokio::task::spawn_blocking(move || request.send())
                .await
                .map_err(|e| PoseError::Transport(format!("inference task failed: {e}")))?
        })
    }

    fn sample(&self) -> PredictionFuture<'_> {
        self.demo.sample()
    }
}

/// Owned request state moved onto the blocking pool.
struct InferRequest {
    agent: ureq::Agent,
    endpoint: Url,
    model_path: Option<String>,
    file_name: String,
    bytes: Vec<u8>,
}

impl InferRequest {
    fn send(self) -> Result<PredictionResult> {
        let boundary = multipart_boundary();
        let body = multipart_body(&boundary, FILE_FIELD, &self.file_name, &self.bytes);

        let mut request = self.agent.post(self.endpoint.as_str()).set(
            "Content-Type",
            &format!("multipart/form-data; boundary={boundary}"),
        );
        if let Some(model_path) = &self.model_path {
            request = request.set(MODEL_PATH_HEADER, model_path);
        }

        let response = match request.send_bytes(&body) {
            Ok(response) => response,
            Err(ureq::Error::Status(code, response)) => {
                let body = response.into_string().unwrap_or_default();
                let detail = wire::decode_error(&body).unwrap_or_else(|| format!("HTTP {code}"));
                log::warn!("inference backend answered {code}: {detail}");
                return Err(PoseError::Transport(format!("API error: {code} ({detail})")));
            }
            Err(ureq::Error::Transport(err)) => {
                return Err(PoseError::Transport(err.to_string()));
            }
        };

        log::debug!("inference backend answered {}", response.status());
        let body = response
            .into_string()
            .map_err(|e| PoseError::Transport(format!("failed to read response: {e}")))?;
        wire::decode(&body)
    }
}

fn multipart_boundary() -> String {
    let token: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(24)
        .map(char::from)
        .collect();
    format!("----pose-guardian-{token}")
}

fn multipart_body(boundary: &str, field: &str, file_name: &str, bytes: &[u8]) -> Vec<u8> {
    let file_name = file_name.replace('"', "'");
    let mut body = Vec::with_capacity(bytes.len() + 256);
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n")
            .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: text/csv\r\n\r\n");
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    body
}
