use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::str::FromStr;

use crate::error::{PoseError, Result};
use crate::pose::PredictionResult;
use crate::upload::Upload;

/// Future returned by backend calls. Backends run on the single-threaded event loop, so the
/// future does not need to be `Send`.
pub type PredictionFuture<'a> = Pin<Box<dyn Future<Output = Result<PredictionResult>> + 'a>>;

/// Which backend implementation answers prediction requests.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BackendKind {
    /// Fabricated results; no network.
    #[default]
    Synthetic,
    /// HTTP `/infer` endpoint.
    Remote,
}

impl BackendKind {
    pub fn name(self) -> &'static str {
        match self {
            BackendKind::Synthetic => "synthetic",
            BackendKind::Remote => "remote",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BackendKind {
    type Err = PoseError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "synthetic" | "mock" => Ok(BackendKind::Synthetic),
            "remote" | "http" => Ok(BackendKind::Remote),
            other => Err(PoseError::Config(format!(
                "unknown backend '{other}'; expected synthetic or remote"
            ))),
        }
    }
}

/// Inference capability behind which real and synthetic backends sit.
///
/// Callers never branch on the implementation: both return a complete [`PredictionResult`]
/// or an error classified by [`PoseError::kind`]. The returned futures must stay pending for
/// the duration of the request so views can show a loading state.
pub trait InferenceBackend {
    /// Backend identifier.
    fn name(&self) -> &'static str;

    /// Run inference on an uploaded file. The upload has already been validated.
    fn predict<'a>(&'a self, upload: &'a Upload) -> PredictionFuture<'a>;

    /// Produce a demo result without input data. Always reports a human present.
    fn sample(&self) -> PredictionFuture<'_>;
}
