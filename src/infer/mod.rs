mod backend;
mod backends;
mod registry;
pub mod wire;

pub use backend::{BackendKind, InferenceBackend, PredictionFuture};
pub use backends::{RemoteBackend, RemoteConfig, SyntheticBackend, SyntheticConfig};
pub use registry::BackendRegistry;
