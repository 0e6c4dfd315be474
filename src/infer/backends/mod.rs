pub mod remote;
pub mod synthetic;

pub use remote::{RemoteBackend, RemoteConfig};
pub use synthetic::{SyntheticBackend, SyntheticConfig};
