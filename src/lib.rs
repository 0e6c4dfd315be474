//! WiFi Pose Guardian
//!
//! Client-side core for visualizing human-pose inference over WiFi Channel State Information.
//!
//! # Pipeline
//!
//! 1. A view hands an [`Upload`] (or a sample request) to a [`PoseSession`].
//! 2. The session validates it, enters `Processing` and awaits the active
//!    [`InferenceBackend`]: the HTTP `/infer` service or the synthetic generator.
//! 3. The returned [`PredictionResult`] replaces the display frame, and observers such as
//!    [`render::CanvasView`] redraw the skeleton.
//!
//! # Module Structure
//!
//! - `skeleton`: 19-joint topology and normalized points
//! - `pose`: pose classes, confidence vectors, prediction results
//! - `archetype`: canonical layouts per pose class
//! - `infer`: backend capability, synthetic and remote backends, wire codec, registry
//! - `render`: draw surfaces and the skeleton renderer
//! - `session`: upload/result state machine
//! - `panel`, `ui`: terminal view glue

pub mod archetype;
pub mod config;
pub mod csi_sample;
pub mod error;
pub mod infer;
pub mod panel;
pub mod pose;
pub mod render;
pub mod session;
pub mod skeleton;
pub mod ui;
pub mod upload;

pub use archetype::ArchetypeLibrary;
pub use config::ViewerConfig;
pub use error::{ErrorKind, PoseError, Result};
pub use infer::{BackendKind, BackendRegistry, InferenceBackend};
pub use pose::{ConfidenceVector, PoseClass, PredictionResult};
pub use session::{DisplayFrame, Notice, PoseSession, SessionObserver, SessionState};
pub use skeleton::{Joint, Point, Skeleton, CONNECTIONS, JOINT_COUNT};
pub use upload::Upload;
