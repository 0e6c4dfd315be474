//! Upload/result state machine.
//!
//! A [`PoseSession`] owns the current display frame and the single in-flight request. It cycles
//! `Idle -> Processing -> Success | Failure` and back to `Idle` on the next submission. A
//! submission made while `Processing` is refused with [`PoseError::Busy`]; there is no queue.
//!
//! Views subscribe through [`SessionObserver`]. The frame is replaced as a whole, so an observer
//! or a reader of [`PoseSession::frame`] sees either the previous complete frame or the new one.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::error::{PoseError, Result};
use crate::infer::InferenceBackend;
use crate::pose::{ConfidenceVector, PoseClass, PredictionResult};
use crate::render::Overlay;
use crate::skeleton::Skeleton;
use crate::upload::Upload;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Processing,
    Success,
    Failure,
}

/// What the view displays. Every field is `None` until the first successful request.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DisplayFrame {
    pub human_present: Option<bool>,
    pub pose_class: Option<PoseClass>,
    pub keypoints: Option<Skeleton>,
    pub confidence: Option<ConfidenceVector>,
}

impl DisplayFrame {
    pub fn overlay(&self) -> Overlay {
        Overlay::for_frame(self.keypoints.as_ref(), self.pose_class)
    }
}

impl From<&PredictionResult> for DisplayFrame {
    fn from(result: &PredictionResult) -> Self {
        Self {
            human_present: Some(result.human_present()),
            pose_class: Some(result.pose_class()),
            keypoints: Some(result.keypoints().clone()),
            confidence: result.confidence().copied(),
        }
    }
}

/// User-facing notification raised by the session.
#[derive(Clone, Debug, PartialEq)]
pub enum Notice {
    InvalidFile { reason: String },
    PredictionComplete { pose: PoseClass },
    PredictionFailed { reason: String },
}

impl Notice {
    pub fn title(&self) -> &'static str {
        match self {
            Notice::InvalidFile { .. } => "Invalid file",
            Notice::PredictionComplete { .. } => "Prediction complete",
            Notice::PredictionFailed { .. } => "Prediction failed",
        }
    }

    pub fn description(&self) -> String {
        match self {
            Notice::InvalidFile { .. } => "Please upload a CSV file.".to_string(),
            Notice::PredictionComplete { pose } => format!("Detected pose: {pose}"),
            Notice::PredictionFailed { .. } => {
                "An error occurred while processing the file.".to_string()
            }
        }
    }

    /// The underlying cause for error notices, e.g. "No file selected".
    pub fn detail(&self) -> Option<&str> {
        match self {
            Notice::InvalidFile { reason } | Notice::PredictionFailed { reason } => {
                Some(reason.as_str())
            }
            Notice::PredictionComplete { .. } => None,
        }
    }

    pub fn is_error(&self) -> bool {
        !matches!(self, Notice::PredictionComplete { .. })
    }
}

/// Receives session events. All methods default to no-ops.
pub trait SessionObserver {
    fn state_changed(&self, _state: SessionState) {}

    /// A new frame replaced the previous one.
    fn frame_published(&self, _frame: &DisplayFrame) {}

    fn notify(&self, _notice: &Notice) {}
}

enum Request<'a> {
    File(&'a Upload),
    Sample,
}

pub struct PoseSession {
    backend: Rc<dyn InferenceBackend>,
    state: Cell<SessionState>,
    frame: RefCell<Rc<DisplayFrame>>,
    observers: RefCell<Vec<Rc<dyn SessionObserver>>>,
    dispatched: Cell<u64>,
}

impl PoseSession {
    pub fn new(backend: Rc<dyn InferenceBackend>) -> Self {
        Self {
            backend,
            state: Cell::new(SessionState::Idle),
            frame: RefCell::new(Rc::new(DisplayFrame::default())),
            observers: RefCell::new(Vec::new()),
            dispatched: Cell::new(0),
        }
    }

    pub fn subscribe(&self, observer: Rc<dyn SessionObserver>) {
        self.observers.borrow_mut().push(observer);
    }

    pub fn state(&self) -> SessionState {
        self.state.get()
    }

    /// True while a request is in flight; views disable their submit controls.
    pub fn is_processing(&self) -> bool {
        self.state.get() == SessionState::Processing
    }

    /// Snapshot of the current display frame.
    pub fn frame(&self) -> Rc<DisplayFrame> {
        self.frame.borrow().clone()
    }

    /// Number of requests handed to the backend so far.
    pub fn dispatched(&self) -> u64 {
        self.dispatched.get()
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Validates and submits a file.
    pub async fn submit(&self, upload: &Upload) -> Result<PredictionResult> {
        self.guard_idle()?;
        if let Err(err) = upload.validate() {
            log::warn!("rejected upload '{}': {}", upload.name(), err);
            let reason = match &err {
                PoseError::Validation(reason) => reason.clone(),
                other => other.to_string(),
            };
            self.notify(&Notice::InvalidFile { reason });
            return Err(err);
        }
        log::info!(
            "submitting {} ({:.2} KB) to {} backend",
            upload.name(),
            upload.size_kb(),
            self.backend.name()
        );
        self.run(Request::File(upload)).await
    }

    /// Requests a demo result that needs no file.
    pub async fn request_sample(&self) -> Result<PredictionResult> {
        self.guard_idle()?;
        log::info!("requesting sample from {} backend", self.backend.name());
        self.run(Request::Sample).await
    }

    /// Refuses while processing; otherwise returns a finished session to `Idle`.
    fn guard_idle(&self) -> Result<()> {
        if self.is_processing() {
            log::warn!("submission refused: a prediction is already in progress");
            return Err(PoseError::Busy);
        }
        self.set_state(SessionState::Idle);
        Ok(())
    }

    async fn run(&self, request: Request<'_>) -> Result<PredictionResult> {
        self.set_state(SessionState::Processing);
        self.dispatched.set(self.dispatched.get() + 1);
        let mut in_flight = InFlight {
            session: self,
            settled: false,
        };

        let outcome = match request {
            Request::File(upload) => self.backend.predict(upload).await,
            Request::Sample => self.backend.sample().await,
        };
        in_flight.settled = true;

        match outcome {
            Ok(result) => {
                let frame = Rc::new(DisplayFrame::from(&result));
                *self.frame.borrow_mut() = frame.clone();
                self.set_state(SessionState::Success);
                self.for_each_observer(|observer| observer.frame_published(&frame));
                log::info!(
                    "prediction complete: pose={} human_present={}",
                    result.pose_class(),
                    result.human_present()
                );
                self.notify(&Notice::PredictionComplete {
                    pose: result.pose_class(),
                });
                Ok(result)
            }
            Err(err) => {
                log::warn!("prediction failed: {}", err);
                self.set_state(SessionState::Failure);
                self.notify(&Notice::PredictionFailed {
                    reason: err.to_string(),
                });
                Err(err)
            }
        }
    }

    fn set_state(&self, state: SessionState) {
        if self.state.replace(state) != state {
            log::debug!("session state -> {:?}", state);
            self.for_each_observer(|observer| observer.state_changed(state));
        }
    }

    fn notify(&self, notice: &Notice) {
        self.for_each_observer(|observer| observer.notify(notice));
    }

    // Observers may call back into the session, so the list is not borrowed while they run.
    fn for_each_observer(&self, f: impl Fn(&dyn SessionObserver)) {
        let observers = self.observers.borrow().clone();
        for observer in &observers {
            f(observer.as_ref());
        }
    }
}

/// Returns the session to `Idle` if a request future is dropped before it settles.
struct InFlight<'a> {
    session: &'a PoseSession,
    settled: bool,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.settled {
            log::warn!("in-flight prediction dropped before completion");
            self.session.set_state(SessionState::Idle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notices_match_view_copy() {
        let done = Notice::PredictionComplete {
            pose: PoseClass::Kneel,
        };
        assert_eq!(done.title(), "Prediction complete");
        assert_eq!(done.description(), "Detected pose: Kneel");
        assert!(!done.is_error());

        let invalid = Notice::InvalidFile {
            reason: "x".into(),
        };
        assert_eq!(invalid.description(), "Please upload a CSV file.");
        assert_eq!(invalid.detail(), Some("x"));
        assert!(invalid.is_error());
        assert_eq!(done.detail(), None);
    }

    #[test]
    fn empty_frame_shows_no_data() {
        assert_eq!(DisplayFrame::default().overlay(), Overlay::NoData);
    }
}
