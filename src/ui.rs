use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::cell::RefCell;
use std::time::{Duration, Instant};

use crate::session::{Notice, SessionObserver, SessionState};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UiMode {
    Auto,
    Plain,
    Pretty,
}

#[derive(Clone, Debug)]
pub struct Ui {
    mode: UiMode,
    is_tty: bool,
    disable_pretty: bool,
}

impl Ui {
    pub fn new(mode: UiMode, is_tty: bool, disable_pretty: bool) -> Self {
        Self {
            mode,
            is_tty,
            disable_pretty,
        }
    }

    pub fn from_args(ui_flag: Option<&str>, is_tty: bool, disable_pretty: bool) -> Self {
        let mode = match ui_flag {
            Some("plain") => UiMode::Plain,
            Some("pretty") => UiMode::Pretty,
            _ => UiMode::Auto,
        };
        Self::new(mode, is_tty, disable_pretty)
    }

    fn use_pretty(&self) -> bool {
        self.is_tty
            && match self.mode {
                UiMode::Pretty => true,
                UiMode::Auto => !self.disable_pretty,
                UiMode::Plain => false,
            }
    }

    pub fn stage(&self, name: &str) -> StageGuard {
        if self.use_pretty() {
            let spinner = ProgressBar::new_spinner();
            spinner.set_draw_target(ProgressDrawTarget::stderr());
            spinner.enable_steady_tick(Duration::from_millis(120));
            let style = ProgressStyle::with_template("{spinner} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner());
            spinner.set_style(style);
            spinner.set_message(format!("{name}…"));
            StageGuard::new(name.to_string(), Some(spinner))
        } else {
            eprintln!("==> {}", name);
            StageGuard::new(name.to_string(), None)
        }
    }
}

/// Spinner or plain log line for one stage; reports the elapsed time when dropped.
pub struct StageGuard {
    name: String,
    start: Instant,
    spinner: Option<ProgressBar>,
    failed: bool,
}

impl StageGuard {
    fn new(name: String, spinner: Option<ProgressBar>) -> Self {
        Self {
            name,
            start: Instant::now(),
            spinner,
            failed: false,
        }
    }

    /// Marks the stage as failed; the closing line shows a cross instead of a check.
    pub fn fail(mut self) {
        self.failed = true;
    }
}

impl Drop for StageGuard {
    fn drop(&mut self) {
        let elapsed = self.start.elapsed();
        let mark = if self.failed { '✘' } else { '✔' };
        let message = format!("{mark} {} ({})", self.name, format_duration(elapsed));
        if let Some(spinner) = &self.spinner {
            spinner.finish_with_message(message);
        } else {
            eprintln!("{message}");
        }
    }
}

fn format_duration(duration: Duration) -> String {
    if duration.as_secs() >= 1 {
        format!("{:.2}s", duration.as_secs_f64())
    } else {
        format!("{}ms", duration.as_millis())
    }
}

/// Terminal view glue: a stage spinner while processing and one line per notification.
pub struct ConsoleView {
    ui: Ui,
    label: String,
    stage: RefCell<Option<StageGuard>>,
    notices: RefCell<Vec<Notice>>,
}

impl ConsoleView {
    /// `label` names the request in the stage line, e.g. the uploaded file name.
    pub fn new(ui: Ui, label: impl Into<String>) -> Self {
        Self {
            ui,
            label: label.into(),
            stage: RefCell::new(None),
            notices: RefCell::new(Vec::new()),
        }
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.borrow().clone()
    }
}

impl SessionObserver for ConsoleView {
    fn state_changed(&self, state: SessionState) {
        match state {
            SessionState::Processing => {
                let guard = self.ui.stage(&format!("Processing {}", self.label));
                *self.stage.borrow_mut() = Some(guard);
            }
            SessionState::Success => {
                self.stage.borrow_mut().take();
            }
            SessionState::Failure => {
                if let Some(guard) = self.stage.borrow_mut().take() {
                    guard.fail();
                }
            }
            SessionState::Idle => {}
        }
    }

    fn notify(&self, notice: &Notice) {
        eprintln!("{}", notice_line(notice));
        self.notices.borrow_mut().push(notice.clone());
    }
}

/// One stderr line per notice; error notices carry their cause.
fn notice_line(notice: &Notice) -> String {
    match notice.detail() {
        Some(detail) => format!(
            "[{}] {} ({detail})",
            notice.title(),
            notice.description()
        ),
        None => format!("[{}] {}", notice.title(), notice.description()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::PoseClass;

    #[test]
    fn ui_flag_selects_mode() {
        assert!(!Ui::from_args(Some("plain"), true, false).use_pretty());
        assert!(Ui::from_args(Some("pretty"), true, true).use_pretty());
        assert!(!Ui::from_args(None, false, false).use_pretty());
        assert!(!Ui::from_args(None, true, true).use_pretty());
    }

    #[test]
    fn format_duration_switches_units() {
        assert_eq!(format_duration(Duration::from_millis(250)), "250ms");
        assert_eq!(format_duration(Duration::from_millis(1500)), "1.50s");
    }

    #[test]
    fn notice_lines_show_the_cause() {
        let line = notice_line(&Notice::InvalidFile {
            reason: "No file selected".to_string(),
        });
        assert_eq!(line, "[Invalid file] Please upload a CSV file. (No file selected)");

        let line = notice_line(&Notice::PredictionComplete {
            pose: PoseClass::Sit,
        });
        assert_eq!(line, "[Prediction complete] Detected pose: Sit");
    }

    #[test]
    fn console_view_tracks_stage_and_notices() {
        let view = ConsoleView::new(Ui::new(UiMode::Plain, false, false), "capture.csv");
        view.state_changed(SessionState::Processing);
        assert!(view.stage.borrow().is_some());
        view.state_changed(SessionState::Failure);
        assert!(view.stage.borrow().is_none());

        view.notify(&Notice::PredictionComplete {
            pose: PoseClass::Stand,
        });
        assert_eq!(view.notices().len(), 1);
    }
}
