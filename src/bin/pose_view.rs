//! pose_view - submit a CSI capture to a pose backend and render the result
//!
//! Prints the detection results panel to stdout and writes the skeleton canvas as a PNG.
//! With `--sample` no file is read; the backend returns a demo result instead.

use anyhow::{Context, Result};
use clap::Parser;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;

use pose_guardian::render::{CanvasView, Overlay, RasterSurface, SkeletonRenderer};
use pose_guardian::ui::{ConsoleView, Ui};
use pose_guardian::{ArchetypeLibrary, BackendRegistry, PoseSession, Upload, ViewerConfig};

#[derive(Parser, Debug)]
#[command(
    name = "pose_view",
    about = "Predict a pose from WiFi CSI data and draw the skeleton"
)]
struct Args {
    /// CSV file with CSI measurements
    #[arg(value_name = "FILE", required_unless_present = "sample")]
    file: Option<PathBuf>,

    /// Request a demo result instead of uploading a file
    #[arg(long, conflicts_with = "file")]
    sample: bool,

    /// Where to write the rendered skeleton
    #[arg(long, default_value = "skeleton.png", value_name = "PATH")]
    out: PathBuf,

    /// Backend to use (synthetic|remote); overrides POSE_BACKEND
    #[arg(long, value_name = "NAME")]
    backend: Option<String>,

    /// Base URL of the remote backend; overrides POSE_BACKEND_URL
    #[arg(long, value_name = "URL")]
    url: Option<String>,

    /// UI mode for stderr progress (auto|plain|pretty)
    #[arg(long, default_value = "auto", value_name = "MODE")]
    ui: String,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut config = ViewerConfig::load()?;
    if let Some(backend) = args.backend.as_deref() {
        config.backend = backend.parse()?;
    }
    if let Some(url) = args.url.as_deref() {
        config.remote.base_url = url.to_string();
    }
    config.validate()?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start runtime")?;
    runtime.block_on(run(args, config))
}

async fn run(args: Args, config: ViewerConfig) -> Result<()> {
    let is_tty = std::io::stderr().is_terminal();
    let stdout_is_tty = std::io::stdout().is_terminal();
    let ui = Ui::from_args(Some(&args.ui), is_tty, !stdout_is_tty);

    let archetypes = Arc::new(ArchetypeLibrary::builtin()?);
    let registry = BackendRegistry::from_config(&config, archetypes.clone())?;
    log::info!(
        "backends available: {} (active: {})",
        registry.list().join(", "),
        config.backend
    );
    let session = PoseSession::new(registry.active()?);

    let label = match &args.file {
        Some(path) => path.display().to_string(),
        None => "sample request".to_string(),
    };
    let console = Rc::new(ConsoleView::new(ui, label));
    let canvas = Rc::new(CanvasView::new(
        SkeletonRenderer::new(config.canvas),
        RasterSurface::new(config.canvas.width, config.canvas.height),
    ));
    session.subscribe(console);
    session.subscribe(canvas.clone());

    let outcome = match &args.file {
        Some(path) => {
            let upload = Upload::from_path(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            session.submit(&upload).await
        }
        None => session.request_sample().await,
    };

    let frame = session.frame();
    print!("{}", pose_guardian::panel::ResultPanel::new(&frame));

    match frame.overlay() {
        Overlay::None => {}
        Overlay::Example(pose) => {
            canvas.with_renderer(|renderer| {
                canvas.with_surface(|surface| {
                    renderer.render_example(surface, &archetypes, Some(pose))
                })
            });
        }
        Overlay::NoData => log::info!("nothing to draw; writing a blank canvas"),
    }
    canvas
        .with_surface(|surface| surface.save(&args.out))
        .with_context(|| format!("failed to write {}", args.out.display()))?;
    log::info!("skeleton written to {}", args.out.display());

    outcome?;
    Ok(())
}
