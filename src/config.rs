use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::infer::{BackendKind, RemoteConfig, SyntheticConfig};
use crate::render::CanvasConfig;

#[derive(Debug, Deserialize, Default)]
struct ViewerConfigFile {
    backend: Option<String>,
    remote: Option<RemoteConfigFile>,
    synthetic: Option<SyntheticConfigFile>,
    canvas: Option<CanvasConfigFile>,
}

#[derive(Debug, Deserialize, Default)]
struct RemoteConfigFile {
    base_url: Option<String>,
    timeout_secs: Option<u64>,
    model_path: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct SyntheticConfigFile {
    latency_ms: Option<u64>,
    presence_probability: Option<f64>,
    seed: Option<u64>,
}

#[derive(Debug, Deserialize, Default)]
struct CanvasConfigFile {
    width: Option<u32>,
    height: Option<u32>,
    line_width: Option<f32>,
    joint_radius: Option<f32>,
}

#[derive(Debug, Clone, Default)]
pub struct ViewerConfig {
    pub backend: BackendKind,
    pub remote: RemoteConfig,
    pub synthetic: SyntheticConfig,
    pub canvas: CanvasConfig,
}

impl ViewerConfig {
    /// Loads `POSE_GUARDIAN_CONFIG` (if set), then applies environment overrides.
    pub fn load() -> Result<Self> {
        let config_path = std::env::var("POSE_GUARDIAN_CONFIG").ok();
        let file_cfg = match config_path.as_deref() {
            Some(path) => Some(read_config_file(Path::new(path))?),
            None => None,
        };
        let mut cfg = Self::from_file(file_cfg.unwrap_or_default())?;
        cfg.apply_env()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn from_file(file: ViewerConfigFile) -> Result<Self> {
        let defaults = Self::default();
        let backend = match file.backend.as_deref() {
            Some(name) => name.parse()?,
            None => defaults.backend,
        };
        let remote = file.remote.unwrap_or_default();
        let synthetic = file.synthetic.unwrap_or_default();
        let canvas = file.canvas.unwrap_or_default();
        Ok(Self {
            backend,
            remote: RemoteConfig {
                base_url: remote.base_url.unwrap_or(defaults.remote.base_url),
                timeout: remote
                    .timeout_secs
                    .map(Duration::from_secs)
                    .unwrap_or(defaults.remote.timeout),
                model_path: remote.model_path.or(defaults.remote.model_path),
            },
            synthetic: SyntheticConfig {
                latency: synthetic
                    .latency_ms
                    .map(Duration::from_millis)
                    .unwrap_or(defaults.synthetic.latency),
                presence_probability: synthetic
                    .presence_probability
                    .unwrap_or(defaults.synthetic.presence_probability),
                seed: synthetic.seed.or(defaults.synthetic.seed),
                ..defaults.synthetic
            },
            canvas: CanvasConfig {
                width: canvas.width.unwrap_or(defaults.canvas.width),
                height: canvas.height.unwrap_or(defaults.canvas.height),
                line_width: canvas.line_width.unwrap_or(defaults.canvas.line_width),
                joint_radius: canvas.joint_radius.unwrap_or(defaults.canvas.joint_radius),
            },
        })
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(backend) = std::env::var("POSE_BACKEND") {
            if !backend.trim().is_empty() {
                self.backend = backend.parse()?;
            }
        }
        if let Ok(url) = std::env::var("POSE_BACKEND_URL") {
            if !url.trim().is_empty() {
                self.remote.base_url = url.trim().to_string();
            }
        }
        if let Ok(timeout) = std::env::var("POSE_BACKEND_TIMEOUT_SECS") {
            let seconds: u64 = timeout.parse().map_err(|_| {
                anyhow!("POSE_BACKEND_TIMEOUT_SECS must be an integer number of seconds")
            })?;
            self.remote.timeout = Duration::from_secs(seconds);
        }
        if let Ok(model_path) = std::env::var("POSE_MODEL_PATH") {
            if !model_path.trim().is_empty() {
                self.remote.model_path = Some(model_path);
            }
        }
        if let Ok(latency) = std::env::var("POSE_SYNTHETIC_LATENCY_MS") {
            let millis: u64 = latency.parse().map_err(|_| {
                anyhow!("POSE_SYNTHETIC_LATENCY_MS must be an integer number of milliseconds")
            })?;
            self.synthetic.latency = Duration::from_millis(millis);
        }
        if let Ok(seed) = std::env::var("POSE_SYNTHETIC_SEED") {
            let seed: u64 = seed
                .parse()
                .map_err(|_| anyhow!("POSE_SYNTHETIC_SEED must be an unsigned integer"))?;
            self.synthetic.seed = Some(seed);
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.backend == BackendKind::Remote {
            self.remote.endpoint()?;
        }
        if self.remote.timeout.is_zero() {
            return Err(anyhow!("backend timeout must be greater than zero"));
        }
        self.synthetic.validate()?;
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(anyhow!(
                "canvas must be at least 1x1, got {}x{}",
                self.canvas.width,
                self.canvas.height
            ));
        }
        if !(self.canvas.line_width > 0.0 && self.canvas.joint_radius > 0.0) {
            return Err(anyhow!("line width and joint radius must be positive"));
        }
        Ok(())
    }
}

fn read_config_file(path: &Path) -> Result<ViewerConfigFile> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("failed to read config file {}: {}", path.display(), e))?;
    let is_toml = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
    let cfg = if is_toml {
        toml::from_str(&raw).map_err(|e| anyhow!("invalid config file {}: {}", path.display(), e))?
    } else {
        serde_json::from_str(&raw)
            .map_err(|e| anyhow!("invalid config file {}: {}", path.display(), e))?
    };
    Ok(cfg)
}
