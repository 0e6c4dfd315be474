use std::collections::HashMap;
use std::rc::Rc;
use std::sync::Arc;

use crate::archetype::ArchetypeLibrary;
use crate::config::ViewerConfig;
use crate::error::{PoseError, Result};

use super::backend::{BackendKind, InferenceBackend};
use super::backends::{RemoteBackend, SyntheticBackend};

/// Registry of inference backends for the single-threaded view.
///
/// Backends take `&self` and keep any mutable state behind `RefCell`, so handles are plain `Rc`.
pub struct BackendRegistry {
    backends: HashMap<String, Rc<dyn InferenceBackend>>,
    default_name: Option<String>,
}

impl BackendRegistry {
    pub fn new() -> Self {
        Self {
            backends: HashMap::new(),
            default_name: None,
        }
    }

    /// Registers the synthetic backend, plus the remote one when configured, and makes the
    /// configured kind the default.
    pub fn from_config(config: &ViewerConfig, archetypes: Arc<ArchetypeLibrary>) -> Result<Self> {
        let mut registry = Self::new();
        registry.register(SyntheticBackend::new(
            config.synthetic.clone(),
            archetypes.clone(),
        )?);
        if config.backend == BackendKind::Remote {
            let demo = SyntheticBackend::new(config.synthetic.clone(), archetypes)?;
            registry.register(RemoteBackend::new(config.remote.clone(), demo)?);
        }
        registry.set_default(config.backend.name())?;
        Ok(registry)
    }

    /// Register a backend. The first registered backend becomes the default.
    pub fn register<B: InferenceBackend + 'static>(&mut self, backend: B) {
        let name = backend.name().to_string();
        if self.default_name.is_none() {
            self.default_name = Some(name.clone());
        }
        log::debug!("registered inference backend '{}'", name);
        self.backends.insert(name, Rc::new(backend));
    }

    /// Set default backend by name.
    pub fn set_default(&mut self, name: &str) -> Result<()> {
        if !self.backends.contains_key(name) {
            return Err(PoseError::Config(format!("backend '{name}' not registered")));
        }
        self.default_name = Some(name.to_string());
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Rc<dyn InferenceBackend>> {
        self.backends.get(name).cloned()
    }

    pub fn default_backend(&self) -> Option<Rc<dyn InferenceBackend>> {
        self.default_name.as_ref().and_then(|name| self.get(name))
    }

    /// The backend prediction requests go to.
    pub fn active(&self) -> Result<Rc<dyn InferenceBackend>> {
        self.default_backend()
            .ok_or_else(|| PoseError::Config("no inference backend registered".to_string()))
    }

    /// Registered backend names, sorted.
    pub fn list(&self) -> Vec<String> {
        let mut names: Vec<String> = self.backends.keys().cloned().collect();
        names.sort();
        names
    }
}

impl Default for BackendRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn config(backend: BackendKind) -> ViewerConfig {
        let mut config = ViewerConfig::default();
        config.backend = backend;
        config.synthetic.latency = Duration::ZERO;
        config
    }

    fn library() -> Arc<ArchetypeLibrary> {
        Arc::new(ArchetypeLibrary::builtin().unwrap())
    }

    #[test]
    fn synthetic_config_registers_only_synthetic() {
        let registry = BackendRegistry::from_config(&config(BackendKind::Synthetic), library())
            .unwrap();
        assert_eq!(registry.list(), vec!["synthetic"]);
        assert_eq!(registry.active().unwrap().name(), "synthetic");
    }

    #[test]
    fn remote_config_selects_remote() {
        let registry =
            BackendRegistry::from_config(&config(BackendKind::Remote), library()).unwrap();
        assert_eq!(registry.list(), vec!["remote", "synthetic"]);
        assert_eq!(registry.active().unwrap().name(), "remote");
        assert!(registry.get("synthetic").is_some());
    }

    #[test]
    fn empty_registry_has_no_active_backend() {
        let mut registry = BackendRegistry::new();
        assert!(registry.active().is_err());
        assert!(registry.set_default("remote").is_err());
    }
}
