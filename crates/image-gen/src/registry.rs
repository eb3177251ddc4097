//! Named generators and the default selection.

use std::collections::BTreeMap;
use std::env;
use std::sync::Arc;

use tracing::{info, warn};

use crate::error::ImageError;
use crate::generator::ImageGenerator;
use crate::nim::{NimClient, NimConfig};
use crate::pollinations::{PollinationsGenerator, DEFAULT_POLLINATIONS_URL};

/// Generators keyed by name, with one of them as the default.
#[derive(Clone)]
pub struct ImageProviders {
    providers: BTreeMap<String, Arc<dyn ImageGenerator>>,
    default: String,
}

impl ImageProviders {
    /// A registry containing only `default`.
    pub fn new(default: Arc<dyn ImageGenerator>) -> Self {
        let name = default.name().to_string();
        let mut providers = BTreeMap::new();
        providers.insert(name.clone(), default);
        Self {
            providers,
            default: name,
        }
    }

    /// Add or replace a generator under its own name.
    pub fn register(&mut self, generator: Arc<dyn ImageGenerator>) {
        self.providers.insert(generator.name().to_string(), generator);
    }

    /// Make a registered generator the default.
    pub fn set_default(&mut self, name: &str) -> Result<(), ImageError> {
        if !self.providers.contains_key(name) {
            return Err(ImageError::UnknownProvider(name.to_string()));
        }
        self.default = name.to_string();
        Ok(())
    }

    /// Look up a generator by name, or the default when `name` is None.
    pub fn get(&self, name: Option<&str>) -> Result<Arc<dyn ImageGenerator>, ImageError> {
        let name = name.map(str::trim).filter(|n| !n.is_empty());
        let key = name.unwrap_or(&self.default);
        self.providers
            .get(key)
            .cloned()
            .ok_or_else(|| ImageError::UnknownProvider(key.to_string()))
    }

    pub fn default_name(&self) -> &str {
        &self.default
    }

    pub fn names(&self) -> Vec<String> {
        self.providers.keys().cloned().collect()
    }

    /// Build the registry from the environment.
    ///
    /// Pollinations is always available (`POLLINATIONS_URL` overrides its
    /// base). NIM is added when `NVIDIA_API_KEY` is set. `IMAGE_PROVIDER`
    /// picks the default (default: pollinations).
    pub fn from_env() -> Result<Self, ImageError> {
        let base =
            env::var("POLLINATIONS_URL").unwrap_or_else(|_| DEFAULT_POLLINATIONS_URL.to_string());
        let mut providers = Self::new(Arc::new(PollinationsGenerator::new(base)));

        if env::var("NVIDIA_API_KEY").is_ok() {
            providers.register(Arc::new(NimClient::new(NimConfig::from_env()?)?));
        } else {
            warn!("NVIDIA_API_KEY not set; NIM image provider disabled");
        }

        if let Ok(name) = env::var("IMAGE_PROVIDER") {
            providers.set_default(name.trim())?;
        }

        info!(
            "Image providers: {:?} (default: {})",
            providers.names(),
            providers.default_name()
        );

        Ok(providers)
    }
}
