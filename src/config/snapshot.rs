//! Shared configuration snapshots.
//!
//! Readers grab an `Arc<ClientConfig>` once per call and keep using it even
//! if a newer snapshot is published meanwhile. Writers never mutate a
//! published snapshot; they publish a modified copy.

use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::config::schema::ClientConfig;
use crate::config::validation::validate_config;
use crate::config::ConfigError;

#[derive(Debug)]
pub struct ConfigHandle {
    current: ArcSwap<ClientConfig>,
}

impl ConfigHandle {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            current: ArcSwap::from_pointee(config),
        }
    }

    /// The snapshot in effect right now.
    pub fn current(&self) -> Arc<ClientConfig> {
        self.current.load_full()
    }

    /// Publish a validated replacement.
    pub fn replace(&self, config: ClientConfig) -> Result<(), ConfigError> {
        validate_config(&config).map_err(ConfigError::Validation)?;
        self.current.store(Arc::new(config));
        tracing::info!("Configuration snapshot replaced");
        Ok(())
    }

    /// Copy the current snapshot, apply `f`, validate and publish.
    pub fn update<F>(&self, f: F) -> Result<Arc<ClientConfig>, ConfigError>
    where
        F: FnOnce(&mut ClientConfig),
    {
        let mut next = ClientConfig::clone(&self.current());
        f(&mut next);
        validate_config(&next).map_err(ConfigError::Validation)?;
        let next = Arc::new(next);
        self.current.store(next.clone());
        tracing::info!("Configuration snapshot updated");
        Ok(next)
    }
}

impl Default for ConfigHandle {
    fn default() -> Self {
        Self::new(ClientConfig::default())
    }
}
