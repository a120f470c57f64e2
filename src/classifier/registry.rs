use lazy_static::lazy_static;
use log::{debug, info};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use super::{ClassifierError, SentimentModel, TransformerClassifier};
use crate::artifacts::{ModelKind, ModelLayout};
use crate::runtime::RuntimeConfig;

/// A loaded, process-lifetime model handle.
pub type SharedModel = Arc<dyn SentimentModel>;

lazy_static! {
    /// Process-global registry used by the CLI. Embedders that want isolated
    /// caches can construct their own [`ModelRegistry`].
    pub static ref REGISTRY: ModelRegistry = ModelRegistry::new();
}

/// Memoization table for loaded models, keyed by variant.
///
/// Each variant is read from storage at most once per process; later calls
/// return the identical cached handle. There is no invalidation: artifacts
/// changed on disk take effect only after a restart. Failed loads are not
/// cached, so a missing artifact can be supplied and retried.
///
/// The mutex is held across the load itself, which serializes concurrent
/// first use; the underlying load routines are not guaranteed safe to run
/// concurrently for the same artifacts.
#[derive(Default)]
pub struct ModelRegistry {
    cache: Mutex<HashMap<ModelKind, SharedModel>>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached handle for `kind`, loading it on first use.
    pub fn get_or_load(
        &self,
        layout: &ModelLayout,
        config: &RuntimeConfig,
        kind: ModelKind,
    ) -> Result<SharedModel, ClassifierError> {
        self.get_or_load_with(kind, || load_model(layout, config, kind))
    }

    /// Like [`get_or_load`](Self::get_or_load), with an explicit loader.
    /// The loader runs only on a cache miss.
    pub fn get_or_load_with<F>(
        &self,
        kind: ModelKind,
        loader: F,
    ) -> Result<SharedModel, ClassifierError>
    where
        F: FnOnce() -> Result<SharedModel, ClassifierError>,
    {
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(model) = cache.get(&kind) {
            debug!("Cache hit for {}", kind);
            return Ok(Arc::clone(model));
        }
        info!("Loading model {}", kind);
        let model = loader()?;
        cache.insert(kind, Arc::clone(&model));
        Ok(model)
    }

    pub fn is_loaded(&self, kind: ModelKind) -> bool {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&kind)
    }

    /// Number of variants currently cached.
    pub fn loaded_count(&self) -> usize {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

fn load_model(
    layout: &ModelLayout,
    config: &RuntimeConfig,
    kind: ModelKind,
) -> Result<SharedModel, ClassifierError> {
    match kind {
        ModelKind::IndoBert | ModelKind::DistilBert => Ok(Arc::new(
            TransformerClassifier::load(layout, config, kind)?,
        )),
        #[cfg(feature = "recurrent")]
        ModelKind::Bilstm => Ok(Arc::new(super::recurrent::BilstmClassifier::load(layout)?)),
        #[cfg(not(feature = "recurrent"))]
        ModelKind::Bilstm => Err(ClassifierError::BackendMissing),
    }
}
