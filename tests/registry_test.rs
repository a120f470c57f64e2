use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use sentimen::{ClassifierError, ModelKind, ModelRegistry, Prediction, SentimentModel};

/// Stand-in model so cache behavior can be tested without artifacts on disk.
struct FixedModel {
    kind: ModelKind,
    probs: Vec<f32>,
}

impl SentimentModel for FixedModel {
    fn kind(&self) -> ModelKind {
        self.kind
    }

    fn predict(&self, _text: &str) -> Result<Prediction, ClassifierError> {
        Ok(Prediction::from_probs(self.probs.clone()))
    }
}

#[test]
fn second_call_returns_identical_cached_handle() {
    let registry = ModelRegistry::new();
    let loads = AtomicUsize::new(0);

    let load = || {
        loads.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(FixedModel {
            kind: ModelKind::IndoBert,
            probs: vec![0.1, 0.2, 0.7],
        }) as sentimen::SharedModel)
    };

    let first = registry.get_or_load_with(ModelKind::IndoBert, load).unwrap();
    let second = registry
        .get_or_load_with(ModelKind::IndoBert, || {
            loads.fetch_add(1, Ordering::SeqCst);
            unreachable!("cached variant must not be loaded again")
        })
        .unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(loads.load(Ordering::SeqCst), 1);
}

#[test]
fn variants_are_cached_independently() {
    let registry = ModelRegistry::new();
    for kind in [ModelKind::IndoBert, ModelKind::DistilBert] {
        registry
            .get_or_load_with(kind, || {
                Ok(Arc::new(FixedModel {
                    kind,
                    probs: vec![1.0, 0.0],
                }) as sentimen::SharedModel)
            })
            .unwrap();
    }
    assert_eq!(registry.loaded_count(), 2);
    assert!(registry.is_loaded(ModelKind::IndoBert));
    assert!(registry.is_loaded(ModelKind::DistilBert));
    assert!(!registry.is_loaded(ModelKind::Bilstm));
}

#[test]
fn failed_load_is_not_cached() {
    let registry = ModelRegistry::new();
    let loads = AtomicUsize::new(0);

    let result = registry.get_or_load_with(ModelKind::DistilBert, || {
        loads.fetch_add(1, Ordering::SeqCst);
        Err(ClassifierError::ArtifactMissing("missing.onnx".into()))
    });
    assert!(matches!(result, Err(ClassifierError::ArtifactMissing(_))));
    assert!(!registry.is_loaded(ModelKind::DistilBert));

    // The next attempt runs the loader again and can succeed.
    registry
        .get_or_load_with(ModelKind::DistilBert, || {
            loads.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(FixedModel {
                kind: ModelKind::DistilBert,
                probs: vec![0.5, 0.5],
            }) as sentimen::SharedModel)
        })
        .unwrap();
    assert_eq!(loads.load(Ordering::SeqCst), 2);
    assert!(registry.is_loaded(ModelKind::DistilBert));
}
