use serde::Serialize;
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::classifier::ClassifierError;

/// Environment variable overriding the default `./models` directory.
pub const MODELS_DIR_ENV: &str = "SENTIMEN_MODELS_DIR";

/// Transformer model file names (one set per model directory).
pub const ONNX_FILE: &str = "model.onnx";
pub const TOKENIZER_FILE: &str = "tokenizer.json";

/// The three shipped classifier variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelKind {
    /// IndoBERT fine-tuned for Indonesian review sentiment (primary).
    IndoBert,
    /// Multilingual DistilBERT fine-tuned on the same data (secondary).
    DistilBert,
    /// BiLSTM baseline over a closed word vocabulary.
    Bilstm,
}

impl ModelKind {
    pub const ALL: [ModelKind; 3] = [ModelKind::IndoBert, ModelKind::DistilBert, ModelKind::Bilstm];

    /// Subdirectory of the models dir holding this variant's artifacts.
    pub fn dir_name(self) -> &'static str {
        match self {
            ModelKind::IndoBert => "indobert",
            ModelKind::DistilBert => "distilbert",
            ModelKind::Bilstm => "bilstm",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            ModelKind::IndoBert => "IndoBERT",
            ModelKind::DistilBert => "DistilBERT",
            ModelKind::Bilstm => "BiLSTM",
        }
    }

    pub fn is_transformer(self) -> bool {
        matches!(self, ModelKind::IndoBert | ModelKind::DistilBert)
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

impl FromStr for ModelKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "indobert" => Ok(ModelKind::IndoBert),
            "distilbert" => Ok(ModelKind::DistilBert),
            "bilstm" => Ok(ModelKind::Bilstm),
            other => Err(format!(
                "unknown model '{}', expected one of: indobert, distilbert, bilstm",
                other
            )),
        }
    }
}

/// Resolves the fixed on-disk artifact layout:
///
/// ```text
/// <models_dir>/indobert/{model.onnx, tokenizer.json}
/// <models_dir>/distilbert/{model.onnx, tokenizer.json}
/// <models_dir>/label_classes.json          (optional)
/// <models_dir>/bilstm/{model.safetensors, config.json, vocab.json}  (optional)
/// ```
///
/// Purely path arithmetic plus existence checks; nothing here opens a model.
#[derive(Debug, Clone)]
pub struct ModelLayout {
    models_dir: PathBuf,
}

impl ModelLayout {
    pub fn new(models_dir: impl Into<PathBuf>) -> Self {
        Self {
            models_dir: models_dir.into(),
        }
    }

    /// Default layout: `$SENTIMEN_MODELS_DIR` when set, else `./models`.
    pub fn from_env() -> Self {
        match env::var(MODELS_DIR_ENV) {
            Ok(dir) if !dir.is_empty() => Self::new(dir),
            _ => Self::new("models"),
        }
    }

    pub fn models_dir(&self) -> &Path {
        &self.models_dir
    }

    pub fn model_dir(&self, kind: ModelKind) -> PathBuf {
        self.models_dir.join(kind.dir_name())
    }

    pub fn onnx_file(&self, kind: ModelKind) -> PathBuf {
        self.model_dir(kind).join(ONNX_FILE)
    }

    pub fn tokenizer_file(&self, kind: ModelKind) -> PathBuf {
        self.model_dir(kind).join(TOKENIZER_FILE)
    }

    pub fn labels_file(&self) -> PathBuf {
        self.models_dir.join("label_classes.json")
    }

    pub fn bilstm_weights(&self) -> PathBuf {
        self.model_dir(ModelKind::Bilstm).join("model.safetensors")
    }

    pub fn bilstm_config(&self) -> PathBuf {
        self.model_dir(ModelKind::Bilstm).join("config.json")
    }

    pub fn bilstm_vocab(&self) -> PathBuf {
        self.model_dir(ModelKind::Bilstm).join("vocab.json")
    }

    /// Whether every artifact the variant needs is on disk.
    ///
    /// Transformer variants are detected by directory, matching how they are
    /// distributed; the BiLSTM needs all three of its files.
    pub fn artifacts_present(&self, kind: ModelKind) -> bool {
        match kind {
            ModelKind::IndoBert | ModelKind::DistilBert => self.model_dir(kind).is_dir(),
            ModelKind::Bilstm => {
                self.bilstm_weights().exists()
                    && self.bilstm_config().exists()
                    && self.bilstm_vocab().exists()
            }
        }
    }

    /// The variants that can actually be selected: artifacts present, and for
    /// the BiLSTM the `recurrent` backend compiled in.
    pub fn available(&self) -> Vec<ModelKind> {
        ModelKind::ALL
            .into_iter()
            .filter(|&kind| {
                if kind == ModelKind::Bilstm && !cfg!(feature = "recurrent") {
                    return false;
                }
                self.artifacts_present(kind)
            })
            .collect()
    }

    /// Startup validation: at least one transformer directory must exist.
    /// The error lists every expected path.
    pub fn ensure_usable(&self) -> Result<(), ClassifierError> {
        if self.artifacts_present(ModelKind::IndoBert)
            || self.artifacts_present(ModelKind::DistilBert)
        {
            Ok(())
        } else {
            Err(ClassifierError::NoModelsAvailable {
                searched: self.models_dir.clone(),
                expected: self.expected_paths(),
            })
        }
    }

    /// Every path the startup diagnostic should name when nothing is found.
    pub fn expected_paths(&self) -> Vec<PathBuf> {
        vec![
            self.model_dir(ModelKind::IndoBert),
            self.model_dir(ModelKind::DistilBert),
            self.labels_file(),
            self.bilstm_weights(),
            self.bilstm_config(),
            self.bilstm_vocab(),
        ]
    }

    /// Informational (non-error) notice shown when BiLSTM artifacts are on
    /// disk but the binary was built without the `recurrent` feature.
    pub fn backend_notice(&self) -> Option<String> {
        if !cfg!(feature = "recurrent") && self.artifacts_present(ModelKind::Bilstm) {
            Some(
                "BiLSTM artifacts found, but this build lacks the recurrent backend; \
                 rebuild with `--features recurrent` to use them"
                    .to_string(),
            )
        } else {
            None
        }
    }

    /// Read-only snapshot of resolved paths for operator troubleshooting.
    pub fn diagnostics(&self) -> LayoutDiagnostics {
        let entry = |name: &str, path: PathBuf| DiagnosticsEntry {
            exists: path.exists(),
            name: name.to_string(),
            path,
        };
        LayoutDiagnostics {
            models_dir: self.models_dir.clone(),
            recurrent_backend: cfg!(feature = "recurrent"),
            entries: vec![
                entry("indobert_dir", self.model_dir(ModelKind::IndoBert)),
                entry("distilbert_dir", self.model_dir(ModelKind::DistilBert)),
                entry("label_classes", self.labels_file()),
                entry("bilstm_weights", self.bilstm_weights()),
                entry("bilstm_config", self.bilstm_config()),
                entry("bilstm_vocab", self.bilstm_vocab()),
            ],
        }
    }
}

/// Resolved filesystem paths and their existence, for the `diag` panel.
#[derive(Debug, Clone, Serialize)]
pub struct LayoutDiagnostics {
    pub models_dir: PathBuf,
    pub recurrent_backend: bool,
    pub entries: Vec<DiagnosticsEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticsEntry {
    pub name: String,
    pub path: PathBuf,
    pub exists: bool,
}
