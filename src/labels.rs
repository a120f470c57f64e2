use log::{debug, info, warn};
use std::fs;
use std::path::Path;

/// Labels used when no `label_classes.json` is found next to the models.
pub const DEFAULT_LABELS: [&str; 3] = ["negative", "neutral", "positive"];

/// The ordered, index-addressable set of sentiment class names.
///
/// Loaded once per process from `label_classes.json` when that file holds a
/// JSON array of at least two strings; anything else (missing file, bad JSON,
/// wrong shape, too few entries) falls back to [`DEFAULT_LABELS`]. Loading
/// never fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelSet {
    labels: Vec<String>,
}

impl Default for LabelSet {
    fn default() -> Self {
        Self {
            labels: DEFAULT_LABELS.iter().map(ToString::to_string).collect(),
        }
    }
}

impl LabelSet {
    /// Reads the label file at `path`, falling back to the built-in default.
    pub fn load(path: &Path) -> Self {
        match Self::read_label_file(path) {
            Some(labels) => {
                info!("Loaded {} labels from {:?}", labels.len(), path);
                Self { labels }
            }
            None => {
                debug!("Using default labels {:?}", DEFAULT_LABELS);
                Self::default()
            }
        }
    }

    fn read_label_file(path: &Path) -> Option<Vec<String>> {
        if !path.exists() {
            return None;
        }
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Failed to read label file {:?}: {}", path, e);
                return None;
            }
        };
        match serde_json::from_str::<Vec<String>>(&raw) {
            Ok(labels) if labels.len() >= 2 => Some(labels),
            Ok(labels) => {
                warn!(
                    "Label file {:?} has {} entries, need at least 2; ignoring it",
                    path,
                    labels.len()
                );
                None
            }
            Err(e) => {
                warn!("Label file {:?} is not a JSON string array: {}", path, e);
                None
            }
        }
    }

    /// Builds a label set from explicit names. Mainly useful in tests.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            labels: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Resolves a class index to its label, or the synthetic `class_<index>`
    /// when the index falls outside the set.
    pub fn resolve(&self, index: usize) -> String {
        self.labels
            .get(index)
            .cloned()
            .unwrap_or_else(|| format!("class_{}", index))
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.labels
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_label_file(content: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("label_classes.json");
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        (dir, path)
    }

    #[test]
    fn missing_file_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let labels = LabelSet::load(&dir.path().join("label_classes.json"));
        assert_eq!(labels.as_slice(), &DEFAULT_LABELS);
    }

    #[test]
    fn valid_file_is_used_verbatim() {
        let (_dir, path) = write_label_file(r#"["negatif", "netral", "positif"]"#);
        let labels = LabelSet::load(&path);
        assert_eq!(labels.as_slice(), &["negatif", "netral", "positif"]);
    }

    #[test]
    fn two_entries_are_enough() {
        let (_dir, path) = write_label_file(r#"["negatif", "positif"]"#);
        assert_eq!(LabelSet::load(&path).len(), 2);
    }

    #[test]
    fn short_list_falls_back() {
        let (_dir, path) = write_label_file(r#"["only_one"]"#);
        assert_eq!(LabelSet::load(&path).as_slice(), &DEFAULT_LABELS);
    }

    #[test]
    fn malformed_json_falls_back() {
        let (_dir, path) = write_label_file("not json at all");
        assert_eq!(LabelSet::load(&path).as_slice(), &DEFAULT_LABELS);
    }

    #[test]
    fn non_array_json_falls_back() {
        let (_dir, path) = write_label_file(r#"{"negatif": 0, "positif": 1}"#);
        assert_eq!(LabelSet::load(&path).as_slice(), &DEFAULT_LABELS);
    }

    #[test]
    fn resolve_out_of_range_is_synthetic() {
        let labels = LabelSet::default();
        assert_eq!(labels.resolve(1), "neutral");
        assert_eq!(labels.resolve(7), "class_7");
    }
}
