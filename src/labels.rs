//! Class-label resolution for the prediction vector.
//!
//! Labels come from a `LabelSource`: either the public ImageNet label file
//! fetched over HTTP with an explicit on-disk cache, or a local file. The
//! parsed list is aligned with the model's class count before use.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::utils::error::{Error, Result};

/// Placeholder class name the public ImageNet label file starts with
const BACKGROUND_CLASS: &str = "background";

/// A source of newline-separated class labels
pub trait LabelSource {
    /// Fetch the raw label text
    fn fetch(&self) -> Result<String>;
}

/// Fetches the label file from a fixed URL, caching the body on disk.
///
/// When the cache file exists it is read directly and no network request
/// is made. A connectivity error on a cold cache is fatal; there is no
/// retry.
pub struct RemoteLabelSource {
    url: String,
    cache_path: PathBuf,
}

impl RemoteLabelSource {
    /// Create a source for `url` caching at `cache_path`
    pub fn new(url: impl Into<String>, cache_path: impl Into<PathBuf>) -> Self {
        Self {
            url: url.into(),
            cache_path: cache_path.into(),
        }
    }

    /// Path of the on-disk cache file
    pub fn cache_path(&self) -> &Path {
        &self.cache_path
    }
}

impl LabelSource for RemoteLabelSource {
    fn fetch(&self) -> Result<String> {
        if self.cache_path.exists() {
            debug!("Label cache hit: {}", self.cache_path.display());
            return Ok(fs::read_to_string(&self.cache_path)?);
        }

        info!("Downloading labels from {}", self.url);
        let text = reqwest::blocking::get(&self.url)
            .and_then(|response| response.error_for_status())
            .and_then(|response| response.text())
            .map_err(|e| Error::Http(self.url.clone(), e.to_string()))?;

        if let Some(parent) = self.cache_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.cache_path, &text)?;
        debug!("Cached labels at {}", self.cache_path.display());

        Ok(text)
    }
}

/// Reads labels from a local file
pub struct FileLabelSource {
    path: PathBuf,
}

impl FileLabelSource {
    /// Create a source reading from `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl LabelSource for FileLabelSource {
    fn fetch(&self) -> Result<String> {
        if !self.path.is_file() {
            return Err(Error::PathNotFound(self.path.clone()));
        }
        Ok(fs::read_to_string(&self.path)?)
    }
}

/// An ordered list of class names, index-aligned with the model output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelSet {
    names: Vec<String>,
}

impl LabelSet {
    /// Parse newline-separated label text, dropping blank lines
    pub fn parse(text: &str) -> Self {
        let names = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        Self { names }
    }

    /// Fetch and parse labels from a source
    pub fn from_source(source: &dyn LabelSource) -> Result<Self> {
        let text = source.fetch()?;
        let labels = Self::parse(&text);
        if labels.is_empty() {
            return Err(Error::Labels("label source produced no entries".to_string()));
        }
        Ok(labels)
    }

    /// Align the list with the model's class count.
    ///
    /// The public ImageNet label file carries a leading `background`
    /// placeholder that the 1000-way classifiers do not predict. That row
    /// is dropped only when it is actually present; any other length
    /// difference is an error.
    pub fn align_to(mut self, num_classes: usize) -> Result<Self> {
        if self.names.len() == num_classes {
            return Ok(self);
        }

        if self.names.len() == num_classes + 1
            && self.names[0].eq_ignore_ascii_case(BACKGROUND_CLASS)
        {
            self.names.remove(0);
            return Ok(self);
        }

        Err(Error::LabelMismatch {
            expected: num_classes,
            found: self.names.len(),
        })
    }

    /// Get the label for a class index
    pub fn get(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    /// Number of labels
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the list is empty
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// All labels in index order
    pub fn names(&self) -> &[String] {
        &self.names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn label_text(count: usize, with_background: bool) -> String {
        let mut text = String::new();
        if with_background {
            text.push_str("background\n");
        }
        for i in 0..count {
            text.push_str(&format!("class_{i}\n"));
        }
        text
    }

    #[test]
    fn test_parse_drops_blank_lines() {
        let labels = LabelSet::parse("tench\n\n  \ngoldfish\n");
        assert_eq!(labels.len(), 2);
        assert_eq!(labels.get(0), Some("tench"));
        assert_eq!(labels.get(1), Some("goldfish"));
    }

    #[test]
    fn test_align_exact_match_passes_through() {
        let labels = LabelSet::parse(&label_text(5, false));
        let aligned = labels.align_to(5).unwrap();
        assert_eq!(aligned.len(), 5);
        assert_eq!(aligned.get(0), Some("class_0"));
    }

    #[test]
    fn test_align_drops_background_row() {
        let labels = LabelSet::parse(&label_text(5, true));
        let aligned = labels.align_to(5).unwrap();
        assert_eq!(aligned.len(), 5);
        assert_eq!(aligned.get(0), Some("class_0"));
    }

    #[test]
    fn test_align_rejects_other_mismatches() {
        // One extra entry that is not a background placeholder
        let labels = LabelSet::parse("first\nclass_0\nclass_1\n");
        let result = labels.align_to(2);
        assert!(matches!(
            result,
            Err(Error::LabelMismatch {
                expected: 2,
                found: 3
            })
        ));

        let labels = LabelSet::parse(&label_text(3, false));
        assert!(labels.align_to(10).is_err());
    }

    #[test]
    fn test_file_source_reads_labels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("labels.txt");
        let mut file = fs::File::create(&path).unwrap();
        write!(file, "{}", label_text(3, true)).unwrap();

        let labels = LabelSet::from_source(&FileLabelSource::new(&path)).unwrap();
        assert_eq!(labels.len(), 4);
    }

    #[test]
    fn test_file_source_missing_path() {
        let source = FileLabelSource::new("no/such/labels.txt");
        assert!(matches!(source.fetch(), Err(Error::PathNotFound(_))));
    }

    #[test]
    fn test_remote_source_warm_cache_skips_network() {
        let dir = tempfile::tempdir().unwrap();
        let cache = dir.path().join("labels.txt");
        fs::write(&cache, label_text(2, false)).unwrap();

        // The URL is unroutable; a cache hit must never touch it
        let source = RemoteLabelSource::new("http://invalid.invalid/labels.txt", &cache);
        let labels = LabelSet::from_source(&source).unwrap();
        assert_eq!(labels.len(), 2);
    }

    #[test]
    fn test_empty_source_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.txt");
        fs::write(&path, "\n\n").unwrap();

        let result = LabelSet::from_source(&FileLabelSource::new(&path));
        assert!(matches!(result, Err(Error::Labels(_))));
    }
}
