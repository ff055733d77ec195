//! # Output Documents
//!
//! One YAML document per namespace, written through a [`DocumentSink`].

use crate::errors::ExtractError;
use crate::rules::{NamespaceBucket, RuleGroup};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// The merged rule groups of one namespace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamespaceDocument {
    pub groups: Vec<RuleGroup>,
    pub namespace: String,
}

impl NamespaceDocument {
    pub fn new(namespace: impl Into<String>, bucket: NamespaceBucket) -> Self {
        Self {
            groups: bucket.into_values().collect(),
            namespace: namespace.into(),
        }
    }

    pub fn to_yaml(&self) -> Result<String, ExtractError> {
        serde_yaml::to_string(self).map_err(ExtractError::from)
    }

    /// File name the document is stored under, `<namespace>.yaml`.
    pub fn file_name(&self) -> Result<String, ExtractError> {
        validate_namespace(&self.namespace)?;
        Ok(format!("{}.yaml", self.namespace))
    }
}

/// Destination for namespace documents.
pub trait DocumentSink {
    /// Persist `document`, returning where it ended up.
    fn write(&mut self, document: &NamespaceDocument) -> Result<PathBuf, ExtractError>;
}

/// Writes each document to `<output_dir>/<namespace>.yaml`, replacing existing files.
#[derive(Debug, Clone)]
pub struct DirectoryWriter {
    output_dir: PathBuf,
}

impl DirectoryWriter {
    /// Use an existing directory.
    pub fn new(output_dir: impl Into<PathBuf>) -> Result<Self, ExtractError> {
        let output_dir = output_dir.into();
        if !output_dir.is_dir() {
            return Err(ExtractError::FileNotFound(output_dir));
        }
        Ok(Self { output_dir })
    }

    /// Use `output_dir`, creating it and its parents when missing.
    pub fn create(output_dir: impl Into<PathBuf>) -> Result<Self, ExtractError> {
        let output_dir = output_dir.into();
        fs::create_dir_all(&output_dir)?;
        Ok(Self { output_dir })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

impl DocumentSink for DirectoryWriter {
    fn write(&mut self, document: &NamespaceDocument) -> Result<PathBuf, ExtractError> {
        let out_file = self.output_dir.join(document.file_name()?);
        let content = document.to_yaml()?;
        fs::write(&out_file, content)?;
        info!(
            "[{}] groups are written to [{}] file",
            document.groups.len(),
            out_file.display()
        );
        Ok(out_file)
    }
}

/// Namespace names become file names, so refuse anything that could leave the output directory.
fn validate_namespace(namespace: &str) -> Result<(), ExtractError> {
    if namespace.is_empty()
        || namespace == "."
        || namespace == ".."
        || namespace.contains('/')
        || namespace.contains('\\')
    {
        return Err(ExtractError::Internal(format!(
            "Namespace [{namespace}] cannot be used as a file name"
        )));
    }
    Ok(())
}
