use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::config::{expand_path, resolve_with_base};
use crate::traits::DocumentSource;
use crate::types::Document;

/// Reads documents from the local filesystem.
///
/// A file path yields one document. A directory yields every `.txt` file
/// below it, sorted by path so repeated loads see the same order.
#[derive(Debug, Clone, Default)]
pub struct FileSource {
    base_dir: Option<PathBuf>,
}

impl FileSource {
    pub fn new() -> Self { Self::default() }

    /// Relative identifiers resolve against `base_dir` instead of the cwd.
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self { Self { base_dir: Some(base_dir.into()) } }

    fn resolve(&self, source: &str) -> PathBuf {
        match &self.base_dir {
            Some(base) => resolve_with_base(base, source),
            None => expand_path(source),
        }
    }

    fn read_file_content(&self, file_path: &Path) -> Result<String> {
        let bytes = fs::read(file_path).with_context(|| format!("reading {}", file_path.display()))?;
        Ok(match String::from_utf8(bytes) {
            Ok(content) => content,
            Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
        })
    }

    fn extract_doc_id(&self, file_path: &Path) -> String {
        file_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| file_path.to_string_lossy().into_owned())
    }

    fn list_txt_files(&self, root: &Path) -> Vec<PathBuf> {
        let mut txt_files = Vec::new();
        for entry in walkdir::WalkDir::new(root).into_iter().filter_map(|e| e.ok()).filter(|e| e.file_type().is_file()) {
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) == Some("txt") { txt_files.push(path.to_path_buf()); }
        }
        txt_files.sort();
        txt_files
    }

    fn read_one(&self, file_path: &Path) -> Result<Document> {
        Ok(Document {
            doc_id: self.extract_doc_id(file_path),
            source: file_path.to_string_lossy().into_owned(),
            text: self.read_file_content(file_path)?,
        })
    }
}

impl DocumentSource for FileSource {
    fn read(&self, source: &str) -> Result<Vec<Document>> {
        let path = self.resolve(source);
        if path.is_file() { return Ok(vec![self.read_one(&path)?]); }
        if path.is_dir() {
            let files = self.list_txt_files(&path);
            if files.is_empty() { return Err(anyhow!("no .txt files found under {}", path.display())); }
            debug!(dir = %path.display(), files = files.len(), "reading document directory");
            return files.iter().map(|f| self.read_one(f)).collect();
        }
        Err(anyhow!("{} does not exist", path.display()))
    }
}
