use relative_path::RelativePath;
use std::fs;
use std::path::{Path, PathBuf};

use crate::editing::Document;
use crate::options::EngineOptions;
use crate::parsing::StructuralParser;

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Read a markdown file and return its content
pub fn read_file(relative_path: &RelativePath, root: &Path) -> Result<String, IoError> {
    let absolute_path = relative_path.to_path(root);
    if !absolute_path.exists() {
        return Err(IoError::NotFound(absolute_path));
    }
    fs::read_to_string(&absolute_path).map_err(IoError::Io)
}

/// Write content to a markdown file
pub fn write_file(relative_path: &RelativePath, root: &Path, content: &str) -> Result<(), IoError> {
    let absolute_path = relative_path.to_path(root);

    // Create parent directories if they don't exist
    if let Some(parent) = absolute_path.parent() {
        fs::create_dir_all(parent).map_err(IoError::Io)?;
    }

    fs::write(&absolute_path, content).map_err(IoError::Io)
}

/// Read a markdown file into a reconciled document
pub fn open_document(
    relative_path: &RelativePath,
    root: &Path,
    parser: &dyn StructuralParser,
    options: EngineOptions,
) -> Result<Document, IoError> {
    let markdown = read_file(relative_path, root)?;
    let mut doc = Document::with_options(options);
    doc.load(&markdown, parser);
    log::debug!("opened {relative_path}: {} block(s)", doc.len());
    Ok(doc)
}

/// Write a document's serialized markdown
pub fn save_document(doc: &Document, relative_path: &RelativePath, root: &Path) -> Result<(), IoError> {
    write_file(relative_path, root, &doc.serialize())
}
