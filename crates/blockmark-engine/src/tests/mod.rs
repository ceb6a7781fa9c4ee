//! Shared helpers for unit tests.

use std::path::PathBuf;

use tempfile::TempDir;

use crate::blocks::MultiLineKind;
use crate::editing::Document;
use crate::parsing::CmarkParser;

pub fn create_test_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

pub fn create_test_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let file_path = dir.path().join(name);
    std::fs::write(&file_path, content).expect("Failed to write test file");
    file_path
}

/// Loads `markdown` with the default parser.
pub fn doc(markdown: &str) -> Document {
    Document::from_markdown(markdown, &CmarkParser::default())
}

/// Kind and text of every block, in order.
pub fn summary(doc: &Document) -> Vec<(Option<MultiLineKind>, &str)> {
    doc.blocks().map(|b| (b.kind(), b.text())).collect()
}
