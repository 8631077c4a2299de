//! YAML rendering and the directory layout the feature server reads from.

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::types::ScaffoldResult;

/// File extension of every written document.
pub const DOCUMENT_EXTENSION: &str = "yml";

/// Directory a document belongs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Services,
    Providers,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Services => "services",
            Category::Providers => "providers",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A document rendered to text, ready to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    pub category: Category,
    pub name: String,
    pub contents: String,
}

impl RenderedDocument {
    /// Path relative to the configuration root, e.g. `providers/parks-tiles.yml`.
    pub fn relative_path(&self) -> PathBuf {
        Path::new(self.category.as_str()).join(format!("{}.{DOCUMENT_EXTENSION}", self.name))
    }
}

/// Destination for rendered documents.
pub trait DocumentSink {
    fn write(&mut self, document: &RenderedDocument) -> ScaffoldResult<()>;
}

/// Writes `<root>/<category>/<name>.yml`, creating directories as needed.
#[derive(Debug, Clone)]
pub struct YamlDirectoryWriter {
    root: PathBuf,
    written: Vec<PathBuf>,
}

impl YamlDirectoryWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            written: Vec::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Paths written so far, in write order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    /// Write a document to any writer.
    pub fn write_to<W: Write>(document: &RenderedDocument, writer: &mut W) -> ScaffoldResult<()> {
        writer.write_all(document.contents.as_bytes())?;
        writer.flush()?;
        Ok(())
    }
}

impl DocumentSink for YamlDirectoryWriter {
    fn write(&mut self, document: &RenderedDocument) -> ScaffoldResult<()> {
        let path = self.root.join(document.relative_path());
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut file = std::fs::File::create(&path)?;
        Self::write_to(document, &mut file)?;

        tracing::info!("Wrote {}", path.display());
        self.written.push(path);
        Ok(())
    }
}

/// Collects rendered documents in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pub documents: Vec<RenderedDocument>,
}

impl DocumentSink for MemorySink {
    fn write(&mut self, document: &RenderedDocument) -> ScaffoldResult<()> {
        self.documents.push(document.clone());
        Ok(())
    }
}

/// Render a document as block-style YAML.
pub fn render_yaml<T: Serialize>(document: &T) -> ScaffoldResult<String> {
    Ok(serde_yaml::to_string(document)?)
}

/// Rewrite the block sequence under every `key:` into a one-line flow list.
///
/// ```text
/// combine:        ->   combine: ["*"]
/// - '*'
/// ```
///
/// Only sequences of plain scalars are rewritten; anything nested is left as
/// it was. Items are emitted as double-quoted strings.
pub fn inline_sequence(yaml: &str, key: &str) -> String {
    let header = format!("{key}:");
    let mut out = String::with_capacity(yaml.len());
    let mut lines = yaml.lines().peekable();

    while let Some(line) = lines.next() {
        let trimmed = line.trim_start();
        if trimmed != header {
            out.push_str(line);
            out.push('\n');
            continue;
        }

        let indent = line.len() - trimmed.len();
        let mut raw_items = Vec::new();
        while let Some(next) = lines.peek() {
            let next_trimmed = next.trim_start();
            let next_indent = next.len() - next_trimmed.len();
            if next_indent < indent || !next_trimmed.starts_with("- ") {
                break;
            }
            raw_items.push(*next);
            lines.next();
        }

        let items: Option<Vec<String>> = raw_items
            .iter()
            .map(|item| scalar_item(item.trim_start().trim_start_matches("- ")))
            .collect();

        match items {
            Some(items) if !items.is_empty() => {
                out.push_str(&line[..indent]);
                out.push_str(&header);
                out.push_str(" [");
                out.push_str(&items.join(", "));
                out.push_str("]\n");
            }
            _ => {
                out.push_str(line);
                out.push('\n');
                for item in raw_items {
                    out.push_str(item);
                    out.push('\n');
                }
            }
        }
    }

    out
}

// Returns the item re-quoted as a JSON string, or None for non-scalars.
fn scalar_item(item: &str) -> Option<String> {
    let value = if let Some(inner) = item.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')) {
        inner.replace("''", "'")
    } else if item.starts_with('"') {
        serde_json::from_str::<String>(item).ok()?
    } else if item.contains(": ") || item.starts_with(['-', '[', '{', '&', '*', '!', '|', '>']) {
        return None;
    } else {
        item.to_string()
    };
    serde_json::to_string(&value).ok()
}
