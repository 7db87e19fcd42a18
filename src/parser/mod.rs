//! Parser module: source discovery and the annotation parser seam.

pub mod luadoc;
pub mod merge;
pub mod types;

use crate::model::FileModel;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Turns annotated source files into per-file class models.
pub trait AnnotationParser {
    fn parse(&self, paths: &[PathBuf]) -> Result<Vec<FileModel>>;
}

/// Parser for `---@` LuaDoc / EmmyLua annotations.
pub struct LuaDocParser;

impl AnnotationParser for LuaDocParser {
    fn parse(&self, paths: &[PathBuf]) -> Result<Vec<FileModel>> {
        let mut models = Vec::with_capacity(paths.len());
        for path in paths {
            let content = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let model = luadoc::parse(&content, path);
            debug!(
                file = %path.display(),
                classes = model.classes.len(),
                "parsed annotations"
            );
            models.push(model);
        }
        Ok(models)
    }
}

/// Collect source files under `root` matching `pattern`, sorted by path.
pub fn discover_sources(root: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    // Only `pattern` is a glob; the root is matched literally
    let root = glob::Pattern::escape(&root.to_string_lossy());
    let full = Path::new(&root).join(pattern);
    let full = full.to_string_lossy();
    let mut files: Vec<PathBuf> = glob::glob(&full)
        .with_context(|| format!("invalid glob pattern: {}", full))?
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(err) => {
                warn!("skipping unreadable path: {}", err);
                None
            }
        })
        .filter(|p| p.is_file())
        .collect();
    if files.is_empty() {
        warn!("no files matched: {}", full);
    }
    // Sort for deterministic output
    files.sort();
    files.dedup();
    Ok(files)
}
