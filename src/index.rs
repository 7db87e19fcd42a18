//! Index page rewrite.
//!
//! The region from the start marker up to the next end-marker heading is
//! regenerated; everything outside it is kept byte-for-byte.

use crate::config::Config;
use crate::error::DocError;
use crate::render::link::class_link;
use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Grouped class listing placed under the start marker.
pub fn render_listing(config: &Config, classes: &[String]) -> String {
    let mut sorted: Vec<&str> = classes.iter().map(String::as_str).collect();
    sorted.sort_unstable();

    let mut lines: Vec<String> = Vec::new();
    for group in &config.groups {
        lines.push(format!("### {}", group.name));
        lines.push(group.description.clone());
        for class in sorted.iter().filter(|c| config.group_for(c) == group.name) {
            lines.push(format!("* {}", class_link(config, class)));
        }
        lines.push(String::new());
    }

    format!(
        "{}\n{}\n\n\n{}\n\n",
        config.index.start_marker,
        class_link(config, &config.root_class),
        lines.join("\n")
    )
}

/// Replace the marker region of `old` with `generated`.
pub fn splice(
    old: &str,
    generated: &str,
    config: &Config,
    path: &Path,
) -> Result<String, DocError> {
    let start_marker = &config.index.start_marker;
    let start = old.find(start_marker.as_str()).ok_or_else(|| DocError::MissingMarker {
        marker: start_marker.clone(),
        path: path.to_path_buf(),
    })?;

    let end_heading = format!("\n{}", config.index.end_marker);
    let search_from = start + start_marker.len();
    let end = old[search_from..]
        .find(&end_heading)
        .map(|pos| search_from + pos)
        .ok_or_else(|| DocError::MissingMarker {
            marker: config.index.end_marker.clone(),
            path: path.to_path_buf(),
        })?;

    let mut out = String::with_capacity(old.len() + generated.len());
    out.push_str(&old[..start]);
    out.push_str(generated);
    out.push_str(&old[end..]);
    Ok(out)
}

/// Read, splice and atomically replace the index document.
pub fn rewrite_index(path: &Path, config: &Config, classes: &[String]) -> Result<()> {
    let old = fs::read_to_string(path)
        .with_context(|| format!("failed to read index {}", path.display()))?;

    let listing = render_listing(config, classes);
    let new = splice(&old, &listing, config, path)?;

    // Replace the link target, not the link
    let target = fs::canonicalize(path)
        .with_context(|| format!("failed to resolve index {}", path.display()))?;
    let permissions = fs::metadata(&target)
        .with_context(|| format!("failed to stat index {}", target.display()))?
        .permissions();

    let dir = target
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut tmp = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("failed to create temporary file in {}", dir.display()))?;
    tmp.write_all(new.as_bytes())
        .with_context(|| format!("failed to write {}", tmp.path().display()))?;
    tmp.as_file()
        .set_permissions(permissions)
        .with_context(|| format!("failed to set permissions on {}", tmp.path().display()))?;
    tmp.persist(&target)
        .with_context(|| format!("failed to replace index {}", target.display()))?;

    info!(index = %path.display(), classes = classes.len(), "rewrote index");
    Ok(())
}
