//! Renderer module: one markdown page per documented class.

pub mod link;
pub mod markdown;

use crate::config::Config;
use crate::error::DocError;
use crate::model::ClassTable;
use tracing::debug;

/// A rendered class page.
#[derive(Debug)]
pub struct Page {
    pub class: String,
    /// `<display-name-lowercased>.md`
    pub file_name: String,
    pub content: String,
}

/// Result of rendering a whole class table.
#[derive(Debug, Default)]
pub struct Rendered {
    pub pages: Vec<Page>,
    /// Documented classes other than the root, for the index listing
    pub listed: Vec<String>,
    pub problems: Vec<DocError>,
}

/// Render every documented class. Classes without the reserved prefix or on
/// the exclusion list are skipped.
pub fn render_all(table: &ClassTable, config: &Config) -> Rendered {
    let mut out = Rendered::default();

    for class in table.iter() {
        if !config.is_documented(&class.name) {
            debug!(class = %class.name, "skipping undocumented class");
            continue;
        }

        let (content, problems) = markdown::render_class(table, config, class);
        out.problems.extend(problems);
        out.pages.push(Page {
            class: class.name.clone(),
            file_name: format!("{}.md", config.display_name(&class.name).to_lowercase()),
            content,
        });

        if class.name != config.root_class {
            out.listed.push(class.name.clone());
        }
    }

    out
}
