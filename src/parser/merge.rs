//! Cross-file merge: combine class fragments by class name.
//!
//! A class may be spread across several source files (e.g. the root table
//! gets constructors from every subsystem). Fragments are concatenated in
//! file-path order; nothing is deduplicated or reordered.

use crate::config::Config;
use crate::model::*;
use tracing::debug;

/// Merge per-file models into one table of logical classes.
pub fn merge(mut models: Vec<FileModel>, config: &Config) -> ClassTable {
    models.sort_by(|a, b| a.file_path.cmp(&b.file_path));

    let mut table = ClassTable::default();
    for model in models {
        for fragment in model.classes {
            let name = canonical_name(&fragment.name, config);
            debug!(
                class = name,
                file = %model.file_path.display(),
                fields = fragment.fields.len(),
                methods = fragment.methods.len(),
                "merging fragment"
            );

            let class = table.entry(name);
            class.desc.push_str(&fragment.desc);
            class.fields.extend(fragment.fields);
            class.methods.extend(fragment.methods);
            class.inherits_from.extend(fragment.inherits_from);
        }
    }
    table
}

/// The root table is declared under an alias (`lib`) in the sources.
fn canonical_name<'a>(name: &'a str, config: &'a Config) -> &'a str {
    if name == config.root_alias {
        &config.root_class
    } else {
        name
    }
}
