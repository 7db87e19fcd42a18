//! Conditions the generator reports about its input.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocError {
    #[error("inheritance cycle in {class}: {}", chain.join(" -> "))]
    InheritanceCycle { class: String, chain: Vec<String> },

    #[error("{class} extends unknown class {parent}")]
    UnknownParent { class: String, parent: String },

    #[error("marker `{marker}` not found in {}", path.display())]
    MissingMarker { marker: String, path: PathBuf },
}
