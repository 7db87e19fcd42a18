//! Inherited method lookup.
//!
//! Parents are walked depth-first in declaration order after the class's own
//! methods. Every class is expanded at most once per walk, so shared
//! ancestors are listed once and cyclic declarations terminate.

use crate::error::DocError;
use crate::model::{ClassRecord, ClassTable, MethodRecord};
use std::collections::HashSet;
use tracing::trace;

/// Methods visible on a class, each paired with its declaring class.
#[derive(Debug, Default)]
pub struct MethodWalk<'a> {
    pub methods: Vec<(&'a ClassRecord, &'a MethodRecord)>,
    pub problems: Vec<DocError>,
}

/// Collect the methods of `class` followed by those of its ancestors.
pub fn inherited_methods<'a>(table: &'a ClassTable, class: &'a ClassRecord) -> MethodWalk<'a> {
    let mut walk = MethodWalk::default();
    let mut expanded: HashSet<&str> = HashSet::new();
    let mut path: Vec<&str> = Vec::new();
    visit(table, class, &mut expanded, &mut path, &mut walk);
    walk
}

fn visit<'a>(
    table: &'a ClassTable,
    class: &'a ClassRecord,
    expanded: &mut HashSet<&'a str>,
    path: &mut Vec<&'a str>,
    walk: &mut MethodWalk<'a>,
) {
    expanded.insert(&class.name);
    path.push(&class.name);

    walk.methods.extend(class.methods.iter().map(|m| (class, m)));

    for parent in &class.inherits_from {
        if path.contains(&parent.as_str()) {
            let mut chain: Vec<String> = path.iter().map(|s| s.to_string()).collect();
            chain.push(parent.clone());
            walk.problems.push(DocError::InheritanceCycle {
                class: class.name.clone(),
                chain,
            });
            continue;
        }
        if expanded.contains(parent.as_str()) {
            trace!(class = %class.name, parent = %parent, "ancestor already listed");
            continue;
        }
        match table.get(parent) {
            Some(p) => visit(table, p, expanded, path, walk),
            None => walk.problems.push(DocError::UnknownParent {
                class: class.name.clone(),
                parent: parent.clone(),
            }),
        }
    }

    path.pop();
}
