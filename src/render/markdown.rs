//! Markdown class pages.
//!
//! Section order is fixed: title, `Extends`, description, constructors,
//! fields, methods (own first, then inherited).

use crate::config::Config;
use crate::error::DocError;
use crate::hierarchy;
use crate::model::*;
use crate::render::link::{class_link, render_type};

const METHOD_SEPARATOR: &str = "\n_________________\n";

/// Render the page of one class, returning the markdown together with any
/// inheritance problems met while listing inherited methods.
pub fn render_class(
    table: &ClassTable,
    config: &Config,
    class: &ClassRecord,
) -> (String, Vec<DocError>) {
    let mut lines: Vec<String> = Vec::new();
    let mut problems = Vec::new();

    lines.push(format!("# {}", config.display_name(&class.name)));

    if !class.inherits_from.is_empty() {
        let parents: Vec<String> = class
            .inherits_from
            .iter()
            .map(|p| class_link(config, p))
            .collect();
        lines.push(format!("Extends {}\n", parents.join(", ")));
    }

    lines.push(class.desc.clone());

    let ctors = constructors(table, config, class);
    if !ctors.is_empty() {
        lines.push("## Constructors".to_string());
        for method in ctors {
            render_method(config, class, method, &mut lines);
        }
    }

    if !class.fields.is_empty() {
        lines.push("## Fields".to_string());
        for field in class.fields.iter().filter(|f| f.visibility == Visibility::Public) {
            lines.push(format!(
                "`{}` ({}) {}\n",
                field.name,
                render_type(config, &field.ty),
                field.desc
            ));
        }
    }

    if !class.methods.is_empty() {
        lines.push("## Methods".to_string());
        let walk = hierarchy::inherited_methods(table, class);
        for (owner, method) in walk.methods {
            if method.visibility == Visibility::Public {
                render_method(config, owner, method, &mut lines);
            }
        }
        problems.extend(walk.problems);
    }

    (lines.join("\n"), problems)
}

/// Root-class methods that construct `class`, by `new<Name>` convention or
/// the special-constructor table.
pub fn constructors<'a>(
    table: &'a ClassTable,
    config: &Config,
    class: &ClassRecord,
) -> Vec<&'a MethodRecord> {
    let Some(root) = table.get(&config.root_class) else {
        return Vec::new();
    };
    root.methods
        .iter()
        .filter(|m| config.constructs(&m.name, &class.name))
        .collect()
}

/// Append the documentation block of one method.
fn render_method(
    config: &Config,
    owner: &ClassRecord,
    method: &MethodRecord,
    lines: &mut Vec<String>,
) {
    let separator = if method.is_static { '.' } else { ':' };
    lines.push(format!(
        "### `{}{}{}({})`",
        config.display_name(&owner.name),
        separator,
        method.name,
        unique_param_names(&method.params).join(", ")
    ));

    if method.is_deprecated {
        lines.push("`deprecated`  ".to_string());
    }
    if method.is_static {
        lines.push("`static`  ".to_string());
    }

    lines.push(method.short_desc.clone());

    if !method.params.is_empty() {
        lines.push("#### Arguments".to_string());
        for param in &method.params {
            lines.push(format!(
                "`{}` ({}) {}\n",
                param.name,
                render_type(config, &param.ty),
                param.desc
            ));
        }
    }

    if !method.returns.is_empty() {
        lines.push("#### Returns".to_string());
        for ret in &method.returns {
            lines.push(format!("({}) {}\n", render_type(config, &ret.ty), ret.desc));
        }
    }

    lines.push(METHOD_SEPARATOR.to_string());
}

/// Parameter names in order, overloaded repeats dropped.
fn unique_param_names(params: &[Param]) -> Vec<&str> {
    let mut names: Vec<&str> = Vec::new();
    for p in params {
        if !names.contains(&p.name.as_str()) {
            names.push(&p.name);
        }
    }
    names
}
