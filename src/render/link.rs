//! Type and class-link resolution.

use crate::config::Config;
use crate::model::TypeDescriptor;

/// Markdown link to a class page, or the bare display name when the class
/// has no page.
pub fn class_link(config: &Config, name: &str) -> String {
    let display = config.display_name(name);
    if config.is_excluded(name) || !name.starts_with(config.prefix.as_str()) {
        return display.to_string();
    }
    format!(
        "[{}]({}{})",
        display,
        config.link_base,
        display.to_lowercase()
    )
}

/// Render a type descriptor with engine classes linked.
pub fn render_type(config: &Config, ty: &TypeDescriptor) -> String {
    match ty {
        TypeDescriptor::Primitive(id) => id.clone(),
        TypeDescriptor::Custom(name) if name.starts_with(config.prefix.as_str()) => {
            class_link(config, name)
        }
        TypeDescriptor::Custom(name) => name.clone(),
        TypeDescriptor::Dict(key, value) => format!(
            "<{}, {}>",
            render_type(config, key),
            render_type(config, value)
        ),
        TypeDescriptor::Array(inner) => format!("{}[]", render_type(config, inner)),
        TypeDescriptor::Union(types) => types
            .iter()
            .map(|t| render_type(config, t))
            .collect::<Vec<_>>()
            .join(", "),
    }
}
