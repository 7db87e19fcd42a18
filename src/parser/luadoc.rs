//! LuaDoc / EmmyLua annotation parser: line-by-line state machine.
//!
//! Recognizes `---` description lines, the `@class`, `@field`, `@param`,
//! `@return`, `@deprecated`, `@static` and visibility tags, and binds each
//! docblock to the next function declaration or assignment.

use crate::model::*;
use crate::parser::types::{parse_type, split_type};
use regex::Regex;
use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;
use tracing::trace;

// -- Regex patterns -----------------------------------------------------------

static RE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^---\s*@(\w+)\s*(.*)$").unwrap());

static RE_DOC: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^---(.*)$").unwrap());

static RE_RULER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^-{4,}").unwrap());

static RE_CLASS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([\w.]+)\s*(?::\s*([\w.,\s]+))?").unwrap());

// function owner:name(args) / function owner.name(args)
static RE_FUNC_DECL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:local\s+)?function\s+([A-Za-z_][\w.]*)([.:])([A-Za-z_]\w*)\s*\(([^)]*)\)")
        .unwrap()
});

// owner.name = function(args)
static RE_FUNC_ASSIGN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z_][\w.]*)([.:])([A-Za-z_]\w*)\s*=\s*function\s*\(([^)]*)\)").unwrap()
});

static RE_ASSIGN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:local\s+)?([A-Za-z_]\w*)\s*=(?:[^=]|$)").unwrap());

// -- Parser state -------------------------------------------------------------

#[derive(Default)]
struct ParserState {
    classes: Vec<ClassRecord>,
    class_index: HashMap<String, usize>,

    /// Variable name → class it holds
    bindings: HashMap<String, String>,
    /// Class waiting for the next assignment to bind its variable
    awaiting_binding: Option<String>,
    /// Target of `@field` lines
    current_class: Option<usize>,

    docblock: Docblock,
}

#[derive(Default)]
struct Docblock {
    desc: Vec<String>,
    params: Vec<Param>,
    returns: Vec<Return>,
    visibility: Option<Visibility>,
    is_static: bool,
    is_deprecated: bool,
}

impl Docblock {
    fn description(&self) -> String {
        self.desc.join("\n").trim().to_string()
    }
}

impl ParserState {
    fn class_mut(&mut self, name: &str) -> usize {
        if let Some(&idx) = self.class_index.get(name) {
            return idx;
        }
        self.classes.push(ClassRecord::new(name));
        let idx = self.classes.len() - 1;
        self.class_index.insert(name.to_string(), idx);
        idx
    }
}

// -- Public API ---------------------------------------------------------------

/// Parse one annotated Lua source into a per-file model.
pub fn parse(input: &str, path: &Path) -> FileModel {
    let mut state = ParserState::default();

    for line in input.lines() {
        process_line(&mut state, line.trim());
    }

    FileModel {
        file_path: path.to_path_buf(),
        classes: state.classes,
    }
}

// -- Line processing ----------------------------------------------------------

fn process_line(s: &mut ParserState, line: &str) {
    // A blank line detaches a docblock from whatever follows
    if line.is_empty() {
        s.docblock = Docblock::default();
        return;
    }

    if RE_RULER.is_match(line) {
        return;
    }

    if let Some(caps) = RE_TAG.captures(line) {
        process_tag(s, &caps[1], caps[2].trim());
        return;
    }

    if let Some(caps) = RE_DOC.captures(line) {
        let text = &caps[1];
        let text = text.strip_prefix(' ').unwrap_or(text);
        s.docblock.desc.push(text.trim_end().to_string());
        return;
    }

    // Plain comment
    if line.starts_with("--") {
        return;
    }

    if let Some(caps) = RE_FUNC_DECL
        .captures(line)
        .or_else(|| RE_FUNC_ASSIGN.captures(line))
    {
        declare_method(s, &caps[1], &caps[2], &caps[3], &caps[4]);
        return;
    }

    if let Some(caps) = RE_ASSIGN.captures(line) {
        if let Some(class) = s.awaiting_binding.take() {
            trace!(var = &caps[1], class = %class, "bound class variable");
            s.bindings.insert(caps[1].to_string(), class);
        }
    }

    // Any other statement ends the docblock
    s.docblock = Docblock::default();
}

fn process_tag(s: &mut ParserState, tag: &str, rest: &str) {
    match tag {
        "class" => {
            let Some(caps) = RE_CLASS.captures(rest) else {
                return;
            };
            let name = caps[1].to_string();
            let idx = s.class_mut(&name);
            let block = std::mem::take(&mut s.docblock);
            let class = &mut s.classes[idx];
            class.desc.push_str(&block.description());
            if let Some(parents) = caps.get(2) {
                class.inherits_from.extend(
                    parents
                        .as_str()
                        .split(',')
                        .map(str::trim)
                        .filter(|p| !p.is_empty())
                        .map(str::to_string),
                );
            }
            s.current_class = Some(idx);
            s.awaiting_binding = Some(name);
        }
        "field" => {
            let Some(idx) = s.current_class else {
                trace!(rest, "@field outside of a class");
                return;
            };
            if let Some(field) = parse_field(rest) {
                s.classes[idx].fields.push(field);
            }
        }
        "param" => {
            if let Some(param) = parse_param(rest) {
                s.docblock.params.push(param);
            }
        }
        "return" => {
            let (ty, desc) = split_type(rest);
            if !ty.is_empty() {
                s.docblock.returns.push(Return {
                    ty: parse_type(ty),
                    desc: clean_desc(desc),
                });
            }
        }
        "deprecated" => s.docblock.is_deprecated = true,
        "static" => s.docblock.is_static = true,
        "private" => s.docblock.visibility = Some(Visibility::Private),
        "protected" => s.docblock.visibility = Some(Visibility::Protected),
        "public" => s.docblock.visibility = Some(Visibility::Public),
        _ => {}
    }
}

fn declare_method(s: &mut ParserState, owner: &str, sep: &str, name: &str, args: &str) {
    let class_name = s
        .bindings
        .get(owner)
        .cloned()
        .unwrap_or_else(|| owner.to_string());
    let idx = s.class_mut(&class_name);
    let block = std::mem::take(&mut s.docblock);
    let short_desc = block.description();

    let params = merge_params(signature_params(args), block.params);
    trace!(
        class = %class_name,
        method = name,
        params = params.len(),
        optional = params.iter().filter(|p| p.optional).count(),
        "declared method"
    );

    s.classes[idx].methods.push(MethodRecord {
        name: name.to_string(),
        short_desc,
        params,
        returns: block.returns,
        visibility: block.visibility.unwrap_or_default(),
        is_static: sep == "." || block.is_static,
        is_deprecated: block.is_deprecated,
    });
}

/// Parameters taken from the function signature, typed `any`.
fn signature_params(args: &str) -> Vec<Param> {
    args.split(',')
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .map(|a| Param {
            name: a.to_string(),
            ty: TypeDescriptor::any(),
            desc: String::new(),
            optional: false,
        })
        .collect()
}

/// Signature order wins. Each argument takes its `@param` entry when one
/// exists; documented names missing from the signature (varargs, renamed
/// arguments) follow at the end.
fn merge_params(signature: Vec<Param>, mut documented: Vec<Param>) -> Vec<Param> {
    let mut params = Vec::with_capacity(signature.len() + documented.len());
    for arg in signature {
        match documented.iter().position(|p| p.name == arg.name) {
            Some(pos) => params.push(documented.remove(pos)),
            None => params.push(arg),
        }
    }
    params.extend(documented);
    params
}

/// `name[?] type desc`
fn parse_param(rest: &str) -> Option<Param> {
    let (name, tail) = split_word(rest)?;
    let (ty, desc) = split_type(tail);
    let optional = name.ends_with('?');
    Some(Param {
        name: name.trim_end_matches('?').to_string(),
        ty: if ty.is_empty() {
            TypeDescriptor::any()
        } else {
            parse_type(ty)
        },
        desc: clean_desc(desc),
        optional,
    })
}

/// `[public|protected|private|package] name type desc`
fn parse_field(rest: &str) -> Option<FieldRecord> {
    let (first, tail) = split_word(rest)?;
    let (visibility, rest) = match first {
        "public" => (Visibility::Public, tail),
        "protected" => (Visibility::Protected, tail),
        "private" | "package" => (Visibility::Private, tail),
        _ => (Visibility::Public, rest),
    };
    let (name, tail) = split_word(rest)?;
    let (ty, desc) = split_type(tail);
    Some(FieldRecord {
        name: name.trim_end_matches('?').to_string(),
        ty: if ty.is_empty() {
            TypeDescriptor::any()
        } else {
            parse_type(ty)
        },
        visibility,
        desc: clean_desc(desc),
    })
}

fn split_word(text: &str) -> Option<(&str, &str)> {
    let text = text.trim_start();
    if text.is_empty() {
        return None;
    }
    match text.find(char::is_whitespace) {
        Some(end) => Some((&text[..end], text[end..].trim_start())),
        None => Some((text, "")),
    }
}

/// Drop the optional `#` / `@` separator some annotation styles put before
/// descriptions.
fn clean_desc(desc: &str) -> String {
    desc.trim_start_matches(['#', '@']).trim().to_string()
}
