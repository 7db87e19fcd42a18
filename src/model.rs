//! Data model for parsed class documentation: parser-agnostic.

use std::collections::HashMap;
use std::path::PathBuf;

/// Class fragments found in a single source file.
#[derive(Debug, Default, Clone)]
pub struct FileModel {
    pub file_path: PathBuf,
    pub classes: Vec<ClassRecord>,
}

/// A documented class. Produced per file by the parser as a fragment, then
/// accumulated across files by the merger.
#[derive(Debug, Default, Clone)]
pub struct ClassRecord {
    pub name: String,
    /// Concatenation of every fragment's description
    pub desc: String,
    pub fields: Vec<FieldRecord>,
    pub methods: Vec<MethodRecord>,
    /// Parent class names, unresolved
    pub inherits_from: Vec<String>,
}

impl ClassRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    Private,
}

/// `---@field` entry.
#[derive(Debug, Clone)]
pub struct FieldRecord {
    pub name: String,
    pub ty: TypeDescriptor,
    pub visibility: Visibility,
    pub desc: String,
}

/// A function declared on a class table.
#[derive(Debug, Clone, Default)]
pub struct MethodRecord {
    pub name: String,
    pub short_desc: String,
    pub params: Vec<Param>,
    pub returns: Vec<Return>,
    pub visibility: Visibility,
    /// Declared with `.` instead of `:` (or tagged `@static`)
    pub is_static: bool,
    pub is_deprecated: bool,
}

/// `---@param` entry.
#[derive(Debug, Clone)]
pub struct Param {
    pub name: String,
    pub ty: TypeDescriptor,
    pub desc: String,
    /// Written as `name?`
    pub optional: bool,
}

/// `---@return` entry.
#[derive(Debug, Clone)]
pub struct Return {
    pub ty: TypeDescriptor,
    pub desc: String,
}

/// Annotation type expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeDescriptor {
    /// Lua builtin such as `string`, `number` or `nil`
    Primitive(String),
    /// Any other named type, e.g. `DreamMesh`
    Custom(String),
    /// `table<K, V>`
    Dict(Box<TypeDescriptor>, Box<TypeDescriptor>),
    /// `T[]`
    Array(Box<TypeDescriptor>),
    /// `A|B|...`
    Union(Vec<TypeDescriptor>),
}

impl TypeDescriptor {
    pub fn any() -> Self {
        TypeDescriptor::Primitive("any".to_string())
    }
}

/// Merged classes in first-seen order with by-name lookup.
#[derive(Debug, Default)]
pub struct ClassTable {
    classes: Vec<ClassRecord>,
    by_name: HashMap<String, usize>,
}

impl ClassTable {
    /// Accumulator for `name`, created empty on first use.
    pub fn entry(&mut self, name: &str) -> &mut ClassRecord {
        let idx = match self.by_name.get(name) {
            Some(&idx) => idx,
            None => {
                self.classes.push(ClassRecord::new(name));
                self.by_name.insert(name.to_string(), self.classes.len() - 1);
                self.classes.len() - 1
            }
        };
        &mut self.classes[idx]
    }

    pub fn get(&self, name: &str) -> Option<&ClassRecord> {
        self.by_name.get(name).map(|&idx| &self.classes[idx])
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClassRecord> {
        self.classes.iter()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}
