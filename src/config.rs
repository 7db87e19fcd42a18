//! Lookup tables that steer naming, linking, grouping and constructor
//! discovery. Built-in defaults describe 3DreamEngine; a TOML file can
//! override any of them.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Reserved prefix marking engine API classes.
    pub prefix: String,
    /// Name of the engine's root class.
    pub root_class: String,
    /// Table name the root class is declared under in the sources.
    pub root_alias: String,
    /// Base URL of the generated class pages.
    pub link_base: String,
    /// Classes never documented and never linked.
    pub exclude: BTreeSet<String>,
    /// Index groups, in output order.
    pub groups: Vec<Group>,
    /// Group used for classes missing from `group_of`.
    pub default_group: String,
    /// Display name → group name.
    pub group_of: BTreeMap<String, String>,
    /// Root-class method name → class it constructs.
    pub special_constructors: BTreeMap<String, String>,
    pub index: IndexMarkers,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Group {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IndexMarkers {
    pub start_marker: String,
    pub end_marker: String,
}

impl Default for IndexMarkers {
    fn default() -> Self {
        Self {
            start_marker: "## Documentation".to_string(),
            end_marker: "## Extensions".to_string(),
        }
    }
}

const EXCLUDED: &[&str] = &[
    "DreamVec2",
    "DreamVec3",
    "DreamVec4",
    "DreamMat2",
    "DreamMat3",
    "DreamMat4",
    "DreamQuat",
    "DreamClonable",
    "DreamHasShaders",
    "DreamTransformable",
    "DreamScene",
    "DreamTask",
    "DreamIsNamed",
    "",
    "DreamMaterializedText",
    "DreamCodepointMaterial",
    "DreamIndexedCodepointMaterial",
    "DreamMaterializedCodepoints",
    "DreamGlyph",
];

const GROUPS: &[(&str, &str)] = &[
    ("Objects", "General classes."),
    ("Meshes", "Different drawable meshes."),
    ("Animations", "Classes required to animated skeletons."),
    ("Extensions", "Classes intended to be used by certain extensions."),
];

const GROUP_OF: &[(&str, &str)] = &[
    ("Animation", "Animations"),
    ("AnimationFrame", "Animations"),
    ("Bone", "Animations"),
    ("Pose", "Animations"),
    ("Skeleton", "Animations"),
    ("Mesh", "Meshes"),
    ("InstancedMesh", "Meshes"),
    ("MeshBuilder", "Meshes"),
    ("MutableMeshBuilder", "Meshes"),
    ("Sprite", "Meshes"),
    ("SpriteBatch", "Meshes"),
    ("TextMeshBuilder", "Meshes"),
    ("CollisionMesh", "Extensions"),
    ("RaytraceMesh", "Extensions"),
];

const SPECIAL_CONSTRUCTORS: &[(&str, &str)] = &[
    ("loadObject", "DreamObject"),
    ("loadLibrary", "DreamObject"),
    ("newDynamicBuffer", "DreamBuffer"),
];

fn pairs(table: &[(&str, &str)]) -> BTreeMap<String, String> {
    table
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prefix: "Dream".to_string(),
            root_class: "Dream".to_string(),
            root_alias: "lib".to_string(),
            link_base: "https://3dreamengine.github.io/3DreamEngine/docu/classes/".to_string(),
            exclude: EXCLUDED.iter().map(|s| s.to_string()).collect(),
            groups: GROUPS
                .iter()
                .map(|(name, description)| Group {
                    name: name.to_string(),
                    description: description.to_string(),
                })
                .collect(),
            default_group: "Objects".to_string(),
            group_of: pairs(GROUP_OF),
            special_constructors: pairs(SPECIAL_CONSTRUCTORS),
            index: IndexMarkers::default(),
        }
    }
}

impl Config {
    /// Load a TOML override file. Keys left out keep their built-in value.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Name shown in headings and links: the prefix is dropped, except for
    /// the root class which keeps its full name.
    pub fn display_name<'a>(&self, name: &'a str) -> &'a str {
        if name == self.root_class {
            return name;
        }
        name.strip_prefix(self.prefix.as_str()).unwrap_or(name)
    }

    pub fn is_excluded(&self, name: &str) -> bool {
        self.exclude.contains(name)
    }

    /// Whether a class gets its own page.
    pub fn is_documented(&self, name: &str) -> bool {
        name.starts_with(self.prefix.as_str()) && !self.is_excluded(name)
    }

    /// Index group of a class, looked up by display name.
    pub fn group_for(&self, name: &str) -> &str {
        self.group_of
            .get(self.display_name(name))
            .map(String::as_str)
            .unwrap_or(&self.default_group)
    }

    /// Whether the root-class method `method` constructs `class`.
    pub fn constructs(&self, method: &str, class: &str) -> bool {
        let by_convention = method
            .strip_prefix("new")
            .is_some_and(|rest| rest == self.display_name(class));
        by_convention
            || self
                .special_constructors
                .get(method)
                .is_some_and(|target| target == class)
    }
}
