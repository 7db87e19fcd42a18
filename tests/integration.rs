use predicates::prelude::*;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::Command;
use tempfile::{NamedTempFile, TempDir};

const BASE: &str = "https://3dreamengine.github.io/3DreamEngine/docu/classes/";

fn cmd() -> assert_cmd::Command {
    assert_cmd::Command::from(Command::new(env!("CARGO_BIN_EXE_dreamdoc")))
}

fn fixture_path(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

fn copy_dir(from: &Path, to: &Path) {
    fs::create_dir_all(to).unwrap();
    for entry in fs::read_dir(from).unwrap() {
        let entry = entry.unwrap();
        let target = to.join(entry.file_name());
        if entry.path().is_dir() {
            copy_dir(&entry.path(), &target);
        } else {
            fs::copy(entry.path(), target).unwrap();
        }
    }
}

/// Workspace with the fixture engine under `engine/` and `index.md`.
fn fixture_workspace() -> TempDir {
    let dir = TempDir::new().unwrap();
    copy_dir(Path::new(&fixture_path("engine")), &dir.path().join("engine"));
    fs::copy(fixture_path("index.md"), dir.path().join("index.md")).unwrap();
    dir
}

/// Workspace built from inline `(relative path, source)` pairs.
fn lua_workspace(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for (rel, source) in files {
        let path = dir.path().join("engine").join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, source).unwrap();
    }
    fs::write(
        dir.path().join("index.md"),
        "# Engine\n\n## Documentation\nold\n\n## Extensions\nmore\n",
    )
    .unwrap();
    dir
}

fn generate(dir: &Path) -> assert_cmd::assert::Assert {
    cmd()
        .current_dir(dir)
        .args(["-s", "engine", "-o", "docs", "-i", "index.md"])
        .assert()
}

fn read(dir: &Path, rel: &str) -> String {
    fs::read_to_string(dir.join(rel)).unwrap()
}

// -- fixture engine --

#[test]
fn fixture_engine_pages() {
    let dir = fixture_workspace();
    generate(dir.path()).success();

    assert!(dir.path().join("docs/dream.md").exists());
    assert!(dir.path().join("docs/foo.md").exists());
    assert!(dir.path().join("docs/object.md").exists());
    // Excluded
    assert!(!dir.path().join("docs/vec3.md").exists());

    let foo = read(dir.path(), "docs/foo.md");
    assert!(foo.starts_with(&format!(
        "# Foo\nExtends [Object]({BASE}object)\n\nA small foo.\n## Constructors\n"
    )));
    assert!(foo.contains("### `Foo:newFoo(name, size)`\nCreates a new, empty foo\n#### Arguments\n"));
    assert!(foo.contains("`size` (number, nil) Edge length, defaults to 1\n"));
    assert!(foo.contains(&format!("#### Returns\n([Foo]({BASE}foo)) \n")));
    assert!(foo.contains("## Fields\n`x` (number) Horizontal offset\n"));
    assert!(!foo.contains("secret"));
    assert!(foo.contains("(Vec3[]) positions"));

    let order: Vec<usize> = [
        "### `Foo:bar(value)`",
        "### `Foo:baz()`",
        "### `Object:draw()`",
        "### `Object:render()`\n`deprecated`  ",
        "### `Object.empty()`\n`static`  ",
    ]
    .iter()
    .map(|h| foo.find(h).unwrap_or_else(|| panic!("missing {h} in:\n{foo}")))
    .collect();
    assert!(order.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn fixture_engine_root_page() {
    let dir = fixture_workspace();
    generate(dir.path()).success();

    let dream = read(dir.path(), "docs/dream.md");
    assert!(dream.starts_with("# Dream\n"));
    assert!(dream.contains("### `Dream:newFoo(name, size)`"));
    assert!(dream.contains("`args` (<string, any>) Loader arguments\n"));
    assert!(!dream.contains("_internalHelper"));
    assert!(!dream.contains("The engine root"));

    let object = read(dir.path(), "docs/object.md");
    assert!(object.contains("## Constructors\n### `Object:loadObject(path, args)`"));
    assert!(object.contains(&format!(
        "`meshes` (<string, [Mesh]({BASE}mesh)>) Meshes by name\n"
    )));
}

#[test]
fn fixture_engine_index() {
    let dir = fixture_workspace();
    generate(dir.path()).success();

    let index = read(dir.path(), "index.md");
    let expected = format!(
        "# 3DreamEngine\n\
         3DreamEngine is a 3D engine for LÖVE.\n\
         \n\
         ## Features\n\
         * Fast\n\
         \n\
         ## Documentation\n\
         [Dream]({BASE}dream)\n\
         \n\
         \n\
         ### Objects\n\
         General classes.\n\
         * [Foo]({BASE}foo)\n\
         * [Object]({BASE}object)\n\
         \n\
         ### Meshes\n\
         Different drawable meshes.\n\
         \n\
         ### Animations\n\
         Classes required to animated skeletons.\n\
         \n\
         ### Extensions\n\
         Classes intended to be used by certain extensions.\n\
         \n\
         \n\
         \n\
         ## Extensions\n\
         Extensions add optional features.\n"
    );
    assert_eq!(index, expected);
}

#[test]
fn rerun_is_idempotent() {
    let dir = fixture_workspace();
    generate(dir.path()).success();
    let index = read(dir.path(), "index.md");
    let foo = read(dir.path(), "docs/foo.md");

    generate(dir.path()).success();
    assert_eq!(read(dir.path(), "index.md"), index);
    assert_eq!(read(dir.path(), "docs/foo.md"), foo);
}

// -- merging --

#[test]
fn fragments_merge_into_one_page() {
    let dir = lua_workspace(&[
        (
            "a/foo.lua",
            "---@class DreamFoo\n---@field x number\nlocal class = {}\nfunction class:bar() end\n",
        ),
        (
            "b/foo.lua",
            "---@class DreamFoo\nlocal class = {}\nfunction class:baz() end\n",
        ),
    ]);
    generate(dir.path()).success();

    let entries: Vec<_> = fs::read_dir(dir.path().join("docs")).unwrap().collect();
    assert_eq!(entries.len(), 1);

    let page = read(dir.path(), "docs/foo.md");
    assert_eq!(page.matches("`x` (number)").count(), 1);
    let bar = page.find("### `Foo:bar()`").unwrap();
    let baz = page.find("### `Foo:baz()`").unwrap();
    assert!(bar < baz);
}

#[test]
fn lib_table_becomes_root_page() {
    let dir = lua_workspace(&[(
        "init.lua",
        "local lib = {}\n---Creates a light\nfunction lib:newLight() end\n",
    )]);
    generate(dir.path()).success();

    assert!(!dir.path().join("docs/lib.md").exists());
    let dream = read(dir.path(), "docs/dream.md");
    assert!(dream.contains("### `Dream:newLight()`\nCreates a light"));
}

#[test]
fn excluded_parent_rendered_as_plain_text() {
    let dir = lua_workspace(&[(
        "light.lua",
        "---@class DreamTransformable\nlocal t = {}\nfunction t:getTransform() end\n\
         ---@class DreamLight : DreamTransformable\nlocal class = {}\nfunction class:setColor() end\n",
    )]);
    generate(dir.path()).success();

    assert!(!dir.path().join("docs/transformable.md").exists());
    let light = read(dir.path(), "docs/light.md");
    assert!(light.contains("Extends Transformable\n"));
    assert!(light.contains("### `Transformable:getTransform()`"));
}

// -- inheritance diagnostics --

#[test]
fn self_parent_warns_but_completes() {
    let dir = lua_workspace(&[(
        "loop.lua",
        "---@class DreamLoop : DreamLoop\nlocal class = {}\nfunction class:spin() end\n",
    )]);
    generate(dir.path())
        .success()
        .stderr(predicate::str::contains("inheritance cycle"));

    let page = read(dir.path(), "docs/loop.md");
    assert_eq!(page.matches("### `Loop:spin()`").count(), 1);
}

#[test]
fn strict_fails_on_unknown_parent() {
    let dir = lua_workspace(&[(
        "mesh.lua",
        "---@class DreamMesh : DreamMissing\nlocal class = {}\nfunction class:draw() end\n",
    )]);
    cmd()
        .current_dir(dir.path())
        .args(["-s", "engine", "-o", "docs", "-i", "index.md", "--strict"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("extends unknown class DreamMissing"));
}

// -- index handling --

#[test]
fn missing_marker_fails() {
    let dir = lua_workspace(&[("a.lua", "---@class DreamA\nlocal c = {}\n")]);
    fs::write(dir.path().join("index.md"), "# Engine\nno markers here\n").unwrap();

    generate(dir.path())
        .failure()
        .stderr(predicate::str::contains("marker `## Documentation` not found"));
    assert_eq!(read(dir.path(), "index.md"), "# Engine\nno markers here\n");
}

#[test]
fn no_index_flag_leaves_index_alone() {
    let dir = lua_workspace(&[("a.lua", "---@class DreamA\nlocal c = {}\n")]);
    let before = read(dir.path(), "index.md");

    cmd()
        .current_dir(dir.path())
        .args(["-s", "engine", "-o", "docs", "--no-index"])
        .assert()
        .success();

    assert_eq!(read(dir.path(), "index.md"), before);
    assert!(dir.path().join("docs/a.md").exists());
}

// -- configuration --

#[test]
fn config_file_overrides_tables() {
    let dir = lua_workspace(&[(
        "a.lua",
        "---@class DreamA : DreamB\nlocal c = {}\n---@class DreamB\nlocal d = {}\n",
    )]);
    let mut config = NamedTempFile::with_suffix(".toml").unwrap();
    config
        .write_all(b"link_base = \"https://docs.example.com/\"\nexclude = [\"DreamB\"]\n")
        .unwrap();

    cmd()
        .current_dir(dir.path())
        .args(["-s", "engine", "-o", "docs", "-i", "index.md"])
        .args(["-c", config.path().to_str().unwrap()])
        .assert()
        .success();

    assert!(!dir.path().join("docs/b.md").exists());
    let index = read(dir.path(), "index.md");
    assert!(index.contains("* [A](https://docs.example.com/a)"));
    assert!(read(dir.path(), "docs/a.md").contains("Extends B\n"));
}

#[test]
fn invalid_config_fails() {
    let dir = lua_workspace(&[]);
    let mut config = NamedTempFile::with_suffix(".toml").unwrap();
    config.write_all(b"no_such_key = 1\n").unwrap();

    cmd()
        .current_dir(dir.path())
        .args(["-s", "engine", "-c", config.path().to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid config"));
}
