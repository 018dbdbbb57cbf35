//! End-to-end tests: resource directories on disk through to load order and tree

use kuruma::loader::{self, find_manifest};
use kuruma::{
    discover_resources, read_resource, render_tree, Config, LoadError, Resolver,
};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_resource(root: &Path, relative: &str, file: &str, manifest: &str) {
    let dir = root.join(relative);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(file), manifest).unwrap();
}

/// A small server layout with a category folder and a legacy manifest
fn server_layout() -> TempDir {
    let temp = TempDir::new().unwrap();
    let root = temp.path();

    write_resource(
        root,
        "resources/base",
        "fxmanifest.lua",
        "fx_version 'cerulean'\ngame 'gta5'\nprovide 'core'",
    );
    write_resource(
        root,
        "resources/[ui]/menu",
        "fxmanifest.lua",
        "fx_version 'cerulean'\ndependencies { 'core', 'chat' }\nclient_script 'client.lua'",
    );
    write_resource(
        root,
        "resources/chat",
        "__resource.lua",
        "resource_manifest_version '44febabe-d386-4d18-afbe-5e627f4af937'\ndependency 'core'",
    );

    fs::create_dir_all(root.join("resources/.git/objects")).unwrap();
    fs::write(root.join("resources/.git/fxmanifest.lua"), "author 'hidden'").unwrap();
    fs::create_dir_all(root.join("resources/empty")).unwrap();

    temp
}

#[test]
fn test_discover_resources() {
    let temp = server_layout();
    let root = temp.path().join("resources");

    let found = discover_resources(&root).unwrap();
    let names: Vec<String> = found
        .iter()
        .map(|dir| dir.strip_prefix(&root).unwrap().to_string_lossy().replace('\\', "/"))
        .collect();

    assert_eq!(names, vec!["[ui]/menu", "base", "chat"]);
}

#[cfg(unix)]
#[test]
fn test_discover_does_not_follow_symlinks() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    write_resource(root, "a", "fxmanifest.lua", "fx_version 'cerulean'");
    std::os::unix::fs::symlink(root, root.join("a/loop")).unwrap();

    let found = discover_resources(root).unwrap();
    assert_eq!(found, vec![root.join("a")]);
}

#[test]
fn test_read_resource_uses_directory_name() {
    let temp = server_layout();
    let source = read_resource(&temp.path().join("resources/chat"), None).unwrap();

    assert_eq!(source.resource, "chat");
    assert!(source.text.contains("dependency 'core'"));
}

#[test]
fn test_read_resource_with_explicit_name() {
    let temp = server_layout();
    let source = read_resource(&temp.path().join("resources/base"), Some("es_base")).unwrap();
    assert_eq!(source.resource, "es_base");
}

#[test]
fn test_fxmanifest_preferred_over_legacy() {
    let temp = TempDir::new().unwrap();
    write_resource(temp.path(), "both", "__resource.lua", "author 'legacy'");
    write_resource(temp.path(), "both", "fxmanifest.lua", "author 'modern'");

    let dir = temp.path().join("both");
    assert_eq!(find_manifest(&dir).unwrap(), dir.join("fxmanifest.lua"));
    assert!(read_resource(&dir, None).unwrap().text.contains("modern"));
}

#[test]
fn test_missing_manifest() {
    let temp = server_layout();
    let err = read_resource(&temp.path().join("resources/empty"), None).unwrap_err();
    assert!(matches!(err, LoadError::NoManifest(_)));
}

#[test]
fn test_order_from_directories() {
    let temp = server_layout();
    let resources = temp.path().join("resources");

    let sources: Vec<_> = discover_resources(&resources)
        .unwrap()
        .iter()
        .map(|dir| read_resource(dir, None).unwrap())
        .collect();

    let resolution = Resolver::new().resolve(&sources).unwrap();
    assert_eq!(resolution.load_order, vec!["base", "chat", "menu"]);

    // base overrides its provides via `provide`
    assert_eq!(resolution.diagnostics.len(), 1);
    assert_eq!(resolution.diagnostics[0].resource.as_deref(), Some("base"));
}

#[test]
fn test_order_from_config() {
    let temp = server_layout();
    let config_path = temp.path().join("kuruma.toml");
    fs::write(
        &config_path,
        r#"
version = 1

[[resources]]
path = "resources/[ui]/menu"

[[resources]]
path = "resources/chat"

[[resources]]
path = "resources/base"

[[resources]]
path = "resources/empty"
enabled = false
"#,
    )
    .unwrap();

    let config = Config::from_file(&config_path).unwrap();
    let sources = loader::read_configured_resources(&config, temp.path()).unwrap();
    assert_eq!(sources.len(), 3);

    let resolution = Resolver::new()
        .with_script_inference(config.resolver.infer_script_dependencies)
        .resolve(&sources)
        .unwrap();
    assert_eq!(resolution.load_order, vec!["base", "chat", "menu"]);
}

#[test]
fn test_config_defaults_when_missing() {
    let temp = TempDir::new().unwrap();
    let config = Config::load_or_default(&temp.path().join("kuruma.toml")).unwrap();
    assert_eq!(config, Config::default());
    assert_eq!(config.enabled_resources().count(), 0);
}

#[test]
fn test_tree_from_directories() {
    let temp = server_layout();
    let resources = temp.path().join("resources");
    let sources: Vec<_> = ["base", "chat", "[ui]/menu"]
        .iter()
        .map(|dir| read_resource(&resources.join(dir), None).unwrap())
        .collect();

    let graph = Resolver::new().build_graph(&sources).unwrap();
    assert_eq!(
        render_tree(&graph),
        vec!["└ base", "  ├ chat", "  │ └ menu", "  └ menu"]
    );
}

#[test]
fn test_syntax_error_on_disk_names_resource() {
    let temp = TempDir::new().unwrap();
    write_resource(temp.path(), "broken", "fxmanifest.lua", "while true do end");

    let source = read_resource(&temp.path().join("broken"), None).unwrap();
    let err = Resolver::new().resolve(&[source]).unwrap_err();
    assert!(err.to_string().contains("\"broken\""));
}
