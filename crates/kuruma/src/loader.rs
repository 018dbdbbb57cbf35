//! Resource directory loading
//!
//! Reads manifest files from resource directories and turns them into
//! [`ManifestSource`]s for the resolver.

use crate::config::Config;
use crate::resolver::ManifestSource;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Manifest file names, in order of preference.
pub const MANIFEST_FILES: [&str; 2] = ["fxmanifest.lua", "__resource.lua"];

/// Errors that can occur while loading resources from disk
#[derive(Debug, Error)]
pub enum LoadError {
    /// The directory holds neither manifest file
    #[error("No fxmanifest.lua or __resource.lua found in {}", .0.display())]
    NoManifest(PathBuf),

    /// The resource identity could not be derived from the path
    #[error("Cannot derive a resource name from {}", .0.display())]
    UnnamedResource(PathBuf),

    /// Failed to read a file or directory
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// True for `fxmanifest.lua` and `__resource.lua`.
pub fn is_manifest_file(file_name: &str) -> bool {
    MANIFEST_FILES.contains(&file_name)
}

/// The manifest file of a resource directory. `fxmanifest.lua` wins over
/// the legacy `__resource.lua`.
pub fn find_manifest(dir: &Path) -> Result<PathBuf, LoadError> {
    MANIFEST_FILES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
        .ok_or_else(|| LoadError::NoManifest(dir.to_path_buf()))
}

/// Name of the directory holding a manifest, from a `/`-separated path.
/// `.` segments are ignored; a manifest with no parent segment has no name.
fn resource_name_from_manifest_path(path: &str) -> Option<String> {
    let segments: Vec<&str> = path.split('/').filter(|segment| *segment != ".").collect();
    if segments.len() < 2 {
        return None;
    }
    let name = segments[segments.len() - 2];
    (!name.is_empty()).then(|| name.to_string())
}

/// Final path component of a directory, resolving `.` and `..` if needed.
pub fn directory_name(dir: &Path) -> Option<String> {
    if let Some(name) = dir.file_name().and_then(|n| n.to_str()) {
        return Some(name.to_string());
    }

    // `.` and `..` have no file name of their own
    let canonical = dir.canonicalize().ok()?;
    canonical
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
}

/// Read the manifest of one resource directory. The identity is `name`
/// when given, otherwise the directory's name.
pub fn read_resource(dir: &Path, name: Option<&str>) -> Result<ManifestSource, LoadError> {
    let manifest = find_manifest(dir)?;

    let resource = match name {
        Some(name) => name.to_string(),
        None => directory_name(dir)
            .or_else(|| {
                let path = manifest.to_str()?.replace('\\', "/");
                resource_name_from_manifest_path(&path)
            })
            .ok_or_else(|| LoadError::UnnamedResource(dir.to_path_buf()))?,
    };

    let text = fs::read_to_string(&manifest).map_err(|source| LoadError::Io {
        path: manifest.clone(),
        source,
    })?;

    debug!(resource = resource.as_str(), manifest = %manifest.display(), "read manifest");
    Ok(ManifestSource::new(resource, text))
}

/// Read every enabled resource of a config. Entry paths are relative to `base`.
pub fn read_configured_resources(
    config: &Config,
    base: &Path,
) -> Result<Vec<ManifestSource>, LoadError> {
    config
        .enabled_resources()
        .map(|entry| read_resource(&entry.directory(base), entry.name.as_deref()))
        .collect()
}

/// Every directory under `root` (including `root`) that holds a manifest,
/// sorted by path. Dot-directories are skipped.
pub fn discover_resources(root: &Path) -> Result<Vec<PathBuf>, LoadError> {
    let mut found = Vec::new();
    discover_recursive(root, &mut found)?;
    found.sort();

    info!("Discovered {} resources under {:?}", found.len(), root);
    Ok(found)
}

fn discover_recursive(dir: &Path, found: &mut Vec<PathBuf>) -> Result<(), LoadError> {
    let entries = fs::read_dir(dir).map_err(|source| LoadError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut has_manifest = false;
    for entry in entries {
        let entry = entry.map_err(|source| LoadError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();

        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if name.starts_with('.') {
            continue;
        }

        // Not followed through symlinks, so a link back up the tree cannot loop
        let file_type = entry.file_type().map_err(|source| LoadError::Io {
            path: path.clone(),
            source,
        })?;

        if file_type.is_dir() {
            discover_recursive(&path, found)?;
        } else if is_manifest_file(name) {
            has_manifest = true;
        } else if file_type.is_symlink() {
            debug!(path = %path.display(), "not following symlink");
        }
    }

    if has_manifest {
        found.push(dir.to_path_buf());
    }
    Ok(())
}
