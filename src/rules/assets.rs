use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Answers whether an external asset path exists.
///
/// Reference rules go through this trait so they can be exercised without touching disk.
pub trait AssetResolver: Sync {
    /// `Ok(false)` when the asset is missing; `Err` when existence could not be determined.
    fn exists(&self, path: &str) -> std::io::Result<bool>;
}

/// Resolves asset paths on the local file system.
#[derive(Clone, Debug, Default)]
pub struct FsAssetResolver {
    root: Option<PathBuf>,
}

impl FsAssetResolver {
    /// Relative paths resolve against `root` (or the working directory when `None`).
    pub fn new(root: Option<PathBuf>) -> Self {
        Self { root }
    }

    /// Root directory for relative paths.
    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    fn resolve(&self, path: &str) -> PathBuf {
        let norm = normalize_asset_path(path);
        let p = Path::new(&norm);
        match &self.root {
            Some(root) if p.is_relative() => root.join(p),
            _ => p.to_path_buf(),
        }
    }
}

impl AssetResolver for FsAssetResolver {
    fn exists(&self, path: &str) -> std::io::Result<bool> {
        match std::fs::metadata(self.resolve(path)) {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }
}

/// Fixed set of known asset paths.
#[derive(Clone, Debug, Default)]
pub struct StaticAssetResolver {
    known: BTreeSet<String>,
}

impl StaticAssetResolver {
    /// Resolver that knows exactly `paths`.
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            known: paths
                .into_iter()
                .map(|p| normalize_asset_path(p.as_ref()))
                .collect(),
        }
    }
}

impl AssetResolver for StaticAssetResolver {
    fn exists(&self, path: &str) -> std::io::Result<bool> {
        Ok(self.known.contains(&normalize_asset_path(path)))
    }
}

/// Forward slashes, no empty or `.` segments. A leading `/` is kept.
pub fn normalize_asset_path(source: &str) -> String {
    let s = source.trim().replace('\\', "/");
    let absolute = s.starts_with('/');
    let parts: Vec<&str> = s
        .split('/')
        .filter(|part| !part.is_empty() && *part != ".")
        .collect();
    let joined = parts.join("/");
    if absolute {
        format!("/{joined}")
    } else {
        joined
    }
}

#[cfg(test)]
#[path = "../../tests/unit/rules/assets.rs"]
mod tests;
