//! Path utilities for root resolution and cache keys.
//!
//! Cache keys are paths relative to the working directory. A root argument
//! such as `../site/./src` is joined onto the working directory and cleaned
//! without touching the filesystem, so `..` segments are removed textually
//! and symlinks are left alone.
//!
//! File names are used exactly as the OS reports them. Two directories whose
//! names differ only in Unicode form are different directories and get
//! different keys.
//!
//! # Example
//!
//! ```
//! use pagestamp::scanner::path_utils::{cache_key, resolve_root};
//! use std::path::Path;
//!
//! let cwd = Path::new("/work/site");
//! let root = resolve_root(cwd, Some(Path::new("./app/../src")), "src");
//! assert_eq!(root, Path::new("/work/site/src"));
//!
//! let key = cache_key(Path::new("/work/site/src/blog/page.tsx"), cwd);
//! assert_eq!(key, "src/blog/page.tsx");
//! ```

use std::path::{Component, Path, PathBuf};

/// Lexically clean a path: drop `.` components and fold `..` into the
/// preceding component.
///
/// `..` directly under the root stays at the root, matching how the
/// filesystem resolves `/..`. Leading `..` on a relative path is kept.
#[must_use]
pub fn clean_path(path: &Path) -> PathBuf {
    let mut cleaned: Vec<Component<'_>> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match cleaned.last() {
                Some(Component::Normal(_)) => {
                    cleaned.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                Some(Component::ParentDir | Component::CurDir) | None => cleaned.push(component),
            },
            other => cleaned.push(other),
        }
    }

    cleaned.iter().collect()
}

/// Resolve the directory to scan.
///
/// A supplied argument is joined onto `cwd` (absolute arguments replace it)
/// and cleaned; without one the root is `cwd/default_root`.
#[must_use]
pub fn resolve_root(cwd: &Path, arg: Option<&Path>, default_root: &str) -> PathBuf {
    let joined = match arg {
        Some(arg) => cwd.join(arg),
        None => cwd.join(default_root),
    };
    clean_path(&joined)
}

/// Express `path` relative to `base`.
///
/// Both paths are cleaned first. When `path` is outside `base` the result
/// climbs with `..`. When the two share no root (different Windows drives)
/// `path` is returned unchanged.
#[must_use]
pub fn relative_to(path: &Path, base: &Path) -> PathBuf {
    let path = clean_path(path);
    let base = clean_path(base);

    let path_components: Vec<_> = path.components().collect();
    let base_components: Vec<_> = base.components().collect();

    let common = path_components
        .iter()
        .zip(&base_components)
        .take_while(|(a, b)| a == b)
        .count();

    let rooted = path.has_root() || base.has_root();
    if common == 0 && rooted {
        return path;
    }

    let mut relative = PathBuf::new();
    for _ in common..base_components.len() {
        relative.push(Component::ParentDir);
    }
    for component in &path_components[common..] {
        relative.push(component);
    }
    relative
}

/// Build the cache key for a page: its path relative to `cwd`.
///
/// Non-UTF-8 names are converted lossily.
#[must_use]
pub fn cache_key(page: &Path, cwd: &Path) -> String {
    relative_to(page, cwd).to_string_lossy().into_owned()
}
