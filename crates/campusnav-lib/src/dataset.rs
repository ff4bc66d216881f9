use std::env;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use tracing::{info, warn};

use crate::config::CostModel;
use crate::directory::CampusDirectory;
use crate::error::{Error, Result};
use crate::store::CampusGraphStore;

/// Environment variable pointing at the campus data root.
pub const DATA_DIR_ENV: &str = "CAMPUSNAV_DATA_DIR";

/// Campus graphs and access points loaded from one data root.
#[derive(Debug, Clone)]
pub struct CampusDataset {
    pub root: PathBuf,
    pub store: CampusGraphStore,
    pub directory: CampusDirectory,
}

impl CampusDataset {
    /// Load every campus under `root` plus its campus directory.
    pub fn load(root: &Path, cost: &CostModel) -> Result<Self> {
        let store = CampusGraphStore::load(root, cost)?;
        let directory = CampusDirectory::load(root)?;
        let dangling = directory.check_against(&store);
        if dangling > 0 {
            warn!(
                dangling,
                "campus directory has references missing from the loaded graphs"
            );
        }
        info!(
            root = %root.display(),
            campuses = store.len(),
            nodes = store.total_nodes(),
            "campus dataset ready"
        );
        Ok(Self {
            root: root.to_path_buf(),
            store,
            directory,
        })
    }
}

/// Resolve the default data root using platform-specific project directories.
pub fn default_data_dir() -> Result<PathBuf> {
    let dirs = ProjectDirs::from("com", "campusnav", "campusnav")
        .ok_or(Error::ProjectDirsUnavailable)?;
    Ok(normalize_data_dir(dirs.data_dir()).join("campus"))
}

/// Locate the campus data root.
///
/// Resolution order:
/// 1. Explicit `target` argument when provided.
/// 2. `CAMPUSNAV_DATA_DIR` environment variable.
/// 3. Platform-specific project data directory.
///
/// Fails with [`Error::DataDirNotFound`] when the resolved path is not a directory.
pub fn resolve_data_dir(target: Option<&Path>) -> Result<PathBuf> {
    let resolved = match target {
        Some(explicit) => explicit.to_path_buf(),
        None => match env::var_os(DATA_DIR_ENV) {
            Some(env_path) if !env_path.is_empty() => PathBuf::from(env_path),
            _ => default_data_dir()?,
        },
    };
    if !resolved.is_dir() {
        return Err(Error::DataDirNotFound { path: resolved });
    }
    Ok(resolved)
}

/// Resolve the data root and load it.
pub fn ensure_dataset(target: Option<&Path>, cost: &CostModel) -> Result<CampusDataset> {
    let root = resolve_data_dir(target)?;
    CampusDataset::load(&root, cost)
}

fn normalize_data_dir(path: &Path) -> PathBuf {
    #[cfg(windows)]
    {
        normalize_windows_data_dir(path)
    }
    #[cfg(not(windows))]
    {
        path.to_path_buf()
    }
}

#[cfg(windows)]
/// Upper bound on collapse passes for pathological inputs.
const MAX_NORMALIZATION_ITERATIONS: usize = 100;

#[cfg(windows)]
/// Collapse repeated directory names such as
/// `%APPDATA%\campusnav\campusnav\data` into `%APPDATA%\campusnav\data`.
fn normalize_windows_data_dir(path: &Path) -> PathBuf {
    use std::ffi::OsStr;

    fn same_name(a: &OsStr, b: &OsStr) -> bool {
        a.to_string_lossy()
            .eq_ignore_ascii_case(&b.to_string_lossy())
    }

    fn collapse_once(current: &Path) -> Option<PathBuf> {
        let parent = current.parent()?;
        let grandparent = parent.parent()?;
        if !same_name(parent.file_name()?, grandparent.file_name()?) {
            return None;
        }
        let mut base = grandparent.to_path_buf();
        if let Some(file_name) = current.file_name() {
            base.push(file_name);
        }
        Some(base)
    }

    let mut current = path.to_path_buf();
    for _ in 0..MAX_NORMALIZATION_ITERATIONS {
        match collapse_once(&current) {
            Some(next) if next != current => current = next,
            _ => break,
        }
    }
    current
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn explicit_directory_wins() {
        let dir = tempdir().unwrap();
        let resolved = resolve_data_dir(Some(dir.path())).unwrap();
        assert_eq!(resolved, dir.path());
    }

    #[test]
    fn missing_directory_is_reported() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nowhere");
        let err = resolve_data_dir(Some(&missing)).unwrap_err();
        assert!(matches!(err, Error::DataDirNotFound { path } if path == missing));
    }

    #[cfg(windows)]
    mod windows {
        use super::super::normalize_windows_data_dir;
        use std::path::PathBuf;

        #[test]
        fn collapses_duplicate_segments() {
            let input = PathBuf::from(r"C:\Users\nav\AppData\Roaming\campusnav\campusnav\data");
            let expected = PathBuf::from(r"C:\Users\nav\AppData\Roaming\campusnav\data");
            assert_eq!(normalize_windows_data_dir(&input), expected);
        }

        #[test]
        fn preserves_already_normalized_paths() {
            let input = PathBuf::from(r"C:\Users\nav\AppData\Roaming\campusnav\data");
            assert_eq!(normalize_windows_data_dir(&input), input);
        }
    }
}
