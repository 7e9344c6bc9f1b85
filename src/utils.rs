use std::path::{Component, Path, PathBuf};

/// Collapses `.` and `..` segments without touching the filesystem, so
/// relative Kustomize references can be compared against staged paths.
pub fn normalize_path(source: &Path) -> PathBuf {
    let mut new_path = PathBuf::new();

    for component in source.components() {
        match component {
            Component::CurDir => {}

            Component::ParentDir => {
                new_path.pop();
            }

            other => new_path.push(other.as_os_str()),
        }
    }

    new_path
}

/// Resolves a `resources:` entry relative to the directory that declares it.
pub fn resolve_reference(dir: &Path, reference: &str) -> PathBuf {
    normalize_path(&dir.join(reference))
}
