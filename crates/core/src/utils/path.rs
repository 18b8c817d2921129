use std::path::{Component, Path, PathBuf};

/// Join `path` onto `base` (unless already absolute) and fold `.`/`..`
/// components without touching the filesystem.
pub fn absolutize(base: &Path, path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    };
    normalize(&joined)
}

/// Lexically normalize a path
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}

/// Render a path with forward slashes, as archive entry names require
pub fn to_archive_name(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
