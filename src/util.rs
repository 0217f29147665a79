use std::iter::repeat;
use std::path::{Path, PathBuf};

pub fn find_first_subpath<P: AsRef<Path>, F: Fn(&Path) -> bool>(
    root: impl AsRef<Path>,
    subpaths: &[P],
    search: F,
) -> Option<PathBuf> {
    subpaths
        .iter()
        .zip(repeat(root.as_ref()))
        .map(|(b, a)| a.join(b))
        .find(|it: &PathBuf| search(it))
}

/// Resolves `relative` inside `root`, rejecting paths that climb out of it.
pub fn contained_path(root: impl AsRef<Path>, relative: impl AsRef<Path>) -> Option<PathBuf> {
    use std::path::Component;

    let relative = relative.as_ref();
    let escapes = relative
        .components()
        .any(|it| !matches!(it, Component::Normal(_) | Component::CurDir));
    if escapes {
        return None;
    }
    Some(root.as_ref().join(relative))
}
