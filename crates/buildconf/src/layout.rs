//! Build output directory redirection
//!
//! The Flutter project keeps one shared build tree two levels above the
//! Android project root (`../../build`) instead of each Gradle project's
//! local `build/` directory. Per-subproject directories are a pure function
//! of the redirected root and the sub-project name.

use serde::Serialize;
use std::path::{Path, PathBuf};

/// Default redirect, relative to the Android project root
pub const DEFAULT_BUILD_DIR: &str = "../../build";

/// The redirected build output tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildLayout {
    root_build_dir: PathBuf,
}

impl BuildLayout {
    /// Compute the redirected root build directory once.
    ///
    /// `..` components are kept lexically; the OS resolves them, matching
    /// Gradle's `buildDirectory.dir("../../build")`.
    pub fn redirect(project_root: &Path, relative: &str) -> Self {
        Self {
            root_build_dir: project_root.join(relative),
        }
    }

    /// The root of the redirected build tree
    pub fn root_build_dir(&self) -> &Path {
        &self.root_build_dir
    }

    /// Output directory for a sub-project: `<root_build_dir>/<name>`
    pub fn subproject_dir(&self, name: &str) -> PathBuf {
        self.root_build_dir.join(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subproject_dir_appends_name() {
        let layout = BuildLayout {
            root_build_dir: PathBuf::from("build"),
        };
        assert_eq!(layout.subproject_dir("app"), PathBuf::from("build/app"));
    }

    #[test]
    fn test_redirect_joins_relative_path() {
        let layout = BuildLayout::redirect(Path::new("/repo/android"), DEFAULT_BUILD_DIR);
        assert_eq!(
            layout.root_build_dir(),
            Path::new("/repo/android/../../build")
        );
    }

    #[test]
    fn test_derivation_is_pure() {
        let layout = BuildLayout::redirect(Path::new("android"), "out");
        assert_eq!(layout.subproject_dir("app"), layout.subproject_dir("app"));
        assert_eq!(layout.subproject_dir("app"), Path::new("android/out/app"));
    }
}
