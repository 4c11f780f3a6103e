//! Test corpus management
//!
//! Real-world profiles live under `testdata/profiles` at the workspace
//! root. The directory is not checked in; tests that need it skip when it
//! is missing.

use std::path::{Path, PathBuf};

use anyhow::Context;

/// A corpus profile and what parsing it should produce
#[derive(Debug, Clone, Copy)]
pub struct ProfileCase {
    /// Path relative to the corpus root
    pub path: &'static str,
    pub expect_parse: bool,
    /// Whether the TRCs collapse to one parametric transfer function
    pub expect_transfer_function: bool,
}

/// Known profiles and their expected parse results
pub const PROFILE_CASES: &[ProfileCase] = &[
    case("color.org/sRGB2014.icc", true, false),
    // iccMAX (version 5) profiles are rejected
    case("color.org/sRGB_D65_colorimetric.icc", false, false),
    case("color.org/sRGB_D65_MAT.icc", false, false),
    case("color.org/sRGB_ICC_v4_Appearance.icc", true, false),
    case("color.org/sRGB_ISO22028.icc", false, false),
    case("color.org/sRGB_v4_ICC_preference.icc", true, false),
    case("color.org/Lower_Left.icc", true, true),
    case("color.org/Lower_Right.icc", true, true),
    case("color.org/Upper_Left.icc", true, false),
    case("color.org/Upper_Right.icc", true, false),
    // 27-entry sRGB table
    case("sRGB_Facebook.icc", true, false),
];

const fn case(path: &'static str, expect_parse: bool, expect_transfer_function: bool) -> ProfileCase {
    ProfileCase {
        path,
        expect_parse,
        expect_transfer_function,
    }
}

/// Profiles on disk
pub struct TestCorpus {
    base_path: PathBuf,
}

impl TestCorpus {
    pub fn new(base_path: impl AsRef<Path>) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    /// `testdata/profiles` in the workspace, when it exists
    pub fn workspace() -> Option<Self> {
        let base = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../testdata/profiles");
        base.is_dir().then(|| Self::new(base))
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Read one profile
    pub fn read(&self, relative: &str) -> anyhow::Result<Vec<u8>> {
        let path = self.base_path.join(relative);
        std::fs::read(&path).with_context(|| format!("reading {}", path.display()))
    }

    /// Every `.icc` / `.icm` file under the corpus, recursively, sorted
    pub fn all_profiles(&self) -> anyhow::Result<Vec<PathBuf>> {
        let mut found = Vec::new();
        let mut pending = vec![self.base_path.clone()];
        while let Some(dir) = pending.pop() {
            for entry in std::fs::read_dir(&dir).with_context(|| format!("listing {}", dir.display()))? {
                let path = entry?.path();
                if path.is_dir() {
                    pending.push(path);
                } else if path
                    .extension()
                    .is_some_and(|e| e.eq_ignore_ascii_case("icc") || e.eq_ignore_ascii_case("icm"))
                {
                    found.push(path);
                }
            }
        }
        found.sort();
        Ok(found)
    }
}
