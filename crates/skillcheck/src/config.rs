//! Configuration for a validation run

use std::path::PathBuf;

/// Default description limit, in characters
pub const DEFAULT_MAX_DESCRIPTION_CHARS: usize = 1024;

/// Default body limit, in lines
pub const DEFAULT_MAX_BODY_LINES: usize = 500;

/// Default reference file limit, in lines (warning only)
pub const DEFAULT_MAX_REFERENCE_LINES: usize = 500;

/// Maximum size for a SKILL.md file (10 MB)
///
/// Larger files are reported instead of being read into memory.
pub const DEFAULT_MAX_SKILL_FILE_BYTES: u64 = 10 * 1024 * 1024;

/// Settings for a [`Validator`](crate::Validator).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatorConfig {
    /// Directory whose subdirectories are skills
    pub skills_dir: PathBuf,

    /// Required value of `license`
    pub expected_license: String,

    /// Required value of `metadata.author`
    pub expected_author: String,

    /// Upper bound on the folded description length
    pub max_description_chars: usize,

    /// Upper bound on SKILL.md body lines
    pub max_body_lines: usize,

    /// Reference files above this many lines get a warning
    pub max_reference_lines: usize,

    /// SKILL.md files above this size are not parsed
    pub max_skill_file_bytes: u64,

    /// Restrict the run to these skill directory names (empty = all)
    pub only: Vec<String>,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            skills_dir: PathBuf::from("skills"),
            expected_license: "MIT".to_string(),
            expected_author: "ariessolutionsio".to_string(),
            max_description_chars: DEFAULT_MAX_DESCRIPTION_CHARS,
            max_body_lines: DEFAULT_MAX_BODY_LINES,
            max_reference_lines: DEFAULT_MAX_REFERENCE_LINES,
            max_skill_file_bytes: DEFAULT_MAX_SKILL_FILE_BYTES,
            only: Vec::new(),
        }
    }
}

impl ValidatorConfig {
    /// Configuration for the `skills/` directory under `root`
    pub fn for_root(root: impl Into<PathBuf>) -> Self {
        Self {
            skills_dir: root.into().join("skills"),
            ..Default::default()
        }
    }
}
