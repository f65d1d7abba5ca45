//! Size audit for files under a skill's `references/` directory

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{Result, SkillError};
use crate::finding::{FindingKind, SkillReport};
use crate::frontmatter::count_lines;

/// A reference document and its line count
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceFile {
    /// Path relative to the skill directory, `/`-separated
    pub path: String,
    /// Number of lines
    pub lines: usize,
}

/// Discover all markdown files under `<skill_dir>/references`, sorted by path
///
/// A missing `references/` directory yields an empty list.
///
/// # Errors
///
/// Returns error if the directory or a file cannot be read.
pub async fn discover_references(skill_dir: &Path) -> Result<Vec<ReferenceFile>> {
    let ref_dir = skill_dir.join("references");
    if !tokio::fs::try_exists(&ref_dir)
        .await
        .map_err(|e| SkillError::io(&ref_dir, e))?
    {
        return Ok(Vec::new());
    }

    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in WalkDir::new(&ref_dir)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !crate::validator::is_hidden(e))
    {
        let entry = entry?;
        if entry.file_type().is_file() && entry.path().extension().is_some_and(|ext| ext == "md") {
            paths.push(entry.into_path());
        }
    }

    let mut references = Vec::with_capacity(paths.len());
    for path in paths {
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|e| SkillError::io(&path, e))?;
        let text = String::from_utf8_lossy(&bytes);
        references.push(ReferenceFile {
            path: relative_display(skill_dir, &path),
            lines: count_lines(&text),
        });
    }

    Ok(references)
}

/// Warn about every reference file longer than `max_lines`
///
/// Never records an error. Returns the number of files audited.
///
/// # Errors
///
/// Returns error if the reference files cannot be read.
pub async fn audit_references(
    report: &mut SkillReport,
    skill_dir: &Path,
    max_lines: usize,
) -> Result<usize> {
    let references = discover_references(skill_dir).await?;

    for reference in &references {
        if reference.lines > max_lines {
            report.warn(
                FindingKind::ReferenceTooLong,
                format!(
                    "{} is {} lines (recommended max {max_lines})",
                    reference.path, reference.lines
                ),
            );
        }
    }

    Ok(references.len())
}

fn relative_display(base: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(base).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
