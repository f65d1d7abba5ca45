//! Relative link extraction and resolution
//!
//! Two link shapes are recognised in a SKILL.md body:
//! - `references/<path>.md`, resolved against the skill directory
//! - `../<skill>/SKILL.md`, resolved against the skills directory

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;
use std::path::Path;

use crate::error::{Result, SkillError};
use crate::finding::{FindingKind, SkillReport};

// The leading group keeps `../other/references/x.md` and URLs from matching
// as a local reference.
static REFERENCE_LINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)(?:^|[^A-Za-z0-9_./-])(?:\./)?(references/[A-Za-z0-9_./-]*\.md)")
        .expect("Failed to compile reference link regex")
});

static CROSS_REFERENCE_LINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\.\./[A-Za-z0-9_.-]+/SKILL\.md").expect("Failed to compile cross-reference regex")
});

/// Distinct links found in a body, sorted
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Links {
    /// `references/...md` links
    pub references: BTreeSet<String>,
    /// `../<skill>/SKILL.md` links
    pub cross_references: BTreeSet<String>,
}

impl Links {
    /// Total distinct links
    #[must_use]
    pub fn len(&self) -> usize {
        self.references.len() + self.cross_references.len()
    }

    /// `true` if no links were found
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Collect the distinct reference and cross-reference links in `body`
///
/// Matching is case-sensitive; `References/x.md` is not a reference link.
#[must_use]
pub fn extract_links(body: &str) -> Links {
    let references = REFERENCE_LINK
        .captures_iter(body)
        .filter_map(|caps| caps.get(1))
        .filter(|m| !continues_word(body, m.end()))
        .map(|m| m.as_str().to_string())
        .collect();

    let cross_references = CROSS_REFERENCE_LINK
        .find_iter(body)
        .map(|m| m.as_str().to_string())
        .collect();

    Links {
        references,
        cross_references,
    }
}

/// Verify every link in `body` against the filesystem
///
/// Records one error per missing target and an informational count of the
/// distinct links checked. Returns that count.
///
/// # Errors
///
/// Returns an I/O error if a target's existence cannot be determined.
pub async fn check_links(report: &mut SkillReport, skill_dir: &Path, body: &str) -> Result<usize> {
    let links = extract_links(body);

    for link in &links.references {
        let target = skill_dir.join(link);
        tracing::debug!(skill = %report.skill, link = %link, "checking reference link");
        if !file_exists(&target).await? {
            report.error(
                FindingKind::BrokenReference,
                format!("Broken reference link: {link} (file not found)"),
            );
        }
    }

    for link in &links.cross_references {
        let target = skill_dir.join(link);
        tracing::debug!(skill = %report.skill, link = %link, "checking cross-reference");
        if !file_exists(&target).await? {
            report.error(
                FindingKind::BrokenCrossReference,
                format!("Broken cross-reference: {link} (skill not found)"),
            );
        }
    }

    let count = links.len();
    report.ok(format!("Checked {count} link(s)"));
    Ok(count)
}

/// `true` if `path` is an existing regular file
pub(crate) async fn file_exists(path: &Path) -> Result<bool> {
    match tokio::fs::metadata(path).await {
        Ok(meta) => Ok(meta.is_file()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        // A missing intermediate directory also means the target is absent
        Err(e) if e.kind() == std::io::ErrorKind::NotADirectory => Ok(false),
        Err(e) => Err(SkillError::io(path, e)),
    }
}

fn continues_word(text: &str, end: usize) -> bool {
    text[end..]
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_')
}
