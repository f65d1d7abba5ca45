//! Field and size checks for a parsed SKILL.md
//!
//! Every check is independent: each one records its own findings and none of
//! them short-circuits the others.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::ValidatorConfig;
use crate::finding::{FindingKind, SkillReport};
use crate::skill::SkillFrontmatter;

/// Regex pattern for valid skill names
///
/// - Lowercase alphanumeric and hyphens, 1 to 64 characters
/// - Must start and end with alphanumeric
///
/// Consecutive hyphens are rejected separately.
static SKILL_NAME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z0-9]([a-z0-9-]{0,62}[a-z0-9])?$").expect("Failed to compile skill name regex")
});

static SEMVER_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9]+\.[0-9]+\.[0-9]+$").expect("Failed to compile semver regex")
});

/// Whether `name` matches the slug pattern (ignoring consecutive hyphens)
#[must_use]
pub fn matches_name_pattern(name: &str) -> bool {
    SKILL_NAME_PATTERN.is_match(name)
}

/// Whether `name` is a valid skill name
///
/// Valid: "skill", "my-skill", "skill-1-2".
/// Invalid: "Skill", "my_skill", "-skill", "skill-", "skill--name", "".
#[must_use]
pub fn is_valid_skill_name(name: &str) -> bool {
    matches_name_pattern(name) && !name.contains("--")
}

/// Whether `version` is plain `X.Y.Z`
#[must_use]
pub fn is_semver(version: &str) -> bool {
    SEMVER_PATTERN.is_match(version)
}

/// Run every field check against `frontmatter`
///
/// A field whose value has the wrong shape is reported as
/// [`FindingKind::InvalidField`] in place of its own check.
pub fn check_fields(
    report: &mut SkillReport,
    dir_name: &str,
    frontmatter: &SkillFrontmatter,
    config: &ValidatorConfig,
) {
    if !malformed(report, frontmatter, "name") {
        check_name(report, dir_name, frontmatter.name.as_deref());
    }
    if !malformed(report, frontmatter, "description") {
        check_description(
            report,
            frontmatter.folded_description().as_deref(),
            config.max_description_chars,
        );
    }
    if !malformed(report, frontmatter, "license") {
        check_exact(
            report,
            "license",
            frontmatter.license.as_deref(),
            &config.expected_license,
            FindingKind::InvalidLicense,
        );
    }
    malformed(report, frontmatter, "metadata");
    if !malformed(report, frontmatter, "metadata.author") {
        check_exact(
            report,
            "metadata.author",
            frontmatter.author(),
            &config.expected_author,
            FindingKind::InvalidAuthor,
        );
    }
    if !malformed(report, frontmatter, "metadata.version") {
        check_version(report, frontmatter.version());
    }
}

fn malformed(report: &mut SkillReport, frontmatter: &SkillFrontmatter, field: &str) -> bool {
    let Some(problem) = frontmatter.malformed(field) else {
        return false;
    };
    report.error(FindingKind::InvalidField, format!("{field}: {problem}"));
    true
}

/// `name`: present, equal to the directory, slug-shaped, no `--`
pub fn check_name(report: &mut SkillReport, dir_name: &str, name: Option<&str>) {
    let Some(name) = present(name) else {
        report.error(FindingKind::MissingField, "Missing required field: name");
        return;
    };

    let before = report.error_count();

    if name != dir_name {
        report.error(
            FindingKind::NameMismatch,
            format!("name '{name}' does not match directory name '{dir_name}'"),
        );
    }

    if !matches_name_pattern(name) {
        report.error(
            FindingKind::InvalidName,
            format!(
                "name '{name}' must be 1-64 lowercase alphanumeric characters or hyphens, \
                 starting and ending with a letter or digit"
            ),
        );
    }

    if name.contains("--") {
        report.error(
            FindingKind::InvalidName,
            format!("name '{name}' contains consecutive hyphens"),
        );
    }

    if report.error_count() == before {
        report.ok(format!("name: {name}"));
    }
}

/// `description`: present, non-empty, within `max_chars` characters
///
/// Length is counted in Unicode scalar values of the folded string.
pub fn check_description(report: &mut SkillReport, description: Option<&str>, max_chars: usize) {
    let Some(description) = present(description) else {
        report.error(
            FindingKind::MissingField,
            "Missing required field: description",
        );
        return;
    };

    let len = description.chars().count();
    if len > max_chars {
        report.error(
            FindingKind::DescriptionTooLong,
            format!("description is {len} characters (max {max_chars})"),
        );
    } else {
        report.ok(format!("description: {len} chars"));
    }
}

/// `license` / `metadata.author`: present and exactly `expected`
pub fn check_exact(
    report: &mut SkillReport,
    field: &str,
    value: Option<&str>,
    expected: &str,
    kind: FindingKind,
) {
    match present(value) {
        None => report.error(
            FindingKind::MissingField,
            format!("Missing required field: {field}"),
        ),
        Some(v) if v != expected => report.error(
            kind,
            format!("{field} must be '{expected}', got '{v}'"),
        ),
        Some(v) => report.ok(format!("{field}: {v}")),
    }
}

/// `metadata.version`: present and `X.Y.Z`
pub fn check_version(report: &mut SkillReport, version: Option<&str>) {
    match present(version) {
        None => report.error(
            FindingKind::MissingField,
            "Missing required field: metadata.version",
        ),
        Some(v) if !is_semver(v) => report.error(
            FindingKind::InvalidVersion,
            format!("metadata.version '{v}' is not semver (X.Y.Z)"),
        ),
        Some(v) => report.ok(format!("metadata.version: {v}")),
    }
}

/// Body line count within `max_lines`
pub fn check_body(report: &mut SkillReport, lines: usize, max_lines: usize) {
    if lines > max_lines {
        report.error(
            FindingKind::BodyTooLong,
            format!("SKILL.md body is {lines} lines (max {max_lines})"),
        );
    } else {
        report.ok(format!("body: {lines} lines"));
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
