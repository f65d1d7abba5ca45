//! Validation run orchestration

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::ValidatorConfig;
use crate::error::{Result, SkillError};
use crate::finding::{FindingKind, SkillReport, ValidationReport};
use crate::frontmatter::{FrontmatterError, count_lines, parse_metadata, split_frontmatter};
use crate::links::check_links;
use crate::references::audit_references;
use crate::report::{NullSink, ReportSink};
use crate::validation::{check_body, check_fields};

/// Validates every skill under a skills directory
///
/// Skills are processed one at a time, in lexical order of their directory
/// names. A structural problem in one skill never stops the others; only an
/// unexpected I/O failure aborts the run.
#[derive(Debug, Clone)]
pub struct Validator {
    config: ValidatorConfig,
}

impl Validator {
    /// Create a new builder for configuring the validator
    #[must_use]
    pub fn builder() -> ValidatorBuilder {
        ValidatorBuilder::default()
    }

    /// Create a validator from a complete configuration
    #[must_use]
    pub fn new(config: ValidatorConfig) -> Self {
        Self { config }
    }

    /// Active configuration
    #[must_use]
    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Skill directories this run will visit, in order
    ///
    /// # Errors
    ///
    /// Returns error if the skills directory is missing or unreadable.
    pub async fn skill_dirs(&self) -> Result<Vec<PathBuf>> {
        let dir = &self.config.skills_dir;
        let meta = tokio::fs::metadata(dir).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SkillError::invalid_directory(format!("Directory does not exist: {}", dir.display()))
            } else {
                SkillError::io(dir, e)
            }
        })?;
        if !meta.is_dir() {
            return Err(SkillError::invalid_directory(format!(
                "Not a directory: {}",
                dir.display()
            )));
        }

        if !self.config.only.is_empty() {
            let names: BTreeSet<&str> = self.config.only.iter().map(String::as_str).collect();
            return Ok(names.into_iter().map(|n| dir.join(n)).collect());
        }

        let mut dirs = Vec::new();
        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e))
        {
            let entry = entry?;
            if is_skill_dir(entry.path()).await? {
                dirs.push(entry.into_path());
            }
        }
        Ok(dirs)
    }

    /// Validate all skills, discarding per-skill output
    ///
    /// # Errors
    ///
    /// Returns error on unexpected I/O failure.
    pub async fn validate_all(&self) -> Result<ValidationReport> {
        self.run(&mut NullSink).await
    }

    /// Validate all skills, streaming each skill's report to `sink`
    ///
    /// # Errors
    ///
    /// Returns error on unexpected I/O failure or if the sink fails.
    pub async fn run(&self, sink: &mut dyn ReportSink) -> Result<ValidationReport> {
        let dirs = self.skill_dirs().await?;
        tracing::info!(
            skills_dir = %self.config.skills_dir.display(),
            count = dirs.len(),
            "validating skills"
        );

        let mut report = ValidationReport::default();
        for dir in dirs {
            let skill = self.validate_skill(&dir).await?;
            sink.skill_report(&skill)?;
            report.skills.push(skill);
        }

        tracing::info!(
            errors = report.error_count(),
            warnings = report.warning_count(),
            "validation finished"
        );
        sink.finish(&report)?;
        Ok(report)
    }

    /// Validate a single skill directory
    ///
    /// # Errors
    ///
    /// Returns error on unexpected I/O failure. Problems with the skill itself
    /// are findings in the returned report.
    pub async fn validate_skill(&self, skill_dir: &Path) -> Result<SkillReport> {
        let name = skill_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| {
                SkillError::invalid_directory(format!(
                    "cannot determine directory name of {}",
                    skill_dir.display()
                ))
            })?;
        let mut report = SkillReport::new(&name);
        tracing::debug!(skill = %name, "validating skill");

        let Some(content) = self.read_skill_file(&mut report, skill_dir).await? else {
            return Ok(structural_failure(report));
        };

        let frontmatter = match split_frontmatter(&content) {
            Ok(fm) => fm,
            Err(e) => {
                let kind = match e {
                    FrontmatterError::MissingOpening => FindingKind::MissingOpeningDelimiter,
                    FrontmatterError::MissingClosing => FindingKind::MissingClosingDelimiter,
                };
                report.error(kind, e.to_string());
                return Ok(structural_failure(report));
            }
        };

        let metadata = match parse_metadata(frontmatter.yaml) {
            Ok(metadata) => metadata,
            Err(e) => {
                report.error(FindingKind::InvalidFrontmatter, e.to_string());
                return Ok(structural_failure(report));
            }
        };

        check_fields(&mut report, &name, &metadata, &self.config);
        check_body(
            &mut report,
            count_lines(frontmatter.body),
            self.config.max_body_lines,
        );
        check_links(&mut report, skill_dir, frontmatter.body).await?;
        audit_references(&mut report, skill_dir, self.config.max_reference_lines).await?;

        tracing::debug!(
            skill = %name,
            errors = report.error_count(),
            warnings = report.warning_count(),
            "skill checked"
        );
        Ok(report)
    }

    /// Read SKILL.md, recording a structural finding instead when it cannot be used
    async fn read_skill_file(
        &self,
        report: &mut SkillReport,
        skill_dir: &Path,
    ) -> Result<Option<String>> {
        let path = skill_dir.join("SKILL.md");

        let meta = match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => meta,
            Ok(_) => {
                report.error(FindingKind::MissingSkillFile, "SKILL.md is not a file");
                return Ok(None);
            }
            Err(e)
                if matches!(
                    e.kind(),
                    std::io::ErrorKind::NotFound | std::io::ErrorKind::NotADirectory
                ) =>
            {
                report.error(FindingKind::MissingSkillFile, "Missing SKILL.md");
                return Ok(None);
            }
            Err(e) => return Err(SkillError::io(&path, e)),
        };

        if meta.len() > self.config.max_skill_file_bytes {
            report.error(
                FindingKind::SkillFileTooLarge,
                format!(
                    "SKILL.md is too large ({} bytes, max {} bytes)",
                    meta.len(),
                    self.config.max_skill_file_bytes
                ),
            );
            return Ok(None);
        }

        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|e| SkillError::io(&path, e))?;
        match String::from_utf8(bytes) {
            Ok(content) => Ok(Some(content)),
            Err(_) => {
                report.error(FindingKind::UnreadableSkillFile, "SKILL.md is not valid UTF-8");
                Ok(None)
            }
        }
    }
}

/// Whether `path` is a directory, following symlinks
///
/// A dangling symlink is not a skill directory; any other stat failure is an
/// error.
async fn is_skill_dir(path: &Path) -> Result<bool> {
    match tokio::fs::metadata(path).await {
        Ok(meta) => Ok(meta.is_dir()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(SkillError::io(path, e)),
    }
}

fn structural_failure(report: SkillReport) -> SkillReport {
    debug_assert!(report.findings.iter().any(|f| f.kind.is_structural()));
    tracing::debug!(skill = %report.skill, "skipping remaining checks");
    report
}

/// Builder for configuring a [`Validator`]
#[derive(Debug, Default)]
pub struct ValidatorBuilder {
    skills_dir: Option<PathBuf>,
    config: ValidatorConfig,
}

impl ValidatorBuilder {
    /// Repository root; skills are read from `<root>/skills`
    #[must_use]
    pub fn root(mut self, root: impl Into<PathBuf>) -> Self {
        self.skills_dir = Some(root.into().join("skills"));
        self
    }

    /// Skills directory, used as-is
    #[must_use]
    pub fn skills_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.skills_dir = Some(dir.into());
        self
    }

    /// Required `license` value (default: `MIT`)
    #[must_use]
    pub fn expected_license(mut self, license: impl Into<String>) -> Self {
        self.config.expected_license = license.into();
        self
    }

    /// Required `metadata.author` value (default: `ariessolutionsio`)
    #[must_use]
    pub fn expected_author(mut self, author: impl Into<String>) -> Self {
        self.config.expected_author = author.into();
        self
    }

    /// Description limit in characters (default: 1024)
    #[must_use]
    pub fn max_description_chars(mut self, max: usize) -> Self {
        self.config.max_description_chars = max;
        self
    }

    /// Body limit in lines (default: 500)
    #[must_use]
    pub fn max_body_lines(mut self, max: usize) -> Self {
        self.config.max_body_lines = max;
        self
    }

    /// Reference warning threshold in lines (default: 500)
    #[must_use]
    pub fn max_reference_lines(mut self, max: usize) -> Self {
        self.config.max_reference_lines = max;
        self
    }

    /// SKILL.md size cap in bytes (default: 10 MB)
    #[must_use]
    pub fn max_skill_file_bytes(mut self, max: u64) -> Self {
        self.config.max_skill_file_bytes = max;
        self
    }

    /// Only validate these skill directory names
    #[must_use]
    pub fn only<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.only.extend(names.into_iter().map(Into::into));
        self
    }

    /// Build the validator
    ///
    /// # Errors
    ///
    /// Returns error if no root or skills directory was configured.
    pub fn build(self) -> Result<Validator> {
        let skills_dir = self
            .skills_dir
            .ok_or_else(|| SkillError::invalid_directory("No skills directory configured"))?;

        Ok(Validator::new(ValidatorConfig {
            skills_dir,
            ..self.config
        }))
    }
}

/// Check if a directory entry should be skipped (hidden files/dirs)
pub(crate) fn is_hidden(entry: &walkdir::DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|s| s.starts_with('.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_requires_skills_dir() {
        assert!(Validator::builder().build().is_err());
    }

    #[test]
    fn test_builder_root_appends_skills() {
        let validator = Validator::builder()
            .root("/repo")
            .expected_author("someone")
            .max_body_lines(10)
            .only(["a", "b"])
            .build()
            .unwrap();

        let config = validator.config();
        assert_eq!(config.skills_dir, PathBuf::from("/repo/skills"));
        assert_eq!(config.expected_author, "someone");
        assert_eq!(config.expected_license, "MIT");
        assert_eq!(config.max_body_lines, 10);
        assert_eq!(config.only, vec!["a", "b"]);
    }

    #[test]
    fn test_builder_last_directory_wins() {
        let validator = Validator::builder()
            .root("/repo")
            .skills_dir("/elsewhere")
            .build()
            .unwrap();
        assert_eq!(validator.config().skills_dir, PathBuf::from("/elsewhere"));
    }

    #[tokio::test]
    async fn test_skill_dirs_sorted_and_filtered() {
        let temp = tempfile::tempdir().unwrap();
        for name in ["zeta", "alpha", ".hidden", "mid"] {
            std::fs::create_dir(temp.path().join(name)).unwrap();
        }
        std::fs::write(temp.path().join("README.md"), "x").unwrap();

        let validator = Validator::builder().skills_dir(temp.path()).build().unwrap();
        let dirs = validator.skill_dirs().await.unwrap();
        let names: Vec<_> = dirs
            .iter()
            .map(|d| d.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, vec!["alpha", "mid", "zeta"]);
    }

    #[tokio::test]
    async fn test_skill_dirs_missing_root() {
        let temp = tempfile::tempdir().unwrap();
        let validator = Validator::builder()
            .skills_dir(temp.path().join("absent"))
            .build()
            .unwrap();
        let err = validator.skill_dirs().await.unwrap_err();
        assert!(matches!(err, SkillError::InvalidDirectory(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_skill_dirs_symlinks() {
        let temp = tempfile::tempdir().unwrap();
        let target = tempfile::tempdir().unwrap();
        std::os::unix::fs::symlink(target.path(), temp.path().join("linked")).unwrap();
        std::os::unix::fs::symlink(temp.path().join("gone"), temp.path().join("dangling"))
            .unwrap();

        let validator = Validator::builder().skills_dir(temp.path()).build().unwrap();
        let dirs = validator.skill_dirs().await.unwrap();
        assert_eq!(dirs, vec![temp.path().join("linked")]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_skill_dirs_stat_failure_is_fatal() {
        let temp = tempfile::tempdir().unwrap();
        // A symlink loop cannot be resolved; stat fails with something other than NotFound
        let looped = temp.path().join("looped");
        std::os::unix::fs::symlink(&looped, &looped).unwrap();

        let validator = Validator::builder().skills_dir(temp.path()).build().unwrap();
        let err = validator.skill_dirs().await.unwrap_err();
        assert!(matches!(err, SkillError::Io { .. }), "{err:?}");
    }

    #[tokio::test]
    async fn test_oversized_skill_file() {
        let temp = tempfile::tempdir().unwrap();
        let dir = temp.path().join("big");
        std::fs::create_dir(&dir).unwrap();
        std::fs::write(dir.join("SKILL.md"), "---\nname: big\n---\n".repeat(4)).unwrap();

        let validator = Validator::builder()
            .skills_dir(temp.path())
            .max_skill_file_bytes(8)
            .build()
            .unwrap();
        let report = validator.validate_skill(&dir).await.unwrap();

        assert_eq!(report.error_count(), 1);
        assert_eq!(report.of_kind(FindingKind::SkillFileTooLarge).count(), 1);
    }

    #[tokio::test]
    async fn test_non_utf8_skill_file() {
        let temp = tempfile::tempdir().unwrap();
        let dir = temp.path().join("binary");
        std::fs::create_dir(&dir).unwrap();
        std::fs::write(dir.join("SKILL.md"), [0xff_u8, 0xfe, 0x00]).unwrap();

        let validator = Validator::builder().skills_dir(temp.path()).build().unwrap();
        let report = validator.validate_skill(&dir).await.unwrap();
        assert_eq!(report.of_kind(FindingKind::UnreadableSkillFile).count(), 1);
    }
}
