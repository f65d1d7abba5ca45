//! Validation findings and aggregated reports

use serde::Serialize;
use std::fmt;

/// How much a finding matters
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// A check passed; informational only
    Info,
    /// Reported but never fails the run
    Warning,
    /// Counts toward the error total
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Info => "OK",
            Self::Warning => "WARN",
            Self::Error => "ERROR",
        })
    }
}

/// Which rule produced a finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FindingKind {
    // Structural (fatal for the skill)
    /// Skill directory has no SKILL.md
    MissingSkillFile,
    /// SKILL.md does not start with `---`
    MissingOpeningDelimiter,
    /// SKILL.md has no closing `---`
    MissingClosingDelimiter,
    /// Frontmatter is not a mapping of fields
    InvalidFrontmatter,
    /// SKILL.md is not UTF-8 text
    UnreadableSkillFile,
    /// SKILL.md exceeds the byte cap
    SkillFileTooLarge,

    // Fields
    /// Required field absent or empty
    MissingField,
    /// Field present with a value of the wrong shape
    InvalidField,
    /// `name` breaks the slug pattern
    InvalidName,
    /// `name` differs from the directory name
    NameMismatch,
    /// Folded description over the character limit
    DescriptionTooLong,
    /// `license` is not the expected value
    InvalidLicense,
    /// `metadata.author` is not the expected value
    InvalidAuthor,
    /// `metadata.version` is not `X.Y.Z`
    InvalidVersion,

    // Sizes
    /// Body over the line limit
    BodyTooLong,
    /// Reference file over the line limit
    ReferenceTooLong,

    // Links
    /// `references/*.md` target missing
    BrokenReference,
    /// `../<skill>/SKILL.md` target missing
    BrokenCrossReference,

    /// A passing check
    Passed,
}

impl FindingKind {
    /// Whether this kind stops the remaining checks for its skill
    #[must_use]
    pub fn is_structural(self) -> bool {
        matches!(
            self,
            Self::MissingSkillFile
                | Self::MissingOpeningDelimiter
                | Self::MissingClosingDelimiter
                | Self::InvalidFrontmatter
                | Self::UnreadableSkillFile
                | Self::SkillFileTooLarge
        )
    }
}

/// One outcome of one check against one skill
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    /// Skill directory name
    pub skill: String,
    /// Severity
    pub severity: Severity,
    /// Rule that produced it
    pub kind: FindingKind,
    /// Human-readable message
    pub message: String,
}

impl Finding {
    /// Create a finding
    pub fn new(
        skill: impl Into<String>,
        severity: Severity,
        kind: FindingKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            skill: skill.into(),
            severity,
            kind,
            message: message.into(),
        }
    }

    /// Whether this finding counts as an error
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.message)
    }
}

/// Findings for a single skill, in the order they were produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkillReport {
    /// Skill directory name
    pub skill: String,
    /// All findings, including passing checks
    pub findings: Vec<Finding>,
}

impl SkillReport {
    /// Start an empty report for `skill`
    pub fn new(skill: impl Into<String>) -> Self {
        Self {
            skill: skill.into(),
            findings: Vec::new(),
        }
    }

    /// Record an error
    pub fn error(&mut self, kind: FindingKind, message: impl Into<String>) {
        self.push(Severity::Error, kind, message);
    }

    /// Record a warning
    pub fn warn(&mut self, kind: FindingKind, message: impl Into<String>) {
        self.push(Severity::Warning, kind, message);
    }

    /// Record a passing check
    pub fn ok(&mut self, message: impl Into<String>) {
        self.push(Severity::Info, FindingKind::Passed, message);
    }

    fn push(&mut self, severity: Severity, kind: FindingKind, message: impl Into<String>) {
        self.findings
            .push(Finding::new(self.skill.clone(), severity, kind, message));
    }

    /// Number of errors
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    /// Number of warnings
    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    /// Findings of the given kind
    pub fn of_kind(&self, kind: FindingKind) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(move |f| f.kind == kind)
    }

    fn count(&self, severity: Severity) -> usize {
        self.findings
            .iter()
            .filter(|f| f.severity == severity)
            .count()
    }
}

/// Result of validating a whole skills directory
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    /// Per-skill reports in traversal order
    pub skills: Vec<SkillReport>,
}

impl ValidationReport {
    /// Total errors across all skills
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.skills.iter().map(SkillReport::error_count).sum()
    }

    /// Total warnings across all skills
    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.skills.iter().map(SkillReport::warning_count).sum()
    }

    /// `true` when no errors were found; warnings are ignored
    #[must_use]
    pub fn passed(&self) -> bool {
        self.error_count() == 0
    }

    /// Process exit code: 0 on pass, 1 otherwise
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        i32::from(!self.passed())
    }

    /// Report for a skill by directory name
    #[must_use]
    pub fn skill(&self, name: &str) -> Option<&SkillReport> {
        self.skills.iter().find(|s| s.skill == name)
    }

    /// Every error and warning, in order
    pub fn problems(&self) -> impl Iterator<Item = &Finding> {
        self.skills
            .iter()
            .flat_map(|s| s.findings.iter())
            .filter(|f| f.severity != Severity::Info)
    }
}
