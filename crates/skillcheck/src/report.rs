//! Rendering of validation results
//!
//! A [`ReportSink`] receives each skill's report as soon as the skill has
//! been checked, then the aggregate once the run completes.

use std::io::Write;

use crate::error::{Result, SkillError};
use crate::finding::{Severity, SkillReport, ValidationReport};

/// Consumer of validation results
pub trait ReportSink {
    /// Called once per skill, in traversal order
    fn skill_report(&mut self, report: &SkillReport) -> Result<()>;

    /// Called once after the last skill
    fn finish(&mut self, report: &ValidationReport) -> Result<()>;
}

/// Discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl ReportSink for NullSink {
    fn skill_report(&mut self, _report: &SkillReport) -> Result<()> {
        Ok(())
    }

    fn finish(&mut self, _report: &ValidationReport) -> Result<()> {
        Ok(())
    }
}

/// Human-readable output
///
/// Section headers, `OK:` lines and the summary go to `out`; `ERROR:` and
/// `WARN:` lines go to `err`.
#[derive(Debug)]
pub struct ConsoleReporter<O, E> {
    out: O,
    err: E,
}

impl ConsoleReporter<std::io::Stdout, std::io::Stderr> {
    /// Reporter bound to the process's stdout and stderr
    #[must_use]
    pub fn stdio() -> Self {
        Self::new(std::io::stdout(), std::io::stderr())
    }
}

impl<O: Write, E: Write> ConsoleReporter<O, E> {
    /// Reporter writing to the given streams
    pub fn new(out: O, err: E) -> Self {
        Self { out, err }
    }

    /// Recover the underlying streams
    pub fn into_inner(self) -> (O, E) {
        (self.out, self.err)
    }
}

impl<O: Write, E: Write> ReportSink for ConsoleReporter<O, E> {
    fn skill_report(&mut self, report: &SkillReport) -> Result<()> {
        writeln!(self.out, "--- {} ---", report.skill).map_err(SkillError::Render)?;
        for finding in &report.findings {
            let written = match finding.severity {
                Severity::Info => writeln!(self.out, "  {finding}"),
                Severity::Warning | Severity::Error => writeln!(self.err, "  {finding}"),
            };
            written.map_err(SkillError::Render)?;
        }
        self.out.flush().map_err(SkillError::Render)?;
        self.err.flush().map_err(SkillError::Render)
    }

    fn finish(&mut self, report: &ValidationReport) -> Result<()> {
        writeln!(self.out).map_err(SkillError::Render)?;
        let written = if report.passed() {
            writeln!(self.out, "PASSED: All skills valid")
        } else {
            writeln!(self.out, "FAILED: {} error(s) found", report.error_count())
        };
        written.map_err(SkillError::Render)?;

        let warnings = report.warning_count();
        if warnings > 0 {
            writeln!(self.out, "{warnings} warning(s)").map_err(SkillError::Render)?;
        }
        self.out.flush().map_err(SkillError::Render)
    }
}

/// Pretty-printed JSON of the whole report, written at the end
#[derive(Debug)]
pub struct JsonReporter<W> {
    out: W,
}

impl<W: Write> JsonReporter<W> {
    /// Reporter writing to `out`
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Recover the underlying writer
    pub fn into_inner(self) -> W {
        self.out
    }
}

#[derive(serde::Serialize)]
struct JsonSummary<'a> {
    passed: bool,
    errors: usize,
    warnings: usize,
    skills: &'a [SkillReport],
}

impl<W: Write> ReportSink for JsonReporter<W> {
    fn skill_report(&mut self, _report: &SkillReport) -> Result<()> {
        Ok(())
    }

    fn finish(&mut self, report: &ValidationReport) -> Result<()> {
        let summary = JsonSummary {
            passed: report.passed(),
            errors: report.error_count(),
            warnings: report.warning_count(),
            skills: &report.skills,
        };
        serde_json::to_writer_pretty(&mut self.out, &summary)?;
        writeln!(self.out).map_err(SkillError::Render)?;
        self.out.flush().map_err(SkillError::Render)
    }
}
