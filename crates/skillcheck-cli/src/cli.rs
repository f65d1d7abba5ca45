//! CLI argument definitions for validate-skills.

use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};
use skillcheck::Validator;
use skillcheck::config::{
    DEFAULT_MAX_BODY_LINES, DEFAULT_MAX_DESCRIPTION_CHARS, DEFAULT_MAX_REFERENCE_LINES,
};

/// Validate the structure of every SKILL.md under a skills directory
#[derive(Parser, Debug)]
#[command(name = "validate-skills", version, about)]
pub struct Cli {
    /// Repository root; skills are read from ROOT/skills
    #[arg(env = "SKILLCHECK_ROOT", default_value = ".")]
    pub root: PathBuf,

    /// Read skills from this directory instead of ROOT/skills
    #[arg(long, value_name = "DIR")]
    pub skills_dir: Option<PathBuf>,

    /// Only validate the named skill (repeatable)
    #[arg(long, value_name = "NAME")]
    pub only: Vec<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Required license value
    #[arg(long, default_value = "MIT")]
    pub license: String,

    /// Required metadata.author value
    #[arg(long, default_value = "ariessolutionsio")]
    pub author: String,

    /// Maximum SKILL.md body lines
    #[arg(long, default_value_t = DEFAULT_MAX_BODY_LINES)]
    pub max_body_lines: usize,

    /// Reference files longer than this get a warning
    #[arg(long, default_value_t = DEFAULT_MAX_REFERENCE_LINES)]
    pub max_reference_lines: usize,

    /// Maximum description length in characters
    #[arg(long, default_value_t = DEFAULT_MAX_DESCRIPTION_CHARS)]
    pub max_description_chars: usize,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// How results are printed
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Per-skill sections on stdout/stderr and a summary line
    Text,
    /// One JSON document on stdout
    Json,
}

impl Cli {
    /// Build the validator these arguments describe
    pub fn validator(&self) -> skillcheck::Result<Validator> {
        let builder = match &self.skills_dir {
            Some(dir) => Validator::builder().skills_dir(dir),
            None => Validator::builder().root(&self.root),
        };

        builder
            .only(self.only.iter().cloned())
            .expected_license(&self.license)
            .expected_author(&self.author)
            .max_body_lines(self.max_body_lines)
            .max_reference_lines(self.max_reference_lines)
            .max_description_chars(self.max_description_chars)
            .build()
    }

    /// Default log filter for the chosen verbosity
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
