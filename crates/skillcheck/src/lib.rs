#![deny(unsafe_code)]

//! # skillcheck
//!
//! Structural validation for a corpus of `SKILL.md` documentation files.
//!
//! ## Overview
//!
//! A corpus is a `skills/` directory whose subdirectories each hold one
//! skill:
//!
//! ```text
//! skills/
//!   product-modeling/
//!     SKILL.md
//!     references/
//!       attributes.md
//! ```
//!
//! For every skill the validator checks:
//! - the frontmatter delimiters and YAML
//! - `name`, `description`, `license`, `metadata.author`, `metadata.version`
//! - the body line count
//! - `references/*.md` and `../<skill>/SKILL.md` links
//! - the size of each reference file (warning only)
//!
//! ## Quick Start
//!
//! ```no_run
//! use skillcheck::{ConsoleReporter, Validator};
//!
//! #[tokio::main]
//! async fn main() -> skillcheck::Result<()> {
//!     let validator = Validator::builder().root(".").build()?;
//!     let report = validator.run(&mut ConsoleReporter::stdio()).await?;
//!     std::process::exit(report.exit_code());
//! }
//! ```
//!
//! ## SKILL.md Format
//!
//! ```yaml
//! ---
//! name: skill-name
//! description: >
//!   What the skill does and when to use it
//! license: MIT
//! metadata:
//!   author: ariessolutionsio
//!   version: "1.0.0"
//! ---
//!
//! # Markdown Body
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

mod error;
mod finding;
mod skill;

pub mod config;
pub mod frontmatter;
pub mod links;
pub mod references;
pub mod report;
pub mod validation;
pub mod validator;

// Re-exports
pub use config::ValidatorConfig;
pub use error::{Result, SkillError};
pub use finding::{Finding, FindingKind, Severity, SkillReport, ValidationReport};
pub use report::{ConsoleReporter, JsonReporter, NullSink, ReportSink};
pub use skill::{SkillAuthorship, SkillFrontmatter};
pub use validator::{Validator, ValidatorBuilder};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        ConsoleReporter, Finding, FindingKind, ReportSink, Result, Severity, SkillError,
        SkillReport, ValidationReport, Validator, ValidatorConfig,
    };
}
