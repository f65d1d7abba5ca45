//! Typed SKILL.md frontmatter

use std::collections::BTreeMap;

use serde::Serialize;
use serde_yaml::{Mapping, Value};

/// Metadata from the YAML frontmatter of a SKILL.md file
///
/// Every field is optional at the type level so that an absent key becomes a
/// finding instead of a parse failure.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct SkillFrontmatter {
    /// Skill name in hyphen-case; must match the directory name
    pub name: Option<String>,

    /// What the skill does and when to use it
    ///
    /// Folded (`>`) and literal (`|`) block scalars are accepted.
    pub description: Option<String>,

    /// License identifier
    pub license: Option<String>,

    /// Nested `metadata:` block
    pub metadata: Option<SkillAuthorship>,

    /// Fields present with a value of the wrong shape, keyed by dotted path
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub malformed: BTreeMap<String, String>,
}

/// The `metadata:` block of the frontmatter
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct SkillAuthorship {
    /// Publishing organisation
    pub author: Option<String>,

    /// Semantic version of the skill (`X.Y.Z`)
    pub version: Option<String>,
}

impl SkillFrontmatter {
    /// Read the recognised fields out of a parsed YAML mapping
    ///
    /// Each field is read on its own. A sequence where a string belongs is
    /// recorded in `malformed` and leaves the other fields
    /// untouched. Unknown keys are ignored.
    #[must_use]
    pub fn from_mapping(mapping: &Mapping) -> Self {
        let mut fm = Self::default();
        fm.name = fm.scalar_field(mapping, "name", "name");
        fm.description = fm.scalar_field(mapping, "description", "description");
        fm.license = fm.scalar_field(mapping, "license", "license");

        match mapping.get("metadata") {
            None | Some(Value::Null) => {}
            Some(Value::Mapping(block)) => {
                let author = fm.scalar_field(block, "author", "metadata.author");
                let version = fm.scalar_field(block, "version", "metadata.version");
                fm.metadata = Some(SkillAuthorship { author, version });
            }
            Some(other) => {
                fm.malformed.insert(
                    "metadata".to_string(),
                    format!("expected a mapping, found {}", kind_of(other)),
                );
            }
        }
        fm
    }

    /// Why `field` could not be read, if its value had the wrong shape
    #[must_use]
    pub fn malformed(&self, field: &str) -> Option<&str> {
        self.malformed.get(field).map(String::as_str)
    }

    /// `metadata.author`, if present
    #[must_use]
    pub fn author(&self) -> Option<&str> {
        self.metadata.as_ref()?.author.as_deref()
    }

    /// `metadata.version`, if present
    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.metadata.as_ref()?.version.as_deref()
    }

    /// Description with its lines joined by single spaces
    ///
    /// Leading indentation and blank lines are dropped; spacing inside a line
    /// is kept. This is the string whose length is checked against the limit.
    #[must_use]
    pub fn folded_description(&self) -> Option<String> {
        self.description.as_deref().map(fold_lines)
    }

    fn scalar_field(&mut self, mapping: &Mapping, key: &str, path: &str) -> Option<String> {
        match mapping.get(key).map(scalar_text) {
            None => None,
            Some(Ok(text)) => text,
            Some(Err(found)) => {
                self.malformed
                    .insert(path.to_string(), format!("expected a scalar value, found {found}"));
                None
            }
        }
    }
}

/// Join the non-empty lines of `text` with single spaces
#[must_use]
pub fn fold_lines(text: &str) -> String {
    text.lines()
        .map(|line| line.trim_start().trim_end_matches('\r'))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Read any YAML scalar as text
///
/// `version: 1.0` is a float to YAML; keeping its textual form lets the
/// version check report it rather than the parser rejecting the whole file.
fn scalar_text(value: &Value) -> Result<Option<String>, &'static str> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s.clone())),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        other => Err(kind_of(other)),
    }
}

pub(crate) fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "nothing",
        Value::Bool(_) | Value::Number(_) => "a scalar",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
