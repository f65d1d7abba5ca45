//! SKILL.md frontmatter splitting and parsing

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_yaml::Value;
use thiserror::Error;

use crate::skill::{SkillAuthorship, SkillFrontmatter, kind_of};

/// Top-level key: a lowercase letter at column 0, then `key:`
static TOP_LEVEL_KEY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([a-z][A-Za-z0-9_-]*):(.*)$").expect("Failed to compile top-level key regex")
});

/// Indented `author:` / `version:` inside a `metadata:` block
static METADATA_KEY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[ \t]+(author|version):(.*)$").expect("Failed to compile metadata key regex")
});

/// Structural problems with the frontmatter delimiters
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum FrontmatterError {
    /// First line is not `---`
    #[error("Missing opening frontmatter delimiter (---) on line 1")]
    MissingOpening,

    /// No later line is `---`
    #[error("Missing closing frontmatter delimiter (---)")]
    MissingClosing,
}

/// Frontmatter that parses but is not a set of fields
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("Frontmatter must be a mapping of fields, found {found}")]
pub struct MetadataError {
    /// Shape of what was found instead
    pub found: &'static str,
}

/// A SKILL.md split at its frontmatter delimiters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frontmatter<'a> {
    /// Text between the two delimiter lines
    pub yaml: &'a str,

    /// Everything after the closing delimiter line
    pub body: &'a str,

    /// 1-based line number of the closing delimiter
    pub closing_line: usize,
}

/// Split a SKILL.md into frontmatter and body
///
/// Expected format:
/// ```yaml
/// ---
/// name: skill-name
/// description: Description here
/// ---
///
/// # Markdown body
/// ```
///
/// # Errors
///
/// Returns [`FrontmatterError::MissingOpening`] when line 1 is not exactly
/// `---`, and [`FrontmatterError::MissingClosing`] when no later line is.
///
/// # Notes
///
/// - Only the first two delimiter lines are frontmatter boundaries; later
///   `---` lines (horizontal rules) stay in the body
/// - A trailing `\r` on a delimiter line is ignored
pub fn split_frontmatter(content: &str) -> Result<Frontmatter<'_>, FrontmatterError> {
    let mut lines = content.split_inclusive('\n');

    let first = lines.next().ok_or(FrontmatterError::MissingOpening)?;
    if !is_delimiter(first) {
        return Err(FrontmatterError::MissingOpening);
    }

    let yaml_start = first.len();
    let mut offset = yaml_start;

    for (idx, line) in lines.enumerate() {
        if is_delimiter(line) {
            return Ok(Frontmatter {
                yaml: &content[yaml_start..offset],
                body: &content[offset + line.len()..],
                closing_line: idx + 2,
            });
        }
        offset += line.len();
    }

    Err(FrontmatterError::MissingClosing)
}

/// Parse the YAML between the delimiters
///
/// An empty block parses to a frontmatter with every field absent. Leading
/// tabs are read as two-space indentation, since hand-written `metadata:`
/// blocks use either.
///
/// Hand-written frontmatter is not always strict YAML: an unquoted
/// `description: Use when: ...` is a syntax error to a YAML parser. When the
/// block does not parse, fields are read line by line instead (see
/// [`read_fields_by_line`]).
///
/// # Errors
///
/// Returns [`MetadataError`] when the block parses to something other than a
/// mapping, such as a list or a bare string.
pub fn parse_metadata(yaml: &str) -> Result<SkillFrontmatter, MetadataError> {
    if yaml.trim().is_empty() {
        return Ok(SkillFrontmatter::default());
    }

    let yaml = expand_leading_tabs(yaml);
    match serde_yaml::from_str::<Value>(&yaml) {
        Ok(Value::Mapping(mapping)) => Ok(SkillFrontmatter::from_mapping(&mapping)),
        Ok(Value::Null) => Ok(SkillFrontmatter::default()),
        Ok(other) => Err(MetadataError {
            found: kind_of(&other),
        }),
        Err(e) => {
            tracing::debug!(error = %e, "frontmatter is not strict YAML, reading fields by line");
            Ok(read_fields_by_line(&yaml))
        }
    }
}

/// Line-oriented field extraction
///
/// A line starting with a lowercase letter at column 0 opens a top-level
/// key; every following line up to the next such key continues its value.
/// Block indicators (`>`, `|` and their chomping variants) are dropped and
/// surrounding quotes are removed from single-line values. Inside
/// `metadata:`, indented `author:` and `version:` lines are read.
#[must_use]
pub fn read_fields_by_line(yaml: &str) -> SkillFrontmatter {
    let mut fm = SkillFrontmatter::default();
    let mut current: Option<(&str, Vec<&str>)> = None;

    for line in yaml.lines().map(|l| l.trim_end_matches('\r')) {
        if let Some(caps) = TOP_LEVEL_KEY.captures(line) {
            if let Some((key, value)) = current.take() {
                store_field(&mut fm, key, &value);
            }
            let key = caps.get(1).map_or("", |m| m.as_str());
            let inline = caps.get(2).map_or("", |m| m.as_str()).trim();
            let mut value = Vec::new();
            if !is_block_indicator(inline) {
                value.push(inline);
            }
            current = Some((key, value));
        } else if let Some((_, value)) = current.as_mut()
            && !line.trim_start().starts_with('#')
        {
            value.push(line);
        }
    }
    if let Some((key, value)) = current {
        store_field(&mut fm, key, &value);
    }
    fm
}

fn store_field(fm: &mut SkillFrontmatter, key: &str, lines: &[&str]) {
    match key {
        "name" => fm.name = joined_value(lines),
        "description" => fm.description = joined_value(lines),
        "license" => fm.license = joined_value(lines),
        "metadata" => {
            let mut block = SkillAuthorship::default();
            for caps in lines.iter().filter_map(|l| METADATA_KEY.captures(l)) {
                let value = caps.get(2).map(|m| unquote(m.as_str().trim()).to_string());
                match caps.get(1).map(|m| m.as_str()) {
                    Some("author") => block.author = value.filter(|v| !v.is_empty()),
                    Some("version") => block.version = value.filter(|v| !v.is_empty()),
                    _ => {}
                }
            }
            fm.metadata = Some(block);
        }
        _ => {}
    }
}

fn joined_value(lines: &[&str]) -> Option<String> {
    let lines: Vec<&str> = lines.iter().copied().filter(|l| !l.trim().is_empty()).collect();
    match lines.as_slice() {
        [] => None,
        [single] => Some(unquote(single.trim()).to_string()),
        many => Some(many.join("\n")),
    }
}

fn unquote(value: &str) -> &str {
    ['"', '\'']
        .iter()
        .find_map(|&q| value.strip_prefix(q).and_then(|v| v.strip_suffix(q)))
        .unwrap_or(value)
}

fn is_block_indicator(value: &str) -> bool {
    matches!(value, ">" | ">-" | ">+" | "|" | "|-" | "|+")
}

/// Number of lines in `text`
///
/// A trailing newline does not start a new line, and a final line without
/// one still counts.
#[must_use]
pub fn count_lines(text: &str) -> usize {
    text.lines().count()
}

fn expand_leading_tabs(yaml: &str) -> Cow<'_, str> {
    if !yaml.contains('\t') {
        return Cow::Borrowed(yaml);
    }

    let mut out = String::with_capacity(yaml.len() + 8);
    for line in yaml.split_inclusive('\n') {
        let rest = line.trim_start_matches('\t');
        let tabs = line.len() - rest.len();
        out.push_str(&"  ".repeat(tabs));
        out.push_str(rest);
    }
    Cow::Owned(out)
}

fn is_delimiter(line: &str) -> bool {
    let line = line.strip_suffix('\n').unwrap_or(line);
    let line = line.strip_suffix('\r').unwrap_or(line);
    line == "---"
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_split_minimal() {
        let content = "---\nname: test-skill\ndescription: A test skill\n---\n\n# Test\n";
        let fm = split_frontmatter(content).unwrap();

        assert_eq!(fm.yaml, "name: test-skill\ndescription: A test skill\n");
        assert_eq!(fm.body, "\n# Test\n");
        assert_eq!(fm.closing_line, 4);
    }

    #[test]
    fn test_split_body_keeps_horizontal_rules() {
        let content = "---\nname: test\n---\n# Content\n\n---\n\nMore\n\n---\nEven more\n";
        let fm = split_frontmatter(content).unwrap();

        assert_eq!(fm.yaml, "name: test\n");
        assert_eq!(fm.body.matches("---").count(), 2);
    }

    #[test]
    fn test_split_crlf_delimiters() {
        let content = "---\r\nname: test\r\n---\r\nBody\r\n";
        let fm = split_frontmatter(content).unwrap();
        assert_eq!(fm.yaml, "name: test\r\n");
        assert_eq!(fm.body, "Body\r\n");
    }

    #[test]
    fn test_split_empty_frontmatter() {
        let fm = split_frontmatter("---\n---\n").unwrap();
        assert_eq!(fm.yaml, "");
        assert_eq!(fm.body, "");
    }

    #[test]
    fn test_split_closing_without_trailing_newline() {
        let fm = split_frontmatter("---\nname: a\n---").unwrap();
        assert_eq!(fm.yaml, "name: a\n");
        assert_eq!(fm.body, "");
    }

    #[rstest]
    #[case("")]
    #[case("# No frontmatter here")]
    #[case("Content before\n---\nname: test\n---\nBody\n")]
    #[case(" ---\nname: test\n---\n")]
    #[case("----\nname: test\n---\n")]
    fn test_split_missing_opening(#[case] content: &str) {
        assert_eq!(
            split_frontmatter(content).unwrap_err(),
            FrontmatterError::MissingOpening
        );
    }

    #[rstest]
    #[case("---\n")]
    #[case("---\nname: test\ndescription: Test\n")]
    #[case("---\nname: test\n--- \nBody\n")]
    fn test_split_missing_closing(#[case] content: &str) {
        assert_eq!(
            split_frontmatter(content).unwrap_err(),
            FrontmatterError::MissingClosing
        );
    }

    #[test]
    fn test_parse_full_metadata() {
        let yaml = "name: full-skill\ndescription: >\n  Multi-line description\n  with multiple lines\nlicense: MIT\nmetadata:\n  author: ariessolutionsio\n  version: \"1.0.0\"\n";
        let fm = parse_metadata(yaml).unwrap();

        assert_eq!(fm.name.as_deref(), Some("full-skill"));
        assert_eq!(
            fm.folded_description().as_deref(),
            Some("Multi-line description with multiple lines")
        );
        assert_eq!(fm.license.as_deref(), Some("MIT"));
        assert_eq!(fm.author(), Some("ariessolutionsio"));
        assert_eq!(fm.version(), Some("1.0.0"));
    }

    #[test]
    fn test_parse_folded_description_stops_at_next_key() {
        let yaml = "description: >\n  first\n  second\nlicense: MIT\n";
        let fm = parse_metadata(yaml).unwrap();
        assert_eq!(fm.folded_description().as_deref(), Some("first second"));
        assert_eq!(fm.license.as_deref(), Some("MIT"));
    }

    #[test]
    fn test_parse_tab_indented_metadata() {
        let fm = parse_metadata("metadata:\n\tauthor: x\n\tversion: 2.0.1\n").unwrap();
        assert_eq!(fm.author(), Some("x"));
        assert_eq!(fm.version(), Some("2.0.1"));
    }

    #[test]
    fn test_parse_empty_block() {
        assert_eq!(parse_metadata("\n").unwrap(), SkillFrontmatter::default());
    }

    #[test]
    fn test_parse_ignores_unknown_keys() {
        let fm = parse_metadata("name: a\nallowed-tools:\n  - bash\n").unwrap();
        assert_eq!(fm.name.as_deref(), Some("a"));
    }

    #[test]
    fn test_parse_falls_back_to_lines_on_yaml_error() {
        let yaml = "name: bar\ndescription: Use this skill when: building carts\nlicense: MIT\nmetadata:\n  author: ariessolutionsio\n  version: \"1.0.0\"\n";
        let fm = parse_metadata(yaml).unwrap();

        assert_eq!(fm.name.as_deref(), Some("bar"));
        assert_eq!(
            fm.description.as_deref(),
            Some("Use this skill when: building carts")
        );
        assert_eq!(fm.license.as_deref(), Some("MIT"));
        assert_eq!(fm.author(), Some("ariessolutionsio"));
        assert_eq!(fm.version(), Some("1.0.0"));
    }

    #[test]
    fn test_read_fields_by_line_folded_description() {
        let yaml = "description: >\n  first: part\n  second\n# note\nlicense: 'MIT'\ntags: [unclosed\n";
        let fm = read_fields_by_line(yaml);
        assert_eq!(fm.folded_description().as_deref(), Some("first: part second"));
        assert_eq!(fm.license.as_deref(), Some("MIT"));
        assert!(fm.name.is_none());
    }

    #[rstest]
    #[case("- a\n- b\n", "a sequence")]
    #[case("just text\n", "a string")]
    fn test_parse_non_mapping(#[case] yaml: &str, #[case] found: &str) {
        assert_eq!(parse_metadata(yaml).unwrap_err().found, found);
    }

    #[rstest]
    #[case("", 0)]
    #[case("\n", 1)]
    #[case("one", 1)]
    #[case("one\n", 1)]
    #[case("one\ntwo", 2)]
    #[case("one\ntwo\n", 2)]
    #[case("\n\n\n", 3)]
    fn test_count_lines(#[case] text: &str, #[case] expected: usize) {
        assert_eq!(count_lines(text), expected);
    }
}
