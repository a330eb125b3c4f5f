//! Line parser for catalogue exports
//!
//! Two layouts are accepted:
//!
//! - comma form: `large_breasts,0,1464796,"large_breast,big_breasts"`
//! - space form: `large_breasts 0 1464796 large_breast,big_breasts`
//!
//! The layout is chosen by whichever separator appears first, so a space-form
//! line with a comma-delimited alias list is still read as space form. Lines
//! starting with a quote are always read in space form.

use tagfix_core::{Category, TagRecord};

use crate::error::ParseError;

/// Parsing options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvOptions {
    /// Escape `(`/`)` as `\(`/`\)` in names and aliases
    pub escape_parentheses: bool,
    /// Skip lines starting with `tag,` or `tag `
    pub skip_header: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            escape_parentheses: true,
            skip_header: true,
        }
    }
}

/// Parse one line.
///
/// Returns `Ok(None)` for blank and header lines.
pub fn parse_line(line: &str, options: &CsvOptions) -> Result<Option<TagRecord>, ParseError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    if options.skip_header && (line.starts_with("tag,") || line.starts_with("tag ")) {
        return Ok(None);
    }

    let (raw_tag, raw_type, raw_count, raw_aliases) =
        if is_comma_form(line) {
            let parts: Vec<&str> = line.splitn(4, ',').collect();
            if parts.len() < 3 {
                return Err(ParseError::MissingFields(parts.len()));
            }
            let aliases = parts.get(3).map_or("", |s| s.trim());
            let aliases = aliases
                .strip_prefix('"')
                .and_then(|s| s.strip_suffix('"'))
                .unwrap_or(aliases);
            (parts[0].trim(), parts[1].trim(), parts[2].trim(), aliases.to_string())
        } else {
            let parts: Vec<&str> = line.split(' ').collect();
            if parts.len() < 3 {
                return Err(ParseError::MissingFields(parts.len()));
            }
            (parts[0], parts[1], parts[2], parts[3..].join(" "))
        };

    let code: u8 = raw_type.parse().map_err(|_| ParseError::InvalidNumber {
        field: "type",
        value: raw_type.to_string(),
    })?;
    let usage_count: u64 = raw_count.parse().map_err(|_| ParseError::InvalidNumber {
        field: "count",
        value: raw_count.to_string(),
    })?;

    let canonical_name = clean_name(raw_tag, options);
    if canonical_name.is_empty() {
        return Err(ParseError::EmptyTag);
    }

    let aliases = raw_aliases
        .split(',')
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .map(|a| clean_name(a, options))
        .filter(|a| !a.is_empty())
        .collect::<Vec<_>>();

    Ok(Some(TagRecord {
        canonical_name,
        category: Category::from_code(code),
        usage_count,
        aliases,
    }))
}

fn is_comma_form(line: &str) -> bool {
    if line.starts_with('"') {
        return false;
    }
    match (line.find(','), line.find(' ')) {
        (Some(comma), Some(space)) => comma < space,
        (Some(_), None) => true,
        (None, _) => false,
    }
}

/// Underscores to spaces, optional parenthesis escaping, trimmed.
pub fn clean_name(raw: &str, options: &CsvOptions) -> String {
    let mut name = raw.replace('_', " ");
    if options.escape_parentheses {
        name = name.replace('(', r"\(").replace(')', r"\)");
    }
    name.trim().to_string()
}
