//! Decoding of serialized list-literal cells and remote-type cleanup

use crate::error::{DashboardError, Result};
use crate::model::UNSPECIFIED_REMOTE;

/// Decode one sequence-valued cell. An absent cell is an empty sequence,
/// never null, so downstream explode operations need no null handling.
///
/// Decoding runs exactly once, at read time, into `Vec<String>`; the typed
/// value cannot be fed back through the parser, which is the guard against
/// double-normalization.
pub fn normalize_list_cell(column: &str, cell: Option<&str>) -> Result<Vec<String>> {
    match cell {
        Some(text) => parse_string_list(column, text),
        None => Ok(Vec::new()),
    }
}

/// Strict parser for a serialized sequence-of-strings literal such as
/// `['Python', 'SQL']`. Elements are single- or double-quoted with backslash
/// escapes. Numbers, nested lists, bare tokens, and trailing garbage are all
/// rejected rather than accepted as arbitrary structure.
pub fn parse_string_list(column: &str, cell: &str) -> Result<Vec<String>> {
    let mut chars = cell.trim().chars().peekable();
    if chars.next() != Some('[') {
        return Err(malformed(column, cell));
    }

    let mut items = Vec::new();
    skip_whitespace(&mut chars);
    if chars.peek() == Some(&']') {
        chars.next();
    } else {
        loop {
            let item = parse_quoted(&mut chars).ok_or_else(|| malformed(column, cell))?;
            items.push(item);
            skip_whitespace(&mut chars);
            match chars.next() {
                Some(',') => skip_whitespace(&mut chars),
                Some(']') => break,
                _ => return Err(malformed(column, cell)),
            }
        }
    }

    skip_whitespace(&mut chars);
    if chars.next().is_some() {
        return Err(malformed(column, cell));
    }
    Ok(items)
}

/// Remote-type cleanup applied before the remote filter is ever consulted:
/// values are trimmed, and both a null cell and the literal sentinel text
/// `"[None]"` map to `"Unspecified"`.
pub fn normalize_remote_type(cell: Option<&str>) -> String {
    match cell {
        Some(text) => {
            let trimmed = text.trim();
            if trimmed == "[None]" {
                UNSPECIFIED_REMOTE.to_string()
            } else {
                trimmed.to_string()
            }
        }
        None => UNSPECIFIED_REMOTE.to_string(),
    }
}

fn malformed(column: &str, cell: &str) -> DashboardError {
    DashboardError::MalformedListCell {
        column: column.to_string(),
        cell: cell.to_string(),
    }
}

fn skip_whitespace(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) {
    while chars.peek().is_some_and(|c| c.is_whitespace()) {
        chars.next();
    }
}

/// Parse one quoted element. Returns None on anything that is not a quoted
/// string with recognized escapes.
fn parse_quoted(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> Option<String> {
    let quote = match chars.next() {
        Some(c @ ('\'' | '"')) => c,
        _ => return None,
    };

    let mut out = String::new();
    loop {
        match chars.next()? {
            '\\' => match chars.next()? {
                'n' => out.push('\n'),
                't' => out.push('\t'),
                c @ ('\\' | '\'' | '"') => out.push(c),
                _ => return None,
            },
            c if c == quote => return Some(out),
            c => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_list() {
        let items = parse_string_list("SKILLS_NAME", "['Python', 'SQL']").unwrap();
        assert_eq!(items, vec!["Python".to_string(), "SQL".to_string()]);
    }

    #[test]
    fn test_parse_double_quotes_and_escapes() {
        let items = parse_string_list("SKILLS_NAME", r#"["Bachelor's Degree", 'C\\C++']"#).unwrap();
        assert_eq!(items, vec!["Bachelor's Degree".to_string(), "C\\C++".to_string()]);
    }

    #[test]
    fn test_absent_cell_is_empty_sequence() {
        assert_eq!(normalize_list_cell("SKILLS_NAME", None).unwrap(), Vec::<String>::new());
    }

    #[test]
    fn test_empty_list_is_a_noop() {
        assert_eq!(parse_string_list("SKILLS_NAME", "[]").unwrap(), Vec::<String>::new());
        assert_eq!(parse_string_list("SKILLS_NAME", "[ ]").unwrap(), Vec::<String>::new());
    }

    #[test]
    fn test_rejects_non_sequence_cells() {
        for cell in [
            "Python",
            "[Python]",
            "[1, 2]",
            "[['a']]",
            "['a' 'b']",
            "['a'],",
            "['a'",
            "{'a': 1}",
        ] {
            let err = parse_string_list("SKILLS_NAME", cell).unwrap_err();
            assert!(
                matches!(err, DashboardError::MalformedListCell { .. }),
                "cell {cell:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_remote_type_normalization() {
        assert_eq!(normalize_remote_type(None), "Unspecified");
        assert_eq!(normalize_remote_type(Some("[None]")), "Unspecified");
        assert_eq!(normalize_remote_type(Some("  Hybrid  ")), "Hybrid");
        assert_eq!(normalize_remote_type(Some("Remote")), "Remote");
    }
}
