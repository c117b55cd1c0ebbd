/// Statement loading: files, inline `--statement` values and stdin.
///
/// Two formats are auto-detected. Content starting with `[` is a JSON array
/// whose elements are `{"source", "claim", "subject"}` objects or
/// `[source, claim, subject]` triples. Anything else is delimited text: one
/// statement per line, tab-separated if the line contains a tab, otherwise
/// comma-separated. Blank lines and lines starting with `#` are skipped.
use serde::Deserialize;
use truthfinder_core::Statement;

#[derive(Deserialize)]
#[serde(untagged)]
enum JsonStatement {
    Object(Statement),
    Triple(String, String, String),
}

impl From<JsonStatement> for Statement {
    fn from(value: JsonStatement) -> Self {
        match value {
            JsonStatement::Object(s) => s,
            JsonStatement::Triple(source, claim, subject) => Statement::new(source, claim, subject),
        }
    }
}

/// Parse a whole document in either format.
pub fn parse_statements(content: &str) -> Result<Vec<Statement>, String> {
    let trimmed = content.trim();
    if trimmed.starts_with('[') {
        let rows: Vec<JsonStatement> = serde_json::from_str(trimmed)
            .map_err(|e| format!("Input looks like JSON but failed to parse: {e}"))?;
        Ok(rows.into_iter().map(Statement::from).collect())
    } else {
        let mut statements = Vec::new();
        for (i, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let statement = parse_line(line).map_err(|e| format!("line {}: {e}", i + 1))?;
            statements.push(statement);
        }
        Ok(statements)
    }
}

/// Parse one delimited `source,claim,subject` line.
pub fn parse_line(line: &str) -> Result<Statement, String> {
    let delimiter = if line.contains('\t') { '\t' } else { ',' };
    let fields: Vec<&str> = line.split(delimiter).map(str::trim).collect();
    match fields.as_slice() {
        [source, claim, subject] => Ok(Statement::new(*source, *claim, *subject)),
        _ => Err(format!(
            "expected 3 fields (source, claim, subject), got {}: \"{line}\"",
            fields.len()
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json_objects() {
        let input = r#"[
            {"source": "a", "claim": "Einstein", "subject": "Special relativity"},
            {"source": "b", "claim": "Newton", "subject": "Universal gravitation"}
        ]"#;
        let rows = parse_statements(input).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], Statement::new("a", "Einstein", "Special relativity"));
        assert_eq!(rows[1].subject, "Universal gravitation");
    }

    #[test]
    fn test_parse_json_triples_and_objects_mixed() {
        let input = r#"[["a", "Einstein", "Special relativity"],
                        {"source": "b", "claim": "Galilei", "subject": "Heliocentrism"}]"#;
        let rows = parse_statements(input).unwrap();
        assert_eq!(rows[0], Statement::new("a", "Einstein", "Special relativity"));
        assert_eq!(rows[1], Statement::new("b", "Galilei", "Heliocentrism"));
    }

    #[test]
    fn test_parse_json_rejects_wrong_shape() {
        assert!(parse_statements(r#"[["a", "Einstein"]]"#).is_err());
        assert!(parse_statements(r#"[{"source": "a"}]"#).is_err());
    }

    #[test]
    fn test_parse_delimited_with_comments() {
        let input = "\
# source,claim,subject
a,Einstein,Special relativity

b, Albert Einstein , Special relativity
";
        let rows = parse_statements(input).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1], Statement::new("b", "Albert Einstein", "Special relativity"));
    }

    #[test]
    fn test_tab_lines_may_contain_commas() {
        let rows = parse_statements("a\tEinstein, Albert\tSpecial relativity\n").unwrap();
        assert_eq!(rows[0].claim, "Einstein, Albert");
    }

    #[test]
    fn test_bad_line_reports_line_number() {
        let err = parse_statements("a,Einstein,Special relativity\n\nb,Newton\n").unwrap_err();
        assert!(err.starts_with("line 3:"), "{err}");
    }

    #[test]
    fn test_empty_fields_are_left_to_the_engine() {
        // Blank fields parse; the engine reports them with their row index.
        let row = parse_line("a,,Heliocentrism").unwrap();
        assert_eq!(row.claim, "");
    }

    #[test]
    fn test_empty_document() {
        assert!(parse_statements("").unwrap().is_empty());
        assert!(parse_statements("# nothing\n").unwrap().is_empty());
        assert!(parse_statements("[]").unwrap().is_empty());
    }
}
