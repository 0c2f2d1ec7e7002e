//! Whitespace-separated COLVAR table parsing.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::debug;

use crate::error::ColvarError;
use crate::selection::OrderParameter;

/// Header tokens before the first order parameter name (`#! FIELDS time`).
const HEADER_PREFIX_TOKENS: usize = 3;

/// A parsed COLVAR file.
#[derive(Debug, Clone)]
pub struct ColvarTable {
    /// Values of the leading time column, one per row.
    pub times: Vec<f64>,

    /// One order parameter per named column, in header order.
    pub columns: Vec<OrderParameter>,
}

impl ColvarTable {
    /// Returns the number of data rows.
    pub fn row_count(&self) -> usize {
        self.times.len()
    }

    /// Returns the column names in header order.
    pub fn names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name()).collect()
    }
}

/// Reads a COLVAR file from disk.
pub fn read_colvar(path: impl AsRef<Path>) -> Result<ColvarTable, ColvarError> {
    let file = File::open(path.as_ref())?;
    parse_colvar(BufReader::new(file))
}

/// Parses COLVAR content.
///
/// The first line is the header; names start at its fourth token. Blank
/// lines and later `#` lines are skipped. Every data row holds the time
/// followed by one value per named column.
pub fn parse_colvar<R: BufRead>(reader: R) -> Result<ColvarTable, ColvarError> {
    let mut lines = reader.lines();
    let header = lines.next().ok_or(ColvarError::MissingHeader)??;

    let names: Vec<String> = header
        .split_whitespace()
        .skip(HEADER_PREFIX_TOKENS)
        .map(str::to_string)
        .collect();
    if names.is_empty() {
        return Err(ColvarError::NoColumns);
    }

    let mut seen = HashSet::new();
    for name in &names {
        if !seen.insert(name.as_str()) {
            return Err(ColvarError::DuplicateColumn(name.clone()));
        }
    }

    let mut times = Vec::new();
    let mut values: Vec<Vec<f64>> = vec![Vec::new(); names.len()];

    for (index, line) in lines.enumerate() {
        let line = line?;
        let line_number = index + 2;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let tokens: Vec<&str> = trimmed.split_whitespace().collect();
        if tokens.len() != names.len() + 1 {
            return Err(ColvarError::ColumnCount {
                line: line_number,
                expected: names.len() + 1,
                found: tokens.len(),
            });
        }

        times.push(parse_number(tokens[0], line_number)?);
        for (column, token) in values.iter_mut().zip(&tokens[1..]) {
            column.push(parse_number(token, line_number)?);
        }
    }

    debug!(columns = names.len(), rows = times.len(), "parsed COLVAR table");

    let columns = names
        .into_iter()
        .zip(values)
        .map(|(name, samples)| OrderParameter::new(name, samples))
        .collect();

    Ok(ColvarTable { times, columns })
}

fn parse_number(token: &str, line: usize) -> Result<f64, ColvarError> {
    token.parse().map_err(|_| ColvarError::InvalidNumber {
        line,
        token: token.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn parse(text: &str) -> Result<ColvarTable, ColvarError> {
        parse_colvar(Cursor::new(text))
    }

    #[test]
    fn test_parse_basic_table() {
        let table = parse(
            "#! FIELDS time d1 d2 phi\n\
             0.0 1.0 2.0 -3.1\n\
             0.5 1.5 2.5 3.1\n",
        )
        .unwrap();

        assert_eq!(table.names(), vec!["d1", "d2", "phi"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.times, vec![0.0, 0.5]);
        assert_eq!(table.columns[2].trajectory(), &[-3.1, 3.1]);
    }

    #[test]
    fn test_skips_comments_and_blank_lines() {
        let table = parse(
            "#! FIELDS time a b\n\
             #! SET min_a -pi\n\
             \n\
             0 1 2\n\
             1 3 4\n",
        )
        .unwrap();

        assert_eq!(table.row_count(), 2);
        assert_eq!(table.columns[0].trajectory(), &[1.0, 3.0]);
        assert_eq!(table.columns[1].trajectory(), &[2.0, 4.0]);
    }

    #[test]
    fn test_missing_header() {
        assert!(matches!(parse(""), Err(ColvarError::MissingHeader)));
    }

    #[test]
    fn test_header_without_columns() {
        assert!(matches!(
            parse("#! FIELDS time\n0 1\n"),
            Err(ColvarError::NoColumns)
        ));
    }

    #[test]
    fn test_duplicate_column() {
        let err = parse("#! FIELDS time a a\n").unwrap_err();
        assert!(matches!(err, ColvarError::DuplicateColumn(name) if name == "a"));
    }

    #[test]
    fn test_wrong_column_count() {
        let err = parse("#! FIELDS time a b\n0 1 2\n1 3\n").unwrap_err();
        assert!(matches!(
            err,
            ColvarError::ColumnCount {
                line: 3,
                expected: 3,
                found: 2
            }
        ));
    }

    #[test]
    fn test_invalid_number() {
        let err = parse("#! FIELDS time a\n0 abc\n").unwrap_err();
        assert!(matches!(
            err,
            ColvarError::InvalidNumber { line: 2, ref token } if token == "abc"
        ));
    }

    #[test]
    fn test_read_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("COLVAR");
        std::fs::write(&path, "#! FIELDS time x y\n0 1 2\n1 2 4\n2 3 8\n").unwrap();

        let table = read_colvar(&path).unwrap();
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.columns[1].trajectory(), &[2.0, 4.0, 8.0]);
    }

    #[test]
    fn test_missing_file() {
        let err = read_colvar("/nonexistent/COLVAR").unwrap_err();
        assert!(matches!(err, ColvarError::Io(_)));
    }
}
