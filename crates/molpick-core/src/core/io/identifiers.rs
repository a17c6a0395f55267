use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IdentifierIoError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Column '{0}' not found in CSV header")]
    MissingColumn(String),
    #[error("Empty identifier in CSV record {record}")]
    EmptyField { record: usize },
}

/// Reads one identifier per line.
///
/// Blank lines and lines starting with `#` are skipped. Only the first whitespace-separated
/// token of a line is kept, so SMILES files with a trailing name column read cleanly.
pub fn read_identifiers(reader: impl BufRead) -> Result<Vec<String>, IdentifierIoError> {
    let mut identifiers = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        if let Some(token) = trimmed.split_whitespace().next() {
            identifiers.push(token.to_string());
        }
    }
    Ok(identifiers)
}

/// Reads identifiers from the named column of a headered CSV file.
pub fn read_identifiers_csv(
    reader: impl Read,
    column: &str,
) -> Result<Vec<String>, IdentifierIoError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let index = csv_reader
        .headers()?
        .iter()
        .position(|h| h == column)
        .ok_or_else(|| IdentifierIoError::MissingColumn(column.to_string()))?;

    let mut identifiers = Vec::new();
    for (record_idx, record) in csv_reader.records().enumerate() {
        let record = record?;
        match record.get(index) {
            Some(value) if !value.is_empty() => identifiers.push(value.to_string()),
            _ => {
                return Err(IdentifierIoError::EmptyField {
                    record: record_idx + 1,
                });
            }
        }
    }
    Ok(identifiers)
}

/// Reads identifiers from `path`, as CSV when `column` is given and as plain lines otherwise.
pub fn read_identifiers_from_path<P: AsRef<Path>>(
    path: P,
    column: Option<&str>,
) -> Result<Vec<String>, IdentifierIoError> {
    let file = File::open(path)?;
    match column {
        Some(column) => read_identifiers_csv(BufReader::new(file), column),
        None => read_identifiers(BufReader::new(file)),
    }
}

/// Drops repeated identifiers, keeping the first occurrence. Returns the kept identifiers and
/// the number dropped.
pub fn dedup_identifiers(identifiers: Vec<String>) -> (Vec<String>, usize) {
    let total = identifiers.len();
    let mut seen = HashSet::with_capacity(total);
    let kept: Vec<String> = identifiers
        .into_iter()
        .filter(|id| seen.insert(id.clone()))
        .collect();
    let dropped = total - kept.len();
    (kept, dropped)
}

/// Writes one identifier per line, in order.
pub fn write_library<S: AsRef<str>>(
    library: &[S],
    writer: &mut impl Write,
) -> Result<(), IdentifierIoError> {
    for identifier in library {
        writeln!(writer, "{}", identifier.as_ref())?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_library_to_path<S: AsRef<str>, P: AsRef<Path>>(
    library: &[S],
    path: P,
) -> Result<(), IdentifierIoError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_library(library, &mut writer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn read_identifiers_skips_blanks_comments_and_names() {
        let input = "CCO ethanol\n\n# header comment\n  c1ccccc1  \nCC(=O)O\tacetic acid\n";
        let ids = read_identifiers(Cursor::new(input)).unwrap();
        assert_eq!(ids, vec!["CCO", "c1ccccc1", "CC(=O)O"]);
    }

    #[test]
    fn read_identifiers_keeps_duplicates_in_order() {
        let ids = read_identifiers(Cursor::new("C\nN\nC\n")).unwrap();
        assert_eq!(ids, vec!["C", "N", "C"]);
    }

    #[test]
    fn read_identifiers_csv_selects_named_column() {
        let input = "id,smiles,mw\n1, CCO ,46.07\n2,c1ccccc1,78.11\n";
        let ids = read_identifiers_csv(Cursor::new(input), "smiles").unwrap();
        assert_eq!(ids, vec!["CCO", "c1ccccc1"]);
    }

    #[test]
    fn read_identifiers_csv_reports_missing_column() {
        let result = read_identifiers_csv(Cursor::new("id,name\n1,x\n"), "smiles");
        assert!(matches!(result, Err(IdentifierIoError::MissingColumn(c)) if c == "smiles"));
    }

    #[test]
    fn read_identifiers_csv_rejects_empty_fields() {
        let result = read_identifiers_csv(Cursor::new("smiles\nCCO\n\"\"\n"), "smiles");
        assert!(matches!(
            result,
            Err(IdentifierIoError::EmptyField { record: 2 })
        ));
    }

    #[test]
    fn dedup_identifiers_keeps_first_occurrence() {
        let ids = vec!["A", "B", "A", "C", "B"]
            .into_iter()
            .map(String::from)
            .collect();
        let (kept, dropped) = dedup_identifiers(ids);
        assert_eq!(kept, vec!["A", "B", "C"]);
        assert_eq!(dropped, 2);
    }

    #[test]
    fn write_library_emits_one_identifier_per_line() {
        let mut out = Vec::new();
        write_library(&["CCO", "CN"], &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "CCO\nCN\n");
    }

    #[test]
    fn path_round_trip_through_plain_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("library.smi");
        write_library_to_path(&["CCO", "c1ccccc1"], &path).unwrap();
        let ids = read_identifiers_from_path(&path, None).unwrap();
        assert_eq!(ids, vec!["CCO", "c1ccccc1"]);
    }

    #[test]
    fn read_from_path_uses_csv_when_column_given() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pool.csv");
        std::fs::write(&path, "name,smiles\nethanol,CCO\n").unwrap();
        let ids = read_identifiers_from_path(&path, Some("smiles")).unwrap();
        assert_eq!(ids, vec!["CCO"]);
    }

    #[test]
    fn read_from_missing_path_is_io_error() {
        let result = read_identifiers_from_path("/definitely/not/here.smi", None);
        assert!(matches!(result, Err(IdentifierIoError::Io(_))));
    }
}
