//! CSV fixture reader

use std::fs::File;
use std::io;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};

use super::errors::{SourceError, SourceResult};

/// One data row as raw text cells, in header order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    /// 1-based data row number (the header row is not counted)
    pub row: usize,
    /// Cell text; may be shorter than the header row, the decoder pads it
    pub cells: Vec<String>,
}

/// Streams data rows out of a CSV fixture with a header row.
///
/// Rows are yielded one at a time in file order. Blank lines are skipped.
pub struct FixtureReader<R> {
    reader: csv::Reader<R>,
    headers: Vec<String>,
    row: usize,
}

impl FixtureReader<File> {
    /// Opens a fixture file and reads its header row.
    pub fn open(path: &Path) -> SourceResult<Self> {
        let file = File::open(path).map_err(|source| SourceError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(file)
    }
}

impl<R: io::Read> FixtureReader<R> {
    /// Wraps any reader and reads its header row.
    pub fn from_reader(rdr: R) -> SourceResult<Self> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(rdr);

        let headers = reader
            .headers()
            .map_err(SourceError::Header)?
            .iter()
            .map(str::to_string)
            .collect();

        Ok(Self {
            reader,
            headers,
            row: 0,
        })
    }

    /// Header row, type tags included
    pub fn headers(&self) -> &[String] {
        &self.headers
    }
}

impl<R: io::Read> Iterator for FixtureReader<R> {
    type Item = SourceResult<RawRow>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut record = StringRecord::new();
        match self.reader.read_record(&mut record) {
            Ok(false) => None,
            Ok(true) => {
                self.row += 1;
                if record.len() > self.headers.len() {
                    return Some(Err(SourceError::RowLength {
                        row: self.row,
                        expected: self.headers.len(),
                        actual: record.len(),
                    }));
                }
                Some(Ok(RawRow {
                    row: self.row,
                    cells: record.iter().map(str::to_string).collect(),
                }))
            }
            Err(source) => {
                self.row += 1;
                Some(Err(SourceError::Csv {
                    row: self.row,
                    source,
                }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn reader(text: &str) -> FixtureReader<&[u8]> {
        FixtureReader::from_reader(text.as_bytes()).unwrap()
    }

    #[test]
    fn test_reads_headers_and_rows() {
        let mut rdr = reader("id,position(int)\ns1,3\ns2,4\n");
        assert_eq!(rdr.headers(), &["id".to_string(), "position(int)".to_string()]);

        let first = rdr.next().unwrap().unwrap();
        assert_eq!(first.row, 1);
        assert_eq!(first.cells, vec!["s1", "3"]);
        let second = rdr.next().unwrap().unwrap();
        assert_eq!(second.row, 2);
        assert!(rdr.next().is_none());
    }

    #[test]
    fn test_quoted_json_cells() {
        let mut rdr = reader("id,roles(dict)\ns1,\"[{\"\"id\"\": \"\"r1\"\"}]\"\n");
        let row = rdr.next().unwrap().unwrap();
        assert_eq!(row.cells[1], r#"[{"id": "r1"}]"#);
    }

    #[test]
    fn test_short_rows_keep_only_present_cells() {
        let mut rdr = reader("id,middle_name\ns1\n");
        let row = rdr.next().unwrap().unwrap();
        assert_eq!(row.cells, vec!["s1"]);
    }

    #[test]
    fn test_long_rows_are_errors_but_not_fatal() {
        let mut rdr = reader("id\ns1,extra\ns2\n");
        let err = rdr.next().unwrap().unwrap_err();
        assert!(matches!(err, SourceError::RowLength { row: 1, expected: 1, actual: 2 }));
        assert!(!err.is_fatal());
        assert_eq!(rdr.next().unwrap().unwrap().cells, vec!["s2"]);
    }

    #[test]
    fn test_open_missing_file_is_fatal() {
        let err = FixtureReader::open(Path::new("/definitely/not/here.csv"))
            .err()
            .unwrap();
        assert!(matches!(err, SourceError::Open { .. }));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_open_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "id,name").unwrap();
        writeln!(file, "r1,medic").unwrap();

        let rows: Vec<_> = FixtureReader::open(file.path())
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].cells, vec!["r1", "medic"]);
    }
}
