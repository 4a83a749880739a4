//! Record loader
//!
//! Reads the tweet archive CSV into [`RawRecord`]s. Malformed rows are not
//! dropped silently: each one becomes a [`Rejection`] carrying the line number
//! and reason, and the stream keeps counters for the caller.
//!
//! Every physical line is one row. Quoted fields may contain commas but never
//! a line break, so an unbalanced quote damages only its own line.

use csv::{ByteRecord, ReaderBuilder};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{LoadError, RejectReason, Rejection};
use crate::models::RawRecord;

/// Column names accepted for each required field (compared lowercase)
const ID_COLUMNS: &[&str] = &["id"];
const TIMESTAMP_COLUMNS: &[&str] = &["timestamp", "time", "date & time"];
const URL_COLUMNS: &[&str] = &["url", "tweet url"];
const TEXT_COLUMNS: &[&str] = &["text", "tweet text"];

/// What to do with rows that have more fields than the header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldOverflow {
    /// Re-join surplus fields into the text with commas (text must be the last column)
    #[default]
    JoinText,
    /// Reject the row as a field-count mismatch
    Reject,
}

/// Options for opening the archive
#[derive(Debug, Clone, Default)]
pub struct LoaderOptions {
    pub overflow: FieldOverflow,
    /// Stop after this many data rows
    pub row_limit: Option<usize>,
}

/// One data row: either a record or the reason it was excluded
#[derive(Debug, Clone, PartialEq)]
pub enum LoadedRow {
    Record(RawRecord),
    Rejected(Rejection),
}

/// Running counters of a record stream
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadStats {
    pub rows_read: usize,
    pub records: usize,
    pub rejected: usize,
}

#[derive(Debug, Clone, Copy)]
struct ColumnMap {
    id: usize,
    timestamp: usize,
    url: usize,
    text: usize,
    width: usize,
}

impl ColumnMap {
    fn resolve(headers: &ByteRecord, path: &Path) -> Result<Self, LoadError> {
        let found: Vec<String> = headers
            .iter()
            .map(|h| String::from_utf8_lossy(h).trim().to_string())
            .collect();
        let lowered: Vec<String> = found.iter().map(|h| h.to_lowercase()).collect();

        let find = |aliases: &[&str]| lowered.iter().position(|h| aliases.contains(&h.as_str()));

        let id = find(ID_COLUMNS);
        let timestamp = find(TIMESTAMP_COLUMNS);
        let url = find(URL_COLUMNS);
        let text = find(TEXT_COLUMNS);

        match (id, timestamp, url, text) {
            (Some(id), Some(timestamp), Some(url), Some(text)) => Ok(Self {
                id,
                timestamp,
                url,
                text,
                width: found.len(),
            }),
            _ => {
                let missing = [
                    ("id", id),
                    ("timestamp", timestamp),
                    ("url", url),
                    ("text", text),
                ]
                .into_iter()
                .filter(|(_, idx)| idx.is_none())
                .map(|(name, _)| name)
                .collect();

                Err(LoadError::HeaderMismatch {
                    path: path.to_path_buf(),
                    missing,
                    found,
                })
            }
        }
    }
}

/// Opens tweet archives
pub struct TweetLoader;

impl TweetLoader {
    /// Open a CSV file and validate its header
    pub fn open<P: AsRef<Path>>(path: P, options: LoaderOptions) -> Result<RecordStream<File>, LoadError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(LoadError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let file = File::open(path).map_err(|source| LoadError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;

        info!("Loading tweets from {}", path.display());
        Self::from_reader(file, path, options)
    }

    /// Build a stream over any reader; `source` names it in errors
    pub fn from_reader<R: Read, P: AsRef<Path>>(
        reader: R,
        source: P,
        options: LoaderOptions,
    ) -> Result<RecordStream<R>, LoadError> {
        let path = source.as_ref().to_path_buf();
        let mut lines = BufReader::new(reader);

        let mut header = Vec::new();
        lines
            .read_until(b'\n', &mut header)
            .map_err(|source| LoadError::Unreadable {
                path: path.clone(),
                source,
            })?;
        strip_line_ending(&mut header);
        let header = header.strip_prefix(UTF8_BOM).unwrap_or(&header[..]);

        let headers = parse_line(header).map_err(|source| LoadError::Csv {
            path: path.clone(),
            line: 1,
            source,
        })?;

        let columns = ColumnMap::resolve(&headers, &path)?;
        debug!(?columns, "Resolved archive columns");

        Ok(RecordStream {
            lines,
            buf: Vec::new(),
            columns,
            options,
            path,
            stats: LoadStats::default(),
            line: 1,
            failed: false,
        })
    }
}

const UTF8_BOM: &[u8] = b"\xef\xbb\xbf";

fn strip_line_ending(line: &mut Vec<u8>) {
    while matches!(line.last(), Some(b'\n' | b'\r')) {
        line.pop();
    }
}

/// Split one physical line into fields
///
/// A quote left open runs to the end of the line and never past it.
fn parse_line(line: &[u8]) -> Result<ByteRecord, csv::Error> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(line);

    let mut record = ByteRecord::new();
    reader.read_byte_record(&mut record)?;
    Ok(record)
}

/// Lazy iterator over the data rows of an archive, one row per physical line
pub struct RecordStream<R> {
    lines: BufReader<R>,
    buf: Vec<u8>,
    columns: ColumnMap,
    options: LoaderOptions,
    path: PathBuf,
    stats: LoadStats,
    line: u64,
    failed: bool,
}

impl<R: Read> RecordStream<R> {
    /// Counters for the rows yielded so far
    pub fn stats(&self) -> LoadStats {
        self.stats
    }

    fn decode(field: &[u8], name: &'static str) -> Result<String, RejectReason> {
        std::str::from_utf8(field)
            .map(str::to_string)
            .map_err(|_| RejectReason::InvalidUtf8 { field: name })
    }

    /// Read the next non-blank line into `buf`; `false` at end of input
    fn read_line(&mut self) -> std::io::Result<bool> {
        loop {
            self.buf.clear();
            if self.lines.read_until(b'\n', &mut self.buf)? == 0 {
                return Ok(false);
            }
            self.line += 1;
            strip_line_ending(&mut self.buf);
            if !self.buf.iter().all(u8::is_ascii_whitespace) {
                return Ok(true);
            }
        }
    }

    fn fail(&mut self, source: csv::Error) -> Option<Result<LoadedRow, LoadError>> {
        self.failed = true;
        Some(Err(LoadError::Csv {
            path: self.path.clone(),
            line: self.line,
            source,
        }))
    }

    fn convert(&self, record: &ByteRecord, line: u64) -> LoadedRow {
        let columns = self.columns;
        let found = record.len();

        let join_overflow = found > columns.width
            && self.options.overflow == FieldOverflow::JoinText
            && columns.text == columns.width - 1;

        if found < columns.width || (found > columns.width && !join_overflow) {
            let id = record
                .get(columns.id)
                .and_then(|f| std::str::from_utf8(f).ok())
                .map(str::to_string);
            return LoadedRow::Rejected(Rejection::new(
                line,
                id,
                RejectReason::FieldCount {
                    expected: columns.width,
                    found,
                },
            ));
        }

        let id = match Self::decode(&record[columns.id], "id") {
            Ok(id) => id,
            Err(reason) => return LoadedRow::Rejected(Rejection::new(line, None, reason)),
        };

        let text_bytes: Vec<u8> = if join_overflow {
            record
                .iter()
                .skip(columns.text)
                .collect::<Vec<_>>()
                .join(&b","[..])
        } else {
            record[columns.text].to_vec()
        };

        let fields = Self::decode(&record[columns.timestamp], "timestamp").and_then(|timestamp| {
            let url = Self::decode(&record[columns.url], "url")?;
            let text = Self::decode(&text_bytes, "text")?;
            Ok((timestamp, url, text))
        });

        match fields {
            Ok((timestamp, url, text)) => LoadedRow::Record(RawRecord {
                line,
                id,
                timestamp,
                url,
                text,
            }),
            Err(reason) => LoadedRow::Rejected(Rejection::new(line, Some(id), reason)),
        }
    }
}

impl<R: Read> Iterator for RecordStream<R> {
    type Item = Result<LoadedRow, LoadError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        if let Some(limit) = self.options.row_limit {
            if self.stats.rows_read >= limit {
                return None;
            }
        }

        match self.read_line() {
            Ok(true) => {}
            Ok(false) => return None,
            Err(source) => {
                self.line += 1;
                return self.fail(source.into());
            }
        }

        let record = match parse_line(&self.buf) {
            Ok(record) => record,
            Err(source) => return self.fail(source),
        };

        let line = self.line;
        self.stats.rows_read += 1;

        let row = self.convert(&record, line);
        match &row {
            LoadedRow::Record(_) => self.stats.records += 1,
            LoadedRow::Rejected(rejection) => {
                self.stats.rejected += 1;
                debug!(
                    line = rejection.line,
                    id = rejection.id.as_deref().unwrap_or("-"),
                    reason = %rejection.reason,
                    "Rejected row"
                );
            }
        }

        Some(Ok(row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stream(data: &str, options: LoaderOptions) -> RecordStream<&[u8]> {
        TweetLoader::from_reader(data.as_bytes(), "memory.csv", options).unwrap()
    }

    fn collect(data: &str, options: LoaderOptions) -> Vec<LoadedRow> {
        stream(data, options).map(|row| row.unwrap()).collect()
    }

    #[test]
    fn test_reads_records_with_line_numbers() {
        let data = "id,timestamp,url,text\n\
                    1,2017-03-05T02:15:00,http://x,Great job everybody!\n\
                    2,2017-03-05T10:00:00,http://y,Another tweet\n";
        let rows = collect(data, LoaderOptions::default());

        assert_eq!(rows.len(), 2);
        match &rows[1] {
            LoadedRow::Record(record) => {
                assert_eq!(record.id, "2");
                assert_eq!(record.line, 3);
                assert_eq!(record.text, "Another tweet");
            }
            other => panic!("expected record, got {:?}", other),
        }
    }

    #[test]
    fn test_source_header_aliases() {
        let data = "ID, Time, Tweet URL, Tweet Text\n\
                    7,2017-03-05T02:15:00,http://x,hello\n";
        let rows = collect(data, LoaderOptions::default());
        assert!(matches!(&rows[0], LoadedRow::Record(r) if r.id == "7"));
    }

    #[test]
    fn test_header_mismatch() {
        let data = "id,when,text\n1,2,3\n";
        let err = TweetLoader::from_reader(data.as_bytes(), "bad.csv", LoaderOptions::default())
            .err()
            .unwrap();

        match err {
            LoadError::HeaderMismatch { missing, found, .. } => {
                assert_eq!(missing, vec!["timestamp", "url"]);
                assert_eq!(found, vec!["id", "when", "text"]);
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_missing_file() {
        let err = TweetLoader::open("/definitely/not/here.csv", LoaderOptions::default())
            .err()
            .unwrap();
        assert!(matches!(err, LoadError::NotFound { .. }));
    }

    #[test]
    fn test_short_row_rejected() {
        let data = "id,timestamp,url,text\n1,2017-03-05T02:15:00\n";
        let mut stream = stream(data, LoaderOptions::default());
        let row = stream.next().unwrap().unwrap();

        assert_eq!(
            row,
            LoadedRow::Rejected(Rejection::new(
                2,
                Some("1".to_string()),
                RejectReason::FieldCount { expected: 4, found: 2 }
            ))
        );
        assert_eq!(stream.stats().rejected, 1);
    }

    #[test]
    fn test_overflow_joined_into_text() {
        let data = "id,timestamp,url,text\n1,2017-03-05T02:15:00,http://x,one, two, three\n";
        let rows = collect(data, LoaderOptions::default());

        match &rows[0] {
            LoadedRow::Record(record) => assert_eq!(record.text, "one, two, three"),
            other => panic!("expected record, got {:?}", other),
        }
    }

    #[test]
    fn test_overflow_rejected_under_strict_policy() {
        let data = "id,timestamp,url,text\n1,2017-03-05T02:15:00,http://x,one, two\n";
        let options = LoaderOptions {
            overflow: FieldOverflow::Reject,
            ..Default::default()
        };
        let rows = collect(data, options);

        assert!(matches!(
            &rows[0],
            LoadedRow::Rejected(Rejection {
                reason: RejectReason::FieldCount { expected: 4, found: 5 },
                ..
            })
        ));
    }

    #[test]
    fn test_invalid_utf8_rejected() {
        let mut data = b"id,timestamp,url,text\n1,2017-03-05T02:15:00,http://x,bad ".to_vec();
        data.extend_from_slice(&[0xff, 0xfe]);
        data.extend_from_slice(b"\n2,2017-03-05T02:15:00,http://x,fine\n");

        let rows: Vec<_> = TweetLoader::from_reader(&data[..], "bytes.csv", LoaderOptions::default())
            .unwrap()
            .map(|r| r.unwrap())
            .collect();

        assert!(matches!(
            &rows[0],
            LoadedRow::Rejected(Rejection {
                reason: RejectReason::InvalidUtf8 { field: "text" },
                ..
            })
        ));
        assert!(matches!(&rows[1], LoadedRow::Record(_)));
    }

    #[test]
    fn test_unclosed_quote_stays_on_its_line() {
        let data = "id,timestamp,url,text\n\
                    1,2017-03-05T02:15:00,http://x,\"@user: Great job everybody!\n\
                    2,2017-03-05T10:15:00,http://y,Terrible disaster\n\
                    3,2017-03-05T18:15:00,http://z,Meeting at noon\n";
        let mut stream = stream(data, LoaderOptions::default());
        let rows: Vec<LoadedRow> = stream.by_ref().map(|r| r.unwrap()).collect();

        assert_eq!(rows.len(), 3);
        assert_eq!(stream.stats().rows_read, 3);
        match &rows[0] {
            LoadedRow::Record(record) => {
                assert_eq!(record.line, 2);
                assert_eq!(record.text, "@user: Great job everybody!");
            }
            other => panic!("expected record, got {:?}", other),
        }
        assert!(matches!(&rows[2], LoadedRow::Record(r) if r.id == "3" && r.line == 4));
    }

    #[test]
    fn test_blank_lines_skipped_and_bom_stripped() {
        let data = "\u{feff}id,timestamp,url,text\r\n\
                    \r\n\
                    1,2017-03-05T02:15:00,http://x,hello\r\n";
        let rows = collect(data, LoaderOptions::default());

        assert_eq!(rows.len(), 1);
        assert!(matches!(&rows[0], LoadedRow::Record(r) if r.line == 3 && r.text == "hello"));
    }

    #[test]
    fn test_row_limit_stops_early() {
        let data = "id,timestamp,url,text\n\
                    1,2017-03-05T02:15:00,http://x,a\n\
                    2,2017-03-05T02:15:00,http://x,b\n\
                    3,2017-03-05T02:15:00,http://x,c\n";
        let options = LoaderOptions {
            row_limit: Some(2),
            ..Default::default()
        };
        let mut stream = stream(data, options);
        let count = stream.by_ref().count();

        assert_eq!(count, 2);
        assert_eq!(stream.stats().rows_read, 2);
    }
}
