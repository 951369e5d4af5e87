//! Parser for delimited rating files.
//!
//! Two record shapes are understood:
//! - training records: `userId<sep>movieId<sep>rating`
//! - query records: `userId<sep>movieId`
//!
//! The separator is whatever single non-alphanumeric character follows the
//! leading user id (a comma in the usual case). Blank lines are skipped.
//! A line that does not tokenize into the expected fields is reported as a
//! [`DataLoadError::ParseError`] or [`DataLoadError::FieldCountMismatch`];
//! it is never partially ingested.

use crate::error::{DataLoadError, Result};
use crate::types::{MovieId, Observation, Query, UserId};
use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

const TRAINING_FIELDS: usize = 3;
const QUERY_FIELDS: usize = 2;

/// Open a file for buffered reading.
///
/// A missing file is reported as [`DataLoadError::FileNotFound`], any other
/// failure as [`DataLoadError::IoError`].
pub fn open(path: &Path) -> Result<BufReader<File>> {
    match File::open(path) {
        Ok(file) => Ok(BufReader::new(file)),
        Err(e) if e.kind() == ErrorKind::NotFound => Err(DataLoadError::FileNotFound {
            path: path.display().to_string(),
        }),
        Err(e) => Err(DataLoadError::IoError(e)),
    }
}

/// Parse a training file into observations, in file order
pub fn load_observations(path: &Path) -> Result<Vec<Observation>> {
    let reader = open(path)?;
    parse_observations(reader, &source_name(path))
}

/// Parse a query file into queries, in file order
pub fn load_queries(path: &Path) -> Result<Vec<Query>> {
    let reader = open(path)?;
    parse_queries(reader, &source_name(path))
}

/// Parse training records from any buffered reader.
///
/// `source` is only used to label errors.
pub fn parse_observations<R: BufRead>(reader: R, source: &str) -> Result<Vec<Observation>> {
    let mut observations = Vec::new();

    for (idx, bytes) in reader.split(b'\n').enumerate() {
        let bytes = bytes?;
        let line_no = idx + 1;
        let line_trimmed = decode_line(&bytes, source, line_no)?.trim();
        if line_trimmed.is_empty() {
            continue;
        }

        let fields = split_record(line_trimmed, TRAINING_FIELDS, source, line_no)?;

        let rating: f64 = parse_field(fields[2], "rating", source, line_no)?;
        if !rating.is_finite() {
            return Err(DataLoadError::ParseError {
                file: source.to_string(),
                line: line_no,
                reason: format!("Invalid rating: {} is not a finite number", fields[2]),
            });
        }

        observations.push(Observation {
            user_id: parse_field::<UserId>(fields[0], "userId", source, line_no)?,
            movie_id: parse_field::<MovieId>(fields[1], "movieId", source, line_no)?,
            rating,
        });
    }

    debug!("Parsed {} observations from {}", observations.len(), source);
    Ok(observations)
}

/// Parse query records from any buffered reader.
pub fn parse_queries<R: BufRead>(reader: R, source: &str) -> Result<Vec<Query>> {
    let mut queries = Vec::new();

    for (idx, bytes) in reader.split(b'\n').enumerate() {
        let bytes = bytes?;
        let line_no = idx + 1;
        let line_trimmed = decode_line(&bytes, source, line_no)?.trim();
        if line_trimmed.is_empty() {
            continue;
        }

        let fields = split_record(line_trimmed, QUERY_FIELDS, source, line_no)?;

        queries.push(Query {
            user_id: parse_field(fields[0], "userId", source, line_no)?,
            movie_id: parse_field(fields[1], "movieId", source, line_no)?,
        });
    }

    debug!("Parsed {} queries from {}", queries.len(), source);
    Ok(queries)
}

/// A line that is not valid UTF-8 is a malformed record, not an I/O failure
fn decode_line<'a>(bytes: &'a [u8], source: &str, line_no: usize) -> Result<&'a str> {
    std::str::from_utf8(bytes).map_err(|e| DataLoadError::ParseError {
        file: source.to_string(),
        line: line_no,
        reason: format!("Invalid UTF-8: {}", e),
    })
}

fn source_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn is_sign(c: char) -> bool {
    c == '+' || c == '-'
}

/// Find the separator: the first character after the leading integer.
///
/// Whitespace right after the integer only counts as the separator when it
/// is not just padding in front of a punctuation separator (`1 , 2`).
fn detect_separator(line: &str) -> Option<char> {
    let body = line.trim_start_matches(is_sign);
    let mut rest = body.trim_start_matches(|c: char| c.is_ascii_digit()).chars();
    let first = rest.next()?;
    if !first.is_whitespace() {
        return Some(first);
    }
    match rest.find(|c| !c.is_whitespace()) {
        Some(c) if !c.is_alphanumeric() && !is_sign(c) && c != '.' => Some(c),
        _ => Some(first),
    }
}

fn split_record<'a>(
    line: &'a str,
    expected: usize,
    source: &str,
    line_no: usize,
) -> Result<Vec<&'a str>> {
    let fields: Vec<&str> = match detect_separator(line) {
        None => vec![line],
        Some(sep) if sep.is_whitespace() => line.split_whitespace().collect(),
        Some(sep) if sep.is_alphanumeric() || is_sign(sep) || sep == '.' => {
            return Err(DataLoadError::ParseError {
                file: source.to_string(),
                line: line_no,
                reason: format!("Invalid field separator '{}'", sep),
            });
        }
        Some(sep) => line.split(sep).map(str::trim).collect(),
    };

    if fields.len() != expected {
        return Err(DataLoadError::FieldCountMismatch {
            file: source.to_string(),
            expected,
            found: fields.len(),
            line: line_no,
        });
    }
    Ok(fields)
}

fn parse_field<T>(raw: &str, field: &str, source: &str, line_no: usize) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse().map_err(|e| DataLoadError::ParseError {
        file: source.to_string(),
        line: line_no,
        reason: format!("Invalid {}: {}", field, e),
    })
}
