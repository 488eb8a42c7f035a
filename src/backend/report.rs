use std::collections::HashMap;
use tracing::{debug, info};

use super::cell::{Cell, clean_value};
use super::error::ParseError;
use super::headers::{CanonicalHeader, HeaderKey, find_header_row};
use super::parser::CsvParser;
use super::summary::{SUMMARY_MARKER, Summary, calculate_stats, extract_summary};

/// One data line of a report, keyed by resolved header.
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    values: HashMap<HeaderKey, Cell>,
}

impl Record {
    /// Pairs headers with cells by position. Missing cells are null; when a
    /// header repeats, the later column wins.
    pub fn from_cells(headers: &[HeaderKey], cells: Vec<Cell>) -> Self {
        let mut cells = cells.into_iter();
        let mut values = HashMap::with_capacity(headers.len());
        for header in headers {
            values.insert(header.clone(), cells.next().unwrap_or(Cell::Null));
        }
        Self { values }
    }

    fn from_fields(headers: &[HeaderKey], fields: &[String]) -> Self {
        let cells = headers
            .iter()
            .enumerate()
            .map(|(i, _)| clean_value(fields.get(i).map(String::as_str).unwrap_or("")))
            .collect();
        Self::from_cells(headers, cells)
    }

    pub fn get(&self, key: &HeaderKey) -> Option<&Cell> {
        self.values.get(key)
    }

    pub fn field(&self, header: CanonicalHeader) -> Option<&Cell> {
        self.values.get(&HeaderKey::Canonical(header))
    }

    /// Display text of a known column; empty when absent or null.
    pub fn text(&self, header: CanonicalHeader) -> String {
        self.field(header).map(Cell::to_text).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &HeaderKey> {
        self.values.keys()
    }
}

/// Everything read from one report.
#[derive(Clone, Debug, PartialEq)]
pub struct ParseResult {
    pub records: Vec<Record>,
    pub headers: Vec<HeaderKey>,
    /// The `RESUMEN` block, if the file carried one with recognised keys.
    pub summary: Option<Summary>,
    /// `summary` when present, otherwise totals computed from `records`.
    pub totals: Summary,
}

/// Parses report text into records, headers and totals.
pub fn parse(text: &str) -> Result<ParseResult, ParseError> {
    let lines = CsvParser::split_lines(text);
    if lines.is_empty() {
        return Err(ParseError::EmptyInput);
    }

    let header = find_header_row(&lines).ok_or(ParseError::HeaderNotFound)?;
    let headers = header.keys;

    let mut records = Vec::new();
    let mut summary = None;
    let body = &lines[header.index + 1..];
    for (offset, line) in body.iter().enumerate() {
        if line.is_empty() || line.starts_with(SUMMARY_MARKER) {
            summary = extract_summary(&body[offset..]);
            break;
        }

        let fields = CsvParser::parse_line(line);
        if fields.is_empty() {
            continue;
        }
        records.push(Record::from_fields(&headers, &fields));
    }

    let totals = match &summary {
        Some(found) => found.clone(),
        None => {
            debug!("no summary block, computing totals from records");
            calculate_stats(&records)
        }
    };

    info!(
        records = records.len(),
        columns = headers.len(),
        summary = summary.is_some(),
        "report parsed"
    );
    Ok(ParseResult {
        records,
        headers,
        summary,
        totals,
    })
}
