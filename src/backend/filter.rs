use std::cmp::Ordering;
use std::collections::BTreeSet;

use super::cell::Cell;
use super::headers::{CanonicalHeader, HeaderKey};
use super::report::Record;

/// Columns covered by the free-text search.
const SEARCH_FIELDS: &[CanonicalHeader] = &[
    CanonicalHeader::Cliente,
    CanonicalHeader::Cedula,
    CanonicalHeader::Telefono,
    CanonicalHeader::Departamento,
    CanonicalHeader::Edificio,
];

/// Table filters. Unset criteria always pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RecordFilter {
    pub search: Option<String>,
    pub pagado: Option<String>,
    pub edificio: Option<String>,
    pub estado: Option<String>,
}

impl RecordFilter {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn matches(&self, record: &Record) -> bool {
        if let Some(term) = self.search.as_deref().filter(|t| !t.is_empty()) {
            let haystack = SEARCH_FIELDS
                .iter()
                .map(|h| record.text(*h))
                .collect::<Vec<_>>()
                .join(" ")
                .to_lowercase();
            if !haystack.contains(&term.to_lowercase()) {
                return false;
            }
        }

        let exact = [
            (&self.pagado, CanonicalHeader::Pagado),
            (&self.edificio, CanonicalHeader::Edificio),
            (&self.estado, CanonicalHeader::Estado),
        ];
        exact.iter().all(|(wanted, header)| match wanted.as_deref() {
            Some(value) if !value.is_empty() => record.text(*header) == value,
            _ => true,
        })
    }

    pub fn apply<'a>(&self, records: &'a [Record]) -> Vec<&'a Record> {
        records.iter().filter(|r| self.matches(r)).collect()
    }
}

/// Distinct non-empty buildings, sorted ascending.
pub fn edificio_options(records: &[Record]) -> Vec<String> {
    records
        .iter()
        .map(|r| r.text(CanonicalHeader::Edificio))
        .filter(|e| !e.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// Current sort column. Selecting the same column again flips direction.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SortState {
    pub column: Option<HeaderKey>,
    pub direction: SortDirection,
}

impl SortState {
    pub fn toggle(&mut self, column: HeaderKey) {
        if self.column.as_ref() == Some(&column) {
            self.direction = match self.direction {
                SortDirection::Asc => SortDirection::Desc,
                SortDirection::Desc => SortDirection::Asc,
            };
        } else {
            self.column = Some(column);
            self.direction = SortDirection::Asc;
        }
    }

    pub fn sort(&self, records: &mut [&Record]) {
        if let Some(column) = &self.column {
            sort_records(records, column, self.direction);
        }
    }
}

/// Ordering: empty values first, then numbers, then text.
enum SortKey {
    Empty,
    Number(f64),
    /// Accent-folded text, then the plain lowercased text to break ties.
    Text(String, String),
}

/// Lowercases and drops Spanish diacritics so `Ángela` sorts with `angela`.
fn fold_accents(s: &str) -> String {
    s.to_lowercase()
        .chars()
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ä' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'í' | 'ì' | 'î' | 'ï' => 'i',
            'ó' | 'ò' | 'ô' | 'ö' => 'o',
            'ú' | 'ù' | 'û' | 'ü' => 'u',
            'ñ' => 'n',
            'ç' => 'c',
            other => other,
        })
        .collect()
}

fn sort_key(cell: Option<&Cell>) -> SortKey {
    match cell {
        Some(Cell::Int(n)) => SortKey::Number(*n as f64),
        Some(Cell::Float(f)) => SortKey::Number(*f),
        Some(Cell::Str(s)) => match s.trim().parse::<f64>() {
            Ok(f) if f.is_finite() => SortKey::Number(f),
            _ => SortKey::Text(fold_accents(s), s.to_lowercase()),
        },
        Some(Cell::Null) | None => SortKey::Empty,
    }
}

fn compare_keys(a: &SortKey, b: &SortKey) -> Ordering {
    match (a, b) {
        (SortKey::Empty, SortKey::Empty) => Ordering::Equal,
        (SortKey::Empty, _) => Ordering::Less,
        (_, SortKey::Empty) => Ordering::Greater,
        (SortKey::Number(x), SortKey::Number(y)) => x.total_cmp(y),
        (SortKey::Number(_), SortKey::Text(..)) => Ordering::Less,
        (SortKey::Text(..), SortKey::Number(_)) => Ordering::Greater,
        (SortKey::Text(x, x_raw), SortKey::Text(y, y_raw)) => {
            x.cmp(y).then_with(|| x_raw.cmp(y_raw))
        }
    }
}

/// Stable sort by one column. Numeric values (including numeric-looking
/// text) compare numerically, other text compares lowercased without
/// accents, nulls first.
pub fn sort_records(records: &mut [&Record], column: &HeaderKey, direction: SortDirection) {
    records.sort_by(|a, b| {
        let ord = compare_keys(&sort_key(a.get(column)), &sort_key(b.get(column)));
        match direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::report::parse;

    const REPORT: &str = "ID,Cliente,Cédula,Edificio,Monto,Pagado,Estado\n\
        1,Ana Gómez,111,Torre Sol,300,Sí,Confirmada\n\
        2,bruno,222,Torre Luna,50,No,Cancelada\n\
        3,Carla,333,,1200,Sí,Confirmada\n\
        4,Ana Ruiz,444,Torre Sol,N/A,No,En curso";

    fn ids(records: &[&Record]) -> Vec<String> {
        records.iter().map(|r| r.text(CanonicalHeader::Id)).collect()
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let result = parse(REPORT).unwrap();
        let filter = RecordFilter {
            search: Some("ANA".into()),
            ..Default::default()
        };
        assert_eq!(ids(&filter.apply(&result.records)), vec!["1", "4"]);

        let by_cedula = RecordFilter {
            search: Some("333".into()),
            ..Default::default()
        };
        assert_eq!(ids(&by_cedula.apply(&result.records)), vec!["3"]);
    }

    #[test]
    fn test_exact_filters_combine() {
        let result = parse(REPORT).unwrap();
        let filter = RecordFilter {
            pagado: Some("Sí".into()),
            edificio: Some("Torre Sol".into()),
            ..Default::default()
        };
        assert_eq!(ids(&filter.apply(&result.records)), vec!["1"]);
        assert!(RecordFilter::default().is_empty());
        assert_eq!(RecordFilter::default().apply(&result.records).len(), 4);
    }

    #[test]
    fn test_edificio_options() {
        let result = parse(REPORT).unwrap();
        assert_eq!(edificio_options(&result.records), vec!["Torre Luna", "Torre Sol"]);
    }

    #[test]
    fn test_sort_toggle() {
        let mut state = SortState::default();
        state.toggle(CanonicalHeader::Monto.into());
        assert_eq!(state.direction, SortDirection::Asc);
        state.toggle(CanonicalHeader::Monto.into());
        assert_eq!(state.direction, SortDirection::Desc);
        state.toggle(CanonicalHeader::Cliente.into());
        assert_eq!(state.column, Some(CanonicalHeader::Cliente.into()));
        assert_eq!(state.direction, SortDirection::Asc);
    }

    #[test]
    fn test_sort_numeric_and_text() {
        let result = parse(REPORT).unwrap();
        let mut rows: Vec<&Record> = result.records.iter().collect();

        sort_records(&mut rows, &CanonicalHeader::Monto.into(), SortDirection::Desc);
        assert_eq!(ids(&rows), vec!["3", "1", "2", "4"]);

        sort_records(&mut rows, &CanonicalHeader::Cliente.into(), SortDirection::Asc);
        assert_eq!(ids(&rows), vec!["1", "4", "2", "3"]);
    }

    #[test]
    fn test_sort_ignores_accents() {
        let result = parse(
            "ID,Cliente\n1,Zoe\n2,Ángela\n3,Óscar\n4,angela\n5,Nuñez\n6,Nora",
        )
        .unwrap();
        let mut rows: Vec<&Record> = result.records.iter().collect();
        sort_records(&mut rows, &CanonicalHeader::Cliente.into(), SortDirection::Asc);
        assert_eq!(ids(&rows), vec!["4", "2", "6", "5", "3", "1"]);
    }
}
