use tracing::debug;

use super::cell::{Cell, Number, clean_value};
use super::headers::{CanonicalHeader, snake_words};
use super::parser::CsvParser;
use super::report::Record;

pub const SUMMARY_MARKER: &str = "RESUMEN";

/// Aggregate totals for a report, either read from its `RESUMEN` block or
/// computed from the records.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Summary {
    pub total_reservas: Option<Number>,
    pub reservas_pagadas: Option<Number>,
    pub reservas_pendientes: Option<Number>,
    pub total_ingresos: Option<Number>,
    pub total_pendientes: Option<Number>,
    pub total_general: Option<Number>,
}

/// Names of the six summary fields, in matching priority.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SummaryField {
    TotalReservas,
    ReservasPagadas,
    ReservasPendientes,
    TotalIngresos,
    TotalPendientes,
    TotalGeneral,
}

impl SummaryField {
    pub fn all() -> &'static [SummaryField] {
        &[
            SummaryField::TotalReservas,
            SummaryField::ReservasPagadas,
            SummaryField::ReservasPendientes,
            SummaryField::TotalIngresos,
            SummaryField::TotalPendientes,
            SummaryField::TotalGeneral,
        ]
    }

    pub fn key(&self) -> &'static str {
        match self {
            SummaryField::TotalReservas => "total_reservas",
            SummaryField::ReservasPagadas => "reservas_pagadas",
            SummaryField::ReservasPendientes => "reservas_pendientes",
            SummaryField::TotalIngresos => "total_ingresos",
            SummaryField::TotalPendientes => "total_pendientes",
            SummaryField::TotalGeneral => "total_general",
        }
    }

    /// First field whose key is contained in `key`.
    pub fn for_key(key: &str) -> Option<SummaryField> {
        Self::all().iter().copied().find(|f| key.contains(f.key()))
    }
}

impl Summary {
    /// All six fields set to integer zero.
    pub fn zeroed() -> Self {
        Self {
            total_reservas: Some(Number::Int(0)),
            reservas_pagadas: Some(Number::Int(0)),
            reservas_pendientes: Some(Number::Int(0)),
            total_ingresos: Some(Number::Int(0)),
            total_pendientes: Some(Number::Int(0)),
            total_general: Some(Number::Int(0)),
        }
    }

    pub fn get(&self, field: SummaryField) -> Option<Number> {
        match field {
            SummaryField::TotalReservas => self.total_reservas,
            SummaryField::ReservasPagadas => self.reservas_pagadas,
            SummaryField::ReservasPendientes => self.reservas_pendientes,
            SummaryField::TotalIngresos => self.total_ingresos,
            SummaryField::TotalPendientes => self.total_pendientes,
            SummaryField::TotalGeneral => self.total_general,
        }
    }

    pub fn get_or_zero(&self, field: SummaryField) -> Number {
        self.get(field).unwrap_or_default()
    }

    fn slot(&mut self, field: SummaryField) -> &mut Option<Number> {
        match field {
            SummaryField::TotalReservas => &mut self.total_reservas,
            SummaryField::ReservasPagadas => &mut self.reservas_pagadas,
            SummaryField::ReservasPendientes => &mut self.reservas_pendientes,
            SummaryField::TotalIngresos => &mut self.total_ingresos,
            SummaryField::TotalPendientes => &mut self.total_pendientes,
            SummaryField::TotalGeneral => &mut self.total_general,
        }
    }
}

/// Reads `key,value` pairs following a `RESUMEN` marker.
///
/// Returns `None` when no line matched a summary field. A matched line whose
/// value is not numeric still counts as matched but leaves the field empty.
pub fn extract_summary(lines: &[String]) -> Option<Summary> {
    let mut summary = Summary::default();
    let mut matched = 0usize;

    for line in lines {
        if line.is_empty() || line.starts_with(SUMMARY_MARKER) {
            continue;
        }

        let parts = CsvParser::parse_line(line);
        if parts.len() < 2 {
            continue;
        }

        let key = snake_words(&parts[0].to_lowercase());
        let Some(field) = SummaryField::for_key(&key) else {
            continue;
        };

        *summary.slot(field) = match clean_value(&parts[1]) {
            Cell::Int(n) => Some(Number::Int(n)),
            Cell::Float(f) => Some(Number::Float(f)),
            Cell::Null | Cell::Str(_) => None,
        };
        matched += 1;
    }

    debug!(matched, "summary block scanned");
    (matched > 0).then_some(summary)
}

/// Derives the summary from records: `pagado == "Sí"` is paid, `"No"` is
/// pending, anything else is in neither bucket.
pub fn calculate_stats(records: &[Record]) -> Summary {
    if records.is_empty() {
        return Summary::zeroed();
    }

    let mut paid = 0i64;
    let mut pending = 0i64;
    let mut ingresos = Number::Int(0);
    let mut pendientes = Number::Int(0);

    for record in records {
        let monto = record
            .field(CanonicalHeader::Monto)
            .and_then(Cell::as_number)
            .unwrap_or_default();
        match record.field(CanonicalHeader::Pagado).and_then(Cell::as_str) {
            Some("Sí") => {
                paid += 1;
                ingresos = ingresos + monto;
            }
            Some("No") => {
                pending += 1;
                pendientes = pendientes + monto;
            }
            _ => {}
        }
    }

    Summary {
        total_reservas: Some(Number::Int(records.len() as i64)),
        reservas_pagadas: Some(Number::Int(paid)),
        reservas_pendientes: Some(Number::Int(pending)),
        total_ingresos: Some(ingresos),
        total_pendientes: Some(pendientes),
        total_general: Some(ingresos + pendientes),
    }
}
