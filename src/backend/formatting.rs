use super::cell::{Cell, Number};

/// Placeholder shown for missing values.
pub const MISSING: &str = "N/A";

/// Formats an amount with `.` as thousands separator and `,` for decimals,
/// e.g. `₲ 1.234.567` or `₲ 80.000,5`.
pub fn format_currency(amount: Number, symbol: &str) -> String {
    let value = amount.as_f64();
    let negative = value < 0.0;
    let rounded = (value.abs() * 1000.0).round() / 1000.0;
    let whole = rounded.trunc() as u64;
    let frac = format!("{:.3}", rounded.fract());
    let frac = frac.trim_start_matches('0').trim_start_matches('.').trim_end_matches('0');

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }

    let sign = if negative { "-" } else { "" };
    if frac.is_empty() {
        format!("{symbol} {sign}{grouped}")
    } else {
        format!("{symbol} {sign}{grouped},{frac}")
    }
}

/// Table text for a cell; null shows as `N/A`.
pub fn display_cell(cell: Option<&Cell>) -> String {
    match cell {
        None | Some(Cell::Null) => MISSING.to_string(),
        Some(c) => c.to_text(),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PagoBadge {
    Pagado,
    Pendiente,
}

impl PagoBadge {
    pub fn for_cell(cell: Option<&Cell>) -> Self {
        match cell.and_then(Cell::as_str) {
            Some("Sí") => PagoBadge::Pagado,
            _ => PagoBadge::Pendiente,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PagoBadge::Pagado => "Pagado",
            PagoBadge::Pendiente => "Pendiente",
        }
    }
}

/// Reservation state, recognised loosely from free text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EstadoBadge {
    Confirmada,
    EnCurso,
    Completada,
    Cancelada,
    Other(String),
    Missing,
}

impl EstadoBadge {
    pub fn for_cell(cell: Option<&Cell>) -> Self {
        let text = match cell {
            None | Some(Cell::Null) => return EstadoBadge::Missing,
            Some(c) => c.to_text(),
        };
        let lower = text.to_lowercase();
        if lower.contains("confirmada") || lower.contains("confirmado") {
            EstadoBadge::Confirmada
        } else if lower.contains("curso") {
            EstadoBadge::EnCurso
        } else if lower.contains("completada") || lower.contains("completado") {
            EstadoBadge::Completada
        } else if lower.contains("cancelada") || lower.contains("cancelado") {
            EstadoBadge::Cancelada
        } else {
            EstadoBadge::Other(text)
        }
    }

    pub fn label(&self) -> &str {
        match self {
            EstadoBadge::Confirmada => "Confirmada",
            EstadoBadge::EnCurso => "En Curso",
            EstadoBadge::Completada => "Completada",
            EstadoBadge::Cancelada => "Cancelada",
            EstadoBadge::Other(text) => text.as_str(),
            EstadoBadge::Missing => MISSING,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(Number::Int(0), "₲"), "₲ 0");
        assert_eq!(format_currency(Number::Int(999), "₲"), "₲ 999");
        assert_eq!(format_currency(Number::Int(1234567), "₲"), "₲ 1.234.567");
        assert_eq!(format_currency(Number::Float(80000.5), "₲"), "₲ 80.000,5");
        assert_eq!(format_currency(Number::Int(-1500), "Gs"), "Gs -1.500");
    }

    #[test]
    fn test_display_cell() {
        assert_eq!(display_cell(None), "N/A");
        assert_eq!(display_cell(Some(&Cell::Null)), "N/A");
        assert_eq!(display_cell(Some(&Cell::Int(3))), "3");
    }

    #[test]
    fn test_badges() {
        assert_eq!(PagoBadge::for_cell(Some(&Cell::Str("Sí".into()))), PagoBadge::Pagado);
        assert_eq!(PagoBadge::for_cell(Some(&Cell::Str("No".into()))), PagoBadge::Pendiente);
        assert_eq!(PagoBadge::for_cell(None).label(), "Pendiente");

        assert_eq!(EstadoBadge::for_cell(Some(&Cell::Str("CONFIRMADO".into()))), EstadoBadge::Confirmada);
        assert_eq!(EstadoBadge::for_cell(Some(&Cell::Str("En curso".into()))).label(), "En Curso");
        assert_eq!(EstadoBadge::for_cell(Some(&Cell::Str("Cancelada".into()))), EstadoBadge::Cancelada);
        assert_eq!(EstadoBadge::for_cell(Some(&Cell::Str("Bloqueada".into()))).label(), "Bloqueada");
        assert_eq!(EstadoBadge::for_cell(Some(&Cell::Null)).label(), "N/A");
    }
}
