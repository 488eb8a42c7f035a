use std::fmt;
use tracing::debug;

use super::parser::CsvParser;

/// Known report columns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CanonicalHeader {
    Id,
    Cliente,
    Cedula,
    Telefono,
    Departamento,
    Edificio,
    CheckIn,
    CheckOut,
    Dias,
    Monto,
    Pagado,
    MetodoPago,
    FechaPago,
    Estado,
}

impl CanonicalHeader {
    pub fn key(&self) -> &'static str {
        match self {
            CanonicalHeader::Id => "id",
            CanonicalHeader::Cliente => "cliente",
            CanonicalHeader::Cedula => "cedula",
            CanonicalHeader::Telefono => "telefono",
            CanonicalHeader::Departamento => "departamento",
            CanonicalHeader::Edificio => "edificio",
            CanonicalHeader::CheckIn => "check_in",
            CanonicalHeader::CheckOut => "check_out",
            CanonicalHeader::Dias => "dias",
            CanonicalHeader::Monto => "monto",
            CanonicalHeader::Pagado => "pagado",
            CanonicalHeader::MetodoPago => "metodo_pago",
            CanonicalHeader::FechaPago => "fecha_pago",
            CanonicalHeader::Estado => "estado",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        let header = match key {
            "id" => CanonicalHeader::Id,
            "cliente" => CanonicalHeader::Cliente,
            "cedula" => CanonicalHeader::Cedula,
            "telefono" => CanonicalHeader::Telefono,
            "departamento" => CanonicalHeader::Departamento,
            "edificio" => CanonicalHeader::Edificio,
            "check_in" => CanonicalHeader::CheckIn,
            "check_out" => CanonicalHeader::CheckOut,
            "dias" => CanonicalHeader::Dias,
            "monto" => CanonicalHeader::Monto,
            "pagado" => CanonicalHeader::Pagado,
            "metodo_pago" => CanonicalHeader::MetodoPago,
            "fecha_pago" => CanonicalHeader::FechaPago,
            "estado" => CanonicalHeader::Estado,
            _ => return None,
        };
        Some(header)
    }

    /// Column title used when writing a report back out.
    pub fn title(&self) -> &'static str {
        match self {
            CanonicalHeader::Id => "ID",
            CanonicalHeader::Cliente => "Cliente",
            CanonicalHeader::Cedula => "Cédula",
            CanonicalHeader::Telefono => "Teléfono",
            CanonicalHeader::Departamento => "Departamento",
            CanonicalHeader::Edificio => "Edificio",
            CanonicalHeader::CheckIn => "Check-in",
            CanonicalHeader::CheckOut => "Check-out",
            CanonicalHeader::Dias => "Días",
            CanonicalHeader::Monto => "Monto",
            CanonicalHeader::Pagado => "Pagado",
            CanonicalHeader::MetodoPago => "Método de Pago",
            CanonicalHeader::FechaPago => "Fecha de Pago",
            CanonicalHeader::Estado => "Estado",
        }
    }
}

/// Accepted spellings for each column, as they appear in exports.
const HEADER_ALIASES: &[(&str, CanonicalHeader)] = &[
    ("ID Reserva", CanonicalHeader::Id),
    ("ID", CanonicalHeader::Id),
    ("Cliente", CanonicalHeader::Cliente),
    ("Cédula", CanonicalHeader::Cedula),
    ("Teléfono", CanonicalHeader::Telefono),
    ("Departamento", CanonicalHeader::Departamento),
    ("Edificio", CanonicalHeader::Edificio),
    ("Check-in", CanonicalHeader::CheckIn),
    ("Check-out", CanonicalHeader::CheckOut),
    ("Días", CanonicalHeader::Dias),
    ("Monto", CanonicalHeader::Monto),
    ("Pagado", CanonicalHeader::Pagado),
    ("Método de Pago", CanonicalHeader::MetodoPago),
    ("Método de pago", CanonicalHeader::MetodoPago),
    ("Método", CanonicalHeader::MetodoPago),
    ("Fecha de Pago", CanonicalHeader::FechaPago),
    ("Fecha de pago", CanonicalHeader::FechaPago),
    ("Fecha Pago", CanonicalHeader::FechaPago),
    ("Estado", CanonicalHeader::Estado),
];

/// A resolved column key: a known column or a derived snake_case name.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum HeaderKey {
    Canonical(CanonicalHeader),
    Other(String),
}

impl HeaderKey {
    pub fn as_str(&self) -> &str {
        match self {
            HeaderKey::Canonical(h) => h.key(),
            HeaderKey::Other(s) => s.as_str(),
        }
    }
}

impl From<CanonicalHeader> for HeaderKey {
    fn from(h: CanonicalHeader) -> Self {
        HeaderKey::Canonical(h)
    }
}

impl fmt::Display for HeaderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One alias rule. Rules are tried in order; the first `Some` wins and
/// [`derived_key`] covers whatever none of them match.
pub type HeaderRule = fn(&str) -> Option<HeaderKey>;

pub const HEADER_RULES: &[HeaderRule] = &[exact_alias, case_insensitive_alias];

pub fn exact_alias(header: &str) -> Option<HeaderKey> {
    HEADER_ALIASES
        .iter()
        .find(|(alias, _)| *alias == header)
        .map(|(_, h)| HeaderKey::Canonical(*h))
}

pub fn case_insensitive_alias(header: &str) -> Option<HeaderKey> {
    let lower = header.to_lowercase();
    HEADER_ALIASES
        .iter()
        .find(|(alias, _)| alias.to_lowercase() == lower)
        .map(|(_, h)| HeaderKey::Canonical(*h))
}

/// Lowercases, joins whitespace runs with `_` and drops acute accents.
/// A result spelling a known column key (`Cedula`, `Check In`) resolves to
/// that column.
pub fn derived_key(header: &str) -> HeaderKey {
    let key = snake_words(&header.to_lowercase())
        .chars()
        .map(|c| match c {
            'á' => 'a',
            'é' => 'e',
            'í' => 'i',
            'ó' => 'o',
            'ú' => 'u',
            other => other,
        })
        .collect::<String>();
    match CanonicalHeader::from_key(&key) {
        Some(h) => HeaderKey::Canonical(h),
        None => HeaderKey::Other(key),
    }
}

/// Replaces every run of whitespace with a single underscore.
pub(crate) fn snake_words(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_space = false;
    for c in s.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push('_');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
    out
}

pub fn resolve_header(raw: &str) -> HeaderKey {
    let cleaned = raw.trim().trim_matches('"').trim();
    HEADER_RULES
        .iter()
        .find_map(|rule| rule(cleaned))
        .unwrap_or_else(|| derived_key(cleaned))
}

/// The header row of a report and where it was found.
#[derive(Clone, Debug, PartialEq)]
pub struct HeaderRow {
    pub index: usize,
    pub keys: Vec<HeaderKey>,
}

/// Finds the first line mentioning both `ID` and `Cliente` and resolves its
/// columns. Lines above it (titles, export dates) are ignored.
pub fn find_header_row(lines: &[String]) -> Option<HeaderRow> {
    let index = lines
        .iter()
        .position(|line| line.contains("ID") && line.contains("Cliente"))?;
    let keys: Vec<HeaderKey> = CsvParser::parse_line(&lines[index])
        .iter()
        .map(|field| resolve_header(field))
        .collect();
    debug!(index, columns = keys.len(), "header row found");
    Some(HeaderRow { index, keys })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_alias_resolves() {
        for (alias, expected) in HEADER_ALIASES {
            assert_eq!(resolve_header(alias), HeaderKey::Canonical(*expected), "{alias}");
            assert_eq!(
                resolve_header(&alias.to_uppercase()),
                HeaderKey::Canonical(*expected),
                "{alias} uppercased"
            );
            assert_eq!(
                resolve_header(&format!(" \"{alias}\" ")),
                HeaderKey::Canonical(*expected),
                "{alias} quoted"
            );
        }
    }

    #[test]
    fn test_case_variants() {
        assert_eq!(resolve_header("id reserva"), CanonicalHeader::Id.into());
        assert_eq!(resolve_header("MÉTODO DE PAGO"), CanonicalHeader::MetodoPago.into());
        assert_eq!(resolve_header("fecha pago"), CanonicalHeader::FechaPago.into());
    }

    #[test]
    fn test_derived_key_fallback() {
        assert_eq!(resolve_header("Número  de Habitación"), HeaderKey::Other("numero_de_habitacion".into()));
        assert_eq!(resolve_header("Observaciones"), HeaderKey::Other("observaciones".into()));
        assert_eq!(resolve_header(""), HeaderKey::Other(String::new()));
    }

    #[test]
    fn test_derived_key_matching_known_column() {
        assert_eq!(resolve_header("Cedula"), CanonicalHeader::Cedula.into());
        assert_eq!(resolve_header("Telefono"), CanonicalHeader::Telefono.into());
        assert_eq!(resolve_header("Dias"), CanonicalHeader::Dias.into());
        assert_eq!(resolve_header("Check In"), CanonicalHeader::CheckIn.into());
        assert_eq!(resolve_header("check  out"), CanonicalHeader::CheckOut.into());
        assert_eq!(resolve_header("Método Pago"), CanonicalHeader::MetodoPago.into());
        assert_eq!(derived_key("Fecha  de Pagó"), HeaderKey::Other("fecha_de_pago".into()));
    }

    #[test]
    fn test_rules_run_in_order() {
        assert_eq!(exact_alias("cliente"), None);
        assert_eq!(case_insensitive_alias("cliente"), Some(CanonicalHeader::Cliente.into()));
        assert_eq!(derived_key("Observación Final"), HeaderKey::Other("observacion_final".into()));
        assert_eq!(resolve_header("cliente"), CanonicalHeader::Cliente.into());
    }

    #[test]
    fn test_find_header_row_skips_preamble() {
        let lines: Vec<String> = ["REPORTE DE RESERVAS", "Generado: 2024-05-01", "ID,Cliente,Monto", "1,Ana,100"]
            .into_iter()
            .map(String::from)
            .collect();
        let row = find_header_row(&lines).unwrap();
        assert_eq!(row.index, 2);
        assert_eq!(
            row.keys,
            vec![CanonicalHeader::Id.into(), CanonicalHeader::Cliente.into(), CanonicalHeader::Monto.into()]
        );
    }

    #[test]
    fn test_header_match_is_case_sensitive() {
        let lines = vec!["id,cliente".to_string(), "1,Ana".to_string()];
        assert_eq!(find_header_row(&lines), None);
    }
}
