use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

use super::cell::Cell;
use super::headers::{CanonicalHeader, HeaderKey};
use super::report::Record;

const BOM: &str = "\u{feff}";

/// Columns of an exported report, in order, and whether each is free text.
/// Text columns are always quoted; the rest are written bare.
const EXPORT_COLUMNS: &[(CanonicalHeader, bool)] = &[
    (CanonicalHeader::Id, false),
    (CanonicalHeader::Cliente, true),
    (CanonicalHeader::Cedula, true),
    (CanonicalHeader::Telefono, true),
    (CanonicalHeader::Departamento, true),
    (CanonicalHeader::Edificio, true),
    (CanonicalHeader::CheckIn, false),
    (CanonicalHeader::CheckOut, false),
    (CanonicalHeader::Dias, false),
    (CanonicalHeader::Monto, false),
    (CanonicalHeader::Pagado, false),
    (CanonicalHeader::MetodoPago, true),
    (CanonicalHeader::FechaPago, false),
    (CanonicalHeader::Estado, true),
];

fn quote(text: &str) -> String {
    format!("\"{}\"", text.replace('"', "\"\""))
}

fn text_field(cell: Option<&Cell>) -> String {
    match cell {
        None | Some(Cell::Null) => "N/A".to_string(),
        Some(c) => quote(&c.to_text()),
    }
}

fn bare_field(cell: Option<&Cell>) -> String {
    let text = cell.map(Cell::to_text).unwrap_or_default();
    if text.contains(',') || text.contains('"') {
        quote(&text)
    } else {
        text
    }
}

fn row_to_csv(record: &Record) -> String {
    EXPORT_COLUMNS
        .iter()
        .map(|(header, is_text)| {
            let cell = record.field(*header);
            if *is_text { text_field(cell) } else { bare_field(cell) }
        })
        .collect::<Vec<_>>()
        .join(",")
}

/// Serializes records as a report CSV: BOM, fixed header line, one row each.
pub fn to_report_csv<'a, I>(records: I) -> String
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut output = String::from(BOM);
    let titles: Vec<&str> = EXPORT_COLUMNS.iter().map(|(h, _)| h.title()).collect();
    output.push_str(&titles.join(","));
    output.push('\n');

    for record in records {
        output.push_str(&row_to_csv(record));
        output.push('\n');
    }
    output
}

/// Default download name, e.g. `reporte_filtrado_2024-05-01.csv`.
pub fn export_filename(prefix: &str, date: NaiveDate) -> String {
    format!("{}_{}.csv", prefix, date.format("%Y-%m-%d"))
}

pub fn write_report_csv(path: &Path, records: &[&Record]) -> Result<()> {
    if records.is_empty() {
        bail!("no records to export");
    }
    std::fs::write(path, to_report_csv(records.iter().copied()))
        .with_context(|| format!("Failed to write CSV file: {:?}", path))?;
    info!(path = %path.display(), records = records.len(), "report exported");
    Ok(())
}

/// Writes records as a JSON array of objects keyed in header order.
pub fn export_to_json(path: &Path, headers: &[HeaderKey], records: &[&Record]) -> Result<()> {
    if records.is_empty() {
        bail!("no records to export");
    }
    let output = File::create(path).with_context(|| format!("Failed to create file: {:?}", path))?;
    let mut writer = BufWriter::new(output);

    writer.write_all(b"[")?;

    let mut first = true;
    for record in records {
        if !first {
            writer.write_all(b",")?;
        }
        first = false;

        let mut map = serde_json::Map::new();
        for key in headers {
            let value = record.get(key).cloned().unwrap_or(Cell::Null);
            map.insert(key.to_string(), serde_json::to_value(value)?);
        }

        serde_json::to_writer(&mut writer, &map)?;
    }

    writer.write_all(b"]")?;
    writer.flush()?;
    info!(path = %path.display(), records = records.len(), "JSON exported");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::filter::RecordFilter;
    use crate::backend::report::parse;
    use tempfile::tempdir;

    const REPORT: &str = "ID Reserva,Cliente,Cédula,Teléfono,Edificio,Check-in,Días,Monto,Pagado,Método,Estado\n\
        1,\"Hotel \"\"Sol\"\", Ana\",123,0981 555,Torre A,2024-05-02,3,150000,Sí,Efectivo,Confirmada\n\
        2,Luis,N/A,,Torre B,2024-05-03,2,80000.0,No,N/A,Pendiente\n\
        3,Marta,77,,Torre A,,1,99.25,Sí,Transferencia,Completada";

    #[test]
    fn test_csv_layout() {
        let result = parse(REPORT).unwrap();
        let csv = to_report_csv(&result.records[..1]);
        assert!(csv.starts_with('\u{feff}'));

        let mut lines = csv.trim_start_matches('\u{feff}').lines();
        assert_eq!(
            lines.next(),
            Some("ID,Cliente,Cédula,Teléfono,Departamento,Edificio,Check-in,Check-out,Días,Monto,Pagado,Método de Pago,Fecha de Pago,Estado")
        );
        assert_eq!(
            lines.next(),
            Some("1,\"Hotel \"\"Sol\"\", Ana\",\"123\",\"0981 555\",N/A,\"Torre A\",2024-05-02,,3,150000,Sí,\"Efectivo\",,\"Confirmada\"")
        );
    }

    #[test]
    fn test_round_trip_filtered_subset() {
        let original = parse(REPORT).unwrap();
        let filter = RecordFilter {
            edificio: Some("Torre A".into()),
            ..Default::default()
        };
        let subset = filter.apply(&original.records);
        assert_eq!(subset.len(), 2);

        let reparsed = parse(&to_report_csv(subset.iter().copied())).unwrap();
        assert_eq!(reparsed.records.len(), subset.len());
        for (before, after) in subset.iter().zip(&reparsed.records) {
            for key in &original.headers {
                assert_eq!(after.get(key), before.get(key), "column {key}");
            }
        }
    }

    #[test]
    fn test_round_trip_unaccented_headers() {
        let original = parse(
            "ID,Cliente,Cedula,Telefono,Check In,Check Out,Dias,Monto\n\
             7,Ana,4567,0981 222,2024-05-02,2024-05-05,3,150000",
        )
        .unwrap();
        let csv = to_report_csv(&original.records);
        let row = csv.lines().nth(1).unwrap();
        assert_eq!(row, "7,\"Ana\",\"4567\",\"0981 222\",N/A,N/A,2024-05-02,2024-05-05,3,150000,,N/A,,N/A");

        let reparsed = parse(&csv).unwrap();
        for key in &original.headers {
            assert_eq!(reparsed.records[0].get(key), original.records[0].get(key), "column {key}");
        }
        assert_eq!(reparsed.records[0].field(CanonicalHeader::Cedula), Some(&Cell::Int(4567)));
    }

    #[test]
    fn test_float_survives_round_trip() {
        let original = parse(REPORT).unwrap();
        let reparsed = parse(&to_report_csv(&original.records)).unwrap();
        assert_eq!(reparsed.records[1].field(CanonicalHeader::Monto), Some(&Cell::Float(80000.0)));
    }

    #[test]
    fn test_export_filename() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        assert_eq!(export_filename("reporte_filtrado", date), "reporte_filtrado_2024-05-01.csv");
    }

    #[test]
    fn test_write_files() -> Result<()> {
        let dir = tempdir()?;
        let result = parse(REPORT).unwrap();
        let rows: Vec<&Record> = result.records.iter().collect();

        let csv_path = dir.path().join("out.csv");
        write_report_csv(&csv_path, &rows)?;
        assert_eq!(parse(&std::fs::read_to_string(&csv_path)?)?.records.len(), 3);

        let json_path = dir.path().join("out.json");
        export_to_json(&json_path, &result.headers, &rows)?;
        let json: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&json_path)?)?;
        assert_eq!(json[0]["id"], 1);
        assert_eq!(json[1]["cedula"], serde_json::Value::Null);
        assert_eq!(json[2]["monto"], 99.25);
        assert_eq!(json[0]["metodo_pago"], "Efectivo");
        Ok(())
    }

    #[test]
    fn test_empty_export_is_rejected() {
        let dir = tempdir().unwrap();
        assert!(write_report_csv(&dir.path().join("x.csv"), &[]).is_err());
        assert!(export_to_json(&dir.path().join("x.json"), &[], &[]).is_err());
    }
}
