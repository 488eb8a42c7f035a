use anyhow::Result;
use clap::Parser;
use reservit::backend::export::{export_filename, export_to_json, write_report_csv};
use reservit::backend::filter::{RecordFilter, SortDirection, SortState, edificio_options};
use reservit::backend::formatting::{EstadoBadge, PagoBadge, display_cell, format_currency};
use reservit::backend::headers::{CanonicalHeader, resolve_header};
use reservit::backend::loader::ReportLoader;
use reservit::backend::paged_reader::{PageLink, Pager};
use reservit::backend::settings::Settings;
use reservit::backend::summary::{Summary, SummaryField};
use reservit::{Cell, Record};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(version, about = "Browse and filter reservation report exports", long_about = None)]
struct Args {
    /// Path to the CSV report
    file: PathBuf,

    /// Case-insensitive text search over client, ID number, phone, unit and building
    #[arg(short, long)]
    search: Option<String>,

    /// Only rows whose Pagado column equals this value (e.g. "Sí" or "No")
    #[arg(long)]
    pagado: Option<String>,

    /// Only rows in this building
    #[arg(long)]
    edificio: Option<String>,

    /// Only rows with this state
    #[arg(long)]
    estado: Option<String>,

    /// Column to sort by (report title or key, e.g. "Monto" or "check_in")
    #[arg(long)]
    sort: Option<String>,

    /// Sort descending
    #[arg(long, requires = "sort")]
    desc: bool,

    /// Page to show (1-based)
    #[arg(short, long, default_value_t = 1)]
    page: usize,

    /// Rows per page (defaults to the configured value)
    #[arg(long)]
    page_size: Option<usize>,

    /// Write the filtered rows to this CSV file
    #[arg(long, conflicts_with = "export_default")]
    export: Option<PathBuf>,

    /// Write the filtered rows to a dated CSV in the current directory
    #[arg(long)]
    export_default: bool,

    /// Write the filtered rows to this JSON file
    #[arg(long)]
    json: Option<PathBuf>,

    /// List the buildings present in the report and exit
    #[arg(long)]
    list_edificios: bool,

    /// Delete the saved configuration before running
    #[arg(long)]
    reset_settings: bool,

    /// Log level used when RUST_LOG is not set
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

const TABLE_COLUMNS: &[CanonicalHeader] = &[
    CanonicalHeader::Id,
    CanonicalHeader::Cliente,
    CanonicalHeader::Edificio,
    CanonicalHeader::Departamento,
    CanonicalHeader::CheckIn,
    CanonicalHeader::CheckOut,
    CanonicalHeader::Monto,
    CanonicalHeader::Pagado,
    CanonicalHeader::Estado,
];

fn cell_text(record: &Record, header: CanonicalHeader, settings: &Settings) -> String {
    let cell = record.field(header);
    match header {
        CanonicalHeader::Monto => match cell.and_then(Cell::as_number) {
            Some(amount) if amount.as_f64() != 0.0 => {
                format_currency(amount, &settings.currency_symbol)
            }
            _ => display_cell(None),
        },
        CanonicalHeader::Pagado => PagoBadge::for_cell(cell).label().to_string(),
        CanonicalHeader::Estado => EstadoBadge::for_cell(cell).label().to_string(),
        _ => display_cell(cell),
    }
}

fn print_totals(totals: &Summary, settings: &Settings) {
    let symbol = &settings.currency_symbol;
    println!("Total reservas:   {}", totals.get_or_zero(SummaryField::TotalReservas));
    println!("Reservas pagadas: {}", totals.get_or_zero(SummaryField::ReservasPagadas));
    println!(
        "Total ingresos:   {}",
        format_currency(totals.get_or_zero(SummaryField::TotalIngresos), symbol)
    );
    println!(
        "Total pendientes: {}",
        format_currency(totals.get_or_zero(SummaryField::TotalPendientes), symbol)
    );
}

fn print_page(rows: &[&Record], page: usize, pager: &Pager, settings: &Settings) {
    let titles: Vec<&str> = TABLE_COLUMNS.iter().map(|h| h.title()).collect();
    println!("{}", titles.join(" | "));

    let shown = pager.page(rows, page);
    if shown.is_empty() {
        println!("No se encontraron registros");
        return;
    }
    for record in shown {
        let cells: Vec<String> = TABLE_COLUMNS
            .iter()
            .map(|h| cell_text(record, *h, settings))
            .collect();
        println!("{}", cells.join(" | "));
    }

    let total_pages = pager.total_pages(rows.len());
    if let Some(bounds) = pager.page_bounds(rows.len(), page) {
        let pages: Vec<String> = Pager::footer_links(page, total_pages)
            .into_iter()
            .map(|link| match link {
                PageLink::Page(p) if p == page => format!("[{p}]"),
                PageLink::Page(p) => p.to_string(),
                PageLink::Gap => "...".to_string(),
            })
            .collect();
        println!(
            "Página {} de {} ({}) - Mostrando {}-{} de {} registros",
            page,
            total_pages,
            pages.join(" "),
            bounds.start,
            bounds.end,
            bounds.total
        );
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level);

    if args.reset_settings {
        Settings::reset()?;
    }
    let mut settings = Settings::load();
    let loader = match ReportLoader::open(&args.file) {
        Ok(loader) => loader,
        Err(e) => {
            eprintln!("Error al procesar el archivo: {:#}", e);
            std::process::exit(1);
        }
    };

    settings.add_recent_file(&args.file.to_string_lossy());
    if let Err(e) = settings.save() {
        tracing::warn!("could not save settings: {:#}", e);
    }

    let info = loader.file_info();
    println!(
        "Archivo cargado: {} ({} bytes) - {} registros",
        info.name, info.size_bytes, info.records
    );

    let result = loader.result();
    if args.list_edificios {
        for edificio in edificio_options(&result.records) {
            println!("{edificio}");
        }
        return Ok(());
    }

    print_totals(&result.totals, &settings);
    println!();

    let filter = RecordFilter {
        search: args.search,
        pagado: args.pagado,
        edificio: args.edificio,
        estado: args.estado,
    };
    let mut rows = filter.apply(&result.records);

    if let Some(column) = &args.sort {
        let sort = SortState {
            column: Some(resolve_header(column)),
            direction: if args.desc { SortDirection::Desc } else { SortDirection::Asc },
        };
        sort.sort(&mut rows);
    }

    let pager = Pager::new(args.page_size.unwrap_or(settings.page_size));
    print_page(&rows, args.page, &pager, &settings);

    let export_path = if args.export_default {
        Some(PathBuf::from(export_filename(
            &settings.export_prefix,
            chrono::Local::now().date_naive(),
        )))
    } else {
        args.export
    };
    if let Some(path) = export_path {
        write_report_csv(&path, &rows)?;
        println!("Exportado: {}", path.display());
    }
    if let Some(path) = args.json {
        export_to_json(&path, &result.headers, &rows)?;
        println!("Exportado: {}", path.display());
    }

    Ok(())
}
