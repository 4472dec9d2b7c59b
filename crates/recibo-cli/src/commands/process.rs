//! Process command - extract data from a single receipt file.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

use recibo_core::models::config::ReciboConfig;
use recibo_core::models::record::{ReciboRecord, ServiceType};
use recibo_core::source::{PageRenderer, TextSource};
use recibo_core::ReciboParser;
use recibo_pdf::preprocess::enhance_for_ocr;
use recibo_pdf::{PdfExtractor, PdfType};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file (PDF)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Service type override when classification is inconclusive
    #[arg(short, long, value_enum)]
    service: Option<ServiceArg>,

    /// Write enhanced page images to this directory for an external OCR
    /// engine when the embedded text layer is insufficient
    #[arg(long)]
    dump_pages: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum ServiceArg {
    Cfe,
    Japam,
    Gas,
}

impl From<ServiceArg> for ServiceType {
    fn from(arg: ServiceArg) -> Self {
        match arg {
            ServiceArg::Cfe => ServiceType::Cfe,
            ServiceArg::Japam => ServiceType::Japam,
            ServiceArg::Gas => ServiceType::Gas,
        }
    }
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {msg}")
            .unwrap()
            .progress_chars("##-"),
    );

    let record = extract_record(&args.input, args.service.map(Into::into), &config, &pb)?;

    pb.finish_with_message("Done");

    if record.error.is_some() {
        if let Some(dir) = &args.dump_pages {
            match dump_enhanced_pages(&args.input, dir, &config) {
                Ok(count) => println!(
                    "{} Wrote {} enhanced page image(s) to {} for external OCR",
                    style("ℹ").blue(),
                    count,
                    dir.display()
                ),
                Err(e) => warn!("could not dump page images: {}", e),
            }
        }
    }

    let output = format_record(&record, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    if let Some(cause) = &record.error {
        eprintln!("{} {}", style("⚠").yellow(), cause);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

pub fn load_config(config_path: Option<&str>) -> anyhow::Result<ReciboConfig> {
    Ok(match config_path {
        Some(path) => ReciboConfig::from_file(Path::new(path))?,
        None => ReciboConfig::default(),
    })
}

/// Run the full pipeline for one file: text source, hint, cascade.
pub fn extract_record(
    input: &Path,
    service_override: Option<ServiceType>,
    config: &ReciboConfig,
    pb: &ProgressBar,
) -> anyhow::Result<ReciboRecord> {
    let filename = input
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("document.pdf")
        .to_string();

    pb.set_message("Loading PDF...");
    pb.set_position(10);

    let data = fs::read(input)?;
    let extractor = PdfExtractor::new();

    pb.set_message("Analyzing PDF...");
    pb.set_position(25);

    let pdf_type = extractor.analyze(&data);
    debug!("PDF type: {:?}", pdf_type);

    pb.set_message("Extracting text...");
    pb.set_position(45);

    let text = if config.pdf.prefer_embedded_text || pdf_type == PdfType::Text {
        match extractor.extract_text(&data) {
            Ok(text) => text,
            Err(e) => {
                warn!("text extraction failed for {}: {}", filename, e);
                String::new()
            }
        }
    } else {
        String::new()
    };

    if text.trim().len() < config.pdf.min_text_length
        && matches!(pdf_type, PdfType::Image | PdfType::Hybrid)
    {
        // The OCR engine is an injected collaborator; without one
        // configured, a scanned receipt degrades to the error record.
        // --dump-pages hands the enhanced page images to an external one.
        warn!(
            "{} has insufficient embedded text and no OCR engine is configured",
            filename
        );
    }

    pb.set_message("Extracting receipt data...");
    pb.set_position(75);

    // Filename tokens back up the classifier when no override is given.
    let hint = service_override.or_else(|| ServiceType::from_filename_hint(&filename));

    let parser = ReciboParser::with_config(config);
    let record = parser.parse(&text, &filename, hint);

    pb.set_position(100);

    Ok(record)
}

/// Render, enhance and save page images so an external OCR engine can take
/// over where the embedded text layer gave up.
fn dump_enhanced_pages(
    input: &Path,
    dir: &Path,
    config: &ReciboConfig,
) -> anyhow::Result<usize> {
    let data = fs::read(input)?;
    let extractor = PdfExtractor::new();

    let pages = extractor.render_pages(&data, config.pdf.render_dpi)?;
    let limit = if config.pdf.max_pages == 0 {
        pages.len()
    } else {
        config.pdf.max_pages.min(pages.len())
    };

    fs::create_dir_all(dir)?;
    for (i, page) in pages.iter().take(limit).enumerate() {
        let enhanced = enhance_for_ocr(page);
        let path = dir.join(format!("page_{:02}.png", i + 1));
        enhanced.save(&path)?;
        debug!("wrote {}", path.display());
    }

    Ok(limit)
}

pub fn format_record(record: &ReciboRecord, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string(record)?),
        OutputFormat::Csv => format_csv(record),
        OutputFormat::Text => Ok(format_text(record)),
    }
}

pub const CSV_HEADER: [&str; 18] = [
    "archivo",
    "service_type",
    "titular",
    "direccion",
    "no_servicio",
    "cuenta",
    "no_medidor",
    "periodo",
    "total",
    "consumo",
    "tarifa",
    "fecha_pago",
    "fecha_corte",
    "rmu",
    "calidad",
    "tipo_lectura",
    "consumo_kwh",
    "consumo_m3",
];

pub fn csv_row(record: &ReciboRecord) -> [&str; 18] {
    [
        &record.archivo,
        record.service_type.as_str(),
        &record.titular,
        &record.direccion,
        &record.no_servicio,
        &record.cuenta,
        &record.no_medidor,
        &record.periodo,
        &record.total,
        &record.consumo,
        &record.tarifa,
        &record.fecha_pago,
        &record.fecha_corte,
        &record.rmu,
        &record.calidad,
        &record.tipo_lectura,
        &record.consumo_kwh,
        &record.consumo_m3,
    ]
}

fn format_csv(record: &ReciboRecord) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(CSV_HEADER)?;
    wtr.write_record(csv_row(record))?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(record: &ReciboRecord) -> String {
    let mut output = String::new();

    output.push_str(&format!("Receipt: {}\n", record.archivo));
    output.push_str(&format!("Service: {}\n", record.service_type));
    output.push('\n');

    output.push_str(&format!("Holder:      {}\n", record.titular));
    output.push_str(&format!("Address:     {}\n", record.direccion));
    output.push_str(&format!("Service no.: {}\n", record.no_servicio));
    output.push_str(&format!("Account:     {}\n", record.cuenta));
    output.push_str(&format!("Meter:       {}\n", record.no_medidor));
    output.push('\n');

    output.push_str(&format!("Period:      {}\n", record.periodo));
    output.push_str(&format!("Consumption: {}\n", record.consumo));
    output.push_str(&format!("Tariff:      {}\n", record.tarifa));
    output.push_str(&format!("Total due:   {}\n", record.total));
    output.push_str(&format!("Pay by:      {}\n", record.fecha_pago));
    output.push_str(&format!("Cutoff:      {}\n", record.fecha_corte));

    if let Some(error) = &record.error {
        output.push_str(&format!("\nError: {}\n", error));
    }

    output
}
