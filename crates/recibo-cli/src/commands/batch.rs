//! Batch processing command for multiple receipt files.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, warn};

use recibo_core::models::record::ReciboRecord;

use super::process::{csv_row, extract_record, format_record, load_config, CSV_HEADER};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: super::process::OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;

    // Expand glob pattern
    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            let ext = p.extension().and_then(|e| e.to_str()).unwrap_or("");
            ext.eq_ignore_ascii_case("pdf")
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let overall_pb = ProgressBar::new(files.len() as u64);
    overall_pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")
            .unwrap()
            .progress_chars("=>-"),
    );

    let file_pb = ProgressBar::hidden();

    let mut records = Vec::with_capacity(files.len());
    for path in &files {
        match extract_record(path, None, &config, &file_pb) {
            Ok(record) => records.push((path.clone(), record)),
            Err(e) => {
                // Unreadable inputs come back as error records from the
                // parser; ending up here means the file itself was
                // unreadable at the filesystem level.
                warn!("skipping {}: {}", path.display(), e);
                let filename = path
                    .file_name()
                    .and_then(|s| s.to_str())
                    .unwrap_or("document.pdf");
                records.push((
                    path.clone(),
                    ReciboRecord::unreadable(
                        recibo_core::ServiceType::Unknown,
                        filename,
                        e.to_string(),
                    ),
                ));
            }
        }
        overall_pb.inc(1);
    }

    overall_pb.finish_with_message("Complete");

    // Write per-file outputs
    if let Some(ref output_dir) = args.output_dir {
        for (path, record) in &records {
            let output_name = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("recibo");

            let extension = match args.format {
                super::process::OutputFormat::Json => "json",
                super::process::OutputFormat::Csv => "csv",
                super::process::OutputFormat::Text => "txt",
            };

            let output_path = output_dir.join(format!("{}.{}", output_name, extension));
            fs::write(&output_path, format_record(record, args.format)?)?;
            debug!("Wrote output to {}", output_path.display());
        }
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &records)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let extracted = records.iter().filter(|(_, r)| r.error.is_none()).count();
    let failed = records.len() - extracted;

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        records.len(),
        start.elapsed()
    );
    println!(
        "   {} extracted, {} failed",
        style(extracted).green(),
        style(failed).red()
    );

    if failed > 0 {
        println!();
        println!("{}", style("Failed files:").red());
        for (path, record) in records.iter().filter(|(_, r)| r.error.is_some()) {
            println!(
                "  - {}: {}",
                path.display(),
                record.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

fn write_summary(path: &PathBuf, records: &[(PathBuf, ReciboRecord)]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    let mut header: Vec<&str> = CSV_HEADER.to_vec();
    header.push("error");
    wtr.write_record(&header)?;

    for (_, record) in records {
        let mut row: Vec<&str> = csv_row(record).to_vec();
        row.push(record.error.as_deref().unwrap_or(""));
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}
