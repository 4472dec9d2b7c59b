//! Classify command - report the service type of a receipt.

use std::fs;
use std::io::Read;
use std::path::PathBuf;

use clap::Args;
use tracing::debug;

use recibo_core::classify_text;
use recibo_core::source::TextSource;
use recibo_pdf::PdfExtractor;

/// Arguments for the classify command.
#[derive(Args)]
pub struct ClassifyArgs {
    /// Input file: a PDF or a plain-text dump (default: stdin)
    input: Option<PathBuf>,
}

pub async fn run(args: ClassifyArgs) -> anyhow::Result<()> {
    let text = match &args.input {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Input file not found: {}", path.display());
            }

            let is_pdf = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("pdf"));

            if is_pdf {
                let data = fs::read(path)?;
                PdfExtractor::new().extract_text(&data)?
            } else {
                fs::read_to_string(path)?
            }
        }
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    debug!("classifying {} chars of text", text.len());

    println!("{}", classify_text(&text));
    Ok(())
}
