//! Process command - extract data from a single invoice image.

use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use invx_core::models::config::DEFAULT_DEBUG_OUTPUT;
use invx_core::{Invoice, InvoiceProcessor};

use super::load_config;

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input image
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Write the raw OCR text to a file
    #[arg(long, value_name = "PATH", num_args = 0..=1, default_missing_value = DEFAULT_DEBUG_OUTPUT)]
    debug_ocr: Option<PathBuf>,

    /// Show fields that could not be extracted
    #[arg(long)]
    show_warnings: bool,

    /// Check extracted amounts and dates for consistency
    #[arg(long)]
    validate: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output, one row per line item
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    /// File extension for outputs in this format.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = load_config(config_path)?;
    if let Some(path) = args.debug_ocr.clone() {
        config.ocr.debug_output = Some(path);
    }

    // Check input file exists
    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message("Running OCR...");

    let processor = InvoiceProcessor::from_config(&config);
    let result = processor.process(&args.input);

    pb.finish_and_clear();

    let result = result.with_context(|| format!("Failed to process {}", args.input.display()))?;

    if let Some(path) = &config.ocr.debug_output {
        eprintln!("{} Raw OCR text written to {}", style("ℹ").blue(), path.display());
    }

    if args.show_warnings && !result.warnings.is_empty() {
        eprintln!("{}", style("Extraction warnings:").yellow());
        for warning in &result.warnings {
            eprintln!("  - {}", warning);
        }
    }

    // Validate if requested
    if args.validate {
        let issues = result.invoice.validate();
        if !issues.is_empty() {
            eprintln!("{}", style("Validation issues:").yellow());
            for issue in &issues {
                eprintln!("  - {}", issue);
            }
        }
    }

    // Format output
    let output = format_invoice(&result.invoice, args.format)?;

    // Write output
    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        eprintln!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Render an invoice in the requested format.
pub fn format_invoice(invoice: &Invoice, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(invoice)?),
        OutputFormat::Csv => format_csv(invoice),
        OutputFormat::Text => Ok(format_text(invoice)),
    }
}

fn format_csv(invoice: &Invoice) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "invoice_number",
        "invoice_date",
        "customer_name",
        "vendor_name",
        "invoice_total",
        "item_description",
        "quantity",
        "unit_price",
        "total_amount",
    ])?;

    let header = &invoice.header;
    let header_cells = [
        header.invoice_number.as_deref().unwrap_or_default(),
        header.invoice_date.as_deref().unwrap_or_default(),
        header.customer_name.as_deref().unwrap_or_default(),
        header.vendor_name.as_deref().unwrap_or_default(),
        header.total_amount.as_deref().unwrap_or_default(),
    ];

    if invoice.items.is_empty() {
        let mut record = header_cells.to_vec();
        record.extend(["", "", "", ""]);
        wtr.write_record(&record)?;
    }

    // Header columns repeat on every item row
    for item in &invoice.items {
        let mut record = header_cells.to_vec();
        record.extend([
            item.description.as_str(),
            item.quantity.as_str(),
            item.unit_price.as_str(),
            item.total_amount.as_str(),
        ]);
        wtr.write_record(&record)?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(invoice: &Invoice) -> String {
    let header = &invoice.header;
    let field = |value: &Option<String>| value.clone().unwrap_or_else(|| "-".to_string());

    let mut output = String::new();

    output.push_str(&format!("Invoice: {}\n", field(&header.invoice_number)));
    output.push_str(&format!("Date:    {}\n", field(&header.invoice_date)));
    output.push_str(&format!("Vendor:  {}\n", field(&header.vendor_name)));
    output.push_str(&format!("Bill to: {}\n", field(&header.customer_name)));
    output.push('\n');

    output.push_str(&format!("Items ({}):\n", invoice.items.len()));
    for item in &invoice.items {
        output.push_str(&format!(
            "  {:<30} {:>6} x {:>10} = {:>10}\n",
            item.description, item.quantity, item.unit_price, item.total_amount
        ));
    }
    output.push('\n');

    output.push_str(&format!("Total:   {}\n", field(&header.total_amount)));

    output
}
