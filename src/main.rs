use std::{fs, path::PathBuf, process::ExitCode};

use anyhow::{Context, Result};
use camquote::{
    CustomerType, PricingModel, PricingRequest, QuoteResult, Settings, calculate,
    handlers::{
        quote_export::export_quote,
        quote_render::{render_json, render_text},
    },
};
use clap::{Parser, ValueEnum};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser)]
#[command(
    about = env!("CARGO_PKG_DESCRIPTION"),
    author = env!("CARGO_PKG_AUTHORS"),
    version = env!("CARGO_PKG_VERSION")
)]
pub struct Args {
    #[arg(long, help = "(Optional) Sets the pricing configuration file path.")]
    pub config: Option<String>,

    #[arg(
        long,
        help = "(Optional) Reads the pricing request from a JSON file instead of the flags below."
    )]
    pub request: Option<PathBuf>,

    #[arg(long, default_value = "one-time", help = "Pricing model: one-time or subscription.")]
    pub model: PricingModel,

    #[arg(
        long,
        default_value = "partner",
        help = "Customer type: partner or non-partner (si / non-si accepted)."
    )]
    pub customer: CustomerType,

    #[arg(long, default_value_t = 22, help = "Total number of cameras.")]
    pub total_cameras: u32,

    #[arg(long, help = "Disables AI analytics; tier counts are ignored.")]
    pub no_ai: bool,

    #[arg(long, default_value_t = 5, help = "AI tier 1 cameras.")]
    pub tier1: u32,

    #[arg(long, default_value_t = 7, help = "AI tier 2 cameras.")]
    pub tier2: u32,

    #[arg(long, default_value_t = 8, help = "Storage required in TB.")]
    pub storage_tb: u32,

    #[arg(long, help = "Leaves storage out of the quote.")]
    pub no_storage: bool,

    #[arg(long, value_enum, default_value = "text", help = "Output format.")]
    pub format: OutputFormat,

    #[arg(long, help = "(Optional) Writes the quote sheet as CSV.")]
    pub export: bool,

    #[arg(long, help = "(Optional) Overrides the export directory from the configuration.")]
    pub out_dir: Option<PathBuf>,
}

impl Args {
    fn pricing_request(&self) -> Result<PricingRequest> {
        if let Some(path) = &self.request {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("reading request file {}", path.display()))?;
            let request = serde_json::from_str(&raw)
                .with_context(|| format!("parsing request file {}", path.display()))?;
            return Ok(request);
        }

        Ok(PricingRequest {
            pricing_model: self.model,
            customer_type: self.customer,
            total_cameras: self.total_cameras,
            ai_enabled: !self.no_ai,
            tier1_cameras: self.tier1,
            tier2_cameras: self.tier2,
            include_storage: !self.no_storage,
            storage_tb_required: (!self.no_storage).then_some(self.storage_tb),
        })
    }
}

fn main() -> Result<ExitCode> {
    init_tracing();

    let args = Args::parse();
    let settings = Settings::load(&args.config)?;
    let request = args.pricing_request()?;

    info!(
        "Pricing {} cameras ({} model, {} customer)",
        request.total_cameras, request.pricing_model, request.customer_type
    );

    let result = calculate(&settings, &request);

    match args.format {
        OutputFormat::Text => print!("{}", render_text(&result, &settings.export.currency)),
        OutputFormat::Json => println!("{}", render_json(&result)?),
    }

    if args.export {
        match &result {
            QuoteResult::Ok(_) => {
                let directory = args
                    .out_dir
                    .clone()
                    .unwrap_or_else(|| settings.export.directory.clone());
                let today = chrono::Local::now().date_naive();
                let path = export_quote(&result, &directory, today)?;
                eprintln!("Quote sheet written to {}", path.display());
            }
            _ => warn!("Skipping export, quote has no totals"),
        }
    }

    Ok(match result {
        QuoteResult::ValidationError { .. } => ExitCode::from(2),
        _ => ExitCode::SUCCESS,
    })
}
