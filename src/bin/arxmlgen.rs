//! arxmlgen CLI - translate between spreadsheet workbooks and ARXML.

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use arxmlgen::{Arxml, Config, Error, Result, UuidSource, detect_workbook_format};

#[derive(Parser)]
#[command(name = "arxmlgen")]
#[command(version, about = "Translate software-component metadata between spreadsheets and ARXML", long_about = None)]
struct Cli {
    /// YAML run configuration (sheet names, default labels, schema)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate an ARXML document from a Types/APIs workbook
    Generate {
        /// Input workbook (.xlsx, .yaml)
        workbook: PathBuf,

        /// Output ARXML file
        #[arg(short, long, default_value = "output.arxml")]
        output: PathBuf,
    },

    /// Extract Types/APIs rows from an ARXML document
    Extract {
        /// Input ARXML file
        arxml: PathBuf,

        /// Output workbook (.xlsx, .yaml)
        #[arg(short, long, default_value = "output.xlsx")]
        output: PathBuf,
    },
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    match cli.command {
        Commands::Generate { workbook, output } => generate(&workbook, &output, &config),
        Commands::Extract { arxml, output } => extract(&arxml, &output, &config),
    }
}

fn generate(input: &Path, output: &Path, config: &Config) -> Result<()> {
    require_file(input)?;
    let format = workbook_format(input)?;
    let workbook = format.read(&std::fs::read(input)?)?;

    let generation = arxmlgen::generate(&workbook, config, &mut UuidSource)?;
    std::fs::write(output, Arxml.write(&generation.document)?)?;

    println!("✓ Generated {}", output.display());
    println!("  {}", generation.report);
    if !generation.diagnostics.is_empty() {
        println!("  {} warning(s)", generation.diagnostics.len());
    }
    Ok(())
}

fn extract(input: &Path, output: &Path, config: &Config) -> Result<()> {
    require_file(input)?;
    let format = workbook_format(output)?;
    let document = Arxml.read(&std::fs::read(input)?)?;

    let extraction = arxmlgen::extract(&document, config)?;
    std::fs::write(output, format.write(&extraction.to_workbook(config))?)?;

    println!("✓ Extracted {}", output.display());
    println!(
        "  {} types, {} APIs",
        extraction.types.len(),
        extraction.apis.len()
    );
    if !extraction.diagnostics.is_empty() {
        println!("  {} warning(s)", extraction.diagnostics.len());
    }
    Ok(())
}

fn require_file(path: &Path) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(Error::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("input file not found: {}", path.display()),
        )))
    }
}

fn workbook_format(path: &Path) -> Result<Box<dyn arxmlgen::WorkbookFormat>> {
    detect_workbook_format(path).ok_or_else(|| {
        Error::Unsupported(format!("unknown workbook extension: {}", path.display()))
    })
}
