//! pdfoutline CLI - PDF heading-outline extraction tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdfoutline::{ExtractOptions, JsonFormat, Pipeline};

#[derive(Parser)]
#[command(name = "pdfoutline")]
#[command(version)]
#[command(about = "Extract heading outlines from PDF documents", long_about = None)]
struct Cli {
    /// Input PDF file
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// CRF model artifact (heuristic labeling if omitted)
    #[arg(long, value_name = "FILE", env = "PDFOUTLINE_MODEL")]
    model: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract the outline of one PDF as JSON
    Extract {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// CRF model artifact (heuristic labeling if omitted)
        #[arg(long, value_name = "FILE", env = "PDFOUTLINE_MODEL")]
        model: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        /// Fail the document on any unparseable page
        #[arg(long)]
        strict: bool,
    },

    /// Extract outlines for every PDF in a directory
    Batch {
        /// Input directory
        #[arg(value_name = "DIR")]
        input: PathBuf,

        /// Output directory (defaults to the input directory)
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// CRF model artifact (heuristic labeling if omitted)
        #[arg(long, value_name = "FILE", env = "PDFOUTLINE_MODEL")]
        model: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Show extraction statistics for a PDF
    Info {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// CRF model artifact (heuristic labeling if omitted)
        #[arg(long, value_name = "FILE", env = "PDFOUTLINE_MODEL")]
        model: Option<PathBuf>,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Extract {
            input,
            output,
            model,
            compact,
            strict,
        }) => cmd_extract(&input, output.as_deref(), model.as_deref(), compact, strict),
        Some(Commands::Batch {
            input,
            output,
            model,
            compact,
        }) => cmd_batch(&input, output.as_deref(), model.as_deref(), compact),
        Some(Commands::Info { input, model }) => cmd_info(&input, model.as_deref()),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            if let Some(input) = cli.input {
                cmd_extract(&input, None, cli.model.as_deref(), false, false)
            } else {
                println!("{}", "Usage: pdfoutline <FILE> [--model FILE]".yellow());
                println!("       pdfoutline --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

/// Build a pipeline from the common CLI options.
fn build_pipeline(
    model: Option<&Path>,
    strict: bool,
) -> Result<Pipeline, Box<dyn std::error::Error>> {
    let mut options = ExtractOptions::new();
    if strict {
        options = options.strict();
    }

    let pipeline = match model {
        Some(path) => Pipeline::new().with_model_path(path)?,
        None => Pipeline::new().heuristic(),
    };

    Ok(pipeline.with_options(options))
}

fn cmd_extract(
    input: &Path,
    output: Option<&Path>,
    model: Option<&Path>,
    compact: bool,
    strict: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let pipeline = build_pipeline(model, strict)?;
    let outcome = pipeline.run(input)?;

    for warning in &outcome.stats.warnings {
        eprintln!("{}: {}", "Warning".yellow(), warning);
    }

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };
    let json = pdfoutline::render::to_json(&outcome.document, format)?;

    if let Some(path) = output {
        fs::write(path, &json)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", json);
    }

    Ok(())
}

fn cmd_batch(
    input: &Path,
    output: Option<&Path>,
    model: Option<&Path>,
    compact: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let output_dir = output.map(|p| p.to_path_buf()).unwrap_or_else(|| input.to_path_buf());
    fs::create_dir_all(&output_dir)?;

    let mut pdfs: Vec<PathBuf> = fs::read_dir(input)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension()
                .map(|ext| ext.eq_ignore_ascii_case("pdf"))
                .unwrap_or(false)
        })
        .collect();
    pdfs.sort();

    if pdfs.is_empty() {
        println!("{}", "No PDF files found".yellow());
        return Ok(());
    }

    let pipeline = build_pipeline(model, false)?;

    let pb = ProgressBar::new(pdfs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };

    let results = pipeline.run_batch(&pdfs);

    let mut ok = 0usize;
    let mut failed = 0usize;
    for (path, result) in results {
        pb.inc(1);
        let stem = path.file_stem().unwrap_or_default().to_string_lossy();
        match result {
            Ok(outcome) => {
                let json = pdfoutline::render::to_json(&outcome.document, format)?;
                let out_path = output_dir.join(format!("{}.json", stem));
                fs::write(&out_path, json)?;
                ok += 1;
            }
            Err(e) => {
                pb.suspend(|| {
                    eprintln!("{} {}: {}", "Failed".red(), path.display(), e);
                });
                failed += 1;
            }
        }
    }
    pb.finish_with_message("done");

    println!(
        "\n{} {} extracted, {} failed",
        "Done!".green().bold(),
        ok,
        failed
    );

    if failed > 0 {
        std::process::exit(1);
    }

    Ok(())
}

fn cmd_info(input: &Path, model: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let pipeline = build_pipeline(model, false)?;
    let outcome = pipeline.run(input)?;
    let stats = &outcome.stats;

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!(
        "{}: {}",
        "Title".bold(),
        outcome.document.title.as_deref().unwrap_or("(none)")
    );
    println!("{}: {}", "Pages".bold(), stats.page_count);
    println!("{}: {}", "Empty pages".bold(), stats.empty_page_count);

    println!();
    println!("{}", "Labeling Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "Lines".bold(), stats.line_count);
    println!("{}: {}", "Title lines".bold(), stats.title_count);
    println!("{}: {}", "Headings".bold(), stats.heading_count);
    println!("{}: {}", "Body lines".bold(), stats.body_count);
    println!(
        "{}: {}",
        "Outline nodes".bold(),
        outcome.document.total_nodes()
    );

    if !stats.warnings.is_empty() {
        println!();
        println!("{}", "Warnings".yellow().bold());
        for warning in &stats.warnings {
            println!("  {}", warning);
        }
    }

    Ok(())
}

fn cmd_version() {
    println!(
        "{} {}",
        "pdfoutline".cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!("PDF heading-outline extraction tool");
    println!();
    println!("License: MIT");
}
