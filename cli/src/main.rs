//! mdpdf CLI - Markdown to PDF conversion tool

use std::path::{Path, PathBuf};

use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use mdpdf::{default_output_path, ConvertOptions, Converter, OutputFormat, DEFAULT_INPUT};

#[derive(Parser)]
#[command(name = "mdpdf")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Convert Markdown to a styled A4 PDF with Japanese fonts", long_about = None)]
struct Cli {
    /// Input Markdown file
    #[arg(value_name = "INPUT", default_value = DEFAULT_INPUT)]
    input: PathBuf,

    /// Output PDF file (defaults to INPUT with a .pdf extension)
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Font file tried before the platform fonts
    #[arg(long, value_name = "FILE")]
    font: Option<PathBuf>,

    /// Number ordered list items
    #[arg(long)]
    number_lists: bool,

    /// Print the story as JSON instead of writing a PDF
    #[arg(long)]
    dump_story: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::new().filter_level(level).init();

    let result = if cli.dump_story {
        cmd_dump(&cli)
    } else {
        cmd_convert(&cli)
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn options(cli: &Cli) -> ConvertOptions {
    let mut options = ConvertOptions::new().with_numbered_lists(cli.number_lists);
    if let Some(font) = &cli.font {
        options = options.with_font(font);
    }
    options
}

fn print_font_warning(converter: &Converter) {
    if let Some(warning) = &converter.font_resolution().warning {
        eprintln!("{}: {}", "Warning".yellow().bold(), warning);
    }
}

fn cmd_convert(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&cli.input));

    let converter = Converter::new(options(cli));
    print_font_warning(&converter);

    let pb = spinner(&cli.input);
    let result = converter.convert_file(&cli.input, &output);
    pb.finish_and_clear();
    let result = result?;

    println!("{} {}", "PDF created:".green().bold(), output.display());
    log::info!(
        "{} pages, {} headings, {} tables",
        result.stats.page_count,
        result.stats.heading_count,
        result.stats.table_count
    );

    Ok(())
}

fn cmd_dump(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let converter = Converter::new(options(cli).with_format(OutputFormat::Json));
    let markdown = mdpdf::source::read_markdown(&cli.input)?;
    let result = converter.convert_str(&markdown)?;
    println!("{}", String::from_utf8_lossy(&result.content));
    Ok(())
}

fn spinner(input: &Path) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(format!("Converting {}...", input.display()));
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}
