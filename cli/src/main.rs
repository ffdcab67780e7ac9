//! docdown CLI - Word to Markdown conversion tool

mod logging;

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use log::LevelFilter;

use docdown::batch::{JobSink, LogSink, Tee};
use docdown::{
    BatchRunner, BatchSummary, ConversionJob, ConversionReport, ConvertOptions, DocxConverter,
    JobPlanner,
};

use logging::{init_log, InitLogOpts};

#[derive(Parser)]
#[command(name = "docdown")]
#[command(version)]
#[command(about = "Convert Word documents (.docx) to Markdown", long_about = None)]
struct Cli {
    /// Source file or directory
    #[arg(value_name = "SOURCE")]
    source: PathBuf,

    /// Target directory for output
    #[arg(value_name = "TARGET")]
    target: PathBuf,

    /// Directory for log files
    #[arg(long, value_name = "DIR", default_value = "logs", env = "DOCDOWN_LOG_DIR")]
    log_dir: PathBuf,

    /// Convert documents in parallel
    #[arg(long)]
    parallel: bool,

    /// Write the run summary as JSON to this file
    #[arg(long, value_name = "FILE")]
    summary: Option<PathBuf>,

    /// Treat the "Title" paragraph style as a level 1 heading
    #[arg(long)]
    title_as_heading: bool,

    /// Maximum heading level (1-6)
    #[arg(long, default_value = "6", value_parser = clap::value_parser!(u8).range(1..=6))]
    max_heading: u8,

    /// Use each image's description from the document as its alt text
    #[arg(long)]
    image_descriptions: bool,

    /// Skip unreadable optional parts (styles, relationships) instead of failing
    #[arg(long)]
    lenient: bool,

    /// Log debug details
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else if self.quiet {
            LevelFilter::Warn
        } else {
            LevelFilter::Info
        }
    }

    fn convert_options(&self) -> ConvertOptions {
        let options = ConvertOptions::new()
            .with_title_as_heading(self.title_as_heading)
            .with_max_heading(self.max_heading)
            .with_image_descriptions(self.image_descriptions);
        if self.lenient {
            options.lenient()
        } else {
            options
        }
    }
}

/// Advances the progress bar as jobs finish.
struct ProgressSink(ProgressBar);

impl JobSink for ProgressSink {
    fn job_started(&mut self, _index: usize, _total: usize, job: &ConversionJob) {
        let name = job
            .source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.0.set_message(name);
    }

    fn job_finished(&mut self, _index: usize, _total: usize, _report: &ConversionReport) {
        self.0.inc(1);
    }
}

fn main() {
    let cli = Cli::parse();

    let progress = ProgressBar::with_draw_target(None, ProgressDrawTarget::hidden());
    let log_file = match init_log(InitLogOpts {
        log_dir: &cli.log_dir,
        level: cli.log_level(),
        progress: progress.clone(),
    }) {
        Ok(path) => path,
        Err(e) => {
            eprintln!("{}: {}", "Error".red().bold(), e);
            std::process::exit(1);
        }
    };

    match cmd_convert(&cli, progress) {
        Ok(summary) => {
            print_summary(&summary);
            if let Some(path) = log_file {
                println!("{} {}", "Log file:".dimmed(), path.display());
            }
            std::process::exit(summary.exit_code());
        }
        Err(e) => {
            log::error!("{}", e);
            eprintln!("{}: {}", "Error".red().bold(), e);
            std::process::exit(1);
        }
    }
}

fn cmd_convert(cli: &Cli, progress: ProgressBar) -> Result<BatchSummary, Box<dyn std::error::Error>> {
    log::info!(
        "converting {} into {}",
        cli.source.display(),
        cli.target.display()
    );

    let plan = JobPlanner::new(&cli.source, &cli.target).plan()?;
    if plan.is_empty() {
        log::warn!("no Word documents found in {}", cli.source.display());
    }

    let runner = BatchRunner::new(Arc::new(DocxConverter::new()))
        .with_options(cli.convert_options())
        .parallel(cli.parallel);

    progress.set_length(plan.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );
    if !cli.quiet {
        progress.set_draw_target(ProgressDrawTarget::stderr());
    }

    let mut sink = Tee(LogSink, ProgressSink(progress.clone()));
    let summary = runner.run(&plan, &mut sink);
    progress.finish_and_clear();

    log::info!(
        "done: {} converted, {} failed, {} images",
        summary.converted_count(),
        summary.failed_count(),
        summary.total_images
    );

    if let Some(path) = &cli.summary {
        fs::write(path, summary.to_json()?)?;
        log::info!("summary written to {}", path.display());
    }

    Ok(summary)
}

fn print_summary(summary: &BatchSummary) {
    let rule = "=".repeat(60);
    println!();
    println!("{}", rule.dimmed());
    println!("{}", "Conversion Summary".cyan().bold());
    println!("{}", rule.dimmed());

    println!("{}: {}", "Total files".bold(), summary.total_files);
    println!(
        "{}: {}",
        "Converted".bold(),
        summary.converted_count().to_string().green()
    );
    if !summary.partial.is_empty() {
        println!(
            "{}: {}",
            "With warnings".bold(),
            summary.partial.len().to_string().yellow()
        );
    }
    let failed = summary.failed_count().to_string();
    println!(
        "{}: {}",
        "Failed".bold(),
        if summary.failed.is_empty() {
            failed.green()
        } else {
            failed.red()
        }
    );
    if !summary.skipped.is_empty() {
        println!("{}: {}", "Skipped".bold(), summary.skipped.len());
    }

    if summary.total_images > 0 {
        println!();
        println!("{}", "Images".cyan().bold());
        println!("{}", "─".repeat(40).dimmed());
        println!("{}: {}", "Total extracted".bold(), summary.total_images);
        for entry in &summary.images_per_file {
            println!(
                "  {} {}: {}",
                "•".dimmed(),
                entry.source.display(),
                entry.images
            );
        }
    }

    if !summary.partial.is_empty() {
        println!();
        println!("{}", "Converted with warnings".yellow().bold());
        for entry in &summary.partial {
            println!(
                "  {} {} ({} missing image(s))",
                "•".dimmed(),
                entry.source.display(),
                entry.warning_count
            );
        }
    }

    if !summary.failed.is_empty() {
        println!();
        println!("{}", "Failed conversions".red().bold());
        for entry in &summary.failed {
            println!("  {} {}", "•".dimmed(), entry.source.display());
            println!("    {}: {}", "Error".red(), entry.reason);
            let hints = entry.hints();
            if !hints.is_empty() {
                println!("    {}", "Check that the file is:".yellow());
                for hint in hints {
                    println!("      - {}", hint);
                }
            }
        }
    }

    if !summary.failed_images.is_empty() {
        println!();
        println!("{}", "Failed image extractions".red().bold());
        for failure in &summary.failed_images {
            println!("  {} {}", "•".dimmed(), failure.path.display());
            println!("    {}: {}", "Error".red(), failure.reason);
        }
    }

    println!("{}", rule.dimmed());
}
