// Fri Jan 23 2026 - Alex

use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use dll_header_parser::{
    config::Config,
    diag::Diagnostics,
    emit::{ApiMonitorEmitter, WinApiOverrideEmitter},
    exports::ExportedSymbols,
    logging,
    matcher::{match_exports, MatchResult},
    parser::HeaderParser,
};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(author = "Alex")]
#[command(version = "1.0.0")]
#[command(
    about = "Cross-references a binary's export table against C/C++ headers and generates WinApiOverride / ApiMonitor definitions",
    long_about = None
)]
struct Args {
    /// Binary whose export table drives the run
    #[arg(long)]
    binary: PathBuf,

    /// Header files to parse
    #[arg(long, num_args = 1..)]
    files: Vec<PathBuf>,

    /// Folders scanned for *.h files
    #[arg(long, num_args = 1..)]
    folders: Vec<PathBuf>,

    /// Exported symbol names excluded from matching
    #[arg(long, num_args = 1..)]
    exclude: Vec<String>,

    /// Header include folders forwarded to the parser
    #[arg(short = 'i', long, num_args = 1..)]
    include_folders: Vec<PathBuf>,

    /// Compiler include folders forwarded to the parser
    #[arg(short = 's', long, num_args = 1..)]
    system_include_folders: Vec<PathBuf>,

    /// Preprocessor defines (NAME or NAME=VALUE)
    #[arg(short = 'D', long, num_args = 1..)]
    defines: Vec<String>,

    /// Additional arguments forwarded to the parser
    #[arg(long, num_args = 1..)]
    additional_args: Vec<String>,

    /// Parse files as C++ (false is C)
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    cpp: bool,

    /// Collect integer macro constants from the files
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    macros: bool,

    /// Parse attributes
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    attributes: bool,

    /// Generate WinApiOverride monitoring files
    #[arg(long)]
    winapioverride: bool,

    /// Output folder for WinApiOverride
    #[arg(long, default_value = "./OutputWinApi/")]
    winapi_folder: PathBuf,

    /// Generate the ApiMonitor XML definition
    #[arg(long)]
    apimonitor: bool,

    /// Output folder for the ApiMonitor XML
    #[arg(short = 'x', long, default_value = "./OutputApiMonitor/")]
    xml: PathBuf,

    /// Write a JSON match report
    #[arg(long)]
    report: Option<PathBuf>,

    /// Write the logs to a file instead of stderr
    #[arg(long)]
    log: Option<PathBuf>,

    /// Print all warnings and debug detail
    #[arg(short, long)]
    verbose: bool,

    #[arg(long)]
    no_progress: bool,
}

impl Args {
    fn into_config(self) -> Config {
        Config {
            binary: self.binary,
            files: self.files,
            folders: self.folders,
            excluded_symbols: self.exclude,
            include_folders: self.include_folders,
            system_include_folders: self.system_include_folders,
            defines: self.defines,
            additional_arguments: self.additional_args,
            parse_as_cpp: self.cpp,
            parse_macros: self.macros,
            parse_attributes: self.attributes,
            gen_winapioverride: self.winapioverride,
            winapi_folder: self.winapi_folder,
            gen_apimonitor: self.apimonitor,
            xml_folder: self.xml,
            report_file: self.report,
            log_file: self.log,
            verbose: self.verbose,
            show_progress: !self.no_progress,
        }
    }
}

fn main() {
    let config = Args::parse().into_config();

    if let Err(e) = logging::init(config.verbose, config.log_file.as_deref()) {
        eprintln!("{} Failed to open log file: {}", "[!]".red(), e);
        std::process::exit(1);
    }

    println!("{}", "DLL Header Parser".cyan().bold());
    println!("{}", "=".repeat(50).cyan());
    println!();

    if let Err(message) = config.validate() {
        eprintln!("{} {}", "[!]".red(), message);
        std::process::exit(1);
    }

    if config.verbose {
        if let Ok(dump) = serde_json::to_string_pretty(&config) {
            log::debug!("parsing with the following arguments:\n{}", dump);
        }
    }

    if let Err(e) = run(&config) {
        eprintln!("{} {:#}", "[!]".red(), e);
        std::process::exit(1);
    }
}

fn run(config: &Config) -> anyhow::Result<()> {
    let start = Instant::now();

    /* 1 - parse the header files */
    let files = collect_input_files(config)?;
    println!(
        "{} Parsing {} header files",
        "[*]".blue(),
        files.len()
    );

    let mut parser = HeaderParser::new(config.parser_options())?;
    let progress = if config.show_progress {
        let pb = ProgressBar::new(files.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap()
                .progress_chars("#>-"),
        );
        pb.set_message("Parsing headers...");
        Some(pb)
    } else {
        None
    };

    for file in &files {
        parser
            .parse_file(file)
            .with_context(|| format!("failed to parse {}", file.display()))?;
        if let Some(pb) = &progress {
            pb.inc(1);
        }
    }
    if let Some(pb) = &progress {
        pb.finish_and_clear();
    }

    let model = parser.finish();
    println!(
        "{} Parsed {} declarations ({} functions)",
        "[+]".green(),
        model.declaration_count(),
        model.functions.len()
    );

    if model.has_errors() {
        println!();
        println!("{}", "List of Errors:".red().bold());
        for diag in model.errors() {
            println!("{}", diag);
        }
        println!();
    }
    if config.verbose {
        println!("{}", "List of Warnings:".yellow());
        for diag in model.warnings() {
            println!("{}", diag);
        }
        println!();
    }

    /* 2 - read the binary's export table (opened before the abort so a
    broken binary path surfaces even alongside parse errors) */
    let exports = match ExportedSymbols::load(&config.binary) {
        Ok(exports) => exports,
        Err(e) => {
            eprintln!("{} {}", "[!]".red(), e);
            eprintln!("{} Error in opening the binary file", "[!]".red());
            std::process::exit(1);
        }
    };
    println!(
        "{} Found {} exported symbols in {}",
        "[+]".green(),
        exports.len(),
        config.binary.display()
    );

    if model.has_errors() {
        eprintln!("{} Parser reported errors. Aborting...", "[!]".red());
        std::process::exit(1);
    }

    if config.verbose {
        log::debug!("exported symbols:");
        for name in exports.iter() {
            log::debug!("  {}", name);
        }
    }

    /* 2.1 - match exports against the parsed declarations */
    let mut match_diags = Diagnostics::new();
    let result = match_exports(
        &model.functions,
        exports.names(),
        &config.excluded_symbols,
        &mut match_diags,
    );
    match_diags.flush_to_log();
    println!(
        "{} Matched {} of {} exported symbols",
        "[+]".green(),
        result.matched.len(),
        exports.len()
    );
    if !result.unmatched.is_empty() {
        println!();
        println!("{}", "Warning ! Missing items:".yellow().bold());
        for name in &result.unmatched {
            println!("  {}", name.yellow());
        }
        println!();
    }

    /* 3 - build the requested outputs */
    if config.gen_winapioverride {
        let mut emit_diags = Diagnostics::new();
        let emitter = WinApiOverrideEmitter::new(&config.winapi_folder, &config.binary);
        let summary = emitter
            .emit(&model, &result.matched, &mut emit_diags)
            .context("WinApiOverride emission failed")?;
        emit_diags.flush_to_log();
        println!(
            "{} WinApiOverride output written to {} ({} units, {} skipped)",
            "[+]".green(),
            config.winapi_folder.display(),
            summary.total(),
            summary.skipped
        );
    }

    if config.gen_apimonitor {
        let mut emit_diags = Diagnostics::new();
        let emitter = ApiMonitorEmitter::new(&config.xml_folder, &config.binary);
        let path = emitter
            .emit(&model, &result.matched, &mut emit_diags)
            .context("ApiMonitor emission failed")?;
        emit_diags.flush_to_log();
        println!(
            "{} ApiMonitor definition written to {}",
            "[+]".green(),
            path.display()
        );
    }

    if !config.gen_winapioverride && !config.gen_apimonitor {
        log::warn!("no output format requested, nothing was written");
    }

    if let Some(path) = &config.report_file {
        save_report(path, config, &result)?;
        println!("{} Match report saved to {}", "[+]".green(), path.display());
    }

    println!();
    println!("{}", "=".repeat(50).cyan());
    println!(
        "{} Parsing finished successfully in {:.2}s",
        "[+]".green(),
        start.elapsed().as_secs_f64()
    );
    Ok(())
}

/// Folder entries are sorted so the input order (and with it every
/// downstream ordering) is deterministic across platforms.
fn collect_input_files(config: &Config) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for folder in &config.folders {
        let entries = fs::read_dir(folder)
            .with_context(|| format!("failed to read folder {}", folder.display()))?;
        let mut found: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().map_or(false, |ext| ext == "h"))
            .collect();
        found.sort();
        files.extend(found);
    }
    files.extend(config.files.iter().cloned());
    if files.is_empty() {
        anyhow::bail!("no input header files found (use --files or --folders)");
    }
    Ok(files)
}

#[derive(Serialize)]
struct MatchReport<'a> {
    library: String,
    matched: Vec<&'a str>,
    unmatched: &'a [String],
    excluded: &'a [String],
}

fn save_report(
    path: &std::path::Path,
    config: &Config,
    result: &MatchResult,
) -> anyhow::Result<()> {
    let report = MatchReport {
        library: config.binary.display().to_string(),
        matched: result.matched_names(),
        unmatched: &result.unmatched,
        excluded: &config.excluded_symbols,
    };
    let json = serde_json::to_string_pretty(&report).context("failed to serialize the report")?;
    fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}
