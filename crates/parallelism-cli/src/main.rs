//! Parallelism CLI - Instruction-level parallelism report for `.pir` files

use std::fs;
use std::path::{Path, PathBuf};

use ariadne::{Color, Label, Report, ReportKind, Source};
use clap::{Parser, Subcommand};

use parallelism_ir::Module;
use parallelism_parser::{parse, ParseError};
use parallelism_sched::{analyze_block, analyze_module, render_dot, render_text, AnalysisSettings};

#[derive(Parser)]
#[command(name = "parallelism")]
#[command(about = "ASAP/ALAP scheduling and mobility analysis per basic block", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Schedule every basic block and print ASAP, ALAP and mobility
    Analyze {
        /// Input file
        file: PathBuf,
        /// Write one DOT graph per block under this directory
        #[arg(short, long)]
        graph_dir: Option<PathBuf>,
        /// Only analyze this function
        #[arg(short, long)]
        function: Option<String>,
        /// Output the report as JSON
        #[arg(long)]
        json: bool,
        /// Pretty print JSON output
        #[arg(short, long)]
        pretty: bool,
    },
    /// Print the dependency graph of one block as DOT
    Dot {
        /// Input file
        file: PathBuf,
        /// Function containing the block
        #[arg(short, long)]
        function: String,
        /// Block label (defaults to the first block)
        #[arg(short, long)]
        block: Option<String>,
    },
    /// Parse and verify files without analyzing them
    Check {
        /// Input file(s)
        files: Vec<PathBuf>,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            file,
            graph_dir,
            function,
            json,
            pretty,
        } => cmd_analyze(&file, graph_dir, function, json, pretty),
        Commands::Dot {
            file,
            function,
            block,
        } => cmd_dot(&file, &function, block.as_deref()),
        Commands::Check { files } => cmd_check(&files),
    }
}

/// Read and parse a file, reporting errors and exiting on failure
fn load(file: &Path) -> Module {
    let source = match fs::read_to_string(file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading {}: {}", file.display(), e);
            std::process::exit(1);
        }
    };

    match parse(&source) {
        Ok(module) => module,
        Err(e) => {
            report_parse_error(&source, file, &e);
            std::process::exit(1);
        }
    }
}

fn cmd_analyze(
    file: &Path,
    graph_dir: Option<PathBuf>,
    function: Option<String>,
    json: bool,
    pretty: bool,
) {
    let module = load(file);

    if let Some(name) = &function {
        if module.function(name).is_none() {
            eprintln!("No function named '{}' in {}", name, file.display());
            std::process::exit(1);
        }
    }

    let settings = AnalysisSettings {
        graph_dir,
        function_filter: function,
    };
    let report = analyze_module(&module, &settings);

    if json {
        let rendered = if pretty {
            serde_json::to_string_pretty(&report)
        } else {
            serde_json::to_string(&report)
        };
        match rendered {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("Error serializing report: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        print!("{}", render_text(&report));
    }

    if report.has_failures() {
        std::process::exit(1);
    }
}

fn cmd_dot(file: &Path, function: &str, block: Option<&str>) {
    let module = load(file);

    let Some(func) = module.function(function) else {
        eprintln!("No function named '{}' in {}", function, file.display());
        std::process::exit(1);
    };

    let target = match block {
        Some(label) => func.block_by_label(label),
        None => func.blocks().first(),
    };
    let Some(target) = target else {
        eprintln!(
            "No block {} in function '{}'",
            block.unwrap_or("(entry)"),
            function
        );
        std::process::exit(1);
    };

    match analyze_block(func, target.id) {
        Ok(schedule) => print!("{}", render_dot(&schedule.graph_name(), &schedule.graph)),
        Err(e) => {
            eprintln!("[{}] {}", e.code(), e);
            std::process::exit(1);
        }
    }
}

fn cmd_check(files: &[PathBuf]) {
    let mut all_ok = true;

    for file in files {
        let source = match fs::read_to_string(file) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Error reading {}: {}", file.display(), e);
                all_ok = false;
                continue;
            }
        };

        match parse(&source) {
            Ok(module) => {
                let blocks: usize = module.functions().iter().map(|f| f.blocks().len()).sum();
                println!(
                    "✓ {} - {} functions, {} blocks",
                    file.display(),
                    module.len(),
                    blocks
                );
            }
            Err(e) => {
                report_parse_error(&source, file, &e);
                all_ok = false;
            }
        }
    }

    if !all_ok {
        std::process::exit(1);
    }
}

fn report_parse_error(source: &str, file: &Path, error: &ParseError) {
    let name = file.to_string_lossy().to_string();
    let span = error.span();
    let printed = Report::build(ReportKind::Error, name.clone(), span.start)
        .with_message(error.to_string())
        .with_label(
            Label::new((name.clone(), span.range()))
                .with_message(error.to_string())
                .with_color(Color::Red),
        )
        .finish()
        .eprint((name, Source::from(source)));
    if printed.is_err() {
        eprintln!("{}: {}", file.display(), error);
    }
}
