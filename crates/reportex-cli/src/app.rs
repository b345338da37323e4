//! CLI Application logic
//!
//! Contains the command-line interface implementation.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;

use reportex_core::{
    list_pdfs, select_reports, AnalysisTask, CommandAnalyzer, Pipeline, StagedReports, TaskRunner,
};
use reportex_latex::{Compiler, Engine, Transpiler};
use reportex_validate::parse_document;

use crate::config::{load_settings, Settings};

#[derive(Parser)]
#[command(name = "reportex")]
#[command(author, version, about = "Financial report analysis, typeset as PDF", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a JSON document to LaTeX, optionally compiling it to PDF
    Render {
        /// Input JSON file
        #[arg(default_value = "out/test.json")]
        input: PathBuf,

        /// LaTeX output file (defaults to the input with a .tex extension)
        #[arg(long)]
        tex_out: Option<PathBuf>,

        /// Compile the LaTeX to PDF
        #[arg(long)]
        pdf: bool,

        /// TeX engine (tectonic or pdflatex)
        #[arg(short, long, default_value = "tectonic")]
        engine: Engine,
    },

    /// Run the full pipeline on model output into <out-root>/<basename>/
    Build {
        /// Input JSON text file, or - for stdin
        input: PathBuf,

        /// Artifact name (defaults to the input file stem)
        #[arg(short, long)]
        basename: Option<String>,

        /// Output root directory
        #[arg(long)]
        out_root: Option<PathBuf>,

        /// TeX engine (tectonic or pdflatex)
        #[arg(short, long)]
        engine: Option<Engine>,

        /// Stop after writing the .json and .tex artifacts
        #[arg(long)]
        no_pdf: bool,
    },

    /// Analyze report PDFs and render the result
    Analyze {
        /// Task: compare, keywords or individual
        task: AnalysisTask,

        /// Directory containing report PDFs
        #[arg(long)]
        reports: Option<PathBuf>,

        /// Reports to use, e.g. 1,3,5 or 2-4 (default: all)
        #[arg(short, long, default_value = "")]
        select: String,

        /// Keyword for keyword analysis (repeatable)
        #[arg(short = 'k', long = "keyword")]
        keywords: Vec<String>,

        /// Analyzer program (overrides [analyzer] command)
        #[arg(long)]
        analyzer: Option<String>,

        /// Argument passed to the analyzer before the report paths (repeatable)
        #[arg(long = "analyzer-arg", allow_hyphen_values = true)]
        analyzer_args: Vec<String>,

        /// Output root directory
        #[arg(long)]
        out_root: Option<PathBuf>,

        /// TeX engine (tectonic or pdflatex)
        #[arg(short, long)]
        engine: Option<Engine>,
    },

    /// List available report PDFs with their selection numbers
    Reports {
        /// Directory containing report PDFs
        #[arg(long)]
        reports: Option<PathBuf>,
    },
}

/// Options for the analyze command
#[derive(Debug, Clone)]
pub struct AnalyzeOptions {
    pub task: AnalysisTask,
    pub reports: Option<PathBuf>,
    pub select: String,
    pub keywords: Vec<String>,
    pub analyzer: Option<String>,
    pub analyzer_args: Vec<String>,
    pub out_root: Option<PathBuf>,
    pub engine: Option<Engine>,
}

/// Run the CLI application
///
/// This is the main entry point for the command-line interface.
/// It parses arguments and dispatches to the appropriate command.
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let settings = load_settings(cli.config.as_deref())?;

    match cli.command {
        Commands::Render {
            input,
            tex_out,
            pdf,
            engine,
        } => {
            render_command(&input, tex_out.as_deref(), pdf.then_some(engine))?;
        }
        Commands::Build {
            input,
            basename,
            out_root,
            engine,
            no_pdf,
        } => {
            let pipeline = Pipeline::new(
                out_root.unwrap_or_else(|| settings.output.root.clone()),
                engine.unwrap_or(settings.output.engine),
            );
            build_command(&input, basename.as_deref(), &pipeline, !no_pdf)?;
        }
        Commands::Analyze {
            task,
            reports,
            select,
            keywords,
            analyzer,
            analyzer_args,
            out_root,
            engine,
        } => {
            let options = AnalyzeOptions {
                task,
                reports,
                select,
                keywords,
                analyzer,
                analyzer_args,
                out_root,
                engine,
            };
            analyze_command(&options, &settings)?;
        }
        Commands::Reports { reports } => {
            let dir = reports.unwrap_or_else(|| settings.reports.dir.clone());
            reports_command(&dir)?;
        }
    }

    Ok(())
}

/// Install the stderr log subscriber
fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Execute the render command
///
/// Writes the LaTeX file and, when `engine` is given, compiles it.
/// Returns the LaTeX path and the PDF path if one was produced.
pub fn render_command(
    input: &Path,
    tex_out: Option<&Path>,
    engine: Option<Engine>,
) -> Result<(PathBuf, Option<PathBuf>)> {
    if !input.exists() {
        anyhow::bail!("JSON file not found: {}", input.display());
    }

    let text = fs::read_to_string(input)
        .with_context(|| format!("Failed to read JSON file: {}", input.display()))?;
    let value: serde_json::Value = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse JSON file: {}", input.display()))?;
    let doc = parse_document(&value)
        .with_context(|| format!("Invalid document: {}", input.display()))?;
    debug!(blocks = doc.blocks.len(), "document validated");

    let tex_path = tex_out
        .map(Path::to_path_buf)
        .unwrap_or_else(|| input.with_extension("tex"));
    if let Some(parent) = tex_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    fs::write(&tex_path, Transpiler::transpile(&doc))
        .with_context(|| format!("Failed to write LaTeX file: {}", tex_path.display()))?;
    println!("Wrote LaTeX: {}", tex_path.display());

    let pdf_path = match engine {
        Some(engine) => {
            let pdf = Compiler::new(engine).compile(&tex_path)?;
            println!("Wrote PDF: {}", pdf.display());
            Some(pdf)
        }
        None => None,
    };

    Ok((tex_path, pdf_path))
}

/// Execute the build command
///
/// Reads model output from `input` (`-` for stdin) and runs it through
/// `pipeline`. Returns the PDF path, or the LaTeX path when `compile` is
/// false.
pub fn build_command(
    input: &Path,
    basename: Option<&str>,
    pipeline: &Pipeline,
    compile: bool,
) -> Result<PathBuf> {
    let from_stdin = input.as_os_str() == "-";

    let basename = match basename {
        Some(name) => name.to_string(),
        None if from_stdin => anyhow::bail!("--basename is required when reading from stdin"),
        None => input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .with_context(|| format!("Cannot derive a basename from {}", input.display()))?,
    };

    let json_text = if from_stdin {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        buf
    } else {
        fs::read_to_string(input)
            .with_context(|| format!("Failed to read input: {}", input.display()))?
    };

    if compile {
        let pdf = pipeline.run(&json_text, &basename)?;
        println!("Wrote PDF: {}", pdf.display());
        Ok(pdf)
    } else {
        let artifacts = pipeline.render_artifacts(&json_text, &basename)?;
        println!("Wrote JSON: {}", artifacts.json_path.display());
        println!("Wrote LaTeX: {}", artifacts.tex_path.display());
        Ok(artifacts.tex_path)
    }
}

/// Execute the analyze command
///
/// Selected reports are staged in a temporary directory for the duration
/// of the run. Returns the produced PDF paths.
pub fn analyze_command(options: &AnalyzeOptions, settings: &Settings) -> Result<Vec<PathBuf>> {
    let reports_dir = options
        .reports
        .clone()
        .unwrap_or_else(|| settings.reports.dir.clone());
    let available = list_pdfs(&reports_dir)?;
    let selected = select_reports(&available, &options.select)?;
    println!(
        "Selected {} of {} report(s)",
        selected.len(),
        available.len()
    );

    let program = options
        .analyzer
        .clone()
        .or_else(|| settings.analyzer.command.clone())
        .context("No analyzer configured (use --analyzer or [analyzer] command)")?;
    let args = if options.analyzer_args.is_empty() {
        settings.analyzer.args.clone()
    } else {
        options.analyzer_args.clone()
    };
    let analyzer = CommandAnalyzer::new(program).with_args(args);

    let prompts = settings.prompt_library();
    let pipeline = Pipeline::new(
        options
            .out_root
            .clone()
            .unwrap_or_else(|| settings.output.root.clone()),
        options.engine.unwrap_or(settings.output.engine),
    );

    let staged = StagedReports::stage(&selected)?;
    println!("{}", options.task.status());

    let pdfs = TaskRunner::new(&analyzer, &prompts, &pipeline).run(
        options.task,
        staged.paths(),
        &options.keywords,
    )?;

    for pdf in &pdfs {
        println!("Wrote PDF: {}", pdf.display());
    }
    Ok(pdfs)
}

/// Execute the reports command
pub fn reports_command(dir: &Path) -> Result<Vec<PathBuf>> {
    let pdfs = list_pdfs(dir)?;

    println!("Available PDFs:");
    for (i, pdf) in pdfs.iter().enumerate() {
        let name = pdf
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        println!("{}) {}", i + 1, name);
    }

    Ok(pdfs)
}
