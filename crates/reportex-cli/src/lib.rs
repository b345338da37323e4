//! reportex CLI - Command-line interface library
//!
//! This library provides the CLI functionality for reportex, including:
//! - Render: Convert a JSON document to LaTeX, optionally compiling it
//! - Build: Run the full pipeline into an artifact directory
//! - Analyze: Run an analysis task over report PDFs and render the result
//! - Reports: List the available report PDFs
//!
//! # Binary Usage
//!
//! ```bash
//! # Render JSON to LaTeX and PDF
//! reportex render out/test.json --pdf --engine pdflatex
//!
//! # Full pipeline from stdin
//! llm-tool < prompt.txt | reportex build - --basename summary
//!
//! # Compare reports 1 to 3 using an external analyzer
//! reportex analyze compare --select 1-3 --analyzer ./ask-model.sh
//! ```

pub mod app;
pub mod config;

pub use app::{
    analyze_command, build_command, render_command, reports_command, run_cli, AnalyzeOptions,
};
pub use config::{load_settings, Settings};
