//! reportex-core - Report analysis pipeline
//!
//! This crate drives a report from model output to PDF:
//!
//! 1. Parse the JSON text returned by the analysis step
//! 2. Validate it against the document schema
//! 3. Persist the canonical JSON and the rendered LaTeX
//! 4. Compile the LaTeX with the chosen engine
//!
//! All artifacts for one document land in `<out_root>/<basename>/`.
//!
//! The analysis step itself is injected through the [`Analyzer`] trait, so
//! nothing here depends on a particular model service.
//!
//! # Example
//!
//! ```ignore
//! use reportex_core::write_pdf_from_json_text;
//! use reportex_latex::Engine;
//!
//! let json = r#"{"meta":{"title":"T"},"blocks":[{"type":"p","text":"Hello"}]}"#;
//! let pdf = write_pdf_from_json_text(json, "hello", "out".as_ref(), Engine::Pdflatex)?;
//! ```

pub mod analysis;
pub mod error;
pub mod pipeline;
pub mod selection;
pub mod staging;

pub use analysis::{
    check_reports, compose_prompt, format_keywords, AnalysisTask, Analyzer, CommandAnalyzer,
    PromptLibrary, TaskRunner, OUTPUT_CONTRACT,
};
pub use error::{AnalysisError, PipelineError, Result, SelectionError};
pub use pipeline::{write_pdf_from_json_text, Artifacts, Pipeline};
pub use selection::{list_pdfs, parse_selection, select_reports};
pub use staging::StagedReports;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
