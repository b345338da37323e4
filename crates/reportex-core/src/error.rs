//! Error types for the pipeline and the analysis layer

use std::path::PathBuf;

use reportex_latex::LatexError;
use reportex_validate::SchemaError;
use thiserror::Error;

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Errors raised while turning JSON text into a PDF
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The input was not valid JSON; the raw text was saved for inspection
    #[error("Model output was not valid JSON. Saved raw output to: {}\n{source}", .raw_path.display())]
    Parse {
        /// Where the raw text was written
        raw_path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The JSON does not match the document schema
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Engine selection, compilation, or missing output
    #[error(transparent)]
    Latex(#[from] LatexError),

    /// The basename cannot be used as a directory or file name
    #[error("Invalid basename '{0}': must be a non-empty name without path separators")]
    InvalidBasename(String),

    /// The validated document could not be re-serialized
    #[error("Failed to serialize document: {0}")]
    Encode(#[source] serde_json::Error),

    /// IO error on a known path
    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PipelineError {
    /// Malformed JSON input
    pub fn is_parse(&self) -> bool {
        matches!(self, PipelineError::Parse { .. })
    }

    /// Well-formed JSON that violates the schema
    pub fn is_schema(&self) -> bool {
        matches!(self, PipelineError::Schema(_))
    }

    /// Unsupported or missing engine
    pub fn is_configuration(&self) -> bool {
        matches!(self, PipelineError::Latex(e) if e.is_configuration())
    }

    /// Path of the saved raw text for parse failures
    pub fn raw_path(&self) -> Option<&std::path::Path> {
        match self {
            PipelineError::Parse { raw_path, .. } => Some(raw_path),
            _ => None,
        }
    }
}

/// Errors raised while preparing inputs for and running the analysis step
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// No report files were given
    #[error("No PDFs provided.")]
    NoReports,

    /// Some report files do not exist
    #[error("These PDFs do not exist: {}", display_paths(.0))]
    ReportNotFound(Vec<PathBuf>),

    /// A report file does not have a `.pdf` extension
    #[error("Not a PDF: {}", .0.display())]
    NotAPdf(PathBuf),

    /// Two reports share a file name and cannot be staged together
    #[error("Duplicate report file name: {0}")]
    DuplicateReportName(String),

    /// Keyword analysis was requested without keywords
    #[error("Provide at least one keyword for keyword analysis.")]
    MissingKeywords,

    /// Unknown analysis task name
    #[error("Unknown analysis task '{0}': expected compare, keywords or individual")]
    UnknownTask(String),

    /// A prompt file is missing
    #[error("Prompt file not found: {}", .0.display())]
    PromptNotFound(PathBuf),

    /// The external analyzer exited with a failure status
    #[error("Analyzer '{program}' failed with status {}: {stderr}", .status.map(|c| c.to_string()).unwrap_or_else(|| "unknown".to_string()))]
    AnalyzerFailed {
        program: String,
        status: Option<i32>,
        stderr: String,
    },

    /// The analyzer produced output that is not UTF-8
    #[error("Analyzer '{0}' produced non UTF-8 output")]
    InvalidOutput(String),

    /// IO error on a known path
    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Rendering the analysis result failed
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

/// Errors raised while listing or selecting report files
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SelectionError {
    /// The reports directory contains no PDFs
    #[error("No PDFs found in: {}", .0.display())]
    NoReports(PathBuf),

    /// The directory path could not be turned into a glob pattern
    #[error("Invalid reports directory pattern: {0}")]
    Pattern(String),

    /// A range part is not of the form `a-b`
    #[error("Invalid range: '{0}'")]
    InvalidRange(String),

    /// A part is not a number
    #[error("Invalid selection: '{0}'")]
    InvalidSelection(String),

    /// A number is outside `1..=count`
    #[error("Selection out of range: {index} (valid: 1-{count})")]
    OutOfRange { index: usize, count: usize },
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_error_is_schema() {
        let err = PipelineError::from(SchemaError::block(2, "unknown block type 'quote'"));
        assert!(err.is_schema());
        assert!(!err.is_parse());
        assert!(err.to_string().contains("Block 2"));
    }

    #[test]
    fn test_configuration_classification() {
        let err = PipelineError::from(LatexError::UnsupportedEngine("lualatex".to_string()));
        assert!(err.is_configuration());

        let err = PipelineError::from(LatexError::MissingOutput(PathBuf::from("x.pdf")));
        assert!(!err.is_configuration());
    }

    #[test]
    fn test_report_not_found_lists_paths() {
        let err = AnalysisError::ReportNotFound(vec![
            PathBuf::from("a.pdf"),
            PathBuf::from("b.pdf"),
        ]);
        assert_eq!(err.to_string(), "These PDFs do not exist: a.pdf, b.pdf");
    }

    #[test]
    fn test_analyzer_failed_message() {
        let err = AnalysisError::AnalyzerFailed {
            program: "llm".to_string(),
            status: None,
            stderr: "killed".to_string(),
        };
        assert_eq!(err.to_string(), "Analyzer 'llm' failed with status unknown: killed");
    }
}
