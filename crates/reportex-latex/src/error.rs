//! Error types for LaTeX rendering and compilation

use std::path::PathBuf;

use thiserror::Error;

/// Result type for LaTeX operations
pub type Result<T> = std::result::Result<T, LatexError>;

/// Errors that can occur while compiling LaTeX to PDF
#[derive(Error, Debug)]
pub enum LatexError {
    /// The requested engine is not one of the supported toolchains
    #[error("Unsupported engine '{0}': expected 'tectonic' or 'pdflatex'")]
    UnsupportedEngine(String),

    /// The engine executable could not be found on the search path
    #[error("{engine} not found on PATH. Install it or use engine='{alternative}'.")]
    EngineNotInstalled {
        /// Executable that was looked up
        engine: String,
        /// The other supported engine
        alternative: String,
    },

    /// The engine process could not be started
    #[error("Failed to start {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The engine exited with a failure status
    #[error("LaTeX compilation failed.\n\nCommand: {command}\n\n{log}")]
    Compilation {
        /// The command line that was run
        command: String,
        /// Captured stdout followed by stderr
        log: String,
    },

    /// The engine reported success but no PDF exists
    #[error("Compilation succeeded but PDF was not produced: {}", .0.display())]
    MissingOutput(PathBuf),

    /// IO error on a known path
    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl LatexError {
    /// Whether this error comes from the environment rather than the document
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            LatexError::UnsupportedEngine(_) | LatexError::EngineNotInstalled { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_installed_message_names_alternative() {
        let err = LatexError::EngineNotInstalled {
            engine: "tectonic".to_string(),
            alternative: "pdflatex".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("tectonic not found"));
        assert!(msg.contains("pdflatex"));
        assert!(err.is_configuration());
    }

    #[test]
    fn test_compilation_message_embeds_log() {
        let err = LatexError::Compilation {
            command: "pdflatex doc.tex".to_string(),
            log: "! Undefined control sequence.".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Command: pdflatex doc.tex"));
        assert!(msg.contains("Undefined control sequence"));
        assert!(!err.is_configuration());
    }
}
