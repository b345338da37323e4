//! LaTeX to PDF compiler
//!
//! Runs an external TeX engine on a `.tex` file and checks that the
//! expected PDF was written next to it.

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{LatexError, Result};

/// Supported TeX engines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    /// Self-contained engine that fetches packages on demand
    Tectonic,
    /// Classic TeX Live / MiKTeX engine
    Pdflatex,
}

impl Engine {
    /// Executable name looked up on the search path
    pub fn executable(self) -> &'static str {
        match self {
            Engine::Tectonic => "tectonic",
            Engine::Pdflatex => "pdflatex",
        }
    }

    /// The other supported engine
    pub fn alternative(self) -> Engine {
        match self {
            Engine::Tectonic => Engine::Pdflatex,
            Engine::Pdflatex => Engine::Tectonic,
        }
    }

    /// Command-line arguments for compiling `tex_path` into `out_dir`
    fn args(self, tex_path: &Path, out_dir: &Path) -> Vec<OsString> {
        match self {
            Engine::Tectonic => vec![
                tex_path.as_os_str().to_owned(),
                OsString::from("--outdir"),
                out_dir.as_os_str().to_owned(),
            ],
            Engine::Pdflatex => vec![
                OsString::from("-interaction=nonstopmode"),
                OsString::from("-halt-on-error"),
                tex_path.as_os_str().to_owned(),
            ],
        }
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.executable())
    }
}

impl FromStr for Engine {
    type Err = LatexError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tectonic" => Ok(Engine::Tectonic),
            "pdflatex" => Ok(Engine::Pdflatex),
            _ => Err(LatexError::UnsupportedEngine(s.to_string())),
        }
    }
}

/// Compiler for converting LaTeX source files to PDF
#[derive(Debug, Clone)]
pub struct Compiler {
    engine: Engine,
    search_path: Option<OsString>,
}

impl Compiler {
    /// Create a compiler that resolves `engine` on `PATH`
    pub fn new(engine: Engine) -> Self {
        Self {
            engine,
            search_path: None,
        }
    }

    /// Resolve the engine on an explicit search path instead of `PATH`
    ///
    /// `paths` uses the platform's `PATH` syntax.
    pub fn with_search_path(mut self, paths: impl Into<OsString>) -> Self {
        self.search_path = Some(paths.into());
        self
    }

    /// The engine this compiler runs
    pub fn engine(&self) -> Engine {
        self.engine
    }

    /// Locate the engine executable
    pub fn resolve(&self, cwd: &Path) -> Result<PathBuf> {
        let exe = self.engine.executable();
        let found = match &self.search_path {
            Some(paths) => which::which_in(exe, Some(paths), cwd),
            None => which::which(exe),
        };

        found.map_err(|e| {
            debug!(engine = exe, error = %e, "engine lookup failed");
            LatexError::EngineNotInstalled {
                engine: exe.to_string(),
                alternative: self.engine.alternative().executable().to_string(),
            }
        })
    }

    /// Compile a `.tex` file to PDF
    ///
    /// The engine runs with the source file's directory as its working
    /// directory and must leave `<stem>.pdf` beside the source.
    ///
    /// # Returns
    /// Path of the produced PDF
    pub fn compile(&self, tex_path: &Path) -> Result<PathBuf> {
        let tex_path = tex_path.canonicalize().map_err(|source| LatexError::Io {
            path: tex_path.to_path_buf(),
            source,
        })?;
        let out_dir = tex_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        let exe = self.resolve(&out_dir)?;
        let args = self.engine.args(&tex_path, &out_dir);
        let command = command_line(&exe, &args);

        info!(engine = %self.engine, tex = %tex_path.display(), "compiling LaTeX");
        let output = Command::new(&exe)
            .args(&args)
            .current_dir(&out_dir)
            .output()
            .map_err(|source| LatexError::Spawn {
                command: command.clone(),
                source,
            })?;

        if !output.status.success() {
            warn!(status = ?output.status.code(), %command, "LaTeX engine failed");
            let log = format!(
                "{}\n{}",
                String::from_utf8_lossy(&output.stdout),
                String::from_utf8_lossy(&output.stderr)
            );
            return Err(LatexError::Compilation { command, log });
        }

        let pdf_path = tex_path.with_extension("pdf");
        if !pdf_path.exists() {
            return Err(LatexError::MissingOutput(pdf_path));
        }

        debug!(pdf = %pdf_path.display(), "PDF produced");
        Ok(pdf_path)
    }
}

/// Render a command for error messages
fn command_line(exe: &Path, args: &[OsString]) -> String {
    std::iter::once(exe.as_os_str())
        .chain(args.iter().map(OsString::as_os_str))
        .map(OsStr::to_string_lossy)
        .collect::<Vec<_>>()
        .join(" ")
}
