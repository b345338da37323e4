//! JSON text to PDF pipeline
//!
//! Each stage gates the next: parse, validate, persist JSON, render and
//! persist LaTeX, compile. Artifacts for a basename overwrite any previous
//! run with the same basename.

use std::fs;
use std::path::{Path, PathBuf};

use reportex_latex::{Compiler, Engine, Transpiler};
use reportex_validate::{parse_document, SchemaError};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{PipelineError, Result};

/// Paths of the intermediate files written for one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifacts {
    /// `<out_root>/<basename>/`
    pub dir: PathBuf,
    /// Canonical pretty-printed JSON
    pub json_path: PathBuf,
    /// Rendered LaTeX source
    pub tex_path: PathBuf,
}

/// Renders model output into per-document artifact directories
#[derive(Debug, Clone)]
pub struct Pipeline {
    out_root: PathBuf,
    compiler: Compiler,
}

impl Pipeline {
    /// Create a pipeline writing under `out_root` and compiling with `engine`
    pub fn new(out_root: impl Into<PathBuf>, engine: Engine) -> Self {
        Self::with_compiler(out_root, Compiler::new(engine))
    }

    /// Create a pipeline with a preconfigured compiler
    pub fn with_compiler(out_root: impl Into<PathBuf>, compiler: Compiler) -> Self {
        Self {
            out_root: out_root.into(),
            compiler,
        }
    }

    /// Root directory holding one subdirectory per document
    pub fn out_root(&self) -> &Path {
        &self.out_root
    }

    /// The compiler used by [`Pipeline::run`]
    pub fn compiler(&self) -> &Compiler {
        &self.compiler
    }

    /// Directory for a basename's artifacts
    pub fn output_dir(&self, basename: &str) -> Result<PathBuf> {
        check_basename(basename)?;
        Ok(self.out_root.join(basename))
    }

    /// Parse, validate, and write the `.json` and `.tex` artifacts
    ///
    /// On a JSON syntax error the raw text is saved as `<basename>.raw.txt`
    /// and nothing else is written.
    pub fn render_artifacts(&self, json_text: &str, basename: &str) -> Result<Artifacts> {
        let dir = self.output_dir(basename)?;
        fs::create_dir_all(&dir).map_err(|source| PipelineError::Io {
            path: dir.clone(),
            source,
        })?;

        let value: Value = match serde_json::from_str(json_text) {
            Ok(value) => value,
            Err(source) => {
                let raw_path = dir.join(format!("{}.raw.txt", basename));
                write_file(&raw_path, json_text)?;
                warn!(raw = %raw_path.display(), error = %source, "input is not valid JSON");
                return Err(PipelineError::Parse { raw_path, source });
            }
        };

        if !value.is_object() {
            return Err(SchemaError::document("Top-level JSON must be an object").into());
        }

        let doc = parse_document(&value)?;
        debug!(basename, blocks = doc.blocks.len(), "document validated");

        let json_path = dir.join(format!("{}.json", basename));
        let json = serde_json::to_string_pretty(&doc).map_err(PipelineError::Encode)?;
        write_file(&json_path, &json)?;

        let tex_path = dir.join(format!("{}.tex", basename));
        write_file(&tex_path, &Transpiler::transpile(&doc))?;
        info!(tex = %tex_path.display(), "LaTeX written");

        Ok(Artifacts {
            dir,
            json_path,
            tex_path,
        })
    }

    /// Run the full pipeline and return the produced PDF path
    pub fn run(&self, json_text: &str, basename: &str) -> Result<PathBuf> {
        let artifacts = self.render_artifacts(json_text, basename)?;
        let pdf_path = self.compiler.compile(&artifacts.tex_path)?;
        info!(pdf = %pdf_path.display(), "PDF written");
        Ok(pdf_path)
    }
}

/// Render model output to `<out_root>/<basename>/<basename>.pdf`
pub fn write_pdf_from_json_text(
    json_text: &str,
    basename: &str,
    out_root: &Path,
    engine: Engine,
) -> Result<PathBuf> {
    Pipeline::new(out_root, engine).run(json_text, basename)
}

fn check_basename(basename: &str) -> Result<()> {
    let invalid = basename.trim().is_empty()
        || basename == "."
        || basename == ".."
        || basename.contains(['/', '\\']);
    if invalid {
        return Err(PipelineError::InvalidBasename(basename.to_string()));
    }
    Ok(())
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).map_err(|source| PipelineError::Io {
        path: path.to_path_buf(),
        source,
    })
}
