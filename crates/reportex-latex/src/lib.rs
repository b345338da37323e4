//! reportex-latex - PDF generation via LaTeX
//!
//! This crate turns a validated [`reportex_ast::Document`] into LaTeX source
//! and hands that source to an external TeX engine.
//!
//! # Architecture
//!
//! The PDF generation pipeline consists of two stages:
//!
//! 1. **Transpiler** - Converts a `Document` to LaTeX markup, escaping every
//!    user-supplied string on the way
//! 2. **Compiler** - Runs `tectonic` or `pdflatex` on the written `.tex` file
//!
//! # Example
//!
//! ```ignore
//! use reportex_ast::Document;
//! use reportex_latex::{Compiler, Engine, Transpiler};
//!
//! let doc = Document::new("Quarterly review");
//! std::fs::write("out/review.tex", Transpiler::transpile(&doc))?;
//! let pdf_path = Compiler::new(Engine::Pdflatex).compile("out/review.tex".as_ref())?;
//! ```

mod compiler;
mod error;
mod escape;
mod transpiler;

pub use compiler::{Compiler, Engine};
pub use error::{LatexError, Result};
pub use escape::escape;
pub use transpiler::{Transpiler, PREAMBLE};

/// Convenience function to render a document to LaTeX source
pub fn render_latex(doc: &reportex_ast::Document) -> String {
    Transpiler::transpile(doc)
}
