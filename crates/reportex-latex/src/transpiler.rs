//! Document to LaTeX transpiler
//!
//! Converts reportex documents to LaTeX source. Output is a pure function of
//! the input document: the same document always yields byte-identical text.

use reportex_ast::{Block, Document, Meta, Table};

use crate::escape::escape;

/// Fixed LaTeX preamble
///
/// Page geometry, fonts, and the list and table packages the block
/// renderer relies on (`enumitem`, `booktabs`, `xltabular`).
pub const PREAMBLE: &str = r"
\documentclass[11pt,a4paper]{article}
\usepackage[a4paper,margin=2.5cm]{geometry}
\usepackage[T1]{fontenc}
\usepackage[utf8]{inputenc}
\usepackage{lmodern}
\usepackage{microtype}
\usepackage[hidelinks]{hyperref}
\usepackage{enumitem}
\usepackage{booktabs}
\usepackage{longtable}
\usepackage{array}
\usepackage{tabularx}
\usepackage{adjustbox}
\usepackage{xltabular}

\renewcommand{\arraystretch}{1.10}
\setlength{\tabcolsep}{4pt}

\setlist[itemize]{noitemsep, topsep=4pt}
\setlist[enumerate]{noitemsep, topsep=4pt}

\begin{document}
";

/// Width of the first column in multi-column tables, as a fraction of `\textwidth`
const FIRST_COLUMN_WIDTH: &str = "0.18";

/// Transpiler for converting documents to LaTeX
pub struct Transpiler;

impl Transpiler {
    /// Transpile a document to a complete LaTeX source file
    pub fn transpile(doc: &Document) -> String {
        let mut output = String::from(PREAMBLE);

        output.push_str(&Self::title_block(&doc.meta));

        for block in &doc.blocks {
            output.push_str(&Self::transpile_block(block));
        }

        output.push_str("\n\\end{document}\n");
        output
    }

    /// Title, author, and date followed by `\maketitle`
    ///
    /// Missing author or date render as empty groups so that LaTeX does not
    /// fall back to its own defaults (e.g. today's date).
    fn title_block(meta: &Meta) -> String {
        let author = meta.author.as_deref().map(escape).unwrap_or_default();
        let date = meta.date.as_deref().map(escape).unwrap_or_default();

        format!(
            "\\title{{{}}}\n\\author{{{}}}\n\\date{{{}}}\n\\maketitle\n",
            escape(&meta.title),
            author,
            date
        )
    }

    /// Transpile a single block
    pub fn transpile_block(block: &Block) -> String {
        match block {
            Block::H1 { text } => format!("\\section*{{{}}}\n", escape(text)),
            Block::H2 { text } => format!("\\subsection*{{{}}}\n", escape(text)),
            Block::H3 { text } => format!("\\subsubsection*{{{}}}\n", escape(text)),

            // Blank line ends the paragraph
            Block::P { text } => format!("{}\n\n", escape(text)),

            Block::Bullets { items } => Self::transpile_list("itemize", items),
            Block::Numbered { items } => Self::transpile_list("enumerate", items),

            Block::Table(table) => Self::transpile_table(table),

            Block::Pagebreak {} => "\\clearpage\n".to_string(),
        }
    }

    /// Transpile a list into an `itemize` or `enumerate` environment
    fn transpile_list(environment: &str, items: &[String]) -> String {
        let body = items
            .iter()
            .map(|item| format!("  \\item {}", escape(item)))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "\\begin{{{env}}}\n{body}\n\\end{{{env}}}\n\n",
            env = environment,
            body = body
        )
    }

    /// Transpile a table into a page-breaking `xltabular`
    ///
    /// The header repeats on every page, intermediate page footers carry a
    /// "Continued on next page" marker and the last page closes with a
    /// bottom rule only.
    fn transpile_table(table: &Table) -> String {
        let width = table.width();
        let header = Self::table_row(&table.columns);
        let body = table
            .rows
            .iter()
            .map(|row| Self::table_row(row))
            .collect::<Vec<_>>()
            .join("\n");

        let lines = [
            r"\begingroup\small".to_string(),
            r"\setlength{\LTpre}{0pt}".to_string(),
            r"\setlength{\LTpost}{0pt}".to_string(),
            format!(
                "\\begin{{xltabular}}{{\\textwidth}}{{{}}}",
                Self::column_spec(width)
            ),
            r"\toprule".to_string(),
            header.clone(),
            r"\midrule".to_string(),
            r"\endfirsthead".to_string(),
            r"\toprule".to_string(),
            header,
            r"\midrule".to_string(),
            r"\endhead".to_string(),
            r"\midrule".to_string(),
            format!(
                "\\multicolumn{{{}}}{{c}}{{\\small \\textbf{{Continued on next page}}}} \\\\",
                width
            ),
            r"\midrule".to_string(),
            r"\endfoot".to_string(),
            r"\bottomrule".to_string(),
            r"\endlastfoot".to_string(),
            body,
            r"\end{xltabular}".to_string(),
            r"\endgroup".to_string(),
            String::new(),
        ];
        let table_tex = lines.join("\n");

        match table.caption.as_deref() {
            Some(caption) if !caption.is_empty() => {
                format!("\\textbf{{{}}}\n\n{}\n", escape(caption), table_tex)
            }
            _ => table_tex + "\n",
        }
    }

    /// One escaped row terminated with `\\`
    fn table_row(cells: &[String]) -> String {
        let cells = cells.iter().map(|c| escape(c)).collect::<Vec<_>>();
        format!("{} \\\\", cells.join(" & "))
    }

    /// Column specification for a table with `width` columns
    ///
    /// A single column spans the full text width. Otherwise the first
    /// column is fixed and the remaining `X` columns share what is left.
    fn column_spec(width: usize) -> String {
        const WRAP: &str = r">{\raggedright\arraybackslash}";

        if width <= 1 {
            return format!("{}p{{\\textwidth}}", WRAP);
        }

        let mut spec = format!("{}p{{{}\\textwidth}}", WRAP, FIRST_COLUMN_WIDTH);
        for _ in 1..width {
            spec.push(' ');
            spec.push_str(WRAP);
            spec.push('X');
        }
        spec
    }
}
