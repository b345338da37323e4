//! Analysis tasks over financial reports
//!
//! The model call is injected through [`Analyzer`]: given report PDFs and a
//! prompt it returns JSON text, which [`TaskRunner`] feeds to the
//! [`Pipeline`]. Prompt texts are plain files loaded by [`PromptLibrary`].

use std::fmt;
use std::fs;
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::str::FromStr;
use std::thread::{self, JoinHandle};

use tracing::{debug, info};

use crate::error::AnalysisError;
use crate::pipeline::Pipeline;

/// Instructions every analysis must follow so its output can be rendered
pub const OUTPUT_CONTRACT: &str = r#"ABSOLUTE RULES:
- Output MUST be valid JSON only. No markdown. No extra text.
- Output MUST contain only plain ASCII characters. Do not use Unicode quotes, dashes, ellipses or bullets.
Use replacements: "quotes", 'apostrophe', "...", "-", "CO2".
- JSON MUST follow the schema exactly:
{ "meta": { "title": str, "author": str, "date": str }, "blocks": [ ... ] }
- Allowed block types: h1, h2, h3, p, bullets, numbered, table, pagebreak.
- For bullets/numbered blocks: always include "items": [string, ...]. Never use "text" for these.
- For h1/h2/h3/p blocks: always include "text": string.
- For table blocks: always include "columns": [string,...] and "rows": [[string,...],...].
- If unsure how to format something, use a "p" block (never invent new block types)."#;

/// Environment variable carrying [`OUTPUT_CONTRACT`] to external analyzers
pub const CONTRACT_ENV: &str = "REPORTEX_OUTPUT_CONTRACT";

/// Produces document JSON from report PDFs and a prompt
pub trait Analyzer {
    /// Analyze `pdf_paths` according to `prompt` and return JSON text
    fn analyze(&self, pdf_paths: &[PathBuf], prompt: &str) -> Result<String, AnalysisError>;
}

impl<F> Analyzer for F
where
    F: Fn(&[PathBuf], &str) -> Result<String, AnalysisError>,
{
    fn analyze(&self, pdf_paths: &[PathBuf], prompt: &str) -> Result<String, AnalysisError> {
        self(pdf_paths, prompt)
    }
}

/// Analyzer backed by an external program
///
/// The program is invoked as `<program> <args...> <pdf...>` with the prompt
/// on stdin and [`OUTPUT_CONTRACT`] in `REPORTEX_OUTPUT_CONTRACT`. Its stdout
/// is taken as the JSON answer.
#[derive(Debug, Clone)]
pub struct CommandAnalyzer {
    program: String,
    args: Vec<String>,
}

impl CommandAnalyzer {
    /// Create an analyzer running `program`
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Fixed arguments placed before the PDF paths
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// The program this analyzer runs
    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Analyzer for CommandAnalyzer {
    fn analyze(&self, pdf_paths: &[PathBuf], prompt: &str) -> Result<String, AnalysisError> {
        debug!(program = %self.program, reports = pdf_paths.len(), "starting analyzer");

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .args(pdf_paths)
            .env(CONTRACT_ENV, OUTPUT_CONTRACT)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| AnalysisError::Io {
                path: PathBuf::from(&self.program),
                source,
            })?;

        // Feed stdin from a separate thread so a chatty child cannot block us
        let writer = child.stdin.take().map(|mut stdin| {
            let prompt = prompt.to_string();
            thread::spawn(move || stdin.write_all(prompt.as_bytes()))
        });

        let output = child.wait_with_output().map_err(|source| AnalysisError::Io {
            path: PathBuf::from(&self.program),
            source,
        })?;

        let written = finish_prompt_write(writer, &self.program);

        if !output.status.success() {
            return Err(AnalysisError::AnalyzerFailed {
                program: self.program.clone(),
                status: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        written?;

        String::from_utf8(output.stdout).map_err(|_| AnalysisError::InvalidOutput(self.program.clone()))
    }
}

/// Collect the outcome of the stdin writer thread
///
/// A child that exits without reading its input closes the pipe early;
/// that broken pipe is accepted. Any other write failure means the prompt
/// was truncated.
fn finish_prompt_write(
    writer: Option<JoinHandle<io::Result<()>>>,
    program: &str,
) -> Result<(), AnalysisError> {
    let Some(handle) = writer else {
        return Ok(());
    };

    let result = handle
        .join()
        .unwrap_or_else(|_| Err(io::Error::new(ErrorKind::Other, "prompt writer panicked")));

    match result {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::BrokenPipe => {
            debug!(program, "analyzer closed stdin before reading the whole prompt");
            Ok(())
        }
        Err(source) => Err(AnalysisError::Io {
            path: PathBuf::from(program),
            source,
        }),
    }
}

/// The analyses offered on a set of reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnalysisTask {
    /// Compare all selected reports in one document
    Compare,
    /// Analyze user keywords across all selected reports
    Keywords,
    /// One document per report
    Individual,
}

impl AnalysisTask {
    /// All tasks in menu order
    pub const ALL: [AnalysisTask; 3] = [
        AnalysisTask::Compare,
        AnalysisTask::Keywords,
        AnalysisTask::Individual,
    ];

    /// Command-line name
    pub fn name(self) -> &'static str {
        match self {
            AnalysisTask::Compare => "compare",
            AnalysisTask::Keywords => "keywords",
            AnalysisTask::Individual => "individual",
        }
    }

    /// Default prompt file name
    pub fn default_prompt_file(self) -> &'static str {
        match self {
            AnalysisTask::Compare => "CompareReports.txt",
            AnalysisTask::Keywords => "KeyWordAnalysis.txt",
            AnalysisTask::Individual => "IndividualAnalysis.txt",
        }
    }

    /// Progress message shown while the analyzer runs
    pub fn status(self) -> &'static str {
        match self {
            AnalysisTask::Compare => "Comparing reports...",
            AnalysisTask::Keywords => "Running keyword analysis...",
            AnalysisTask::Individual => "Running individual analyses...",
        }
    }

    /// Output basename; `report` is used by [`AnalysisTask::Individual`]
    pub fn basename(self, report: Option<&Path>) -> String {
        match self {
            AnalysisTask::Compare => "compare_reports".to_string(),
            AnalysisTask::Keywords => "keyword_analysis".to_string(),
            AnalysisTask::Individual => {
                let stem = report
                    .and_then(Path::file_stem)
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default();
                format!("individual_analysis_{}", stem)
            }
        }
    }
}

impl fmt::Display for AnalysisTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AnalysisTask {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AnalysisTask::ALL
            .into_iter()
            .find(|task| task.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| AnalysisError::UnknownTask(s.to_string()))
    }
}

/// Prompt files for each task, read from one directory
#[derive(Debug, Clone)]
pub struct PromptLibrary {
    dir: PathBuf,
    compare: String,
    keywords: String,
    individual: String,
}

impl PromptLibrary {
    /// Library using the default file name for every task
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            compare: AnalysisTask::Compare.default_prompt_file().to_string(),
            keywords: AnalysisTask::Keywords.default_prompt_file().to_string(),
            individual: AnalysisTask::Individual.default_prompt_file().to_string(),
        }
    }

    /// Override the file name used for `task`
    pub fn with_file(mut self, task: AnalysisTask, file_name: impl Into<String>) -> Self {
        let slot = match task {
            AnalysisTask::Compare => &mut self.compare,
            AnalysisTask::Keywords => &mut self.keywords,
            AnalysisTask::Individual => &mut self.individual,
        };
        *slot = file_name.into();
        self
    }

    /// Full path of the prompt file for `task`
    pub fn path(&self, task: AnalysisTask) -> PathBuf {
        let file = match task {
            AnalysisTask::Compare => &self.compare,
            AnalysisTask::Keywords => &self.keywords,
            AnalysisTask::Individual => &self.individual,
        };
        self.dir.join(file)
    }

    /// Read the prompt for `task`
    pub fn load(&self, task: AnalysisTask) -> Result<String, AnalysisError> {
        let path = self.path(task);
        if !path.exists() {
            return Err(AnalysisError::PromptNotFound(path));
        }
        fs::read_to_string(&path).map_err(|source| AnalysisError::Io { path, source })
    }
}

/// Place user input ahead of a prompt, separated by a blank line
pub fn compose_prompt(prompt: &str, user_input: Option<&str>) -> String {
    match user_input.map(str::trim_end) {
        Some(input) if !input.is_empty() => format!("{}\n\n{}", input, prompt.trim_start()),
        _ => prompt.to_string(),
    }
}

/// Format keywords as the preface of a keyword analysis prompt
pub fn format_keywords<S: AsRef<str>>(keywords: &[S]) -> String {
    let lines: Vec<&str> = keywords
        .iter()
        .map(|k| k.as_ref().trim())
        .filter(|k| !k.is_empty())
        .collect();

    let mut out = String::from("KEYWORDS TO ANALYZE:\n");
    if lines.is_empty() {
        out.push_str("- (none)\n");
    }
    for line in lines {
        out.push_str("- ");
        out.push_str(line);
        out.push('\n');
    }
    out
}

/// Check that report paths are present, exist, and look like PDFs
pub fn check_reports(paths: &[PathBuf]) -> Result<(), AnalysisError> {
    if paths.is_empty() {
        return Err(AnalysisError::NoReports);
    }

    let missing: Vec<PathBuf> = paths.iter().filter(|p| !p.exists()).cloned().collect();
    if !missing.is_empty() {
        return Err(AnalysisError::ReportNotFound(missing));
    }

    if let Some(not_pdf) = paths.iter().find(|p| !has_pdf_extension(p)) {
        return Err(AnalysisError::NotAPdf(not_pdf.clone()));
    }

    Ok(())
}

fn has_pdf_extension(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}

/// Runs analysis tasks and renders their results
pub struct TaskRunner<'a> {
    analyzer: &'a dyn Analyzer,
    prompts: &'a PromptLibrary,
    pipeline: &'a Pipeline,
}

impl<'a> TaskRunner<'a> {
    /// Create a runner
    pub fn new(analyzer: &'a dyn Analyzer, prompts: &'a PromptLibrary, pipeline: &'a Pipeline) -> Self {
        Self {
            analyzer,
            prompts,
            pipeline,
        }
    }

    /// Run `task` over `reports` and return the produced PDF paths
    ///
    /// Compare and keyword analyses produce one PDF. Individual analysis
    /// produces one PDF per report, in input order.
    pub fn run(
        &self,
        task: AnalysisTask,
        reports: &[PathBuf],
        keywords: &[String],
    ) -> Result<Vec<PathBuf>, AnalysisError> {
        check_reports(reports)?;

        let user_input = match task {
            AnalysisTask::Keywords => {
                if keywords.iter().all(|k| k.trim().is_empty()) {
                    return Err(AnalysisError::MissingKeywords);
                }
                Some(format_keywords(keywords))
            }
            _ => None,
        };

        let prompt = compose_prompt(&self.prompts.load(task)?, user_input.as_deref());
        info!(task = %task, reports = reports.len(), "{}", task.status());

        match task {
            AnalysisTask::Compare | AnalysisTask::Keywords => {
                let json_text = self.analyzer.analyze(reports, &prompt)?;
                let pdf = self.pipeline.run(&json_text, &task.basename(None))?;
                Ok(vec![pdf])
            }
            AnalysisTask::Individual => {
                let mut pdfs = Vec::with_capacity(reports.len());
                for report in reports {
                    let json_text = self.analyzer.analyze(std::slice::from_ref(report), &prompt)?;
                    let pdf = self.pipeline.run(&json_text, &task.basename(Some(report)))?;
                    pdfs.push(pdf);
                }
                Ok(pdfs)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_from_str() {
        assert_eq!("compare".parse::<AnalysisTask>().unwrap(), AnalysisTask::Compare);
        assert_eq!("Keywords".parse::<AnalysisTask>().unwrap(), AnalysisTask::Keywords);
        assert!(matches!(
            "summary".parse::<AnalysisTask>(),
            Err(AnalysisError::UnknownTask(_))
        ));
    }

    #[test]
    fn test_task_basenames() {
        assert_eq!(AnalysisTask::Compare.basename(None), "compare_reports");
        assert_eq!(AnalysisTask::Keywords.basename(None), "keyword_analysis");
        assert_eq!(
            AnalysisTask::Individual.basename(Some(Path::new("reports/acme_q3.pdf"))),
            "individual_analysis_acme_q3"
        );
    }

    #[test]
    fn test_compose_prompt() {
        assert_eq!(
            compose_prompt("\n  Analyze the reports.", Some("KEYWORDS TO ANALYZE:\n- pricing\n\n")),
            "KEYWORDS TO ANALYZE:\n- pricing\n\nAnalyze the reports."
        );
        assert_eq!(compose_prompt(" Prompt", None), " Prompt");
        assert_eq!(compose_prompt("Prompt", Some("  \n")), "Prompt");
    }

    #[test]
    fn test_format_keywords() {
        let keywords = ["pricing", " ", "free cash flow "];
        assert_eq!(
            format_keywords(&keywords),
            "KEYWORDS TO ANALYZE:\n- pricing\n- free cash flow\n"
        );

        let none: [&str; 0] = [];
        assert_eq!(format_keywords(&none), "KEYWORDS TO ANALYZE:\n- (none)\n");
    }

    #[test]
    fn test_check_reports() {
        assert!(matches!(check_reports(&[]), Err(AnalysisError::NoReports)));

        let temp = tempfile::tempdir().unwrap();
        let pdf = temp.path().join("a.PDF");
        let txt = temp.path().join("notes.txt");
        fs::write(&pdf, b"%PDF").unwrap();
        fs::write(&txt, b"x").unwrap();

        assert!(check_reports(&[pdf.clone()]).is_ok());
        assert!(matches!(
            check_reports(&[pdf.clone(), txt.clone()]),
            Err(AnalysisError::NotAPdf(p)) if p == txt
        ));

        let gone = temp.path().join("gone.pdf");
        match check_reports(&[pdf, gone.clone()]) {
            Err(AnalysisError::ReportNotFound(missing)) => assert_eq!(missing, vec![gone]),
            other => panic!("Expected ReportNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_prompt_library() {
        let temp = tempfile::tempdir().unwrap();
        fs::write(temp.path().join("Compare.txt"), "Compare them.").unwrap();

        let library = PromptLibrary::new(temp.path()).with_file(AnalysisTask::Compare, "Compare.txt");
        assert_eq!(library.load(AnalysisTask::Compare).unwrap(), "Compare them.");
        assert_eq!(
            library.path(AnalysisTask::Individual),
            temp.path().join("IndividualAnalysis.txt")
        );
        assert!(matches!(
            library.load(AnalysisTask::Keywords),
            Err(AnalysisError::PromptNotFound(_))
        ));
    }

    #[test]
    fn test_closure_analyzer() {
        let analyzer = |paths: &[PathBuf], prompt: &str| -> Result<String, AnalysisError> {
            Ok(format!("{} {}", paths.len(), prompt))
        };
        let out = analyzer
            .analyze(&[PathBuf::from("a.pdf")], "go")
            .unwrap();
        assert_eq!(out, "1 go");
    }

    #[cfg(unix)]
    #[test]
    fn test_command_analyzer_echoes_stdin() {
        let analyzer = CommandAnalyzer::new("sh").with_args(["-c", "cat; printf ' %s' \"$@\"", "sh"]);
        let out = analyzer
            .analyze(&[PathBuf::from("a.pdf"), PathBuf::from("b.pdf")], "{}")
            .unwrap();
        assert_eq!(out, "{} a.pdf b.pdf");
    }

    #[cfg(unix)]
    #[test]
    fn test_command_analyzer_sees_contract() {
        let analyzer = CommandAnalyzer::new("sh").with_args(["-c", "printf '%s' \"$REPORTEX_OUTPUT_CONTRACT\""]);
        let out = analyzer.analyze(&[], "").unwrap();
        assert_eq!(out, OUTPUT_CONTRACT);
    }

    #[cfg(unix)]
    #[test]
    fn test_command_analyzer_failure() {
        let analyzer = CommandAnalyzer::new("sh").with_args(["-c", "echo quota exceeded >&2; exit 4"]);
        match analyzer.analyze(&[], "prompt") {
            Err(AnalysisError::AnalyzerFailed { status, stderr, .. }) => {
                assert_eq!(status, Some(4));
                assert_eq!(stderr, "quota exceeded");
            }
            other => panic!("Expected AnalyzerFailed, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_command_analyzer_ignores_unread_prompt() {
        let analyzer = CommandAnalyzer::new("sh").with_args(["-c", "printf '{}'"]);
        let prompt = "x".repeat(1 << 20);
        assert_eq!(analyzer.analyze(&[], &prompt).unwrap(), "{}");
    }

    #[test]
    fn test_prompt_write_errors() {
        assert!(finish_prompt_write(None, "ask").is_ok());

        let broken = thread::spawn(|| Err(io::Error::new(ErrorKind::BrokenPipe, "closed")));
        assert!(finish_prompt_write(Some(broken), "ask").is_ok());

        let failed = thread::spawn(|| Err(io::Error::new(ErrorKind::WriteZero, "short write")));
        match finish_prompt_write(Some(failed), "ask") {
            Err(AnalysisError::Io { path, source }) => {
                assert_eq!(path, PathBuf::from("ask"));
                assert_eq!(source.kind(), ErrorKind::WriteZero);
            }
            other => panic!("Expected Io, got {:?}", other),
        }

        let panicked = thread::spawn(|| -> io::Result<()> { panic!("writer died") });
        assert!(matches!(
            finish_prompt_write(Some(panicked), "ask"),
            Err(AnalysisError::Io { .. })
        ));
    }

    #[test]
    fn test_command_analyzer_missing_program() {
        let analyzer = CommandAnalyzer::new("reportex-no-such-analyzer");
        assert!(matches!(
            analyzer.analyze(&[], "prompt"),
            Err(AnalysisError::Io { .. })
        ));
    }
}
