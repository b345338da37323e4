//! Configuration settings

use std::path::PathBuf;

use reportex_core::{AnalysisTask, PromptLibrary};
use reportex_latex::Engine;
use serde::{Deserialize, Serialize};

/// Top-level settings structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    /// Where and how documents are written
    pub output: OutputSettings,
    /// Report discovery
    pub reports: ReportSettings,
    /// Prompt files
    pub prompts: PromptSettings,
    /// External analyzer program
    pub analyzer: AnalyzerSettings,
}

impl Settings {
    /// Parse settings from a TOML string
    pub fn from_toml_str(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Prompt library described by the `[prompts]` section
    pub fn prompt_library(&self) -> PromptLibrary {
        PromptLibrary::new(&self.prompts.dir)
            .with_file(AnalysisTask::Compare, &self.prompts.compare)
            .with_file(AnalysisTask::Keywords, &self.prompts.keywords)
            .with_file(AnalysisTask::Individual, &self.prompts.individual)
    }
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Root directory; each document gets `<root>/<basename>/`
    pub root: PathBuf,
    /// TeX engine for the pipeline
    pub engine: Engine,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            root: PathBuf::from("out"),
            engine: Engine::Pdflatex,
        }
    }
}

/// Report discovery configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    /// Directory scanned for `*.pdf`
    pub dir: PathBuf,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("reports"),
        }
    }
}

/// Prompt file configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptSettings {
    /// Directory holding the prompt files
    pub dir: PathBuf,
    /// Prompt for report comparison
    pub compare: String,
    /// Prompt for keyword analysis
    pub keywords: String,
    /// Prompt for individual analysis
    pub individual: String,
}

impl Default for PromptSettings {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("prompts"),
            compare: AnalysisTask::Compare.default_prompt_file().to_string(),
            keywords: AnalysisTask::Keywords.default_prompt_file().to_string(),
            individual: AnalysisTask::Individual.default_prompt_file().to_string(),
        }
    }
}

/// External analyzer configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AnalyzerSettings {
    /// Program producing document JSON
    pub command: Option<String>,
    /// Arguments placed before the report paths
    pub args: Vec<String>,
}
