//! Configuration
//!
//! Settings are loaded from `reportex.toml` in the working directory, or
//! from the file given with `--config`:
//!
//! ```toml
//! [output]
//! root = "out"
//! engine = "tectonic"
//!
//! [reports]
//! dir = "reports"
//!
//! [prompts]
//! dir = "prompts"
//! keywords = "KeywordAnalysis.txt"
//!
//! [analyzer]
//! command = "./ask-model.sh"
//! args = ["--model", "large"]
//! ```
//!
//! Every section and key is optional. Command-line flags take precedence.

mod settings;


use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

pub use settings::{AnalyzerSettings, OutputSettings, PromptSettings, ReportSettings, Settings};

/// File names probed in the working directory when no `--config` is given
pub const CONFIG_CANDIDATES: [&str; 2] = ["reportex.toml", ".reportex.toml"];

/// Load settings from a config file or use defaults
pub fn load_settings(config_path: Option<&Path>) -> Result<Settings> {
    match config_path {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            read_settings(path)
        }
        None => {
            for candidate in CONFIG_CANDIDATES {
                let path = Path::new(candidate);
                if path.exists() {
                    return read_settings(path);
                }
            }
            Ok(Settings::default())
        }
    }
}

fn read_settings(path: &Path) -> Result<Settings> {
    debug!(config = %path.display(), "loading settings");
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    Settings::from_toml_str(&content)
        .with_context(|| format!("Failed to parse config: {}", path.display()))
}
