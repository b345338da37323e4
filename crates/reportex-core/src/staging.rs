//! Temporary staging of report files
//!
//! Selected reports are copied into a private temporary directory before
//! they are handed to the analyzer. The directory is removed when the
//! [`StagedReports`] guard is dropped, on success and on error alike.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::debug;

use crate::analysis::check_reports;
use crate::error::AnalysisError;

/// Reports copied into a temporary directory
#[derive(Debug)]
pub struct StagedReports {
    dir: TempDir,
    paths: Vec<PathBuf>,
}

impl StagedReports {
    /// Copy `reports` into a fresh temporary directory
    ///
    /// File names are kept so that per-report output names stay stable.
    pub fn stage(reports: &[PathBuf]) -> Result<Self, AnalysisError> {
        check_reports(reports)?;

        let dir = tempfile::Builder::new()
            .prefix("reports_")
            .tempdir()
            .map_err(|source| AnalysisError::Io {
                path: std::env::temp_dir(),
                source,
            })?;

        let mut seen = HashSet::new();
        let mut paths = Vec::with_capacity(reports.len());
        for report in reports {
            let name = report
                .file_name()
                .ok_or_else(|| AnalysisError::NotAPdf(report.clone()))?;
            if !seen.insert(name.to_owned()) {
                return Err(AnalysisError::DuplicateReportName(
                    name.to_string_lossy().into_owned(),
                ));
            }

            let dst = dir.path().join(name);
            fs::copy(report, &dst).map_err(|source| AnalysisError::Io {
                path: report.clone(),
                source,
            })?;
            paths.push(dst);
        }

        debug!(dir = %dir.path().display(), reports = paths.len(), "reports staged");
        Ok(Self { dir, paths })
    }

    /// Staged copies, in input order
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// The temporary directory holding the copies
    pub fn dir(&self) -> &Path {
        self.dir.path()
    }
}
