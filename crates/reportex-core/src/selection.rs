//! Report discovery and index selection
//!
//! Reports are listed in sorted order and picked with a compact selection
//! string such as `1,3,5`, `2-4` or `1,2-4,7`. An empty selection picks
//! every report.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use glob::glob;

use crate::error::SelectionError;

/// List `*.pdf` files in `dir`, sorted by path
pub fn list_pdfs(dir: &Path) -> Result<Vec<PathBuf>, SelectionError> {
    let pattern = Path::new(&glob::Pattern::escape(&dir.to_string_lossy())).join("*.pdf");
    let pattern = pattern.to_string_lossy();

    let entries = glob(&pattern).map_err(|e| SelectionError::Pattern(e.to_string()))?;
    let mut pdfs: Vec<PathBuf> = entries.filter_map(|entry| entry.ok()).collect();
    pdfs.sort();

    if pdfs.is_empty() {
        return Err(SelectionError::NoReports(dir.to_path_buf()));
    }
    Ok(pdfs)
}

/// Parse a selection string into sorted, de-duplicated 1-based indices
///
/// Range bounds given in reverse order are swapped.
pub fn parse_selection(input: &str, count: usize) -> Result<Vec<usize>, SelectionError> {
    let input = input.trim();
    if input.is_empty() {
        return Ok((1..=count).collect());
    }

    let mut selected = BTreeSet::new();
    // Smallest index outside 1..=count; rejected ranges are never expanded
    let mut out_of_range: Option<usize> = None;
    let mut reject = |index: usize| {
        out_of_range = Some(out_of_range.map_or(index, |seen| seen.min(index)));
    };

    for part in input.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        match part.split_once('-') {
            Some((lo, hi)) => {
                let (lo, hi) = match (parse_index(lo.trim()), parse_index(hi.trim())) {
                    (Some(lo), Some(hi)) => (lo.min(hi), lo.max(hi)),
                    _ => return Err(SelectionError::InvalidRange(part.to_string())),
                };
                if lo < 1 {
                    reject(lo);
                } else if hi > count {
                    reject(lo.max(count + 1));
                } else {
                    selected.extend(lo..=hi);
                }
            }
            None => {
                let index = parse_index(part)
                    .ok_or_else(|| SelectionError::InvalidSelection(part.to_string()))?;
                if index < 1 || index > count {
                    reject(index);
                } else {
                    selected.insert(index);
                }
            }
        }
    }

    if let Some(index) = out_of_range {
        return Err(SelectionError::OutOfRange { index, count });
    }

    Ok(selected.into_iter().collect())
}

/// Pick reports from `available` using a selection string
pub fn select_reports(available: &[PathBuf], input: &str) -> Result<Vec<PathBuf>, SelectionError> {
    let indices = parse_selection(input, available.len())?;
    Ok(indices
        .into_iter()
        .map(|i| available[i - 1].clone())
        .collect())
}

fn parse_index(s: &str) -> Option<usize> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}
