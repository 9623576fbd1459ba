//! Scan command: recursively analyze every script under a directory.

use anyhow::Result;
use console::style;
use std::path::Path;
use tracing::error;
use walkdir::WalkDir;

use qlint_rules::RuleEngine;

use super::common::{self, SOURCE_EXTENSION};

/// Execute the scan command.
///
/// One failing file never aborts the batch: it is logged and the scan
/// moves on to the next script.
pub async fn execute(path: &str, report_dir: Option<&str>) -> Result<()> {
    let root = Path::new(path);
    if !root.is_dir() {
        anyhow::bail!("not a directory: {}", root.display());
    }

    let engine = RuleEngine::new();
    let mut analyzed = 0usize;

    for entry in WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
    {
        if !entry.file_type().is_file() {
            continue;
        }
        let script = entry.path();
        if script.extension().and_then(|e| e.to_str()) != Some(SOURCE_EXTENSION) {
            continue;
        }

        if let Err(e) = common::analyze_file(&engine, script, report_dir.map(Path::new)).await {
            error!("skipping {}: {e:#}", script.display());
            continue;
        }
        analyzed += 1;
    }

    println!(
        "{} Scanned {} script(s)",
        style("✓").green().bold(),
        analyzed
    );
    Ok(())
}
