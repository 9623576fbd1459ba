//! Check command: analyze a single script.

use anyhow::Result;
use std::path::Path;

use qlint_rules::RuleEngine;

use super::common;

/// Execute the check command.
pub async fn execute(path: &str, json: bool, report_dir: Option<&str>) -> Result<()> {
    let path = Path::new(path);
    if !path.is_file() {
        anyhow::bail!("not a file: {}", path.display());
    }

    let engine = RuleEngine::new();
    let report = common::analyze_file(&engine, path, report_dir.map(Path::new)).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    Ok(())
}
