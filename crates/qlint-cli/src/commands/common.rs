//! Shared analysis plumbing: source loading, the per-file pipeline, and
//! the report sink.

use anyhow::{Context, Result};
use console::style;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

use qlint_ast::{Facts, extract, parse};
use qlint_rules::{Report, RuleEngine};

/// Extension of the scripts the analyzer understands.
pub const SOURCE_EXTENSION: &str = "py";

/// One loaded source file: full text plus the split line array used to
/// render 1-based issue lines.
pub struct SourceFile {
    pub text: String,
    pub lines: Vec<String>,
}

/// Read one script from disk.
pub fn load_source(path: &Path) -> Result<SourceFile> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let lines = text.split('\n').map(String::from).collect();
    Ok(SourceFile { text, lines })
}

/// Analyze one script and persist its report.
///
/// A script that fails to parse is unanalyzable: it yields an empty fact
/// set (and so an empty report), is logged, and never aborts a batch.
pub async fn analyze_file(
    engine: &RuleEngine,
    path: &Path,
    report_dir: Option<&Path>,
) -> Result<Report> {
    println!(
        "{} Analyzing {}",
        style("→").cyan().bold(),
        style(path.display()).green()
    );

    let source = load_source(path)?;
    let facts = match parse(&source.text) {
        Ok(module) => extract(&module),
        Err(e) => {
            error!("unanalyzable {}: {e}", path.display());
            Facts::default()
        }
    };
    debug!(
        "{}: {} assignment facts, {} call facts",
        path.display(),
        facts.assignments.len(),
        facts.calls.len()
    );

    let report = engine.analyze(facts, &source.lines).await;

    if report.is_clean() {
        println!("  {} clean", style("✓").green().bold());
    } else {
        println!(
            "  {} {} error(s), {} warning(s)",
            style("!").yellow().bold(),
            report.errors.len(),
            report.warnings.len()
        );
    }

    let written = write_report(path, &report, report_dir)?;
    info!("report saved to {}", written.display());

    Ok(report)
}

/// Persist a report next to its script (or under an override directory).
///
/// The filename marks the outcome: `result_<stem>_e.txt` when errors are
/// present, `result_<stem>_w.txt` for warnings only, `result_<stem>.txt`
/// for a clean file.
pub fn write_report(
    source_path: &Path,
    report: &Report,
    override_dir: Option<&Path>,
) -> Result<PathBuf> {
    let dir = match override_dir {
        Some(dir) => dir.to_path_buf(),
        None => source_path
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join("result"),
    };
    fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create report directory {}", dir.display()))?;

    let stem = source_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("report");
    let suffix = if !report.errors.is_empty() {
        "_e"
    } else if !report.warnings.is_empty() {
        "_w"
    } else {
        ""
    };
    let path = dir.join(format!("result_{stem}{suffix}.txt"));

    fs::write(&path, render_report(report))
        .with_context(|| format!("failed to write report {}", path.display()))?;
    Ok(path)
}

/// Human-readable report text. A clean file gets an explicit line, never
/// an empty file.
pub fn render_report(report: &Report) -> String {
    if report.is_clean() {
        return "no errors or warnings\n".to_string();
    }

    let mut text = String::new();
    if !report.errors.is_empty() {
        text.push_str("[Errors]\n");
        text.push_str("------------------------\n");
        for diagnostic in &report.errors {
            text.push_str(&diagnostic.render());
            text.push('\n');
        }
        text.push('\n');
    }
    if !report.warnings.is_empty() {
        text.push_str("[Warnings]\n");
        text.push_str("------------------------\n");
        for diagnostic in &report.warnings {
            text.push_str(&diagnostic.render());
            text.push('\n');
        }
    }
    text
}
