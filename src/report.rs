use crate::types::{ScanReport, ScanResult};
use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::fs::File;
use std::path::Path;

/// Banner characters shown in the table before truncation.
pub const BANNER_PREVIEW_CHARS: usize = 30;

/// Cut `banner` to `max` characters, appending `...` when anything was dropped.
pub fn banner_preview(banner: &str, max: usize) -> String {
    match banner.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &banner[..idx]),
        None => banner.to_string(),
    }
}

/// Render results as a fixed-width table sorted by port.
pub fn render_table(results: &[ScanResult]) -> String {
    let mut rows: Vec<&ScanResult> = results.iter().collect();
    rows.sort_by_key(|r| r.port);

    let previews: Vec<String> = rows
        .iter()
        .map(|r| banner_preview(&r.banner, BANNER_PREVIEW_CHARS))
        .collect();

    let port_w = 5usize;
    let mut svc_w = "service".len();
    let mut ver_w = "version".len();
    for r in &rows {
        svc_w = svc_w.max(r.service.chars().count());
        ver_w = ver_w.max(r.version.chars().count().min(40));
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>port_w$}  {:<svc_w$}  {:<ver_w$}  banner",
        "port", "service", "version"
    );
    let _ = writeln!(
        out,
        "{:->port_w$}  {:-<svc_w$}  {:-<ver_w$}  {:-<6}",
        "", "", "", ""
    );
    for (r, preview) in rows.iter().zip(&previews) {
        let state = if r.open { "" } else { " (closed)" };
        let _ = writeln!(
            out,
            "{:>port_w$}  {:<svc_w$}  {:<ver_w$}  {}{}",
            r.port, r.service, r.version, preview, state
        );
    }
    out
}

pub fn write_report_json(path: &Path, report: &ScanReport) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create output file: {}", path.display()))?;
    serde_json::to_writer_pretty(file, report)
        .with_context(|| format!("failed to write JSON report: {}", path.display()))?;
    Ok(())
}
