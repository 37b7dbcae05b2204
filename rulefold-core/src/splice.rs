use anyhow::Result;

use crate::emit::{render, RenderMode};
use crate::merge::Rules;
use crate::tables::Tables;
use crate::tokenizer::{scan, Scan};

pub const WINDOW_MARKER: &str = "# --- Auto-generated window rules ---";
pub const LAYER_MARKER: &str = "# --- Auto-generated layer rules ---";

// Written by earlier versions that only handled window rules.
const LEGACY_MARKER: &str = "# --- Auto-generated rules ---";

fn is_marker(line: &str) -> bool {
    matches!(line.trim(), WINDOW_MARKER | LAYER_MARKER | LEGACY_MARKER)
}

/// A converted document and the rules it was built from.
#[derive(Debug, Clone)]
pub struct Conversion {
    pub rules: Rules,
    pub output: String,
}

/// Drop every scanned rule line and marker, then append freshly rendered
/// sections. Untouched lines keep their relative order. Output always uses
/// `\n` line endings, so a CRLF file comes back as LF.
pub fn splice(content: &str, scan: &Scan, window: &str, layer: &str) -> String {
    let mut lines: Vec<&str> = content
        .lines()
        .enumerate()
        .filter(|(i, line)| !scan.is_consumed(*i) && !is_marker(line))
        .map(|(_, line)| line)
        .collect();
    while lines.last().is_some_and(|l| l.trim().is_empty()) {
        lines.pop();
    }

    let mut out: Vec<&str> = lines;
    if !out.is_empty() {
        out.push("");
    }
    out.push(WINDOW_MARKER);
    if !window.is_empty() {
        out.push(window);
    }
    out.push("");
    out.push(LAYER_MARKER);
    if !layer.is_empty() {
        out.push(layer);
    }

    let mut text = out.join("\n");
    text.push('\n');
    text
}

/// Full pipeline over file content: scan, merge, render, splice.
pub fn convert(content: &str, tables: &Tables, mode: RenderMode) -> Result<Conversion> {
    let scan = scan(content)?;
    let rules = Rules::from_scan(&scan, tables)?;
    let window = render(&rules.window, mode);
    let layer = render(&rules.layer, mode);
    let output = splice(content, &scan, &window, &layer);
    Ok(Conversion { rules, output })
}
