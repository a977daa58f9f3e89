//! Text and JSON rendering of a check report

use console::Style;
use eolchecklib::{CheckReport, FileOutcome};

/// Output format selected on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Text,
    Json,
}

impl OutputMode {
    pub fn from_arg(value: &str) -> Self {
        match value {
            "json" => OutputMode::Json,
            _ => OutputMode::Text,
        }
    }
}

/// Style used for rejected files on stderr
pub fn bad_style() -> Style {
    Style::new().red().for_stderr()
}

/// One line per rejected or unreadable file (every file when `verbose`),
/// followed by the error count if there were errors.
pub fn render_text(report: &CheckReport, verbose: bool, bad: &Style) -> String {
    let mut out = String::new();

    for file in &report.files {
        let line = match &file.outcome {
            FileOutcome::Error { message } => message.clone(),
            FileOutcome::Classified { stats, .. } => {
                if !file.is_error() && !verbose {
                    continue;
                }
                format!("{}: {}", file.name, stats)
            }
        };

        if file.is_error() {
            out.push_str(&bad.apply_to(line).to_string());
        } else {
            out.push_str(&line);
        }
        out.push('\n');
    }

    if !report.is_clean() {
        out.push_str(&format!("{} error(s)\n", report.error_count));
    }

    out
}

/// Pretty-printed JSON of the whole report
pub fn render_json(report: &CheckReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}
