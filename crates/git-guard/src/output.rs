use colored::*;
use git_guard_core::{GuardReport, Severity};
use serde::Serialize;

/// Prefix on every human-readable line.
const TAG: &str = "[git-guard]";

/// Output mode for the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
    Quiet,
}

/// Accumulated JSON result entry.
#[derive(Debug, Serialize, Clone)]
pub struct JsonResultEntry {
    #[serde(rename = "type")]
    pub result_type: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// Accumulated JSON output.
#[derive(Debug, Serialize)]
pub struct JsonOutput {
    pub results: Vec<JsonResultEntry>,
}

/// Reporter handles all output formatting.
///
/// Git shows hook output from stderr, so human-readable lines go there; JSON
/// is collected and written to stdout by [`Reporter::finish`].
pub struct Reporter {
    mode: OutputMode,
    json_results: Vec<JsonResultEntry>,
}

impl Reporter {
    pub fn new(mode: OutputMode) -> Self {
        Self {
            mode,
            json_results: Vec::new(),
        }
    }

    fn push_json(&mut self, result_type: &str, message: &str, check: Option<&str>, path: Option<String>) {
        self.json_results.push(JsonResultEntry {
            result_type: result_type.to_string(),
            message: message.to_string(),
            check: check.map(str::to_string),
            path,
        });
    }

    fn line(&self, text: &str) {
        eprintln!("{} {}", TAG.cyan(), text);
    }

    pub fn error(&mut self, message: &str) {
        match self.mode {
            OutputMode::Human | OutputMode::Quiet => {
                self.line(&format!("{} {}", "ERROR:".red(), message));
            }
            OutputMode::Json => self.push_json("error", message, None, None),
        }
    }

    pub fn warning(&mut self, message: &str) {
        match self.mode {
            OutputMode::Human => self.line(&format!("{} {}", "WARNING:".yellow(), message)),
            OutputMode::Json => self.push_json("warning", message, None, None),
            OutputMode::Quiet => {}
        }
    }

    pub fn success(&mut self, message: &str) {
        match self.mode {
            OutputMode::Human => self.line(&format!("{} {}", "✓".green(), message)),
            OutputMode::Json => self.push_json("success", message, None, None),
            OutputMode::Quiet => {}
        }
    }

    pub fn info(&mut self, message: &str) {
        match self.mode {
            OutputMode::Human => self.line(message),
            OutputMode::Json => self.push_json("info", message, None, None),
            OutputMode::Quiet => {}
        }
    }

    /// Prints the outcome of a hook run.
    ///
    /// Warnings are listed first. Failures are grouped under a banner
    /// followed by the re-stage reminder and the bypass hint.
    pub fn report_guard(&mut self, hook: &str, report: &GuardReport, bypass_hint: &str) {
        for failure in report.failures.iter().filter(|f| f.severity == Severity::Warning) {
            let path = failure.path.as_ref().map(|p| p.display().to_string());
            match self.mode {
                OutputMode::Json => {
                    self.push_json("warning", &failure.message, Some(failure.check.name()), path)
                }
                _ => self.warning(&failure.message),
            }
        }

        if report.passed() {
            self.success(&format!("{hook} checks passed"));
            return;
        }

        match self.mode {
            OutputMode::Json => {
                for failure in report.errors() {
                    let path = failure.path.as_ref().map(|p| p.display().to_string());
                    self.push_json("error", &failure.message, Some(failure.check.name()), path);
                }
            }
            OutputMode::Human | OutputMode::Quiet => {
                self.line(&format!(
                    "{}",
                    format!("{hook} checks failed ({} problem(s)):", report.error_count())
                        .red()
                        .bold()
                ));
                for failure in report.errors() {
                    self.line(&format!("{} {}", "!".red().bold(), failure.message));
                }
                self.line(bypass_hint);
            }
        }
    }

    pub fn finish(&self) {
        if self.mode == OutputMode::Json {
            let output = JsonOutput {
                results: self.json_results.clone(),
            };
            if let Ok(json) = serde_json::to_string_pretty(&output) {
                println!("{json}");
            }
        }
    }
}
