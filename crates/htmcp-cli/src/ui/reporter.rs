//! Console implementation of the core `Reporter` trait.

use std::sync::Mutex;

use htmcp_core::{Reporter, Stage};

use super::Output;
use super::theme::format_size;

/// Prints pipeline progress through an [`Output`] handle.
#[derive(Debug)]
pub struct ConsoleReporter {
    output: Output,
    // Last whole percent drawn, to avoid redrawing on every chunk.
    last_percent: Mutex<Option<u64>>,
}

impl ConsoleReporter {
    pub fn new(output: Output) -> Self {
        Self {
            output,
            last_percent: Mutex::new(None),
        }
    }
}

impl Reporter for ConsoleReporter {
    fn stage(&self, stage: Stage, detail: &str) {
        if stage != Stage::Fetch {
            self.output.end_progress();
        }
        let detail = self
            .output
            .paint(detail, self.output.theme().colors.secondary);
        self.output.step(&format!("{} {detail}", stage.verb()));
    }

    fn downloading(&self, current: u64, total: Option<u64>) {
        let percent = total.filter(|&t| t > 0).map(|t| current * 100 / t);
        if let Ok(mut last) = self.last_percent.lock() {
            if percent.is_some() && *last == percent {
                return;
            }
            *last = percent;
        }
        self.output.progress(&format_progress(current, total));
    }

    fn done(&self, name: &str, version: &str, detail: &str) {
        self.output.end_progress();
        let name = self
            .output
            .paint(name, self.output.theme().colors.package_name);
        self.output
            .success(&format!("Installed {name} {version} → {detail}"));
    }

    fn failed(&self, stage: Stage, reason: &str) {
        self.output.end_progress();
        tracing::debug!(%stage, reason, "install failed");
        self.output
            .error(&format!("{} stage failed", capitalize(stage.label())));
    }

    fn info(&self, msg: &str) {
        self.output.info(msg);
    }

    fn warning(&self, msg: &str) {
        self.output.warning(msg);
    }
}

/// Render download progress, e.g. `1.5 MB / 3.0 MB (50%)`.
pub fn format_progress(current: u64, total: Option<u64>) -> String {
    match total.filter(|&t| t > 0) {
        Some(t) => format!(
            "{} / {} ({}%)",
            format_size(current),
            format_size(t),
            (current * 100 / t).min(100)
        ),
        None => format_size(current),
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_progress_with_total() {
        assert_eq!(
            format_progress(512 * 1024, Some(1024 * 1024)),
            "512.0 KB / 1.0 MB (50%)"
        );
    }

    #[test]
    fn test_format_progress_unknown_total() {
        assert_eq!(format_progress(100, None), "100 B");
        assert_eq!(format_progress(100, Some(0)), "100 B");
    }

    #[test]
    fn test_capitalize_stage_label() {
        assert_eq!(capitalize(Stage::Verify.label()), "Integrity");
        assert_eq!(capitalize(""), "");
    }
}
