//! Terminal output — spinner and colored status lines.
//!
//! Uses `indicatif` for the fetch-phase spinner and `console` for styling.
//! [`GenerationProgress`] narrates a run: page results, retries in yellow,
//! fallback reasons, and the final written-file confirmation in green.

use std::path::Path;

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};

/// Visual progress for one sitemap generation run.
pub struct GenerationProgress {
    pb: ProgressBar,
    verbose: bool,
    green: Style,
    yellow: Style,
    red: Style,
}

impl GenerationProgress {
    /// Start the spinner and announce the output target.
    pub fn start(output: &Path, verbose: bool) -> Self {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .expect("invalid template"),
        );
        pb.set_message(format!("generating {}", output.display()));
        pb.enable_steady_tick(std::time::Duration::from_millis(100));

        Self {
            pb,
            verbose,
            green: Style::new().green().bold(),
            yellow: Style::new().yellow(),
            red: Style::new().red().bold(),
        }
    }

    /// One request attempt is starting. Only shown with `--verbose`.
    pub fn attempt(&self, page: u32, attempt: u32) {
        if self.verbose {
            self.pb
                .println(format!("  page {} (attempt {attempt})...", page + 1));
        }
        self.pb.set_message(format!("fetching page {}", page + 1));
    }

    /// A page arrived.
    pub fn page_done(&self, page: u32, count: usize) {
        self.pb.println(format!(
            "  {} page {}: {count} products",
            self.green.apply_to("✓"),
            page + 1
        ));
    }

    /// An attempt failed and another one is coming after the delay.
    pub fn retry(&self, attempt: u32, max: u32, reason: &str, delay_ms: u64) {
        self.pb.println(format!(
            "  {} retry {attempt}/{max}: {reason} (waiting {delay_ms}ms)",
            self.yellow.apply_to("↻")
        ));
    }

    /// Live data is not usable; the fallback document will be written.
    pub fn fallback(&self, reason: &str) {
        self.pb.println(format!(
            "  {} {reason} — writing fallback sitemap",
            self.yellow.apply_to("⚠")
        ));
    }

    /// Final confirmation with the written size.
    pub fn written(&self, path: &Path, bytes: usize) {
        self.pb.finish_and_clear();
        println!(
            "{} written: {} ({:.2} KB)",
            self.green.apply_to("✓"),
            path.display(),
            bytes as f64 / 1024.0
        );
    }

    /// The write itself failed — the one error this tool does not absorb.
    pub fn write_failed(&self, err: &dyn std::fmt::Display) {
        self.pb.finish_and_clear();
        eprintln!("{} write failed: {err}", self.red.apply_to("✗"));
    }
}
