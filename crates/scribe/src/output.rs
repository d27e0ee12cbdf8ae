//! Colored terminal output utilities.
//!
//! Command results go to stdout; progress, status and errors go to stderr so
//! `scribe reconcile --dry-run > index.ts` captures only the manifest.

use console::{Style, Term};

/// Terminal output formatter.
pub(crate) struct Output {
    term: Term,
    stdout: Term,
    green: Style,
    yellow: Style,
    red: Style,
    cyan_bold: Style,
    dim: Style,
}

/// Width labels are padded to in [`Output::field`].
const LABEL_WIDTH: usize = 10;

impl Output {
    /// Create a new output formatter.
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            stdout: Term::stdout(),
            green: Style::new().green(),
            yellow: Style::new().yellow(),
            red: Style::new().red(),
            cyan_bold: Style::new().cyan().bold(),
            dim: Style::new().dim().for_stderr(),
        }
    }

    /// Print command output to stdout, uncolored.
    pub(crate) fn print(&self, text: &str) {
        let _ = self.stdout.write_line(text);
    }

    /// Print an aligned `label  value` line.
    pub(crate) fn field(&self, label: &str, value: &str) {
        let _ = self.term.write_line(&field_line(&self.dim, label, value));
    }

    /// Print an info message.
    pub(crate) fn info(&self, msg: &str) {
        let _ = self.term.write_line(msg);
    }

    /// Print a success message (green).
    pub(crate) fn success(&self, msg: &str) {
        let _ = self.term.write_line(&self.green.apply_to(msg).to_string());
    }

    /// Print a warning message (yellow).
    pub(crate) fn warning(&self, msg: &str) {
        let _ = self.term.write_line(&self.yellow.apply_to(msg).to_string());
    }

    /// Print an error message (red).
    pub(crate) fn error(&self, msg: &str) {
        let _ = self.term.write_line(&self.red.apply_to(msg).to_string());
    }

    /// Print a highlighted message (cyan bold).
    pub(crate) fn highlight(&self, msg: &str) {
        let _ = self
            .term
            .write_line(&self.cyan_bold.apply_to(msg).to_string());
    }
}

fn field_line(label_style: &Style, label: &str, value: &str) -> String {
    let label = label_style.apply_to(format!("{label}:"));
    format!("  {label:<LABEL_WIDTH$} {value}")
}
