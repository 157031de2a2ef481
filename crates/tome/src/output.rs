//! Colored terminal output on stderr.
//!
//! Write failures are ignored: progress output is best-effort.

use std::fmt::Display;

use console::{Style, Term};

/// Terminal output formatter.
pub(crate) struct Output {
    term: Term,
    plain: Style,
    dim: Style,
    green: Style,
    yellow: Style,
    red: Style,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            plain: Style::new(),
            dim: Style::new().dim(),
            green: Style::new().green(),
            yellow: Style::new().yellow(),
            red: Style::new().red(),
        }
    }

    fn line(&self, style: &Style, msg: impl Display) {
        let _ = self.term.write_line(&style.apply_to(msg).to_string());
    }

    pub(crate) fn info(&self, msg: &str) {
        self.line(&self.plain, msg);
    }

    /// `label: value`, with the label dimmed.
    pub(crate) fn detail(&self, label: &str, value: impl Display) {
        let _ = self
            .term
            .write_line(&format!("{} {value}", self.dim.apply_to(format!("{label}:"))));
    }

    pub(crate) fn success(&self, msg: &str) {
        self.line(&self.green, msg);
    }

    pub(crate) fn warning(&self, msg: &str) {
        self.line(&self.yellow, msg);
    }

    pub(crate) fn error(&self, msg: &str) {
        self.line(&self.red, msg);
    }
}
