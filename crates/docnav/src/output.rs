//! Console messages of the CLI.
//!
//! Progress and problems go to stderr; command results go to stdout so
//! `docnav redirects > table.txt` captures only the table.

use console::{Style, Term};

pub(crate) struct Output {
    status: Term,
    results: Term,
    green: Style,
    yellow: Style,
    red: Style,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            status: Term::stderr(),
            results: Term::stdout(),
            green: Style::new().green(),
            yellow: Style::new().yellow(),
            red: Style::new().red(),
        }
    }

    pub(crate) fn info(&self, msg: &str) {
        let _ = self.status.write_line(msg);
    }

    pub(crate) fn success(&self, msg: &str) {
        self.styled(&self.green, msg);
    }

    pub(crate) fn warning(&self, msg: &str) {
        self.styled(&self.yellow, msg);
    }

    pub(crate) fn error(&self, msg: &str) {
        self.styled(&self.red, msg);
    }

    /// One line of command output. Unlike status messages, a failed write
    /// (e.g. a closed pipe) is reported.
    pub(crate) fn result(&self, line: &str) -> std::io::Result<()> {
        self.results.write_line(line)
    }

    // Status lines are best effort.
    fn styled(&self, style: &Style, msg: &str) {
        let _ = self.status.write_line(&style.apply_to(msg).to_string());
    }
}
