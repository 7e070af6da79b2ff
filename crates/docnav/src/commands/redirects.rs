//! `docnav redirects` command implementation.

use clap::Args;
use docnav_site::{RedirectEntry, RedirectRegistry};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the redirects command.
#[derive(Args)]
pub(crate) struct RedirectsArgs {
    /// Print the table as JSON instead of one `from -> to` line per entry.
    #[arg(long)]
    json: bool,
}

impl RedirectsArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let registry = RedirectRegistry::legacy();

        if self.json {
            output.result(&serde_json::to_string_pretty(registry.entries())?)?;
            return Ok(());
        }

        for entry in registry.entries() {
            output.result(&format_entry(entry))?;
        }
        output.info(&format!("{} redirects", registry.len()));
        Ok(())
    }
}

fn format_entry(entry: &RedirectEntry) -> String {
    let mut line = format!("{} -> {}", entry.from_path, entry.to_path);
    if entry.browser_redirect {
        line.push_str(" (browser)");
    }
    line
}
