//! YAML frontmatter extraction.
//!
//! A document starts with a frontmatter block when its first line is `---`;
//! the block ends at the next line consisting of `---` (or `...`).

use crate::record::{Frontmatter, Markup};

const DELIMITER: &str = "---";

impl Markup {
    /// Split a markdown document into frontmatter and body.
    ///
    /// Never fails: a document without a frontmatter block, with an
    /// unterminated block, or with malformed YAML yields `frontmatter: None`.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);

        let Some((yaml, body)) = split_frontmatter(text) else {
            return Self {
                frontmatter: None,
                body: text.to_owned(),
            };
        };

        let frontmatter = parse_frontmatter(yaml)
            .inspect_err(|e| tracing::debug!(error = %e, "Malformed frontmatter"))
            .ok();

        Self {
            frontmatter,
            body: body.to_owned(),
        }
    }
}

/// Returns `(yaml, body)` when `text` opens with a terminated frontmatter block.
fn split_frontmatter(text: &str) -> Option<(&str, &str)> {
    let mut lines = text.split_inclusive('\n');
    let first = lines.next()?;
    if first.trim_end() != DELIMITER {
        return None;
    }

    let yaml_start = first.len();
    let mut offset = yaml_start;
    for line in lines {
        let trimmed = line.trim_end();
        if trimmed == DELIMITER || trimmed == "..." {
            let yaml = &text[yaml_start..offset];
            let body = &text[offset + line.len()..];
            return Some((yaml, body));
        }
        offset += line.len();
    }

    None
}

fn parse_frontmatter(yaml: &str) -> Result<Frontmatter, serde_yaml::Error> {
    if yaml.trim().is_empty() {
        return Ok(Frontmatter::default());
    }
    serde_yaml::from_str(yaml)
}
