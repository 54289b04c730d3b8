//! Participant rosters: identifiers read from a file or generated for demos.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use brawl_core::AgentId;

/// Prefix of generated demo identifiers.
const DEMO_PREFIX: &str = "follower_";

/// Ordered participant identifiers; an identifier's position is its agent index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Roster {
    names: Vec<String>,
}

impl Roster {
    /// Generates `count` demo identifiers `follower_0000`, `follower_0001`, ...
    #[must_use]
    pub(crate) fn demo(count: usize) -> Self {
        Self {
            names: (0..count)
                .map(|index| format!("{DEMO_PREFIX}{index:04}"))
                .collect(),
        }
    }

    /// Reads one identifier per line from `path`, keeping at most `cap`.
    pub(crate) fn load(path: &Path, cap: usize) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read roster {}", path.display()))?;
        let roster = Self::parse(&text, cap);
        if roster.len() < cap {
            tracing::warn!(
                requested = cap,
                available = roster.len(),
                "roster is smaller than requested, using every entry"
            );
        }
        Ok(roster)
    }

    /// Parses identifiers from `text`, skipping blank lines and keeping at
    /// most `cap` entries.
    #[must_use]
    pub(crate) fn parse(text: &str, cap: usize) -> Self {
        Self {
            names: text
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .take(cap)
                .map(str::to_owned)
                .collect(),
        }
    }

    /// Number of participants.
    #[must_use]
    pub(crate) fn len(&self) -> usize {
        self.names.len()
    }

    /// Identifier of `agent`, if it is on the roster.
    #[must_use]
    pub(crate) fn name(&self, agent: AgentId) -> Option<&str> {
        self.names.get(agent.index()).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn demo_names_are_zero_padded() {
        let roster = Roster::demo(3);
        assert_eq!(roster.len(), 3);
        assert_eq!(roster.name(AgentId::new(0)), Some("follower_0000"));
        assert_eq!(roster.name(AgentId::new(2)), Some("follower_0002"));
        assert_eq!(roster.name(AgentId::new(3)), None);
    }

    #[test]
    fn parse_skips_blank_lines_and_respects_cap() {
        let roster = Roster::parse("alice\n\n  bob  \r\n\ncarol\ndave\n", 3);
        assert_eq!(roster.len(), 3);
        assert_eq!(roster.name(AgentId::new(1)), Some("bob"));
        assert_eq!(roster.name(AgentId::new(2)), Some("carol"));
    }

    #[test]
    fn load_reads_roster_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "first\nsecond\n\nthird").expect("write roster");

        let roster = Roster::load(file.path(), 10).expect("roster loads");

        assert_eq!(roster.len(), 3);
        assert_eq!(roster.name(AgentId::new(2)), Some("third"));
    }

    #[test]
    fn missing_roster_reports_path() {
        let error = Roster::load(Path::new("/definitely/not/here.txt"), 5)
            .expect_err("missing file fails");
        assert!(format!("{error:#}").contains("/definitely/not/here.txt"));
    }
}
