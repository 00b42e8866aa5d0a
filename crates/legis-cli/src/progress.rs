//! `legis progress`

use crate::render::render_progress;
use anyhow::{Context, Result};
use legis_milestones::{BillProgress, Chamber, MilestoneConfig, MilestoneEvent, VetoHandling};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Arguments of the progress command
#[derive(Debug, Clone, Default)]
pub struct ProgressArgs {
    /// Originating bill history
    pub history: PathBuf,
    /// Companion bill history
    pub companion: Option<PathBuf>,
    /// Chamber override
    pub chamber: Option<Chamber>,
    /// Track vetoes separately from delivery
    pub distinct_veto: bool,
    /// Emit JSON instead of text
    pub json: bool,
}

/// A history file: either a bare event list or a bill with its chamber
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum HistoryFile {
    Events(Vec<MilestoneEvent>),
    Bill {
        #[serde(default)]
        chamber: Chamber,
        #[serde(alias = "milestones", alias = "actions")]
        history: Vec<MilestoneEvent>,
    },
}

impl HistoryFile {
    fn into_parts(self) -> (Chamber, Vec<MilestoneEvent>) {
        match self {
            Self::Events(events) => (Chamber::Unknown, events),
            Self::Bill { chamber, history } => (chamber, history),
        }
    }
}

fn read_history(path: &Path) -> Result<HistoryFile> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading history {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("parsing history {}", path.display()))
}

/// Derive progress from the files named in `args`
///
/// # Errors
/// If a history file can't be read or parsed
pub fn derive(args: &ProgressArgs) -> Result<BillProgress> {
    let (file_chamber, originating) = read_history(&args.history)?.into_parts();
    let companion = match &args.companion {
        Some(path) => read_history(path)?.into_parts().1,
        None => Vec::new(),
    };
    let chamber = args.chamber.unwrap_or(file_chamber);

    let config = if args.distinct_veto {
        MilestoneConfig::new().with_veto_handling(VetoHandling::Distinct)
    } else {
        MilestoneConfig::default()
    };

    tracing::debug!(
        %chamber,
        originating = originating.len(),
        companion = companion.len(),
        "deriving bill progress"
    );
    Ok(BillProgress::derive(&originating, &companion, chamber, &config))
}

/// Run the command, returning its output
///
/// # Errors
/// As [`derive`]
pub fn run(args: &ProgressArgs) -> Result<String> {
    let progress = derive(args)?;
    if args.json {
        Ok(serde_json::to_string_pretty(&progress)?)
    } else {
        Ok(render_progress(&progress))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn history_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_bill_file_carries_chamber() {
        let file = history_file(
            r#"{ "chamber": "SENATE", "history": [{ "statusType": "SENATE_FLOOR", "actionDate": "2024-04-01" }] }"#,
        );
        let progress = derive(&ProgressArgs {
            history: file.path().to_path_buf(),
            ..ProgressArgs::default()
        })
        .unwrap();
        assert_eq!(progress.current().id, "floor");
    }

    #[test]
    fn test_bare_event_list_needs_chamber() {
        let file = history_file(r#"[{ "statusType": "PASSED_ASSEMBLY" }]"#);
        let mut args = ProgressArgs {
            history: file.path().to_path_buf(),
            ..ProgressArgs::default()
        };
        assert_eq!(derive(&args).unwrap().furthest, 0);

        args.chamber = Some(Chamber::Assembly);
        assert_eq!(derive(&args).unwrap().current().id, "passed");
    }

    #[test]
    fn test_missing_file_is_reported() {
        let err = derive(&ProgressArgs {
            history: PathBuf::from("/nonexistent/history.json"),
            ..ProgressArgs::default()
        })
        .unwrap_err();
        assert!(err.to_string().contains("reading history"));
    }
}
