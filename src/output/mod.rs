//! Persisting match records to disk.

mod report;

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::error::Result;
use crate::model::MatchRecord;

pub use report::write_report;

pub const PRE_MATCH_FILE: &str = "pre-match-data.json";
pub const PLAYER_STATS_FILE: &str = "player-stats.json";
pub const ANALYTICS_FILE: &str = "match-analytics.json";
pub const REPORT_FILE: &str = "report.txt";

/// Writes each [`MatchRecord`] into its own directory under a root.
///
/// Writing the same record twice produces identical files.
#[derive(Debug, Clone)]
pub struct OutputSink {
    root: PathBuf,
}

impl OutputSink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory a record is written to.
    pub fn match_dir(&self, record: &MatchRecord) -> PathBuf {
        self.root.join(record.output_name())
    }

    /// Write all files for one record and return its directory.
    #[instrument(skip(self, record), fields(match_id = %record.match_id))]
    pub fn write_match(&self, record: &MatchRecord) -> Result<PathBuf> {
        let dir = self.match_dir(record);
        fs::create_dir_all(&dir)?;

        write_json(&dir.join(PRE_MATCH_FILE), &record.pre_match())?;
        write_json(&dir.join(PLAYER_STATS_FILE), &record.player_stats)?;
        if let Some(analytics) = &record.analytics {
            write_json(&dir.join(ANALYTICS_FILE), analytics)?;
        }
        for team in &record.team_stats {
            write_json(&dir.join(team_file_name(&team.slug)), team)?;
        }

        let mut writer = BufWriter::new(File::create(dir.join(REPORT_FILE))?);
        write_report(&mut writer, record)?;
        writer.flush()?;

        info!(dir = %dir.display(), "wrote match");
        Ok(dir)
    }
}

/// File name of a team's statistics snapshot.
pub fn team_file_name(slug: &str) -> String {
    let slug: String = slug
        .chars()
        .map(|c| if c == '/' || c == '\\' { '-' } else { c })
        .collect();
    format!("team-{slug}.json")
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    debug!(path = %path.display(), "wrote file");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use report::tests::sample_record;

    #[test]
    fn test_write_match_files() {
        let dir = tempfile::tempdir().unwrap();
        let sink = OutputSink::new(dir.path());
        let record = sample_record(true);

        let match_dir = sink.write_match(&record).unwrap();

        assert_eq!(
            match_dir,
            dir.path().join("2370001-team-alpha-vs-bravo-some-cup")
        );
        for file in [
            PRE_MATCH_FILE,
            PLAYER_STATS_FILE,
            ANALYTICS_FILE,
            REPORT_FILE,
            "team-team-alpha.json",
            "team-bravo.json",
        ] {
            assert!(match_dir.join(file).is_file(), "missing {file}");
        }

        let players: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(match_dir.join(PLAYER_STATS_FILE)).unwrap())
                .unwrap();
        assert_eq!(players.as_array().unwrap().len(), 3);
        assert_eq!(players[0]["nickname"], "alpha1");
    }

    #[test]
    fn test_analytics_file_omitted() {
        let dir = tempfile::tempdir().unwrap();
        let sink = OutputSink::new(dir.path());
        let match_dir = sink.write_match(&sample_record(false)).unwrap();

        assert!(!match_dir.join(ANALYTICS_FILE).exists());
        let pre_match = fs::read_to_string(match_dir.join(PRE_MATCH_FILE)).unwrap();
        assert!(!pre_match.contains("analytics"));
    }

    #[test]
    fn test_write_match_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let sink = OutputSink::new(dir.path());
        let record = sample_record(true);

        let match_dir = sink.write_match(&record).unwrap();
        let first = fs::read_to_string(match_dir.join(REPORT_FILE)).unwrap();
        let first_json = fs::read_to_string(match_dir.join(PRE_MATCH_FILE)).unwrap();
        sink.write_match(&record).unwrap();

        assert_eq!(fs::read_to_string(match_dir.join(REPORT_FILE)).unwrap(), first);
        assert_eq!(
            fs::read_to_string(match_dir.join(PRE_MATCH_FILE)).unwrap(),
            first_json
        );
    }

    #[test]
    fn test_team_file_name_strips_separators() {
        assert_eq!(team_file_name("ac/dc"), "team-ac-dc.json");
        assert_eq!(team_file_name("natus-vincere"), "team-natus-vincere.json");
    }
}
