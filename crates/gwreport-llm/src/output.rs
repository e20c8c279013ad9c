// Writing generated reports to disk.

use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::NaiveDate;
use tracing::info;

/// File name for a gameweek report generated on `date`.
pub fn report_file_name(gameweek: u32, date: NaiveDate) -> String {
    format!("GW{gameweek}_Match_Report_{}.md", date.format("%Y-%m-%d"))
}

/// Write `text` to `{dir}/GW{gameweek}_Match_Report_{date}.md`, creating
/// `dir` if needed. An existing file for the same gameweek and date is
/// replaced.
pub fn save_report(
    text: &str,
    dir: &Path,
    gameweek: u32,
    date: NaiveDate,
) -> anyhow::Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create reports directory {}", dir.display()))?;

    let path = dir.join(report_file_name(gameweek, date));
    std::fs::write(&path, text)
        .with_context(|| format!("failed to write report {}", path.display()))?;

    info!(path = %path.display(), "report saved");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 25).unwrap()
    }

    #[test]
    fn file_name_is_dated() {
        assert_eq!(report_file_name(23, date()), "GW23_Match_Report_2025-01-25.md");
        assert_eq!(report_file_name(4, date()), "GW4_Match_Report_2025-01-25.md");
    }

    #[test]
    fn save_creates_directory_and_writes() {
        let dir = std::env::temp_dir().join("gwreport_save_report").join("nested");
        let _ = std::fs::remove_dir_all(&dir);

        let path = save_report("# GW23\n", &dir, 23, date()).unwrap();
        assert_eq!(path, dir.join("GW23_Match_Report_2025-01-25.md"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# GW23\n");

        let path = save_report("# GW23 again\n", &dir, 23, date()).unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "# GW23 again\n");
    }

    #[test]
    fn save_fails_when_dir_is_a_file() {
        let base = std::env::temp_dir().join("gwreport_save_report_blocked");
        let _ = std::fs::remove_dir_all(&base);
        std::fs::create_dir_all(&base).unwrap();
        let blocker = base.join("reports");
        std::fs::write(&blocker, "").unwrap();

        let err = save_report("x", &blocker, 1, date()).unwrap_err();
        assert!(err.to_string().contains("failed to create reports directory"));
    }
}
