use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Local};

const RULE_WIDTH: usize = 80;

/// Plain-text run log, rewritten for every branch and copied next to the plot.
#[derive(Debug, Clone)]
pub struct RunLog {
    path: PathBuf,
    header: String,
}

impl RunLog {
    pub fn new(path: &Path, command: &str, started: DateTime<Local>) -> Self {
        Self { path: path.to_path_buf(), header: header(command, started) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Truncate the log and write the header with selection and branch.
    pub fn start_branch(&self, selection: &str, branch: &str) -> Result<()> {
        self.rewrite(&format!("Selection: {selection}\nPlotting branch: {branch}\n"))
    }

    /// Truncate the log and write the header followed by `body`.
    pub fn rewrite(&self, body: &str) -> Result<()> {
        std::fs::write(&self.path, format!("{}{body}", self.header))
            .with_context(|| format!("failed to write {}", self.path.display()))
    }

    pub fn append(&self, text: &str) -> Result<()> {
        let mut f = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)
            .with_context(|| format!("failed to open {}", self.path.display()))?;
        f.write_all(text.as_bytes())?;
        Ok(())
    }

    /// Header, selection and luminosity, then the yield table.
    pub fn write_yield_summary(&self, selection: &str, luminosity: f64, table: &str) -> Result<()> {
        let rule = "-".repeat(RULE_WIDTH);
        self.rewrite(&format!(
            "Selection: {selection}\nLuminosity: {luminosity:.2} fb^{{-1}}\n{rule}\n{table}"
        ))
    }
}

fn header(command: &str, started: DateTime<Local>) -> String {
    let rule = "-".repeat(RULE_WIDTH);
    format!(
        "{rule}\nScript called at {}\nThe command was: {command}\n{rule}\n",
        started.format("%Y-%m-%d %H:%M:%S%.6f")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn log(dir: &Path) -> RunLog {
        let t = Local.with_ymd_and_hms(2017, 3, 1, 12, 30, 0).unwrap();
        RunLog::new(&dir.join("temp.txt"), "shapeplot postfit -s WZxsec2016", t)
    }

    #[test]
    fn branch_header() {
        let dir = tempfile::tempdir().unwrap();
        let l = log(dir.path());
        l.start_branch("WZxsec2016_full", "mjj").unwrap();
        l.append("\nYield for wz is 10.00").unwrap();
        let text = std::fs::read_to_string(l.path()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "-".repeat(80));
        assert_eq!(lines[1], "Script called at 2017-03-01 12:30:00.000000");
        assert_eq!(lines[2], "The command was: shapeplot postfit -s WZxsec2016");
        assert_eq!(lines[4], "Selection: WZxsec2016_full");
        assert_eq!(lines[5], "Plotting branch: mjj");
        assert_eq!(lines[7], "Yield for wz is 10.00");
    }

    #[test]
    fn summary_replaces_branch_log() {
        let dir = tempfile::tempdir().unwrap();
        let l = log(dir.path());
        l.start_branch("sel", "mjj").unwrap();
        l.write_yield_summary("sel", 35.9, "\\begin{tabular}{lc}\n").unwrap();
        let text = std::fs::read_to_string(l.path()).unwrap();
        assert!(!text.contains("Plotting branch"));
        assert!(text.contains("Luminosity: 35.90 fb^{-1}\n"));
        assert!(text.ends_with("\\begin{tabular}{lc}\n"));
    }
}
