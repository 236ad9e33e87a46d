use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use sp_render::OutputFormat;
use sp_render::html::write_gallery;
use sp_render::output::save;
use tracing::info;

/// Output tree of one run: `<output_dir>/<selection>/<folder>/plots`, with the
/// gallery one level up and copied run logs in `plots/logs`.
#[derive(Debug, Clone)]
pub struct OutputPaths {
    pub html_dir: PathBuf,
    pub plot_dir: PathBuf,
    pub format: OutputFormat,
}

impl OutputPaths {
    pub fn new(output_dir: &Path, selection: &str, folder_name: &str, format: OutputFormat) -> Self {
        let html_dir = output_dir.join(selection).join(folder_name);
        let plot_dir = html_dir.join("plots");
        Self { html_dir, plot_dir, format }
    }

    pub fn plot_file(&self, plot_name: &str) -> PathBuf {
        self.plot_dir.join(format!("{plot_name}.{}", self.format.extension()))
    }

    pub fn log_copy(&self, plot_name: &str) -> PathBuf {
        self.plot_dir.join("logs").join(format!("{plot_name}_event_info.log"))
    }

    /// Save the plot, copy the run log next to it and regenerate the gallery.
    pub fn publish(&self, plot_name: &str, svg: &str, run_log: &Path, title: &str) -> Result<PathBuf> {
        let plot = self.plot_file(plot_name);
        std::fs::create_dir_all(&self.plot_dir)
            .with_context(|| format!("failed to create {}", self.plot_dir.display()))?;
        save(svg, &plot, self.format).with_context(|| format!("failed to save {}", plot.display()))?;

        let log = self.log_copy(plot_name);
        std::fs::create_dir_all(self.plot_dir.join("logs"))?;
        std::fs::copy(run_log, &log)
            .with_context(|| format!("failed to copy {} to {}", run_log.display(), log.display()))?;

        write_gallery(&self.html_dir, title)?;
        info!(path = %plot.display(), "saved plot");
        Ok(plot)
    }
}
