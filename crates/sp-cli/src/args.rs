use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Args;
use sp_core::style::{ConfigHistFactory, dataset_manager_path};
use sp_render::{OutputFormat, PlotConfig};

/// Options shared by every plotting command.
#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// ROOT file with the input histograms
    #[arg(short = 'f', long = "hist_file")]
    pub hist_file: PathBuf,

    /// Selection level; the analysis name is the part before the first `_`
    #[arg(short, long)]
    pub selection: String,

    /// Comma-separated branches to plot (`all` plots every configured branch)
    #[arg(short, long, default_value = "all")]
    pub branches: String,

    /// Comma-separated channels summed into each plot
    #[arg(short, long, default_value = "eee,eem,emm,mmm")]
    pub channels: String,

    /// Comma-separated files (systematics) or plot groups (post-fit)
    #[arg(short = 'p', long = "files_to_plot", default_value = "")]
    pub files_to_plot: String,

    /// Output folder below `<output_dir>/<selection>`
    #[arg(long = "folder_name", default_value = "plots")]
    pub folder_name: String,

    /// Integrated luminosity in fb^-1
    #[arg(short, long, default_value_t = 35.9)]
    pub luminosity: f64,

    /// Suffix appended to the plot name
    #[arg(long = "append_to_name", default_value = "")]
    pub append_to_name: String,

    /// Do not draw data
    #[arg(long = "no_data")]
    pub no_data: bool,

    /// Do not draw the ratio panel
    #[arg(long = "no_ratio")]
    pub no_ratio: bool,

    /// Ratio panel y range
    #[arg(long = "ratio_range", num_args = 2, value_names = ["LOW", "HIGH"], default_values_t = [0.5, 1.5])]
    pub ratio_range: Vec<f64>,

    /// Logarithmic y axis
    #[arg(long)]
    pub logy: bool,

    /// Factor on the y-axis minimum
    #[arg(long, default_value_t = 1.0)]
    pub scaleymin: f64,

    /// Factor on the y-axis maximum
    #[arg(long, default_value_t = 1.0)]
    pub scaleymax: f64,

    /// Root of the plot output tree
    #[arg(long = "output_dir", default_value = "plots")]
    pub output_dir: PathBuf,

    /// AnalysisDatasetManager directory (default: derived from HOSTNAME and USER)
    #[arg(long = "dataset_manager")]
    pub dataset_manager: Option<PathBuf>,

    /// Plot appearance (YAML)
    #[arg(long = "plot_config")]
    pub plot_config: Option<PathBuf>,

    /// Run log, rewritten for every branch
    #[arg(long = "log_file", default_value = "temp.txt")]
    pub log_file: PathBuf,

    /// Image format: svg or png
    #[arg(long, default_value = "svg")]
    pub format: String,
}

impl CommonArgs {
    pub fn channels(&self) -> Vec<String> {
        split_list(&self.channels)
    }

    pub fn files(&self) -> Vec<String> {
        split_list(&self.files_to_plot)
    }

    /// Ratio range, or `None` with `--no_ratio`.
    pub fn ratio(&self) -> Result<Option<(f64, f64)>> {
        if self.no_ratio {
            return Ok(None);
        }
        match self.ratio_range.as_slice() {
            [lo, hi] if lo < hi => Ok(Some((*lo, *hi))),
            other => bail!("--ratio_range needs two increasing values, got {other:?}"),
        }
    }

    pub fn output_format(&self) -> Result<OutputFormat> {
        Ok(self.format.parse()?)
    }

    pub fn plot_config(&self) -> Result<PlotConfig> {
        match &self.plot_config {
            Some(path) => PlotConfig::from_yaml_file(path)
                .with_context(|| format!("failed to load plot config {}", path.display())),
            None => Ok(PlotConfig::default()),
        }
    }

    pub fn dataset_manager(&self) -> Result<PathBuf> {
        let hostname = std::env::var("HOSTNAME").ok();
        let user = std::env::var("USER").ok();
        Ok(dataset_manager_path(self.dataset_manager.as_deref(), hostname.as_deref(), user.as_deref())?)
    }

    /// Branches to plot; `all` expands to the configured branches.
    pub fn branch_list(&self, factory: &ConfigHistFactory) -> Result<Vec<String>> {
        let branches = split_list(&self.branches);
        if branches != ["all"] {
            return Ok(branches);
        }
        let configured = factory.branches();
        if configured.is_empty() {
            bail!("--branches all, but no branches are configured for this analysis");
        }
        Ok(configured)
    }
}

/// Comma-separated list with blanks dropped.
pub fn split_list(s: &str) -> Vec<String> {
    s.split(',').map(str::trim).filter(|x| !x.is_empty()).map(String::from).collect()
}

#[derive(Args, Debug, Clone)]
pub struct SystematicsArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Comma-separated systematics, one per entry of --files_to_plot
    #[arg(long, required = true)]
    pub systematics: String,

    /// Scale WZ samples to the control-region data yield
    #[arg(long = "normalize_to_cr")]
    pub normalize_to_cr: bool,
}

#[derive(Args, Debug, Clone)]
pub struct PostfitArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Use the background-only fit instead of signal+background
    #[arg(long = "backgroundOnly")]
    pub background_only: bool,

    /// Drop the control-region bin from the fit distributions
    #[arg(long = "noCR")]
    pub no_cr: bool,
}
