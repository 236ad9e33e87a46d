use anyhow::{Context, Result};
use sp_core::Hist1D;
use sp_core::transform::{MTWZ_BINNING, needs_mtwz_binning, rebin_positional, remove_control_region};
use sp_root::RootFile;

/// Read `path` as a histogram; graphs are converted under `graph_name`.
pub fn read_hist(file: &RootFile, path: &str, graph_name: &str) -> Result<Hist1D> {
    let obj = file.get(path).with_context(|| read_failure(file, path))?;
    Hist1D::from_object(obj, graph_name).with_context(|| format!("'{path}' is not a usable histogram"))
}

/// Read a fit result stored as a histogram (`total`, `total_background`).
pub fn read_fit_hist(file: &RootFile, path: &str) -> Result<Hist1D> {
    let h = file.get_histogram(path).with_context(|| read_failure(file, path))?;
    Hist1D::from_root(h).with_context(|| format!("'{path}' is not a usable histogram"))
}

/// Error context naming what the parent directory does hold.
fn read_failure(file: &RootFile, path: &str) -> String {
    let dir = path.rsplit_once('/').map_or("", |(dir, _)| dir);
    let mut msg = format!("failed to read '{path}' from {}", file.path().display());
    match file.list_keys(dir) {
        Ok(keys) if !keys.is_empty() => {
            let names: Vec<&str> = keys.iter().map(|k| k.name.as_str()).collect();
            msg.push_str(&format!("; '{dir}' holds {}", names.join(", ")));
        }
        _ => {}
    }
    msg
}

/// Add `h` to the running channel sum.
pub fn accumulate(sum: &mut Option<Hist1D>, h: Hist1D) -> Result<()> {
    match sum {
        Some(s) => s.add(&h).with_context(|| format!("cannot add '{}' to '{}'", h.name(), s.name())),
        None => {
            *sum = Some(h);
            Ok(())
        }
    }
}

/// Optional control-region removal, then the MTWZ binning for MTWZ plots.
pub fn reshape(h: Hist1D, plot_name: &str, drop_control_region: bool) -> Result<Hist1D> {
    let h = if drop_control_region { remove_control_region(&h)? } else { h };
    if needs_mtwz_binning(plot_name) {
        return Ok(rebin_positional(&h, h.name(), &MTWZ_BINNING)?);
    }
    Ok(h)
}

/// 800×800, or 1200×800 for unrolled 2D distributions.
pub fn canvas_size(branch: &str) -> (f64, f64) {
    if branch.contains("unrolled") { (1200.0, 800.0) } else { (800.0, 800.0) }
}
