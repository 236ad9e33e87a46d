//! `shapeplot systematics`: overlay Up/Down variations on the central shape.

use anyhow::{Context, Result, bail};
use sp_core::Hist1D;
use sp_core::process::{control_region_scale, sample_directory};
use sp_core::style::{ConfigHistFactory, analysis_name};
use sp_render::color::Color;
use sp_render::plots::StyledHist;
use sp_render::plots::overlay::{self, OverlayPlot, VariationSet};
use sp_render::text::latex_to_unicode;
use sp_root::RootFile;
use tracing::info;

use crate::args::{SystematicsArgs, split_list};
use crate::input::{accumulate, canvas_size, read_hist};
use crate::paths::OutputPaths;
use crate::runlog::RunLog;

/// Lower y bound before `--scaleymin`; central shapes never drop below it.
pub const CENTRAL_MINIMUM: f64 = 0.001;

/// ROOT line style of the Up/Down outlines.
const VARIATION_LINE_STYLE: i32 = 5;

pub fn run(args: &SystematicsArgs, log: &RunLog) -> Result<()> {
    let common = &args.common;
    let files = common.files();
    let systematics = split_list(&args.systematics);
    if files.len() != systematics.len() {
        bail!(
            "--files_to_plot has {} entries but --systematics has {}; they are paired one to one",
            files.len(),
            systematics.len()
        );
    }
    if files.is_empty() {
        bail!("nothing to plot: --files_to_plot is empty");
    }
    let channels = common.channels();
    let ratio_range = common.ratio()?;
    let config = common.plot_config()?;
    let paths = OutputPaths::new(&common.output_dir, &common.selection, &common.folder_name, common.output_format()?);

    let file = RootFile::open(&common.hist_file)
        .with_context(|| format!("failed to open {}", common.hist_file.display()))?;
    info!(path = %common.hist_file.display(), "opened histogram file");
    let manager = common.dataset_manager()?;
    let factory = ConfigHistFactory::load(&manager, analysis_name(&common.selection))?;
    let palette = config.palette_colors();

    for branch in common.branch_list(&factory)? {
        info!(branch = %branch, "plotting systematics");
        log.start_branch(&common.selection, &branch)?;
        let plot_name = plot_name(&branch, &systematics, &common.append_to_name);

        let mut sets = Vec::with_capacity(files.len());
        for (i, (file_name, systematic)) in files.iter().zip(&systematics).enumerate() {
            let [mut central, mut up, mut down] = read_variations(&file, file_name, &branch, systematic, &channels)?;
            if args.normalize_to_cr {
                let factor = control_region_scale(file_name);
                central.scale(factor);
                up.scale(factor);
                down.scale(factor);
            }
            log.append(&format!("\nYield for {file_name} is {:.2}", central.integral()))?;

            let group = factory.group_style(file_name);
            let fallback = palette.get(i % palette.len().max(1)).copied().unwrap_or(Color::BLACK);
            let styled = |h: Hist1D, line_style: i32| {
                StyledHist::from_group(h, &group, fallback).hollow(2.0, line_style)
            };
            sets.push(VariationSet {
                systematic: systematic.clone(),
                central: styled(central, 1),
                up: styled(up, VARIATION_LINE_STYLE),
                down: styled(down, VARIATION_LINE_STYLE),
            });
        }

        let object = factory.plot_object(&branch);
        let (width, height) = canvas_size(&branch);
        let y_max = sets.last().map_or(1.0, |s| s.central.hist.maximum().max(CENTRAL_MINIMUM));
        let plot = OverlayPlot {
            sets,
            x_title: latex_to_unicode(&object.x_title),
            y_title: latex_to_unicode(&object.y_title),
            width,
            height,
            y_range: (CENTRAL_MINIMUM * common.scaleymin, y_max * common.scaleymax),
            log_y: common.logy || object.log_y,
            ratio_range,
            luminosity_fb: common.luminosity,
        };
        let svg = overlay::render(&plot, &config)?;
        paths.publish(&plot_name, &svg, log.path(), &common.selection)?;
    }
    Ok(())
}

/// `<branch>_<syst1_syst2..>[_<append>]`
pub fn plot_name(branch: &str, systematics: &[String], append: &str) -> String {
    let mut parts = vec![branch.to_string(), systematics.join("_")];
    if !append.is_empty() {
        parts.push(append.to_string());
    }
    parts.join("_")
}

/// Central, Up and Down shapes of one sample, summed over channels.
fn read_variations(
    file: &RootFile,
    file_name: &str,
    branch: &str,
    systematic: &str,
    channels: &[String],
) -> Result<[Hist1D; 3]> {
    let dir = sample_directory(file_name);
    let (mut central, mut up, mut down) = (None, None, None);
    for chan in channels {
        let base = format!("{dir}/{branch}");
        accumulate(&mut central, read_hist(file, &format!("{base}_{chan}"), file_name)?)?;
        accumulate(&mut up, read_hist(file, &format!("{base}_{systematic}Up_{chan}"), file_name)?)?;
        accumulate(&mut down, read_hist(file, &format!("{base}_{systematic}Down_{chan}"), file_name)?)?;
    }
    match (central, up, down) {
        (Some(mut c), Some(u), Some(d)) => {
            c.set_name(file_name);
            Ok([c, u, d])
        }
        _ => bail!("no channels given for {file_name}"),
    }
}
