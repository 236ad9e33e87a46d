//! `shapeplot postfit`: stacked post-fit backgrounds, pre-fit signals and
//! data, with the yield table written to the run log.

use anyhow::{Context, Result, anyhow, bail};
use sp_core::process::{DATA, PREDICTED_BACKGROUND, fit_folder, is_signal, shapes_folder, shapes_object_name};
use sp_core::style::{ConfigHistFactory, analysis_name};
use sp_core::yields::TOTAL;
use sp_core::{Hist1D, YieldTable};
use sp_render::PlotConfig;
use sp_render::color::Color;
use sp_render::plots::StyledHist;
use sp_render::plots::stack::{self, RegionMarkers, StackPlot};
use sp_render::text::latex_to_unicode;
use sp_root::RootFile;
use tracing::{debug, info};

use crate::args::PostfitArgs;
use crate::input::{accumulate, canvas_size, read_fit_hist, read_hist, reshape};
use crate::paths::OutputPaths;
use crate::runlog::RunLog;

/// Histograms of one plot, sorted by role.
#[derive(Default)]
struct Groups {
    stack: Vec<StyledHist>,
    signals: Vec<StyledHist>,
    data: Option<StyledHist>,
}

pub fn run(args: &PostfitArgs, log: &RunLog) -> Result<()> {
    let common = &args.common;
    let channels = common.channels();
    if channels.is_empty() {
        bail!("no channels given");
    }
    let mut plot_groups = common.files();
    if !common.no_data {
        plot_groups.push(DATA.to_string());
    }
    let ratio_range = common.ratio()?;
    let config = common.plot_config()?;
    let paths = OutputPaths::new(&common.output_dir, &common.selection, &common.folder_name, common.output_format()?);

    let file = RootFile::open(&common.hist_file)
        .with_context(|| format!("failed to open {}", common.hist_file.display()))?;
    info!(path = %common.hist_file.display(), "opened fit diagnostics file");
    let manager = common.dataset_manager()?;
    let factory = ConfigHistFactory::load(&manager, analysis_name(&common.selection))?;
    let palette = config.palette_colors();

    for branch in common.branch_list(&factory)? {
        info!(branch = %branch, "plotting post-fit distribution");
        log.start_branch(&common.selection, &branch)?;
        let plot_name =
            if common.append_to_name.is_empty() { branch.clone() } else { format!("{branch}_{}", common.append_to_name) };

        let mut table = YieldTable::new(&channels);
        let mut groups = Groups::default();
        for (i, group) in plot_groups.iter().enumerate() {
            let folder = shapes_folder(group, args.background_only);
            let mut summed = None;
            for chan in &channels {
                let path = format!("{folder}/{chan}/{}", shapes_object_name(group));
                let h = reshape(read_hist(&file, &path, &format!("{group}_{chan}"))?, &plot_name, args.no_cr)?;
                let (integral, error) = h.integral_and_error(0, h.n_bins());
                table.record(group, chan, integral, error);
                log.append(&format!("\nYield for {group} in channel {chan} is {integral:.3} $pm$ {error:.3}"))?;
                debug!(group = %group, channel = %chan, integral, error, "channel yield");
                accumulate(&mut summed, h)?;
            }
            let mut hist = summed.ok_or_else(|| anyhow!("no histograms for {group}"))?;
            hist.set_name(group.as_str());
            let (integral, error) = hist.integral_and_error(0, hist.n_bins());
            table.record(group, TOTAL, integral, error);
            log.append(&format!("\nCombined yield for {group} is {integral:.3} $pm$ {error:.3}"))?;

            let style = factory.group_style(group);
            let mut styled = StyledHist::from_group(hist, &style, fallback_color(group, i, &palette, &config));
            if is_signal(group) {
                let width = styled.line.width.max(2.0);
                groups.signals.push(styled.hollow(width, style.style.line_style));
            } else if group == DATA {
                styled.hist.use_poisson_errors();
                groups.data = Some(styled);
            } else {
                groups.stack.push(styled);
            }
        }

        let band = predicted_background(&file, args, &channels, &plot_name, &mut table)?;
        table.move_to_end(DATA);

        let object = factory.plot_object(&branch);
        let (width, height) = canvas_size(&branch);
        let plot = StackPlot {
            stack: groups.stack,
            signals: groups.signals,
            data: groups.data,
            band: Some(band),
            x_title: latex_to_unicode(&object.x_title),
            y_title: latex_to_unicode(&object.y_title),
            width,
            height,
            log_y: common.logy || object.log_y,
            scale_ymin: common.scaleymin,
            scale_ymax: common.scaleymax,
            ratio_range,
            luminosity_fb: common.luminosity,
            regions: RegionMarkers::for_plot(&plot_name),
        };
        let svg = stack::render(&plot, &config)?;

        log.write_yield_summary(&common.selection, common.luminosity, &table.to_latex())?;
        paths.publish(&plot_name, &svg, log.path(), &common.selection)?;
    }
    Ok(())
}

/// Colour for a group without a configured one: the observed colour for
/// data, otherwise the palette entry of its position.
fn fallback_color(group: &str, position: usize, palette: &[Color], config: &PlotConfig) -> Color {
    if group == DATA {
        return config.colors.observed;
    }
    palette.get(position % palette.len().max(1)).copied().unwrap_or(Color::BLACK)
}

/// Sum the fitted `total` shapes into the uncertainty band and record the
/// predicted-background row: per channel from `total`, overall from the
/// summed `total_background` over the regular bins.
fn predicted_background(
    file: &RootFile,
    args: &PostfitArgs,
    channels: &[String],
    plot_name: &str,
    table: &mut YieldTable,
) -> Result<Hist1D> {
    let folder = fit_folder(args.background_only);
    let (mut total, mut background) = (None, None);
    for chan in channels {
        let t = reshape(read_fit_hist(file, &format!("{folder}/{chan}/total"))?, plot_name, args.no_cr)?;
        let b = reshape(read_fit_hist(file, &format!("{folder}/{chan}/total_background"))?, plot_name, args.no_cr)?;
        let (integral, error) = t.integral_and_error(0, t.n_bins());
        table.record(PREDICTED_BACKGROUND, chan, integral, error);
        accumulate(&mut total, t)?;
        accumulate(&mut background, b)?;
    }
    let background = background.ok_or_else(|| anyhow!("no channels given"))?;
    let (integral, error) = background.integral_and_error(1, background.n_bins());
    table.record(PREDICTED_BACKGROUND, TOTAL, integral, error);
    let mut total = total.ok_or_else(|| anyhow!("no channels given"))?;
    total.set_name("errors");
    Ok(total)
}
