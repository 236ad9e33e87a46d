use sp_core::Hist1D;
use sp_core::style::{GroupStyle, HistStyle};
use sp_render::color::Color;
use sp_render::html::write_gallery;
use sp_render::output::{OutputFormat, save};
use sp_render::plots::StyledHist;
use sp_render::plots::overlay::{self, OverlayPlot, VariationSet};
use sp_render::plots::stack::{self, RegionMarkers, StackPlot};
use sp_render::PlotConfig;

fn hist(name: &str, values: &[f64]) -> Hist1D {
    let width = 2000.0 / values.len() as f64;
    let mut h = Hist1D::uniform(name, values.len(), 0.0, 2000.0).unwrap();
    for (i, &v) in values.iter().enumerate() {
        h.fill((i as f64 + 0.5) * width, v);
    }
    h
}

#[test]
fn overlay_and_stack_land_in_gallery() {
    let config = PlotConfig::from_yaml_str("experiment:\n  status: Simulation\n").unwrap();
    let dir = tempfile::tempdir().unwrap();
    let plots = dir.path().join("plots");

    let group = GroupStyle { label: "WZ".into(), style: HistStyle::default() };
    let central = StyledHist::from_group(hist("wz", &[5.0, 3.0]), &group, Color::hex("#3f90da")).hollow(2.0, 1);
    let up = StyledHist::from_group(hist("wz_up", &[6.0, 3.5]), &group, Color::hex("#3f90da")).hollow(2.0, 5);
    let down = StyledHist::from_group(hist("wz_down", &[4.0, 2.5]), &group, Color::hex("#3f90da")).hollow(2.0, 5);
    let overlay_svg = overlay::render(
        &OverlayPlot {
            sets: vec![VariationSet { systematic: "CMS_scale_j".into(), central, up, down }],
            x_title: "m_{jj} [GeV]".into(),
            y_title: "Events".into(),
            width: 800.0,
            height: 800.0,
            y_range: (0.001, 5.0 * 1.5),
            log_y: true,
            ratio_range: Some((0.5, 1.5)),
            luminosity_fb: 35.9,
        },
        &config,
    )
    .unwrap();
    assert!(overlay_svg.contains(">Simulation</text>"));
    save(&overlay_svg, &plots.join("mjj_CMS_scale_j.svg"), OutputFormat::Svg).unwrap();

    let mut data = StyledHist::outline(hist("data", &[7.0, 2.0]), "Data", Color::BLACK);
    data.hist.use_poisson_errors();
    let stack_svg = stack::render(
        &StackPlot {
            stack: vec![StyledHist::from_group(hist("wz", &[5.0, 3.0]), &group, Color::hex("#3f90da"))],
            signals: Vec::new(),
            data: Some(data),
            band: Some(hist("total", &[5.0, 3.0])),
            x_title: "m_{jj} [GeV]".into(),
            y_title: "Events / bin".into(),
            width: 1200.0,
            height: 800.0,
            log_y: false,
            scale_ymin: 1.0,
            scale_ymax: 1.0,
            ratio_range: Some((0.0, 2.0)),
            luminosity_fb: 35.9,
            regions: RegionMarkers::for_plot("mjj"),
        },
        &config,
    )
    .unwrap();
    assert!(stack_svg.contains(">WZ</text>"));
    save(&stack_svg, &plots.join("mjj.svg"), OutputFormat::Svg).unwrap();

    let index = write_gallery(dir.path(), "WZxsec2016").unwrap();
    let html = std::fs::read_to_string(index).unwrap();
    assert!(html.contains("plots/mjj.svg"));
    assert!(html.contains("plots/mjj_CMS_scale_j.svg"));
}
