//! Post-fit shapes read from a ROOT file, transformed and summed over channels.

use approx::assert_abs_diff_eq;
use sp_core::process::{fit_folder, shapes_object_name};
use sp_core::transform::{MTWZ_BINNING, rebin_positional, remove_control_region};
use sp_core::yields::TOTAL;
use sp_core::{Hist1D, YieldTable};
use sp_root::testing::RootFileBuilder;
use sp_root::{GraphData, RootFile, TH1Data};

fn th1(name: &str, cells: &[f64]) -> TH1Data {
    let n = cells.len() - 2;
    TH1Data {
        name: name.into(),
        title: name.into(),
        edges: (0..=n).map(|i| i as f64).collect(),
        cells: cells.to_vec(),
        sumw2: Some(cells.iter().map(|c| 0.25 * c).collect()),
        entries: cells.iter().sum(),
    }
}

fn fixture() -> RootFile {
    let bytes = RootFileBuilder::new()
        .histogram("shapes_fit_s/eee/EW-WZjj", th1("EW-WZjj", &[0.0, 4.0, 1.0, 2.0, 0.0]))
        .histogram("shapes_fit_s/mmm/EW-WZjj", th1("EW-WZjj", &[0.0, 6.0, 3.0, 5.0, 0.0]))
        .graph("shapes_fit_s/eee/data", GraphData {
            name: "data".into(),
            title: String::new(),
            x: vec![0.5, 1.5, 2.5],
            y: vec![5.0, 1.0, 3.0],
            ex_low: vec![0.5; 3],
            ex_high: vec![0.5; 3],
            ey_low: vec![0.0; 3],
            ey_high: vec![0.0; 3],
        })
        .to_bytes();
    RootFile::from_bytes(bytes, "fitDiagnostics.root").unwrap()
}

#[test]
fn channel_sum_after_control_region_removal() {
    let f = fixture();
    let group = "wzjj-ewk_filled";
    let channels = ["eee".to_string(), "mmm".to_string()];
    let mut table = YieldTable::new(&channels);

    let mut sum: Option<Hist1D> = None;
    for chan in &channels {
        let path = format!("{}/{}/{}", fit_folder(false), chan, shapes_object_name(group));
        let h = Hist1D::from_object(f.get(&path).unwrap(), &format!("{group}_{chan}")).unwrap();
        let h = remove_control_region(&h).unwrap();
        let (y, e) = h.integral_and_error(0, h.n_bins());
        table.record(group, chan, y, e);
        match sum.as_mut() {
            Some(s) => s.add(&h).unwrap(),
            None => {
                let mut first = h;
                first.set_name(group);
                sum = Some(first);
            }
        }
    }
    let sum = sum.unwrap();
    assert_eq!(sum.name(), group);
    assert_eq!(sum.n_bins(), 2);
    assert_eq!(sum.content(1), 4.0);
    assert_eq!(sum.content(2), 7.0);
    // sumw2 = 0.25 * content, so the error is half the square root
    assert_abs_diff_eq!(sum.error(2), 0.5 * 7.0_f64.sqrt(), epsilon = 1e-12);

    let (y, e) = sum.integral_and_error(0, sum.n_bins());
    table.record(group, TOTAL, y, e);
    assert_eq!(table.get(group).unwrap().channel("eee").0, 3.0);
    assert_eq!(table.get(group).unwrap().total().0, 11.0);
}

#[test]
fn observed_graph_to_poisson_histogram() {
    let f = fixture();
    let mut h = Hist1D::from_object(f.get("shapes_fit_s/eee/data").unwrap(), "data_eee").unwrap();
    assert_eq!(h.name(), "data_eee");
    assert_abs_diff_eq!(h.integral(), 9.0);
    h.use_poisson_errors();
    let (lo, hi) = h.error_low_high(2);
    assert_abs_diff_eq!(lo, 1.0 - 0.1727, epsilon = 1e-3);
    assert_abs_diff_eq!(hi, 3.2995 - 1.0, epsilon = 1e-3);
}

#[test]
fn mtwz_rebin_keeps_cell_contents() {
    let f = fixture();
    let h = Hist1D::from_root(f.get_histogram("shapes_fit_s/mmm/EW-WZjj").unwrap()).unwrap();
    let r = rebin_positional(&h, "shapes_fit_s/mmm/EW-WZjj", &MTWZ_BINNING).unwrap();
    assert_eq!(r.n_bins(), 9);
    assert_eq!(r.content(3), 5.0);
    assert_eq!(r.up_edge(3), 300.0);
    assert_eq!(r.content(4), 0.0);
}
