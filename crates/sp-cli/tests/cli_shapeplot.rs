use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use sp_root::testing::RootFileBuilder;
use sp_root::{GraphData, TH1Data};

fn bin_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_shapeplot"))
}

fn run(args: &[&str]) -> Output {
    Command::new(bin_path())
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("failed to run {:?} {:?}: {}", bin_path(), args, e))
}

fn th1(name: &str, contents: &[f64]) -> TH1Data {
    let n = contents.len();
    let mut cells = vec![0.0];
    cells.extend_from_slice(contents);
    cells.push(0.0);
    TH1Data {
        name: name.into(),
        title: name.into(),
        edges: (0..=n).map(|i| i as f64).collect(),
        sumw2: Some(cells.iter().map(|c| 0.04 * c * c).collect()),
        entries: contents.iter().sum(),
        cells,
    }
}

fn graph(name: &str, y: &[f64]) -> GraphData {
    let n = y.len();
    GraphData {
        name: name.into(),
        title: String::new(),
        x: (0..n).map(|i| i as f64 + 0.5).collect(),
        y: y.to_vec(),
        ex_low: vec![0.5; n],
        ex_high: vec![0.5; n],
        ey_low: vec![0.0; n],
        ey_high: vec![0.0; n],
    }
}

fn write(dir: &Path, rel: &str, body: &str) {
    let p = dir.join(rel);
    std::fs::create_dir_all(p.parent().unwrap()).unwrap();
    std::fs::write(p, body).unwrap();
}

fn dataset_manager(dir: &Path) -> PathBuf {
    let adm = dir.join("AnalysisDatasetManager");
    write(
        &adm,
        "PlotGroups/WZxsec2016.json",
        r#"{"wz": {"Name": "WZ", "Style": "wz"}, "nonprompt": {"Name": "Nonprompt", "Style": "np"},
            "data": {"Name": "Data", "Style": "data"}}"#,
    );
    write(
        &adm,
        "Styles/styles.json",
        r##"{"wz": {"FillColor": "#fcdd5d", "LineColor": 1}, "np": {"FillColor": "kGray+1"},
             "data": {"MarkerStyle": 20, "MarkerColor": 1}}"##,
    );
    write(&adm, "PlotObjects/WZxsec2016.json", r#"{"mjj": {"XTitle": "m_{jj} [GeV]"}}"#);
    adm
}

struct Run {
    _dir: tempfile::TempDir,
    root: PathBuf,
    out: PathBuf,
    log: PathBuf,
    adm: PathBuf,
}

impl Run {
    fn new(builder: RootFileBuilder) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("shapes.root");
        builder.write_to(&root).unwrap();
        Self {
            root,
            out: dir.path().join("out"),
            log: dir.path().join("temp.txt"),
            adm: dataset_manager(dir.path()),
            _dir: dir,
        }
    }

    fn exec(&self, command: &str, extra: &[&str]) -> Output {
        let mut args = vec![
            command.to_string(),
            "-f".into(),
            self.root.display().to_string(),
            "-s".into(),
            "WZxsec2016_full".into(),
            "--output_dir".into(),
            self.out.display().to_string(),
            "--log_file".into(),
            self.log.display().to_string(),
            "--dataset_manager".into(),
            self.adm.display().to_string(),
            "-c".into(),
            "eee,mmm".into(),
        ];
        args.extend(extra.iter().map(|s| s.to_string()));
        let refs: Vec<&str> = args.iter().map(String::as_str).collect();
        run(&refs)
    }

    fn plots(&self, folder: &str) -> PathBuf {
        self.out.join("WZxsec2016_full").join(folder).join("plots")
    }
}

fn systematics_file() -> RootFileBuilder {
    let mut b = RootFileBuilder::new();
    for sample in ["wz", "nonprompt"] {
        for chan in ["eee", "mmm"] {
            b = b
                .histogram(&format!("{sample}/mjj_{chan}"), th1("mjj", &[10.0, 6.0, 2.0]))
                .histogram(&format!("{sample}/mjj_CMS_scale_jUp_{chan}"), th1("up", &[11.0, 6.5, 2.5]))
                .histogram(&format!("{sample}/mjj_CMS_scale_jDown_{chan}"), th1("down", &[9.0, 5.5, 1.5]));
        }
    }
    b
}

/// Nine bins: the given contents followed by empty bins, enough for the
/// unrolled region markers.
fn padded(contents: &[f64]) -> Vec<f64> {
    let mut v = contents.to_vec();
    v.resize(9, 0.0);
    v
}

/// `th1` with `underflow` in cell 0.
fn th1_with_underflow(name: &str, underflow: f64, contents: &[f64]) -> TH1Data {
    let mut h = th1(name, contents);
    h.cells[0] = underflow;
    if let Some(sumw2) = h.sumw2.as_mut() {
        sumw2[0] = 0.04 * underflow * underflow;
    }
    h
}

/// Fit shapes under `fit_folder` (`shapes_fit_s` or `shapes_fit_b`). The
/// fitted totals carry underflow: 2 in `total`, 3 in `total_background`.
fn postfit_file_in(fit_folder: &str) -> RootFileBuilder {
    let mut b = RootFileBuilder::new();
    for chan in ["eee", "mmm"] {
        let totals = padded(&[25.0, 10.0, 4.0, 1.5]);
        b = b
            .histogram(&format!("{fit_folder}/{chan}/wz"), th1("wz", &padded(&[20.0, 8.0, 3.0, 1.0])))
            .histogram(&format!("{fit_folder}/{chan}/nonprompt"), th1("nonprompt", &padded(&[5.0, 2.0, 1.0, 0.5])))
            .histogram(&format!("{fit_folder}/{chan}/total"), th1_with_underflow("total", 2.0, &totals))
            .histogram(
                &format!("{fit_folder}/{chan}/total_background"),
                th1_with_underflow("total_background", 3.0, &totals),
            )
            .histogram(&format!("shapes_prefit/{chan}/aqgc-fs0"), th1("aqgc-fs0", &padded(&[0.1, 0.5, 1.0, 2.0])))
            .graph(&format!("{fit_folder}/{chan}/data"), graph("data", &padded(&[24.0, 11.0, 3.0, 2.0])));
    }
    b
}

fn postfit_file() -> RootFileBuilder {
    postfit_file_in("shapes_fit_s")
}

/// Table rows of a run log, header excluded.
fn table_rows(log: &str) -> Vec<&str> {
    log.lines().filter(|l| l.ends_with("\\\\") && !l.starts_with("Process")).collect()
}

#[test]
fn systematics_writes_plot_log_and_gallery() {
    let r = Run::new(systematics_file());
    let out = r.exec("systematics", &["-b", "mjj", "-p", "wz,nonprompt", "--systematics", "CMS_scale_j,CMS_scale_j"]);
    assert!(out.status.success(), "stderr={}", String::from_utf8_lossy(&out.stderr));

    let plots = r.plots("plots");
    let svg = std::fs::read_to_string(plots.join("mjj_CMS_scale_j_CMS_scale_j.svg")).unwrap();
    assert!(svg.contains(">Systematic variation</text>"));
    assert!(svg.contains(">syst./cent.</text>"));

    let log = std::fs::read_to_string(plots.join("logs/mjj_CMS_scale_j_CMS_scale_j_event_info.log")).unwrap();
    assert!(log.contains("Selection: WZxsec2016_full\nPlotting branch: mjj\n"));
    assert!(log.contains("Yield for wz is 36.00"));
    assert!(log.contains("Yield for nonprompt is 36.00"));

    let index = std::fs::read_to_string(r.out.join("WZxsec2016_full/plots/index.html")).unwrap();
    assert!(index.contains("plots/mjj_CMS_scale_j_CMS_scale_j.svg"));
}

#[test]
fn systematics_scale_to_control_region() {
    let r = Run::new(systematics_file());
    let out = r.exec(
        "systematics",
        &["-b", "mjj", "-p", "wz", "--systematics", "CMS_scale_j", "--normalize_to_cr", "--no_ratio"],
    );
    assert!(out.status.success(), "stderr={}", String::from_utf8_lossy(&out.stderr));
    let log = std::fs::read_to_string(&r.log).unwrap();
    let expected = 36.0 * (191.0 - 73.24) / 183.25;
    assert!(log.contains(&format!("Yield for wz is {expected:.2}")), "log={log}");
    let svg = std::fs::read_to_string(r.plots("plots").join("mjj_CMS_scale_j.svg")).unwrap();
    assert!(!svg.contains("syst./cent."));
}

#[test]
fn systematics_list_mismatch_fails_early() {
    let r = Run::new(systematics_file());
    let out = r.exec("systematics", &["-b", "mjj", "-p", "wz,nonprompt", "--systematics", "CMS_scale_j"]);
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("--files_to_plot has 2 entries but --systematics has 1"), "stderr={stderr}");
    assert!(!r.out.exists());
}

#[test]
fn missing_histogram_is_reported() {
    let r = Run::new(systematics_file());
    let out = r.exec("systematics", &["-b", "etajj", "-p", "wz", "--systematics", "CMS_scale_j"]);
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("wz/etajj_eee"), "stderr={stderr}");
    assert!(stderr.contains("mjj_eee"), "stderr={stderr}");
}

#[test]
fn postfit_writes_stack_and_yield_table() {
    let r = Run::new(postfit_file());
    let out = r.exec(
        "postfit",
        &["-b", "mjj_etajj_unrolled", "-p", "nonprompt,wz,aqgc-fs0", "--folder_name", "postfit"],
    );
    assert!(out.status.success(), "stderr={}", String::from_utf8_lossy(&out.stderr));

    let plots = r.plots("postfit");
    let svg = std::fs::read_to_string(plots.join("mjj_etajj_unrolled.svg")).unwrap();
    assert!(svg.contains(">Data/Pred.</text>"));
    assert!(svg.contains(">Nonprompt</text>"));
    assert!(svg.contains("[4, 5]</text>"));

    let log = std::fs::read_to_string(plots.join("logs/mjj_etajj_unrolled_event_info.log")).unwrap();
    assert!(log.contains("Luminosity: 35.90 fb^{-1}"));
    assert!(log.contains("Process & \\eee & \\mmm & Total Yield \\\\"));
    assert!(!log.lines().any(|l| l.starts_with("aqgc")));
    let rows = table_rows(&log);
    let labels: Vec<&str> = rows.iter().map(|l| l.split(" & ").next().unwrap()).collect();
    assert_eq!(labels, vec!["Nonprompt", "WZ (MG5\\_aMC)", "Pred. Background", "Data"]);
    // wz: 32 per channel, 64 in total; data are printed as integers
    assert!(rows[1].contains("32.0 $\\pm$"));
    assert!(rows[1].contains("64.0 $\\pm$"));
    assert_eq!(rows[3], "Data & 40 & 40 & 80 \\\\");
    // per channel: `total` with its underflow, 2 + 40.5; total: the regular
    // bins of `total_background` only, 2 x 40.5
    assert_eq!(rows[2], "Pred. Background & 42.5 $\\pm$ 5.5 & 42.5 $\\pm$ 5.5 & 81.0 $\\pm$ 7.7 \\\\");
}

#[test]
fn postfit_background_only_reads_background_fit() {
    let r = Run::new(postfit_file_in("shapes_fit_b"));
    let out = r.exec("postfit", &["-b", "mjj", "-p", "nonprompt,wz", "--backgroundOnly"]);
    assert!(out.status.success(), "stderr={}", String::from_utf8_lossy(&out.stderr));
    let log = std::fs::read_to_string(r.plots("plots").join("logs/mjj_event_info.log")).unwrap();
    let rows = table_rows(&log);
    assert_eq!(rows[1], "WZ (MG5\\_aMC) & 32.0 $\\pm$ 4.4 & 32.0 $\\pm$ 4.4 & 64.0 $\\pm$ 6.2 \\\\");

    // the signal+background fit is absent from this file
    let out = r.exec("postfit", &["-b", "mjj", "-p", "nonprompt,wz"]);
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("shapes_fit_s/eee/nonprompt"), "stderr={stderr}");
}

#[test]
fn postfit_mtwz_uses_variable_binning() {
    let r = Run::new(postfit_file());
    let out = r.exec("postfit", &["-b", "MTWZ", "-p", "nonprompt,wz"]);
    assert!(out.status.success(), "stderr={}", String::from_utf8_lossy(&out.stderr));
    let svg = std::fs::read_to_string(r.plots("plots").join("MTWZ.svg")).unwrap();
    // the x axis now ends at the last MTWZ edge
    assert!(svg.contains(">2000</text>"), "no 2000 GeV tick");
    let log = std::fs::read_to_string(r.plots("plots").join("logs/MTWZ_event_info.log")).unwrap();
    assert!(table_rows(&log)[1].starts_with("WZ (MG5\\_aMC) & 32.0 $\\pm$"));
}

#[test]
fn postfit_without_data_or_control_region() {
    let r = Run::new(postfit_file());
    let out = r.exec("postfit", &["-b", "mjj", "-p", "wz", "--no_data", "--noCR", "--append_to_name", "noCR"]);
    assert!(out.status.success(), "stderr={}", String::from_utf8_lossy(&out.stderr));
    let plots = r.plots("plots");
    let svg = std::fs::read_to_string(plots.join("mjj_noCR.svg")).unwrap();
    assert!(!svg.contains("Data/Pred."));
    let log = std::fs::read_to_string(plots.join("logs/mjj_noCR_event_info.log")).unwrap();
    // the control-region bin (20) is gone: 8 + 3 + 1 per channel
    assert!(log.contains("WZ (MG5\\_aMC) & 12.0 $\\pm$"));
    assert!(!log.contains("Data &"));
}
