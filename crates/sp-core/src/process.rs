//! Process names, roles and normalizations.

use tracing::warn;

/// Observed-data group name.
pub const DATA: &str = "data";

/// Synthetic row holding the fitted background prediction.
pub const PREDICTED_BACKGROUND: &str = "predyield";

/// Observed CR events minus the non-WZ backgrounds (28.78 + 3.84 + 18.35 + 22.27).
const CR_WZ_YIELD: f64 = 191.0 - 73.24;

const DISPLAY_NAMES: &[(&str, &str)] = &[
    ("wz-powheg", "WZ (POWHEG)"),
    ("wz-mgmlm", "WZ (MG MLM)"),
    ("QCD-WZjj", "QCD-WZjj"),
    ("EW-WZjj", "EW-WZjj"),
    ("wzjj-ewk", "WZjj EWK"),
    ("wzjj-ewk_filled", "WZjj EWK"),
    ("wzjj-vbfnlo", "WZjj EWK (VBFNLO)"),
    ("nonprompt", "Nonprompt"),
    ("top-ewk", "t+V/VVV"),
    ("zg", r"Z$\gamma$"),
    ("vv-powheg", "VV (POWHEG)"),
    ("vv", "VV"),
    ("wz", r"WZ (MG5\_aMC)"),
    ("predyield", "Pred. Background"),
    ("data_2016", "Data"),
    ("data", "Data"),
    ("data_2016H", "Data (2016H)"),
];

/// Table label for a process. Unknown processes keep their raw name.
pub fn display_name(process: &str) -> &str {
    match DISPLAY_NAMES.iter().find(|(k, _)| *k == process) {
        Some((_, v)) => *v,
        None => {
            warn!(process, "no display name, using the raw process name");
            process
        }
    }
}

/// Factor normalizing a WZ sample to the data yield in the control region.
pub fn control_region_scale(process: &str) -> f64 {
    match process {
        "wz-mgmlm" => CR_WZ_YIELD / 144.82,
        "wz" | "wz_standalone" => CR_WZ_YIELD / 183.25,
        "wz-powheg" | "wz-powheg_standalone" => CR_WZ_YIELD / 139.43,
        _ => 1.0,
    }
}

/// Signal (aQGC) groups are drawn unstacked from the prefit shapes.
pub fn is_signal(group: &str) -> bool {
    group.contains("aqgc")
}

/// Object name under a fit-shapes channel directory.
pub fn shapes_object_name(group: &str) -> &str {
    match group {
        "wzjj-ewk_filled" => "EW-WZjj",
        other => other,
    }
}

/// Fit-shapes folder a group is read from.
pub fn shapes_folder(group: &str, background_only: bool) -> &'static str {
    if is_signal(group) {
        "shapes_prefit"
    } else {
        fit_folder(background_only)
    }
}

/// Folder of the post-fit shapes.
pub fn fit_folder(background_only: bool) -> &'static str {
    if background_only { "shapes_fit_b" } else { "shapes_fit_s" }
}

/// Directory holding a sample's histograms in a systematics file.
pub fn sample_directory(file: &str) -> String {
    file.replace("_standalone", "")
}
