//! Histogram styles from an analysis dataset-manager directory.
//!
//! Layout of the directory:
//! ```text
//! <manager>/PlotGroups/<analysis>.json   { "<group>": { "Name": .., "Style": .. } }
//! <manager>/Styles/styles.json           { "<style>": { "FillColor": .., .. } }
//! <manager>/PlotObjects/<analysis>.json  { "<branch>": { "XTitle": .., "YTitle": .., "LogY": .. } }
//! ```
//! Every file is optional; missing pieces fall back to defaults.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Colour as written in the style files: a ROOT colour index, a ROOT colour
/// name such as `kRed+1`, or `#rrggbb`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ColorSpec {
    Index(i32),
    Name(String),
}

/// Drawing attributes of one histogram.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct HistStyle {
    pub fill_color: Option<ColorSpec>,
    pub line_color: Option<ColorSpec>,
    /// ROOT fill style; `0` is hollow, `1001` solid, `3xxx` hatched.
    pub fill_style: i32,
    /// ROOT line style; `1` solid, `2`..`10` dashed/dotted patterns.
    pub line_style: i32,
    pub line_width: f64,
    pub marker_style: i32,
    pub marker_color: Option<ColorSpec>,
}

impl Default for HistStyle {
    fn default() -> Self {
        Self {
            fill_color: None,
            line_color: None,
            fill_style: 1001,
            line_style: 1,
            line_width: 1.0,
            marker_style: 20,
            marker_color: None,
        }
    }
}

/// Styled group with its legend label.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupStyle {
    pub label: String,
    pub style: HistStyle,
}

/// Axis titles and scale of one branch.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct PlotObject {
    #[serde(rename = "XTitle")]
    pub x_title: String,
    #[serde(rename = "YTitle")]
    pub y_title: String,
    #[serde(rename = "LogY")]
    pub log_y: bool,
}

impl Default for PlotObject {
    fn default() -> Self {
        Self { x_title: String::new(), y_title: "Events".into(), log_y: false }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct PlotGroupEntry {
    #[serde(rename = "Name")]
    name: Option<String>,
    #[serde(rename = "Style")]
    style: Option<String>,
}

/// Resolves groups and branches to styles, labels and axis titles.
#[derive(Debug, Clone, Default)]
pub struct ConfigHistFactory {
    groups: HashMap<String, PlotGroupEntry>,
    styles: HashMap<String, HistStyle>,
    objects: HashMap<String, PlotObject>,
}

impl ConfigHistFactory {
    /// Load the configuration of `analysis` from `manager`.
    pub fn load(manager: &Path, analysis: &str) -> Result<Self> {
        let groups = read_optional(&manager.join("PlotGroups").join(format!("{analysis}.json")))?;
        let styles = read_optional(&manager.join("Styles").join("styles.json"))?;
        let objects = read_optional(&manager.join("PlotObjects").join(format!("{analysis}.json")))?;
        Ok(Self {
            groups: groups.unwrap_or_default(),
            styles: styles.unwrap_or_default(),
            objects: objects.unwrap_or_default(),
        })
    }

    /// Style and legend label of `group`.
    pub fn group_style(&self, group: &str) -> GroupStyle {
        let Some(entry) = self.groups.get(group) else {
            warn!(group, "plot group not configured, using default style");
            return GroupStyle { label: group.to_string(), style: HistStyle::default() };
        };
        let style = match &entry.style {
            Some(name) => self.styles.get(name).cloned().unwrap_or_else(|| {
                warn!(group, style = %name, "style not found, using default style");
                HistStyle::default()
            }),
            None => HistStyle::default(),
        };
        GroupStyle { label: entry.name.clone().unwrap_or_else(|| group.to_string()), style }
    }

    /// Axis titles of `branch`. Channel suffixes (`_eee`) are stripped before
    /// the lookup when the full name is unknown.
    pub fn plot_object(&self, branch: &str) -> PlotObject {
        if let Some(o) = self.objects.get(branch) {
            return o.clone();
        }
        if let Some((base, _)) = branch.rsplit_once('_') {
            if let Some(o) = self.objects.get(base) {
                return o.clone();
            }
        }
        debug!(branch, "no plot object entry");
        PlotObject { x_title: branch.to_string(), ..PlotObject::default() }
    }

    /// Every branch with a plot object entry, sorted.
    pub fn branches(&self) -> Vec<String> {
        let mut names: Vec<String> = self.objects.keys().cloned().collect();
        names.sort();
        names
    }
}

fn read_optional<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<Option<T>> {
    if !path.exists() {
        warn!(path = %path.display(), "style configuration file missing");
        return Ok(None);
    }
    let text = std::fs::read_to_string(path)?;
    serde_json::from_str(&text).map(Some).map_err(|e| {
        Error::Validation(format!("failed to parse {}: {}", path.display(), e))
    })
}

/// Location of the analysis dataset manager.
///
/// An explicit directory wins. Otherwise: `/cms/<USER>/AnalysisDatasetManager`
/// on `hep.wisc.edu` hosts and
/// `/afs/cern.ch/user/<u>/<USER>/work/AnalysisDatasetManager` elsewhere, with
/// `<u>` the first letter of the user name.
pub fn dataset_manager_path(
    explicit: Option<&Path>,
    hostname: Option<&str>,
    user: Option<&str>,
) -> Result<PathBuf> {
    if let Some(dir) = explicit {
        return Ok(dir.to_path_buf());
    }
    let user = user.filter(|u| !u.is_empty()).ok_or_else(|| {
        Error::Validation("USER is not set; pass the dataset manager directory explicitly".into())
    })?;
    if hostname.is_some_and(|h| h.contains("hep.wisc.edu")) {
        return Ok(PathBuf::from(format!("/cms/{user}/AnalysisDatasetManager")));
    }
    let initial: String = user.chars().take(1).collect();
    Ok(PathBuf::from(format!("/afs/cern.ch/user/{initial}/{user}/work/AnalysisDatasetManager")))
}

/// Analysis name: the selection up to the first `_`.
pub fn analysis_name(selection: &str) -> &str {
    selection.split('_').next().unwrap_or(selection)
}
