//! Static HTML index of the plots in an output directory.

use std::fmt::Write as FmtWrite;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::canvas::escape_xml;

const IMAGE_EXTENSIONS: [&str; 2] = ["svg", "png"];

/// Regenerate `<dir>/index.html` listing every image in `<dir>/plots`,
/// each linked to its `plots/logs/<name>_event_info.log` when present.
pub fn write_gallery(dir: &Path, title: &str) -> crate::Result<PathBuf> {
    let plots_dir = dir.join("plots");
    let mut images: Vec<PathBuf> = match std::fs::read_dir(&plots_dir) {
        Ok(entries) => entries
            .filter_map(|e| e.ok().map(|e| e.path()))
            .filter(|p| {
                p.extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| IMAGE_EXTENSIONS.contains(&e))
            })
            .collect(),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
        Err(e) => return Err(e.into()),
    };
    images.sort();

    let mut html = String::with_capacity(4096);
    writeln!(html, "<!DOCTYPE html>")?;
    writeln!(html, "<html lang=\"en\">")?;
    writeln!(html, "<head>")?;
    writeln!(html, "<meta charset=\"utf-8\"/>")?;
    writeln!(html, "<title>{}</title>", escape_xml(title))?;
    writeln!(html, "<style>")?;
    writeln!(html, "body{{font-family:Arial,Helvetica,sans-serif;margin:20px;color:#222;}}")?;
    writeln!(html, ".plot{{display:inline-block;margin:8px;text-align:center;vertical-align:top;}}")?;
    writeln!(html, ".plot img{{width:400px;border:1px solid #e5e5e5;}}")?;
    writeln!(html, ".plot p{{font-size:13px;margin:4px 0;}}")?;
    writeln!(html, "</style>")?;
    writeln!(html, "</head>")?;
    writeln!(html, "<body>")?;
    writeln!(html, "<h1>{}</h1>", escape_xml(title))?;

    for image in &images {
        let (Some(file), Some(stem)) = (
            image.file_name().and_then(|f| f.to_str()),
            image.file_stem().and_then(|f| f.to_str()),
        ) else {
            continue;
        };
        let file = escape_xml(file);
        writeln!(html, "<div class=\"plot\">")?;
        writeln!(html, "<a href=\"plots/{file}\"><img src=\"plots/{file}\" alt=\"{file}\"/></a>")?;
        write!(html, "<p>{}", escape_xml(stem))?;
        let log = format!("{stem}_event_info.log");
        if plots_dir.join("logs").join(&log).is_file() {
            write!(html, " (<a href=\"plots/logs/{}\">log</a>)", escape_xml(&log))?;
        }
        writeln!(html, "</p>")?;
        writeln!(html, "</div>")?;
    }

    writeln!(html, "</body>")?;
    writeln!(html, "</html>")?;

    std::fs::create_dir_all(dir)?;
    let index = dir.join("index.html");
    std::fs::write(&index, html)?;
    debug!(path = %index.display(), plots = images.len(), "wrote gallery");
    Ok(index)
}
