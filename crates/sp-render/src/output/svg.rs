use std::path::Path;

/// Write an SVG document, creating parent directories as needed.
pub fn save_svg(svg: &str, path: &Path) -> crate::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, svg)?;
    Ok(())
}
