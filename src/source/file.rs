use std::path::Path;

use anyhow::{bail, Context, Result};

/// Read every line of a local log or list file.
pub fn read_lines(path: &Path) -> Result<Vec<String>> {
    if !path.is_file() {
        bail!("input file [{}] not found", path.display());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    Ok(content.lines().map(str::to_string).collect())
}
