//! Reading and writing room layout CSV files.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use crashnet_core::TileLayout;

/// Loads a layout from a CSV file.
pub(crate) fn read(path: &Path) -> Result<TileLayout> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read layout at {}", path.display()))?;
    TileLayout::from_csv(&contents)
        .with_context(|| format!("failed to parse layout at {}", path.display()))
}

/// Stores a layout as CSV, replacing any existing file.
pub(crate) fn write(path: &Path, layout: &TileLayout) -> Result<()> {
    fs::write(path, layout.to_csv())
        .with_context(|| format!("failed to write layout to {}", path.display()))
}

/// Checks a layout file and optionally its dimensions, returning the layout.
pub(crate) fn check(path: &Path, dimensions: Option<(u32, u32)>) -> Result<TileLayout> {
    let layout = read(path)?;
    if let Some((columns, rows)) = dimensions {
        layout
            .expect_dimensions(columns, rows)
            .with_context(|| format!("layout at {} has the wrong size", path.display()))?;
    }
    Ok(layout)
}
