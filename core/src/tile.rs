//! Tile classifications and the persisted room layout format.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Classification of a single tile-grid cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TileType {
    /// Walkable floor.
    #[default]
    Ground,
    /// Solid cell that blocks movement.
    Wall,
}

impl TileType {
    /// Every tile type in declaration order.
    pub const ALL: [TileType; 2] = [TileType::Ground, TileType::Wall];

    /// Single-character code used by the persisted layout format.
    #[must_use]
    pub const fn code(self) -> char {
        match self {
            Self::Ground => 'G',
            Self::Wall => 'W',
        }
    }

    /// Parses a layout code, returning `None` for unknown characters.
    #[must_use]
    pub const fn from_code(code: char) -> Option<Self> {
        match code {
            'G' => Some(Self::Ground),
            'W' => Some(Self::Wall),
            _ => None,
        }
    }

    /// Reports whether the tile takes part in wall collisions.
    #[must_use]
    pub const fn is_wall(self) -> bool {
        matches!(self, Self::Wall)
    }
}

impl fmt::Display for TileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Errors raised while parsing a persisted room layout.
#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum LayoutError {
    /// The layout contained no rows.
    #[error("layout contains no rows")]
    Empty,
    /// A row contained a different number of cells than the first row.
    #[error("row {row} has {found} cells but {expected} were expected")]
    RaggedRow {
        /// Zero-based index of the offending row.
        row: usize,
        /// Number of cells in the first row.
        expected: usize,
        /// Number of cells found in the offending row.
        found: usize,
    },
    /// A cell held something other than a known tile code.
    #[error("unrecognised tile code '{code}' at row {row}, column {column}")]
    UnknownCode {
        /// Zero-based row of the offending cell.
        row: usize,
        /// Zero-based column of the offending cell.
        column: usize,
        /// Raw cell contents after trimming.
        code: String,
    },
    /// The layout dimensions do not match the grid it is loaded into.
    #[error(
        "layout is {found_columns}x{found_rows} but the room is {expected_columns}x{expected_rows}"
    )]
    DimensionMismatch {
        /// Columns required by the receiving grid.
        expected_columns: u32,
        /// Rows required by the receiving grid.
        expected_rows: u32,
        /// Columns present in the layout.
        found_columns: u32,
        /// Rows present in the layout.
        found_rows: u32,
    },
}

/// Row-major tile-type grid as stored in layout files.
///
/// The textual form is one line per row, cells separated by commas, each
/// cell holding a single tile code (`G` or `W`).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileLayout {
    columns: u32,
    rows: u32,
    cells: Vec<TileType>,
}

impl TileLayout {
    /// Creates a layout filled with a single tile type.
    #[must_use]
    pub fn filled(columns: u32, rows: u32, tile: TileType) -> Self {
        let count = columns as usize * rows as usize;
        Self {
            columns,
            rows,
            cells: vec![tile; count],
        }
    }

    /// Creates a layout by evaluating `tile_at(column, row)` for every cell.
    #[must_use]
    pub fn from_fn<F>(columns: u32, rows: u32, mut tile_at: F) -> Self
    where
        F: FnMut(u32, u32) -> TileType,
    {
        let mut cells = Vec::with_capacity(columns as usize * rows as usize);
        for row in 0..rows {
            for column in 0..columns {
                cells.push(tile_at(column, row));
            }
        }
        Self {
            columns,
            rows,
            cells,
        }
    }

    /// Number of columns in the layout.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows in the layout.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Tile type stored at the provided cell.
    ///
    /// # Panics
    ///
    /// Panics when the cell lies outside the layout.
    #[must_use]
    pub fn get(&self, column: u32, row: u32) -> TileType {
        assert!(
            column < self.columns && row < self.rows,
            "layout cell ({column}, {row}) outside {}x{} layout",
            self.columns,
            self.rows
        );
        self.cells[row as usize * self.columns as usize + column as usize]
    }

    /// Iterator over `(column, row, tile)` triples in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32, TileType)> + '_ {
        let columns = self.columns.max(1);
        self.cells.iter().enumerate().map(move |(index, tile)| {
            let index = index as u32;
            (index % columns, index / columns, *tile)
        })
    }

    /// Parses the comma-separated layout format.
    ///
    /// Blank trailing lines and surrounding whitespace are ignored. Every
    /// other row must have the same number of cells, a blank one counting as
    /// none, and every cell must hold a known tile code; the first violation
    /// is reported.
    pub fn from_csv(text: &str) -> Result<Self, LayoutError> {
        let mut lines: Vec<&str> = text.lines().map(str::trim).collect();
        while lines.last().is_some_and(|line| line.is_empty()) {
            let _ = lines.pop();
        }

        let Some(first) = lines.iter().find(|line| !line.is_empty()) else {
            return Err(LayoutError::Empty);
        };
        let expected = first.split(',').count();

        let mut cells = Vec::with_capacity(expected * lines.len());
        for (row, line) in lines.iter().enumerate() {
            let fields: Vec<&str> = if line.is_empty() {
                Vec::new()
            } else {
                line.split(',').map(str::trim).collect()
            };
            if fields.len() != expected {
                return Err(LayoutError::RaggedRow {
                    row,
                    expected,
                    found: fields.len(),
                });
            }

            for (column, field) in fields.into_iter().enumerate() {
                let mut chars = field.chars();
                let tile = match (chars.next(), chars.next()) {
                    (Some(code), None) => TileType::from_code(code),
                    _ => None,
                };
                let Some(tile) = tile else {
                    return Err(LayoutError::UnknownCode {
                        row,
                        column,
                        code: field.to_owned(),
                    });
                };
                cells.push(tile);
            }
        }

        Ok(Self {
            columns: expected as u32,
            rows: lines.len() as u32,
            cells,
        })
    }

    /// Serialises the layout into the comma-separated format.
    #[must_use]
    pub fn to_csv(&self) -> String {
        let mut text = String::with_capacity(self.cells.len() * 2);
        for row in self.cells.chunks(self.columns.max(1) as usize) {
            let line: Vec<String> = row.iter().map(|tile| tile.code().to_string()).collect();
            text.push_str(&line.join(","));
            text.push('\n');
        }
        text
    }

    /// Confirms that the layout matches the provided grid dimensions.
    pub fn expect_dimensions(&self, columns: u32, rows: u32) -> Result<(), LayoutError> {
        if self.columns == columns && self.rows == rows {
            return Ok(());
        }
        Err(LayoutError::DimensionMismatch {
            expected_columns: columns,
            expected_rows: rows,
            found_columns: self.columns,
            found_rows: self.rows,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip() {
        for tile in TileType::ALL {
            assert_eq!(TileType::from_code(tile.code()), Some(tile));
        }
        assert_eq!(TileType::from_code('x'), None);
    }

    #[test]
    fn csv_round_trip_preserves_every_cell() {
        let layout = TileLayout::from_fn(7, 4, |column, row| {
            if (column * 3 + row) % 4 == 0 {
                TileType::Wall
            } else {
                TileType::Ground
            }
        });

        let text = layout.to_csv();
        let restored = TileLayout::from_csv(&text).expect("layout parses");

        assert_eq!(restored, layout);
        for (column, row, tile) in layout.iter() {
            assert_eq!(restored.get(column, row), tile);
        }
    }

    #[test]
    fn csv_uses_one_line_per_row() {
        let layout = TileLayout::from_fn(3, 2, |column, _| {
            if column == 1 {
                TileType::Wall
            } else {
                TileType::Ground
            }
        });
        assert_eq!(layout.to_csv(), "G,W,G\nG,W,G\n");
    }

    #[test]
    fn parse_tolerates_whitespace_and_trailing_lines() {
        let layout = TileLayout::from_csv(" W, G \r\nG,W\n\n").expect("layout parses");
        assert_eq!(layout.columns(), 2);
        assert_eq!(layout.rows(), 2);
        assert_eq!(layout.get(0, 0), TileType::Wall);
        assert_eq!(layout.get(1, 1), TileType::Wall);
    }

    #[test]
    fn parse_rejects_empty_input() {
        assert_eq!(TileLayout::from_csv("\n  \n"), Err(LayoutError::Empty));
    }

    #[test]
    fn parse_rejects_ragged_rows() {
        let error = TileLayout::from_csv("G,G,G\nG,G\n").unwrap_err();
        assert_eq!(
            error,
            LayoutError::RaggedRow {
                row: 1,
                expected: 3,
                found: 2
            }
        );
    }

    #[test]
    fn parse_rejects_blank_rows_before_the_end() {
        let error = TileLayout::from_csv("G,W\n\nW,G\n\n").unwrap_err();
        assert_eq!(
            error,
            LayoutError::RaggedRow {
                row: 1,
                expected: 2,
                found: 0
            }
        );

        let leading = TileLayout::from_csv("\nG,W\n").unwrap_err();
        assert!(matches!(leading, LayoutError::RaggedRow { row: 0, .. }));
    }

    #[test]
    fn parse_rejects_unknown_codes() {
        let error = TileLayout::from_csv("G,G\nG,X\n").unwrap_err();
        assert_eq!(
            error,
            LayoutError::UnknownCode {
                row: 1,
                column: 1,
                code: "X".to_owned()
            }
        );

        let error = TileLayout::from_csv("GW,G\n").unwrap_err();
        assert!(matches!(error, LayoutError::UnknownCode { column: 0, .. }));
    }

    #[test]
    fn dimension_check_reports_both_sizes() {
        let layout = TileLayout::filled(4, 3, TileType::Ground);
        assert!(layout.expect_dimensions(4, 3).is_ok());
        assert_eq!(
            layout.expect_dimensions(5, 3),
            Err(LayoutError::DimensionMismatch {
                expected_columns: 5,
                expected_rows: 3,
                found_columns: 4,
                found_rows: 3,
            })
        );
    }
}
