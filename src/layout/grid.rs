use serde::{Deserialize, Serialize};

use crate::foundation::core::Tile;
use crate::foundation::error::{MediaError, MediaResult};

/// How a source is partitioned.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GridMode {
    /// `rows x cols` grid.
    #[default]
    #[serde(rename = "grid")]
    Grid,
    /// Horizontal strips only: columns are forced to 1.
    #[serde(rename = "horz", alias = "rows_only")]
    RowsOnly,
    /// Vertical strips only: rows are forced to 1.
    #[serde(rename = "vert", alias = "cols_only")]
    ColsOnly,
}

/// Partition request for the image splitter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSpec {
    /// Partition mode.
    #[serde(default)]
    pub mode: GridMode,
    /// Requested rows (ignored by [`GridMode::ColsOnly`]).
    #[serde(default = "default_count")]
    pub rows: u32,
    /// Requested columns (ignored by [`GridMode::RowsOnly`]).
    #[serde(default = "default_count")]
    pub cols: u32,
}

fn default_count() -> u32 {
    2
}

impl Default for GridSpec {
    fn default() -> Self {
        Self {
            mode: GridMode::Grid,
            rows: default_count(),
            cols: default_count(),
        }
    }
}

impl GridSpec {
    /// Reject zero rows or columns.
    pub fn validate(&self) -> MediaResult<()> {
        if self.rows == 0 || self.cols == 0 {
            return Err(MediaError::validation(format!(
                "grid rows and cols must be >= 1, got {}x{}",
                self.rows, self.cols
            )));
        }
        Ok(())
    }

    /// `(rows, cols)` after the mode has been applied.
    pub fn effective(&self) -> (u32, u32) {
        match self.mode {
            GridMode::Grid => (self.rows, self.cols),
            GridMode::RowsOnly => (self.rows, 1),
            GridMode::ColsOnly => (1, self.cols),
        }
    }
}

/// Result of partitioning a `width x height` source.
#[derive(Clone, Debug, PartialEq)]
pub struct GridPartition {
    /// Effective rows.
    pub rows: u32,
    /// Effective columns.
    pub cols: u32,
    /// Partition width (`width / cols`, real-valued).
    pub tile_w: f64,
    /// Partition height (`height / rows`, real-valued).
    pub tile_h: f64,
    /// Tiles in row-major order.
    pub tiles: Vec<Tile>,
}

/// Partition a source of `width x height` into `rows * cols` equal tiles.
///
/// No remainder is redistributed: partitions may be fractional.
pub fn compute_grid_partition(width: u32, height: u32, spec: &GridSpec) -> MediaResult<GridPartition> {
    spec.validate()?;
    let (rows, cols) = spec.effective();
    let tile_w = f64::from(width) / f64::from(cols);
    let tile_h = f64::from(height) / f64::from(rows);

    let mut tiles = Vec::with_capacity(rows as usize * cols as usize);
    for y in 0..rows {
        for x in 0..cols {
            tiles.push(Tile::new(
                f64::from(x) * tile_w,
                f64::from(y) * tile_h,
                tile_w,
                tile_h,
            ));
        }
    }

    Ok(GridPartition {
        rows,
        cols,
        tile_w,
        tile_h,
        tiles,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/layout/grid.rs"]
mod tests;
