use serde::{Deserialize, Serialize};

use crate::foundation::core::Tile;
use crate::foundation::error::{MediaError, MediaResult};
use crate::layout::fit::crop_to_fill;

/// Widest canvas a contact sheet may produce.
pub const MAX_SHEET_WIDTH: f64 = 8192.0;

/// Requested contact-sheet canvas width.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SheetWidth {
    /// First image's natural width times the column count.
    #[default]
    Auto,
    /// Explicit width in pixels.
    Fixed(u32),
}

impl Serialize for SheetWidth {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Self::Auto => serializer.serialize_str("auto"),
            Self::Fixed(w) => serializer.serialize_u32(*w),
        }
    }
}

impl<'de> Deserialize<'de> for SheetWidth {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Px(u32),
            Word(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Px(w) => Ok(Self::Fixed(w)),
            Repr::Word(s) if s.eq_ignore_ascii_case("auto") => Ok(Self::Auto),
            Repr::Word(s) => Err(serde::de::Error::custom(format!(
                "sheet width must be a pixel count or \"auto\", got \"{s}\""
            ))),
        }
    }
}

/// Contact-sheet request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactSheetSpec {
    /// Gap between cells and around the border, in pixels.
    #[serde(default)]
    pub gap: u32,
    /// Canvas width policy.
    #[serde(default)]
    pub width: SheetWidth,
}

/// One image's cell on the sheet plus the source window that fills it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellPlacement {
    /// Index into the submitted image list.
    pub index: usize,
    /// Row of the cell.
    pub row: u32,
    /// Column of the cell within its row (before centering).
    pub col: u32,
    /// Destination rectangle on the canvas.
    pub cell: Tile,
    /// Crop-to-fill source window.
    pub crop: Tile,
}

/// Geometry of a contact sheet.
#[derive(Clone, Debug, PartialEq)]
pub struct ContactSheetLayout {
    /// Column count.
    pub cols: u32,
    /// Row count.
    pub rows: u32,
    /// Canvas width (real-valued).
    pub width: f64,
    /// Canvas height (real-valued).
    pub height: f64,
    /// Cell width.
    pub cell_w: f64,
    /// Cell height.
    pub cell_h: f64,
    /// Placements in submission order.
    pub placements: Vec<CellPlacement>,
}

/// `(cols, rows)` for `n` items: `cols = ceil(sqrt(n))`, `rows = ceil(n / cols)`.
///
/// Perfect squares come out symmetric without special-casing.
pub fn grid_shape(n: usize) -> (u32, u32) {
    if n == 0 {
        return (0, 0);
    }
    let mut cols = (n as f64).sqrt().ceil() as usize;
    // Guard against sqrt rounding for large perfect squares.
    while cols * cols < n {
        cols += 1;
    }
    while cols > 1 && (cols - 1) * (cols - 1) >= n {
        cols -= 1;
    }
    let rows = n.div_ceil(cols);
    (cols as u32, rows as u32)
}

/// Lay out `sizes` (natural `(width, height)` per image) as a contact sheet.
///
/// Returns `Ok(None)` for an empty image list. The first image defines the reference cell
/// aspect; the last row is horizontally centered when incomplete.
pub fn compute_contact_sheet_layout(
    sizes: &[(u32, u32)],
    spec: &ContactSheetSpec,
) -> MediaResult<Option<ContactSheetLayout>> {
    let Some(&(first_w, first_h)) = sizes.first() else {
        return Ok(None);
    };
    if sizes.iter().any(|&(w, h)| w == 0 || h == 0) {
        return Err(MediaError::validation("contact sheet images must be non-empty"));
    }

    let n = sizes.len();
    let (cols, rows) = grid_shape(n);
    let (colsf, rowsf) = (f64::from(cols), f64::from(rows));

    let requested = match spec.width {
        SheetWidth::Auto => f64::from(first_w) * colsf,
        SheetWidth::Fixed(w) => f64::from(w),
    };
    let width = requested.min(MAX_SHEET_WIDTH);
    if width <= 0.0 {
        return Err(MediaError::validation("contact sheet width must be > 0"));
    }
    let base_aspect = f64::from(first_w) / f64::from(first_h);
    let height = (width * (rowsf / colsf)) / base_aspect;

    let gap = f64::from(spec.gap);
    let cell_w = (width - gap * (colsf + 1.0)) / colsf;
    let cell_h = (height - gap * (rowsf + 1.0)) / rowsf;
    if cell_w <= 0.0 || cell_h <= 0.0 {
        return Err(MediaError::validation(format!(
            "gap {} leaves no room for {cols}x{rows} cells on a {width:.0}x{height:.0} sheet",
            spec.gap
        )));
    }
    let cell_aspect = cell_w / cell_h;

    let mut placements = Vec::with_capacity(n);
    let mut idx = 0usize;
    for r in 0..rows {
        let remaining = n - idx;
        let col_count = (cols as usize).min(remaining);
        if col_count == 0 {
            break;
        }
        let shift_x = ((cols as usize - col_count) as f64 * (cell_w + gap)) / 2.0;
        for c in 0..col_count {
            let (w, h) = sizes[idx];
            let x = gap + (c as f64) * (cell_w + gap) + shift_x;
            let y = gap + f64::from(r) * (cell_h + gap);
            placements.push(CellPlacement {
                index: idx,
                row: r,
                col: c as u32,
                cell: Tile::new(x, y, cell_w, cell_h),
                crop: crop_to_fill(f64::from(w), f64::from(h), cell_aspect),
            });
            idx += 1;
        }
    }

    Ok(Some(ContactSheetLayout {
        cols,
        rows,
        width,
        height,
        cell_w,
        cell_h,
        placements,
    }))
}

#[cfg(test)]
#[path = "../../tests/unit/layout/contact_sheet.rs"]
mod tests;
